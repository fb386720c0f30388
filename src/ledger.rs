// src/ledger.rs
//! Durable record of every warning already announced, one id per line.
//! The file is loaded once at open; later appends do not feed back into
//! the in-memory snapshot, so a run always judges against the state it
//! started from.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct Ledger {
    path: PathBuf,
    snapshot: HashSet<String>,
}

impl Ledger {
    /// Open the ledger, creating an empty file when none exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("creating ledger directory {}", parent.display())
                    })?;
                }
            }
            File::create(&path)
                .with_context(|| format!("creating ledger file {}", path.display()))?;
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading ledger {}", path.display()))?;
        let snapshot = contents
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        Ok(Self { path, snapshot })
    }

    /// Was this id already recorded when the ledger was opened?
    pub fn contains(&self, id: &str) -> bool {
        self.snapshot.contains(id)
    }

    /// Append an id and flush it to disk. The snapshot is left alone.
    pub fn record(&mut self, id: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening ledger {} for append", self.path.display()))?;
        writeln!(file, "{id}")
            .with_context(|| format!("appending to ledger {}", self.path.display()))?;
        file.flush()
            .with_context(|| format!("flushing ledger {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Append-only audit trail of every warning observed, announced or not.
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write one "{published_at} | {title}" line.
    pub fn append(&self, published_at: &str, title: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening audit log {}", self.path.display()))?;
        writeln!(file, "{published_at} | {title}")
            .with_context(|| format!("appending to audit log {}", self.path.display()))?;
        Ok(())
    }
}
