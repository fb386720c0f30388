use super::Announcement;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_USERNAME: &str = "BLUESKY_USERNAME";
pub const ENV_PASSWORD: &str = "BLUESKY_PASSWORD";

/// Posts announcements to a Bluesky account over the XRPC HTTP API.
/// Each post logs in fresh (createSession) and then writes one
/// app.bsky.feed.post record.
#[derive(Clone)]
pub struct BlueskyNotifier {
    service: String,
    identifier: String,
    password: String,
    client: Client,
    timeout: Duration,
}

impl BlueskyNotifier {
    pub fn new(service: impl Into<String>, identifier: String, password: String) -> Self {
        Self {
            service: service.into(),
            identifier,
            password,
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Build from `BLUESKY_USERNAME` / `BLUESKY_PASSWORD`. Returns
    /// `None` when either is missing so the caller can keep running
    /// without a publisher.
    pub fn from_env(service: impl Into<String>) -> Option<Self> {
        let identifier = std::env::var(ENV_USERNAME).ok()?;
        let password = std::env::var(ENV_PASSWORD).ok()?;
        if identifier.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self::new(service, identifier, password))
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub async fn post(&self, announcement: &Announcement) -> Result<()> {
        let session = self.create_session().await?;
        self.create_record(&session, announcement).await
    }

    async fn create_session(&self) -> Result<Session> {
        let url = format!("{}/xrpc/com.atproto.server.createSession", self.service);
        let rsp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&CreateSessionRequest {
                identifier: &self.identifier,
                password: &self.password,
            })
            .send()
            .await
            .context("Bluesky createSession request failed")?;
        if let Err(e) = rsp.error_for_status_ref() {
            return Err(anyhow!("Bluesky createSession HTTP error: {e}"));
        }
        rsp.json::<Session>()
            .await
            .context("decoding Bluesky createSession response")
    }

    async fn create_record(&self, session: &Session, announcement: &Announcement) -> Result<()> {
        let url = format!("{}/xrpc/com.atproto.repo.createRecord", self.service);
        let record = PostRecord::from_announcement(announcement);
        let rsp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&session.access_jwt)
            .json(&CreateRecordRequest {
                repo: &session.did,
                collection: "app.bsky.feed.post",
                record,
            })
            .send()
            .await
            .context("Bluesky createRecord request failed")?;
        if let Err(e) = rsp.error_for_status_ref() {
            return Err(anyhow!("Bluesky createRecord HTTP error: {e}"));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    did: String,
}

#[derive(Serialize)]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'a str,
    record: PostRecord,
}

#[derive(Serialize)]
struct PostRecord {
    #[serde(rename = "$type")]
    record_type: &'static str,
    text: String,
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
}

impl PostRecord {
    fn from_announcement(announcement: &Announcement) -> Self {
        let facets = announcement
            .link_facets()
            .into_iter()
            .map(|f| Facet {
                index: ByteSlice {
                    byte_start: f.byte_start,
                    byte_end: f.byte_end,
                },
                features: vec![Feature::Link { uri: f.uri }],
            })
            .collect();
        Self {
            record_type: "app.bsky.feed.post",
            text: announcement.text(),
            created_at: Utc::now().to_rfc3339(),
            facets,
        }
    }
}

#[derive(Serialize)]
struct Facet {
    index: ByteSlice,
    features: Vec<Feature>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ByteSlice {
    byte_start: usize,
    byte_end: usize,
}

#[derive(Serialize)]
#[serde(tag = "$type")]
enum Feature {
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn post_record_serializes_with_facet_wire_names() {
        let a = Announcement::for_alert("Flood Warning", "http://example.com/w");
        let record = PostRecord::from_announcement(&a);
        let json = serde_json::to_value(&record).expect("serializes");
        assert_eq!(json["$type"], "app.bsky.feed.post");
        assert!(json["createdAt"].is_string());
        let facet = &json["facets"][0];
        assert!(facet["index"]["byteStart"].is_number());
        assert!(facet["index"]["byteEnd"].is_number());
        assert_eq!(
            facet["features"][0]["$type"],
            "app.bsky.richtext.facet#link"
        );
        assert_eq!(facet["features"][0]["uri"], "http://example.com/w");
    }

    #[test]
    fn facetless_record_omits_the_facets_field() {
        let a = Announcement::new(vec![crate::notify::Segment::Text("hello".into())]);
        let json = serde_json::to_value(PostRecord::from_announcement(&a)).expect("serializes");
        assert!(json.get("facets").is_none());
    }

    #[test]
    #[serial]
    fn from_env_requires_both_credentials() {
        std::env::remove_var(ENV_USERNAME);
        std::env::remove_var(ENV_PASSWORD);
        assert!(BlueskyNotifier::from_env("https://bsky.social").is_none());

        std::env::set_var(ENV_USERNAME, "alerts.example.com");
        assert!(BlueskyNotifier::from_env("https://bsky.social").is_none());

        std::env::set_var(ENV_PASSWORD, "app-password");
        assert!(BlueskyNotifier::from_env("https://bsky.social").is_some());

        std::env::remove_var(ENV_USERNAME);
        std::env::remove_var(ENV_PASSWORD);
    }
}
