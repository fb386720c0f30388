pub mod bluesky;

/// One piece of an announcement. Link segments render as their text in
/// the plain body and carry a facet pointing at the url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { text: String, url: String },
}

/// Byte range of a link inside the rendered text, plus its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFacet {
    pub byte_start: usize,
    pub byte_end: usize,
    pub uri: String,
}

/// An announcement is a list of segments. The plain text and the link
/// facets are both derived from the same list, so the byte offsets the
/// facets carry always agree with the text that gets posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    segments: Vec<Segment>,
}

impl Announcement {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The standard warning announcement: siren, cleaned title, link.
    pub fn for_alert(clean_title: &str, link: &str) -> Self {
        Self::new(vec![
            Segment::Text(format!("🚨 {clean_title} has been issued.\nMore info:\n")),
            Segment::Link {
                text: link.to_string(),
                url: link.to_string(),
            },
        ])
    }

    /// Render the plain post body.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Link { text, .. } => out.push_str(text),
            }
        }
        out
    }

    /// Byte ranges (UTF-8 offsets into `text()`) for every link segment.
    pub fn link_facets(&self) -> Vec<LinkFacet> {
        let mut facets = Vec::new();
        let mut offset = 0usize;
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => offset += t.len(),
                Segment::Link { text, url } => {
                    facets.push(LinkFacet {
                        byte_start: offset,
                        byte_end: offset + text.len(),
                        uri: url.clone(),
                    });
                    offset += text.len();
                }
            }
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_announcement_renders_title_and_link() {
        let a = Announcement::for_alert(
            "Flood Warning for the Gascoyne River",
            "http://www.bom.gov.au/cgi-bin/wrap_fwo.pl?IDW20300.html",
        );
        assert_eq!(
            a.text(),
            "🚨 Flood Warning for the Gascoyne River has been issued.\nMore info:\nhttp://www.bom.gov.au/cgi-bin/wrap_fwo.pl?IDW20300.html"
        );
    }

    #[test]
    fn facet_byte_range_covers_exactly_the_link_text() {
        let a = Announcement::for_alert("Flood Warning", "http://example.com/w");
        let text = a.text();
        let facets = a.link_facets();
        assert_eq!(facets.len(), 1);
        let f = &facets[0];
        assert_eq!(&text[f.byte_start..f.byte_end], "http://example.com/w");
        assert_eq!(f.uri, "http://example.com/w");
        assert_eq!(f.byte_end, text.len());
    }

    #[test]
    fn byte_offsets_account_for_multibyte_characters() {
        // The siren emoji is four bytes in UTF-8. Offsets are byte
        // offsets, so the facet must start past all of them.
        let a = Announcement::for_alert("X", "http://e.com");
        let f = &a.link_facets()[0];
        let prefix = "🚨 X has been issued.\nMore info:\n";
        assert_eq!(f.byte_start, prefix.len());
        assert!(f.byte_start > prefix.chars().count());
    }

    #[test]
    fn text_only_announcement_has_no_facets() {
        let a = Announcement::new(vec![Segment::Text("no warnings found".into())]);
        assert!(a.link_facets().is_empty());
    }
}
