use flood_warning_bot::ingest::types::FeedSource;
use flood_warning_bot::ingest::providers::bom_rss::BomRssSource;
use std::io::Write;

// 'static fixture via include_str!, written to a temp file to exercise
// the same path the FLOODBOT_FEED_FILE override uses at runtime.
const WA_XML: &str = include_str!("fixtures/bom_wa.xml");

fn fixture_file(xml: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("temp fixture file");
    f.write_all(xml.as_bytes()).expect("write fixture");
    f
}

#[tokio::test]
async fn wa_fixture_parses_and_yields_items() {
    let file = fixture_file(WA_XML);
    let source = BomRssSource::from_file(file.path());

    let items = source.fetch_latest().await.expect("wa feed parses");
    assert_eq!(items.len(), 4);
    assert!(
        items.iter().all(|i| i.title.is_some() && i.link.is_some()),
        "every fixture item carries a title and link"
    );
    assert_eq!(
        items[0].title.as_deref(),
        Some("21/07:30:00 WST Flood Warning for the Gascoyne River")
    );
    assert_eq!(
        items[0].pub_date.as_deref(),
        Some("Mon, 01 Jan 2024 00:00:00 GMT")
    );
    assert!(
        items[3].pub_date.is_none(),
        "marine wind warning has no pubDate in the fixture"
    );
}

#[tokio::test]
async fn source_name_reports_the_file_path() {
    let file = fixture_file(WA_XML);
    let source = BomRssSource::from_file(file.path());
    assert_eq!(source.name(), file.path().display().to_string());
}
