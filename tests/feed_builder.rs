use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone as _, Utc};
use distraction::config::SiteConfig;
use distraction::dataset::DirectoryDataset;
use distraction::{FeedBuilder, QuoteError, QuoteStore};

fn builder(dir: &Path, site: SiteConfig) -> FeedBuilder {
    let store = QuoteStore::new(Arc::new(DirectoryDataset::new(dir)));
    FeedBuilder::new(store, site)
}

fn write_sample(dir: &Path) {
    let quotes = serde_json::json!([
        {"date": "2024-12-12", "author": "Oscar Wilde", "quote": "Be yourself; everyone else is already taken.", "contributor": "@icco"},
        {"date": "2024-12-10", "author": "", "quote": "Anonymous wisdom.", "contributor": ""},
        {"date": "12/11/2024", "author": "Bad", "quote": "Bad date.", "contributor": ""},
        {"date": "2025-03-01", "author": "Later", "quote": "Not yet public.", "contributor": ""}
    ]);
    std::fs::write(dir.join("quotes.json"), quotes.to_string()).unwrap();
}

#[test]
fn entries_follow_listing() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path());
    let builder = builder(dir.path(), SiteConfig::default());
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

    let listing = QuoteStore::new(Arc::new(DirectoryDataset::new(dir.path())))
        .list_all_at(now)
        .unwrap();
    let feed = builder.build_at(now).unwrap();

    assert_eq!(feed.entries.len(), listing.quotes.len());
    assert_eq!(feed.entries.len(), 2);
    assert_eq!(feed.skipped, 1);
    for (entry, dated) in feed.entries.iter().zip(&listing.quotes) {
        assert_eq!(entry.title, dated.quote.date);
        assert_eq!(
            entry.link,
            format!("https://distraction.today/{}", dated.quote.date)
        );
    }

    assert_eq!(
        feed.entries[0].content,
        "\u{201c}Be yourself; everyone else is already taken.\u{201d}\n\u{2014} Oscar Wilde"
    );
    assert_eq!(feed.entries[1].content, "Anonymous wisdom.");
    assert_eq!(
        feed.updated,
        Utc.with_ymd_and_hms(2024, 12, 12, 0, 0, 0).unwrap()
    );
}

#[test]
fn custom_base_url_drives_permalinks() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path());
    let site = SiteConfig::with_base_url("http://localhost:8080/").unwrap();
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

    let feed = builder(dir.path(), site).build_at(now).unwrap();
    assert_eq!(feed.link, "http://localhost:8080");
    assert_eq!(feed.entries[0].link, "http://localhost:8080/2024-12-12");

    let rss = String::from_utf8(feed.to_rss().unwrap()).unwrap();
    assert!(rss.contains("<link>http://localhost:8080/2024-12-12</link>"));
}

#[test]
fn rss_and_atom_are_stable_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path());
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
    let feed = builder(dir.path(), SiteConfig::default())
        .build_at(now)
        .unwrap();

    let rss = feed.to_rss().unwrap();
    assert_eq!(rss, feed.to_rss().unwrap());
    let rss = String::from_utf8(rss).unwrap();
    assert_eq!(rss.matches("<item>").count(), 2);
    assert!(rss.contains("<title>distraction.today</title>"));
    assert!(rss.contains("<description>A daily quote to distract you.</description>"));
    assert!(rss.contains("<managingEditor>nat@natwelch.com (Nat Welch)</managingEditor>"));
    assert!(rss.find("2024-12-12").unwrap() < rss.find("2024-12-10").unwrap());
    assert!(!rss.contains("2025-03-01"));

    let atom = feed.to_atom().unwrap();
    assert_eq!(atom, feed.to_atom().unwrap());
    let atom = String::from_utf8(atom).unwrap();
    assert_eq!(atom.matches("<entry>").count(), 2);
    assert!(atom.contains("<updated>2024-12-12T00:00:00Z</updated>"));
    assert!(atom.contains("<name>Nat Welch</name>"));
    assert!(atom.contains("<email>nat@natwelch.com</email>"));
}

#[test]
fn empty_dataset_builds_empty_feed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("quotes.json"), "[]").unwrap();

    let feed = builder(dir.path(), SiteConfig::default()).build().unwrap();
    assert!(feed.entries.is_empty());

    let rss = String::from_utf8(feed.to_rss().unwrap()).unwrap();
    assert!(rss.contains("<channel>") && rss.contains("</channel>"));
    let atom = String::from_utf8(feed.to_atom().unwrap()).unwrap();
    assert!(atom.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\">"));
    assert!(atom.contains("</feed>"));
}

#[test]
fn unreadable_dataset_aborts_build() {
    let dir = tempfile::tempdir().unwrap();
    let result = builder(dir.path(), SiteConfig::default()).build();
    assert!(matches!(result, Err(QuoteError::DataUnavailable(_))));
}
