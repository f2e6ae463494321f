use std::io::Write as _;

use anyhow::Context as _;
use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};
use url::Url;

use crate::cli::{FeedArgs, FeedFormat};
use crate::config::SiteConfig;
use crate::dataset;
use crate::error::{QuoteError, Result};
use crate::formats::{DatedQuote, Quote};
use crate::store::{Listing, QuoteStore};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// The quote's date string.
    pub title: String,
    pub content: String,
    pub link: String,
    pub created: DateTime<Utc>,
}

/// A built feed. Serialization reads only these fields, so repeated calls to
/// [`Feed::to_rss`] or [`Feed::to_atom`] produce identical bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author_name: String,
    pub author_email: String,
    pub updated: DateTime<Utc>,
    pub entries: Vec<FeedEntry>,
    /// Dataset records left out because their date did not parse.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct FeedBuilder {
    store: QuoteStore,
    site: SiteConfig,
}

impl FeedBuilder {
    pub fn new(store: QuoteStore, site: SiteConfig) -> Self {
        Self { store, site }
    }

    pub fn build(&self) -> Result<Feed> {
        self.build_at(Utc::now())
    }

    pub fn build_at(&self, now: DateTime<Utc>) -> Result<Feed> {
        let listing = self.store.list_all_at(now)?;
        Ok(self.assemble(listing, now))
    }

    /// Turns a listing into feed entries, keeping the listing's order.
    pub fn assemble(&self, listing: Listing, now: DateTime<Utc>) -> Feed {
        let entries: Vec<FeedEntry> = listing
            .quotes
            .into_iter()
            .map(|dated| self.entry(dated))
            .collect();
        let updated = entries.iter().map(|e| e.created).max().unwrap_or(now);

        Feed {
            title: self.site.title.clone(),
            link: self.site.base_url.clone(),
            description: self.site.description.clone(),
            author_name: self.site.author_name.clone(),
            author_email: self.site.author_email.clone(),
            updated,
            entries,
            skipped: listing.dropped,
        }
    }

    fn entry(&self, dated: DatedQuote) -> FeedEntry {
        let DatedQuote { date, quote } = dated;
        FeedEntry {
            link: self.site.permalink(&quote.date),
            content: compose_body(&quote),
            created: date.and_time(NaiveTime::MIN).and_utc(),
            title: quote.date,
        }
    }
}

/// Quote text in quotation marks with an attribution line, or the bare text
/// when there is no author.
pub fn compose_body(quote: &Quote) -> String {
    let author = quote.author.trim();
    if author.is_empty() {
        return quote.text.clone();
    }
    format!("\u{201c}{}\u{201d}\n\u{2014} {}", quote.text, author)
}

impl Feed {
    /// RSS 2.0 document.
    pub fn to_rss(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<rss version=\"2.0\">\n");
        out.push_str("  <channel>\n");
        out.push_str(&format!("    <title>{}</title>\n", xml_escape(&self.title)));
        out.push_str(&format!("    <link>{}</link>\n", xml_escape(&self.link)));
        out.push_str(&format!(
            "    <description>{}</description>\n",
            xml_escape(&self.description)
        ));
        if !self.author_email.is_empty() {
            out.push_str(&format!(
                "    <managingEditor>{} ({})</managingEditor>\n",
                xml_escape(&self.author_email),
                xml_escape(&self.author_name)
            ));
        }
        out.push_str(&format!(
            "    <lastBuildDate>{}</lastBuildDate>\n",
            self.updated.to_rfc2822()
        ));
        for entry in &self.entries {
            out.push_str("    <item>\n");
            out.push_str(&format!(
                "      <title>{}</title>\n",
                xml_escape(&entry.title)
            ));
            out.push_str(&format!("      <link>{}</link>\n", xml_escape(&entry.link)));
            out.push_str(&format!(
                "      <description>{}</description>\n",
                xml_escape(&entry.content)
            ));
            out.push_str(&format!(
                "      <guid isPermaLink=\"true\">{}</guid>\n",
                xml_escape(&entry.link)
            ));
            out.push_str(&format!(
                "      <pubDate>{}</pubDate>\n",
                entry.created.to_rfc2822()
            ));
            out.push_str("    </item>\n");
        }
        out.push_str("  </channel>\n");
        out.push_str("</rss>\n");
        Ok(out.into_bytes())
    }

    /// Atom 1.0 document.
    pub fn to_atom(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
        out.push_str(&format!("  <title>{}</title>\n", xml_escape(&self.title)));
        out.push_str(&format!("  <id>{}</id>\n", xml_escape(&self.link)));
        out.push_str(&format!("  <updated>{}</updated>\n", atom_time(self.updated)));
        out.push_str(&format!(
            "  <subtitle>{}</subtitle>\n",
            xml_escape(&self.description)
        ));
        out.push_str(&format!("  <link href=\"{}\" />\n", xml_escape(&self.link)));
        if !self.author_name.is_empty() {
            out.push_str("  <author>\n");
            out.push_str(&format!(
                "    <name>{}</name>\n",
                xml_escape(&self.author_name)
            ));
            if !self.author_email.is_empty() {
                out.push_str(&format!(
                    "    <email>{}</email>\n",
                    xml_escape(&self.author_email)
                ));
            }
            out.push_str("  </author>\n");
        }
        for entry in &self.entries {
            out.push_str("  <entry>\n");
            out.push_str(&format!("    <title>{}</title>\n", xml_escape(&entry.title)));
            out.push_str(&format!("    <id>{}</id>\n", xml_escape(&entry.link)));
            out.push_str(&format!(
                "    <link href=\"{}\" rel=\"alternate\" />\n",
                xml_escape(&entry.link)
            ));
            out.push_str(&format!(
                "    <published>{}</published>\n",
                atom_time(entry.created)
            ));
            out.push_str(&format!(
                "    <updated>{}</updated>\n",
                atom_time(entry.created)
            ));
            out.push_str(&format!(
                "    <content type=\"text\">{}</content>\n",
                xml_escape(&entry.content)
            ));
            out.push_str("  </entry>\n");
        }
        out.push_str("</feed>\n");
        Ok(out.into_bytes())
    }

    fn validate(&self) -> Result<()> {
        check_text("feed title", &self.title)?;
        check_text("feed description", &self.description)?;
        check_text("feed author", &self.author_name)?;
        check_link("feed link", &self.link)?;

        for entry in &self.entries {
            if entry.title.trim().is_empty() {
                return Err(QuoteError::Serialization(format!(
                    "entry {} has an empty title",
                    entry.link
                )));
            }
            check_text("entry title", &entry.title)?;
            check_text("entry content", &entry.content)?;
            check_link("entry link", &entry.link)?;
        }
        Ok(())
    }
}

fn check_text(field: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(QuoteError::Serialization(format!(
            "{field} contains a character XML cannot carry: U+{:04X}",
            u32::from(c)
        ))),
        None => Ok(()),
    }
}

fn check_link(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|err| QuoteError::Serialization(format!("{field} {value:?}: {err}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(QuoteError::Serialization(format!(
            "{field} must be http/https: {value}"
        )));
    }
    Ok(())
}

// XML 1.0 `Char` production; surrogates are already excluded by `char`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn atom_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn run(args: FeedArgs) -> anyhow::Result<()> {
    let site = SiteConfig::with_base_url(&args.base_url)?;
    let store = QuoteStore::new(dataset::open(args.data_dir.as_deref()));
    let feed = FeedBuilder::new(store, site).build().context("build feed")?;
    if feed.skipped > 0 {
        tracing::warn!(skipped = feed.skipped, "quotes with unparseable dates left out of feed");
    }

    let bytes = match args.format {
        FeedFormat::Rss => feed.to_rss(),
        FeedFormat::Atom => feed.to_atom(),
    }
    .context("serialize feed")?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes).context("write feed")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
