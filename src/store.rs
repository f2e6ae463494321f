use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::QuoteArgs;
use crate::dataset::{self, DatasetSource};
use crate::error::{QuoteError, Result};
use crate::formats::{DatedQuote, Quote, format_date};

/// Quotes visible at a point in time, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub quotes: Vec<DatedQuote>,
    /// Records skipped because their `date` did not parse.
    pub dropped: usize,
}

/// Date-keyed access to the quote dataset. Holds no quotes itself: every
/// call re-reads the dataset from its source.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    source: Arc<dyn DatasetSource>,
}

impl QuoteStore {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self { source }
    }

    /// Returns the first record whose `date` is exactly `date` as `YYYY-MM-DD`.
    ///
    /// Future dates resolve; only [`QuoteStore::list_all`] hides them.
    pub fn lookup_by_date(&self, date: NaiveDate) -> Result<Quote> {
        let key = format_date(date);
        let quotes = dataset::read_quotes(self.source.as_ref())?;

        quotes
            .into_iter()
            .find(|quote| quote.date == key)
            .ok_or(QuoteError::NotFound { date: key })
    }

    /// Quotes dated strictly before today (UTC).
    pub fn list_all(&self) -> Result<Listing> {
        self.list_all_at(Utc::now())
    }

    /// Quotes dated strictly before the calendar day of `now`. Records with an
    /// unparseable date are dropped and counted.
    pub fn list_all_at(&self, now: DateTime<Utc>) -> Result<Listing> {
        let today = now.date_naive();
        let quotes = dataset::read_quotes(self.source.as_ref())?;
        let total = quotes.len();

        let mut listing = Listing::default();
        for quote in quotes {
            let Some(date) = quote.parsed_date() else {
                listing.dropped += 1;
                continue;
            };
            if date < today {
                listing.quotes.push(DatedQuote { date, quote });
            }
        }

        tracing::debug!(
            total,
            visible = listing.quotes.len(),
            dropped = listing.dropped,
            "listed quotes"
        );
        Ok(listing)
    }
}

pub fn run(args: QuoteArgs) -> anyhow::Result<()> {
    let store = QuoteStore::new(dataset::open(args.data_dir.as_deref()));
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let quote = store
        .lookup_by_date(date)
        .with_context(|| format!("lookup quote for {}", format_date(date)))?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &quote).context("serialize quote")?;
    stdout.write_all(b"\n").context("write newline")?;
    Ok(())
}
