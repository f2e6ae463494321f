#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod contributors;
pub mod dataset;
pub mod error;
pub mod feed;
pub mod formats;
pub mod logging;
pub mod pages;
pub mod server;
pub mod store;

pub use contributors::{ContributorLookup, ContributorResolver};
pub use error::{DatasetError, QuoteError};
pub use feed::{Feed, FeedBuilder, FeedEntry};
pub use formats::{DatedQuote, Quote};
pub use store::{Listing, QuoteStore};
