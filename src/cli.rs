use std::net::IpAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_BASE_URL;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the site over HTTP.
    Serve(ServeArgs),
    /// Print the quote for a date as JSON.
    Quote(QuoteArgs),
    /// Print the RSS or Atom feed of past quotes.
    Feed(FeedArgs),
    /// Print a contributor's display URL (empty when unknown).
    Contributor(ContributorArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind (default: $PORT, then 8080).
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding `quotes.json` and `contributors.json` (default: embedded data).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Public site URL used for permalinks and feed links.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Date as YYYY-MM-DD (default: today, UTC).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Directory holding `quotes.json` (default: embedded data).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedFormat {
    Rss,
    Atom,
}

#[derive(Debug, Args)]
pub struct FeedArgs {
    #[arg(long, value_enum, default_value_t = FeedFormat::Rss)]
    pub format: FeedFormat,

    /// Directory holding `quotes.json` (default: embedded data).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Public site URL used for permalinks and feed links.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Args)]
pub struct ContributorArgs {
    /// Contributor identifier, e.g. `@icco`.
    pub id: String,

    /// Directory holding `contributors.json` (default: embedded data).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}
