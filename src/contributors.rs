use std::sync::Arc;

use crate::cli::ContributorArgs;
use crate::dataset::{self, DatasetSource};

/// Outcome of a contributor lookup, keeping apart the causes that
/// [`ContributorResolver::resolve`] folds into an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributorLookup {
    Found(String),
    Unknown,
    DirectoryUnavailable(String),
}

#[derive(Debug, Clone)]
pub struct ContributorResolver {
    source: Arc<dyn DatasetSource>,
}

impl ContributorResolver {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self { source }
    }

    pub fn lookup(&self, id: &str) -> ContributorLookup {
        let directory = match dataset::read_contributors(self.source.as_ref()) {
            Ok(directory) => directory,
            Err(err) => return ContributorLookup::DirectoryUnavailable(err.to_string()),
        };

        match directory.get(id) {
            Some(url) => ContributorLookup::Found(url.clone()),
            None => ContributorLookup::Unknown,
        }
    }

    /// Display URL for `id`, or `""` when the id is unknown or the directory
    /// cannot be loaded.
    pub fn resolve(&self, id: &str) -> String {
        match self.lookup(id) {
            ContributorLookup::Found(url) => url,
            ContributorLookup::Unknown => String::new(),
            ContributorLookup::DirectoryUnavailable(reason) => {
                tracing::debug!(contributor = id, %reason, "contributor directory unavailable");
                String::new()
            }
        }
    }
}

pub fn run(args: ContributorArgs) -> anyhow::Result<()> {
    let resolver = ContributorResolver::new(dataset::open(args.data_dir.as_deref()));
    println!("{}", resolver.resolve(&args.id));
    Ok(())
}
