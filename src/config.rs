use anyhow::Context as _;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://distraction.today";
pub const DEFAULT_PORT: u16 = 8080;

/// Site identity used for permalinks and feed metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Absolute http(s) URL without a trailing slash.
    pub base_url: String,
    pub title: String,
    pub description: String,
    pub author_name: String,
    pub author_email: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            title: "distraction.today".to_string(),
            description: "A daily quote to distract you.".to_string(),
            author_name: "Nat Welch".to_string(),
            author_email: "nat@natwelch.com".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn with_base_url(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// `{base_url}/{date}`.
    pub fn permalink(&self, date: &str) -> String {
        format!("{}/{}", self.base_url, date)
    }
}

pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let url = Url::parse(raw).with_context(|| format!("parse base url: {raw}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("base url scheme must be http/https: {raw}");
    }
    if url.host_str().is_none() {
        anyhow::bail!("base url must include host: {raw}");
    }
    if url.query().is_some() || url.fragment().is_some() {
        anyhow::bail!("base url must not carry a query or fragment: {raw}");
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Port to listen on: the explicit flag, then `$PORT`, then the default.
pub fn resolve_port(flag: Option<u16>) -> u16 {
    if let Some(port) = flag {
        return port;
    }

    match std::env::var("PORT") {
        Ok(raw) if !raw.trim().is_empty() => match raw.trim().parse::<u16>() {
            Ok(port) => port,
            Err(err) => {
                tracing::warn!(value = %raw, %err, "invalid PORT, using default");
                DEFAULT_PORT
            }
        },
        _ => DEFAULT_PORT,
    }
}
