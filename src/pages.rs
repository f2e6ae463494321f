use url::Url;

use crate::formats::Quote;

pub struct QuotePage<'a> {
    pub quote: &'a Quote,
    pub contributor_url: &'a str,
    pub year: i32,
}

pub fn quote_page(page: &QuotePage<'_>) -> String {
    let quote = page.quote;
    let mut body = String::new();

    body.push_str("  <main>\n");
    body.push_str("    <figure>\n");
    body.push_str(&format!(
        "      <blockquote>{}</blockquote>\n",
        html_escape(&quote.text)
    ));
    body.push_str("      <figcaption>\n");
    body.push_str(&format!(
        "        <span class=\"author\">{}</span>\n",
        html_escape(&quote.author)
    ));
    if !quote.source.is_empty() {
        let source = html_escape(&quote.source);
        if is_web_url(&quote.source_url) {
            body.push_str(&format!(
                "        <cite><a href=\"{}\">{source}</a></cite>\n",
                html_escape(&quote.source_url)
            ));
        } else {
            body.push_str(&format!("        <cite>{source}</cite>\n"));
        }
    }
    body.push_str("      </figcaption>\n");
    body.push_str("    </figure>\n");

    body.push_str(&format!(
        "    <p class=\"date\"><a href=\"/{0}\">{0}</a></p>\n",
        html_escape(&quote.date)
    ));
    if !quote.contributor.is_empty() {
        let contributor = html_escape(&quote.contributor);
        if is_web_url(page.contributor_url) {
            body.push_str(&format!(
                "    <p class=\"contributor\">Contributed by <a href=\"{}\">{contributor}</a></p>\n",
                html_escape(page.contributor_url)
            ));
        } else {
            body.push_str(&format!(
                "    <p class=\"contributor\">Contributed by {contributor}</p>\n"
            ));
        }
    }
    body.push_str("  </main>\n");

    layout("distraction.today", &body, page.year)
}

pub fn about_page(year: i32) -> String {
    let body = r#"  <main>
    <h1>About</h1>
    <p>distraction.today shows one quote a day. Come back tomorrow for another.</p>
    <p>Every past quote has its own page at <code>/YYYY-MM-DD</code>, and the full
    archive is available as <a href="/feed.rss">RSS</a> or <a href="/feed.atom">Atom</a>.</p>
  </main>
"#;
    layout("About | distraction.today", body, year)
}

pub fn not_found_page(what: &str, year: i32) -> String {
    let body = format!(
        "  <main>\n    <h1>Not found</h1>\n    <p>{}</p>\n  </main>\n",
        html_escape(what)
    );
    layout("Not found | distraction.today", &body, year)
}

pub fn error_page(year: i32) -> String {
    let body = "  <main>\n    <h1>Something went wrong</h1>\n    <p>Try again later.</p>\n  </main>\n";
    layout("Error | distraction.today", body, year)
}

fn layout(title: &str, body: &str, year: i32) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n");
    out.push_str("<html lang=\"en\">\n");
    out.push_str("<head>\n");
    out.push_str("  <meta charset=\"utf-8\">\n");
    out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("  <title>{}</title>\n", html_escape(title)));
    out.push_str(
        "  <link rel=\"alternate\" type=\"application/rss+xml\" title=\"RSS\" href=\"/feed.rss\">\n",
    );
    out.push_str(
        "  <link rel=\"alternate\" type=\"application/atom+xml\" title=\"Atom\" href=\"/feed.atom\">\n",
    );
    out.push_str("</head>\n");
    out.push_str("<body>\n");
    out.push_str(body);
    out.push_str("  <footer>\n");
    out.push_str(&format!(
        "    <p>&copy; {year} <a href=\"/\">distraction.today</a> &middot; <a href=\"/about\">about</a></p>\n"
    ));
    out.push_str("  </footer>\n");
    out.push_str("</body>\n");
    out.push_str("</html>\n");
    out
}

/// Only absolute http(s) URLs from the datasets become links.
fn is_web_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
