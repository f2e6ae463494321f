use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use chrono::{Datelike as _, NaiveDate, Utc};
use sha2::{Digest as _, Sha256};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::cli::{FeedFormat, ServeArgs};
use crate::config::{self, SiteConfig};
use crate::contributors::ContributorResolver;
use crate::dataset::{self, DatasetSource};
use crate::error::QuoteError;
use crate::feed::{ATOM_CONTENT_TYPE, FeedBuilder, RSS_CONTENT_TYPE};
use crate::formats::parse_date;
use crate::pages::{self, QuotePage};
use crate::store::QuoteStore;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const FEATURE_POLICY: &str = "geolocation 'none'; midi 'none'; sync-xhr 'none'; microphone 'none'; camera 'none'; magnetometer 'none'; gyroscope 'none'; fullscreen 'none'; payment 'none'; usb 'none'";
const REPORT_TO: &str = r#"{"group":"default","max_age":10886400,"endpoints":[{"url":"https://reportd.natwelch.com/report/distraction"}]}"#;
const REPORTING_ENDPOINTS: &str = r#"default="https://reportd.natwelch.com/reporting/distraction""#;

#[derive(Debug, Clone)]
pub struct AppState {
    store: QuoteStore,
    feeds: FeedBuilder,
    contributors: ContributorResolver,
}

impl AppState {
    pub fn new(source: Arc<dyn DatasetSource>, site: SiteConfig) -> Self {
        let store = QuoteStore::new(Arc::clone(&source));
        Self {
            feeds: FeedBuilder::new(store.clone(), site),
            contributors: ContributorResolver::new(source),
            store,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "hi." }))
        .route("/", get(today_handler))
        .route("/about", get(about_handler))
        .route("/feed.rss", get(rss_handler))
        .route("/feed.atom", get(atom_handler))
        .route("/:date", get(date_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(static_header(header::X_FRAME_OPTIONS, "DENY"))
                .layer(static_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                .layer(static_header(header::X_XSS_PROTECTION, "1; mode=block"))
                .layer(static_header(header::REFERRER_POLICY, "no-referrer"))
                .layer(static_header(
                    HeaderName::from_static("feature-policy"),
                    FEATURE_POLICY,
                ))
                .layer(static_header(HeaderName::from_static("report-to"), REPORT_TO))
                .layer(static_header(
                    HeaderName::from_static("reporting-endpoints"),
                    REPORTING_ENDPOINTS,
                )),
        )
        .with_state(state)
}

fn static_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::LINK])
        .max_age(Duration::from_secs(300))
}

async fn today_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let today = Utc::now().date_naive();
    quote_response(&state, &headers, today)
}

async fn date_handler(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    headers: HeaderMap,
) -> Response {
    match parse_date(&raw) {
        Some(date) => quote_response(&state, &headers, date),
        None => not_found(&format!("{raw:?} is not a date.")),
    }
}

async fn about_handler(headers: HeaderMap) -> Response {
    let html = pages::about_page(current_year());
    respond(&headers, HTML_CONTENT_TYPE, html.into_bytes())
}

async fn rss_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    feed_response(&state, &headers, FeedFormat::Rss)
}

async fn atom_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    feed_response(&state, &headers, FeedFormat::Atom)
}

fn quote_response(state: &AppState, headers: &HeaderMap, date: NaiveDate) -> Response {
    let quote = match state.store.lookup_by_date(date) {
        Ok(quote) => quote,
        Err(err) => return error_response(err),
    };
    let contributor_url = state.contributors.resolve(&quote.contributor);

    let html = pages::quote_page(&QuotePage {
        quote: &quote,
        contributor_url: &contributor_url,
        year: current_year(),
    });
    respond(headers, HTML_CONTENT_TYPE, html.into_bytes())
}

fn feed_response(state: &AppState, headers: &HeaderMap, format: FeedFormat) -> Response {
    let feed = match state.feeds.build() {
        Ok(feed) => feed,
        Err(err) => return error_response(err),
    };
    if feed.skipped > 0 {
        tracing::warn!(
            skipped = feed.skipped,
            "quotes with unparseable dates left out of feed"
        );
    }

    let (bytes, content_type) = match format {
        FeedFormat::Rss => (feed.to_rss(), RSS_CONTENT_TYPE),
        FeedFormat::Atom => (feed.to_atom(), ATOM_CONTENT_TYPE),
    };
    match bytes {
        Ok(bytes) => respond(headers, content_type, bytes),
        Err(err) => error_response(err),
    }
}

fn error_response(err: QuoteError) -> Response {
    if let QuoteError::NotFound { date } = &err {
        return not_found(&format!("There is no quote for {date}."));
    }

    let error = format!("{:#}", anyhow::Error::from(err));
    tracing::error!(%error, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(pages::error_page(current_year())),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::not_found_page(message, current_year())),
    )
        .into_response()
}

/// 200 with a strong ETag, or 304 when the client already holds this body.
fn respond(request_headers: &HeaderMap, content_type: &'static str, body: Vec<u8>) -> Response {
    let etag = etag_for(&body);

    let mut resp = if if_none_match(request_headers, &etag) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        let mut resp = Response::new(Body::from(body));
        resp.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        resp
    };
    if let Ok(value) = HeaderValue::from_str(&etag) {
        resp.headers_mut().insert(header::ETAG, value);
    }
    resp
}

fn etag_for(body: &[u8]) -> String {
    format!("\"{}\"", hex::encode(Sha256::digest(body)))
}

fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
}

fn current_year() -> i32 {
    Utc::now().year()
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let site = SiteConfig::with_base_url(&args.base_url)?;
    let source = dataset::open(args.data_dir.as_deref());
    if let Err(err) = dataset::read_quotes(source.as_ref()) {
        let error = format!("{:#}", anyhow::Error::from(err));
        tracing::warn!(%error, "quote dataset is not readable yet");
    }

    let port = config::resolve_port(args.port);
    let addr = SocketAddr::new(args.host, port);
    tracing::info!(host = %format!("http://localhost:{port}"), base_url = %site.base_url, "starting up");

    let app = router(AppState::new(source, site));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(err) => {
                tracing::error!(%err, "install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(%err, "install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
