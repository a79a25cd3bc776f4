//! HTTP server: localized pages, the language switch endpoint and SEO files.
//!
//! Every request gets its own [`PreferenceStore`] over the visitor's cookies,
//! so the locale controller and the referral throttle behave exactly as they
//! would in a browser session. Writes come back as `Set-Cookie` headers.

use crate::analytics::{self, ReferralPermit, ReferralTracker};
use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::i18n::{
    is_external_link, parse_accept_language, Catalog, Language, LocaleController, RouteDecision,
};
use crate::pages::{query_param, sitemap_paths, LegalContent, Page};
use crate::render::render_document;
use crate::seo::sitemap::{robots_txt, sitemap_xml};
use crate::seo::{apply_seo_metadata, HeadDocument};
use crate::storage::{CookieBackend, PreferenceStore};
use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub api: ApiClient,
    pub tracker: ReferralTracker,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> Result<Self> {
        let api = ApiClient::new(&config.api_base_url, config.api_timeout)?;
        let tracker = ReferralTracker::new(config.analytics_window);
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            api,
            tracker,
        })
    }
}

/// Handler error rendered as a plain 500.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/healthz", get(healthz))
        .route("/_i18n/metrics", get(lookup_metrics))
        .route("/_locale/:code", get(select_locale))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .nest_service(
            "/static",
            ServeDir::new(&static_dir)
                .precompressed_br()
                .precompressed_gzip(),
        )
        .nest_service("/favicon", ServeDir::new(static_dir.join("favicon")))
        .fallback(page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured port and serve until the process exits.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = format!("0.0.0.0:{}", state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state))
        .await
        .context("Server error")?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn lookup_metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.metrics().report())
}

async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let tr = state.catalog.translator(Language::default_language());
    let xml = sitemap_xml(&state.config.site, &sitemap_paths(&tr));
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml)
}

async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.config.site),
    )
}

fn cookie_store(headers: &HeaderMap) -> (Arc<CookieBackend>, PreferenceStore) {
    let cookie_header = headers.get(header::COOKIE).and_then(|v| v.to_str().ok());
    let cookies = Arc::new(CookieBackend::from_header(cookie_header));
    let store = PreferenceStore::new(cookies.clone());
    (cookies, store)
}

fn browser_tags(headers: &HeaderMap) -> Vec<String> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(parse_accept_language)
        .unwrap_or_default()
}

/// Append a `Set-Cookie` header for every storage write made while handling.
fn with_cookies(mut response: Response, cookies: &CookieBackend) -> Response {
    for cookie in cookies.set_cookie_headers() {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Dropping invalid cookie header: {}", e),
        }
    }
    response
}

fn redirect(status: StatusCode, location: &str) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(location)
        .with_context(|| format!("Invalid redirect target: {}", location))?;
    Ok((status, [(header::LOCATION, value)]).into_response())
}

/// Only same-site paths are valid return targets.
fn safe_return_path(path: Option<&str>) -> &str {
    match path {
        Some(p) if p.starts_with('/') && !p.starts_with("//") && !is_external_link(p) => p,
        _ => "/",
    }
}

/// `GET /_locale/:code?path=/en/pricing`: explicit language choice.
///
/// Stores the choice and sends the visitor to the same page in the new
/// language.
async fn select_locale(
    Path(code): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(language) = Language::parse(&code) else {
        debug!("Unknown locale requested: {}", code);
        return Ok((StatusCode::NOT_FOUND, "Unknown locale").into_response());
    };

    let requested = uri.query().and_then(|q| query_param(q, "path"));
    let current = safe_return_path(requested.as_deref());
    let (cookies, store) = cookie_store(&headers);
    let mut controller = LocaleController::for_location(current, store, browser_tags(&headers));

    let target = match controller.select_language(language, current) {
        Some(navigation) => navigation.to,
        None => current.to_string(),
    };
    info!("Language selected: {} ({})", language.name(), language.code());

    let response = redirect(StatusCode::SEE_OTHER, &target)?;
    Ok(with_cookies(response, &cookies))
}

/// Every other path: guard, then render the page in the active language.
async fn page(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let location = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let (cookies, store) = cookie_store(&headers);
    let mut controller =
        LocaleController::for_location(&location, store.clone(), browser_tags(&headers));

    let language = match controller.on_navigate(&location) {
        RouteDecision::Redirect(navigation) => {
            debug!("Redirecting {} to {}", location, navigation.to);
            let response = redirect(StatusCode::TEMPORARY_REDIRECT, &navigation.to)?;
            return Ok(with_cookies(response, &cookies));
        }
        RouteDecision::Render(language) => language,
    };

    let referral = uri.query().and_then(|q| query_param(q, "ref"));
    if let Some(permit) = state.tracker.begin(&store, referral.as_deref()) {
        spawn_referral_log(state.api.clone(), permit, language);
    }

    let site = &state.config.site;
    let tr = state.catalog.translator(language);
    let page = Page::resolve(&location).settle(&tr);

    let legal = match page.legal_type() {
        Some(kind) => Some(fetch_legal(&state.api, kind, language).await),
        None => None,
    };

    let mut head = HeadDocument::new();
    apply_seo_metadata(&mut head, &page.seo(&tr, site), &location, site);
    let main = page.body(&tr, site, legal.as_ref());
    let html = render_document(&head, &tr, site, &location, &main);

    let response = (page.status(&tr), Html(html)).into_response();
    Ok(with_cookies(response, &cookies))
}

/// Send the referral log after the response. The throttle cookie has already
/// gone out with the response, so a failed send waits out the window.
fn spawn_referral_log(
    api: ApiClient,
    permit: ReferralPermit,
    language: Language,
) -> JoinHandle<Result<(), ApiError>> {
    tokio::spawn(async move {
        let result = analytics::send(&api, &permit, language).await;
        if let Err(e) = &result {
            debug!(
                "Referral {} not recorded, throttle kept until the window expires: {}",
                permit.source(),
                e
            );
        }
        result
    })
}

async fn fetch_legal(
    api: &ApiClient,
    kind: crate::api::LegalAgreementType,
    language: Language,
) -> LegalContent {
    match api.get_legal_policy(kind, language).await {
        Ok(policy) => match policy.content.filter(|c| !c.trim().is_empty()) {
            Some(content) => LegalContent::Loaded {
                content,
                created_at: policy.created_at,
            },
            None => {
                warn!("Empty {} for {}", kind.as_str(), language.code());
                LegalContent::Unavailable
            }
        },
        Err(e) => {
            warn!("Failed to load {} for {}: {}", kind.as_str(), language.code(), e);
            LegalContent::Unavailable
        }
    }
}
