//! HTTP routes
//!
//! The public page is served straight from the render cache; it never
//! touches the store or the renderer. Admin routes mutate the store and then
//! force a cache refresh. Hit tracking is fire-and-forget: a storage failure
//! is logged and the visitor still gets a success response.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use linkboard_core::{LinkDraft, RefreshError, WeightAction};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::app::SharedApp;
use crate::auth;
use crate::metadata;
use crate::render::{AdminView, OgPrefill};

const STYLESHEET: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/style.css"));

pub fn router(app: SharedApp) -> Router {
    let admin = Router::new()
        .route("/", get(admin_home))
        .route("/links/new", post(admin_new))
        .route("/links/{id}/update", post(admin_update))
        .route("/links/{id}/weight", get(admin_weight))
        .route("/links/{id}/delete", get(admin_delete))
        .layer(middleware::from_fn_with_state(
            app.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/", get(home))
        .route("/static/style.css", get(stylesheet))
        .route("/hits/{id}", get(record_hit).post(record_hit))
        .nest("/admin", admin)
        .with_state(app)
}

/// Public page: cached bytes only
async fn home(State(app): State<SharedApp>) -> Response {
    let snapshot = app.cache.read();
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        snapshot.to_vec(),
    )
        .into_response()
}

async fn stylesheet() -> Response {
    ([(header::CONTENT_TYPE, "text/css")], STYLESHEET).into_response()
}

/// Click tracking; never degrades the visitor-facing page
async fn record_hit(State(app): State<SharedApp>, Path(raw_id): Path<String>) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return (StatusCode::BAD_REQUEST, format!("400 - bad id, got {raw_id}")).into_response();
    };

    if let Err(err) = app.store.increment_hit(id) {
        warn!(%err, id, "failed to record hit");
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "{}",
    )
        .into_response()
}

// ==================== Admin ====================

#[derive(Deserialize)]
struct LinkForm {
    #[serde(default)]
    text: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    submit: String,
}

impl LinkForm {
    fn draft(&self) -> LinkDraft {
        LinkDraft::new(
            self.text.clone(),
            self.url.clone(),
            self.description.clone(),
            self.image_url.clone(),
        )
    }
}

#[derive(Deserialize)]
struct WeightParams {
    action: Option<String>,
}

/// Render the admin page with the current store contents
fn admin_page(app: &SharedApp, error: Option<String>, success: Option<String>) -> Response {
    admin_page_with_prefill(app, error, success, OgPrefill::default())
}

fn admin_page_with_prefill(
    app: &SharedApp,
    error: Option<String>,
    success: Option<String>,
    prefill: OgPrefill,
) -> Response {
    let ctx = match app.assembler.context() {
        Ok(ctx) => ctx,
        Err(err) => {
            error!(%err, "failed to assemble admin page data");
            return internal_server_error();
        }
    };

    let view = AdminView {
        page: &ctx,
        error,
        success,
        prefill,
    };

    match app.renderer.render_admin(&view) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(%err, "error while writing template");
            internal_server_error()
        }
    }
}

fn internal_server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 - Internal Server Error!",
    )
        .into_response()
}

/// A refresh failure after a durable store change: the data is saved but the
/// public page is stale until the next successful refresh.
fn stale_page_message(err: &RefreshError) -> String {
    format!("saved, but the public page could not be refreshed: {err}")
}

async fn admin_home(State(app): State<SharedApp>) -> Response {
    if let Err(err) = app.assembler.refresh() {
        return admin_page(&app, Some(err.to_string()), None);
    }
    admin_page(&app, None, None)
}

async fn admin_weight(
    State(app): State<SharedApp>,
    Path(raw_id): Path<String>,
    Query(params): Query<WeightParams>,
) -> Response {
    let Some(raw_action) = params.action.filter(|a| !a.is_empty()) else {
        return admin_page(&app, Some("action is missing".to_string()), None);
    };

    let Ok(id) = raw_id.parse::<i64>() else {
        return admin_page(&app, Some(format!("bad id, got: {raw_id}")), None);
    };

    let action: WeightAction = match raw_action.parse() {
        Ok(action) => action,
        Err(err) => return admin_page(&app, Some(err.to_string()), None),
    };

    if let Err(err) = app.store.adjust_weight(id, action) {
        return admin_page(&app, Some(format!("error while updating link: {err}")), None);
    }

    if let Err(err) = app.assembler.refresh() {
        return admin_page(&app, Some(stale_page_message(&err)), None);
    }

    admin_page(&app, None, None)
}

async fn admin_delete(State(app): State<SharedApp>, Path(raw_id): Path<String>) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return admin_page(&app, Some(format!("bad id, got: {raw_id}")), None);
    };

    if let Err(err) = app.store.delete(id) {
        return admin_page(&app, Some(format!("error while deleting link: {err}")), None);
    }

    if let Err(err) = app.assembler.refresh() {
        return admin_page(&app, Some(stale_page_message(&err)), None);
    }

    admin_page(&app, None, None)
}

async fn admin_update(
    State(app): State<SharedApp>,
    Path(raw_id): Path<String>,
    axum::Form(form): axum::Form<LinkForm>,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return admin_page(&app, Some(format!("bad id, got: {raw_id}")), None);
    };

    if let Err(err) = app.store.update(id, &form.draft()) {
        return admin_page(&app, Some(format!("error while updating link: {err}")), None);
    }

    if let Err(err) = app.assembler.refresh() {
        return admin_page(&app, Some(stale_page_message(&err)), None);
    }

    admin_page(&app, None, None)
}

async fn admin_new(
    State(app): State<SharedApp>,
    axum::Form(form): axum::Form<LinkForm>,
) -> Response {
    if form.url.trim().is_empty() {
        return admin_page(&app, Some("url is missing".to_string()), None);
    }

    // "Fetch Data" prefills the form from the page's metadata instead of
    // inserting anything.
    if form.submit == "Fetch Data" {
        let meta = metadata::fetch_metadata(&form.url).await;
        let prefill = OgPrefill {
            url: form.url.clone(),
            title: meta.title.unwrap_or_default(),
            description: meta.description.unwrap_or_default(),
            image_url: meta.image_url.unwrap_or_default(),
        };
        return admin_page_with_prefill(&app, None, None, prefill);
    }

    let mut draft = form.draft();

    // Try to fill a missing image from the page's metadata; failure here is
    // not a reason to reject the link.
    if draft.image_url.is_empty() {
        let meta = metadata::fetch_metadata(&form.url).await;
        if let Some(image_url) = meta.image_url {
            draft.image_url = image_url;
        } else {
            debug!(url = %form.url, "no image metadata found");
        }
    }

    if let Err(err) = app.store.insert(&draft) {
        return admin_page(&app, Some(format!("error while inserting link: {err}")), None);
    }

    if let Err(err) = app.assembler.refresh() {
        return admin_page(&app, Some(stale_page_message(&err)), None);
    }

    admin_page(&app, None, Some("New link inserted!".to_string()))
}
