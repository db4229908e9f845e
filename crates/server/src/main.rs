use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use server_api::{
    edit_user, list_users, remove_user, save_user, show_user_details, ApiContext, Outcome,
};
use shared::{error::ErrorCode, protocol::UserForm};
use storage::UserStore;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod views;

use app_state::AppState;
use config::load_settings;
use views::HtmlRenderer;

const MAX_FORM_BYTES: usize = 16 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let storage = UserStore::seeded();
    info!(users = storage.len().await, "user store seeded");
    let state = AppState {
        api: ApiContext::new(storage),
        renderer: Arc::new(HtmlRenderer::default()),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(http_list_users))
        .route("/users", get(http_list_users))
        .route("/users/edit", get(http_new_user_form).post(http_create_user))
        .route("/users/edit/", get(http_new_user_form).post(http_create_user))
        .route(
            "/users/edit/:id",
            get(http_edit_user_form).post(http_update_user),
        )
        .route("/users/details/:id", get(http_user_details))
        .route("/users/remove/:id", post(http_remove_user))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.api.storage.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            error!(error = %err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

async fn http_list_users(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, list_users(&state.api).await)
}

async fn http_new_user_form(State(state): State<Arc<AppState>>) -> Response {
    respond(&state, edit_user(&state.api, None).await)
}

async fn http_edit_user_form(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Response {
    respond(&state, edit_user(&state.api, Some(&user_id)).await)
}

async fn http_user_details(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Response {
    respond(&state, show_user_details(&state.api, &user_id).await)
}

async fn http_create_user(
    State(state): State<Arc<AppState>>,
    Form(form): Form<UserForm>,
) -> Response {
    respond(&state, save_user(&state.api, None, form).await)
}

async fn http_update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Form(form): Form<UserForm>,
) -> Response {
    respond(&state, save_user(&state.api, Some(&user_id), form).await)
}

async fn http_remove_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Response {
    respond(&state, remove_user(&state.api, &user_id).await)
}

fn status_for(outcome: &Outcome) -> StatusCode {
    match outcome.error_code() {
        Some(ErrorCode::Validation) => StatusCode::BAD_REQUEST,
        Some(ErrorCode::NotFound) => StatusCode::NOT_FOUND,
        Some(ErrorCode::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        None => match outcome {
            Outcome::Render { .. } => StatusCode::OK,
            Outcome::Redirect { .. } => StatusCode::FOUND,
        },
    }
}

fn respond(state: &AppState, outcome: Outcome) -> Response {
    let status = status_for(&outcome);
    match outcome {
        Outcome::Render { view, .. } => match state.renderer.render(&view) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                error!(view = view.name(), error = %err, "failed to render view");
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
            }
        },
        Outcome::Redirect { location, .. } => {
            (status, [(header::LOCATION, location)]).into_response()
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
