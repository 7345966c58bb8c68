use axum::extract::{Path, Query, State as AxumState};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use guildmint_types::api::CommandResponse;
use guildmint_types::{Envelope, GuildId, UserId};
use serde::Deserialize;
use std::sync::Arc;

use crate::service::{now_ms, Service};

/// HTTP surface of the settlement service.
///
/// `/command` is the only mutating route; everything else is a read-only view
/// for the gateway to render.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/command", post(apply_command))
        .route("/account/:user", get(account))
        .route("/settings/:guild", get(settings))
        .route("/shop", get(shop))
        .route("/leaderboard", get(leaderboard))
        .route("/audit", get(audit))
        .route("/metrics", get(metrics))
        .route("/healthz", get(healthz))
        .with_state(service)
}

#[derive(Deserialize)]
struct Pagination {
    limit: Option<usize>,
}

fn internal_error(err: anyhow::Error, what: &'static str) -> axum::response::Response {
    tracing::error!(?err, what, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn apply_command(
    AxumState(service): AxumState<Arc<Service>>,
    Json(envelope): Json<Envelope>,
) -> impl IntoResponse {
    match service.apply_command(&envelope, now_ms()).await {
        Ok(events) => Json(CommandResponse { events }).into_response(),
        Err(err) => internal_error(err, "apply command"),
    }
}

async fn account(
    AxumState(service): AxumState<Arc<Service>>,
    Path(user): Path<u64>,
) -> impl IntoResponse {
    match service.account_view(UserId(user)).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => internal_error(err, "account view"),
    }
}

async fn settings(
    AxumState(service): AxumState<Arc<Service>>,
    Path(guild): Path<u64>,
) -> impl IntoResponse {
    match service.settings_view(GuildId(guild)).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => internal_error(err, "settings view"),
    }
}

async fn shop(AxumState(service): AxumState<Arc<Service>>) -> impl IntoResponse {
    match service.shop_view().await {
        Ok(items) => Json(items).into_response(),
        Err(err) => internal_error(err, "shop view"),
    }
}

async fn leaderboard(
    AxumState(service): AxumState<Arc<Service>>,
    Query(pagination): Query<Pagination>,
) -> impl IntoResponse {
    let limit = pagination.limit.unwrap_or(10).min(200);
    match service.leaderboard_view(limit).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => internal_error(err, "leaderboard view"),
    }
}

async fn audit(
    AxumState(service): AxumState<Arc<Service>>,
    Query(pagination): Query<Pagination>,
) -> impl IntoResponse {
    let limit = pagination.limit.unwrap_or(50).min(200);
    match service.audit_view(limit).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => internal_error(err, "audit view"),
    }
}

async fn metrics(AxumState(service): AxumState<Arc<Service>>) -> impl IntoResponse {
    Json(service.metrics_snapshot())
}

async fn healthz() -> &'static str {
    "ok"
}
