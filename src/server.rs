//! HTTP surface for the calendar: the HTML page, JSON endpoints, a cache
//! refresh hook and a health check.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use warp::{http::StatusCode, reject::Rejection, reply::Response, Filter, Reply};

use crate::error::CalendarError;
use crate::fetch::SheetLoader;
use crate::present::html::{render_page, Page};
use crate::process::Board;

#[derive(Clone)]
pub struct AppState {
    loader: Arc<SheetLoader>,
    marker: Arc<str>,
}

impl AppState {
    pub fn new(loader: SheetLoader, marker: &str) -> Self {
        Self {
            loader: Arc::new(loader),
            marker: Arc::from(marker),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GroupQuery {
    group: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: String,
}

/// 502 when the sheet could not be obtained, 422 when its layout is wrong.
pub fn status_for(err: &CalendarError) -> StatusCode {
    if err.is_source_failure() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

async fn board(state: &AppState) -> Result<Board, CalendarError> {
    let sheet = state.loader.load().await?;
    Board::prepare(&sheet, &state.marker)
}

fn json_error(err: &CalendarError) -> Response {
    warn!(error = %err, "render cycle failed");
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: err.user_message(),
            details: err.to_string(),
        }),
        status_for(err),
    )
    .into_response()
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "group-calendar"
    })))
}

async fn page(query: GroupQuery, state: AppState) -> Result<Response, Rejection> {
    let selected = query.group.unwrap_or_default();
    match board(&state).await {
        Ok(board) => {
            let view = (!selected.is_empty()).then(|| board.select(&selected));
            let html = render_page(&Page::Board {
                catalog: board.catalog(),
                view: view.as_ref(),
            });
            Ok(warp::reply::html(html).into_response())
        }
        Err(e) => {
            warn!(error = %e, "render cycle failed");
            let html = render_page(&Page::Error(e.user_message()));
            Ok(warp::reply::with_status(warp::reply::html(html), status_for(&e)).into_response())
        }
    }
}

async fn groups(state: AppState) -> Result<Response, Rejection> {
    match board(&state).await {
        Ok(board) => Ok(warp::reply::json(board.catalog()).into_response()),
        Err(e) => Ok(json_error(&e)),
    }
}

async fn events(query: GroupQuery, state: AppState) -> Result<Response, Rejection> {
    let selected = query.group.unwrap_or_default();
    match board(&state).await {
        Ok(board) => Ok(warp::reply::json(&board.select(&selected)).into_response()),
        Err(e) => Ok(json_error(&e)),
    }
}

async fn refresh(state: AppState) -> Result<Response, Rejection> {
    state.loader.refresh().await;
    info!("cache cleared");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Every route the service answers.
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let with_state = warp::any().map(move || state.clone());

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let index = warp::path::end()
        .and(warp::get())
        .and(warp::query::<GroupQuery>())
        .and(with_state.clone())
        .and_then(page);

    let api_groups = warp::path!("api" / "groups")
        .and(warp::get())
        .and(with_state.clone())
        .and_then(groups);

    let api_events = warp::path!("api" / "events")
        .and(warp::get())
        .and(warp::query::<GroupQuery>())
        .and(with_state.clone())
        .and_then(events);

    let api_refresh = warp::path!("api" / "refresh")
        .and(warp::post())
        .and(with_state)
        .and_then(refresh);

    health.or(index).or(api_groups).or(api_events).or(api_refresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let result = health_check().await;
        assert!(result.is_ok());
    }

    #[test]
    fn layout_errors_are_unprocessable() {
        let err = CalendarError::HeaderNotFound {
            marker: "x".into(),
        };
        assert_eq!(status_for(&err), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&CalendarError::NoWorksheet), StatusCode::BAD_GATEWAY);
    }
}
