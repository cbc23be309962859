mod attendance;
mod types;

use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use tracing::error;

use crate::app::api::util::render_error;
use crate::db_handler::get_db_from_depot;
use crate::middleware::auth::get_member_from_depot;
use chapterhouse_core::constants::EVENTS_ROUTE_COMPONENT;
use chapterhouse_db::db::query::{event, working_group};
use chapterhouse_service::event::{create_event, delete_series};
use types::CreateEventRequest;

/// ## Summary
/// POST /api/events - Create an event or a whole recurring series (board
/// only)
///
/// Validates the draft, expands the recurrence, and stores every occurrence
/// in one transaction. Responds with the stored rows in chronological order.
///
/// ## Errors
/// Returns HTTP 403 if the member is not on the board
/// Returns HTTP 400 if validation fails or the working group does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn create_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let current = match get_member_from_depot(depot) {
        Ok(m) => m.clone(),
        Err(e) => {
            error!(error = ?e, "Failed to get member from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    if !current.is_board() {
        tracing::warn!(member_id = %current.id, "Non-board member attempted to create an event");
        render_error(res, StatusCode::FORBIDDEN, "Board role required");
        return;
    }

    let body: CreateEventRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse event request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let validated = match body.validate() {
        Ok(v) => v,
        Err(message) => {
            render_error(res, StatusCode::BAD_REQUEST, message);
            return;
        }
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    // The draft must point at an existing working group
    match working_group::find_by_id(&mut conn, validated.draft.working_group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            render_error(res, StatusCode::BAD_REQUEST, "Working group does not exist");
            return;
        }
        Err(e) => {
            error!(error = ?e, "Failed to query working group");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    }

    match create_event(
        &mut conn,
        &validated.draft,
        validated.rule,
        validated.monthly_pattern,
        validated.series_end,
    )
    .await
    {
        Ok(rows) => {
            tracing::info!(
                occurrence_count = rows.len(),
                created_by = %current.id,
                "Event series created"
            );
            res.status_code(StatusCode::CREATED);
            res.render(Json(rows));
        }
        Err(e) => {
            error!(error = ?e, "Failed to create event series");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to create event");
        }
    }
}

/// ## Summary
/// GET /api/events - List events in chronological order, optionally filtered
/// by the `working_group_id` query parameter
///
/// ## Errors
/// Returns HTTP 500 if database operations fail
#[handler]
async fn list_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let working_group_id = req.query::<uuid::Uuid>("working_group_id");

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    match event::list(&mut conn, working_group_id).await {
        Ok(rows) => res.render(Json(rows)),
        Err(e) => {
            error!(error = ?e, "Failed to list events");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }
}

/// ## Summary
/// GET /api/events/{id} - Fetch one event occurrence
///
/// ## Errors
/// Returns HTTP 404 if the event does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn get_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(id) = req.param::<uuid::Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid event id");
        return;
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    match event::find_by_id(&mut conn, id).await {
        Ok(Some(row)) => res.render(Json(row)),
        Ok(None) => render_error(res, StatusCode::NOT_FOUND, "Event not found"),
        Err(e) => {
            error!(error = ?e, "Failed to query event");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }
}

/// ## Summary
/// DELETE /api/events/{id} - Remove one event occurrence (board only)
///
/// ## Errors
/// Returns HTTP 403 if the member is not on the board
/// Returns HTTP 404 if the event does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn delete_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let current = match get_member_from_depot(depot) {
        Ok(m) => m.clone(),
        Err(e) => {
            error!(error = ?e, "Failed to get member from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    if !current.is_board() {
        render_error(res, StatusCode::FORBIDDEN, "Board role required");
        return;
    }

    let Some(id) = req.param::<uuid::Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid event id");
        return;
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    match event::delete(&mut conn, id).await {
        Ok(0) => render_error(res, StatusCode::NOT_FOUND, "Event not found"),
        Ok(_) => {
            tracing::info!(event_id = %id, deleted_by = %current.id, "Event deleted");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => {
            error!(error = ?e, "Failed to delete event");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete event");
        }
    }
}

/// ## Summary
/// DELETE /api/events/series/{series_uuid} - Remove every occurrence of a
/// series (board only)
///
/// ## Errors
/// Returns HTTP 403 if the member is not on the board
/// Returns HTTP 404 if the series has no occurrences
/// Returns HTTP 500 if database operations fail
#[handler]
async fn delete_series_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let current = match get_member_from_depot(depot) {
        Ok(m) => m.clone(),
        Err(e) => {
            error!(error = ?e, "Failed to get member from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    if !current.is_board() {
        render_error(res, StatusCode::FORBIDDEN, "Board role required");
        return;
    }

    let Some(series_uuid) = req.param::<uuid::Uuid>("series_uuid") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid series id");
        return;
    };

    let provider = match get_db_from_depot(depot) {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "Failed to get database provider");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let mut conn = match provider.get_connection().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = ?e, "Failed to get database connection");
            render_error(res, StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
            return;
        }
    };

    match delete_series(&mut conn, series_uuid).await {
        Ok(0) => render_error(res, StatusCode::NOT_FOUND, "Series not found"),
        Ok(removed) => {
            tracing::info!(%series_uuid, removed, deleted_by = %current.id, "Event series deleted");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => {
            error!(error = ?e, "Failed to delete event series");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete series");
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .get(list_handler)
        .post(create_handler)
        .push(
            Router::with_path("series/<series_uuid>")
                .delete(delete_series_handler)
                .push(attendance::series_routes()),
        )
        .push(
            Router::with_path("<id>")
                .get(get_handler)
                .delete(delete_handler)
                .push(attendance::occurrence_routes()),
        )
}
