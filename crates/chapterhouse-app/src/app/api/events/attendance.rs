use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::app::api::util::render_error;
use crate::db_handler::get_db_from_depot;
use crate::middleware::auth::get_member_from_depot;
use chapterhouse_db::db::enums::AttendanceStatus;
use chapterhouse_db::db::query::{attendance, event};
use chapterhouse_db::model::attendance::NewEventAttendance;
use chapterhouse_service::event::set_series_attendance;

/// ## Summary
/// Attendance request payload
#[derive(Debug, Deserialize)]
pub struct AttendanceRequest {
    pub status: AttendanceStatus,
}

/// ## Summary
/// PUT /api/events/{id}/attendance - Record the current member's answer for
/// one occurrence
///
/// ## Errors
/// Returns HTTP 404 if the event does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn put_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let current = match get_member_from_depot(depot) {
        Ok(m) => m.clone(),
        Err(e) => {
            error!(error = ?e, "Failed to get member from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let Some(event_id) = req.param::<uuid::Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid event id");
        return;
    };

    let body: AttendanceRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse attendance request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
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

    match event::find_by_id(&mut conn, event_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            render_error(res, StatusCode::NOT_FOUND, "Event not found");
            return;
        }
        Err(e) => {
            error!(error = ?e, "Failed to query event");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    }

    let row = NewEventAttendance {
        event_id,
        member_id: current.id,
        status: body.status,
        recorded_at: chrono::Utc::now(),
    };

    match attendance::upsert(&mut conn, &row).await {
        Ok(()) => {
            tracing::info!(%event_id, member_id = %current.id, status = %body.status, "Attendance recorded");
            res.render(Json(json!({
                "event_id": event_id,
                "member_id": current.id,
                "status": body.status,
            })));
        }
        Err(e) => {
            error!(error = ?e, "Failed to record attendance");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to record attendance");
        }
    }
}

/// ## Summary
/// GET /api/events/{id}/attendance - List attendance answers for one
/// occurrence
///
/// ## Errors
/// Returns HTTP 404 if the event does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn list_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(event_id) = req.param::<uuid::Uuid>("id") else {
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

    match event::find_by_id(&mut conn, event_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            render_error(res, StatusCode::NOT_FOUND, "Event not found");
            return;
        }
        Err(e) => {
            error!(error = ?e, "Failed to query event");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    }

    match attendance::list_for_event(&mut conn, event_id).await {
        Ok(rows) => res.render(Json(rows)),
        Err(e) => {
            error!(error = ?e, "Failed to list attendance");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }
}

/// ## Summary
/// PUT /api/events/series/{series_uuid}/attendance - Record the current
/// member's answer for every occurrence of a series
///
/// ## Errors
/// Returns HTTP 404 if the series has no occurrences
/// Returns HTTP 500 if database operations fail
#[handler]
async fn put_series_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let current = match get_member_from_depot(depot) {
        Ok(m) => m.clone(),
        Err(e) => {
            error!(error = ?e, "Failed to get member from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let Some(series_uuid) = req.param::<uuid::Uuid>("series_uuid") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid series id");
        return;
    };

    let body: AttendanceRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse attendance request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
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

    match set_series_attendance(&mut conn, series_uuid, current.id, body.status).await {
        Ok(0) => render_error(res, StatusCode::NOT_FOUND, "Series not found"),
        Ok(touched) => {
            tracing::info!(%series_uuid, member_id = %current.id, touched, "Series attendance recorded");
            res.render(Json(json!({
                "series_uuid": series_uuid,
                "member_id": current.id,
                "status": body.status,
                "occurrences": touched,
            })));
        }
        Err(e) => {
            error!(error = ?e, "Failed to record series attendance");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to record attendance");
        }
    }
}

/// Routes nested under /api/events/{id}.
#[must_use]
pub fn occurrence_routes() -> Router {
    Router::with_path("attendance").put(put_handler).get(list_handler)
}

/// Routes nested under /api/events/series/{series_uuid}.
#[must_use]
pub fn series_routes() -> Router {
    Router::with_path("attendance").put(put_series_handler)
}
