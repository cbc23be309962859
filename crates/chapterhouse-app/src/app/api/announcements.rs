use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Deserialize;
use tracing::error;

use crate::app::api::util::render_error;
use crate::db_handler::get_db_from_depot;
use crate::middleware::auth::get_member_from_depot;
use chapterhouse_core::constants::ANNOUNCEMENTS_ROUTE_COMPONENT;
use chapterhouse_db::db::query::announcement;
use chapterhouse_db::model::announcement::{AnnouncementUpdate, NewAnnouncement};

/// ## Summary
/// Create/update announcement request payload
#[derive(Debug, Deserialize)]
pub struct AnnouncementRequest {
    pub title: String,
    pub body: String,
}

/// ## Summary
/// GET /api/announcements - List announcements, newest first
///
/// ## Errors
/// Returns HTTP 500 if database operations fail
#[handler]
async fn list_handler(depot: &mut Depot, res: &mut Response) {
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

    match announcement::list(&mut conn).await {
        Ok(rows) => res.render(Json(rows)),
        Err(e) => {
            error!(error = ?e, "Failed to list announcements");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }
}

/// ## Summary
/// GET /api/announcements/{id} - Fetch one announcement
///
/// ## Errors
/// Returns HTTP 404 if the announcement does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn get_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(id) = req.param::<uuid::Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid announcement id");
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

    match announcement::find_by_id(&mut conn, id).await {
        Ok(Some(row)) => res.render(Json(row)),
        Ok(None) => render_error(res, StatusCode::NOT_FOUND, "Announcement not found"),
        Err(e) => {
            error!(error = ?e, "Failed to query announcement");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }
}

/// ## Summary
/// POST /api/announcements - Publish an announcement (board only)
///
/// ## Side Effects
/// - Creates an announcement row authored by the current member
///
/// ## Errors
/// Returns HTTP 403 if the member is not on the board
/// Returns HTTP 400 if title or body is empty
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
        tracing::warn!(member_id = %current.id, "Non-board member attempted to publish an announcement");
        render_error(res, StatusCode::FORBIDDEN, "Board role required");
        return;
    }

    let body: AnnouncementRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse announcement request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let title = body.title.trim();
    let text = body.body.trim();
    if title.is_empty() || text.is_empty() {
        render_error(res, StatusCode::BAD_REQUEST, "Title and body are required");
        return;
    }

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

    let new_announcement = NewAnnouncement {
        id: uuid::Uuid::now_v7(),
        title,
        body: text,
        author_id: current.id,
    };

    match announcement::insert(&mut conn, &new_announcement).await {
        Ok(row) => {
            tracing::info!(announcement_id = %row.id, author_id = %current.id, "Announcement published");
            res.status_code(StatusCode::CREATED);
            res.render(Json(row));
        }
        Err(e) => {
            error!(error = ?e, "Failed to insert announcement");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to publish announcement",
            );
        }
    }
}

/// ## Summary
/// PUT /api/announcements/{id} - Edit an announcement (board only)
///
/// ## Errors
/// Returns HTTP 403 if the member is not on the board
/// Returns HTTP 404 if the announcement does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn update_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
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
        render_error(res, StatusCode::BAD_REQUEST, "Invalid announcement id");
        return;
    };

    let body: AnnouncementRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse announcement request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let title = body.title.trim();
    let text = body.body.trim();
    if title.is_empty() || text.is_empty() {
        render_error(res, StatusCode::BAD_REQUEST, "Title and body are required");
        return;
    }

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

    let changes = AnnouncementUpdate {
        title,
        body: text,
        updated_at: chrono::Utc::now(),
    };

    match announcement::update(&mut conn, id, &changes).await {
        Ok(Some(row)) => {
            tracing::info!(announcement_id = %row.id, editor_id = %current.id, "Announcement updated");
            res.render(Json(row));
        }
        Ok(None) => render_error(res, StatusCode::NOT_FOUND, "Announcement not found"),
        Err(e) => {
            error!(error = ?e, "Failed to update announcement");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update announcement",
            );
        }
    }
}

/// ## Summary
/// DELETE /api/announcements/{id} - Remove an announcement (board only)
///
/// ## Errors
/// Returns HTTP 403 if the member is not on the board
/// Returns HTTP 404 if the announcement does not exist
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
        render_error(res, StatusCode::BAD_REQUEST, "Invalid announcement id");
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

    match announcement::delete(&mut conn, id).await {
        Ok(0) => render_error(res, StatusCode::NOT_FOUND, "Announcement not found"),
        Ok(_) => {
            tracing::info!(announcement_id = %id, editor_id = %current.id, "Announcement deleted");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => {
            error!(error = ?e, "Failed to delete announcement");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete announcement",
            );
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(ANNOUNCEMENTS_ROUTE_COMPONENT)
        .get(list_handler)
        .post(create_handler)
        .push(
            Router::with_path("<id>")
                .get(get_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
}
