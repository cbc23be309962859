use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::app::api::util::render_error;
use crate::db_handler::get_db_from_depot;
use crate::middleware::auth::get_member_from_depot;
use chapterhouse_core::constants::DEVICES_ROUTE_COMPONENT;
use chapterhouse_db::db::enums::Platform;
use chapterhouse_db::db::query::push;
use chapterhouse_db::model::push::NewPushRegistration;

/// ## Summary
/// Register push target request payload
#[derive(Debug, Deserialize)]
pub struct RegisterDeviceRequest {
    pub platform: Platform,
    pub token: String,
    /// Web-push subscription keys; only meaningful for the web platform.
    pub web_push_keys: Option<serde_json::Value>,
}

/// ## Summary
/// POST /api/devices - Register a push target for the current member
///
/// Re-registering the same token is a no-op.
///
/// ## Errors
/// Returns HTTP 400 if the token is empty
/// Returns HTTP 500 if database operations fail
#[handler]
async fn register_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let current = match get_member_from_depot(depot) {
        Ok(m) => m.clone(),
        Err(e) => {
            error!(error = ?e, "Failed to get member from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let body: RegisterDeviceRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse device request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let token = body.token.trim();
    if token.is_empty() {
        render_error(res, StatusCode::BAD_REQUEST, "Token is required");
        return;
    }

    if body.platform == Platform::Web && body.web_push_keys.is_none() {
        render_error(
            res,
            StatusCode::BAD_REQUEST,
            "Web registrations require web_push_keys",
        );
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

    let id = uuid::Uuid::now_v7();
    let row = NewPushRegistration {
        id,
        member_id: current.id,
        platform: body.platform,
        token,
        web_push_keys: body.web_push_keys.as_ref(),
    };

    match push::insert(&mut conn, &row).await {
        Ok(()) => {
            tracing::info!(registration_id = %id, member_id = %current.id, platform = %body.platform, "Push target registered");
            res.status_code(StatusCode::CREATED);
            res.render(Json(json!({
                "id": id,
                "member_id": current.id,
                "platform": body.platform,
            })));
        }
        Err(e) => {
            error!(error = ?e, "Failed to register push target");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to register device");
        }
    }
}

/// ## Summary
/// DELETE /api/devices/{id} - Remove one of the current member's push
/// targets
///
/// A member can only remove registrations they own.
///
/// ## Errors
/// Returns HTTP 404 if no such registration is owned by the member
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

    let Some(id) = req.param::<uuid::Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid registration id");
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

    match push::delete_owned(&mut conn, id, current.id).await {
        Ok(0) => render_error(res, StatusCode::NOT_FOUND, "Registration not found"),
        Ok(_) => {
            tracing::info!(registration_id = %id, member_id = %current.id, "Push target removed");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => {
            error!(error = ?e, "Failed to remove push target");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to remove device");
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(DEVICES_ROUTE_COMPONENT)
        .post(register_handler)
        .push(Router::with_path("<id>").delete(delete_handler))
}
