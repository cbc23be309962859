use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::app::api::util::render_error;
use crate::db_handler::get_db_from_depot;
use crate::middleware::auth::get_member_from_depot;
use chapterhouse_core::constants::GROUPS_ROUTE_COMPONENT;
use chapterhouse_db::db::query::{member, working_group};
use chapterhouse_db::model::working_group::{NewWorkingGroup, NewWorkingGroupMember, WorkingGroup};

/// ## Summary
/// Create working group request payload
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: String,
}

/// ## Summary
/// Working group detail response: the group plus its member ids
#[derive(Debug, Serialize)]
pub struct GroupDetailResponse {
    #[serde(flatten)]
    pub group: WorkingGroup,
    pub member_ids: Vec<uuid::Uuid>,
}

/// ## Summary
/// GET /api/groups - List working groups ordered by name
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

    match working_group::list(&mut conn).await {
        Ok(rows) => res.render(Json(rows)),
        Err(e) => {
            error!(error = ?e, "Failed to list working groups");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }
}

/// ## Summary
/// GET /api/groups/{id} - Fetch one working group with its member ids
///
/// ## Errors
/// Returns HTTP 404 if the group does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn get_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(id) = req.param::<uuid::Uuid>("id") else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid group id");
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

    let group = match working_group::find_by_id(&mut conn, id).await {
        Ok(Some(g)) => g,
        Ok(None) => {
            render_error(res, StatusCode::NOT_FOUND, "Working group not found");
            return;
        }
        Err(e) => {
            error!(error = ?e, "Failed to query working group");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    match working_group::member_ids(&mut conn, id).await {
        Ok(member_ids) => res.render(Json(GroupDetailResponse { group, member_ids })),
        Err(e) => {
            error!(error = ?e, "Failed to list group members");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }
}

/// ## Summary
/// POST /api/groups - Create a working group (board only)
///
/// ## Errors
/// Returns HTTP 403 if the member is not on the board
/// Returns HTTP 400 if the name is empty
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
        tracing::warn!(member_id = %current.id, "Non-board member attempted to create a working group");
        render_error(res, StatusCode::FORBIDDEN, "Board role required");
        return;
    }

    let body: CreateGroupRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse group request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let name = body.name.trim();
    if name.is_empty() {
        render_error(res, StatusCode::BAD_REQUEST, "Name is required");
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

    let new_group = NewWorkingGroup {
        id: uuid::Uuid::now_v7(),
        name,
        description: body.description.trim(),
    };

    match working_group::insert(&mut conn, &new_group).await {
        Ok(row) => {
            tracing::info!(group_id = %row.id, created_by = %current.id, "Working group created");
            res.status_code(StatusCode::CREATED);
            res.render(Json(row));
        }
        Err(e) => {
            error!(error = ?e, "Failed to insert working group");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to create group");
        }
    }
}

/// ## Summary
/// DELETE /api/groups/{id} - Remove a working group (board only)
///
/// ## Errors
/// Returns HTTP 403 if the member is not on the board
/// Returns HTTP 404 if the group does not exist
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
        render_error(res, StatusCode::BAD_REQUEST, "Invalid group id");
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

    match working_group::delete(&mut conn, id).await {
        Ok(0) => render_error(res, StatusCode::NOT_FOUND, "Working group not found"),
        Ok(_) => {
            tracing::info!(group_id = %id, deleted_by = %current.id, "Working group deleted");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => {
            error!(error = ?e, "Failed to delete working group");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete group");
        }
    }
}

/// ## Summary
/// POST /api/groups/{id}/members/{member_id} - Add a member to a group
///
/// Board members may add anyone; other members may only add themselves.
///
/// ## Errors
/// Returns HTTP 403 if a non-board member targets someone else
/// Returns HTTP 404 if the group or the member does not exist
/// Returns HTTP 500 if database operations fail
#[handler]
async fn add_member_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let current = match get_member_from_depot(depot) {
        Ok(m) => m.clone(),
        Err(e) => {
            error!(error = ?e, "Failed to get member from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let (Some(group_id), Some(member_id)) = (
        req.param::<uuid::Uuid>("id"),
        req.param::<uuid::Uuid>("member_id"),
    ) else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid group or member id");
        return;
    };

    if !current.is_board() && member_id != current.id {
        render_error(res, StatusCode::FORBIDDEN, "Cannot manage another member's groups");
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

    match working_group::find_by_id(&mut conn, group_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            render_error(res, StatusCode::NOT_FOUND, "Working group not found");
            return;
        }
        Err(e) => {
            error!(error = ?e, "Failed to query working group");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    }

    match member::find_by_id(&mut conn, member_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            render_error(res, StatusCode::NOT_FOUND, "Member not found");
            return;
        }
        Err(e) => {
            error!(error = ?e, "Failed to query member");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    }

    let row = NewWorkingGroupMember {
        working_group_id: group_id,
        member_id,
    };

    match working_group::add_member(&mut conn, &row).await {
        Ok(()) => {
            tracing::info!(%group_id, %member_id, added_by = %current.id, "Member added to working group");
            res.status_code(StatusCode::CREATED);
            res.render(Json(json!({"working_group_id": group_id, "member_id": member_id})));
        }
        Err(e) => {
            error!(error = ?e, "Failed to add member to working group");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to add member");
        }
    }
}

/// ## Summary
/// DELETE /api/groups/{id}/members/{member_id} - Remove a member from a group
///
/// Board members may remove anyone; other members may only remove themselves.
///
/// ## Errors
/// Returns HTTP 403 if a non-board member targets someone else
/// Returns HTTP 404 if no such membership exists
/// Returns HTTP 500 if database operations fail
#[handler]
async fn remove_member_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let current = match get_member_from_depot(depot) {
        Ok(m) => m.clone(),
        Err(e) => {
            error!(error = ?e, "Failed to get member from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    let (Some(group_id), Some(member_id)) = (
        req.param::<uuid::Uuid>("id"),
        req.param::<uuid::Uuid>("member_id"),
    ) else {
        render_error(res, StatusCode::BAD_REQUEST, "Invalid group or member id");
        return;
    };

    if !current.is_board() && member_id != current.id {
        render_error(res, StatusCode::FORBIDDEN, "Cannot manage another member's groups");
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

    match working_group::remove_member(&mut conn, group_id, member_id).await {
        Ok(0) => render_error(res, StatusCode::NOT_FOUND, "Membership not found"),
        Ok(_) => {
            tracing::info!(%group_id, %member_id, removed_by = %current.id, "Member removed from working group");
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => {
            error!(error = ?e, "Failed to remove member from working group");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to remove member");
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(GROUPS_ROUTE_COMPONENT)
        .get(list_handler)
        .post(create_handler)
        .push(
            Router::with_path("<id>")
                .get(get_handler)
                .delete(delete_handler)
                .push(
                    Router::with_path("members/<member_id>")
                        .post(add_member_handler)
                        .delete(remove_member_handler),
                ),
        )
}
