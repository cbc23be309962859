use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::app::api::util::render_error;
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use chapterhouse_core::constants::AUTH_ROUTE_COMPONENT;
use chapterhouse_db::db::enums::MemberRole;
use chapterhouse_db::db::query::member;
use chapterhouse_db::model::member::NewMember;
use chapterhouse_service::auth::password::{hash_password, verify_password};
use chapterhouse_service::auth::token::issue_token;

/// ## Summary
/// Registration request payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// ## Summary
/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// ## Summary
/// Session response payload returned by both register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub member_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// ## Summary
/// POST /api/auth/register - Register a new member with email and password
///
/// ## Side Effects
/// - Creates a member row with hashed password and the `member` role
///
/// ## Errors
/// Returns HTTP 400 if the email is already registered
/// Returns HTTP 500 if database operations fail
#[handler]
async fn register_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing member registration request");

    // Extract JSON body
    let register_req: RegisterRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse registration request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    let name = register_req.name.trim();
    let email = register_req.email.trim();

    // Validate input
    if name.is_empty() || email.is_empty() || register_req.password.is_empty() {
        render_error(
            res,
            StatusCode::BAD_REQUEST,
            "Name, email, and password are required",
        );
        return;
    }

    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    // Get database provider
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

    // Check if the email is already taken
    let existing = match member::find_by_email(&mut conn, email).await {
        Ok(m) => m,
        Err(e) => {
            error!(error = ?e, "Failed to query existing member");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    if existing.is_some() {
        render_error(res, StatusCode::BAD_REQUEST, "Email already registered");
        return;
    }

    // Hash the password
    let password_hash = match hash_password(&register_req.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = ?e, "Failed to hash password");
            render_error(
                res,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process password",
            );
            return;
        }
    };

    let new_member = NewMember {
        id: uuid::Uuid::now_v7(),
        name,
        email,
        password_hash: &password_hash,
        role: MemberRole::Member,
    };

    let created = match member::insert(&mut conn, &new_member).await {
        Ok(m) => m,
        Err(e) => {
            error!(error = ?e, "Failed to create member");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to create member");
            return;
        }
    };

    let token = match issue_token(&config.auth, created.id, &created.name, created.role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = ?e, "Failed to issue token");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token");
            return;
        }
    };

    tracing::info!(member_id = %created.id, email = %created.email, "Member registered successfully");

    res.status_code(StatusCode::CREATED);
    res.render(Json(SessionResponse {
        token,
        member_id: created.id.to_string(),
        name: created.name,
        email: created.email,
        role: created.role.to_string(),
    }));
}

/// ## Summary
/// POST /api/auth/login - Verify credentials and issue a bearer token
///
/// ## Errors
/// Returns HTTP 401 if credentials are invalid
/// Returns HTTP 500 if database operations fail
#[handler]
async fn login_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing login request");

    // Extract JSON body
    let login_req: LoginRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse login request");
            render_error(res, StatusCode::BAD_REQUEST, "Invalid request body");
            return;
        }
    };

    // Validate input
    if login_req.email.is_empty() || login_req.password.is_empty() {
        render_error(res, StatusCode::BAD_REQUEST, "Email and password are required");
        return;
    }

    let config = match get_config_from_depot(depot) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = ?e, "Failed to get config from depot");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    // Get database provider
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

    // Look up member by email
    let found = match member::find_by_email(&mut conn, login_req.email.trim()).await {
        Ok(Some(m)) => m,
        Ok(None) => {
            render_error(res, StatusCode::UNAUTHORIZED, "Invalid email or password");
            return;
        }
        Err(e) => {
            error!(error = ?e, "Failed to query member");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            return;
        }
    };

    // Verify password
    if verify_password(&login_req.password, &found.password_hash).is_err() {
        render_error(res, StatusCode::UNAUTHORIZED, "Invalid email or password");
        return;
    }

    let token = match issue_token(&config.auth, found.id, &found.name, found.role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = ?e, "Failed to issue token");
            render_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token");
            return;
        }
    };

    tracing::info!(member_id = %found.id, email = %found.email, "Member logged in successfully");

    res.status_code(StatusCode::OK);
    res.render(Json(SessionResponse {
        token,
        member_id: found.id.to_string(),
        name: found.name,
        email: found.email,
        role: found.role.to_string(),
    }));
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTH_ROUTE_COMPONENT)
        .push(Router::with_path("register").post(register_handler))
        .push(Router::with_path("login").post(login_handler))
}
