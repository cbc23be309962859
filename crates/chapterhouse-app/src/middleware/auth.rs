use salvo::Depot;
use tracing::error;
use uuid::Uuid;

use crate::config::get_config_from_depot;
use crate::error::{AppError, AppResult};
use chapterhouse_db::db::enums::MemberRole;
use chapterhouse_service::auth::token::verify_token;

/// Depot key the authenticated member is stored under.
pub const CURRENT_MEMBER: &str = "current_member";

/// The member a request is acting as, decoded from its bearer token.
#[derive(Debug, Clone)]
pub struct CurrentMember {
    pub id: Uuid,
    pub name: String,
    pub role: MemberRole,
}

impl CurrentMember {
    #[must_use]
    pub fn is_board(&self) -> bool {
        self.role == MemberRole::Board
    }
}

/// ## Summary
/// Retrieves the authenticated member from the depot.
///
/// ## Errors
/// Returns an error if the member is not found in the depot, which means the
/// route was not behind `AuthMiddleware`.
pub fn get_member_from_depot(depot: &Depot) -> AppResult<&CurrentMember> {
    depot.get::<CurrentMember>(CURRENT_MEMBER).map_err(|_err| {
        AppError::CoreError(chapterhouse_core::error::CoreError::InvariantViolation(
            "Authenticated member not found in depot",
        ))
    })
}

/// ## Summary
/// Middleware handler for authentication.
/// Use this as a handler in routes to protect them with authentication.
pub struct AuthMiddleware;

/// ## Summary
/// Authentication middleware that verifies the request's bearer token and
/// stores the member in the depot.
/// If verification fails, a 401 Unauthorized response is returned.
///
/// ## Side Effects
/// Inserts the authenticated member into the depot under the key
/// `current_member` for downstream handlers to access.
///
/// ## Errors
/// Returns an HTTP 401 Unauthorized response if authentication fails.
#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        tracing::trace!("Authenticating request");

        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                res.status_code(salvo::http::StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let Some(token) = bearer_token(req) else {
            tracing::debug!("Request carried no bearer token");
            res.status_code(salvo::http::StatusCode::UNAUTHORIZED);
            ctrl.skip_rest();
            return;
        };

        match verify_token(&config.auth, token) {
            Ok(claims) => {
                tracing::debug!(member_id = %claims.sub, "Member authenticated successfully");
                depot.insert(
                    CURRENT_MEMBER,
                    CurrentMember {
                        id: claims.sub,
                        name: claims.name,
                        role: claims.role,
                    },
                );
            }
            Err(_err) => {
                tracing::debug!("Bearer token rejected");
                res.status_code(salvo::http::StatusCode::UNAUTHORIZED);
                ctrl.skip_rest();
            }
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &salvo::Request) -> Option<&str> {
    req.headers()
        .get(salvo::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
