use salvo::prelude::Json;
use salvo::{Depot, Router, handler};
use serde_json::json;

use crate::middleware::auth::get_member_from_depot;

/// ## Summary
/// Returns the authenticated member's information as JSON.
/// The member is retrieved from the depot set by the `AuthMiddleware`.
#[handler]
async fn whoami(depot: &Depot) -> Json<serde_json::Value> {
    match get_member_from_depot(depot) {
        Ok(current) => Json(json!({
            "member_id": current.id,
            "name": current.name,
            "role": current.role.to_string(),
        })),
        Err(_) => Json(json!({"error":"Member not found in depot"})),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("whoami").get(whoami)
}
