mod announcements;
mod auth;
mod devices;
mod events;
mod groups;
mod healthcheck;
mod util;
mod whoami;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use chapterhouse_core::constants::{API_ROUTE_COMPONENT, API_ROUTE_PREFIX};

/// ## Summary
/// Constructs the main API router. Auth and healthcheck routes are public;
/// everything else sits behind `AuthMiddleware`.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(auth::routes())
        .push(healthcheck::routes())
        .push(
            Router::new()
                .hoop(AuthMiddleware)
                .push(whoami::routes())
                .push(announcements::routes())
                .push(groups::routes())
                .push(events::routes())
                .push(devices::routes()),
        )
}
