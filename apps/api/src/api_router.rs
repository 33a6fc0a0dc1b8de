use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use warden_core::AppError;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

#[cfg(test)]
mod tests;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    expose_internal_errors: bool,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me_handler))
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .put(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            post(handlers::roles::attach_permission_handler)
                .delete(handlers::roles::detach_permission_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::permissions::list_permissions_handler)
                .post(handlers::permissions::create_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            get(handlers::permissions::get_permission_handler)
                .put(handlers::permissions::update_permission_handler)
                .delete(handlers::permissions::delete_permission_handler),
        )
        .route(
            "/api/ai/parse-command",
            post(handlers::command::parse_command_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let router = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/auth", post(handlers::auth::auth_handler))
        .merge(protected_routes);

    let router = if expose_internal_errors {
        router.layer(from_fn(middleware::reveal_internal_errors))
    } else {
        router
    };

    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
