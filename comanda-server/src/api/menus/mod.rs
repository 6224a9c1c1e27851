//! Daily Menu API 模块

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/menus", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/active", get(handler::list_active))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn_with_state(state, require_auth));

    read_routes.merge(manage_routes)
}
