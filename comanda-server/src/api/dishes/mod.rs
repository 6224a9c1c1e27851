//! Dish API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/dishes", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    // 菜单页和终端目录是公开读
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn_with_state(state, require_auth));

    read_routes.merge(manage_routes)
}
