//! Online Order API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/orders", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    // 下单是公开的 (网站访客)
    let public_routes = Router::new().route("/", post(handler::create));

    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(manage_routes)
}
