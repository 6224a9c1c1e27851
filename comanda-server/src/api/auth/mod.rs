//! Auth API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_auth;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/auth", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route(
            "/me",
            get(handler::me).layer(middleware::from_fn_with_state(state, require_auth)),
        )
}
