//! Ticket API 模块
//!
//! POS 终端直连的三个接口，不走 JWT (终端在局域网内)。

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tickets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{table}", get(handler::get_open).post(handler::replace))
        .route("/{table}/close", post(handler::close))
}
