//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录/当前用户
//! - [`tickets`] - POS 票据接口 (公开给终端)
//! - [`dishes`] - 菜品管理
//! - [`categories`] - 分类管理
//! - [`menus`] - 每日菜单
//! - [`orders`] - 在线订单
//! - [`reservations`] - 订座
//! - [`gallery`] - 图库
//!
//! 公开/受保护的划分在各资源模块内完成: 读菜单、下单、订座和全部
//! 票据操作公开；后台变更操作挂 [`crate::auth::require_auth`]。

pub mod auth;
pub mod categories;
pub mod dishes;
pub mod gallery;
pub mod health;
pub mod menus;
pub mod orders;
pub mod reservations;
pub mod tickets;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// 装配完整的 HTTP 路由
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(tickets::router())
        .merge(auth::router(state.clone()))
        .merge(dishes::router(state.clone()))
        .merge(categories::router(state.clone()))
        .merge(menus::router(state.clone()))
        .merge(orders::router(state.clone()))
        .merge(reservations::router(state.clone()))
        .merge(gallery::router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
