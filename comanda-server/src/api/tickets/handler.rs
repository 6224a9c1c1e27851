//! Ticket API Handlers
//!
//! TicketStore 的薄 HTTP 外壳。错误语义:
//!
//! - 没有打开的票据 → 200 + null，绝不是 4xx
//! - 持久化失败 → 500 + 通用消息 (细节进日志)
//! - 关台永远 200 `{success: true}` (幂等)

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::TicketView;
use shared::request::TicketDraft;
use shared::response::CloseTicketResponse;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/tickets/{table} - 当前打开票据或 null
pub async fn get_open(
    State(state): State<ServerState>,
    Path(table): Path<u32>,
) -> AppResult<Json<Option<TicketView>>> {
    validate_table(table)?;
    let ticket = state.ticket_store().get_open_ticket(table).await?;
    Ok(Json(ticket))
}

/// POST /api/tickets/{table} - 整体替换票据状态
///
/// 事务提交成功后向该桌房间广播恰好一次。广播在该桌的存储锁内
/// 发出，同桌的广播顺序与提交顺序一致；相对 HTTP 结果仍是
/// fire-and-forget: 提交方总能拿到自己的成功响应。
pub async fn replace(
    State(state): State<ServerState>,
    Path(table): Path<u32>,
    Json(draft): Json<TicketDraft>,
) -> AppResult<Json<TicketView>> {
    validate_table(table)?;

    // 广播的负载就是事务返回的服务器端新读，不是客户端回显
    let rooms = state.rooms();
    let ticket = state
        .ticket_store()
        .replace_ticket_then(table, &draft, |view| rooms.publish(view.clone()))
        .await?;

    Ok(Json(ticket))
}

/// POST /api/tickets/{table}/close - 幂等关台
pub async fn close(
    State(state): State<ServerState>,
    Path(table): Path<u32>,
) -> AppResult<Json<CloseTicketResponse>> {
    validate_table(table)?;
    state.ticket_store().close_ticket(table).await?;
    Ok(Json(CloseTicketResponse { success: true }))
}

fn validate_table(table: u32) -> AppResult<()> {
    if table == 0 {
        return Err(AppError::validation("Table number must be positive"));
    }
    Ok(())
}
