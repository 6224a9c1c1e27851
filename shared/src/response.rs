//! HTTP response DTOs

use serde::{Deserialize, Serialize};

/// Response of `POST /api/tickets/{table}/close`
///
/// 关台是幂等的: 即使没有打开的票据也返回 `success: true`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseTicketResponse {
    pub success: bool,
}
