//! Server API ports and the HTTP implementation
//!
//! [`TicketApi`] 和 [`RoomPort`] 是会话驱动器依赖的两个抽象边界:
//! 前者封装票据读写，后者封装实时房间成员关系。测试里用进程内
//! 实现替换，生产里用 [`HttpTicketApi`] 走网络。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{CloseTicketResponse, TicketDraft, TicketView};

use crate::error::{ApiError, ApiResult};

/// Ticket read/write operations against the server
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// 该桌当前打开的票据，没有则为 None (不是错误)
    async fn get_open_ticket(&self, table_number: u32) -> ApiResult<Option<TicketView>>;

    /// 整体替换该桌的打开票据，返回服务器水合后的权威快照
    async fn replace_ticket(&self, table_number: u32, draft: &TicketDraft)
    -> ApiResult<TicketView>;

    /// 关闭该桌票据 (幂等)
    async fn close_ticket(&self, table_number: u32) -> ApiResult<CloseTicketResponse>;
}

/// Room membership on the real-time channel
#[async_trait]
pub trait RoomPort: Send + Sync {
    async fn join(&self, table_number: u32) -> ApiResult<()>;
    async fn leave(&self, table_number: u32) -> ApiResult<()>;
}

/// Room port that ignores membership (offline / test use)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRooms;

#[async_trait]
impl RoomPort for NullRooms {
    async fn join(&self, _table_number: u32) -> ApiResult<()> {
        Ok(())
    }

    async fn leave(&self, _table_number: u32) -> ApiResult<()> {
        Ok(())
    }
}

/// HTTP implementation of [`TicketApi`]
#[derive(Debug, Clone)]
pub struct HttpTicketApi {
    client: Client,
    base_url: String,
}

impl HttpTicketApi {
    /// Create a client against the server's base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Map the HTTP response to the API result
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
                StatusCode::BAD_REQUEST => Err(ApiError::Validation(text)),
                _ => Err(ApiError::Server(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }
}

#[async_trait]
impl TicketApi for HttpTicketApi {
    async fn get_open_ticket(&self, table_number: u32) -> ApiResult<Option<TicketView>> {
        let response = self
            .client
            .get(self.url(&format!("api/tickets/{table_number}")))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn replace_ticket(
        &self,
        table_number: u32,
        draft: &TicketDraft,
    ) -> ApiResult<TicketView> {
        let response = self
            .client
            .post(self.url(&format!("api/tickets/{table_number}")))
            .json(draft)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn close_ticket(&self, table_number: u32) -> ApiResult<CloseTicketResponse> {
        let response = self
            .client
            .post(self.url(&format!("api/tickets/{table_number}/close")))
            .send()
            .await?;
        Self::handle_response(response).await
    }
}
