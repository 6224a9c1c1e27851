//! Session driver: executes state machine effects against the server
//!
//! [`Terminal`] 把 [`TerminalSession`] 的纯转移和真实 I/O 接起来。
//! 每个用户动作先喂给状态机，再按序执行返回的效果；效果执行产生的
//! 服务器应答又喂回状态机，可能产生新效果 (如排队的补发提交)。

use std::collections::VecDeque;

use shared::models::Dish;
use shared::{PosEvent, TicketItemInput};

use crate::api::{RoomPort, TicketApi};
use crate::error::TerminalResult;
use crate::session::{SessionEffect, SessionState, TerminalSession};

/// One POS terminal bound to its API and room transport
pub struct Terminal<A, R> {
    session: TerminalSession,
    api: A,
    rooms: R,
}

impl<A: TicketApi, R: RoomPort> Terminal<A, R> {
    pub fn new(api: A, rooms: R) -> Self {
        Self {
            session: TerminalSession::new(),
            api,
            rooms,
        }
    }

    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Select a table: leave/join rooms and hydrate the current ticket
    pub async fn select_table(&mut self, table_number: u32) -> TerminalResult<()> {
        let effects = self.session.select_table(table_number);
        self.run_effects(effects).await
    }

    /// Submit the full local state as the table's desired ticket
    pub async fn submit(&mut self) -> TerminalResult<()> {
        let effects = self.session.submit();
        self.run_effects(effects).await
    }

    /// Close the current table's ticket (idempotent)
    pub async fn close_table(&mut self) -> TerminalResult<()> {
        let effects = self.session.close_table();
        self.run_effects(effects).await
    }

    /// Feed a server broadcast into the session
    pub fn on_event(&mut self, event: &PosEvent) {
        match event {
            PosEvent::TicketUpdated(view) => self.session.broadcast_received(view),
        }
    }

    // 本地编辑直通，无 I/O
    pub fn add_dish(&mut self, dish: &Dish) {
        self.session.add_dish(dish);
    }

    pub fn add_item(&mut self, item: TicketItemInput) {
        self.session.add_item(item);
    }

    pub fn increment_item(&mut self, index: usize) {
        self.session.increment_item(index);
    }

    pub fn decrement_item(&mut self, index: usize) {
        self.session.decrement_item(index);
    }

    pub fn remove_item(&mut self, index: usize) {
        self.session.remove_item(index);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.session.set_name(name);
    }

    /// Drain the effect queue
    ///
    /// 读失败降级为空票据而不报错；提交/关闭失败向上冒泡，
    /// 本地状态已由状态机保持原样，用户可手动重试。
    async fn run_effects(&mut self, effects: Vec<SessionEffect>) -> TerminalResult<()> {
        let mut queue: VecDeque<SessionEffect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                SessionEffect::JoinRoom(table_number) => {
                    self.rooms.join(table_number).await?;
                }
                SessionEffect::LeaveRoom(table_number) => {
                    self.rooms.leave(table_number).await?;
                }
                SessionEffect::Fetch(table_number) => {
                    match self.api.get_open_ticket(table_number).await {
                        Ok(ticket) => self.session.fetch_succeeded(table_number, ticket),
                        Err(e) => {
                            tracing::warn!(table = table_number, error = %e, "Ticket fetch failed, starting empty");
                            self.session.fetch_failed(table_number);
                        }
                    }
                }
                SessionEffect::Replace(table_number, draft) => {
                    match self.api.replace_ticket(table_number, &draft).await {
                        Ok(view) => queue.extend(self.session.submit_succeeded(&view)),
                        Err(e) => {
                            tracing::warn!(table = table_number, error = %e, "Ticket submit failed");
                            self.session.submit_failed();
                            return Err(e.into());
                        }
                    }
                }
                SessionEffect::Close(table_number) => {
                    match self.api.close_ticket(table_number).await {
                        Ok(_) => self.session.close_succeeded(table_number),
                        Err(e) => {
                            tracing::warn!(table = table_number, error = %e, "Ticket close failed");
                            return Err(e.into());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
