//! Terminal session state machine
//!
//! 一个终端对一张桌台票据的客户端编排。状态机本身不做任何 I/O:
//! 每个输入 (用户动作、服务器应答、广播) 返回一组 [`SessionEffect`]，
//! 由 [`crate::Terminal`] 驱动器去执行。这样丢弃本地编辑、排队提交
//! 等行为都是可直接单测的显式转移。
//!
//! # 状态
//!
//! ```text
//! Unselected → Loading → Viewing ⇄ Submitting
//! ```
//!
//! # 并发策略
//!
//! 最后提交者胜，服务器往返为权威，广播覆盖本地陈旧状态。
//! 没有 CRDT，没有按字段合并: 票据由同店员工低竞争编辑。

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use shared::models::Dish;
use shared::{TicketDraft, TicketItemInput, TicketView, default_ticket_name};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 未选桌
    Unselected,
    /// 已选桌，正在拉取当前票据
    Loading,
    /// 票据已水合，允许本地编辑
    Viewing,
    /// ReplaceTicket 在途，再次提交会进入待发队列
    Submitting,
}

/// I/O the driver must perform in response to a transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    JoinRoom(u32),
    LeaveRoom(u32),
    Fetch(u32),
    Replace(u32, TicketDraft),
    Close(u32),
}

/// One terminal's view of one table's ticket
#[derive(Debug, Clone)]
pub struct TerminalSession {
    state: SessionState,
    table_number: Option<u32>,
    name: String,
    items: Vec<TicketItemInput>,
    /// 在途提交期间排队的最新期望状态 (只保留一份，后来者覆盖)
    pending: Option<TicketDraft>,
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unselected,
            table_number: None,
            name: String::new(),
            items: Vec::new(),
            pending: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn table_number(&self) -> Option<u32> {
        self.table_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[TicketItemInput] {
        &self.items
    }

    /// Local ticket total, computed through Decimal
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| {
                Decimal::from_f64(item.price).unwrap_or_default() * Decimal::from(item.quantity)
            })
            .sum()
    }

    /// Snapshot of the current local state as a submittable draft
    fn draft(&self) -> TicketDraft {
        TicketDraft {
            name: self.name.clone(),
            items: self.items.clone(),
        }
    }

    /// Adopt a server snapshot as the new local state
    fn adopt(&mut self, view: &TicketView) {
        self.name = view.name.clone();
        self.items = view
            .items
            .iter()
            .map(|item| TicketItemInput {
                dish_id: item.dish_id,
                quantity: item.quantity,
                price: item.price,
                custom_options: item.custom_options.clone(),
            })
            .collect();
    }

    fn reset_to_empty(&mut self, table_number: u32) {
        self.name = default_ticket_name(table_number);
        self.items.clear();
    }

    // ========== 用户动作 ==========

    /// Select a table (allowed from any state)
    ///
    /// 换桌时总是先 Leave 旧房间再 Join 新房间，成员关系不会自动迁移。
    pub fn select_table(&mut self, table_number: u32) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        if let Some(old) = self.table_number
            && old != table_number
        {
            effects.push(SessionEffect::LeaveRoom(old));
        }
        if self.table_number != Some(table_number) {
            effects.push(SessionEffect::JoinRoom(table_number));
        }

        self.table_number = Some(table_number);
        self.state = SessionState::Loading;
        self.pending = None;
        self.reset_to_empty(table_number);

        effects.push(SessionEffect::Fetch(table_number));
        effects
    }

    /// Add a dish at its current catalog price
    ///
    /// 价格在此刻被复制为快照，之后目录改价不影响已加的行。
    pub fn add_dish(&mut self, dish: &Dish) {
        self.add_item(TicketItemInput {
            dish_id: Some(dish.id),
            quantity: 1,
            price: dish.price,
            custom_options: BTreeMap::new(),
        });
    }

    /// 选桌水合之前 (Unselected / Loading) 编辑无意义，直接忽略。
    /// Submitting 期间编辑仍然允许，累积到待发队列里。
    fn editable(&self) -> bool {
        matches!(
            self.state,
            SessionState::Viewing | SessionState::Submitting
        )
    }

    /// Add a line, merging with an existing identical line
    pub fn add_item(&mut self, item: TicketItemInput) {
        if !self.editable() {
            return;
        }
        let existing = self.items.iter_mut().find(|line| {
            line.dish_id == item.dish_id && line.custom_options == item.custom_options
        });
        match existing {
            Some(line) => line.quantity += item.quantity,
            None => self.items.push(item),
        }
    }

    pub fn increment_item(&mut self, index: usize) {
        if !self.editable() {
            return;
        }
        if let Some(line) = self.items.get_mut(index) {
            line.quantity += 1;
        }
    }

    /// Decrement a line's quantity; at quantity 1 the line is removed
    pub fn decrement_item(&mut self, index: usize) {
        if !self.editable() {
            return;
        }
        match self.items.get_mut(index) {
            Some(line) if line.quantity > 1 => line.quantity -= 1,
            Some(_) => {
                self.items.remove(index);
            }
            None => {}
        }
    }

    pub fn remove_item(&mut self, index: usize) {
        if self.editable() && index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.editable() {
            self.name = name.into();
        }
    }

    /// Submit the full local state
    ///
    /// 在途时不并发发送: 新请求覆盖待发槽，在途完成后自动补发。
    /// 空票据也是合法提交 (清空一张票)。
    pub fn submit(&mut self) -> Vec<SessionEffect> {
        let Some(table_number) = self.table_number else {
            return Vec::new();
        };
        match self.state {
            SessionState::Viewing => {
                self.state = SessionState::Submitting;
                vec![SessionEffect::Replace(table_number, self.draft())]
            }
            SessionState::Submitting => {
                self.pending = Some(self.draft());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Close the table's ticket
    pub fn close_table(&mut self) -> Vec<SessionEffect> {
        match (self.state, self.table_number) {
            (SessionState::Viewing, Some(table_number)) => {
                vec![SessionEffect::Close(table_number)]
            }
            _ => Vec::new(),
        }
    }

    // ========== 服务器应答 ==========

    /// GetOpenTicket result for a previously issued Fetch
    ///
    /// 没有打开票据时以空票据进入 Viewing。迟到的应答 (已换桌) 被忽略。
    pub fn fetch_succeeded(&mut self, table_number: u32, ticket: Option<TicketView>) {
        if self.state != SessionState::Loading || self.table_number != Some(table_number) {
            return;
        }
        match ticket {
            Some(view) => self.adopt(&view),
            None => self.reset_to_empty(table_number),
        }
        self.state = SessionState::Viewing;
    }

    /// Fetch failure: fall back to an empty local ticket
    ///
    /// 读失败不阻塞终端，POS 保持可用。
    pub fn fetch_failed(&mut self, table_number: u32) {
        if self.state != SessionState::Loading || self.table_number != Some(table_number) {
            return;
        }
        self.reset_to_empty(table_number);
        self.state = SessionState::Viewing;
    }

    /// ReplaceTicket succeeded: adopt the round-tripped truth
    ///
    /// 若期间排队了新的期望状态，立即补发它并保持 Submitting。
    pub fn submit_succeeded(&mut self, view: &TicketView) -> Vec<SessionEffect> {
        if self.state != SessionState::Submitting {
            return Vec::new();
        }
        self.adopt(view);
        match (self.pending.take(), self.table_number) {
            (Some(draft), Some(table_number)) => {
                vec![SessionEffect::Replace(table_number, draft)]
            }
            _ => {
                self.state = SessionState::Viewing;
                Vec::new()
            }
        }
    }

    /// ReplaceTicket failed: keep local state intact, no automatic retry
    pub fn submit_failed(&mut self) {
        if self.state != SessionState::Submitting {
            return;
        }
        self.pending = None;
        self.state = SessionState::Viewing;
    }

    /// CloseTicket succeeded: start fresh for the same table
    ///
    /// 不离开房间，终端可以立即为同一桌开新票。
    pub fn close_succeeded(&mut self, table_number: u32) {
        if self.table_number != Some(table_number) {
            return;
        }
        self.reset_to_empty(table_number);
        self.pending = None;
        self.state = SessionState::Viewing;
    }

    // ========== 广播 ==========

    /// A `ticketUpdated` broadcast arrived
    ///
    /// 其他桌的事件被忽略；本桌的快照直接采纳，丢弃未提交的本地编辑
    /// (last-write-wins)。
    pub fn broadcast_received(&mut self, view: &TicketView) {
        if self.table_number != Some(view.table_number) {
            return;
        }
        if matches!(self.state, SessionState::Viewing | SessionState::Submitting) {
            self.adopt(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{TicketItemView, TicketStatus};

    fn line(dish_id: i64, quantity: u32, price: f64) -> TicketItemInput {
        TicketItemInput {
            dish_id: Some(dish_id),
            quantity,
            price,
            custom_options: BTreeMap::new(),
        }
    }

    fn server_view(table_number: u32, items: Vec<TicketItemView>) -> TicketView {
        TicketView {
            id: 1,
            table_number,
            name: default_ticket_name(table_number),
            status: TicketStatus::Open,
            created_at: Utc::now(),
            items,
        }
    }

    fn server_line(dish_id: i64, quantity: u32, price: f64) -> TicketItemView {
        TicketItemView {
            id: dish_id,
            dish_id: Some(dish_id),
            dish_name: Some(format!("dish-{dish_id}")),
            quantity,
            price,
            custom_options: BTreeMap::new(),
        }
    }

    fn viewing_session(table_number: u32) -> TerminalSession {
        let mut session = TerminalSession::new();
        session.select_table(table_number);
        session.fetch_succeeded(table_number, None);
        session
    }

    #[test]
    fn select_table_joins_room_and_fetches() {
        let mut session = TerminalSession::new();
        let effects = session.select_table(3);
        assert_eq!(
            effects,
            vec![SessionEffect::JoinRoom(3), SessionEffect::Fetch(3)]
        );
        assert_eq!(session.state(), SessionState::Loading);
    }

    #[test]
    fn switching_tables_leaves_old_room_first() {
        let mut session = viewing_session(3);
        let effects = session.select_table(5);
        assert_eq!(
            effects,
            vec![
                SessionEffect::LeaveRoom(3),
                SessionEffect::JoinRoom(5),
                SessionEffect::Fetch(5),
            ]
        );
    }

    #[test]
    fn fetch_miss_falls_back_to_empty_named_ticket() {
        let mut session = TerminalSession::new();
        session.select_table(7);
        session.fetch_succeeded(7, None);
        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.name(), "Ticket Mesa 7");
        assert!(session.items().is_empty());
    }

    #[test]
    fn fetch_failure_keeps_terminal_usable() {
        let mut session = TerminalSession::new();
        session.select_table(7);
        session.fetch_failed(7);
        assert_eq!(session.state(), SessionState::Viewing);
        session.add_item(line(1, 1, 9.5));
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn stale_fetch_for_previous_table_is_ignored() {
        let mut session = TerminalSession::new();
        session.select_table(3);
        session.select_table(5);
        session.fetch_succeeded(3, Some(server_view(3, vec![server_line(1, 2, 4.0)])));
        assert_eq!(session.state(), SessionState::Loading);
        assert!(session.items().is_empty());
    }

    #[test]
    fn identical_lines_merge_on_add() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 1, 12.0));
        session.add_item(line(1, 1, 12.0));
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].quantity, 2);
    }

    #[test]
    fn lines_with_different_options_stay_separate() {
        let mut session = viewing_session(3);
        let mut customized = line(1, 1, 12.0);
        customized
            .custom_options
            .insert("punto".into(), vec!["poco hecho".into()]);
        session.add_item(line(1, 1, 12.0));
        session.add_item(customized);
        assert_eq!(session.items().len(), 2);
    }

    #[test]
    fn decrement_at_quantity_one_removes_the_line() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 2, 8.0));
        session.decrement_item(0);
        assert_eq!(session.items()[0].quantity, 1);
        session.decrement_item(0);
        assert!(session.items().is_empty());
    }

    #[test]
    fn edits_before_hydration_are_ignored() {
        let mut session = TerminalSession::new();
        session.add_item(line(1, 1, 8.0));
        session.select_table(3);
        session.add_item(line(1, 1, 8.0));
        assert!(session.items().is_empty());
    }

    #[test]
    fn submit_sends_the_full_local_state() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 2, 8.0));
        let effects = session.submit();
        let SessionEffect::Replace(table_number, draft) = &effects[0] else {
            panic!("expected a replace effect");
        };
        assert_eq!(*table_number, 3);
        assert_eq!(draft.items, vec![line(1, 2, 8.0)]);
        assert_eq!(session.state(), SessionState::Submitting);
    }

    #[test]
    fn submit_while_in_flight_queues_only_the_latest() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 1, 8.0));
        assert_eq!(session.submit().len(), 1);

        // 在途期间继续编辑并两次提交，只有最后一份期望状态存活
        session.increment_item(0);
        assert!(session.submit().is_empty());
        session.increment_item(0);
        assert!(session.submit().is_empty());

        let effects = session.submit_succeeded(&server_view(3, vec![server_line(1, 1, 8.0)]));
        let SessionEffect::Replace(_, draft) = &effects[0] else {
            panic!("expected the queued replace");
        };
        assert_eq!(draft.items[0].quantity, 3);
        assert_eq!(session.state(), SessionState::Submitting);
    }

    #[test]
    fn submit_success_adopts_the_server_snapshot() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 1, 8.0));
        session.submit();

        let effects = session.submit_succeeded(&server_view(3, vec![server_line(1, 1, 7.5)]));
        assert!(effects.is_empty());
        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.items()[0].price, 7.5);
    }

    #[test]
    fn submit_failure_keeps_local_state_and_drops_the_queue() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 2, 8.0));
        session.submit();
        session.submit(); // 排队一份待发状态

        session.submit_failed();
        assert_eq!(session.state(), SessionState::Viewing);
        assert_eq!(session.items(), &[line(1, 2, 8.0)]);
        assert!(session.submit().len() == 1); // 手动重试仍然可行
    }

    #[test]
    fn broadcast_for_matching_table_discards_local_edits() {
        let mut session = viewing_session(3);
        session.add_item(line(9, 5, 2.0)); // 未提交的本地编辑

        session.broadcast_received(&server_view(3, vec![server_line(1, 1, 12.5)]));
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].dish_id, Some(1));
    }

    #[test]
    fn broadcast_for_other_table_is_ignored() {
        let mut session = viewing_session(3);
        session.add_item(line(9, 5, 2.0));

        session.broadcast_received(&server_view(4, vec![server_line(1, 1, 12.5)]));
        assert_eq!(session.items()[0].dish_id, Some(9));
    }

    #[test]
    fn close_resets_locally_without_leaving_the_room() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 1, 8.0));

        let effects = session.close_table();
        assert_eq!(effects, vec![SessionEffect::Close(3)]);

        session.close_succeeded(3);
        assert_eq!(session.state(), SessionState::Viewing);
        assert!(session.items().is_empty());
        assert_eq!(session.name(), "Ticket Mesa 3");
        // 新票可以立即开始
        session.add_item(line(2, 1, 6.0));
        assert_eq!(session.submit().len(), 1);
    }

    #[test]
    fn empty_submit_is_valid() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 1, 8.0));
        session.remove_item(0);
        let effects = session.submit();
        let SessionEffect::Replace(_, draft) = &effects[0] else {
            panic!("expected a replace effect");
        };
        assert!(draft.items.is_empty());
    }

    #[test]
    fn total_accumulates_through_decimal() {
        let mut session = viewing_session(3);
        session.add_item(line(1, 3, 0.1));
        assert_eq!(session.total(), Decimal::new(30, 2));
    }
}
