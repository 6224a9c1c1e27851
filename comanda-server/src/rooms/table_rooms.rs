//! Per-table room registry
//!
//! 并发安全的 "房间键 → 连接集合" 映射。投递是尽力而为:
//! publish 不等待、不确认、不重试；错过广播的终端在下次 join
//! 或本地提交时自愈。

use dashmap::{DashMap, DashSet};
use shared::message::{PosEvent, room_key};
use shared::models::TicketView;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One terminal connection's event feed
///
/// Drop 即隐式离开: 通道关闭后，该成员在下一次 publish 时被剪除。
#[derive(Debug)]
pub struct RoomSubscriber {
    id: Uuid,
    receiver: mpsc::UnboundedReceiver<PosEvent>,
}

impl RoomSubscriber {
    /// Connection id used as the room membership key
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next event pushed to this connection
    pub async fn recv(&mut self) -> Option<PosEvent> {
        self.receiver.recv().await
    }

    /// Non-blocking variant for polling loops
    pub fn try_recv(&mut self) -> Option<PosEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Connection metadata held by the registry
#[derive(Debug)]
struct Connection {
    sender: mpsc::UnboundedSender<PosEvent>,
    /// Optional display name, observability only
    display_name: Option<String>,
}

/// Room registry: one instance per process
///
/// 一个连接同一时间最多订阅一个房间由终端会话协议保证 (换桌总是
/// 先 leave 再 join)；本层不会自动把连接从旧房间移除。
#[derive(Debug, Default)]
pub struct TableRooms {
    connections: DashMap<Uuid, Connection>,
    rooms: DashMap<String, DashSet<Uuid>>,
}

impl TableRooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and hand back its event feed
    pub fn connect(&self) -> RoomSubscriber {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.connections.insert(
            id,
            Connection {
                sender,
                display_name: None,
            },
        );
        tracing::debug!(connection = %id, "Terminal connected");
        RoomSubscriber { id, receiver }
    }

    /// Add a connection to a table's room
    pub fn join(&self, connection_id: Uuid, table_number: u32) {
        if !self.connections.contains_key(&connection_id) {
            tracing::warn!(connection = %connection_id, "Join from unknown connection");
            return;
        }
        let key = room_key(table_number);
        self.rooms.entry(key.clone()).or_default().insert(connection_id);
        tracing::debug!(room = %key, connection = %connection_id, "Joined room");
    }

    /// Remove a connection from a table's room
    pub fn leave(&self, connection_id: Uuid, table_number: u32) {
        let key = room_key(table_number);
        if let Some(members) = self.rooms.get(&key) {
            members.remove(&connection_id);
        }
        tracing::debug!(room = %key, connection = %connection_id, "Left room");
    }

    /// Tag a connection with a display name (observability only)
    pub fn identify(&self, connection_id: Uuid, display_name: impl Into<String>) {
        if let Some(mut connection) = self.connections.get_mut(&connection_id) {
            let name = display_name.into();
            tracing::debug!(connection = %connection_id, name = %name, "Terminal identified");
            connection.display_name = Some(name);
        }
    }

    /// Display name previously set via [`identify`](Self::identify)
    pub fn display_name(&self, connection_id: Uuid) -> Option<String> {
        self.connections
            .get(&connection_id)
            .and_then(|connection| connection.display_name.clone())
    }

    /// Remove a connection from every room (connection closed)
    pub fn disconnect(&self, connection_id: Uuid) {
        for members in self.rooms.iter() {
            members.remove(&connection_id);
        }
        self.connections.remove(&connection_id);
        tracing::debug!(connection = %connection_id, "Disconnected from all rooms");
    }

    /// Push a committed ticket snapshot to everyone viewing its table
    ///
    /// 空房间是显式 no-op。发送失败 (接收端已被丢弃) 的成员被当场
    /// 剪除，连接断开等价于隐式 leave。
    pub fn publish(&self, snapshot: TicketView) {
        let key = room_key(snapshot.table_number);
        let Some(members) = self.rooms.get(&key) else {
            return;
        };

        let event = PosEvent::TicketUpdated(snapshot);
        let mut dead = Vec::new();
        for member in members.iter() {
            let delivered = self
                .connections
                .get(member.key())
                .map(|connection| connection.sender.send(event.clone()).is_ok())
                .unwrap_or(false);
            if !delivered {
                dead.push(*member.key());
            }
        }
        for id in dead {
            members.remove(&id);
            self.connections.remove(&id);
            tracing::debug!(room = %key, connection = %id, "Pruned dead room member");
        }
    }

    /// Current member count of a table's room
    pub fn room_size(&self, table_number: u32) -> usize {
        self.rooms
            .get(&room_key(table_number))
            .map(|members| members.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::TicketStatus;

    fn snapshot(table_number: u32, name: &str) -> TicketView {
        TicketView {
            id: 1,
            table_number,
            name: name.to_string(),
            status: TicketStatus::Open,
            created_at: Utc::now(),
            items: vec![],
        }
    }

    fn join_new(rooms: &TableRooms, table_number: u32) -> RoomSubscriber {
        let subscriber = rooms.connect();
        rooms.join(subscriber.id(), table_number);
        subscriber
    }

    #[tokio::test]
    async fn publish_reaches_only_the_matching_room() {
        let rooms = TableRooms::new();
        let mut mesa3 = join_new(&rooms, 3);
        let mut mesa5 = join_new(&rooms, 5);

        rooms.publish(snapshot(3, "Ticket Mesa 3"));

        let event = mesa3.recv().await.expect("event");
        assert_eq!(event.table_number(), 3);
        assert!(mesa5.try_recv().is_none());
    }

    #[tokio::test]
    async fn publish_to_empty_room_is_a_noop() {
        let rooms = TableRooms::new();
        // No subscribers anywhere; must not panic or block
        rooms.publish(snapshot(7, "Ticket Mesa 7"));
        assert_eq!(rooms.room_size(7), 0);
    }

    #[tokio::test]
    async fn leave_stops_delivery() {
        let rooms = TableRooms::new();
        let mut sub = join_new(&rooms, 4);

        rooms.publish(snapshot(4, "a"));
        assert!(sub.recv().await.is_some());

        rooms.leave(sub.id(), 4);
        rooms.publish(snapshot(4, "b"));
        assert!(sub.try_recv().is_none());
        assert_eq!(rooms.room_size(4), 0);
    }

    #[tokio::test]
    async fn dropped_receiver_is_pruned_on_next_publish() {
        let rooms = TableRooms::new();
        let sub = join_new(&rooms, 6);
        drop(sub); // connection gone without an explicit leave

        assert_eq!(rooms.room_size(6), 1);
        rooms.publish(snapshot(6, "x"));
        assert_eq!(rooms.room_size(6), 0);
    }

    #[tokio::test]
    async fn disconnect_removes_from_all_rooms() {
        let rooms = TableRooms::new();
        let sub = join_new(&rooms, 8);
        rooms.identify(sub.id(), "Barra 1");
        assert_eq!(rooms.display_name(sub.id()).as_deref(), Some("Barra 1"));

        rooms.disconnect(sub.id());
        assert_eq!(rooms.room_size(8), 0);
        assert!(rooms.display_name(sub.id()).is_none());
    }

    #[tokio::test]
    async fn all_room_members_receive_each_publish() {
        let rooms = TableRooms::new();
        let mut first = join_new(&rooms, 9);
        let mut second = join_new(&rooms, 9);

        rooms.publish(snapshot(9, "compartido"));

        for sub in [&mut first, &mut second] {
            let PosEvent::TicketUpdated(view) = sub.recv().await.expect("event");
            assert_eq!(view.name, "compartido");
        }
    }

    #[tokio::test]
    async fn switching_tables_pairs_leave_with_join() {
        let rooms = TableRooms::new();
        let mut sub = join_new(&rooms, 2);

        // Terminal session protocol: leave old, then join new
        rooms.leave(sub.id(), 2);
        rooms.join(sub.id(), 3);

        rooms.publish(snapshot(2, "vieja"));
        rooms.publish(snapshot(3, "nueva"));

        let PosEvent::TicketUpdated(view) = sub.recv().await.expect("event");
        assert_eq!(view.table_number, 3);
        assert!(sub.try_recv().is_none());
    }
}
