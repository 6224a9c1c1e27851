//! 票据同步端到端测试
//!
//! 用进程内的 TicketStore + TableRooms 驱动两个真实的终端会话，
//! 验证提交、广播与收敛行为。API 边界用 trait 实现直连存储层，
//! 与 HTTP 处理器相同的编排: 事务提交后在表锁内广播水合快照。

use std::sync::Arc;

use async_trait::async_trait;
use comanda_server::db::DbService;
use comanda_server::db::repository::DishRepository;
use comanda_server::rooms::RoomSubscriber;
use comanda_server::{TableRooms, TicketStore};
use comanda_terminal::{ApiError, ApiResult, RoomPort, SessionState, Terminal, TicketApi};
use shared::models::{Dish, DishCreate};
use shared::{CloseTicketResponse, PosEvent, TicketDraft, TicketItemInput, TicketView};

/// Store-backed API with the same commit-then-publish orchestration
/// as the HTTP handler
#[derive(Clone)]
struct InProcessApi {
    store: TicketStore,
    rooms: Arc<TableRooms>,
}

#[async_trait]
impl TicketApi for InProcessApi {
    async fn get_open_ticket(&self, table_number: u32) -> ApiResult<Option<TicketView>> {
        self.store
            .get_open_ticket(table_number)
            .await
            .map_err(|e| ApiError::Server(e.to_string()))
    }

    async fn replace_ticket(
        &self,
        table_number: u32,
        draft: &TicketDraft,
    ) -> ApiResult<TicketView> {
        self.store
            .replace_ticket_then(table_number, draft, |view| {
                self.rooms.publish(view.clone())
            })
            .await
            .map_err(|e| ApiError::Server(e.to_string()))
    }

    async fn close_ticket(&self, table_number: u32) -> ApiResult<CloseTicketResponse> {
        self.store
            .close_ticket(table_number)
            .await
            .map_err(|e| ApiError::Server(e.to_string()))?;
        Ok(CloseTicketResponse { success: true })
    }
}

/// Room port bound to one registered connection
struct LocalRooms {
    rooms: Arc<TableRooms>,
    connection_id: uuid::Uuid,
}

#[async_trait]
impl RoomPort for LocalRooms {
    async fn join(&self, table_number: u32) -> ApiResult<()> {
        self.rooms.join(self.connection_id, table_number);
        Ok(())
    }

    async fn leave(&self, table_number: u32) -> ApiResult<()> {
        self.rooms.leave(self.connection_id, table_number);
        Ok(())
    }
}

struct Fixture {
    store: TicketStore,
    rooms: Arc<TableRooms>,
    dishes: DishRepository,
}

impl Fixture {
    async fn new() -> Self {
        let db = DbService::in_memory().await.expect("db");
        Self {
            store: TicketStore::new(db.pool.clone()),
            rooms: Arc::new(TableRooms::new()),
            dishes: DishRepository::new(db.pool),
        }
    }

    /// A terminal plus its broadcast feed
    fn terminal(&self) -> (Terminal<InProcessApi, LocalRooms>, RoomSubscriber) {
        let subscriber = self.rooms.connect();
        let api = InProcessApi {
            store: self.store.clone(),
            rooms: self.rooms.clone(),
        };
        let port = LocalRooms {
            rooms: self.rooms.clone(),
            connection_id: subscriber.id(),
        };
        (Terminal::new(api, port), subscriber)
    }

    async fn seed_dish(&self, name: &str, price: f64) -> Dish {
        self.dishes
            .create(DishCreate {
                name: name.to_string(),
                description: String::new(),
                price,
                category_id: None,
                image_path: None,
                is_available: None,
            })
            .await
            .expect("dish")
    }
}

/// Drain pending events from a feed into a terminal
fn deliver(subscriber: &mut RoomSubscriber, terminal: &mut Terminal<InProcessApi, LocalRooms>) {
    while let Some(event) = subscriber.try_recv() {
        terminal.on_event(&event);
    }
}

#[tokio::test]
async fn broadcast_payload_equals_fresh_server_read() {
    let fixture = Fixture::new().await;
    let mut subscriber = fixture.rooms.connect();
    fixture.rooms.join(subscriber.id(), 3);

    let api = InProcessApi {
        store: fixture.store.clone(),
        rooms: fixture.rooms.clone(),
    };
    api.replace_ticket(
        3,
        &TicketDraft {
            name: "Ticket Mesa 3".into(),
            items: vec![TicketItemInput {
                dish_id: None,
                quantity: 2,
                price: 11.0,
                custom_options: Default::default(),
            }],
        },
    )
    .await
    .expect("replace");

    let PosEvent::TicketUpdated(broadcast) = subscriber.recv().await.expect("event");
    let fresh = fixture
        .store
        .get_open_ticket(3)
        .await
        .expect("get")
        .expect("open");
    assert_eq!(broadcast, fresh);
}

/// 规格场景: A 在 3 号桌提交 Paella，B 什么都不做就看到 "Paella ×1"
/// 并丢弃自己未提交的编辑；关台后同桌可立即开新票。
#[tokio::test]
async fn two_terminals_converge_by_last_write_wins() {
    let fixture = Fixture::new().await;
    let paella = fixture.seed_dish("Paella", 14.0).await;

    let (mut terminal_a, mut feed_a) = fixture.terminal();
    let (mut terminal_b, mut feed_b) = fixture.terminal();

    terminal_a.select_table(3).await.expect("a select");
    terminal_b.select_table(3).await.expect("b select");
    assert_eq!(terminal_a.state(), SessionState::Viewing);
    assert_eq!(fixture.rooms.room_size(3), 2);

    // B 积累了一个未提交的本地编辑
    terminal_b.add_item(TicketItemInput {
        dish_id: None,
        quantity: 3,
        price: 2.0,
        custom_options: Default::default(),
    });

    terminal_a.add_dish(&paella);
    terminal_a.submit().await.expect("a submit");

    deliver(&mut feed_b, &mut terminal_b);
    let items = terminal_b.session().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].dish_id, Some(paella.id));
    assert_eq!(items[0].quantity, 1);
    assert_eq!(items[0].price, 14.0);

    // 提交者自己也采纳服务器回读，双方状态一致
    deliver(&mut feed_a, &mut terminal_a);
    assert_eq!(terminal_a.session().items(), terminal_b.session().items());

    // A 关台: 服务器不再有打开票据，A 本地重置但仍在房间里
    terminal_a.close_table().await.expect("close");
    assert!(
        fixture
            .store
            .get_open_ticket(3)
            .await
            .expect("get")
            .is_none()
    );
    assert_eq!(fixture.rooms.room_size(3), 2);

    // 同桌立即开新票
    terminal_a.add_dish(&paella);
    terminal_a.submit().await.expect("new ticket");
    let reopened = fixture
        .store
        .get_open_ticket(3)
        .await
        .expect("get")
        .expect("open");
    assert_eq!(reopened.items.len(), 1);
}

#[tokio::test]
async fn switching_tables_stops_old_room_delivery() {
    let fixture = Fixture::new().await;
    let (mut terminal, mut feed) = fixture.terminal();
    terminal.select_table(2).await.expect("select");
    terminal.select_table(5).await.expect("switch");

    assert_eq!(fixture.rooms.room_size(2), 0);
    assert_eq!(fixture.rooms.room_size(5), 1);

    // 旧桌的提交不会再送达
    let api = InProcessApi {
        store: fixture.store.clone(),
        rooms: fixture.rooms.clone(),
    };
    api.replace_ticket(2, &TicketDraft::empty(2))
        .await
        .expect("replace");
    assert!(feed.try_recv().is_none());
}

#[tokio::test]
async fn failed_submit_keeps_local_state_for_manual_retry() {
    let fixture = Fixture::new().await;
    let (mut terminal, _feed) = fixture.terminal();
    terminal.select_table(4).await.expect("select");

    // 数量 0 在存储层被拒绝
    terminal.add_item(TicketItemInput {
        dish_id: None,
        quantity: 1,
        price: 5.0,
        custom_options: Default::default(),
    });
    terminal.increment_item(0);
    terminal.decrement_item(0);
    terminal.decrement_item(0); // 移除该行
    terminal.add_item(TicketItemInput {
        dish_id: None,
        quantity: 0,
        price: 5.0,
        custom_options: Default::default(),
    });

    let err = terminal.submit().await.expect_err("rejected");
    assert!(matches!(
        err,
        comanda_terminal::TerminalError::Api(ApiError::Server(_))
    ));
    // 本地状态原样保留，终端回到可编辑状态
    assert_eq!(terminal.state(), SessionState::Viewing);
    assert_eq!(terminal.session().items().len(), 1);

    // 修正后重试成功
    terminal.remove_item(0);
    terminal.add_item(TicketItemInput {
        dish_id: None,
        quantity: 1,
        price: 5.0,
        custom_options: Default::default(),
    });
    terminal.submit().await.expect("retry");
}
