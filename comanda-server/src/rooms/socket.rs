//! socket.io endpoint for POS terminals
//!
//! 每个 socket 连接在 [`TableRooms`] 注册一个订阅者，并由一个
//! 后台任务把房间事件转发为对该 socket 的 `ticketUpdated` 发射。
//! 路由 (谁在看哪桌) 完全由 TableRooms 负责；socket 层只是传输。

use axum::Router;
use socketioxide::SocketIo;
use socketioxide::extract::{Data, SocketRef};

use crate::core::ServerState;
use shared::message::{
    EVENT_IDENTIFY, EVENT_JOIN_MESA, EVENT_LEAVE_MESA, PosEvent,
};

/// Mount the socket.io layer on the HTTP router
pub fn mount_socket_layer(router: Router, state: ServerState) -> Router {
    let (layer, io) = SocketIo::new_layer();

    io.ns("/", move |socket: SocketRef| {
        let state = state.clone();
        async move { register_terminal(socket, state) }
    });

    router.layer(layer)
}

/// Wire one terminal connection into the room registry
///
/// 事件处理器必须是可克隆的异步闭包，所以每个闭包只捕获 Clone
/// 的句柄 (Arc、Uuid、AbortHandle)，并在 async 块内再克隆一次。
fn register_terminal(socket: SocketRef, state: ServerState) {
    let rooms = state.rooms();
    let mut subscriber = rooms.connect();
    let connection_id = subscriber.id();

    tracing::info!(socket = %socket.id, connection = %connection_id, "POS terminal connected");

    // Forward room events to this socket until either side goes away
    let emitter = socket.clone();
    let forward = tokio::spawn(async move {
        while let Some(event) = subscriber.recv().await {
            let PosEvent::TicketUpdated(view) = &event;
            if emitter.emit(event.event_name(), view).is_err() {
                break;
            }
        }
    })
    .abort_handle();

    let join_rooms = rooms.clone();
    socket.on(EVENT_JOIN_MESA, move |Data::<u32>(table_number)| {
        let rooms = join_rooms.clone();
        async move { rooms.join(connection_id, table_number) }
    });

    let leave_rooms = rooms.clone();
    socket.on(EVENT_LEAVE_MESA, move |Data::<u32>(table_number)| {
        let rooms = leave_rooms.clone();
        async move { rooms.leave(connection_id, table_number) }
    });

    let identify_rooms = rooms.clone();
    socket.on(EVENT_IDENTIFY, move |Data::<String>(display_name)| {
        let rooms = identify_rooms.clone();
        async move { rooms.identify(connection_id, display_name) }
    });

    // Connection close implies leaving every room
    let disconnect_rooms = rooms.clone();
    socket.on_disconnect(move || {
        let rooms = disconnect_rooms.clone();
        let forward = forward.clone();
        async move {
            rooms.disconnect(connection_id);
            forward.abort();
            tracing::info!(connection = %connection_id, "POS terminal disconnected");
        }
    });
}
