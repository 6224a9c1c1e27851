use comanda_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境与日志
    dotenv::dotenv().ok();
    let config = Config::from_env();
    let _log_guard = init_logger("info", config.log_dir.as_deref())?;

    tracing::info!(environment = %config.environment, "Comanda server starting...");

    // 2. 初始化状态 (数据库、迁移、房间注册表)
    let state = ServerState::initialize(&config).await?;

    // 3. 启动 HTTP + socket.io 服务
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
