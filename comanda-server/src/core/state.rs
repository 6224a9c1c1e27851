use std::sync::Arc;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::UserRepository;
use crate::rooms::TableRooms;
use crate::tickets::TicketStore;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低；每个请求处理器拿到的都是
/// 同一组服务。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | ticket_store | 每桌打开票据的权威存储 |
/// | rooms | 每进程一份的房间注册表 |
/// | jwt | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    ticket_store: TicketStore,
    rooms: Arc<TableRooms>,
    jwt: Arc<JwtService>,
    shutdown: CancellationToken,
}

impl ServerState {
    /// 初始化所有服务: 连接数据库、跑迁移、播种管理员账号
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Self::with_db(config.clone(), db).await
    }

    /// 用现成的数据库构建状态 (测试用内存库)
    pub async fn with_db(config: Config, db: DbService) -> Result<Self, AppError> {
        let state = Self {
            ticket_store: TicketStore::new(db.pool.clone()),
            rooms: Arc::new(TableRooms::new()),
            jwt: Arc::new(JwtService::new(config.jwt.clone())),
            config: Arc::new(config),
            db,
            shutdown: CancellationToken::new(),
        };
        state.seed_admin_user().await?;
        Ok(state)
    }

    /// 首次启动时播种管理员账号 (users 表为空且配置了密码)
    async fn seed_admin_user(&self) -> Result<(), AppError> {
        let users = UserRepository::new(self.pool());
        if users.count().await? > 0 {
            return Ok(());
        }
        let Some(password) = &self.config.admin_password else {
            tracing::warn!("No users exist and ADMIN_PASSWORD is unset; admin API unusable");
            return Ok(());
        };

        let hash = crate::auth::hash_password(password)
            .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
        users.create(&self.config.admin_username, &hash).await?;
        tracing::info!(username = %self.config.admin_username, "Seeded admin user");
        Ok(())
    }

    pub fn pool(&self) -> SqlitePool {
        self.db.pool.clone()
    }

    pub fn ticket_store(&self) -> &TicketStore {
        &self.ticket_store
    }

    pub fn rooms(&self) -> Arc<TableRooms> {
        self.rooms.clone()
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
