//! Server state
//!
//! [`ServerState`] holds shared handles for every service: configuration,
//! the database pool, and the external collaborators. Everything is
//! injected here at startup (no component reaches for a global client),
//! so tests can assemble a state around an in-memory pool and doubles.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, RoleResolver};
use crate::core::Config;
use crate::core::event::EventConfig;
use crate::db::DbService;
use crate::services::{EmailService, PaymentsService, StorageService};
use crate::services::wallet::WalletService;

/// Shared server state - cheap to clone, all fields are handles
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub event: Arc<EventConfig>,
    /// SQLite connection pool
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    /// Identity & role resolver (sole reader of `user_roles`)
    pub roles: RoleResolver,
    pub payments: PaymentsService,
    pub email: EmailService,
    pub storage: StorageService,
    pub wallet: WalletService,
}

impl ServerState {
    /// Initialize the full state: work dir layout, database, services
    pub async fn initialize(config: &Config) -> Result<Self, crate::utils::AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| crate::utils::AppError::internal(format!("Work dir setup failed: {e}")))?;

        let db_path = config.database_dir().join("cover.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// Assemble state around an existing pool (tests use this with an
    /// in-memory database)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let roles = RoleResolver::new(pool.clone());
        let payments = PaymentsService::new(&config);
        let email = EmailService::new(&config);
        let storage = StorageService::new(&config);
        let wallet = WalletService::new(config.wallet.clone());

        Self {
            config,
            event: Arc::new(EventConfig::current()),
            pool,
            jwt_service,
            roles,
            payments,
            email,
            storage,
            wallet,
        }
    }
}
