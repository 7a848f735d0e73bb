//! Application state for medstore-server

use sqlx::PgPool;

use crate::config::Config;
use crate::db;
use crate::util::hash_password;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for admin authentication
    pub jwt_secret: String,
    /// Environment: development | staging | production
    pub environment: String,
    /// OpenAI API key for chat augmentation (optional)
    pub openai_api_key: Option<String>,
    /// Reusable HTTP client for outbound calls
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Create a new AppState: connect the pool, run migrations, bootstrap
    /// the initial admin account when configured and the table is empty.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
            if db::admin_users::count(&pool).await? == 0 {
                let hashed = hash_password(password)?;
                db::admin_users::create(&pool, email, &hashed, "Store Admin", "admin").await?;
                tracing::info!(email = %email, "Bootstrapped initial admin account");
            }
        }

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            environment: config.environment.clone(),
            openai_api_key: config.openai_api_key.clone(),
            http_client: reqwest::Client::new(),
        })
    }

    /// Whether cookies should carry the Secure attribute
    pub fn secure_cookies(&self) -> bool {
        self.environment == "production"
    }
}
