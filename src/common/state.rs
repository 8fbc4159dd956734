// Application state shared across all modules

use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;

use super::config::AppConfig;
use crate::auth::{AuthProviderRepository, AuthService, TokenManager};
use crate::gardens::{GardenRepository, GardenStore, UserPlantRepository, UserPlantStore};
use crate::plants::{PlantRepository, PlantsService};
use crate::services::PerenualClient;
use crate::users::{UserStore, UsersRepository};

/// Read-only after startup; shared as `Extension<Arc<AppState>>`
pub struct AppState {
    pub config: AppConfig,
    pub tokens: Arc<TokenManager>,
    pub auth: Arc<AuthService>,
    pub users: Arc<dyn UserStore>,
    pub gardens: Arc<dyn GardenStore>,
    pub user_plants: Arc<dyn UserPlantStore>,
    pub plants: Arc<PlantsService>,
}

impl AppState {
    /// Wire the Postgres repositories and external clients
    pub fn new(config: AppConfig, db: PgPool) -> Self {
        let tokens = Arc::new(TokenManager::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
        ));

        let users: Arc<dyn UserStore> = Arc::new(UsersRepository::new(db.clone()));
        let auth = Arc::new(AuthService::new(
            users.clone(),
            Arc::new(AuthProviderRepository::new(db.clone())),
            tokens.clone(),
            config.bcrypt_cost,
        ));
        let plants = Arc::new(PlantsService::new(
            Arc::new(PlantRepository::new(db.clone())),
            Arc::new(PerenualClient::new(
                &config.perenual_base_url,
                &config.perenual_api_key,
            )),
        ));

        Self {
            tokens,
            auth,
            users,
            gardens: Arc::new(GardenRepository::new(db.clone())),
            user_plants: Arc::new(UserPlantRepository::new(db)),
            plants,
            config,
        }
    }
}
