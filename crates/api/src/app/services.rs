use std::sync::Arc;

use msstudy_infra::repository::{DemoRepository, InMemoryDemoRepository, PostgresDemoRepository};
use msstudy_infra::{Config, DemoService, RepositoryError, StoreConfig};

/// Everything handlers need, built once at startup and shared via `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub demos: DemoService,
    /// Prefix of the `X-<app>-*` alert headers.
    pub app_name: String,
}

impl AppServices {
    pub fn new(demos: DemoService, app_name: impl Into<String>) -> Self {
        Self {
            demos,
            app_name: app_name.into(),
        }
    }
}

/// Wire repository → service according to `config.store`.
pub async fn build_services(config: &Config) -> Result<AppServices, RepositoryError> {
    let repository: Arc<dyn DemoRepository> = match &config.store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory demo store");
            Arc::new(InMemoryDemoRepository::new())
        }
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            tracing::info!(max_connections, "connecting to postgres demo store");
            let repo = PostgresDemoRepository::connect(database_url, *max_connections).await?;
            repo.ensure_schema().await?;
            Arc::new(repo)
        }
    };

    Ok(AppServices::new(
        DemoService::new(repository),
        config.app_name.clone(),
    ))
}
