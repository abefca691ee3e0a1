use anyhow::Context;

use msstudy_infra::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    msstudy_observability::init();

    let config = Config::from_env().context("invalid configuration")?;
    let app = msstudy_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
