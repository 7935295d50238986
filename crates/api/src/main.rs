#[tokio::main]
async fn main() -> anyhow::Result<()> {
    brewhouse_observability::init();

    let addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = brewhouse_api::app::build_app().await;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
