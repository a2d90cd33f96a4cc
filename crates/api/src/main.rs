#[tokio::main]
async fn main() {
    procura_observability::init();

    let config = match std::env::var("PROCURA_DEFAULT_LEVELS") {
        Ok(raw) => procura_engine::WorkflowConfig::parse(&raw)
            .expect("PROCURA_DEFAULT_LEVELS must be a comma-separated list of levels, e.g. \"1,2\""),
        Err(_) => procura_engine::WorkflowConfig::default(),
    };

    let app = procura_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
