#[tokio::main]
async fn main() {
    facturo_observability::init();

    let insecure_cookies = std::env::var("FACTURO_INSECURE_COOKIES").is_ok_and(|v| v == "1");
    if insecure_cookies {
        tracing::warn!("cookie transport security disabled; local development only");
    }

    let app = facturo_api::app::build_app(facturo_api::app::AppConfig { insecure_cookies }).await;

    let addr =
        std::env::var("FACTURO_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
