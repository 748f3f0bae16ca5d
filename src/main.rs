//! Demo server showing the dm-logger middleware end to end.
//!
//! - Static files under `/assets` are logged as assets (quieter severities)
//! - `/hello` logs after an await point and from a spawned task, both tagged
//!   with the request's correlation id
//! - `POST /__client-msg-tracking` accepts client log messages

use axum::{Router, extract::State, routing::get};
use dm_logger_rs::{Logger, cli::Cli, context, sink::ConsoleSink};
use std::time::Duration;
use tower_http::services::ServeDir;
use tracing::{Level, info};

async fn index() -> &'static str {
    "dm-logger demo: try /hello or /assets/<file>\n"
}

async fn hello(State(logger): State<Logger>) -> String {
    tokio::time::sleep(Duration::from_millis(20)).await;
    if let Err(err) = logger.info("preparing greeting") {
        tracing::error!("greeting line not logged: {err}");
    }

    let background = logger.clone();
    context::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if let Err(err) = background.notice("greeting delivered") {
            tracing::error!("delivery line not logged: {err}");
        }
    });

    format!(
        "hello from request {}\n",
        context::request_id().unwrap_or_else(|| "-".to_string())
    )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args: Cli = argh::from_env();
    let logger = Logger::builder(args.logger_config())
        .sink(ConsoleSink)
        .build();

    let app = Router::new()
        .route("/", get(index))
        .route("/hello", get(hello))
        .nest_service("/assets", ServeDir::new(&args.static_dir))
        .with_state(logger.clone());
    let app = dm_logger_rs::attach(app, &logger);

    info!("Serving assets from: {:?}", args.static_dir);
    info!("Minimum log level: {}", logger.minimum());
    info!("Server running on: http://{}", args.bind);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app).await.expect("Server error");
}
