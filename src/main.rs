use log::info;
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();

    Logger::init_logger(&config);

    info!(
        "Starting clinical scribe API on {}:{}",
        config
            .interface
            .as_deref()
            .unwrap_or("127.0.0.1"),
        config.port
    );

    let app_state = AppState::new(config);

    if let Err(err) = web::init_server(app_state).await {
        eprintln!("Server failed to start: {err}");
        std::process::exit(1);
    }
}
