use clap::Parser;
use live_quiz::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "live_quiz=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    if let Err(e) = live_quiz::server::run(config).await {
        tracing::error!("{}", e);
        eprintln!("Error running server: {}", e);
        std::process::exit(1);
    }
}
