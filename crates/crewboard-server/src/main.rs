use tracing_subscriber::EnvFilter;

use crewboard_server::build_app;
use crewboard_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::load();
    config.validate();

    let addr = config.listen_addr.clone();
    let (app, state) = build_app(config);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, "failed to bind listener: {e}");
            std::process::exit(1);
        },
    };

    tracing::info!(
        %addr,
        agents = state.config.roster.len(),
        assignment = state.config.tasks.allow_assignment,
        "crewboard server listening"
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
