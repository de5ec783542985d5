use booking_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    setup_environment()?;

    print_banner();

    tracing::info!("Booking server starting...");

    // 2. Configuration
    let config = Config::from_env()?;

    // 3. State (database, seed admin, collaborators)
    let state = ServerState::initialize(config).await?;

    // 4. HTTP server
    let server = Server::with_state(state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
