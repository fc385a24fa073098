use anyhow::Context;
use healthwatch::configuration::get_configuration;
use healthwatch::startup::run;
use healthwatch::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_configuration().context("Failed to read configuration.")?;

    let subscriber = get_subscriber(
        "healthwatch".into(),
        settings.log_level.to_lowercase(),
        std::io::stdout,
    );
    init_subscriber(subscriber)
        .map_err(|err| anyhow::anyhow!("Failed to set subscriber: {}", err))?;

    tracing::info!(
        app_name = %settings.app_name,
        debug = settings.debug,
        log_level = %settings.log_level,
        "Application starting up"
    );

    let address = settings.address();
    let listener =
        TcpListener::bind(&address).with_context(|| format!("failed to bind to {}", address))?;
    tracing::info!("Start server at {:?}", &address);

    run(listener, settings).await?.await?;

    tracing::info!("Application shutting down");
    Ok(())
}
