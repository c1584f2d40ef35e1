//! Tessera node binary
//!
//! Runs a local group-formation simulation.

use tessera_node::{NodeConfig, Simulation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessera=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = NodeConfig::from_env()?;
    tracing::info!(
        factory = %config.factory.address,
        operators = config.simulation.operators,
        groups = config.simulation.groups,
        "Starting Tessera node"
    );

    let report = Simulation::new(config)?.run()?;
    for group in &report.groups {
        tracing::info!(%group, "Formed group");
    }

    Ok(())
}
