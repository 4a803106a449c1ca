use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pirate_dynamics_rs=info")),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    pirate_dynamics_rs::examples::prova::run(config_path.as_deref())
}
