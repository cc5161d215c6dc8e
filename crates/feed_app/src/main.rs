mod app;
mod config;
mod effects;
mod logging;
mod ui;

use std::path::PathBuf;

use feed_logging::feed_warn;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::CONFIG_FILENAME));

    let loaded = config::load_config(&path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => config::AppConfig::default(),
    };

    logging::initialize(
        config.log_destination,
        feed_logging::parse_level(&config.log_level),
    );
    if let Err(err) = loaded {
        feed_warn!("Ignoring config {:?}: {}", path, err);
    }

    app::run_app(config)
}
