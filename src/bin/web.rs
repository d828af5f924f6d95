use log::{LevelFilter, info};
use packing_list::app;
use packing_list::options::{ReportOptions, ServerConfig};

/// Main entry point for the packing list web application
///
/// Settings come from the environment:
/// * `PACKING_LIST_ADDR` - bind address (default `127.0.0.1:3000`)
/// * `PACKING_LIST_MAX_UPLOAD` - upload limit in bytes
/// * `PACKING_LIST_OPTIONS` - JSON file with report layout options
/// * `PACKING_LIST_LOG` - log filter
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default()
                .filter_or("PACKING_LIST_LOG", "error,packing_list=info,website=info"),
        )
        .init();

    let config = ServerConfig::from_env();

    let options = match &config.options_path {
        Some(path) => {
            info!("Loading report options from {}", path.display());
            ReportOptions::from_json_file(path)
                .map_err(|e| format!("Invalid options file {}: {}", path.display(), e))?
        }
        None => ReportOptions::default(),
    };

    app::run(config, options).await
}
