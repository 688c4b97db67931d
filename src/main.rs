use std::fs::File;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use simplelog::{ConfigBuilder, WriteLogger};

use outlet::LogLevel;
use outlet::core::config::{self, CliOverrides, ConfigSource, ResolvedConfig};
use outlet::headless;
use outlet::routes::{self, LoaderSource};
use outlet::routing::RouteTree;
use outlet::tui::view_lines::plain_text;

#[derive(Parser)]
#[command(name = "outlet", about = "Nested route resolution and navigation in the terminal")]
struct Args {
    /// Path to open at startup
    #[arg(short, long)]
    path: Option<String>,

    /// Fetch route data from this API instead of the built-in fixtures
    #[arg(long)]
    api_url: Option<String>,

    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a path, run its loaders and print the composed view
    Render {
        path: String,
        /// Wrap width for the printed view
        #[arg(short, long, default_value_t = 80)]
        width: usize,
    },
    /// Print the registered route tree
    Routes,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, source) = match config::load_config() {
        Ok((c, source)) => (c, Ok(source)),
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            (config::OutletConfig::default(), Err(e))
        }
    };
    let cli = CliOverrides {
        path: args.path.clone(),
        api_url: args.api_url.clone(),
        log_level: args.log_level.map(|l| l.as_str().to_string()),
    };
    let resolved = config::resolve(&file_config, &cli);

    init_logger(&resolved);
    match &source {
        Ok(source @ (ConfigSource::Loaded(_) | ConfigSource::Generated(_))) => {
            info!("Config: {}", source)
        }
        Ok(source) => warn!("Config: {}", source),
        Err(e) => warn!("Config: {}, using defaults", e),
    }
    info!("Outlet starting up: {:?}", resolved);

    let tree = match build_tree(&resolved) {
        Ok(tree) => Arc::new(tree),
        Err(e) => {
            error!("Route registration failed: {}", e);
            eprintln!("Route registration failed: {e}");
            std::process::exit(2);
        }
    };

    match args.command {
        Some(Command::Routes) => {
            print!("{tree}");
            Ok(())
        }
        Some(Command::Render { path, width }) => {
            let navigator = headless::render(tree, &path, resolved.loader_timeout).await;
            println!("{}", plain_text(&navigator.view(), width));
            Ok(())
        }
        None => outlet::tui::run(resolved, tree),
    }
}

fn init_logger(config: &ResolvedConfig) {
    let level = LogLevel::parse(&config.log_level).unwrap_or_else(|| {
        eprintln!("Warning: unknown log level '{}', using debug", config.log_level);
        LogLevel::Debug
    });
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match File::create(&config.log_file) {
        Ok(log_file) => {
            let _ = WriteLogger::init(level.filter(), log_config, log_file);
        }
        Err(e) => eprintln!("Warning: could not open log file {}: {e}", config.log_file),
    }
}

fn build_tree(config: &ResolvedConfig) -> Result<RouteTree, outlet::routing::RegistrationError> {
    let source = match &config.api_url {
        Some(url) => {
            info!("Route loaders fetch from {}", url);
            LoaderSource::http(url)
        }
        None => {
            if !config.fixture_latency.is_zero() {
                warn!("Fixture loaders delayed by {:?}", config.fixture_latency);
            }
            LoaderSource::Fixtures {
                latency: config.fixture_latency,
            }
        }
    };
    routes::tree(&source)
}
