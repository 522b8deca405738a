use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use autoclaim_connector::config::AppConfig;
use autoclaim_connector::console::run_console;
use autoclaim_connector::dispatch::DispatchRegistry;
use autoclaim_connector::relay::NotarizeRelay;
use autoclaim_connector::report::{run_report, ReportOptions};
use autoclaim_connector::summarizer::{HttpFunctionInvoker, SummaryService};
use autoclaim_connector::web_server::{WebServer, WebState};
use autoclaim_protocol::Role;
use autoclaim_state::{Fixtures, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "autoclaim-connector", version, about = "AutoClaim accident claim services")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address for the HTTP API.
    #[arg(long)]
    bind: Option<String>,

    /// Upstream notarize service URL.
    #[arg(long)]
    notarize_url: Option<String>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the proxy routes and dashboard API (default).
    Serve,
    /// Open a stakeholder dashboard in the terminal.
    Console {
        #[arg(long, default_value = "claimer")]
        role: Role,
    },
    /// File an accident report through the guided wizard.
    Report {
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        transcript: Option<String>,
        /// Video file name. Repeat for more than one.
        #[arg(long = "video")]
        videos: Vec<String>,
        /// Incident latitude. Defaults to the map center.
        #[arg(long, allow_negative_numbers = true, requires = "lng")]
        lat: Option<f64>,
        /// Incident longitude.
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lng: Option<f64>,
        /// Skip the summarize and notarize services.
        #[arg(long)]
        offline: bool,
        /// Return right after submission instead of following dispatch.
        #[arg(long)]
        no_follow: bool,
    },
}

fn init_logging(level: &str, console: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if console {
        // The console owns the terminal; its own log panel shows actions.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn dispatch_registry(config: &AppConfig) -> DispatchRegistry {
    DispatchRegistry::new(
        Arc::new(SystemClock::new()),
        Duration::from_millis(config.dispatch.tick_ms),
        config.dispatch.dwell_secs,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);
    init_logging(&cli.log_level, matches!(command, Command::Console { .. }));

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(url) = cli.notarize_url {
        config.notarize_url = url;
    }
    tracing::debug!(?config, "Configuration loaded");

    match command {
        Command::Serve => {
            let invoker = HttpFunctionInvoker::from_config(&config.function);
            let state = WebState {
                fixtures: Arc::new(Fixtures::demo()),
                relay: NotarizeRelay::new(config.notarize_url.clone()),
                summaries: SummaryService::new(Arc::new(invoker), config.function.name.clone()),
                dispatch: dispatch_registry(&config),
            };
            WebServer::new(config.bind_addr.clone(), state).run().await?;
        }
        Command::Console { role } => {
            run_console(role, &Fixtures::demo(), dispatch_registry(&config)).await?;
        }
        Command::Report {
            description,
            transcript,
            videos,
            lat,
            lng,
            offline,
            no_follow,
        } => {
            let opts = ReportOptions {
                description,
                transcript,
                videos,
                location: lat.zip(lng),
                offline,
                follow_dispatch: !no_follow,
            };
            run_report(&config, opts).await?;
        }
    }
    Ok(())
}
