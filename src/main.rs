use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use croplot::{
    app::{App, InputEvent, Key},
    config::{AppConfig, ConfigLoader},
    params::Parameters,
    solver::{CropProblem, LpOracle, SolverKind},
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Interactive crop-planning linear program")]
struct Cli {
    /// Path to a YAML config file (built-in defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the interactive screen to a browser
    Serve {
        /// Override the listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Solve once and print the result
    Solve {
        #[command(flatten)]
        params: ParamArgs,

        /// Solver backend (config value when omitted)
        #[arg(long, value_parser = parse_solver)]
        solver: Option<SolverKind>,
    },
    /// Replay key presses without a display and print the last frame as JSON
    Render {
        /// Comma-separated keys, e.g. `up,up,space`
        #[arg(long, value_delimiter = ',')]
        keys: Vec<Key>,
    },
}

#[derive(Debug, Args)]
struct ParamArgs {
    #[arg(long)]
    land: Option<f64>,
    #[arg(long)]
    labor: Option<f64>,
    #[arg(long)]
    wheat_profit: Option<f64>,
    #[arg(long)]
    barley_profit: Option<f64>,
}

impl ParamArgs {
    fn resolve(&self, defaults: &Parameters) -> Result<Parameters> {
        let params = Parameters::new(
            self.land.unwrap_or(defaults.land),
            self.labor.unwrap_or(defaults.labor),
            self.wheat_profit.unwrap_or(defaults.wheat_profit),
            self.barley_profit.unwrap_or(defaults.barley_profit),
        )?;
        Ok(params)
    }
}

fn parse_solver(value: &str) -> Result<SolverKind, String> {
    match value {
        "good_lp" | "good-lp" => Ok(SolverKind::GoodLp),
        "vertex" => Ok(SolverKind::Vertex),
        other => Err(format!("unknown solver '{other}' (expected good_lp or vertex)")),
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ConfigLoader::new(".");
    let config = loader.load_or_default(cli.config.as_deref())?;
    init_tracing(&config.log_filter);
    tracing::info!(
        "Starting {} v{}.",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        None => serve(config, None, None),
        Some(Command::Serve { host, port }) => serve(config, host, port),
        Some(Command::Solve { params, solver }) => {
            let params = params.resolve(&config.initial)?;
            let oracle = solver.unwrap_or(config.solver).build();
            let result = oracle.solve(&CropProblem::from(&params));
            println!("{result}");
            Ok(())
        }
        Some(Command::Render { keys }) => {
            let mut app = App::from_config(&config);
            let events: Vec<InputEvent> = keys.into_iter().map(InputEvent::from).collect();
            app.process(&events);
            let json = serde_json::to_string_pretty(&app.render())?;
            println!("{json}");
            Ok(())
        }
    }
}

fn serve(config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    let app = App::from_config(&config);
    tracing::info!(solver = app.oracle_name(), "frame loop ready");
    runtime.block_on(web::run(WebServerConfig {
        app,
        host: host.unwrap_or(config.server.host),
        port: port.unwrap_or(config.server.port),
    }))
}
