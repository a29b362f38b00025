use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::context::DispatchContext;
use crate::demo;
use crate::server::Request;

/// Command-line interface for brrtmvc
///
/// Builds the dispatch context from a configuration file and either lists its
/// routes or pushes one request through it.
#[derive(Parser, Debug)]
#[command(name = "brrtmvc")]
#[command(about = "Annotation-style MVC dispatch engine", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the frozen route table in precedence order
    Routes {
        /// Path to the configuration file (.properties or .toml)
        #[arg(short, long, env = "BRRTMVC_CONFIG")]
        config: PathBuf,

        /// Emit JSON instead of one route per line
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Dispatch one request and print the status line and body
    Call {
        /// Path to the configuration file (.properties or .toml)
        #[arg(short, long, env = "BRRTMVC_CONFIG")]
        config: PathBuf,

        /// Request path with optional query string, e.g. `/app/add?a=2&b=3`
        target: String,

        /// Context prefix carried by the request
        #[arg(long)]
        context_path: Option<String>,

        /// Correlation id (ULID) for the request; a new one is generated when absent or invalid
        #[arg(long)]
        request_id: Option<String>,
    },
}

/// Execute `cli`, writing command output to `out`.
///
/// # Errors
///
/// Startup failures and output write errors.
pub fn run_cli(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    demo::ensure_linked();

    match cli.command {
        Commands::Routes { config, json } => {
            let ctx = load(&config)?;
            let routes = ctx.table().routes();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&routes)?)?;
            } else {
                for route in &routes {
                    writeln!(out, "{}  ->  {}  [{}]", route.pattern, route.method, route.bean)?;
                }
            }
        }
        Commands::Call {
            config,
            target,
            context_path,
            request_id,
        } => {
            let ctx = load(&config)?;
            let mut req = Request::from_uri(&target).with_supplied_id(request_id.as_deref());
            debug!(request_id = %req.id(), target = %target, "Dispatching CLI request");
            if let Some(context_path) = context_path {
                req = req.with_context_path(context_path);
            }
            let (resp, _outcome) = ctx.serve(&req);
            writeln!(out, "{}", resp.status())?;
            writeln!(out, "{}", resp.body())?;
        }
    }
    Ok(())
}

fn load(config: &Path) -> anyhow::Result<DispatchContext> {
    DispatchContext::from_config_file(config)
        .with_context(|| format!("failed to start from {}", config.display()))
}
