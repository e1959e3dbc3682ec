mod commands;
mod config;
mod context;
mod diff;
mod logging;
mod output;
mod plan;
mod traits;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{
    ExportCommand, ModulesCommand, OutputFormat, ServeCommand, ShowCommand, SummaryCommand,
};
use config::{ConfigLoader, ViewConfig};
use context::Context;
use diff::DiffRenderOptions;
use std::io::IsTerminal;
use std::net::IpAddr;
use std::path::PathBuf;
use traits::{Output, RealFileSystem, TerminalOutput};

#[derive(Parser)]
#[command(name = "tfsummary")]
#[command(about = "TF Summary - Review Terraform plan exports as filterable before/after diffs", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ~/.tfsummary/config.yaml)
    #[arg(long, global = true, env = "TFSUMMARY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Which resource changes to show
#[derive(Args)]
struct FilterArgs {
    /// Only show resources with this action (repeatable or comma separated:
    /// no-op, read, create, update, delete)
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    actions: Vec<String>,

    /// Only show resources whose address contains this text (case-insensitive)
    #[arg(long, value_name = "QUERY")]
    address: Option<String>,
}

/// How attribute changes are displayed
#[derive(Args)]
struct RenderArgs {
    /// Also show attributes that do not change
    #[arg(long)]
    show_unchanged: bool,

    /// Show values marked sensitive instead of masking them
    #[arg(long)]
    show_sensitive: bool,

    /// Show old and new values in two columns
    #[arg(long)]
    side_by_side: bool,

    /// No blank line between resources
    #[arg(long)]
    compact: bool,

    /// Disable colored output (also disabled by NO_COLOR)
    #[arg(long)]
    no_color: bool,

    /// Truncate values longer than this many characters
    #[arg(long, value_name = "CHARS")]
    max_value_width: Option<usize>,
}

impl RenderArgs {
    fn options(&self, view: &ViewConfig) -> DiffRenderOptions {
        let terminal_width = terminal_size::terminal_size()
            .map(|(terminal_size::Width(width), _)| width as usize)
            .unwrap_or(100);

        DiffRenderOptions {
            show_unchanged: self.show_unchanged || view.show_unchanged,
            compact_mode: self.compact,
            side_by_side: self.side_by_side,
            max_value_width: self.max_value_width.unwrap_or(view.max_value_width),
            show_sensitive: self.show_sensitive || view.show_sensitive,
            color: !self.no_color
                && std::env::var_os("NO_COLOR").is_none()
                && std::io::stdout().is_terminal(),
            terminal_width,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the classified, normalized diff of a plan
    Show {
        /// Plan JSON: a file path, `-` for stdin, or an http(s) URL
        source: String,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        render: RenderArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print resource counts per change category
    Summary {
        /// Plan JSON: a file path, `-` for stdin, or an http(s) URL
        source: String,
    },

    /// Print the planned module tree
    Modules {
        /// Plan JSON: a file path, `-` for stdin, or an http(s) URL
        source: String,

        /// List the resources of each module
        #[arg(long)]
        resources: bool,
    },

    /// Write a self-contained HTML review page
    Export {
        /// Plan JSON: a file path, `-` for stdin, or an http(s) URL
        source: String,

        /// Output HTML file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Start the browser review UI
    Serve {
        /// Plan to load on startup
        #[arg(long)]
        plan: Option<String>,

        /// Address to bind (defaults to the configured host)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() {
    if let Err(err) = run() {
        TerminalOutput.error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose)?;

    let config = ConfigLoader::new(&RealFileSystem).load(cli.config.as_deref())?;
    let ctx = Context::new(config);

    match cli.command {
        Commands::Show {
            source,
            filter,
            render,
            format,
        } => {
            let plan_filter =
                commands::build_filter(&ctx, &filter.actions, filter.address.as_deref())?;
            let options = render.options(&ctx.config.view);
            ShowCommand::execute(&ctx, &source, &plan_filter, &options, format)?;
        }
        Commands::Summary { source } => {
            SummaryCommand::execute(&ctx, &source)?;
        }
        Commands::Modules { source, resources } => {
            ModulesCommand::execute(&ctx, &source, resources)?;
        }
        Commands::Export {
            source,
            output,
            filter,
            render,
        } => {
            let plan_filter =
                commands::build_filter(&ctx, &filter.actions, filter.address.as_deref())?;
            let options = render.options(&ctx.config.view);
            ExportCommand::execute(&ctx, &source, &output, &plan_filter, &options)?;
        }
        Commands::Serve { plan, host, port } => {
            let mut server = ctx.config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            ServeCommand::execute(&ctx, plan.as_deref(), server.socket_addr())?;
        }
    }

    Ok(())
}
