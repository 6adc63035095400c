//! Taglens CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Export list for everything tagged `focus`, plus one hop of dependencies
//! taglens list --tag focus
//!
//! # Hand-picked list, two hops, with statistics, written to a file
//! taglens list --from picked.txt --depth 2 --stats -o context.txt
//!
//! # Tag coverage of the whole codebase
//! taglens tags
//!
//! # Rename a module across the files carrying it
//! taglens edit -t dev:feature:shield -D dev:feature:shield -a '#dev{feature[guard]}'
//!
//! # Who imports the shield package?
//! taglens importers shield
//! ```
//!
//! # Configuration
//!
//! Defaults, then `~/.config/taglens/config.toml`, then `<root>/.taglens.toml`,
//! then `TAGLENS_*` environment variables.

use taglens::{
    LensError,
    cli::{Cli, Commands},
    commands::{self, Workspace, edit::EditRequest, list::ListOptions},
    config::LensConfig,
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

type Result<T> = std::result::Result<T, LensError>;

/// Log to stderr; `RUST_LOG` wins, otherwise DEBUG with `--verbose` and WARN without
fn init_tracing(verbose: bool) {
    let default = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let config = LensConfig::load(&cli.root)?;
    let quiet = cli.quiet || config.quiet;

    if let Commands::Config { command } = &cli.command {
        return commands::config(command, &cli.root, &config, quiet);
    }

    let mut ws = Workspace::open(&cli.root, config)?;

    match &cli.command {
        Commands::List {
            selection,
            no_expand,
            depth,
            stats,
            format,
            output,
        } => {
            let options = ListOptions {
                no_expand: *no_expand,
                depth: *depth,
                stats: *stats,
                format: *format,
                output: output.as_deref(),
            };
            commands::list(&ws, selection, &options, quiet)
        }
        Commands::Tags { selection } => commands::tags(&ws, selection, quiet),
        Commands::Edit {
            selection,
            add,
            delete,
            dry_run,
            yes,
        } => {
            let request = EditRequest {
                add,
                delete,
                dry_run: *dry_run,
                yes: *yes,
            };
            commands::edit(&mut ws, selection, &request, quiet)
        }
        Commands::Importers { package } => commands::importers(&ws, package, quiet),
        Commands::Config { .. } => Ok(()),
    }
}
