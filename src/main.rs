// SPDX-License-Identifier: PMPL-1.0-or-later

//! ts-catalog: inspect, query and convert plugin translation catalogs

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use ts_catalog::config::Settings;
use ts_catalog::diagnostics;
use ts_catalog::report::{self, StatsOutputFormat};
use ts_catalog::{LoadOptions, ResourceFormat, Table};

#[derive(Parser)]
#[command(name = "ts-catalog")]
#[command(version)]
#[command(about = "Read-only translation tables from Qt Linguist TS catalogs")]
#[command(long_about = None)]
struct Cli {
    /// Settings file (default: ./ts-catalog.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one source string
    Lookup {
        /// Catalog resource (.ts or .json)
        #[arg(value_name = "RESOURCE")]
        resource: PathBuf,

        /// Context name, e.g. ConfigDialog
        #[arg(value_name = "CONTEXT")]
        context: String,

        /// Source string to translate
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Disambiguation comment
        #[arg(short, long)]
        comment: Option<String>,

        /// Fail instead of echoing the source when no translation is served
        #[arg(long)]
        strict: bool,
    },

    /// Print per-context translation coverage
    Stats {
        /// Catalog resource (.ts or .json)
        #[arg(value_name = "RESOURCE")]
        resource: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: StatsOutputFormat,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a catalog for load errors and untranslated entries
    Check {
        /// Catalog resource (.ts or .json)
        #[arg(value_name = "RESOURCE")]
        resource: PathBuf,
    },

    /// Rewrite a catalog in another format
    Convert {
        /// Catalog resource (.ts or .json)
        #[arg(value_name = "RESOURCE")]
        resource: PathBuf,

        /// Target format
        #[arg(long, value_enum)]
        to: ResourceFormat,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find the catalog file serving a locale
    Resolve {
        /// Locale such as ja_JP (default: TS_CATALOG_LOCALE, then settings)
        #[arg(value_name = "LOCALE")]
        locale: Option<String>,

        /// Catalog directory
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// File name prefix, e.g. discovery for discovery_ja.ts
        #[arg(short, long)]
        prefix: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::discover(cli.config.as_deref())?;
    let options = settings.load_options();

    match cli.command {
        Commands::Lookup {
            resource,
            context,
            source,
            comment,
            strict,
        } => {
            let table = load_table(&resource, &options)?;
            let comment = comment.as_deref();
            if strict && table.find_disambiguated(&context, &source, comment).is_none() {
                return Err(anyhow!(
                    "no translation for {:?} in context {}",
                    source,
                    context
                ));
            }
            println!("{}", table.lookup_disambiguated(&context, &source, comment));
        }

        Commands::Stats {
            resource,
            format,
            output,
        } => {
            let table = load_table(&resource, &options)?;
            let stats = table.stats();
            match (output, format) {
                (Some(path), format) => {
                    report::save_stats(&stats, format, &path)?;
                    println!("Stats saved to: {}", path.display());
                }
                (None, StatsOutputFormat::Text) => report::print_stats(&stats),
                (None, format) => println!("{}", format.serialize(&stats)?),
            }
        }

        Commands::Check { resource } => {
            diagnostics::run_catalog_check(&resource, &options)?;
        }

        Commands::Convert {
            resource,
            to,
            output,
        } => {
            let table = load_table(&resource, &options)?;
            let rendered = to.write(&table)?;
            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Catalog written to: {}", path.display());
                }
                None => print!("{}", rendered),
            }
        }

        Commands::Resolve {
            locale,
            dir,
            prefix,
        } => {
            let locale = settings.locale(locale.as_deref())?;
            let catalog = settings.catalog_dir(dir.as_deref(), prefix.as_deref());
            match catalog.resolve(&locale)? {
                Some(file) => println!("{}", file.path.display()),
                None => {
                    return Err(anyhow!(
                        "no catalog for {} in {}",
                        locale,
                        catalog.root().display()
                    ))
                }
            }
        }
    }

    Ok(())
}

fn load_table(path: &Path, options: &LoadOptions) -> Result<Table> {
    Table::from_path_with(path, options).with_context(|| format!("loading {}", path.display()))
}

fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries command output
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
