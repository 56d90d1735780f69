//! ngsync CLI: synchronize N-Triples files into a named graph.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use ngsync::audit::AuditLog;
use ngsync::config::SyncConfig;
use ngsync::error::ConfigError;
use ngsync::graph::ntriples::{read_ntriples_file, write_ntriples};
use ngsync::graph::{Scope, TripleSet};
use ngsync::paths::SyncPaths;
use ngsync::store::{GraphStore, HttpStore, MemoryStore};
use ngsync::sync::{GraphSync, Preview, SyncReport};

#[derive(Parser)]
#[command(name = "ngsync", version, about = "Named-graph synchronization for SPARQL stores")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/ngsync/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use a local oxigraph store instead of the remote API.
    /// Bare `--local` opens $XDG_DATA_HOME/ngsync/oxigraph.
    #[arg(long, global = true, value_name = "DIR", num_args = 0..=1, require_equals = true)]
    local: Option<Option<PathBuf>>,

    /// Set logging level to DEBUG.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync an N-Triples file into a named graph.
    Sync {
        /// Named graph IRI.
        #[arg(long)]
        graph: String,

        /// Desired triples (N-Triples).
        #[arg(long)]
        input: PathBuf,

        /// Only replace facts of the subjects present in the input.
        #[arg(long)]
        scoped: bool,

        /// Triples to retract regardless of the diff (N-Triples, scoped only).
        #[arg(long, requires = "scoped")]
        removals: Option<PathBuf>,

        /// Triples per store request.
        #[arg(long)]
        batch_size: Option<usize>,

        /// Print the plan without writing.
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Dump the input before syncing ($XDG_CACHE_HOME/ngsync/audit unless
        /// `sync.audit_dir` is set).
        #[arg(long)]
        audit: bool,
    },

    /// Dump a named graph as N-Triples.
    Fetch {
        /// Named graph IRI.
        #[arg(long)]
        graph: String,

        /// Output file (default: stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show what a sync would change.
    Diff {
        /// Named graph IRI.
        #[arg(long)]
        graph: String,

        /// Desired triples (N-Triples).
        #[arg(long)]
        input: PathBuf,

        /// Plan with the subject-scoped policy.
        #[arg(long)]
        scoped: bool,

        /// Explicit removals (N-Triples, scoped only).
        #[arg(long, requires = "scoped")]
        removals: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let paths = SyncPaths::resolve().ok();
    let mut config = match (&cli.config, &paths) {
        (Some(path), _) => SyncConfig::load(path)?,
        (None, Some(paths)) => SyncConfig::load_or_default(&paths.config_file())?,
        (None, None) => SyncConfig::default(),
    };
    config.apply_process_env()?;

    let local = local_store_dir(cli.local, paths.as_ref())?;
    let store = open_store(&config, local.as_deref())?;
    tracing::debug!(store = store.name(), "store ready");

    match cli.command {
        Commands::Sync {
            graph,
            input,
            scoped,
            removals,
            batch_size,
            dry_run,
            json,
            audit,
        } => {
            if let Some(size) = batch_size {
                config.sync.batch_size = size;
            }
            let scope = Scope::new(graph)?;
            let desired = read_ntriples_file(&input)?;
            let removals = read_optional(removals.as_deref())?;
            let sync = GraphSync::from_settings(store, &config.sync)?;

            if dry_run {
                let preview = if scoped {
                    sync.preview_scoped(&scope, &desired, &removals)?
                } else {
                    sync.preview_full(&scope, &desired)?
                };
                print_preview(&preview);
                return Ok(());
            }

            if let Some(dir) = audit_dir(config.sync.audit_dir.as_deref(), audit, paths.as_ref()) {
                AuditLog::new(dir).write_or_warn(&audit_prefix(&input), &desired);
            }

            let report = if scoped {
                sync.sync_scoped(&scope, &desired, &removals)?
            } else {
                sync.sync_full(&scope, &desired)?
            };
            print_report(&report, json)?;
            if !report.failed_batches.is_empty() {
                miette::bail!(
                    "{} batch(es) failed; the store is partially updated",
                    report.failed_batches.len()
                );
            }
        }

        Commands::Fetch { graph, output } => {
            let scope = Scope::new(graph)?;
            let triples = store.fetch_all(&scope)?;
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path).into_diagnostic()?;
                    write_ntriples(std::io::BufWriter::new(file), &triples)?;
                    eprintln!("Wrote {} triples to {}", triples.len(), path.display());
                }
                None => write_ntriples(std::io::stdout().lock(), &triples)?,
            }
        }

        Commands::Diff {
            graph,
            input,
            scoped,
            removals,
        } => {
            let scope = Scope::new(graph)?;
            let desired = read_ntriples_file(&input)?;
            let removals = read_optional(removals.as_deref())?;
            let sync = GraphSync::from_settings(store, &config.sync)?;
            let preview = if scoped {
                sync.preview_scoped(&scope, &desired, &removals)?
            } else {
                sync.preview_full(&scope, &desired)?
            };
            print_preview(&preview);
        }
    }

    Ok(())
}

/// `--local=DIR` as given, bare `--local` as the XDG data location.
fn local_store_dir(
    local: Option<Option<PathBuf>>,
    paths: Option<&SyncPaths>,
) -> Result<Option<PathBuf>> {
    match local {
        None => Ok(None),
        Some(Some(dir)) => Ok(Some(dir)),
        Some(None) => match paths {
            Some(paths) => Ok(Some(paths.local_store_dir())),
            None => Err(ConfigError::NoHome.into()),
        },
    }
}

/// Configured audit directory, else the XDG cache location when `--audit` is set.
fn audit_dir(
    configured: Option<&Path>,
    requested: bool,
    paths: Option<&SyncPaths>,
) -> Option<PathBuf> {
    match configured {
        Some(dir) => Some(dir.to_path_buf()),
        None if requested => paths.map(SyncPaths::audit_dir),
        None => None,
    }
}

fn open_store(config: &SyncConfig, local: Option<&Path>) -> Result<Box<dyn GraphStore>> {
    match local {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "opening local store");
            Ok(Box::new(MemoryStore::open(dir)?))
        }
        None => {
            let store = HttpStore::new(config.http_store()?);
            tracing::debug!(
                query = %store.config().query_endpoint,
                update = %store.config().update_endpoint,
                "using remote store"
            );
            Ok(Box::new(store))
        }
    }
}

fn read_optional(path: Option<&Path>) -> Result<TripleSet> {
    match path {
        Some(path) => Ok(read_ntriples_file(path)?),
        None => Ok(TripleSet::new()),
    }
}

/// Dump file prefix taken from the input file stem.
fn audit_prefix(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ngsync".into())
}

fn print_preview(preview: &Preview) {
    let plan = &preview.plan;
    println!("{plan}");
    if preview.fetch_degraded {
        println!("  warning: existing triples could not be fetched; plan assumes an empty graph");
    }
    for triple in plan.to_add.to_sorted_vec() {
        println!("+ {triple}");
    }
    for triple in plan.to_remove.to_sorted_vec() {
        println!("- {triple}");
    }
}

fn print_report(report: &SyncReport, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).into_diagnostic()?
        );
        return Ok(());
    }
    println!("Synced {} ({})", report.scope, report.policy);
    println!("  added:   {} / {}", report.added, report.planned_add);
    println!("  removed: {} / {}", report.removed, report.planned_remove);
    if report.fetch_degraded {
        println!("  warning: existing triples could not be fetched; nothing was removed");
    }
    for failure in &report.failed_batches {
        println!(
            "  failed {} batch #{} ({} triples): {}",
            failure.op, failure.index, failure.size, failure.message
        );
    }
    Ok(())
}
