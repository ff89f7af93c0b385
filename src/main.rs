//! Entitylink CLI entry point.

use anyhow::Context;
use clap::{Parser, Subcommand};
use entitylink::{Config, Meaning, ResolutionCoordinator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entitylink: identity resolution and KB membership queries.
#[derive(Parser, Debug)]
#[command(name = "entitylink")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the same-as closure of a URI
    Resolve {
        /// URI to resolve
        uri: String,
    },
    /// Resolve many URIs concurrently, one per line on stdin
    Batch,
    /// Classify whether a URI belongs to a configured knowledge base
    Classify {
        /// URI to classify
        uri: String,
    },
    /// Check whether a URI denotes an existing entity
    Check {
        /// URI to check
        uri: String,
    },
    /// Query the class hierarchy for subsumption
    Subclass {
        /// Candidate subclass URI
        sub: String,
        /// Candidate superclass URI
        sup: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path).with_context(|| format!("loading config {path}"))?,
        None => Config::load().context("loading default config")?,
    };
    let coordinator =
        ResolutionCoordinator::from_config(&config).context("building resolution components")?;

    match args.command {
        Command::Resolve { uri } => {
            let set = coordinator.resolve(&uri).await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                for uri in set {
                    println!("{uri}");
                }
            }
        }
        Command::Batch => {
            let uris: Vec<String> = std::io::stdin()
                .lines()
                .collect::<Result<Vec<_>, _>>()
                .context("reading URIs from stdin")?
                .into_iter()
                .filter(|line| !line.trim().is_empty())
                .collect();

            let results = coordinator.resolve_batch(&uris).await;
            for (uri, set) in uris.iter().zip(results) {
                if args.json {
                    println!(
                        "{}",
                        serde_json::to_string(&serde_json::json!({ "uri": uri, "same_as": set }))?
                    );
                } else {
                    println!("{uri} -> {}", set.into_iter().collect::<Vec<_>>().join(" "));
                }
            }
        }
        Command::Classify { uri } => {
            let meaning = coordinator.resolve_meaning(&uri).await;
            let known = coordinator.is_known_kb(&meaning);
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "uri": uri,
                        "known_kb": known,
                        "same_as": meaning.uris(),
                    }))?
                );
            } else {
                println!("{known}");
            }
        }
        Command::Check { uri } => {
            let mut meanings = vec![Meaning::new(&uri)];
            coordinator.check_meanings(&mut meanings).await;
            let existence = meanings[0].existence();
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "uri": uri,
                        "existence": existence,
                    }))?
                );
            } else {
                println!("{existence:?}");
            }
        }
        Command::Subclass { sub, sup } => {
            let verdict = coordinator.is_sub_class_of(&sub, &sup);
            println!("{verdict}");
        }
    }

    Ok(())
}
