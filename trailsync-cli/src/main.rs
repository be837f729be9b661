//! trailsync CLI - Command-line interface
//!
//! Runs the collection publish pipeline and the track indexer against the
//! services named in the configuration file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::sync::EventSource;
use error::CliError;

#[derive(Parser)]
#[command(name = "trailsync")]
#[command(version = trailsync::VERSION)]
#[command(about = "Collection geometry and search-cache synchronization", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.trailsync/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the publish pipeline for one collection
    SyncCollection(SyncArgs),

    /// Write the search document of one track
    IndexTrack {
        #[arg(long)]
        track_id: String,

        /// Publishing user; only project members are processed
        #[arg(long)]
        user_id: String,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args)]
struct SyncArgs {
    /// Webhook body file, or '-' to read stdin
    #[arg(long, conflicts_with_all = ["collection_id", "user_id"])]
    event: Option<String>,

    #[arg(long, requires = "user_id")]
    collection_id: Option<String>,

    /// Publishing user; only project members are processed
    #[arg(long, requires = "collection_id")]
    user_id: Option<String>,
}

impl SyncArgs {
    fn into_source(self) -> Result<EventSource, CliError> {
        match (self.event, self.collection_id, self.user_id) {
            (Some(location), _, _) => Ok(EventSource::Webhook(location)),
            (None, Some(collection_id), Some(user_id)) => Ok(EventSource::Direct {
                collection_id,
                user_id,
            }),
            _ => Err(CliError::Config(
                "either --event or --collection-id with --user-id is required".to_string(),
            )),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::SyncCollection(args) => match args.into_source() {
            Ok(source) => commands::sync::run(config_path, source).await,
            Err(e) => Err(e),
        },
        Commands::IndexTrack { track_id, user_id } => {
            commands::track::run(config_path, &track_id, &user_id).await
        }
        Commands::Config(command) => commands::config::run(command, config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("trailsync").chain(args.iter().copied()))
    }

    #[test]
    fn test_sync_from_event_file() {
        let cli = parse(&["sync-collection", "--event", "-"]).unwrap();
        let Commands::SyncCollection(args) = cli.command else {
            panic!("expected sync-collection");
        };
        assert!(matches!(args.into_source(), Ok(EventSource::Webhook(l)) if l == "-"));
    }

    #[test]
    fn test_sync_direct_requires_both_ids() {
        assert!(parse(&["sync-collection", "--collection-id", "c1"]).is_err());
        let cli = parse(&[
            "--config",
            "/tmp/trailsync.ini",
            "sync-collection",
            "--collection-id",
            "c1",
            "--user-id",
            "u1",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/trailsync.ini")));
        let Commands::SyncCollection(args) = cli.command else {
            panic!("expected sync-collection");
        };
        assert!(matches!(
            args.into_source(),
            Ok(EventSource::Direct { collection_id, user_id }) if collection_id == "c1" && user_id == "u1"
        ));
    }

    #[test]
    fn test_sync_event_conflicts_with_ids() {
        assert!(parse(&["sync-collection", "--event", "e.json", "--collection-id", "c1"]).is_err());
    }

    #[test]
    fn test_sync_without_source_is_config_error() {
        let cli = parse(&["sync-collection"]).unwrap();
        let Commands::SyncCollection(args) = cli.command else {
            panic!("expected sync-collection");
        };
        assert!(matches!(args.into_source(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = parse(&["config", "show", "--config", "custom.ini"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.ini")));
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }
}
