//! Sync command - run the collection publish pipeline once.

use std::io::Read;
use std::path::Path;

use trailsync::asset::{AssetReport, StaleCleanup};
use trailsync::client::ServiceClients;
use trailsync::geo::BoundingBox;
use trailsync::pipeline::{CollectionPipeline, PipelineOutcome, PublishEvent, PublishReport};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Where the publish event comes from.
pub enum EventSource {
    /// Webhook body in a file, or `-` for stdin
    Webhook(String),
    Direct {
        collection_id: String,
        user_id: String,
    },
}

/// Run the sync-collection command.
pub async fn run(config_path: Option<&Path>, source: EventSource) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("sync-collection");

    let event = match source {
        EventSource::Webhook(location) => PublishEvent::from_webhook(&read_event(&location)?)?,
        EventSource::Direct {
            collection_id,
            user_id,
        } => PublishEvent::new(collection_id, Some(user_id)),
    };

    let clients = ServiceClients::from_config(runner.config())?;
    let pipeline = CollectionPipeline::new(
        &clients.content,
        &clients.renderer,
        &clients.features,
        &clients.search,
    );

    match pipeline.handle(&event).await? {
        PipelineOutcome::Skipped(reason) => {
            println!("Skipped collection {}: {}", event.id, reason);
        }
        PipelineOutcome::Published(report) => print_report(&report),
    }
    Ok(())
}

fn read_event(location: &str) -> Result<String, CliError> {
    let read_error = |error| CliError::EventRead {
        source: location.to_string(),
        error,
    };

    if location == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .map_err(read_error)?;
        Ok(body)
    } else {
        std::fs::read_to_string(location).map_err(read_error)
    }
}

fn print_report(report: &PublishReport) {
    println!("✓ Published collection {}", report.collection_id);

    if let Some(tracks) = &report.tracks {
        println!();
        println!("Tracks");
        println!("  Bounds:   {}", format_bounds(&tracks.bounds));
        println!("  Features: {}", tracks.features);
        if !tracks.skipped_tracks.is_empty() {
            println!("  Skipped (no geometry): {}", tracks.skipped_tracks.join(", "));
        }
        let upserted: Vec<String> = tracks
            .cache
            .upserted
            .iter()
            .map(|(category, count)| format!("{} ({})", category, count))
            .collect();
        if upserted.is_empty() {
            println!("  Cache:    (none)");
        } else {
            println!("  Cache:    {}", upserted.join(", "));
        }
        print_asset(&tracks.asset);
    }

    if let Some(subs) = &report.sub_collections {
        println!();
        println!("Sub-collections");
        println!("  Bounds:   {}", format_bounds(&subs.bounds));
        println!("  Features: {}", subs.features);
        print_asset(&subs.asset);
    }

    let states: Vec<String> = report.states.iter().map(|s| s.to_string()).collect();
    println!();
    println!("States: {}", states.join(" -> "));
}

fn print_asset(report: &AssetReport) {
    println!("  Preview:  {}", report.asset.id);
    match &report.stale {
        StaleCleanup::NotPresent => {}
        StaleCleanup::Deleted(asset) => println!("  Replaced: {}", asset.id),
        StaleCleanup::Failed { asset, error } => {
            println!("  Warning: previous preview {} was not deleted: {}", asset.id, error)
        }
    }
}

fn format_bounds(bounds: &BoundingBox) -> String {
    format!(
        "[{}, {}] to [{}, {}]",
        bounds.min.latitude, bounds.min.longitude, bounds.max.latitude, bounds.max.longitude
    )
}
