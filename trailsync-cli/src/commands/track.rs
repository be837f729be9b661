//! Track command - write one track's search document.

use std::path::Path;

use trailsync::client::{content_repository, search_client, AsyncReqwestClient};
use trailsync::search::{IndexOutcome, TrackIndexer};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the index-track command.
pub async fn run(config_path: Option<&Path>, track_id: &str, user_id: &str) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("index-track");
    let config = runner.config();

    let http = AsyncReqwestClient::with_timeout(config.http.timeout)?;
    let content = content_repository(config, http.clone())?;
    let index = search_client(config, http)?;

    match TrackIndexer::new(&content, &index)
        .index(track_id, Some(user_id))
        .await?
    {
        IndexOutcome::Skipped(reason) => println!("Skipped track {}: {}", track_id, reason),
        IndexOutcome::Indexed { object_id } => {
            println!("✓ Indexed track {} as {}", track_id, object_id)
        }
    }
    Ok(())
}
