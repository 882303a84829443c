//! CSV episode table writer.
//!
//! One row per completed idle episode. Missing timestamps are empty cells.

use super::{create_parent_dirs, validate_path};
use crate::estimator::CompletedIdleEpisode;
use crate::utils::error::OutputError;
use log::info;
use std::io::Write;
use std::path::Path;

/// Write episodes to a CSV file
///
/// **Public** - columns: cpu, state, state_attempt, wake_src, enter_ts, wake_ts, exit_ts
///
/// # Errors
/// * `OutputError::CsvFailed` - I/O or serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_episodes_csv(
    episodes: &[CompletedIdleEpisode],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} episodes to: {}", episodes.len(), output_path.display());

    validate_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = std::fs::File::create(output_path).map_err(OutputError::WriteFailed)?;
    write_episodes(episodes, file)
}

/// Write episodes as CSV to any writer
pub fn write_episodes(episodes: &[CompletedIdleEpisode], writer: impl Write) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_writer(writer);

    // Header must be present even when there are no rows
    if episodes.is_empty() {
        writer.write_record(EPISODE_COLUMNS)?;
    }
    for episode in episodes {
        writer.serialize(episode)?;
    }

    writer.flush().map_err(OutputError::WriteFailed)?;
    Ok(())
}

const EPISODE_COLUMNS: [&str; 7] = [
    "cpu",
    "state",
    "state_attempt",
    "wake_src",
    "enter_ts",
    "wake_ts",
    "exit_ts",
];
