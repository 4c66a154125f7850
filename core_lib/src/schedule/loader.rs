use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::models::ScheduleDocument;
use super::talk::Talk;
use crate::error::{AppError, Result};

fn source_prefix(source: Option<&Path>) -> String {
    source
        .map(|path| format!("{}: ", path.display()))
        .unwrap_or_default()
}

/// Parses schedule YAML into a document. Only shape and types are checked.
pub fn parse_schedule_str(text: &str, source: Option<&Path>) -> Result<ScheduleDocument> {
    if text.trim().is_empty() {
        return Ok(ScheduleDocument::Flat(Vec::new()));
    }

    serde_yaml::from_str::<serde_yaml::Value>(text)
        .and_then(ScheduleDocument::from_value)
        .map_err(|err| {
            AppError::Schedule(format!("{}schedule is invalid\n{}", source_prefix(source), err))
        })
}

/// Parses schedule YAML and applies every entry rule, returning the parsed document.
pub fn validate_schedule_str(text: &str, source: Option<&Path>) -> Result<ScheduleDocument> {
    let document = parse_schedule_str(text, source)?;

    let result = document.validate();
    if !result.is_valid {
        return Err(AppError::Schedule(format!(
            "{}schedule is invalid\n{}",
            source_prefix(source),
            result.summary()
        )));
    }

    Ok(document)
}

pub fn validate_schedule_file(path: &Path) -> Result<ScheduleDocument> {
    let text = std::fs::read_to_string(path)?;
    validate_schedule_str(&text, Some(path))
}

/// The first candidate path that exists.
pub fn find_schedule(paths: &[PathBuf]) -> Option<&Path> {
    paths.iter().map(PathBuf::as_path).find(|path| path.exists())
}

/// Reads the first existing schedule file.
///
/// Entries that break a rule are kept and reported with a warning; only a
/// file that does not parse is an error.
pub fn read_schedule_document(paths: &[PathBuf]) -> Result<Option<ScheduleDocument>> {
    let Some(path) = find_schedule(paths) else {
        debug!("No schedule file found");
        return Ok(None);
    };

    let text = std::fs::read_to_string(path)?;
    let document = parse_schedule_str(&text, Some(path))?;

    let result = document.validate();
    if !result.is_valid {
        warn!(
            path = %path.display(),
            "Schedule has entries that fail validation, rendering them anyway:\n{}",
            result.summary()
        );
    }

    info!(path = %path.display(), entries = document.entries().len(), "Loaded schedule");
    Ok(Some(document))
}

/// Loads talks from the first existing schedule file; none found means none scheduled.
pub fn load_schedule(paths: &[PathBuf]) -> Result<Vec<Talk>> {
    let talks = read_schedule_document(paths)?
        .map(|document| document.entries().into_iter().map(Talk::from_entry).collect())
        .unwrap_or_default();
    Ok(talks)
}
