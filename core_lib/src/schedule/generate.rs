//! Markdown pages for scheduled talks that have no hand-written page

use chrono::NaiveDate;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::models::{SpeakerEntry, TalkEntry};
use crate::error::Result;

const NO_ABSTRACT: &str = "Details coming soon.";
const NO_OUTLINE: &str = "- Session outline will be published soon.";
const NO_RESOURCES: &str = "Resources will be posted after the session.";
const NO_RECORDING: &str = "Recording will be shared once available.";
const TBA: &str = "TBA";

/// A page written by [`generate_missing_talk_pages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    /// Site-relative source path, `talks/<slug>.md`.
    pub src_path: String,
    pub path: PathBuf,
}

fn insert_str(front: &mut Mapping, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        front.insert(Value::from(key), Value::from(value));
    }
}

fn insert_list<T: serde::Serialize>(front: &mut Mapping, key: &str, values: &[T]) -> Result<()> {
    if !values.is_empty() {
        front.insert(Value::from(key), serde_yaml::to_value(values)?);
    }
    Ok(())
}

/// Front matter with empty values left out, in a fixed key order.
fn front_matter(entry: &TalkEntry) -> Result<Mapping> {
    let mut front = Mapping::new();
    insert_str(&mut front, "title", Some(&entry.title));
    insert_str(&mut front, "date", entry.date.as_deref());
    insert_str(&mut front, "time", entry.time.as_deref());
    insert_str(&mut front, "timezone", entry.timezone.as_deref());
    if let Some(duration) = entry.duration {
        front.insert(Value::from("duration"), Value::from(duration));
    }

    let speakers = if entry.speaker_details.is_empty() {
        &entry.speakers
    } else {
        &entry.speaker_details
    };
    insert_list(&mut front, "speakers", speakers)?;

    let tags = if entry.tags.is_empty() { &entry.topics } else { &entry.tags };
    insert_list(&mut front, "tags", tags)?;

    insert_str(&mut front, "status", entry.status.as_deref());
    if !entry.resources.is_empty() {
        front.insert(Value::from("resources"), serde_yaml::to_value(&entry.resources)?);
    }
    insert_str(&mut front, "recording_url", entry.recording_url.as_deref());
    Ok(front)
}

/// "2025-01-01" becomes "January 1, 2025"; anything else is shown as written.
fn display_date(date: Option<&str>) -> String {
    match date.map(str::trim).filter(|date| !date.is_empty()) {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|parsed| parsed.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|_| date.to_string()),
        None => TBA.to_string(),
    }
}

fn speaker_names(entry: &TalkEntry) -> Vec<&str> {
    entry.speakers.iter().map(SpeakerEntry::name).collect()
}

fn speaker_bios(entry: &TalkEntry) -> Option<String> {
    let segments: Vec<String> = entry
        .speaker_details
        .iter()
        .filter(|speaker| !speaker.name().is_empty())
        .map(|speaker| match speaker {
            SpeakerEntry::Detailed(detail) => match detail.bio.as_deref().filter(|bio| !bio.is_empty()) {
                Some(bio) => format!("{} - {}", detail.name, bio),
                None => detail.name.clone(),
            },
            SpeakerEntry::Name(name) => name.clone(),
        })
        .collect();

    if segments.is_empty() {
        return None;
    }

    let bios = segments.join("<br/>");
    if bios == speaker_names(entry).join(", ") {
        None
    } else {
        Some(bios)
    }
}

fn outline_section(entry: &TalkEntry) -> String {
    if entry.outline.is_empty() {
        return NO_OUTLINE.to_string();
    }
    entry
        .outline
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn resources_section(entry: &TalkEntry) -> String {
    let items: Vec<String> = entry
        .resources
        .iter()
        .filter(|(_, href)| !href.is_empty())
        .map(|(label, href)| format!("- [{}]({})", title_case(&label.replace('_', " ")), href))
        .collect();

    if items.is_empty() {
        NO_RESOURCES.to_string()
    } else {
        items.join("\n")
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Markdown for a talk detail page: front matter, a summary block and the
/// abstract, outline, resources, recording and speaker bio sections.
pub fn build_talk_markdown(entry: &TalkEntry) -> Result<String> {
    let header = serde_yaml::to_string(&front_matter(entry)?)?;

    let mut lines: Vec<String> = vec![
        "---".to_string(),
        header.trim().to_string(),
        "---".to_string(),
        String::new(),
        format!("# {}", entry.title),
        String::new(),
        format!("**Date:** {}", display_date(entry.date.as_deref())),
    ];

    if entry.time.is_some() || entry.timezone.is_some() {
        let time = entry
            .time
            .as_deref()
            .filter(|time| !time.trim().is_empty())
            .unwrap_or(TBA);
        let zone = entry.timezone.as_deref().unwrap_or("UTC");
        lines.push(format!("**Time:** {} ({})", time, zone));
    }

    let names = speaker_names(entry);
    lines.push(format!(
        "**Speakers:** {}",
        if names.is_empty() { TBA.to_string() } else { names.join(", ") }
    ));

    let topics = if entry.topics.is_empty() { &entry.tags } else { &entry.topics };
    if !topics.is_empty() {
        lines.push(format!("**Topics:** {}", topics.join(", ")));
    }
    lines.push(String::new());

    let abstract_text = entry
        .abstract_text
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_ABSTRACT);
    lines.extend(["## Abstract".to_string(), abstract_text.to_string(), String::new()]);
    lines.extend(["## Outline".to_string(), outline_section(entry), String::new()]);
    lines.extend(["## Resources".to_string(), resources_section(entry), String::new()]);

    let recording = match entry.recording_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => format!("[Watch the recording]({})", url),
        None => NO_RECORDING.to_string(),
    };
    lines.extend(["## Recording".to_string(), recording, String::new()]);

    if let Some(bios) = speaker_bios(entry) {
        lines.extend(["## Speaker Bios".to_string(), bios, String::new()]);
    }

    Ok(format!("{}\n", lines.join("\n").trim()))
}

/// Removes a previous generation run.
pub fn reset_generated_root(generated_root: &Path) -> Result<()> {
    if generated_root.exists() {
        std::fs::remove_dir_all(generated_root)?;
        debug!(dir = %generated_root.display(), "Cleared generated pages");
    }
    Ok(())
}

/// Writes `generated_root/talks/<slug>.md` for every entry with a slug whose
/// page is missing from `talks_dir`.
pub fn generate_missing_talk_pages<'a>(
    entries: impl IntoIterator<Item = &'a TalkEntry>,
    talks_dir: &Path,
    generated_root: &Path,
) -> Result<Vec<GeneratedPage>> {
    let mut generated = Vec::new();

    for entry in entries {
        let Some(slug) = entry.slug.as_deref().filter(|slug| !slug.is_empty()) else {
            continue;
        };

        let file_name = format!("{}.md", slug);
        if talks_dir.join(&file_name).exists() {
            debug!(slug, "Talk page already written by hand");
            continue;
        }

        let path = generated_root.join("talks").join(&file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, build_talk_markdown(entry)?)?;

        generated.push(GeneratedPage {
            src_path: format!("talks/{}", file_name),
            path,
        });
    }

    info!(count = generated.len(), "Generated talk pages");
    Ok(generated)
}

/// Contents of a generated page, if one was written for `src_path`.
pub fn read_generated_source(generated_root: &Path, src_path: &str) -> Result<Option<String>> {
    let Some(file_name) = Path::new(src_path).file_name() else {
        return Ok(None);
    };

    let path = generated_root.join("talks").join(file_name);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(std::fs::read_to_string(path)?))
}
