//! Talk pages: Markdown files whose YAML front matter describes a talk

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

use super::models::{one_or_many, SpeakerEntry};
use super::talk::Talk;
use crate::error::Result;

lazy_static! {
    static ref FRONT_MATTER_REGEX: Regex = Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*\r?\n").unwrap();
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    date: Option<String>,
    time: Option<String>,
    timezone: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    speaker: Vec<SpeakerEntry>,
    speakers: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    topics: Option<Vec<String>>,
    thumbnail: Option<String>,
}

/// The YAML mapping between the leading `---` fences, if any.
pub fn parse_front_matter(text: &str) -> Option<serde_yaml::Mapping> {
    let captures = FRONT_MATTER_REGEX.captures(text)?;
    match serde_yaml::from_str::<serde_yaml::Value>(&captures[1]) {
        Ok(serde_yaml::Value::Mapping(mapping)) if !mapping.is_empty() => Some(mapping),
        Ok(_) => None,
        Err(err) => {
            debug!("Ignoring unparsable front matter: {}", err);
            None
        }
    }
}

/// "intro-to-async" becomes "Intro To Async".
fn title_from_stem(stem: &str) -> String {
    stem.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn talk_from_page(stem: &str, file_name: &str, text: &str) -> Option<Talk> {
    let mapping = parse_front_matter(text)?;
    let front: FrontMatter = match serde_yaml::from_value(serde_yaml::Value::Mapping(mapping)) {
        Ok(front) => front,
        Err(err) => {
            warn!(page = file_name, "Skipping talk page with unexpected front matter: {}", err);
            return None;
        }
    };

    let speakers = if front.speaker.is_empty() {
        front.speakers.unwrap_or_default()
    } else {
        front.speaker.iter().map(SpeakerEntry::display).collect()
    };

    Some(Talk {
        title: front
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| title_from_stem(stem)),
        slug: Some(stem.to_string()),
        date: front.date,
        time: front.time,
        timezone: front.timezone,
        speakers,
        tags: front.tags.unwrap_or_default(),
        topics: front.topics.unwrap_or_default(),
        link: Some(format!("talks/{}", file_name)),
        thumbnail: front.thumbnail,
    })
}

/// Reads every `*.md` page in `dir`, sorted by file name. A missing
/// directory yields no talks.
pub fn read_talk_pages(dir: &Path) -> Result<Vec<Talk>> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "Talk pages directory not found");
        return Ok(Vec::new());
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("md"))
        .collect();
    paths.sort();

    let mut talks = Vec::new();
    for path in paths {
        let (Some(stem), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            continue;
        };

        let text = std::fs::read_to_string(&path)?;
        if let Some(talk) = talk_from_page(stem, file_name, &text) {
            talks.push(talk);
        }
    }

    Ok(talks)
}

fn prefer<T: Clone>(page: &[T], schedule: &[T]) -> Vec<T> {
    if page.is_empty() {
        schedule.to_vec()
    } else {
        page.to_vec()
    }
}

/// Schedule order is kept. Page values win per slug, schedule values fill
/// the gaps, and talks that only have a page are appended.
pub fn merge_schedule_and_pages(schedule: Vec<Talk>, pages: Vec<Talk>) -> Vec<Talk> {
    if schedule.is_empty() {
        return pages;
    }

    let by_slug: HashMap<&str, &Talk> = pages
        .iter()
        .filter_map(|talk| talk.slug.as_deref().map(|slug| (slug, talk)))
        .collect();

    let mut merged: Vec<Talk> = schedule
        .iter()
        .map(|scheduled| {
            let Some(page) = scheduled.slug.as_deref().and_then(|slug| by_slug.get(slug)) else {
                return scheduled.clone();
            };

            Talk {
                title: if page.title.is_empty() {
                    scheduled.title.clone()
                } else {
                    page.title.clone()
                },
                slug: scheduled.slug.clone(),
                date: page.date.clone().or_else(|| scheduled.date.clone()),
                time: page.time.clone().or_else(|| scheduled.time.clone()),
                timezone: page.timezone.clone().or_else(|| scheduled.timezone.clone()),
                speakers: prefer(&page.speakers, &scheduled.speakers),
                tags: prefer(&page.tags, &scheduled.tags),
                topics: prefer(&page.topics, &scheduled.topics),
                link: page.link.clone().or_else(|| scheduled.link.clone()),
                thumbnail: page.thumbnail.clone().or_else(|| scheduled.thumbnail.clone()),
            }
        })
        .collect();

    let scheduled_slugs: HashSet<&str> = schedule
        .iter()
        .filter_map(|talk| talk.slug.as_deref())
        .collect();

    merged.extend(
        pages
            .iter()
            .filter(|talk| {
                talk.slug
                    .as_deref()
                    .map_or(true, |slug| !scheduled_slugs.contains(slug))
            })
            .cloned(),
    );

    merged
}
