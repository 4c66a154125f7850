//! Schedule file models with validation

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::validation::{validate_slug, validate_time_window, Validatable, ValidationResult};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accepts a single value, a list, or null.
pub(super) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpeakerEntry {
    Name(String),
    Detailed(Speaker),
}

impl SpeakerEntry {
    pub fn name(&self) -> &str {
        match self {
            SpeakerEntry::Name(name) => name,
            SpeakerEntry::Detailed(speaker) => &speaker.name,
        }
    }

    /// "name, title, org" with missing parts left out.
    pub fn display(&self) -> String {
        match self {
            SpeakerEntry::Name(name) => name.clone(),
            SpeakerEntry::Detailed(speaker) => [
                Some(speaker.name.as_str()),
                speaker.title.as_deref(),
                speaker.org.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TalkEntry {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    /// `YYYY-MM-DD`
    pub date: Option<String>,

    #[validate(custom(function = "validate_time_window"))]
    pub time: Option<String>,

    pub timezone: Option<String>,

    #[validate(range(min = 1, message = "Duration must be at least one minute"))]
    pub duration: Option<u32>,

    #[serde(default, alias = "speaker", deserialize_with = "one_or_many")]
    pub speakers: Vec<SpeakerEntry>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub speaker_details: Vec<SpeakerEntry>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub topics: Vec<String>,

    pub status: Option<String>,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub outline: Vec<String>,

    #[serde(default)]
    pub resources: BTreeMap<String, String>,

    pub recording_url: Option<String>,
    pub thumbnail: Option<String>,
}

impl TalkEntry {
    pub fn validate_entry(&self) -> ValidationResult {
        let mut result = self.validate_comprehensive();

        let speakers = self.speakers.iter().chain(self.speaker_details.iter());
        for (i, speaker) in speakers.enumerate() {
            if speaker.name().trim().is_empty() {
                result.add_error(&format!("speakers[{}]", i), "Speaker name cannot be empty");
            }
        }

        result
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSections {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub upcoming: Vec<TalkEntry>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub past: Vec<TalkEntry>,

    #[serde(default)]
    pub stats: Option<serde_yaml::Value>,
}

/// A schedule file: `upcoming`/`past` sections or a flat list of talks.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleDocument {
    Sections(ScheduleSections),
    Flat(Vec<TalkEntry>),
}

impl ScheduleDocument {
    pub fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error> {
        match value {
            serde_yaml::Value::Null => Ok(ScheduleDocument::Sections(ScheduleSections::default())),
            serde_yaml::Value::Sequence(_) => Ok(ScheduleDocument::Flat(serde_yaml::from_value(value)?)),
            other => Ok(ScheduleDocument::Sections(serde_yaml::from_value(other)?)),
        }
    }

    /// Entries with a location label, upcoming before past.
    pub fn labelled_entries(&self) -> Vec<(String, &TalkEntry)> {
        match self {
            ScheduleDocument::Sections(sections) => sections
                .upcoming
                .iter()
                .enumerate()
                .map(|(i, entry)| (format!("upcoming[{}]", i), entry))
                .chain(
                    sections
                        .past
                        .iter()
                        .enumerate()
                        .map(|(i, entry)| (format!("past[{}]", i), entry)),
                )
                .collect(),
            ScheduleDocument::Flat(entries) => entries
                .iter()
                .enumerate()
                .map(|(i, entry)| (format!("[{}]", i), entry))
                .collect(),
        }
    }

    pub fn entries(&self) -> Vec<&TalkEntry> {
        self.labelled_entries().into_iter().map(|(_, entry)| entry).collect()
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        for (label, entry) in self.labelled_entries() {
            let entry_result = entry.validate_entry();
            if !entry_result.is_valid {
                result.merge(entry_result.scoped(&label));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ScheduleDocument {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        ScheduleDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_sections_document() {
        let doc = parse(
            r#"
upcoming:
  - title: Ownership in practice
    slug: ownership-in-practice
    date: 2025-06-01
    time: "14:00–15:00"
    timezone: Europe/Berlin
    speakers: ["Ada Lovelace"]
    tags: [rust, memory]
past:
  - title: Intro to async
    date: 2024-11-02
"#,
        );

        let entries = doc.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Ownership in practice");
        assert_eq!(entries[0].date.as_deref(), Some("2025-06-01"));
        assert_eq!(entries[0].speakers, vec![SpeakerEntry::Name("Ada Lovelace".to_string())]);
        assert_eq!(entries[1].title, "Intro to async");
        assert!(doc.validate().is_valid);
    }

    #[test]
    fn test_flat_document_and_null_sections() {
        let doc = parse("- title: One\n- title: Two\n");
        assert!(matches!(doc, ScheduleDocument::Flat(ref entries) if entries.len() == 2));

        let doc = parse("upcoming:\npast:\n");
        assert!(doc.entries().is_empty());
    }

    #[test]
    fn test_speaker_details_accepts_single_mapping() {
        let doc = parse(
            r#"
upcoming:
  - title: Talk
    speaker_details:
      name: Grace Hopper
      bio: Compiler pioneer
"#,
        );

        let entry = doc.entries()[0];
        assert_eq!(entry.speaker_details.len(), 1);
        assert_eq!(entry.speaker_details[0].name(), "Grace Hopper");
    }

    #[test]
    fn test_speaker_display() {
        let speaker = SpeakerEntry::Detailed(Speaker {
            name: "Ada".to_string(),
            title: Some("Engineer".to_string()),
            org: None,
            bio: None,
            avatar: None,
        });
        assert_eq!(speaker.display(), "Ada, Engineer");
        assert_eq!(SpeakerEntry::Name("Bob".to_string()).display(), "Bob");
    }

    #[test]
    fn test_missing_title_fails_to_parse() {
        let value: serde_yaml::Value = serde_yaml::from_str("upcoming:\n  - slug: no-title\n").unwrap();
        assert!(ScheduleDocument::from_value(value).is_err());
    }

    #[test]
    fn test_rule_violations_are_scoped() {
        let doc = parse(
            r#"
upcoming:
  - title: ""
    slug: Bad Slug
    time: whenever
past:
  - title: Fine
    duration: 0
"#,
        );

        let result = doc.validate();
        assert!(!result.is_valid);
        assert!(result.has_error("upcoming[0].title"));
        assert!(result.has_error("upcoming[0].slug"));
        assert!(result.has_error("upcoming[0].time"));
        assert!(result.has_error("past[0].duration"));
    }
}
