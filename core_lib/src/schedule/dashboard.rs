use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use super::talk::Talk;
use crate::config::CountdownConfig;
use crate::error::Result;
use crate::page::Element;

pub const RECENT_WINDOW: usize = 6;
pub const NO_TOP_TAG: &str = "–";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub delivered: usize,
    pub upcoming_speakers: usize,
    pub top_tag: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    #[serde(skip)]
    pub talks: Vec<Talk>,
    pub next_talk: Option<Talk>,
    pub recent: Vec<Talk>,
    pub stats: DashboardStats,
}

impl Dashboard {
    pub fn build(talks: Vec<Talk>, now: DateTime<Utc>) -> Self {
        let mut dated: Vec<(DateTime<Utc>, &Talk)> = talks
            .iter()
            .filter_map(|talk| talk.starts_at_utc().map(|start| (start, talk)))
            .collect();
        dated.sort_by_key(|(start, _)| *start);

        let upcoming: Vec<&Talk> = dated
            .iter()
            .filter(|(start, _)| *start >= now)
            .map(|(_, talk)| *talk)
            .collect();

        let past: Vec<&Talk> = dated
            .iter()
            .rev()
            .filter(|(start, _)| *start < now)
            .map(|(_, talk)| *talk)
            .collect();

        let next_talk = upcoming
            .first()
            .or_else(|| dated.first().map(|(_, talk)| talk))
            .map(|talk| (*talk).clone());

        let upcoming_speakers: BTreeSet<&str> = upcoming
            .iter()
            .flat_map(|talk| talk.speakers.iter().map(String::as_str))
            .collect();

        let stats = DashboardStats {
            delivered: past.len(),
            upcoming_speakers: upcoming_speakers.len(),
            top_tag: top_tag(&talks).unwrap_or_else(|| NO_TOP_TAG.to_string()),
        };

        let recent = past
            .iter()
            .take(RECENT_WINDOW)
            .map(|talk| (*talk).clone())
            .collect();

        Self {
            talks,
            next_talk,
            recent,
            stats,
        }
    }

    /// Next talk, recent talks and stats as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn recent(&self, n: usize) -> &[Talk] {
        &self.recent[..n.min(self.recent.len())]
    }

    /// Countdown element for the next talk; `data-start` is empty when its
    /// start is unknown, which the widget skips.
    pub fn countdown_element(&self, config: &CountdownConfig) -> Option<Element> {
        let talk = self.next_talk.as_ref()?;
        let start = talk.iso_start().unwrap_or_default();

        Some(
            Element::new("div")
                .with_class(&config.marker_class)
                .with_attribute(&config.start_attribute, &start)
                .with_attribute("title", &talk.title)
                .with_child(Element::new("strong").with_text("Starts in:"))
                .with_child(
                    Element::new("span")
                        .with_class(&config.output_class)
                        .with_text("—"),
                ),
        )
    }
}

/// Most frequent tag; the first one seen wins a tie.
fn top_tag(talks: &[Talk]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for tag in talks.iter().flat_map(|talk| talk.tags.iter()) {
        match counts.iter_mut().find(|(seen, _)| *seen == tag.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((tag.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (tag, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((tag, count));
        }
    }
    best.map(|(tag, _)| tag.to_string())
}
