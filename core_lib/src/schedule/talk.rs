use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::warn;

use super::models::TalkEntry;

/// A talk as shown on the dashboard, from the schedule or a talk page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Talk {
    pub title: String,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub timezone: Option<String>,
    pub speakers: Vec<String>,
    pub tags: Vec<String>,
    pub topics: Vec<String>,
    pub link: Option<String>,
    pub thumbnail: Option<String>,
}

impl Talk {
    pub fn from_entry(entry: &TalkEntry) -> Self {
        Self {
            title: entry.title.clone(),
            slug: entry.slug.clone(),
            date: entry.date.clone(),
            time: entry.time.clone(),
            timezone: entry.timezone.clone(),
            speakers: entry.speakers.iter().map(|s| s.display()).collect(),
            tags: entry.tags.clone(),
            topics: entry.topics.clone(),
            link: entry.slug.as_ref().map(|slug| format!("talks/{}.md", slug)),
            thumbnail: entry.thumbnail.clone(),
        }
    }

    /// Start instant in the talk's own timezone, when the date is usable.
    pub fn starts_at(&self) -> Option<DateTime<FixedOffset>> {
        start_instant(
            self.date.as_deref(),
            self.time.as_deref(),
            self.timezone.as_deref(),
        )
    }

    pub fn starts_at_utc(&self) -> Option<DateTime<Utc>> {
        self.starts_at().map(|start| start.with_timezone(&Utc))
    }

    pub fn iso_start(&self) -> Option<String> {
        self.starts_at().map(|start| start.to_rfc3339())
    }

    /// Topics if any, otherwise tags.
    pub fn topic_labels(&self) -> &[String] {
        if self.topics.is_empty() {
            &self.tags
        } else {
            &self.topics
        }
    }
}

/// Start of a window like "12:00–13:00", "12:00-13:00", "12:00" or "12".
/// An empty string means midnight.
pub fn parse_time_window(window: &str) -> Option<NaiveTime> {
    let window = window.trim();
    if window.is_empty() {
        return NaiveTime::from_hms_opt(0, 0, 0);
    }

    let start = window
        .split('–')
        .next()
        .and_then(|part| part.split('-').next())
        .unwrap_or(window)
        .trim();

    let mut parts = start.splitn(2, ':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(minute) => minute.trim().parse().ok()?,
        None => 0,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Unknown or missing zones fall back to UTC.
pub fn resolve_timezone(name: Option<&str>) -> Tz {
    match name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.parse().unwrap_or_else(|_| {
            warn!(timezone = name, "Unknown timezone, falling back to UTC");
            Tz::UTC
        }),
        None => Tz::UTC,
    }
}

pub fn start_instant(
    date: Option<&str>,
    time: Option<&str>,
    timezone: Option<&str>,
) -> Option<DateTime<FixedOffset>> {
    let date = NaiveDate::parse_from_str(date?.trim(), "%Y-%m-%d").ok()?;
    let time = match time {
        Some(window) => parse_time_window(window)?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };

    let tz = resolve_timezone(timezone);
    let local = tz.from_local_datetime(&date.and_time(time)).earliest()?;
    Some(local.fixed_offset())
}
