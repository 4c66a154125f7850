//! Talk schedule: loading, validation, talk pages, generated pages and the dashboard summary

pub mod dashboard;
pub mod generate;
pub mod loader;
pub mod models;
pub mod pages;
pub mod talk;

pub use dashboard::{Dashboard, DashboardStats};
pub use generate::{
    build_talk_markdown, generate_missing_talk_pages, read_generated_source, reset_generated_root,
    GeneratedPage,
};
pub use loader::{
    find_schedule, load_schedule, parse_schedule_str, read_schedule_document,
    validate_schedule_file, validate_schedule_str,
};
pub use models::{ScheduleDocument, ScheduleSections, Speaker, SpeakerEntry, TalkEntry};
pub use pages::{merge_schedule_and_pages, parse_front_matter, read_talk_pages};
pub use talk::{parse_time_window, resolve_timezone, start_instant, Talk};

use chrono::{DateTime, Utc};

use crate::config::ScheduleConfig;
use crate::error::Result;

/// Schedule file plus talk pages, merged and summarised as of `now`.
pub fn load_dashboard(config: &ScheduleConfig, now: DateTime<Utc>) -> Result<Dashboard> {
    let scheduled = load_schedule(&config.paths)?;
    let pages = read_talk_pages(&config.talks_dir)?;
    Ok(Dashboard::build(merge_schedule_and_pages(scheduled, pages), now))
}

/// Regenerates pages for every scheduled talk that lacks a hand-written one.
pub fn generate_talk_pages(config: &ScheduleConfig) -> Result<Vec<GeneratedPage>> {
    reset_generated_root(&config.generated_dir)?;

    let Some(document) = read_schedule_document(&config.paths)? else {
        return Ok(Vec::new());
    };
    generate_missing_talk_pages(document.entries(), &config.talks_dir, &config.generated_dir)
}
