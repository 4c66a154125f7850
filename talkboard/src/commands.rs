use anyhow::{anyhow, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use talkboard_core::config::CountdownConfig;
use talkboard_core::schedule::{find_schedule, validate_schedule_file, GeneratedPage};
use talkboard_core::{
    generate_talk_pages, load_dashboard, AppConfig, AppError, CountdownWidget, Dashboard, Element,
    FormSubmitter, Page, ReadyState, SubmitOutcome, SuggestionForm, SystemClock,
};
use tracing::{info, warn};

use crate::cli::{CountdownArgs, ScheduleCommand, SubmitArgs};

fn countdown_element(config: &CountdownConfig, start: &str) -> Element {
    Element::new("div")
        .with_class(&config.marker_class)
        .with_attribute(&config.start_attribute, start)
        .with_child(Element::new("span").with_class(&config.output_class))
}

fn print_frame(widget: &CountdownWidget, config: &CountdownConfig) {
    let frame: Vec<String> = widget
        .targets()
        .iter()
        .filter_map(|target| target.find_by_class(&config.output_class))
        .map(|output| output.text())
        .collect();
    println!("{}", frame.join(" | "));
}

pub async fn countdown(config: &AppConfig, args: CountdownArgs) -> Result<()> {
    let page = Page::new();

    if args.starts.is_empty() {
        let dashboard = load_dashboard(&config.schedule, Utc::now())?;
        match dashboard.countdown_element(&config.countdown) {
            Some(element) => {
                if let Some(title) = element.attribute("title") {
                    println!("Next talk: {}", title);
                }
                page.append(element);
            }
            None => warn!("No talk scheduled and no --start given"),
        }
    } else {
        for start in &args.starts {
            page.append(countdown_element(&config.countdown, start));
        }
    }
    page.set_ready_state(ReadyState::Complete);

    let mut widget =
        CountdownWidget::attach(&page, config.countdown.clone(), Arc::new(SystemClock)).await;

    if widget.targets().is_empty() {
        return Err(anyhow!("Nothing to count down to"));
    }

    if args.once {
        widget.render_all();
        print_frame(&widget, &config.countdown);
        return Ok(());
    }

    widget.start();
    let mut frames = tokio::time::interval(Duration::from_millis(config.countdown.tick_interval_ms));
    loop {
        tokio::select! {
            _ = frames.tick() => print_frame(&widget, &config.countdown),
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping countdown");
                break;
            }
        }
    }
    widget.stop();
    Ok(())
}

pub async fn submit(config: &AppConfig, args: SubmitArgs) -> Result<()> {
    let form = SuggestionForm::standard();
    form.set_field("name", &args.name);
    form.set_field("email", &args.email);
    form.set_field("topic", &args.topic);
    form.set_field("details", &args.details);

    let submitter = FormSubmitter::from_config(&config.form)
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

    let outcome = submitter.handle_submit(&form).await;
    println!("{}", form.status().text());

    match outcome {
        SubmitOutcome::Sent => Ok(()),
        SubmitOutcome::Invalid(result) => Err(AppError::Validation(result).into()),
        other => Err(anyhow!("Suggestion not sent ({:?})", other)),
    }
}

pub fn schedule(config: &AppConfig, command: ScheduleCommand) -> Result<()> {
    match command {
        ScheduleCommand::Validate { path } => {
            validate(config, path)?;
            println!("Schedule validation passed.");
            Ok(())
        }
        ScheduleCommand::Summary { json } => {
            let dashboard = load_dashboard(&config.schedule, Utc::now())?;
            if json {
                println!("{}", dashboard.to_json()?);
            } else {
                print!("{}", render_summary(&dashboard));
            }
            Ok(())
        }
        ScheduleCommand::Generate { out } => {
            let pages = generate(config, out)?;
            for page in &pages {
                println!("{}", page.path.display());
            }
            println!("Generated {} talk page(s).", pages.len());
            Ok(())
        }
    }
}

fn validate(config: &AppConfig, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path,
        None => find_schedule(&config.schedule.paths)
            .map(|path| path.to_path_buf())
            .ok_or_else(|| anyhow!("No schedule file found"))?,
    };

    validate_schedule_file(&path)?;
    Ok(path)
}

fn generate(config: &AppConfig, out: Option<PathBuf>) -> Result<Vec<GeneratedPage>> {
    let mut schedule = config.schedule.clone();
    if let Some(out) = out {
        schedule.generated_dir = out;
    }
    Ok(generate_talk_pages(&schedule)?)
}

fn render_summary(dashboard: &Dashboard) -> String {
    let mut lines = Vec::new();

    match &dashboard.next_talk {
        Some(talk) => {
            let when = talk
                .iso_start()
                .unwrap_or_else(|| talk.date.clone().unwrap_or_else(|| "TBA".to_string()));
            lines.push(format!("Next talk: {} ({})", talk.title, when));
            if !talk.speakers.is_empty() {
                lines.push(format!("  Speakers: {}", talk.speakers.join(", ")));
            }
            if !talk.topic_labels().is_empty() {
                lines.push(format!("  Topics: {}", talk.topic_labels().join(", ")));
            }
        }
        None => lines.push("Next talk: none scheduled".to_string()),
    }

    lines.push(format!("Talks delivered: {}", dashboard.stats.delivered));
    lines.push(format!("Upcoming speakers: {}", dashboard.stats.upcoming_speakers));
    lines.push(format!("Top tag: {}", dashboard.stats.top_tag));

    let recent = dashboard.recent(3);
    if !recent.is_empty() {
        lines.push("Recent:".to_string());
    }
    for talk in recent {
        lines.push(format!("  - {}", talk.title));
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    const SCHEDULE: &str = r#"
upcoming:
  - title: Ownership for everyone
    slug: ownership-for-everyone
    date: "2025-06-10"
    time: "12:00"
    speakers: [Ada]
    tags: [rust]
past:
  - title: Testing in anger
    date: "2025-01-15"
    speakers: [Bob]
    tags: [testing]
"#;

    fn config_for(dir: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.schedule.paths = vec![dir.path().join("schedule.yml")];
        config.schedule.talks_dir = dir.path().join("talks");
        config.schedule.generated_dir = dir.path().join("_generated");
        config
    }

    #[test]
    fn test_validate_uses_configured_schedule() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        assert!(validate(&config, None).is_err());

        std::fs::write(dir.path().join("schedule.yml"), SCHEDULE).unwrap();
        assert_eq!(validate(&config, None).unwrap(), dir.path().join("schedule.yml"));
    }

    #[test]
    fn test_validate_rejects_bad_slug() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.yml");
        std::fs::write(&path, "upcoming:\n  - title: Intro\n    slug: Intro_Talk\n").unwrap();

        let err = validate(&config_for(&dir), Some(path)).unwrap_err();
        assert!(err.to_string().contains("upcoming[0].slug"));
    }

    #[test]
    fn test_summary_lists_next_talk_and_stats() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("schedule.yml"), SCHEDULE).unwrap();
        let config = config_for(&dir);

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let summary = render_summary(&load_dashboard(&config.schedule, now).unwrap());

        assert!(summary.starts_with("Next talk: Ownership for everyone (2025-06-10T12:00:00+00:00)\n"));
        assert!(summary.contains("  Speakers: Ada\n"));
        assert!(summary.contains("Talks delivered: 1\n"));
        assert!(summary.contains("Recent:\n  - Testing in anger\n"));
    }

    #[test]
    fn test_summary_without_schedule() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);

        let summary = render_summary(&load_dashboard(&config.schedule, Utc::now()).unwrap());

        assert!(summary.starts_with("Next talk: none scheduled\n"));
        assert!(!summary.contains("Recent:"));
    }

    #[test]
    fn test_generate_writes_to_out_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("schedule.yml"), SCHEDULE).unwrap();
        let out = dir.path().join("site");

        let pages = generate(&config_for(&dir), Some(out.clone())).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, out.join("talks").join("ownership-for-everyone.md"));
        assert!(!dir.path().join("_generated").exists());
    }
}
