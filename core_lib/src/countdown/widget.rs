use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use super::clock::Clock;
use super::remaining::CountdownState;
use super::target::parse_target_instant;
use crate::config::CountdownConfig;
use crate::page::{Element, Page, ReadyState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered(CountdownState),
    Skipped,
}

/// Renders one countdown element for the instant `now`.
///
/// The target attribute is read on every call. Elements with a missing or
/// unparsable attribute, or without an output node, are left untouched.
pub fn tick_element(element: &Element, config: &CountdownConfig, now: DateTime<Utc>) -> TickOutcome {
    let Some(raw) = element.attribute(&config.start_attribute) else {
        return TickOutcome::Skipped;
    };
    let Ok(target) = parse_target_instant(&raw) else {
        return TickOutcome::Skipped;
    };
    let Some(output) = element.find_by_class(&config.output_class) else {
        return TickOutcome::Skipped;
    };

    let state = CountdownState::at(target, now);
    output.set_text(&state.render(&config.live_text));
    TickOutcome::Rendered(state)
}

fn render_targets(targets: &[Element], config: &CountdownConfig, now: DateTime<Utc>) -> usize {
    targets
        .iter()
        .map(|element| tick_element(element, config, now))
        .filter(|outcome| matches!(outcome, TickOutcome::Rendered(_)))
        .count()
}

/// Owns the discovered countdown elements and the timer that re-renders them.
pub struct CountdownWidget {
    targets: Arc<Vec<Element>>,
    config: Arc<CountdownConfig>,
    clock: Arc<dyn Clock>,
    timer: Option<JoinHandle<()>>,
}

impl CountdownWidget {
    /// Collects the targets present on the page right now. Elements added
    /// later are never picked up.
    pub fn discover(page: &Page, config: CountdownConfig, clock: Arc<dyn Clock>) -> Self {
        let targets = page.query_all(&config.marker_class, Some(&config.start_attribute));
        debug!(count = targets.len(), "Discovered countdown targets");

        Self {
            targets: Arc::new(targets),
            config: Arc::new(config),
            clock,
            timer: None,
        }
    }

    /// Waits for the page content to load, then discovers targets.
    pub async fn attach(page: &Page, config: CountdownConfig, clock: Arc<dyn Clock>) -> Self {
        if page.ready_state() == ReadyState::Loading {
            debug!("Page still loading, deferring countdown discovery");
            page.content_loaded().await;
        }
        Self::discover(page, config, clock)
    }

    pub fn targets(&self) -> &[Element] {
        &self.targets
    }

    /// Renders every target once; returns how many were written.
    pub fn render_all(&self) -> usize {
        render_targets(&self.targets, &self.config, self.clock.now())
    }

    /// Renders immediately and starts the repeating timer.
    ///
    /// Returns `false` without scheduling anything when there are no targets.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return true;
        }

        if self.targets.is_empty() {
            debug!("No countdown targets, timer not started");
            return false;
        }

        self.render_all();

        let targets = Arc::clone(&self.targets);
        let config = Arc::clone(&self.config);
        let clock = Arc::clone(&self.clock);
        let period = Duration::from_millis(config.tick_interval_ms);

        self.timer = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                render_targets(&targets, &config, clock.now());
            }
        }));

        info!(
            targets = self.targets.len(),
            interval_ms = self.config.tick_interval_ms,
            "Countdown timer started"
        );
        true
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("Countdown timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().map_or(false, |timer| !timer.is_finished())
    }
}

impl Drop for CountdownWidget {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::ManualClock;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn start_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
    }

    fn countdown(start: &str) -> (Element, Element) {
        let output = Element::new("span").with_class("cd-out").with_text("—");
        let element = Element::new("div")
            .with_class("countdown")
            .with_attribute("data-start", start)
            .with_child(output.clone());
        (element, output)
    }

    fn iso(instant: DateTime<Utc>) -> String {
        instant.to_rfc3339()
    }

    #[test]
    fn test_tick_element_formats_pending() {
        let now = start_instant();
        let (element, output) = countdown(&iso(now + ChronoDuration::milliseconds(90_061_000)));

        let outcome = tick_element(&element, &CountdownConfig::default(), now);

        assert!(matches!(outcome, TickOutcome::Rendered(CountdownState::Pending(_))));
        assert_eq!(output.text(), "1d 01h 01m 01s");
    }

    #[test]
    fn test_tick_element_reads_offset_without_seconds() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap();
        let (element, output) = countdown("2025-06-01T14:00Z");

        let outcome = tick_element(&element, &CountdownConfig::default(), now);

        assert!(matches!(outcome, TickOutcome::Rendered(CountdownState::Pending(_))));
        assert_eq!(output.text(), "0d 01h 00m 00s");
    }

    #[test]
    fn test_tick_element_skips_bad_attribute() {
        let (element, output) = countdown("not a date");
        let outcome = tick_element(&element, &CountdownConfig::default(), start_instant());

        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(output.text(), "—");
    }

    #[test]
    fn test_tick_element_skips_missing_output() {
        let element = Element::new("div")
            .with_class("countdown")
            .with_attribute("data-start", "2030-01-01");

        assert_eq!(
            tick_element(&element, &CountdownConfig::default(), start_instant()),
            TickOutcome::Skipped
        );
    }

    #[test]
    fn test_live_reverts_when_attribute_moves_forward() {
        let now = start_instant();
        let (element, output) = countdown(&iso(now - ChronoDuration::minutes(5)));
        let config = CountdownConfig::default();

        tick_element(&element, &config, now);
        assert_eq!(output.text(), "Live now");
        tick_element(&element, &config, now + ChronoDuration::seconds(1));
        assert_eq!(output.text(), "Live now");

        element.set_attribute("data-start", &iso(now + ChronoDuration::hours(2)));
        tick_element(&element, &config, now);
        assert_eq!(output.text(), "0d 02h 00m 00s");
    }

    #[tokio::test]
    async fn test_no_targets_means_no_timer() {
        let page = Page::loaded(vec![Element::new("div").with_class("countdown")]);
        let clock = Arc::new(ManualClock::new(start_instant()));
        let mut widget = CountdownWidget::discover(&page, CountdownConfig::default(), clock);

        assert!(widget.targets().is_empty());
        assert!(!widget.start());
        assert!(!widget.is_running());
    }

    #[tokio::test]
    async fn test_malformed_sibling_does_not_block_others() {
        let now = start_instant();
        let (good, good_out) = countdown(&iso(now + ChronoDuration::seconds(61)));
        let (bad, bad_out) = countdown("garbage");
        let page = Page::loaded(vec![bad, good]);
        let clock = Arc::new(ManualClock::new(now));

        let widget = CountdownWidget::discover(&page, CountdownConfig::default(), clock);

        assert_eq!(widget.targets().len(), 2);
        assert_eq!(widget.render_all(), 1);
        assert_eq!(good_out.text(), "0d 00h 01m 01s");
        assert_eq!(bad_out.text(), "—");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_rerenders_every_interval() {
        let now = start_instant();
        let (element, output) = countdown(&iso(now + ChronoDuration::seconds(3)));
        let page = Page::loaded(vec![element]);
        let clock = Arc::new(ManualClock::new(now));

        let mut widget = CountdownWidget::discover(&page, CountdownConfig::default(), clock.clone());
        assert!(widget.start());
        assert!(widget.is_running());
        assert_eq!(output.text(), "0d 00h 00m 03s");

        clock.advance(ChronoDuration::seconds(1));
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(output.text(), "0d 00h 00m 02s");

        clock.advance(ChronoDuration::seconds(2));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(output.text(), "Live now");

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(output.text(), "Live now");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_rendering() {
        let now = start_instant();
        let (element, output) = countdown(&iso(now + ChronoDuration::minutes(10)));
        let page = Page::loaded(vec![element]);
        let clock = Arc::new(ManualClock::new(now));

        let mut widget = CountdownWidget::discover(&page, CountdownConfig::default(), clock.clone());
        widget.start();
        assert_eq!(output.text(), "0d 00h 10m 00s");

        widget.stop();
        assert!(!widget.is_running());

        clock.advance(ChronoDuration::minutes(1));
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(output.text(), "0d 00h 10m 00s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_elements_added_after_discovery_are_ignored() {
        let now = start_instant();
        let (first, _) = countdown(&iso(now + ChronoDuration::minutes(1)));
        let page = Page::loaded(vec![first]);
        let clock = Arc::new(ManualClock::new(now));

        let mut widget = CountdownWidget::discover(&page, CountdownConfig::default(), clock);
        widget.start();

        let (late, late_out) = countdown(&iso(now + ChronoDuration::minutes(2)));
        page.append(late);
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(widget.targets().len(), 1);
        assert_eq!(late_out.text(), "—");
    }

    #[tokio::test]
    async fn test_attach_defers_until_content_loaded() {
        let now = start_instant();
        let page = Arc::new(Page::new());
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(now));

        let attach = {
            let page = page.clone();
            let clock = clock.clone();
            tokio::spawn(async move {
                CountdownWidget::attach(&page, CountdownConfig::default(), clock)
                    .await
                    .targets()
                    .len()
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!attach.is_finished());

        let (element, _) = countdown(&iso(now + ChronoDuration::hours(1)));
        page.append(element);
        page.set_ready_state(ReadyState::Interactive);

        assert_eq!(attach.await.unwrap(), 1);
    }
}
