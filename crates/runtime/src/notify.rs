//! Deny-message delivery with per-actor deduplication.
//!
//! One physical player action often fans out into several gate checks (a
//! block interaction may hit the use, container and harvest gates in the same
//! tick). The notifier collapses those into one message: an actor notified
//! within the window gets nothing new, and every attempt, delivered or not,
//! restarts the window.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use guard_core::{ActorId, MessageFormatter, MessageSink, RenderedMessage};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::call::call_hook;
use crate::config::DEFAULT_DEDUP_WINDOW_MS;
use crate::fault::FaultReporter;

/// Tracked actors above which `notify` sweeps expired entries.
pub const PRUNE_THRESHOLD: usize = 1024;

/// What happened to one notification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum NotifyOutcome {
    /// No reason text, nothing to say.
    Skipped,
    /// Same actor was notified within the window.
    Suppressed,
    Delivered,
    /// Delivery failed; the failure was reported.
    Failed,
}

pub struct DenyNotifier {
    window: Duration,
    last_attempt: Mutex<HashMap<ActorId, Instant>>,
    sink: Arc<dyn MessageSink>,
    faults: FaultReporter,
    delivered: AtomicU64,
    suppressed: AtomicU64,
}

impl DenyNotifier {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self::with_window(sink, Duration::from_millis(DEFAULT_DEDUP_WINDOW_MS))
    }

    pub fn with_window(sink: Arc<dyn MessageSink>, window: Duration) -> Self {
        Self {
            window,
            last_attempt: Mutex::new(HashMap::new()),
            sink,
            faults: FaultReporter::new("DenyNotifier"),
            delivered: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Replaces the notifier's fault reporter (e.g. to change its sampling).
    pub fn with_faults(mut self, faults: FaultReporter) -> Self {
        self.faults = faults;
        self
    }

    /// Formats `raw_reason` and delivers it to `actor` unless suppressed.
    pub fn notify(
        &self,
        actor: ActorId,
        raw_reason: Option<&str>,
        formatter: Option<&dyn MessageFormatter>,
    ) -> NotifyOutcome {
        self.notify_at(actor, raw_reason, formatter, Instant::now())
    }

    /// [`DenyNotifier::notify`] with an explicit clock reading.
    pub fn notify_at(
        &self,
        actor: ActorId,
        raw_reason: Option<&str>,
        formatter: Option<&dyn MessageFormatter>,
        now: Instant,
    ) -> NotifyOutcome {
        let Some(raw) = raw_reason.filter(|reason| !reason.is_empty()) else {
            return NotifyOutcome::Skipped;
        };

        let previous = {
            let mut last_attempt = self.last_attempt.lock();
            let previous = last_attempt.insert(actor, now);
            if last_attempt.len() > PRUNE_THRESHOLD {
                last_attempt.retain(|_, at| now.saturating_duration_since(*at) < self.window);
            }
            previous
        };
        if let Some(previous) = previous
            && now.saturating_duration_since(previous) < self.window
        {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            trace!(target: "guard::notify", %actor, "deny message suppressed");
            return NotifyOutcome::Suppressed;
        }

        let message = self.render(raw, formatter);
        match call_hook(None, || self.sink.deliver(actor, message)) {
            Ok(()) => {
                self.delivered.fetch_add(1, Ordering::Relaxed);
                debug!(target: "guard::notify", %actor, "deny message delivered");
                NotifyOutcome::Delivered
            }
            Err(error) => {
                self.faults.report_detail("delivering deny message", &error);
                NotifyOutcome::Failed
            }
        }
    }

    /// Formats through the host formatter, falling back to the raw text.
    fn render(&self, raw: &str, formatter: Option<&dyn MessageFormatter>) -> RenderedMessage {
        let Some(formatter) = formatter else {
            return RenderedMessage::raw(raw);
        };
        call_hook(None, || formatter.format(raw)).unwrap_or_else(|error| {
            self.faults.report_detail("formatting deny message", &error);
            RenderedMessage::raw(raw)
        })
    }

    /// Drops the dedup entry of a disconnected actor.
    pub fn forget(&self, actor: ActorId) {
        self.last_attempt.lock().remove(&actor);
    }

    /// Removes entries whose window has elapsed at `now`.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut last_attempt = self.last_attempt.lock();
        let before = last_attempt.len();
        last_attempt.retain(|_, at| now.saturating_duration_since(*at) < self.window);
        before - last_attempt.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn suppressed_count(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    /// Actors currently tracked for deduplication.
    pub fn tracked_actors(&self) -> usize {
        self.last_attempt.lock().len()
    }

    pub fn faults(&self) -> &FaultReporter {
        &self.faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guard_core::{HookError, HookResult};

    #[derive(Default)]
    struct Inbox(Mutex<Vec<(ActorId, RenderedMessage)>>);

    impl MessageSink for Inbox {
        fn deliver(&self, actor: ActorId, message: RenderedMessage) -> HookResult<()> {
            self.0.lock().push((actor, message));
            Ok(())
        }
    }

    struct Offline;
    impl MessageSink for Offline {
        fn deliver(&self, _actor: ActorId, _message: RenderedMessage) -> HookResult<()> {
            Err(HookError::Unavailable("player disconnected".into()))
        }
    }

    struct Bold;
    impl MessageFormatter for Bold {
        fn format(&self, raw: &str) -> HookResult<RenderedMessage> {
            Ok(RenderedMessage::Styled {
                text: raw.to_owned(),
                markup: format!("<b>{raw}</b>"),
            })
        }
    }

    struct Broken;
    impl MessageFormatter for Broken {
        fn format(&self, _raw: &str) -> HookResult<RenderedMessage> {
            Err(HookError::failed("bad markup"))
        }
    }

    fn notifier() -> (Arc<Inbox>, DenyNotifier) {
        let inbox = Arc::new(Inbox::default());
        let notifier = DenyNotifier::new(inbox.clone());
        (inbox, notifier)
    }

    #[test]
    fn empty_reason_is_a_no_op() {
        let (inbox, notifier) = notifier();
        let actor = ActorId::random();
        assert_eq!(notifier.notify(actor, None, None), NotifyOutcome::Skipped);
        assert_eq!(notifier.notify(actor, Some(""), None), NotifyOutcome::Skipped);
        assert!(inbox.0.lock().is_empty());
        assert_eq!(notifier.tracked_actors(), 0, "skips do not touch the window");
    }

    #[test]
    fn repeats_within_window_are_suppressed() {
        let (inbox, notifier) = notifier();
        let actor = ActorId::random();
        let t0 = Instant::now();

        assert_eq!(notifier.notify_at(actor, Some("no"), None, t0), NotifyOutcome::Delivered);
        assert_eq!(
            notifier.notify_at(actor, Some("no"), None, t0 + Duration::from_millis(100)),
            NotifyOutcome::Suppressed
        );
        assert_eq!(inbox.0.lock().len(), 1);
        assert_eq!(notifier.suppressed_count(), 1);
    }

    #[test]
    fn spaced_attempts_are_both_delivered() {
        let (inbox, notifier) = notifier();
        let actor = ActorId::random();
        let t0 = Instant::now();

        notifier.notify_at(actor, Some("no"), None, t0);
        notifier.notify_at(actor, Some("no"), None, t0 + Duration::from_millis(500));
        assert_eq!(inbox.0.lock().len(), 2);
        assert_eq!(notifier.delivered_count(), 2);
    }

    #[test]
    fn suppressed_attempts_extend_the_window() {
        let (inbox, notifier) = notifier();
        let actor = ActorId::random();
        let t0 = Instant::now();

        notifier.notify_at(actor, Some("no"), None, t0);
        notifier.notify_at(actor, Some("no"), None, t0 + Duration::from_millis(400));
        let outcome = notifier.notify_at(actor, Some("no"), None, t0 + Duration::from_millis(800));
        assert_eq!(outcome, NotifyOutcome::Suppressed, "window restarted at 400ms");
        assert_eq!(inbox.0.lock().len(), 1);
    }

    #[test]
    fn actors_are_deduplicated_independently() {
        let (inbox, notifier) = notifier();
        let t0 = Instant::now();
        notifier.notify_at(ActorId::random(), Some("no"), None, t0);
        notifier.notify_at(ActorId::random(), Some("no"), None, t0);
        assert_eq!(inbox.0.lock().len(), 2);
    }

    #[test]
    fn formatter_output_is_delivered() {
        let (inbox, notifier) = notifier();
        notifier.notify(ActorId::random(), Some("claimed"), Some(&Bold));
        let inbox = inbox.0.lock();
        assert!(inbox[0].1.is_styled());
        assert_eq!(inbox[0].1.text(), "claimed");
    }

    #[test]
    fn formatter_failure_falls_back_to_raw_text() {
        let (inbox, notifier) = notifier();
        let outcome = notifier.notify(ActorId::random(), Some("claimed"), Some(&Broken));
        assert_eq!(outcome, NotifyOutcome::Delivered);
        assert_eq!(inbox.0.lock()[0].1, RenderedMessage::raw("claimed"));
        assert_eq!(notifier.faults().fault_count(), 1);
    }

    #[test]
    fn delivery_failure_is_reported_not_raised() {
        let notifier = DenyNotifier::new(Arc::new(Offline));
        let outcome = notifier.notify(ActorId::random(), Some("claimed"), None);
        assert_eq!(outcome, NotifyOutcome::Failed);
        assert_eq!(notifier.faults().fault_count(), 1);
        assert_eq!(notifier.delivered_count(), 0);
    }

    #[test]
    fn forget_and_prune_drop_entries() {
        let (inbox, notifier) = notifier();
        let (a, b) = (ActorId::random(), ActorId::random());
        let t0 = Instant::now();
        notifier.notify_at(a, Some("no"), None, t0);
        notifier.notify_at(b, Some("no"), None, t0 + Duration::from_millis(300));

        notifier.forget(a);
        assert_eq!(
            notifier.notify_at(a, Some("no"), None, t0 + Duration::from_millis(10)),
            NotifyOutcome::Delivered
        );

        assert_eq!(notifier.prune_expired(t0 + Duration::from_millis(700)), 1);
        assert_eq!(notifier.tracked_actors(), 1);
        assert_eq!(inbox.0.lock().len(), 3);
    }

    #[test]
    fn large_map_sheds_expired_actors_on_notify() {
        let (_inbox, notifier) = notifier();
        let t0 = Instant::now();
        for _ in 0..PRUNE_THRESHOLD {
            notifier.notify_at(ActorId::random(), Some("no"), None, t0);
        }
        assert_eq!(notifier.tracked_actors(), PRUNE_THRESHOLD);

        let later = t0 + Duration::from_millis(600);
        let outcome = notifier.notify_at(ActorId::random(), Some("no"), None, later);
        assert_eq!(outcome, NotifyOutcome::Delivered);
        assert_eq!(notifier.tracked_actors(), 1);
    }

    #[test]
    fn small_map_keeps_expired_actors_until_pruned() {
        let (_inbox, notifier) = notifier();
        let t0 = Instant::now();
        notifier.notify_at(ActorId::random(), Some("no"), None, t0);
        notifier.notify_at(ActorId::random(), Some("no"), None, t0 + Duration::from_secs(5));
        assert_eq!(notifier.tracked_actors(), 2);
    }
}
