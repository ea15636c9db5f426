use std::time::{Duration, Instant};

/// Default debounce between a field edit and the preview recompute.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase {
    Idle,
    Editing,
    Previewing,
}

/// Per-edit-session state machine: `idle → editing → (debounced) →
/// previewing → idle`.
///
/// Single-user, single-session: the server side computes each round-trip
/// independently from its own payload, so the only ordering concern is
/// stale responses. Every edit gets a monotonically increasing sequence
/// number; a response is applied only if its sequence is newer than the last
/// one applied, which gives last-edit-wins without true cancellation.
///
/// All time-dependent methods take `now` explicitly so tests drive the
/// clock.
#[derive(Debug)]
pub struct PreviewChannel {
    debounce: Duration,
    phase: PreviewPhase,
    last_edit_at: Option<Instant>,
    next_seq: u64,
    latest_seq: u64,
    last_applied: u64,
}

impl PreviewChannel {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            phase: PreviewPhase::Idle,
            last_edit_at: None,
            next_seq: 1,
            latest_seq: 0,
            last_applied: 0,
        }
    }

    pub fn phase(&self) -> PreviewPhase {
        self.phase
    }

    /// A field changed. Restarts the debounce clock and returns the sequence
    /// number assigned to this edit.
    pub fn note_edit(&mut self, now: Instant) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = seq;
        self.last_edit_at = Some(now);
        self.phase = PreviewPhase::Editing;
        seq
    }

    /// Should a preview fire? Returns the sequence to attach to the request
    /// once the debounce window has elapsed since the last edit.
    pub fn poll_fire(&mut self, now: Instant) -> Option<u64> {
        if self.phase != PreviewPhase::Editing {
            return None;
        }
        let last = self.last_edit_at?;
        if now.duration_since(last) < self.debounce {
            return None;
        }
        self.phase = PreviewPhase::Previewing;
        Some(self.latest_seq)
    }

    /// A round-trip response came back for `seq`. Returns `true` if the
    /// caller should apply it; stale responses (an even-newer one already
    /// completed) are discarded.
    pub fn complete(&mut self, seq: u64) -> bool {
        if seq <= self.last_applied {
            return false;
        }
        self.last_applied = seq;
        if seq == self.latest_seq && self.phase == PreviewPhase::Previewing {
            self.phase = PreviewPhase::Idle;
        }
        true
    }

    /// Discard all in-progress edits and return to the last saved state. The
    /// caller re-resolves from persisted config with empty overrides;
    /// sequence numbers keep increasing so any responses still in flight
    /// land stale.
    pub fn reset(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = seq;
        self.last_applied = seq;
        self.last_edit_at = None;
        self.phase = PreviewPhase::Idle;
        seq
    }
}

impl Default for PreviewChannel {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (PreviewChannel, Instant) {
        (PreviewChannel::new(Duration::from_millis(200)), Instant::now())
    }

    #[test]
    fn starts_idle_and_fires_nothing() {
        let (mut ch, t0) = channel();
        assert_eq!(ch.phase(), PreviewPhase::Idle);
        assert_eq!(ch.poll_fire(t0), None);
    }

    #[test]
    fn edit_then_debounce_then_fire() {
        let (mut ch, t0) = channel();
        let seq = ch.note_edit(t0);
        assert_eq!(ch.phase(), PreviewPhase::Editing);

        // Too early: still inside the debounce window.
        assert_eq!(ch.poll_fire(t0 + Duration::from_millis(100)), None);

        assert_eq!(ch.poll_fire(t0 + Duration::from_millis(200)), Some(seq));
        assert_eq!(ch.phase(), PreviewPhase::Previewing);
    }

    #[test]
    fn rapid_keystrokes_collapse_to_one_fire_with_latest_seq() {
        let (mut ch, t0) = channel();
        ch.note_edit(t0);
        ch.note_edit(t0 + Duration::from_millis(50));
        let last = ch.note_edit(t0 + Duration::from_millis(100));

        // Debounce measures from the LAST edit.
        assert_eq!(ch.poll_fire(t0 + Duration::from_millis(250)), None);
        assert_eq!(ch.poll_fire(t0 + Duration::from_millis(300)), Some(last));
        assert_eq!(ch.poll_fire(t0 + Duration::from_millis(400)), None);
    }

    #[test]
    fn stale_response_is_discarded_after_newer_completes() {
        let (mut ch, t0) = channel();
        let first = ch.note_edit(t0);
        let second = ch.note_edit(t0 + Duration::from_millis(10));

        // Out-of-order arrival: second completes before first.
        assert!(ch.complete(second));
        assert!(!ch.complete(first));
        assert_eq!(ch.phase(), PreviewPhase::Editing);
    }

    #[test]
    fn in_order_responses_all_apply() {
        let (mut ch, t0) = channel();
        let a = ch.note_edit(t0);
        assert!(ch.complete(a));
        let b = ch.note_edit(t0 + Duration::from_millis(300));
        assert_eq!(
            ch.poll_fire(t0 + Duration::from_millis(600)),
            Some(b)
        );
        assert!(ch.complete(b));
        assert_eq!(ch.phase(), PreviewPhase::Idle);
    }

    #[test]
    fn reset_returns_to_idle_and_invalidates_in_flight_responses() {
        let (mut ch, t0) = channel();
        let pending = ch.note_edit(t0);
        ch.reset();
        assert_eq!(ch.phase(), PreviewPhase::Idle);
        // The pre-reset response lands stale.
        assert!(!ch.complete(pending));
    }

    #[test]
    fn sequences_are_strictly_increasing_across_reset() {
        let (mut ch, t0) = channel();
        let a = ch.note_edit(t0);
        let r = ch.reset();
        let b = ch.note_edit(t0 + Duration::from_millis(1));
        assert!(a < r && r < b);
    }
}
