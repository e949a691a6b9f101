//! Swipe classifier: turns per-frame hand centroids into debounced commands.
//!
//! # Algorithm
//!
//! ```text
//! no hand ───────────────────────────────▶ None, state unchanged
//! first sighting ────────────────────────▶ None, remember centroid
//! cooldown not elapsed ──────────────────▶ None, remember centroid
//! |dx| > swipe && |dx| > |dy| ───────────▶ Right / Left, arm cooldown
//! |dy| > vertical ───────────────────────▶ Roll / Jump, arm cooldown
//! otherwise ─────────────────────────────▶ None
//! ```
//!
//! `dx`/`dy` are measured against the **previous frame's** centroid, not the
//! position at the last trigger.  The reference point is refreshed on every
//! frame that has a hand, so sensitivity tracks inter-frame velocity rather
//! than accumulated travel.
//!
//! Image coordinates grow downward: a positive `dy` is a downward swipe
//! (roll), a negative one an upward swipe (jump).

use std::time::Duration;

use crate::command::Command;

// ---------------------------------------------------------------------------
// Centroid
// ---------------------------------------------------------------------------

/// Averaged hand position for one frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub x: f32,
    pub y: f32,
}

impl Centroid {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ---------------------------------------------------------------------------
// GestureThresholds
// ---------------------------------------------------------------------------

/// Static tuning for [`classify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Minimum horizontal inter-frame movement (pixels) for a left/right swipe.
    pub swipe: f32,
    /// Minimum vertical inter-frame movement (pixels) for jump/roll.
    pub vertical: f32,
    /// Minimum time between two triggers.
    pub cooldown: Duration,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            swipe: 40.0,
            vertical: 40.0,
            cooldown: Duration::from_secs(1),
        }
    }
}

// ---------------------------------------------------------------------------
// GestureState
// ---------------------------------------------------------------------------

/// Classifier memory, owned by the gesture loop and threaded through every
/// [`classify`] call.
///
/// Timestamps are offsets from the session start.  `last_trigger` only ever
/// moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureState {
    previous: Option<Centroid>,
    last_trigger: Option<Duration>,
}

impl GestureState {
    pub fn previous_centroid(&self) -> Option<Centroid> {
        self.previous
    }

    pub fn last_trigger(&self) -> Option<Duration> {
        self.last_trigger
    }

    fn cooled_down(&self, now: Duration, cooldown: Duration) -> bool {
        match self.last_trigger {
            None => true,
            Some(t) => now.saturating_sub(t) > cooldown,
        }
    }
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Advance the classifier by one frame.
///
/// Never fails.  A centroid with non-finite coordinates is treated as "no
/// motion": `None` is returned and the state is left as it was.
pub fn classify(
    state: GestureState,
    centroid: Option<Centroid>,
    now: Duration,
    thresholds: &GestureThresholds,
) -> (GestureState, Option<Command>) {
    let Some(current) = centroid else {
        return (state, None);
    };
    if !current.is_finite() {
        return (state, None);
    }

    let mut next = GestureState {
        previous: Some(current),
        ..state
    };

    let Some(previous) = state.previous else {
        return (next, None);
    };

    if !state.cooled_down(now, thresholds.cooldown) {
        return (next, None);
    }

    let dx = current.x - previous.x;
    let dy = current.y - previous.y;

    let command = if dx.abs() > thresholds.swipe && dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Command::Right } else { Command::Left })
    } else if dy.abs() > thresholds.vertical {
        Some(if dy > 0.0 { Command::Roll } else { Command::Jump })
    } else {
        None
    };

    if command.is_some() {
        next.last_trigger = Some(now);
    }

    (next, command)
}

// ---------------------------------------------------------------------------
// GestureClassifier
// ---------------------------------------------------------------------------

/// Convenience owner of a [`GestureState`] plus its thresholds.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
    state: GestureState,
}

impl GestureClassifier {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            state: GestureState::default(),
        }
    }

    /// Feed one frame; returns the command it triggered, if any.
    pub fn observe(&mut self, centroid: Option<Centroid>, now: Duration) -> Option<Command> {
        let (state, command) = classify(self.state, centroid, now, &self.thresholds);
        self.state = state;
        command
    }

    /// Forget the previous centroid and the cooldown.  Called at loop start.
    pub fn reset(&mut self) {
        self.state = GestureState::default();
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    /// State whose previous centroid is the origin and whose cooldown has
    /// long elapsed by `secs(10.0)`.
    fn primed() -> GestureState {
        GestureState {
            previous: Some(Centroid::new(0.0, 0.0)),
            last_trigger: Some(secs(0.0)),
        }
    }

    fn run(centroid: (f32, f32)) -> Option<Command> {
        let (_, cmd) = classify(
            primed(),
            Some(Centroid::new(centroid.0, centroid.1)),
            secs(10.0),
            &GestureThresholds::default(),
        );
        cmd
    }

    // --- Direction ----------------------------------------------------------

    #[test]
    fn horizontal_swipe_right() {
        assert_eq!(run((50.0, 10.0)), Some(Command::Right));
    }

    #[test]
    fn horizontal_swipe_left() {
        assert_eq!(run((-50.0, 10.0)), Some(Command::Left));
    }

    #[test]
    fn downward_swipe_rolls() {
        assert_eq!(run((5.0, 50.0)), Some(Command::Roll));
    }

    #[test]
    fn upward_swipe_jumps() {
        assert_eq!(run((5.0, -50.0)), Some(Command::Jump));
    }

    #[test]
    fn small_motion_is_ignored() {
        assert_eq!(run((30.0, -20.0)), None);
    }

    #[test]
    fn vertical_wins_when_dy_dominates() {
        // Both exceed their thresholds but |dx| <= |dy|.
        assert_eq!(run((50.0, 60.0)), Some(Command::Roll));
        assert_eq!(run((50.0, -50.0)), Some(Command::Jump));
    }

    #[test]
    fn horizontal_wins_when_dx_dominates() {
        assert_eq!(run((-70.0, 60.0)), Some(Command::Left));
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(run((40.0, 0.0)), None);
        assert_eq!(run((0.0, 40.0)), None);
    }

    // --- Bootstrap / no hand -----------------------------------------------

    #[test]
    fn no_hand_leaves_state_unchanged() {
        let state = primed();
        let (next, cmd) = classify(state, None, secs(10.0), &GestureThresholds::default());
        assert_eq!(cmd, None);
        assert_eq!(next, state);
    }

    #[test]
    fn first_sighting_only_records_centroid() {
        let (next, cmd) = classify(
            GestureState::default(),
            Some(Centroid::new(300.0, 200.0)),
            secs(5.0),
            &GestureThresholds::default(),
        );
        assert_eq!(cmd, None);
        assert_eq!(next.previous_centroid(), Some(Centroid::new(300.0, 200.0)));
        assert_eq!(next.last_trigger(), None);
    }

    #[test]
    fn first_swipe_of_a_session_is_not_suppressed() {
        let mut clf = GestureClassifier::new(GestureThresholds::default());
        assert_eq!(clf.observe(Some(Centroid::new(0.0, 0.0)), secs(0.0)), None);
        assert_eq!(
            clf.observe(Some(Centroid::new(60.0, 0.0)), secs(0.03)),
            Some(Command::Right)
        );
    }

    #[test]
    fn non_finite_centroid_is_no_motion() {
        let state = primed();
        let (next, cmd) = classify(
            state,
            Some(Centroid::new(f32::NAN, 10.0)),
            secs(10.0),
            &GestureThresholds::default(),
        );
        assert_eq!(cmd, None);
        assert_eq!(next, state);
    }

    // --- Cooldown -----------------------------------------------------------

    #[test]
    fn second_trigger_inside_cooldown_is_suppressed() {
        let mut clf = GestureClassifier::new(GestureThresholds::default());
        clf.observe(Some(Centroid::new(0.0, 0.0)), secs(0.0));
        assert_eq!(
            clf.observe(Some(Centroid::new(60.0, 0.0)), secs(0.1)),
            Some(Command::Right)
        );
        // Another large delta, 0.5 s later: still cooling down.
        assert_eq!(clf.observe(Some(Centroid::new(0.0, 0.0)), secs(0.6)), None);
    }

    #[test]
    fn cooldown_still_refreshes_reference_point() {
        let state = GestureState {
            previous: Some(Centroid::new(0.0, 0.0)),
            last_trigger: Some(secs(1.0)),
        };
        let (next, cmd) = classify(
            state,
            Some(Centroid::new(500.0, 0.0)),
            secs(1.5),
            &GestureThresholds::default(),
        );
        assert_eq!(cmd, None);
        assert_eq!(next.previous_centroid(), Some(Centroid::new(500.0, 0.0)));
        assert_eq!(next.last_trigger(), Some(secs(1.0)));
    }

    #[test]
    fn cooldown_boundary_is_exclusive() {
        let state = GestureState {
            previous: Some(Centroid::new(0.0, 0.0)),
            last_trigger: Some(Duration::from_secs(2)),
        };
        let t = GestureThresholds::default();
        let (_, at_boundary) = classify(state, Some(Centroid::new(80.0, 0.0)), Duration::from_secs(3), &t);
        assert_eq!(at_boundary, None);
        let (_, after) = classify(
            state,
            Some(Centroid::new(80.0, 0.0)),
            Duration::from_millis(3_001),
            &t,
        );
        assert_eq!(after, Some(Command::Right));
    }

    #[test]
    fn trigger_after_cooldown_is_accepted_again() {
        let mut clf = GestureClassifier::new(GestureThresholds::default());
        clf.observe(Some(Centroid::new(0.0, 0.0)), secs(0.0));
        assert_eq!(clf.observe(Some(Centroid::new(0.0, 60.0)), secs(0.1)), Some(Command::Roll));
        assert_eq!(clf.observe(Some(Centroid::new(0.0, 0.0)), secs(1.2)), Some(Command::Jump));
        assert_eq!(clf.state().last_trigger(), Some(secs(1.2)));
    }

    // --- Velocity, not displacement -----------------------------------------

    #[test]
    fn slow_drift_never_triggers() {
        // 300 px of travel in 10 px steps: no single frame exceeds 40 px.
        let mut clf = GestureClassifier::new(GestureThresholds::default());
        let mut fired = Vec::new();
        for i in 0..30 {
            let x = i as f32 * 10.0;
            if let Some(cmd) = clf.observe(Some(Centroid::new(x, 0.0)), secs(i as f32)) {
                fired.push(cmd);
            }
        }
        assert!(fired.is_empty(), "unexpected triggers: {fired:?}");
    }

    #[test]
    fn reset_forgets_previous_centroid() {
        let mut clf = GestureClassifier::new(GestureThresholds::default());
        clf.observe(Some(Centroid::new(0.0, 0.0)), secs(0.0));
        clf.reset();
        // Without a previous centroid the next sighting only bootstraps.
        assert_eq!(clf.observe(Some(Centroid::new(90.0, 0.0)), secs(5.0)), None);
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let t = GestureThresholds {
            swipe: 10.0,
            vertical: 100.0,
            cooldown: Duration::from_millis(200),
        };
        let mut clf = GestureClassifier::new(t);
        clf.observe(Some(Centroid::new(0.0, 0.0)), secs(0.0));
        assert_eq!(clf.observe(Some(Centroid::new(0.0, 60.0)), secs(1.0)), None);
        assert_eq!(clf.observe(Some(Centroid::new(15.0, 60.0)), secs(2.0)), Some(Command::Right));
    }
}
