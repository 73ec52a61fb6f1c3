//! Strike trigger disambiguation for the player's paddle.
//!
//! Two independent triggers feed one swing: the left trigger asks for a
//! backhand, the right one for a forehand. A trigger only counts while it is
//! younger than the tap window, the fresher of two usable triggers wins, and a
//! resolved swing locks out further swings for the cooldown.

use crate::types::{Millis, Stroke};

/// Strike trigger state for one paddle
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeInput {
    tap_window_ms: Millis,
    cooldown_ms: Millis,
    /// Last unconsumed trigger time per side
    backhand_at: Option<Millis>,
    forehand_at: Option<Millis>,
    /// Earliest time the next swing may resolve
    next_allowed_at: Millis,
    facing: Stroke,
    last_swing: Option<(Stroke, Millis)>,
}

impl StrikeInput {
    pub fn new(tap_window_ms: Millis, cooldown_ms: Millis) -> Self {
        StrikeInput {
            tap_window_ms,
            cooldown_ms,
            backhand_at: None,
            forehand_at: None,
            next_allowed_at: 0,
            facing: Stroke::Forehand,
            last_swing: None,
        }
    }

    pub fn on_cooldown(&self, now: Millis) -> bool {
        now < self.next_allowed_at
    }

    pub fn next_allowed_at(&self) -> Millis {
        self.next_allowed_at
    }

    /// Side the paddle currently faces
    pub fn facing(&self) -> Stroke {
        self.facing
    }

    pub fn last_swing(&self) -> Option<(Stroke, Millis)> {
        self.last_swing
    }

    /// Record a trigger press.
    ///
    /// Returns false when the press was dropped because of the cooldown.
    pub fn record(&mut self, stroke: Stroke, now: Millis) -> bool {
        if self.on_cooldown(now) {
            return false;
        }

        match stroke {
            Stroke::Backhand => self.backhand_at = Some(now),
            Stroke::Forehand => self.forehand_at = Some(now),
        }
        self.facing = stroke;
        true
    }

    /// Decide whether a swing happens this tick and on which side.
    ///
    /// A resolved swing consumes both triggers and starts the cooldown, whether
    /// or not the ball ends up being hit.
    pub fn resolve(&mut self, now: Millis) -> Option<Stroke> {
        if self.on_cooldown(now) {
            return None;
        }

        let fresh = |at: Option<Millis>| at.filter(|&t| now.saturating_sub(t) <= self.tap_window_ms);
        let stroke = match (fresh(self.backhand_at), fresh(self.forehand_at)) {
            (None, None) => {
                // Stale presses never come back into the window
                self.backhand_at = None;
                self.forehand_at = None;
                return None;
            }
            (Some(_), None) => Stroke::Backhand,
            (None, Some(_)) => Stroke::Forehand,
            (Some(back), Some(fore)) => {
                if back > fore {
                    Stroke::Backhand
                } else {
                    Stroke::Forehand
                }
            }
        };

        self.backhand_at = None;
        self.forehand_at = None;
        self.next_allowed_at = now + self.cooldown_ms;
        self.facing = stroke;
        self.last_swing = Some((stroke, now));
        Some(stroke)
    }

    /// Whether the swing animation is still running
    pub fn is_swinging(&self, now: Millis, swing_duration_ms: Millis) -> bool {
        self.last_swing
            .is_some_and(|(_, at)| now.saturating_sub(at) < swing_duration_ms)
    }
}
