//! Serve countdown and rally lifecycle.

use rand::Rng;

use crate::config::Config;
use crate::physics::Physics;
use crate::types::*;

/// Owns the rally state and who receives the next serve
#[derive(Debug, Clone, PartialEq)]
pub struct RallyManager {
    state: RallyState,
    /// Side that must make the first touch of the rally
    receiver: Side,
    countdown_ms: Millis,
}

impl RallyManager {
    /// Start in countdown with the player receiving the first serve
    pub fn new(now: Millis, config: &Config) -> Self {
        RallyManager {
            state: RallyState::AwaitingServe {
                serve_at: now + config.countdown_ms,
            },
            receiver: Side::Player,
            countdown_ms: config.countdown_ms,
        }
    }

    pub fn state(&self) -> RallyState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RallyState::Active
    }

    pub fn receiver(&self) -> Side {
        self.receiver
    }

    /// Vertical direction of the next serve, +1 toward the player
    pub fn serve_direction(&self) -> f32 {
        self.receiver.toward()
    }

    /// Begin a new rally after a point; the loser receives the serve
    pub fn start_rally(&mut self, point_loser: Side, ball: &mut Ball, config: &Config, now: Millis) {
        self.receiver = point_loser;
        self.state = RallyState::AwaitingServe {
            serve_at: now + self.countdown_ms,
        };
        Physics::center_ball(ball, config);
    }

    /// Launch the ball once the countdown has expired.
    ///
    /// Returns true on the tick the rally became active.
    pub fn try_serve<R: Rng + ?Sized>(
        &mut self,
        ball: &mut Ball,
        config: &Config,
        rng: &mut R,
        now: Millis,
    ) -> bool {
        match self.state {
            RallyState::AwaitingServe { serve_at } if now >= serve_at => {
                Physics::serve_ball(ball, self.serve_direction(), config, rng);
                self.state = RallyState::Active;
                true
            }
            _ => false,
        }
    }

    /// Countdown digit for display: 3, 2, 1, then 0 ("Go") on the last stretch
    pub fn countdown(&self, now: Millis) -> Option<u64> {
        match self.state {
            RallyState::AwaitingServe { serve_at } => {
                let remaining = serve_at.saturating_sub(now);
                Some(remaining.div_ceil(1000))
            }
            RallyState::Active => None,
        }
    }
}
