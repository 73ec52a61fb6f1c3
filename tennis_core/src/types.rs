//! Core types shared by the tennis mini-game engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scoring::Score;

/// Host timestamp in milliseconds from a monotonic clock
pub type Millis = u64;

/// Side of the court
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Human-controlled paddle on the bottom baseline
    Player,
    /// Autonomous paddle on the top baseline
    Bot,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Bot,
            Side::Bot => Side::Player,
        }
    }

    /// Vertical direction pointing toward this side's baseline.
    ///
    /// The player sits at the bottom of the court (large `y`), the bot at the top.
    pub fn toward(self) -> f32 {
        match self {
            Side::Player => 1.0,
            Side::Bot => -1.0,
        }
    }

    /// Vertical direction pointing away from this side's baseline
    pub fn away(self) -> f32 {
        -self.toward()
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Bot => "Bot",
        }
    }
}

/// Stroke side chosen for a swing
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stroke {
    /// Bound to the left strike trigger
    Backhand,
    /// Bound to the right strike trigger
    Forehand,
}

impl Stroke {
    pub fn opposite(self) -> Stroke {
        match self {
            Stroke::Backhand => Stroke::Forehand,
            Stroke::Forehand => Stroke::Backhand,
        }
    }
}

/// 2D vector in court coordinates
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }
}

/// Paddle state. `x` is the left edge, `y` the centre of the paddle band.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
}

impl Paddle {
    pub fn new(x: f32, y: f32) -> Self {
        Paddle { x, y }
    }

    /// Horizontal centre given the paddle width
    pub fn center(&self, width: f32) -> f32 {
        self.x + width / 2.0
    }
}

/// Ball state
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ball {
    /// Position
    pub pos: Vec2,
    /// Velocity in court units per tick
    pub vel: Vec2,
    /// Current rally speed, ratcheted on every contact
    pub speed: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, speed: f32) -> Self {
        Ball { pos, vel, speed }
    }

    pub fn is_moving(&self) -> bool {
        self.vel.x != 0.0 || self.vel.y != 0.0
    }
}

/// Rally state. Exclusive: the ball only moves while `Active`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RallyState {
    /// Countdown running, ball frozen at court centre
    AwaitingServe { serve_at: Millis },
    /// Ball in play, scoring checks enabled
    Active,
}

/// Player movement intent for the current frame
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveInput {
    /// Continuous pointer/drag target for the paddle centre; wins over the flags
    pub pointer_x: Option<f32>,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    pub fn zero() -> Self {
        MoveInput::default()
    }

    /// Discrete direction as -1, 0 or 1
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Events produced by a simulation tick
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Event {
    /// Countdown expired and the ball was launched toward `receiver`
    Served { receiver: Side },
    /// A paddle swung; `contact` is false for a whiff or a wrong-side miss
    Swing {
        side: Side,
        stroke: Stroke,
        contact: bool,
    },
    /// A point was awarded
    PointWon { winner: Side, score: Score },
    /// The game ended
    GameWon { winner: Side },
    /// A reward code was generated for a player win
    RewardIssued { code: String },
}

/// Read-only snapshot for hosts
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct View {
    pub now: Millis,
    pub rally: RallyState,
    /// Whole seconds left before the serve (3, 2, 1), or 0 for "Go"
    pub countdown: Option<u64>,
    pub ball: Ball,
    pub ball_radius: f32,
    pub player: Paddle,
    pub bot: Paddle,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub court_width: f32,
    pub court_height: f32,
    pub score: Score,
    pub is_over: bool,
    pub winner: Option<Side>,
    pub advantage: Option<Side>,
    pub call: String,
    pub player_facing: Stroke,
    pub player_swinging: bool,
    pub bot_facing: Stroke,
    pub bot_swinging: bool,
    /// Side that makes the first touch of the next (or current) rally
    pub receiver: Side,
}
