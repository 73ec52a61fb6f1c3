//! Tunable constants for the mini-game.
//!
//! Defaults reproduce the shipped game feel; hosts may override any field.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Millis, Side};

/// Reward code format
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardConfig {
    /// Literal placed before the random body
    pub prefix: String,
    /// Number of base-36 characters in the random body
    pub code_length: usize,
    /// Discount percentage encoded in the suffix
    pub discount_percent: u8,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig {
            prefix: "TENNIS-".to_string(),
            code_length: 6,
            discount_percent: 10,
        }
    }
}

impl RewardConfig {
    /// Literal placed after the random body, e.g. `-10OFF`
    pub fn suffix(&self) -> String {
        format!("-{}OFF", self.discount_percent)
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Court width in court units
    pub court_width: f32,
    /// Court height in court units
    pub court_height: f32,
    /// Distance of the side walls from the court edges
    pub side_inset: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Centre of the player's paddle band
    pub player_baseline: f32,
    /// Centre of the bot's paddle band
    pub bot_baseline: f32,

    pub ball_radius: f32,
    /// Serve speed and lower bound of the rally speed
    pub initial_speed: f32,
    /// Upper bound of the rally speed
    pub max_speed: f32,
    /// Multiplier applied to the speed on every contact
    pub speed_growth: f32,
    /// Flat increment added after the multiplier
    pub speed_increment: f32,
    /// Scales the outgoing horizontal velocity from the contact offset
    pub angle_coefficient: f32,
    pub vy_multiplier_min: f32,
    pub vy_multiplier_max: f32,
    /// Max absolute horizontal velocity of a serve
    pub serve_spread: f32,
    /// Horizontal slack around the paddle for a contact
    pub reach_tolerance_x: f32,
    /// Vertical slack around the paddle band for a contact
    pub reach_tolerance_y: f32,

    /// Player paddle speed from the direction flags (units per tick)
    pub player_speed: f32,
    /// Max per-tick paddle travel when following the pointer
    pub pointer_max_step: f32,

    /// Bot accuracy in [0, 1]
    pub bot_skill: f32,
    /// Chance the bot picks the wrong stroke side
    pub wrong_stroke_probability: f32,
    /// Drift speed toward the court centre
    pub bot_ready_speed: f32,
    /// Speed while tracking an approaching ball
    pub bot_track_speed: f32,
    /// Full width of the aim error band at zero skill
    pub bot_error_spread: f32,
    /// Speed factor when the target is already under the paddle
    pub bot_settle_factor: f32,

    /// How long a strike trigger stays usable
    pub tap_window_ms: Millis,
    /// Minimum time between two player swings
    pub cooldown_ms: Millis,
    /// Pre-serve countdown
    pub countdown_ms: Millis,
    /// Length of the swing animation window reported to hosts
    pub swing_duration_ms: Millis,

    pub reward: RewardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            court_width: 400.0,
            court_height: 600.0,
            side_inset: 10.0,

            paddle_width: 70.0,
            paddle_height: 12.0,
            player_baseline: 560.0,
            bot_baseline: 40.0,

            ball_radius: 7.0,
            initial_speed: 5.0,
            max_speed: 13.0,
            speed_growth: 1.05,
            speed_increment: 0.15,
            angle_coefficient: 0.6,
            vy_multiplier_min: 0.9,
            vy_multiplier_max: 1.2,
            serve_spread: 1.5,
            reach_tolerance_x: 8.0,
            reach_tolerance_y: 18.0,

            player_speed: 7.0,
            pointer_max_step: 10.0,

            bot_skill: 0.75,
            wrong_stroke_probability: 0.35,
            bot_ready_speed: 2.0,
            bot_track_speed: 5.5,
            bot_error_spread: 80.0,
            bot_settle_factor: 0.4,

            tap_window_ms: 160,
            cooldown_ms: 600,
            countdown_ms: 3000,
            swing_duration_ms: 250,

            reward: RewardConfig::default(),
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON configuration and validate it
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()
    }

    /// Check every field, returning the config unchanged when it is usable
    pub fn validate(self) -> Result<Config, ConfigError> {
        let geometry = [
            ("side_inset", self.side_inset),
            ("player_baseline", self.player_baseline),
            ("bot_baseline", self.bot_baseline),
            ("speed_increment", self.speed_increment),
            ("angle_coefficient", self.angle_coefficient),
            ("vy_multiplier_max", self.vy_multiplier_max),
            ("serve_spread", self.serve_spread),
            ("reach_tolerance_x", self.reach_tolerance_x),
            ("reach_tolerance_y", self.reach_tolerance_y),
            ("bot_error_spread", self.bot_error_spread),
        ];
        for (field, value) in geometry {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite {
                    field,
                    value: value as f64,
                });
            }
        }

        let non_negatives = [
            ("side_inset", self.side_inset),
            ("angle_coefficient", self.angle_coefficient),
            ("serve_spread", self.serve_spread),
            ("reach_tolerance_x", self.reach_tolerance_x),
            ("reach_tolerance_y", self.reach_tolerance_y),
            ("bot_error_spread", self.bot_error_spread),
        ];
        for (field, value) in non_negatives {
            if value < 0.0 {
                return Err(ConfigError::Negative {
                    field,
                    value: value as f64,
                });
            }
        }

        let positives = [
            ("court_width", self.court_width),
            ("court_height", self.court_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
            ("initial_speed", self.initial_speed),
            ("max_speed", self.max_speed),
            ("speed_growth", self.speed_growth),
            ("vy_multiplier_min", self.vy_multiplier_min),
            ("player_speed", self.player_speed),
            ("pointer_max_step", self.pointer_max_step),
            ("bot_ready_speed", self.bot_ready_speed),
            ("bot_track_speed", self.bot_track_speed),
        ];
        for (field, value) in positives {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NotPositive {
                    field,
                    value: value as f64,
                });
            }
        }

        for (field, value) in [
            ("tap_window_ms", self.tap_window_ms),
            ("cooldown_ms", self.cooldown_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::NotPositive {
                    field,
                    value: value as f64,
                });
            }
        }

        let probabilities = [
            ("bot_skill", self.bot_skill),
            ("wrong_stroke_probability", self.wrong_stroke_probability),
            ("bot_settle_factor", self.bot_settle_factor),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::NotAProbability {
                    field,
                    value: value as f64,
                });
            }
        }

        if self.initial_speed > self.max_speed {
            return Err(ConfigError::InvertedRange {
                field: "initial_speed",
                min: self.initial_speed as f64,
                other: "max_speed",
                max: self.max_speed as f64,
            });
        }
        if self.vy_multiplier_min > self.vy_multiplier_max {
            return Err(ConfigError::InvertedRange {
                field: "vy_multiplier_min",
                min: self.vy_multiplier_min as f64,
                other: "vy_multiplier_max",
                max: self.vy_multiplier_max as f64,
            });
        }
        if self.bot_baseline >= self.player_baseline {
            return Err(ConfigError::InvertedRange {
                field: "bot_baseline",
                min: self.bot_baseline as f64,
                other: "player_baseline",
                max: self.player_baseline as f64,
            });
        }

        if self.paddle_width > self.playable_width() {
            return Err(ConfigError::PaddleTooWide {
                paddle_width: self.paddle_width,
                playable: self.playable_width(),
            });
        }

        if !(1..=16).contains(&self.reward.code_length) {
            return Err(ConfigError::CodeLength(self.reward.code_length));
        }

        Ok(self)
    }

    /// Left wall x
    pub fn left_wall(&self) -> f32 {
        self.side_inset
    }

    /// Right wall x
    pub fn right_wall(&self) -> f32 {
        self.court_width - self.side_inset
    }

    pub fn playable_width(&self) -> f32 {
        self.right_wall() - self.left_wall()
    }

    /// Largest legal paddle left edge
    pub fn paddle_max_x(&self) -> f32 {
        self.right_wall() - self.paddle_width
    }

    /// Paddle left edge that centres it on the court
    pub fn paddle_center_x(&self) -> f32 {
        (self.court_width - self.paddle_width) / 2.0
    }

    /// Centre of the given side's paddle band
    pub fn baseline(&self, side: Side) -> f32 {
        match side {
            Side::Player => self.player_baseline,
            Side::Bot => self.bot_baseline,
        }
    }
}
