//! Paddle controllers: the human player and the bot.

use rand::Rng;

use crate::config::Config;
use crate::physics::Physics;
use crate::types::*;

/// Keep a paddle's left edge inside the walls
pub fn clamp_paddle_x(x: f32, config: &Config) -> f32 {
    x.clamp(config.left_wall(), config.paddle_max_x())
}

/// Move the paddle centre toward `target` by at most `max_step`
fn step_toward(paddle: &mut Paddle, target: f32, max_step: f32, config: &Config) {
    let delta = (target - paddle.center(config.paddle_width)).clamp(-max_step, max_step);
    paddle.x = clamp_paddle_x(paddle.x + delta, config);
}

/// Player-driven paddle movement
#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    pub input: MoveInput,
}

impl PlayerController {
    pub fn new() -> Self {
        PlayerController::default()
    }

    /// Pointer target wins over the direction flags
    pub fn update(&self, paddle: &mut Paddle, config: &Config) {
        match self.input.pointer_x {
            Some(target) => step_toward(paddle, target, config.pointer_max_step, config),
            None => {
                paddle.x = clamp_paddle_x(paddle.x + self.input.axis() * config.player_speed, config);
            }
        }
    }
}

/// A bot swing decided this tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BotSwing {
    pub stroke: Stroke,
    /// False when the bot deliberately picked the wrong side
    pub correct_side: bool,
}

/// Autonomous paddle
#[derive(Debug, Clone, Default)]
pub struct BotController {
    /// Aim error for the current approach
    aim_offset: Option<f32>,
    /// The bot already swung during the current approach
    committed: bool,
    approaching: bool,
    facing: Option<Stroke>,
    last_swing: Option<(Stroke, Millis)>,
}

impl BotController {
    pub fn new() -> Self {
        BotController::default()
    }

    /// Forget everything about the previous rally
    pub fn reset(&mut self) {
        self.aim_offset = None;
        self.committed = false;
        self.approaching = false;
    }

    pub fn facing(&self) -> Stroke {
        self.facing.unwrap_or(Stroke::Forehand)
    }

    pub fn is_swinging(&self, now: Millis, swing_duration_ms: Millis) -> bool {
        self.last_swing
            .is_some_and(|(_, at)| now.saturating_sub(at) < swing_duration_ms)
    }

    /// Move the bot paddle for one tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        paddle: &mut Paddle,
        ball: &Ball,
        rally_active: bool,
        config: &Config,
        rng: &mut R,
    ) {
        let approaching = rally_active && ball.vel.y * Side::Bot.toward() > 0.0;
        if approaching && !self.approaching {
            // New approach: fresh aim error, fresh swing
            self.aim_offset = Some(self.draw_aim_offset(config, rng));
            self.committed = false;
        }
        self.approaching = approaching;

        let court_center = config.court_width / 2.0;
        if !approaching {
            step_toward(paddle, court_center, config.bot_ready_speed, config);
            return;
        }

        let target = ball.pos.x + self.aim_offset.unwrap_or(0.0);
        let footprint = paddle.x..=paddle.x + config.paddle_width;
        let speed = if footprint.contains(&target) {
            config.bot_track_speed * config.bot_settle_factor
        } else {
            config.bot_track_speed
        };
        step_toward(paddle, target, speed, config);
    }

    fn draw_aim_offset<R: Rng + ?Sized>(&self, config: &Config, rng: &mut R) -> f32 {
        let spread = config.bot_error_spread * (1.0 - config.bot_skill);
        if spread <= 0.0 {
            return 0.0;
        }
        (rng.gen::<f32>() - 0.5) * spread
    }

    /// Decide the bot's swing once the ball is in reach.
    ///
    /// One swing per approach; the stroke side is wrong with the configured
    /// probability, which turns a reachable ball into a miss.
    pub fn try_swing<R: Rng + ?Sized>(
        &mut self,
        paddle: &Paddle,
        ball: &Ball,
        config: &Config,
        rng: &mut R,
        now: Millis,
    ) -> Option<BotSwing> {
        if self.committed || !Physics::in_reach(ball, paddle, config) {
            return None;
        }
        self.committed = true;

        let needed = Physics::needed_stroke(ball, paddle, Side::Bot, config);
        let stroke = if rng.gen::<f32>() < config.wrong_stroke_probability {
            needed.opposite()
        } else {
            needed
        };

        self.facing = Some(stroke);
        self.last_swing = Some((stroke, now));
        Some(BotSwing {
            stroke,
            correct_side: stroke == needed,
        })
    }
}
