//! Ball physics for the tennis court.

use rand::Rng;

use crate::config::Config;
use crate::types::*;

/// Physics calculations for game simulation
pub struct Physics;

impl Physics {
    /// Park the ball at court centre with no velocity
    pub fn center_ball(ball: &mut Ball, config: &Config) {
        ball.pos = Vec2::new(config.court_width / 2.0, config.court_height / 2.0);
        ball.vel = Vec2::zero();
        ball.speed = config.initial_speed;
    }

    /// Launch the ball from court centre; `direction` is the sign of the
    /// vertical velocity, +1 toward the player
    pub fn serve_ball<R: Rng + ?Sized>(
        ball: &mut Ball,
        direction: f32,
        config: &Config,
        rng: &mut R,
    ) {
        Self::center_ball(ball, config);

        let vx = if config.serve_spread > 0.0 {
            rng.gen_range(-config.serve_spread..=config.serve_spread)
        } else {
            0.0
        };
        ball.vel = Vec2::new(vx, direction.signum() * config.initial_speed);
    }

    /// Integrate one tick and bounce off the side walls
    pub fn update_ball(ball: &mut Ball, config: &Config) {
        ball.pos.x += ball.vel.x;
        ball.pos.y += ball.vel.y;

        let left = config.left_wall() + config.ball_radius;
        let right = config.right_wall() - config.ball_radius;

        if ball.pos.x <= left {
            ball.pos.x = left;
            ball.vel.x = ball.vel.x.abs();
        } else if ball.pos.x >= right {
            ball.pos.x = right;
            ball.vel.x = -ball.vel.x.abs();
        }
    }

    /// Whether the ball is level with the paddle, ignoring x
    pub fn in_band(ball: &Ball, paddle: &Paddle, config: &Config) -> bool {
        let band = config.paddle_height / 2.0 + config.reach_tolerance_y;
        (ball.pos.y - paddle.y).abs() <= band
    }

    /// Whether the ball lies inside the paddle's hitting zone
    pub fn in_reach(ball: &Ball, paddle: &Paddle, config: &Config) -> bool {
        let vertical = Self::in_band(ball, paddle, config);

        let horizontal = ball.pos.x >= paddle.x - config.reach_tolerance_x
            && ball.pos.x <= paddle.x + config.paddle_width + config.reach_tolerance_x;

        vertical && horizontal
    }

    /// Stroke side a paddle needs to reach the ball.
    ///
    /// Sides are taken from the paddle owner's point of view: the player faces
    /// up the court, the bot faces down it, so their forehands are mirrored.
    pub fn needed_stroke(ball: &Ball, paddle: &Paddle, side: Side, config: &Config) -> Stroke {
        let on_screen_right = ball.pos.x >= paddle.center(config.paddle_width);
        let on_owner_right = match side {
            Side::Player => on_screen_right,
            Side::Bot => !on_screen_right,
        };

        if on_owner_right {
            Stroke::Forehand
        } else {
            Stroke::Backhand
        }
    }

    /// Apply a successful contact: ratchet speed, aim away from the striker's
    /// baseline and angle by the contact offset
    pub fn strike<R: Rng + ?Sized>(
        ball: &mut Ball,
        paddle: &Paddle,
        side: Side,
        config: &Config,
        rng: &mut R,
    ) {
        ball.speed = (ball.speed * config.speed_growth + config.speed_increment)
            .clamp(config.initial_speed, config.max_speed);

        let multiplier = if config.vy_multiplier_max > config.vy_multiplier_min {
            rng.gen_range(config.vy_multiplier_min..=config.vy_multiplier_max)
        } else {
            config.vy_multiplier_min
        };
        ball.vel.y = side.away() * ball.speed * multiplier;

        let half_width = config.paddle_width / 2.0;
        let offset = ((ball.pos.x - paddle.center(config.paddle_width)) / half_width).clamp(-1.0, 1.0);
        ball.vel.x = offset * config.angle_coefficient * ball.speed;

        // Move clear of the paddle so the same contact is not seen again
        let clearance = config.paddle_height / 2.0 + config.reach_tolerance_y + 1.0;
        ball.pos.y = paddle.y + side.away() * clearance;
    }

    /// Check if the ball left the court past a baseline (scoring condition)
    pub fn check_scoring(ball: &Ball, config: &Config) -> Option<Side> {
        if ball.pos.y - config.ball_radius <= 0.0 {
            Some(Side::Player) // Passed the bot
        } else if ball.pos.y + config.ball_radius >= config.court_height {
            Some(Side::Bot) // Passed the player
        } else {
            None
        }
    }
}
