//! Session state and the per-frame simulation step.

use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::error::ConfigError;
use crate::input::StrikeInput;
use crate::paddle::{BotController, PlayerController};
use crate::physics::Physics;
use crate::rally::RallyManager;
use crate::reward::{RewardCallback, RewardIssuer};
use crate::scoring::{PointOutcome, Score};
use crate::types::*;

/// One game against the bot, from the first serve to the winning point
pub struct GameSession<R: Rng> {
    config: Config,
    now: Millis,
    rally: RallyManager,
    score: Score,
    ball: Ball,
    player: Paddle,
    bot: Paddle,
    player_control: PlayerController,
    bot_control: BotController,
    strikes: StrikeInput,
    rewards: RewardIssuer,
    on_reward: Option<RewardCallback>,
    coupon: Option<String>,
    rng: R,
}

impl<R: Rng> GameSession<R> {
    /// Create a session whose first serve comes after the countdown from `now`
    pub fn new(config: Config, rng: R, now: Millis) -> Result<Self, ConfigError> {
        Ok(Self::with_valid_config(config.validate()?, rng, now))
    }

    pub(crate) fn with_valid_config(config: Config, rng: R, now: Millis) -> Self {
        let center_x = config.paddle_center_x();
        let mut ball = Ball::new(Vec2::zero(), Vec2::zero(), config.initial_speed);
        Physics::center_ball(&mut ball, &config);

        GameSession {
            rally: RallyManager::new(now, &config),
            score: Score::new(),
            ball,
            player: Paddle::new(center_x, config.baseline(Side::Player)),
            bot: Paddle::new(center_x, config.baseline(Side::Bot)),
            player_control: PlayerController::new(),
            bot_control: BotController::new(),
            strikes: StrikeInput::new(config.tap_window_ms, config.cooldown_ms),
            rewards: RewardIssuer::new(config.reward.clone()),
            on_reward: None,
            coupon: None,
            now,
            config,
            rng,
        }
    }

    /// Register the host hook called once per player win
    pub fn set_reward_callback(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_reward = Some(Box::new(callback));
    }

    /// Left/right strike trigger pressed. Returns false if dropped by the cooldown.
    ///
    /// The press is judged when the ball next reaches the paddle's band.
    pub fn strike_down(&mut self, stroke: Stroke, now: Millis) -> bool {
        self.strikes.record(stroke, now)
    }

    pub fn set_move_input(&mut self, input: MoveInput) {
        self.player_control.input = input;
    }

    pub fn set_pointer(&mut self, pointer_x: Option<f32>) {
        self.player_control.input.pointer_x = pointer_x;
    }

    pub fn set_direction(&mut self, left: bool, right: bool) {
        self.player_control.input.left = left;
        self.player_control.input.right = right;
    }

    /// Step the simulation to `now`
    pub fn tick(&mut self, now: Millis) -> Vec<Event> {
        let mut events = Vec::new();
        self.now = now;

        if self.score.is_over() {
            return events;
        }

        if self
            .rally
            .try_serve(&mut self.ball, &self.config, &mut self.rng, now)
        {
            let receiver = self.rally.receiver();
            self.bot_control.reset();
            debug!(?receiver, vx = self.ball.vel.x, "ball served");
            events.push(Event::Served { receiver });
        }

        let active = self.rally.is_active();
        self.player_control.update(&mut self.player, &self.config);
        self.bot_control
            .update(&mut self.bot, &self.ball, active, &self.config, &mut self.rng);

        if !active {
            return events;
        }

        Physics::update_ball(&mut self.ball, &self.config);

        // Triggers stay buffered until the ball arrives at the player's band
        let arriving = self.ball.vel.y * Side::Player.toward() > 0.0;
        if arriving && Physics::in_band(&self.ball, &self.player, &self.config) {
            if let Some(stroke) = self.strikes.resolve(now) {
                let contact = Physics::in_reach(&self.ball, &self.player, &self.config);
                if contact {
                    Physics::strike(
                        &mut self.ball,
                        &self.player,
                        Side::Player,
                        &self.config,
                        &mut self.rng,
                    );
                }
                trace!(?stroke, contact, speed = self.ball.speed, "player swing");
                events.push(Event::Swing {
                    side: Side::Player,
                    stroke,
                    contact,
                });
            }
        }

        if let Some(swing) =
            self.bot_control
                .try_swing(&self.bot, &self.ball, &self.config, &mut self.rng, now)
        {
            let contact = swing.correct_side;
            if contact {
                Physics::strike(
                    &mut self.ball,
                    &self.bot,
                    Side::Bot,
                    &self.config,
                    &mut self.rng,
                );
            }
            trace!(stroke = ?swing.stroke, contact, speed = self.ball.speed, "bot swing");
            events.push(Event::Swing {
                side: Side::Bot,
                stroke: swing.stroke,
                contact,
            });
        }

        if let Some(scorer) = Physics::check_scoring(&self.ball, &self.config) {
            events.extend(self.award_point(scorer, now));
        }

        events
    }

    /// Award a point, restarting the rally or closing the game
    pub fn award_point(&mut self, scorer: Side, now: Millis) -> Vec<Event> {
        let outcome = self.score.award_point(scorer);
        if outcome == PointOutcome::Ignored {
            return Vec::new();
        }

        let mut events = vec![Event::PointWon {
            winner: scorer,
            score: self.score,
        }];
        debug!(?scorer, call = %self.score.call(), "point awarded");

        if outcome.continues() {
            self.rally
                .start_rally(scorer.opposite(), &mut self.ball, &self.config, now);
            self.bot_control.reset();
            return events;
        }

        self.ball.vel = Vec2::zero();
        info!(winner = ?scorer, "game won");
        events.push(Event::GameWon { winner: scorer });

        if scorer == Side::Player {
            let code = self.rewards.issue(&mut self.rng);
            info!(%code, "reward issued");
            if let Some(callback) = self.on_reward.as_mut() {
                callback(&code);
            }
            self.coupon = Some(code.clone());
            events.push(Event::RewardIssued { code });
        }

        events
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.score.is_over()
    }

    pub fn winner(&self) -> Option<Side> {
        self.score.winner
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn player_paddle(&self) -> &Paddle {
        &self.player
    }

    pub fn bot_paddle(&self) -> &Paddle {
        &self.bot
    }

    pub fn rally_state(&self) -> RallyState {
        self.rally.state()
    }

    /// Side receiving the current or next serve
    pub fn receiver(&self) -> Side {
        self.rally.receiver()
    }

    pub fn strikes(&self) -> &StrikeInput {
        &self.strikes
    }

    /// Code issued by this session's win, if any
    pub fn coupon(&self) -> Option<&str> {
        self.coupon.as_deref()
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self) -> View {
        let now = self.now;
        let swing_ms = self.config.swing_duration_ms;

        View {
            now,
            rally: self.rally.state(),
            countdown: self.rally.countdown(now),
            ball: self.ball,
            ball_radius: self.config.ball_radius,
            player: self.player,
            bot: self.bot,
            paddle_width: self.config.paddle_width,
            paddle_height: self.config.paddle_height,
            court_width: self.config.court_width,
            court_height: self.config.court_height,
            score: self.score,
            is_over: self.score.is_over(),
            winner: self.score.winner,
            advantage: self.score.advantage,
            call: self.score.call(),
            player_facing: self.strikes.facing(),
            player_swinging: self.strikes.is_swinging(now, swing_ms),
            bot_facing: self.bot_control.facing(),
            bot_swinging: self.bot_control.is_swinging(now, swing_ms),
            receiver: self.rally.receiver(),
        }
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> &'static str {
        match (self.score.winner, self.rally.state()) {
            (Some(Side::Player), _) => "You win!",
            (Some(Side::Bot), _) => "Bot wins",
            (None, RallyState::AwaitingServe { .. }) => "Get ready...",
            (None, RallyState::Active) => "Playing",
        }
    }
}

/// Which screen the host should show
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Finished,
}

/// Host-facing wrapper: menu, sessions and the coupon that outlives them
pub struct MiniGame<R: Rng + SeedableRng> {
    config: Config,
    rng: R,
    session: Option<GameSession<R>>,
    coupon: Option<String>,
    on_reward: Option<RewardCallback>,
}

impl<R: Rng + SeedableRng> MiniGame<R> {
    /// `rng` seeds every session this game creates
    pub fn new(config: Config, rng: R) -> Result<Self, ConfigError> {
        Ok(MiniGame {
            config: config.validate()?,
            rng,
            session: None,
            coupon: None,
            on_reward: None,
        })
    }

    pub fn set_reward_callback(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_reward = Some(Box::new(callback));
    }

    pub fn screen(&self) -> Screen {
        match &self.session {
            None => Screen::Menu,
            Some(session) if session.is_over() => Screen::Finished,
            Some(_) => Screen::Playing,
        }
    }

    /// Menu -> playing. Replaces any running session.
    pub fn start(&mut self, now: Millis) {
        let rng = R::seed_from_u64(self.rng.gen());
        self.session = Some(GameSession::with_valid_config(self.config.clone(), rng, now));
        debug!(now, "session started");
    }

    pub fn play_again(&mut self, now: Millis) {
        self.start(now);
    }

    /// Tear the session down; the coupon stays for the menu
    pub fn return_to_menu(&mut self) {
        self.session = None;
    }

    /// Advance the running session. Without one this is a no-op.
    pub fn tick(&mut self, now: Millis) -> Vec<Event> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        let events = session.tick(now);
        for event in &events {
            if let Event::RewardIssued { code } = event {
                if let Some(callback) = self.on_reward.as_mut() {
                    callback(code);
                }
                self.coupon = Some(code.clone());
            }
        }
        events
    }

    pub fn strike_down(&mut self, stroke: Stroke, now: Millis) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.strike_down(stroke, now))
    }

    pub fn set_move_input(&mut self, input: MoveInput) {
        if let Some(session) = self.session.as_mut() {
            session.set_move_input(input);
        }
    }

    pub fn session(&self) -> Option<&GameSession<R>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession<R>> {
        self.session.as_mut()
    }

    pub fn view(&self) -> Option<View> {
        self.session.as_ref().map(GameSession::view)
    }

    /// Most recent reward code, kept across sessions
    pub fn coupon(&self) -> Option<&str> {
        self.coupon.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> GameSession<StdRng> {
        GameSession::new(Config::default(), StdRng::seed_from_u64(0xC0FFEE), 0).unwrap()
    }

    /// Session already past the countdown with the ball in play
    fn active_session() -> GameSession<StdRng> {
        let mut game = session();
        game.tick(3000);
        assert_eq!(game.rally_state(), RallyState::Active);
        game
    }

    fn count_rewards(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, Event::RewardIssued { .. }))
            .count()
    }

    #[test]
    fn test_session_creation() {
        let game = session();

        assert_eq!(game.score(), Score::new());
        assert_eq!(game.rally_state(), RallyState::AwaitingServe { serve_at: 3000 });
        assert_eq!(game.ball().pos, Vec2::new(200.0, 300.0));
        assert!(!game.ball().is_moving());
        assert_eq!(game.receiver(), Side::Player);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            max_speed: 1.0,
            ..Config::default()
        };
        assert!(GameSession::new(config, StdRng::seed_from_u64(1), 0).is_err());
    }

    #[test]
    fn test_non_finite_geometry_is_rejected() {
        let config = Config {
            side_inset: f32::NAN,
            ..Config::default()
        };
        assert!(GameSession::new(config, StdRng::seed_from_u64(1), 0).is_err());

        let config = Config {
            serve_spread: f32::INFINITY,
            ..Config::default()
        };
        assert!(MiniGame::new(config, StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_ball_frozen_during_countdown() {
        let mut game = session();

        for now in (0..3000).step_by(16) {
            let events = game.tick(now);
            assert!(events.is_empty());
            assert_eq!(game.ball().pos, Vec2::new(200.0, 300.0));
            assert!(!game.ball().is_moving());
        }
    }

    #[test]
    fn test_paddles_move_during_countdown() {
        let mut game = session();
        let start_x = game.player_paddle().x;

        game.set_direction(true, false);
        game.tick(16);

        assert_eq!(game.player_paddle().x, start_x - game.config().player_speed);
    }

    #[test]
    fn test_countdown_to_serve() {
        let mut game = session();

        let events = game.tick(3000);

        assert_eq!(game.rally_state(), RallyState::Active);
        assert_eq!(events, vec![Event::Served { receiver: Side::Player }]);
        // First serve heads to the player
        assert!(game.ball().vel.y > 0.0);
    }

    #[test]
    fn test_ball_past_bot_scores_player() {
        let mut game = active_session();
        game.ball.pos = Vec2::new(200.0, 8.0);
        game.ball.vel = Vec2::new(0.0, -5.0);
        game.bot.x = 10.0; // Far from the ball

        let events = game.tick(3016);

        assert_eq!(game.score().player_points, 1);
        assert!(events.contains(&Event::PointWon {
            winner: Side::Player,
            score: game.score(),
        }));
        // Bot lost the point, bot receives next
        assert_eq!(game.receiver(), Side::Bot);
        assert_eq!(game.rally_state(), RallyState::AwaitingServe { serve_at: 6016 });
        assert!(!game.ball().is_moving());
    }

    #[test]
    fn test_ball_past_player_scores_bot() {
        let mut game = active_session();
        game.ball.pos = Vec2::new(30.0, 592.0);
        game.ball.vel = Vec2::new(0.0, 5.0);
        game.player.x = 320.0;

        game.tick(3016);

        assert_eq!(game.score().bot_points, 1);
        assert_eq!(game.receiver(), Side::Player);
        assert_eq!(game.ball().pos, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_player_contact_returns_ball() {
        let mut game = active_session();
        game.player.x = 165.0;
        game.ball.pos = Vec2::new(200.0, 550.0);
        game.ball.vel = Vec2::new(0.0, 5.0);

        assert!(game.strike_down(Stroke::Forehand, 3010));
        let events = game.tick(3016);

        assert!(events.contains(&Event::Swing {
            side: Side::Player,
            stroke: Stroke::Forehand,
            contact: true,
        }));
        assert!(game.ball().vel.y < 0.0);
        assert!(game.ball().speed > game.config().initial_speed);
        assert_eq!(game.strikes().next_allowed_at(), 3016 + 600);
    }

    #[test]
    fn test_whiff_consumes_cooldown() {
        let mut game = active_session();
        // Ball arrives level with the paddle but wide of it
        game.player.x = 10.0;
        game.ball.pos = Vec2::new(300.0, 550.0);
        game.ball.vel = Vec2::new(0.0, 5.0);

        assert!(game.strike_down(Stroke::Backhand, 3010));
        let events = game.tick(3016);

        assert!(events.contains(&Event::Swing {
            side: Side::Player,
            stroke: Stroke::Backhand,
            contact: false,
        }));
        assert_eq!(game.strikes().next_allowed_at(), 3016 + 600);
        assert_eq!(game.ball().vel, Vec2::new(0.0, 5.0));
        assert!(game.view().player_swinging);
    }

    #[test]
    fn test_cooldown_blocks_second_strike() {
        let mut game = active_session();
        game.player.x = 10.0;
        game.ball.pos = Vec2::new(300.0, 550.0);
        game.ball.vel = Vec2::new(0.0, 5.0);
        game.strike_down(Stroke::Forehand, 3010);
        game.tick(3016); // Whiff

        game.player.x = 165.0;
        game.ball.pos = Vec2::new(200.0, 550.0);
        game.ball.vel = Vec2::new(0.0, 5.0);

        assert!(!game.strike_down(Stroke::Backhand, 3100));
        let events = game.tick(3116);

        assert!(!events.iter().any(|e| matches!(e, Event::Swing { side: Side::Player, .. })));
        assert!(game.ball().vel.y > 0.0, "ball must not be returned");
        assert_eq!(game.strikes().facing(), Stroke::Forehand);
    }

    #[test]
    fn test_early_press_connects_when_ball_arrives() {
        let mut game = active_session();
        game.player.x = 165.0;
        game.ball.pos = Vec2::new(200.0, 506.0);
        game.ball.vel = Vec2::new(0.0, 5.0);

        // Pressed six frames before the ball is level with the paddle
        assert!(game.strike_down(Stroke::Forehand, 3000));

        let mut swings = Vec::new();
        for now in (3016..=3160).step_by(16) {
            let events = game.tick(now);
            assert!(events.iter().all(|e| !matches!(e, Event::PointWon { .. })));
            swings.extend(
                events
                    .into_iter()
                    .filter(|e| matches!(e, Event::Swing { side: Side::Player, .. })),
            );
            if !swings.is_empty() {
                break;
            }
        }

        assert_eq!(
            swings,
            vec![Event::Swing {
                side: Side::Player,
                stroke: Stroke::Forehand,
                contact: true,
            }]
        );
        assert!(game.ball().vel.y < 0.0);
        assert_eq!(game.strikes().next_allowed_at(), 3096 + 600);
    }

    #[test]
    fn test_press_does_not_resolve_before_the_band() {
        let mut game = active_session();
        game.player.x = 165.0;
        game.ball.pos = Vec2::new(200.0, 400.0);
        game.ball.vel = Vec2::new(0.0, 5.0);

        game.strike_down(Stroke::Forehand, 3000);
        let events = game.tick(3016);

        assert!(events.iter().all(|e| !matches!(e, Event::Swing { .. })));
        assert!(!game.strikes().on_cooldown(3016));
        assert!(!game.view().player_swinging);
    }

    #[test]
    fn test_stale_trigger_does_not_swing() {
        let mut game = active_session();
        game.player.x = 165.0;
        game.ball.pos = Vec2::new(200.0, 400.0);
        game.ball.vel = Vec2::new(0.0, 5.0);
        game.strike_down(Stroke::Forehand, 3000);

        // Ball needs far longer than the tap window to reach the paddle
        let mut now = 3000;
        let mut events = Vec::new();
        while game.score().bot_points == 0 {
            now += 16;
            events.extend(game.tick(now));
            assert!(now < 6000, "ball never passed the player");
        }

        assert!(events.iter().all(|e| !matches!(e, Event::Swing { side: Side::Player, .. })));
        assert!(!game.strikes().on_cooldown(now));
    }

    #[test]
    fn test_bot_wrong_side_lets_ball_through() {
        let config = Config {
            wrong_stroke_probability: 1.0,
            ..Config::default()
        };
        let mut game = GameSession::new(config, StdRng::seed_from_u64(3), 0).unwrap();
        game.tick(3000);
        game.bot.x = 165.0;
        game.ball.pos = Vec2::new(200.0, 70.0);
        game.ball.vel = Vec2::new(0.0, -5.0);

        let mut swings = 0;
        let mut now = 3016;
        while game.score().player_points == 0 && now < 4000 {
            for event in game.tick(now) {
                if let Event::Swing { side: Side::Bot, contact, .. } = event {
                    assert!(!contact);
                    swings += 1;
                }
            }
            now += 16;
        }

        assert_eq!(swings, 1);
        assert_eq!(game.score().player_points, 1);
    }

    #[test]
    fn test_bot_right_side_returns_ball() {
        let config = Config {
            wrong_stroke_probability: 0.0,
            bot_skill: 1.0,
            ..Config::default()
        };
        let mut game = GameSession::new(config, StdRng::seed_from_u64(3), 0).unwrap();
        game.tick(3000);
        game.bot.x = 165.0;
        game.ball.pos = Vec2::new(200.0, 70.0);
        game.ball.vel = Vec2::new(0.0, -5.0);

        let mut returned = false;
        for i in 0..20 {
            for event in game.tick(3016 + i * 16) {
                if let Event::Swing { side: Side::Bot, contact, .. } = event {
                    returned = contact;
                }
            }
            if returned {
                break;
            }
        }

        assert!(returned);
        assert!(game.ball().vel.y > 0.0);
        assert_eq!(game.score(), Score::new());
    }

    #[test]
    fn test_four_points_issue_one_reward() {
        let mut game = session();
        let issued = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&issued);
        game.set_reward_callback(move |code| sink.borrow_mut().push(code.to_string()));

        let mut rewards = 0;
        for i in 0..4 {
            rewards += count_rewards(&game.award_point(Side::Player, i * 1000));
        }

        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Side::Player));
        assert_eq!(rewards, 1);
        assert_eq!(issued.borrow().len(), 1);
        assert_eq!(game.coupon(), Some(issued.borrow()[0].as_str()));

        // Frozen afterwards
        assert!(game.award_point(Side::Player, 9000).is_empty());
        assert!(game.tick(9016).is_empty());
        assert_eq!(issued.borrow().len(), 1);
    }

    #[test]
    fn test_bot_win_issues_no_reward() {
        let mut game = session();
        let called = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&called);
        game.set_reward_callback(move |_| *flag.borrow_mut() = true);

        for _ in 0..3 {
            game.award_point(Side::Player, 0);
            game.award_point(Side::Bot, 0);
        }
        assert!(game.score().is_deuce());

        game.award_point(Side::Bot, 0);
        assert_eq!(game.score().advantage, Some(Side::Bot));
        let events = game.award_point(Side::Bot, 0);

        assert!(events.contains(&Event::GameWon { winner: Side::Bot }));
        assert_eq!(count_rewards(&events), 0);
        assert!(!*called.borrow());
        assert_eq!(game.coupon(), None);
    }

    #[test]
    fn test_loser_serves_through_deuce() {
        let mut game = session();
        let sequence = [
            Side::Player,
            Side::Bot,
            Side::Player,
            Side::Bot,
            Side::Player,
            Side::Bot, // deuce
            Side::Bot, // advantage bot
            Side::Player, // deuce
            Side::Player, // advantage player
        ];

        for scorer in sequence {
            game.award_point(scorer, 0);
            assert_eq!(game.receiver(), scorer.opposite());
            assert!(matches!(game.rally_state(), RallyState::AwaitingServe { .. }));
        }
        assert_eq!(game.score().advantage, Some(Side::Player));
    }

    #[test]
    fn test_view_generation() {
        let mut game = session();
        game.tick(1200);
        let view = game.view();

        assert_eq!(view.now, 1200);
        assert_eq!(view.countdown, Some(2));
        assert_eq!(view.ball, *game.ball());
        assert_eq!(view.player, *game.player_paddle());
        assert_eq!(view.bot, *game.bot_paddle());
        assert_eq!(view.score, game.score());
        assert_eq!(view.call, "0-0");
        assert!(!view.is_over);
        assert_eq!(view.winner, None);
        assert!(!view.player_swinging);
    }

    #[test]
    fn test_status_string() {
        let mut game = session();
        assert_eq!(game.status_string(), "Get ready...");

        game.tick(3000);
        assert_eq!(game.status_string(), "Playing");

        for _ in 0..4 {
            game.award_point(Side::Bot, 3000);
        }
        assert_eq!(game.status_string(), "Bot wins");
    }

    #[test]
    fn test_deterministic_simulation() {
        let mut game1 = session();
        let mut game2 = session();

        for i in 0..600u64 {
            let now = i * 16;
            if i % 40 == 0 {
                game1.strike_down(Stroke::Forehand, now);
                game2.strike_down(Stroke::Forehand, now);
            }
            game1.set_direction(i % 100 < 50, i % 100 >= 50);
            game2.set_direction(i % 100 < 50, i % 100 >= 50);

            assert_eq!(game1.tick(now), game2.tick(now));
        }

        assert_eq!(game1.ball(), game2.ball());
        assert_eq!(game1.score(), game2.score());
        assert_eq!(game1.bot_paddle(), game2.bot_paddle());
    }

    #[test]
    fn test_mini_game_tick_without_session_is_noop() {
        let mut mini = MiniGame::new(Config::default(), StdRng::seed_from_u64(9)).unwrap();

        assert_eq!(mini.screen(), Screen::Menu);
        assert!(mini.tick(100).is_empty());
        assert!(!mini.strike_down(Stroke::Forehand, 100));
        assert!(mini.view().is_none());
    }

    /// Take a fresh session to 40-0, serve, then let the ball pass the bot
    fn win_through_tick(mini: &mut MiniGame<StdRng>, start: Millis) -> Vec<Event> {
        let session = mini.session_mut().unwrap();
        for _ in 0..3 {
            session.award_point(Side::Player, start);
        }
        mini.tick(start + 3000);

        let session = mini.session_mut().unwrap();
        assert_eq!(session.rally_state(), RallyState::Active);
        session.ball.pos = Vec2::new(200.0, 10.0);
        session.ball.vel = Vec2::new(0.0, -5.0);
        session.bot.x = 10.0;
        mini.tick(start + 3016)
    }

    #[test]
    fn test_mini_game_coupon_survives_sessions() {
        let mut mini = MiniGame::new(Config::default(), StdRng::seed_from_u64(9)).unwrap();
        let codes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&codes);
        mini.set_reward_callback(move |code| sink.borrow_mut().push(code.to_string()));

        mini.start(0);
        assert_eq!(mini.screen(), Screen::Playing);

        let events = win_through_tick(&mut mini, 0);
        assert_eq!(count_rewards(&events), 1);
        assert_eq!(mini.screen(), Screen::Finished);
        let first = mini.coupon().unwrap().to_string();

        mini.return_to_menu();
        assert_eq!(mini.screen(), Screen::Menu);
        assert_eq!(mini.coupon(), Some(first.as_str()));

        mini.play_again(100_000);
        assert_eq!(mini.session().unwrap().score(), Score::new());
        let events = win_through_tick(&mut mini, 100_000);
        assert_eq!(count_rewards(&events), 1);

        let second = mini.coupon().unwrap().to_string();
        assert_ne!(first, second);
        assert_eq!(*codes.borrow(), vec![first, second]);
    }
}
