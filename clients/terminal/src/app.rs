use crate::event::{Command, Event, Events};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    crossterm::event::{
        Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    layout::Rect,
    DefaultTerminal,
};
use std::cell::Cell;
use std::time::{Duration, Instant};
use tennis_core::{Config, Event as GameEvent, MiniGame, MoveInput, Screen, Side, Stroke, View};

/// Without release events a key counts as held until repeats stop arriving
const HOLD_TIMEOUT: Duration = Duration::from_millis(180);

/// Game key mapping for cleaner input handling
#[derive(Debug, Clone, Copy)]
enum GameKey {
    Left,
    Right,
    Strike(Stroke),
}

fn map_keycode_to_game_key(code: KeyCode) -> Option<GameKey> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(GameKey::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(GameKey::Right),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameKey::Strike(Stroke::Backhand)),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(GameKey::Strike(Stroke::Forehand)),
        _ => None,
    }
}

/// Left/right hold state, however the terminal reports keys
trait DirectionInput {
    fn handle_left(&mut self, pressed: bool, at: Instant);
    fn handle_right(&mut self, pressed: bool, at: Instant);
    /// (left, right) as seen at `at`
    fn direction(&self, at: Instant) -> (bool, bool);
    fn reset(&mut self);
}

/// Terminals with release events: exact hold state
#[derive(Default)]
struct HeldDirection {
    left: bool,
    right: bool,
}

impl DirectionInput for HeldDirection {
    fn handle_left(&mut self, pressed: bool, _at: Instant) {
        self.left = pressed;
    }

    fn handle_right(&mut self, pressed: bool, _at: Instant) {
        self.right = pressed;
    }

    fn direction(&self, _at: Instant) -> (bool, bool) {
        (self.left, self.right)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Plain terminals: press and auto-repeat refresh a hold that times out
#[derive(Default)]
struct TimedDirection {
    left_at: Option<Instant>,
    right_at: Option<Instant>,
}

impl TimedDirection {
    fn held(seen: Option<Instant>, at: Instant) -> bool {
        seen.is_some_and(|seen| at.saturating_duration_since(seen) < HOLD_TIMEOUT)
    }
}

impl DirectionInput for TimedDirection {
    fn handle_left(&mut self, pressed: bool, at: Instant) {
        self.left_at = pressed.then_some(at);
        if pressed {
            self.right_at = None;
        }
    }

    fn handle_right(&mut self, pressed: bool, at: Instant) {
        self.right_at = pressed.then_some(at);
        if pressed {
            self.left_at = None;
        }
    }

    fn direction(&self, at: Instant) -> (bool, bool) {
        (Self::held(self.left_at, at), Self::held(self.right_at, at))
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Map a terminal column inside the drawn court to a court x coordinate
pub fn court_x_from_column(column: u16, field: Rect, court_width: f32) -> Option<f32> {
    if field.width == 0 || column < field.x || column >= field.x + field.width {
        return None;
    }
    let cell = f32::from(column - field.x) + 0.5;
    Some(cell / f32::from(field.width) * court_width)
}

/// Menu states for navigation
#[derive(Debug, Default)]
pub struct MenuState {
    pub selected: usize,
}

/// Game board size constants
pub const MIN_GAME_WIDTH: u16 = 40;
pub const MIN_GAME_HEIGHT: u16 = 30;
const FIXED_GAME_WIDTH: u16 = 48;
const FIXED_GAME_HEIGHT: u16 = 40;
const MAX_MESSAGES: usize = 4;

/// Main application
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Menu states
    pub menu_state: MenuState,
    /// Menu, sessions and the coupon
    pub game: MiniGame<StdRng>,
    directions: Box<dyn DirectionInput>,
    /// Court x under the mouse, if any
    pointer: Option<f32>,
    /// Origin of the millisecond clock fed to the game
    clock: Instant,
    /// Event handler
    pub events: Events,
    /// Current terminal size
    pub terminal_size: (u16, u16),
    /// Whether UI is paused due to small terminal
    pub ui_paused: bool,
    /// Where the court was last drawn, for mouse mapping
    pub field_area: Cell<Option<Rect>>,
    /// Recent rally call-outs, newest last
    pub messages: Vec<String>,
}

impl App {
    /// Constructs a new instance of App
    pub fn new(config: Config) -> color_eyre::Result<Self> {
        let events = Events::open()?;
        let directions: Box<dyn DirectionInput> = if events.reports_releases() {
            Box::new(HeldDirection::default())
        } else {
            Box::new(TimedDirection::default())
        };

        let mut game = MiniGame::new(config, StdRng::from_entropy())?;
        game.set_reward_callback(|code| tracing::info!(%code, "coupon ready"));

        tracing::info!(
            enhanced = events.reports_releases(),
            "terminal client started"
        );

        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        Ok(Self {
            running: true,
            menu_state: MenuState::default(),
            game,
            directions,
            pointer: None,
            clock: Instant::now(),
            events,
            terminal_size: (width, height),
            ui_paused: width < MIN_GAME_WIDTH || height < MIN_GAME_HEIGHT,
            field_area: Cell::new(None),
            messages: Vec::new(),
        })
    }

    /// Run the application's main loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            self.handle_events()?;
        }
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        self.game.screen()
    }

    fn now(&self) -> u64 {
        u64::try_from(self.clock.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn handle_events(&mut self) -> color_eyre::Result<()> {
        match self.events.next()? {
            Event::Frame => self.tick(),
            Event::Input(input) => match input {
                CrosstermEvent::Key(key_event) => self.handle_key_event(key_event),
                CrosstermEvent::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
                CrosstermEvent::Resize(width, height) => self.handle_resize(width, height),
                _ => {}
            },
            Event::Command(command) => self.handle_command(command),
        }
        Ok(())
    }

    /// Handle key events and convert to app events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        // Global quit keys
        match key_event.code {
            KeyCode::Char('q') => {
                self.events.queue(Command::Quit);
                return;
            }
            KeyCode::Char('c') | KeyCode::Char('C')
                if key_event.modifiers == KeyModifiers::CONTROL =>
            {
                self.events.queue(Command::Quit);
                return;
            }
            _ => {}
        }

        match self.screen() {
            Screen::Menu | Screen::Finished => {
                // Menu navigation - only on key press
                if key_event.kind == KeyEventKind::Press {
                    match key_event.code {
                        KeyCode::Up => self.events.queue(Command::SelectionUp),
                        KeyCode::Down => self.events.queue(Command::SelectionDown),
                        KeyCode::Enter => self.events.queue(Command::Confirm),
                        KeyCode::Esc => {
                            if self.screen() == Screen::Finished {
                                self.events.queue(Command::ReturnToMenu);
                            } else {
                                self.events.queue(Command::Quit);
                            }
                        }
                        _ => {}
                    }
                }
            }
            Screen::Playing => {
                if key_event.code == KeyCode::Esc {
                    if key_event.kind == KeyEventKind::Press {
                        self.events.queue(Command::ReturnToMenu);
                    }
                    return;
                }
                self.handle_game_key(key_event);
            }
        }
    }

    fn handle_game_key(&mut self, event: KeyEvent) {
        let Some(game_key) = map_keycode_to_game_key(event.code) else {
            return;
        };
        let pressed = matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat);
        let at = Instant::now();

        match game_key {
            GameKey::Left => {
                // Keys take over from the mouse
                self.pointer = None;
                self.directions.handle_left(pressed, at);
            }
            GameKey::Right => {
                self.pointer = None;
                self.directions.handle_right(pressed, at);
            }
            // Swings are triggered on press only
            GameKey::Strike(stroke) => {
                if event.kind == KeyEventKind::Press {
                    let now = self.now();
                    self.game.strike_down(stroke, now);
                }
            }
        }
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        if self.screen() != Screen::Playing {
            return;
        }
        let court_width = self.game.config().court_width;

        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer = self
                    .field_area
                    .get()
                    .and_then(|field| court_x_from_column(event.column, field, court_width));
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let now = self.now();
                self.game.strike_down(Stroke::Backhand, now);
            }
            MouseEventKind::Down(MouseButton::Right) => {
                let now = self.now();
                self.game.strike_down(Stroke::Forehand, now);
            }
            _ => {}
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Quit => self.quit(),
            Command::Start => self.start_game(),
            Command::ReturnToMenu => self.return_to_menu(),
            Command::SelectionUp => self.menu_up(),
            Command::SelectionDown => self.menu_down(),
            Command::Confirm => self.menu_select(),
        }
    }

    /// Handle tick event for game updates
    fn tick(&mut self) {
        if self.screen() != Screen::Playing {
            return;
        }

        let (left, right) = self.directions.direction(Instant::now());
        self.game.set_move_input(MoveInput {
            pointer_x: self.pointer,
            left,
            right,
        });

        let now = self.now();
        for event in self.game.tick(now) {
            if let Some(message) = describe(&event) {
                self.push_message(message);
            }
        }

        if self.screen() == Screen::Finished {
            self.menu_state.selected = 0;
            self.directions.reset();
        }
    }

    fn push_message(&mut self, message: String) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    // Navigation methods
    fn quit(&mut self) {
        self.running = false;
    }

    fn start_game(&mut self) {
        let now = self.now();
        match self.screen() {
            Screen::Finished => self.game.play_again(now),
            _ => self.game.start(now),
        }
        self.directions.reset();
        self.pointer = None;
        self.messages.clear();
        tracing::info!("session started");
    }

    fn return_to_menu(&mut self) {
        self.game.return_to_menu();
        self.menu_state.selected = 0;
        self.directions.reset();
    }

    // Menu navigation
    fn menu_up(&mut self) {
        let len = self.get_menu_items().len();
        self.menu_state.selected = (self.menu_state.selected + len - 1) % len;
    }

    fn menu_down(&mut self) {
        let len = self.get_menu_items().len();
        self.menu_state.selected = (self.menu_state.selected + 1) % len;
    }

    fn menu_select(&mut self) {
        match (self.screen(), self.menu_state.selected) {
            (Screen::Menu, 0) => self.events.queue(Command::Start),
            (Screen::Menu, 1) => self.events.queue(Command::Quit),
            (Screen::Finished, 0) => self.events.queue(Command::Start),
            (Screen::Finished, 1) => self.events.queue(Command::ReturnToMenu),
            _ => {}
        }
    }

    // Terminal size management
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);

        // Check if terminal is large enough for game
        self.ui_paused = width < MIN_GAME_WIDTH || height < MIN_GAME_HEIGHT;
    }

    pub fn calculate_centered_game_area(&self, area: Rect) -> Option<Rect> {
        if self.ui_paused {
            return None; // Too small
        }

        // Calculate centered position for fixed-size game field
        let game_width = FIXED_GAME_WIDTH.min(area.width);
        let game_height = FIXED_GAME_HEIGHT.min(area.height);

        let x_offset = area.width.saturating_sub(game_width) / 2;
        let y_offset = area.height.saturating_sub(game_height) / 2;

        Some(Rect {
            x: area.x + x_offset,
            y: area.y + y_offset,
            width: game_width,
            height: game_height,
        })
    }

    pub fn view(&self) -> Option<View> {
        self.game.view()
    }

    // Helper methods for UI
    pub fn get_menu_items(&self) -> Vec<&str> {
        match self.screen() {
            Screen::Finished => vec!["Play Again", "Menu"],
            _ => vec!["Play", "Quit"],
        }
    }
}

/// One-line call-out for the message strip
fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::Served { receiver: Side::Player } => Some("Serve to you".to_string()),
        GameEvent::Served { receiver: Side::Bot } => Some("Serve to the bot".to_string()),
        GameEvent::Swing {
            side: Side::Player,
            contact: false,
            ..
        } => Some("Whiff!".to_string()),
        GameEvent::Swing {
            side: Side::Bot,
            contact: false,
            ..
        } => Some("Bot swings on the wrong side".to_string()),
        GameEvent::Swing { .. } => None,
        GameEvent::PointWon { winner, score } => {
            Some(format!("Point {}: {}", winner.label(), score.call()))
        }
        GameEvent::GameWon { winner: Side::Player } => Some("Game, you!".to_string()),
        GameEvent::GameWon { winner: Side::Bot } => Some("Game, bot".to_string()),
        GameEvent::RewardIssued { code } => Some(format!("Reward: {code}")),
    }
}
