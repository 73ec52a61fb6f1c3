//! Terminal input plumbing.
//!
//! A reader thread interleaves frame ticks with crossterm input on a single
//! channel, so the app loop only ever blocks on one receiver.

use color_eyre::eyre::WrapErr;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement},
};
use std::{
    io::stdout,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};

/// One simulation frame at 60 Hz
pub const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Clone, Debug)]
pub enum Event {
    /// Time to advance the game by one frame
    Frame,
    /// Raw keyboard, mouse or resize input
    Input(CrosstermEvent),
    /// Deferred menu action queued by the app itself
    Command(Command),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// New session, from the menu or after a finished game
    Start,
    ReturnToMenu,
    SelectionUp,
    SelectionDown,
    Confirm,
}

/// Owns the terminal input modes for as long as it lives
pub struct Events {
    tx: Sender<Event>,
    rx: Receiver<Event>,
    enhanced: bool,
}

impl Events {
    /// Switch the terminal to raw input and start the reader thread
    pub fn open() -> color_eyre::Result<Self> {
        let enhanced = enter_input_mode()?;
        let (tx, rx) = mpsc::channel();

        let reader = tx.clone();
        thread::Builder::new()
            .name("tennis-input".to_string())
            .spawn(move || {
                if let Err(e) = pump(&reader) {
                    tracing::error!(error = %e, "input thread stopped");
                }
            })
            .wrap_err("failed to spawn the input thread")?;

        Ok(Self { tx, rx, enhanced })
    }

    /// Key releases are only reported on terminals with enhanced keyboards
    pub fn reports_releases(&self) -> bool {
        self.enhanced
    }

    pub fn next(&self) -> color_eyre::Result<Event> {
        self.rx.recv().wrap_err("input thread hung up")
    }

    pub fn queue(&self, command: Command) {
        let _ = self.tx.send(Event::Command(command));
    }
}

impl Drop for Events {
    fn drop(&mut self) {
        leave_input_mode(self.enhanced);
    }
}

fn enter_input_mode() -> color_eyre::Result<bool> {
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));

    enable_raw_mode()?;
    if enhanced {
        queue!(
            stdout(),
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    }
    execute!(stdout(), EnableMouseCapture).wrap_err("failed to enable mouse capture")?;
    Ok(enhanced)
}

fn leave_input_mode(enhanced: bool) {
    let _ = execute!(stdout(), DisableMouseCapture);
    if enhanced {
        let _ = queue!(stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
}

/// Forward input and frame ticks until the app drops its receiver
fn pump(tx: &Sender<Event>) -> color_eyre::Result<()> {
    let mut deadline = Instant::now() + FRAME;

    loop {
        let wait = deadline.saturating_duration_since(Instant::now());
        if event::poll(wait).wrap_err("failed to poll terminal input")? {
            let input = event::read().wrap_err("failed to read terminal input")?;
            if tx.send(Event::Input(input)).is_err() {
                return Ok(());
            }
        }

        let now = Instant::now();
        if now >= deadline {
            deadline = next_deadline(deadline, now);
            if tx.send(Event::Frame).is_err() {
                return Ok(());
            }
        }
    }
}

/// Keep a fixed cadence, but never queue a burst of frames after a stall
fn next_deadline(deadline: Instant, now: Instant) -> Instant {
    let next = deadline + FRAME;
    if next <= now {
        now + FRAME
    } else {
        next
    }
}
