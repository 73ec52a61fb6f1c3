//! WASM bridge module for JavaScript interop

use crate::{Config, MiniGame, MoveInput, Screen, Stroke};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

// Browser console on wasm32, tracing elsewhere so native tests don't hit JS imports
macro_rules! console_log {
    ($($t:tt)*) => {
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format!($($t)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        tracing::debug!($($t)*);
    };
}

/// Host timestamps arrive as `performance.now()` doubles
fn to_millis(now: f64) -> u64 {
    if now.is_finite() && now > 0.0 {
        now as u64
    } else {
        0
    }
}

fn stroke(forehand: bool) -> Stroke {
    if forehand {
        Stroke::Forehand
    } else {
        Stroke::Backhand
    }
}

/// WASM-compatible wrapper around the mini-game
#[wasm_bindgen]
pub struct WasmTennisGame {
    inner: MiniGame<StdRng>,
    input: MoveInput,
}

#[wasm_bindgen]
impl WasmTennisGame {
    /// Create a new game from JSON configuration (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: String, seed: f64) -> Result<WasmTennisGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            Config::from_json(&config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let rng = StdRng::seed_from_u64(seed.to_bits());
        let inner = MiniGame::new(config, rng).map_err(|e| JsValue::from_str(&e.to_string()))?;
        console_log!("WasmTennisGame created");

        Ok(WasmTennisGame {
            inner,
            input: MoveInput::zero(),
        })
    }

    /// Register a JS function called with each reward code
    pub fn set_reward_callback(&mut self, callback: js_sys::Function) {
        self.inner.set_reward_callback(move |code| {
            if callback.call1(&JsValue::NULL, &JsValue::from_str(code)).is_err() {
                console_log!("reward callback threw");
            }
        });
    }

    pub fn start(&mut self, now: f64) {
        self.inner.start(to_millis(now));
        self.inner.set_move_input(self.input);
    }

    pub fn play_again(&mut self, now: f64) {
        self.start(now);
    }

    pub fn return_to_menu(&mut self) {
        self.inner.return_to_menu();
    }

    /// Advance one frame. Returns the frame's events as a JSON array.
    pub fn tick(&mut self, now: f64) -> String {
        let events = self.inner.tick(to_millis(now));
        match serde_json::to_string(&events) {
            Ok(json) => json,
            Err(e) => {
                console_log!("Failed to serialize events: {}", e);
                "[]".to_string()
            }
        }
    }

    /// Left trigger is the backhand, right trigger the forehand
    pub fn strike_down(&mut self, forehand: bool, now: f64) -> bool {
        self.inner.strike_down(stroke(forehand), to_millis(now))
    }

    /// Court x of the pointer, or `undefined` when it left the court
    pub fn set_pointer(&mut self, x: Option<f32>) {
        self.input.pointer_x = x;
        self.inner.set_move_input(self.input);
    }

    pub fn set_direction(&mut self, left: bool, right: bool) {
        self.input.left = left;
        self.input.right = right;
        self.inner.set_move_input(self.input);
    }

    /// "menu", "playing" or "finished"
    pub fn screen(&self) -> String {
        match self.inner.screen() {
            Screen::Menu => "menu",
            Screen::Playing => "playing",
            Screen::Finished => "finished",
        }
        .to_string()
    }

    /// Current view as JSON, `null` on the menu
    pub fn view_json(&self) -> String {
        match serde_json::to_string(&self.inner.view()) {
            Ok(json) => json,
            Err(e) => {
                console_log!("Failed to serialize view: {}", e);
                "null".to_string()
            }
        }
    }

    pub fn coupon(&self) -> Option<String> {
        self.inner.coupon().map(str::to_string)
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> String {
        self.inner
            .session()
            .map_or("Menu", |session| session.status_string())
            .to_string()
    }
}

/// Create a default config as JSON string (utility for JavaScript)
#[wasm_bindgen]
pub fn default_config_json() -> String {
    let config = Config::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => json,
        Err(_) => "{}".to_string(),
    }
}

/// Initialize WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log!("Tennis WASM module initialized!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_game_creation() {
        let game = WasmTennisGame::new(String::new(), 7.0).unwrap();
        assert_eq!(game.screen(), "menu");
        assert_eq!(game.view_json(), "null");
        assert_eq!(game.coupon(), None);
        assert_eq!(game.status_string(), "Menu");
    }

    #[test]
    fn test_wasm_game_tick() {
        let mut game = WasmTennisGame::new("{}".to_string(), 7.0).unwrap();
        assert_eq!(game.tick(0.0), "[]");

        game.start(0.0);
        assert_eq!(game.screen(), "playing");
        assert_eq!(game.tick(1000.0), "[]");

        let events: serde_json::Value = serde_json::from_str(&game.tick(3000.0)).unwrap();
        assert_eq!(events.as_array().unwrap().len(), 1);
        assert!(events[0].get("Served").is_some());
    }

    #[test]
    fn test_strike_waits_for_the_ball() {
        let mut game = WasmTennisGame::new(String::new(), 7.0).unwrap();
        game.start(0.0);

        // Ball is frozen at centre, so the press is only buffered
        assert!(game.strike_down(true, 100.0));
        assert_eq!(game.tick(116.0), "[]");

        // No swing resolved, so no cooldown either
        assert!(game.strike_down(false, 200.0));
    }

    #[test]
    fn test_view_json_serialization() {
        let mut game = WasmTennisGame::new(String::new(), 7.0).unwrap();
        game.start(0.0);
        game.set_direction(true, false);
        game.tick(16.0);

        let view: serde_json::Value = serde_json::from_str(&game.view_json()).unwrap();
        assert_eq!(view["countdown"], 3);
        assert_eq!(view["call"], "0-0");
        assert!(view["player"]["x"].as_f64().unwrap() < 165.0);
    }

    #[test]
    fn test_partial_config_json() {
        let game = WasmTennisGame::new(r#"{ "countdown_ms": 1000 }"#.to_string(), 1.0).unwrap();
        assert_eq!(game.inner.config().countdown_ms, 1000);
    }

    #[test]
    fn test_default_config_json() {
        let json = default_config_json();
        assert!(!json.is_empty());

        // Should be deserializable
        let _config: Config = serde_json::from_str(&json).unwrap();
    }
}
