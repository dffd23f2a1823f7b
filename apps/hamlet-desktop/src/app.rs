use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hamlet_config::{GameConfig, QualityPreset};
use hamlet_input::{ActionMap, InputState};
use hamlet_kernel::{CameraPose, Environment, GameSession, GameSettings, Notification, Player};
use hamlet_render::{Minimap, RenderView};

/// Shown to the user for any unexpected fault. Details go to the log.
pub const FAULT_MESSAGE: &str = "An error occurred. Please restart the game.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Instructions,
    Settings,
    Playing,
    Paused,
}

/// Requests raised by the UI, applied after the egui pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Start,
    Resume,
    Restart,
    MainMenu,
    Settings,
    Instructions,
    Back,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub note: Notification,
    pub shown_at: Instant,
}

/// Everything the desktop app tracks outside the GPU.
pub struct AppState {
    pub(crate) config: Arc<GameConfig>,
    pub(crate) actions: ActionMap,
    pub(crate) input: InputState,
    pub(crate) session: Option<GameSession>,
    /// Village shown behind the menus when no session runs.
    pub(crate) backdrop: Environment,
    pub(crate) settings: GameSettings,
    pub(crate) screen: Screen,
    /// Where `Back` leads from the settings and instructions panels.
    pub(crate) back_to: Screen,
    pub(crate) want_capture: bool,
    pub(crate) view: RenderView,
    pub(crate) minimap: Minimap,
    pub(crate) toasts: Vec<Toast>,
    pub(crate) fault: Option<&'static str>,
    last_frame: Instant,
}

impl AppState {
    pub fn new(config: Arc<GameConfig>) -> Self {
        let mut view = RenderView::new(&config.camera);
        view.follow(&Player::new(&config).pose());
        Self {
            actions: ActionMap::from_bindings(&config.keys),
            input: InputState::new(),
            session: None,
            backdrop: Environment::new(&config),
            settings: GameSettings::default(),
            screen: Screen::MainMenu,
            back_to: Screen::MainMenu,
            want_capture: false,
            view,
            minimap: Minimap::default(),
            toasts: Vec::new(),
            fault: None,
            last_frame: Instant::now(),
            config,
        }
    }

    pub fn key(&mut self, key: &str, pressed: bool, repeat: bool) {
        if self.fault.is_some() {
            return;
        }
        self.input.key(&self.actions, key, pressed, repeat);
    }

    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        self.input.pointer_moved(dx, dy);
    }

    /// Left click in the viewport: grab the pointer while playing.
    pub fn clicked(&mut self) {
        if self.screen == Screen::Playing && self.fault.is_none() {
            self.want_capture = true;
        }
    }

    pub fn focus_lost(&mut self) {
        self.input.release_all();
        self.want_capture = false;
    }

    /// Advance one frame using wall-clock time since the previous one.
    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;
        self.advance(dt);
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        let frame = self.input.take_frame();
        self.expire_toasts(Instant::now());
        if !matches!(self.screen, Screen::Playing | Screen::Paused) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.tick(dt, frame) {
            self.fail(err);
            return;
        }
        let shown_at = Instant::now();
        self.toasts.extend(
            session
                .drain_notifications()
                .into_iter()
                .map(|note| Toast { note, shown_at }),
        );
        for event in session.drain_events() {
            tracing::debug!(?event, "session event");
        }
        let paused = session.is_paused();
        self.view.follow(&session.pose());

        match (self.screen, paused) {
            (Screen::Playing, true) => {
                self.screen = Screen::Paused;
                self.want_capture = false;
            }
            (Screen::Paused, false) => {
                self.screen = Screen::Playing;
                self.want_capture = true;
            }
            _ => {}
        }
    }

    /// Apply a UI command. Returns `false` when the app should exit.
    pub fn apply(&mut self, command: UiCommand) -> bool {
        tracing::debug!(?command, screen = ?self.screen, "ui command");
        match command {
            UiCommand::Start => self.start(),
            UiCommand::Resume => {
                if let Some(session) = self.session.as_mut() {
                    if session.is_paused() {
                        session.toggle_pause();
                    }
                    self.screen = Screen::Playing;
                    self.want_capture = true;
                }
            }
            UiCommand::Restart => {
                if let Some(session) = self.session.as_mut() {
                    session.restart();
                    self.screen = Screen::Playing;
                    self.want_capture = true;
                }
            }
            UiCommand::MainMenu => {
                if let Some(mut session) = self.session.take() {
                    session.stop();
                }
                self.view.follow(&Player::new(&self.config).pose());
                self.screen = Screen::MainMenu;
                self.want_capture = false;
            }
            UiCommand::Settings | UiCommand::Instructions => {
                self.back_to = self.screen;
                self.screen = if command == UiCommand::Settings {
                    Screen::Settings
                } else {
                    Screen::Instructions
                };
            }
            UiCommand::Back => self.screen = self.back_to,
            UiCommand::Quit => return false,
        }
        true
    }

    /// Push edited settings to the session and the backdrop.
    pub fn settings_changed(&mut self) {
        self.backdrop.set_fog_enabled(self.settings.fog_enabled);
        if let Some(session) = self.session.as_mut() {
            session.apply_settings(self.settings);
            self.settings = session.settings();
        }
    }

    pub fn environment(&self) -> &Environment {
        self.session
            .as_ref()
            .map_or(&self.backdrop, GameSession::environment)
    }

    pub fn pose(&self) -> CameraPose {
        self.session
            .as_ref()
            .map_or_else(|| Player::new(&self.config).pose(), GameSession::pose)
    }

    pub fn quality_preset(&self) -> QualityPreset {
        self.config.graphics.preset(self.settings.quality)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.view.set_viewport(width, height);
    }

    /// Log the fault and stop the session. No recovery short of a restart.
    pub fn fail(&mut self, err: impl fmt::Display) {
        tracing::error!(error = %err, "unexpected fault");
        if let Some(session) = self.session.as_mut() {
            session.stop();
        }
        self.fault = Some(FAULT_MESSAGE);
        self.want_capture = false;
    }

    fn start(&mut self) {
        let mut session = GameSession::new(self.config.clone());
        session.apply_settings(self.settings);
        self.view.follow(&session.pose());
        self.session = Some(session);
        self.screen = Screen::Playing;
        self.want_capture = true;
    }

    fn expire_toasts(&mut self, now: Instant) {
        let ttl = Duration::from_millis(self.config.animation.notification_duration_ms);
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < ttl);
    }
}

/// Short label for a key code name (`KeyE` -> `E`).
pub fn key_label(code: &str) -> &str {
    code.strip_prefix("Key")
        .or_else(|| code.strip_prefix("Digit"))
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Duration = Duration::from_millis(16);

    fn state() -> AppState {
        AppState::new(GameConfig::default().shared())
    }

    fn tap(state: &mut AppState, key: &str) {
        state.key(key, true, false);
        state.key(key, false, false);
    }

    #[test]
    fn starts_on_main_menu_without_session() {
        let s = state();
        assert_eq!(s.screen, Screen::MainMenu);
        assert!(s.session.is_none());
        assert_eq!(s.pose().position.z, 5.0);
    }

    #[test]
    fn start_shows_welcome_toast() {
        let mut s = state();
        s.apply(UiCommand::Start);
        assert_eq!(s.screen, Screen::Playing);
        assert!(s.want_capture);
        s.advance(DT);
        assert_eq!(s.toasts.len(), 1);
    }

    #[test]
    fn escape_pauses_and_resumes() {
        let mut s = state();
        s.apply(UiCommand::Start);
        tap(&mut s, "Escape");
        s.advance(DT);
        assert_eq!(s.screen, Screen::Paused);
        assert!(!s.want_capture);

        tap(&mut s, "Escape");
        s.advance(DT);
        assert_eq!(s.screen, Screen::Playing);
        assert!(s.want_capture);
    }

    #[test]
    fn frames_drain_the_session_log() {
        let mut s = state();
        s.apply(UiCommand::Start);
        for _ in 0..50 {
            tap(&mut s, "Escape");
            s.advance(DT);
        }
        let session = s.session.as_ref().unwrap();
        assert!(session.events().is_empty());
    }

    #[test]
    fn settings_return_to_pause_menu() {
        let mut s = state();
        s.apply(UiCommand::Start);
        tap(&mut s, "Escape");
        s.advance(DT);
        s.apply(UiCommand::Settings);
        assert_eq!(s.screen, Screen::Settings);

        s.settings.fog_enabled = false;
        s.settings_changed();
        assert!(s.environment().scene().fog().is_none());
        assert!(s.backdrop.scene().fog().is_none());

        s.apply(UiCommand::Back);
        assert_eq!(s.screen, Screen::Paused);
    }

    #[test]
    fn main_menu_drops_session() {
        let mut s = state();
        s.apply(UiCommand::Start);
        s.apply(UiCommand::MainMenu);
        assert!(s.session.is_none());
        assert_eq!(s.screen, Screen::MainMenu);
        assert!(!s.apply(UiCommand::Quit));
    }

    #[test]
    fn toasts_expire() {
        let mut s = state();
        s.apply(UiCommand::Start);
        s.advance(DT);
        let later = Instant::now() + Duration::from_millis(2500);
        s.expire_toasts(later);
        assert!(s.toasts.is_empty());
    }

    #[test]
    fn fault_stops_session() {
        let mut s = state();
        s.apply(UiCommand::Start);
        s.fail("boom");
        assert_eq!(s.fault, Some(FAULT_MESSAGE));
        assert!(!s.session.as_ref().is_some_and(GameSession::is_running));
        s.clicked();
        assert!(!s.want_capture);
    }

    #[test]
    fn key_labels() {
        assert_eq!(key_label("KeyE"), "E");
        assert_eq!(key_label("Escape"), "Escape");
        assert_eq!(key_label("Digit1"), "1");
    }
}
