use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use hamlet_config::{GameConfig, QualityPreset, QualityTier};
use hamlet_input::{Action, InputFrame};
use serde::{Deserialize, Serialize};

use crate::environment::{Environment, House};
use crate::error::KernelError;
use crate::events::{Notification, SessionEvent, Severity};
use crate::fps::FpsCounter;
use crate::player::{CameraPose, Player};

const WELCOME: &str = "Game started! Walk up to a house to open its door.";
const RESTARTED: &str = "Game restarted!";

/// Slider range for mouse sensitivity.
pub const SENSITIVITY_RANGE: std::ops::RangeInclusive<f32> = 1.0..=10.0;

/// User-adjustable settings, separate from the immutable configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub quality: QualityTier,
    pub fog_enabled: bool,
    /// Slider value in [`SENSITIVITY_RANGE`].
    pub mouse_sensitivity: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            quality: QualityTier::Medium,
            fog_enabled: true,
            mouse_sensitivity: 5.0,
        }
    }
}

/// What the HUD shows after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Ground position (x, z) rounded to one decimal.
    pub position: Vec2,
    pub nearby: Option<String>,
    /// Interaction prompt for the nearby house, if any.
    pub prompt: Option<String>,
    pub fps: u32,
    pub paused: bool,
}

/// One play session: player, environment and the state around them.
///
/// Constructed by the application and driven one [`tick`](Self::tick) at a time.
#[derive(Debug)]
pub struct GameSession {
    config: Arc<GameConfig>,
    player: Player,
    environment: Environment,
    settings: GameSettings,
    fps: FpsCounter,
    nearest: Option<usize>,
    paused: bool,
    running: bool,
    ticks: u64,
    notifications: Vec<Notification>,
    events: Vec<SessionEvent>,
}

impl GameSession {
    pub fn new(config: Arc<GameConfig>) -> Self {
        let player = Player::new(&config);
        let environment = Environment::new(&config);
        let fps = FpsCounter::new(Duration::from_millis(config.fps.update_interval_ms));
        let mut session = Self {
            config,
            player,
            environment,
            settings: GameSettings::default(),
            fps,
            nearest: None,
            paused: false,
            running: true,
            ticks: 0,
            notifications: Vec::new(),
            events: Vec::new(),
        };
        session.refresh_nearest();
        session.events.push(SessionEvent::Started);
        session.notify(Notification::new(WELCOME, Severity::Success));
        tracing::info!(houses = session.environment.house_count(), "session started");
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Advance one tick: discrete actions, then (unless paused) look,
    /// movement, door animation and the nearest-house query.
    pub fn tick(&mut self, dt: Duration, input: InputFrame) -> Result<(), KernelError> {
        let _span = tracing::info_span!("tick", n = self.ticks).entered();
        if !self.running {
            return Ok(());
        }
        for action in &input.actions {
            match action {
                Action::Pause => self.toggle_pause(),
                Action::Interact if !self.paused => {
                    self.interact()?;
                }
                _ => {}
            }
        }
        if self.paused {
            return Ok(());
        }

        self.ticks += 1;
        self.player.look(input.look_delta);
        self.player.update(dt.as_secs_f32(), input.movement);
        self.environment.animate_doors()?;
        self.refresh_nearest();
        self.fps.record(dt);
        tracing::trace!(position = ?self.player.pose().position, nearest = ?self.nearest, "ticked");
        Ok(())
    }

    /// Toggle the door of the nearest house. Returns the house index and its
    /// new open flag, or `None` when no house is in range.
    pub fn interact(&mut self) -> Result<Option<(usize, bool)>, KernelError> {
        let Some(index) = self.nearest else {
            tracing::debug!("interact with nothing in range");
            return Ok(None);
        };
        let open = self.environment.toggle_door(index)?;
        let name = self
            .environment
            .house(index)
            .map(|h| h.name.clone())
            .ok_or(KernelError::UnknownHouse(index))?;
        self.events.push(SessionEvent::DoorToggled { house: index, open });
        self.notify(Notification::door(&name, open));
        Ok(Some((index, open)))
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            self.events.push(SessionEvent::Paused);
            tracing::info!("paused");
        } else {
            self.events.push(SessionEvent::Resumed);
            tracing::info!("resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Back to spawn with every door closed. Leaves pause.
    pub fn restart(&mut self) {
        self.player.reset();
        self.environment.close_all_doors();
        self.paused = false;
        self.refresh_nearest();
        self.events.push(SessionEvent::Restarted);
        self.notify(Notification::new(RESTARTED, Severity::Success));
        tracing::info!("session restarted");
    }

    /// Stop ticking. Further ticks are no-ops.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.events.push(SessionEvent::Stopped);
            tracing::info!(ticks = self.ticks, "session stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks simulated so far (paused ticks excluded).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pose(&self) -> CameraPose {
        self.player.pose()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn nearest_house(&self) -> Option<&House> {
        self.nearest.and_then(|i| self.environment.house(i))
    }

    pub fn hud(&self) -> HudSnapshot {
        let nearby = self.nearest_house();
        let prompt = nearby
            .and_then(|h| self.environment.door_state(h.index))
            .map(|door| if door.is_open() { "Close door" } else { "Open door" }.to_string());
        HudSnapshot {
            position: self.player.rounded_position(),
            nearby: nearby.map(|h| h.name.clone()),
            prompt,
            fps: self.fps.fps().round() as u32,
            paused: self.paused,
        }
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    /// Quality preset currently in effect.
    pub fn quality_preset(&self) -> QualityPreset {
        self.config.graphics.preset(self.settings.quality)
    }

    pub fn set_quality(&mut self, quality: QualityTier) {
        if self.settings.quality != quality {
            self.settings.quality = quality;
            tracing::info!(quality = quality.label(), "graphics quality changed");
        }
    }

    pub fn set_fog_enabled(&mut self, enabled: bool) {
        self.settings.fog_enabled = enabled;
        self.environment.set_fog_enabled(enabled);
    }

    /// Set the sensitivity slider, clamped to [`SENSITIVITY_RANGE`].
    pub fn set_mouse_sensitivity(&mut self, value: f32) {
        let value = if value.is_finite() {
            value.clamp(*SENSITIVITY_RANGE.start(), *SENSITIVITY_RANGE.end())
        } else {
            self.settings.mouse_sensitivity
        };
        self.settings.mouse_sensitivity = value;
        self.player.set_sensitivity_slider(value);
    }

    /// Apply a full settings value at once.
    pub fn apply_settings(&mut self, settings: GameSettings) {
        self.set_quality(settings.quality);
        self.set_fog_enabled(settings.fog_enabled);
        self.set_mouse_sensitivity(settings.mouse_sensitivity);
    }

    /// Take pending notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Take the event log.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    fn notify(&mut self, notification: Notification) {
        tracing::debug!(message = %notification.message, "notification");
        self.notifications.push(notification);
    }

    fn refresh_nearest(&mut self) {
        self.nearest = self
            .environment
            .nearest_house(self.player.pose().position, self.config.player.interaction_distance)
            .map(|h| h.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamlet_input::MovementIntent;

    const DT: Duration = Duration::from_millis(16);

    fn session() -> GameSession {
        GameSession::new(GameConfig::default().shared())
    }

    fn actions(actions: &[Action]) -> InputFrame {
        InputFrame {
            actions: actions.to_vec(),
            ..InputFrame::default()
        }
    }

    #[test]
    fn starts_running_with_welcome() {
        let mut s = session();
        assert!(s.is_running());
        assert!(!s.is_paused());
        let notes = s.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Success);
        assert_eq!(s.drain_events(), vec![SessionEvent::Started]);
    }

    #[test]
    fn hud_at_spawn() {
        let s = session();
        let hud = s.hud();
        assert_eq!(hud.position, Vec2::new(0.0, 5.0));
        assert_eq!(hud.nearby, None);
        assert_eq!(hud.prompt, None);
        assert!(!hud.paused);
    }

    #[test]
    fn pause_freezes_movement() {
        let mut s = session();
        s.tick(DT, actions(&[Action::Pause])).unwrap();
        assert!(s.is_paused());
        let before = s.pose();
        let walk = InputFrame {
            movement: MovementIntent {
                forward: true,
                ..MovementIntent::default()
            },
            ..InputFrame::default()
        };
        s.tick(DT, walk.clone()).unwrap();
        assert_eq!(s.pose(), before);
        assert_eq!(s.ticks(), 0);

        s.tick(DT, actions(&[Action::Pause])).unwrap();
        s.tick(DT, walk).unwrap();
        assert!(s.pose().position.z < before.position.z);
    }

    #[test]
    fn interact_ignored_while_paused() {
        let mut s = session();
        s.toggle_pause();
        s.tick(DT, actions(&[Action::Interact])).unwrap();
        assert!(!s.events().iter().any(|e| matches!(e, SessionEvent::DoorToggled { .. })));
    }

    #[test]
    fn interact_out_of_range_is_a_noop() {
        let mut s = session();
        s.drain_notifications();
        assert_eq!(s.interact(), Ok(None));
        assert!(s.drain_notifications().is_empty());
    }

    #[test]
    fn stop_makes_ticks_noops() {
        let mut s = session();
        s.stop();
        s.stop();
        assert!(!s.is_running());
        s.tick(DT, actions(&[Action::Pause])).unwrap();
        assert!(!s.is_paused());
        assert_eq!(
            s.events().iter().filter(|e| **e == SessionEvent::Stopped).count(),
            1
        );
    }

    #[test]
    fn settings_apply() {
        let mut s = session();
        s.apply_settings(GameSettings {
            quality: QualityTier::High,
            fog_enabled: false,
            mouse_sensitivity: 10.0,
        });
        assert_eq!(s.quality_preset().max_lights, 6);
        assert!(s.environment().scene().fog().is_none());
        assert!((s.player().sensitivity() - 0.004).abs() < 1e-9);

        s.set_mouse_sensitivity(50.0);
        assert_eq!(s.settings().mouse_sensitivity, 10.0);
        s.set_mouse_sensitivity(f32::NAN);
        assert_eq!(s.settings().mouse_sensitivity, 10.0);
    }

    #[test]
    fn fps_reported_after_interval() {
        let mut s = session();
        for _ in 0..10 {
            s.tick(Duration::from_millis(10), InputFrame::default()).unwrap();
        }
        assert_eq!(s.hud().fps, 100);
    }
}
