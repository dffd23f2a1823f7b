use egui::{Align2, Color32, Context, FontId, Pos2, Rect, Stroke, Vec2};
use hamlet_common::Color;
use hamlet_config::QualityTier;
use hamlet_kernel::{SENSITIVITY_RANGE, Severity};

use crate::app::{AppState, Screen, UiCommand, key_label};

const TITLE: &str = "Hamlet";

fn color32(color: Color) -> Color32 {
    Color32::from_rgb(color.r(), color.g(), color.b())
}

fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Success => Color32::from_rgb(0x4c, 0xaf, 0x50),
        Severity::Warning => Color32::from_rgb(0xff, 0x98, 0x00),
        Severity::Info => Color32::from_rgb(0x21, 0x96, 0xf3),
    }
}

fn menu_window(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
}

impl AppState {
    /// Draw the overlay for the current screen. Commands are applied by the caller.
    pub fn draw_ui(&mut self, ctx: &Context) -> Option<UiCommand> {
        if let Some(message) = self.fault {
            let mut command = None;
            menu_window("Error").show(ctx, |ui| {
                ui.label(message);
                if ui.button("Quit").clicked() {
                    command = Some(UiCommand::Quit);
                }
            });
            return command;
        }

        let command = match self.screen {
            Screen::MainMenu => self.main_menu(ctx),
            Screen::Instructions => self.instructions(ctx),
            Screen::Settings => self.settings_panel(ctx),
            Screen::Paused => {
                self.hud(ctx);
                self.pause_menu(ctx)
            }
            Screen::Playing => {
                self.hud(ctx);
                self.minimap(ctx);
                None
            }
        };
        self.toasts(ctx);
        command
    }

    fn main_menu(&self, ctx: &Context) -> Option<UiCommand> {
        let mut command = None;
        menu_window(TITLE).show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label("A walk through a small village.");
                ui.add_space(8.0);
                if ui.button("Start").clicked() {
                    command = Some(UiCommand::Start);
                }
                if ui.button("Settings").clicked() {
                    command = Some(UiCommand::Settings);
                }
                if ui.button("Instructions").clicked() {
                    command = Some(UiCommand::Instructions);
                }
                if ui.button("Quit").clicked() {
                    command = Some(UiCommand::Quit);
                }
            });
        });
        command
    }

    fn pause_menu(&self, ctx: &Context) -> Option<UiCommand> {
        let mut command = None;
        menu_window("Paused").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                if ui.button("Resume").clicked() {
                    command = Some(UiCommand::Resume);
                }
                if ui.button("Restart").clicked() {
                    command = Some(UiCommand::Restart);
                }
                if ui.button("Settings").clicked() {
                    command = Some(UiCommand::Settings);
                }
                if ui.button("Main menu").clicked() {
                    command = Some(UiCommand::MainMenu);
                }
            });
        });
        command
    }

    fn instructions(&self, ctx: &Context) -> Option<UiCommand> {
        let keys = &self.config.keys;
        let mut command = None;
        menu_window("Instructions").show(ctx, |ui| {
            egui::Grid::new("controls").num_columns(2).show(ui, |ui| {
                let rows = [
                    (
                        format!(
                            "{} {} {} {}",
                            key_label(&keys.forward),
                            key_label(&keys.left),
                            key_label(&keys.backward),
                            key_label(&keys.right)
                        ),
                        "Move",
                    ),
                    (key_label(&keys.run).to_string(), "Run"),
                    ("Mouse".to_string(), "Look around"),
                    (key_label(&keys.interact).to_string(), "Open or close a door"),
                    (key_label(&keys.pause).to_string(), "Pause"),
                ];
                for (key, what) in rows {
                    ui.strong(key);
                    ui.label(what);
                    ui.end_row();
                }
            });
            ui.add_space(6.0);
            ui.label("Click the view to capture the mouse.");
            if ui.button("Back").clicked() {
                command = Some(UiCommand::Back);
            }
        });
        command
    }

    fn settings_panel(&mut self, ctx: &Context) -> Option<UiCommand> {
        let mut command = None;
        let before = self.settings;
        menu_window("Settings").show(ctx, |ui| {
            let settings = &mut self.settings;
            egui::ComboBox::from_label("Graphics quality")
                .selected_text(settings.quality.label())
                .show_ui(ui, |ui| {
                    for tier in QualityTier::ALL {
                        ui.selectable_value(&mut settings.quality, tier, tier.label());
                    }
                });
            ui.checkbox(&mut settings.fog_enabled, "Fog");
            ui.add(
                egui::Slider::new(&mut settings.mouse_sensitivity, SENSITIVITY_RANGE)
                    .text("Mouse sensitivity"),
            );
            ui.add_space(6.0);
            if ui.button("Back").clicked() {
                command = Some(UiCommand::Back);
            }
        });
        if self.settings != before {
            self.settings_changed();
        }
        command
    }

    fn hud(&self, ctx: &Context) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let hud = session.hud();
        egui::Area::new(egui::Id::new("hud"))
            .anchor(Align2::LEFT_TOP, [10.0, 10.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(format!(
                        "Position: ({:.1}, {:.1})",
                        hud.position.x, hud.position.y
                    ));
                    ui.label(format!(
                        "Nearby: {}",
                        hud.nearby.as_deref().unwrap_or("none")
                    ));
                    ui.label(format!("FPS: {}", hud.fps));
                });
            });

        if let Some(prompt) = hud.prompt.filter(|_| !hud.paused) {
            egui::Area::new(egui::Id::new("prompt"))
                .anchor(Align2::CENTER_BOTTOM, [0.0, -40.0])
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.strong(format!(
                            "Press {} to {}",
                            key_label(&self.config.keys.interact),
                            prompt.to_lowercase()
                        ));
                    });
                });
        }
    }

    fn minimap(&self, ctx: &Context) {
        let frame = self.minimap.frame(
            &self.pose(),
            self.environment().houses(),
            self.config.ground.road_width,
        );
        egui::Area::new(egui::Id::new("minimap"))
            .anchor(Align2::RIGHT_TOP, [-10.0, 10.0])
            .interactable(false)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(Vec2::new(frame.size.x, frame.size.y), egui::Sense::hover());
                let rect = response.rect;
                let painter = painter.with_clip_rect(rect);
                let at = |p: glam::Vec2| Pos2::new(rect.min.x + p.x, rect.min.y + p.y);

                painter.rect_filled(rect, 4.0, Color32::from_black_alpha(160));
                painter.rect_filled(
                    Rect::from_min_size(
                        Pos2::new(rect.min.x + frame.road_x, rect.min.y),
                        Vec2::new(frame.road_width, rect.height()),
                    ),
                    0.0,
                    color32(self.config.ground.road_color),
                );
                for mark in &frame.houses {
                    painter.rect_filled(
                        Rect::from_center_size(at(mark.center), Vec2::splat(6.0)),
                        0.0,
                        color32(mark.color),
                    );
                    painter.text(
                        at(mark.center) + Vec2::new(0.0, 5.0),
                        Align2::CENTER_TOP,
                        &mark.name,
                        FontId::proportional(9.0),
                        Color32::WHITE,
                    );
                }
                painter.line_segment(
                    [at(frame.player), at(frame.heading_tip)],
                    Stroke::new(2.0, Color32::YELLOW),
                );
                painter.circle_filled(at(frame.player), 4.0, Color32::WHITE);
                painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::GRAY), egui::StrokeKind::Inside);
            });
    }

    fn toasts(&self, ctx: &Context) {
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, [-10.0, -10.0])
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    egui::Frame::popup(ui.style())
                        .fill(severity_color(toast.note.severity))
                        .show(ui, |ui| {
                            ui.colored_label(Color32::WHITE, &toast.note.message);
                        });
                }
            });
    }
}
