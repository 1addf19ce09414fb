//! The TagFlow window.
//!
//! One main window showing the status line and the hotkey reference, plus a
//! settings window with the autotyper toggle and the theme picker. The UI
//! thread owns all visible state; background threads reach it only through
//! [`AppEvent`] messages drained at the top of every frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;

use eframe::egui::{self, Color32, RichText};
use tracing::error;

use crate::config::Config;
use crate::event::{AppEvent, UiHandle};
use crate::hotkeys::{self, HotkeyManager};
use crate::tags::SharedTags;
use crate::theme::{Theme, ThemeColors};
use crate::watcher::TagFileWatcher;

const INSTRUCTIONS: &str = "F4 — paste the next tag (or toggle the autotyper)\n\
                            F8 — reload the tag file\n\
                            F7 — reset to the first tag\n\
                            F6 — settings\n\
                            F2 — exit";

pub struct TagFlowApp {
    config: Config,
    tags: SharedTags,
    status: String,
    notice: Option<String>,
    settings_open: bool,
    colors: ThemeColors,
    armed: Arc<AtomicBool>,
    rx: Receiver<AppEvent>,
    decorated: bool,
    // Owns the OS hotkey registrations for the process lifetime.
    _hotkeys: Option<HotkeyManager>,
    _watcher: TagFileWatcher,
    _listener: JoinHandle<()>,
}

impl TagFlowApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        tags: SharedTags,
        theme: Theme,
    ) -> Self {
        let colors = theme
            .colors()
            .unwrap_or_else(|_| Theme::default().colors().expect("built-in theme is valid"));
        cc.egui_ctx.set_visuals(colors.visuals());

        let (tx, rx) = channel();
        let ui = UiHandle::new(tx, cc.egui_ctx.clone());
        let armed = hotkeys::armed_flag();

        let watcher = TagFileWatcher::spawn(config.tags_file.clone(), tags.clone(), ui.clone());

        let hotkey_manager = match HotkeyManager::new().and_then(|mut manager| {
            manager.register_defaults()?;
            Ok(manager)
        }) {
            Ok(manager) => Some(manager),
            Err(e) => {
                error!("global hotkeys unavailable: {e}");
                ui.notice(format!("Global hotkeys unavailable: {e}"));
                None
            }
        };
        let actions = hotkey_manager
            .as_ref()
            .map(HotkeyManager::actions)
            .unwrap_or_default();
        let listener = hotkeys::spawn_listener(
            actions,
            tags.clone(),
            armed.clone(),
            config.clone(),
            ui,
        );

        let status = tags.lock().status_line();
        Self {
            config,
            tags,
            status,
            notice: None,
            settings_open: false,
            colors,
            armed,
            rx,
            decorated: true,
            _hotkeys: hotkey_manager,
            _watcher: watcher,
            _listener: listener,
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                AppEvent::Status(status) => self.status = status,
                AppEvent::Notice(notice) => self.notice = Some(notice),
                AppEvent::OpenSettings => self.settings_open = true,
                AppEvent::Exit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            }
        }
    }

    fn themed_button(&self, label: &str) -> egui::Button<'static> {
        egui::Button::new(
            RichText::new(label.to_owned())
                .color(self.colors.foreground)
                .size(14.0),
        )
        .fill(self.colors.button_background)
    }

    fn change_theme(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Choose theme file")
            .add_filter("JSON Files", &["json"])
            .set_directory(&self.config.themes_dir)
            .pick_file()
        else {
            return;
        };

        match Theme::load(&path).and_then(|theme| theme.colors()) {
            Ok(colors) => {
                self.colors = colors;
                ctx.set_visuals(colors.visuals());
            }
            Err(e) => {
                error!("{e}");
                self.notice = Some(format!("Failed to load theme: {e}"));
            }
        }
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.settings_open;
        let mut toggle_autotyper = false;
        let mut pick_theme = false;

        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);

                    let armed = self.armed.load(Ordering::Relaxed);
                    let autotyper_label = if armed {
                        "AutoTyper: On"
                    } else {
                        "AutoTyper: Off"
                    };
                    if ui.add(self.themed_button(autotyper_label)).clicked() {
                        toggle_autotyper = true;
                    }

                    ui.add_space(4.0);
                    if ui.add(self.themed_button("Change theme")).clicked() {
                        pick_theme = true;
                    }

                    ui.add_space(8.0);
                });
            });

        self.settings_open = open;
        if toggle_autotyper {
            hotkeys::toggle_armed(&self.armed);
        }
        if pick_theme {
            self.change_theme(ctx);
        }
    }

    fn notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notice.clone() else {
            return;
        };
        let mut dismissed = false;

        egui::Window::new("Info")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(notice).color(self.colors.foreground));
                    ui.add_space(8.0);
                    if ui.add(self.themed_button("OK")).clicked() {
                        dismissed = true;
                    }
                    ui.add_space(4.0);
                });
            });

        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for TagFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);

        // Window-local binding, only active while the window has focus:
        // F12 toggles the window decorations.
        if ctx.input(|i| i.key_pressed(egui::Key::F12)) {
            self.decorated = !self.decorated;
            ctx.send_viewport_cmd(egui::ViewportCommand::Decorations(self.decorated));
        }

        let frame = egui::Frame::none()
            .fill(self.colors.background)
            .inner_margin(egui::Margin::same(16.0));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.label(
                    RichText::new(&self.status)
                        .color(self.colors.foreground)
                        .monospace()
                        .size(16.0),
                );
                ui.add_space(24.0);
                ui.label(
                    RichText::new(INSTRUCTIONS)
                        .color(self.colors.foreground)
                        .monospace()
                        .size(11.0),
                );

                ui.add_space(32.0);
                ui.label(
                    RichText::new(concat!("TagFlow v", env!("CARGO_PKG_VERSION")))
                        .color(self.colors.foreground)
                        .small(),
                );
            });
        });

        self.settings_window(ctx);
        self.notice_window(ctx);
    }
}

/// Window icon drawn from the theme, a little foreground dot on the window
/// background.
pub fn theme_icon(colors: &ThemeColors) -> egui::IconData {
    const SIZE: i32 = 32;
    let center = (SIZE / 2) as f32 - 0.5;
    let radius = SIZE as f32 / 3.0;

    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let color: Color32 = if (dx * dx + dy * dy).sqrt() <= radius {
                colors.foreground
            } else {
                colors.background
            };
            rgba.extend_from_slice(&color.to_array());
        }
    }

    egui::IconData {
        rgba,
        width: SIZE as u32,
        height: SIZE as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    #[test]
    fn test_theme_icon_dimensions() {
        let colors = Theme::default().colors().unwrap();
        let icon = theme_icon(&colors);
        assert_eq!(icon.width, 32);
        assert_eq!(icon.height, 32);
        assert_eq!(icon.rgba.len(), 32 * 32 * 4);
    }

    #[test]
    fn test_theme_icon_uses_palette() {
        let colors = Theme::default().colors().unwrap();
        let icon = theme_icon(&colors);

        // Corner pixel is background, center pixel is foreground.
        let corner = &icon.rgba[0..4];
        assert_eq!(corner, &colors.background.to_array());
        let center_offset = ((16 * 32 + 16) * 4) as usize;
        let center = &icon.rgba[center_offset..center_offset + 4];
        assert_eq!(center, &colors.foreground.to_array());
    }
}
