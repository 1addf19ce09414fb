//! Messages from background threads to the UI.
//!
//! Hotkey, watcher and autotyper threads never touch UI state directly; they
//! send an [`AppEvent`] and poke the egui context so the event loop wakes up
//! and drains the queue on its own thread.

use std::sync::mpsc::Sender;

use eframe::egui;

/// UI-bound update emitted by a background thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Replace the status line in the main window.
    Status(String),
    /// Show a blocking informational/error dialog.
    Notice(String),
    /// Open the settings window.
    OpenSettings,
    /// Close the application.
    Exit,
}

/// Cloneable sending half handed to every background thread.
#[derive(Clone)]
pub struct UiHandle {
    tx: Sender<AppEvent>,
    ctx: egui::Context,
}

impl UiHandle {
    pub fn new(tx: Sender<AppEvent>, ctx: egui::Context) -> Self {
        Self { tx, ctx }
    }

    /// Queue an event and wake the UI thread. A closed channel means the UI
    /// is shutting down, so the event is silently dropped.
    pub fn send(&self, event: AppEvent) {
        if self.tx.send(event).is_ok() {
            self.ctx.request_repaint();
        }
    }

    pub fn status(&self, text: impl Into<String>) {
        self.send(AppEvent::Status(text.into()));
    }

    pub fn notice(&self, text: impl Into<String>) {
        self.send(AppEvent::Notice(text.into()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (tx, rx) = channel();
        let ui = UiHandle::new(tx, egui::Context::default());

        ui.status("Next tag: cat");
        ui.notice("All tags are inserted.");
        ui.send(AppEvent::Exit);

        assert_eq!(rx.recv().unwrap(), AppEvent::Status("Next tag: cat".into()));
        assert_eq!(
            rx.recv().unwrap(),
            AppEvent::Notice("All tags are inserted.".into())
        );
        assert_eq!(rx.recv().unwrap(), AppEvent::Exit);
    }
}
