//! Global hotkey registration and dispatch.
//!
//! Five fixed process-wide bindings, intercepted regardless of which
//! application has focus:
//!
//! | Key | Action |
//! |-----|--------|
//! | F4  | paste the next tag, or toggle the autotyper when it is armed |
//! | F8  | reload the tag file |
//! | F7  | reset the cursor to the first tag |
//! | F6  | open the settings window |
//! | F2  | exit |
//!
//! Callbacks run on a dedicated listener thread, never on the UI thread.
//! State changes go through the shared `TagStore` mutex; anything the window
//! needs to show travels back as an [`AppEvent`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use global_hotkey::hotkey::{Code, HotKey};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tracing::{error, info, warn};

use crate::autotyper::Autotyper;
use crate::config::Config;
use crate::engine::{self, ClipboardInjector, EmitOutcome};
use crate::event::{AppEvent, UiHandle};
use crate::tags::{SharedTags, EXHAUSTED_NOTICE};

/// Action bound to a global hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    /// Paste the next tag, or start/stop the autotyper when armed.
    Trigger,
    /// Re-read the tag file.
    Reload,
    /// Move the cursor back to the first tag.
    Reset,
    /// Open the settings window.
    OpenSettings,
    /// Quit the application.
    Exit,
}

/// Fixed bindings; not rebindable at runtime in this version.
const BINDINGS: &[(Code, HotkeyAction)] = &[
    (Code::F4, HotkeyAction::Trigger),
    (Code::F8, HotkeyAction::Reload),
    (Code::F7, HotkeyAction::Reset),
    (Code::F6, HotkeyAction::OpenSettings),
    (Code::F2, HotkeyAction::Exit),
];

/// Owns the OS-level hotkey registrations.
///
/// Must stay alive for the lifetime of the process; dropping it unregisters
/// every binding.
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    actions: HashMap<u32, HotkeyAction>,
}

impl HotkeyManager {
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| anyhow::anyhow!("failed to create GlobalHotKeyManager: {e}"))?;
        Ok(Self {
            manager,
            actions: HashMap::new(),
        })
    }

    /// Register the five fixed bindings.
    pub fn register_defaults(&mut self) -> Result<()> {
        for (code, action) in BINDINGS {
            let hotkey = HotKey::new(None, *code);
            self.manager
                .register(hotkey)
                .map_err(|e| anyhow::anyhow!("failed to register hotkey '{code:?}': {e}"))?;
            self.actions.insert(hotkey.id(), *action);
        }
        info!("registered {} global hotkeys", self.actions.len());
        Ok(())
    }

    /// Snapshot of the id → action map for the listener thread.
    pub fn actions(&self) -> HashMap<u32, HotkeyAction> {
        self.actions.clone()
    }
}

/// Spawn the long-lived listener thread.
///
/// Polls the process-wide hotkey event receiver and dispatches pressed keys.
/// Rapid repeated presses are queued, not debounced.
pub fn spawn_listener(
    actions: HashMap<u32, HotkeyAction>,
    tags: SharedTags,
    enabled: Arc<AtomicBool>,
    config: Config,
    ui: UiHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut dispatcher = Dispatcher::new(tags, enabled, config, ui);
        let receiver = GlobalHotKeyEvent::receiver();

        loop {
            if let Ok(event) = receiver.try_recv() {
                if event.state == HotKeyState::Pressed {
                    if let Some(action) = actions.get(&event.id) {
                        dispatcher.handle(*action);
                    }
                }
            }

            // Small sleep to prevent busy waiting
            thread::sleep(Duration::from_millis(10));
        }
    })
}

/// Executes hotkey actions on the listener thread.
struct Dispatcher {
    tags: SharedTags,
    autotyper: Autotyper,
    config: Config,
    ui: UiHandle,
    injector: Option<ClipboardInjector>,
}

impl Dispatcher {
    fn new(tags: SharedTags, enabled: Arc<AtomicBool>, config: Config, ui: UiHandle) -> Self {
        Self {
            tags,
            autotyper: Autotyper::new(enabled),
            config,
            ui,
            injector: None,
        }
    }

    fn handle(&mut self, action: HotkeyAction) {
        match action {
            HotkeyAction::Trigger => self.trigger(),
            HotkeyAction::Reload => self.reload(),
            HotkeyAction::Reset => self.reset(),
            HotkeyAction::OpenSettings => self.ui.send(AppEvent::OpenSettings),
            HotkeyAction::Exit => self.ui.send(AppEvent::Exit),
        }
    }

    fn trigger(&mut self) {
        if self.autotyper.is_enabled() {
            self.toggle_autotyper();
        } else {
            self.paste_one();
        }
    }

    fn toggle_autotyper(&mut self) {
        if self.autotyper.is_running() {
            self.autotyper.stop();
            self.ui.status(self.tags.lock().status_line());
        } else {
            let config = self.config.clone();
            self.autotyper.start(
                move || ClipboardInjector::new(&config),
                self.tags.clone(),
                self.config.autotype_interval,
                self.ui.clone(),
            );
        }
    }

    fn paste_one(&mut self) {
        if !self.ensure_injector() {
            return;
        }
        let Some(injector) = self.injector.as_mut() else {
            return;
        };
        let outcome = {
            let mut tags = self.tags.lock();
            engine::emit_next(&mut tags, injector)
        };
        match outcome {
            Ok(EmitOutcome::Pasted { status, .. }) => self.ui.status(status),
            Ok(EmitOutcome::Exhausted) => self.ui.notice(EXHAUSTED_NOTICE),
            Err(e) => {
                error!("paste failed: {e}");
                self.ui.notice(format!("Paste failed: {e}"));
            }
        }
    }

    fn reload(&mut self) {
        let status = {
            let mut tags = self.tags.lock();
            match tags.reload_from(&self.config.tags_file) {
                Ok(_) => Some(tags.status_line()),
                Err(e) => {
                    error!("{e}");
                    None
                }
            }
        };
        if let Some(status) = status {
            self.ui.status(status);
        }
    }

    fn reset(&mut self) {
        let status = {
            let mut tags = self.tags.lock();
            tags.reset();
            tags.status_line()
        };
        self.ui.status(status);
    }

    /// Open the listener's own paste backend on first use.
    ///
    /// The startup probe already verified the backend once, but the listener
    /// thread keeps its own handles; a transient failure here is reported and
    /// retried on the next press.
    fn ensure_injector(&mut self) -> bool {
        if self.injector.is_none() {
            match ClipboardInjector::new(&self.config) {
                Ok(injector) => self.injector = Some(injector),
                Err(e) => {
                    warn!("paste backend unavailable: {e}");
                    self.ui.notice(format!("Paste failed: {e}"));
                }
            }
        }
        self.injector.is_some()
    }
}

/// Whether the autotyper toggle is armed. Shared between the settings window
/// button and the trigger hotkey.
pub fn armed_flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

/// Flip an armed flag, returning the new value.
pub fn toggle_armed(flag: &AtomicBool) -> bool {
    !flag.fetch_xor(true, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_cover_all_actions() {
        let actions: Vec<_> = BINDINGS.iter().map(|(_, a)| *a).collect();
        assert_eq!(actions.len(), 5);
        assert!(actions.contains(&HotkeyAction::Trigger));
        assert!(actions.contains(&HotkeyAction::Reload));
        assert!(actions.contains(&HotkeyAction::Reset));
        assert!(actions.contains(&HotkeyAction::OpenSettings));
        assert!(actions.contains(&HotkeyAction::Exit));
    }

    #[test]
    fn test_toggle_armed() {
        let flag = armed_flag();
        assert!(!flag.load(Ordering::Relaxed));
        assert!(toggle_armed(&flag));
        assert!(flag.load(Ordering::Relaxed));
        assert!(!toggle_armed(&flag));
        assert!(!flag.load(Ordering::Relaxed));
    }
}
