//! Paste engine: clipboard plus synthetic keystrokes.
//!
//! A paste is a fixed sequence against the focused application: put the tag
//! on the clipboard, send the platform paste chord, wait for the target to
//! register it, send the confirm keystroke, then advance the cursor. The
//! sequencing lives in [`emit_next`] behind the [`Injector`] trait so it can
//! be exercised in tests without a real clipboard or input backend.

use std::thread;
use std::time::Duration;

use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard};

use crate::config::Config;
use crate::error::{Result, TagFlowError};
use crate::tags::TagStore;

/// Something that can deliver one tag into the focused application.
pub trait Injector {
    fn inject(&mut self, text: &str) -> Result<()>;
}

/// Result of a single paste attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    /// A tag was pasted and the cursor advanced.
    Pasted {
        /// The tag that was delivered.
        tag: String,
        /// Status line after the cursor advanced.
        status: String,
    },
    /// The cursor was already past the last tag; nothing was touched.
    Exhausted,
}

/// Paste the current tag and advance the cursor.
///
/// At exhaustion this performs no side effect at all. On an injection error
/// the cursor stays where it was, so the same tag is retried on the next
/// trigger.
pub fn emit_next(tags: &mut TagStore, injector: &mut dyn Injector) -> Result<EmitOutcome> {
    let Some(tag) = tags.current().map(str::to_owned) else {
        return Ok(EmitOutcome::Exhausted);
    };
    injector.inject(&tag)?;
    tags.advance();
    Ok(EmitOutcome::Pasted {
        status: tags.status_line(),
        tag,
    })
}

/// Parse the configured confirm keystroke.
///
/// `"none"` (or an empty string) disables the confirm step entirely.
pub fn parse_confirm_key(name: &str) -> Result<Option<Key>> {
    let normalized = name.trim().to_lowercase();
    let key = match normalized.as_str() {
        "" | "none" => return Ok(None),
        "enter" | "return" => Key::Return,
        "tab" => Key::Tab,
        "space" => Key::Space,
        "escape" | "esc" => Key::Escape,
        single if single.chars().count() == 1 => {
            Key::Unicode(single.chars().next().expect("length checked"))
        }
        _ => {
            return Err(TagFlowError::invalid_key(
                name,
                "expected enter, tab, space, escape, a single character, or none",
            ))
        }
    };
    Ok(Some(key))
}

/// Real paste backend: `arboard` clipboard plus `enigo` keystrokes.
///
/// Construction doubles as the startup availability probe: if the clipboard
/// or the input backend cannot be opened (missing display server, denied
/// accessibility permission), `new` fails with a diagnostic instead of the
/// app silently doing nothing on every hotkey.
pub struct ClipboardInjector {
    clipboard: Clipboard,
    enigo: Enigo,
    paste_delay: Duration,
    confirm_key: Option<Key>,
}

impl ClipboardInjector {
    pub fn new(config: &Config) -> Result<Self> {
        let clipboard = Clipboard::new().map_err(|e| TagFlowError::clipboard(e.to_string()))?;
        let enigo = Enigo::new(&enigo::Settings::default())
            .map_err(|e| TagFlowError::inject(e.to_string()))?;
        let confirm_key = parse_confirm_key(&config.confirm_key)?;
        Ok(Self {
            clipboard,
            enigo,
            paste_delay: config.paste_delay,
            confirm_key,
        })
    }

    fn paste_chord(&mut self) -> Result<()> {
        let modifier = if cfg!(target_os = "macos") {
            Key::Meta
        } else {
            Key::Control
        };
        self.enigo
            .key(modifier, Direction::Press)
            .map_err(|e| TagFlowError::inject(e.to_string()))?;
        let result = self
            .enigo
            .key(Key::Unicode('v'), Direction::Click)
            .map_err(|e| TagFlowError::inject(e.to_string()));
        // Release the modifier even if the 'v' press failed, so the user is
        // not left with a stuck Ctrl/Cmd key.
        self.enigo
            .key(modifier, Direction::Release)
            .map_err(|e| TagFlowError::inject(e.to_string()))?;
        result
    }
}

impl Injector for ClipboardInjector {
    fn inject(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text.to_owned())
            .map_err(|e| TagFlowError::clipboard(e.to_string()))?;
        self.paste_chord()?;
        thread::sleep(self.paste_delay);
        if let Some(key) = self.confirm_key {
            self.enigo
                .key(key, Direction::Click)
                .map_err(|e| TagFlowError::inject(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    /// Test injector recording every delivered tag.
    #[derive(Default, Clone)]
    pub(crate) struct RecordingInjector {
        pub log: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
    }

    impl Injector for RecordingInjector {
        fn inject(&mut self, text: &str) -> Result<()> {
            if self.fail {
                return Err(TagFlowError::inject("backend down"));
            }
            self.log.lock().push(text.to_owned());
            Ok(())
        }
    }

    fn store_with(tags: &[&str]) -> TagStore {
        let mut store = TagStore::new();
        store.replace(tags.iter().map(|t| t.to_string()).collect());
        store
    }

    #[test]
    fn test_emit_sequence_in_order() {
        let mut store = store_with(&["cat", "dog", "bird"]);
        let mut injector = RecordingInjector::default();

        let first = emit_next(&mut store, &mut injector).unwrap();
        assert_eq!(
            first,
            EmitOutcome::Pasted {
                tag: "cat".into(),
                status: "Next tag: dog".into(),
            }
        );

        let second = emit_next(&mut store, &mut injector).unwrap();
        assert_eq!(
            second,
            EmitOutcome::Pasted {
                tag: "dog".into(),
                status: "Next tag: bird".into(),
            }
        );
        assert_eq!(store.cursor(), 2);
        assert_eq!(injector.log.lock().last().unwrap(), "dog");

        let third = emit_next(&mut store, &mut injector).unwrap();
        assert_eq!(
            third,
            EmitOutcome::Pasted {
                tag: "bird".into(),
                status: "All tags are inserted.".into(),
            }
        );
        assert_eq!(store.cursor(), 3);

        // Exhausted: pure no-op.
        let fourth = emit_next(&mut store, &mut injector).unwrap();
        assert_eq!(fourth, EmitOutcome::Exhausted);
        assert_eq!(store.cursor(), 3);
        assert_eq!(injector.log.lock().len(), 3);
    }

    #[test]
    fn test_emit_failure_keeps_cursor() {
        let mut store = store_with(&["cat"]);
        let mut injector = RecordingInjector {
            fail: true,
            ..Default::default()
        };

        assert!(emit_next(&mut store, &mut injector).is_err());
        assert_eq!(store.cursor(), 0);
        assert!(injector.log.lock().is_empty());
    }

    #[test]
    fn test_parse_confirm_key() {
        assert_eq!(parse_confirm_key("enter").unwrap(), Some(Key::Return));
        assert_eq!(parse_confirm_key("Return").unwrap(), Some(Key::Return));
        assert_eq!(parse_confirm_key("tab").unwrap(), Some(Key::Tab));
        assert_eq!(parse_confirm_key(" none ").unwrap(), None);
        assert_eq!(parse_confirm_key("").unwrap(), None);
        assert_eq!(parse_confirm_key("x").unwrap(), Some(Key::Unicode('x')));
        assert!(parse_confirm_key("ctrl+v").is_err());
    }

    /// Touches the real clipboard and input backends.
    #[test]
    #[cfg(feature = "system-tests")]
    fn test_clipboard_injector_creation() {
        let config = Config::default();
        assert!(ClipboardInjector::new(&config).is_ok());
    }
}
