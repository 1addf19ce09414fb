//! # TagFlow
//!
//! A desktop utility that pastes sequential lines ("tags") from a text file
//! into whatever application currently has keyboard focus, driven by global
//! hotkeys.
//!
//! ## Features
//!
//! - Paste the next tag with a global hotkey, from any application
//! - Autotyper mode: paste tag after tag at a fixed interval until stopped
//! - Live reload when the tag file changes on disk
//! - Themable window with a three-color JSON palette
//! - Configurable paste delay and confirm keystroke
//!
//! ## Example
//!
//! ```no_run
//! use tagflow::{Config, TagStore};
//!
//! let config = Config::default();
//! let mut store = TagStore::new();
//! store.reload_from(&config.tags_file)?;
//! println!("{}", store.status_line());
//! # Ok::<(), tagflow::TagFlowError>(())
//! ```
//!
//! ## Configuration
//!
//! An optional `tagflow.json` in the working directory:
//!
//! ```json
//! {
//!   "tags_file": "tags.txt",
//!   "theme_file": "themes/silver-glow.json",
//!   "paste_delay": "100ms",
//!   "autotype_interval": "100ms",
//!   "confirm_key": "enter"
//! }
//! ```

pub mod app;
pub mod autotyper;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod hotkeys;
pub mod tags;
pub mod theme;
pub mod watcher;

pub use autotyper::Autotyper;
pub use config::{parse_duration, Config};
pub use engine::{emit_next, ClipboardInjector, EmitOutcome, Injector};
pub use error::{Result, TagFlowError};
pub use event::{AppEvent, UiHandle};
pub use hotkeys::{HotkeyAction, HotkeyManager};
pub use tags::{SharedTags, TagStore};
pub use theme::{Theme, ThemeColors};
pub use watcher::TagFileWatcher;
