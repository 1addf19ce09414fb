//! Tag-file watcher.
//!
//! Watches the directory containing the tag file (non-recursive) and reloads
//! the tag list whenever the file itself is modified or recreated. Matching
//! is by exact file name, so sibling files that merely contain the name as a
//! substring do not trigger reloads. There is no debounce window: the reload
//! diff-check makes duplicate identical events free.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::thread::{self, JoinHandle};

use notify::{recommended_watcher, Event, EventKind, RecursiveMode, Watcher};
use tracing::{error, info, warn};

use crate::event::UiHandle;
use crate::tags::SharedTags;

/// Watches the tag file and reloads it on change.
pub struct TagFileWatcher {
    _thread: JoinHandle<()>,
}

impl TagFileWatcher {
    /// Spawn the background watcher thread.
    pub fn spawn(path: PathBuf, tags: SharedTags, ui: UiHandle) -> Self {
        let thread = thread::spawn(move || {
            if let Err(e) = watch_loop(&path, tags, ui) {
                warn!(error = %e, "tag file watcher stopped");
            }
        });
        Self { _thread: thread }
    }
}

fn watch_loop(path: &Path, tags: SharedTags, ui: UiHandle) -> notify::Result<()> {
    let Some(file_name) = path.file_name().map(OsString::from) else {
        warn!(path = %path.display(), "tag file path has no file name, watcher disabled");
        return Ok(());
    };
    let watch_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (event_tx, event_rx) = channel();
    let mut watcher = recommended_watcher(move |res: notify::Result<Event>| {
        let _ = event_tx.send(res);
    })?;
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

    info!(
        dir = %watch_dir.display(),
        file = %file_name.to_string_lossy(),
        "tag file watcher started"
    );

    // Runs until the watcher's channel closes at process exit.
    while let Ok(result) = event_rx.recv() {
        match result {
            Ok(event) => {
                if !is_tag_file_change(&event, &file_name) {
                    continue;
                }
                let status = {
                    let mut tags = tags.lock();
                    match tags.reload_from(path) {
                        // Unchanged content: keep the cursor, nothing to show.
                        Ok(false) => None,
                        Ok(true) => Some(tags.status_line()),
                        Err(e) => {
                            error!("{e}");
                            None
                        }
                    }
                };
                if let Some(status) = status {
                    ui.status(status);
                }
            }
            Err(e) => warn!(error = %e, "tag file watch error"),
        }
    }

    Ok(())
}

/// Exact file-name match on modify/create events.
fn is_tag_file_change(event: &Event, file_name: &OsString) -> bool {
    let relevant_kind = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
    relevant_kind
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
