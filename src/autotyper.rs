//! Autotyper: a single-flight, cancellable paste loop.
//!
//! One worker thread at a time pastes tag after tag at a fixed interval until
//! the list is exhausted, the stop flag is raised, or the user disarms the
//! autotyper from the settings window. `stop()` joins the worker, so once it
//! returns no further paste can land.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};

use crate::engine::{self, EmitOutcome, Injector};
use crate::event::UiHandle;
use crate::tags::SharedTags;

/// Owner of the worker thread and its control flags.
///
/// State machine: Off → Armed (`enabled` set from the settings window) →
/// Running (worker spawned by the trigger hotkey) → back to Armed or Off.
/// The worker re-checks `enabled` every iteration, so disarming while
/// Running winds the loop down instead of leaving it under a stale flag.
pub struct Autotyper {
    enabled: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Autotyper {
    pub fn new(enabled: Arc<AtomicBool>) -> Self {
        Self {
            enabled,
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Whether the autotyper mode is armed (the user preference, not whether
    /// a worker is currently running).
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Whether a worker thread is currently running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the worker. A no-op while one is already running.
    ///
    /// `make_injector` runs on the worker thread, so the paste backend is
    /// constructed by the thread that uses it.
    pub fn start<I, F>(&mut self, make_injector: F, tags: SharedTags, interval: Duration, ui: UiHandle)
    where
        I: Injector + 'static,
        F: FnOnce() -> crate::error::Result<I> + Send + 'static,
    {
        if self.is_running() {
            debug!("autotyper already running, start ignored");
            return;
        }
        // Reap a worker that finished on its own.
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        self.stop.store(false, Ordering::Relaxed);
        let stop = self.stop.clone();
        let enabled = self.enabled.clone();

        self.handle = Some(thread::spawn(move || {
            let mut injector = match make_injector() {
                Ok(injector) => injector,
                Err(e) => {
                    error!("autotyper could not open the paste backend: {e}");
                    ui.notice(format!("AutoTyper error: {e}"));
                    return;
                }
            };

            loop {
                if stop.load(Ordering::Relaxed) || !enabled.load(Ordering::Relaxed) {
                    break;
                }

                // Holding the lock across the whole paste serializes against
                // a manual hotkey trigger.
                let outcome = {
                    let mut tags = tags.lock();
                    engine::emit_next(&mut tags, &mut injector)
                };

                match outcome {
                    Ok(EmitOutcome::Pasted { status, .. }) => ui.status(status),
                    Ok(EmitOutcome::Exhausted) => break,
                    Err(e) => {
                        error!("autotyper paste failed: {e}");
                        break;
                    }
                }

                thread::sleep(interval);
            }
        }));
    }

    /// Raise the stop flag and wait for the worker to exit.
    ///
    /// Blocks until the worker has observed the flag, so no paste from the
    /// old run can race a subsequent `start()`.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Autotyper {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use eframe::egui;
    use parking_lot::Mutex;

    use super::*;
    use crate::error::Result;
    use crate::tags::TagStore;

    #[derive(Default, Clone)]
    struct RecordingInjector {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Injector for RecordingInjector {
        fn inject(&mut self, text: &str) -> Result<()> {
            self.log.lock().push(text.to_owned());
            Ok(())
        }
    }

    fn shared_store(count: usize) -> SharedTags {
        let mut store = TagStore::new();
        store.replace((0..count).map(|i| format!("tag-{i}")).collect());
        Arc::new(Mutex::new(store))
    }

    fn test_ui() -> UiHandle {
        // The receiver is dropped; UiHandle tolerates a closed channel.
        let (tx, _rx) = channel();
        UiHandle::new(tx, egui::Context::default())
    }

    fn wait_until_finished(autotyper: &Autotyper) {
        for _ in 0..500 {
            if !autotyper.is_running() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("autotyper did not finish in time");
    }

    #[test]
    fn test_runs_to_exhaustion_in_order() {
        let tags = shared_store(5);
        let enabled = Arc::new(AtomicBool::new(true));
        let mut autotyper = Autotyper::new(enabled);

        let injector = RecordingInjector::default();
        let log = injector.log.clone();
        autotyper.start(
            move || Ok(injector),
            tags.clone(),
            Duration::from_millis(1),
            test_ui(),
        );
        wait_until_finished(&autotyper);

        let pasted = log.lock().clone();
        assert_eq!(
            pasted,
            (0..5).map(|i| format!("tag-{i}")).collect::<Vec<_>>()
        );
        assert!(tags.lock().is_exhausted());
    }

    #[test]
    fn test_stop_joins_and_blocks_further_pastes() {
        let tags = shared_store(1000);
        let enabled = Arc::new(AtomicBool::new(true));
        let mut autotyper = Autotyper::new(enabled);

        let injector = RecordingInjector::default();
        let log = injector.log.clone();
        autotyper.start(
            move || Ok(injector),
            tags.clone(),
            Duration::from_millis(5),
            test_ui(),
        );

        thread::sleep(Duration::from_millis(25));
        autotyper.stop();

        let pasted_at_stop = log.lock().len();
        let cursor_at_stop = tags.lock().cursor();
        assert!(cursor_at_stop <= 1000);
        assert_eq!(pasted_at_stop, cursor_at_stop);

        thread::sleep(Duration::from_millis(50));
        assert_eq!(log.lock().len(), pasted_at_stop);
        assert_eq!(tags.lock().cursor(), cursor_at_stop);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let tags = shared_store(1000);
        let enabled = Arc::new(AtomicBool::new(true));
        let mut autotyper = Autotyper::new(enabled);

        let first = RecordingInjector::default();
        let second = RecordingInjector::default();
        let second_log = second.log.clone();

        autotyper.start(
            move || Ok(first),
            tags.clone(),
            Duration::from_millis(5),
            test_ui(),
        );
        autotyper.start(
            move || Ok(second),
            tags.clone(),
            Duration::from_millis(5),
            test_ui(),
        );

        thread::sleep(Duration::from_millis(25));
        autotyper.stop();
        assert!(second_log.lock().is_empty());
    }

    #[test]
    fn test_disarming_winds_worker_down() {
        let tags = shared_store(1000);
        let enabled = Arc::new(AtomicBool::new(true));
        let mut autotyper = Autotyper::new(enabled.clone());

        let injector = RecordingInjector::default();
        autotyper.start(
            move || Ok(injector),
            tags,
            Duration::from_millis(1),
            test_ui(),
        );

        enabled.store(false, Ordering::Relaxed);
        wait_until_finished(&autotyper);
    }
}
