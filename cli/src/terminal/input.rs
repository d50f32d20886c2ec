use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use keyprobe_common::{debug, warn};
use keyprobe_core::scanner::CancelSignal;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Watches the keyboard in raw mode and fires the scan's [`CancelSignal`] on
/// `q` or Ctrl-C. Raw mode is left again when the listener is dropped.
pub struct KeyListener {
    done: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl KeyListener {
    pub fn start(cancel: CancelSignal) -> Self {
        let done: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));

        if let Err(e) = enable_raw_mode() {
            warn!("Keyboard input unavailable: {e}");
            return Self { done, thread: None };
        }

        let stop = Arc::clone(&done);
        let thread = thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                if !event::poll(POLL_INTERVAL).unwrap_or(false) {
                    continue;
                }
                if let Ok(Event::Key(key_event)) = event::read()
                    && key_event.kind == KeyEventKind::Press
                    && is_stop_key(key_event.code, key_event.modifiers)
                {
                    debug!("Stop requested from keyboard");
                    cancel.cancel();
                    break;
                }
            }
        });

        Self {
            done,
            thread: Some(thread),
        }
    }
}

fn is_stop_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    code == KeyCode::Char('q') || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.done.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        let _ = disable_raw_mode();
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
