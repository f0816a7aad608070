//! Holds diagnostic output while the TUI owns the terminal.
//!
//! Anything written to stderr during raw mode lands on top of the UI, so log
//! lines are parked here and replayed after the terminal is restored.

use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    // A panic while holding the lock leaves plain strings behind, still usable.
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start parking messages instead of printing them.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Stop buffering and hand back everything collected so far.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

pub fn is_active() -> bool {
    lock().is_some()
}

/// Store the message if buffering is active, otherwise print it to stderr.
pub fn write(msg: String) {
    let mut guard = lock();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Like `eprintln!` but routed through the buffer.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::write(format!($($arg)*))
    };
}
