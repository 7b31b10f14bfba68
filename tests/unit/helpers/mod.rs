//! Shared helpers for unit tests

use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Serialize tests that mutate process environment variables.
///
/// Detection reads `$SHELL` and the detection-disable toggle; concurrent
/// mutation from parallel tests would race, so every such test holds this
/// guard for its duration.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
