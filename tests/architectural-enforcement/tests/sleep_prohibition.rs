//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code waits on events, channels and intervals; it
//! never sleeps. The only sleep is the delayed event post in the
//! sequencer's timer module, which is an owned, abortable task.
//!
//! The TUI paces frames with `tokio::time::interval`, not sleep.

use std::path::Path;

use architectural_enforcement::{assert_clean, scan};

/// The one file allowed to sleep
const TIMER_MODULE: &str = "reveal/core/src/sequencer/timers.rs";

fn is_sleep(path: &Path, code: &str) -> bool {
    let sleeps = code.contains("::sleep(") || code.contains(".sleep(") || code.contains("sleep_until(");
    sleeps && !path.ends_with(TIMER_MODULE)
}

#[test]
fn test_no_sleep_in_core() {
    let violations = scan("reveal/core/src", is_sleep);
    assert_clean("Sleep calls in reveal core outside the timer module", &violations);
}

#[test]
fn test_no_sleep_in_tui() {
    let violations = scan("tui/src", is_sleep);
    assert_clean("Sleep calls in the TUI (use the frame interval)", &violations);
}

#[test]
fn test_no_blocking_thread_sleep_anywhere() {
    let mut violations = scan("reveal/core/src", |_, code| code.contains("thread::sleep"));
    violations.extend(scan("tui/src", |_, code| code.contains("thread::sleep")));
    assert_clean("std::thread::sleep blocks the runtime", &violations);
}

#[test]
fn test_timer_module_exists() {
    let path = architectural_enforcement::workspace_root().join(TIMER_MODULE);
    assert!(path.exists(), "{TIMER_MODULE} moved; update the sleep policy");
}
