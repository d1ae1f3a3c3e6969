//! Integration Test: Sleep Prohibition
//!
//! **Policy**: production code never sleeps. The reel waits on
//! `sleep_until` deadlines and `interval` ticks inside `tokio::select!`, and
//! the TUI redraws on an interval, so there is no place for a bare sleep.

use architectural_enforcement::scan_workspace;

#[test]
fn test_no_sleep_in_production_code() {
    let violations = scan_workspace(&["::sleep(", ".sleep("]);

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:");
        for violation in &violations {
            eprintln!("  {}", violation);
        }
        eprintln!("\nUse tokio::time::sleep_until inside select!, or tokio::time::interval.");

        panic!("Found {} sleep violation(s) in production code", violations.len());
    }
}
