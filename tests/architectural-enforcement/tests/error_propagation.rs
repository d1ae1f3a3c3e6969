//! Integration Test: Error Propagation
//!
//! **Policy**: production code returns errors with `?` instead of
//! panicking on them. Fetch failures in particular must never crash the reel.

use architectural_enforcement::scan_workspace;

#[test]
fn test_no_unwrap_in_production_code() {
    let violations = scan_workspace(&[".unwrap()", ".expect("]);

    if !violations.is_empty() {
        eprintln!("\nPanicking calls found in production code:");
        for violation in &violations {
            eprintln!("  {}", violation);
        }

        panic!("Found {} unwrap/expect call(s) in production code", violations.len());
    }
}
