//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Nothing on the event loop sleeps. Waiting happens on the event
//! channel; delays belong inside deferred effects.
//! **Exceptions**: The demo view's background jobs, which run as spawned
//! effects off the loop.

use architectural_enforcement::{find, production_lines, tui_src};

/// Files whose sleeps only ever run inside spawned effects
const EFFECT_ONLY: &[&str] = &["demo.rs"];

#[test]
fn test_no_thread_sleep_anywhere() {
    let violations = find(&production_lines(&tui_src()), &["thread::sleep"]);
    report(&violations, "blocking thread sleep");
}

#[test]
fn test_no_async_sleep_outside_effects() {
    let violations: Vec<_> = find(&production_lines(&tui_src()), &["time::sleep", "sleep_until"])
        .into_iter()
        .filter(|line| {
            let name = line.path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            !EFFECT_ONLY.contains(&name)
        })
        .collect();
    report(&violations, "sleep on the event loop");
}

fn report(violations: &[architectural_enforcement::SourceLine], what: &str) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ CRITICAL: {} found in production code!\n", what);
    for violation in violations {
        eprintln!("  ❌ {}", violation);
    }
    eprintln!("\n✅ REQUIRED:");
    eprintln!("  - Wait on the event channel, not a timer");
    eprintln!("  - Put delays inside Effect::spawn futures");

    panic!(
        "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
        violations.len()
    );
}
