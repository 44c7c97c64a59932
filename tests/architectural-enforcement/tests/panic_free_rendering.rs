//! Integration Test: Panic-Free Rendering
//!
//! **Policy**: Production code in the TUI crate MUST NOT panic. A panic
//! mid-session leaves the terminal in raw mode on the alternate screen.
//! **Required**: Propagate with `?`, or degrade to a best-effort value
//! (`unwrap_or`, saturating arithmetic, `let ... else`).

use architectural_enforcement::{find, production_lines, tui_src};

const FORBIDDEN: &[&str] = &[
    ".unwrap()",
    ".expect(",
    "panic!(",
    "unreachable!(",
    "todo!(",
    "unimplemented!(",
];

#[test]
fn test_no_panicking_calls_in_production_code() {
    let violations = find(&production_lines(&tui_src()), FORBIDDEN);

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Panicking calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n❌ FORBIDDEN:");
        for pattern in FORBIDDEN {
            eprintln!("  - {}", pattern);
        }
        eprintln!("\n✅ ACCEPTABLE:");
        eprintln!("  - Test code (#[cfg(test)] modules, tui/tests/)");
        eprintln!("  - unwrap_or / unwrap_or_default / unwrap_or_else");

        panic!(
            "\nFound {} panicking call(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}
