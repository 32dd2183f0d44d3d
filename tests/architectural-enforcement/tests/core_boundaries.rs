//! Integration Test: Reveal Core Boundaries
//!
//! **Policy**: `reveal-core` is headless. It never imports a UI framework,
//! and its production code propagates errors instead of panicking.

use std::fs;

use architectural_enforcement::{assert_clean, scan, workspace_root};

const UI_CRATES: [&str; 2] = ["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("reveal/core/Cargo.toml"))
        .expect("reveal/core/Cargo.toml readable");

    let found: Vec<&str> = UI_CRATES
        .iter()
        .copied()
        .filter(|name| {
            manifest
                .lines()
                .any(|line| line.trim_start().starts_with(&format!("{name} ")) || line.trim_start().starts_with(&format!("{name}=")))
        })
        .collect();

    assert!(found.is_empty(), "reveal-core depends on UI crates: {found:?}");
}

#[test]
fn test_core_sources_do_not_use_ui_crates() {
    let violations = scan("reveal/core/src", |_, code| {
        UI_CRATES
            .iter()
            .any(|name| code.contains(&format!("use {name}")) || code.contains(&format!("{name}::")))
    });
    assert_clean("UI framework referenced from reveal core", &violations);
}

#[test]
fn test_core_production_code_does_not_panic() {
    let violations = scan("reveal/core/src", |_, code| {
        code.contains(".unwrap()") || code.contains(".expect(") || code.contains("panic!(")
    });
    assert_clean("unwrap/expect/panic in reveal core production code", &violations);
}

#[test]
fn test_tui_production_code_does_not_unwrap() {
    let violations = scan("tui/src", |_, code| code.contains(".unwrap()"));
    assert_clean("unwrap in TUI production code", &violations);
}
