//! Source hygiene for the board engine.
//!
//! Scans `src/` (colocated `_test.rs` files excluded) for patterns that
//! either crash the host or silently lose information. Every pattern has a
//! budget; the budget only goes down.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const UNWRAP: Budget = Budget { pattern: ".unwrap()", max: 0, why: "propagate with `?` or handle the None/Err" };
const EXPECT: Budget = Budget { pattern: ".expect(", max: 0, why: "propagate with `?` or handle the None/Err" };
const PANIC: Budget = Budget { pattern: "panic!(", max: 0, why: "return an error instead" };
const UNREACHABLE: Budget = Budget { pattern: "unreachable!(", max: 0, why: "encode the invariant in the types" };
const TODO: Budget = Budget { pattern: "todo!(", max: 0, why: "stubs must not ship" };
const UNIMPLEMENTED: Budget = Budget { pattern: "unimplemented!(", max: 0, why: "stubs must not ship" };
const SILENT_DISCARD: Budget = Budget { pattern: "let _ =", max: 0, why: "inspect the result or log it" };
const DOT_OK: Budget = Budget { pattern: ".ok()", max: 0, why: "errors are dropped without a trace" };
const ALLOW_DEAD_CODE: Budget = Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" };
const PRINTLN: Budget = Budget { pattern: "println!(", max: 0, why: "the engine logs through `tracing`" };

struct SourceFile {
    path: PathBuf,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    walk(Path::new(env!("CARGO_MANIFEST_DIR")).join("src").as_path(), &mut files);
    files
}

fn walk(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            walk(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.file_name().is_some_and(|n| n.to_string_lossy().ends_with("_test.rs"));
        if !is_rs || is_test {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path, content });
        }
    }
}

fn check(budget: &Budget) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found under src/");

    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|f| (f.path.display().to_string(), f.content.lines().filter(|l| l.contains(budget.pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    let found: usize = hits.iter().map(|(_, n)| n).sum();
    let listing = hits.iter().map(|(p, n)| format!("  {p}: {n}")).collect::<Vec<_>>().join("\n");

    assert!(
        found <= budget.max,
        "`{}` budget exceeded: found {found}, max {} ({}).\n{listing}",
        budget.pattern,
        budget.max,
        budget.why
    );
}

#[test]
fn unwrap_budget() {
    check(&UNWRAP);
}

#[test]
fn expect_budget() {
    check(&EXPECT);
}

#[test]
fn panic_budget() {
    check(&PANIC);
}

#[test]
fn unreachable_budget() {
    check(&UNREACHABLE);
}

#[test]
fn todo_budget() {
    check(&TODO);
}

#[test]
fn unimplemented_budget() {
    check(&UNIMPLEMENTED);
}

#[test]
fn silent_discard_budget() {
    check(&SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    check(&DOT_OK);
}

#[test]
fn allow_dead_code_budget() {
    check(&ALLOW_DEAD_CODE);
}

#[test]
fn println_budget() {
    check(&PRINTLN);
}
