//! Hygiene: source-tree budgets for patterns the crate does not allow.
//!
//! Production files under `src/` (sibling `_test.rs` files excluded) are
//! scanned line by line. Every budget is zero; a new hit means fixing the
//! code, not raising the number.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

// Panics abort the host's editing session.
const UNWRAP: Budget = Budget { pattern: ".unwrap()", max: 0, why: "propagate or default instead" };
const EXPECT: Budget = Budget { pattern: ".expect(", max: 0, why: "propagate or default instead" };
const PANIC: Budget = Budget { pattern: "panic!(", max: 0, why: "no input may crash the editor" };
const UNREACHABLE: Budget = Budget { pattern: "unreachable!(", max: 0, why: "make the state impossible instead" };
const TODO: Budget = Budget { pattern: "todo!(", max: 0, why: "every operation is implemented" };
const UNIMPLEMENTED: Budget = Budget { pattern: "unimplemented!(", max: 0, why: "every operation is implemented" };

// Silent loss discards errors without inspecting them.
const SILENT_DISCARD: Budget = Budget { pattern: "let _ =", max: 0, why: "handle or log the value" };
const DOT_OK: Budget = Budget { pattern: ".ok()", max: 0, why: "match on the error instead" };

// Output goes through `tracing`, never straight to the terminal.
const PRINTLN: Budget = Budget { pattern: "println!(", max: 0, why: "use tracing macros" };
const EPRINTLN: Budget = Budget { pattern: "eprintln!(", max: 0, why: "use tracing macros" };

const ALLOW_DEAD_CODE: Budget = Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" };

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        if path.extension().is_none_or(|e| e != "rs") {
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn check(budget: &Budget) {
    let files = source_files();
    assert!(!files.is_empty(), "no source files found; run from the crate root");

    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(budget.pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    let count: usize = hits.iter().map(|(_, n)| n).sum();
    let listing = hits.iter().map(|(p, n)| format!("  {p}: {n}")).collect::<Vec<_>>().join("\n");

    assert!(
        count <= budget.max,
        "`{}` budget exceeded: found {count}, max {} ({}).\n{listing}",
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
fn println_budget() {
    check(&PRINTLN);
}

#[test]
fn eprintln_budget() {
    check(&EPRINTLN);
}

#[test]
fn allow_dead_code_budget() {
    check(&ALLOW_DEAD_CODE);
}
