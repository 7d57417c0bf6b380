//! Assertions made outside a test context terminate the whole process.
//!
//! The `child` test does nothing unless `VERITY_CHILD` is set; the other tests
//! re-run this test binary with that variable and inspect the exit status and
//! standard error of the child.

use assert_cmd::Command;
use predicates::prelude::*;
use verity::{assert, Process, Value};

const CHILD: &str = "VERITY_CHILD";

#[test]
fn child() {
    let Some(mode) = std::env::var_os(CHILD) else {
        return;
    };
    match mode.to_str() {
        Some("equal") => assert::equal(
            &Process,
            1,
            2,
            &[Value::from("count=%d"), Value::from(3)],
        ),
        Some("panics") => assert::panics(&Process, "quiet action", || {}),
        Some("pass") => assert::equal(&Process, 1, 1, &[]),
        _ => {}
    }
}

fn run_child(mode: &str) -> assert_cmd::assert::Assert {
    let exe = std::env::current_exe().expect("test binary path");
    Command::new(exe)
        .args(["child", "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD, mode)
        .assert()
}

#[test]
fn failed_equal_exits_with_report() {
    run_child("equal")
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\nTest:            Equal\n"))
        .stderr(predicate::str::contains("Trace:           process_fatal.rs:"))
        .stderr(predicate::str::contains("Description:     count=3\n"))
        .stderr(predicate::str::contains("Result:          Not equal\n"))
        .stderr(predicate::str::contains("Expected:        1     (i32)\n"))
        .stderr(predicate::str::contains("Actual:          2     (i32)"));
}

#[test]
fn panics_without_panic_exits() {
    run_child("panics")
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "quiet action: didn't panic as expected",
        ));
}

#[test]
fn passing_assertion_leaves_process_alone() {
    run_child("pass").success();
}
