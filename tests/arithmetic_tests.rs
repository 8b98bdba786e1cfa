use std::io;

use trica::driver::{self, RunOptions};
use trica::memory::Value;

fn stdout_of(source: &str) -> String {
    let interp = driver::run_source(source, Vec::new(), Box::new(io::empty()), RunOptions::default())
        .expect("Execution failed");
    String::from_utf8(interp.into_writer()).unwrap()
}

#[test]
fn test_number_formatting_in_output() {
    let source = r#"
Print "int: " + (2 + 3) + "\n"
Print "neg: " + -4 + "\n"
Print "frac: " + 7 / 2 + "\n"
Print 0.1 + 0.2
"#;

    let output = stdout_of(source);

    assert_eq!(output, "int: 5\nneg: -4\nfrac: 3.5\n0.30000000000000004");
}

#[test]
fn test_precedence_and_grouping() {
    let source = "a = 2 + 3 * 4\nb = (2 + 3) * 4\nc = 20 / 4 / 5\nd = 1 - -1\n";
    let interp = driver::run_source(source, Vec::new(), Box::new(io::empty()), RunOptions::default())
        .expect("Execution failed");

    let env = interp.environment();
    assert_eq!(env.get("a"), Some(&Value::Number(14.0)));
    assert_eq!(env.get("b"), Some(&Value::Number(20.0)));
    assert_eq!(env.get("c"), Some(&Value::Number(1.0)));
    assert_eq!(env.get("d"), Some(&Value::Number(2.0)));
}

#[test]
fn test_comparisons_yield_booleans() {
    let interp = driver::run_source(
        "ok = 3 > 2\nsame = \"b\" <= \"a\"\n",
        Vec::new(),
        Box::new(io::empty()),
        RunOptions::default(),
    )
    .expect("Execution failed");
    assert_eq!(interp.environment().get("ok"), Some(&Value::Boolean(true)));
    assert_eq!(interp.environment().get("same"), Some(&Value::Boolean(false)));
}

#[test]
fn test_division_by_zero_keeps_earlier_history() {
    let mut interp = driver::prepare(
        "Print \"before\"\nx = 1 / 0\nPrint \"after\"\n",
        Vec::new(),
        Box::new(io::empty()),
        RunOptions::default(),
    )
    .expect("Preparation failed");

    let err = interp.run().unwrap_err();
    assert!(err.to_string().contains("Division by zero at line 2"));

    // Initial snapshot plus the first print
    assert_eq!(interp.total_snapshots(), 2);
    assert_eq!(interp.transcript().text(), "before");
    assert!(!interp.is_finished());
}
