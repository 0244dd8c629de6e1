use kispec::test_file;
use pretty_assertions::assert_eq;

use crate::lib::{Journal, run_file};

#[test]
fn hooks_wrap_every_test_in_declaration_order() {
    let journal = Journal::default();
    let file = {
        let journal = journal.clone();
        test_file("hooks.rs", move |s| {
            let j = journal.clone();
            s.describe("outer", move |s| {
                let (b, a) = (j.clone(), j.clone());
                s.before_each(move |_| b.push("before outer"));
                s.after_each(move |_| a.push("after outer"));

                let t = j.clone();
                s.it("first", move |ctx| t.push(format!("body {}", ctx.test_name())));

                let j = j.clone();
                s.describe("inner", move |s| {
                    let (b, a, t) = (j.clone(), j.clone(), j.clone());
                    s.before_each(move |_| b.push("before inner"));
                    s.after_each(move |_| a.push("after inner"));
                    s.it("second", move |ctx| t.push(format!("body {}", ctx.test_name())));
                });
            });
        })
    };

    let outcome = run_file(file);
    assert!(!outcome.report().failed);
    assert_eq!(
        journal.entries(),
        [
            "before outer",
            "body first",
            "after outer",
            "before outer",
            "before inner",
            "body second",
            "after outer",
            "after inner",
        ]
    );
}

#[test]
fn failing_body_runs_no_after_hooks() {
    let journal = Journal::default();
    let file = {
        let journal = journal.clone();
        test_file("hooks.rs", move |s| {
            let j = journal.clone();
            s.describe("db", move |s| {
                let a = j.clone();
                s.after_each(move |_| a.push("cleanup"));
                s.it("connects", |_| -> Result<(), String> {
                    Err(String::from("refused"))
                });
                s.it("queries", |_| ());
            });
        })
    };

    let outcome = run_file(file);
    let report = outcome.report();
    assert!(report.failed);
    assert_eq!(journal.entries(), ["cleanup"]);
    assert_eq!(
        outcome.events,
        ["begin db", "fail db → connects", "pass db → queries", "done"]
    );

    let failed = report.tree.tests().next().unwrap();
    assert_eq!(failed.errors.len(), 1);
    assert_eq!(
        failed.errors[0].to_string(),
        "test body returned an error: \"refused\""
    );
}

#[test]
fn hooks_outside_any_group_fail_the_build() {
    let outcome = run_file(test_file("hooks.rs", |s| {
        s.before_each(|_| ());
        s.describe("never", |s| s.it("runs", |_| ()));
    }));

    let err = outcome.result.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(matches!(err, kispec::RunError::Build { .. }));
    assert!(outcome.events.is_empty());
}
