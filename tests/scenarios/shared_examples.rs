use std::sync::{Arc, Mutex};

use kispec::{RunOptions, TestFile, builder::Suite, test_file};
use pretty_assertions::assert_eq;

use crate::lib::{Journal, run_file, run_files};

#[test]
fn later_registration_replaces_the_earlier_one() {
    let outcome = run_file(test_file("shared.rs", |s| {
        s.shared_examples("a collection", |s| {
            s.it("is old", |_| ());
        });
        s.shared_examples("a collection", |s| {
            s.it("is new", |_| ());
        });
        s.describe("Vec", |s| s.behaves_like("a collection"));
    }));

    assert!(!outcome.report().failed);
    assert_eq!(
        outcome.events,
        [
            "begin Vec",
            "begin a collection",
            "pass Vec → a collection → is new",
            "done"
        ]
    );
}

#[test]
fn registrations_carry_over_to_later_files() {
    let outcome = run_files(
        [
            Box::new(test_file("support.rs", |s: &mut Suite| {
                s.shared_examples("non empty", |s| {
                    s.it("has a first element", |_| ());
                });
            })) as Box<dyn TestFile>,
            Box::new(test_file("list.rs", |s: &mut Suite| {
                s.describe("list", |s| s.behaves_like("non empty"));
            })),
        ],
        &RunOptions::new(),
    );

    assert_eq!(
        outcome.events,
        [
            "begin list",
            "begin non empty",
            "pass list → non empty → has a first element",
            "done"
        ]
    );
}

#[test]
fn context_hook_runs_before_the_shared_hooks() {
    let journal = Journal::default();
    let subject = Arc::new(Mutex::new(Vec::<u32>::new()));

    let file = {
        let journal = journal.clone();
        let subject = Arc::clone(&subject);
        test_file("shared.rs", move |s| {
            let (j, sub) = (journal.clone(), Arc::clone(&subject));
            s.shared_examples("a stack", move |s| {
                let (b, t) = (j.clone(), j.clone());
                let sub = Arc::clone(&sub);
                s.before_each(move |_| b.push("shared before"));
                s.it("holds what was pushed", move |ctx| {
                    t.push("body");
                    ctx.expect(sub.lock().unwrap().len()).to_be(3_usize);
                });
            });

            let (j, sub) = (journal.clone(), Arc::clone(&subject));
            s.describe("Vec", move |s| {
                s.behaves_like_with("a stack", move |_| {
                    j.push("context");
                    *sub.lock().unwrap() = vec![1, 2, 3];
                });
            });
        })
    };

    let outcome = run_file(file);
    assert!(!outcome.report().failed);
    assert_eq!(journal.entries(), ["context", "shared before", "body"]);
}

#[test]
fn unknown_shared_example_stops_the_run() {
    let outcome = run_file(test_file("shared.rs", |s| {
        s.describe("Vec", |s| s.behaves_like("missing"));
    }));

    let err = outcome.result.unwrap_err();
    assert_eq!(err.file(), "shared.rs");
    assert_eq!(
        std::error::Error::source(&err).map(ToString::to_string),
        Some(String::from("shared example `missing` was never registered"))
    );
    assert!(outcome.events.is_empty());
}
