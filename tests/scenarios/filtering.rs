use kispec::{RunOptions, group::Options, test_file};
use pretty_assertions::assert_eq;

use crate::lib::{Journal, run_file, run_files};

#[test]
fn focused_test_hides_its_failing_sibling() {
    let journal = Journal::default();
    let file = {
        let journal = journal.clone();
        test_file("focus.rs", move |s| {
            let j = journal.clone();
            s.describe("math", move |s| {
                let t = j.clone();
                s.it("passes", move |_| t.push("unfocused ran"));
                s.it_only("fails", |ctx| ctx.fail("boom"));
            });
        })
    };

    let outcome = run_file(file);
    let report = outcome.report();
    assert!(report.failed);
    assert!(journal.entries().is_empty());
    assert_eq!(outcome.events, ["begin math", "fail math → fails", "done"]);
    assert_eq!(report.summary.passed, 0);
    assert_eq!(report.summary.failed, 1);
}

#[test]
fn unknown_tag_runs_nothing() {
    let outcome = run_files(
        [test_file("tags.rs", |s| {
            s.describe("math", |s| {
                s.it("adds", |ctx| ctx.fail("should not run"));
            });
        })],
        &RunOptions::new().with_tags(["slow"]),
    );

    let report = outcome.report();
    assert!(!report.failed);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(outcome.events, ["done"]);
    assert_eq!(outcome.output, "0 tests passed, 0 tests failed.\n");
}

#[test]
fn tags_keep_tagged_nodes_and_their_ancestors() {
    let outcome = run_files(
        [test_file("tags.rs", |s| {
            s.describe("api", |s| {
                s.it_with("lists users", Options::new().tag("slow"), |_| ());
                s.it("pings", |_| ());
                s.describe_with("admin", Options::new().tag("slow"), |s| {
                    s.it("deletes users", |_| ());
                });
            });
            s.describe("util", |s| s.it("formats", |_| ()));
        })],
        &RunOptions::new().with_tags(["slow"]),
    );

    assert_eq!(
        outcome.events,
        [
            "begin api",
            "pass api → lists users",
            "begin admin",
            "pass api → admin → deletes users",
            "done"
        ]
    );
}

fn numbered_file() -> impl kispec::TestFile {
    test_file("many.rs", |s| {
        for group in 0..3 {
            s.describe(format!("group {group}"), move |s| {
                for test in 0..4 {
                    s.it(format!("test {group}.{test}"), |_| ());
                }
            });
        }
    })
}

#[test]
fn seeded_shuffle_is_reproducible() {
    let options = RunOptions::new().with_randomize(true).with_seed(1234);
    let first = run_files([numbered_file()], &options);
    let second = run_files([numbered_file()], &options);

    assert_eq!(first.report().seed, Some(1234));
    assert_eq!(first.events, second.events);

    let mut shuffled = first.events.clone();
    let unshuffled = run_file(numbered_file()).events;
    assert_eq!(shuffled.len(), unshuffled.len());
    shuffled.sort();
    let mut sorted = unshuffled;
    sorted.sort();
    assert_eq!(shuffled, sorted);
}

#[test]
fn unseeded_shuffle_reports_the_seed_it_picked() {
    let randomized = run_files(
        [numbered_file()],
        &RunOptions::new().with_randomize(true),
    );
    let seed = randomized.report().seed.expect("a shuffled run reports its seed");

    let replay = run_files(
        [numbered_file()],
        &RunOptions::new().with_randomize(true).with_seed(seed),
    );
    assert_eq!(randomized.events, replay.events);
    assert_eq!(run_file(numbered_file()).report().seed, None);
}

#[test]
fn skipped_group_stays_skipped_under_focus_and_tags() {
    let outcome = run_files(
        [test_file("skip.rs", |s| {
            s.describe_skip("off", |s| {
                s.it_with("focused", Options::new().focus().tag("slow"), |ctx| {
                    ctx.fail("ran")
                });
                s.it("plain", |ctx| ctx.fail("ran"));
            });
        })],
        &RunOptions::new().with_tags(["slow"]),
    );

    assert!(!outcome.report().failed);
    assert_eq!(outcome.events, ["skip-describe off", "done"]);
}
