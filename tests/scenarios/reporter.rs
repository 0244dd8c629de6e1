use kispec::test_file;
use pretty_assertions::assert_eq;

use crate::lib::{run_file, sanitize_locations};

#[test]
fn reporter_lists_failures_after_the_tree() {
    let outcome = run_file(test_file("reporter.rs", |s| {
        s.describe("parser", |s| {
            s.it("reads numbers", |ctx| {
                ctx.expect("42".parse::<u32>().ok()).to_be_defined();
            });
            s.describe("errors", |s| {
                s.it("rejects garbage", |_| -> () { panic!("unexpected token") });
                s.it("has a position", |ctx| {
                    ctx.expect(vec![1, 2]).to_have_length(3);
                });
                s.it_pending("recovers");
            });
        });
        s.describe_pending("printer");
    }));

    assert!(outcome.report().failed);

    let expected = "\
parser
  ✓ reads numbers
  errors
    ✗ rejects garbage
    ✗ has a position
    - recovers
- printer

Failures:

parser → errors → rejects garbage
test body panicked: unexpected token (at reporter.rs)

parser → errors → has a position
Expected value to have length 3 but it was 2

1 tests passed, 2 tests failed.
";
    assert_eq!(sanitize_locations(&outcome.output), expected);
}
