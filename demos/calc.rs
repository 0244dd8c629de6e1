use std::{
    process::{ExitCode, Termination},
    time::Duration,
};

use kispec::{
    RunOptions,
    event::Dispatcher,
    formatter::{install, pretty::PrettyFormatter},
    group::Options,
    test_file,
};

fn main() -> ExitCode {
    let calc = test_file("calc", |s| {
        s.describe("calc", |s| {
            s.before_each(|ctx| ctx.times_out_after(Duration::from_millis(200)));

            s.it("adds", |ctx| {
                ctx.expect(1 + 1).to_be(2);
            });
            s.it_with("divides", Options::new().tag("slow"), |ctx| {
                ctx.expect(7 / 2).to_be(3);
            });
            s.it_async("fetches", |ctx| async move {
                ctx.expect(vec![1, 2, 3]).to_have_length(3);
            });
            s.it_pending("handles overflow");
        });
    });

    let mut dispatcher = Dispatcher::new();
    install(PrettyFormatter::new(), &mut dispatcher);

    let options = RunOptions::new().with_randomize(std::env::args().any(|arg| arg == "--shuffle"));
    match kispec::run([calc], &options, &mut dispatcher) {
        Ok(report) => report.report(),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
