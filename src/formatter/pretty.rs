use std::io;

use colored::Color;

use crate::{
    formatter::{
        TestFormatter,
        common::color::{ColorSetting, Painter, SupportsColor},
    },
    group::{Group, GroupMeta},
    test::Test,
};

/// A test that failed, remembered for the closing failure listing.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Failure {
    path: Vec<String>,
    errors: Vec<String>,
}

/// The default reporter.
///
/// Prints one line per group and test, indented two spaces per ancestor, and
/// closes with every failure and a pass/fail count:
///
/// ```text
/// calc
///   ✓ adds
///   ✗ divides
///
/// Failures:
///
/// calc → divides
/// Expected 1 to be 2
///
/// 1 tests passed, 1 tests failed.
/// ```
#[derive(Debug)]
pub struct PrettyFormatter<W: io::Write> {
    target: W,
    color_setting: ColorSetting,
    passed: usize,
    failures: Vec<Failure>,
}

impl Default for PrettyFormatter<io::Stdout> {
    fn default() -> Self {
        Self {
            target: io::stdout(),
            color_setting: Default::default(),
            passed: 0,
            failures: Vec::new(),
        }
    }
}

impl PrettyFormatter<io::Stdout> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: io::Write> PrettyFormatter<W> {
    pub fn with_target<WithTarget: io::Write>(
        self,
        with_target: WithTarget,
    ) -> PrettyFormatter<WithTarget> {
        PrettyFormatter {
            target: with_target,
            color_setting: self.color_setting,
            passed: self.passed,
            failures: self.failures,
        }
    }

    pub fn with_color_setting(self, color_setting: impl Into<ColorSetting>) -> Self {
        PrettyFormatter {
            color_setting: color_setting.into(),
            ..self
        }
    }

    pub fn target(&self) -> &W {
        &self.target
    }

    pub fn into_target(self) -> W {
        self.target
    }
}

impl<W: io::Write + SupportsColor> PrettyFormatter<W> {
    /// Return whether this formatter will currently emit colored output.
    pub fn use_color(&self) -> bool {
        self.color_setting.use_color(&self.target)
    }

    fn painter(&self) -> Painter {
        Painter::new(self.use_color())
    }
}

fn indent(depth: usize, line: &str) -> String {
    format!("{}{line}", " ".repeat(depth * 2))
}

impl<W: io::Write + SupportsColor> TestFormatter for PrettyFormatter<W> {
    type Error = io::Error;

    fn fmt_describe_start(
        &mut self,
        describe_stack: &[GroupMeta],
        group: &Group,
    ) -> Result<(), Self::Error> {
        writeln!(self.target, "{}", indent(describe_stack.len(), &group.name))
    }

    fn fmt_describe_skipped(
        &mut self,
        describe_stack: &[GroupMeta],
        group: &Group,
    ) -> Result<(), Self::Error> {
        let line = self.painter().dimmed(format!("- {}", group.name));
        writeln!(self.target, "{}", indent(describe_stack.len(), &line))
    }

    fn fmt_test_skipped(&mut self, test: &Test) -> Result<(), Self::Error> {
        let line = self.painter().dimmed(format!("- {}", test.name));
        writeln!(self.target, "{}", indent(test.describe_stack.len(), &line))
    }

    fn fmt_test_finished(&mut self, test: &Test) -> Result<(), Self::Error> {
        let painter = self.painter();
        let mark = match test.failed() {
            true => {
                self.failures.push(Failure {
                    path: test
                        .describe_stack
                        .iter()
                        .map(|group| group.name.to_string())
                        .chain([test.name.to_string()])
                        .collect(),
                    errors: test.errors.iter().map(ToString::to_string).collect(),
                });
                painter.color("✗", Color::Red)
            }
            false => {
                self.passed += 1;
                painter.color("✓", Color::Green)
            }
        };

        let line = format!("{mark} {}", test.name);
        writeln!(self.target, "{}", indent(test.describe_stack.len(), &line))
    }

    fn fmt_run_finished(&mut self) -> Result<(), Self::Error> {
        let painter = self.painter();

        if !self.failures.is_empty() {
            writeln!(self.target)?;
            writeln!(self.target, "Failures:")?;
            writeln!(self.target)?;
            for failure in &self.failures {
                let path: Vec<String> = failure.path.iter().map(|name| painter.bold(name)).collect();
                writeln!(self.target, "{}", path.join(" → "))?;
                for error in &failure.errors {
                    writeln!(self.target, "{error}")?;
                }
                writeln!(self.target)?;
            }
        }

        writeln!(
            self.target,
            "{} tests passed, {} tests failed.",
            painter.color(self.passed, Color::Green),
            painter.color(self.failures.len(), Color::Red),
        )
    }
}
