use crate::formatter::TestFormatter;

/// A formatter that produces no output.
///
/// Useful when the caller only cares about the returned
/// [`RunReport`](crate::RunReport).
#[derive(Debug, Default, Clone)]
pub struct NoFormatter;

impl TestFormatter for NoFormatter {
    type Error = ();
}
