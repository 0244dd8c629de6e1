/// Options for a single run.
///
/// ```
/// use kispec::RunOptions;
///
/// let options = RunOptions::new()
///     .with_tags(["slow"])
///     .with_randomize(true)
///     .with_seed(42);
/// assert_eq!(options.seed, Some(42));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Only run nodes carrying one of these tags. Empty runs everything.
    pub tags: Vec<String>,

    /// Shuffle the children of every group.
    pub randomize: bool,

    /// Seed for the shuffle. A fresh one is drawn when this is `None`.
    pub seed: Option<u64>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags<I, T>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_randomize(self, randomize: bool) -> Self {
        Self { randomize, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }
}
