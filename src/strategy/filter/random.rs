use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    filter::TreeFilter,
    group::{Block, Group},
};

/// Shuffles the children of every group independently.
///
/// The order is derived from a seed, so a run can be repeated in the same
/// order. No node is added or removed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RandomOrder {
    seed: u64,
}

impl RandomOrder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Pick a fresh seed.
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().r#gen();
        tracing::info!(seed, "randomizing test order");
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

fn shuffle(group: &Group, rng: &mut StdRng) -> Group {
    let mut children: Vec<Block> = group
        .children
        .iter()
        .map(|child| match child {
            Block::Group(inner) => Block::Group(shuffle(inner, rng)),
            Block::Test(test) => Block::Test(test.clone()),
        })
        .collect();
    children.shuffle(rng);
    group.with_children(children)
}

impl TreeFilter for RandomOrder {
    fn filter(&self, root: &Group) -> Group {
        tracing::debug!(seed = self.seed, "shuffling test tree");
        let mut rng = StdRng::seed_from_u64(self.seed);
        shuffle(root, &mut rng)
    }
}
