// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// Default number of ratings after which a card is retired for the session.
pub const DEFAULT_MAX_REVIEWS: u32 = 5;

/// Default probability that a card rated `Good` is shown again.
pub const DEFAULT_REINFORCE_CHANCE: f64 = 0.2;

/// Tunable parameters of the requeueing policy.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// A card rated this many times is never requeued.
    pub max_reviews: u32,
    /// Probability of requeueing a card rated `Good`.
    pub reinforce_chance: f64,
    /// Shuffle cards with equal struggle scores after each reorder. When
    /// false, equal-score cards keep their relative order.
    pub shuffle_ties: bool,
    /// Seed for the session's random source. Unseeded sessions draw from
    /// the OS.
    pub seed: Option<u64>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            max_reviews: DEFAULT_MAX_REVIEWS,
            reinforce_chance: DEFAULT_REINFORCE_CHANCE,
            shuffle_ties: true,
            seed: None,
        }
    }
}

impl Policy {
    pub fn validate(&self) -> Fallible<()> {
        if self.max_reviews == 0 {
            return fail("policy.max_reviews must be at least 1.");
        }
        if !(0.0..=1.0).contains(&self.reinforce_chance) {
            return fail("policy.reinforce_chance must be between 0 and 1.");
        }
        Ok(())
    }
}
