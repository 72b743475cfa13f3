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

use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// The randomness a study session consumes.
pub trait RandomSource {
    /// Uniformly permute `items` in place.
    fn shuffle<T>(&mut self, items: &mut [T]);

    /// Return true with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
}

/// The default random source: a ChaCha generator, optionally seeded.
pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for Dice {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    fn chance(&mut self, probability: f64) -> bool {
        if probability >= 1.0 {
            true
        } else if probability > 0.0 {
            self.rng.random_bool(probability)
        } else {
            false
        }
    }
}
