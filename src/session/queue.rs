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

use std::cmp::Reverse;

use crate::session::random::RandomSource;
use crate::types::card::Card;
use crate::types::card::CardId;

/// A due card together with the counters the session keeps for it.
#[derive(Clone, Debug)]
pub struct QueueEntry {
    pub card: Card,
    /// Accumulated rating deltas. Higher means the learner struggles more.
    pub struggle_score: i32,
    /// Number of times the card was rated this session.
    pub review_count: u32,
}

impl QueueEntry {
    pub fn new(card: Card) -> Self {
        Self {
            card,
            struggle_score: 0,
            review_count: 0,
        }
    }
}

/// The ordered ids of cards still to be presented. An id appears at most
/// once.
#[derive(Default, Debug)]
pub struct WorkingQueue {
    ids: Vec<CardId>,
}

impl WorkingQueue {
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn head(&self) -> Option<CardId> {
        self.ids.first().copied()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.ids.contains(&id)
    }

    #[cfg(test)]
    pub fn ids(&self) -> &[CardId] {
        &self.ids
    }

    /// Append `id` to the back. Returns false, leaving the queue unchanged,
    /// if the id is already queued.
    pub fn push(&mut self, id: CardId) -> bool {
        if self.contains(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Remove `id`. Returns false if it was not queued.
    pub fn remove(&mut self, id: CardId) -> bool {
        match self.ids.iter().position(|queued| *queued == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Sort by score, highest first. Equal-score runs keep their relative
    /// order unless `shuffle_ties` is set, in which case each run is
    /// shuffled.
    pub fn reorder<F, R>(&mut self, score: F, shuffle_ties: bool, random: &mut R)
    where
        F: Fn(CardId) -> i32,
        R: RandomSource,
    {
        self.ids.sort_by_key(|id| Reverse(score(*id)));
        if shuffle_ties {
            for run in self.ids.chunk_by_mut(|a, b| score(*a) == score(*b)) {
                random.shuffle(run);
            }
        }
    }
}
