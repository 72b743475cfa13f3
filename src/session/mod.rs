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

//! The adaptive study session.
//!
//! A session starts from the set's due cards in random order. Every rating
//! moves the rated card's struggle score, takes the card out of the queue,
//! and possibly puts it back: `Again` and `Hard` always return, `Good`
//! returns by chance, `Easy` never does. A card rated `max_reviews` times is
//! retired whatever the rating. The queue is then sorted so the card the
//! learner struggles with most comes next. The session is complete when the
//! queue is empty.

pub mod policy;
pub mod queue;
pub mod random;
pub mod summary;

use std::collections::HashMap;
use std::collections::HashSet;

use crate::api::reporter::ReviewReporter;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::policy::Policy;
use crate::session::queue::QueueEntry;
use crate::session::queue::WorkingQueue;
use crate::session::random::Dice;
use crate::session::random::RandomSource;
use crate::session::summary::SessionSummary;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

pub struct Session<R: RandomSource = Dice> {
    policy: Policy,
    random: R,
    reporter: ReviewReporter,
    /// Number of distinct cards the session started with.
    initial_count: usize,
    /// Every card of the session, retired ones included.
    entries: HashMap<CardId, QueueEntry>,
    queue: WorkingQueue,
    /// Whether the current card's answer is showing.
    flipped: bool,
    started_at: Timestamp,
    rating_counts: HashMap<Rating, usize>,
}

/// What happened to the card a rating was submitted for.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ReviewOutcome {
    pub card_id: CardId,
    pub rating: Rating,
    pub struggle_score: i32,
    pub review_count: u32,
    pub requeued: bool,
    pub complete: bool,
}

impl<R: RandomSource> Session<R> {
    pub fn new(cards: Vec<Card>, policy: Policy, random: R, reporter: ReviewReporter) -> Self {
        let mut session = Self {
            policy,
            random,
            reporter,
            initial_count: 0,
            entries: HashMap::new(),
            queue: WorkingQueue::new(),
            flipped: false,
            started_at: Timestamp::now(),
            rating_counts: HashMap::new(),
        };
        session.initialize(cards);
        session
    }

    /// Discard all session state and start over with `cards`.
    pub fn restart(&mut self, cards: Vec<Card>) {
        log::debug!("Restarting session.");
        self.initialize(cards);
    }

    fn initialize(&mut self, cards: Vec<Card>) {
        let mut seen: HashSet<CardId> = HashSet::new();
        let mut cards: Vec<Card> = cards
            .into_iter()
            .filter(|card| {
                let fresh = seen.insert(card.id());
                if !fresh {
                    log::warn!("Ignoring duplicate due card {}.", card.id());
                }
                fresh
            })
            .collect();
        self.random.shuffle(&mut cards);

        self.entries.clear();
        self.queue = WorkingQueue::new();
        for card in cards {
            self.queue.push(card.id());
            self.entries.insert(card.id(), QueueEntry::new(card));
        }
        self.initial_count = self.queue.len();
        self.flipped = false;
        self.started_at = Timestamp::now();
        self.rating_counts.clear();
        if self.queue.is_empty() {
            log::debug!("No due cards; session complete.");
        } else {
            log::debug!("Session started with {} cards.", self.initial_count);
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.queue
            .head()
            .and_then(|id| self.entries.get(&id))
            .map(|entry| &entry.card)
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    pub fn cards_left(&self) -> usize {
        self.queue.len()
    }

    /// The queued card ids, next card first.
    #[cfg(test)]
    pub fn queue(&self) -> &[CardId] {
        self.queue.ids()
    }

    #[cfg(test)]
    pub fn struggle_score(&self, id: CardId) -> Option<i32> {
        self.entries.get(&id).map(|entry| entry.struggle_score)
    }

    #[cfg(test)]
    pub fn review_count(&self, id: CardId) -> Option<u32> {
        self.entries.get(&id).map(|entry| entry.review_count)
    }

    /// Number of ratings submitted so far.
    pub fn reviews(&self) -> usize {
        self.rating_counts.values().sum()
    }

    /// Fraction of the starting cards that have been retired, in `[0, 1]`.
    /// An empty session counts as done.
    pub fn progress(&self) -> f64 {
        if self.initial_count == 0 {
            1.0
        } else {
            let retired = self.initial_count.saturating_sub(self.queue.len());
            retired as f64 / self.initial_count as f64
        }
    }

    /// Show the answer of the current card. Returns false if there was
    /// nothing to flip.
    pub fn flip(&mut self) -> bool {
        if self.is_complete() {
            log::error!("Flipping a card in a completed session.");
            false
        } else if self.flipped {
            log::error!("Flipping a card that is already flipped.");
            false
        } else {
            self.flipped = true;
            true
        }
    }

    /// Rate the current card and advance the session.
    pub fn submit_review(&mut self, rating: Rating) -> Fallible<ReviewOutcome> {
        let Some(card_id) = self.queue.head() else {
            return fail("there is no card to review: the session is complete.");
        };
        if !self.flipped {
            return fail("the card must be flipped before it is rated.");
        }

        self.reporter.report_review(card_id, rating);

        let entry = self
            .entries
            .get_mut(&card_id)
            .ok_or_else(|| ErrorReport::new(format!("card {card_id} is queued but unknown.")))?;
        entry.review_count += 1;
        entry.struggle_score += rating.delta();
        let struggle_score = entry.struggle_score;
        let review_count = entry.review_count;
        *self.rating_counts.entry(rating).or_insert(0) += 1;

        self.queue.remove(card_id);
        let requeued = review_count < self.policy.max_reviews
            && match rating {
                Rating::Again | Rating::Hard => true,
                Rating::Good => self.random.chance(self.policy.reinforce_chance),
                Rating::Easy => false,
            };
        if requeued {
            self.queue.push(card_id);
        }

        let entries = &self.entries;
        self.queue.reorder(
            |id| entries.get(&id).map_or(0, |entry| entry.struggle_score),
            self.policy.shuffle_ties,
            &mut self.random,
        );
        self.flipped = false;

        let complete = self.queue.is_empty();
        log::debug!(
            "{card_id} {rating} score={struggle_score} reviews={review_count} requeued={requeued} left={}",
            self.queue.len()
        );
        if complete {
            log::debug!("Session completed after {} reviews.", self.reviews());
        }
        Ok(ReviewOutcome {
            card_id,
            rating,
            struggle_score,
            review_count,
            requeued,
            complete,
        })
    }

    pub fn summary(&self, ended_at: Timestamp) -> SessionSummary {
        let count = |rating: Rating| self.rating_counts.get(&rating).copied().unwrap_or(0);
        SessionSummary {
            cards_in_session: self.initial_count(),
            reviews: self.reviews(),
            again: count(Rating::Again),
            hard: count(Rating::Hard),
            good: count(Rating::Good),
            easy: count(Rating::Easy),
            started_at: self.started_at,
            ended_at,
        }
    }
}
