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

use serde::Serialize;

use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

/// Statistics for one study session, sent to the backend when it ends.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub cards_in_session: usize,
    pub reviews: usize,
    pub again: usize,
    pub hard: usize,
    pub good: usize,
    pub easy: usize,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
}

impl SessionSummary {
    pub fn count(&self, rating: Rating) -> usize {
        match rating {
            Rating::Again => self.again,
            Rating::Hard => self.hard,
            Rating::Good => self.good,
            Rating::Easy => self.easy,
        }
    }

    /// Seconds per review, if any review was made.
    pub fn pace(&self) -> Option<f64> {
        if self.reviews == 0 {
            None
        } else {
            let elapsed = self.ended_at.seconds_since(self.started_at).max(0.0);
            Some(elapsed / self.reviews as f64)
        }
    }
}
