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

//! The backend a study session talks to.

pub mod client;
pub mod reporter;

use std::future::Future;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::session::summary::SessionSummary;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::card::SetId;
use crate::types::rating::Rating;

/// The backend's identifier for a recorded study session.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudySessionId(i64);

impl StudySessionId {
    #[cfg(test)]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> i64 {
        self.0
    }
}

/// Supplies the cards a session studies.
pub trait CardSource {
    /// The cards in `set_id` the backend considers due. May be empty.
    fn fetch_due_cards(&self, set_id: SetId) -> impl Future<Output = Fallible<Vec<Card>>> + Send;

    /// Open a study-session record on the backend.
    fn start_study_session(
        &self,
        set_id: SetId,
    ) -> impl Future<Output = Fallible<StudySessionId>> + Send;
}

/// Receives the outcomes of a session.
pub trait ReviewSink {
    fn report_review(
        &self,
        card_id: CardId,
        rating: Rating,
    ) -> impl Future<Output = Fallible<()>> + Send;

    /// Close a study-session record opened with
    /// [`CardSource::start_study_session`].
    fn end_study_session(
        &self,
        session_id: StudySessionId,
        summary: SessionSummary,
    ) -> impl Future<Output = Fallible<()>> + Send;
}
