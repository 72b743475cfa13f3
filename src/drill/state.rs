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

use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::api::StudySessionId;
use crate::api::client::ApiClient;
use crate::api::reporter::ReviewReporter;
use crate::session::Session;
use crate::types::card::SetId;
use crate::types::timestamp::Timestamp;

#[derive(Clone)]
pub struct ServerState {
    pub set_id: SetId,
    pub client: Arc<ApiClient>,
    pub reporter: ReviewReporter,
    pub mutable: Arc<Mutex<MutableState>>,
    pub shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

pub struct MutableState {
    pub session: Session,
    /// The backend's record of this session, if it could be opened.
    pub backend_session: Option<StudySessionId>,
    /// Set once the session completes or the learner exits it.
    pub finished_at: Option<Timestamp>,
    /// A blocking error, shown in place of the session.
    pub error: Option<String>,
}

impl MutableState {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Mark the session as finished and close the backend's record of it.
    /// Does nothing if it is already finished.
    pub fn finish(&mut self, reporter: &ReviewReporter) {
        if self.finished_at.is_some() {
            return;
        }
        let ended_at = Timestamp::now();
        self.finished_at = Some(ended_at);
        let summary = self.session.summary(ended_at);
        log::debug!(
            "Session finished: {} reviews of {} cards.",
            summary.reviews,
            summary.cards_in_session
        );
        if let Some(session_id) = self.backend_session {
            reporter.report_session_ended(session_id, summary);
        }
    }
}
