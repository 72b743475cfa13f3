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

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::JoinHandle;

use crate::api::ReviewSink;
use crate::api::StudySessionId;
use crate::session::summary::SessionSummary;
use crate::types::card::CardId;
use crate::types::rating::Rating;

/// A message for the backend, delivered in the background.
#[derive(Debug)]
pub enum Report {
    Review {
        card_id: CardId,
        rating: Rating,
    },
    SessionEnded {
        session_id: StudySessionId,
        summary: SessionSummary,
    },
}

/// Dispatches reports without waiting for them. Delivery failures are
/// logged by the worker and never reach the sender.
#[derive(Clone)]
pub struct ReviewReporter {
    tx: UnboundedSender<Report>,
}

impl ReviewReporter {
    /// A reporter whose reports are read from the returned receiver.
    pub fn channel() -> (Self, UnboundedReceiver<Report>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    /// Start a worker task that delivers reports to `sink` in order. The
    /// task exits once every reporter clone is dropped.
    pub fn spawn<S>(sink: Arc<S>) -> (Self, JoinHandle<()>)
    where
        S: ReviewSink + Send + Sync + 'static,
    {
        let (reporter, rx) = Self::channel();
        let handle = tokio::spawn(deliver(sink, rx));
        (reporter, handle)
    }

    pub fn report_review(&self, card_id: CardId, rating: Rating) {
        self.send(Report::Review { card_id, rating });
    }

    pub fn report_session_ended(&self, session_id: StudySessionId, summary: SessionSummary) {
        self.send(Report::SessionEnded {
            session_id,
            summary,
        });
    }

    fn send(&self, report: Report) {
        if let Err(e) = self.tx.send(report) {
            log::error!("Report dropped, worker is gone: {:?}", e.0);
        }
    }
}

async fn deliver<S>(sink: Arc<S>, mut rx: UnboundedReceiver<Report>)
where
    S: ReviewSink + Send + Sync + 'static,
{
    while let Some(report) = rx.recv().await {
        match report {
            Report::Review { card_id, rating } => {
                if let Err(e) = sink.report_review(card_id, rating).await {
                    log::error!("Failed to submit review for card {card_id}: {e}");
                }
            }
            Report::SessionEnded {
                session_id,
                summary,
            } => {
                if let Err(e) = sink.end_study_session(session_id, summary).await {
                    log::error!("Failed to end study session: {e}");
                }
            }
        }
    }
    log::debug!("Review reporter stopped.");
}
