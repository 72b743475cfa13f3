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

use std::time::Duration;

use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::Response;
use serde::Deserialize;
use serde::Serialize;

use crate::api::CardSource;
use crate::api::ReviewSink;
use crate::api::StudySessionId;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::summary::SessionSummary;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::card::SetId;
use crate::types::rating::Rating;

const TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the flashcard backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct ReviewBody {
    flashcard_id: CardId,
    response_quality: Rating,
}

#[derive(Deserialize)]
struct StudySessionBody {
    id: StudySessionId,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Fallible<Self> {
        let http = Client::builder().timeout(TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Fallible<Self> {
        Self::new(&config.api_url, config.token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turn a non-2xx response into an error carrying the backend's `detail`
/// message, when it sent one.
async fn check(response: Response, context: &str) -> Fallible<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => fail(format!("{context} ({status}): {}", body.detail)),
        Err(_) => fail(format!("{context} ({status}).")),
    }
}

impl CardSource for ApiClient {
    async fn fetch_due_cards(&self, set_id: SetId) -> Fallible<Vec<Card>> {
        let url = self.url(&format!("flashcard-sets/{set_id}/due-cards"));
        log::debug!("GET {url}");
        let response = self.authorize(self.http.get(&url)).send().await?;
        let response = check(response, "failed to fetch cards for review").await?;
        let cards: Vec<Card> = response.json().await?;
        log::debug!("Fetched {} due cards.", cards.len());
        Ok(cards)
    }

    async fn start_study_session(&self, set_id: SetId) -> Fallible<StudySessionId> {
        let url = self.url(&format!("flashcard-sets/{set_id}/study-session"));
        log::debug!("POST {url}");
        let response = self.authorize(self.http.post(&url)).send().await?;
        let response = check(response, "failed to start study session").await?;
        let body: StudySessionBody = response.json().await?;
        Ok(body.id)
    }
}

impl ReviewSink for ApiClient {
    async fn report_review(&self, card_id: CardId, rating: Rating) -> Fallible<()> {
        let url = self.url("card-review");
        let body = ReviewBody {
            flashcard_id: card_id,
            response_quality: rating,
        };
        let response = self.authorize(self.http.post(&url)).json(&body).send().await?;
        check(response, "failed to record review").await?;
        Ok(())
    }

    async fn end_study_session(
        &self,
        session_id: StudySessionId,
        summary: SessionSummary,
    ) -> Fallible<()> {
        let url = self.url(&format!("study-session/{}", session_id.into_inner()));
        log::debug!("PATCH {url}");
        let response = self
            .authorize(self.http.patch(&url))
            .json(&summary)
            .send()
            .await?;
        check(response, "failed to end study session").await?;
        Ok(())
    }
}
