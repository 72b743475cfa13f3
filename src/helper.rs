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

//! An in-process stand-in for the flashcard backend, for tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::time::Instant;
use tokio::time::sleep;

use crate::error::Fallible;
use crate::types::card::CardId;
use crate::types::rating::Rating;

pub const TEST_TOKEN: &str = "test-token";

/// Set 1 has three due cards, set 2 has none, any other set is missing.
pub const SET_WITH_CARDS: i64 = 1;
pub const EMPTY_SET: i64 = 2;

const SESSION_ID: i64 = 17;

#[derive(Default)]
struct Recorded {
    reviews: Vec<(CardId, Rating)>,
    started: Vec<i64>,
    ended: Vec<(i64, Value)>,
    /// When set, every due-cards request fails with a server error.
    due_cards_down: bool,
}

#[derive(Clone)]
struct BackendState {
    recorded: Arc<Mutex<Recorded>>,
}

pub struct FakeBackend {
    port: u16,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeBackend {
    pub async fn start() -> Fallible<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = BackendState {
            recorded: recorded.clone(),
        };
        let app = Router::new()
            .route("/flashcard-sets/{set_id}/due-cards", get(due_cards))
            .route("/flashcard-sets/{set_id}/study-session", post(start_session))
            .route("/study-session/{session_id}", patch(end_session))
            .route("/card-review", post(record_review))
            .with_state(state);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log::error!("fake backend stopped: {e}");
            }
        });
        Ok(Self { port, recorded })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn reviews(&self) -> Vec<(CardId, Rating)> {
        self.recorded.lock().unwrap().reviews.clone()
    }

    pub fn started_sessions(&self) -> Vec<i64> {
        self.recorded.lock().unwrap().started.clone()
    }

    pub fn ended_sessions(&self) -> Vec<(i64, Value)> {
        self.recorded.lock().unwrap().ended.clone()
    }

    /// Poll until `n` reviews have arrived, or two seconds pass.
    pub async fn wait_for_reviews(&self, n: usize) -> Vec<(CardId, Rating)> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let reviews = self.reviews();
            if reviews.len() >= n || Instant::now() > deadline {
                return reviews;
            }
            sleep(Duration::from_millis(5)).await;
        }
    }

    pub fn set_due_cards_down(&self, down: bool) {
        self.recorded.lock().unwrap().due_cards_down = down;
    }

    /// Poll until `n` session ends have arrived, or two seconds pass.
    pub async fn wait_for_ended_sessions(&self, n: usize) -> Vec<(i64, Value)> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let ended = self.ended_sessions();
            if ended.len() >= n || Instant::now() > deadline {
                return ended;
            }
            sleep(Duration::from_millis(5)).await;
        }
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TEST_TOKEN}");
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected)
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn unauthorized() -> Response {
    error(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

async fn due_cards(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Path(set_id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.recorded.lock().unwrap().due_cards_down {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    match set_id {
        SET_WITH_CARDS => Json(json!([
            { "id": 1, "front": "你好", "back": "hello", "set_id": 1 },
            { "id": 2, "front": "谢谢", "back": "thank you", "set_id": 1 },
            { "id": 3, "front": "再见", "back": "goodbye", "set_id": 1, "image_url": "http://img/3.png" },
        ]))
        .into_response(),
        EMPTY_SET => Json(json!([])).into_response(),
        _ => error(StatusCode::NOT_FOUND, "Flashcard set not found"),
    }
}

async fn start_session(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Path(set_id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.recorded.lock().unwrap().started.push(set_id);
    Json(json!({ "id": SESSION_ID, "set_id": set_id })).into_response()
}

async fn end_session(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Path(session_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.recorded.lock().unwrap().ended.push((session_id, body));
    Json(json!({ "id": session_id })).into_response()
}

#[derive(Deserialize)]
struct ReviewBody {
    flashcard_id: CardId,
    response_quality: Rating,
}

async fn record_review(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state
        .recorded
        .lock()
        .unwrap()
        .reviews
        .push((body.flashcard_id, body.response_quality));
    Json(json!({ "flashcard_id": body.flashcard_id })).into_response()
}
