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
use std::time::Duration;
use std::time::Instant;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::sleep;
use tokio::time::timeout;

use crate::api::CardSource;
use crate::api::StudySessionId;
use crate::api::client::ApiClient;
use crate::api::reporter::ReviewReporter;
use crate::config::Config;
use crate::drill::get::get_handler;
use crate::drill::post::post_handler;
use crate::drill::state::MutableState;
use crate::drill::state::ServerState;
use crate::error::Fallible;
use crate::session::Session;
use crate::session::random::Dice;
use crate::types::card::SetId;

/// How long to wait for queued reports to reach the backend on shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn start_server(config: Config, set_id: SetId) -> Fallible<()> {
    let client = Arc::new(ApiClient::from_config(&config)?);

    log::debug!("Fetching due cards...");
    let start = Instant::now();
    let cards = client.fetch_due_cards(set_id).await?;
    let duration = start.elapsed().as_millis();
    log::debug!("Due cards fetched in {duration}ms.");
    if cards.is_empty() {
        println!("No cards due in set {set_id}.");
        return Ok(());
    }

    let backend_session = start_backend_session(&client, set_id).await;
    let (reporter, worker) = ReviewReporter::spawn(client.clone());
    let session = Session::new(
        cards,
        config.policy.clone(),
        Dice::from_seed(config.policy.seed),
        reporter.clone(),
    );
    let mutable = Arc::new(Mutex::new(MutableState {
        session,
        backend_session,
        finished_at: None,
        error: None,
    }));
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let state = ServerState {
        set_id,
        client,
        reporter: reporter.clone(),
        mutable: mutable.clone(),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("127.0.0.1:{}", config.port);

    // Start a separate task to open the browser.
    if config.open_browser {
        let bind = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&bind).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let url = format!("http://{bind}/");
            if let Err(e) = open::that(&url) {
                log::warn!("Could not open {url}: {e}");
            }
        });
    }

    // Start the server.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    println!("Studying set {set_id} at http://{bind}/");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    // A session abandoned by shutting down still gets closed on the backend.
    mutable.lock().unwrap().finish(&reporter);
    drop(mutable);
    drop(reporter);
    if timeout(DRAIN_TIMEOUT, worker).await.is_err() {
        log::warn!("Gave up waiting for pending reports.");
    }
    Ok(())
}

/// Open a session record on the backend. A failure only loses the record,
/// so it is logged and studying goes ahead.
pub async fn start_backend_session(client: &ApiClient, set_id: SetId) -> Option<StudySessionId> {
    match client.start_study_session(set_id).await {
        Ok(id) => {
            log::debug!("Backend study session {}.", id.into_inner());
            Some(id)
        }
        Err(e) => {
            log::warn!("Could not record the study session: {e}");
            None
        }
    }
}

async fn shutdown_signal(rx: oneshot::Receiver<()>) {
    tokio::select! {
        _ = rx => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
