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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::api::CardSource;
use crate::drill::server::start_backend_session;
use crate::drill::state::ServerState;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::rating::Rating;

#[derive(Debug, Deserialize)]
enum Action {
    Flip,
    Again,
    Hard,
    Good,
    Easy,
    Restart,
    Exit,
    Shutdown,
}

impl Action {
    fn rating(&self) -> Option<Rating> {
        match self {
            Action::Again => Some(Rating::Again),
            Action::Hard => Some(Rating::Hard),
            Action::Good => Some(Rating::Good),
            Action::Easy => Some(Rating::Easy),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    let result = match form.action {
        Action::Restart => restart(&state).await,
        action => apply(&state, action),
    };
    if let Err(e) = result {
        log::error!("{e}");
    }
    Redirect::to("/")
}

/// Handle every action that does not talk to the backend.
fn apply(state: &ServerState, action: Action) -> Fallible<()> {
    if let Action::Shutdown = action {
        log::debug!("Shutting down.");
        if let Some(tx) = state.shutdown_tx.lock().unwrap().take() {
            let _ = tx.send(());
        }
        return Ok(());
    }

    let mut mutable = state.mutable.lock().unwrap();
    if mutable.error.is_some() {
        return fail("there is no session to act on.");
    }
    if mutable.is_finished() {
        return fail("the session has ended.");
    }
    match action {
        Action::Flip => {
            mutable.session.flip();
        }
        Action::Exit => {
            log::debug!("Session exited early.");
            mutable.finish(&state.reporter);
        }
        _ => {
            if let Some(rating) = action.rating() {
                let outcome = mutable.session.submit_review(rating)?;
                if outcome.complete {
                    mutable.finish(&state.reporter);
                }
            }
        }
    }
    Ok(())
}

/// Fetch the due cards again and start a fresh session. If the fetch fails
/// the error is shown and no session is started.
async fn restart(state: &ServerState) -> Fallible<()> {
    let fetched = state.client.fetch_due_cards(state.set_id).await;
    let backend_session = match &fetched {
        Ok(cards) if !cards.is_empty() => start_backend_session(&state.client, state.set_id).await,
        _ => None,
    };
    let mut mutable = state.mutable.lock().unwrap();
    if mutable.error.is_none() {
        mutable.finish(&state.reporter);
    }
    match fetched {
        Ok(cards) => {
            mutable.session.restart(cards);
            mutable.backend_session = backend_session;
            mutable.finished_at = None;
            mutable.error = None;
            Ok(())
        }
        Err(e) => {
            mutable.error = Some(e.to_string());
            Err(e)
        }
    }
}
