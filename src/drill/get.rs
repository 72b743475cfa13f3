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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::drill::state::MutableState;
use crate::drill::state::ServerState;
use crate::drill::template::page_template;
use crate::session::summary::SessionSummary;
use crate::types::card::Card;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mutable = state.mutable.lock().unwrap();
    let body = if let Some(error) = &mutable.error {
        render_error(error)
    } else if mutable.is_finished() || mutable.session.is_complete() {
        let ended_at = mutable.finished_at.unwrap_or_else(Timestamp::now);
        render_completion(
            &mutable.session.summary(ended_at),
            mutable.session.cards_left(),
        )
    } else {
        render_session(&mutable)
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

fn render_session(mutable: &MutableState) -> Markup {
    let session = &mutable.session;
    let Some(card) = session.current_card() else {
        return html! {};
    };
    let percent = (session.progress() * 100.0).round() as u32;
    let progress_style = format!("width: {percent}%;");
    let controls = if session.is_flipped() {
        html! {
            form action="/" method="post" {
                input id="exit" type="submit" name="action" value="Exit" title="End the session early.";
                div.spacer {}
                div.grades {
                    @for rating in Rating::ALL {
                        (rating_button(rating))
                    }
                }
                div.spacer {}
            }
        }
    } else {
        html! {
            form action="/" method="post" {
                input id="exit" type="submit" name="action" value="Exit" title="End the session early.";
                div.spacer {}
                input id="flip" type="submit" name="action" value="Flip" title="Show the answer. Shortcut: space.";
                div.spacer {}
            }
        }
    };
    html! {
        div.root {
            div.header {
                div.progress-bar {
                    div.progress-fill style=(progress_style) {}
                }
                div.cards-left {
                    "Cards left: " (session.cards_left())
                }
            }
            div.card-container {
                div.card {
                    (render_card(card, session.is_flipped()))
                }
            }
            div.controls {
                (controls)
            }
        }
    }
}

fn rating_button(rating: Rating) -> Markup {
    let (id, title) = match rating {
        Rating::Again => ("again", "I did not remember. Shortcut: 1."),
        Rating::Hard => ("hard", "I barely remembered. Shortcut: 2."),
        Rating::Good => ("good", "I remembered. Shortcut: 3."),
        Rating::Easy => ("easy", "I remembered easily. Shortcut: 4."),
    };
    html! {
        input id=(id) type="submit" name="action" value=(rating.as_str()) title=(title);
    }
}

fn render_card(card: &Card, flipped: bool) -> Markup {
    html! {
        div.card-content {
            div.question .rich-text {
                (card.html_front())
            }
            @if flipped {
                div.answer .rich-text {
                    (card.html_back())
                }
            } @else {
                div.answer .rich-text {}
            }
        }
    }
}

/// The end-of-session page. `cards_left` is non-zero when the learner
/// exited early.
fn render_completion(summary: &SessionSummary, cards_left: usize) -> Markup {
    let pace = match summary.pace() {
        Some(pace) => format!("{pace:.2}"),
        None => "-".to_string(),
    };
    html! {
        div.finished {
            @if cards_left == 0 {
                h1 { "Study session complete!" }
                div.summary {
                    "You've reviewed the due cards for this set."
                }
            } @else {
                h1 { "Study session ended early" }
                div.summary {
                    (cards_left) " cards were still in the queue."
                }
            }
            h2 { "Session Stats" }
            div.stats {
                table {
                    tbody {
                        tr {
                            td.key { "Cards in session" }
                            td.val { (summary.cards_in_session) }
                        }
                        tr {
                            td.key { "Reviews" }
                            td.val { (summary.reviews) }
                        }
                        @for rating in Rating::ALL {
                            tr {
                                td.key { (rating.as_str()) }
                                td.val { (summary.count(rating)) }
                            }
                        }
                        tr {
                            td.key { "Pace (s/review)" }
                            td.val { (pace) }
                        }
                    }
                }
            }
            div.finished-controls {
                form action="/" method="post" {
                    input #restart type="submit" name="action" value="Restart" title="Fetch the due cards again and start over.";
                    input #shutdown .shutdown-button type="submit" name="action" value="Shutdown" title="Shut down the server.";
                }
            }
        }
    }
}

fn render_error(error: &str) -> Markup {
    html! {
        div.finished {
            h1 { "Could not start a study session" }
            div.error {
                (error)
            }
            div.finished-controls {
                form action="/" method="post" {
                    input #restart type="submit" name="action" value="Restart" title="Try again.";
                    input #shutdown .shutdown-button type="submit" name="action" value="Shutdown" title="Shut down the server.";
                }
            }
        }
    }
}
