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

use std::fmt::Display;
use std::fmt::Formatter;

use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde::Deserialize;
use serde::Serialize;

use crate::markdown::markdown_to_html;

/// The backend's identifier for a flashcard.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(i64);

impl CardId {
    #[cfg(test)]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The backend's identifier for a flashcard set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(i64);

impl SetId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl Display for SetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A flashcard as served by the backend. Read-only to the study session.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    front: String,
    back: String,
    /// URL of an image attached to the card, if any.
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl Card {
    #[cfg(test)]
    pub fn new(id: CardId, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            image: None,
        }
    }

    #[cfg(test)]
    pub fn with_image(self, image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..self
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn html_front(&self) -> Markup {
        let front = if self.front().trim().is_empty() {
            "No front content available"
        } else {
            self.front()
        };
        html! {
            (PreEscaped(markdown_to_html(front)))
            @if let Some(image) = self.image() {
                img.card-image src=(image) alt="";
            }
        }
    }

    pub fn html_back(&self) -> Markup {
        let back = if self.back().trim().is_empty() {
            "No back content available"
        } else {
            self.back()
        };
        html! {
            (PreEscaped(markdown_to_html(back)))
        }
    }
}
