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
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

/// The learner's self-assessed recall of a card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Change applied to a card's struggle score.
    pub fn delta(self) -> i32 {
        match self {
            Rating::Again => 3,
            Rating::Hard => 2,
            Rating::Good => -1,
            Rating::Easy => -2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Again" => Ok(Rating::Again),
            "Hard" => Ok(Rating::Hard),
            "Good" => Ok(Rating::Good),
            "Easy" => Ok(Rating::Easy),
            _ => Err(ErrorReport::new(format!("unrecognized rating: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_table() {
        assert_eq!(Rating::Again.delta(), 3);
        assert_eq!(Rating::Hard.delta(), 2);
        assert_eq!(Rating::Good.delta(), -1);
        assert_eq!(Rating::Easy.delta(), -2);
    }

    #[test]
    fn test_parse() {
        for rating in Rating::ALL {
            assert_eq!(rating.as_str().parse::<Rating>().ok(), Some(rating));
        }
        assert!("Forgot".parse::<Rating>().is_err());
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&Rating::Hard).unwrap(), "\"Hard\"");
    }
}
