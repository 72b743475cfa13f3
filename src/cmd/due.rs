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
use std::fmt::Write;

use crate::api::CardSource;
use crate::api::client::ApiClient;
use crate::config::Config;
use crate::error::Fallible;
use crate::types::card::SetId;

pub async fn print_due_cards(config: &Config, set_id: SetId) -> Fallible<()> {
    let client = ApiClient::from_config(config)?;
    print!("{}", due_report(&client, set_id).await?);
    Ok(())
}

async fn due_report(source: &impl CardSource, set_id: SetId) -> Fallible<String> {
    let cards = source.fetch_due_cards(set_id).await?;
    let mut report = String::new();
    if cards.is_empty() {
        writeln!(report, "No cards due in set {set_id}.")?;
        return Ok(report);
    }
    writeln!(report, "{} cards due in set {set_id}:", cards.len())?;
    for card in &cards {
        let front = card.front().lines().next().unwrap_or_default();
        writeln!(report, "  [{}] {front}", card.id())?;
    }
    Ok(report)
}
