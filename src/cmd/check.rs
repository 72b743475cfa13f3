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
use std::path::Path;

use crate::config::Config;
use crate::error::Fallible;

pub fn check_config(path: Option<&Path>) -> Fallible<()> {
    let config = Config::load(path)?;
    print!("{}", settings_report(&config));
    Ok(())
}

fn settings_report(config: &Config) -> String {
    let policy = &config.policy;
    let seed = match policy.seed {
        Some(seed) => seed.to_string(),
        None => "(random)".to_string(),
    };
    format!(
        "api_url = {}\n\
         token = {}\n\
         port = {}\n\
         open_browser = {}\n\
         policy.max_reviews = {}\n\
         policy.reinforce_chance = {}\n\
         policy.shuffle_ties = {}\n\
         policy.seed = {seed}\n",
        config.api_url,
        config.redacted_token(),
        config.port,
        config.open_browser,
        policy.max_reviews,
        policy.reinforce_chance,
        policy.shuffle_ties,
    )
}
