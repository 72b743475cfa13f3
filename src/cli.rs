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
use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_config;
use crate::cmd::due::print_due_cards;
use crate::config::Config;
use crate::drill::server::start_server;
use crate::error::Fallible;
use crate::types::card::SetId;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Study the due cards of a flashcard set.
    Study {
        /// ID of the flashcard set.
        set_id: i64,
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Port for the drill server, overriding the configuration.
        #[arg(long)]
        port: Option<u16>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// List the cards due in a flashcard set.
    Due {
        /// ID of the flashcard set.
        set_id: i64,
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check the configuration and print the effective settings.
    Check {
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Study {
            set_id,
            config,
            port,
            no_open,
        } => {
            let mut config = Config::load(config.as_deref())?;
            if let Some(port) = port {
                config.port = port;
            }
            if no_open {
                config.open_browser = false;
            }
            start_server(config, SetId::new(set_id)).await
        }
        Command::Due { set_id, config } => {
            let config = Config::load(config.as_deref())?;
            print_due_cards(&config, SetId::new(set_id)).await
        }
        Command::Check { config } => check_config(config.as_deref()),
    }
}
