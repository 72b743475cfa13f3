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

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;
    use tokio::time::timeout;

    use crate::config::Config;
    use crate::drill::server::start_server;
    use crate::error::Fallible;
    use crate::helper::EMPTY_SET;
    use crate::helper::FakeBackend;
    use crate::helper::SET_WITH_CARDS;
    use crate::helper::TEST_TOKEN;
    use crate::session::policy::Policy;
    use crate::types::card::SetId;
    use crate::types::rating::Rating;

    fn test_config(backend: &FakeBackend, port: u16) -> Config {
        Config {
            api_url: backend.url(),
            token: Some(TEST_TOKEN.to_string()),
            port,
            open_browser: false,
            policy: Policy {
                reinforce_chance: 0.0,
                shuffle_ties: false,
                seed: Some(1),
                ..Policy::default()
            },
        }
    }

    async fn act(base: &str, action: &str) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(base)
            .form(&[("action", action)])
            .send()
            .await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        Ok(response.text().await?)
    }

    #[tokio::test]
    async fn test_start_server_on_unknown_set() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let config = test_config(&backend, portpicker::pick_unused_port().unwrap());
        let result = start_server(config, SetId::new(99)).await;
        let err = result.err().unwrap();
        assert!(err.message().contains("Flashcard set not found"));
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_on_empty_set() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let config = test_config(&backend, portpicker::pick_unused_port().unwrap());
        start_server(config, SetId::new(EMPTY_SET)).await?;
        assert!(backend.started_sessions().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let port = portpicker::pick_unused_port().unwrap();
        let config = test_config(&backend, port);
        let server = spawn(async move { start_server(config, SetId::new(SET_WITH_CARDS)).await });
        let bind = format!("127.0.0.1:{port}");
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        let base = format!("http://{bind}/");

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("{base}style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("{base}script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Hit the not found endpoint.
        let response = reqwest::get(format!("{base}herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the root endpoint.
        let response = reqwest::get(&base).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Cards left: 3"));
        assert!(html.contains(r#"value="Flip""#));
        assert!(!html.contains(r#"value="Easy""#));

        // Rating before flipping is refused.
        let html = act(&base, "Easy").await?;
        assert!(html.contains("Cards left: 3"));

        // Flip and rate every card `Easy`.
        for left in (1..=3).rev() {
            let html = act(&base, "Flip").await?;
            assert!(html.contains(&format!("Cards left: {left}")));
            assert!(html.contains(r#"value="Easy""#));
            act(&base, "Easy").await?;
        }
        let html = reqwest::get(&base).await?.text().await?;
        assert!(html.contains("Study session complete!"));

        let reviews = backend.wait_for_reviews(3).await;
        assert_eq!(reviews.len(), 3);
        assert!(reviews.iter().all(|(_, rating)| *rating == Rating::Easy));
        assert_eq!(backend.started_sessions(), vec![SET_WITH_CARDS]);
        let ended = backend.wait_for_ended_sessions(1).await;
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].1["reviews"], 3);
        assert_eq!(ended[0].1["easy"], 3);

        // Restart fetches the cards again.
        let html = act(&base, "Restart").await?;
        assert!(html.contains("Cards left: 3"));
        assert_eq!(backend.started_sessions(), vec![SET_WITH_CARDS, SET_WITH_CARDS]);

        // Exit after one review ends the session early and closes it.
        act(&base, "Flip").await?;
        act(&base, "Easy").await?;
        let html = act(&base, "Exit").await?;
        assert!(html.contains("Study session ended early"));
        assert!(html.contains("2 cards were still in the queue."));
        let ended = backend.wait_for_ended_sessions(2).await;
        assert_eq!(ended.len(), 2);
        assert_eq!(ended[1].1["reviews"], 1);
        assert_eq!(ended[1].1["cards_in_session"], 3);

        // Actions on an ended session are refused.
        let html = act(&base, "Flip").await?;
        assert!(html.contains("Study session ended early"));

        // A failed fetch on restart blocks studying and starts nothing.
        backend.set_due_cards_down(true);
        let html = act(&base, "Restart").await?;
        assert!(html.contains("Could not start a study session"));
        assert!(html.contains("Database unavailable"));
        assert!(!html.contains("Cards left"));
        assert_eq!(backend.started_sessions().len(), 2);
        let html = act(&base, "Flip").await?;
        assert!(html.contains("Could not start a study session"));
        assert_eq!(backend.ended_sessions().len(), 2);

        // Restarting once the backend recovers starts a fresh session.
        backend.set_due_cards_down(false);
        let html = act(&base, "Restart").await?;
        assert!(html.contains("Cards left: 3"));
        assert!(!html.contains("Could not start a study session"));
        assert_eq!(backend.started_sessions().len(), 3);

        // Shut down mid-session; the open session is still closed.
        let response = reqwest::Client::new()
            .post(&base)
            .form(&[("action", "Shutdown")])
            .send()
            .await;
        drop(response);
        let result = timeout(Duration::from_secs(10), server).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
        assert_eq!(backend.ended_sessions().len(), 3);
        Ok(())
    }
}
