#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use bank_api::database::{Account, MemoryStore};
use bank_api::{app, AppState};

pub const SECRET: &str = "integration-secret";
pub const TOKEN_HEADER: &str = "x-jwt-token";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the app on a free port with a fresh in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with_secret(SECRET).await
    }

    pub async fn start_with_secret(secret: &str) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::new(Arc::new(MemoryStore::new()), secret, 15000);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            state,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /account and return the stored account plus the issued token header
    pub async fn create_account(&self, first: &str, last: &str) -> Result<(Account, String)> {
        let res = self
            .client
            .post(self.url("/account"))
            .json(&json!({ "firstName": first, "lastName": last }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "create failed: {}", res.status());

        let token = res
            .headers()
            .get(TOKEN_HEADER)
            .context("missing token header")?
            .to_str()?
            .to_string();
        let account = res.json::<Account>().await?;
        Ok((account, token))
    }
}

pub async fn error_body(res: reqwest::Response) -> Result<Value> {
    Ok(res.json::<Value>().await?)
}

pub fn permission_denied() -> Value {
    json!({ "error": "permission denied", "code": 403 })
}
