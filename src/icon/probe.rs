//! Favicon existence checks

use crate::settings::Settings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::HashSet;

#[async_trait]
pub trait FaviconProbe: Send + Sync {
    /// `Ok` when `url` answers with a success status
    async fn probe(&self, url: &str) -> Result<()>;
}

/// Probe over HTTP. Timeouts come from the client and count as failures.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.probe_timeout())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FaviconProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<()> {
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;

        Ok(())
    }
}

/// Probe that never touches the network; every source is unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProbe;

#[async_trait]
impl FaviconProbe for OfflineProbe {
    async fn probe(&self, url: &str) -> Result<()> {
        anyhow::bail!("offline: not probing {url}")
    }
}

/// Probe with a fixed set of reachable URLs that records every request
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    reachable: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedProbe {
    pub fn new<I, S>(reachable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reachable: reachable.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl FaviconProbe for ScriptedProbe {
    async fn probe(&self, url: &str) -> Result<()> {
        self.requests.lock().push(url.to_string());
        tokio::task::yield_now().await;

        if self.reachable.contains(url) {
            Ok(())
        } else {
            anyhow::bail!("{url} returned 404 Not Found")
        }
    }
}
