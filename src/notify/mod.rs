use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Push subscription record as the browser hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Subscription {
    pub(crate) endpoint: String,
    pub(crate) keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SubscriptionKeys {
    pub(crate) auth: String,
    pub(crate) p256dh: String,
}

#[allow(clippy::expect_used)]
static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("static pattern"));

/// Storage key for a subscription: the endpoint URL with every run of
/// non-alphanumeric characters collapsed to a single underscore.
pub(crate) fn sanitize_endpoint(endpoint: &str) -> String {
    NON_ALNUM.replace_all(endpoint.trim(), "_").into_owned()
}

#[derive(Serialize)]
struct PushMessage<'a> {
    key: &'a str,
    title: &'a str,
    body: &'a str,
}

/// Client for the key-based notification provider.
pub(crate) struct Notifier {
    client: reqwest::blocking::Client,
    provider_url: String,
}

impl Notifier {
    pub(crate) fn new(provider_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            provider_url: provider_url.into(),
        })
    }

    pub(crate) fn send(&self, key: &str, title: &str, body: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.provider_url)
            .json(&PushMessage { key, title, body })
            .send()
            .context("Push provider request failed")?;
        if !resp.status().is_success() {
            anyhow::bail!("Push provider returned {}", resp.status());
        }
        Ok(())
    }
}

/// Best-effort push after a new form entry. Failures are logged and folded
/// into a short status suffix; they never block the entry itself. Returns
/// None when notifications aren't configured.
pub(crate) fn push_entry_added(
    push_url: Option<&str>,
    notify_key: Option<&str>,
    txn: &Transaction,
) -> Option<&'static str> {
    let url = push_url?;
    let key = notify_key?;
    let body = format!("{} {} — {}", txn.kind, txn.amount, txn.category);
    let sent = Notifier::new(url).and_then(|n| n.send(key, "New entry", &body));
    match sent {
        Ok(()) => {
            log::info!("push notification sent for new {} entry", txn.kind);
            Some("notified")
        }
        Err(e) => {
            log::warn!("push notification failed: {e:#}");
            Some("notification failed")
        }
    }
}
