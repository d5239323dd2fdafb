// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal JSON-RPC 2.0 transport for the survey service.

use crate::api::RemoteError;
use limesync_core::SystemConfig;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// One JSON-RPC endpoint, optionally reached through an HTTP proxy.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(system: &SystemConfig) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy_url) = system.proxy_url.as_deref().filter(|u| !u.is_empty()) {
            let mut proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|err| RemoteError::Connect(err.to_string()))?;
            if let Some((user, pass)) =
                system.proxy_auth.as_deref().and_then(|auth| auth.split_once(':'))
            {
                proxy = proxy.basic_auth(user, pass);
            }
            builder = builder.proxy(proxy);
        }
        let http = builder.build().map_err(|err| RemoteError::Connect(err.to_string()))?;
        Ok(Self { http, url: system.service_url.clone(), next_id: AtomicU64::new(1) })
    }

    /// Issue one call and return its `result` member. A non-null
    /// `error` member becomes [`RemoteError::Status`].
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RemoteError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "method": method, "params": params, "id": id });
        tracing::debug!(%method, id, "rpc call");
        let response = self.http.post(&self.url).json(&body).send().await?;
        let envelope: Value = response
            .json()
            .await
            .map_err(|err| RemoteError::Decode(err.to_string()))?;
        if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
            return Err(RemoteError::Status(error.to_string()));
        }
        Ok(envelope.get("result").cloned().unwrap_or(Value::Null))
    }
}
