// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Out-of-band notification for operational errors.

use async_trait::async_trait;

/// Sink for errors an administrator should hear about. The audit log
/// itself is `tracing`; this is the additional out-of-band channel
/// (mail, pager, whatever the embedder wires up).
#[async_trait]
pub trait AdminNotifier: Send + Sync {
    async fn notify(&self, subject: &str, message: &str);
}

/// Default sink: errors only reach the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOnlyNotifier;

#[async_trait]
impl AdminNotifier for LogOnlyNotifier {
    async fn notify(&self, subject: &str, message: &str) {
        tracing::error!(%subject, %message, "operational error");
    }
}
