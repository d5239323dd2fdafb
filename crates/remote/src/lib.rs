// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! limesync-remote: client for the remote survey service
//!
//! The service speaks JSON-RPC 2.0 (the LimeSurvey RemoteControl
//! API). [`rpc::RpcClient`] is the transport, [`api::SurveyApi`] the
//! typed surface the engine programs against, and [`lime::LimeClient`]
//! the production implementation.

pub mod api;
pub mod lime;
pub mod rpc;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use api::{CompletedResponse, Participant, RemoteError, SessionKey, SurveyApi};
pub use lime::LimeClient;
pub use rpc::RpcClient;
pub use session::SessionManager;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSurveyApi;
