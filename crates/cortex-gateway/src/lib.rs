// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway exposing the Cortex API.
//!
//! The gateway fronts three orchestration surfaces: fire-and-forget session
//! ingestion with job polling, knowledge compilation hydration, and
//! OpenAI-compatible streaming chat completions. Graph visualization and
//! memory correction ride on the same router.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{router, start_server, GatewayState, ServerConfig};
