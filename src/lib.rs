//! PIX Console - browser console for a multi-tenant PIX payment platform.
//!
//! This library provides:
//! - Typed REST client for the platform backend (bearer auth, error taxonomy)
//! - Session token storage and the auth bootstrap state machine
//! - Cancellable polling for payment confirmation and incoming transfers
//! - Web Push subscription lifecycle behind a capability trait
//! - Service-worker notification routing rules
//! - Dioxus web UI (dashboard, payments, withdrawals, transfers, admin)
//! - A small static-hosting server with an /api reverse proxy (server feature)

pub mod api;
pub mod app;
pub mod notify;
pub mod poll;
pub mod push;
pub mod session;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod server;
