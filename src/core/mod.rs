//! # Core Application Logic
//!
//! This module contains Skycast's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No HTTP. No timers.    │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                    ┌───────────┴─────────────┐
//!                    ▼                         ▼
//!             ┌────────────┐            ┌────────────┐
//!             │  Runtime   │            │    TUI     │
//!             │  (tokio)   │            │ (ratatui)  │
//!             └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`search`]: Debounced search with timer generations and request sequencing
//! - [`auth`], [`favorites`], [`weather`]: per-screen state machines
//! - [`session`]: The persisted auth token
//! - [`route`]: Screen paths
//! - [`config`]: Settings resolution

pub mod action;
pub mod auth;
pub mod config;
pub mod favorites;
pub mod route;
pub mod search;
pub mod session;
pub mod state;
pub mod weather;
