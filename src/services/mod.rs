// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session orchestration and account state.

pub mod account;
pub mod session;

pub use account::{AccountRecord, AccountStore};
pub use session::SessionManager;
