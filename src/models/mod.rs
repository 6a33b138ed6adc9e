// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the account subsystem.

pub mod subscription;
pub mod theme;
pub mod user;

pub use subscription::Subscription;
pub use theme::ThemeData;
pub use user::UserProfile;
