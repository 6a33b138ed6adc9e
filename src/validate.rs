// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential shape validation.
//!
//! Pure functions the forms run before any network call. The session
//! manager does not re-run these; submitting unvalidated input is a
//! caller bug, not something this layer defends against.

use validator::ValidateEmail;

/// Password length bounds, inclusive.
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 50;

/// Why a password was rejected. The two variants map to the two
/// distinct error banners the account forms display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    /// Outside the 8–50 character range.
    InvalidLength,
    /// Contains a character outside the allowed classes.
    InvalidCharacters,
}

/// Check an email address for plausible shape.
pub fn validate_email(email: &str) -> bool {
    email.validate_email()
}

/// Check that the confirmation field matches the email, ignoring
/// surrounding whitespace.
pub fn validate_emails_match(email: &str, confirm: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email == confirm.trim()
}

/// Check password complexity: 8–50 characters, drawn from ASCII
/// letters, digits, punctuation, and space.
pub fn check_password(password: &str) -> Result<(), PasswordIssue> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(PasswordIssue::InvalidLength);
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || c.is_ascii_punctuation() || c == ' ';
    if password.chars().all(allowed) {
        Ok(())
    } else {
        Err(PasswordIssue::InvalidCharacters)
    }
}
