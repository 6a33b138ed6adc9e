// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scope-combination evaluation for feature gating.

/// Scope granting every capability unconditionally.
pub const SUPER_ADMIN_SCOPE: &str = "god";

/// True iff `user_scopes` satisfies every entry of `required`.
///
/// AND semantics, order-independent, exact string match. An empty
/// requirement is unsatisfiable rather than trivially satisfied: gating
/// a feature on "no scopes" is a caller bug and fails closed. The
/// super-admin scope short-circuits everything.
pub fn scopes_satisfy<S: AsRef<str>>(user_scopes: &[String], required: &[S]) -> bool {
    if required.is_empty() {
        return false;
    }
    if user_scopes.iter().any(|s| s == SUPER_ADMIN_SCOPE) {
        return true;
    }
    required
        .iter()
        .all(|req| user_scopes.iter().any(|s| s == req.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scopes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_superset_satisfies() {
        let user = scopes(&["a", "b", "c"]);
        assert!(scopes_satisfy(&user, &["a", "b"]));
        assert!(scopes_satisfy(&user, &["c"]));
    }

    #[test]
    fn test_missing_scope_fails() {
        let user = scopes(&["a"]);
        assert!(!scopes_satisfy(&user, &["a", "b"]));
        assert!(!scopes_satisfy(&user, &["d"]));
    }

    #[test]
    fn test_order_independent() {
        let user = scopes(&["b", "a"]);
        assert!(scopes_satisfy(&user, &["a", "b"]));
        assert!(scopes_satisfy(&user, &["b", "a"]));
    }

    #[test]
    fn test_super_admin_overrides() {
        let user = scopes(&["god"]);
        assert!(scopes_satisfy(&user, &["anything", "at", "all"]));
    }

    #[test]
    fn test_empty_requirement_fails_closed() {
        let user = scopes(&["a", "god"]);
        let none: &[&str] = &[];
        assert!(!scopes_satisfy(&user, none));
    }

    #[test]
    fn test_exact_string_match() {
        let user = scopes(&["resolve_dns"]);
        assert!(!scopes_satisfy(&user, &["resolve"]));
        assert!(!scopes_satisfy(&user, &["RESOLVE_DNS"]));
    }
}
