//! Triggering-user lookup.

use crate::types::{vars, Cause, EnvVars};

/// User reported when no triggering user can be determined.
pub const ANONYMOUS: &str = "anonymous";

/// Maximum number of nested upstream causes followed before giving up.
pub const MAX_CAUSE_DEPTH: usize = 64;

/// Returns the name of the user that triggered the build.
///
/// `CHANGE_AUTHOR` (set for pull-request builds) wins outright. Otherwise only
/// the first cause at each level is inspected: a user trigger yields its user
/// name, an upstream trigger is followed into its own causes, and anything
/// else is [`ANONYMOUS`].
pub fn resolve_user(causes: &[Cause], env: &EnvVars) -> String {
    if let Some(author) = env.get(vars::CHANGE_AUTHOR) {
        return author.to_string();
    }

    let mut level = causes;
    for _ in 0..MAX_CAUSE_DEPTH {
        match level.first() {
            Some(Cause::UserId { user_name }) => return user_name.clone(),
            Some(Cause::Upstream { causes }) => level = causes,
            Some(Cause::Other { .. }) | None => return ANONYMOUS.to_string(),
        }
    }

    tracing::debug!(max_depth = MAX_CAUSE_DEPTH, "upstream cause chain too deep");
    ANONYMOUS.to_string()
}
