//! The user on whose behalf a batch is imported.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Authority that grants every other authority.
pub const AUTHORITY_ALL: &str = "ALL";

/// Authority that exempts events from compulsory data element checks.
pub const AUTHORITY_IGNORE_REQUIRED_VALUE_VALIDATION: &str =
    "F_IGNORE_TRACKER_REQUIRED_VALUE_VALIDATION";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportUser {
    pub username: String,
    #[serde(default)]
    pub authorities: BTreeSet<String>,
}

impl ImportUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            authorities: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.insert(authority.into());
        self
    }

    pub fn is_authorized(&self, authority: &str) -> bool {
        self.authorities.contains(AUTHORITY_ALL) || self.authorities.contains(authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superuser_holds_every_authority() {
        let admin = ImportUser::new("admin").with_authority(AUTHORITY_ALL);
        let clerk = ImportUser::new("clerk");

        assert!(admin.is_authorized(AUTHORITY_IGNORE_REQUIRED_VALUE_VALIDATION));
        assert!(!clerk.is_authorized(AUTHORITY_IGNORE_REQUIRED_VALUE_VALIDATION));
    }
}
