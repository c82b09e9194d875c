// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build-time options.

/// What [`RealmTree::verify`](crate::RealmTree::verify) does when the surface no
/// longer matches the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StalenessPolicy {
    /// Return [`RealmError::Stale`](crate::RealmError::Stale).
    #[default]
    Error,
    /// Emit a `tracing` warning and carry on.
    Warn,
    /// Panic. For hosts that treat a stale index as a programming error.
    Panic,
}

/// Options for [`RealmTree::build_with`](crate::RealmTree::build_with).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuildOptions {
    /// Reaction to a failed [`verify`](crate::RealmTree::verify).
    pub staleness: StalenessPolicy,
    /// Run [`RealmTree::validate`](crate::RealmTree::validate) after building and
    /// return its error, if any.
    ///
    /// Defaults to on in debug builds and off in release builds.
    pub validate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            staleness: StalenessPolicy::default(),
            validate: cfg!(debug_assertions),
        }
    }
}

impl BuildOptions {
    /// Set the staleness policy.
    #[must_use]
    pub const fn with_staleness(mut self, staleness: StalenessPolicy) -> Self {
        self.staleness = staleness;
        self
    }

    /// Enable or disable post-build validation.
    #[must_use]
    pub const fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}
