//! Target selection filter
//!
//! Decides whether a requested leaf target should be materialized at all,
//! from external configuration: an explicit allow-list, a "select all" flag,
//! or nothing (in which case every requested target materializes).
//!
//! Filtering is opt-in and silent: a rejected target is simply omitted from
//! the final hierarchy. An allow-list naming an unknown target identifier is
//! a configuration error, raised at load time.

use std::collections::BTreeSet;

use crate::taxonomy::TargetId;

/// Errors constructing the selection state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Allow-list entry does not name a known target
    #[error("target allow-list entry '{identifier}' not recognized")]
    UnknownTarget { identifier: String },
}

/// Process-wide target selection state, read once per configuration run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Materialize every requested target ("select all" flag set)
    All,
    /// Materialize only targets in the allow-list
    AllowList(BTreeSet<TargetId>),
    /// No flag, no list: materialize every requested target
    #[default]
    Unrestricted,
}

impl SelectionState {
    /// Build selection state from the external configuration source.
    ///
    /// The "all" flag takes precedence over any allow-list. Unknown
    /// identifiers in the allow-list fail fast, naming the bad entry.
    pub fn from_external<S: AsRef<str>>(
        select_all: bool,
        allow_list: Option<&[S]>,
    ) -> Result<Self, SelectionError> {
        if select_all {
            return Ok(SelectionState::All);
        }

        let Some(entries) = allow_list else {
            return Ok(SelectionState::Unrestricted);
        };

        let mut ids = BTreeSet::new();
        for entry in entries {
            let trimmed = entry.as_ref().trim();
            let id = trimmed
                .parse::<TargetId>()
                .map_err(|e| SelectionError::UnknownTarget { identifier: e.0 })?;
            ids.insert(id);
        }
        Ok(SelectionState::AllowList(ids))
    }

    /// Whether a requested leaf target should be materialized
    pub fn should_materialize(&self, id: TargetId) -> bool {
        match self {
            SelectionState::All | SelectionState::Unrestricted => true,
            SelectionState::AllowList(ids) => ids.contains(&id),
        }
    }
}
