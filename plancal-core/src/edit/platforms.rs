//! The platform multi-select of a sheet row.

use std::collections::BTreeSet;

use serde::Serialize;

use super::RowId;
use crate::model::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlatformState {
    #[default]
    Idle,
    Editing {
        row: RowId,
        selected: BTreeSet<Platform>,
    },
    Committing {
        row: RowId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// Open the picker on `row`, showing its current targets.
    Open { row: RowId, current: Vec<Platform> },
    Toggle(Platform),
    Save,
    Cancel,
}

/// The full selection to write for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCommit {
    pub row: RowId,
    pub platforms: BTreeSet<Platform>,
}

/// Independent of the text [`super::CellEditor`]; one row at a time.
#[derive(Debug, Default)]
pub struct PlatformEditor {
    state: PlatformState,
}

impl PlatformEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlatformState {
        &self.state
    }

    pub fn selected(&self) -> Option<&BTreeSet<Platform>> {
        match &self.state {
            PlatformState::Editing { selected, .. } => Some(selected),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: PlatformEvent) -> Option<PlatformCommit> {
        let (next, commit) = match (std::mem::take(&mut self.state), event) {
            (PlatformState::Idle, PlatformEvent::Open { row, current })
            | (PlatformState::Editing { .. }, PlatformEvent::Open { row, current }) => (
                PlatformState::Editing {
                    row,
                    selected: current.into_iter().collect(),
                },
                None,
            ),
            (PlatformState::Editing { row, mut selected }, PlatformEvent::Toggle(platform)) => {
                if !selected.remove(&platform) {
                    selected.insert(platform);
                }
                (PlatformState::Editing { row, selected }, None)
            }
            (PlatformState::Editing { row, selected }, PlatformEvent::Save) => {
                let commit = PlatformCommit {
                    row: row.clone(),
                    platforms: selected,
                };
                (PlatformState::Committing { row }, Some(commit))
            }
            (PlatformState::Editing { .. }, PlatformEvent::Cancel) => (PlatformState::Idle, None),
            (state, _) => (state, None),
        };

        self.state = next;
        commit
    }

    /// Back to `Idle` once the write is done.
    pub fn finish(&mut self) {
        if matches!(self.state, PlatformState::Committing { .. }) {
            self.state = PlatformState::Idle;
        }
    }
}
