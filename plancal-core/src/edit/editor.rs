//! The single-selection text cell editor.

use serde::Serialize;

use super::CellId;

/// Where the editor is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditState {
    Idle,
    Editing {
        cell: CellId,
        draft: String,
        /// Value the draft was seeded with
        original: String,
    },
    /// A write is in flight for `cell`. `next` is a cell clicked meanwhile;
    /// it opens once the write finishes.
    Committing {
        cell: CellId,
        next: Option<(CellId, String)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter { shift: bool },
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    /// Click on an editable cell. `current` is its display value.
    Click { cell: CellId, current: String },
    /// The whole draft text after a keystroke.
    Input(String),
    Key(Key),
    Blur,
}

/// Emitted when a draft leaves the editor to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRequest {
    pub cell: CellId,
    pub draft: String,
    pub original: String,
}

impl CommitRequest {
    pub fn is_unchanged(&self) -> bool {
        self.draft == self.original
    }
}

/// Reducer over [`EditState`]. At most one cell is ever in `Editing`.
#[derive(Debug, Default)]
pub struct CellEditor {
    state: EditState,
}

impl Default for EditState {
    fn default() -> Self {
        EditState::Idle
    }
}

impl CellEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// The cell currently being edited, if any.
    pub fn editing(&self) -> Option<&CellId> {
        match &self.state {
            EditState::Editing { cell, .. } => Some(cell),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.state, EditState::Committing { .. })
    }

    /// Feed one UI event. Returns a commit request when the draft should be
    /// written; the caller must call [`CellEditor::finish`] once the write is
    /// done, whatever its outcome.
    pub fn handle(&mut self, event: EditEvent) -> Option<CommitRequest> {
        let state = std::mem::take(&mut self.state);

        let (next, request) = match (state, event) {
            (EditState::Idle, EditEvent::Click { cell, current }) => (
                EditState::Editing {
                    cell,
                    draft: current.clone(),
                    original: current,
                },
                None,
            ),
            (EditState::Idle, _) => (EditState::Idle, None),

            (
                EditState::Editing {
                    cell,
                    draft,
                    original,
                },
                event,
            ) => match event {
                EditEvent::Click {
                    cell: clicked,
                    current,
                } => {
                    if clicked == cell {
                        (
                            EditState::Editing {
                                cell,
                                draft,
                                original,
                            },
                            None,
                        )
                    } else {
                        // Clicking elsewhere blurs the open cell first.
                        Self::commit(cell, draft, original, Some((clicked, current)))
                    }
                }
                EditEvent::Input(text) => (
                    EditState::Editing {
                        cell,
                        draft: text,
                        original,
                    },
                    None,
                ),
                EditEvent::Key(Key::Escape) => {
                    log::debug!("Discarding draft for {} on {}", cell.field, cell.date);
                    (EditState::Idle, None)
                }
                // Shift+Enter is a newline in every column
                EditEvent::Key(Key::Enter { shift: true }) => {
                    let mut draft = draft;
                    draft.push('\n');
                    (
                        EditState::Editing {
                            cell,
                            draft,
                            original,
                        },
                        None,
                    )
                }
                EditEvent::Key(Key::Enter { shift: false }) | EditEvent::Blur => {
                    Self::commit(cell, draft, original, None)
                }
            },

            (EditState::Committing { cell, next }, event) => {
                let next = match event {
                    EditEvent::Click {
                        cell: clicked,
                        current,
                    } => Some((clicked, current)),
                    _ => next,
                };
                (EditState::Committing { cell, next }, None)
            }
        };

        self.state = next;
        request
    }

    /// The write for the committing cell is done. Returns to `Idle`, or
    /// opens the cell that was clicked while the write was in flight.
    pub fn finish(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            EditState::Committing {
                next: Some((cell, current)),
                ..
            } => EditState::Editing {
                cell,
                draft: current.clone(),
                original: current,
            },
            EditState::Committing { next: None, .. } => EditState::Idle,
            other => other,
        };
    }

    fn commit(
        cell: CellId,
        draft: String,
        original: String,
        next: Option<(CellId, String)>,
    ) -> (EditState, Option<CommitRequest>) {
        log::debug!("Committing {} on {}", cell.field, cell.date);
        let request = CommitRequest {
            cell: cell.clone(),
            draft,
            original,
        };
        (EditState::Committing { cell, next }, Some(request))
    }
}
