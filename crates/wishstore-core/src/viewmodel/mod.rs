// ── View-models ──
//
// Front-end-agnostic state for the list, detail, create/edit and delete
// views. Each is an explicit struct with command methods; the CLI and the
// TUI render from them and drive them.

pub mod delete;
pub mod detail;
pub mod dialog;
pub mod list;

pub use delete::DeleteViewModel;
pub use detail::DetailViewModel;
pub use dialog::{DialogState, DialogViewModel, SaveCommand};
pub use list::ListViewModel;

/// What a modal view hands back to the navigator when it goes away.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalOutcome<T> {
    /// Closed with a result (the saved entity, or `true` after a delete).
    Closed(T),
    /// Dismissed without a result.
    Dismissed,
}

impl<T> ModalOutcome<T> {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }

    pub fn closed(self) -> Option<T> {
        match self {
            Self::Closed(value) => Some(value),
            Self::Dismissed => None,
        }
    }
}
