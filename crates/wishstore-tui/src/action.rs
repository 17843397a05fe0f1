//! All possible UI actions. Actions are the sole mechanism for state mutation.
//!
//! Network work runs in spawned tasks; each task reports back with exactly
//! one action. Results aimed at a view that is gone are dropped.

use wishstore_core::{AlertKind, CoreError, PendingTransition, Principal, StateParams};

use crate::record::{AnyRecord, Records};
use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl From<AlertKind> for NotificationLevel {
    fn from(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Success => Self::Success,
            AlertKind::Info => Self::Info,
            AlertKind::Error => Self::Error,
        }
    }
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Connection ────────────────────────────────────────────────
    Connected(Principal),
    Disconnected(String),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    /// Request a transition to `state`.
    Go { state: String, params: StateParams },
    /// The resolve step of a pending transition finished.
    Resolved {
        pending: PendingTransition,
        generation: u64,
        result: Result<Option<AnyRecord>, CoreError>,
    },
    /// A committed transition, handed to the screen that shows it.
    Enter {
        pending: PendingTransition,
        record: Option<AnyRecord>,
    },
    /// A modal view went away; `closed` is false when it was dismissed.
    ModalExit { closed: bool },
    /// The navigator left a modal for a state whose view is still mounted.
    Return {
        pending: PendingTransition,
        reload: bool,
    },

    // ── Data ──────────────────────────────────────────────────────
    ListLoaded {
        entity: &'static str,
        result: Result<Records, CoreError>,
    },
    OwnersLoaded {
        entity: &'static str,
        ticket: u64,
        result: Result<Records, CoreError>,
    },
    Saved {
        entity: &'static str,
        ticket: u64,
        result: Result<AnyRecord, CoreError>,
    },
    Deleted {
        entity: &'static str,
        ticket: u64,
        result: Result<(), CoreError>,
    },

    // ── Overlays ──────────────────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
}

impl Action {
    /// Entity whose screen a routed action belongs to.
    pub fn entity(&self) -> Option<&str> {
        match self {
            Self::Enter { pending, .. } | Self::Return { pending, .. } => Some(&pending.entity),
            Self::ListLoaded { entity, .. }
            | Self::OwnersLoaded { entity, .. }
            | Self::Saved { entity, .. }
            | Self::Deleted { entity, .. } => Some(entity),
            _ => None,
        }
    }
}
