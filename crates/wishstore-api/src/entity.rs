// ── Entity abstraction ──
//
// Every REST-managed type declares where it lives on the server, how its
// states and events are named, and what a fresh draft looks like. The
// resource client, the view-models and the route table are all generic
// over this trait.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A REST-managed entity with a server-assigned numeric identifier.
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Collection path segment: requests go to `api/{COLLECTION}`.
    const COLLECTION: &'static str;
    /// Singular name used for state names and translation keys (`wishlist`).
    const NAME: &'static str;
    /// Event suffix broadcast after a successful save (`wishlistUpdate`).
    const UPDATE_EVENT: &'static str;
    /// Human-facing singular title (`Wishlist`).
    const TITLE: &'static str;

    /// Server identifier; `None` until the entity has been created.
    fn id(&self) -> Option<i64>;

    /// The empty draft a "new" dialog starts from.
    fn blank() -> Self;

    /// Short label for lists and selectors.
    fn label(&self) -> String;

    /// Client-side form validation, run before any save is issued.
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Ok(())
    }
}

/// An entity that references an owning entity of another type.
pub trait Owned: Entity {
    type Owner: Entity;

    fn owner_id(&self) -> Option<i64> {
        self.owner().map(|o| o.id)
    }

    /// The current owner reference as a selectable option.
    fn owner(&self) -> Option<OwnerOption>;

    /// Owner label for tables and detail views, `-` when unset.
    fn owner_label(&self) -> String {
        self.owner().map_or_else(|| "-".into(), |o| o.label)
    }

    /// Point the owner reference at `option`, or clear it.
    fn assign_owner(&mut self, option: Option<&OwnerOption>);

    fn set_owner(&mut self, owner: Option<&Self::Owner>) {
        let option = owner.and_then(OwnerOption::of);
        self.assign_owner(option.as_ref());
    }
}

/// A selectable owner: its id and the label shown in selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerOption {
    pub id: i64,
    pub label: String,
}

impl OwnerOption {
    /// `None` for an owner that has not been persisted.
    pub fn of<E: Entity>(entity: &E) -> Option<Self> {
        entity.id().map(|id| Self {
            id,
            label: entity.label(),
        })
    }
}

/// A single validation failure on a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: "This field is required.".into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
