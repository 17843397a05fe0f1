// wishstore-core: view-models, routing and eventing between wishstore-api
// and the front ends (CLI/TUI).

pub mod alert;
pub mod bus;
pub mod config;
pub mod error;
pub mod navigator;
pub mod resolve;
pub mod routes;
pub mod service;
pub mod storefront;
pub mod viewmodel;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alert::{Alert, AlertKind, AlertService, Catalog};
pub use bus::{EventBus, Subscription, ViewScope};
pub use config::{AuthCredentials, ClientConfig, DEFAULT_APP_NAME, TlsVerification};
pub use error::CoreError;
pub use navigator::{ActiveState, ModalExit, Navigator, PendingTransition, PreviousState, Principal};
pub use resolve::resolve_entity;
pub use routes::{RouteKind, StateDef, StateParams, StateRegistry};
pub use service::EntityService;
pub use storefront::Storefront;
pub use viewmodel::{
    DeleteViewModel, DetailViewModel, DialogState, DialogViewModel, ListViewModel, ModalOutcome,
    SaveCommand,
};

// Entity types, re-exported so front ends need only this crate.
pub use wishstore_api::{
    Entity, FieldError, Owned, OwnerOption, Page, PageRequest, User, UserRef, Wish, Wishlist,
    WishlistRef,
};
