// wishstore-api: Async Rust client for the wishstore REST API
//
// Transport mechanics (auth header, interceptors, error mapping) live in
// `client`; typed CRUD per entity lives in `resource`. Wire types and the
// local-date conversions they rely on are in `models` and `dates`.

pub mod auth;
pub mod client;
pub mod dates;
pub mod entity;
pub mod error;
pub mod interceptor;
pub mod models;
pub mod pagination;
pub mod resource;
pub mod transport;

pub use auth::{Account, Credentials, LoginRequest};
pub use client::ApiClient;
pub use entity::{Entity, FieldError, Owned, OwnerOption};
pub use error::Error;
pub use interceptor::{AlertSink, NotificationInterceptor, ResponseInterceptor};
pub use models::{User, UserRef, Wish, Wishlist, WishlistRef};
pub use pagination::{Page, PageLinks, PageRequest};
pub use resource::ResourceClient;
pub use transport::{TlsMode, TransportConfig};
