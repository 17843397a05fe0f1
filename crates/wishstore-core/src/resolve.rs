// Resolve step: the pre-fetch a pending transition needs before activation.

use tracing::debug;
use wishstore_api::Entity;

use crate::error::CoreError;
use crate::navigator::PendingTransition;
use crate::routes::Resolve;
use crate::service::EntityService;

/// Fetch the entity `pending` needs.
///
/// `Ok(None)` for states that resolve nothing (lists). A blank draft for
/// "new" states; the server copy for everything keyed by id.
pub async fn resolve_entity<T, S>(
    service: &S,
    pending: &PendingTransition,
) -> Result<Option<T>, CoreError>
where
    T: Entity,
    S: EntityService<T>,
{
    if pending.entity != T::NAME {
        return Err(CoreError::InvalidTransition {
            message: format!("'{}' does not resolve a {}", pending.to, T::NAME),
        });
    }

    match pending.resolve {
        Resolve::None => Ok(None),
        Resolve::Blank => Ok(Some(T::blank())),
        Resolve::EntityById | Resolve::EntityWithPrevious => {
            let id = pending.params.id.ok_or_else(|| CoreError::MissingParam {
                state: pending.to.clone(),
                param: "id",
            })?;
            debug!(state = %pending.to, id, "resolving {}", T::NAME);
            service.get(id).await.map(Some)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use wishstore_api::Wishlist;

    use super::*;
    use crate::navigator::{Navigator, Principal};
    use crate::routes::{StateParams, StateRegistry};
    use crate::testing::MockService;

    fn navigator() -> Navigator {
        let mut nav = Navigator::new(Arc::new(StateRegistry::storefront("storeApp")));
        nav.set_principal(Some(Principal::new("user", &["ROLE_USER"])));
        nav
    }

    fn stored() -> MockService<Wishlist> {
        let mut wl = Wishlist::blank();
        wl.id = Some(1);
        wl.name = Some("Books".into());
        MockService::new(vec![wl])
    }

    #[tokio::test]
    async fn new_state_resolves_blank_draft() {
        let pending = navigator().go("wishlist.new", StateParams::default()).unwrap();
        let resolved = resolve_entity(&stored(), &pending).await.unwrap();
        assert_eq!(resolved, Some(Wishlist::blank()));
    }

    #[tokio::test]
    async fn edit_state_fetches_by_id() {
        let pending = navigator().go("wishlist.edit", StateParams::id(1)).unwrap();
        let resolved = resolve_entity(&stored(), &pending).await.unwrap();
        assert_eq!(resolved.and_then(|w| w.name), Some("Books".into()));
    }

    #[tokio::test]
    async fn list_state_resolves_nothing() {
        let pending = navigator().go("wishlist", StateParams::default()).unwrap();
        assert_eq!(resolve_entity(&stored(), &pending).await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_entity_fails_the_transition() {
        let pending = navigator().go("wishlist-detail", StateParams::id(77)).unwrap();
        let err = resolve_entity(&stored(), &pending).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn wrong_entity_type_is_rejected() {
        let pending = navigator().go("wish.edit", StateParams::id(1)).unwrap();
        let err = resolve_entity::<Wishlist, _>(&stored(), &pending)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }
}
