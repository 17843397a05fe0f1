// Delete confirmation dialog.

use tracing::warn;
use wishstore_api::Entity;

use crate::error::CoreError;
use crate::service::EntityService;
use crate::viewmodel::ModalOutcome;

#[derive(Debug)]
pub struct DeleteViewModel<T: Entity> {
    entity: T,
    deleting: bool,
    outcome: Option<ModalOutcome<bool>>,
    last_error: Option<CoreError>,
}

impl<T: Entity> DeleteViewModel<T> {
    pub fn new(entity: T) -> Self {
        Self {
            entity,
            deleting: false,
            outcome: None,
            last_error: None,
        }
    }

    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn outcome(&self) -> Option<&ModalOutcome<bool>> {
        self.outcome.as_ref()
    }

    pub fn last_error(&self) -> Option<&CoreError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<CoreError> {
        self.last_error.take()
    }

    /// Mark the delete as in flight. Returns `false` if one already is, or
    /// if the dialog has closed.
    pub fn begin_delete(&mut self) -> bool {
        if self.deleting || self.outcome.is_some() {
            return false;
        }
        self.deleting = true;
        true
    }

    pub fn finish(&mut self, result: Result<(), CoreError>) {
        if !self.deleting {
            return;
        }
        self.deleting = false;
        match result {
            Ok(()) => self.outcome = Some(ModalOutcome::Closed(true)),
            Err(e) => {
                warn!(entity = T::NAME, error = %e, "delete failed");
                self.last_error = Some(e);
            }
        }
    }

    /// Delete `id` and close with `Closed(true)` on success.
    pub async fn confirm_delete<S: EntityService<T>>(&mut self, service: &S, id: i64) {
        if !self.begin_delete() {
            return;
        }
        let result = service.delete(id).await;
        self.finish(result);
    }

    /// Dismiss without deleting.
    pub fn clear(&mut self) {
        self.deleting = false;
        self.outcome = Some(ModalOutcome::Dismissed);
    }
}

#[cfg(test)]
mod tests {
    use wishstore_api::Wish;

    use super::*;
    use crate::testing::MockService;

    fn wish(id: i64) -> Wish {
        Wish {
            id: Some(id),
            product_id: Some(10),
            price: Some(5.0),
            wishlist: None,
        }
    }

    #[tokio::test]
    async fn confirm_deletes_once_and_closes_true() {
        let svc = MockService::new(vec![wish(4)]);
        let mut vm = DeleteViewModel::new(wish(4));

        vm.confirm_delete(&svc, 4).await;
        vm.confirm_delete(&svc, 4).await;

        assert_eq!(MockService::<Wish>::count(&svc.deletes), 1);
        assert_eq!(vm.outcome(), Some(&ModalOutcome::Closed(true)));
    }

    #[tokio::test]
    async fn failure_keeps_dialog_open() {
        let svc = MockService::<Wish>::failing();
        let mut vm = DeleteViewModel::new(wish(4));

        vm.confirm_delete(&svc, 4).await;

        assert!(vm.outcome().is_none());
        assert!(!vm.is_deleting());
        assert!(vm.last_error().is_some());
    }

    #[test]
    fn clear_dismisses() {
        let mut vm = DeleteViewModel::new(wish(4));
        vm.clear();
        assert_eq!(vm.outcome(), Some(&ModalOutcome::Dismissed));
        assert!(!vm.begin_delete());
    }
}
