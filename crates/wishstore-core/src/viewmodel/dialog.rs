// Create/edit dialog.
//
//   Editing ──begin_submit──▶ Saving ──finish(Ok)──▶ Closed(saved)
//      ▲                         │
//      └──────finish(Err)────────┘
//
// While saving, further submits are ignored. A draft without an id is
// created; one with an id is updated. On success the server's copy is
// broadcast on the entity's update topic before the dialog closes.

use tracing::{debug, warn};
use wishstore_api::{Entity, FieldError, Owned, OwnerOption};

use crate::bus::EventBus;
use crate::error::CoreError;
use crate::service::EntityService;
use crate::viewmodel::ModalOutcome;

/// The single server call a submit resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveCommand<T> {
    Create(T),
    Update(T),
}

impl<T> SaveCommand<T> {
    pub fn entity(&self) -> &T {
        match self {
            Self::Create(e) | Self::Update(e) => e,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState<T> {
    Editing,
    Saving,
    Closed(ModalOutcome<T>),
}

#[derive(Debug)]
pub struct DialogViewModel<T: Entity> {
    draft: T,
    state: DialogState<T>,
    last_error: Option<CoreError>,
    field_errors: Vec<FieldError>,
    owners: Vec<OwnerOption>,
}

impl<T: Entity> DialogViewModel<T> {
    /// Open a dialog over `entity`: a blank draft for "new", a resolved
    /// copy for "edit".
    pub fn new(entity: T) -> Self {
        Self {
            draft: entity,
            state: DialogState::Editing,
            last_error: None,
            field_errors: Vec::new(),
            owners: Vec::new(),
        }
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    /// Mutable access for form edits. Edits are refused once saving starts.
    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match self.state {
            DialogState::Editing => Some(&mut self.draft),
            _ => None,
        }
    }

    pub fn state(&self) -> &DialogState<T> {
        &self.state
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, DialogState::Saving)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, DialogState::Closed(_))
    }

    pub fn outcome(&self) -> Option<&ModalOutcome<T>> {
        match &self.state {
            DialogState::Closed(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Option<ModalOutcome<T>> {
        match self.state {
            DialogState::Closed(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The error from the most recent failed save, if the dialog is still open.
    pub fn last_error(&self) -> Option<&CoreError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<CoreError> {
        self.last_error.take()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn owner_options(&self) -> &[OwnerOption] {
        &self.owners
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Validate the draft and enter `Saving`.
    ///
    /// Returns `Ok(None)` when a save is already in flight or the dialog has
    /// closed, and `Err(ValidationFailed)` when the draft is invalid (the
    /// dialog stays in `Editing`).
    pub fn begin_submit(&mut self) -> Result<Option<SaveCommand<T>>, CoreError> {
        if !matches!(self.state, DialogState::Editing) {
            debug!(entity = T::NAME, "submit ignored: not editing");
            return Ok(None);
        }

        if let Err(errors) = self.draft.validate() {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            self.field_errors = errors;
            return Err(CoreError::ValidationFailed { message });
        }

        self.field_errors.clear();
        self.last_error = None;
        self.state = DialogState::Saving;

        let draft = self.draft.clone();
        Ok(Some(if draft.id().is_some() {
            SaveCommand::Update(draft)
        } else {
            SaveCommand::Create(draft)
        }))
    }

    /// Apply the result of the save issued by [`begin_submit`](Self::begin_submit).
    pub fn finish(&mut self, result: Result<T, CoreError>, bus: &EventBus) {
        if !self.is_saving() {
            debug!(entity = T::NAME, "save result ignored: not saving");
            return;
        }
        match result {
            Ok(saved) => {
                bus.publish(&saved);
                self.draft = saved.clone();
                self.state = DialogState::Closed(ModalOutcome::Closed(saved));
            }
            Err(e) => {
                warn!(entity = T::NAME, error = %e, "save failed");
                self.last_error = Some(e);
                self.state = DialogState::Editing;
            }
        }
    }

    /// Submit the draft through `service` and apply the outcome.
    ///
    /// Save failures are absorbed into [`last_error`](Self::last_error);
    /// only validation failures are returned.
    pub async fn submit<S: EntityService<T>>(
        &mut self,
        service: &S,
        bus: &EventBus,
    ) -> Result<(), CoreError> {
        let Some(command) = self.begin_submit()? else {
            return Ok(());
        };
        let result = match &command {
            SaveCommand::Create(entity) => service.create(entity).await,
            SaveCommand::Update(entity) => service.update(entity).await,
        };
        self.finish(result, bus);
        Ok(())
    }

    /// Close without saving.
    pub fn dismiss(&mut self) {
        if self.is_saving() {
            debug!(entity = T::NAME, "dismissed while saving; result will be dropped");
        }
        self.state = DialogState::Closed(ModalOutcome::Dismissed);
    }
}

// ── Owner selection ──────────────────────────────────────────────────

impl<T: Owned> DialogViewModel<T> {
    /// Load the selectable owners (users for a wishlist, wishlists for a wish).
    pub async fn load_owners<S: EntityService<T::Owner>>(
        &mut self,
        service: &S,
    ) -> Result<(), CoreError> {
        let owners = service.query().await?;
        self.set_owner_options(&owners);
        Ok(())
    }

    pub fn set_owner_options(&mut self, owners: &[T::Owner]) {
        self.owners = owners.iter().filter_map(OwnerOption::of).collect();
    }

    /// Point the draft at the owner with `id`, or clear it with `None`.
    /// Unknown ids are ignored.
    pub fn select_owner(&mut self, id: Option<i64>) {
        let option = match id {
            Some(id) => match self.owners.iter().find(|o| o.id == id) {
                Some(o) => Some(o.clone()),
                None => return,
            },
            None => None,
        };
        if let Some(draft) = self.draft_mut() {
            draft.assign_owner(option.as_ref());
        }
    }

    /// Index of the draft's current owner within the options.
    pub fn selected_owner(&self) -> Option<usize> {
        let id = self.draft.owner_id()?;
        self.owners.iter().position(|o| o.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use wishstore_api::{User, Wish, Wishlist};

    use super::*;
    use crate::testing::MockService;

    fn draft(name: &str) -> Wishlist {
        let mut wl = Wishlist::blank();
        wl.name = Some(name.into());
        wl.hidden = Some(false);
        wl
    }

    #[tokio::test]
    async fn new_draft_issues_exactly_one_create() {
        let svc = MockService::<Wishlist>::new(Vec::new());
        let bus = EventBus::new("storeApp");
        let mut vm = DialogViewModel::new(draft("Books"));

        vm.submit(&svc, &bus).await.unwrap();

        assert_eq!(MockService::<Wishlist>::count(&svc.creates), 1);
        assert_eq!(MockService::<Wishlist>::count(&svc.updates), 0);
        assert!(vm.is_closed());
    }

    #[tokio::test]
    async fn existing_entity_issues_exactly_one_update() {
        let mut existing = draft("Books");
        existing.id = Some(3);
        let svc = MockService::new(vec![existing.clone()]);
        let bus = EventBus::new("storeApp");
        let mut vm = DialogViewModel::new(existing);

        vm.submit(&svc, &bus).await.unwrap();

        assert_eq!(MockService::<Wishlist>::count(&svc.updates), 1);
        assert_eq!(MockService::<Wishlist>::count(&svc.creates), 0);
    }

    #[tokio::test]
    async fn success_broadcasts_server_copy_and_closes_with_it() {
        let svc = MockService::<Wishlist>::new(Vec::new());
        let bus = EventBus::new("storeApp");
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let _sub = bus.subscribe::<Wishlist, _>(move |wl| sink.lock().unwrap().push(wl.clone()));

        let mut vm = DialogViewModel::new(draft("Books"));
        vm.submit(&svc, &bus).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].id, Some(100));
        assert_eq!(vm.outcome(), Some(&ModalOutcome::Closed(received[0].clone())));
        assert!(!vm.is_saving());
    }

    #[tokio::test]
    async fn failure_clears_saving_and_keeps_dialog_open() {
        let svc = MockService::<Wishlist>::failing();
        let bus = EventBus::new("storeApp");
        let mut vm = DialogViewModel::new(draft("Books"));

        vm.submit(&svc, &bus).await.unwrap();

        assert_eq!(vm.state(), &DialogState::Editing);
        assert!(vm.last_error().is_some());
        assert_eq!(bus.listener_count("storeApp:wishlistUpdate"), 0);

        // Retry succeeds once the server recovers.
        svc.fail.store(false, std::sync::atomic::Ordering::SeqCst);
        vm.submit(&svc, &bus).await.unwrap();
        assert!(vm.is_closed());
        assert!(vm.last_error().is_none());
    }

    #[test]
    fn saving_flag_blocks_duplicate_submission() {
        let mut vm = DialogViewModel::new(draft("Books"));

        let first = vm.begin_submit().unwrap();
        let second = vm.begin_submit().unwrap();

        assert!(matches!(first, Some(SaveCommand::Create(_))));
        assert!(second.is_none());
        assert!(vm.is_saving());
        assert!(vm.draft_mut().is_none());
    }

    #[test]
    fn invalid_draft_stays_editing_with_field_errors() {
        let mut vm = DialogViewModel::new(Wish::blank());

        let err = vm.begin_submit().unwrap_err();

        assert!(matches!(err, CoreError::ValidationFailed { .. }));
        assert_eq!(vm.state(), &DialogState::Editing);
        let fields: Vec<_> = vm.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["productId", "price"]);
    }

    #[test]
    fn create_command_carries_converted_date() {
        let mut wl = draft("Books");
        wl.creation_date = NaiveDate::from_ymd_opt(2016, 11, 9);
        let mut vm = DialogViewModel::new(wl);

        let cmd = vm.begin_submit().unwrap().unwrap();
        let wire = serde_json::to_value(cmd.entity()).unwrap();

        assert_eq!(wire["creationDate"], "2016-11-09");
    }

    #[test]
    fn dismiss_closes_without_result() {
        let mut vm = DialogViewModel::new(draft("Books"));
        vm.dismiss();
        assert_eq!(vm.into_outcome(), Some(ModalOutcome::Dismissed));
    }

    #[test]
    fn late_result_after_dismiss_is_dropped() {
        let bus = EventBus::new("storeApp");
        let mut vm = DialogViewModel::new(draft("Books"));
        vm.begin_submit().unwrap();
        vm.dismiss();

        let mut saved = draft("Books");
        saved.id = Some(1);
        vm.finish(Ok(saved), &bus);

        assert_eq!(vm.outcome(), Some(&ModalOutcome::Dismissed));
    }

    #[tokio::test]
    async fn owner_selection_updates_the_draft() {
        let users = MockService::new(vec![
            User {
                id: Some(1),
                login: "admin".into(),
                first_name: None,
                last_name: None,
                email: None,
            },
            User {
                id: Some(2),
                login: "user".into(),
                first_name: None,
                last_name: None,
                email: None,
            },
        ]);
        let mut vm = DialogViewModel::new(draft("Books"));

        vm.load_owners(&users).await.unwrap();
        vm.select_owner(Some(2));

        assert_eq!(vm.owner_options().len(), 2);
        assert_eq!(vm.selected_owner(), Some(1));
        assert_eq!(vm.draft().user.as_ref().map(|u| u.id), Some(2));

        vm.select_owner(Some(42));
        assert_eq!(vm.draft().owner_id(), Some(2));

        vm.select_owner(None);
        assert_eq!(vm.draft().owner_id(), None);
    }
}
