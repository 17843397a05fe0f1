//! Screen implementations. Each entity gets one panel: a list, the detail
//! view of one row, and the modal overlays opened over them.

pub mod confirm;
pub mod detail;
pub mod form;
pub mod list;

use std::future::Future;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use wishstore_core::{
    CoreError, EntityService, PendingTransition, PreviousState, RouteKind, SaveCommand, StateParams,
    Storefront, Wish, Wishlist,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::record::{AnyRecord, Record};
use crate::screen::ScreenId;

use self::confirm::DeleteOverlay;
use self::detail::DetailScreen;
use self::form::{FormInput, FormOverlay};
use self::list::ListScreen;

/// Create one panel per tab.
pub fn create_screens(store: &Storefront) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Wishlists,
            Box::new(EntityPanel::<Wishlist>::new(store.clone())),
        ),
        (
            ScreenId::Wishes,
            Box::new(EntityPanel::<Wish>::new(store.clone())),
        ),
    ]
}

pub struct EntityPanel<T: Record> {
    store: Storefront,
    action_tx: Option<UnboundedSender<Action>>,
    list: ListScreen<T>,
    detail: Option<DetailScreen<T>>,
    form: Option<FormOverlay<T>>,
    confirm: Option<DeleteOverlay<T>>,
    focused: bool,
    /// Tags each overlay so results for a closed one can be told apart.
    next_ticket: u64,
}

impl<T: Record> EntityPanel<T> {
    pub fn new(store: Storefront) -> Self {
        Self {
            store,
            action_tx: None,
            list: ListScreen::new(),
            detail: None,
            form: None,
            confirm: None,
            focused: false,
            next_ticket: 0,
        }
    }

    fn ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Run `task` in the background and dispatch the action it yields.
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let Some(tx) = self.action_tx.clone() else {
            warn!(entity = T::NAME, "panel not initialized; task dropped");
            return;
        };
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn load(&mut self) {
        self.list.begin_load();
        let service = self.store.resource::<T>();
        self.spawn(async move {
            let result = EntityService::query(&service).await.map(T::pack);
            Action::ListLoaded {
                entity: T::NAME,
                result,
            }
        });
    }

    fn load_owners(&self, ticket: u64) {
        let service = self.store.resource::<T::Owner>();
        self.spawn(async move {
            let result = EntityService::query(&service).await.map(T::pack_owners);
            Action::OwnersLoaded {
                entity: T::NAME,
                ticket,
                result,
            }
        });
    }

    fn save(&self, command: SaveCommand<T>, ticket: u64) {
        let service = self.store.resource::<T>();
        self.spawn(async move {
            let result = match &command {
                SaveCommand::Create(entity) => EntityService::create(&service, entity).await,
                SaveCommand::Update(entity) => EntityService::update(&service, entity).await,
            };
            Action::Saved {
                entity: T::NAME,
                ticket,
                result: result.map(T::wrap),
            }
        });
    }

    fn delete(&self, id: i64, ticket: u64) {
        let service = self.store.resource::<T>();
        self.spawn(async move {
            Action::Deleted {
                entity: T::NAME,
                ticket,
                result: EntityService::delete(&service, id).await,
            }
        });
    }

    fn go(kind: RouteKind, id: Option<i64>) -> Action {
        Action::Go {
            state: kind.state_name(T::NAME),
            params: StateParams { id },
        }
    }

    fn close_overlays(&mut self) {
        self.form = None;
        self.confirm = None;
    }

    // ── Navigation ──────────────────────────────────────────────────

    fn enter(&mut self, pending: PendingTransition, record: Option<AnyRecord>) {
        self.close_overlays();
        if pending.kind == RouteKind::List {
            self.detail = None;
            self.load();
            return;
        }

        let Some(entity) = record.and_then(T::unwrap) else {
            warn!(state = %pending.to, "entered without a resolved {}", T::NAME);
            return;
        };
        match pending.kind {
            RouteKind::Detail => {
                // Re-entering from one of its own modals must not point Back at itself.
                let previous = pending
                    .previous
                    .filter(|p| p.name != pending.to)
                    .unwrap_or_else(|| self.list_previous());
                self.detail = Some(DetailScreen::new(entity, previous, self.store.bus()));
            }
            RouteKind::New | RouteKind::Edit | RouteKind::DetailEdit => {
                if pending.kind != RouteKind::DetailEdit && !self.list.is_loaded() {
                    self.load();
                }
                let ticket = self.ticket();
                self.form = Some(FormOverlay::new(entity, ticket));
                self.load_owners(ticket);
            }
            RouteKind::Delete => {
                if !self.list.is_loaded() {
                    self.load();
                }
                let ticket = self.ticket();
                self.confirm = Some(DeleteOverlay::new(entity, ticket));
            }
            RouteKind::List => {}
        }
    }

    fn list_previous(&self) -> PreviousState {
        let name = RouteKind::List.state_name(T::NAME);
        let url = self
            .store
            .registry()
            .href(&name, StateParams::default())
            .unwrap_or_default();
        PreviousState {
            name,
            params: StateParams::default(),
            url,
        }
    }

    /// Back on `pending` after a modal closed.
    fn return_to(&mut self, pending: PendingTransition, reload: bool) -> Option<Action> {
        self.close_overlays();
        match pending.kind {
            RouteKind::List => {
                self.detail = None;
                if reload || !self.list.is_loaded() {
                    self.load();
                }
                None
            }
            RouteKind::Detail
                if self.detail.as_ref().and_then(DetailScreen::id) == pending.params.id =>
            {
                None
            }
            _ => Some(Action::Go {
                state: pending.to,
                params: pending.params,
            }),
        }
    }

    // ── Keys ────────────────────────────────────────────────────────

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.form.as_mut()?;
        match form.handle_key(key) {
            FormInput::Handled => None,
            FormInput::Dismiss => {
                form.dismiss();
                self.form = None;
                Some(Action::ModalExit { closed: false })
            }
            FormInput::Submit => {
                let ticket = form.ticket();
                if let Some(command) = form.submit() {
                    self.save(command, ticket);
                }
                None
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        let confirm = self.confirm.as_mut()?;
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                let ticket = confirm.ticket();
                if let Some(id) = confirm.begin() {
                    self.delete(id, ticket);
                }
                None
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                confirm.cancel();
                self.confirm = None;
                Some(Action::ModalExit { closed: false })
            }
            _ => None,
        }
    }

    fn handle_detail_key(&self, key: KeyEvent) -> Option<Action> {
        let detail = self.detail.as_ref()?;
        match key.code {
            KeyCode::Char('e') => Some(Self::go(RouteKind::DetailEdit, detail.id())),
            KeyCode::Esc | KeyCode::Backspace => {
                let previous = detail.previous_state();
                Some(Action::Go {
                    state: previous.name.clone(),
                    params: previous.params,
                })
            }
            _ => None,
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        let selected = self.list.selected().and_then(T::id);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.list.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.list.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.list.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.list.select_last(),
            KeyCode::Char('r') => self.load(),
            KeyCode::Char('n') => return Some(Self::go(RouteKind::New, None)),
            KeyCode::Enter => return selected.map(|id| Self::go(RouteKind::Detail, Some(id))),
            KeyCode::Char('e') => return selected.map(|id| Self::go(RouteKind::Edit, Some(id))),
            KeyCode::Char('d') => return selected.map(|id| Self::go(RouteKind::Delete, Some(id))),
            _ => {}
        }
        None
    }

    // ── Results ─────────────────────────────────────────────────────

    fn stale(what: &str, ticket: u64) {
        debug!(entity = T::NAME, ticket, "{what} result for a closed overlay dropped");
    }

    fn on_saved(&mut self, ticket: u64, result: Result<AnyRecord, CoreError>) -> Option<Action> {
        let Some(form) = self.form.as_mut().filter(|f| f.ticket() == ticket) else {
            Self::stale("save", ticket);
            return None;
        };
        let result = result.and_then(|record| {
            T::unwrap(record).ok_or_else(|| {
                warn!(entity = T::NAME, ticket, "save returned a different record type");
                CoreError::Internal(format!("save returned a record that is not a {}", T::NAME))
            })
        });
        if let Err(e) = &result {
            self.store.alerts().error(e);
        }
        if form.finish(result, self.store.bus()) {
            self.form = None;
            return Some(Action::ModalExit { closed: true });
        }
        None
    }

    fn on_deleted(
        &mut self,
        ticket: u64,
        result: Result<(), CoreError>,
    ) -> Option<Action> {
        let Some(confirm) = self.confirm.as_mut().filter(|c| c.ticket() == ticket) else {
            Self::stale("delete", ticket);
            return None;
        };
        if let Err(e) = &result {
            self.store.alerts().error(e);
        }
        if confirm.finish(result) {
            self.confirm = None;
            return Some(Action::ModalExit { closed: true });
        }
        None
    }
}

impl<T: Record> Component for EntityPanel<T> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = if self.form.is_some() {
            self.handle_form_key(key)
        } else if self.confirm.is_some() {
            self.handle_confirm_key(key)
        } else if self.detail.is_some() {
            self.handle_detail_key(key)
        } else {
            self.handle_list_key(key)
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let follow_up = match action {
            Action::Enter { pending, record } => {
                self.enter(pending, record);
                None
            }
            Action::Return { pending, reload } => self.return_to(pending, reload),
            Action::ListLoaded { result, .. } => {
                self.list
                    .apply(result.map(|records| T::unpack(records).unwrap_or_default()));
                None
            }
            Action::OwnersLoaded { ticket, result, .. } => {
                match self.form.as_mut().filter(|f| f.ticket() == ticket) {
                    None => Self::stale("owner", ticket),
                    Some(form) => match result {
                        Ok(records) => {
                            if let Some(owners) = T::unpack_owners(records) {
                                form.set_owners(&owners);
                            }
                        }
                        Err(e) => {
                            warn!(entity = T::NAME, error = %e, "failed to load owners");
                            return Ok(Some(Action::Notify(Notification::error(format!(
                                "Could not load owners: {e}"
                            )))));
                        }
                    },
                }
                None
            }
            Action::Saved { ticket, result, .. } => self.on_saved(ticket, result),
            Action::Deleted { ticket, result, .. } => self.on_deleted(ticket, result),
            _ => None,
        };
        Ok(follow_up)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match &self.detail {
            Some(detail) => detail.render(frame, area),
            None => self.list.render(frame, area, self.focused),
        }
        if let Some(form) = &self.form {
            form.render(frame, area);
        }
        if let Some(confirm) = &self.confirm {
            confirm.render(frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_some() || self.confirm.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        T::NAME
    }
}
