// ── Navigator ──
//
// Drives transitions over the `StateRegistry`: authorizes the target
// against the signed-in principal, captures where the user came from,
// and hands back a pending transition. The caller runs the resolve step
// (see `resolve`) and then commits. Modal states report their outcome via
// `exit_modal`, which yields the follow-up transition.

use std::sync::Arc;

use tracing::{debug, info};
use wishstore_api::Account;

use crate::error::CoreError;
use crate::routes::{ExitTo, Resolve, RouteKind, StateParams, StateRegistry};
use crate::viewmodel::ModalOutcome;

/// The authenticated account and its authorities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    pub login: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn new(login: impl Into<String>, authorities: &[&str]) -> Self {
        Self {
            login: login.into(),
            authorities: authorities.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    pub fn has_any_authority(&self, required: &[String]) -> bool {
        required.iter().any(|r| self.authorities.contains(r))
    }
}

impl From<&Account> for Principal {
    fn from(account: &Account) -> Self {
        Self {
            login: account.login.clone(),
            authorities: account.authorities.clone(),
        }
    }
}

/// The state a detail view returns to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousState {
    pub name: String,
    pub params: StateParams,
    pub url: String,
}

/// The state currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveState {
    pub name: String,
    pub params: StateParams,
}

/// An authorized transition waiting for its resolve step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    pub to: String,
    pub params: StateParams,
    pub entity: String,
    pub kind: RouteKind,
    pub resolve: Resolve,
    pub previous: Option<PreviousState>,
}

/// Where to go after a modal closed or was dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalExit {
    pub to: String,
    pub params: StateParams,
    /// Refetch the target's data.
    pub reload: bool,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    registry: Arc<StateRegistry>,
    principal: Option<Principal>,
    current: Option<ActiveState>,
}

impl Navigator {
    pub fn new(registry: Arc<StateRegistry>) -> Self {
        Self {
            registry,
            principal: None,
            current: None,
        }
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn set_principal(&mut self, principal: Option<Principal>) {
        self.principal = principal;
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn current(&self) -> Option<&ActiveState> {
        self.current.as_ref()
    }

    pub fn current_url(&self) -> Option<String> {
        let current = self.current.as_ref()?;
        self.registry.href(&current.name, current.params).ok()
    }

    /// Authorize a transition to `name` and describe what it needs resolved.
    pub fn go(&self, name: &str, params: StateParams) -> Result<PendingTransition, CoreError> {
        let state = self.registry.get(name)?;
        let Some((entity, kind)) = state.route.clone() else {
            return Err(CoreError::InvalidTransition {
                message: format!("'{name}' is abstract"),
            });
        };

        if !state.authorities.is_empty() {
            let Some(principal) = &self.principal else {
                return Err(CoreError::Unauthenticated);
            };
            if !principal.has_any_authority(&state.authorities) {
                return Err(CoreError::Forbidden {
                    state: name.into(),
                    required: state.authorities.join(", "),
                });
            }
        }

        if kind.needs_id() && params.id.is_none() {
            return Err(CoreError::MissingParam {
                state: name.into(),
                param: "id",
            });
        }

        let previous = matches!(state.resolve, Resolve::EntityWithPrevious)
            .then(|| self.previous_state(&entity));

        debug!(to = name, %params, "transition pending");
        Ok(PendingTransition {
            to: name.to_owned(),
            params,
            entity,
            kind,
            resolve: state.resolve,
            previous,
        })
    }

    /// Authorize a transition addressed by URL.
    pub fn go_url(&self, url: &str) -> Result<PendingTransition, CoreError> {
        let matched = self
            .registry
            .match_url(url)
            .ok_or_else(|| CoreError::UnknownState { name: url.into() })?;
        self.go(&matched.state, matched.params)
    }

    /// Activate a transition once its resolve step has completed.
    pub fn commit(&mut self, pending: &PendingTransition) {
        info!(state = %pending.to, params = %pending.params, "entered state");
        self.current = Some(ActiveState {
            name: pending.to.clone(),
            params: pending.params,
        });
    }

    /// The current state as a return target, or `entity`'s list state if
    /// nothing is active yet.
    pub fn previous_state(&self, entity: &str) -> PreviousState {
        let (name, params) = match &self.current {
            Some(current) => (current.name.clone(), current.params),
            None => (RouteKind::List.state_name(entity), StateParams::default()),
        };
        let url = self.registry.href(&name, params).unwrap_or_default();
        PreviousState { name, params, url }
    }

    /// Target of the active modal state for `outcome`.
    pub fn exit_modal<T>(&self, outcome: &ModalOutcome<T>) -> Result<ModalExit, CoreError> {
        let current = self.current.as_ref().ok_or_else(|| CoreError::InvalidTransition {
            message: "no active state".into(),
        })?;
        let state = self.registry.get(&current.name)?;
        let exits = state
            .exits
            .as_ref()
            .ok_or_else(|| CoreError::InvalidTransition {
                message: format!("'{}' is not a modal state", current.name),
            })?;

        let target = if outcome.is_closed() {
            &exits.on_close
        } else {
            &exits.on_dismiss
        };
        let (to, params) = match &target.to {
            ExitTo::Parent => {
                let parent = state.parent.clone().ok_or_else(|| CoreError::InvalidTransition {
                    message: format!("'{}' has no parent", current.name),
                })?;
                (parent, current.params)
            }
            ExitTo::State(name) => (name.clone(), StateParams::default()),
        };

        debug!(from = %current.name, %to, reload = target.reload, "modal exit");
        Ok(ModalExit {
            to,
            params,
            reload: target.reload,
        })
    }
}
