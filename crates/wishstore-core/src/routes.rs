// ── State table ──
//
// Every entity contributes six states hanging off the abstract `entity`
// root. A state's full URL is the concatenation of its ancestors' URL
// segments; `{id}` placeholders are filled from `StateParams`.
//
//   wishlist                 /wishlist
//   wishlist-detail          /wishlist/wishlist/{id}
//   wishlist-detail.edit     /wishlist/wishlist/{id}/detail/edit   (modal)
//   wishlist.new             /wishlist/new                         (modal)
//   wishlist.edit            /wishlist/{id}/edit                   (modal)
//   wishlist.delete          /wishlist/{id}/delete                 (modal)

use std::fmt;

use indexmap::IndexMap;
use strum::{Display, EnumIter, IntoEnumIterator};
use wishstore_api::Entity;

use crate::error::CoreError;

/// Name of the abstract root state every entity hangs off.
pub const ROOT_STATE: &str = "entity";

/// Authority every entity state requires.
pub const ROLE_USER: &str = "ROLE_USER";

// ── State vocabulary ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum RouteKind {
    List,
    Detail,
    DetailEdit,
    New,
    Edit,
    Delete,
}

impl RouteKind {
    /// State name for this kind under `entity`, e.g. `wishlist-detail.edit`.
    pub fn state_name(self, entity: &str) -> String {
        match self {
            Self::List => entity.to_owned(),
            Self::Detail => format!("{entity}-detail"),
            Self::DetailEdit => format!("{entity}-detail.edit"),
            Self::New => format!("{entity}.new"),
            Self::Edit => format!("{entity}.edit"),
            Self::Delete => format!("{entity}.delete"),
        }
    }

    pub fn is_modal(self) -> bool {
        matches!(self, Self::DetailEdit | Self::New | Self::Edit | Self::Delete)
    }

    pub fn needs_id(self) -> bool {
        !matches!(self, Self::List | Self::New)
    }
}

/// Parameters carried by a state. Only `id` is ever used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StateParams {
    pub id: Option<i64>,
}

impl StateParams {
    pub fn id(id: i64) -> Self {
        Self { id: Some(id) }
    }
}

impl fmt::Display for StateParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{{id: {id}}}"),
            None => f.write_str("{}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalSize {
    Md,
    Lg,
}

/// Where a state renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewDef {
    /// Replaces the main content area.
    Content { template: String },
    /// Opens over the current content.
    Modal {
        template: String,
        size: ModalSize,
        /// Clicking outside the dialog does not dismiss it.
        static_backdrop: bool,
    },
    /// Abstract states render nothing of their own.
    None,
}

/// Pre-fetch run before a state activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolve {
    None,
    /// A fresh draft with every field unset.
    Blank,
    /// The entity named by the `id` param.
    EntityById,
    /// The entity by id plus the state the user came from.
    EntityWithPrevious,
}

/// Where a modal goes when it closes or is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitTo {
    /// The parent state (`^`), keeping current params.
    Parent,
    /// A named state, with no params.
    State(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitTarget {
    pub to: ExitTo,
    /// Re-run the target's data load.
    pub reload: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalExits {
    pub on_close: ExitTarget,
    pub on_dismiss: ExitTarget,
}

// ── State definitions ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDef {
    pub name: String,
    pub parent: Option<String>,
    /// Entity name and route kind; `None` for abstract states.
    pub route: Option<(String, RouteKind)>,
    /// This state's own URL segment.
    pub url: String,
    pub authorities: Vec<String>,
    /// Translation key for the window title.
    pub page_title: Option<String>,
    pub view: ViewDef,
    pub resolve: Resolve,
    pub exits: Option<ModalExits>,
}

impl StateDef {
    pub fn kind(&self) -> Option<RouteKind> {
        self.route.as_ref().map(|(_, kind)| *kind)
    }

    pub fn entity(&self) -> Option<&str> {
        self.route.as_ref().map(|(entity, _)| entity.as_str())
    }

    pub fn is_abstract(&self) -> bool {
        self.route.is_none()
    }

    fn root() -> Self {
        Self {
            name: ROOT_STATE.into(),
            parent: None,
            route: None,
            url: String::new(),
            authorities: Vec::new(),
            page_title: None,
            view: ViewDef::None,
            resolve: Resolve::None,
            exits: None,
        }
    }

    /// Build the state of `kind` for entity `name` (collection `collection`).
    pub fn for_entity(app: &str, name: &str, collection: &str, kind: RouteKind) -> Self {
        let list = RouteKind::List.state_name(name);
        let dialog = || ViewDef::Modal {
            template: format!("{name}-dialog.html"),
            size: ModalSize::Lg,
            static_backdrop: true,
        };
        let back_to_list = |reload| ExitTarget {
            to: ExitTo::State(list.clone()),
            reload,
        };
        let parent = ExitTarget {
            to: ExitTo::Parent,
            reload: false,
        };

        let (parent_state, url, page_title, view, resolve, exits) = match kind {
            RouteKind::List => (
                ROOT_STATE.to_owned(),
                format!("/{name}"),
                Some(format!("{app}.{name}.home.title")),
                ViewDef::Content {
                    template: format!("{collection}.html"),
                },
                Resolve::None,
                None,
            ),
            RouteKind::Detail => (
                list.clone(),
                format!("/{name}/{{id}}"),
                Some(format!("{app}.{name}.detail.title")),
                ViewDef::Content {
                    template: format!("{name}-detail.html"),
                },
                Resolve::EntityWithPrevious,
                None,
            ),
            RouteKind::DetailEdit => (
                RouteKind::Detail.state_name(name),
                "/detail/edit".to_owned(),
                None,
                dialog(),
                Resolve::EntityById,
                Some(ModalExits {
                    on_close: parent.clone(),
                    on_dismiss: parent.clone(),
                }),
            ),
            RouteKind::New => (
                list.clone(),
                "/new".to_owned(),
                None,
                dialog(),
                Resolve::Blank,
                Some(ModalExits {
                    on_close: back_to_list(true),
                    on_dismiss: back_to_list(false),
                }),
            ),
            RouteKind::Edit => (
                list.clone(),
                "/{id}/edit".to_owned(),
                None,
                dialog(),
                Resolve::EntityById,
                Some(ModalExits {
                    on_close: back_to_list(true),
                    on_dismiss: parent.clone(),
                }),
            ),
            RouteKind::Delete => (
                list.clone(),
                "/{id}/delete".to_owned(),
                None,
                ViewDef::Modal {
                    template: format!("{name}-delete-dialog.html"),
                    size: ModalSize::Md,
                    static_backdrop: false,
                },
                Resolve::EntityById,
                Some(ModalExits {
                    on_close: back_to_list(true),
                    on_dismiss: parent.clone(),
                }),
            ),
        };

        Self {
            name: kind.state_name(name),
            parent: Some(parent_state),
            route: Some((name.to_owned(), kind)),
            url,
            authorities: vec![ROLE_USER.to_owned()],
            page_title,
            view,
            resolve,
            exits,
        }
    }
}

// ── Registry ─────────────────────────────────────────────────────────

/// A URL matched against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatch {
    pub state: String,
    pub params: StateParams,
}

/// All declared states, in declaration order.
#[derive(Debug, Clone)]
pub struct StateRegistry {
    states: IndexMap<String, StateDef>,
}

impl StateRegistry {
    pub fn new() -> Self {
        let mut states = IndexMap::new();
        states.insert(ROOT_STATE.to_owned(), StateDef::root());
        Self { states }
    }

    /// Declare the six states of entity `T`.
    pub fn register<T: Entity>(&mut self, app: &str) -> &mut Self {
        for kind in RouteKind::iter() {
            self.declare(StateDef::for_entity(app, T::NAME, T::COLLECTION, kind));
        }
        self
    }

    pub fn declare(&mut self, state: StateDef) {
        self.states.insert(state.name.clone(), state);
    }

    /// Registry with the wishlist and wish states.
    pub fn storefront(app: &str) -> Self {
        let mut registry = Self::new();
        registry
            .register::<wishstore_api::Wishlist>(app)
            .register::<wishstore_api::Wish>(app);
        registry
    }

    pub fn get(&self, name: &str) -> Result<&StateDef, CoreError> {
        self.states
            .get(name)
            .ok_or_else(|| CoreError::UnknownState { name: name.into() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Concrete (non-abstract) states in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &StateDef> {
        self.states.values().filter(|s| !s.is_abstract())
    }

    /// The state and its ancestors, root first.
    pub fn lineage(&self, name: &str) -> Result<Vec<&StateDef>, CoreError> {
        let mut chain = Vec::new();
        let mut cursor = Some(name);
        while let Some(current) = cursor {
            let state = self.get(current)?;
            chain.push(state);
            cursor = state.parent.as_deref();
        }
        chain.reverse();
        Ok(chain)
    }

    /// URL pattern with `{id}` placeholders, e.g. `/wishlist/{id}/edit`.
    pub fn url_pattern(&self, name: &str) -> Result<String, CoreError> {
        Ok(self
            .lineage(name)?
            .iter()
            .map(|s| s.url.as_str())
            .collect())
    }

    /// Concrete URL for `name` with `params` substituted.
    pub fn href(&self, name: &str, params: StateParams) -> Result<String, CoreError> {
        let pattern = self.url_pattern(name)?;
        if !pattern.contains("{id}") {
            return Ok(pattern);
        }
        let id = params.id.ok_or_else(|| CoreError::MissingParam {
            state: name.into(),
            param: "id",
        })?;
        Ok(pattern.replace("{id}", &id.to_string()))
    }

    /// Resolve a deep link to the state it addresses.
    pub fn match_url(&self, url: &str) -> Option<UrlMatch> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        let wanted: Vec<&str> = path.split('/').collect();

        self.states().find_map(|state| {
            let pattern = self.url_pattern(&state.name).ok()?;
            let params = match_segments(&pattern, &wanted)?;
            Some(UrlMatch {
                state: state.name.clone(),
                params,
            })
        })
    }

    /// Requested page title key for `name`: its own, or the nearest ancestor's.
    pub fn page_title(&self, name: &str) -> Option<&str> {
        self.lineage(name)
            .ok()?
            .into_iter()
            .rev()
            .find_map(|s| s.page_title.as_deref())
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn match_segments(pattern: &str, wanted: &[&str]) -> Option<StateParams> {
    let expected: Vec<&str> = pattern.split('/').collect();
    if expected.len() != wanted.len() {
        return None;
    }
    let mut params = StateParams::default();
    for (exp, got) in expected.iter().zip(wanted) {
        if *exp == "{id}" {
            params.id = Some(got.parse().ok()?);
        } else if exp != got {
            return None;
        }
    }
    Some(params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn registry() -> StateRegistry {
        StateRegistry::storefront("storeApp")
    }

    #[test]
    fn declares_six_states_per_entity() {
        let names: Vec<_> = registry().states().map(|s| s.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                "wishlist",
                "wishlist-detail",
                "wishlist-detail.edit",
                "wishlist.new",
                "wishlist.edit",
                "wishlist.delete",
                "wish",
                "wish-detail",
                "wish-detail.edit",
                "wish.new",
                "wish.edit",
                "wish.delete",
            ]
        );
    }

    #[test]
    fn urls_concatenate_ancestor_segments() {
        let reg = registry();
        let id = StateParams::id(5);
        assert_eq!(reg.href("wishlist", id).unwrap(), "/wishlist");
        assert_eq!(reg.href("wishlist-detail", id).unwrap(), "/wishlist/wishlist/5");
        assert_eq!(
            reg.href("wishlist-detail.edit", id).unwrap(),
            "/wishlist/wishlist/5/detail/edit"
        );
        assert_eq!(reg.href("wishlist.new", id).unwrap(), "/wishlist/new");
        assert_eq!(reg.href("wish.edit", id).unwrap(), "/wish/5/edit");
        assert_eq!(reg.href("wish.delete", id).unwrap(), "/wish/5/delete");
    }

    #[test]
    fn href_and_match_url_agree_for_every_state() {
        let reg = registry();
        for state in reg.states() {
            let params = if state.kind().is_some_and(RouteKind::needs_id) {
                StateParams::id(42)
            } else {
                StateParams::default()
            };
            let url = reg.href(&state.name, params).unwrap();
            let matched = reg.match_url(&url).unwrap();
            assert_eq!(matched.state, state.name, "url {url}");
            assert_eq!(matched.params, params);
        }
    }

    #[test]
    fn href_without_required_id_fails() {
        let err = registry()
            .href("wishlist.edit", StateParams::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingParam { param: "id", .. }));
    }

    #[test]
    fn unknown_urls_do_not_match() {
        let reg = registry();
        assert_eq!(reg.match_url("/wishlist/abc/edit"), None);
        assert_eq!(reg.match_url("/nothing"), None);
        assert_eq!(
            reg.match_url("/wish/7/delete?x=1").map(|m| m.state),
            Some("wish.delete".into())
        );
    }

    #[test]
    fn every_entity_state_requires_role_user() {
        for state in registry().states() {
            assert_eq!(state.authorities, vec![ROLE_USER.to_owned()]);
        }
    }

    #[test]
    fn views_and_resolves_follow_route_kind() {
        let reg = registry();
        assert_eq!(
            reg.get("wishlist").unwrap().view,
            ViewDef::Content {
                template: "wishlists.html".into()
            }
        );
        assert_eq!(
            reg.get("wish.delete").unwrap().view,
            ViewDef::Modal {
                template: "wish-delete-dialog.html".into(),
                size: ModalSize::Md,
                static_backdrop: false,
            }
        );
        assert_eq!(reg.get("wish.new").unwrap().resolve, Resolve::Blank);
        assert_eq!(
            reg.get("wishlist-detail").unwrap().resolve,
            Resolve::EntityWithPrevious
        );
    }

    #[test]
    fn modal_exits_follow_the_table() {
        let reg = registry();
        let exits = |name: &str| reg.get(name).unwrap().exits.clone().unwrap();
        let parent = ExitTarget {
            to: ExitTo::Parent,
            reload: false,
        };
        let list = |reload| ExitTarget {
            to: ExitTo::State("wishlist".into()),
            reload,
        };

        assert_eq!(exits("wishlist-detail.edit").on_close, parent);
        assert_eq!(exits("wishlist-detail.edit").on_dismiss, parent);
        assert_eq!(exits("wishlist.new").on_close, list(true));
        assert_eq!(exits("wishlist.new").on_dismiss, list(false));
        assert_eq!(exits("wishlist.edit").on_close, list(true));
        assert_eq!(exits("wishlist.edit").on_dismiss, parent);
        assert_eq!(exits("wishlist.delete").on_close, list(true));
        assert_eq!(exits("wishlist.delete").on_dismiss, parent);
    }

    #[test]
    fn page_title_is_inherited_by_modals() {
        let reg = registry();
        assert_eq!(reg.page_title("wish"), Some("storeApp.wish.home.title"));
        assert_eq!(reg.page_title("wish.new"), Some("storeApp.wish.home.title"));
        assert_eq!(
            reg.page_title("wish-detail.edit"),
            Some("storeApp.wish.detail.title")
        );
    }
}
