//! Screen identifiers: one tab per entity.

use std::fmt;

use wishstore_core::{Entity, RouteKind, Wish, Wishlist};

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Wishlists, // 1
    Wishes, // 2
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Wishlists, Self::Wishes];

    pub fn number(self) -> u8 {
        match self {
            Self::Wishlists => 1,
            Self::Wishes => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Wishlists),
            2 => Some(Self::Wishes),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wishlists => "Wishlists",
            Self::Wishes => "Wishes",
        }
    }

    /// Entity name the screen shows, as used in state names.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Wishlists => Wishlist::NAME,
            Self::Wishes => Wish::NAME,
        }
    }

    pub fn for_entity(entity: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.entity() == entity)
    }

    /// The list state this screen opens on.
    pub fn list_state(self) -> String {
        RouteKind::List.state_name(self.entity())
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tabs_wrap_both_ways() {
        assert_eq!(ScreenId::Wishlists.next(), ScreenId::Wishes);
        assert_eq!(ScreenId::Wishes.next(), ScreenId::Wishlists);
        assert_eq!(ScreenId::Wishlists.prev(), ScreenId::Wishes);
    }

    #[test]
    fn screens_map_to_entities_and_list_states() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::for_entity(id.entity()), Some(id));
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::Wishes.list_state(), "wish");
        assert_eq!(ScreenId::for_entity("user"), None);
    }
}
