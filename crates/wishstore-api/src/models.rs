// Wire types for the wishstore REST API.
//
// Field names follow the server's camelCase JSON. Every field of an entity
// is optional because the "new" dialog starts from an all-null draft.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::local_date;
use crate::entity::{Entity, FieldError, Owned, OwnerOption};

// ── Users ────────────────────────────────────────────────────────────

/// A user as listed by `GET api/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Option<i64>,
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Reference to the user owning a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const NAME: &'static str = "user";
    const UPDATE_EVENT: &'static str = "userManagementUpdate";
    const TITLE: &'static str = "User";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn blank() -> Self {
        Self {
            id: None,
            login: String::new(),
            first_name: None,
            last_name: None,
            email: None,
        }
    }

    fn label(&self) -> String {
        self.login.clone()
    }
}

// ── Wishlist ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "local_date")]
    pub creation_date: Option<NaiveDate>,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

impl Entity for Wishlist {
    const COLLECTION: &'static str = "wishlists";
    const NAME: &'static str = "wishlist";
    const UPDATE_EVENT: &'static str = "wishlistUpdate";
    const TITLE: &'static str = "Wishlist";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn blank() -> Self {
        Self {
            id: None,
            name: None,
            creation_date: None,
            hidden: None,
            user: None,
        }
    }

    fn label(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => "(unnamed)".into(),
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        if self.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(vec![FieldError::required("name")]);
        }
        Ok(())
    }
}

impl Owned for Wishlist {
    type Owner = User;

    fn owner(&self) -> Option<OwnerOption> {
        self.user.as_ref().map(|u| OwnerOption {
            id: u.id,
            label: u.login.clone().unwrap_or_else(|| format!("#{}", u.id)),
        })
    }

    fn assign_owner(&mut self, option: Option<&OwnerOption>) {
        self.user = option.map(|o| UserRef {
            id: o.id,
            login: Some(o.label.clone()),
        });
    }
}

/// Reference to the wishlist a wish belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ── Wish ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub wishlist: Option<WishlistRef>,
}

impl Entity for Wish {
    const COLLECTION: &'static str = "wishes";
    const NAME: &'static str = "wish";
    const UPDATE_EVENT: &'static str = "wishUpdate";
    const TITLE: &'static str = "Wish";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn blank() -> Self {
        Self {
            id: None,
            product_id: None,
            price: None,
            wishlist: None,
        }
    }

    fn label(&self) -> String {
        match (self.product_id, self.id) {
            (Some(product), _) => format!("product {product}"),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => "(new wish)".into(),
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.product_id.is_none() {
            errors.push(FieldError::required("productId"));
        }
        match self.price {
            None => errors.push(FieldError::required("price")),
            Some(p) if !p.is_finite() || p < 0.0 => errors.push(FieldError {
                field: "price",
                message: "This field should be at least 0.".into(),
            }),
            Some(_) => {}
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Owned for Wish {
    type Owner = Wishlist;

    fn owner(&self) -> Option<OwnerOption> {
        self.wishlist.as_ref().map(|w| OwnerOption {
            id: w.id,
            label: w.name.clone().unwrap_or_else(|| format!("#{}", w.id)),
        })
    }

    fn assign_owner(&mut self, option: Option<&OwnerOption>) {
        self.wishlist = option.map(|o| WishlistRef {
            id: o.id,
            name: Some(o.label.clone()),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_wishlist_serializes_all_null() {
        insta::assert_json_snapshot!(Wishlist::blank(), @r#"
        {
          "id": null,
          "name": null,
          "creationDate": null,
          "hidden": null,
          "user": null
        }
        "#);
    }

    #[test]
    fn wishlist_creation_date_uses_wire_format() {
        let wl = Wishlist {
            id: Some(3),
            name: Some("Books".into()),
            creation_date: NaiveDate::from_ymd_opt(2016, 11, 9),
            hidden: Some(false),
            user: Some(UserRef {
                id: 4,
                login: Some("user".into()),
            }),
        };
        let value = serde_json::to_value(&wl).unwrap();
        assert_eq!(value["creationDate"], json!("2016-11-09"));
        assert_eq!(value["user"], json!({"id": 4, "login": "user"}));
    }

    #[test]
    fn wish_decodes_nested_wishlist_and_ignores_extra_fields() {
        let wish: Wish = serde_json::from_value(json!({
            "id": 7,
            "productId": 42,
            "price": 19.99,
            "wishlist": {"id": 3, "name": "Books", "creationDate": "2016-11-09", "hidden": false}
        }))
        .unwrap();
        assert_eq!(wish.product_id, Some(42));
        assert_eq!(
            wish.wishlist,
            Some(WishlistRef {
                id: 3,
                name: Some("Books".into())
            })
        );
    }

    #[test]
    fn wishlist_requires_name() {
        let errors = Wishlist::blank().validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::required("name")]);

        let mut named = Wishlist::blank();
        named.name = Some("Books".into());
        assert!(named.validate().is_ok());
    }

    #[test]
    fn wish_rejects_negative_price() {
        let wish = Wish {
            id: None,
            product_id: Some(1),
            price: Some(-0.5),
            wishlist: None,
        };
        let errors = wish.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "price");
    }

    #[test]
    fn set_owner_links_wish_to_wishlist() {
        let mut wish = Wish::blank();
        let owner = Wishlist {
            id: Some(9),
            name: Some("Games".into()),
            creation_date: None,
            hidden: None,
            user: None,
        };
        wish.set_owner(Some(&owner));
        assert_eq!(wish.owner_id(), Some(9));

        wish.set_owner(None);
        assert_eq!(wish.owner_id(), None);
    }

    #[test]
    fn owner_label_falls_back_to_the_reference_id() {
        let mut wishlist = Wishlist::blank();
        assert_eq!(wishlist.owner_label(), "-");

        wishlist.user = Some(UserRef { id: 4, login: None });
        assert_eq!(wishlist.owner_label(), "#4");

        wishlist.user = Some(UserRef {
            id: 4,
            login: Some("admin".into()),
        });
        assert_eq!(wishlist.owner_label(), "admin");
    }
}
