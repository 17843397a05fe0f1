//! Per-entity presentation: table columns, detail rows and form fields.
//!
//! Screens are generic over [`Record`]; the two entity types plug in their
//! columns and field parsing here. [`AnyRecord`] and [`Records`] carry
//! results through the action channel.

use chrono::NaiveDate;
use wishstore_core::{Entity, Owned, User, Wish, Wishlist};

/// A single entity travelling through the action channel.
#[derive(Debug, Clone)]
pub enum AnyRecord {
    Wishlist(Wishlist),
    Wish(Wish),
}

/// A fetched collection travelling through the action channel.
#[derive(Debug, Clone)]
pub enum Records {
    Wishlists(Vec<Wishlist>),
    Wishes(Vec<Wish>),
    Users(Vec<User>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, parsed on submit.
    Text,
    /// Boolean flipped with Space.
    Toggle,
    /// Owner picked from the loaded options.
    Owner,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub label: &'static str,
    /// Name the validation errors use for this field.
    pub key: &'static str,
    pub kind: FieldKind,
}

pub trait Record: Owned {
    const PLURAL: &'static str;
    /// Header and minimum width of each table column.
    const COLUMNS: &'static [(&'static str, u16)];
    const FIELDS: &'static [Field];

    fn wrap(self) -> AnyRecord;
    fn unwrap(record: AnyRecord) -> Option<Self>;

    fn pack(items: Vec<Self>) -> Records;
    fn unpack(records: Records) -> Option<Vec<Self>>;
    fn pack_owners(owners: Vec<Self::Owner>) -> Records;
    fn unpack_owners(records: Records) -> Option<Vec<Self::Owner>>;

    fn cells(&self) -> Vec<String>;
    fn detail_rows(&self) -> Vec<(&'static str, String)>;

    /// Current value of field `idx` as form text.
    fn field_text(&self, idx: usize) -> String;
    /// Parse form text into field `idx`.
    fn apply_text(&mut self, idx: usize, raw: &str) -> Result<(), String>;
    fn toggle(&mut self, _idx: usize) {}
}

fn dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".into(),
        Some(false) => "no".into(),
        None => "-".into(),
    }
}

fn parse_opt<T: std::str::FromStr>(raw: &str, expected: &str) -> Result<Option<T>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| format!("expected {expected}, got '{trimmed}'"))
}

// ── Wishlist ─────────────────────────────────────────────────────────

impl Record for Wishlist {
    const PLURAL: &'static str = "Wishlists";
    const COLUMNS: &'static [(&'static str, u16)] = &[
        ("ID", 6),
        ("Name", 20),
        ("Created", 12),
        ("Hidden", 8),
        ("Owner", 14),
    ];
    const FIELDS: &'static [Field] = &[
        Field {
            label: "Name",
            key: "name",
            kind: FieldKind::Text,
        },
        Field {
            label: "Created",
            key: "creationDate",
            kind: FieldKind::Text,
        },
        Field {
            label: "Hidden",
            key: "hidden",
            kind: FieldKind::Toggle,
        },
        Field {
            label: "Owner",
            key: "user",
            kind: FieldKind::Owner,
        },
    ];

    fn wrap(self) -> AnyRecord {
        AnyRecord::Wishlist(self)
    }

    fn unwrap(record: AnyRecord) -> Option<Self> {
        match record {
            AnyRecord::Wishlist(w) => Some(w),
            AnyRecord::Wish(_) => None,
        }
    }

    fn pack(items: Vec<Self>) -> Records {
        Records::Wishlists(items)
    }

    fn unpack(records: Records) -> Option<Vec<Self>> {
        match records {
            Records::Wishlists(items) => Some(items),
            _ => None,
        }
    }

    fn pack_owners(owners: Vec<User>) -> Records {
        Records::Users(owners)
    }

    fn unpack_owners(records: Records) -> Option<Vec<User>> {
        match records {
            Records::Users(users) => Some(users),
            _ => None,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            dash(self.id),
            self.name.clone().unwrap_or_default(),
            dash(self.creation_date),
            yes_no(self.hidden),
            self.owner_label(),
        ]
    }

    fn detail_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", dash(self.id)),
            ("Name", dash(self.name.as_deref())),
            ("Created", dash(self.creation_date)),
            ("Hidden", yes_no(self.hidden)),
            ("Owner", self.owner_label()),
        ]
    }

    fn field_text(&self, idx: usize) -> String {
        match idx {
            0 => self.name.clone().unwrap_or_default(),
            1 => self
                .creation_date
                .map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string()),
            2 => yes_no(Some(self.hidden.unwrap_or(false))),
            3 => self.owner_label(),
            _ => String::new(),
        }
    }

    fn apply_text(&mut self, idx: usize, raw: &str) -> Result<(), String> {
        match idx {
            0 => {
                let name = raw.trim();
                self.name = (!name.is_empty()).then(|| name.to_owned());
            }
            1 => {
                let raw = raw.trim();
                self.creation_date = if raw.is_empty() {
                    None
                } else {
                    Some(
                        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                            .map_err(|_| format!("expected YYYY-MM-DD, got '{raw}'"))?,
                    )
                };
            }
            _ => {}
        }
        Ok(())
    }

    fn toggle(&mut self, idx: usize) {
        if idx == 2 {
            self.hidden = Some(!self.hidden.unwrap_or(false));
        }
    }
}

// ── Wish ─────────────────────────────────────────────────────────────

fn price_label(w: &Wish) -> String {
    w.price.map_or_else(|| "-".into(), |p| format!("{p:.2}"))
}

impl Record for Wish {
    const PLURAL: &'static str = "Wishes";
    const COLUMNS: &'static [(&'static str, u16)] =
        &[("ID", 6), ("Product", 10), ("Price", 10), ("Wishlist", 20)];
    const FIELDS: &'static [Field] = &[
        Field {
            label: "Product",
            key: "productId",
            kind: FieldKind::Text,
        },
        Field {
            label: "Price",
            key: "price",
            kind: FieldKind::Text,
        },
        Field {
            label: "Wishlist",
            key: "wishlist",
            kind: FieldKind::Owner,
        },
    ];

    fn wrap(self) -> AnyRecord {
        AnyRecord::Wish(self)
    }

    fn unwrap(record: AnyRecord) -> Option<Self> {
        match record {
            AnyRecord::Wish(w) => Some(w),
            AnyRecord::Wishlist(_) => None,
        }
    }

    fn pack(items: Vec<Self>) -> Records {
        Records::Wishes(items)
    }

    fn unpack(records: Records) -> Option<Vec<Self>> {
        match records {
            Records::Wishes(items) => Some(items),
            _ => None,
        }
    }

    fn pack_owners(owners: Vec<Wishlist>) -> Records {
        Records::Wishlists(owners)
    }

    fn unpack_owners(records: Records) -> Option<Vec<Wishlist>> {
        Wishlist::unpack(records)
    }

    fn cells(&self) -> Vec<String> {
        vec![
            dash(self.id),
            dash(self.product_id),
            price_label(self),
            self.owner_label(),
        ]
    }

    fn detail_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", dash(self.id)),
            ("Product", dash(self.product_id)),
            ("Price", price_label(self)),
            ("Wishlist", self.owner_label()),
        ]
    }

    fn field_text(&self, idx: usize) -> String {
        match idx {
            0 => self.product_id.map_or_else(String::new, |p| p.to_string()),
            1 => self.price.map_or_else(String::new, |p| p.to_string()),
            2 => self.owner_label(),
            _ => String::new(),
        }
    }

    fn apply_text(&mut self, idx: usize, raw: &str) -> Result<(), String> {
        match idx {
            0 => self.product_id = parse_opt(raw, "a product number")?,
            1 => self.price = parse_opt(raw, "a price")?,
            _ => {}
        }
        Ok(())
    }
}
