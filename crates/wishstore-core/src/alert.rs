// ── Alerts ──
//
// Bounded queue of user-facing notifications. The notification interceptor
// feeds it success alerts from `X-{app}-alert` headers; front ends push
// errors. Every alert is translated once on arrival using the catalog.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use strum::Display;
use tracing::debug;
use wishstore_api::AlertSink;

use crate::error::CoreError;

const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AlertKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    /// Translation key as received.
    pub key: String,
    pub param: Option<String>,
    /// Translated text.
    pub message: String,
    pub at: DateTime<Utc>,
}

// ── Catalog ──────────────────────────────────────────────────────────

/// Translation table with `{{ param }}` interpolation.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// English messages for the keys the server generates.
    pub fn english(app: &str) -> Self {
        let mut catalog = Self::default();
        for (entity, title, plural) in [
            ("wishlist", "Wishlist", "Wishlists"),
            ("wish", "Wish", "Wishes"),
        ] {
            catalog.insert(format!("{app}.{entity}.home.title"), plural);
            catalog.insert(format!("{app}.{entity}.detail.title"), title);
            catalog.insert(
                format!("{app}.{entity}.created"),
                format!("A new {title} is created with identifier {{{{ param }}}}"),
            );
            catalog.insert(
                format!("{app}.{entity}.updated"),
                format!("A {title} is updated with identifier {{{{ param }}}}"),
            );
            catalog.insert(
                format!("{app}.{entity}.deleted"),
                format!("A {title} is deleted with identifier {{{{ param }}}}"),
            );
        }
        catalog.insert("error.idexists", "A new entity cannot already have an ID");
        catalog.insert("error.validation", "Validation failed: {{ param }}");
        catalog.insert("error.http.403", "You are not authorized to access this resource");
        catalog.insert("error.http.404", "The requested resource was not found");
        catalog
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(key.into(), message.into());
    }

    /// Translate `key`, substituting `param`. Unknown keys come back verbatim.
    pub fn translate(&self, key: &str, param: Option<&str>) -> String {
        let Some(template) = self.entries.get(key) else {
            return key.to_owned();
        };
        let value = param.unwrap_or_default();
        template
            .replace("{{ param }}", value)
            .replace("{{param}}", value)
    }
}

// ── Service ──────────────────────────────────────────────────────────

#[derive(Debug)]
struct AlertQueue {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

/// Shared alert queue. Cheaply cloneable.
#[derive(Debug, Clone)]
pub struct AlertService {
    queue: Arc<Mutex<AlertQueue>>,
    catalog: Arc<Catalog>,
}

impl AlertService {
    pub fn new(app: &str) -> Self {
        Self::with_catalog(Catalog::english(app), DEFAULT_CAPACITY)
    }

    pub fn with_catalog(catalog: Catalog, capacity: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(AlertQueue {
                alerts: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
            })),
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn push(&self, kind: AlertKind, key: &str, param: Option<&str>) {
        let alert = Alert {
            kind,
            key: key.to_owned(),
            param: param.map(str::to_owned),
            message: self.catalog.translate(key, param),
            at: Utc::now(),
        };
        debug!(%kind, key, "alert: {}", alert.message);

        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if queue.alerts.len() == queue.capacity {
            queue.alerts.pop_front();
        }
        queue.alerts.push_back(alert);
    }

    pub fn info(&self, message: &str) {
        self.push(AlertKind::Info, message, None);
    }

    /// Queue an error alert, preferring the server's translation key.
    pub fn error(&self, err: &CoreError) {
        match err.error_key() {
            Some(key) => self.push(AlertKind::Error, key, None),
            None => self.push(AlertKind::Error, &err.to_string(), None),
        }
    }

    /// Remove and return every queued alert, oldest first.
    pub fn drain(&self) -> Vec<Alert> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .alerts
            .drain(..)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .alerts
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertSink for AlertService {
    fn success(&self, key: &str, param: Option<&str>) {
        self.push(AlertKind::Success, key, param);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn success_alert_is_translated_with_param() {
        let alerts = AlertService::new("storeApp");
        AlertSink::success(&alerts, "storeApp.wishlist.created", Some("12"));

        let drained = alerts.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].kind, AlertKind::Success);
        assert_eq!(
            drained[0].message,
            "A new Wishlist is created with identifier 12"
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn page_titles_are_translated() {
        let catalog = Catalog::english("storeApp");
        assert_eq!(catalog.translate("storeApp.wish.home.title", None), "Wishes");
        assert_eq!(
            catalog.translate("storeApp.wishlist.detail.title", None),
            "Wishlist"
        );
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let catalog = Catalog::english("storeApp");
        assert_eq!(catalog.translate("foo", Some("bar")), "foo");
    }

    #[test]
    fn queue_is_bounded_dropping_oldest() {
        let alerts = AlertService::with_catalog(Catalog::default(), 2);
        for key in ["a", "b", "c"] {
            alerts.info(key);
        }
        let keys: Vec<_> = alerts.drain().into_iter().map(|a| a.key).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn error_prefers_server_key() {
        let alerts = AlertService::new("storeApp");
        alerts.error(&CoreError::Api {
            message: "Bad Request".into(),
            error_key: Some("error.idexists".into()),
            status: Some(400),
        });
        alerts.error(&CoreError::Unauthenticated);

        let drained = alerts.drain();
        assert_eq!(drained[0].message, "A new entity cannot already have an ID");
        assert_eq!(drained[1].message, "Not signed in");
        assert_eq!(drained[1].kind, AlertKind::Error);
    }
}
