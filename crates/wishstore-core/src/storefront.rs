// ── Storefront facade ──
//
// One connection to a wishstore server: the API client with its
// notification interceptor, the event bus, the alert queue, the state
// registry and the signed-in principal. Front ends build one of these from
// a `ClientConfig` and hand out resource clients and navigators from it.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};
use wishstore_api::{ApiClient, Entity, NotificationInterceptor, ResourceClient};

use crate::alert::AlertService;
use crate::bus::EventBus;
use crate::config::{AuthCredentials, ClientConfig};
use crate::error::CoreError;
use crate::navigator::{Navigator, Principal};
use crate::routes::StateRegistry;

/// Cheaply cloneable via `Arc<StorefrontInner>`.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: ClientConfig,
    api: Arc<ApiClient>,
    bus: EventBus,
    alerts: AlertService,
    registry: Arc<StateRegistry>,
    principal: RwLock<Option<Principal>>,
}

impl Storefront {
    /// Build the client stack. Does not touch the network; call
    /// [`connect()`](Self::connect) to sign in.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let app = config.app_name.clone();
        let alerts = AlertService::new(&app);
        let api = ApiClient::new(config.url.as_str(), &app, &config.transport())?
            .with_interceptor(Arc::new(NotificationInterceptor::new(&app, alerts.clone())));
        Ok(Self::assemble(config, api, alerts))
    }

    /// Build around a pre-built `reqwest::Client` (tests, custom transports).
    pub fn with_http(config: ClientConfig, http: reqwest::Client) -> Result<Self, CoreError> {
        let app = config.app_name.clone();
        let alerts = AlertService::new(&app);
        let api = ApiClient::from_reqwest(config.url.as_str(), &app, http)?
            .with_interceptor(Arc::new(NotificationInterceptor::new(&app, alerts.clone())));
        Ok(Self::assemble(config, api, alerts))
    }

    fn assemble(config: ClientConfig, api: ApiClient, alerts: AlertService) -> Self {
        let bus = EventBus::new(config.app_name.clone());
        let registry = Arc::new(StateRegistry::storefront(&config.app_name));
        Self {
            inner: Arc::new(StorefrontInner {
                config,
                api: Arc::new(api),
                bus,
                alerts,
                registry,
                principal: RwLock::new(None),
            }),
        }
    }

    /// Authenticate and load the signed-in account.
    pub async fn connect(&self) -> Result<Principal, CoreError> {
        let api = &self.inner.api;
        match &self.inner.config.auth {
            AuthCredentials::Token(token) => {
                debug!("using pre-issued token");
                api.set_token(token.clone());
            }
            AuthCredentials::Password { username, password } => {
                api.authenticate(username, password, false).await?;
                debug!(%username, "password authentication successful");
            }
            AuthCredentials::Anonymous => {
                debug!("no credentials configured");
            }
        }

        let account = api.account().await?;
        let principal = Principal::from(&account);
        info!(login = %principal.login, authorities = ?principal.authorities, "connected");

        *self
            .inner
            .principal
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(principal.clone());
        Ok(principal)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.inner.api
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn alerts(&self) -> &AlertService {
        &self.inner.alerts
    }

    pub fn registry(&self) -> &Arc<StateRegistry> {
        &self.inner.registry
    }

    pub fn principal(&self) -> Option<Principal> {
        self.inner
            .principal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Typed CRUD client for `T`.
    pub fn resource<T: Entity>(&self) -> ResourceClient<T> {
        ResourceClient::new(Arc::clone(&self.inner.api))
    }

    /// A navigator over this storefront's states, authorized as the
    /// current principal.
    pub fn navigator(&self) -> Navigator {
        let mut nav = Navigator::new(Arc::clone(&self.inner.registry));
        nav.set_principal(self.principal());
        nav
    }
}
