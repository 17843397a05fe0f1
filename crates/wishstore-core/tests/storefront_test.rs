// End-to-end flows through `Storefront` against a wiremock server.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wishstore_core::{
    AlertKind, AuthCredentials, ClientConfig, CoreError, DeleteViewModel, DetailViewModel,
    DialogViewModel, Entity, ListViewModel, ModalOutcome, StateParams, Storefront, Wishlist,
    resolve_entity,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id_token": "jwt-1"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/account"))
        .and(header("Authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "user", "authorities": ["ROLE_USER"]
        })))
        .mount(server)
        .await;
}

async fn connected() -> (MockServer, Storefront) {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let mut config = ClientConfig::new(server.uri().parse().unwrap());
    config.auth = AuthCredentials::Password {
        username: "user".into(),
        password: SecretString::from("user".to_string()),
    };
    let store = Storefront::with_http(config, reqwest::Client::new()).unwrap();
    store.connect().await.unwrap();
    (server, store)
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_loads_principal() {
    let (_server, store) = connected().await;

    let principal = store.principal().unwrap();
    assert_eq!(principal.login, "user");
    assert_eq!(principal.authorities, vec!["ROLE_USER".to_string()]);
}

#[tokio::test]
async fn create_scenario_posts_once_and_broadcasts_server_copy() {
    let (server, store) = connected().await;

    Mock::given(method("POST"))
        .and(path("/api/wishlists"))
        .and(header("Authorization", "Bearer jwt-1"))
        .and(body_json(json!({
            "id": null, "name": "Books", "creationDate": null, "hidden": false, "user": null
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-storeApp-alert", "storeApp.wishlist.created")
                .insert_header("X-storeApp-params", "21")
                .set_body_json(json!({
                    "id": 21, "name": "Books", "creationDate": null, "hidden": false, "user": null
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let _sub = store
        .bus()
        .subscribe::<Wishlist, _>(move |wl| sink.lock().unwrap().push(wl.id));

    let nav = store.navigator();
    let pending = nav.go("wishlist.new", StateParams::default()).unwrap();
    let service = store.resource::<Wishlist>();
    let draft = resolve_entity(&service, &pending).await.unwrap().unwrap();

    let mut dialog = DialogViewModel::new(draft);
    {
        let draft = dialog.draft_mut().unwrap();
        draft.name = Some("Books".into());
        draft.hidden = Some(false);
    }
    dialog.submit(&service, store.bus()).await.unwrap();

    assert_eq!(*received.lock().unwrap(), vec![Some(21)]);
    assert!(matches!(dialog.outcome(), Some(ModalOutcome::Closed(w)) if w.id == Some(21)));

    let alerts = store.alerts().drain();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::Success);
    assert_eq!(alerts[0].message, "A new Wishlist is created with identifier 21");
}

#[tokio::test]
async fn failed_save_leaves_dialog_open_without_alert() {
    let (server, store) = connected().await;

    Mock::given(method("PUT"))
        .and(path("/api/wishlists"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut wl = Wishlist::blank();
    wl.id = Some(2);
    wl.name = Some("Games".into());
    let mut dialog = DialogViewModel::new(wl);

    dialog
        .submit(&store.resource::<Wishlist>(), store.bus())
        .await
        .unwrap();

    assert!(!dialog.is_saving());
    assert!(!dialog.is_closed());
    assert!(matches!(
        dialog.last_error(),
        Some(CoreError::Api { status: Some(500), .. })
    ));
    assert!(store.alerts().is_empty());
}

#[tokio::test]
async fn detail_rebinds_after_edit_dialog_saves() {
    let (server, store) = connected().await;

    Mock::given(method("GET"))
        .and(path("/api/wishlists/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "name": "Books", "creationDate": "2016-11-09", "hidden": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/wishlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "name": "Novels", "creationDate": "2016-11-09", "hidden": false
        })))
        .mount(&server)
        .await;

    let service = store.resource::<Wishlist>();
    let mut nav = store.navigator();

    let pending = nav.go("wishlist-detail", StateParams::id(5)).unwrap();
    let entity = resolve_entity(&service, &pending).await.unwrap().unwrap();
    let previous = pending.previous.clone().unwrap_or_default();
    nav.commit(&pending);
    let detail = DetailViewModel::new(entity, previous, store.bus());
    assert_eq!(detail.previous_state().name, "wishlist");

    let pending = nav.go("wishlist-detail.edit", StateParams::id(5)).unwrap();
    let entity = resolve_entity(&service, &pending).await.unwrap().unwrap();
    nav.commit(&pending);

    let mut dialog = DialogViewModel::new(entity);
    dialog.draft_mut().unwrap().name = Some("Novels".into());
    dialog.submit(&service, store.bus()).await.unwrap();

    assert_eq!(detail.current().name.as_deref(), Some("Novels"));
    let exit = nav.exit_modal(dialog.outcome().unwrap()).unwrap();
    assert_eq!(exit.to, "wishlist-detail");
    assert!(!exit.reload);
}

#[tokio::test]
async fn delete_then_list_reload() {
    let (server, store) = connected().await;

    Mock::given(method("DELETE"))
        .and(path("/api/wishlists/3"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("X-storeApp-alert", "storeApp.wishlist.deleted"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/wishlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = store.resource::<Wishlist>();
    let mut wl = Wishlist::blank();
    wl.id = Some(3);

    let mut delete = DeleteViewModel::new(wl);
    delete.confirm_delete(&service, 3).await;
    assert_eq!(delete.outcome(), Some(&ModalOutcome::Closed(true)));

    let mut list = ListViewModel::<Wishlist>::new();
    list.reload(&service).await;
    assert!(list.items().is_empty());
    assert_eq!(store.alerts().len(), 1);
}

#[tokio::test]
async fn bad_password_fails_connect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/authenticate"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut config = ClientConfig::new(server.uri().parse().unwrap());
    config.auth = AuthCredentials::Password {
        username: "user".into(),
        password: SecretString::from("nope".to_string()),
    };
    let store = Storefront::with_http(config, reqwest::Client::new()).unwrap();

    let err = store.connect().await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(store.principal().is_none());
}
