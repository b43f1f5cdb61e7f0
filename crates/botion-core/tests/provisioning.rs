mod common;

use botion_core::app::{ProvisioningController, SUCCESS_MESSAGE};
use botion_core::domain::entity::CredentialSlot;
use botion_core::domain::ports::CredentialStore;
use botion_core::net::http::{ContentType, HttpMethod};
use common::MemStore;

const PAGE: &str = "<form method=\"post\"></form>";

fn controller(store: MemStore) -> ProvisioningController<MemStore> {
    ProvisioningController::new(store, PAGE)
}

#[test]
fn form_is_served_at_root() {
    let mut controller = controller(MemStore::default());

    let reply = controller.handle(HttpMethod::Get, "/", b"");

    assert_eq!(reply.status, 200);
    assert_eq!(reply.content_type, ContentType::TextHtml);
    assert_eq!(reply.body, PAGE.as_bytes());
    assert!(!reply.restart);
}

#[test]
fn submission_stores_fields_and_restarts() {
    let mut controller = controller(MemStore::default());
    let body = b"ssid=Home+Net&pass=p%40ss&api_key=secret_1&database_id=db42";

    let reply = controller.handle(HttpMethod::Post, "/", body);

    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, SUCCESS_MESSAGE.as_bytes());
    assert!(reply.restart);
    let store = controller.store();
    assert_eq!(store.slots, ["Home Net", "p@ss", "secret_1", "db42"].map(String::from));
}

#[test]
fn partial_submission_keeps_other_slots() {
    let mut store = MemStore::default();
    store.slots = ["old-net", "old-pass", "old-key", "old-db"].map(String::from);
    let mut controller = controller(store);

    let reply = controller.handle(HttpMethod::Post, "/", b"ssid=&pass=&api_key=&database_id=new-db");

    assert!(reply.restart);
    let store = controller.store();
    assert_eq!(store.writes, vec![CredentialSlot::ListId]);
    assert_eq!(store.slots, ["old-net", "old-pass", "old-key", "new-db"].map(String::from));
}

#[test]
fn network_only_submission_keeps_api_key_and_list() {
    let mut store = MemStore::default();
    store.slots = ["old-net", "old-pass", "secret_old", "db-old"].map(String::from);
    let mut controller = controller(store);

    let reply = controller.handle(HttpMethod::Post, "/", b"ssid=office&pass=letmein");

    assert_eq!(reply.status, 200);
    assert!(reply.restart);
    let store = controller.store();
    assert_eq!(
        store.writes,
        vec![CredentialSlot::NetworkName, CredentialSlot::NetworkSecret]
    );
    assert_eq!(store.slots, ["office", "letmein", "secret_old", "db-old"].map(String::from));
}

#[test]
fn unknown_fields_are_ignored() {
    let mut controller = controller(MemStore::default());

    let reply = controller.handle(HttpMethod::Post, "/", b"remember=on&ssid=cafe");

    assert_eq!(reply.status, 200);
    assert_eq!(controller.store().writes, vec![CredentialSlot::NetworkName]);
}

#[test]
fn oversized_value_is_rejected_without_writes() {
    let mut controller = controller(MemStore::default());
    let body = format!("ssid=ok&api_key={}", "k".repeat(200));

    let reply = controller.handle(HttpMethod::Post, "/", body.as_bytes());

    assert_eq!(reply.status, 400);
    assert!(!reply.restart);
    assert!(controller.store().writes.is_empty());
}

#[test]
fn storage_failure_answers_500_without_restart() {
    let store = MemStore {
        fail_writes: true,
        ..MemStore::default()
    };
    let mut controller = controller(store);

    let reply = controller.handle(HttpMethod::Post, "/", b"ssid=home");

    assert_eq!(reply.status, 500);
    assert!(!reply.restart);
}

#[test]
fn missing_store_answers_500() {
    let mut controller = ProvisioningController::new(None::<MemStore>, PAGE);

    let reply = controller.handle(HttpMethod::Post, "/", b"ssid=home");

    assert_eq!(reply.status, 500);
}

#[test]
fn other_routes_are_not_found() {
    let mut controller = controller(MemStore::default());

    assert_eq!(controller.handle(HttpMethod::Get, "/generate_204", b"").status, 404);
    assert_eq!(controller.handle(HttpMethod::Put, "/", b"").status, 404);
}

#[test]
fn stored_values_read_back_as_credentials() {
    let mut controller = controller(MemStore::default());
    controller.handle(HttpMethod::Post, "/", b"ssid=home&pass=hunter22");

    let mut store = MemStore {
        slots: controller.store().slots.clone(),
        ..MemStore::default()
    };
    let credentials = store.load_all().unwrap();

    assert!(credentials.has_network());
    assert_eq!(credentials.api_key, "");
}
