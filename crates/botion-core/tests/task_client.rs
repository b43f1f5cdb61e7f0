mod common;

use botion_core::app::{RemoteError, TaskClient, TaskClientConfig};
use botion_core::domain::entity::{INVALID_DUE_DATE, NO_DUE_DATE};
use botion_core::domain::ports::{ApiMethod, TransportError};
use common::{FakeTransport, credentials, page, results};
use embassy_futures::block_on;

fn client(transport: FakeTransport) -> TaskClient<FakeTransport> {
    TaskClient::new(transport, &credentials("db42"), TaskClientConfig::default()).unwrap()
}

// -----------------------------------------------------------------------------
// fetch_next
// -----------------------------------------------------------------------------

#[test]
fn first_pending_record_is_adopted() {
    let body = results(&[page("1", false, "Pay dues", "Club", Some("2024-05-17T00:00:00.000Z"))]);
    let mut client = client(FakeTransport::new().answer_query(200, &body));

    block_on(client.fetch_next()).unwrap();

    let task = client.current();
    assert_eq!(task.id, "1");
    assert_eq!(task.name, "Pay dues");
    assert_eq!(task.category, "Club");
    assert_eq!(task.due_date, "05/17/24");
    assert!(!task.done);
    assert!(!client.tasks_done());
}

#[test]
fn done_records_are_skipped() {
    let body = results(&[
        page("a", true, "Old", "Club", None),
        page("b", false, "Next", "Club", None),
        page("c", false, "Later", "Club", None),
    ]);
    let mut client = client(FakeTransport::new().answer_query(200, &body));

    block_on(client.fetch_next()).unwrap();

    assert_eq!(client.current().id, "b");
    assert_eq!(client.current().due_date, NO_DUE_DATE);
}

#[test]
fn all_done_list_means_no_task() {
    let body = results(&[page("a", true, "Old", "Club", None)]);
    let mut client = client(FakeTransport::new().answer_query(200, &body));

    block_on(client.fetch_next()).unwrap();

    assert!(client.current().is_none());
    assert!(client.tasks_done());
}

#[test]
fn empty_list_means_no_task() {
    let mut client = client(FakeTransport::new().answer_query(200, &results(&[])));

    block_on(client.fetch_next()).unwrap();

    assert!(client.current().is_none());
    assert!(client.tasks_done());
}

#[test]
fn fetch_is_idempotent_for_unchanged_list() {
    let body = results(&[page("1", false, "Pay dues", "Club", None)]);
    let mut client = client(FakeTransport::new().answer_query(200, &body));

    block_on(client.fetch_next()).unwrap();
    let first = client.current().clone();
    block_on(client.fetch_next()).unwrap();

    assert_eq!(client.current(), &first);
    assert!(!client.tasks_done());
}

#[test]
fn error_status_keeps_previous_state() {
    let body = results(&[page("1", false, "Pay dues", "Club", None)]);
    let transport = FakeTransport::new()
        .answer_query(200, &body)
        .answer_query(401, r#"{"object":"error","status":401}"#);
    let mut client = client(transport);

    block_on(client.fetch_next()).unwrap();
    let result = block_on(client.fetch_next());

    assert_eq!(result, Err(RemoteError::Status(401)));
    assert_eq!(client.current().id, "1");
    assert!(!client.tasks_done());
}

#[test]
fn transport_failure_keeps_previous_state() {
    let mut client = client(FakeTransport::new().fail_query(TransportError::Tls));

    let result = block_on(client.fetch_next());

    assert_eq!(result, Err(RemoteError::Transport(TransportError::Tls)));
    assert!(client.current().is_none());
    assert!(!client.tasks_done());
}

#[test]
fn undecodable_body_is_a_decode_error() {
    let mut client = client(FakeTransport::new().answer_query(200, "<html>gateway</html>"));

    assert_eq!(block_on(client.fetch_next()), Err(RemoteError::Decode));
    assert!(!client.tasks_done());
}

#[test]
fn bad_due_date_is_marked_invalid() {
    let body = results(&[page("1", false, "Pay dues", "Club", Some("next week"))]);
    let mut client = client(FakeTransport::new().answer_query(200, &body));

    block_on(client.fetch_next()).unwrap();

    assert_eq!(client.current().due_date, INVALID_DUE_DATE);
}

#[test]
fn query_targets_list_with_category_filter() {
    let mut client = client(FakeTransport::new().answer_query(200, &results(&[])));

    block_on(client.fetch_next()).unwrap();

    let sent = &client.transport().sent[0];
    assert_eq!(sent.method, ApiMethod::Post);
    assert_eq!(sent.url, "https://api.notion.com/v1/databases/db42/query");
    assert_eq!(sent.api_key, "secret_abc");
    assert!(sent.body.contains(r#""multi_select":{"contains":"Club"}"#));
}

// -----------------------------------------------------------------------------
// mark_done
// -----------------------------------------------------------------------------

#[test]
fn mark_done_patches_the_page() {
    let mut client = client(FakeTransport::new().answer_update(200));

    block_on(client.mark_done("1")).unwrap();

    let sent = client.transport().sent_with(ApiMethod::Patch);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "https://api.notion.com/v1/pages/1");
    assert_eq!(sent[0].body, r#"{"properties":{"Done":{"checkbox":true}}}"#);
    assert!(client.tasks_done());
}

#[test]
fn failed_mark_done_leaves_flag_alone() {
    let mut client = client(FakeTransport::new().answer_update(409));

    assert_eq!(block_on(client.mark_done("1")), Err(RemoteError::Status(409)));
    assert!(!client.tasks_done());
}

#[test]
fn mark_done_without_task_sends_nothing() {
    let mut client = client(FakeTransport::new());

    assert_eq!(block_on(client.mark_done("")), Err(RemoteError::NoTask));
    assert!(client.transport().sent.is_empty());
}

#[test]
fn echo_sets_done_on_current_task() {
    let body = results(&[page("1", false, "Pay dues", "Club", None)]);
    let mut client = client(FakeTransport::new().answer_query(200, &body));
    block_on(client.fetch_next()).unwrap();

    client.echo_completed();

    assert!(client.current().done);
}
