//! End-to-end tests of the address-validation workflow: trigger policy,
//! verification, reconciliation, persistence, and customer decisions.

use chrono::{Duration, Utc};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use driftwood_checkout::services::verifier::VerifierClient;
use driftwood_checkout::services::{ValidationService, validation::ValidationError};
use driftwood_core::{AddressId, AddressValidationStatus, UserAction, ValidationOutcome};
use driftwood_integration_tests::{
    MemoryAddressBook, locker_address, match_body, ok_match_body, residential_address,
    verifier_config,
};

const GRACE_DAYS: i64 = 90;

fn service(book: MemoryAddressBook, endpoint: &str) -> ValidationService<MemoryAddressBook> {
    let verifier = VerifierClient::new(&verifier_config(endpoint)).expect("client builds");
    ValidationService::new(verifier, book, GRACE_DAYS, true)
}

fn disabled_service(book: MemoryAddressBook, endpoint: &str) -> ValidationService<MemoryAddressBook> {
    let verifier = VerifierClient::new(&verifier_config(endpoint)).expect("client builds");
    ValidationService::new(verifier, book, GRACE_DAYS, false)
}

async fn mount_ok(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_matching_address_is_valid_and_persisted() {
    let server = MockServer::start().await;
    mount_ok(&server, ok_match_body()).await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-1");
    book.insert(residential_address("addr-1"));

    let svc = service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, true).await.expect("validates");

    assert_eq!(report.outcome, ValidationOutcome::Valid);
    assert!(report.suggestion.is_none());

    let stored = book.get(&id).expect("record exists");
    let status = stored.validation_status.expect("status written");
    assert!(status.is_valid);
}

#[tokio::test]
async fn test_mismatched_address_is_invalid_with_suggestion() {
    let server = MockServer::start().await;
    mount_ok(&server, match_body("Main St", "4", "Springfield", "54321")).await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-2");
    book.insert(residential_address("addr-2"));

    let svc = service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, true).await.expect("validates");

    assert_eq!(report.outcome, ValidationOutcome::Invalid);
    let suggestion = report.suggestion.expect("correction offered");
    assert_eq!(suggestion.postal_code, "54321");
    assert_eq!(suggestion.house_number.as_deref(), Some("4"));

    let status = book
        .get(&id)
        .and_then(|a| a.validation_status)
        .expect("status written");
    assert!(!status.is_valid);
    assert_eq!(status.user_action, UserAction::Pending);
}

#[tokio::test]
async fn test_ungraded_mismatch_reports_id_without_suggestion() {
    let server = MockServer::start().await;
    let mut body = match_body("Main St", "4", "Springfield", "54321");
    body["object"][0]["Matches"][0]["AQI"] = serde_json::json!("");
    mount_ok(&server, body).await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-3");
    book.insert(residential_address("addr-3"));

    let svc = service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, true).await.expect("validates");

    assert_eq!(report.outcome, ValidationOutcome::Invalid);
    assert!(report.suggestion.is_none());
    assert_eq!(report.address_id, id);
}

#[tokio::test]
async fn test_service_failure_is_indeterminate_and_leaves_status_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-4");
    let mut address = residential_address("addr-4");
    let prior = AddressValidationStatus::pending_review(Utc::now() - Duration::days(5));
    address.validation_status = Some(prior);
    book.insert(address);

    let svc = service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, true).await.expect("no hard error");

    assert_eq!(report.outcome, ValidationOutcome::Indeterminate);
    assert!(report.suggestion.is_none());

    // The stored status is untouched: the next attempt re-verifies.
    let stored = book
        .get(&id)
        .and_then(|a| a.validation_status)
        .expect("status kept");
    assert_eq!(stored.timestamp, prior.timestamp);
    assert_eq!(stored.user_action, UserAction::Pending);
}

#[tokio::test]
async fn test_locker_address_skips_verification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_match_body()))
        .expect(0)
        .mount(&server)
        .await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("locker-1");
    book.insert(locker_address("locker-1"));

    let svc = service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, true).await.expect("validates");

    assert_eq!(report.outcome, ValidationOutcome::Valid);
    let status = book
        .get(&id)
        .and_then(|a| a.validation_status)
        .expect("status written");
    assert!(status.is_valid);
    assert_eq!(status.user_action, UserAction::Ignore);
}

#[tokio::test]
async fn test_disabled_toggle_is_indeterminate_without_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_match_body()))
        .expect(0)
        .mount(&server)
        .await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-5");
    book.insert(residential_address("addr-5"));

    let svc = disabled_service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, true).await.expect("validates");

    assert_eq!(report.outcome, ValidationOutcome::Indeterminate);
    assert!(book.get(&id).expect("record exists").validation_status.is_none());
}

#[tokio::test]
async fn test_valid_status_short_circuits_verification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_match_body()))
        .expect(0)
        .mount(&server)
        .await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-6");
    let mut address = residential_address("addr-6");
    address.validation_status =
        Some(AddressValidationStatus::verified_valid(Utc::now() - Duration::days(400)));
    book.insert(address);

    let svc = service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, true).await.expect("validates");

    assert_eq!(report.outcome, ValidationOutcome::Valid);
}

#[tokio::test]
async fn test_guest_validation_is_not_persisted() {
    let server = MockServer::start().await;
    mount_ok(&server, ok_match_body()).await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("guest-1");
    book.insert(residential_address("guest-1"));

    let svc = service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, false).await.expect("validates");

    assert_eq!(report.outcome, ValidationOutcome::Valid);
    assert!(book.get(&id).expect("record exists").validation_status.is_none());
}

#[tokio::test]
async fn test_unknown_address_is_an_error() {
    let server = MockServer::start().await;
    let svc = service(MemoryAddressBook::new(), &server.uri());

    let err = svc
        .validate_address(&AddressId::new("missing"), true)
        .await
        .expect_err("must fail");

    assert!(matches!(err, ValidationError::UnknownAddress(id) if id.as_str() == "missing"));
}

#[tokio::test]
async fn test_accept_round_trip_settles_the_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(match_body("Elm St", "7", "Shelbyville", "54321")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-7");
    book.insert(residential_address("addr-7"));

    let svc = service(book.clone(), &server.uri());
    let report = svc.validate_address(&id, true).await.expect("validates");
    let suggestion = report.suggestion.expect("correction offered");

    let updated = svc
        .accept_suggestion(&id, &suggestion)
        .await
        .expect("accept succeeds");

    assert_eq!(updated.street, "Elm St");
    assert_eq!(updated.house_number.as_deref(), Some("7"));
    assert_eq!(updated.city, "Shelbyville");
    assert_eq!(updated.postal_code, "54321");

    let status = updated.validation_status.expect("status written");
    assert!(status.is_valid);
    assert_eq!(status.user_action, UserAction::Accept);

    // Accepted addresses never re-verify: no further service calls.
    let report = svc.validate_address(&id, true).await.expect("validates");
    assert_eq!(report.outcome, ValidationOutcome::Valid);
}

#[tokio::test]
async fn test_decline_suppresses_rechecks_until_grace_elapses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(match_body("Main St", "4", "Springfield", "54321")),
        )
        .mount(&server)
        .await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-8");
    book.insert(residential_address("addr-8"));

    let svc = service(book.clone(), &server.uri());
    svc.validate_address(&id, true).await.expect("validates");
    let declined = svc.decline_suggestion(&id).await.expect("decline succeeds");

    let status = declined.validation_status.expect("status written");
    assert!(!status.is_valid);
    assert_eq!(status.user_action, UserAction::Decline);

    // Inside the grace period: answered from the stored status.
    let report = svc.validate_address(&id, true).await.expect("validates");
    assert_eq!(report.outcome, ValidationOutcome::Invalid);
    assert!(report.suggestion.is_none());

    // Age the decline past the grace period: the cycle re-opens.
    book.set_status(
        &id,
        Some(AddressValidationStatus::declined(
            Utc::now() - Duration::days(GRACE_DAYS + 1),
        )),
    );
    let report = svc.validate_address(&id, true).await.expect("validates");
    assert_eq!(report.outcome, ValidationOutcome::Invalid);
    assert!(report.suggestion.is_some());
}

#[tokio::test]
async fn test_decision_without_pending_review_is_rejected() {
    let server = MockServer::start().await;
    mount_ok(&server, ok_match_body()).await;

    let book = MemoryAddressBook::new();
    book.insert(residential_address("addr-10"));
    let mut settled = residential_address("addr-11");
    settled.validation_status = Some(AddressValidationStatus::verified_valid(Utc::now()));
    book.insert(settled);

    let svc = service(book.clone(), &server.uri());

    // Never validated: nothing to decline.
    let err = svc
        .decline_suggestion(&AddressId::new("addr-10"))
        .await
        .expect_err("must reject");
    assert!(matches!(err, ValidationError::NoPendingReview(_)));

    // Already valid: nothing to dismiss.
    let err = svc
        .ignore(&AddressId::new("addr-11"), false)
        .await
        .expect_err("must reject");
    assert!(matches!(err, ValidationError::NoPendingReview(_)));

    // Neither address was touched.
    assert!(book
        .get(&AddressId::new("addr-10"))
        .expect("record exists")
        .validation_status
        .is_none());
}

#[tokio::test]
async fn test_customer_ignore_records_dismissal() {
    let server = MockServer::start().await;
    mount_ok(&server, match_body("Main St", "4", "Springfield", "54321")).await;

    let book = MemoryAddressBook::new();
    let id = AddressId::new("addr-9");
    book.insert(residential_address("addr-9"));

    let svc = service(book.clone(), &server.uri());
    svc.validate_address(&id, true).await.expect("validates");
    let ignored = svc.ignore(&id, false).await.expect("ignore succeeds");

    let status = ignored.validation_status.expect("status written");
    assert!(!status.is_valid);
    assert_eq!(status.user_action, UserAction::Ignore);

    // The dismissal also suppresses rechecks inside the grace period.
    let report = svc.validate_address(&id, true).await.expect("validates");
    assert_eq!(report.outcome, ValidationOutcome::Invalid);
    assert!(report.suggestion.is_none());
}
