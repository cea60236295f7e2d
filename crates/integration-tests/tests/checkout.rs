//! Integration tests for checkout against the fake order service.
//!
//! These tests verify the precondition order, the request body, how
//! failures are reported, and that only a successful order resets the
//! session.

use std::time::Duration;

use beanstall_core::{MenuId, OrderAck, OrderForm, PostcodeError, ValidationError};
use beanstall_integration_tests::{
    FakeService, Method, SilentService, loaded_session, sample_menu,
};
use beanstall_storefront::services::catalog;
use beanstall_storefront::services::checkout::{self, CheckoutOutcome};
use beanstall_storefront::{Action, ApiClient, ClientConfig, ClientError, Session};
use serde_json::json;

async fn service_with_menu() -> FakeService {
    let service = FakeService::start().await;
    service.serve_menu(&sample_menu());
    service
}

fn fill(session: &mut Session, picks: &[(i64, u32)], form: OrderForm) {
    for &(id, count) in picks {
        for _ in 0..count {
            session.add_to_cart(MenuId::new(id)).expect("cart has room");
        }
    }
    *session.form_mut() = form;
}

fn valid_form() -> OrderForm {
    OrderForm::new("buyer@example.com", "Seoul, Gangnam-gu", "06236")
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_checkout_sends_order_and_resets_session() {
    let service = service_with_menu().await;
    service.respond_json(Method::POST, "/order", 200, &json!({"message": "Thanks!"}));
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;

    // Added out of catalog order; lines go out in catalog order.
    fill(&mut session, &[(3, 1), (1, 2)], valid_form());

    let outcome = checkout::checkout(&client, &mut session)
        .await
        .expect("checkout succeeds");

    let CheckoutOutcome::Placed(receipt) = outcome else {
        panic!("expected Placed, got {outcome:?}");
    };
    assert_eq!(receipt.ack.message.as_deref(), Some("Thanks!"));
    assert_eq!(receipt.total_count, 3);
    assert_eq!(receipt.total_price, 5000 * 2 + 7000);

    let orders = service.requests_to(&Method::POST, "/order");
    assert_eq!(orders.len(), 1);
    assert_eq!(
        orders.first().expect("one order").body,
        json!({
            "email": "buyer@example.com",
            "address": "Seoul, Gangnam-gu",
            "postcode": 6236,
            "items": [
                {"menuId": 1, "count": 2},
                {"menuId": 3, "count": 1},
            ],
        })
    );

    assert!(session.cart().is_empty());
    assert_eq!(session.form(), &OrderForm::default());
    assert!(!session.is_in_flight(Action::Checkout));
}

#[tokio::test]
async fn test_empty_success_body_is_accepted() {
    let service = service_with_menu().await;
    service.respond_text(Method::POST, "/order", 200, "");
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    fill(&mut session, &[(2, 1)], valid_form());

    let outcome = checkout::checkout(&client, &mut session)
        .await
        .expect("empty body is a success");
    assert!(matches!(outcome, CheckoutOutcome::Placed(ref r) if r.ack.message.is_none()));
    assert!(session.cart().is_empty());
}

// =============================================================================
// Preconditions
// =============================================================================

#[tokio::test]
async fn test_empty_cart_sends_nothing() {
    let service = service_with_menu().await;
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    *session.form_mut() = valid_form();

    let outcome = checkout::checkout(&client, &mut session)
        .await
        .expect("empty cart is not an error");
    assert_eq!(outcome, CheckoutOutcome::NothingToOrder);
    assert!(service.requests_to(&Method::POST, "/order").is_empty());
}

#[tokio::test]
async fn test_short_postcode_sends_nothing() {
    let service = service_with_menu().await;
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    fill(
        &mut session,
        &[(1, 1)],
        OrderForm::new("buyer@example.com", "Seoul", "123"),
    );

    let err = checkout::checkout(&client, &mut session)
        .await
        .expect_err("postcode is too short");
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::InvalidPostcode(
            PostcodeError::WrongLength { expected: 5 }
        ))
    ));
    assert!(service.requests_to(&Method::POST, "/order").is_empty());
    assert_eq!(session.total_count(), 1);
}

#[tokio::test]
async fn test_email_is_checked_before_postcode() {
    let service = service_with_menu().await;
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    fill(&mut session, &[(1, 1)], OrderForm::new("buyer", "Seoul", "1"));

    let err = checkout::checkout(&client, &mut session)
        .await
        .expect_err("both fields are invalid");
    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::InvalidEmail(_))
    ));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_server_error_message_is_surfaced_and_cart_kept() {
    let service = service_with_menu().await;
    service.respond_json(Method::POST, "/order", 500, &json!({"error": "db down"}));
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    fill(&mut session, &[(1, 2)], valid_form());

    let err = checkout::checkout(&client, &mut session)
        .await
        .expect_err("service failed");
    match &err {
        ClientError::Rejected { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "db down");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert_eq!(err.status(), Some(500));

    assert_eq!(session.total_count(), 2);
    assert_eq!(session.form(), &valid_form());
    assert!(!session.is_in_flight(Action::Checkout));
}

#[tokio::test]
async fn test_failed_checkout_can_be_retried() {
    let service = service_with_menu().await;
    service.respond_text(Method::POST, "/order", 503, "try later");
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    fill(&mut session, &[(1, 1)], valid_form());

    let err = checkout::checkout(&client, &mut session)
        .await
        .expect_err("first attempt fails");
    assert!(matches!(err, ClientError::Rejected { status: 503, ref message } if message == "try later"));

    service.respond_json(Method::POST, "/order", 200, &json!({}));
    let outcome = checkout::checkout(&client, &mut session)
        .await
        .expect("second attempt succeeds");
    assert!(matches!(outcome, CheckoutOutcome::Placed(_)));
    assert_eq!(service.requests_to(&Method::POST, "/order").len(), 2);
}

#[tokio::test]
async fn test_unreachable_service_is_a_transport_error() {
    let service = service_with_menu().await;
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    fill(&mut session, &[(1, 1)], valid_form());

    // Grab a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("address").port();
    drop(listener);
    let config =
        ClientConfig::for_api_url(&format!("http://127.0.0.1:{port}/api")).expect("valid URL");
    let offline = ApiClient::new(&config).expect("build client");

    let err = checkout::checkout(&offline, &mut session)
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(!err.is_local());
    assert_eq!(session.total_count(), 1);
}

#[tokio::test]
async fn test_checkout_in_flight_is_busy() {
    let service = service_with_menu().await;
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    fill(&mut session, &[(1, 1)], valid_form());

    let pending = checkout::begin(&mut session)
        .expect("valid")
        .expect("cart not empty");
    let err = checkout::checkout(&client, &mut session)
        .await
        .expect_err("first checkout still pending");
    assert!(matches!(err, ClientError::Busy(Action::Checkout)));
    assert!(service.requests_to(&Method::POST, "/order").is_empty());

    service.respond_json(Method::POST, "/order", 200, &json!({}));
    let result = pending.submit(&client).await;
    let outcome = checkout::finish(&mut session, pending, result).expect("placed");
    assert!(matches!(outcome, CheckoutOutcome::Placed(_)));
}

// =============================================================================
// Cancellation and overlap
// =============================================================================

#[tokio::test]
async fn test_cancelled_checkout_can_be_retried() {
    let service = service_with_menu().await;
    service.respond_json(Method::POST, "/order", 200, &json!({}));
    let client = service.client();
    let mut session = loaded_session(&service, &client).await;
    fill(&mut session, &[(1, 1)], valid_form());

    let silent = SilentService::start().await;
    let timed_out = tokio::time::timeout(
        Duration::from_millis(200),
        checkout::checkout(&silent.client(), &mut session),
    )
    .await;
    assert!(timed_out.is_err(), "silent service should never answer");

    // Dropping the request future released the checkout mark.
    assert!(!session.is_in_flight(Action::Checkout));
    assert_eq!(session.total_count(), 1);

    let outcome = checkout::checkout(&client, &mut session)
        .await
        .expect("retry succeeds");
    assert!(matches!(outcome, CheckoutOutcome::Placed(_)));
}

/// Carts items 1 and 3, begins a checkout, then reloads a menu without item 3.
async fn checkout_overlapping_refresh(
    service: &FakeService,
    client: &ApiClient,
) -> (Session, checkout::PendingCheckout) {
    let mut session = loaded_session(service, client).await;
    fill(&mut session, &[(1, 2), (3, 1)], valid_form());

    let pending = checkout::begin(&mut session)
        .expect("valid")
        .expect("cart not empty");
    assert_eq!(pending.request().items.len(), 2);

    service.serve_menu(&json!([
        {"menuId": 1, "menuName": "Columbia Narino", "price": 5000},
        {"menuId": 2, "menuName": "Brazil Serra Do Caparao", "price": 6000},
    ]));
    catalog::refresh(client, &mut session)
        .await
        .expect("refresh runs alongside checkout");
    assert!(session.is_in_flight(Action::Checkout));
    assert_eq!(session.total_count(), 2);

    (session, pending)
}

#[tokio::test]
async fn test_refresh_during_checkout_then_success_clears_cart() {
    let service = service_with_menu().await;
    let client = service.client();
    let (mut session, pending) = checkout_overlapping_refresh(&service, &client).await;

    let outcome = checkout::finish(&mut session, pending, Ok(OrderAck::default()))
        .expect("placed");

    let CheckoutOutcome::Placed(receipt) = outcome else {
        panic!("expected Placed, got {outcome:?}");
    };
    // The receipt describes what was sent, not the refreshed catalog.
    assert_eq!(receipt.total_count, 3);
    assert_eq!(receipt.total_price, 5000 * 2 + 7000);
    assert!(session.cart().is_empty());
    assert!(!session.is_in_flight(Action::Checkout));
}

#[tokio::test]
async fn test_refresh_during_checkout_then_failure_keeps_pruned_cart() {
    let service = service_with_menu().await;
    let client = service.client();
    let (mut session, pending) = checkout_overlapping_refresh(&service, &client).await;

    let failed = Err(ClientError::Rejected {
        status: 500,
        message: "db down".to_string(),
    });
    checkout::finish(&mut session, pending, failed).expect_err("order failed");

    assert_eq!(session.cart().quantity(MenuId::new(1)), 2);
    assert_eq!(session.cart().quantity(MenuId::new(3)), 0);
    assert_eq!(session.total_price(), 10_000);
    assert_eq!(session.form(), &valid_form());
    assert!(!session.is_in_flight(Action::Checkout));
}
