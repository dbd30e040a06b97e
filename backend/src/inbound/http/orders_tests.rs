//! Tests for order HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockOrderCommand, MockOrderQuery};
use crate::domain::{Order, Principal, Role, StatusLedger};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::test_utils::{TEST_TOKEN, TestPorts, authenticating_as, test_state};
use crate::test_support::{FixtureClock, cutter_details, fixture_timestamp, principal};

fn test_app(
    ports: TestPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(test_state(ports))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api/v1")
                .service(create_order)
                .service(list_orders)
                .service(get_order_history)
                .service(get_order)
                .service(update_order)
                .service(delete_order),
        )
}

fn record_for(vendor: &Principal) -> OrderRecord {
    let order = Order::create(OrderId::random(), vendor.id, cutter_details(), fixture_timestamp());
    let upload = AttachmentUpload::new("plan.png", "image/png", b"abc".to_vec())
        .expect("valid upload");
    let attachment = Attachment::for_upload(*order.id(), &upload, fixture_timestamp());
    OrderRecord {
        order,
        attachments: vec![attachment],
    }
}

async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

#[actix_web::test]
async fn create_decodes_files_and_returns_created_order() {
    let vendor = principal(Role::Vendor);
    let record = record_for(&vendor);
    let mut orders = MockOrderCommand::new();
    orders
        .expect_create_order()
        .withf(move |caller, request| {
            caller == &vendor
                && request.details.quantity.get() == 3
                && request.details.preferred_date == chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                && request.files.len() == 1
                && request.files[0].content() == b"abc"
        })
        .return_once(move |_, _| Ok(record));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(vendor),
        orders,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(json!({
                "itemName": "Round cutter 5cm",
                "quantity": 3,
                "preferredDate": "2024-06-01",
                "files": [{
                    "filename": "plan.png",
                    "mimeType": "image/png",
                    "contentBase64": "YWJj"
                }]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["status"], "new");
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["vendorId"], vendor.id.to_string());
    assert_eq!(body["attachments"][0]["filename"], "plan.png");
    assert_eq!(body["attachments"][0]["sizeBytes"], 3);
}

#[rstest]
#[case(json!({"itemName": "", "quantity": 1}), "itemName")]
#[case(json!({"itemName": "Cutter", "quantity": 0}), "quantity")]
#[case(json!({"itemName": "Cutter", "quantity": 1, "preferredDate": "01/06/2024"}), "preferredDate")]
#[case(json!({"itemName": "Cutter", "quantity": 1, "notes": "x".repeat(NOTES_MAX + 1)}), "notes")]
#[case(
    json!({"itemName": "Cutter", "quantity": 1, "files": [
        {"filename": "a.png", "mimeType": "image/png", "contentBase64": "%%%"}
    ]}),
    "files"
)]
#[actix_web::test]
async fn create_rejects_invalid_fields_before_reaching_the_service(
    #[case] payload: Value,
    #[case] field: &str,
) {
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Vendor)),
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn create_without_token_is_unauthorized() {
    let app = actix_test::init_service(test_app(TestPorts::default())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .set_json(json!({"itemName": "Cutter", "quantity": 1}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_maps_domain_rejection_to_status() {
    let mut orders = MockOrderCommand::new();
    orders
        .expect_create_order()
        .return_once(|_, _| Err(Error::payload_too_large("plan.png is too large")));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Vendor)),
        orders,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(json!({"itemName": "Cutter", "quantity": 1}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[rstest]
#[case(Role::Viewer)]
#[case(Role::StaffCoordinator)]
#[case(Role::Admin)]
#[actix_web::test]
async fn create_by_non_vendor_is_forbidden_before_decoding(#[case] role: Role) {
    let mut orders = MockOrderCommand::new();
    orders.expect_create_order().never();
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(role)),
        orders,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(json!({"itemName": "", "quantity": 0, "files": [
                {"filename": "a.png", "mimeType": "image/png", "contentBase64": "%%%"}
            ]}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(read_json(response).await["code"], "forbidden");
}

#[actix_web::test]
async fn list_passes_status_filter() {
    let staff = principal(Role::StaffCoordinator);
    let vendor = principal(Role::Vendor);
    let record = record_for(&vendor);
    let mut orders_query = MockOrderQuery::new();
    orders_query
        .expect_list_orders()
        .withf(|_, status| *status == Some(OrderStatus::Ready))
        .return_once(move |_, _| Ok(vec![record]));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(staff),
        orders_query,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/orders?status=ready")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn list_rejects_unknown_status() {
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/orders?status=lost")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_enum");
}

#[actix_web::test]
async fn get_with_malformed_id_is_bad_request() {
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/orders/not-a-uuid")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn get_unknown_order_is_not_found() {
    let mut orders_query = MockOrderQuery::new();
    orders_query
        .expect_get_order()
        .return_once(|_, _| Err(Error::not_found("order not found")));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        orders_query,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/orders/{}", OrderId::random()))
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn history_lists_ledger_entries() {
    let vendor = principal(Role::Vendor);
    let record = record_for(&vendor);
    let order_id = *record.order.id();
    let ledger = StatusLedger::new(FixtureClock::frozen());
    let created = ledger.order_created(&record.order, vendor.id);
    let mut orders_query = MockOrderQuery::new();
    orders_query
        .expect_order_history()
        .withf(move |_, id| *id == order_id)
        .return_once(move |_, _| Ok(vec![created]));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(vendor),
        orders_query,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/orders/{order_id}/events"))
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body[0]["eventType"], "order.created");
    assert_eq!(body[0]["oldStatus"], Value::Null);
    assert_eq!(body[0]["newStatus"], "new");
}

#[actix_web::test]
async fn update_parses_status_and_pickup_time() {
    let staff = principal(Role::StaffCoordinator);
    let record = record_for(&principal(Role::Vendor));
    let pickup = fixture_timestamp() + chrono::Duration::days(1);
    let mut orders = MockOrderCommand::new();
    orders
        .expect_update_order()
        .withf(move |_, _, patch| {
            patch.status == Some(OrderStatus::Ready) && patch.pickup_time == Some(pickup)
        })
        .return_once(move |_, _, _| Ok(record));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(staff),
        orders,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/orders/{}", OrderId::random()))
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(json!({"status": "ready", "pickupTime": pickup.to_rfc3339()}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case(json!({"status": "shipped"}), "status")]
#[case(json!({"pickupTime": "tomorrow"}), "pickupTime")]
#[actix_web::test]
async fn update_rejects_unparseable_fields(#[case] payload: Value, #[case] field: &str) {
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/orders/{}", OrderId::random()))
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn delete_confirms_removal() {
    let mut orders = MockOrderCommand::new();
    orders.expect_delete_order().return_once(|_, _| Ok(()));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        orders,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/orders/{}", OrderId::random()))
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Order deleted successfully");
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Vendor)),
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"itemName\":")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
