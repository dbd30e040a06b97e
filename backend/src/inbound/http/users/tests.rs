//! Tests for users API handlers.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockUsersCommand, MockUsersQuery};
use crate::inbound::http::test_utils::{TEST_TOKEN, TestPorts, authenticating_as, test_state};
use crate::test_support::{principal, user_with};

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
    App::new().app_data(test_state(ports)).service(
        web::scope("/api/v1")
            .service(create_user)
            .service(list_users)
            .service(current_user)
            .service(get_user)
            .service(update_user)
            .service(delete_user),
    )
}

async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

#[actix_web::test]
async fn create_normalises_email_and_returns_created_user() {
    let admin = principal(Role::Admin);
    let created = user_with(&principal(Role::Vendor), "ada@example.com");
    let expected = created.clone();
    let mut users = MockUsersCommand::new();
    users
        .expect_create_user()
        .withf(|_, draft| draft.email.as_ref() == "ada@example.com" && draft.role == Role::Vendor)
        .return_once(move |_, _| Ok(created));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(admin),
        users,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(json!({"name": "Ada", "email": " ADA@example.com ", "role": "vendor"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["id"], expected.id().to_string());
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["role"], "vendor");
}

#[rstest]
#[case(json!({"name": "", "email": "a@example.com", "role": "vendor"}), "name", "invalid_value")]
#[case(json!({"name": "Ada", "email": "nope", "role": "vendor"}), "email", "invalid_value")]
#[case(json!({"name": "Ada", "email": "a@example.com", "role": "owner"}), "role", "invalid_enum")]
#[actix_web::test]
async fn create_rejects_invalid_fields(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn duplicate_email_is_conflict() {
    let mut users = MockUsersCommand::new();
    users
        .expect_create_user()
        .return_once(|_, _| Err(Error::conflict("email already registered")));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        users,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(json!({"name": "Ada", "email": "a@example.com", "role": "viewer"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn me_is_routed_before_id_lookup() {
    let vendor = principal(Role::Vendor);
    let me = user_with(&vendor, "vendor@example.com");
    let mut users_query = MockUsersQuery::new();
    users_query
        .expect_current_user()
        .withf(move |caller| *caller == vendor)
        .return_once(move |_| Ok(me));
    users_query.expect_get_user().never();
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(vendor),
        users_query,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["email"], "vendor@example.com");
    assert!(body.get("createdAt").is_some());
}

#[actix_web::test]
async fn list_forbidden_for_non_admin() {
    let mut users_query = MockUsersQuery::new();
    users_query
        .expect_list_users()
        .return_once(|_| Err(Error::forbidden("admin only")));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Viewer)),
        users_query,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn update_forwards_partial_patch() {
    let admin = principal(Role::Admin);
    let target = principal(Role::Viewer);
    let target_id = target.id;
    let updated = user_with(&principal(Role::StaffCoordinator), "staff@example.com");
    let mut users = MockUsersCommand::new();
    users
        .expect_update_user()
        .withf(move |_, id, patch| {
            *id == target_id
                && patch.role == Some(Role::StaffCoordinator)
                && patch.name.is_none()
                && patch.email.is_none()
        })
        .return_once(move |_, _, _| Ok(updated));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(admin),
        users,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/users/{target_id}"))
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .set_json(json!({"role": "staff_coordinator"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["role"], "staff_coordinator");
}

#[actix_web::test]
async fn delete_confirms_removal() {
    let mut users = MockUsersCommand::new();
    users.expect_delete_user().return_once(|_, _| Ok(()));
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        users,
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{}", UserId::random()))
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "User deleted successfully");
}

#[actix_web::test]
async fn malformed_user_id_is_bad_request() {
    let app = actix_test::init_service(test_app(TestPorts {
        authenticator: authenticating_as(principal(Role::Admin)),
        ..TestPorts::default()
    }))
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/42")
            .insert_header((AUTHORIZATION, TEST_TOKEN))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
