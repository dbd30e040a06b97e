//! Tests for the domain user model.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};

#[fixture]
fn vendor() -> User {
    User::new(
        UserId::random(),
        DisplayName::new("Cutter Co").expect("valid name"),
        Email::new("orders@cutter.example").expect("valid email"),
        Role::Vendor,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("valid date"),
    )
}

#[rstest]
#[case("  Ada Lovelace  ", "Ada Lovelace")]
#[case("A", "A")]
fn display_name_trims_whitespace(#[case] raw: &str, #[case] expected: &str) {
    let name = DisplayName::new(raw).expect("valid display name");
    assert_eq!(name.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyDisplayName)]
#[case("   ", UserValidationError::EmptyDisplayName)]
fn display_name_rejects_blank(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(DisplayName::new(raw), Err(expected));
}

#[rstest]
fn display_name_rejects_overlong_input() {
    let raw = "a".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(raw),
        Err(UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        })
    );
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("no-at-sign.example", UserValidationError::InvalidEmail)]
#[case("@example.com", UserValidationError::InvalidEmail)]
#[case("user@", UserValidationError::InvalidEmail)]
#[case("user@localhost", UserValidationError::InvalidEmail)]
#[case("user@@example.com", UserValidationError::InvalidEmail)]
#[case("us er@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(raw), Err(expected));
}

#[rstest]
fn email_is_lowercased() {
    let email = Email::new("Staff@Workshop.Example").expect("valid email");
    assert_eq!(email.as_ref(), "staff@workshop.example");
}

#[rstest]
#[case("admin", Role::Admin)]
#[case("staff_coordinator", Role::StaffCoordinator)]
#[case("staff-coordinator", Role::StaffCoordinator)]
#[case("vendor", Role::Vendor)]
#[case("viewer", Role::Viewer)]
fn role_parses_known_values(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>(), Ok(expected));
}

#[rstest]
fn role_rejects_unknown_values() {
    let err = "jonan".parse::<Role>().expect_err("unknown role");
    assert_eq!(err.input, "jonan");
}

#[rstest]
fn role_serialises_as_snake_case() {
    let value = serde_json::to_value(Role::StaffCoordinator).expect("serialises");
    assert_eq!(value, serde_json::json!("staff_coordinator"));
    for role in Role::ALL {
        assert_eq!(role.to_string().parse::<Role>(), Ok(role));
    }
}

#[rstest]
fn only_admin_and_staff_are_staff() {
    assert!(Role::Admin.is_staff());
    assert!(Role::StaffCoordinator.is_staff());
    assert!(!Role::Vendor.is_staff());
    assert!(!Role::Viewer.is_staff());
}

#[rstest]
fn apply_replaces_only_present_fields(mut vendor: User) {
    let original_email = vendor.email().clone();
    vendor.apply(UserPatch {
        name: Some(DisplayName::new("Cutter Collective").expect("valid name")),
        email: None,
        role: Some(Role::Viewer),
    });

    assert_eq!(vendor.name().as_ref(), "Cutter Collective");
    assert_eq!(vendor.email(), &original_email);
    assert_eq!(vendor.role(), Role::Viewer);
}
