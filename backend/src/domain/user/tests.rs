//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn profile() -> UserProfile {
    UserProfile {
        first_name: PersonName::new("Ada", "firstName").expect("first name"),
        last_name: PersonName::new("Lovelace", "lastName").expect("last name"),
        email: Email::new("ada@college.edu").expect("email"),
        contact_number: ContactNumber::new("9876543210").expect("contact"),
        department: Department::new("BCA").expect("department"),
        role: Role::Student,
    }
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("users/abc", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
#[case("abc\tdef", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
#[case(VALID_ID)]
#[case("kX3v9QmZr2T8pLbN4cYw1HdEa0F2")]
fn user_id_accepts_provider_issued_ids(#[case] raw: &str) {
    assert_eq!(UserId::new(raw).expect("valid id").as_ref(), raw);
}

#[rstest]
fn user_id_round_trips_through_serde() {
    let id = UserId::new(VALID_ID).expect("valid id");
    let json = serde_json::to_string(&id).expect("serialise id");
    assert_eq!(json, format!("\"{VALID_ID}\""));
    let back: UserId = serde_json::from_str(&json).expect("deserialise id");
    assert_eq!(back, id);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("ada", UserValidationError::InvalidEmail)]
#[case("ada@college", UserValidationError::InvalidEmail)]
#[case("a da@college.edu", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(raw).expect_err("invalid email"), expected);
}

#[rstest]
fn email_is_normalised() {
    let email = Email::new(" Admin@College.EDU ").expect("valid email");
    assert_eq!(email.as_ref(), "admin@college.edu");
}

#[rstest]
#[case("12345")]
#[case("12345678901")]
#[case("98765-4321")]
#[case("98765432ab")]
fn contact_number_requires_ten_digits(#[case] raw: &str) {
    assert_eq!(
        ContactNumber::new(raw).expect_err("invalid contact"),
        UserValidationError::InvalidContactNumber
    );
}

#[rstest]
#[case("student", Role::Student)]
#[case("Faculty", Role::Faculty)]
#[case(" ADMIN ", Role::Admin)]
fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
    assert_eq!(raw.parse::<Role>().expect("known role"), expected);
}

#[rstest]
fn role_rejects_unknown_values() {
    let err = "janitor".parse::<Role>().expect_err("unknown role");
    assert_eq!(err.field(), "role");
    assert_eq!(err.code(), "unknown_role");
}

#[rstest]
fn person_name_reports_field_and_length() {
    let long = "x".repeat(PERSON_NAME_MAX + 1);
    let err = PersonName::new(long, "lastName").expect_err("too long");
    assert_eq!(err.field(), "lastName");
    assert_eq!(err.to_string(), "lastName must be at most 64 characters");
}

#[rstest]
fn user_exposes_profile_fields(profile: UserProfile) {
    let id = UserId::new(VALID_ID).expect("valid id");
    let user = User::new(id.clone(), profile);
    assert_eq!(user.id(), &id);
    assert_eq!(user.first_name().as_ref(), "Ada");
    assert_eq!(user.email().as_ref(), "ada@college.edu");
    assert_eq!(user.contact_number().as_ref(), "9876543210");
    assert_eq!(user.department().as_ref(), "BCA");
    assert_eq!(user.role(), Role::Student);
}
