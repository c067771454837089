//! Field rules for book payloads.

use shelf_http::validation::{Constraint, FieldRule, Validate};

use super::models::{CreateBook, UpdateBook};

pub const TITLE_MAX_LENGTH: usize = 50;
pub const TITLE_TOO_LONG: &str = "Title is too long. Maximum length is 50 characters.";

const TITLE_CONSTRAINTS: &[Constraint] = &[
    Constraint::NotEmpty,
    Constraint::IsString,
    Constraint::MaxLength {
        max: TITLE_MAX_LENGTH,
        message: TITLE_TOO_LONG,
    },
];

const ISBN_CONSTRAINTS: &[Constraint] = &[
    Constraint::NotEmpty,
    Constraint::IsString,
    Constraint::Isbn13,
];

impl Validate for CreateBook {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("title", TITLE_CONSTRAINTS),
        FieldRule::required("isbn", ISBN_CONSTRAINTS),
    ];
}

// `isbn` is absent on purpose: it is stripped from update payloads.
impl Validate for UpdateBook {
    const RULES: &'static [FieldRule] = &[FieldRule::optional("title", TITLE_CONSTRAINTS)];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shelf_http::validation::{validate, Violation};

    #[test]
    fn create_accepts_valid_payload_and_strips_extras() {
        let normalized = validate(
            &json!({"title": "Dune", "isbn": "9780441172719", "id": 7}),
            CreateBook::RULES,
        )
        .unwrap();
        assert_eq!(normalized.len(), 2);
        assert!(!normalized.contains_key("id"));
    }

    #[test]
    fn create_rejects_long_title_with_configured_message() {
        let violations = validate(
            &json!({"title": "x".repeat(51), "isbn": "9780441172719"}),
            CreateBook::RULES,
        )
        .unwrap_err();
        assert_eq!(violations, vec![Violation::new("title", TITLE_TOO_LONG)]);
    }

    #[test]
    fn create_accepts_title_of_exactly_fifty_characters() {
        let title = "é".repeat(TITLE_MAX_LENGTH);
        assert!(validate(&json!({"title": title, "isbn": "9780441172719"}), CreateBook::RULES).is_ok());
    }

    #[test]
    fn create_rejects_malformed_isbn() {
        let violations =
            validate(&json!({"title": "Dune", "isbn": "0441172717"}), CreateBook::RULES).unwrap_err();
        assert_eq!(violations, vec![Violation::new("isbn", "isbn must be an ISBN")]);
    }

    #[test]
    fn create_requires_both_fields() {
        let violations = validate(&json!({}), CreateBook::RULES).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "isbn"]);
    }

    #[test]
    fn update_rejects_long_title() {
        let violations =
            validate(&json!({"title": "y".repeat(60)}), UpdateBook::RULES).unwrap_err();
        assert_eq!(violations[0].message, TITLE_TOO_LONG);
    }

    #[test]
    fn update_rejects_empty_title() {
        let violations = validate(&json!({"title": ""}), UpdateBook::RULES).unwrap_err();
        assert_eq!(violations[0].message, "title should not be empty");
    }

    #[test]
    fn update_ignores_isbn() {
        let normalized = validate(
            &json!({"title": "Dune Messiah", "isbn": "9780593098233"}),
            UpdateBook::RULES,
        )
        .unwrap();
        assert!(!normalized.contains_key("isbn"));
        assert_eq!(normalized["title"], "Dune Messiah");
    }
}
