use super::*;

#[test]
fn validation_error_names_path_and_field() {
    let e = ValidationError::new(
        "card.sections[0]",
        "widgets",
        ValidationErrorKind::TooMany {
            limit: 100,
            actual: 101,
        },
    );
    assert_eq!(
        e.to_string(),
        "card.sections[0].widgets has 101 entries, at most 100 allowed"
    );
}

#[test]
fn setter_error_without_path_starts_at_the_field() {
    let e = ValidationError::out_of_range("cornerRadius", "must be positive");
    assert_eq!(e.to_string(), "cornerRadius is out of range: must be positive");
}

#[test]
fn validation_errors_join_with_semicolons() {
    let errors = ValidationErrors(vec![
        ValidationError::new("card", "sections", ValidationErrorKind::Required),
        ValidationError::new("card.header", "title", ValidationErrorKind::Required),
    ]);
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.to_string(),
        "card.sections is required; card.header.title is required"
    );
}

#[test]
fn single_error_converts_into_list() {
    let errors: ValidationErrors = ValidationError::out_of_range("maxLines", "must be at least 1").into();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.iter().next().map(|e| e.field.as_str()), Some("maxLines"));
}

#[test]
fn missing_required_fields_lists_every_name() {
    let e = EngineError::MissingRequiredFields(vec!["email".to_string(), "name".to_string()]);
    assert_eq!(e.to_string(), "missing required fields: email, name");
}

#[test]
fn authorization_required_is_a_distinct_dispatch_error() {
    let auth = AuthorizationRequired {
        resource_display_name: "Calendar".to_string(),
        authorization_url: "https://auth.example.com/start".to_string(),
    };
    let e: DispatchError = auth.clone().into();
    assert!(matches!(e, DispatchError::AuthorizationRequired(ref a) if *a == auth));
    assert_eq!(e.to_string(), auth.to_string());
}

#[test]
fn navigation_error_converts_into_engine_error() {
    let e: EngineError = NavigationError::NamedCardNotFound {
        name: "Z".to_string(),
    }
    .into();
    assert!(matches!(
        e,
        EngineError::Navigation(NavigationError::NamedCardNotFound { ref name }) if name == "Z"
    ));
    assert_eq!(e.to_string(), "no card named `Z` on the navigation stack");
}

#[test]
fn wire_version_error_reports_both_versions() {
    let e = WireError::UnsupportedVersion {
        found: 3,
        supported: 1,
    };
    assert_eq!(
        e.to_string(),
        "wire version 3 is newer than supported version 1"
    );
}
