use smartbookmarks::types::errors::*;

// === ValidationError Tests ===

#[test]
fn validation_error_display_variants() {
    assert_eq!(ValidationError::MissingFields.to_string(), "All fields are required");
    assert_eq!(ValidationError::InvalidUrl.to_string(), "Invalid URL format");
}

// === RemoteError Tests ===

#[test]
fn remote_error_display_variants() {
    assert_eq!(
        RemoteError::Network("connection refused".to_string()).to_string(),
        "Network error: connection refused"
    );
    assert_eq!(
        RemoteError::Rejected {
            status: 401,
            message: "JWT expired".to_string()
        }
        .to_string(),
        "Remote store rejected request (401): JWT expired"
    );
    assert_eq!(
        RemoteError::Decode("missing field `title`".to_string()).to_string(),
        "Malformed remote response: missing field `title`"
    );
    assert_eq!(
        RemoteError::Database("disk I/O error".to_string()).to_string(),
        "Bookmark database error: disk I/O error"
    );
}

#[test]
fn remote_error_from_rusqlite() {
    let err: RemoteError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, RemoteError::Database(_)));
}

// === StoreError Tests ===

#[test]
fn store_error_is_transparent_over_validation_and_remote() {
    let err: StoreError = ValidationError::MissingFields.into();
    assert_eq!(err.to_string(), "All fields are required");

    let err: StoreError = RemoteError::Network("timeout".to_string()).into();
    assert_eq!(err.to_string(), "Network error: timeout");
}

#[test]
fn store_error_display_variants() {
    assert_eq!(StoreError::Busy.to_string(), "Another change is still in progress");
    assert_eq!(StoreError::NotBound.to_string(), "No signed-in user");
}

// === EditError Tests ===

#[test]
fn edit_error_display_variants() {
    assert_eq!(EditError::NotEditing.to_string(), "No bookmark is being edited");
    assert_eq!(
        EditError::UnknownBookmark("bm-1".to_string()).to_string(),
        "Bookmark not found: bm-1"
    );
    let err: EditError = StoreError::from(ValidationError::InvalidUrl).into();
    assert_eq!(err.to_string(), "Invalid URL format");
}

// === AuthError / SessionError Tests ===

#[test]
fn auth_and_session_error_display_variants() {
    assert_eq!(AuthError::NoIdentity.to_string(), "No authenticated user");
    assert_eq!(
        AuthError::Provider("popup closed".to_string()).to_string(),
        "Auth provider error: popup closed"
    );
    let err: SessionError = AuthError::NoIdentity.into();
    assert_eq!(err.to_string(), "No authenticated user");
}

// === ConfigError Tests ===

#[test]
fn config_error_display_variants() {
    assert_eq!(ConfigError::Io("denied".to_string()).to_string(), "Config I/O error: denied");
    assert_eq!(
        ConfigError::Serialization("eof".to_string()).to_string(),
        "Config serialization error: eof"
    );
    assert_eq!(
        ConfigError::InvalidValue("bad".to_string()).to_string(),
        "Invalid config value: bad"
    );
}

#[test]
fn errors_implement_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(StoreError::Busy);
    assert!(err.source().is_none());
}
