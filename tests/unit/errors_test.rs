use chatking::types::errors::*;

#[test]
fn test_tab_error_display() {
    let err = TabError::NotFound("abc-123".to_string());
    assert_eq!(format!("{}", err), "Tab not found: abc-123");
}

#[test]
fn test_search_error_display() {
    let network = SearchError::Network("connection refused".to_string());
    assert_eq!(format!("{}", network), "Search network error: connection refused");

    let http = SearchError::Http {
        status: 502,
        url: "http://localhost:3000/api/web/search".to_string(),
    };
    assert_eq!(
        format!("{}", http),
        "Search backend returned HTTP 502 for http://localhost:3000/api/web/search"
    );

    let decode = SearchError::Decode("expected value at line 1".to_string());
    assert_eq!(
        format!("{}", decode),
        "Search response decode error: expected value at line 1"
    );
}

#[test]
fn test_browse_error_display() {
    assert_eq!(format!("{}", BrowseError::EmptyQuery), "Search query is empty");
    assert_eq!(format!("{}", BrowseError::EmptyInput), "Address bar input is empty");
}

#[test]
fn test_browse_error_wraps_tab_error_transparently() {
    let err: BrowseError = TabError::NotFound("t1".to_string()).into();
    assert_eq!(err, BrowseError::Tab(TabError::NotFound("t1".to_string())));
    assert_eq!(format!("{}", err), "Tab not found: t1");
}

#[test]
fn test_settings_error_display() {
    assert_eq!(
        format!("{}", SettingsError::IoError("disk full".to_string())),
        "Settings I/O error: disk full"
    );
    assert_eq!(
        format!("{}", SettingsError::SerializationError("bad json".to_string())),
        "Settings serialization error: bad json"
    );
    assert_eq!(
        format!("{}", SettingsError::InvalidKey("foo.bar".to_string())),
        "Invalid settings key: foo.bar"
    );
    assert_eq!(
        format!("{}", SettingsError::InvalidValue("not a number".to_string())),
        "Invalid settings value: not a number"
    );
}

#[test]
fn test_errors_implement_std_error() {
    fn assert_error<E: std::error::Error>() {}
    assert_error::<TabError>();
    assert_error::<SearchError>();
    assert_error::<BrowseError>();
    assert_error::<SettingsError>();
}
