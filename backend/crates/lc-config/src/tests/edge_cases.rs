use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir, write_config};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Edge Cases
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error_mentions_file() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(temp.path(), "this is not valid toml {{{{");

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("config.toml"));
}

#[test]
#[serial]
fn given_log_file_with_traversal_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _file = EnvGuard::set("LC_LOG_FILE", "../../etc/broker.log");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring(".."));
}

#[test]
#[serial]
fn given_unknown_section_in_toml_when_load_then_ignored() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(
        temp.path(),
        r#"
            [future_feature]
            enabled = true
        "#,
    );

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_empty_toml_file_when_load_then_defaults() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(temp.path(), "");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.websocket.send_buffer_size, eq(100));
    assert_that!(config.rate_limit.max_requests, eq(100));
}
