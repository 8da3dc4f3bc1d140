use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, err};
use serial_test::serial;

// =========================================================================
// Validation Tests - Rate Limit
// =========================================================================

#[test]
#[serial]
fn given_zero_max_requests_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _requests = EnvGuard::set("LC_RATE_LIMIT_MAX_REQUESTS", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_window_above_max_when_validate_then_error_names_field() {
    // Given
    let _temp = setup_config_dir();
    let _window = EnvGuard::set("LC_RATE_LIMIT_WINDOW_SECS", "7200");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("rate_limit.window_secs"));
}
