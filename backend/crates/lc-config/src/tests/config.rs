use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir, write_config};

use googletest::assert_that;
use googletest::prelude::{anything, eq, none, ok, some};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let _temp = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.server.port, eq(crate::DEFAULT_PORT));
    assert_that!(
        config.server.max_connections,
        eq(crate::DEFAULT_MAX_CONNECTIONS)
    );
    assert_that!(config.broker.history_limit, eq(50));
    assert_that!(config.broker.message_retention_cap, eq(1000));
    assert_that!(config.logging.file, none());
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_then_directory_is_created() {
    // Given
    let temp = tempfile::TempDir::new().unwrap();
    let nested = temp.path().join("nested").join(".lc");
    let _guard = EnvGuard::set("LC_CONFIG_DIR", nested.to_str().unwrap());

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    assert_that!(nested.is_dir(), eq(true));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(
        temp.path(),
        r#"
            [server]
            port = 9000
            max_connections = 5000

            [broker]
            typing_ttl_secs = 15
            history_limit = 25
        "#,
    );

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(9000));
    assert_that!(config.server.max_connections, eq(5000));
    assert_that!(config.broker.typing_ttl_secs, eq(15));
    assert_that!(config.broker.history_limit, eq(25));
    // Untouched fields keep their defaults
    assert_that!(config.broker.message_retention_cap, eq(1000));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(
        temp.path(),
        r#"
            [server]
            port = 9000
        "#,
    );
    let _port = EnvGuard::set("LC_SERVER_PORT", "9100");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(9100));
}

#[test]
#[serial]
fn given_broker_env_vars_when_load_then_broker_section_overridden() {
    // Given
    let _temp = setup_config_dir();
    let _cap = EnvGuard::set("LC_MESSAGE_RETENTION_CAP", "200");
    let _ttl = EnvGuard::set("LC_TYPING_TTL_SECS", "5");
    let _len = EnvGuard::set("LC_MAX_MESSAGE_LENGTH", "500");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.broker.message_retention_cap, eq(200));
    assert_that!(config.broker.typing_ttl_secs, eq(5));
    assert_that!(config.broker.max_message_length, eq(500));
}

#[test]
#[serial]
fn given_unparseable_env_var_when_load_then_value_is_ignored() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("LC_SERVER_PORT", "not-a-port");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(crate::DEFAULT_PORT));
}

#[test]
#[serial]
fn given_log_env_vars_when_load_then_logging_overridden() {
    // Given
    let _temp = setup_config_dir();
    let _level = EnvGuard::set("LC_LOG_LEVEL", "debug");
    let _colored = EnvGuard::set("LC_LOG_COLORED", "1");
    let _file = EnvGuard::set("LC_LOG_FILE", "broker.log");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(*config.logging.level, eq(log::LevelFilter::Debug));
    assert_that!(config.logging.colored, eq(true));
    assert_that!(config.logging.file.as_deref(), some(eq("broker.log")));
}

#[test]
#[serial]
fn given_log_file_when_log_file_path_then_joined_under_config_dir() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _file = EnvGuard::set("LC_LOG_FILE", "broker.log");
    let _dir = EnvGuard::remove("LC_LOG_DIR");

    // When
    let config = Config::load().unwrap();
    let path = config.log_file_path().unwrap();

    // Then
    assert_that!(
        path,
        some(eq(&temp.path().join(crate::DEFAULT_LOG_DIRECTORY).join("broker.log")))
    );
}

#[test]
#[serial]
fn given_host_and_port_when_bind_addr_then_formatted() {
    // Given
    let _temp = setup_config_dir();
    let _host = EnvGuard::set("LC_SERVER_HOST", "0.0.0.0");
    let _port = EnvGuard::set("LC_SERVER_PORT", "8123");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.bind_addr(), eq("0.0.0.0:8123"));
}
