//! Behaviour tests for session cookie configuration.
//!
//! Debug builds should come up with nothing configured; release builds only
//! accept explicit, safe settings.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::collections::HashMap;

use actix_web::cookie::SameSite;
use civic_complaints::inbound::http::session_config::{
    ALLOW_EPHEMERAL_ENV, BuildMode, COOKIE_SECURE_ENV, KEY_FILE_ENV, SAMESITE_ENV,
    SessionConfigError, SessionSettings, session_settings_from_env,
};
use mockable::MockEnv;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

struct SessionConfigWorld {
    vars: RefCell<HashMap<String, String>>,
    mode: RefCell<BuildMode>,
    outcome: RefCell<Option<Result<SessionSettings, SessionConfigError>>>,
    key_dir: TempDir,
}

impl SessionConfigWorld {
    fn new() -> Self {
        Self {
            vars: RefCell::new(HashMap::new()),
            mode: RefCell::new(BuildMode::Release),
            outcome: RefCell::new(None),
            key_dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    fn set_env_var(&self, name: &str, value: &str) {
        self.vars
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }

    fn key_path(&self) -> String {
        self.key_dir
            .path()
            .join("session_key")
            .to_str()
            .expect("temporary path should be valid UTF-8")
            .to_owned()
    }

    fn evaluate(&self) {
        let vars = self.vars.borrow().clone();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        let result = session_settings_from_env(&env, *self.mode.borrow());
        *self.outcome.borrow_mut() = Some(result);
    }

    fn with_settings(&self, check: impl FnOnce(&SessionSettings)) {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("evaluation result") {
            Ok(settings) => check(settings),
            Err(error) => panic!("expected settings to load, got {error}"),
        }
    }

    fn with_error(&self, check: impl FnOnce(&SessionConfigError)) {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("evaluation result") {
            Ok(_) => panic!("expected settings to fail"),
            Err(error) => check(error),
        }
    }
}

#[fixture]
fn world() -> SessionConfigWorld {
    SessionConfigWorld::new()
}

#[given("a debug build configuration")]
fn a_debug_build_configuration(world: &SessionConfigWorld) {
    *world.mode.borrow_mut() = BuildMode::Debug;
}

#[given("a release build configuration")]
fn a_release_build_configuration(world: &SessionConfigWorld) {
    *world.mode.borrow_mut() = BuildMode::Release;
}

#[given("the session key file does not exist")]
fn the_session_key_file_does_not_exist(world: &SessionConfigWorld) {
    world.set_env_var(KEY_FILE_ENV, &world.key_path());
}

#[given("a session key file with {len} bytes")]
fn a_session_key_file_with_bytes(world: &SessionConfigWorld, len: usize) {
    let path = world.key_path();
    std::fs::write(&path, vec![b'k'; len]).expect("write key file");
    world.set_env_var(KEY_FILE_ENV, &path);
}

#[given("CIVIC_SESSION_COOKIE_SECURE is set to {value}")]
fn cookie_secure_is_set(world: &SessionConfigWorld, value: String) {
    world.set_env_var(COOKIE_SECURE_ENV, &value);
}

#[given("CIVIC_SESSION_SAMESITE is set to {value}")]
fn same_site_is_set(world: &SessionConfigWorld, value: String) {
    world.set_env_var(SAMESITE_ENV, &value);
}

#[given("CIVIC_SESSION_ALLOW_EPHEMERAL is set to {value}")]
fn allow_ephemeral_is_set(world: &SessionConfigWorld, value: String) {
    world.set_env_var(ALLOW_EPHEMERAL_ENV, &value);
}

#[when("the session configuration is loaded")]
fn the_session_configuration_is_loaded(world: &SessionConfigWorld) {
    world.evaluate();
}

#[then("the configuration load succeeds")]
fn the_configuration_load_succeeds(world: &SessionConfigWorld) {
    world.with_settings(|_| {});
}

#[then("the cookie secure flag is true")]
fn the_cookie_secure_flag_is_true(world: &SessionConfigWorld) {
    world.with_settings(|settings| assert!(settings.cookie_secure));
}

#[then("the SameSite policy is Lax")]
fn the_same_site_policy_is_lax(world: &SessionConfigWorld) {
    world.with_settings(|settings| assert_eq!(settings.same_site, SameSite::Lax));
}

#[then("the SameSite policy is Strict")]
fn the_same_site_policy_is_strict(world: &SessionConfigWorld) {
    world.with_settings(|settings| assert_eq!(settings.same_site, SameSite::Strict));
}

#[then("the configuration load fails because ephemeral keys are not allowed")]
fn configuration_fails_ephemeral_not_allowed(world: &SessionConfigWorld) {
    world.with_error(|error| assert!(matches!(error, SessionConfigError::EphemeralNotAllowed)));
}

#[scenario(path = "tests/features/session_config.feature", index = 0)]
fn debug_builds_start_unconfigured(world: SessionConfigWorld) {
    drop(world);
}

#[scenario(path = "tests/features/session_config.feature", index = 1)]
fn debug_builds_ignore_bad_same_site(world: SessionConfigWorld) {
    drop(world);
}

#[scenario(path = "tests/features/session_config.feature", index = 2)]
fn release_builds_accept_complete_settings(world: SessionConfigWorld) {
    drop(world);
}

#[scenario(path = "tests/features/session_config.feature", index = 3)]
fn release_builds_refuse_ephemeral_keys(world: SessionConfigWorld) {
    drop(world);
}
