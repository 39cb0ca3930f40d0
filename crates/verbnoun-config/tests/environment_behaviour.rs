//! Behaviour tests for environment file loading and resource resolution.

use std::fs;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;
use verbnoun_config::{Config, ConfigError};

struct TestWorld {
    dir: TempDir,
    variable: Option<String>,
    config: Option<Config>,
    applied: Option<Result<Option<usize>, ConfigError>>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld {
        dir: TempDir::new().expect("temp dir"),
        variable: None,
        config: None,
        applied: None,
    }
}

impl TestWorld {
    fn env_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join("app.env")).expect("utf8 path")
    }

    fn config(&self) -> &Config {
        self.config.as_ref().expect("configuration not built")
    }
}

impl Drop for TestWorld {
    fn drop(&mut self) {
        if let Some(key) = self.variable.take() {
            // Scenario-owned variable; restore a clean environment for other tests.
            unsafe { std::env::remove_var(key) };
        }
    }
}

#[given("an environment file defining {key} as {value}")]
fn given_env_file(world: &mut TestWorld, key: String, value: String) {
    let name = key.trim_matches('"');
    let contents = format!("# scenario\nexport {name}=\"{}\"\n", value.trim_matches('"'));
    fs::write(world.env_path(), contents).expect("write env file");
    world.variable = Some(name.to_owned());
}

#[given("a configuration mapping connection {name} to {variable}")]
fn given_config(world: &mut TestWorld, name: String, variable: String) {
    let yaml = format!(
        "app: {{name: spam}}\nentrypoints: []\nterminal: {{verbs: [get], nouns: [thing]}}\n\
         environment: {{load_env: true, app_env: '{}'}}\n\
         db_connections: {{{}: {}}}\n",
        world.env_path(),
        name.trim_matches('"'),
        variable.trim_matches('"'),
    );
    world.config = Some(Config::from_yaml_str(&yaml).expect("valid config"));
}

#[when("the environment is loaded")]
fn when_loaded(world: &mut TestWorld) {
    world.applied = Some(world.config().load_environment());
}

#[then("{count} variable is applied")]
fn then_applied(world: &mut TestWorld, count: usize) {
    let applied = world
        .applied
        .as_ref()
        .expect("environment not loaded")
        .as_ref()
        .expect("environment load failed");
    assert_eq!(*applied, Some(count));
}

#[then("connection {name} resolves to {value}")]
fn then_resolves(world: &mut TestWorld, name: String, value: String) {
    let resolved = world
        .config()
        .connection_string(name.trim_matches('"'))
        .expect("connection resolves");
    assert_eq!(resolved, value.trim_matches('"'));
}

#[scenario(path = "tests/features/environment_file.feature")]
fn environment_file_behaviour(world: TestWorld) {
    let _ = world;
}
