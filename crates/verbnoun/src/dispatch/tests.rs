//! Unit tests for dispatch and the exit contract.

use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use verbnoun_config::{Config, ConfigError};

use super::*;
use crate::catalog::Catalog;
use crate::registry::RegistryError;
use crate::schema::{ArgumentError, TokenRole};
use crate::tests::handlers::{ListConfigs, NewFile, Scaffold, conflicted, schema_trap, shadow};
use crate::tests::{SPAM_YAML, spam_catalog, spam_config, tokens};

#[fixture]
fn dispatcher() -> Dispatcher {
    Dispatcher::bootstrap(spam_config(), &spam_catalog()).expect("bootstrap")
}

fn dispatch(dispatcher: &mut Dispatcher, raw: &[&str]) -> (Result<(), DispatchError>, String) {
    let mut out = Vec::new();
    let result = dispatcher.dispatch(&tokens(raw), &mut out);
    (result, String::from_utf8(out).expect("utf8 output"))
}

#[rstest]
fn bootstrap_indexes_handlers(dispatcher: Dispatcher) {
    assert_eq!(dispatcher.stage(), Stage::HandlersIndexed);
    assert_eq!(
        dispatcher.registry().keys(),
        ["list_configs", "list_file", "new_configs", "new_file"]
    );
}

#[rstest]
fn resolve_is_a_pure_lookup(dispatcher: Dispatcher) {
    let found = dispatcher.resolve("new", "file").expect("registered pair");
    assert_eq!(found.type_name(), "NewFile");
    assert_eq!(dispatcher.stage(), Stage::HandlersIndexed);
}

#[test]
fn resolve_misses_unregistered_pairs() {
    let registry = HandlerRegistry::discover(
        &["spam/terminal".to_owned()],
        &Catalog::new()
            .register::<NewFile>("spam/terminal")
            .register::<ListConfigs>("spam/terminal"),
    )
    .expect("discover");
    let dispatcher = Dispatcher::new(spam_config(), registry);
    let err = dispatcher.resolve("list", "file").expect_err("unregistered");
    assert!(matches!(err, DispatchError::UnknownCommand { .. }));
    assert_ne!(err.exit_status(), 0);
    assert_eq!(err.to_string(), UNKNOWN_COMMAND_MESSAGE);
}

#[rstest]
fn dispatch_runs_the_handler_once_with_parsed_arguments(mut dispatcher: Dispatcher) {
    let (result, output) = dispatch(&mut dispatcher, &["new", "file", "--foo", "bar"]);
    result.expect("dispatch");
    assert_eq!(output, "foo=bar\n");
    assert_eq!(dispatcher.stage(), Stage::Done);
}

#[rstest]
fn handler_sees_loaded_configuration(mut dispatcher: Dispatcher) {
    let (result, output) = dispatch(&mut dispatcher, &["list", "configs"]);
    result.expect("dispatch");
    assert_eq!(output, "spam\n");
}

#[test]
fn unregistered_pair_is_an_unknown_command() {
    let catalog = Catalog::new().register::<NewFile>("spam/terminal");
    let mut dispatcher = Dispatcher::bootstrap(spam_config(), &catalog).expect("bootstrap");
    let (result, output) = dispatch(&mut dispatcher, &["list", "configs"]);
    let err = result.expect_err("no handler");
    assert!(matches!(err, DispatchError::UnknownCommand { ref verb, ref noun } if verb == "list" && noun == "configs"));
    assert_eq!(err.exit_status(), 1);
    assert!(output.is_empty());
    assert_eq!(dispatcher.stage(), Stage::Failed(FailureKind::UnknownCommand));
}

#[test]
fn phase_one_failure_never_consults_the_handler_schema() {
    let catalog = Catalog::new().register::<schema_trap::NewFile>("spam/terminal");
    let mut dispatcher = Dispatcher::bootstrap(spam_config(), &catalog).expect("bootstrap");
    let (result, _) = dispatch(&mut dispatcher, &["new", "folder", "--foo", "bar"]);
    let err = result.expect_err("unknown noun");
    assert!(matches!(
        err,
        DispatchError::Arguments(ArgumentError::UnknownVerbOrNoun {
            role: TokenRole::Noun,
            ..
        })
    ));
    assert_eq!(dispatcher.stage(), Stage::Failed(FailureKind::Arguments));
}

#[rstest]
fn phase_two_rejects_undeclared_flags(mut dispatcher: Dispatcher) {
    let (result, output) = dispatch(&mut dispatcher, &["new", "file", "--bar", "x"]);
    let err = result.expect_err("undeclared flag");
    assert!(matches!(
        err,
        DispatchError::Arguments(ArgumentError::UnrecognizedArgument { .. })
    ));
    assert!(output.is_empty());
}

#[rstest]
#[case::run(&["list", "file"], "disk on fire")]
#[case::construct(&["new", "configs"], "cannot construct")]
fn handler_failures_carry_the_key(
    mut dispatcher: Dispatcher,
    #[case] raw: &[&str],
    #[case] cause: &str,
) {
    let (result, _) = dispatch(&mut dispatcher, raw);
    let err = result.expect_err("handler failure");
    assert_eq!(err.exit_status(), 1);
    let message = err.to_string();
    assert!(message.contains(cause), "unexpected message: {message}");
    assert_eq!(dispatcher.stage(), Stage::Failed(FailureKind::Handler));
}

#[rstest]
fn a_dispatcher_runs_only_one_command(mut dispatcher: Dispatcher) {
    let (first, _) = dispatch(&mut dispatcher, &["new", "file", "--foo", "bar"]);
    first.expect("first dispatch");

    let (second, output) = dispatch(&mut dispatcher, &["new", "file", "--foo", "baz"]);
    let err = second.expect_err("second dispatch");
    assert!(matches!(
        err,
        DispatchError::AlreadyDispatched { stage: Stage::Done }
    ));
    assert_eq!(err.exit_status(), 2);
    assert!(output.is_empty());
    assert_eq!(dispatcher.stage(), Stage::Done);
}

#[test]
fn failed_dispatchers_cannot_be_retried() {
    let catalog = Catalog::new().register::<NewFile>("spam/terminal");
    let mut dispatcher = Dispatcher::bootstrap(spam_config(), &catalog).expect("bootstrap");
    let (first, _) = dispatch(&mut dispatcher, &["list", "configs"]);
    first.expect_err("no handler");

    let (second, output) = dispatch(&mut dispatcher, &["new", "file"]);
    assert!(matches!(
        second,
        Err(DispatchError::AlreadyDispatched {
            stage: Stage::Failed(FailureKind::UnknownCommand)
        })
    ));
    assert!(output.is_empty());
}

#[test]
fn inconsistent_handler_schema_is_a_setup_failure() {
    let catalog = Catalog::new().register::<conflicted::NewFile>("spam/terminal");
    let mut dispatcher = Dispatcher::bootstrap(spam_config(), &catalog).expect("bootstrap");
    let (result, output) = dispatch(&mut dispatcher, &["new", "file", "--foo", "bar"]);
    let err = result.expect_err("conflicting flags");
    assert!(matches!(
        err,
        DispatchError::Arguments(ArgumentError::InvalidSchema { .. })
    ));
    assert_eq!(err.exit_status(), 2);
    assert!(output.is_empty());
    assert_eq!(dispatcher.stage(), Stage::Failed(FailureKind::Arguments));
}

#[test]
fn explicitly_named_handlers_answer_their_pair() {
    let catalog = Catalog::new().register::<Scaffold>("spam/terminal");
    let mut dispatcher = Dispatcher::bootstrap(spam_config(), &catalog).expect("bootstrap");
    let (result, output) = dispatch(&mut dispatcher, &["new", "file"]);
    result.expect("dispatch");
    assert_eq!(output, "scaffolded
");
}

#[test]
fn empty_vocabulary_fails_before_parsing() {
    let config = Config::from_yaml_str(
        "app: {name: x}\nentrypoints: []\nterminal: {verbs: [], nouns: [file]}\n",
    )
    .expect("valid config");
    let mut dispatcher = Dispatcher::new(Arc::new(config), HandlerRegistry::default());
    let (result, _) = dispatch(&mut dispatcher, &["new", "file"]);
    let err = result.expect_err("empty vocabulary");
    assert!(matches!(err, DispatchError::Config(ConfigError::Malformed { .. })));
    assert_eq!(err.exit_status(), 2);
}

#[test]
fn duplicate_handlers_stop_bootstrap() {
    let catalog = spam_catalog().register::<shadow::NewFile>("spam/terminal/legacy");
    let err = Dispatcher::bootstrap(spam_config(), &catalog).expect_err("duplicate");
    assert!(matches!(
        err,
        DispatchError::Registry(RegistryError::DuplicateHandler { .. })
    ));
    assert_eq!(err.exit_status(), 2);
}

#[test]
fn missing_environment_file_stops_bootstrap() {
    let dir = TempDir::new().expect("temp dir");
    let absent = dir.path().join("missing.env");
    let yaml = format!(
        "{SPAM_YAML}environment: {{load_env: true, app_env: '{}'}}\n",
        absent.display()
    );
    let config = Config::from_yaml_str(&yaml).expect("valid config");
    let err = Dispatcher::bootstrap(Arc::new(config), &spam_catalog()).expect_err("missing env");
    assert!(matches!(
        err,
        DispatchError::Config(ConfigError::EnvFileNotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// Exit contract
// ---------------------------------------------------------------------------

fn report_to_strings(result: Result<(), DispatchError>) -> (ExitCode, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = report(result, &mut stdout, &mut stderr);
    (
        code,
        String::from_utf8(stdout).expect("utf8 stdout"),
        String::from_utf8(stderr).expect("utf8 stderr"),
    )
}

#[test]
fn unknown_command_prints_the_fixed_message() {
    let (code, stdout, stderr) = report_to_strings(Err(DispatchError::UnknownCommand {
        verb: "list".to_owned(),
        noun: "file".to_owned(),
    }));
    assert_eq!(code, ExitCode::from(1));
    assert!(stdout.is_empty());
    assert_eq!(stderr, "invalid command. Not yet implemented, try again.\n");
}

#[test]
fn help_goes_to_stdout_with_success() {
    let (code, stdout, stderr) = report_to_strings(Err(DispatchError::Arguments(
        ArgumentError::Help {
            text: "Usage: spam <VERB> <NOUN>\n".to_owned(),
        },
    )));
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(stdout, "Usage: spam <VERB> <NOUN>\n");
    assert!(stderr.is_empty());
}

#[test]
fn success_prints_nothing() {
    let (code, stdout, stderr) = report_to_strings(Ok(()));
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(stdout.is_empty() && stderr.is_empty());
}

#[test]
fn run_entry_point_loads_configuration_from_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("spam.yml")).expect("utf8 path");
    std::fs::write(&path, SPAM_YAML).expect("write config");
    let input = tokens(&["new", "file", "--foo", "bar"]);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_entry_point(
        EntryRequest {
            config_path: &path,
            tokens: &input,
        },
        &spam_catalog(),
        &mut stdout,
        &mut stderr,
    );
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(String::from_utf8(stdout).expect("utf8"), "foo=bar\n");
}

#[test]
fn run_entry_point_reports_missing_configuration() {
    let dir = TempDir::new().expect("temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.yml")).expect("utf8 path");
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_entry_point(
        EntryRequest {
            config_path: &path,
            tokens: &[],
        },
        &spam_catalog(),
        &mut stdout,
        &mut stderr,
    );
    assert_eq!(code, ExitCode::from(2));
    let message = String::from_utf8(stderr).expect("utf8");
    assert!(message.contains("configuration file not found"), "{message}");
}
