use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{create_dir_all, write};
use tempfile::tempdir;

fn sample_project() -> tempfile::TempDir {
    let tmp = tempdir().expect("Creating temp project failed");
    let root = tmp.path();
    write(root.join("app.py"), "print('hi')\n").unwrap();
    write(root.join(".env"), "API_KEY=secret123\n").unwrap();
    create_dir_all(root.join("node_modules/dep")).unwrap();
    write(root.join("node_modules/dep/x.js"), "module.exports = 1;\n").unwrap();
    tmp
}

#[test]
fn collect_lists_eligible_files_and_prunes_skip_dirs() {
    let project = sample_project();
    let mut cmd = Command::cargo_bin("readmegen").expect("Binary exists");

    cmd.arg("collect").arg(project.path());

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains(" - .env")
                .and(predicate::str::contains(" - app.py"))
                .and(predicate::str::contains("Loaded 2 docs"))
                .and(predicate::str::contains("node_modules").not()),
        );
}

#[test]
fn collect_json_never_leaks_env_values() {
    let project = sample_project();
    let mut cmd = Command::cargo_bin("readmegen").expect("Binary exists");

    cmd.arg("collect").arg(project.path()).arg("--json");

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("\"source_path\": \".env\"")
                .and(predicate::str::contains("API_KEY=<YOUR_VALUE>"))
                .and(predicate::str::contains("secret123").not()),
        );
}

#[test]
fn generate_rejects_a_missing_directory_before_any_work() {
    let tmp = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("readmegen").expect("Binary exists");

    cmd.arg("generate")
        .arg(tmp.path().join("missing"))
        .env_remove("OPENAI_API_KEY");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn generate_requires_an_api_key() {
    let project = sample_project();
    let mut cmd = Command::cargo_bin("readmegen").expect("Binary exists");

    cmd.current_dir(project.path())
        .arg("generate")
        .arg(project.path())
        .env_remove("OPENAI_API_KEY");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
    assert!(!project.path().join("README.generated.md").exists());
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        use std::fmt::Write as FmtWrite;
        let mut msg = String::new();
        let _ = write!(&mut msg, "{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use readmegen::cli::{run, Cli, Commands};

    let project = sample_project();
    let cli = Cli {
        command: Commands::Collect {
            path: project.path().to_path_buf(),
            include_readme: false,
            json: false,
        },
    };

    run(cli).await.expect("collect should succeed");

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
