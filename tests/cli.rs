//! End-to-end tests for the script-runner binary

mod common;

use assert_cmd::Command;
use common::{create_project, create_sh_project, write_file};
use predicates::prelude::*;

fn script_runner(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("script-runner").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version() {
    let project = create_project(&[]);
    script_runner(project.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_options() {
    let project = create_project(&[]);
    script_runner(project.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--path"))
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--script"));
}

#[test]
fn test_list_scripts() {
    let project = create_project(&[
        ("scripts/build.ts", ""),
        ("scripts/seed/_main.ts", ""),
        ("scripts/_internal.ts", ""),
        ("script-runner.yml", ""),
    ]);
    script_runner(project.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("• build"))
        .stdout(predicate::str::contains("• seed"))
        .stdout(predicate::str::contains("_internal").not());
}

#[test]
fn test_list_from_custom_path() {
    let project = create_project(&[
        ("tools/release.ts", ""),
        ("scripts/build.ts", ""),
        ("script-runner.yml", ""),
    ]);
    script_runner(project.path())
        .args(["-l", "-p", "tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("• release"))
        .stdout(predicate::str::contains("• build").not());
}

#[test]
fn test_list_with_no_scripts() {
    let project = create_project(&[("script-runner.yml", "")]);
    script_runner(project.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No scripts found"));
}

#[test]
fn test_verbose_reports_search() {
    let project = create_project(&[("src/scripts/build.ts", ""), ("script-runner.yml", "")]);
    script_runner(project.path())
        .args(["--list", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Searching for scripts in"))
        .stderr(predicate::str::contains("Found 1 scripts"));
}

#[test]
fn test_interactive_without_scripts_fails() {
    let project = create_project(&[("script-runner.yml", "")]);
    script_runner(project.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No scripts found"));
}

#[test]
fn test_invalid_config_fails() {
    let project = create_project(&[("script-runner.yml", "extensions: ['.ts']\n")]);
    script_runner(project.path())
        .arg("--list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let project = create_project(&[]);
    script_runner(project.path())
        .args(["--file", "nope.yml", "--list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_completions() {
    let project = create_project(&[]);
    script_runner(project.path())
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("script-runner"));
}

#[cfg(unix)]
mod run {
    use super::*;

    #[test]
    fn test_run_named_script() {
        let project = create_sh_project(&[("scripts/hello.sh", "echo \"hello from $1\"\n")]);
        script_runner(project.path())
            .args(["-s", "hello", "--", "tests"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hello from tests"))
            .stderr(predicate::str::contains("completed successfully"));
    }

    #[test]
    fn test_run_directory_script() {
        let project = create_sh_project(&[("scripts/seed/_main.sh", "echo seeded\n")]);
        script_runner(project.path())
            .args(["--script", "seed"])
            .assert()
            .success()
            .stdout(predicate::str::contains("seeded"));
    }

    #[test]
    fn test_failing_script_exit_code() {
        let project = create_sh_project(&[("scripts/check.sh", "exit 3\n")]);
        script_runner(project.path())
            .args(["-s", "check"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("failed with code 3"));
    }

    #[test]
    fn test_unknown_script() {
        let project = create_sh_project(&[("scripts/build.sh", "exit 0\n")]);
        script_runner(project.path())
            .args(["-s", "deploy"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Script 'deploy' not found!"))
            .stdout(predicate::str::contains("• build"));
    }

    #[test]
    fn test_quiet_run() {
        let project = create_sh_project(&[("scripts/build.sh", "echo built\n")]);
        script_runner(project.path())
            .args(["-q", "-s", "build"])
            .assert()
            .success()
            .stdout(predicate::str::contains("built"))
            .stderr(predicate::str::contains("Running script").not());
    }

    #[test]
    fn test_dotenv_is_loaded() {
        let project = create_sh_project(&[("scripts/env.sh", "echo \"value=$GREETING\"\n")]);
        write_file(
            project.path(),
            "script-runner.yml",
            &format!("{}dotenv: true\n", common::SH_CONFIG),
        );
        write_file(project.path(), ".env", "GREETING=hi-there\n");

        script_runner(project.path())
            .args(["-s", "env"])
            .assert()
            .success()
            .stdout(predicate::str::contains("value=hi-there"));
    }

    #[test]
    fn test_sigterm_stops_script_and_exits_with_one() {
        use std::process::{Command as StdCommand, Stdio};
        use std::thread;
        use std::time::{Duration, Instant};

        let project = create_sh_project(&[("scripts/serve.sh", "touch started\nexec sleep 30\n")]);
        let mut child = StdCommand::new(assert_cmd::cargo::cargo_bin("script-runner"))
            .args(["-s", "serve"])
            .current_dir(project.path())
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        let started = project.path().join("started");
        let deadline = Instant::now() + Duration::from_secs(10);
        while !started.exists() {
            assert!(Instant::now() < deadline, "script never started");
            thread::sleep(Duration::from_millis(10));
        }
        // Give the runner a moment to install its signal handlers
        thread::sleep(Duration::from_millis(200));

        let sent = Instant::now();
        let status = StdCommand::new("kill")
            .args(["-TERM", &child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let deadline = sent + Duration::from_secs(5);
        let exit = loop {
            if let Some(exit) = child.try_wait().unwrap() {
                break exit;
            }
            if Instant::now() > deadline {
                child.kill().ok();
                panic!("script-runner did not exit after SIGTERM");
            }
            thread::sleep(Duration::from_millis(10));
        };

        assert_eq!(exit.code(), Some(1));
        assert!(sent.elapsed() < Duration::from_secs(5));
    }
}
