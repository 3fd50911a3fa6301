//! Runs the compiled binary for the paths that need no network access.

use std::process::Command;

fn story() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_story"));
    // Keep a developer's .env out of the picture
    let dir = std::env::temp_dir();
    cmd.current_dir(dir)
        .env_remove("GROQ_API_KEY")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_list_models() {
    let output = story().arg("--list-models").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 10);
    assert!(stdout.lines().any(|l| l.starts_with("Llama 3 70B") && l.ends_with("llama3-70b-8192")));
}

#[test]
fn test_headless_without_key_reports_configuration_error() {
    let output = story()
        .args(["--headless", "--topic", "dawn"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("GROQ_API_KEY not found in environment variables"));
}

#[test]
fn test_rejects_unknown_perspective() {
    let output = story()
        .args(["--headless", "--perspective", "dragon"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("dragon"));
}
