mod common;

use common::{TestEnv, FAR_FUTURE};
use predicates::str::contains;

#[test]
fn shift_check_prints_valid() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "shift", "check", "--name", "Turno matutino", "--start", "08:00", "--end", "12:00",
        ])
        .assert()
        .success()
        .stdout(contains("valid"));
}

#[test]
fn shift_check_names_the_offending_field() {
    let env = TestEnv::new();
    env.cmd()
        .args([
            "shift", "check", "--name", "Turno vespertino", "--start", "13:00", "--end", "23:00",
        ])
        .assert()
        .success()
        .stdout(contains("end"));
}

#[test]
fn scan_replay_lists_emitted_tags() {
    let env = TestEnv::new();
    let trace = env.write_trace(
        "one.trace",
        "+0 T\n+10 A\n+10 G\n+10 0\n+10 0\n+10 1\n+10 2\n+10 3\n+10 ENTER\n",
    );
    env.cmd()
        .args(["scan", "replay", trace.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("TAG00123"));
}

#[test]
fn whoami_without_session_reports_to_stderr() {
    let env = TestEnv::new();
    env.cmd()
        .arg("whoami")
        .assert()
        .failure()
        .stderr(contains("not signed in"));
}

#[test]
fn whoami_prints_user_and_server() {
    let env = TestEnv::new();
    env.write_session(FAR_FUTURE);
    env.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("Ana Torres"))
        .stdout(contains("http://localhost:3000"));
}
