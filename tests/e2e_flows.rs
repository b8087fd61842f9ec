mod common;

use common::{TestEnv, FAR_FUTURE};

// --- session lifecycle ---

#[test]
fn whoami_reports_stored_session() {
    let env = TestEnv::new();
    env.write_session(FAR_FUTURE);
    let out = env.run_json(&["whoami"]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"]["user"], "Ana Torres");
    assert_eq!(out["data"]["role"], "admin");
    assert_eq!(out["data"]["expired"], false);
}

#[test]
fn whoami_without_session_is_auth_error() {
    let env = TestEnv::new();
    let out = env.run_json_err(&["whoami"]);
    assert_eq!(out["ok"], false);
    assert_eq!(out["error"]["code"], "AUTH_REQUIRED");
}

#[test]
fn whoami_flags_expired_token() {
    let env = TestEnv::new();
    env.write_session(100);
    let out = env.run_json(&["whoami"]);
    assert_eq!(out["data"]["expired"], true);
}

#[test]
fn logout_removes_the_session() {
    let env = TestEnv::new();
    env.write_session(FAR_FUTURE);

    let out = env.run_json(&["logout"]);
    assert_eq!(out["data"]["signed_out"], true);

    let err = env.run_json_err(&["whoami"]);
    assert_eq!(err["error"]["code"], "AUTH_REQUIRED");

    // A second logout is a no-op, not a failure.
    let again = env.run_json(&["logout"]);
    assert_eq!(again["data"]["signed_out"], false);
}

#[test]
fn authenticated_commands_are_gated_without_session() {
    let env = TestEnv::new();
    let out = env.run_json_err(&["department", "list"]);
    assert_eq!(out["error"]["code"], "AUTH_REQUIRED");
}

#[test]
fn logs_listing_is_gated_without_session() {
    let env = TestEnv::new();
    let out = env.run_json_err(&["logs"]);
    assert_eq!(out["error"]["code"], "AUTH_REQUIRED");
}

#[test]
fn expired_session_gates_authenticated_commands() {
    let env = TestEnv::new();
    env.write_session(100);
    let out = env.run_json_err(&["department", "list"]);
    assert_eq!(out["error"]["code"], "AUTH_REQUIRED");
}

// --- shift validation, offline ---

fn shift_check(env: &TestEnv, extra: &[&str]) -> serde_json::Value {
    let mut args = vec!["shift", "check", "--name", "Turno general"];
    args.extend_from_slice(extra);
    env.run_json(&args)
}

#[test]
fn morning_shift_without_lunch_is_valid() {
    let env = TestEnv::new();
    let out = shift_check(&env, &["--start", "08:00", "--end", "12:00"]);
    assert_eq!(out["data"]["valid"], true);
    assert!(out["data"]["issues"].as_array().unwrap().is_empty());
}

#[test]
fn afternoon_shift_requires_lunch() {
    let env = TestEnv::new();
    let out = shift_check(&env, &["--start", "08:00", "--end", "17:00"]);
    assert_eq!(out["data"]["valid"], false);
    let fields: Vec<&str> = out["data"]["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"lunch_start"));
    assert!(fields.contains(&"lunch_end"));
}

#[test]
fn afternoon_shift_with_contained_lunch_is_valid() {
    let env = TestEnv::new();
    let out = shift_check(
        &env,
        &[
            "--start", "08:00", "--end", "17:00", "--lunch-start", "12:00", "--lunch-end", "13:00",
        ],
    );
    assert_eq!(out["data"]["valid"], true);
}

#[test]
fn late_end_is_rejected() {
    let env = TestEnv::new();
    let out = shift_check(&env, &["--start", "14:00", "--end", "22:30"]);
    assert_eq!(out["data"]["valid"], false);
}

#[test]
fn lunch_on_a_short_shift_is_rejected() {
    let env = TestEnv::new();
    let out = shift_check(
        &env,
        &[
            "--start", "08:00", "--end", "12:00", "--lunch-start", "10:00", "--lunch-end", "10:30",
        ],
    );
    assert_eq!(out["data"]["valid"], false);
}

// --- scan replay, offline ---

const SHORT_THEN_FULL: &str = "\
# six chars, below the minimum
+0 T\n+10 A\n+10 G\n+10 0\n+10 0\n+10 1\n+10 ENTER\n\
# full badge
+100 T\n+10 A\n+10 G\n+10 0\n+10 0\n+10 1\n+10 2\n+10 3\n+10 ENTER\n";

#[test]
fn replay_rejects_short_bursts_and_emits_full_ones() {
    let env = TestEnv::new();
    let trace = env.write_trace("badge.trace", SHORT_THEN_FULL);
    let out = env.run_json(&["scan", "replay", trace.to_str().unwrap()]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"]["emitted"], serde_json::json!(["TAG00123"]));
    assert_eq!(out["data"]["rejected_short"], 1);
    assert_eq!(out["data"]["stale_discards"], 0);
}

#[test]
fn replay_discards_stale_buffers() {
    let trace_body = "\
+0 A\n+10 B\n+10 C\n+10 D\n\
# 600 ms of silence, then a fresh badge
+600 T\n+10 A\n+10 G\n+10 0\n+10 0\n+10 1\n+10 2\n+10 3\n+10 ENTER\n";
    let env = TestEnv::new();
    let trace = env.write_trace("stale.trace", trace_body);
    let out = env.run_json(&["scan", "replay", trace.to_str().unwrap()]);
    assert_eq!(out["data"]["emitted"], serde_json::json!(["TAG00123"]));
    assert_eq!(out["data"]["stale_discards"], 1);
}

#[test]
fn replay_honors_min_len_override() {
    let env = TestEnv::new();
    let trace = env.write_trace("short.trace", "+0 A\n+10 B\n+10 C\n+10 D\n+10 ENTER\n");
    let out = env.run_json(&["scan", "replay", trace.to_str().unwrap(), "--min-len", "4"]);
    assert_eq!(out["data"]["emitted"], serde_json::json!(["ABCD"]));
}

#[test]
fn replay_fails_on_malformed_trace() {
    let env = TestEnv::new();
    let trace = env.write_trace("bad.trace", "not a trace\n");
    let out = env.run_json_err(&["scan", "replay", trace.to_str().unwrap()]);
    assert_eq!(out["ok"], false);
}
