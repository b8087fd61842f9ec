mod common;

use common::{TestEnv, FAR_FUTURE};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

fn load_schema(name: &str) -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = fs::read_to_string(root.join("docs/contracts").join(name)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn validate(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let msgs: Vec<String> = match validator.validate(data) {
        Ok(()) => return,
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    panic!("schema validation failed: {}", msgs.join(" | "));
}

#[test]
fn contracts_check() {
    let env = TestEnv::new();
    env.write_session(FAR_FUTURE);

    let who = env.run_json(&["whoami"]);
    assert_eq!(who["ok"], true);
    validate("whoami.schema.json", &who["data"]);

    let check = env.run_json(&[
        "shift", "check", "--name", "Turno general", "--start", "08:00", "--end", "17:00",
    ]);
    assert_eq!(check["ok"], true);
    validate("shift-check.schema.json", &check["data"]);

    let trace = env.write_trace(
        "contract.trace",
        "+0 T\n+10 A\n+10 G\n+10 0\n+10 0\n+10 1\n+10 2\n+10 3\n+10 ENTER\n",
    );
    let replay = env.run_json(&["scan", "replay", trace.to_str().unwrap()]);
    assert_eq!(replay["ok"], true);
    validate("scan-replay.schema.json", &replay["data"]);

    let bare = TestEnv::new();
    let err = bare.run_json_err(&["whoami"]);
    validate("error.schema.json", &err);
}
