use std::process::Command;

fn run_sim(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--bin", "sim", "--"])
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to run sim binary")
}

#[test]
fn sim_binary_smoke() {
    let output = run_sim(&["1", "2"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
    assert!(v["winner"].is_string());
    assert_eq!(v["finished"], true);
    assert_eq!(v["both_attacking_ticks"], 0);
    assert_eq!(v["player1"]["role"], "PlayerOne");
    assert_eq!(v["player2"]["role"], "PlayerTwo");
}

#[test]
fn sim_binary_rejects_bad_loss() {
    let output = run_sim(&["1", "2", "1.5"]);
    assert!(!output.status.success());
}
