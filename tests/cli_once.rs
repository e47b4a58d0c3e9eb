use assert_cmd::Command;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chronocrunch").unwrap();
    cmd.env("RUST_LOG", "off")
        .env("HOME", dir.path())
        .arg("--no-save")
        .arg("--config")
        .arg(dir.path().join("config.json"));
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).unwrap()
}

#[test]
fn once_prints_progress_at_a_fixed_time() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout(cmd(&dir).args([
        "--title",
        "DAY\\nONE",
        "--start",
        "2024-01-01T00:00",
        "--end",
        "2024-01-02T00:00",
        "--at",
        "2024-01-01T12:00",
        "--precision",
        "2",
    ]));

    assert!(out.starts_with("DAY ONE\n"), "{out}");
    assert!(out.contains("status:    ACTIVE"), "{out}");
    assert!(out.contains("percent:   50.00%"), "{out}");
    assert!(out.contains("elapsed:   0d 12h 00m 00s"), "{out}");
    assert!(out.contains("remaining: 0d 12h 00m 00s"), "{out}");
}

#[test]
fn once_before_start_counts_down() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout(cmd(&dir).args([
        "--start",
        "2024-01-01T00:00",
        "--end",
        "2024-01-02T00:00",
        "--at",
        "2023-12-31T23:00",
    ]));

    assert!(out.contains("status:    PENDING"), "{out}");
    assert!(out.contains("percent:   0.0000000%"), "{out}");
    assert!(out.contains("starts in: 0d 01h 00m 00s"), "{out}");
}

#[test]
fn json_output_has_window_and_progress() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout(cmd(&dir).args([
        "--json",
        "--start",
        "2024-01-01T00:00",
        "--end",
        "2024-01-01T00:00",
        "--at",
        "2024-06-01T00:00",
    ]));

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["progress"]["status"], "COMPLETE");
    assert_eq!(value["progress"]["percent"], 100.0);
    assert_eq!(value["remaining_text"], "00:00:00");
    assert_eq!(value["title"], "TEMPORAL\nCRUNCH");
}

#[test]
fn share_prints_query_that_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let query = stdout(cmd(&dir).args([
        "--share",
        "--title",
        "Q3 push",
        "--start",
        "2024-07-01T00:00",
        "--end",
        "2024-10-01T00:00",
        "-p",
        "3",
    ]));
    let query = query.trim();
    assert_eq!(
        query,
        "?title=Q3+push&start=2024-07-01T00%3A00&end=2024-10-01T00%3A00&precision=3"
    );

    let out = stdout(cmd(&dir).args(["--query", query, "--at", "2024-07-01T00:00"]));
    assert!(out.starts_with("Q3 push\n"), "{out}");
    assert!(out.contains("percent:   0.000%"), "{out}");
}

#[test]
fn bad_timestamp_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    cmd(&dir)
        .args(["--start", "tomorrow", "--once"])
        .assert()
        .failure();
}

#[test]
fn precision_out_of_range_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    cmd(&dir).args(["-p", "15", "--once"]).assert().failure();
}
