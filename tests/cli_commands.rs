use predicates::prelude::*;

#[test]
fn quote_prints_embedded_record_as_json() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("distraction");
    cmd.args(["quote", "--date", "2024-12-12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"author\": \"Oscar Wilde\""))
        .stdout(predicate::str::contains(
            "\"quote\": \"Be yourself; everyone else is already taken.\"",
        ));
}

#[test]
fn quote_for_missing_date_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("distraction");
    cmd.args(["quote", "--date", "1999-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no quote found for date \"1999-01-01\""));
}

#[test]
fn quote_rejects_malformed_date_argument() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("distraction");
    cmd.args(["quote", "--date", "12/12/2024"]).assert().failure();
}

#[test]
fn contributor_resolves_or_prints_empty_line() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("distraction");
    cmd.args(["contributor", "@icco"])
        .assert()
        .success()
        .stdout("https://natwelch.com\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("distraction");
    cmd.args(["contributor", "Unknown Contributor"])
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn feed_writes_atom_from_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("quotes.json"),
        r#"[{"date": "2024-12-12", "author": "Oscar Wilde", "quote": "Be yourself; everyone else is already taken.", "contributor": "@icco"}]"#,
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("distraction");
    cmd.arg("feed")
        .arg("--format")
        .arg("atom")
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--base-url")
        .arg("https://quotes.example/")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains(
            "<link href=\"https://quotes.example/2024-12-12\" rel=\"alternate\" />",
        ));
}

#[test]
fn feed_with_missing_dataset_fails() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("distraction");
    cmd.arg("feed")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("quote dataset unavailable"));
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("distraction");
    cmd.env("RUST_LOG", "debug")
        .args(["contributor", "@icco"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parsed cli"));
}
