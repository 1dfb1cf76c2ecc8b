mod common;
use common::{init_db, setup_test_db, song_workbook, temp_out, vocamark};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

#[test]
fn test_init_creates_store() {
    let db_path = setup_test_db("cli_init");

    vocamark()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(fs::metadata(&db_path).is_ok());
}

#[test]
fn test_log_print_after_init() {
    let db_path = setup_test_db("cli_log");
    init_db(&db_path);

    vocamark()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("Database initialized"));
}

#[test]
fn test_classify_weekly_new() {
    vocamark()
        .args(["classify", "uploads/新曲2024-09-07.xlsx"])
        .assert()
        .success()
        .stdout(contains("board : vocaloid-weekly"))
        .stdout(contains("part  : new"))
        .stdout(contains("issue : 1"));
}

#[test]
fn test_classify_data_file() {
    vocamark()
        .args(["classify", "20240801.xlsx"])
        .assert()
        .success()
        .stdout(contains("date  : 2024-08-01"));
}

#[test]
fn test_issue_table() {
    vocamark()
        .args(["issue", "--at", "2024-09-15"])
        .assert()
        .success()
        .stdout(contains("daily"))
        .stdout(contains("weekly"))
        .stdout(contains("monthly"))
        .stdout(contains("74"));
}

#[test]
fn test_issue_table_now_open_follows_closed() {
    let output = vocamark().arg("issue").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut seen = 0;
    for line in stdout.lines() {
        let cells: Vec<&str> = line.split_whitespace().collect();
        if !matches!(cells.first(), Some(&"daily" | &"weekly" | &"monthly")) {
            continue;
        }
        let closed: i64 = cells[1].parse().unwrap();
        let open: i64 = cells[2].parse().unwrap();
        assert_eq!(open, closed + 1, "{line}");
        seen += 1;
    }
    assert_eq!(seen, 3);
}

#[test]
fn test_issue_for_board() {
    vocamark()
        .args(["issue", "--board", "vocaloid-weekly", "--at", "2024-09-15"])
        .assert()
        .success()
        .stdout(contains("周刊虚拟歌手外语排行榜 #3"))
        .stdout(contains("vocaloid-weekly-main"))
        .stdout(contains("2024-09-14 00:00——2024-09-21 00:00"));
}

#[test]
fn test_issue_unknown_board_fails() {
    vocamark()
        .args(["issue", "--board", "vocaloid-yearly"])
        .assert()
        .failure()
        .stderr(contains("Invalid board id"));
}

#[test]
fn test_mark_lists_first_page() {
    let db_path = setup_test_db("cli_mark_page");
    init_db(&db_path);
    let file = song_workbook("cli_mark_page_src");

    vocamark()
        .args(["--db", &db_path, "mark", &file])
        .assert()
        .success()
        .stdout(contains("4 rows loaded, 2 included."))
        .stdout(contains("Ghost Rule"))
        .stdout(contains("https://www.bilibili.com/video/BV1aa411"))
        .stdout(contains("Names with leading/trailing blanks"));
}

#[test]
fn test_mark_jump_and_page_size() {
    let db_path = setup_test_db("cli_mark_jump");
    init_db(&db_path);
    let file = song_workbook("cli_mark_jump_src");

    vocamark()
        .args(["--db", &db_path, "mark", &file, "--page-size", "2", "--jump", "3"])
        .assert()
        .success()
        .stdout(contains("Page 2"))
        .stdout(contains("Rejected"))
        .stdout(contains("Ghost Rule").not());
}

#[test]
fn test_mark_search() {
    let db_path = setup_test_db("cli_mark_search");
    init_db(&db_path);
    let file = song_workbook("cli_mark_search_src");

    vocamark()
        .args(["--db", &db_path, "mark", &file, "--search", "deco"])
        .assert()
        .success()
        .stdout(contains("1 rows match 'deco'"))
        .stdout(contains("Ghost Rule"));

    vocamark()
        .args(["--db", &db_path, "mark", &file, "--search", "nothing-like-this"])
        .assert()
        .success()
        .stdout(contains("No rows match"));
}

#[test]
fn test_mark_export_csv() {
    let db_path = setup_test_db("cli_mark_csv");
    init_db(&db_path);
    let file = song_workbook("cli_mark_csv_src");
    let out = temp_out("cli_mark_csv", "csv");

    vocamark()
        .args([
            "--db", &db_path, "mark", &file, "--exclude", "0", "--include", "2", "--export", &out,
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(",include"));
    assert!(lines[1].starts_with("ロキ,"));
    assert!(lines[2].starts_with("Unknown Song,"));
}

#[test]
fn test_mark_export_refuses_overwrite_without_force() {
    let db_path = setup_test_db("cli_mark_force");
    init_db(&db_path);
    let file = song_workbook("cli_mark_force_src");
    let out = temp_out("cli_mark_force", "json");
    fs::write(&out, "keep me").unwrap();

    vocamark()
        .args(["--db", &db_path, "mark", &file, "--export", &out])
        .write_stdin("n\n")
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&out).unwrap(), "keep me");

    vocamark()
        .args([
            "--db", &db_path, "mark", &file, "--export", &out, "--keep-excluded", "--force",
        ])
        .assert()
        .success();

    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3]["include"], "排除");
}

#[test]
fn test_mark_set_edits_cell_before_export() {
    let db_path = setup_test_db("cli_mark_set");
    init_db(&db_path);
    let file = song_workbook("cli_mark_set_src");
    let out = temp_out("cli_mark_set", "json");

    vocamark()
        .args([
            "--db", &db_path, "mark", &file, "--set", "1:vocalist=鏡音リン", "--export", &out,
        ])
        .assert()
        .success();

    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed[1]["vocalist"], "鏡音リン");

    vocamark()
        .args(["--db", &db_path, "mark", &file, "--set", "broken"])
        .assert()
        .failure()
        .stderr(contains("INDEX:FIELD=VALUE"));
}

#[test]
fn test_mark_bookmark_toggle_then_list() {
    let db_path = setup_test_db("cli_mark_bookmark");
    init_db(&db_path);
    let file = song_workbook("cli_mark_bookmark_src");

    vocamark()
        .args(["--db", &db_path, "mark", &file, "--bookmark", "1"])
        .assert()
        .success()
        .stdout(contains("Bookmarked #1 ロキ"));

    vocamark()
        .args(["--db", &db_path, "bookmark", "--list"])
        .assert()
        .success()
        .stdout(contains("ロキ"))
        .stdout(contains("1 bookmarks"));

    vocamark()
        .args(["--db", &db_path, "mark", &file, "--bookmark", "9"])
        .assert()
        .failure()
        .stderr(contains("out of range"));
}

#[test]
fn test_bookmark_commands_roundtrip() {
    let db_path = setup_test_db("cli_bookmark");
    init_db(&db_path);
    let out = temp_out("cli_bookmark_export", "json");

    vocamark()
        .args(["--db", &db_path, "bookmark", "--add", "4", "--title", "four"])
        .assert()
        .success();
    vocamark()
        .args(["--db", &db_path, "bookmark", "--annotate", "4", "--note", "check vocalist"])
        .assert()
        .success()
        .stdout(contains("Note of #4 updated."));
    vocamark()
        .args(["--db", &db_path, "bookmark", "--export", &out])
        .assert()
        .success();

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc[0]["index"], 4);
    assert_eq!(doc[0]["note"], "check vocalist");

    vocamark()
        .args(["--db", &db_path, "bookmark", "--clear"])
        .assert()
        .success();
    vocamark()
        .args(["--db", &db_path, "bookmark", "--list"])
        .assert()
        .success()
        .stdout(contains("No bookmarks."));

    vocamark()
        .args(["--db", &db_path, "bookmark", "--import", &out, "--list"])
        .assert()
        .success()
        .stdout(contains("1 bookmarks imported"))
        .stdout(contains("four"));
}

#[test]
fn test_bookmark_add_requires_title() {
    vocamark()
        .args(["bookmark", "--add", "1"])
        .assert()
        .failure();
}

#[test]
fn test_token_set_show_clear() {
    let db_path = setup_test_db("cli_token");
    init_db(&db_path);

    vocamark()
        .args(["--db", &db_path, "token", "--set", "secret-token-1234"])
        .assert()
        .success();
    vocamark()
        .args(["--db", &db_path, "token", "--show"])
        .assert()
        .success()
        .stdout(contains("*************1234"))
        .stdout(contains("secret").not());
    vocamark()
        .args(["--db", &db_path, "token", "--clear"])
        .assert()
        .success()
        .stdout(contains("API token removed."));
    vocamark()
        .args(["--db", &db_path, "token", "--show"])
        .assert()
        .success()
        .stdout(contains("No API token stored"));
}

#[test]
fn test_config_print() {
    vocamark()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("api_base_url"))
        .stdout(contains("page_size"));
}

#[test]
fn test_upload_rejects_bad_name_before_network() {
    let db_path = setup_test_db("cli_upload_bad");
    init_db(&db_path);

    vocamark()
        .args(["--db", &db_path, "upload", "notes.txt"])
        .assert()
        .failure()
        .stderr(contains("only .xlsx files can be uploaded"));

    vocamark()
        .args(["--db", &db_path, "upload", "2024-13.xlsx"])
        .assert()
        .failure()
        .stderr(contains("2024-13"));
}
