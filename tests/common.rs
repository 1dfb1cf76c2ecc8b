#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rust_xlsxwriter::Workbook;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn vocamark() -> Command {
    cargo_bin_cmd!("vocamark")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_vocamark.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a fresh store for CLI tests
pub fn init_db(db_path: &str) {
    vocamark()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Write a one-sheet workbook. Empty strings leave the cell blank.
pub fn write_workbook(path: &str, headers: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (c, h) in headers.iter().enumerate() {
        sheet.write(0, c as u16, *h).expect("write header");
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let (row_idx, col_idx) = ((r + 1) as u32, c as u16);
            match cell.parse::<f64>() {
                Ok(n) => sheet.write(row_idx, col_idx, n).expect("write number"),
                Err(_) => sheet.write(row_idx, col_idx, *cell).expect("write text"),
            };
        }
    }

    workbook.save(path).expect("save workbook");
}

pub const SONG_HEADERS: [&str; 7] = [
    "title",
    "bvid",
    "producer",
    "vocalist",
    "synthesizer",
    "copyright",
    "status",
];

/// Four reviewed rows: two done/auto, one pending, one rejected.
pub fn song_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["Ghost Rule", "BV1aa411", "DECO*27", "初音ミク", "VOCALOID", "1", "done"],
        vec!["ロキ", "BV1bb411", "みきとP", "鏡音リン、鏡音レン", "VOCALOID", "2", "auto"],
        vec!["Unknown Song", "BV1cc411", "someone", " 初音ミク", "", "1", "pending"],
        vec!["Rejected", "BV1dd411", "other", "GUMI", "VOCALOID", "1", "rejected"],
    ]
}

/// Fixture workbook with [`SONG_HEADERS`] / [`song_rows`] at a temp path.
pub fn song_workbook(name: &str) -> String {
    let path = temp_out(name, "xlsx");
    write_workbook(&path, &SONG_HEADERS, &song_rows());
    path
}
