mod common;
use common::{song_workbook, temp_out};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use vocamark::core::ingest::{ParseTask, decode_workbook};
use vocamark::core::session::{MarkingMode, MarkingSession};
use vocamark::errors::AppError;
use vocamark::export::{ExportFormat, ExportLogic, ExportOptions, export_rows};
use vocamark::models::Record;

fn session_from_fixture(name: &str) -> MarkingSession {
    let path = song_workbook(name);
    let mut session = MarkingSession::new(MarkingMode::Standard, 20);
    session
        .load_from(ParseTask::from_path(Path::new(&path)).unwrap())
        .unwrap();
    session
}

#[test]
fn test_export_rows_drops_excluded_by_default() {
    let records = vec![
        Record::from_iter([("title", "a")]),
        Record::from_iter([("title", "b")]),
        Record::from_iter([("title", "c")]),
    ];

    let rows = export_rows(&records, &[true, false, true], ExportOptions::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text("title"), "a");
    assert_eq!(rows[0].text("include"), "收录");
    assert_eq!(rows[1].text("title"), "c");
}

#[test]
fn test_export_rows_keep_excluded_tags_them() {
    let records = vec![
        Record::from_iter([("title", "a")]),
        Record::from_iter([("title", "b"), ("include", "收录")]),
    ];
    let options = ExportOptions {
        keep_excluded: true,
    };

    let rows = export_rows(&records, &[true, false], options).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].text("include"), "排除");
    // the source rows are not modified
    assert_eq!(records[1].text("include"), "收录");
}

#[test]
fn test_export_rows_length_mismatch() {
    let records = vec![Record::from_iter([("title", "a")])];
    assert!(matches!(
        export_rows(&records, &[], ExportOptions::default()),
        Err(AppError::Export(_))
    ));
}

#[test]
fn test_xlsx_export_reads_back() {
    let session = session_from_fixture("export_xlsx_source");
    let out = temp_out("export_xlsx_readback", "xlsx");

    let written = ExportLogic::export_session(
        &session,
        ExportOptions::default(),
        ExportFormat::Xlsx,
        Path::new(&out),
        true,
    )
    .unwrap();
    assert_eq!(written, 2);

    let rows = decode_workbook(&fs::read(&out).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text("title"), "Ghost Rule");
    assert_eq!(rows[0].text("copyright"), "1");
    assert_eq!(rows[1].text("title"), "ロキ");
    assert!(rows.iter().all(|r| r.text("include") == "收录"));

    // exported file loads back with the same include decisions in SV mode
    let mut sv = MarkingSession::new(MarkingMode::Sv, 20);
    sv.load(rows);
    assert_eq!(sv.included_count(), 2);
}

#[test]
fn test_sv_roundtrip_keeps_exclusions() {
    let mut session = session_from_fixture("export_sv_source");
    session.set_include(0, false).unwrap();
    session.set_include(2, true).unwrap();

    let out = temp_out("export_sv_roundtrip", "xlsx");
    ExportLogic::export_session(
        &session,
        ExportOptions {
            keep_excluded: true,
        },
        ExportFormat::Xlsx,
        Path::new(&out),
        true,
    )
    .unwrap();

    let rows = decode_workbook(&fs::read(&out).unwrap()).unwrap();
    let mut sv = MarkingSession::new(MarkingMode::Sv, 20);
    sv.load(rows);
    assert_eq!(sv.include_flags(), &[false, true, true, false]);
}

#[test]
fn test_csv_export_has_header_union() {
    let rows = vec![
        Record::from_iter([("title", json!("a")), ("aid", json!(1))]),
        Record::from_iter([("title", json!("b")), ("note", json!("late column"))]),
    ];
    let out = temp_out("export_csv_union", "csv");
    ExportLogic::write_rows(&rows, ExportFormat::Csv, Path::new(&out)).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "title,aid,note");
    assert_eq!(lines[1], "a,1,");
    assert_eq!(lines[2], "b,,late column");
}

#[test]
fn test_json_export_keeps_column_order() {
    let session = session_from_fixture("export_json_source");
    let out = temp_out("export_json_order", "json");

    ExportLogic::export_session(
        &session,
        ExportOptions::default(),
        ExportFormat::Json,
        Path::new(&out),
        true,
    )
    .unwrap();

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
    assert_eq!(keys.first().map(|k| k.as_str()), Some("title"));
    assert_eq!(keys.last().map(|k| k.as_str()), Some("include"));
}

#[test]
fn test_format_from_extension() {
    assert_eq!(ExportFormat::from_path(Path::new("a.XLSX")), Some(ExportFormat::Xlsx));
    assert_eq!(ExportFormat::from_path(Path::new("dir/a.csv")), Some(ExportFormat::Csv));
    assert_eq!(ExportFormat::from_path(Path::new("a.json")), Some(ExportFormat::Json));
    assert_eq!(ExportFormat::from_path(Path::new("a.txt")), None);
    assert_eq!(ExportFormat::from_path(Path::new("noext")), None);
}

#[test]
fn test_bookmark_file_export_and_import() {
    use vocamark::core::bookmarks::{BookmarkStore, MemoryBookmarkPersistence};

    let mut store = BookmarkStore::open(MemoryBookmarkPersistence::default()).unwrap();
    store.add(3, "three", None).unwrap();
    let out = temp_out("export_bookmarks_file", "json");

    assert_eq!(ExportLogic::export_bookmarks(&store, Path::new(&out), true).unwrap(), 1);

    let mut other = BookmarkStore::open(MemoryBookmarkPersistence::default()).unwrap();
    assert_eq!(ExportLogic::import_bookmarks(&mut other, Path::new(&out)).unwrap(), 1);
    assert!(other.is_bookmarked(3));
}
