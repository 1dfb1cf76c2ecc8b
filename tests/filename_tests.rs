use chrono::NaiveDate;
use vocamark::core::filename::classify;
use vocamark::errors::AppError;
use vocamark::models::identity::{FileIdentity, Part, SequentialBoard};

fn board(name: &str) -> vocamark::models::BoardIdentity {
    match classify(name) {
        FileIdentity::Board(b) => b,
        other => panic!("{name} should be a board file, got {other:?}"),
    }
}

#[test]
fn test_monthly_main_and_new() {
    let b = board("2024-09.xlsx");
    assert_eq!(b.board, SequentialBoard::Monthly);
    assert_eq!(b.part, Part::Main);
    assert_eq!(b.date_text, "2024-09");
    assert_eq!(b.issue().unwrap(), 3);

    let b = board("新曲2024-08.xlsx");
    assert_eq!(b.board, SequentialBoard::Monthly);
    assert_eq!(b.part, Part::New);
    assert_eq!(b.issue().unwrap(), 2);
}

#[test]
fn test_monthly_issue_crosses_years() {
    assert_eq!(board("2025-01.xlsx").issue().unwrap(), 7);
}

#[test]
fn test_weekly_main_and_new() {
    let b = board("2024-09-14.xlsx");
    assert_eq!(b.board, SequentialBoard::Weekly);
    assert_eq!(b.part, Part::Main);
    assert_eq!(b.date, NaiveDate::from_ymd_opt(2024, 9, 14));
    assert_eq!(b.issue().unwrap(), 2);

    let b = board("新曲2024-09-07.xlsx");
    assert_eq!(b.part, Part::New);
    assert_eq!(b.issue().unwrap(), 1);
}

#[test]
fn test_weekly_mid_week_date_is_floored() {
    // 2024-09-17 lies between the closes of issues 2 and 3
    assert_eq!(board("2024-09-17.xlsx").issue().unwrap(), 2);
}

#[test]
fn test_daily_main_and_new() {
    let b = board("20240715与20240714.xlsx");
    assert_eq!(b.board, SequentialBoard::Daily);
    assert_eq!(b.part, Part::Main);
    assert_eq!(b.date_text, "20240715");
    assert_eq!(b.issue().unwrap(), 12);

    let b = board("新曲榜20240715与20240714.xlsx");
    assert_eq!(b.part, Part::New);
    assert_eq!(b.issue().unwrap(), 12);
}

#[test]
fn test_daily_on_close_anchor_is_issue_zero() {
    let b = board("20240703与20240704");
    assert_eq!(b.board, SequentialBoard::Daily);
    assert_eq!(b.part, Part::Main);
    assert_eq!(b.date, NaiveDate::from_ymd_opt(2024, 7, 3));
    assert_eq!(b.issue().unwrap(), 0);
}

#[test]
fn test_data_file_at_year_end() {
    let identity = classify("20241231");
    let data = identity.as_data().expect("data file");
    assert_eq!(data.date().unwrap(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    assert_eq!(data.date_string().unwrap(), "2024-12-31");
}

#[test]
fn test_data_file() {
    let identity = classify("20240801.xlsx");
    let data = identity.as_data().expect("data file");
    assert_eq!(data.date().unwrap(), NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
    assert_eq!(data.date_string().unwrap(), "2024-08-01");
    assert!(identity.validate().is_ok());
}

#[test]
fn test_name_without_extension() {
    assert!(classify("2024-09").as_board().is_some());
}

#[test]
fn test_bad_dates_are_reported_lazily() {
    let identity = classify("2024-13.xlsx");
    let b = identity.as_board().expect("still a monthly board");
    assert_eq!(b.board, SequentialBoard::Monthly);
    assert!(matches!(b.issue(), Err(AppError::InvalidDate(_))));
    assert!(identity.validate().is_err());

    let identity = classify("2024080.xlsx");
    assert!(identity.as_data().is_some());
    assert!(matches!(identity.validate(), Err(AppError::InvalidDate(_))));

    assert!(classify("2024-02-30.xlsx").validate().is_err());
}

#[test]
fn test_identity_display() {
    let text = classify("2024-09.xlsx").to_string();
    assert!(text.contains("vocaloid-monthly"));
    assert!(text.contains("#3"));

    let text = classify("20240801.xlsx").to_string();
    assert!(text.contains("2024-08-01"));
}
