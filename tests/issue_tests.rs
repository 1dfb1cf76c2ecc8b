use chrono::{NaiveDate, NaiveDateTime};
use vocamark::core::issue::{
    end_time_of, issue_before, issue_before_local, issue_now, issue_now_local, start_time_of,
};
use vocamark::utils::date::now_local;
use vocamark::errors::AppError;
use vocamark::models::board::{BasicSection, Board, Section};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

#[test]
fn test_issue_before_counts_whole_periods() {
    let set = issue_before(at(2024, 9, 15, 0, 0));
    assert_eq!(set.daily, 74);
    assert_eq!(set.weekly, 2);
    assert_eq!(set.monthly, 2);
}

#[test]
fn test_local_variants_read_the_clock_once_each() {
    let lower = issue_before(now_local());
    let before = issue_before_local();
    let open = issue_now_local();
    let upper = issue_before(now_local());

    for section in BasicSection::ALL {
        assert!(lower.get(section) <= before.get(section));
        assert!(before.get(section) <= upper.get(section));
        assert!(open.get(section) >= lower.get(section) + 1);
        assert!(open.get(section) <= upper.get(section) + 1);
    }
}

#[test]
fn test_issue_now_is_one_ahead() {
    let t = at(2024, 9, 15, 13, 45);
    let before = issue_before(t);
    let now = issue_now(t);
    for section in BasicSection::ALL {
        assert_eq!(now.get(section), before.get(section) + 1);
    }
}

#[test]
fn test_issue_boundaries_at_close_anchor() {
    // exactly at the daily close of issue 0
    assert_eq!(issue_before(at(2024, 7, 3, 0, 0)).daily, 0);
    // one minute earlier issue 0 is still open
    assert_eq!(issue_before(at(2024, 7, 2, 23, 59)).daily, -1);
}

#[test]
fn test_issue_before_anchor_is_negative() {
    let set = issue_before(at(2024, 1, 15, 0, 0));
    assert!(set.daily < 0);
    assert!(set.weekly < 0);
    assert_eq!(set.monthly, -6);
}

#[test]
fn test_monthly_counts_calendar_months() {
    assert_eq!(issue_before(at(2024, 7, 31, 23, 59)).monthly, 0);
    assert_eq!(issue_before(at(2024, 8, 1, 0, 0)).monthly, 1);
    assert_eq!(issue_before(at(2025, 7, 1, 0, 0)).monthly, 12);
}

#[test]
fn test_issue_window_contains_now() {
    let t = at(2024, 9, 15, 13, 45);
    let open = issue_now(t);
    for section in BasicSection::ALL {
        let issue = open.get(section);
        assert!(start_time_of(issue, section) <= t);
        assert!(t < end_time_of(issue, section));
    }
}

#[test]
fn test_end_of_issue_is_start_of_next() {
    for section in BasicSection::ALL {
        for issue in [-3, 0, 1, 17, 120] {
            assert_eq!(end_time_of(issue, section), start_time_of(issue + 1, section));
        }
    }
}

#[test]
fn test_weekly_and_monthly_windows() {
    assert_eq!(start_time_of(3, BasicSection::Weekly), at(2024, 9, 14, 0, 0));
    assert_eq!(end_time_of(3, BasicSection::Weekly), at(2024, 9, 21, 0, 0));
    assert_eq!(start_time_of(3, BasicSection::Monthly), at(2024, 9, 1, 0, 0));
    assert_eq!(end_time_of(3, BasicSection::Monthly), at(2024, 10, 1, 0, 0));
}

#[test]
fn test_board_defaults_to_open_issue() {
    let board = Board::at("vocaloid-weekly", None, at(2024, 9, 15, 0, 0)).unwrap();
    assert_eq!(board.name, "vocaloid");
    assert_eq!(board.section, Section::Weekly);
    assert_eq!(board.part, "main");
    assert_eq!(board.issue, 3);
    assert_eq!(board.id(), "vocaloid-weekly");
    assert_eq!(board.full_id(), "vocaloid-weekly-main");
    assert_eq!(board.display_name(), "周刊虚拟歌手外语排行榜 #3");
    assert_eq!(
        board.rank_date_range().as_deref(),
        Some("2024-09-14 00:00——2024-09-21 00:00")
    );
}

#[test]
fn test_board_explicit_issue_and_part() {
    let board = Board::at("vocaloid-daily-new", Some(5), at(2024, 9, 15, 0, 0)).unwrap();
    assert_eq!(board.section, Section::Daily);
    assert_eq!(board.part, "new");
    assert_eq!(board.issue, 5);
    assert_eq!(board.start_time(), Some(at(2024, 7, 7, 0, 0)));
    assert_eq!(board.end_time(), Some(at(2024, 7, 8, 0, 0)));
}

#[test]
fn test_explicit_issue_zero_is_kept() {
    let board = Board::at("vocaloid-monthly", Some(0), at(2024, 9, 15, 0, 0)).unwrap();
    assert_eq!(board.issue, 0);
}

#[test]
fn test_special_board_has_no_window() {
    let board = Board::at("vocaloid-special", None, at(2024, 9, 15, 0, 0)).unwrap();
    assert_eq!(board.issue, 1);
    assert_eq!(board.start_time(), None);
    assert_eq!(board.rank_date_range(), None);
}

#[test]
fn test_latest_board_uses_minus_one() {
    let board = Board::latest("vocaloid-monthly").unwrap();
    assert_eq!(board.issue, -1);
}

#[test]
fn test_invalid_board_ids() {
    assert!(matches!(
        Board::at("vocaloid", None, at(2024, 9, 15, 0, 0)),
        Err(AppError::InvalidBoard(_))
    ));
    assert!(matches!(
        Board::at("vocaloid-yearly", None, at(2024, 9, 15, 0, 0)),
        Err(AppError::InvalidBoard(_))
    ));
}
