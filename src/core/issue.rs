//! Issue arithmetic for the time-bounded boards.
//!
//! Issues are counted from a per-section anchor. Issue `n` closes at
//! `CLOSE_ANCHORS + n periods` and opens at `OPEN_ANCHORS + n periods`; the two
//! anchor sets sit exactly one period apart, so issue `n` ends where `n + 1`
//! starts. All instants are local wall-clock times.

use crate::models::board::{BasicSection, IssueSet};
use crate::utils::date::now_local;
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta};

/// (year, month, day) per section.
struct SectionAnchors {
    daily: (i32, u32, u32),
    weekly: (i32, u32, u32),
    monthly: (i32, u32, u32),
}

impl SectionAnchors {
    fn get(&self, section: BasicSection) -> NaiveDateTime {
        let (y, m, d) = match section {
            BasicSection::Daily => self.daily,
            BasicSection::Weekly => self.weekly,
            BasicSection::Monthly => self.monthly,
        };
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("anchor dates are valid calendar dates")
    }
}

/// Close of issue 0; "issue before" counts whole periods from here.
const CLOSE_ANCHORS: SectionAnchors = SectionAnchors {
    daily: (2024, 7, 3),
    weekly: (2024, 8, 31),
    monthly: (2024, 7, 1),
};

/// Open of issue 0.
const OPEN_ANCHORS: SectionAnchors = SectionAnchors {
    daily: (2024, 7, 2),
    weekly: (2024, 8, 24),
    monthly: (2024, 6, 1),
};

const MS_PER_DAY: i64 = 86_400_000;

/// Issues whose close lies at or before `t`: the most recently closed issue per section.
pub fn issue_before(t: NaiveDateTime) -> IssueSet {
    IssueSet {
        daily: whole_periods(CLOSE_ANCHORS.get(BasicSection::Daily), t, BasicSection::Daily),
        weekly: whole_periods(CLOSE_ANCHORS.get(BasicSection::Weekly), t, BasicSection::Weekly),
        monthly: whole_periods(
            CLOSE_ANCHORS.get(BasicSection::Monthly),
            t,
            BasicSection::Monthly,
        ),
    }
}

/// The issue still open (in progress) at `t`.
pub fn issue_now(t: NaiveDateTime) -> IssueSet {
    issue_before(t).offset(1)
}

pub fn issue_before_local() -> IssueSet {
    issue_before(now_local())
}

pub fn issue_now_local() -> IssueSet {
    issue_now(now_local())
}

/// Close of issue 0 for `section`.
pub(crate) fn close_anchor(section: BasicSection) -> NaiveDateTime {
    CLOSE_ANCHORS.get(section)
}

pub fn start_time_of(issue: i64, section: BasicSection) -> NaiveDateTime {
    shift(OPEN_ANCHORS.get(section), section, issue)
}

/// End of `issue`, which is also the start of `issue + 1`.
pub fn end_time_of(issue: i64, section: BasicSection) -> NaiveDateTime {
    shift(CLOSE_ANCHORS.get(section), section, issue)
}

/// Floor of the number of periods elapsed from `anchor` to `t` (negative before the anchor).
pub(crate) fn whole_periods(anchor: NaiveDateTime, t: NaiveDateTime, section: BasicSection) -> i64 {
    match section {
        BasicSection::Daily => (t - anchor).num_milliseconds().div_euclid(MS_PER_DAY),
        BasicSection::Weekly => (t - anchor).num_milliseconds().div_euclid(7 * MS_PER_DAY),
        BasicSection::Monthly => {
            let mut months = i64::from(t.year() - anchor.year()) * 12
                + i64::from(t.month())
                - i64::from(anchor.month());
            while let Some(d) = checked_shift(anchor, section, months) {
                if d <= t {
                    break;
                }
                months -= 1;
            }
            while let Some(d) = checked_shift(anchor, section, months + 1) {
                if d > t {
                    break;
                }
                months += 1;
            }
            months
        }
    }
}

/// Move `base` by `n` periods. Results beyond chrono's range saturate instead of failing.
pub(crate) fn shift(base: NaiveDateTime, section: BasicSection, n: i64) -> NaiveDateTime {
    checked_shift(base, section, n).unwrap_or(if n < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

fn checked_shift(base: NaiveDateTime, section: BasicSection, n: i64) -> Option<NaiveDateTime> {
    match section {
        BasicSection::Daily => TimeDelta::try_days(n).and_then(|d| base.checked_add_signed(d)),
        BasicSection::Weekly => TimeDelta::try_weeks(n).and_then(|d| base.checked_add_signed(d)),
        BasicSection::Monthly => {
            let m = u32::try_from(n.unsigned_abs()).ok()?;
            if n >= 0 {
                base.checked_add_months(Months::new(m))
            } else {
                base.checked_sub_months(Months::new(m))
            }
        }
    }
}
