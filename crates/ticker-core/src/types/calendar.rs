//! 달력 기반 기간 계산.
//!
//! 모든 기간 계산은 거래일이 아닌 달력일 기준입니다.
//! 연수 환산은 윤년을 평균한 365.25일을 1년으로 사용합니다.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1년의 평균 달력일 수 (연수 환산용)
pub const DAYS_PER_YEAR: f64 = 365.25;

/// 연간 거래일 수 (변동성 연율화에 사용)
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// 연월 복합 키.
///
/// `(year, month)` 순서로 정렬되므로 `BTreeMap` 키로 사용하면
/// 시간순 순회가 보장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// 연도
    pub year: i32,
    /// 월 (1-12)
    pub month: u32,
}

impl YearMonth {
    /// 새 연월 키를 생성합니다.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// 날짜가 속한 연월을 반환합니다.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 직전 월을 반환합니다. 1월이면 전년도 12월입니다.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// 다음 월을 반환합니다.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// 분기 (1-4)
    pub fn quarter(self) -> u32 {
        (self.month - 1) / 3 + 1
    }

    /// 전년도 12월 키
    pub fn prior_december(year: i32) -> Self {
        Self::new(year - 1, 12)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// 닫힌 날짜 구간 `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// 시작일 (포함)
    pub start: NaiveDate,
    /// 종료일 (포함)
    pub end: NaiveDate,
}

impl DateRange {
    /// 새 날짜 구간을 생성합니다.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 날짜가 구간 안에 있는지 확인합니다 (양 끝 포함).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 시작일이 종료일보다 늦은 빈 구간인지 확인합니다.
    ///
    /// 서로 겹치지 않는 종목들의 공통 구간이 이렇게 됩니다.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// 두 날짜 사이의 달력일 수 (`b - a`).
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// 두 날짜 사이의 경과 연수 (365.25일 기준).
///
/// `b`가 `a`보다 이르면 음수를 반환합니다.
pub fn years_between(a: NaiveDate, b: NaiveDate) -> f64 {
    days_between(a, b) as f64 / DAYS_PER_YEAR
}

/// `date`에서 달력상 `years`년을 뺀 날짜.
///
/// 2월 29일에서 평년으로 이동하면 2월 28일로 맞춥니다.
pub fn subtract_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(years.checked_mul(12)?))
}

/// `YYYY-MM-DD` 문자열을 날짜로 파싱합니다.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    #[test]
    fn test_year_month_prev_wraps_january() {
        assert_eq!(YearMonth::new(2024, 1).prev(), YearMonth::new(2023, 12));
        assert_eq!(YearMonth::new(2024, 7).prev(), YearMonth::new(2024, 6));
        assert_eq!(YearMonth::new(2023, 12).next(), YearMonth::new(2024, 1));
    }

    #[test]
    fn test_year_month_ordering() {
        assert!(YearMonth::new(2023, 12) < YearMonth::new(2024, 1));
        assert!(YearMonth::new(2024, 2) > YearMonth::new(2024, 1));
        assert_eq!(YearMonth::new(2024, 3).to_string(), "2024-03");
    }

    #[test]
    fn test_quarter() {
        assert_eq!(YearMonth::new(2024, 1).quarter(), 1);
        assert_eq!(YearMonth::new(2024, 3).quarter(), 1);
        assert_eq!(YearMonth::new(2024, 4).quarter(), 2);
        assert_eq!(YearMonth::new(2024, 12).quarter(), 4);
    }

    #[test]
    fn test_years_between() {
        let years = years_between(d("2020-01-01"), d("2021-01-01"));
        assert!((years - 366.0 / 365.25).abs() < 1e-12);
        assert!(years_between(d("2021-01-01"), d("2020-01-01")) < 0.0);
    }

    #[test]
    fn test_subtract_years_clamps_leap_day() {
        assert_eq!(subtract_years(d("2024-02-29"), 1), Some(d("2023-02-28")));
        assert_eq!(subtract_years(d("2024-06-15"), 3), Some(d("2021-06-15")));
    }

    #[test]
    fn test_date_range_contains_inclusive() {
        let range = DateRange::new(d("2024-01-01"), d("2024-01-31"));
        assert!(range.contains(d("2024-01-01")));
        assert!(range.contains(d("2024-01-31")));
        assert!(!range.contains(d("2024-02-01")));
        assert!(!range.is_inverted());
    }
}
