//! 롤링 수익률.
//!
//! 각 포인트에서 N년 전 가격을 찾아 그 구간의 연복리 수익률을 계산합니다.
//! 시작 커서는 앞으로만 움직이므로 전체 계산은 O(n)입니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ticker_core::{subtract_years, years_between, DailyPoint, DateRange};
use tracing::debug;

use crate::metrics::{cagr_pct, return_pct};

/// 롤링 수익률 포인트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingReturnPoint {
    /// 구간 종료일
    pub date: NaiveDate,
    /// 구간 연복리 수익률 (%). 1년 구간은 단순 수익률
    pub rolling_cagr: f64,
    /// 실제로 사용된 구간 시작일
    pub start_date: NaiveDate,
    /// 구간 시작 가격
    pub start_price: f64,
    /// 구간 종료 가격
    pub end_price: f64,
}

/// 하나의 구간 길이에 대한 롤링 수익률 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingReturnSeries {
    /// 구간 길이 (년)
    pub window_years: u32,
    /// 포인트 (이력이 부족하면 비어 있음)
    pub points: Vec<RollingReturnPoint>,
}

impl RollingReturnSeries {
    /// 종료일이 구간 안에 있는 포인트만 남깁니다.
    pub fn within(&self, range: DateRange) -> Self {
        Self {
            window_years: self.window_years,
            points: self
                .points
                .iter()
                .filter(|p| range.contains(p.date))
                .copied()
                .collect(),
        }
    }

    /// 마지막 포인트
    pub fn latest(&self) -> Option<&RollingReturnPoint> {
        self.points.last()
    }
}

/// `window_years`년 롤링 수익률을 계산합니다.
///
/// # 매개변수
///
/// * `series` - 날짜 오름차순 일별 시세
/// * `window_years` - 구간 길이 (년)
///
/// 그만큼 과거 데이터가 없는 포인트, 경과 연수가 0 이하이거나 시작 가격이 0 이하인
/// 포인트는 건너뜁니다.
pub fn rolling_returns(series: &[DailyPoint], window_years: u32) -> Vec<RollingReturnPoint> {
    let Some(first) = series.first() else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let mut cursor = 0usize;

    for point in series {
        let Some(target) = subtract_years(point.date, window_years) else {
            continue;
        };
        if first.date > target {
            continue;
        }

        while cursor + 1 < series.len() && series[cursor + 1].date <= target {
            cursor += 1;
        }

        let start = &series[cursor];
        let years = years_between(start.date, point.date);
        if years <= 0.0 || start.close <= 0.0 {
            continue;
        }

        let rolling_cagr = if window_years == 1 {
            return_pct(start.close, point.close)
        } else {
            cagr_pct(start.close, point.close, years)
        };

        result.push(RollingReturnPoint {
            date: point.date,
            rolling_cagr,
            start_date: start.date,
            start_price: start.close,
            end_price: point.close,
        });
    }

    debug!(
        window_years,
        points = series.len(),
        produced = result.len(),
        "rolling returns calculated"
    );

    result
}

/// 여러 구간 길이의 롤링 수익률을 한 번에 계산합니다.
pub fn rolling_returns_set(series: &[DailyPoint], windows: &[u32]) -> Vec<RollingReturnSeries> {
    windows
        .iter()
        .map(|&window_years| RollingReturnSeries {
            window_years,
            points: rolling_returns(series, window_years),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn points(rows: &[(&str, f64)]) -> Vec<DailyPoint> {
        rows.iter()
            .map(|(date, close)| DailyPoint::from_close(d(date), *close))
            .collect()
    }

    #[test]
    fn test_one_year_window_is_simple_return() {
        let series = points(&[("2023-01-01", 100.0), ("2024-01-01", 110.0)]);
        let result = rolling_returns(&series, 1);
        assert_eq!(result.len(), 1);
        assert!((result[0].rolling_cagr - 10.0).abs() < 1e-9);
        assert_eq!(result[0].start_date, d("2023-01-01"));
    }

    #[test]
    fn test_multi_year_window_is_annualized() {
        let series = points(&[("2020-01-01", 100.0), ("2022-01-01", 121.0)]);
        let result = rolling_returns(&series, 2);
        assert_eq!(result.len(), 1);

        let years = 731.0 / 365.25;
        let expected = ((121.0f64 / 100.0).powf(1.0 / years) - 1.0) * 100.0;
        assert!((result[0].rolling_cagr - expected).abs() < 1e-9);
        assert!(result[0].rolling_cagr < 10.0);
    }

    #[test]
    fn test_points_without_enough_history_are_skipped() {
        let series = points(&[
            ("2023-01-02", 100.0),
            ("2023-06-01", 105.0),
            ("2024-01-01", 108.0),
            ("2024-01-03", 112.0),
        ]);
        let result = rolling_returns(&series, 1);
        let dates: Vec<NaiveDate> = result.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d("2024-01-03")]);
    }

    #[test]
    fn test_start_is_last_point_on_or_before_target() {
        let series = points(&[
            ("2022-12-28", 90.0),
            ("2022-12-30", 100.0),
            ("2023-01-03", 95.0),
            ("2023-12-29", 105.0),
            ("2024-01-02", 120.0),
        ]);
        let result = rolling_returns(&series, 1);
        let last = result.last().unwrap();
        assert_eq!(last.date, d("2024-01-02"));
        // 목표일 2023-01-02 이전의 마지막 포인트는 2022-12-30
        assert_eq!(last.start_date, d("2022-12-30"));
        assert!((last.rolling_cagr - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_short_series() {
        assert!(rolling_returns(&[], 1).is_empty());
        let series = points(&[("2024-01-02", 100.0), ("2024-01-03", 101.0)]);
        assert!(rolling_returns(&series, 3).is_empty());
    }

    #[test]
    fn test_rolling_set_and_within() {
        let series = points(&[
            ("2020-01-01", 100.0),
            ("2021-01-01", 110.0),
            ("2022-01-03", 121.0),
        ]);
        let set = rolling_returns_set(&series, &[1, 5]);
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].window_years, 1);
        assert_eq!(set[0].points.len(), 2);
        assert!(set[1].points.is_empty());

        let clipped = set[0].within(DateRange::new(d("2022-01-01"), d("2022-12-31")));
        assert_eq!(clipped.points.len(), 1);
        assert_eq!(clipped.latest().unwrap().date, d("2022-01-03"));
    }
}
