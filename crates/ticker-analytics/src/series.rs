//! 시계열 유틸리티.
//!
//! 날짜 구간 필터링, 종목 간 공통 구간, 최고/최저 종가 탐색.
//! 모든 함수는 입력을 변경하지 않고 새 값을 반환합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ticker_core::{DailyPoint, DateRange, NamedSeries};

/// 종가 극값 포인트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 날짜
    pub date: NaiveDate,
    /// 종가
    pub price: f64,
}

/// 최고/최저 종가.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    /// 최고 종가 (동률이면 가장 이른 날짜)
    pub high: PricePoint,
    /// 최저 종가 (동률이면 가장 이른 날짜)
    pub low: PricePoint,
}

/// `start <= date <= end` 인 포인트만 남깁니다.
///
/// 일치하는 포인트가 없으면 빈 벡터를 반환합니다.
pub fn filter_by_date_range(series: &[DailyPoint], range: DateRange) -> Vec<DailyPoint> {
    series
        .iter()
        .filter(|p| range.contains(p.date))
        .copied()
        .collect()
}

/// 모든 종목에 데이터가 있는 공통 구간 (교집합).
///
/// `start = max(첫 날짜)`, `end = min(마지막 날짜)`.
/// 입력이 없거나 빈 시계열이 섞여 있으면 `None`입니다.
/// 서로 겹치지 않는 종목이면 `start > end`인 구간이 반환됩니다.
pub fn common_date_range(series: &[NamedSeries]) -> Option<DateRange> {
    let mut range: Option<DateRange> = None;

    for s in series {
        let own = s.date_range()?;
        range = Some(match range {
            None => own,
            Some(r) => DateRange::new(r.start.max(own.start), r.end.min(own.end)),
        });
    }

    range
}

/// 최고/최저 종가를 한 번의 순회로 찾습니다.
///
/// 엄격한 비교(`>`/`<`)를 쓰므로 동률이면 먼저 나온 포인트가 남습니다.
pub fn find_extremes(series: &[DailyPoint]) -> Option<Extremes> {
    let first = series.first()?;
    let mut high = first;
    let mut low = first;

    for point in &series[1..] {
        if point.close > high.close {
            high = point;
        }
        if point.close < low.close {
            low = point;
        }
    }

    Some(Extremes {
        high: PricePoint {
            date: high.date,
            price: high.close,
        },
        low: PricePoint {
            date: low.date,
            price: low.close,
        },
    })
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
    fn test_filter_inclusive_bounds() {
        let series = points(&[
            ("2024-01-01", 1.0),
            ("2024-01-02", 2.0),
            ("2024-01-03", 3.0),
            ("2024-01-04", 4.0),
        ]);
        let filtered =
            filter_by_date_range(&series, DateRange::new(d("2024-01-02"), d("2024-01-03")));
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].date, d("2024-01-02"));
        assert_eq!(filtered[1].date, d("2024-01-03"));

        let none = filter_by_date_range(&series, DateRange::new(d("2025-01-01"), d("2025-12-31")));
        assert!(none.is_empty());
    }

    #[test]
    fn test_common_date_range_is_intersection() {
        let a = NamedSeries::new("A", points(&[("2020-01-01", 1.0), ("2024-01-01", 1.0)]));
        let b = NamedSeries::new("B", points(&[("2021-06-01", 1.0), ("2023-06-01", 1.0)]));
        let range = common_date_range(&[a, b]).unwrap();
        assert_eq!(range.start, d("2021-06-01"));
        assert_eq!(range.end, d("2023-06-01"));
    }

    #[test]
    fn test_common_date_range_empty_input() {
        assert!(common_date_range(&[]).is_none());
    }

    #[test]
    fn test_find_extremes_scenario() {
        let series = points(&[
            ("2023-01-01", 100.0),
            ("2023-06-01", 150.0),
            ("2023-12-01", 90.0),
        ]);
        let ext = find_extremes(&series).unwrap();
        assert_eq!(ext.high.date, d("2023-06-01"));
        assert_eq!(ext.high.price, 150.0);
        assert_eq!(ext.low.date, d("2023-12-01"));
        assert_eq!(ext.low.price, 90.0);
    }

    #[test]
    fn test_find_extremes_first_occurrence_wins() {
        let series = points(&[
            ("2024-01-01", 100.0),
            ("2024-01-02", 120.0),
            ("2024-01-03", 120.0),
            ("2024-01-04", 100.0),
        ]);
        let ext = find_extremes(&series).unwrap();
        assert_eq!(ext.high.date, d("2024-01-02"));
        assert_eq!(ext.low.date, d("2024-01-01"));
        assert!(find_extremes(&[]).is_none());
    }
}
