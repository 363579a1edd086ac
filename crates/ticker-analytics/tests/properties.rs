//! 분석 엔진 불변 조건 속성 테스트.
//!
//! - 낙폭은 항상 0 이하이고 고점에서 정확히 0
//! - 구간 필터는 멱등
//! - 단일 종목 정규화는 원래 종가를 그대로 유지
//! - 두 종목 정규화는 공통 시작일에 정확히 100
//! - 수수료가 클수록 추세추종 최종 가치는 작거나 같음
//! - 월 수익률 복리 누적은 연 수익률에 근접

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use ticker_analytics::{
    drawdown_series, filter_by_date_range, normalize_for_chart, run_trend_following,
    ReturnsTable, SummaryStatistics, TrendFollowingParams,
};
use ticker_core::{DailyPoint, DateRange, NamedSeries};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
}

/// 일간 수익률 목록을 연속된 달력일의 종가 시계열로 변환
fn build_series(start_price: f64, returns: &[f64]) -> Vec<DailyPoint> {
    let mut price = start_price;
    let mut result = Vec::with_capacity(returns.len() + 1);
    result.push(DailyPoint::from_close(start_date(), price));
    for (i, r) in returns.iter().enumerate() {
        price *= 1.0 + r;
        result.push(DailyPoint::from_close(
            start_date() + Duration::days(i as i64 + 1),
            price,
        ));
    }
    result
}

fn series_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<DailyPoint>> {
    (
        1.0..1000.0f64,
        prop::collection::vec(-0.05..0.05f64, min_len..max_len),
    )
        .prop_map(|(start, returns)| build_series(start, &returns))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_drawdown_never_positive(series in series_strategy(1, 300)) {
        let dd = drawdown_series(&series);
        prop_assert_eq!(dd.points.len(), series.len());

        let mut running_max = f64::MIN;
        for (point, daily) in dd.points.iter().zip(&series) {
            running_max = running_max.max(daily.close);
            prop_assert!(point.drawdown <= 0.0);
            if daily.close == running_max {
                prop_assert_eq!(point.drawdown, 0.0);
            }
        }
        prop_assert!(dd.max_drawdown <= 0.0);
        prop_assert!(dd.current_drawdown >= 0.0);
    }

    #[test]
    fn prop_period_return_matches_endpoints(series in series_strategy(1, 200)) {
        let stats = SummaryStatistics::calculate(&series).unwrap();
        let first = series[0].close;
        let last = series[series.len() - 1].close;
        let expected = (last / first - 1.0) * 100.0;
        prop_assert!((stats.period_return_pct - expected).abs() < 1e-9 * expected.abs().max(1.0));
    }

    #[test]
    fn prop_filter_is_idempotent(
        series in series_strategy(0, 200),
        a in 0i64..250,
        len in 0i64..250,
    ) {
        let range = DateRange::new(start_date() + Duration::days(a), start_date() + Duration::days(a + len));
        let once = filter_by_date_range(&series, range);
        let twice = filter_by_date_range(&once, range);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_single_series_chart_is_identity(series in series_strategy(0, 150)) {
        let chart = normalize_for_chart(&[NamedSeries::new("X", series.clone())]);
        prop_assert!(!chart.rebased);
        prop_assert_eq!(chart.rows.len(), series.len());
        for (row, point) in chart.rows.iter().zip(&series) {
            prop_assert_eq!(row.date, point.date);
            prop_assert_eq!(row.values[0], Some(point.close));
        }
    }

    #[test]
    fn prop_two_series_start_at_100(
        a in series_strategy(1, 100),
        b in series_strategy(1, 100),
        offset in 0usize..20,
    ) {
        let b: Vec<DailyPoint> = b.into_iter().skip(offset).collect();
        prop_assume!(!b.is_empty());

        let chart = normalize_for_chart(&[NamedSeries::new("A", a), NamedSeries::new("B", b)]);
        prop_assert!(chart.rebased);
        let first = &chart.rows[0];
        prop_assert_eq!(Some(first.date), chart.base_date);
        // 공통 시작일에 두 종목 모두 데이터가 있으면 둘 다 정확히 100
        if let [Some(va), Some(vb)] = first.values[..] {
            prop_assert_eq!(va, 100.0);
            prop_assert_eq!(vb, 100.0);
        }
    }

    #[test]
    fn prop_commission_is_monotonic(
        series in series_strategy(400, 600),
        c1 in 0.0..0.02f64,
        extra in 0.0..0.02f64,
    ) {
        let low = run_trend_following(&series, &TrendFollowingParams::default().with_commission_rate(c1));
        let high = run_trend_following(&series, &TrendFollowingParams::default().with_commission_rate(c1 + extra));

        let (low, high) = (low.unwrap(), high.unwrap());
        prop_assert_eq!(low.transitions.len(), high.transitions.len());
        prop_assert!(
            high.trend_following_stats.final_amount
                <= low.trend_following_stats.final_amount * (1.0 + 1e-12)
        );
    }

    #[test]
    fn prop_monthly_compounding_near_annual(series in series_strategy(800, 1000)) {
        let table = ReturnsTable::build(&series).unwrap();
        for record in &table.years {
            let full_year = record.months.iter().all(Option::is_some);
            if let (true, Some(annual)) = (full_year, record.annual) {
                let compounded = record.compounded_monthly_pct().unwrap();
                prop_assert!((compounded - annual.return_pct).abs() < 1e-6 * annual.return_pct.abs().max(1.0));
            }
        }
    }
}

