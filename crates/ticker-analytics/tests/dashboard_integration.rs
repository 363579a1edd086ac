//! 대시보드 파이프라인 통합 테스트.
//!
//! 합성 시세로 전체 흐름을 검증합니다:
//! 1. 종목별 시계열 생성 (다년, 주말 제외)
//! 2. 설정 구간으로 세션 분석
//! 3. 요약 통계, 낙폭, 수익률 테이블, 롤링 수익률, 백테스트 결과 확인

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use ticker_analytics::{
    analyze, find_extremes, rolling_returns, run_trend_following, DashboardReport,
    SummaryStatistics, TrendFollowingParams, TrendSignal,
};
use ticker_core::{AppConfig, DailyPoint, NamedSeries};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// 평일 시세 생성. 가격은 사인파 + 추세
fn weekday_series(ticker: &str, start: &str, days: usize, drift: f64) -> NamedSeries {
    let mut date = d(start);
    let mut data = Vec::with_capacity(days);
    while data.len() < days {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            let i = data.len() as f64;
            let close = 100.0 * (1.0 + drift).powf(i) * (1.0 + 0.15 * (i / 40.0).sin());
            data.push(DailyPoint::from_partial(date, close, None, None, None, Some(1_000.0)));
        }
        date += Duration::days(1);
    }
    NamedSeries::new(ticker, data)
}

#[test]
fn test_extremes_and_drawdown_scenario() {
    let series = vec![
        DailyPoint::from_close(d("2023-01-01"), 100.0),
        DailyPoint::from_close(d("2023-06-01"), 150.0),
        DailyPoint::from_close(d("2023-12-01"), 90.0),
    ];

    let extremes = find_extremes(&series).unwrap();
    assert_eq!(extremes.high.date, d("2023-06-01"));
    assert_eq!(extremes.low.date, d("2023-12-01"));

    let stats = SummaryStatistics::calculate(&series).unwrap();
    assert!((stats.max_drawdown_pct - 40.0).abs() < 1e-9);
    assert!((stats.period_return_pct + 10.0).abs() < 1e-9);
}

#[test]
fn test_one_year_rolling_scenario() {
    let series = vec![
        DailyPoint::from_close(d("2023-01-01"), 100.0),
        DailyPoint::from_close(d("2024-01-01"), 110.0),
    ];
    let points = rolling_returns(&series, 1);
    assert_eq!(points.len(), 1);
    assert!((points[0].rolling_cagr - 10.0).abs() < 1e-9);
}

#[test]
fn test_full_dashboard() {
    let spy = weekday_series("SPY", "2015-01-01", 1500, 0.0004);
    let qqq = weekday_series("QQQ", "2016-01-01", 1200, 0.0006);

    let mut config = AppConfig::default();
    config.display.start = Some(d("2017-01-01"));
    config.rolling.windows_years = vec![1, 3];

    let expected_end = spy.last_date().unwrap().min(qqq.last_date().unwrap());
    let report = analyze(&[spy, qqq], &config);
    assert!(report.omitted.is_empty());
    assert_eq!(report.instruments.len(), 2);

    let range = report.range.unwrap();
    assert_eq!(range.start, d("2017-01-01"));
    // 종료일은 두 종목 마지막 날짜 중 이른 쪽
    assert_eq!(range.end, expected_end);

    let spy_report = report.instrument("SPY").unwrap();
    assert!(spy_report.statistics.start_date >= range.start);
    assert!(spy_report.statistics.trailing.ytd_pct.is_some());
    assert!(spy_report.statistics.trailing.one_year_pct.is_some());

    // 낙폭은 구간으로 잘렸지만 고점은 전체 이력 기준
    assert_eq!(spy_report.drawdown.len(), spy_report.points);
    assert!(spy_report.drawdown.points.iter().all(|p| p.drawdown <= 0.0));

    // 수익률 테이블은 구간 첫 해부터
    assert_eq!(spy_report.returns_table.years[0].year, 2017);
    assert!(!spy_report.monthly_returns.is_empty());
    assert!(!spy_report.quarterly_returns.is_empty());

    // 롤링 수익률은 구간 이전 이력을 사용하므로 구간 시작부터 값이 있음
    assert_eq!(spy_report.rolling_returns.len(), 2);
    let one_year = &spy_report.rolling_returns[0];
    assert_eq!(one_year.window_years, 1);
    assert!(one_year.points[0].date < d("2017-01-10"));
    assert!(one_year.points.iter().all(|p| range.contains(p.date)));

    let backtest = spy_report.trend_following.as_ref().unwrap();
    assert_eq!(backtest.equity_curve[0].buy_hold_value, 1.0);
    assert!(backtest.equity_curve[0].date < range.start);
    assert!(backtest.transitions.len() > 1);
    assert_eq!(
        backtest.round_trips.total,
        backtest.round_trips.round_trips.len()
    );

    assert!(report.chart.rebased);
    assert_eq!(report.chart.tickers.len(), 2);
    assert!(report.chart.rows.iter().all(|r| range.contains(r.date)));
}

#[test]
fn test_report_json_round_trip() {
    let spy = weekday_series("SPY", "2018-01-01", 400, 0.0003);
    let report = analyze(&[spy], &AppConfig::default());

    let json = report.to_json(true).unwrap();
    let parsed: DashboardReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.instruments.len(), 1);
    assert_eq!(parsed.range, report.range);
    assert!(json.contains("\"signal\": \"BUY\"") || json.contains("\"signal\": \"SELL\""));
}

#[test]
fn test_backtest_matches_session_parameters() {
    let spy = weekday_series("SPY", "2015-01-01", 800, 0.0004);
    let mut config = AppConfig::default();
    config.backtest.commission_rate = 0.005;
    config.backtest.risk_free_rate = 0.03;

    let report = analyze(&[spy.clone()], &config);
    let from_session = report.instrument("SPY").unwrap().trend_following.as_ref().unwrap();

    let direct = run_trend_following(
        &spy.data,
        &TrendFollowingParams::from(&config.backtest),
    )
    .unwrap();

    assert_eq!(from_session.params.commission_rate, 0.005);
    assert_eq!(
        from_session.trend_following_stats.final_amount,
        direct.trend_following_stats.final_amount
    );
    assert!(matches!(direct.current_signal, TrendSignal::Buy | TrendSignal::Sell));
}
