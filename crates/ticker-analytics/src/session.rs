//! 대시보드 세션.
//!
//! 여러 종목을 한 번에 분석해 화면 하나에 필요한 결과를 모읍니다.
//!
//! # 흐름
//!
//! 1. 표시 구간 결정: 설정의 시작/종료일, 없으면 모든 종목의 공통 구간
//! 2. 종목별로
//!    - 구간으로 자른 시계열에서 요약 통계와 수익률 테이블
//!    - 전체 이력에서 낙폭/롤링 수익률을 계산한 뒤 구간으로 자름
//!    - 전체 이력에서 추세추종 백테스트
//! 3. 데이터 부족이나 잘못된 입력인 종목은 `omitted`에 기록하고 나머지는 계속 진행
//! 4. 포함된 종목의 구간 시계열로 비교 차트 생성

use serde::{Deserialize, Serialize};
use ticker_core::{series_span, AppConfig, DailyPoint, DateRange, NamedSeries, TickerResult};
use tracing::{debug, info, warn};

use crate::backtest::{run_trend_following, TrendFollowingParams, TrendFollowingResult};
use crate::drawdown::{drawdown_series, DrawdownSeries};
use crate::normalize::{normalize_for_chart, NormalizedChart};
use crate::returns_table::{MonthlyReturnEntry, QuarterlyReturnEntry, ReturnsTable};
use crate::rolling::{rolling_returns_set, RollingReturnSeries};
use crate::series::{common_date_range, filter_by_date_range};
use crate::statistics::SummaryStatistics;

/// 종목 하나의 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentReport {
    /// 종목 심볼
    pub ticker: String,
    /// 표시 구간 안의 포인트 수
    pub points: usize,
    /// 요약 통계 (표시 구간)
    pub statistics: SummaryStatistics,
    /// 낙폭 시계열 (전체 이력 기준 고점, 표시 구간으로 자름)
    pub drawdown: DrawdownSeries,
    /// 월별 × 연간 수익률 테이블 (표시 구간)
    pub returns_table: ReturnsTable,
    /// 월별 수익률 목록
    pub monthly_returns: Vec<MonthlyReturnEntry>,
    /// 분기별 수익률 목록
    pub quarterly_returns: Vec<QuarterlyReturnEntry>,
    /// 구간 길이별 롤링 수익률 (표시 구간으로 자름)
    pub rolling_returns: Vec<RollingReturnSeries>,
    /// 추세추종 백테스트 (이력이 부족하면 None)
    pub trend_following: Option<TrendFollowingResult>,
}

/// 분석에서 제외된 종목.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmittedInstrument {
    /// 종목 심볼
    pub ticker: String,
    /// 제외 사유
    pub reason: String,
    /// 데이터 부족으로 인한 제외인지
    pub insufficient_data: bool,
}

/// 대시보드 전체 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// 표시 구간 (입력에 데이터가 없으면 None)
    pub range: Option<DateRange>,
    /// 분석된 종목 (입력 순서)
    pub instruments: Vec<InstrumentReport>,
    /// 제외된 종목
    pub omitted: Vec<OmittedInstrument>,
    /// 비교 차트
    pub chart: NormalizedChart,
}

impl DashboardReport {
    /// 종목 결과 조회
    pub fn instrument(&self, ticker: &str) -> Option<&InstrumentReport> {
        self.instruments.iter().find(|r| r.ticker == ticker)
    }

    /// JSON 문자열로 직렬화합니다.
    pub fn to_json(&self, pretty: bool) -> TickerResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// 대시보드 분석 세션.
///
/// 상태를 갖지 않으며 `analyze` 호출마다 모든 결과를 새로 계산합니다.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    config: AppConfig,
}

impl DashboardSession {
    /// 설정으로 세션을 생성합니다.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 세션 설정
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 모든 종목을 분석합니다.
    pub fn analyze(&self, series: &[NamedSeries]) -> DashboardReport {
        let range = self.resolve_range(series);
        let params = TrendFollowingParams::from(&self.config.backtest);

        let mut instruments = Vec::with_capacity(series.len());
        let mut included = Vec::with_capacity(series.len());
        let mut omitted = Vec::new();

        for named in series {
            let span = series_span!("analyze_instrument", named.ticker);
            let _enter = span.enter();

            match self.analyze_instrument(named, range, &params) {
                Ok((report, filtered)) => {
                    included.push(NamedSeries::new(named.ticker.clone(), filtered));
                    instruments.push(report);
                }
                Err(e) if e.is_instrument_local() => {
                    warn!(error = %e, "instrument omitted from dashboard");
                    omitted.push(OmittedInstrument {
                        ticker: named.ticker.clone(),
                        reason: e.to_string(),
                        insufficient_data: e.is_insufficient_data(),
                    });
                }
                Err(e) => {
                    warn!(error = %e, "unexpected analysis error, instrument omitted");
                    omitted.push(OmittedInstrument {
                        ticker: named.ticker.clone(),
                        reason: e.to_string(),
                        insufficient_data: false,
                    });
                }
            }
        }

        let chart = normalize_for_chart(&included);

        info!(
            instruments = instruments.len(),
            omitted = omitted.len(),
            range = ?range,
            "dashboard analysis completed"
        );

        DashboardReport {
            range,
            instruments,
            omitted,
            chart,
        }
    }

    /// 표시 구간을 결정합니다.
    fn resolve_range(&self, series: &[NamedSeries]) -> Option<DateRange> {
        let non_empty: Vec<NamedSeries> = series.iter().filter(|s| !s.is_empty()).cloned().collect();
        let range = self.config.display.resolve(common_date_range(&non_empty));

        if let Some(r) = range {
            if r.is_inverted() {
                warn!(start = %r.start, end = %r.end, "display range is empty: histories do not overlap");
            }
        }
        range
    }

    fn analyze_instrument(
        &self,
        named: &NamedSeries,
        range: Option<DateRange>,
        params: &TrendFollowingParams,
    ) -> TickerResult<(InstrumentReport, Vec<DailyPoint>)> {
        named.validate()?;

        let filtered = match range {
            Some(r) => filter_by_date_range(&named.data, r),
            None => named.data.clone(),
        };
        debug!(total = named.len(), filtered = filtered.len(), "series filtered");

        let statistics = SummaryStatistics::calculate(&filtered)?;
        let returns_table = ReturnsTable::build(&filtered)?;

        let full_drawdown = drawdown_series(&named.data);
        let rolling_full = rolling_returns_set(&named.data, &self.config.rolling.windows_years);
        let (drawdown, rolling_returns) = match range {
            Some(r) => (
                full_drawdown.within(r),
                rolling_full.iter().map(|s| s.within(r)).collect(),
            ),
            None => (full_drawdown, rolling_full),
        };

        let trend_following = {
            let _span = series_span!("run_trend_following", named.ticker, "backtest").entered();
            run_trend_following(&named.data, params)
        };
        if trend_following.is_none() {
            debug!(points = named.len(), "no trend following result");
        }

        let report = InstrumentReport {
            ticker: named.ticker.clone(),
            points: filtered.len(),
            monthly_returns: returns_table.monthly_returns(),
            quarterly_returns: returns_table.quarterly_returns(),
            statistics,
            drawdown,
            returns_table,
            rolling_returns,
            trend_following,
        };

        Ok((report, filtered))
    }
}

/// 기본 세션으로 한 번 분석합니다.
pub fn analyze(series: &[NamedSeries], config: &AppConfig) -> DashboardReport {
    DashboardSession::new(config.clone()).analyze(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn daily(ticker: &str, start: &str, days: i64, price_at: impl Fn(i64) -> f64) -> NamedSeries {
        let s = d(start);
        NamedSeries::new(
            ticker,
            (0..days)
                .map(|i| DailyPoint::from_close(s + Duration::days(i), price_at(i)))
                .collect(),
        )
    }

    #[test]
    fn test_common_range_applied() {
        let a = daily("AAA", "2020-01-01", 100, |i| 100.0 + i as f64);
        let b = daily("BBB", "2020-02-01", 100, |i| 50.0 + i as f64);
        let report = analyze(&[a, b], &AppConfig::default());

        let range = report.range.unwrap();
        assert_eq!(range.start, d("2020-02-01"));
        assert_eq!(range.end, d("2020-04-09"));
        assert_eq!(report.instruments.len(), 2);
        assert!(report.omitted.is_empty());

        let aaa = report.instrument("AAA").unwrap();
        assert_eq!(aaa.statistics.start_date, d("2020-02-01"));
        assert_eq!(aaa.points, aaa.drawdown.len());
        assert!(aaa.trend_following.is_none());

        assert!(report.chart.rebased);
        assert_eq!(report.chart.base_date, Some(d("2020-02-01")));
    }

    #[test]
    fn test_short_instrument_is_omitted() {
        let a = daily("AAA", "2020-01-01", 100, |i| 100.0 + i as f64);
        let short = daily("ONE", "2020-01-10", 1, |_| 10.0);
        let mut config = AppConfig::default();
        config.display.start = Some(d("2020-01-01"));
        config.display.end = Some(d("2020-12-31"));

        let report = analyze(&[a, short], &config);
        assert_eq!(report.instruments.len(), 1);
        assert_eq!(report.omitted.len(), 1);
        assert_eq!(report.omitted[0].ticker, "ONE");
        assert!(report.omitted[0].insufficient_data);

        // 차트는 포함된 종목만, 단일 종목이므로 원래 종가
        assert_eq!(report.chart.tickers, vec!["AAA".to_string()]);
        assert!(!report.chart.rebased);
        assert_eq!(report.chart.rows[0].values[0], Some(100.0));
    }

    #[test]
    fn test_invalid_instrument_is_omitted() {
        let a = daily("AAA", "2020-01-01", 30, |i| 100.0 + i as f64);
        let mut bad = daily("BAD", "2020-01-01", 30, |i| 100.0 + i as f64);
        bad.data[5].close = -1.0;

        let report = analyze(&[a, bad], &AppConfig::default());
        assert_eq!(report.instruments.len(), 1);
        assert!(!report.omitted[0].insufficient_data);
    }

    #[test]
    fn test_drawdown_keeps_pre_range_peak() {
        // 1월에 200까지 올랐다가 이후 100으로
        let a = daily("AAA", "2020-01-01", 120, |i| if i == 10 { 200.0 } else { 100.0 });
        let mut config = AppConfig::default();
        config.display.start = Some(d("2020-03-01"));

        let report = analyze(&[a], &config);
        let aaa = report.instrument("AAA").unwrap();
        assert!((aaa.drawdown.points[0].drawdown + 50.0).abs() < 1e-9);
        // 요약 통계는 구간 안에서만 계산
        assert_eq!(aaa.statistics.max_drawdown_pct, 0.0);
    }

    #[test]
    fn test_report_serializes_nulls() {
        let a = daily("AAA", "2020-01-01", 40, |i| 100.0 + i as f64);
        let report = analyze(&[a], &AppConfig::default());
        let json = report.to_json(false).unwrap();
        assert!(json.contains("\"trend_following\":null"));
        assert!(json.contains("\"ytd_pct\":null"));
    }

    #[test]
    fn test_empty_input() {
        let report = analyze(&[], &AppConfig::default());
        assert!(report.range.is_none());
        assert!(report.instruments.is_empty());
        assert!(report.chart.rows.is_empty());
    }
}
