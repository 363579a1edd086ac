//! 단일 종목 요약 통계.
//!
//! 하나의 시계열과 그 시작/끝 경계에서 수익률, 가격 극값, 낙폭, 세션(상승/하락일)
//! 통계, 변동성, 샤프 비율, 기간 수익률(YTD/1Y/3Y)을 계산합니다.
//!
//! # 정책
//!
//! - 경과 연수는 거래일이 아니라 달력일 / 365.25
//! - 경과 연수가 0 이하이면 CAGR = 0
//! - 변동성이 0이면 샤프 비율 = 0
//! - 기간 수익률의 기준 가격이 없으면 `None` (0%와 구분됨)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ticker_core::{
    subtract_years, years_between, DailyPoint, TickerError, TickerResult, YearMonth,
};
use tracing::debug;

use crate::drawdown::PeakTracker;
use crate::metrics::{annualized_volatility, cagr_pct, mean, return_pct, simple_returns};
use crate::month_index::MonthEndIndex;
use crate::series::find_extremes;

/// 요약 통계의 샤프 비율에 쓰는 고정 무위험 이자율 (연 2%)
///
/// 추세추종 전략의 설정 가능한 이자율과는 별개입니다.
pub const SHARPE_RISK_FREE_RATE: f64 = 0.02;

/// 요약 통계 계산에 필요한 최소 포인트 수
pub const MIN_POINTS_FOR_STATISTICS: usize = 2;

/// 기간 수익률 (%).
///
/// 각 값은 기준 가격을 찾을 수 없으면 `None`입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailingReturns {
    /// 연초 대비 (전년도 12월 말 종가 기준)
    pub ytd_pct: Option<f64>,
    /// 1년 수익률
    pub one_year_pct: Option<f64>,
    /// 3년 수익률
    pub three_year_pct: Option<f64>,
}

impl TrailingReturns {
    /// 마지막 포인트 기준 기간 수익률을 계산합니다.
    pub fn calculate(series: &[DailyPoint], index: &MonthEndIndex) -> Self {
        let Some(last) = series.last() else {
            return Self::default();
        };

        let ytd_pct = index
            .get(YearMonth::prior_december(YearMonth::from_date(last.date).year))
            .map(|base| return_pct(base.price, last.close));

        Self {
            ytd_pct,
            one_year_pct: Self::years_back(series, last, 1),
            three_year_pct: Self::years_back(series, last, 3),
        }
    }

    /// `마지막 날짜 - n년` 이전의 가장 최근 종가를 기준으로 한 수익률.
    fn years_back(series: &[DailyPoint], last: &DailyPoint, years: u32) -> Option<f64> {
        let target = subtract_years(last.date, years)?;
        let base = series.iter().rev().find(|p| p.date <= target)?;
        Some(return_pct(base.close, last.close))
    }
}

/// 요약 통계.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// 시작일
    pub start_date: NaiveDate,
    /// 종료일
    pub end_date: NaiveDate,
    /// 시작 종가
    pub start_price: f64,
    /// 종료 종가
    pub end_price: f64,

    /// 기간 수익률 (%)
    pub period_return_pct: f64,
    /// 경과 연수 (달력일 / 365.25)
    pub years: f64,
    /// 연복리 수익률 (%)
    pub cagr_pct: f64,
    /// 1달러의 성장 (종료 / 시작)
    pub growth_of_one: f64,

    /// 최고 종가
    pub max_price: f64,
    /// 최고 종가 날짜 (동률이면 가장 이른 날)
    pub max_price_date: NaiveDate,
    /// 최저 종가
    pub min_price: f64,
    /// 최저 종가 날짜 (동률이면 가장 이른 날)
    pub min_price_date: NaiveDate,

    /// 최대 낙폭 (%, 0 이상)
    pub max_drawdown_pct: f64,
    /// 최대 낙폭 발생일
    pub max_drawdown_date: Option<NaiveDate>,
    /// 가장 긴 낙폭 구간 (달력일)
    pub longest_drawdown_days: i64,
    /// 현재 낙폭 (%, 0 이상)
    pub current_drawdown_pct: f64,
    /// 기간 최고가를 다시 회복하려면 필요한 상승률 (%)
    pub to_max_price_pct: f64,

    /// 일간 수익률 개수
    pub total_sessions: usize,
    /// 상승 세션 수 (수익률 > 0)
    pub profit_sessions: usize,
    /// 하락 세션 수 (수익률 < 0)
    pub loss_sessions: usize,
    /// 상승 세션 평균 수익률 (비율)
    pub avg_profit_session: f64,
    /// 하락 세션 평균 수익률 (비율, 음수)
    pub avg_loss_session: f64,

    /// 연율화 변동성 (비율, 0.2 = 20%)
    pub annualized_volatility: f64,
    /// 샤프 비율 (무위험 이자율 2%)
    pub sharpe_ratio: f64,

    /// 기간 수익률
    pub trailing: TrailingReturns,
}

impl SummaryStatistics {
    /// 시계열에서 요약 통계를 계산합니다.
    ///
    /// # 에러
    ///
    /// 포인트가 2개 미만이면 [`TickerError::InsufficientData`].
    pub fn calculate(series: &[DailyPoint]) -> TickerResult<Self> {
        if series.len() < MIN_POINTS_FOR_STATISTICS {
            return Err(TickerError::insufficient(
                MIN_POINTS_FOR_STATISTICS,
                series.len(),
            ));
        }

        let first = series[0];
        let last = series[series.len() - 1];

        // === 수익률 ===
        let period_return_pct = (last.close - first.close) / first.close * 100.0;
        let years = years_between(first.date, last.date);
        let cagr = cagr_pct(first.close, last.close, years);

        // === 가격 극값 ===
        let extremes =
            find_extremes(series).ok_or_else(|| TickerError::insufficient(1, series.len()))?;
        let to_max_price_pct = if extremes.high.price > last.close {
            (extremes.high.price / last.close - 1.0) * 100.0
        } else {
            0.0
        };

        // === 낙폭 ===
        let mut tracker = PeakTracker::new(first.date, first.close);
        for point in series {
            tracker.observe(point.date, point.close);
        }
        let drawdown = tracker.finish();

        // === 세션 통계 ===
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        let daily = simple_returns(&closes);
        let profits: Vec<f64> = daily.iter().copied().filter(|r| *r > 0.0).collect();
        let losses: Vec<f64> = daily.iter().copied().filter(|r| *r < 0.0).collect();

        // === 변동성 / 샤프 ===
        let volatility = annualized_volatility(&daily).unwrap_or(0.0);
        let sharpe_ratio = if volatility > 0.0 {
            (cagr / 100.0 - SHARPE_RISK_FREE_RATE) / volatility
        } else {
            0.0
        };

        // === 기간 수익률 ===
        let index = MonthEndIndex::build(series);
        let trailing = TrailingReturns::calculate(series, &index);

        debug!(
            points = series.len(),
            start = %first.date,
            end = %last.date,
            cagr_pct = cagr,
            "summary statistics computed"
        );

        Ok(Self {
            start_date: first.date,
            end_date: last.date,
            start_price: first.close,
            end_price: last.close,
            period_return_pct,
            years,
            cagr_pct: cagr,
            growth_of_one: last.close / first.close,
            max_price: extremes.high.price,
            max_price_date: extremes.high.date,
            min_price: extremes.low.price,
            min_price_date: extremes.low.date,
            max_drawdown_pct: drawdown.max_drawdown_pct,
            max_drawdown_date: drawdown.max_drawdown_date,
            longest_drawdown_days: drawdown.longest_drawdown_days,
            current_drawdown_pct: drawdown.current_drawdown_pct,
            to_max_price_pct,
            total_sessions: daily.len(),
            profit_sessions: profits.len(),
            loss_sessions: losses.len(),
            avg_profit_session: mean(&profits),
            avg_loss_session: mean(&losses),
            annualized_volatility: volatility,
            sharpe_ratio,
            trailing,
        })
    }

    /// 대시보드/로그 출력용 한 줄 요약.
    pub fn summary(&self) -> String {
        format!(
            "기간: {} ~ {} | 수익률: {:.2}% | CAGR: {:.2}% | MDD: {:.1}% | 변동성: {:.1}% | 샤프: {:.2}",
            self.start_date,
            self.end_date,
            self.period_return_pct,
            self.cagr_pct,
            self.max_drawdown_pct,
            self.annualized_volatility * 100.0,
            self.sharpe_ratio
        )
    }
}
