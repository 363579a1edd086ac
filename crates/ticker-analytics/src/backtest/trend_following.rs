//! 추세추종 백테스트 엔진
//!
//! 전체 일별 이력(표시 구간 필터 전)으로 실행합니다. SMA-10 계산에 구간 이전의
//! 워밍업 데이터가 필요하기 때문입니다.
//!
//! # 시뮬레이션 규칙
//!
//! - 첫 신호가 나온 날 이후 첫 거래일부터 두 곡선 모두 1.0에서 시작
//! - 그 날의 활성 신호는 직전에 완료된 달의 월말 신호 (정확히 한 달 지연)
//! - 월이 바뀔 때 활성 신호가 달라지면 추세추종 자산에 수수료 1회 부과
//! - 매수 후 보유 = `close[i] / close[0]` (누적 곱이 아닌 직접 리베이스)
//! - 추세추종 = 매수 신호일 때 일간 수익률, 매도 신호일 때 일간 현금 이자로 복리
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use ticker_analytics::backtest::{run_trend_following, TrendFollowingParams};
//!
//! let params = TrendFollowingParams::default().with_commission_rate(0.002);
//!
//! match run_trend_following(&series, &params) {
//!     Some(result) => println!("{}", result.summary()),
//!     None => println!("백테스트에 필요한 이력이 부족합니다"),
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ticker_core::{
    years_between, BacktestSettings, DailyPoint, YearMonth, TRADING_DAYS_PER_YEAR,
};
use tracing::{debug, info};

use super::round_trip::RoundTripSummary;
use super::signal::{monthly_signals, MonthlySignalPoint, TrendSignal};
use crate::drawdown::{DrawdownSeries, PeakTracker};
use crate::metrics::{annualized_volatility, cagr_pct, simple_returns};
use crate::month_index::MonthEndIndex;

/// 백테스트에 필요한 최소 일별 포인트 수
pub const MIN_DAILY_POINTS: usize = 252;

/// 백테스트에 필요한 최소 월말 포인트 수
pub const MIN_MONTHLY_POINTS: usize = 12;

/// 추세추종 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFollowingParams {
    /// 신호 전환 수수료율 (예: 0.001 = 0.1%)
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,

    /// 연 무위험 이자율. 매도 구간의 현금 이자와 샤프 비율에 사용
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

fn default_commission_rate() -> f64 {
    0.001
}

fn default_risk_free_rate() -> f64 {
    0.02
}

impl Default for TrendFollowingParams {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

impl From<&BacktestSettings> for TrendFollowingParams {
    fn from(settings: &BacktestSettings) -> Self {
        Self {
            commission_rate: settings.commission_rate,
            risk_free_rate: settings.risk_free_rate,
        }
    }
}

impl TrendFollowingParams {
    /// 수수료율 설정
    pub fn with_commission_rate(mut self, rate: f64) -> Self {
        self.commission_rate = rate;
        self
    }

    /// 무위험 이자율 설정
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// 일간 현금 수익률 `(1 + r)^(1/252) - 1`
    pub fn daily_cash_return(&self) -> f64 {
        (1.0 + self.risk_free_rate).powf(1.0 / TRADING_DAYS_PER_YEAR) - 1.0
    }
}

/// 신호 전환 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalTransition {
    /// 전환이 적용된 날
    pub date: NaiveDate,
    /// 새 활성 신호
    pub signal: TrendSignal,
    /// 그 날의 종가
    pub price: f64,
}

/// 일별 자산 곡선 포인트
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFollowingEquityPoint {
    /// 날짜
    pub date: NaiveDate,
    /// 매수 후 보유 가치 (시작 1.0)
    pub buy_hold_value: f64,
    /// 추세추종 가치 (시작 1.0)
    pub trend_following_value: f64,
    /// 가장 최근 SMA-10 / 시작 가격
    pub normalized_sma10: Option<f64>,
    /// 그 날의 활성 신호
    pub active_signal: TrendSignal,
}

/// 자산 곡선 하나의 전략 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyStatistics {
    /// 최종 가치 (시작 1.0)
    pub final_amount: f64,
    /// 총 수익률 (%)
    pub total_return_pct: f64,
    /// 연복리 수익률 (%)
    pub cagr_pct: f64,
    /// 연율화 변동성 (%)
    pub annualized_volatility_pct: f64,
    /// 최대 낙폭 (%, 0 이상)
    pub max_drawdown_pct: f64,
    /// 현재 낙폭 (%, 0 이상)
    pub current_drawdown_pct: f64,
    /// 샤프 비율 `(CAGR - 무위험) / 변동성`
    pub sharpe_ratio: f64,
}

impl StrategyStatistics {
    /// `(날짜, 가치)` 곡선에서 통계를 계산합니다.
    pub fn from_curve(curve: &[(NaiveDate, f64)], risk_free_rate: f64) -> Self {
        let (Some(&(first_date, first_value)), Some(&(last_date, last_value))) =
            (curve.first(), curve.last())
        else {
            return Self::default();
        };

        let values: Vec<f64> = curve.iter().map(|(_, v)| *v).collect();
        let years = years_between(first_date, last_date);
        let cagr = cagr_pct(first_value, last_value, years);
        let volatility_pct = annualized_volatility(&simple_returns(&values))
            .map(|v| v * 100.0)
            .unwrap_or(0.0);

        let sharpe_ratio = if volatility_pct > 0.0 {
            (cagr / 100.0 - risk_free_rate) / (volatility_pct / 100.0)
        } else {
            0.0
        };

        let peaks = PeakTracker::scan(curve.iter().copied());

        Self {
            final_amount: last_value,
            total_return_pct: (last_value / first_value - 1.0) * 100.0,
            cagr_pct: cagr,
            annualized_volatility_pct: volatility_pct,
            max_drawdown_pct: peaks.map(|p| p.max_drawdown_pct).unwrap_or(0.0),
            current_drawdown_pct: peaks.map(|p| p.current_drawdown_pct).unwrap_or(0.0),
            sharpe_ratio,
        }
    }
}

/// 백테스트 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendFollowingResult {
    /// 사용한 파라미터
    pub params: TrendFollowingParams,
    /// 월간 신호 (워밍업 구간 포함)
    pub monthly_signals: Vec<MonthlySignalPoint>,
    /// 일별 자산 곡선
    pub equity_curve: Vec<TrendFollowingEquityPoint>,
    /// 매수 후 보유 낙폭
    pub buy_hold_drawdown: DrawdownSeries,
    /// 추세추종 낙폭
    pub trend_following_drawdown: DrawdownSeries,
    /// 신호 전환 (첫 항목은 초기 신호, 수수료 없음)
    pub transitions: Vec<SignalTransition>,
    /// 마지막 날의 활성 신호
    pub current_signal: TrendSignal,
    /// 매수 후 보유 통계
    pub buy_hold_stats: StrategyStatistics,
    /// 추세추종 통계
    pub trend_following_stats: StrategyStatistics,
    /// 매도→매수 왕복 집계
    pub round_trips: RoundTripSummary,
}

impl TrendFollowingResult {
    /// 시뮬레이션 시작일
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.equity_curve.first().map(|p| p.date)
    }

    /// 시뮬레이션 종료일
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.equity_curve.last().map(|p| p.date)
    }

    /// 요약 문자열 반환
    pub fn summary(&self) -> String {
        let bh = &self.buy_hold_stats;
        let tf = &self.trend_following_stats;
        let period = match (self.start_date(), self.end_date()) {
            (Some(s), Some(e)) => format!("{} → {}", s.format("%Y-%m-%d"), e.format("%Y-%m-%d")),
            _ => "-".to_string(),
        };
        let success = self
            .round_trips
            .success_rate_pct()
            .map(|v| format!("{:.1}%", v))
            .unwrap_or_else(|| "-".to_string());

        format!(
            "추세추종 백테스트 (SMA-10)\n\
             ═══════════════════════════════════════\n\
             기간: {}\n\
             현재 신호: {}\n\
             신호 전환: {}회, 왕복 성공률: {}\n\
             ───────────────────────────────────────\n\
             {:<10} {:>10} {:>10}\n\
             {:<10} {:>10.4} {:>10.4}\n\
             {:<10} {:>9.2}% {:>9.2}%\n\
             {:<10} {:>9.2}% {:>9.2}%\n\
             {:<10} {:>9.2}% {:>9.2}%\n\
             {:<10} {:>10.2} {:>10.2}\n\
             ═══════════════════════════════════════",
            period,
            self.current_signal,
            self.transitions.len().saturating_sub(1),
            success,
            "", "보유", "추세추종",
            "최종 가치", bh.final_amount, tf.final_amount,
            "CAGR", bh.cagr_pct, tf.cagr_pct,
            "변동성", bh.annualized_volatility_pct, tf.annualized_volatility_pct,
            "최대 낙폭", bh.max_drawdown_pct, tf.max_drawdown_pct,
            "샤프", bh.sharpe_ratio, tf.sharpe_ratio,
        )
    }
}

/// 추세추종 백테스트를 실행합니다.
///
/// # 매개변수
///
/// * `series` - 전체 일별 이력 (날짜 오름차순)
/// * `params` - 수수료율과 무위험 이자율
///
/// # 반환값
///
/// 일별 포인트가 252개 미만이거나 월말 포인트가 12개 미만이면 `None`.
/// 결과 없음은 오류가 아니라 표시 가능한 정상 상태입니다.
pub fn run_trend_following(
    series: &[DailyPoint],
    params: &TrendFollowingParams,
) -> Option<TrendFollowingResult> {
    if series.len() < MIN_DAILY_POINTS {
        debug!(points = series.len(), "backtest skipped: not enough daily points");
        return None;
    }

    // === 1. 월말 샘플링 ===
    let index = MonthEndIndex::build(series);
    if index.len() < MIN_MONTHLY_POINTS {
        debug!(months = index.len(), "backtest skipped: not enough monthly points");
        return None;
    }

    // === 2. 신호 생성 ===
    let signals = monthly_signals(&index);
    let signal_by_month: BTreeMap<YearMonth, TrendSignal> = signals
        .iter()
        .filter_map(|s| s.signal.map(|signal| (YearMonth::from_date(s.date), signal)))
        .collect();

    let first_signal_date = signals.iter().find(|s| s.signal.is_some())?.date;
    let start = series.iter().position(|p| p.date >= first_signal_date)?;
    let days = &series[start..];
    let base = days.first()?;

    // === 3. 일별 시뮬레이션 ===
    let mut active = signals
        .iter()
        .rev()
        .filter(|s| s.date <= base.date)
        .find_map(|s| s.signal)?;

    let daily_cash_return = params.daily_cash_return();
    let mut transitions = vec![SignalTransition {
        date: base.date,
        signal: active,
        price: base.close,
    }];
    let mut equity_curve = Vec::with_capacity(days.len());
    let mut trend_value = 1.0;
    let mut sma_cursor = 0usize;
    let mut latest_sma: Option<f64> = None;

    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            let prev = &days[i - 1];
            let prev_month = YearMonth::from_date(prev.date);

            if YearMonth::from_date(day.date) != prev_month {
                if let Some(&completed) = signal_by_month.get(&prev_month) {
                    if completed != active {
                        trend_value *= 1.0 - params.commission_rate;
                        active = completed;
                        transitions.push(SignalTransition {
                            date: day.date,
                            signal: active,
                            price: day.close,
                        });
                    }
                }
            }

            trend_value *= match active {
                TrendSignal::Buy => 1.0 + (day.close - prev.close) / prev.close,
                TrendSignal::Sell => 1.0 + daily_cash_return,
            };
        }

        while sma_cursor < signals.len() && signals[sma_cursor].date <= day.date {
            if let Some(sma) = signals[sma_cursor].sma10 {
                latest_sma = Some(sma);
            }
            sma_cursor += 1;
        }

        equity_curve.push(TrendFollowingEquityPoint {
            date: day.date,
            buy_hold_value: day.close / base.close,
            trend_following_value: trend_value,
            normalized_sma10: latest_sma.map(|sma| sma / base.close),
            active_signal: active,
        });
    }

    // === 4. 낙폭 곡선 ===
    let buy_hold_curve: Vec<(NaiveDate, f64)> =
        equity_curve.iter().map(|p| (p.date, p.buy_hold_value)).collect();
    let trend_curve: Vec<(NaiveDate, f64)> = equity_curve
        .iter()
        .map(|p| (p.date, p.trend_following_value))
        .collect();

    let buy_hold_drawdown = DrawdownSeries::from_values(buy_hold_curve.iter().copied());
    let trend_following_drawdown = DrawdownSeries::from_values(trend_curve.iter().copied());

    // === 5. 전략 통계 ===
    let buy_hold_stats = StrategyStatistics::from_curve(&buy_hold_curve, params.risk_free_rate);
    let trend_following_stats = StrategyStatistics::from_curve(&trend_curve, params.risk_free_rate);

    // === 6. 왕복 집계 ===
    let round_trips = RoundTripSummary::from_transitions(&transitions);

    info!(
        start = %base.date,
        days = equity_curve.len(),
        transitions = transitions.len(),
        current_signal = %active,
        buy_hold_final = buy_hold_stats.final_amount,
        trend_final = trend_following_stats.final_amount,
        "trend following backtest completed"
    );

    Some(TrendFollowingResult {
        params: *params,
        monthly_signals: signals,
        equity_curve,
        buy_hold_drawdown,
        trend_following_drawdown,
        transitions,
        current_signal: active,
        buy_hold_stats,
        trend_following_stats,
        round_trips,
    })
}
