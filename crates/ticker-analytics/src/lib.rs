//! 수익률/위험 통계 및 추세추종 백테스트 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 시계열 유틸리티 (구간 필터, 공통 구간, 극값)
//! - 요약 통계 (수익률, 낙폭, 세션 통계, 변동성, 샤프 비율)
//! - 낙폭 시계열
//! - 다중 종목 비교 차트 정규화
//! - 월별 × 연간 수익률 테이블
//! - 롤링 수익률
//! - 10개월 SMA 추세추종 백테스트
//! - 대시보드 세션 (위 계산을 종목별로 묶음)
//!
//! 모든 계산은 입력을 변경하지 않는 순수 함수입니다.
//!
//! # Re-exports
//!
//! - [`backtest`]: 추세추종 백테스트 (TrendFollowingResult, StrategyStatistics 등)
//! - [`session`]: 대시보드 세션 (DashboardSession, DashboardReport)

pub mod backtest;
pub mod drawdown;
pub mod metrics;
pub mod month_index;
pub mod normalize;
pub mod returns_table;
pub mod rolling;
pub mod series;
pub mod session;
pub mod statistics;

// Series 모듈 re-exports
pub use series::{common_date_range, filter_by_date_range, find_extremes, Extremes, PricePoint};

// Statistics 모듈 re-exports
pub use statistics::{
    SummaryStatistics, TrailingReturns, MIN_POINTS_FOR_STATISTICS, SHARPE_RISK_FREE_RATE,
};

// Drawdown 모듈 re-exports
pub use drawdown::{drawdown_series, DrawdownPoint, DrawdownSeries, PeakSummary, PeakTracker};

// Normalize 모듈 re-exports
pub use normalize::{normalize_for_chart, ChartRow, NormalizedChart, REBASE_VALUE};

// Returns table 모듈 re-exports
pub use returns_table::{
    MonthlyReturnEntry, PeriodReturn, QuarterlyReturnEntry, ReturnDetail, ReturnsTable,
    YearlyReturnRecord, MIN_POINTS_FOR_TABLE,
};

// Rolling 모듈 re-exports
pub use rolling::{rolling_returns, rolling_returns_set, RollingReturnPoint, RollingReturnSeries};

// Backtest 모듈 re-exports
pub use backtest::{
    monthly_signals, run_trend_following, MonthlySignalPoint, RoundTrip, RoundTripSummary,
    SignalTransition, StrategyStatistics, TrendFollowingEquityPoint, TrendFollowingParams,
    TrendFollowingResult, TrendSignal,
};

// Session 모듈 re-exports
pub use session::{
    analyze, DashboardReport, DashboardSession, InstrumentReport, OmittedInstrument,
};

pub use month_index::{MonthEnd, MonthEndIndex};
