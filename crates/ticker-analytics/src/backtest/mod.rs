//! 추세추종 백테스트 모듈
//!
//! 월말 종가의 10개월 이동평균으로 매수/매도 신호를 만들고, 일 단위로
//! 매수 후 보유 전략과 추세추종 전략의 자산 곡선을 비교합니다.
//!
//! # 주요 구성요소
//!
//! - [`monthly_signals`]: 월말 샘플링과 SMA-10 신호 생성
//! - [`run_trend_following`]: 일별 자산 곡선 시뮬레이션과 전략 통계
//! - [`RoundTripSummary`]: 매도→매수 왕복 성공률

pub mod round_trip;
pub mod signal;
pub mod trend_following;

pub use round_trip::{RoundTrip, RoundTripSummary};
pub use signal::{monthly_signals, MonthlySignalPoint, TrendSignal, SMA_PERIOD_MONTHS};
pub use trend_following::{
    run_trend_following, SignalTransition, StrategyStatistics, TrendFollowingEquityPoint,
    TrendFollowingParams, TrendFollowingResult, MIN_DAILY_POINTS, MIN_MONTHLY_POINTS,
};
