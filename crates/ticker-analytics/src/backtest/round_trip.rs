//! 매도→매수 왕복(round trip) 집계.
//!
//! 매도 전환 후 다음 매수 전환까지를 하나의 왕복으로 봅니다. 재진입 가격이
//! 이탈 가격보다 낮으면 성공(하락 전에 빠져나와 더 싸게 다시 들어감)입니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::signal::TrendSignal;
use super::trend_following::SignalTransition;

/// 한 번의 매도→매수 왕복.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    /// 매도 전환일
    pub sell_date: NaiveDate,
    /// 매도 전환일 종가
    pub sell_price: f64,
    /// 매수 전환일
    pub buy_date: NaiveDate,
    /// 매수 전환일 종가
    pub buy_price: f64,
    /// 매수 가격 < 매도 가격
    pub successful: bool,
}

impl RoundTrip {
    /// 매도 대비 재진입 가격 변화 (%). 음수일수록 유리한 재진입
    pub fn reentry_change_pct(&self) -> f64 {
        (self.buy_price / self.sell_price - 1.0) * 100.0
    }
}

/// 왕복 집계.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundTripSummary {
    /// 완료된 왕복 (시간순)
    pub round_trips: Vec<RoundTrip>,
    /// 성공한 왕복 수
    pub successful: usize,
    /// 전체 왕복 수
    pub total: usize,
    /// 성공률 (0.0 ~ 1.0). 왕복이 없으면 None
    pub success_rate: Option<f64>,
}

impl RoundTripSummary {
    /// 신호 전환 목록에서 왕복을 짝지어 집계합니다.
    ///
    /// 짝이 되는 매수가 아직 없는 마지막 매도는 포함하지 않습니다.
    pub fn from_transitions(transitions: &[SignalTransition]) -> Self {
        let mut round_trips = Vec::new();
        let mut pending_sell: Option<&SignalTransition> = None;

        for transition in transitions {
            match transition.signal {
                TrendSignal::Sell => {
                    if pending_sell.is_none() {
                        pending_sell = Some(transition);
                    }
                }
                TrendSignal::Buy => {
                    if let Some(sell) = pending_sell.take() {
                        round_trips.push(RoundTrip {
                            sell_date: sell.date,
                            sell_price: sell.price,
                            buy_date: transition.date,
                            buy_price: transition.price,
                            successful: transition.price < sell.price,
                        });
                    }
                }
            }
        }

        let total = round_trips.len();
        let successful = round_trips.iter().filter(|r| r.successful).count();
        let success_rate = (total > 0).then(|| successful as f64 / total as f64);

        Self {
            round_trips,
            successful,
            total,
            success_rate,
        }
    }

    /// 성공률 (%). 왕복이 없으면 None
    pub fn success_rate_pct(&self) -> Option<f64> {
        self.success_rate.map(|r| r * 100.0)
    }
}
