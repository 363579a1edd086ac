//! 월간 SMA-10 신호.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metrics::mean;
use crate::month_index::MonthEndIndex;

/// 이동평균 기간 (월)
pub const SMA_PERIOD_MONTHS: usize = 10;

/// 추세 신호
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendSignal {
    /// 월말 종가가 SMA-10 위: 보유
    Buy,
    /// 그 외: 현금
    Sell,
}

impl TrendSignal {
    /// 월말 종가와 이동평균 비교
    pub fn from_close(price: f64, sma: f64) -> Self {
        if price > sma {
            Self::Buy
        } else {
            Self::Sell
        }
    }
}

impl fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// 월말 신호 포인트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySignalPoint {
    /// 월의 마지막 거래일
    pub date: NaiveDate,
    /// 그 날의 종가
    pub price: f64,
    /// 직전 10개 월말 종가(자신 포함)의 단순 평균. 처음 9개월은 None
    pub sma10: Option<f64>,
    /// 신호. 처음 9개월은 None
    pub signal: Option<TrendSignal>,
}

/// 월말 인덱스에서 월간 신호를 생성합니다.
pub fn monthly_signals(index: &MonthEndIndex) -> Vec<MonthlySignalPoint> {
    let samples = index.samples();
    let prices: Vec<f64> = samples.iter().map(|s| s.price).collect();

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let sma10 = (i + 1 >= SMA_PERIOD_MONTHS)
                .then(|| mean(&prices[i + 1 - SMA_PERIOD_MONTHS..=i]));
            MonthlySignalPoint {
                date: sample.date,
                price: sample.price,
                sma10,
                signal: sma10.map(|sma| TrendSignal::from_close(sample.price, sma)),
            }
        })
        .collect()
}
