//! 일별 시세 데이터 구조체.
//!
//! 수집 계층이 종목마다 한 번 만들어 넘겨주는 불변 시계열입니다.
//! 시계열은 날짜 오름차순, 중복 없음, 모든 종가 > 0 을 만족해야 합니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{TickerError, TickerResult};
use crate::types::DateRange;

/// 하루치 OHLCV 데이터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// 거래일 (ISO `YYYY-MM-DD`로 직렬화)
    pub date: NaiveDate,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가 (항상 양수)
    pub close: f64,
    /// 거래량
    pub volume: f64,
}

impl DailyPoint {
    /// 새 일별 포인트를 생성합니다.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 일부 필드가 비어 있는 원시 행에서 포인트를 생성합니다.
    ///
    /// 시가/고가/저가가 없으면 종가로, 거래량이 없으면 0으로 채웁니다.
    pub fn from_partial(
        date: NaiveDate,
        close: f64,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        volume: Option<f64>,
    ) -> Self {
        Self {
            date,
            open: open.unwrap_or(close),
            high: high.unwrap_or(close),
            low: low.unwrap_or(close),
            close,
            volume: volume.unwrap_or(0.0),
        }
    }

    /// 종가만 있는 포인트 (테스트/합성 데이터용)
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self::from_partial(date, close, None, None, None, None)
    }
}

/// 종목 심볼과 그 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    /// 종목 심볼 (예: "SPY", "005930")
    pub ticker: String,
    /// 날짜 오름차순 일별 데이터
    pub data: Vec<DailyPoint>,
}

impl NamedSeries {
    /// 새 종목 시계열을 생성합니다.
    pub fn new(ticker: impl Into<String>, data: Vec<DailyPoint>) -> Self {
        Self {
            ticker: ticker.into(),
            data,
        }
    }

    /// 데이터 포인트 수
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 데이터가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 첫 거래일
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.data.first().map(|p| p.date)
    }

    /// 마지막 거래일
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.data.last().map(|p| p.date)
    }

    /// 전체 기간
    pub fn date_range(&self) -> Option<DateRange> {
        Some(DateRange::new(self.first_date()?, self.last_date()?))
    }

    /// 시계열 불변 조건을 검증합니다.
    pub fn validate(&self) -> TickerResult<()> {
        validate_series(&self.data)
            .map_err(|e| TickerError::InvalidInput(format!("{}: {}", self.ticker, e)))
    }
}

/// 시계열이 분석 엔진의 전제 조건을 만족하는지 검증합니다.
///
/// - 날짜가 엄격히 오름차순 (중복 없음)
/// - 종가가 유한한 양수
/// - 거래량이 음수가 아님
///
/// 빈 시계열은 유효합니다. 최소 길이는 각 계산이 따로 요구합니다.
pub fn validate_series(series: &[DailyPoint]) -> TickerResult<()> {
    for (i, point) in series.iter().enumerate() {
        if !point.close.is_finite() || point.close <= 0.0 {
            return Err(TickerError::InvalidInput(format!(
                "{} 종가가 양수가 아님: {}",
                point.date, point.close
            )));
        }
        if point.volume < 0.0 {
            return Err(TickerError::InvalidInput(format!(
                "{} 거래량이 음수: {}",
                point.date, point.volume
            )));
        }
        if i > 0 && series[i - 1].date >= point.date {
            return Err(TickerError::InvalidInput(format!(
                "날짜 순서 위반: {} 다음 {}",
                series[i - 1].date,
                point.date
            )));
        }
    }
    Ok(())
}
