//! 다중 종목 비교 차트 정규화.
//!
//! 여러 종목을 같은 시작일에 맞춰 비교할 수 있도록 정렬합니다.
//!
//! - 공통 시작일: 모든 종목에 데이터가 있는 가장 이른 날짜
//! - 종목이 1개: 원래 종가를 그대로 사용
//! - 종목이 2개 이상: 공통 시작일 종가를 100으로 재기준화
//!
//! 결과 행은 모든 종목 날짜의 합집합이며, 데이터가 없는 칸은 보간하지 않고 비워 둡니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use ticker_core::NamedSeries;
use tracing::{debug, warn};

/// 재기준화 시 시작일 값
pub const REBASE_VALUE: f64 = 100.0;

/// 차트의 한 행 (날짜 하나).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    /// 날짜
    pub date: NaiveDate,
    /// `tickers`와 같은 순서의 값. 해당 날짜에 데이터가 없으면 None
    pub values: Vec<Option<f64>>,
}

/// 정규화된 비교 차트 데이터.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedChart {
    /// 종목 순서
    pub tickers: Vec<String>,
    /// 공통 시작일 (데이터가 없으면 None)
    pub base_date: Option<NaiveDate>,
    /// 100 기준 재기준화 여부 (종목 2개 이상)
    pub rebased: bool,
    /// 공통 시작일 이후 날짜별 행
    pub rows: Vec<ChartRow>,
}

impl NormalizedChart {
    /// 특정 종목의 열을 `(날짜, 값)` 목록으로 반환합니다.
    pub fn column(&self, ticker: &str) -> Option<Vec<(NaiveDate, Option<f64>)>> {
        let idx = self.tickers.iter().position(|t| t == ticker)?;
        Some(self.rows.iter().map(|r| (r.date, r.values[idx])).collect())
    }
}

/// 여러 종목을 공통 시작일 기준으로 정렬/정규화합니다.
pub fn normalize_for_chart(series: &[NamedSeries]) -> NormalizedChart {
    let tickers: Vec<String> = series.iter().map(|s| s.ticker.clone()).collect();

    let by_date: Vec<BTreeMap<NaiveDate, f64>> = series
        .iter()
        .map(|s| s.data.iter().map(|p| (p.date, p.close)).collect())
        .collect();

    let all_dates: BTreeSet<NaiveDate> = by_date
        .iter()
        .flat_map(|m| m.keys().copied())
        .collect();

    if all_dates.is_empty() {
        return NormalizedChart {
            tickers,
            ..Default::default()
        };
    }

    // 오름차순으로 훑어 모든 종목이 데이터를 가진 첫 날짜를 찾음
    let common = all_dates
        .iter()
        .copied()
        .find(|date| by_date.iter().all(|m| m.contains_key(date)));

    let base_date = match common {
        Some(date) => date,
        None => {
            let Some(fallback) = series
                .first()
                .and_then(|s| s.first_date())
                .or_else(|| all_dates.first().copied())
            else {
                return NormalizedChart {
                    tickers,
                    ..Default::default()
                };
            };
            warn!(
                tickers = ?tickers,
                fallback = %fallback,
                "no common start date across all series, falling back to first series"
            );
            fallback
        }
    };

    let rebased = series.len() >= 2;

    // 각 종목의 기준 종가: 기준일 이후 첫 데이터
    let base_closes: Vec<Option<f64>> = by_date
        .iter()
        .map(|m| m.range(base_date..).next().map(|(_, close)| *close))
        .collect();

    let rows: Vec<ChartRow> = all_dates
        .range(base_date..)
        .filter_map(|date| {
            let values: Vec<Option<f64>> = by_date
                .iter()
                .zip(&base_closes)
                .map(|(m, base)| {
                    let close = *m.get(date)?;
                    if rebased {
                        base.map(|b| close / b * REBASE_VALUE)
                    } else {
                        Some(close)
                    }
                })
                .collect();

            values
                .iter()
                .any(Option::is_some)
                .then(|| ChartRow {
                    date: *date,
                    values,
                })
        })
        .collect();

    debug!(
        series = series.len(),
        base_date = %base_date,
        rows = rows.len(),
        "normalized comparison chart"
    );

    NormalizedChart {
        tickers,
        base_date: Some(base_date),
        rebased,
        rows,
    }
}
