//! 월별/연간 수익률 테이블.
//!
//! 모든 포인트를 `(연, 월)` 버킷으로 나누고 각 버킷의 마지막 종가를 대표 가격으로 씁니다.
//!
//! - 월 수익률: 해당 월 말 / 전월 말 - 1 (1월은 전년도 12월과 비교)
//! - 연 수익률: 해당 연도 마지막 월말 / 전년도 12월 말 - 1.
//!   전년도 12월이 없으면 (보통 데이터 첫 해) 그 해 첫 포인트 대비 마지막 포인트
//! - 연 변동성/최대 낙폭: 그 해 포인트만으로 계산 (연도 경계에서 초기화)
//! - 신고가 횟수: 전체 이력에서 새 최고 종가가 나온 날 중 그 해에 속한 날의 수
//!
//! 모든 수익률 값에는 계산에 쓰인 시작/끝 가격을 담은 [`ReturnDetail`]이 붙습니다.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ticker_core::{DailyPoint, TickerError, TickerResult, YearMonth};
use tracing::debug;

use crate::drawdown::PeakTracker;
use crate::metrics::{annualized_volatility, return_pct, simple_returns};
use crate::month_index::{MonthEnd, MonthEndIndex};

/// 테이블 생성에 필요한 최소 포인트 수
pub const MIN_POINTS_FOR_TABLE: usize = 2;

/// 수익률 계산에 실제로 쓰인 시작/끝 가격 (툴팁용).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnDetail {
    /// 시작일
    pub start_date: NaiveDate,
    /// 시작 가격
    pub start_price: f64,
    /// 종료일
    pub end_date: NaiveDate,
    /// 종료 가격
    pub end_price: f64,
}

/// 수익률과 그 근거.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturn {
    /// 수익률 (%)
    pub return_pct: f64,
    /// 계산 근거
    pub detail: ReturnDetail,
}

impl PeriodReturn {
    /// 두 가격 사이의 수익률을 근거와 함께 만듭니다.
    pub fn between(start_date: NaiveDate, start_price: f64, end_date: NaiveDate, end_price: f64) -> Self {
        Self {
            return_pct: return_pct(start_price, end_price),
            detail: ReturnDetail {
                start_date,
                start_price,
                end_date,
                end_price,
            },
        }
    }

    fn from_month_ends(start: MonthEnd, end: MonthEnd) -> Self {
        Self::between(start.date, start.price, end.date, end.price)
    }
}

/// 한 해의 수익률 기록.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyReturnRecord {
    /// 연도
    pub year: i32,
    /// 1월부터 12월까지의 월 수익률
    pub months: [Option<PeriodReturn>; 12],
    /// 연 수익률
    pub annual: Option<PeriodReturn>,
    /// 연 변동성 (%, 그 해 일간 수익률이 2개 이상일 때)
    pub volatility_pct: Option<f64>,
    /// 연 최대 낙폭 (%, 0 이상. 그 해 포인트가 2개 이상일 때)
    pub max_drawdown_pct: Option<f64>,
    /// 그 해에 기록한 신고가 횟수
    pub new_highs: u32,
}

impl YearlyReturnRecord {
    /// 월 수익률 (1-12). 범위를 벗어나거나 값이 없으면 None.
    pub fn month(&self, month: u32) -> Option<&PeriodReturn> {
        let idx = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(idx)?.as_ref()
    }

    /// 월 수익률을 복리로 누적한 값 (%). 값이 있는 달만 사용합니다.
    pub fn compounded_monthly_pct(&self) -> Option<f64> {
        compound_pct(self.months.iter().flatten().map(|r| r.return_pct))
    }
}

/// 월별 수익률 목록 항목.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturnEntry {
    /// 연도
    pub year: i32,
    /// 월 (1-12)
    pub month: u32,
    /// 수익률 (%)
    pub return_pct: f64,
    /// 계산 근거
    pub detail: ReturnDetail,
}

/// 분기별 수익률 목록 항목.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyReturnEntry {
    /// 연도
    pub year: i32,
    /// 분기 (1-4)
    pub quarter: u32,
    /// 분기 내 월 수익률의 복리 누적 (%)
    pub return_pct: f64,
    /// 누적에 사용된 월 수
    pub months: usize,
}

/// 월별 × 연간 수익률 테이블.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnsTable {
    /// 연도 오름차순 기록
    pub years: Vec<YearlyReturnRecord>,
}

impl ReturnsTable {
    /// 시계열에서 테이블을 생성합니다.
    ///
    /// # 에러
    ///
    /// 포인트가 2개 미만이면 [`TickerError::InsufficientData`].
    pub fn build(series: &[DailyPoint]) -> TickerResult<Self> {
        if series.len() < MIN_POINTS_FOR_TABLE {
            return Err(TickerError::insufficient(MIN_POINTS_FOR_TABLE, series.len()));
        }

        let index = MonthEndIndex::build(series);
        let new_highs = count_new_highs(series);

        let years: Vec<YearlyReturnRecord> = split_by_year(series)
            .into_iter()
            .map(|(year, points)| {
                Self::build_year(
                    year,
                    points,
                    &index,
                    new_highs.get(&year).copied().unwrap_or(0),
                )
            })
            .collect();

        debug!(
            points = series.len(),
            years = years.len(),
            months = index.len(),
            "returns table built"
        );

        Ok(Self { years })
    }

    fn build_year(
        year: i32,
        points: &[DailyPoint],
        index: &MonthEndIndex,
        new_highs: u32,
    ) -> YearlyReturnRecord {
        let months: [Option<PeriodReturn>; 12] = std::array::from_fn(|i| {
            let key = YearMonth::new(year, i as u32 + 1);
            let end = index.get(key)?;
            let start = index.get(key.prev())?;
            Some(PeriodReturn::from_month_ends(start, end))
        });

        let annual = match (
            index.get(YearMonth::prior_december(year)),
            index.last_in_year(year),
        ) {
            (Some(base), Some(end)) => Some(PeriodReturn::from_month_ends(base, end)),
            // 전년도 12월이 없으면 그 해 안에서 첫 포인트 대비 마지막 포인트
            _ => match (points.first(), points.last()) {
                (Some(first), Some(last)) if points.len() >= 2 => Some(PeriodReturn::between(
                    first.date,
                    first.close,
                    last.date,
                    last.close,
                )),
                _ => None,
            },
        };

        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        let volatility_pct = annualized_volatility(&simple_returns(&closes)).map(|v| v * 100.0);

        let max_drawdown_pct = if points.len() >= 2 {
            PeakTracker::scan(points.iter().map(|p| (p.date, p.close))).map(|s| s.max_drawdown_pct)
        } else {
            None
        };

        YearlyReturnRecord {
            year,
            months,
            annual,
            volatility_pct,
            max_drawdown_pct,
            new_highs,
        }
    }

    /// 특정 연도의 기록
    pub fn year(&self, year: i32) -> Option<&YearlyReturnRecord> {
        self.years.iter().find(|r| r.year == year)
    }

    /// 값이 있는 월 수익률을 시간순으로 펼칩니다.
    pub fn monthly_returns(&self) -> Vec<MonthlyReturnEntry> {
        self.years
            .iter()
            .flat_map(|record| {
                record
                    .months
                    .iter()
                    .enumerate()
                    .filter_map(move |(i, cell)| {
                        cell.map(|r| MonthlyReturnEntry {
                            year: record.year,
                            month: i as u32 + 1,
                            return_pct: r.return_pct,
                            detail: r.detail,
                        })
                    })
            })
            .collect()
    }

    /// 분기 수익률: 분기 안에 있는 월 수익률의 복리 누적.
    ///
    /// 월 수익률이 하나도 없는 분기는 항목을 만들지 않습니다.
    pub fn quarterly_returns(&self) -> Vec<QuarterlyReturnEntry> {
        let mut result = Vec::new();

        for record in &self.years {
            for quarter in 1..=4u32 {
                let first_month = (quarter - 1) * 3 + 1;
                let monthly: Vec<f64> = (first_month..first_month + 3)
                    .filter_map(|m| record.month(m).map(|r| r.return_pct))
                    .collect();

                if let Some(return_pct) = compound_pct(monthly.iter().copied()) {
                    result.push(QuarterlyReturnEntry {
                        year: record.year,
                        quarter,
                        return_pct,
                        months: monthly.len(),
                    });
                }
            }
        }

        result
    }
}

/// 수익률(%)들을 복리로 누적합니다. 값이 없으면 None.
fn compound_pct<I: Iterator<Item = f64>>(returns: I) -> Option<f64> {
    let mut any = false;
    let growth = returns.fold(1.0, |acc, r| {
        any = true;
        acc * (1.0 + r / 100.0)
    });
    any.then(|| (growth - 1.0) * 100.0)
}

/// 날짜 오름차순 시계열을 연도별 연속 구간으로 나눕니다.
fn split_by_year(series: &[DailyPoint]) -> Vec<(i32, &[DailyPoint])> {
    let mut result = Vec::new();
    let mut start = 0;

    for i in 1..=series.len() {
        if i == series.len() || series[i].date.year() != series[start].date.year() {
            result.push((series[start].date.year(), &series[start..i]));
            start = i;
        }
    }

    result
}

/// 전체 이력을 시간순으로 훑어 새 최고 종가가 나온 횟수를 연도별로 셉니다.
///
/// 첫 포인트는 비교 대상이 없으므로 세지 않습니다.
fn count_new_highs(series: &[DailyPoint]) -> BTreeMap<i32, u32> {
    let mut counts = BTreeMap::new();
    let Some(first) = series.first() else {
        return counts;
    };

    let mut high = first.close;
    for point in &series[1..] {
        if point.close > high {
            high = point.close;
            *counts.entry(point.date.year()).or_insert(0) += 1;
        }
    }

    counts
}
