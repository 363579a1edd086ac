//! 연월별 마지막 가격 인덱스.
//!
//! `(year, month)` 버킷마다 날짜순 마지막 포인트를 기록합니다.
//! 최상위 계산마다 한 번 만들어 하위 계산에 넘겨주며, 반복문 안에서 다시 만들지 않습니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ticker_core::{DailyPoint, YearMonth};

/// 월말(해당 월 마지막 거래일) 가격.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthEnd {
    /// 해당 월의 마지막 거래일
    pub date: NaiveDate,
    /// 그 날의 종가
    pub price: f64,
}

/// 연월 → 월말 가격 인덱스.
#[derive(Debug, Clone, Default)]
pub struct MonthEndIndex {
    buckets: BTreeMap<YearMonth, MonthEnd>,
}

impl MonthEndIndex {
    /// 날짜 오름차순 시계열에서 인덱스를 만듭니다.
    pub fn build(series: &[DailyPoint]) -> Self {
        let mut buckets = BTreeMap::new();
        for point in series {
            // 오름차순이므로 나중 포인트가 덮어씀
            buckets.insert(
                YearMonth::from_date(point.date),
                MonthEnd {
                    date: point.date,
                    price: point.close,
                },
            );
        }
        Self { buckets }
    }

    /// 해당 월의 월말 가격
    pub fn get(&self, key: YearMonth) -> Option<MonthEnd> {
        self.buckets.get(&key).copied()
    }

    /// 해당 연도에서 가장 늦은 월의 월말 가격 (12월부터 1월 방향으로 탐색).
    pub fn last_in_year(&self, year: i32) -> Option<MonthEnd> {
        (1..=12)
            .rev()
            .find_map(|month| self.get(YearMonth::new(year, month)))
    }

    /// 월별 샘플 (시간순)
    pub fn samples(&self) -> Vec<MonthEnd> {
        self.buckets.values().copied().collect()
    }

    /// 버킷 수
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
