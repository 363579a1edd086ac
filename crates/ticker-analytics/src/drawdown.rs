//! 고점 추적 낙폭(Drawdown) 계산.
//!
//! [`PeakTracker`]는 순서가 있는 값 시퀀스를 한 번 훑으면서 고점, 최대 낙폭,
//! 낙폭 구간(episode)의 달력일 길이를 기록합니다. 전체 이력, 연도별 구간,
//! 전략 자산 곡선이 모두 이 하나의 스캔을 다른 입력 구간으로 재사용합니다.
//!
//! # 계산 공식
//!
//! 낙폭 = (고점 - 현재값) / 고점
//!
//! 예: 100 → 150(고점) → 90 이면 최대 낙폭 = (150 - 90) / 150 = 40%

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ticker_core::{days_between, DailyPoint, DateRange};

/// 단일 패스 고점 추적기.
#[derive(Debug, Clone)]
pub struct PeakTracker {
    /// 현재까지의 고점 값
    peak: f64,
    /// 고점 날짜 (진행 중인 낙폭 구간의 시작점)
    peak_date: NaiveDate,
    /// 진행 중인 낙폭 구간의 시작일 (고점 아래에 있을 때만 Some)
    episode_start: Option<NaiveDate>,
    /// 최대 낙폭 (비율, 0 이상)
    max_drawdown: f64,
    /// 최대 낙폭 발생일
    max_drawdown_date: Option<NaiveDate>,
    /// 가장 긴 낙폭 구간 (달력일)
    longest_drawdown_days: i64,
    /// 마지막 관측일
    last_date: NaiveDate,
    /// 마지막 관측 시점의 낙폭 (비율)
    last_drawdown: f64,
}

/// 스캔 종료 후의 낙폭 요약.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakSummary {
    /// 최종 고점
    pub peak: f64,
    /// 최종 고점 날짜
    pub peak_date: NaiveDate,
    /// 최대 낙폭 (%, 0 이상)
    pub max_drawdown_pct: f64,
    /// 최대 낙폭 발생일 (낙폭이 한 번도 없었으면 None)
    pub max_drawdown_date: Option<NaiveDate>,
    /// 현재 낙폭: 마지막 값이 최종 고점보다 얼마나 아래인지 (%, 0 이상)
    pub current_drawdown_pct: f64,
    /// 가장 긴 낙폭 구간 (달력일, 끝나지 않은 구간 포함)
    pub longest_drawdown_days: i64,
}

impl PeakTracker {
    /// 첫 값으로 추적기를 시작합니다.
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            peak: value,
            peak_date: date,
            episode_start: None,
            max_drawdown: 0.0,
            max_drawdown_date: None,
            longest_drawdown_days: 0,
            last_date: date,
            last_drawdown: 0.0,
        }
    }

    /// 값을 하나 관측하고 그 시점의 낙폭(비율, 0 이상)을 반환합니다.
    ///
    /// 고점을 넘어서면(신고가) 진행 중이던 낙폭 구간을 닫고 길이를 기록합니다.
    /// 고점과 정확히 같은 값은 낙폭 0이지만 구간을 닫지 않습니다.
    pub fn observe(&mut self, date: NaiveDate, value: f64) -> f64 {
        self.last_date = date;

        if value > self.peak {
            if let Some(start) = self.episode_start.take() {
                self.record_episode(start, date);
            }
            self.peak = value;
            self.peak_date = date;
            self.last_drawdown = 0.0;
            return 0.0;
        }

        if value == self.peak {
            self.last_drawdown = 0.0;
            return 0.0;
        }

        if self.episode_start.is_none() {
            self.episode_start = Some(self.peak_date);
        }

        let drawdown = (self.peak - value) / self.peak;
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
            self.max_drawdown_date = Some(date);
        }
        self.last_drawdown = drawdown;
        drawdown
    }

    fn record_episode(&mut self, start: NaiveDate, end: NaiveDate) {
        let days = days_between(start, end);
        if days > self.longest_drawdown_days {
            self.longest_drawdown_days = days;
        }
    }

    /// 스캔을 마치고 요약을 반환합니다.
    ///
    /// 끝나지 않은 낙폭 구간도 마지막 관측일까지의 길이로 최장 기록과 비교합니다.
    pub fn finish(mut self) -> PeakSummary {
        if let Some(start) = self.episode_start.take() {
            let last = self.last_date;
            self.record_episode(start, last);
        }

        PeakSummary {
            peak: self.peak,
            peak_date: self.peak_date,
            max_drawdown_pct: self.max_drawdown * 100.0,
            max_drawdown_date: self.max_drawdown_date,
            current_drawdown_pct: self.last_drawdown * 100.0,
            longest_drawdown_days: self.longest_drawdown_days,
        }
    }

    /// `(날짜, 값)` 시퀀스 전체를 스캔합니다. 비어 있으면 `None`.
    pub fn scan<I>(values: I) -> Option<PeakSummary>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut iter = values.into_iter();
        let (first_date, first_value) = iter.next()?;
        let mut tracker = Self::new(first_date, first_value);
        for (date, value) in iter {
            tracker.observe(date, value);
        }
        Some(tracker.finish())
    }
}

/// 낙폭 차트 포인트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// 날짜
    pub date: NaiveDate,
    /// 낙폭 (%, 0 이하. 고점에서 정확히 0)
    pub drawdown: f64,
}

/// 낙폭 시계열과 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownSeries {
    /// 입력 포인트마다 하나씩
    pub points: Vec<DrawdownPoint>,
    /// 가장 깊은 낙폭 값 (%, 0 이하)
    pub max_drawdown: f64,
    /// 가장 깊은 낙폭이 처음 나타난 날짜
    pub max_drawdown_date: Option<NaiveDate>,
    /// 현재 낙폭 (%, 마지막 낙폭 값의 부호 반전, 0 이상)
    pub current_drawdown: f64,
}

impl DrawdownSeries {
    /// 낙폭 포인트 목록에서 요약을 계산합니다.
    fn from_points(points: Vec<DrawdownPoint>) -> Self {
        let mut max_drawdown = 0.0;
        let mut max_drawdown_date = None;

        for point in &points {
            // 동률이면 먼저 나온 날짜 유지
            if max_drawdown_date.is_none() || point.drawdown < max_drawdown {
                max_drawdown = point.drawdown;
                max_drawdown_date = Some(point.date);
            }
        }

        let current_drawdown = points.last().map(|p| -p.drawdown).unwrap_or(0.0);

        Self {
            points,
            max_drawdown,
            max_drawdown_date,
            current_drawdown: if current_drawdown == 0.0 { 0.0 } else { current_drawdown },
        }
    }

    /// `(날짜, 값)` 시퀀스의 낙폭 시계열을 생성합니다.
    ///
    /// 고점은 첫 값에서 시작합니다.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut tracker: Option<PeakTracker> = None;
        let points = values
            .into_iter()
            .map(|(date, value)| {
                let t = tracker.get_or_insert_with(|| PeakTracker::new(date, value));
                let dd = t.observe(date, value);
                DrawdownPoint {
                    date,
                    drawdown: if dd > 0.0 { -dd * 100.0 } else { 0.0 },
                }
            })
            .collect();

        Self::from_points(points)
    }

    /// 구간 안의 포인트만 남기고 요약을 다시 계산합니다.
    ///
    /// 고점은 전체 이력 기준 그대로이므로, 구간 시작 전 고점의 영향이 유지됩니다.
    pub fn within(&self, range: DateRange) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| range.contains(p.date))
            .copied()
            .collect();
        Self::from_points(points)
    }

    /// 포인트 수
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 일별 종가의 낙폭 시계열.
pub fn drawdown_series(series: &[DailyPoint]) -> DrawdownSeries {
    DrawdownSeries::from_values(series.iter().map(|p| (p.date, p.close)))
}
