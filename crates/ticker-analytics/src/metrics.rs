//! 공통 수익률/위험 계산 함수.
//!
//! 요약 통계, 연간 테이블, 전략 통계가 같은 공식을 공유합니다.

use ticker_core::TRADING_DAYS_PER_YEAR;

/// 인접 값 사이의 단순 수익률 `(v[i] - v[i-1]) / v[i-1]`.
pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// 산술 평균. 비어 있으면 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 표본 표준편차 (n-1로 나눔).
///
/// 표본이 2개 미만이면 `None`.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// 일간 수익률의 연율화 변동성 (비율, 0.2 = 20%).
///
/// 수익률이 2개 미만이면 `None`.
pub fn annualized_volatility(daily_returns: &[f64]) -> Option<f64> {
    sample_std_dev(daily_returns).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt())
}

/// 연복리 수익률 (%).
///
/// CAGR = ((최종 / 초기) ^ (1 / 년수) - 1) × 100
///
/// 경과 연수가 0 이하이면 0입니다.
pub fn cagr_pct(start_value: f64, end_value: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    ((end_value / start_value).powf(1.0 / years) - 1.0) * 100.0
}

/// 단순 수익률 (%).
pub fn return_pct(start_value: f64, end_value: f64) -> f64 {
    (end_value / start_value - 1.0) * 100.0
}
