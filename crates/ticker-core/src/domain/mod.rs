//! 도메인 모델.
//!
//! - [`series`]: 일별 시세 포인트와 종목별 시계열

pub mod series;

pub use series::*;
