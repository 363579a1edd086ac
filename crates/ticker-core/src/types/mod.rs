//! 공통 타입 모듈.

pub mod calendar;

pub use calendar::*;
