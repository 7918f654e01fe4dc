//! # sumgim-core
//!
//! SUMGIM 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 텔레메트리 집계/업로드 파이프라인의 모든 crate가 공유하는
//! 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 도메인/와이어 데이터 구조체 (serde / prost)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스
//! - [`registry`] — 지표/리포트 레지스트리 (읽기 전용 도메인 모델)
//! - [`oplog`] — 운영 카운터 (한도 초과, 업로드 성공/실패)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 리포터 설정 구조체

pub mod config;
pub mod error;
pub mod models;
pub mod oplog;
pub mod ports;
pub mod registry;
