// 데이터베이스 접근 모듈
// 연결 설정, 세션 관리 및 카탈로그 조회를 담당합니다.

pub mod catalog;
pub mod config;
pub mod session;
