// SQL 쿼리 모듈
pub mod catalog;
