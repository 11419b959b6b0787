use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use log::trace;

use super::session::Session;
use crate::constants::catalog;
use crate::error::{query_err, Result};

/// 파티션(자식 테이블) 정보
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionEntry {
    pub parent: String,
    pub child: String,
}

/// 진단에 필요한 카탈로그 조회 인터페이스
#[async_trait]
pub trait Catalog {
    /// 서버 현재 시각 (세션 시간대 오프셋 적용)
    async fn server_time(&self) -> Result<DateTime<FixedOffset>>;

    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool>;

    async fn materialized_view_exists(&self, name: &str) -> Result<bool>;

    /// 부모 테이블 순서대로, 부모 내에서는 자식 이름순으로 반환
    async fn partitions(&self, parents: &[String]) -> Result<Vec<PartitionEntry>>;
}

/// 조회가 끝나면 닫아야 하는 카탈로그 세션
#[async_trait]
pub trait CatalogSession: Catalog + Send + Sync {
    async fn close(self);
}

#[async_trait]
impl Catalog for Session {
    async fn server_time(&self) -> Result<DateTime<FixedOffset>> {
        trace!("쿼리 실행: {}", catalog::SELECT_NOW);
        let row = self
            .client
            .query_one(catalog::SELECT_NOW, &[])
            .await
            .map_err(query_err("liveness"))?;
        let now: DateTime<Utc> = row.try_get(0).map_err(query_err("liveness"))?;
        let offset_seconds: i32 = row.try_get(1).map_err(query_err("liveness"))?;

        // 범위를 벗어난 오프셋은 UTC로 표시
        Ok(match FixedOffset::east_opt(offset_seconds) {
            Some(offset) => now.with_timezone(&offset),
            None => now.fixed_offset(),
        })
    }

    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool> {
        trace!("테이블 존재 확인: {}.{}", schema, table);
        let row = self
            .client
            .query_one(catalog::TABLE_EXISTS, &[&schema, &table])
            .await
            .map_err(query_err("table existence"))?;
        row.try_get(0).map_err(query_err("table existence"))
    }

    async fn materialized_view_exists(&self, name: &str) -> Result<bool> {
        trace!("구체화 뷰 존재 확인: {}", name);
        let row = self
            .client
            .query_one(catalog::MATVIEW_EXISTS, &[&name])
            .await
            .map_err(query_err("materialized view existence"))?;
        row.try_get(0).map_err(query_err("materialized view existence"))
    }

    async fn partitions(&self, parents: &[String]) -> Result<Vec<PartitionEntry>> {
        trace!("파티션 목록 조회: {:?}", parents);
        let rows = self
            .client
            .query(catalog::LIST_PARTITIONS, &[&parents])
            .await
            .map_err(query_err("partition listing"))?;

        let mut partitions = Vec::with_capacity(rows.len());
        for row in rows {
            partitions.push(PartitionEntry {
                parent: row.try_get(0).map_err(query_err("partition listing"))?,
                child: row.try_get(1).map_err(query_err("partition listing"))?,
            });
        }

        Ok(partitions)
    }
}
