// 데이터베이스 진단 모듈
// 연결 후 카탈로그를 순서대로 조회하고 결과를 기록합니다.

use std::time::Instant;

use log::{debug, error, info};

use crate::config::settings::Settings;
use crate::config::CheckConfig;
use crate::db::catalog::{Catalog, CatalogSession};
use crate::db::session::Session;
use crate::error::Result;

pub mod report;

pub use report::{TableCheck, ValidationOutcome, ValidationReport, ViewCheck};

/// 카탈로그 진단 실행기
pub struct Validator<'a> {
    checks: &'a CheckConfig,
}

impl<'a> Validator<'a> {
    pub fn new(checks: &'a CheckConfig) -> Self {
        Self { checks }
    }

    /// 모든 검사를 순서대로 실행
    ///
    /// 실패한 단계 이후의 검사는 실행하지 않으며, 그 전까지의 결과는 `report`에 남는다.
    pub async fn run_checks<C>(&self, catalog: &C, report: &mut ValidationReport) -> Result<()>
    where
        C: Catalog + Sync + ?Sized,
    {
        report.server_time = Some(catalog.server_time().await?);

        for table in &self.checks.tables {
            let exists = catalog.table_exists(&self.checks.schema, table).await?;
            debug!("테이블 {}.{} 존재 여부: {}", self.checks.schema, table, exists);
            report.tables.push(TableCheck {
                name: table.clone(),
                exists,
            });
        }

        let view = &self.checks.materialized_view;
        let exists = catalog.materialized_view_exists(view).await?;
        report.materialized_view = Some(ViewCheck {
            name: view.clone(),
            exists,
        });

        let partitions = catalog.partitions(&self.checks.partition_parents).await?;
        debug!("파티션 {} 개 조회됨", partitions.len());
        for partition in &partitions {
            debug!("  {} -> {}", partition.parent, partition.child);
        }
        report.partitions = Some(partitions);

        Ok(())
    }

    /// 카탈로그에 대해 검사를 실행하고 결과와 오류를 함께 반환
    pub async fn validate<C>(&self, catalog: &C) -> ValidationOutcome
    where
        C: Catalog + Sync + ?Sized,
    {
        let mut report = ValidationReport::default();
        let error = self.run_checks(catalog, &mut report).await.err();
        ValidationOutcome { report, error }
    }

    /// 세션에 대해 검사를 실행한 뒤, 결과와 관계없이 세션을 닫음
    pub async fn validate_and_close<S>(&self, session: S) -> ValidationOutcome
    where
        S: CatalogSession,
    {
        let outcome = self.validate(&session).await;
        session.close().await;
        outcome
    }
}

/// 데이터베이스에 연결하여 진단 실행
///
/// 연결에 성공한 경우에만 세션이 존재하며, 세션은 성공/실패와 관계없이 닫힌다.
pub async fn validate_database(settings: &Settings) -> ValidationOutcome {
    let started = Instant::now();

    let session = match Session::connect(&settings.database).await {
        Ok(session) => session,
        Err(e) => {
            return ValidationOutcome {
                report: ValidationReport::default(),
                error: Some(e),
            }
        }
    };

    let outcome = Validator::new(&settings.checks)
        .validate_and_close(session)
        .await;

    match &outcome.error {
        None => info!(
            "데이터베이스 진단 완료 ({})",
            humantime::format_duration(started.elapsed())
        ),
        Some(e) => error!("데이터베이스 진단 실패: {}", e),
    }

    outcome
}
