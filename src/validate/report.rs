use chrono::{DateTime, FixedOffset};

use crate::db::catalog::PartitionEntry;
use crate::error::CheckError;

/// 테이블 존재 확인 결과
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCheck {
    pub name: String,
    pub exists: bool,
}

/// 구체화 뷰 존재 확인 결과
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewCheck {
    pub name: String,
    pub exists: bool,
}

/// 진단 결과
///
/// 단계별로 채워지며, 중간에 실패하면 완료된 단계까지만 값이 있다.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    pub server_time: Option<DateTime<FixedOffset>>,
    pub tables: Vec<TableCheck>,
    pub materialized_view: Option<ViewCheck>,
    pub partitions: Option<Vec<PartitionEntry>>,
}

impl ValidationReport {
    /// 출력용 텍스트 줄 생성
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(time) = &self.server_time {
            lines.push(format!(
                "Database connection successful. Current time: {}",
                format_timestamp(time)
            ));
        }

        for table in &self.tables {
            lines.push(format!(
                "Table '{}' exists: {}",
                table.name,
                format_bool(table.exists)
            ));
        }

        if let Some(view) = &self.materialized_view {
            lines.push(format!(
                "Materialized view '{}' exists: {}",
                view.name,
                format_bool(view.exists)
            ));
        }

        if let Some(partitions) = &self.partitions {
            lines.push("Partitioned tables:".to_string());
            for partition in partitions {
                lines.push(format!("  - {}", partition.child));
            }
        }

        lines
    }
}

/// 진단 결과와 실패 원인
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub report: ValidationReport,
    pub error: Option<CheckError>,
}

impl ValidationOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// 완료된 단계의 결과 뒤에 오류 줄을 붙여 반환
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.report.lines();
        if let Some(error) = &self.error {
            lines.push(format!("Error validating database: {}", error));
        }
        lines
    }
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// 세션 시간대 오프셋을 포함한 마이크로초 단위 시각
fn format_timestamp(time: &DateTime<FixedOffset>) -> String {
    time.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
}
