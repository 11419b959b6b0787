use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

pub mod settings;

/// 진단 대상 설정
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// 테이블 존재 확인에 사용할 스키마
    pub schema: String,
    /// 존재 여부를 확인할 테이블 목록
    pub tables: Vec<String>,
    /// 존재 여부를 확인할 구체화 뷰
    pub materialized_view: String,
    /// 파티션 목록을 조회할 부모 테이블
    pub partition_parents: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            tables: vec![
                "sequences".to_string(),
                "model_predictions".to_string(),
                "model_performance".to_string(),
            ],
            materialized_view: "recent_model_performance".to_string(),
            partition_parents: vec![
                "sequences".to_string(),
                "model_predictions".to_string(),
            ],
        }
    }
}

impl CheckConfig {
    /// 설정 파일에서 CheckConfig 로드 (누락된 항목은 기본값)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}
