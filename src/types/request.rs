use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 默认使用的模型
pub const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";

/// 报告深度
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportDepth {
    /// 只持久化研究结果
    #[default]
    Summary,
    /// 额外输出文档与融资时间线图表
    Detailed,
}

impl Display for ReportDepth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportDepth::Summary => write!(f, "summary"),
            ReportDepth::Detailed => write!(f, "detailed"),
        }
    }
}

impl std::str::FromStr for ReportDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(ReportDepth::Summary),
            "detailed" => Ok(ReportDepth::Detailed),
            _ => Err(format!("Unknown report depth: {}", s)),
        }
    }
}

/// 一次公司研究请求，运行期间不可变
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ResearchRequest {
    /// 目标公司名称
    #[serde(default)]
    pub company_name: String,

    /// 底层语言模型标识
    #[serde(default = "default_model_name", alias = "modelName")]
    pub model_name: String,

    /// 报告深度
    #[serde(default)]
    pub report_depth: ReportDepth,
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

impl ResearchRequest {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            model_name: default_model_name(),
            report_depth: ReportDepth::default(),
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_depth(mut self, report_depth: ReportDepth) -> Self {
        self.report_depth = report_depth;
        self
    }

    /// 从调用输入（JSON）解析请求并校验
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let request: ResearchRequest = serde_json::from_str(input)
            .map_err(|e| ConfigError::InvalidInput(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// 公司名称不能为空，模型名为空时视为非法输入
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.company_name.trim().is_empty() {
            return Err(ConfigError::MissingInput("company_name"));
        }
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::InvalidInput(
                "model_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_applies_defaults() {
        let request = ResearchRequest::from_json(r#"{"company_name": "Acme Corp"}"#).unwrap();

        assert_eq!(request.company_name, "Acme Corp");
        assert_eq!(request.model_name, "gpt-4o-mini");
        assert_eq!(request.report_depth, ReportDepth::Summary);
    }

    #[test]
    fn test_from_json_accepts_camel_case_model() {
        let request = ResearchRequest::from_json(
            r#"{"company_name": "Acme Corp", "modelName": "gpt-4o", "report_depth": "detailed"}"#,
        )
        .unwrap();

        assert_eq!(request.model_name, "gpt-4o");
        assert_eq!(request.report_depth, ReportDepth::Detailed);
    }

    #[test]
    fn test_missing_company_name_is_rejected() {
        let err = ResearchRequest::from_json(r#"{"report_depth": "summary"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingInput("company_name")));

        let err = ResearchRequest::from_json(r#"{"company_name": "   "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingInput("company_name")));
    }

    #[test]
    fn test_unknown_depth_is_rejected() {
        let err = ResearchRequest::from_json(r#"{"company_name": "Acme", "report_depth": "deep"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInput(_)));
    }

    #[test]
    fn test_report_depth_from_str() {
        assert_eq!("summary".parse::<ReportDepth>().unwrap(), ReportDepth::Summary);
        assert_eq!("DETAILED".parse::<ReportDepth>().unwrap(), ReportDepth::Detailed);
        assert!("full".parse::<ReportDepth>().is_err());
        assert_eq!(ReportDepth::Detailed.to_string(), "detailed");
    }
}
