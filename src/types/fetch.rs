use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 数据来源
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Website,
    Linkedin,
    Crunchbase,
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Website => write!(f, "website"),
            Source::Linkedin => write!(f, "linkedin"),
            Source::Crunchbase => write!(f, "crunchbase"),
        }
    }
}

/// 单次抓取调用的结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub source: Source,
    pub payload: Map<String, Value>,
    pub error: Option<String>,
}

impl FetchResult {
    pub fn ok(source: Source, payload: Map<String, Value>) -> Self {
        Self {
            source,
            payload,
            error: None,
        }
    }

    pub fn error(source: Source, message: impl Into<String>) -> Self {
        Self {
            source,
            payload: Map::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// 交给Agent的工具输出：错误时为 `{"error": ...}`，否则为payload本身
    pub fn into_tool_output(self) -> Value {
        match self.error {
            Some(message) => serde_json::json!({ "error": message }),
            None => Value::Object(self.payload),
        }
    }
}
