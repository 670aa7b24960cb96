//! 统一响应包装
//!
//! 所有接口都返回 `{ code, message, data, timestamp }`，`code` 为 [`ErrorCode`] 的数值，
//! 成功时为 0。错误响应不携带 `data`。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    fn build(code: ErrorCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, Some(data), message)
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success as i32
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, None, message)
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(code, None, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_omits_data() {
        let resp = ApiResponse::error_empty(ErrorCode::ClassAlreadyJoined, "dup");
        assert!(!resp.is_success());

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], ErrorCode::ClassAlreadyJoined as i32);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_carries_data() {
        let resp = ApiResponse::success(3_i64, "ok");
        assert!(resp.is_success());
        assert_eq!(serde_json::to_value(&resp).unwrap()["data"], 3);
    }
}
