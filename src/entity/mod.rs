//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod answers;
pub mod class_members;
pub mod classes;
pub mod files;
pub mod questions;
pub mod users;

use chrono::{DateTime, Utc};

/// 数据库中的秒级时间戳转换为 UTC 时间
pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// JSON 文本列解析，空串或损坏的数据按默认值处理
pub(crate) fn parse_json_column<T>(raw: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    if raw.trim().is_empty() {
        return T::default();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Failed to parse JSON column: {}", e);
        T::default()
    })
}
