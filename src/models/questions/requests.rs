use serde::{Deserialize, Deserializer};
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::files::entities::FileMeta;

// 问题列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 标题子串
    pub search: Option<String>,
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub resolved: Option<bool>,
}

// 创建问题请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct CreateQuestionRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 已上传到本班级的文件 token
    #[serde(default)]
    pub attachments: Vec<String>,
}

// 更新问题请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    /// 仅班级教师可修改
    pub is_pinned: Option<bool>,
}

// 问题列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct QuestionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub resolved: Option<bool>,
}

// 存储层使用的问题创建数据
#[derive(Debug, Clone)]
pub struct CreateQuestion {
    pub class_id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub attachments: Vec<FileMeta>,
}

// 存储层使用的问题更新数据
#[derive(Debug, Clone, Default)]
pub struct QuestionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
}

// 查询字符串经 flatten 后全部是字符串，这里同时接受 JSON 布尔值和 "true"/"false"
fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b)),
        Some(serde_json::Value::String(s)) => match s.as_str() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(Error::custom(format!("invalid boolean: '{s}'"))),
        },
        Some(other) => Err(Error::custom(format!("invalid boolean: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    #[test]
    fn test_list_params_from_query_string() {
        let params = Query::<QuestionListParams>::from_query(
            "page=2&size=5&resolved=false&tag=calculus",
        )
        .unwrap()
        .into_inner();
        assert_eq!(params.pagination.page, 2);
        assert_eq!(params.pagination.size, 5);
        assert_eq!(params.resolved, Some(false));
        assert_eq!(params.tag.as_deref(), Some("calculus"));
        assert!(params.search.is_none());
    }

    #[test]
    fn test_list_params_defaults() {
        let params = Query::<QuestionListParams>::from_query("")
            .unwrap()
            .into_inner();
        assert_eq!(params.pagination.page, 1);
        assert_eq!(params.resolved, None);

        assert!(Query::<QuestionListParams>::from_query("resolved=maybe").is_err());
    }
}
