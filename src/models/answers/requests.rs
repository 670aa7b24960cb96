use serde::Deserialize;
use ts_rs::TS;

use crate::models::files::entities::FileMeta;

// 创建回答请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct CreateAnswerRequest {
    pub content: String,
    /// 已上传到本班级的文件 token
    #[serde(default)]
    pub attachments: Vec<String>,
}

// 更新回答请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct UpdateAnswerRequest {
    pub content: String,
}

// 存储层使用的回答创建数据
#[derive(Debug, Clone)]
pub struct CreateAnswer {
    pub question_id: i64,
    pub author_id: i64,
    pub content: String,
    pub attachments: Vec<FileMeta>,
}
