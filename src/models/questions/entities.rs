use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::VoteLedger;
use crate::models::files::entities::FileMeta;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub class_id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    /// 小写、去重后的标签
    pub tags: Vec<String>,
    pub attachments: Vec<FileMeta>,
    #[serde(skip)]
    #[ts(skip)]
    pub votes: VoteLedger,
    pub is_resolved: bool,
    pub is_pinned: bool,
    pub is_active: bool,
    pub view_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
