use serde::Serialize;
use ts_rs::TS;

use super::entities::Question;
use crate::models::common::{PaginationInfo, VoteSummary};

/// 面向调用者的问题视图
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub question: Question,
    pub votes: VoteSummary,
    pub answer_count: i64,
}

impl QuestionView {
    pub fn new(question: Question, viewer_id: i64, answer_count: i64) -> Self {
        let votes = question.votes.summary(viewer_id);
        Self {
            question,
            votes,
            answer_count,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<QuestionView>,
}
