use serde::Serialize;
use ts_rs::TS;

use super::entities::Answer;
use crate::models::common::VoteSummary;

/// 面向调用者的回答视图
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct AnswerView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub answer: Answer,
    pub votes: VoteSummary,
}

impl AnswerView {
    pub fn new(answer: Answer, viewer_id: i64) -> Self {
        let votes = answer.votes.summary(viewer_id);
        Self { answer, votes }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct AnswerListResponse {
    pub items: Vec<AnswerView>,
}

/// 采纳结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct AcceptAnswerResponse {
    pub answer_id: i64,
    pub question_id: i64,
    pub is_resolved: bool,
}
