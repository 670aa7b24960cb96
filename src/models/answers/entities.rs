use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::VoteLedger;
use crate::models::files::entities::FileMeta;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/answer.ts")]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub author_id: i64,
    pub content: String,
    pub attachments: Vec<FileMeta>,
    #[serde(skip)]
    #[ts(skip)]
    pub votes: VoteLedger,
    pub is_accepted: bool,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 将目标回答标记为采纳，同一问题下的其他回答全部取消采纳
///
/// 目标不在列表中时不做任何修改并返回 false。
pub fn mark_accepted(answers: &mut [Answer], target_id: i64) -> bool {
    if !answers.iter().any(|a| a.id == target_id) {
        return false;
    }
    for answer in answers.iter_mut() {
        answer.is_accepted = answer.id == target_id;
    }
    true
}

/// 展示顺序：已采纳优先，其次得分从高到低，最后按时间从早到晚
pub fn display_order(a: &Answer, b: &Answer) -> Ordering {
    b.is_accepted
        .cmp(&a.is_accepted)
        .then_with(|| b.votes.score().cmp(&a.votes.score()))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::VoteKind;

    fn answer(id: i64, minutes: i64) -> Answer {
        let at = chrono::DateTime::from_timestamp(1_700_000_000 + minutes * 60, 0).unwrap();
        Answer {
            id,
            question_id: 1,
            author_id: id + 100,
            content: format!("answer {id}"),
            attachments: Vec::new(),
            votes: VoteLedger::default(),
            is_accepted: false,
            is_active: true,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_mark_accepted_single_winner() {
        let mut answers = vec![answer(1, 0), answer(2, 1), answer(3, 2)];
        answers[0].is_accepted = true;

        assert!(mark_accepted(&mut answers, 3));
        let accepted: Vec<i64> = answers
            .iter()
            .filter(|a| a.is_accepted)
            .map(|a| a.id)
            .collect();
        assert_eq!(accepted, vec![3]);
    }

    #[test]
    fn test_mark_accepted_unknown_target() {
        let mut answers = vec![answer(1, 0), answer(2, 1)];
        answers[1].is_accepted = true;

        assert!(!mark_accepted(&mut answers, 9));
        assert!(answers[1].is_accepted);
        assert!(!answers[0].is_accepted);
    }

    #[test]
    fn test_display_order() {
        let mut answers = vec![answer(1, 0), answer(2, 1), answer(3, 2), answer(4, 3)];
        answers[1].votes.apply_vote(7, VoteKind::Upvote);
        answers[1].votes.apply_vote(8, VoteKind::Upvote);
        answers[0].votes.apply_vote(7, VoteKind::Downvote);
        answers[3].is_accepted = true;

        answers.sort_by(display_order);
        let ids: Vec<i64> = answers.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }
}
