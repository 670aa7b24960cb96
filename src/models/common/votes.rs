//! 投票账本
//!
//! 每个用户在同一帖子上至多持有一票，赞成与反对互斥，后投覆盖先投。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 投票动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub enum VoteKind {
    Upvote,
    Downvote,
    Remove,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct VoteLedger {
    pub upvoters: BTreeSet<i64>,
    pub downvoters: BTreeSet<i64>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录用户投票：先从两侧移除，再按动作加入对应集合
    pub fn apply_vote(&mut self, user_id: i64, kind: VoteKind) {
        self.upvoters.remove(&user_id);
        self.downvoters.remove(&user_id);
        match kind {
            VoteKind::Upvote => {
                self.upvoters.insert(user_id);
            }
            VoteKind::Downvote => {
                self.downvoters.insert(user_id);
            }
            VoteKind::Remove => {}
        }
    }

    pub fn score(&self) -> i64 {
        self.upvoters.len() as i64 - self.downvoters.len() as i64
    }

    /// 用户当前的投票，未投票返回 None
    pub fn vote_of(&self, user_id: i64) -> Option<VoteKind> {
        if self.upvoters.contains(&user_id) {
            Some(VoteKind::Upvote)
        } else if self.downvoters.contains(&user_id) {
            Some(VoteKind::Downvote)
        } else {
            None
        }
    }

    /// 从数据库中的两个 JSON 数组列还原
    pub fn from_columns(upvoters: &str, downvoters: &str) -> serde_json::Result<Self> {
        Ok(Self {
            upvoters: parse_id_set(upvoters)?,
            downvoters: parse_id_set(downvoters)?,
        })
    }

    /// 序列化为 (upvoters, downvoters) 两个 JSON 数组列
    pub fn to_columns(&self) -> serde_json::Result<(String, String)> {
        Ok((
            serde_json::to_string(&self.upvoters)?,
            serde_json::to_string(&self.downvoters)?,
        ))
    }

    pub fn summary(&self, viewer_id: i64) -> VoteSummary {
        VoteSummary {
            score: self.score(),
            upvotes: self.upvoters.len() as i64,
            downvotes: self.downvoters.len() as i64,
            my_vote: self.vote_of(viewer_id),
        }
    }
}

fn parse_id_set(raw: &str) -> serde_json::Result<BTreeSet<i64>> {
    if raw.trim().is_empty() {
        return Ok(BTreeSet::new());
    }
    serde_json::from_str(raw)
}

/// 面向调用者的投票摘要
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct VoteSummary {
    pub score: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    pub my_vote: Option<VoteKind>,
}

/// 投票请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct VoteRequest {
    pub vote: VoteKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upvote_then_downvote() {
        let mut ledger = VoteLedger::new();
        ledger.apply_vote(7, VoteKind::Upvote);
        ledger.apply_vote(7, VoteKind::Downvote);

        assert!(!ledger.upvoters.contains(&7));
        assert!(ledger.downvoters.contains(&7));
        assert_eq!(ledger.score(), -1);
        assert_eq!(ledger.vote_of(7), Some(VoteKind::Downvote));
    }

    #[test]
    fn test_vote_is_idempotent() {
        let mut ledger = VoteLedger::new();
        ledger.apply_vote(1, VoteKind::Upvote);
        let once = ledger.clone();
        ledger.apply_vote(1, VoteKind::Upvote);
        assert_eq!(ledger, once);
        assert_eq!(ledger.score(), 1);
    }

    #[test]
    fn test_remove_clears_vote() {
        let mut ledger = VoteLedger::new();
        ledger.apply_vote(1, VoteKind::Downvote);
        ledger.apply_vote(2, VoteKind::Upvote);
        ledger.apply_vote(1, VoteKind::Remove);

        assert_eq!(ledger.vote_of(1), None);
        assert_eq!(ledger.score(), 1);

        // 未投票用户移除不产生变化
        ledger.apply_vote(3, VoteKind::Remove);
        assert_eq!(ledger.upvoters.len() + ledger.downvoters.len(), 1);
    }

    #[test]
    fn test_user_never_in_both_sets() {
        let mut ledger = VoteLedger::new();
        let sequence = [
            VoteKind::Upvote,
            VoteKind::Downvote,
            VoteKind::Upvote,
            VoteKind::Remove,
            VoteKind::Downvote,
        ];
        for kind in sequence {
            ledger.apply_vote(42, kind);
            assert!(ledger.upvoters.intersection(&ledger.downvoters).next().is_none());
        }
        assert_eq!(ledger.vote_of(42), Some(VoteKind::Downvote));
    }

    #[test]
    fn test_score_counts_many_users() {
        let mut ledger = VoteLedger::new();
        for id in 1..=5 {
            ledger.apply_vote(id, VoteKind::Upvote);
        }
        ledger.apply_vote(6, VoteKind::Downvote);
        assert_eq!(ledger.score(), 4);

        let summary = ledger.summary(6);
        assert_eq!(summary.upvotes, 5);
        assert_eq!(summary.downvotes, 1);
        assert_eq!(summary.my_vote, Some(VoteKind::Downvote));
    }

    #[test]
    fn test_columns_roundtrip_and_empty() {
        let ledger = VoteLedger::from_columns("", "[]").unwrap();
        assert_eq!(ledger.score(), 0);

        let mut ledger = VoteLedger::new();
        ledger.apply_vote(3, VoteKind::Upvote);
        let (up, down) = ledger.to_columns().unwrap();
        assert_eq!(up, "[3]");
        assert_eq!(down, "[]");
    }

    #[test]
    fn test_vote_kind_deserialize() {
        let req: VoteRequest = serde_json::from_str(r#"{"vote":"downvote"}"#).unwrap();
        assert_eq!(req.vote, VoteKind::Downvote);
        assert!(serde_json::from_str::<VoteRequest>(r#"{"vote":"sideways"}"#).is_err());
    }
}
