//! 回答存储操作

use super::SeaOrmStorage;
use crate::entity::answers::{ActiveModel, Column, Entity as Answers};
use crate::entity::questions::{Column as QuestionColumn, Entity as Questions};
use crate::errors::{ClassQAError, Result};
use crate::models::{
    VoteKind,
    answers::{
        entities::{Answer, display_order},
        requests::CreateAnswer,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建回答
    pub async fn create_answer_impl(&self, req: CreateAnswer) -> Result<Answer> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            question_id: Set(req.question_id),
            author_id: Set(req.author_id),
            content: Set(req.content),
            attachments: Set(serde_json::to_string(&req.attachments)?),
            upvoters: Set("[]".to_string()),
            downvoters: Set("[]".to_string()),
            is_accepted: Set(false),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("创建回答失败: {e}")))?;

        Ok(result.into_answer())
    }

    async fn find_active_answer(
        &self,
        answer_id: i64,
    ) -> Result<Option<crate::entity::answers::Model>> {
        Answers::find_by_id(answer_id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询回答失败: {e}")))
    }

    /// 获取问题下未删除的回答
    pub async fn get_answer_impl(&self, question_id: i64, answer_id: i64) -> Result<Option<Answer>> {
        let result = self
            .find_active_answer(answer_id)
            .await?
            .filter(|m| m.question_id == question_id);

        Ok(result.map(|m| m.into_answer()))
    }

    /// 列出问题下未删除的回答，已采纳优先，其次得分，最后时间
    pub async fn list_answers_impl(&self, question_id: i64) -> Result<Vec<Answer>> {
        let models = Answers::find()
            .filter(Column::QuestionId.eq(question_id))
            .filter(Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询回答列表失败: {e}")))?;

        // 得分来自 JSON 列，只能在内存中排序
        let mut answers: Vec<Answer> = models.into_iter().map(|m| m.into_answer()).collect();
        answers.sort_by(display_order);

        Ok(answers)
    }

    /// 更新回答内容
    pub async fn update_answer_content_impl(
        &self,
        answer_id: i64,
        content: String,
    ) -> Result<Option<Answer>> {
        if self.find_active_answer(answer_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(answer_id),
            content: Set(content),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("更新回答失败: {e}")))?;

        Ok(Some(result.into_answer()))
    }

    /// 对回答投票，整行读改写
    pub async fn vote_answer_impl(
        &self,
        answer_id: i64,
        user_id: i64,
        kind: VoteKind,
    ) -> Result<Option<Answer>> {
        let Some(model) = self.find_active_answer(answer_id).await? else {
            return Ok(None);
        };

        let mut answer = model.into_answer();
        answer.votes.apply_vote(user_id, kind);
        let (upvoters, downvoters) = answer.votes.to_columns()?;

        let active = ActiveModel {
            id: Set(answer_id),
            upvoters: Set(upvoters),
            downvoters: Set(downvoters),
            ..Default::default()
        };

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("更新投票失败: {e}")))?;

        Ok(Some(result.into_answer()))
    }

    /// 采纳回答
    ///
    /// 同一事务内：取消同问题下其他回答的采纳，标记目标回答，问题置为已解决。
    /// 目标回答不存在或不属于该问题时返回 false 且不做修改。
    pub async fn accept_answer_impl(&self, question_id: i64, answer_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQAError::database_operation(format!("开启事务失败: {e}")))?;

        let target = Answers::find_by_id(answer_id)
            .filter(Column::QuestionId.eq(question_id))
            .filter(Column::IsActive.eq(true))
            .one(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询回答失败: {e}")))?;

        if target.is_none() {
            txn.rollback()
                .await
                .map_err(|e| ClassQAError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(false);
        }

        let now = chrono::Utc::now().timestamp();

        Answers::update_many()
            .col_expr(Column::IsAccepted, Expr::value(false))
            .filter(Column::QuestionId.eq(question_id))
            .filter(Column::Id.ne(answer_id))
            .filter(Column::IsAccepted.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("取消其他采纳失败: {e}")))?;

        Answers::update_many()
            .col_expr(Column::IsAccepted, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(answer_id))
            .exec(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("采纳回答失败: {e}")))?;

        Questions::update_many()
            .col_expr(QuestionColumn::IsResolved, Expr::value(true))
            .col_expr(QuestionColumn::UpdatedAt, Expr::value(now))
            .filter(QuestionColumn::Id.eq(question_id))
            .exec(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("更新问题状态失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ClassQAError::database_operation(format!("提交事务失败: {e}")))?;

        debug!("Answer {} accepted for question {}", answer_id, question_id);
        Ok(true)
    }

    /// 软删除回答，不影响问题的已解决状态
    pub async fn soft_delete_answer_impl(&self, answer_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Answers::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(answer_id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("删除回答失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
