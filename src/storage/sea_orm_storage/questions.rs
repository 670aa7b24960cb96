//! 问题存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::answers::{Column as AnswerColumn, Entity as Answers};
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{ClassQAError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo, VoteKind, page_bounds,
    questions::{
        entities::Question,
        requests::{CreateQuestion, QuestionListQuery, QuestionUpdate},
    },
};
use crate::utils::contains_like;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建问题
    pub async fn create_question_impl(&self, req: CreateQuestion) -> Result<Question> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(req.class_id),
            author_id: Set(req.author_id),
            title: Set(req.title),
            description: Set(req.description),
            tags: Set(serde_json::to_string(&req.tags)?),
            attachments: Set(serde_json::to_string(&req.attachments)?),
            upvoters: Set("[]".to_string()),
            downvoters: Set("[]".to_string()),
            is_resolved: Set(false),
            is_pinned: Set(false),
            is_active: Set(true),
            view_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("创建问题失败: {e}")))?;

        Ok(result.into_question())
    }

    async fn find_active_question(
        &self,
        question_id: i64,
    ) -> Result<Option<crate::entity::questions::Model>> {
        Questions::find_by_id(question_id)
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询问题失败: {e}")))
    }

    /// 获取班级内未删除的问题
    pub async fn get_question_impl(
        &self,
        class_id: i64,
        question_id: i64,
    ) -> Result<Option<Question>> {
        let result = self
            .find_active_question(question_id)
            .await?
            .filter(|m| m.class_id == class_id);

        Ok(result.map(|m| m.into_question()))
    }

    /// 分页列出问题，置顶优先，其次按创建时间倒序
    pub async fn list_questions_with_pagination_impl(
        &self,
        class_id: i64,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Questions::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::IsActive.eq(true));

        // 标题搜索
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Title.like(contains_like(search.trim())));
        }

        // 标签筛选，标签列为 JSON 字符串数组，按带引号的完整标签匹配
        if let Some(ref tag) = query.tag
            && !tag.trim().is_empty()
        {
            let needle = serde_json::to_string(&tag.trim().to_lowercase())?;
            select = select.filter(Column::Tags.like(contains_like(&needle)));
        }

        if let Some(resolved) = query.resolved {
            select = select.filter(Column::IsResolved.eq(resolved));
        }

        select = select
            .order_by_desc(Column::IsPinned)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询问题总数失败: {e}")))?;

        let questions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询问题列表失败: {e}")))?;

        Ok(PaginatedResponse {
            items: questions.into_iter().map(|m| m.into_question()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新问题
    pub async fn update_question_impl(
        &self,
        question_id: i64,
        update: QuestionUpdate,
    ) -> Result<Option<Question>> {
        if self.find_active_question(question_id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(question_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(description);
        }

        if let Some(tags) = update.tags {
            model.tags = Set(serde_json::to_string(&tags)?);
        }

        if let Some(is_pinned) = update.is_pinned {
            model.is_pinned = Set(is_pinned);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("更新问题失败: {e}")))?;

        Ok(Some(result.into_question()))
    }

    /// 对问题投票，整行读改写，同一用户并发投票时后写入者生效
    pub async fn vote_question_impl(
        &self,
        question_id: i64,
        user_id: i64,
        kind: VoteKind,
    ) -> Result<Option<Question>> {
        let Some(model) = self.find_active_question(question_id).await? else {
            return Ok(None);
        };

        let mut question = model.into_question();
        question.votes.apply_vote(user_id, kind);
        let (upvoters, downvoters) = question.votes.to_columns()?;

        let active = ActiveModel {
            id: Set(question_id),
            upvoters: Set(upvoters),
            downvoters: Set(downvoters),
            ..Default::default()
        };

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("更新投票失败: {e}")))?;

        Ok(Some(result.into_question()))
    }

    /// 浏览量加一
    pub async fn increment_question_views_impl(&self, question_id: i64) -> Result<bool> {
        let result = Questions::update_many()
            .col_expr(Column::ViewCount, Expr::cust("view_count + 1"))
            .filter(Column::Id.eq(question_id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("更新浏览量失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 软删除问题
    pub async fn soft_delete_question_impl(&self, question_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Questions::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(question_id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("删除问题失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计各问题未删除的回答数
    pub async fn count_answers_impl(&self, question_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        let mut counts: HashMap<i64, i64> = question_ids.iter().map(|id| (*id, 0)).collect();
        if question_ids.is_empty() {
            return Ok(counts);
        }

        let rows: Vec<i64> = Answers::find()
            .select_only()
            .column(AnswerColumn::QuestionId)
            .filter(AnswerColumn::QuestionId.is_in(question_ids.iter().copied()))
            .filter(AnswerColumn::IsActive.eq(true))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("统计回答数失败: {e}")))?;

        for question_id in rows {
            *counts.entry(question_id).or_insert(0) += 1;
        }

        Ok(counts)
    }
}
