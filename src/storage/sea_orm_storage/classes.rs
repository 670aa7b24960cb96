//! 班级存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::answers::{Column as AnswerColumn, Entity as Answers};
use crate::entity::class_members::{
    ActiveModel as MemberActiveModel, Column as MemberColumn, Entity as ClassMembers,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::files::{Column as FileColumn, Entity as Files};
use crate::entity::questions::{Column as QuestionColumn, Entity as Questions};
use crate::errors::{ClassQAError, Result};
use crate::models::{
    PaginationInfo, page_bounds,
    class_members::entities::ClassMemberRole,
    classes::{
        entities::{Class, ClassWithMembers},
        requests::{ClassListQuery, ClassUpdate, CreateClass},
        responses::ClassListResponse,
    },
};
use crate::utils::contains_like;
use crate::utils::random_code::{CodeAttempt, allocate_unique_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 创建班级
    ///
    /// 每次尝试在独立事务中插入班级与创建者成员记录，
    /// 邀请码唯一索引冲突时回滚并换码重试。
    pub async fn create_class_impl(
        &self,
        req: CreateClass,
        max_attempts: usize,
    ) -> Result<ClassWithMembers> {
        let allowed_file_types = serde_json::to_string(&req.settings.allowed_file_types)?;
        let req = &req;
        let allowed_file_types = allowed_file_types.as_str();

        let class_id = allocate_unique_code(max_attempts, |code| {
            self.try_insert_class(req, allowed_file_types, code)
        })
        .await?;

        self.get_class_with_members_impl(class_id)
            .await?
            .ok_or_else(|| ClassQAError::not_found(format!("班级 {class_id} 创建后未找到")))
    }

    pub(super) async fn try_insert_class(
        &self,
        req: &CreateClass,
        allowed_file_types: &str,
        code: String,
    ) -> Result<CodeAttempt<i64>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQAError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            creator_id: Set(req.creator_id),
            name: Set(req.name.clone()),
            description: Set(req.description.clone()),
            code: Set(code),
            allow_uploads: Set(req.settings.allow_uploads),
            max_file_size: Set(req.settings.max_file_size),
            allowed_file_types: Set(allowed_file_types.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let class = match model.insert(&txn).await {
            Ok(class) => class,
            Err(e) if is_unique_violation(&e) => {
                txn.rollback()
                    .await
                    .map_err(|e| ClassQAError::database_operation(format!("回滚事务失败: {e}")))?;
                return Ok(CodeAttempt::Collision);
            }
            Err(e) => {
                return Err(ClassQAError::database_operation(format!(
                    "创建班级失败: {e}"
                )));
            }
        };

        let member = MemberActiveModel {
            class_id: Set(class.id),
            user_id: Set(req.creator_id),
            role: Set(ClassMemberRole::Teacher.to_string()),
            joined_at: Set(now),
            ..Default::default()
        };

        member
            .insert(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("添加班级创建者失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ClassQAError::database_operation(format!("提交事务失败: {e}")))?;

        debug!("Class {} created by user {}", class.id, req.creator_id);
        Ok(CodeAttempt::Accepted(class.id))
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 获取班级及其成员列表
    pub async fn get_class_with_members_impl(
        &self,
        class_id: i64,
    ) -> Result<Option<ClassWithMembers>> {
        let Some(class) = self.get_class_by_id_impl(class_id).await? else {
            return Ok(None);
        };

        let members = ClassMembers::find()
            .filter(MemberColumn::ClassId.eq(class_id))
            .order_by_asc(MemberColumn::JoinedAt)
            .order_by_asc(MemberColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(Some(ClassWithMembers {
            class,
            members: members.into_iter().map(|m| m.into_class_member()).collect(),
        }))
    }

    /// 通过邀请码获取班级
    pub async fn get_class_by_code_impl(&self, code: &str) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = page_bounds(query.page, query.size);

        let mut select = Classes::find();

        // 成员筛选
        if let Some(member_id) = query.member_id {
            let class_ids: Vec<i64> = ClassMembers::find()
                .select_only()
                .column(MemberColumn::ClassId)
                .filter(MemberColumn::UserId.eq(member_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| {
                    ClassQAError::database_operation(format!("查询用户班级关联失败: {e}"))
                })?;

            if class_ids.is_empty() {
                return Ok(ClassListResponse::empty(page, size));
            }

            select = select.filter(Column::Id.is_in(class_ids));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(contains_like(search.trim())));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询班级总数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新班级信息，邀请码不参与更新
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: ClassUpdate,
    ) -> Result<Option<Class>> {
        // 先检查班级是否存在
        let existing = self.get_class_by_id_impl(class_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(settings) = update.settings {
            model.allow_uploads = Set(settings.allow_uploads);
            model.max_file_size = Set(settings.max_file_size);
            model.allowed_file_types = Set(serde_json::to_string(&settings.allowed_file_types)?);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级
    ///
    /// 在同一事务中删除回答、问题、文件记录与成员关系，
    /// 不依赖数据库是否开启外键级联。
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQAError::database_operation(format!("开启事务失败: {e}")))?;

        let question_ids: Vec<i64> = Questions::find()
            .select_only()
            .column(QuestionColumn::Id)
            .filter(QuestionColumn::ClassId.eq(class_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询班级问题失败: {e}")))?;

        if !question_ids.is_empty() {
            Answers::delete_many()
                .filter(AnswerColumn::QuestionId.is_in(question_ids))
                .exec(&txn)
                .await
                .map_err(|e| ClassQAError::database_operation(format!("删除回答失败: {e}")))?;
        }

        Questions::delete_many()
            .filter(QuestionColumn::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("删除问题失败: {e}")))?;

        Files::delete_many()
            .filter(FileColumn::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("删除文件记录失败: {e}")))?;

        ClassMembers::delete_many()
            .filter(MemberColumn::ClassId.eq(class_id))
            .exec(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("删除班级成员失败: {e}")))?;

        let result = Classes::delete_by_id(class_id)
            .exec(&txn)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("删除班级失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ClassQAError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
