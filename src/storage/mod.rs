use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    PaginatedResponse, VoteKind,
    answers::{entities::Answer, requests::CreateAnswer},
    class_members::entities::{ClassMember, ClassMemberProfile, ClassMemberRole},
    classes::{
        entities::{Class, ClassWithMembers},
        requests::{ClassListQuery, ClassUpdate, CreateClass},
        responses::ClassListResponse,
    },
    files::entities::{CreateFile, StoredFile},
    questions::{
        entities::Question,
        requests::{CreateQuestion, QuestionListQuery, QuestionUpdate},
    },
    users::{
        entities::User,
        requests::{CreateUser, UserUpdate},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，用户名或邮箱重复时返回 Conflict
    async fn create_user(&self, user: CreateUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 班级管理方法
    // 创建班级并将创建者加入为教师，邀请码冲突时有界重试
    async fn create_class(&self, class: CreateClass, max_attempts: usize)
    -> Result<ClassWithMembers>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 获取班级及其成员
    async fn get_class_with_members(&self, class_id: i64) -> Result<Option<ClassWithMembers>>;
    // 通过邀请码获取班级信息
    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>>;
    // 列出班级
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 更新班级信息
    async fn update_class(&self, class_id: i64, update: ClassUpdate) -> Result<Option<Class>>;
    // 删除班级及其全部成员、问答与文件记录
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 班级成员管理方法
    // 添加成员，已是成员时返回 Conflict
    async fn add_class_member(
        &self,
        class_id: i64,
        user_id: i64,
        role: ClassMemberRole,
    ) -> Result<ClassMember>;
    // 移除成员
    async fn remove_class_member(&self, class_id: i64, user_id: i64) -> Result<bool>;
    // 列出成员及其用户资料
    async fn list_class_member_profiles(&self, class_id: i64) -> Result<Vec<ClassMemberProfile>>;

    /// 问题管理方法
    async fn create_question(&self, question: CreateQuestion) -> Result<Question>;
    // 获取班级内未删除的问题
    async fn get_question(&self, class_id: i64, question_id: i64) -> Result<Option<Question>>;
    async fn list_questions_with_pagination(
        &self,
        class_id: i64,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>>;
    async fn update_question(
        &self,
        question_id: i64,
        update: QuestionUpdate,
    ) -> Result<Option<Question>>;
    async fn vote_question(
        &self,
        question_id: i64,
        user_id: i64,
        kind: VoteKind,
    ) -> Result<Option<Question>>;
    async fn increment_question_views(&self, question_id: i64) -> Result<bool>;
    async fn soft_delete_question(&self, question_id: i64) -> Result<bool>;
    // 统计各问题未删除的回答数
    async fn count_answers(&self, question_ids: &[i64]) -> Result<HashMap<i64, i64>>;

    /// 回答管理方法
    async fn create_answer(&self, answer: CreateAnswer) -> Result<Answer>;
    // 获取问题下未删除的回答
    async fn get_answer(&self, question_id: i64, answer_id: i64) -> Result<Option<Answer>>;
    // 按展示顺序列出问题下未删除的回答
    async fn list_answers(&self, question_id: i64) -> Result<Vec<Answer>>;
    async fn update_answer_content(&self, answer_id: i64, content: String)
    -> Result<Option<Answer>>;
    async fn vote_answer(
        &self,
        answer_id: i64,
        user_id: i64,
        kind: VoteKind,
    ) -> Result<Option<Answer>>;
    // 采纳回答并将问题标记为已解决
    async fn accept_answer(&self, question_id: i64, answer_id: i64) -> Result<bool>;
    async fn soft_delete_answer(&self, answer_id: i64) -> Result<bool>;

    /// 文件管理方法
    async fn create_file(&self, file: CreateFile) -> Result<StoredFile>;
    async fn get_file(&self, class_id: i64, token: &str) -> Result<Option<StoredFile>>;
    // 批量获取班级内的文件，不存在的 token 被忽略
    async fn get_files_by_tokens(&self, class_id: i64, tokens: &[String])
    -> Result<Vec<StoredFile>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
