//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod answers;
mod class_members;
mod classes;
mod files;
mod questions;
mod users;

use crate::config::AppConfig;
use crate::errors::{ClassQAError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 基于已有连接创建存储实例并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// 内存 SQLite 存储，单连接以保证所有查询看到同一个库
    pub async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| ClassQAError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Self::from_connection(db).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ClassQAError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| ClassQAError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| ClassQAError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ClassQAError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 班级模块
    async fn create_class(
        &self,
        class: CreateClass,
        max_attempts: usize,
    ) -> Result<ClassWithMembers> {
        self.create_class_impl(class, max_attempts).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_with_members(&self, class_id: i64) -> Result<Option<ClassWithMembers>> {
        self.get_class_with_members_impl(class_id).await
    }

    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>> {
        self.get_class_by_code_impl(code).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(&self, class_id: i64, update: ClassUpdate) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 班级成员模块
    async fn add_class_member(
        &self,
        class_id: i64,
        user_id: i64,
        role: ClassMemberRole,
    ) -> Result<ClassMember> {
        self.add_class_member_impl(class_id, user_id, role).await
    }

    async fn remove_class_member(&self, class_id: i64, user_id: i64) -> Result<bool> {
        self.remove_class_member_impl(class_id, user_id).await
    }

    async fn list_class_member_profiles(&self, class_id: i64) -> Result<Vec<ClassMemberProfile>> {
        self.list_class_member_profiles_impl(class_id).await
    }

    // 问题模块
    async fn create_question(&self, question: CreateQuestion) -> Result<Question> {
        self.create_question_impl(question).await
    }

    async fn get_question(&self, class_id: i64, question_id: i64) -> Result<Option<Question>> {
        self.get_question_impl(class_id, question_id).await
    }

    async fn list_questions_with_pagination(
        &self,
        class_id: i64,
        query: QuestionListQuery,
    ) -> Result<PaginatedResponse<Question>> {
        self.list_questions_with_pagination_impl(class_id, query)
            .await
    }

    async fn update_question(
        &self,
        question_id: i64,
        update: QuestionUpdate,
    ) -> Result<Option<Question>> {
        self.update_question_impl(question_id, update).await
    }

    async fn vote_question(
        &self,
        question_id: i64,
        user_id: i64,
        kind: VoteKind,
    ) -> Result<Option<Question>> {
        self.vote_question_impl(question_id, user_id, kind).await
    }

    async fn increment_question_views(&self, question_id: i64) -> Result<bool> {
        self.increment_question_views_impl(question_id).await
    }

    async fn soft_delete_question(&self, question_id: i64) -> Result<bool> {
        self.soft_delete_question_impl(question_id).await
    }

    async fn count_answers(&self, question_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        self.count_answers_impl(question_ids).await
    }

    // 回答模块
    async fn create_answer(&self, answer: CreateAnswer) -> Result<Answer> {
        self.create_answer_impl(answer).await
    }

    async fn get_answer(&self, question_id: i64, answer_id: i64) -> Result<Option<Answer>> {
        self.get_answer_impl(question_id, answer_id).await
    }

    async fn list_answers(&self, question_id: i64) -> Result<Vec<Answer>> {
        self.list_answers_impl(question_id).await
    }

    async fn update_answer_content(
        &self,
        answer_id: i64,
        content: String,
    ) -> Result<Option<Answer>> {
        self.update_answer_content_impl(answer_id, content).await
    }

    async fn vote_answer(
        &self,
        answer_id: i64,
        user_id: i64,
        kind: VoteKind,
    ) -> Result<Option<Answer>> {
        self.vote_answer_impl(answer_id, user_id, kind).await
    }

    async fn accept_answer(&self, question_id: i64, answer_id: i64) -> Result<bool> {
        self.accept_answer_impl(question_id, answer_id).await
    }

    async fn soft_delete_answer(&self, answer_id: i64) -> Result<bool> {
        self.soft_delete_answer_impl(answer_id).await
    }

    // 文件模块
    async fn create_file(&self, file: CreateFile) -> Result<StoredFile> {
        self.create_file_impl(file).await
    }

    async fn get_file(&self, class_id: i64, token: &str) -> Result<Option<StoredFile>> {
        self.get_file_impl(class_id, token).await
    }

    async fn get_files_by_tokens(
        &self,
        class_id: i64,
        tokens: &[String],
    ) -> Result<Vec<StoredFile>> {
        self.get_files_by_tokens_impl(class_id, tokens).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClassQAError;
    use crate::models::classes::entities::ClassSettings;
    use crate::models::users::entities::UserRole;

    async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::new_in_memory().await.unwrap()
    }

    async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
        storage
            .create_user(CreateUser {
                username: username.into(),
                email: format!("{username}@school.test"),
                password_hash: "hash".into(),
                role,
                display_name: None,
            })
            .await
            .unwrap()
    }

    fn new_class(creator_id: i64, name: &str) -> CreateClass {
        CreateClass {
            creator_id,
            name: name.into(),
            description: None,
            settings: ClassSettings {
                allow_uploads: true,
                max_file_size: 1024,
                allowed_file_types: vec![".pdf".into()],
            },
        }
    }

    fn new_question(class_id: i64, author_id: i64, title: &str, tags: &[&str]) -> CreateQuestion {
        CreateQuestion {
            class_id,
            author_id,
            title: title.into(),
            description: "body".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            attachments: vec![],
        }
    }

    #[actix_web::test]
    async fn test_duplicate_username_conflicts() {
        let storage = storage().await;
        user(&storage, "teacher1", UserRole::Teacher).await;
        let err = storage
            .create_user(CreateUser {
                username: "teacher1".into(),
                email: "other@school.test".into(),
                password_hash: "hash".into(),
                role: UserRole::Student,
                display_name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClassQAError::Conflict(_)));
    }

    #[actix_web::test]
    async fn test_create_class_adds_creator_as_teacher() {
        let storage = storage().await;
        let teacher = user(&storage, "teacher1", UserRole::Teacher).await;

        let class = storage
            .create_class(new_class(teacher.id, "Algebra I"), 10)
            .await
            .unwrap();
        assert_eq!(class.class.code.len(), 6);
        assert!(class.is_teacher_of(teacher.id));
        assert_eq!(class.members.len(), 1);

        let found = storage.get_class_by_code(&class.class.code).await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(class.class.id));
    }

    #[actix_web::test]
    async fn test_duplicate_code_reports_collision() {
        use crate::utils::random_code::CodeAttempt;
        use sea_orm::{EntityTrait, PaginatorTrait};

        let storage = storage().await;
        let teacher = user(&storage, "teacher1", UserRole::Teacher).await;
        let types = r#"[".pdf"]"#;

        let first = storage
            .try_insert_class(&new_class(teacher.id, "Algebra I"), types, "AAAAAA".into())
            .await
            .unwrap();
        let CodeAttempt::Accepted(class_id) = first else {
            panic!("first insert should be accepted");
        };

        let second = storage
            .try_insert_class(&new_class(teacher.id, "Geometry"), types, "AAAAAA".into())
            .await
            .unwrap();
        assert!(matches!(second, CodeAttempt::Collision));

        // 冲突的尝试整体回滚，不留下班级或成员记录
        let classes = crate::entity::classes::Entity::find()
            .count(&storage.db)
            .await
            .unwrap();
        let members = crate::entity::class_members::Entity::find()
            .count(&storage.db)
            .await
            .unwrap();
        assert_eq!(classes, 1);
        assert_eq!(members, 1);

        let found = storage.get_class_by_code("AAAAAA").await.unwrap();
        assert_eq!(found.map(|c| (c.id, c.name)), Some((class_id, "Algebra I".to_string())));
    }

    #[actix_web::test]
    async fn test_membership_is_unique() {
        let storage = storage().await;
        let teacher = user(&storage, "teacher1", UserRole::Teacher).await;
        let student = user(&storage, "student1", UserRole::Student).await;
        let class = storage
            .create_class(new_class(teacher.id, "Algebra I"), 10)
            .await
            .unwrap();
        let class_id = class.class.id;

        storage
            .add_class_member(class_id, student.id, ClassMemberRole::Student)
            .await
            .unwrap();
        let err = storage
            .add_class_member(class_id, student.id, ClassMemberRole::Student)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassQAError::Conflict(_)));

        let listed = storage
            .list_classes_with_pagination(ClassListQuery {
                page: None,
                size: None,
                member_id: Some(student.id),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 1);

        assert!(storage.remove_class_member(class_id, student.id).await.unwrap());
        assert!(!storage.remove_class_member(class_id, student.id).await.unwrap());
    }

    #[actix_web::test]
    async fn test_question_listing_filters() {
        let storage = storage().await;
        let teacher = user(&storage, "teacher1", UserRole::Teacher).await;
        let class_id = storage
            .create_class(new_class(teacher.id, "Algebra I"), 10)
            .await
            .unwrap()
            .class
            .id;

        let first = storage
            .create_question(new_question(class_id, teacher.id, "Factoring 100%", &["algebra"]))
            .await
            .unwrap();
        let second = storage
            .create_question(new_question(class_id, teacher.id, "Limits", &["calculus"]))
            .await
            .unwrap();
        storage
            .update_question(
                first.id,
                QuestionUpdate {
                    is_pinned: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let query = |search: Option<&str>, tag: Option<&str>| QuestionListQuery {
            page: None,
            size: None,
            search: search.map(String::from),
            tag: tag.map(String::from),
            resolved: None,
        };

        // 置顶优先
        let all = storage
            .list_questions_with_pagination(class_id, query(None, None))
            .await
            .unwrap();
        let ids: Vec<i64> = all.items.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        // LIKE 通配符按字面匹配
        let found = storage
            .list_questions_with_pagination(class_id, query(Some("100%"), None))
            .await
            .unwrap();
        assert_eq!(found.pagination.total, 1);

        let tagged = storage
            .list_questions_with_pagination(class_id, query(None, Some("Calculus")))
            .await
            .unwrap();
        assert_eq!(tagged.items.len(), 1);
        assert_eq!(tagged.items[0].id, second.id);

        // 软删除后不再出现
        assert!(storage.soft_delete_question(second.id).await.unwrap());
        assert!(storage.get_question(class_id, second.id).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_votes_are_exclusive_per_user() {
        let storage = storage().await;
        let teacher = user(&storage, "teacher1", UserRole::Teacher).await;
        let class_id = storage
            .create_class(new_class(teacher.id, "Algebra I"), 10)
            .await
            .unwrap()
            .class
            .id;
        let question = storage
            .create_question(new_question(class_id, teacher.id, "Limits", &[]))
            .await
            .unwrap();

        storage
            .vote_question(question.id, 7, VoteKind::Upvote)
            .await
            .unwrap();
        storage
            .vote_question(question.id, 7, VoteKind::Upvote)
            .await
            .unwrap();
        let voted = storage
            .vote_question(question.id, 7, VoteKind::Downvote)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(voted.votes.score(), -1);

        let cleared = storage
            .vote_question(question.id, 7, VoteKind::Remove)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.votes.score(), 0);

        assert!(
            storage
                .vote_question(9999, 7, VoteKind::Upvote)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_accept_answer_switches_acceptance() {
        let storage = storage().await;
        let teacher = user(&storage, "teacher1", UserRole::Teacher).await;
        let class_id = storage
            .create_class(new_class(teacher.id, "Algebra I"), 10)
            .await
            .unwrap()
            .class
            .id;
        let question = storage
            .create_question(new_question(class_id, teacher.id, "Limits", &[]))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for content in ["first", "second"] {
            let answer = storage
                .create_answer(CreateAnswer {
                    question_id: question.id,
                    author_id: teacher.id,
                    content: content.into(),
                    attachments: vec![],
                })
                .await
                .unwrap();
            ids.push(answer.id);
        }

        assert!(storage.accept_answer(question.id, ids[0]).await.unwrap());
        assert!(storage.accept_answer(question.id, ids[1]).await.unwrap());

        let answers = storage.list_answers(question.id).await.unwrap();
        // 已采纳的排在最前
        assert_eq!(answers[0].id, ids[1]);
        assert!(answers[0].is_accepted);
        assert!(!answers[1].is_accepted);

        let question = storage
            .get_question(class_id, question.id)
            .await
            .unwrap()
            .unwrap();
        assert!(question.is_resolved);

        let counts = storage.count_answers(&[question.id]).await.unwrap();
        assert_eq!(counts.get(&question.id), Some(&2));
    }

    #[actix_web::test]
    async fn test_delete_class_cascades() {
        let storage = storage().await;
        let teacher = user(&storage, "teacher1", UserRole::Teacher).await;
        let class = storage
            .create_class(new_class(teacher.id, "Algebra I"), 10)
            .await
            .unwrap();
        let class_id = class.class.id;
        let question = storage
            .create_question(new_question(class_id, teacher.id, "Limits", &[]))
            .await
            .unwrap();

        assert!(storage.delete_class(class_id).await.unwrap());
        assert!(storage.get_class_with_members(class_id).await.unwrap().is_none());
        assert!(storage.get_question(class_id, question.id).await.unwrap().is_none());
        assert!(
            storage
                .get_class_by_code(&class.class.code)
                .await
                .unwrap()
                .is_none()
        );
    }
}
