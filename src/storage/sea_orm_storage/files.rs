//! 文件存储操作

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Column, Entity as Files};
use crate::errors::{ClassQAError, Result};
use crate::models::files::entities::{CreateFile, StoredFile};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建文件记录
    pub async fn create_file_impl(&self, req: CreateFile) -> Result<StoredFile> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            token: Set(req.token),
            class_id: Set(req.class_id),
            uploader_id: Set(req.uploader_id),
            original_name: Set(req.original_name),
            stored_name: Set(req.stored_name),
            file_size: Set(req.file_size),
            content_type: Set(req.content_type),
            created_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("创建文件记录失败: {e}")))?;

        Ok(result.into_stored_file())
    }

    /// 获取班级内的文件
    pub async fn get_file_impl(&self, class_id: i64, token: &str) -> Result<Option<StoredFile>> {
        let result = Files::find_by_id(token.to_string())
            .filter(Column::ClassId.eq(class_id))
            .one(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_stored_file()))
    }

    /// 批量获取班级内的文件
    pub async fn get_files_by_tokens_impl(
        &self,
        class_id: i64,
        tokens: &[String],
    ) -> Result<Vec<StoredFile>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let result = Files::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Token.is_in(tokens.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_stored_file()).collect())
    }
}
