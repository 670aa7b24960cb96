pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{ErrorCode, files::entities::FileMeta};
use crate::storage::Storage;

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::app_storage(request),
        }
    }

    // 上传班级附件
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    // 下载班级附件
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        file_token: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, file_token).await
    }
}

/// 班级附件目录：`{upload.dir}/{class_id}`
pub(crate) fn class_upload_dir(class_id: i64) -> PathBuf {
    PathBuf::from(&AppConfig::get().upload.dir).join(class_id.to_string())
}

/// 将帖子携带的附件令牌解析为元数据快照
///
/// 令牌去重后数量不能超过 `upload.max_files_per_post`，且都必须属于本班级。
pub(crate) async fn resolve_attachments(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    tokens: &[String],
) -> Result<Vec<FileMeta>, HttpResponse> {
    let mut unique: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.trim().to_string();
        if !unique.contains(&token) {
            unique.push(token);
        }
    }

    if unique.is_empty() {
        return Ok(Vec::new());
    }

    let max_files = AppConfig::get().upload.max_files_per_post;
    if unique.len() > max_files {
        return Err(super::error_json(
            StatusCode::BAD_REQUEST,
            ErrorCode::AttachmentInvalid,
            format!("At most {max_files} attachments are allowed"),
        ));
    }

    let files = storage
        .get_files_by_tokens(class_id, &unique)
        .await
        .map_err(|e| super::storage_error("Failed to load attachments", e))?;

    // 保持请求中的顺序
    let metas: Vec<FileMeta> = unique
        .iter()
        .filter_map(|token| files.iter().find(|f| &f.token == token))
        .map(|f| f.to_meta())
        .collect();

    if metas.len() != unique.len() {
        return Err(super::error_json(
            StatusCode::BAD_REQUEST,
            ErrorCode::AttachmentInvalid,
            "Attachment not found in this class",
        ));
    }

    Ok(metas)
}
