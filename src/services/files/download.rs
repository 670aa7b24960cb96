use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, http::header};
use tracing::error;

use super::{FileService, class_upload_dir};
use crate::errors::ClassQAError;
use crate::models::ErrorCode;
use crate::services::{current_class, error_json, internal_error, storage_error};

/// 下载班级内的附件，成员资格由 RequireClassMember 保证
pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let class = try_response!(current_class(request));

    let stored = match storage.get_file(class.class.id, &file_token).await {
        Ok(Some(file)) => file,
        Ok(None) => {
            return Ok(error_json(
                StatusCode::NOT_FOUND,
                ErrorCode::FileNotFound,
                "File not found",
            ));
        }
        Err(e) => return Ok(storage_error("File query failed", e)),
    };

    let path = class_upload_dir(stored.class_id).join(&stored.stored_name);
    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("File {} missing on disk at {}", stored.token, path.display());
            return Ok(error_json(
                StatusCode::NOT_FOUND,
                ErrorCode::FileNotFound,
                "File not found",
            ));
        }
        Err(e) => {
            error!("{}", ClassQAError::file_operation(format!("File read failed: {e}")));
            return Ok(internal_error());
        }
    };

    let file_name = stored.original_name.replace('"', "");
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, stored.content_type.as_str()))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(data))
}
