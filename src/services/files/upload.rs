use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{error, info};
use uuid::Uuid;

use super::{FileService, class_upload_dir};
use crate::config::AppConfig;
use crate::errors::ClassQAError;
use crate::models::files::entities::CreateFile;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::{current_class, current_user, error_json, internal_error, storage_error};
use crate::utils::validate_magic_bytes;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// 已写入磁盘的上传文件
struct ReceivedFile {
    original_name: String,
    stored_name: String,
    path: PathBuf,
    size: i64,
    content_type: String,
}

/// 小写带点的扩展名，没有扩展名时为空串
fn file_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// 去掉客户端可能携带的目录部分
fn sanitize_file_name(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        error!("{}", ClassQAError::file_operation(format!("清理上传文件失败: {e}")));
    }
}

pub async fn handle_upload(
    service: &FileService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));
    let class_id = class.class.id;
    let settings = &class.class.settings;

    if !settings.allow_uploads {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::UploadsDisabled,
            "Uploads are disabled for this class",
        ));
    }

    // 班级上限不超过全局上限
    let max_size = settings
        .max_file_size
        .min(AppConfig::get().upload.max_size as i64)
        .max(0) as usize;

    let upload_dir = class_upload_dir(class_id);
    if let Err(e) = tokio::fs::create_dir_all(&upload_dir).await {
        error!("{}", ClassQAError::file_operation(format!("创建上传目录失败: {e}")));
        return Ok(internal_error());
    }

    let mut received: Option<ReceivedFile> = None;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                // 已落盘但尚未登记的文件
                if let Some(previous) = received.take() {
                    discard(&previous.path).await;
                }
                return Err(e.into());
            }
        };

        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }

        if let Some(previous) = received.take() {
            discard(&previous.path).await;
            return Ok(error_json(
                StatusCode::BAD_REQUEST,
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }

        let original_name = sanitize_file_name(
            content_disposition
                .and_then(|cd| cd.get_filename())
                .unwrap_or_default(),
        );
        let extension = file_extension(&original_name);

        if extension.is_empty() || !settings.allows_extension(&extension) {
            return Ok(error_json(
                StatusCode::BAD_REQUEST,
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed in this class",
            ));
        }

        // MIME 类型只用于记录，不参与校验
        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let path = upload_dir.join(&stored_name);
        let mut file = match tokio::fs::File::create(&path).await {
            Ok(file) => file,
            Err(e) => {
                error!("{}", ClassQAError::file_operation(format!("文件创建失败: {e}")));
                return Ok(internal_error());
            }
        };

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    discard(&path).await;
                    return Err(e.into());
                }
            };

            // 第一个数据块校验魔术字节
            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    discard(&path).await;
                    return Ok(error_json(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    ));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                discard(&path).await;
                return Ok(error_json(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    ErrorCode::FileSizeExceeded,
                    format!("File size exceeds the limit of {max_size} bytes"),
                ));
            }

            if let Err(e) = file.write_all(&data).await {
                error!("{}", ClassQAError::file_operation(format!("文件写入失败: {e}")));
                discard(&path).await;
                return Ok(internal_error());
            }
        }

        if total_size == 0 {
            discard(&path).await;
            return Ok(error_json(
                StatusCode::BAD_REQUEST,
                ErrorCode::FileUploadFailed,
                "Uploaded file is empty",
            ));
        }

        if let Err(e) = file.flush().await {
            error!("{}", ClassQAError::file_operation(format!("文件写入失败: {e}")));
            discard(&path).await;
            return Ok(internal_error());
        }

        received = Some(ReceivedFile {
            original_name,
            stored_name,
            path,
            size: total_size as i64,
            content_type,
        });
    }

    let Some(received) = received else {
        return Ok(error_json(
            StatusCode::BAD_REQUEST,
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    };

    let create = CreateFile {
        token: Uuid::new_v4().to_string(),
        class_id,
        uploader_id: user.id,
        original_name: received.original_name,
        stored_name: received.stored_name,
        file_size: received.size,
        content_type: received.content_type,
    };

    match storage.create_file(create).await {
        Ok(stored) => {
            info!(
                "User {} uploaded {} ({} bytes) to class {}",
                user.id, stored.token, stored.file_size, class_id
            );
            let response = FileUploadResponse {
                uploaded_at: stored.created_at,
                file: stored.to_meta(),
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(response, "File uploaded")))
        }
        Err(e) => {
            discard(&received.path).await;
            Ok(storage_error("Failed to record uploaded file", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("notes.PDF"), ".pdf");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("Makefile"), "");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\hw.pdf"), "hw.pdf");
        assert_eq!(sanitize_file_name(" plain.txt "), "plain.txt");
    }
}
