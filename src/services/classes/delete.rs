use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{info, warn};

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::files::class_upload_dir;
use crate::services::{
    current_class, current_user, error_json, invalidate_class_cache, storage_error,
};

/// 删除班级，仅创建者或管理员
pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));
    let class_id = class.class.id;

    if !class.can_delete(&user) {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::ClassPermissionDenied,
            "Only the class creator can delete the class",
        ));
    }

    match storage.delete_class(class_id).await {
        Ok(true) => {
            invalidate_class_cache(request, class_id).await;
            // 数据库记录已删除，附件目录尽力清理
            let dir = class_upload_dir(class_id);
            if let Err(e) = tokio::fs::remove_dir_all(&dir).await
                && e.kind() != std::io::ErrorKind::NotFound
            {
                warn!("Failed to remove upload dir {}: {}", dir.display(), e);
            }
            info!("Class {} deleted by user {}", class_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Class deleted")))
        }
        Ok(false) => Ok(error_json(
            StatusCode::NOT_FOUND,
            ErrorCode::ClassNotFound,
            "Class not found",
        )),
        Err(e) => Ok(storage_error("Failed to delete class", e)),
    }
}
