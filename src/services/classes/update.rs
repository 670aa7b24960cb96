use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::ClassService;
use crate::config::AppConfig;
use crate::models::classes::requests::{ClassUpdate, UpdateClassRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_class, error_json, invalidate_class_cache, storage_error};
use crate::utils::validate::validate_class_name;

/// 修改班级名称、简介与附件设置，邀请码不可修改
pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let class = try_response!(current_class(request));
    let class_id = class.class.id;

    let name = update_data.name.map(|n| n.trim().to_string());
    if let Some(ref name) = name
        && let Err(msg) = validate_class_name(name)
    {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::ClassNameInvalid, msg));
    }

    let settings = match update_data.settings {
        Some(patch) => {
            let global_max = AppConfig::get().upload.max_size as i64;
            match patch.apply(class.class.settings.clone(), global_max) {
                Ok(settings) => Some(settings),
                Err(msg) => {
                    return Ok(error_json(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::ClassSettingsInvalid,
                        msg,
                    ));
                }
            }
        }
        None => None,
    };

    let update = ClassUpdate {
        name,
        description: update_data.description.map(|d| d.trim().to_string()),
        settings,
    };

    match storage.update_class(class_id, update).await {
        Ok(Some(updated)) => {
            invalidate_class_cache(request, class_id).await;
            info!("Class {} updated", class_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Class updated")))
        }
        Ok(None) => Ok(error_json(
            StatusCode::NOT_FOUND,
            ErrorCode::ClassNotFound,
            "Class not found",
        )),
        Err(e) => Ok(storage_error("Failed to update class", e)),
    }
}
