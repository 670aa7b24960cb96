use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::ClassService;
use crate::config::AppConfig;
use crate::errors::ClassQAError;
use crate::models::classes::entities::ClassSettings;
use crate::models::classes::requests::{CreateClass, CreateClassRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_json, storage_error};
use crate::utils::validate::validate_class_name;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let config = AppConfig::get();

    // 只有全局教师或管理员可以创建班级
    if !user.has_global_role(UserRole::teacher_roles()) {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::ClassPermissionDenied,
            "Only teachers can create classes",
        ));
    }

    let name = class_data.name.trim().to_string();
    if let Err(msg) = validate_class_name(&name) {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::ClassNameInvalid, msg));
    }

    let defaults = ClassSettings::from_upload_config(&config.upload);
    let settings = match class_data.settings {
        Some(patch) => match patch.apply(defaults, config.upload.max_size as i64) {
            Ok(settings) => settings,
            Err(msg) => {
                return Ok(error_json(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ClassSettingsInvalid,
                    msg,
                ));
            }
        },
        None => defaults,
    };

    let create = CreateClass {
        creator_id: user.id,
        name,
        description: class_data
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        settings,
    };

    match storage
        .create_class(create, config.class.code_max_attempts)
        .await
    {
        Ok(class) => {
            info!(
                "Class {} ({}) created by user {}",
                class.class.id, class.class.code, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created")))
        }
        Err(ClassQAError::CodeAllocation(msg)) => Ok(error_json(
            StatusCode::CONFLICT,
            ErrorCode::ClassCodeExhausted,
            msg,
        )),
        Err(e) => Ok(storage_error("Failed to create class", e)),
    }
}
