use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::ClassService;
use crate::errors::ClassQAError;
use crate::models::class_members::entities::ClassMemberRole;
use crate::models::classes::requests::JoinClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_json, invalidate_class_cache, storage_error};
use crate::utils::random_code::{is_valid_class_code, normalize_class_code};

pub async fn join_class(
    service: &ClassService,
    request: &HttpRequest,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));

    let code = normalize_class_code(&join_data.code);
    if !is_valid_class_code(&code) {
        return Ok(error_json(
            StatusCode::BAD_REQUEST,
            ErrorCode::ClassCodeInvalid,
            "Class code must be 6 letters or digits",
        ));
    }

    let class = match storage.get_class_by_code(&code).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(error_json(
                StatusCode::NOT_FOUND,
                ErrorCode::ClassNotFound,
                "No class with this code",
            ));
        }
        Err(e) => return Ok(storage_error("Failed to look up class code", e)),
    };

    // 通过邀请码加入的都是学生，唯一索引拒绝重复加入
    match storage
        .add_class_member(class.id, user.id, ClassMemberRole::Student)
        .await
    {
        Ok(member) => {
            invalidate_class_cache(request, class.id).await;
            info!("User {} joined class {}", user.id, class.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(member, "Joined class")))
        }
        Err(ClassQAError::Conflict(_)) => Ok(error_json(
            StatusCode::CONFLICT,
            ErrorCode::ClassAlreadyJoined,
            "Already a member of this class",
        )),
        Err(e) => Ok(storage_error("Failed to join class", e)),
    }
}
