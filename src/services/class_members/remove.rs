use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::ClassMemberService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    current_class, current_user, error_json, invalidate_class_cache, storage_error,
};

/// 班级教师移除成员，或成员自行退出；创建者不能被移除
pub async fn remove_member(
    service: &ClassMemberService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let user = try_response!(current_user(request));
    let class = try_response!(current_class(request));
    let class_id = class.class.id;

    if user.id != user_id && !class.can_administer(&user) {
        return Ok(error_json(
            StatusCode::FORBIDDEN,
            ErrorCode::ClassPermissionDenied,
            "Only class teachers can remove other members",
        ));
    }

    if class.is_creator(user_id) {
        return Ok(error_json(
            StatusCode::BAD_REQUEST,
            ErrorCode::ClassCreatorCannotLeave,
            "The class creator cannot leave or be removed",
        ));
    }

    if !class.is_member(user_id) {
        return Ok(error_json(
            StatusCode::NOT_FOUND,
            ErrorCode::ClassMemberNotFound,
            "User is not a member of this class",
        ));
    }

    match storage.remove_class_member(class_id, user_id).await {
        Ok(true) => {
            invalidate_class_cache(request, class_id).await;
            info!("User {} removed from class {} by {}", user_id, class_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty("Member removed")))
        }
        Ok(false) => Ok(error_json(
            StatusCode::NOT_FOUND,
            ErrorCode::ClassMemberNotFound,
            "User is not a member of this class",
        )),
        Err(e) => Ok(storage_error("Failed to remove class member", e)),
    }
}
