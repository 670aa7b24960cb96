use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassMemberService;
use crate::models::ApiResponse;
use crate::models::class_members::responses::ClassMemberListResponse;
use crate::services::{current_class, storage_error};

pub async fn list_members(
    service: &ClassMemberService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let class = try_response!(current_class(request));

    match storage.list_class_member_profiles(class.class.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassMemberListResponse { items },
            "Members retrieved successfully",
        ))),
        Err(e) => Ok(storage_error("Failed to list class members", e)),
    }
}
