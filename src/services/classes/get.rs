use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::services::current_class;

// 班级已由 RequireClassMember 加载并完成权限判定
pub async fn get_class(_service: &ClassService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let class = try_response!(current_class(request));
    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class retrieved successfully")))
}
