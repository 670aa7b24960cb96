/// 将 `Result<T, HttpResponse>` 展开，错误时直接返回响应
macro_rules! try_response {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}

pub mod answers;
pub mod auth;
pub mod class_members;
pub mod classes;
pub mod files;
pub mod questions;

pub use answers::AnswerService;
pub use auth::AuthService;
pub use class_members::ClassMemberService;
pub use classes::ClassService;
pub use files::FileService;
pub use questions::QuestionService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use std::sync::Arc;
use tracing::{debug, error};

use crate::cache::{self, ObjectCache};
use crate::errors::ClassQAError;
use crate::middlewares::{RequireClassMember, RequireJWT};
use crate::models::{
    ApiResponse, ErrorCode, classes::entities::ClassWithMembers, users::entities::User,
};
use crate::storage::Storage;

/// 从应用数据中取出存储
pub(crate) fn app_storage(request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            internal_error()
        })
}

/// 从应用数据中取出缓存，未注册时返回 None
pub(crate) fn app_cache(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 构造 JSON 错误响应
pub(crate) fn error_json(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

/// 500 响应，细节只写日志
pub(crate) fn internal_error() -> HttpResponse {
    error_json(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::InternalServerError,
        "Internal server error",
    )
}

/// 将存储层错误转换为响应
pub(crate) fn storage_error(context: &str, err: ClassQAError) -> HttpResponse {
    match err {
        ClassQAError::Conflict(msg) => error_json(StatusCode::CONFLICT, ErrorCode::Conflict, msg),
        ClassQAError::CodeAllocation(msg) => {
            error!("{}: {}", context, msg);
            error_json(StatusCode::CONFLICT, ErrorCode::ClassCodeExhausted, msg)
        }
        ClassQAError::NotFound(msg) => error_json(StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
        ClassQAError::Validation(msg) => {
            error_json(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg)
        }
        ClassQAError::Authorization(msg) => {
            error_json(StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg)
        }
        other => {
            error!("{}: {}", context, other);
            internal_error()
        }
    }
}

/// 当前登录用户，缺失时返回 401
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        error_json(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )
    })
}

/// 由 RequireClassMember 加载的班级
pub(crate) fn current_class(request: &HttpRequest) -> Result<ClassWithMembers, HttpResponse> {
    RequireClassMember::extract_class(request).ok_or_else(|| {
        error!("Class not loaded for {}", request.path());
        internal_error()
    })
}

/// 班级成员或设置变化后清除缓存
pub(crate) async fn invalidate_class_cache(request: &HttpRequest, class_id: i64) {
    if let Some(cache) = app_cache(request) {
        debug!("Invalidating cached class {}", class_id);
        cache.remove(&cache::class_key(class_id)).await;
    }
}

