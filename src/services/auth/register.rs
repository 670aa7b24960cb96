use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::ClassQAError;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::RegisterRequest,
    users::{entities::UserRole, requests::CreateUser, responses::UserResponse},
};
use crate::services::{error_json, internal_error, storage_error};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));

    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_lowercase();

    // 1. 格式校验
    if let Err(msg) = validate_username(&username) {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&email) {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password_simple(&register_request.password) {
        return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::UserPasswordInvalid, msg));
    }

    // 2. 只允许自选学生或教师
    let role = register_request.role.unwrap_or(UserRole::Student);
    if !UserRole::self_register_roles().contains(&&role) {
        return Ok(error_json(
            StatusCode::BAD_REQUEST,
            ErrorCode::UserRoleInvalid,
            "Only student or teacher can be chosen at registration",
        ));
    }

    // 3. 唯一性检查，数据库唯一索引兜底
    try_response!(check_username_available(&storage, &username).await);
    try_response!(check_email_available(&storage, &email).await);

    // 4. 哈希密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return Ok(internal_error());
        }
    };

    // 5. 创建用户
    let create = CreateUser {
        username,
        email,
        password_hash,
        role,
        display_name: register_request
            .display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    };

    match storage.create_user(create).await {
        Ok(user) => {
            info!("User {} registered as {}", user.username, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "Registration successful",
            )))
        }
        Err(ClassQAError::Conflict(msg)) => Ok(error_json(
            StatusCode::CONFLICT,
            ErrorCode::UserNameAlreadyExists,
            msg,
        )),
        Err(e) => Ok(storage_error("Register failed", e)),
    }
}

async fn check_username_available(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(error_json(
            StatusCode::CONFLICT,
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        )),
        Ok(None) => Ok(()),
        Err(e) => Err(storage_error("Register failed", e)),
    }
}

async fn check_email_available(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(error_json(
            StatusCode::CONFLICT,
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        )),
        Ok(None) => Ok(()),
        Err(e) => Err(storage_error("Register failed", e)),
    }
}
