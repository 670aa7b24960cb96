use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info};

use crate::cache;
use crate::errors::ClassQAError;
use crate::models::users::requests::{UpdateProfileRequest, UserUpdate};
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{app_cache, current_user, error_json, internal_error, storage_error};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

use super::AuthService;

const MAX_DISPLAY_NAME_CHARS: usize = 50;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = try_response!(service.get_storage(request));
    let current_user = try_response!(current_user(request));

    let display_name = update_data.display_name.map(|n| n.trim().to_string());
    if let Some(ref name) = display_name
        && name.chars().count() > MAX_DISPLAY_NAME_CHARS
    {
        return Ok(error_json(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Display name is too long",
        ));
    }

    // 新邮箱需要格式正确且未被他人使用
    let email = update_data.email.map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email {
        if let Err(msg) = validate_email(email) {
            return Ok(error_json(StatusCode::BAD_REQUEST, ErrorCode::UserEmailInvalid, msg));
        }
        match storage.get_user_by_email(email).await {
            Ok(Some(existing)) if existing.id != current_user.id => {
                return Ok(error_json(
                    StatusCode::CONFLICT,
                    ErrorCode::UserEmailAlreadyExists,
                    "Email already in use",
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_error("Email lookup failed", e)),
        }
    }

    let password_hash = match update_data.password {
        Some(ref password) => {
            if let Err(msg) = validate_password_simple(password) {
                return Ok(error_json(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::UserPasswordInvalid,
                    msg,
                ));
            }
            match hash_password(password) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    error!("Password hashing failed: {}", e);
                    return Ok(internal_error());
                }
            }
        }
        None => None,
    };

    let update = UserUpdate {
        display_name,
        avatar_url: update_data.avatar_url,
        email,
        password_hash,
    };

    match storage.update_user(current_user.id, update).await {
        Ok(Some(user)) => {
            // 当前令牌对应的缓存用户已过时
            if let Some(cache) = app_cache(request)
                && let Some(token) = bearer_token(request)
            {
                cache.remove(&cache::user_token_key(token)).await;
            }
            info!("User {} updated profile", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated",
            )))
        }
        Ok(None) => Ok(error_json(
            StatusCode::NOT_FOUND,
            ErrorCode::UserNotFound,
            "User not found",
        )),
        Err(ClassQAError::Conflict(msg)) => Ok(error_json(
            StatusCode::CONFLICT,
            ErrorCode::UserEmailAlreadyExists,
            msg,
        )),
        Err(e) => Ok(storage_error("Profile update failed", e)),
    }
}

fn bearer_token(request: &HttpRequest) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}
