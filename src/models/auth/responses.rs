use crate::config::AppConfig;
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

const TOKEN_TYPE: &str = "Bearer";

/// access token 的有效秒数
fn access_token_ttl_secs() -> i64 {
    AppConfig::get().jwt.access_token_expiry * 60
}

// 登录成功，refresh token 只通过 Cookie 下发
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

impl LoginResponse {
    pub fn new(access_token: String, user: User) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: access_token_ttl_secs(),
            user,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl RefreshTokenResponse {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: access_token_ttl_secs(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TokenVerificationResponse {
    pub is_valid: bool,
}
