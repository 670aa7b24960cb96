use serde::Deserialize;
use ts_rs::TS;

// 个人资料更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

// 存储层使用的用户更新数据
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

// 存储层使用的用户创建数据
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: super::entities::UserRole,
    pub display_name: Option<String>,
}
