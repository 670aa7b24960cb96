use super::entities::Class;
use crate::models::common::PaginatedResponse;

/// 班级列表，按创建时间倒序
pub type ClassListResponse = PaginatedResponse<Class>;
