pub mod answers;
pub mod auth;
pub mod class_members;
pub mod classes;
pub mod common;
pub mod files;
pub mod questions;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery, VoteKind,
    VoteLedger, page_bounds,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
