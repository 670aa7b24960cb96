use serde::Serialize;
use ts_rs::TS;

use super::entities::ClassMemberProfile;

/// 班级成员列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-member.ts")]
pub struct ClassMemberListResponse {
    pub items: Vec<ClassMemberProfile>,
}
