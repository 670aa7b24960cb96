use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::UploadConfig;
use crate::models::class_members::entities::{ClassMember, ClassMemberRole};
use crate::models::users::entities::User;

/// 班级附件设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassSettings {
    pub allow_uploads: bool,
    /// 单个附件的最大字节数
    pub max_file_size: i64,
    /// 允许的扩展名，含点号，如 ".pdf"
    pub allowed_file_types: Vec<String>,
}

impl ClassSettings {
    /// 以全局上传配置作为新班级的默认设置
    pub fn from_upload_config(upload: &UploadConfig) -> Self {
        Self {
            allow_uploads: true,
            max_file_size: upload.max_size as i64,
            allowed_file_types: upload.allowed_types.clone(),
        }
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_file_types
            .iter()
            .any(|t| t.to_lowercase() == extension)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 6 位邀请码，创建后不可修改
    pub code: String,
    pub creator_id: i64,
    pub settings: ClassSettings,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 用户是否在成员列表中
pub fn is_member(members: &[ClassMember], user_id: i64) -> bool {
    members.iter().any(|m| m.user_id == user_id)
}

/// 用户是否以教师身份在成员列表中
pub fn is_teacher_of(members: &[ClassMember], user_id: i64) -> bool {
    members
        .iter()
        .any(|m| m.user_id == user_id && m.role == ClassMemberRole::Teacher)
}

/// 班级及其完整成员列表，权限判断都基于此结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassWithMembers {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub members: Vec<ClassMember>,
}

impl ClassWithMembers {
    pub fn member(&self, user_id: i64) -> Option<&ClassMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn is_member(&self, user_id: i64) -> bool {
        is_member(&self.members, user_id)
    }

    pub fn is_teacher_of(&self, user_id: i64) -> bool {
        is_teacher_of(&self.members, user_id)
    }

    pub fn is_creator(&self, user_id: i64) -> bool {
        self.class.creator_id == user_id
    }

    /// 可以查看班级内容：成员或管理员
    pub fn can_view(&self, user: &User) -> bool {
        self.is_member(user.id) || user.is_admin()
    }

    /// 班级管理（设置、成员、置顶）：班级教师或管理员
    pub fn can_administer(&self, user: &User) -> bool {
        self.is_teacher_of(user.id) || user.is_admin()
    }

    /// 修改或删除帖子：作者、班级教师或管理员
    pub fn can_edit_post(&self, user: &User, author_id: i64) -> bool {
        user.id == author_id || self.can_administer(user)
    }

    /// 删除班级：创建者或管理员
    pub fn can_delete(&self, user: &User) -> bool {
        self.is_creator(user.id) || user.is_admin()
    }
}

#[cfg(test)]
pub(crate) fn sample_class(creator_id: i64, members: &[(i64, ClassMemberRole)]) -> ClassWithMembers {
    let now = chrono::Utc::now();
    ClassWithMembers {
        class: Class {
            id: 1,
            name: "Algebra I".into(),
            description: None,
            code: "AB12CD".into(),
            creator_id,
            settings: ClassSettings {
                allow_uploads: true,
                max_file_size: 1024,
                allowed_file_types: vec![".pdf".into()],
            },
            created_at: now,
            updated_at: now,
        },
        members: members
            .iter()
            .enumerate()
            .map(|(i, (user_id, role))| ClassMember {
                id: i as i64 + 1,
                class_id: 1,
                user_id: *user_id,
                role: role.clone(),
                joined_at: now,
            })
            .collect(),
    }
}
