use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 班级内角色，与账户全局角色相互独立
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/class-member.ts")]
pub enum ClassMemberRole {
    Student, // 学生
    Teacher, // 教师
}

impl ClassMemberRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
}

impl<'de> Deserialize<'de> for ClassMemberRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的班级成员角色: '{s}'. 支持的角色: student, teacher"
            ))
        })
    }
}

impl std::fmt::Display for ClassMemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassMemberRole::Student => write!(f, "{}", ClassMemberRole::STUDENT),
            ClassMemberRole::Teacher => write!(f, "{}", ClassMemberRole::TEACHER),
        }
    }
}

impl std::str::FromStr for ClassMemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ClassMemberRole::STUDENT => Ok(ClassMemberRole::Student),
            ClassMemberRole::TEACHER => Ok(ClassMemberRole::Teacher),
            _ => Err(format!("Invalid class member role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-member.ts")]
pub struct ClassMember {
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub role: ClassMemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// 成员及其用户名片
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-member.ts")]
pub struct ClassMemberProfile {
    #[serde(flatten)]
    #[ts(flatten)]
    pub member: ClassMember,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
