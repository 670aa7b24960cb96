use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::ClassSettings;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 班级设置的部分更新
#[derive(Debug, Default, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassSettingsPatch {
    pub allow_uploads: Option<bool>,
    pub max_file_size: Option<i64>,
    pub allowed_file_types: Option<Vec<String>>,
}

// 创建班级请求
impl ClassSettingsPatch {
    /// 在现有设置上应用修改
    ///
    /// 单文件上限必须在 1 到全局上限之间，扩展名统一为带点的小写形式。
    pub fn apply(self, base: ClassSettings, global_max_size: i64) -> Result<ClassSettings, String> {
        let mut settings = base;

        if let Some(allow) = self.allow_uploads {
            settings.allow_uploads = allow;
        }

        if let Some(size) = self.max_file_size {
            if size <= 0 || size > global_max_size {
                return Err(format!(
                    "max_file_size must be between 1 and {global_max_size} bytes"
                ));
            }
            settings.max_file_size = size;
        }

        if let Some(types) = self.allowed_file_types {
            let mut normalized: Vec<String> = Vec::with_capacity(types.len());
            for t in types {
                let t = t.trim().to_lowercase();
                let t = if t.starts_with('.') { t } else { format!(".{t}") };
                if t.len() < 2 || !t[1..].chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(format!("Invalid file extension: '{t}'"));
                }
                if !normalized.contains(&t) {
                    normalized.push(t);
                }
            }
            settings.allowed_file_types = normalized;
        }

        Ok(settings)
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub description: Option<String>,
    pub settings: Option<ClassSettingsPatch>,
}

// 更新班级请求，邀请码不可修改
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub settings: Option<ClassSettingsPatch>,
}

// 加入班级请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct JoinClassRequest {
    pub code: String,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// 仅列出该用户所在的班级，None 表示全部
    pub member_id: Option<i64>,
    pub search: Option<String>,
}

// 存储层使用的班级创建数据
#[derive(Debug, Clone)]
pub struct CreateClass {
    pub creator_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub settings: super::entities::ClassSettings,
}

// 存储层使用的班级更新数据，设置已与现有值合并
#[derive(Debug, Clone, Default)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub settings: Option<super::entities::ClassSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ClassSettings {
        ClassSettings {
            allow_uploads: true,
            max_file_size: 1024,
            allowed_file_types: vec![".pdf".into()],
        }
    }

    #[test]
    fn test_empty_patch_keeps_settings() {
        let settings = ClassSettingsPatch::default().apply(base(), 4096).unwrap();
        assert_eq!(settings, base());
    }

    #[test]
    fn test_patch_normalizes_extensions() {
        let patch = ClassSettingsPatch {
            allow_uploads: Some(false),
            max_file_size: Some(2048),
            allowed_file_types: Some(vec!["PNG".into(), ".png".into(), " .Md ".into()]),
        };
        let settings = patch.apply(base(), 4096).unwrap();
        assert!(!settings.allow_uploads);
        assert_eq!(settings.max_file_size, 2048);
        assert_eq!(settings.allowed_file_types, vec![".png", ".md"]);
    }

    #[test]
    fn test_patch_rejects_bad_values() {
        let too_big = ClassSettingsPatch {
            max_file_size: Some(8192),
            ..Default::default()
        };
        assert!(too_big.apply(base(), 4096).is_err());

        let bad_ext = ClassSettingsPatch {
            allowed_file_types: Some(vec!["../exe".into()]),
            ..Default::default()
        };
        assert!(bad_ext.apply(base(), 4096).is_err());
    }
}
