use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 帖子中嵌入的附件快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileMeta {
    pub token: String,
    pub name: String,
    pub size: i64,
    pub content_type: String,
    /// 下载路径
    pub path: String,
}

/// 已上传文件的存储记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct StoredFile {
    pub token: String,
    pub class_id: i64,
    pub uploader_id: i64,
    pub original_name: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 存储层使用的文件创建数据
#[derive(Debug, Clone)]
pub struct CreateFile {
    pub token: String,
    pub class_id: i64,
    pub uploader_id: i64,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub content_type: String,
}

impl StoredFile {
    pub fn download_path(&self) -> String {
        format!("/api/v1/classes/{}/files/{}", self.class_id, self.token)
    }

    pub fn to_meta(&self) -> FileMeta {
        FileMeta {
            token: self.token.clone(),
            name: self.original_name.clone(),
            size: self.file_size,
            content_type: self.content_type.clone(),
            path: self.download_path(),
        }
    }
}
