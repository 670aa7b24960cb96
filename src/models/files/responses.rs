use serde::Serialize;
use ts_rs::TS;

use super::entities::FileMeta;

/// 上传成功后返回的附件信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileUploadResponse {
    pub file: FileMeta,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}
