//! 班级邀请码生成与分配
//!
//! 邀请码为 6 位大写字母或数字。分配时依赖数据库唯一索引判断冲突，
//! 冲突后重新生成，超过尝试次数则返回 `CodeAllocation` 错误。

use std::future::Future;

use rand::Rng;
use tracing::{debug, warn};

use crate::errors::{ClassQAError, Result};

/// 邀请码字符集
pub const CLASS_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 邀请码长度
pub const CLASS_CODE_LENGTH: usize = 6;

/// 默认最大尝试次数
pub const DEFAULT_CODE_MAX_ATTEMPTS: usize = 10;

/// 生成指定长度的随机码，每个字符从字符集中均匀抽取
pub fn generate_random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CLASS_CODE_CHARSET.len());
            CLASS_CODE_CHARSET[idx] as char
        })
        .collect()
}

/// 生成一个班级邀请码
pub fn generate_class_code() -> String {
    generate_random_code(CLASS_CODE_LENGTH)
}

/// 校验邀请码格式
pub fn is_valid_class_code(code: &str) -> bool {
    code.len() == CLASS_CODE_LENGTH && code.bytes().all(|b| CLASS_CODE_CHARSET.contains(&b))
}

/// 规范化用户输入的邀请码（去除空白并转为大写）
pub fn normalize_class_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// 单次分配尝试的结果
#[derive(Debug)]
pub enum CodeAttempt<T> {
    /// 邀请码可用，记录已写入
    Accepted(T),
    /// 邀请码已被占用
    Collision,
}

/// 有界重试地分配唯一邀请码
///
/// `try_code` 接收候选码并尝试写入存储，由存储层的唯一约束判定冲突。
/// 其他错误直接向上返回，不计入重试。
pub async fn allocate_unique_code<T, F, Fut>(max_attempts: usize, mut try_code: F) -> Result<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<CodeAttempt<T>>>,
{
    for attempt in 1..=max_attempts {
        let code = generate_class_code();
        match try_code(code.clone()).await? {
            CodeAttempt::Accepted(value) => {
                debug!("Class code {} allocated on attempt {}", code, attempt);
                return Ok(value);
            }
            CodeAttempt::Collision => {
                warn!(
                    "Class code collision on attempt {}/{}: {}",
                    attempt, max_attempts, code
                );
            }
        }
    }

    Err(ClassQAError::code_allocation(format!(
        "Failed to allocate a unique class code after {max_attempts} attempts"
    )))
}
