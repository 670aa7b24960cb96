//! argon2id 密码哈希

use crate::config::{AppConfig, Argon2Config};
use crate::errors::ClassQAError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

fn argon2_from(config: &Argon2Config) -> Result<Argon2<'static>, ClassQAError> {
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| ClassQAError::validation(format!("Argon2 参数错误: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 使用配置中的参数哈希密码，结果为 PHC 字符串
pub fn hash_password(password: &str) -> Result<String, ClassQAError> {
    let argon2 = argon2_from(&AppConfig::get().argon2)?;
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ClassQAError::validation(format!("密码哈希失败: {e}")))
}

/// 验证密码，参数从哈希串本身读取，配置调整后旧哈希仍可验证
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
