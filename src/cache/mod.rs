//! 对象缓存
//!
//! 缓存后端以插件形式在加载时注册（见 [`declare_object_cache_plugin!`]），
//! 启动时按 `cache.type` 配置选择。值统一以 JSON 字符串存储。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// 登录用户缓存键，按 access token 区分
pub fn user_token_key(token: &str) -> String {
    format!("user:{token}")
}

/// 班级及成员列表缓存键
pub fn class_key(class_id: i64) -> String {
    format!("class:{class_id}")
}

/// 读取并反序列化缓存值，损坏的条目会被移除
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Dropping undecodable cache entry {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        CacheResult::NotFound | CacheResult::ExistsButNoValue => None,
    }
}

/// 序列化并写入缓存，ttl 为 0 时使用后端默认值
pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key, json, ttl).await,
        Err(e) => debug!("Skip caching {}: {}", key, e),
    }
}

/// 在加载时注册缓存插件
///
/// 插件类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $plugin:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$plugin>::new()
                            .map_err($crate::errors::ClassQAError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
