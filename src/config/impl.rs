use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 仓库自带的占位密钥，生产环境禁止使用
const PLACEHOLDER_JWT_SECRET: &str = "change-me-in-production";

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // 默认配置文件
            .add_source(File::with_name("config").required(false))
            // 环境特定配置文件
            .add_source(File::with_name(&format!("config.{app_env}")).required(false))
            // CLASSQA_SERVER__PORT 形式的环境变量
            .add_source(
                Environment::with_prefix("CLASSQA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // 常用的独立环境变量
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option("upload.dir", std::env::var("UPLOAD_DIR").ok())?
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.normalize();
        app_config.validate()?;
        Ok(app_config)
    }

    /// 填充自动值并修正越界设置
    fn normalize(&mut self) {
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers.max(1));
        }

        self.class.code_max_attempts = self.class.code_max_attempts.max(1);
        self.upload.max_files_per_post = self.upload.max_files_per_post.max(1);

        // 扩展名统一为小写并带点号
        self.upload.allowed_types = self
            .upload
            .allowed_types
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .map(|t| if t.starts_with('.') { t } else { format!(".{t}") })
            .collect();
        self.upload.allowed_types.sort();
        self.upload.allowed_types.dedup();
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.is_production() && self.jwt.secret == PLACEHOLDER_JWT_SECRET {
            return Err(ConfigError::Message(
                "jwt.secret must be overridden in production (JWT_SECRET)".into(),
            ));
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::Message("jwt expiries must be positive".into()));
        }
        if self.upload.max_size == 0 {
            return Err(ConfigError::Message("upload.max_size must be positive".into()));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Unix 套接字路径，未配置时为 None
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_upload_types() {
        let mut config = AppConfig::get().clone();
        config.upload.allowed_types = vec!["PDF".into(), ".pdf".into(), " .Png ".into(), "".into()];
        config.class.code_max_attempts = 0;
        config.normalize();

        assert_eq!(config.upload.allowed_types, vec![".pdf", ".png"]);
        assert_eq!(config.class.code_max_attempts, 1);
        assert!(config.server.workers >= 1);
    }

    #[test]
    fn test_placeholder_secret_rejected_in_production() {
        let mut config = AppConfig::get().clone();
        config.jwt.secret = PLACEHOLDER_JWT_SECRET.into();
        config.app.environment = "development".into();
        assert!(config.validate().is_ok());

        config.app.environment = "production".into();
        assert!(config.validate().is_err());

        config.jwt.secret = "a-real-secret".into();
        assert!(config.validate().is_ok());
    }
}
