//! Configuration loading and structures.
//!
//! 配置加载优先级（从高到低）：
//! 1. 环境变量（`DRAFTPILOT__*` 前缀，双下划线表示嵌套）
//!    - 例如：`DRAFTPILOT__SERVER__PORT=9000`
//! 2. 配置文件（`--config` 指定的 TOML 文件）
//! 3. 默认值（来自 structs.rs 的 Default trait 和 serde(default) 属性）

mod structs;

pub use structs::{AppConfig, LimitsConfig, NetworkConfig, ServerConfig};

use std::path::Path;

use config::{Config, Environment, File};

use crate::error::Result;

/// 加载应用配置
///
/// `config_path` 为 `None` 时只使用环境变量与默认值。
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path
        && path.exists()
    {
        builder = builder.add_source(File::from(path));
    }

    // 双下划线作为嵌套层级分隔符，避免与字段名中的单下划线冲突
    builder = builder.add_source(
        Environment::with_prefix("DRAFTPILOT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.network.request_timeout, 120);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join("draftpilot-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nhost = \"0.0.0.0\"\nport = 9001\n\n[limits]\nmax_input_chars = 600"
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.bind_address(), "0.0.0.0:9001");
        assert_eq!(config.limits.max_input_chars, 600);
        // untouched sections keep their defaults
        assert_eq!(config.network.connect_timeout, 10);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let config = load_config(Some(Path::new("/nonexistent/draftpilot.toml"))).unwrap();
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let dir = std::env::temp_dir().join("draftpilot-config-test-invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            "[limits]\nmax_reference_prompt_chars = 9000\nmax_reference_pool_chars = 100\n",
        )
        .unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
