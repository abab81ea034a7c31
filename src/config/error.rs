// ==========================================
// LLD 配置生成工具 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误 ({path}): {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("未配置 LLD 文件: 请在 settings.yaml 中设置 LLD_FILE_NAME 或 LLD_FILE")]
    MissingLldFile,

    #[error("配置项取值非法: {0}")]
    InvalidValue(String),
}

impl ConfigError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn yaml(path: &std::path::Path, source: serde_yaml::Error) -> Self {
        ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
