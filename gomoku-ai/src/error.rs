//! AI 错误类型

use thiserror::Error;

/// AI 引擎错误
#[derive(Error, Debug)]
pub enum AiError {
    /// 无效的棋型
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// 无效的配置
    #[error("Invalid AI config: {reason}")]
    InvalidConfig { reason: String },

    /// 配置 JSON 解析错误
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// AI 操作结果类型
pub type Result<T> = std::result::Result<T, AiError>;
