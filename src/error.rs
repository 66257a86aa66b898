//! # 统一错误处理模块
//!
//! 定义 ecvasp 的所有错误类型，使用 `thiserror` 派生。
//! 每个变体对应一个独立的进程退出码，见 [`EcvaspError::exit_code`]。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// ecvasp 统一错误类型
#[derive(Error, Debug)]
pub enum EcvaspError {
    // ─────────────────────────────────────────────────────────────
    // 结构文件错误
    // ─────────────────────────────────────────────────────────────
    #[error("File {path} not found!")]
    FileNotFound { path: String },

    #[error("No atom is identified in file: {path}")]
    NoAtoms { path: String },

    #[error(
        "The positions read from {path} are in cartesian coordinate, \
         while fractional/direct is expected!"
    )]
    CartesianCoordinates { path: String },

    #[error("Failed to parse POSCAR file: {path} (line {line})\nReason: {reason}")]
    ParseError {
        path: String,
        line: usize,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open file {path} for writing")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl EcvaspError {
    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            EcvaspError::FileNotFound { .. } => 1,
            EcvaspError::NoAtoms { .. } => 2,
            EcvaspError::CartesianCoordinates { .. } => 3,
            EcvaspError::ParseError { .. } => 4,
            EcvaspError::FileReadError { .. } | EcvaspError::FileWriteError { .. } => 5,
        }
    }

    pub(crate) fn parse(path: &str, line: usize, reason: impl Into<String>) -> Self {
        EcvaspError::ParseError {
            path: path.to_string(),
            line,
            reason: reason.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, EcvaspError>;
