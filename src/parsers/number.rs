//! # 数值字段解析策略
//!
//! POSCAR 中的数值字段有两种读取方式：
//! - `Strict`（默认）：任何无法解析的数字都是错误
//! - `Lenient`：兼容旧工具的宽松行为，取 token 的最长数字前缀，
//!   没有数字前缀时取 0（与 C 的 `atof`/`atoi` 一致）
//!
//! ## 依赖关系
//! - 被 `parsers/poscar.rs` 使用
//! - 使用 `regex` crate

use regex::Regex;
use std::sync::LazyLock;

static FLOAT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

static INT_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?\d+").unwrap());

/// 数值解析策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPolicy {
    #[default]
    Strict,
    Lenient,
}

impl NumberPolicy {
    /// 解析浮点数；`token` 为 None 表示该行字段不足
    pub fn parse_f64(self, token: Option<&str>) -> Result<f64, String> {
        match (self, token) {
            (NumberPolicy::Strict, None) => Err("missing numeric field".to_string()),
            (NumberPolicy::Strict, Some(tok)) => tok
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid number '{}'", tok)),
            (NumberPolicy::Lenient, None) => Ok(0.0),
            (NumberPolicy::Lenient, Some(tok)) => Ok(leading_float(tok)),
        }
    }

    /// 解析原子数
    pub fn parse_count(self, token: &str) -> Result<usize, String> {
        match self {
            NumberPolicy::Strict => token
                .parse::<usize>()
                .map_err(|_| format!("invalid atom count '{}'", token)),
            NumberPolicy::Lenient => Ok(leading_int(token).max(0) as usize),
        }
    }
}

/// 取最长的浮点数前缀，没有则为 0
pub fn leading_float(token: &str) -> f64 {
    FLOAT_PREFIX
        .find(token.trim_start())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// 取最长的整数前缀，没有则为 0
pub fn leading_int(token: &str) -> i64 {
    INT_PREFIX
        .find(token.trim_start())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
