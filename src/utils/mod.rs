//! # 工具函数模块
//!
//! 提供美化输出和数字格式化工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `elastic/` 模块使用
//! - 子模块: format, output

pub mod format;
pub mod output;
