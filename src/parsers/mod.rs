//! # 解析器模块
//!
//! 提供 VASP POSCAR 结构文件的读写，以及数值字段的解析策略。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `elastic/script.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: number, poscar

pub mod number;
pub mod poscar;

pub use number::NumberPolicy;
