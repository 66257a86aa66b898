//! # 数据模型模块
//!
//! 定义 POSCAR 结构和晶格的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `elastic/` 和 `commands/` 使用
//! - 子模块: structure

pub mod structure;

pub use structure::{Lattice, Matrix3, Structure};
