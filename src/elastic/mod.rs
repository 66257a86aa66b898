//! # 弹性常数模块
//!
//! 有限差分法计算弹性常数所需的应变构型与脚本生成。
//!
//! ## 子模块
//! - `strain`: 应变分量、默认值与形变矩阵
//! - `tensor`: 21 个独立弹性常数的组合规则
//! - `script`: bash 脚本生成
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 和 `cli/mod.rs` 使用
//! - 使用 `models/structure.rs`, `parsers/poscar.rs`

pub mod script;
pub mod strain;
pub mod tensor;

pub use script::{render_script, ScriptOptions};
pub use strain::{Distortion, Sign, StrainComponent, StrainSet};
pub use tensor::ElasticConstants;
