//! # ecvasp - 弹性常数计算脚本生成器
//!
//! 读取 VASP POSCAR（分数坐标），生成一个 bash 脚本：对六个独立应变分量
//! 各施加正负应变，运行 VASP，从 OUTCAR 提取应力，用有限差分得到 6x6 弹性常数矩阵。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (POSCAR 读写)
//!   │     ├── elastic/   (应变、形变矩阵、脚本生成)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

pub mod cli;
pub mod commands;
pub mod elastic;
pub mod error;
pub mod models;
pub mod parsers;
pub mod utils;
