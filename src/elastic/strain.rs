//! # 应变分量与形变矩阵
//!
//! 六个独立应变分量按 Voigt 顺序编号：xx(1), yy(2), zz(3), yz(4), xz(5), xy(6)。
//! 每个分量分别施加正负两个方向的应变，共 12 个形变构型。
//!
//! ## 依赖关系
//! - 被 `elastic/script.rs`, `cli/mod.rs`, `commands/generate.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::{Lattice, Matrix3};

/// 默认应变
pub const DEFAULT_STRAIN: f64 = 0.008;

/// 切应变相对正应变的倍数
pub const SHEAR_FACTOR: f64 = 1.6;

/// 小于该值的应变视为未设置
pub const ZERO: f64 = 1.0e-10;

/// 独立应变分量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrainComponent {
    Xx,
    Yy,
    Zz,
    Yz,
    Xz,
    Xy,
}

impl StrainComponent {
    /// Voigt 顺序
    pub const ALL: [StrainComponent; 6] = [
        StrainComponent::Xx,
        StrainComponent::Yy,
        StrainComponent::Zz,
        StrainComponent::Yz,
        StrainComponent::Xz,
        StrainComponent::Xy,
    ];

    /// Voigt 编号 (1..=6)
    pub fn index(self) -> usize {
        match self {
            StrainComponent::Xx => 1,
            StrainComponent::Yy => 2,
            StrainComponent::Zz => 3,
            StrainComponent::Yz => 4,
            StrainComponent::Xz => 5,
            StrainComponent::Xy => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrainComponent::Xx => "xx",
            StrainComponent::Yy => "yy",
            StrainComponent::Zz => "zz",
            StrainComponent::Yz => "yz",
            StrainComponent::Xz => "xz",
            StrainComponent::Xy => "xy",
        }
    }

    /// 正应变 (xx/yy/zz)
    pub fn is_normal(self) -> bool {
        self.index() <= 3
    }
}

impl std::fmt::Display for StrainComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 应变方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub const BOTH: [Sign; 2] = [Sign::Plus, Sign::Minus];

    pub fn factor(self) -> f64 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }

    /// 生成脚本中变量名的后缀
    pub fn suffix(self) -> &'static str {
        match self {
            Sign::Plus => "pos",
            Sign::Minus => "neg",
        }
    }
}

/// 六个分量的应变大小（均为正值）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainSet {
    magnitudes: [f64; 6],
}

impl StrainSet {
    /// 解析默认值
    ///
    /// `global` 为 `-e` 的值，`components` 按 Voigt 顺序给出各分量。
    /// 未设置的正应变取 `global`，未设置的切应变取 `global * SHEAR_FACTOR`。
    pub fn resolve(global: Option<f64>, components: [Option<f64>; 6]) -> Self {
        let global = set_value(global).unwrap_or(DEFAULT_STRAIN);

        let mut magnitudes = [0.0; 6];
        for (component, slot) in StrainComponent::ALL.iter().zip(magnitudes.iter_mut()) {
            let fallback = if component.is_normal() {
                global
            } else {
                global * SHEAR_FACTOR
            };
            *slot = set_value(components[component.index() - 1]).unwrap_or(fallback);
        }

        StrainSet { magnitudes }
    }

    pub fn magnitude(&self, component: StrainComponent) -> f64 {
        self.magnitudes[component.index() - 1]
    }

    pub fn magnitudes(&self) -> [f64; 6] {
        self.magnitudes
    }
}

impl Default for StrainSet {
    fn default() -> Self {
        StrainSet::resolve(None, [None; 6])
    }
}

/// 取绝对值，过小的值和非有限值视为未设置
fn set_value(value: Option<f64>) -> Option<f64> {
    value.map(f64::abs).filter(|v| *v >= ZERO && v.is_finite())
}

/// 实现单个应变分量的 3x3 形变矩阵
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distortion {
    pub component: StrainComponent,
    pub sign: Sign,
    pub matrix: Matrix3,
}

impl Distortion {
    pub fn new(component: StrainComponent, sign: Sign, magnitude: f64) -> Self {
        let mut matrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let eps = sign.factor() * magnitude;

        match component {
            StrainComponent::Xx | StrainComponent::Yy | StrainComponent::Zz => {
                let d = component.index() - 1;
                matrix[d][d] += eps;
            }
            StrainComponent::Yz => matrix[2][1] = eps,
            StrainComponent::Xz => matrix[2][0] = eps,
            StrainComponent::Xy => matrix[1][0] = eps,
        }

        Distortion {
            component,
            sign,
            matrix,
        }
    }

    /// 带符号的应变值
    pub fn strain(&self) -> f64 {
        let d = self.component.index() - 1;
        match self.component {
            StrainComponent::Xx | StrainComponent::Yy | StrainComponent::Zz => {
                self.matrix[d][d] - 1.0
            }
            StrainComponent::Yz => self.matrix[2][1],
            StrainComponent::Xz => self.matrix[2][0],
            StrainComponent::Xy => self.matrix[1][0],
        }
    }

    pub fn apply(&self, lattice: &Lattice) -> Lattice {
        lattice.deformed(&self.matrix)
    }
}
