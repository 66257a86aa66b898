//! # 晶体结构数据模型
//!
//! 保存从 POSCAR 读入的平衡构型。结构在启动时读取一次，之后不再修改；
//! 每个应变方向的新晶格由 [`Lattice::deformed`] 重新计算。
//!
//! ## 依赖关系
//! - 被 `parsers/poscar.rs`, `elastic/` 使用
//! - 无外部模块依赖

/// 3x3 行主序矩阵
pub type Matrix3 = [[f64; 3]; 3];

/// 晶格向量表示
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c（未乘缩放因子）
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: Matrix3,
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: Matrix3) -> Self {
        Lattice { matrix }
    }

    /// 右乘形变矩阵: new[i][j] = Σ_m L[i][m] · D[m][j]
    pub fn deformed(&self, distortion: &Matrix3) -> Lattice {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).fold(0.0, |acc, m| acc + self.matrix[i][m] * distortion[m][j]);
            }
        }
        Lattice { matrix: out }
    }

    /// 计算晶格体积（行列式）
    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }
}

/// POSCAR 结构
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    /// 第一行注释（结构名称）
    pub title: String,

    /// 晶格缩放因子
    pub scale: f64,

    /// 晶格
    pub lattice: Lattice,

    /// 元素名称行 (VASP 5+)，VASP 4 格式时为 None
    pub elements: Option<Vec<String>>,

    /// 每种元素的原子数
    pub counts: Vec<usize>,

    /// 分数坐标
    pub positions: Vec<[f64; 3]>,

    /// 输入中是否有 Selective dynamics 行
    pub selective_dynamics: bool,
}

impl Structure {
    /// 原子总数
    pub fn total_atoms(&self) -> usize {
        self.counts.iter().sum()
    }

    /// 原子种类数
    pub fn num_types(&self) -> usize {
        self.counts.len()
    }

    /// 缩放后的晶胞体积 (Å³)
    ///
    /// 负的缩放因子在 VASP 中表示目标体积本身。
    pub fn cell_volume(&self) -> f64 {
        if self.scale < 0.0 {
            -self.scale
        } else {
            self.lattice.volume().abs() * self.scale.powi(3)
        }
    }

    /// 计算化学式；没有元素名称时返回 None
    pub fn formula(&self) -> Option<String> {
        let elements = self.elements.as_ref()?;
        Some(
            elements
                .iter()
                .zip(self.counts.iter())
                .map(|(el, &count)| {
                    if count == 1 {
                        el.clone()
                    } else {
                        format!("{}{}", el, count)
                    }
                })
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_product(a: &Matrix3, b: &Matrix3) -> Matrix3 {
        let mut c = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                c[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        c
    }

    #[test]
    fn test_deformed_identity_is_noop() {
        let lattice = Lattice::from_vectors([[3.0, 0.1, 0.0], [0.2, 4.0, 0.0], [0.0, 0.3, 5.0]]);
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_eq!(lattice.deformed(&identity), lattice);
    }

    #[test]
    fn test_deformed_matches_manual_product() {
        let lattice = Lattice::from_vectors([
            [2.5, -1.443375673, 0.0],
            [0.0, 2.886751346, 0.0],
            [0.3, 0.2, 6.1],
        ]);
        let d = [[1.0, 0.0, 0.0], [0.0128, 1.0, 0.0], [-0.0128, 0.0128, 0.992]];
        let got = lattice.deformed(&d);
        let expected = manual_product(&lattice.matrix, &d);

        for i in 0..3 {
            for j in 0..3 {
                assert!((got.matrix[i][j] - expected[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_lattice_volume_cubic() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        assert!((lattice.volume() - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_structure_counts_and_formula() {
        let structure = Structure {
            title: "TiO2".to_string(),
            scale: 2.0,
            lattice: Lattice::from_vectors([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
            elements: Some(vec!["Ti".to_string(), "O".to_string()]),
            counts: vec![1, 2],
            positions: vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5]],
            selective_dynamics: false,
        };

        assert_eq!(structure.total_atoms(), 3);
        assert_eq!(structure.num_types(), 2);
        assert_eq!(structure.formula().as_deref(), Some("TiO2"));
        // 1.0^3 * 2.0^3
        assert!((structure.cell_volume() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_scale_is_target_volume() {
        let structure = Structure {
            title: "Si".to_string(),
            scale: -40.9,
            lattice: Lattice::from_vectors([[0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]]),
            elements: Some(vec!["Si".to_string()]),
            counts: vec![2],
            positions: vec![[0.0, 0.0, 0.0], [0.25, 0.25, 0.25]],
            selective_dynamics: false,
        };
        assert!((structure.cell_volume() - 40.9).abs() < 1e-12);
    }
}
