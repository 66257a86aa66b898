//! # 弹性常数矩阵
//!
//! 每个应变方向 d 的正负差分平均后得到系数 C{i}{d}（i 为应力的 Voigt 编号，单位 kBar）。
//! 21 个独立弹性常数按下列规则组合（单位 GPa）：
//! - 对角项: C{ii} / 10
//! - 非对角项: (C{ij} + C{ji}) / 20
//!
//! 生成的 shell 脚本与 [`ElasticConstants::from_raw`] 使用同一张 [`REPORT_ORDER`] 表。
//! 命令行工具只用 [`Term`] 生成脚本中的 awk 组合行；[`ElasticConstants`] 与
//! [`Term::evaluate`] 是库接口，供其它程序在 Rust 中按同一规则组合已有的 C{i}{d}。
//!
//! ## 依赖关系
//! - 被 `elastic/script.rs` 使用
//! - 无外部模块依赖

use std::collections::BTreeMap;

/// VASP 应力单位 kBar 到 GPa 的换算
pub const KBAR_PER_GPA: f64 = 10.0;

/// 矩阵中的一个独立分量（1-based Voigt 下标，row <= col）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub row: usize,
    pub col: usize,
}

const fn term(row: usize, col: usize) -> Term {
    Term { row, col }
}

/// 21 个独立分量的输出顺序
pub const REPORT_ORDER: [Term; 21] = [
    term(1, 1),
    term(2, 2),
    term(3, 3),
    term(1, 2),
    term(1, 3),
    term(2, 3),
    term(4, 4),
    term(5, 5),
    term(6, 6),
    term(1, 4),
    term(1, 5),
    term(1, 6),
    term(2, 4),
    term(2, 5),
    term(2, 6),
    term(3, 4),
    term(3, 5),
    term(3, 6),
    term(4, 5),
    term(4, 6),
    term(5, 6),
];

impl Term {
    /// 对称位置 (i, j) 对应的独立分量
    pub fn symmetric(i: usize, j: usize) -> Term {
        Term {
            row: i.min(j),
            col: i.max(j),
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.row == self.col
    }

    /// 符号名，如 "C12"
    pub fn name(&self) -> String {
        format!("C{}{}", self.row, self.col)
    }

    /// 参与组合的原始系数名
    pub fn sources(&self) -> Vec<String> {
        if self.is_diagonal() {
            vec![self.name()]
        } else {
            vec![
                format!("C{}{}", self.row, self.col),
                format!("C{}{}", self.col, self.row),
            ]
        }
    }

    /// 求和后的除数：对角 10，非对角 20
    pub fn divisor(&self) -> f64 {
        self.sources().len() as f64 * KBAR_PER_GPA
    }

    /// `raw[i-1][d-1]` 为系数 C{i}{d}
    pub fn evaluate(&self, raw: &[[f64; 6]; 6]) -> f64 {
        let (i, j) = (self.row - 1, self.col - 1);
        let sum = if self.is_diagonal() {
            raw[i][j]
        } else {
            raw[i][j] + raw[j][i]
        };
        sum / self.divisor()
    }
}

/// 组合后的弹性常数 (GPa)
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticConstants {
    matrix: [[f64; 6]; 6],
    records: BTreeMap<String, f64>,
}

impl ElasticConstants {
    pub fn from_raw(raw: &[[f64; 6]; 6]) -> Self {
        let mut matrix = [[0.0; 6]; 6];
        let mut records = BTreeMap::new();

        for t in REPORT_ORDER {
            let value = t.evaluate(raw);
            matrix[t.row - 1][t.col - 1] = value;
            matrix[t.col - 1][t.row - 1] = value;
            records.insert(t.name(), value);
        }

        ElasticConstants { matrix, records }
    }

    /// 1-based 下标
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[row - 1][col - 1]
    }

    pub fn records(&self) -> &BTreeMap<String, f64> {
        &self.records
    }

    /// 下三角矩阵，每行 `%9.4f` 格式
    pub fn lower_triangle(&self) -> Vec<String> {
        (0..6)
            .map(|r| {
                (0..=r)
                    .map(|c| format!("{:9.4}", self.matrix[r][c]))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_order_covers_upper_triangle_once() {
        let mut seen = std::collections::HashSet::new();
        for t in REPORT_ORDER {
            assert!(t.row <= t.col);
            assert!(seen.insert((t.row, t.col)));
        }
        assert_eq!(seen.len(), 21);
    }

    #[test]
    fn test_divisors() {
        assert_eq!(Term::symmetric(1, 1).divisor(), 10.0);
        assert_eq!(Term::symmetric(3, 1).divisor(), 20.0);
        assert_eq!(Term::symmetric(3, 1).sources(), vec!["C13", "C31"]);
        assert_eq!(Term::symmetric(6, 4).name(), "C46");
    }

    #[test]
    fn test_from_raw_cubic() {
        // kBar: C11 = 2500, C12 = 1000 (asymmetric noise), C44 = 800
        let mut raw = [[0.0; 6]; 6];
        for i in 0..3 {
            raw[i][i] = 2500.0;
            raw[i + 3][i + 3] = 800.0;
        }
        raw[0][1] = 1010.0;
        raw[1][0] = 990.0;

        let c = ElasticConstants::from_raw(&raw);
        assert!((c.get(1, 1) - 250.0).abs() < 1e-12);
        assert!((c.get(4, 4) - 80.0).abs() < 1e-12);
        assert!((c.get(1, 2) - 100.0).abs() < 1e-12);
        assert_eq!(c.get(2, 1), c.get(1, 2));
        assert_eq!(c.records().len(), 21);
        assert_eq!(c.records()["C12"], c.get(1, 2));
        assert_eq!(c.records()["C13"], 0.0);
    }

    #[test]
    fn test_lower_triangle_format() {
        let mut raw = [[0.0; 6]; 6];
        raw[0][0] = 1234.5;
        let rows = ElasticConstants::from_raw(&raw).lower_triangle();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], " 123.4500");
        assert_eq!(rows[1], "   0.0000    0.0000");
        assert_eq!(rows[5].split_whitespace().count(), 6);
    }
}
