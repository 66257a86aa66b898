//! # VASP POSCAR 格式读写
//!
//! 只支持分数坐标 (Direct)。笛卡尔坐标输入会被拒绝。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+, optional)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct                 # coordinate type (Cartesian is rejected)
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs`, `elastic/script.rs` 使用
//! - 使用 `models/structure.rs`, `parsers/number.rs`

use crate::error::{EcvaspError, Result};
use crate::models::{Lattice, Structure};
use crate::parsers::NumberPolicy;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path, policy: NumberPolicy) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => EcvaspError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => EcvaspError::FileReadError {
            path: path.display().to_string(),
            source: e,
        },
    })?;

    parse_poscar_content(&content, &path.display().to_string(), policy)
}

/// 逐行读取，记录行号 (1-based)
struct LineCursor<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
    path: &'a str,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str, path: &'a str) -> Self {
        LineCursor {
            lines: content.lines(),
            line_no: 0,
            path,
        }
    }

    fn next_line(&mut self, what: &str) -> Result<&'a str> {
        self.line_no += 1;
        self.lines.next().ok_or_else(|| {
            EcvaspError::parse(
                self.path,
                self.line_no,
                format!("unexpected end of file, expected {}", what),
            )
        })
    }

    fn error(&self, reason: impl Into<String>) -> EcvaspError {
        EcvaspError::parse(self.path, self.line_no, reason)
    }
}

/// 从字符串内容解析 POSCAR 格式
///
/// `path` 仅用于错误信息。
pub fn parse_poscar_content(content: &str, path: &str, policy: NumberPolicy) -> Result<Structure> {
    let mut cursor = LineCursor::new(content, path);

    // Line 1: Comment/title
    let title = cursor.next_line("title line")?.trim_end().to_string();

    // Line 2: Scaling factor
    let line = cursor.next_line("scaling factor")?;
    let scale = policy
        .parse_f64(words(line).next())
        .map_err(|r| cursor.error(r))?;

    // Lines 3-5: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for row in matrix.iter_mut() {
        let line = cursor.next_line("lattice vector")?;
        let mut tokens = words(line);
        for cell in row.iter_mut() {
            *cell = policy
                .parse_f64(tokens.next())
                .map_err(|r| cursor.error(r))?;
        }
    }

    // Line 6: Element symbols (VASP 5+) or atom counts (VASP 4)
    let line = cursor.next_line("element names or atom counts")?;
    let first = words(line)
        .next()
        .ok_or_else(|| cursor.error("expected element names or atom counts, found empty line"))?;

    let (elements, count_line) = if first.starts_with(|c: char| c.is_ascii_alphabetic()) {
        let names: Vec<String> = words(line).map(str::to_string).collect();
        (Some(names), cursor.next_line("atom counts")?)
    } else {
        (None, line)
    };

    let ntype = count_words(count_line);
    let counts = words(count_line)
        .take(ntype)
        .map(|tok| policy.parse_count(tok))
        .collect::<std::result::Result<Vec<usize>, String>>()
        .map_err(|r| cursor.error(r))?;

    let natom: usize = counts.iter().sum();
    if natom < 1 {
        return Err(EcvaspError::NoAtoms {
            path: path.to_string(),
        });
    }

    // Optional "Selective dynamics", then coordinate mode
    let mut line = cursor.next_line("coordinate mode")?;
    let mut selective_dynamics = false;
    if words(line)
        .next()
        .is_some_and(|tok| tok.starts_with(['S', 's']))
    {
        selective_dynamics = true;
        line = cursor.next_line("coordinate mode")?;
    }

    let mode = words(line)
        .next()
        .ok_or_else(|| cursor.error("missing coordinate mode marker"))?;
    if mode.starts_with(['C', 'c', 'K', 'k']) {
        return Err(EcvaspError::CartesianCoordinates {
            path: path.to_string(),
        });
    }
    if policy == NumberPolicy::Strict && !mode.starts_with(['D', 'd']) {
        return Err(cursor.error(format!("unknown coordinate mode '{}'", mode)));
    }

    // Atom positions
    let mut positions = Vec::with_capacity(natom);
    for _ in 0..natom {
        let line = cursor.next_line("atomic position")?;
        let mut tokens = words(line);
        let mut pos = [0.0; 3];
        for value in pos.iter_mut() {
            *value = policy
                .parse_f64(tokens.next())
                .map_err(|r| cursor.error(r))?;
        }
        positions.push(pos);
    }

    Ok(Structure {
        title,
        scale,
        lattice: Lattice::from_vectors(matrix),
        elements,
        counts,
        positions,
        selective_dynamics,
    })
}

/// 非致命的一致性问题，由调用方决定是否提示
pub fn consistency_warnings(structure: &Structure) -> Vec<String> {
    let mut warnings = Vec::new();
    if let Some(ref names) = structure.elements {
        if names.len() != structure.counts.len() {
            warnings.push(format!(
                "{} element names but {} atom counts",
                names.len(),
                structure.counts.len()
            ));
        }
    }
    if structure.selective_dynamics {
        warnings.push("Selective dynamics flags are dropped from the generated POSCARs".to_string());
    }
    warnings
}

/// 去掉 `#` 之后的注释，返回以空白分隔的 token
fn words(line: &str) -> std::str::SplitWhitespace<'_> {
    let body = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    body.split_whitespace()
}

/// 统计一行中的单词数（`#` 之后视为注释）
pub fn count_words(line: &str) -> usize {
    words(line).count()
}

/// 将结构（使用给定晶格）写成 POSCAR 字符串
pub fn to_poscar_string(structure: &Structure, lattice: &Lattice) -> String {
    let mut result = String::new();

    result.push_str(&format!("{}\n", structure.title));
    result.push_str(&format!("{:20.14}\n", structure.scale));

    for row in &lattice.matrix {
        result.push_str(&format!("{:20.14} {:20.14} {:20.14}\n", row[0], row[1], row[2]));
    }

    if let Some(ref names) = structure.elements {
        result.push_str(&format!("{}\n", names.join(" ")));
    }

    for count in &structure.counts {
        result.push_str(&format!("{} ", count));
    }
    result.push_str("\nDirect\n");

    for pos in &structure.positions {
        result.push_str(&format!("{:20.14} {:20.14} {:20.14}\n", pos[0], pos[1], pos[2]));
    }

    result
}
