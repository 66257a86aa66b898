//! # 弹性常数计算脚本生成
//!
//! 生成一个 bash 脚本：先计算平衡构型，再对六个应变方向各做正负两次计算，
//! 从 OUTCAR 中提取应力，用中心差分得到弹性常数并写入 `info.dat`。
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 使用
//! - 使用 `elastic/strain.rs`, `elastic/tensor.rs`, `parsers/poscar.rs`, `utils/format.rs`

use crate::elastic::strain::{Distortion, Sign, StrainComponent, StrainSet};
use crate::elastic::tensor::{Term, REPORT_ORDER};
use crate::models::{Lattice, Structure};
use crate::parsers::poscar::to_poscar_string;
use crate::utils::format::format_g;

/// 结果文件
pub const INFO_FILE: &str = "info.dat";

/// 每次计算后清理的 VASP 输出
const CLEANUP: &str = "CHG* CONTCAR EIGENVAL IBZKPT OSZICAR OUTCAR PCDAT vasprun.xml WAVECAR XDATCAR";

/// 应力变量名及其在 OUTCAR "in kB" 行中的 awk 字段，按 Voigt 顺序
const STRESS_FIELDS: [(&str, usize); 6] = [
    ("pxx", 3),
    ("pyy", 4),
    ("pzz", 5),
    ("pyz", 7),
    ("pxz", 8),
    ("pxy", 6),
];

/// 脚本运行参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// VASP 可执行文件
    pub vasp_exec: String,
    /// 脚本没有参数时的 MPI 进程数
    pub default_np: u32,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        ScriptOptions {
            vasp_exec: "v533".to_string(),
            default_np: 2,
        }
    }
}

/// 生成完整脚本
pub fn render_script(structure: &Structure, strains: &StrainSet, options: &ScriptOptions) -> String {
    let mut out = String::new();

    write_preamble(&mut out, options);

    out.push_str("echo \"The as-provided configuration (equilibrium state expected)\"\n");
    write_structure_block(&mut out, structure, &structure.lattice);
    write_stress_extraction(&mut out, "0");
    out.push_str("eng0=`grep 'energy  without' OUTCAR|tail -1|awk '{print $4}'`\n");
    let baseline = "0   0  ${pxx0} ${pyy0} ${pzz0} ${pxy0} ${pxz0} ${pyz0} ${eng0}";
    out.push_str(&format!("echo \"{}\"\n", baseline));
    out.push_str(&format!(
        "echo \"# Information on elastic constants calculations, since: `date`\" >> {}\n",
        INFO_FILE
    ));
    out.push_str(&format!("echo \"{}\" >> {}\n", baseline, INFO_FILE));

    for component in StrainComponent::ALL {
        for sign in Sign::BOTH {
            let distortion = Distortion::new(component, sign, strains.magnitude(component));
            write_strained_run(&mut out, structure, &distortion);
        }
        write_direction_average(&mut out, component);
    }

    write_combination(&mut out);
    write_matrix_print(&mut out);

    out.push_str(&format!("\ncat {}\n\n", INFO_FILE));
    out.push_str(&format!("rm -rf {}\n", CLEANUP));
    out.push_str("#\nexit 0\n");

    out
}

fn write_preamble(out: &mut String, options: &ScriptOptions) {
    out.push_str(
        r#"#!/bin/bash
#
# Script to compute the elastic constants based on VASP.
#===========================================================================
# Extremely accurate stress calculations are needed to get reliable results.
# Suggested settings for INCAR:
#     PREC   = high
#     ENCUT  = 1.5*ENMAX
#     ISMEAR = 2   # for metals;
#     SIGMA  = 0.2 # for metals;
#
#     ISMEAR = -5  # for insulators.
#
# The strain should be large enough to avoid noise, but small enough to
#  keep elasticity.
#
# Usage: ./<script> [np]   (np: number of MPI processes)
#===========================================================================
if [ "$#" -gt "0" ]; then
   np=$1
else
"#,
    );
    out.push_str(&format!("   np={}\nfi\n#\n", options.default_np));
    out.push_str("if [ -f \"POSCAR\" ]; then\n   cp POSCAR POSCAR_ini\nfi\n#\n");
    out.push_str(&format!(
        "VASP=\"mpirun -np ${{np}} {}\"\n#\n",
        options.vasp_exec
    ));
}

/// heredoc 写入 POSCAR，然后运行 VASP
fn write_structure_block(out: &mut String, structure: &Structure, lattice: &Lattice) {
    let body = to_poscar_string(structure, lattice);
    let delimiter = heredoc_delimiter(&body);
    out.push_str(&format!("cat > POSCAR << '{}'\n", delimiter));
    out.push_str(&body);
    out.push_str(&format!(
        "{}\ncat POSCAR\n# Now to do the calculations\nrm -rf WAVECAR\n${{VASP}}\n",
        delimiter
    ));
}

/// heredoc 结束标记，不能与内容中的任何一行相同（标题是任意文本）
fn heredoc_delimiter(body: &str) -> String {
    let mut delimiter = String::from("EOF");
    while body.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }
    delimiter
}

/// 从 OUTCAR 提取应力；`suffix` 为 "0" 时写入基准变量 pxx0 等
fn write_stress_extraction(out: &mut String, suffix: &str) {
    out.push_str("press=`grep -B1 'external pressure' OUTCAR|head -1`\n");
    for (name, field) in STRESS_FIELDS {
        out.push_str(&format!(
            "{}{}=`echo ${{press}}|awk '{{print ${}}}'`\n",
            name, suffix, field
        ));
    }
}

fn write_strained_run(out: &mut String, structure: &Structure, distortion: &Distortion) {
    let d = distortion.component.index();
    let eps = distortion.strain();

    let mut eps_vec = [0.0; 6];
    eps_vec[d - 1] = eps;
    let eps_text = eps_vec
        .iter()
        .map(|v| format_g(*v))
        .collect::<Vec<_>>()
        .join(" ");

    out.push_str(&format!(
        "# Direction C{} ({}), eps = [{}]\necho\n",
        d, distortion.component, eps_text
    ));
    out.push_str(&format!("echo \"Now to compute that for eps = [{}]\"\n", eps_text));
    out.push_str(&format!("eps=\"{}\"\n", format_g(eps)));

    write_structure_block(out, structure, &distortion.apply(&structure.lattice));
    write_stress_extraction(out, "");

    let suffix = distortion.sign.suffix();
    for (i, (name, _)) in STRESS_FIELDS.iter().enumerate() {
        out.push_str(&format!(
            "C{}{}{}=`echo ${{{}}} ${{{}0}} ${{eps}} | awk '{{print ($2 - $1)/$3}}'`\n",
            i + 1,
            d,
            suffix,
            name,
            name
        ));
    }

    let eng = format!("eng{}{}", d, &suffix[..1]);
    out.push_str(&format!(
        "{}=`grep 'energy  without' OUTCAR|tail -1|awk '{{print $4}}'`\n",
        eng
    ));
    let info = format!(
        "{} {}  ${{pxx}} ${{pyy}} ${{pzz}} ${{pxy}} ${{pxz}} ${{pyz}} ${{{}}}",
        d,
        format_g(eps),
        eng
    );
    out.push_str(&format!("echo \"{}\"\n", info));
    out.push_str(&format!("echo \"{}\" >> {}\n", info, INFO_FILE));
}

/// 正负差分平均: C{i}{d}
fn write_direction_average(out: &mut String, component: StrainComponent) {
    let d = component.index();
    for i in 1..=6 {
        out.push_str(&format!(
            "C{i}{d}=`echo ${{C{i}{d}pos}} ${{C{i}{d}neg}}|awk '{{print ($1+$2)/2}}'`\n"
        ));
    }
}

/// 组合成 21 个独立常数: C{ij}all
fn write_combination(out: &mut String) {
    for t in REPORT_ORDER {
        let sources = t.sources();
        let refs = sources
            .iter()
            .map(|s| format!("${{{}}}", s))
            .collect::<Vec<_>>()
            .join(" ");
        let expr = if t.is_diagonal() {
            format!("$1/{}", t.divisor())
        } else {
            format!("($1+$2)/{}", t.divisor())
        };
        out.push_str(&format!(
            "{}all=`echo {}|awk '{{print {}}}'`\n",
            t.name(),
            refs,
            expr
        ));
    }

    for t in REPORT_ORDER {
        out.push_str(&format!(
            "echo Elastic Constant {name} = ${{{name}all}} GPa >> {}\n",
            INFO_FILE,
            name = t.name()
        ));
    }
}

/// 以 `%9.4f` 打印下三角矩阵
fn write_matrix_print(out: &mut String) {
    out.push_str(&format!(
        "echo \"# The elastic constant matrix:\" >> {}\n",
        INFO_FILE
    ));
    for r in 1..=6 {
        let refs = (1..=r)
            .map(|c| format!("${{{}all}}", Term::symmetric(r, c).name()))
            .collect::<Vec<_>>()
            .join(" ");
        let fmt = vec!["%9.4f"; r].join(" ");
        let args = (1..=r)
            .map(|c| format!("${}", c))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!(
            "echo {}|awk '{{printf \"{}\\n\", {}}}' >> {}\n",
            refs, fmt, args, INFO_FILE
        ));
    }
}
