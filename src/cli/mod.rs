//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 用法
//! ```text
//! ecvasp [options] [poscar]
//! ```
//! `-xx`, `-yy`, `-zz`, `-xy`, `-xz`, `-yz` 是单横线多字母的选项，
//! clap 不能直接识别，先由 [`normalize_args`] 改写为 `--xx` 等长选项。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 参数传递给 `commands/generate.rs`

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// 需要改写为长选项的单横线多字母选项
const MULTI_LETTER_FLAGS: [&str; 6] = ["-xx", "-yy", "-zz", "-xy", "-xz", "-yz"];

const AFTER_HELP: &str = "\
Strains are taken as absolute values. Unset eps_{xx}, eps_{yy}, eps_{zz} default to the
value of -e (0.008 if -e is not given); unset shear strains default to 1.6 times that value.
The single-dash forms -xx, -yy, -zz, -xy, -xz, -yz are accepted as well.
An option given without its value is a usage error and exits with status 2.";

/// ecvasp - 生成基于 VASP 的弹性常数计算脚本
#[derive(Parser, Debug)]
#[command(name = "ecvasp")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Generate the script for elastic constants calculations based on VASP",
    long_about = None
)]
#[command(allow_negative_numbers = true)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// POSCAR or CONTCAR of VASP [default: POSCAR]
    #[arg(value_name = "POSCAR")]
    pub poscar: Vec<PathBuf>,

    /// Name of the generated script
    #[arg(short = 'o', value_name = "NAME", default_value = "ecrun")]
    pub output: PathBuf,

    /// Default strain
    #[arg(short = 'e', value_name = "STRAIN", value_parser = parse_strain)]
    pub strain: Option<f64>,

    /// Strain of eps_{xx}
    #[arg(short = 'x', long = "xx", value_name = "STRAIN", value_parser = parse_strain)]
    pub xx: Option<f64>,

    /// Strain of eps_{yy}
    #[arg(short = 'y', long = "yy", value_name = "STRAIN", value_parser = parse_strain)]
    pub yy: Option<f64>,

    /// Strain of eps_{zz}
    #[arg(short = 'z', long = "zz", value_name = "STRAIN", value_parser = parse_strain)]
    pub zz: Option<f64>,

    /// Strain of eps_{yz}
    #[arg(long = "yz", value_name = "STRAIN", value_parser = parse_strain)]
    pub yz: Option<f64>,

    /// Strain of eps_{xz}
    #[arg(long = "xz", value_name = "STRAIN", value_parser = parse_strain)]
    pub xz: Option<f64>,

    /// Strain of eps_{xy}
    #[arg(long = "xy", value_name = "STRAIN", value_parser = parse_strain)]
    pub xy: Option<f64>,

    // ─────────────────────────────────────────────────────────────
    // Script options
    // ─────────────────────────────────────────────────────────────
    /// VASP executable called by the script
    #[arg(long, env = "ECVASP_EXEC", default_value = "v533")]
    pub vasp_exec: String,

    /// Number of MPI processes when the script is run without arguments
    #[arg(long, default_value_t = 2)]
    pub np: u32,

    /// Read malformed numbers in POSCAR as zero instead of failing
    #[arg(long, default_value_t = false)]
    pub lenient: bool,
}

impl Cli {
    /// 按 Voigt 顺序 (xx, yy, zz, yz, xz, xy) 返回各分量
    pub fn components(&self) -> [Option<f64>; 6] {
        [self.xx, self.yy, self.zz, self.yz, self.xz, self.xy]
    }
}

/// 应变值必须是有限数
fn parse_strain(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("'{}' is not a finite number", value))
}

/// 将 `-xx` 等改写为 `--xx`，其它参数原样保留
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let long = arg
                .to_str()
                .filter(|s| MULTI_LETTER_FLAGS.contains(s))
                .map(|s| format!("-{}", s));
            match long {
                Some(long) => OsString::from(long),
                None => arg,
            }
        })
        .collect()
}
