//! # 脚本生成命令实现
//!
//! ## 功能
//! - 解析命令行得到的应变和输出设置
//! - 读取平衡构型 POSCAR
//! - 生成弹性常数计算脚本并设为可执行
//! - 打印摘要
//!
//! 读取 POSCAR 失败时直接返回错误，不会写出任何脚本。
//!
//! ## 依赖关系
//! - 使用 `cli/mod.rs` 定义的参数
//! - 使用 `parsers/poscar.rs`, `elastic/`, `utils/output.rs`

use crate::cli::Cli;
use crate::elastic::{render_script, ScriptOptions, StrainComponent, StrainSet};
use crate::error::{EcvaspError, Result};
use crate::parsers::poscar::{consistency_warnings, parse_poscar_file};
use crate::parsers::NumberPolicy;
use crate::utils::format::format_g;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 未指定时读取的结构文件
pub const DEFAULT_POSCAR: &str = "POSCAR";

/// 解析完默认值后的运行配置
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    pub poscar: PathBuf,
    pub output: PathBuf,
    pub strains: StrainSet,
    pub options: ScriptOptions,
    pub policy: NumberPolicy,
}

impl GenerateConfig {
    pub fn from_cli(cli: Cli) -> Self {
        let strains = StrainSet::resolve(cli.strain, cli.components());
        let poscar = cli
            .poscar
            .last()
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POSCAR));
        let policy = if cli.lenient {
            NumberPolicy::Lenient
        } else {
            NumberPolicy::Strict
        };

        GenerateConfig {
            poscar,
            output: cli.output,
            strains,
            options: ScriptOptions {
                vasp_exec: cli.vasp_exec,
                default_np: cli.np,
            },
            policy,
        }
    }
}

/// 摘要表格行
#[derive(Debug, Clone, Tabled)]
struct StrainRow {
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Strain")]
    strain: String,
}

/// 执行脚本生成
pub fn execute(cli: Cli) -> Result<()> {
    let config = GenerateConfig::from_cli(cli);

    let structure = parse_poscar_file(&config.poscar, config.policy)?;
    for warning in consistency_warnings(&structure) {
        output::print_warning(&warning);
    }

    let formula = structure
        .formula()
        .unwrap_or_else(|| format!("{} types", structure.num_types()));
    output::print_info(&format!(
        "Read {} atoms ({}) from '{}', cell volume {:.4} Å³",
        structure.total_atoms(),
        formula,
        config.poscar.display(),
        structure.cell_volume()
    ));

    let script = render_script(&structure, &config.strains, &config.options);
    write_script(&config.output, &script)?;
    output::print_success(&format!(
        "Script written to '{}' (12 strained runs)",
        config.output.display()
    ));

    print_summary(&config);

    Ok(())
}

/// 写出脚本并加上可执行权限
fn write_script(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| EcvaspError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    make_executable(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let write_err = |e| EcvaspError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let mut perms = fs::metadata(path).map_err(write_err)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms).map_err(write_err)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn print_summary(config: &GenerateConfig) {
    output::print_header("Elastic Constants Script");
    output::print_field(
        "Equilibrium config read from",
        &config.poscar.display().to_string(),
    );
    output::print_field(
        "Script info written to file",
        &config.output.display().to_string(),
    );
    output::print_field(
        "Displacement info",
        &config
            .strains
            .magnitudes()
            .iter()
            .map(|v| format_g(*v))
            .collect::<Vec<_>>()
            .join(" "),
    );

    let rows: Vec<StrainRow> = StrainComponent::ALL
        .iter()
        .map(|&c| StrainRow {
            direction: format!("C{}", c.index()),
            component: format!("eps_{}", c),
            strain: format_g(config.strains.magnitude(c)),
        })
        .collect();

    println!();
    println!("{}", Table::new(&rows));
    output::print_separator();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::normalize_args;
    use clap::Parser;

    const CUBIC: &str = "cubic\n1.0\n1 0 0\n0 1 0\n0 0 1\nX\n1\nDirect\n0 0 0\n";

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args.iter().copied())).unwrap()
    }

    fn path_str(p: &Path) -> &str {
        p.to_str().unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = GenerateConfig::from_cli(cli(&["ecvasp"]));
        assert_eq!(config.poscar, PathBuf::from("POSCAR"));
        assert_eq!(config.output, PathBuf::from("ecrun"));
        assert_eq!(config.strains, StrainSet::default());
        assert_eq!(config.policy, NumberPolicy::Strict);
    }

    #[test]
    fn test_config_resolves_strains() {
        let config =
            GenerateConfig::from_cli(cli(&["ecvasp", "-e", "-0.01", "-yy", "0.02", "--lenient"]));
        assert_eq!(config.strains.magnitude(StrainComponent::Xx), 0.01);
        assert_eq!(config.strains.magnitude(StrainComponent::Yy), 0.02);
        assert!((config.strains.magnitude(StrainComponent::Yz) - 0.016).abs() < 1e-15);
        assert_eq!(config.policy, NumberPolicy::Lenient);
    }

    #[test]
    fn test_execute_writes_executable_script() {
        let dir = tempfile::tempdir().unwrap();
        let poscar = dir.path().join("POSCAR");
        let out = dir.path().join("ecrun");
        fs::write(&poscar, CUBIC).unwrap();

        execute(cli(&["ecvasp", "-o", path_str(&out), path_str(&poscar)])).unwrap();

        let script = fs::read_to_string(&out).unwrap();
        assert_eq!(script.matches("cat > POSCAR << 'EOF'\n").count(), 13);
        assert!(script.ends_with("exit 0\n"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&out).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn test_missing_poscar_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let poscar = dir.path().join("POSCAR");
        let out = dir.path().join("ecrun");

        let err = execute(cli(&["ecvasp", "-o", path_str(&out), path_str(&poscar)])).unwrap_err();
        assert!(matches!(err, EcvaspError::FileNotFound { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_cartesian_poscar_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let poscar = dir.path().join("POSCAR");
        let out = dir.path().join("ecrun");
        fs::write(&poscar, CUBIC.replace("Direct", "Cartesian")).unwrap();

        let err = execute(cli(&["ecvasp", "-o", path_str(&out), path_str(&poscar)])).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(!out.exists());
    }

    #[test]
    fn test_unwritable_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let poscar = dir.path().join("POSCAR");
        let out = dir.path().join("no-such-dir").join("ecrun");
        fs::write(&poscar, CUBIC).unwrap();

        let err = execute(cli(&["ecvasp", "-o", path_str(&out), path_str(&poscar)])).unwrap_err();
        assert!(matches!(err, EcvaspError::FileWriteError { .. }));
    }
}
