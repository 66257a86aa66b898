//! # 数字格式化
//!
//! 与 C `printf("%g")` 一致的浮点格式，用于生成脚本中的应变值和终端摘要。
//!
//! ## 依赖关系
//! - 被 `elastic/script.rs`, `commands/generate.rs` 使用
//! - 无外部模块依赖

/// 6 位有效数字，去掉末尾的 0；指数小于 -4 或不小于 6 时使用科学计数法
pub fn format_g(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:.5e}", x);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if !(-4..6).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (5 - exp) as usize;
        trim_zeros(&format!("{:.*}", decimals, x))
    }
}

fn trim_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
