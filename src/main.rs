//! ecvasp 命令行入口

use clap::Parser;
use ecvasp::cli::{normalize_args, Cli};
use ecvasp::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(e.exit_code());
    }
}
