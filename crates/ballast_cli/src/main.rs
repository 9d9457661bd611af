use anyhow::{Context, Result};
use ballast_diagnostics::Emitter;
use ballast_driver::{check_file, DriverError};
use ballast_syntax::{tokenize, ParseOptions, TokenKind, DEFAULT_MAX_NESTING_DEPTH};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ballast")]
#[command(about = "Ballast 语法检查器 - 带错误恢复的解析器前端", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    parse: ParseArgs,

    /// 关闭彩色输出
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Args)]
struct ParseArgs {
    /// 最大嵌套深度
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    max_depth: usize,

    /// 遇到第一个错误即停止
    #[arg(long, global = true)]
    fail_fast: bool,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        let options = ParseOptions::default().with_max_depth(self.max_depth);
        if self.fail_fast {
            options.fail_fast()
        } else {
            options
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 检查语法错误
    Check {
        /// 输入文件
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// 打印语法树
    Ast {
        /// 输入文件
        input: String,
    },

    /// 打印 token 序列
    Tokens {
        /// 输入文件
        input: String,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    let emitter = if cli.no_color {
        Emitter::without_colors()
    } else {
        Emitter::new()
    };
    let options = cli.parse.options();

    match cli.command {
        Commands::Check { inputs } => cmd_check(&inputs, options, &emitter),
        Commands::Ast { input } => cmd_ast(&input, options, &emitter),
        Commands::Tokens { input } => cmd_tokens(&input),
    }
}

/// 检查命令
fn cmd_check(inputs: &[String], options: ParseOptions, emitter: &Emitter) -> Result<ExitCode> {
    tracing::info!(files = inputs.len(), max_depth = options.max_nesting_depth, "checking");
    let mut failed = 0usize;
    for input in inputs {
        let (output, source) = match check_file(input, options) {
            Ok(checked) => checked,
            Err(err @ DriverError::IoError(_)) => {
                err.emit(Some(input), None, emitter);
                failed += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if output.is_clean() {
            println!("{} {} ({})", "ok".green().bold(), input, output.summary);
        } else {
            output.emit(&source, emitter);
            println!(
                "{} {}: {}",
                "failed".red().bold(),
                input,
                output.sink().summary()
            );
            failed += 1;
        }
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// 语法树命令：有错误时仍打印恢复后的树
fn cmd_ast(input: &str, options: ParseOptions, emitter: &Emitter) -> Result<ExitCode> {
    let (output, source) =
        check_file(input, options).with_context(|| format!("无法检查 {}", input))?;
    println!("{:#?}", output.unit);
    if output.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        output.emit(&source, emitter);
        Ok(ExitCode::FAILURE)
    }
}

/// token 命令
fn cmd_tokens(input: &str) -> Result<ExitCode> {
    let source = fs::read_to_string(input).with_context(|| format!("无法读取 {}", input))?;
    let mut invalid = 0usize;
    for token in tokenize(&source) {
        if token.kind == TokenKind::Error {
            invalid += 1;
        }
        println!(
            "{:>5}..{:<5} {:<20} {:?}",
            token.span.start,
            token.span.end,
            token.kind.to_string(),
            token.lexeme
        );
    }
    Ok(if invalid == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
