//! 语音指令识别命令行工具
//!
//! 用法:
//!   logene-voice-command                         # 交互模式，输入 exit 退出
//!   logene-voice-command eval                    # 跑配置中的全部测试集
//!   logene-voice-command eval --format json      # JSON 输出
//!   logene-voice-command gen-dataset -k 30       # 生成测试集

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use logene_voice_command::config::{load_config, load_config_from, DictionaryConfig};
use logene_voice_command::dataset::{generate, read_dataset, write_dataset, DatasetKind};
use logene_voice_command::evaluate::{evaluate, render_report, CaseResult, Summary};
use logene_voice_command::{
    build_matcher, build_matcher_from_commands, AppConfig, MatcherError, MatcherState, Result,
};

#[derive(Parser)]
#[command(name = "logene-voice-command")]
#[command(about = "语音指令识别：字典树精确匹配 + 单错误模糊匹配")]
struct Cli {
    /// 配置文件路径，默认在系统配置目录下
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 指令文件（每行一条），覆盖配置中的词典
    #[arg(long, global = true)]
    commands: Option<PathBuf>,

    /// 关闭长度剪枝
    #[arg(long, global = true)]
    no_length_check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// 交互式识别
    Repl,
    /// 在 TSV 测试集上评估准确率和延迟
    Eval {
        /// 测试集，默认使用配置中的列表
        #[arg(long, num_args = 1..)]
        datasets: Vec<PathBuf>,

        /// 每个测试集打印多少个失败用例
        #[arg(long)]
        show_failures: Option<usize>,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// 由词典生成三类测试集
    GenDataset {
        #[arg(long, default_value = "test_dataset")]
        out_dir: PathBuf,

        /// 每个测试集的用例数
        #[arg(short = 'k', long, default_value_t = 30)]
        count: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct DatasetSummary {
    dataset: String,
    summary: Summary,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            log::error!("加载配置失败: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => run_repl(&config),
        Command::Eval {
            datasets,
            show_failures,
            format,
        } => {
            let datasets = if datasets.is_empty() {
                config.evaluation.datasets.clone()
            } else {
                datasets
            };
            let show_failures = show_failures.unwrap_or(config.evaluation.show_failures);
            run_eval(&config, &datasets, show_failures, format)
        }
        Command::GenDataset { out_dir, count } => run_gen_dataset(&config, &out_dir, count),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("错误: {e}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(path) = &cli.commands {
        config.dictionary = DictionaryConfig {
            commands_file: Some(path.clone()),
            commands: Vec::new(),
        };
    }
    if cli.no_length_check {
        config.matcher.length_check = false;
    }
    Ok(config)
}

fn run_repl(config: &AppConfig) -> Result<()> {
    let commands = config.commands()?;
    let state = MatcherState::with_matcher(build_matcher_from_commands(config, &commands));

    println!("已加载 {} 条指令：", commands.len());
    for c in &commands {
        println!(" - {c}");
    }
    println!("=== 精确 + 模糊(错误≤1) ===");
    println!("提示：先精确匹配，失败再模糊匹配。输入 exit 退出。");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!(">>> ");
        io::stdout()
            .flush()
            .map_err(|e| MatcherError::io("<stdout>", e))?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| MatcherError::io("<stdin>", e))?;
        let raw = line.trim();
        if raw == "exit" {
            break;
        }

        let start = Instant::now();
        let result = state.lookup(raw)?;
        let elapsed_ms = start.elapsed().as_nanos() as f64 / 1_000_000.0;

        match &result.command {
            Some(cmd) => {
                println!("识别结果：{cmd}");
                println!("匹配方式：{}", result.mode.label());
            }
            None => println!("识别结果：未识别"),
        }
        println!("识别延迟：{elapsed_ms:.2} ms");
    }
    Ok(())
}

fn run_eval(
    config: &AppConfig,
    datasets: &[PathBuf],
    show_failures: usize,
    format: OutputFormat,
) -> Result<()> {
    let matcher = build_matcher(config)?;

    let mut summaries = Vec::new();
    let mut all_results: Vec<CaseResult> = Vec::new();
    for path in datasets {
        let cases = read_dataset(path)?;
        let results = evaluate(&matcher, &cases);
        let title = path.display().to_string();

        match format {
            OutputFormat::Text => print!("{}", render_report(&title, &results, show_failures)),
            OutputFormat::Json => summaries.push(DatasetSummary {
                dataset: title,
                summary: Summary::from_results(&results),
            }),
        }
        all_results.extend(results);
    }

    match format {
        OutputFormat::Text => {
            if datasets.len() > 1 {
                print!("{}", render_report("总计", &all_results, show_failures));
            }
        }
        OutputFormat::Json => {
            if datasets.len() > 1 {
                summaries.push(DatasetSummary {
                    dataset: "total".to_string(),
                    summary: Summary::from_results(&all_results),
                });
            }
            match serde_json::to_string_pretty(&summaries) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("序列化评估结果失败: {e}"),
            }
        }
    }
    Ok(())
}

fn run_gen_dataset(config: &AppConfig, out_dir: &std::path::Path, count: usize) -> Result<()> {
    let commands = config.commands()?;
    for kind in DatasetKind::ALL {
        let cases = generate(kind, &commands, count, kind.default_seed());
        let path = out_dir.join(kind.file_name());
        write_dataset(&path, &cases)?;

        println!("\n=== {} (显示 {}/{}) ===", kind.file_name(), cases.len().min(10), cases.len());
        for case in cases.iter().take(10) {
            println!("{} -> {}", case.input, case.expected);
        }
        println!("已保存到 {}", path.display());
    }
    Ok(())
}
