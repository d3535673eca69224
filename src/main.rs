//! # pleximo 命令行入口
//!
//! 本文件只负责参数解析、日志初始化与输出写入，
//! 业务逻辑全部在库中，详见 `lib.rs` 架构文档。

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use pleximo::{PatternConfig, PatternError, ResizeFilter, Session, render_html};

/// 输出格式。
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// 指令清单（HTML 表格）
    Html,
    /// 打印文档：内嵌预览图 + 指令清单
    Document,
    /// 指令表 JSON
    Json,
}

/// Turn an image into diagonal stringing instructions
#[derive(Debug, Parser)]
#[command(name = "pleximo", version, about)]
struct CliArgs {
    /// Image file to load
    image: PathBuf,

    /// Target width (defaults to the image width)
    #[arg(long)]
    width: Option<i32>,

    /// Target height (defaults to the image height)
    #[arg(long)]
    height: Option<i32>,

    /// Palette size (defaults to the number of colors in the image)
    #[arg(long)]
    colors: Option<i32>,

    /// Margins as TOP,BOTTOM,LEFT,RIGHT; negative values pad, positive values crop
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    margins: Option<Vec<i32>>,

    /// Resampling filter: nearest, triangle, catmull-rom, lanczos3
    #[arg(long)]
    filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(args: &CliArgs) -> Result<PatternConfig, PatternError> {
    let mut config = match &args.config {
        Some(path) => PatternConfig::load_from_path(path)?,
        None => PatternConfig::default(),
    };
    if let Some(name) = &args.filter {
        config.resize_filter = ResizeFilter::parse(name)?;
    }
    Ok(config)
}

fn run(args: &CliArgs) -> Result<String, PatternError> {
    let mut session = Session::new(load_config(args)?);
    session.load_file(&args.image)?;

    let state = session.state()?;
    if args.width.is_some() || args.height.is_some() {
        session.resize(
            args.height.unwrap_or(state.height),
            args.width.unwrap_or(state.width),
        )?;
    }
    if let Some(colors) = args.colors {
        session.recolor(colors)?;
    }
    if let Some(margins) = &args.margins {
        if let [top, bottom, left, right] = margins.as_slice() {
            session.set_margins(*top, *bottom, *left, *right)?;
        } else {
            return Err(PatternError::InvalidFormat(
                "--margins 需要 4 个整数：TOP,BOTTOM,LEFT,RIGHT".to_string(),
            ));
        }
    }

    match args.format {
        OutputFormat::Html => Ok(render_html(&session.compute_pattern()?.table)),
        OutputFormat::Document => session.export_document(),
        OutputFormat::Json => session.compute_pattern()?.table.to_json(),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let output = match run(&args) {
        Ok(output) => output,
        Err(err) => {
            log::error!("生成指令失败 [{}:{}]: {err}", err.stage(), err.code());
            return ExitCode::FAILURE;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(err) = fs::write(path, output) {
                log::error!("写入输出文件失败: {err}");
                return ExitCode::FAILURE;
            }
            log::info!("已写入 {}", path.display());
        }
        None => println!("{output}"),
    }

    ExitCode::SUCCESS
}
