//! `fnf-sm` converts a Friday Night Funkin' chart into a StepMania simfile and back.
//!
//! Usage:
//!   fnf-sm bopeebo.json --side dad
//!   fnf-sm Bopeebo.sm --difficulty Hard -o bopeebo-hard.json

use std::{
    ffi::OsStr,
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use fnf_sm::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(help = "Chart to convert, a FNF chart (.json) or a simfile (.sm).")]
    input: PathBuf,

    #[arg(
        short,
        long,
        help = "Side to convert from a FNF chart, `boyfriend` or `dad` (asked if omitted)."
    )]
    side: Option<Side>,

    #[arg(
        short,
        long,
        default_value = "Challenge",
        help = "Difficulty of the simfile chart to convert into a FNF chart."
    )]
    difficulty: String,

    #[arg(
        short,
        long,
        help = "Output path (defaults to the song title in the current directory)."
    )]
    output: Option<PathBuf>,

    #[arg(long, help = "Use the boyfriend side instead of asking when --side is omitted.")]
    no_prompt: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let extension = cli
        .input
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => convert_fnf(&cli),
        Some("sm") => convert_sm(&cli),
        _ => bail!(
            "unsupported input `{}`, expected a .json or .sm file",
            cli.input.display()
        ),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn convert_fnf(cli: &Cli) -> Result<()> {
    let mut charts = Vec::new();
    for (difficulty, path) in sibling_difficulty_paths(&cli.input) {
        if difficulty != Difficulty::Medium && !path.is_file() {
            continue;
        }
        let source = read(&path)?;
        let chart =
            parse_fnf(&source).with_context(|| format!("failed to parse {}", path.display()))?;
        info!("loaded {difficulty} chart from {}", path.display());
        charts.push(DifficultyChart {
            difficulty,
            song: chart.song,
        });
    }

    let side = match cli.side {
        Some(side) => side,
        None if cli.no_prompt => Side::Primary,
        None => prompt_side()?,
    };
    let output = fnf_to_sm(&charts, FnfToSmOptions { side })?;
    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.sm", output.simfile.title)));
    info!("converting {} to {}", cli.input.display(), path.display());
    write(&path, &output.simfile.unparse())
}

fn prompt_side() -> Result<Side> {
    print!("Whose side would you like to convert? (boyfriend/dad) ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(Side::from_str_lossy(&answer))
}

fn convert_sm(cli: &Cli) -> Result<()> {
    let source = read(&cli.input)?;
    let parsed = parse_sm(&source);
    emit_sm_warnings(
        &cli.input.to_string_lossy(),
        &source,
        &parsed.warnings,
    );

    let options = SmToFnfOptions {
        difficulty: cli.difficulty.clone(),
    };
    let output = sm_to_fnf(&parsed.simfile, &options)?;
    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.json", output.chart.song.title)));
    info!("converting {} to {}", cli.input.display(), path.display());
    write(&path, &output.chart.to_json()?)
}
