use anyhow::Context;
use hanatrace_core::{trace_episode, ReplayOutcome};
use hanatrace_data::{load_constants, GameDataset, RawTensors};
use std::fs;
use std::path::PathBuf;

const DEFAULT_CONSTANTS: &str = "assets/logging_constants.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Trace,
    Dump,
}

#[derive(Debug, Clone)]
struct CliOptions {
    mode: Mode,
    input: PathBuf,
    out_dir: PathBuf,
    constants: PathBuf,
    game: Option<usize>,
    json: bool,
}

fn print_usage() {
    eprintln!("usage: hanatrace <trace|dump> --input <file> --out-dir <dir> [options]");
    eprintln!();
    eprintln!("  trace       replay episodes and write game_<n>.txt logs");
    eprintln!("  dump        write raw game_<n>.json dumps of the stored tensors");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --input <file>       safetensors dataset to read (required)");
    eprintln!("  --out-dir <dir>      directory for per-game output files (required)");
    eprintln!("  --constants <file>   logging constants JSON (default {DEFAULT_CONSTANTS})");
    eprintln!("  --game <idx>         process a single 0-based game index");
    eprintln!("  --json               trace mode: also write game_<n>.trace.json");
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mode = match args.first().map(String::as_str) {
        Some("trace") => Mode::Trace,
        Some("dump") => Mode::Dump,
        Some(other) => return Err(format!("unknown mode: {other}")),
        None => return Err("missing mode".to_string()),
    };
    let mut input = None;
    let mut out_dir = None;
    let mut constants = PathBuf::from(DEFAULT_CONSTANTS);
    let mut game = None;
    let mut json = false;
    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--input" => {
                input = args.get(idx + 1).map(PathBuf::from);
                idx += 1;
            }
            "--out-dir" => {
                out_dir = args.get(idx + 1).map(PathBuf::from);
                idx += 1;
            }
            "--constants" => {
                if let Some(value) = args.get(idx + 1) {
                    constants = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--game" => {
                let value = args
                    .get(idx + 1)
                    .ok_or_else(|| "--game needs an index".to_string())?;
                game = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid game index: {value}"))?,
                );
                idx += 1;
            }
            "--json" => json = true,
            other => return Err(format!("unknown option: {other}")),
        }
        idx += 1;
    }
    Ok(CliOptions {
        mode,
        input: input.ok_or_else(|| "missing --input".to_string())?,
        out_dir: out_dir.ok_or_else(|| "missing --out-dir".to_string())?,
        constants,
        game,
        json,
    })
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };
    let result = match options.mode {
        Mode::Trace => run_trace(&options),
        Mode::Dump => run_dump(&options),
    };
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn selected_games(total: usize, game: Option<usize>) -> Vec<usize> {
    match game {
        Some(idx) => vec![idx],
        None => (0..total).collect(),
    }
}

fn run_trace(options: &CliOptions) -> anyhow::Result<()> {
    let (actions, colors) = load_constants(&options.constants)?;
    let dataset = GameDataset::open(&options.input)?;
    fs::create_dir_all(&options.out_dir)
        .with_context(|| format!("create {}", options.out_dir.display()))?;

    for idx in selected_games(dataset.len(), options.game) {
        let log_path = options.out_dir.join(format!("game_{}.txt", idx + 1));
        // A bad episode still gets its log file; the batch moves on.
        let episode = match dataset.episode(idx) {
            Ok(episode) => episode,
            Err(err) => {
                fs::write(&log_path, format!("Error tracing game {idx}: {err:#}\n"))
                    .with_context(|| format!("write {}", log_path.display()))?;
                eprintln!("game {}: {err:#}", idx + 1);
                continue;
            }
        };
        let trace = trace_episode(&episode, &actions, &colors);
        fs::write(&log_path, trace.to_text_report())
            .with_context(|| format!("write {}", log_path.display()))?;
        if options.json {
            let json_path = options.out_dir.join(format!("game_{}.trace.json", idx + 1));
            let body = serde_json::to_string_pretty(&trace).context("serialize trace")?;
            fs::write(&json_path, body)
                .with_context(|| format!("write {}", json_path.display()))?;
        }
        if let ReplayOutcome::Failed { error } = &trace.outcome {
            eprintln!("game {}: {error}", idx + 1);
        }
    }
    Ok(())
}

fn run_dump(options: &CliOptions) -> anyhow::Result<()> {
    let tensors = RawTensors::open(&options.input)?;
    println!("=== Tensor Shapes ===");
    for line in tensors.shape_lines() {
        println!("{line}");
    }
    println!("=====================");

    fs::create_dir_all(&options.out_dir)
        .with_context(|| format!("create {}", options.out_dir.display()))?;
    for idx in selected_games(tensors.num_games()?, options.game) {
        let game = tensors.extract_game(idx)?;
        let out_path = options.out_dir.join(format!("game_{}.json", idx + 1));
        let body = serde_json::to_string_pretty(&game).context("serialize game")?;
        fs::write(&out_path, body).with_context(|| format!("write {}", out_path.display()))?;
        println!("extracted game {} to {}", idx + 1, out_path.display());
    }
    Ok(())
}
