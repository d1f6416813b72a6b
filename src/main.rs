use rummikub_resolver::{RuleSet, Selection, resolve_move};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: rummikub-resolver [--initial] [--rules=<json>] [--play=\"r5 b6\"] [--print-rules] <meld>...
  each <meld> is a bag of tiles, e.g. \"r5 w w\" or \"b7 y7 k7\"";

/// Parsed command line
struct Args {
    initial_meld: bool,
    rules: RuleSet,
    play: Vec<String>,
    melds: Vec<String>,
    print_rules: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args {
        initial_meld: false,
        rules: RuleSet::default(),
        play: Vec::new(),
        melds: Vec::new(),
        print_rules: false,
    };

    for arg in args {
        if arg == "--initial" {
            parsed.initial_meld = true;
        } else if arg == "--print-rules" {
            parsed.print_rules = true;
        } else if let Some(rest) = arg.strip_prefix("--rules=") {
            parsed.rules = serde_json::from_str(rest).map_err(|e| format!("Invalid rules: {}", e))?;
        } else if let Some(rest) = arg.strip_prefix("--play=") {
            parsed.play = rest.split_whitespace().map(str::to_string).collect();
        } else if arg.starts_with("--") {
            return Err(format!("unrecognized argument '{}'\n{}", arg, USAGE));
        } else {
            parsed.melds.push(arg);
        }
    }

    Ok(parsed)
}

fn run(args: Args) -> Result<(), String> {
    if args.print_rules {
        let json = serde_json::to_string_pretty(&args.rules).map_err(|e| e.to_string())?;
        println!("{}", json);
        return Ok(());
    }

    let play: Vec<&str> = args.play.iter().map(String::as_str).collect();
    let melds: Vec<&str> = args.melds.iter().map(String::as_str).collect();
    let selection = Selection::from_notation(&play, &melds, play.len() as f64, &args.rules)
        .map_err(|e| format!("Invalid tile: {}", e))?;

    let result = resolve_move(&selection, &args.rules, args.initial_meld);
    let json = serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match parse_args(env::args().skip(1)).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
