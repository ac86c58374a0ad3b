//! relayout - diagnostic CLI for the layout-correction engine.
//!
//! Reads words from the command line (or stdin, one line per input) and
//! prints the traced cascade decision for each. Lines recognized as shell
//! commands are reported as such and skipped whole.

use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use relayout::config::load_config;
use relayout::engine::ValidationEngine;
use relayout::layout::KeyboardLayout;
use relayout::ngram::NgramScorer;
use relayout::store::UserStores;

#[derive(Parser, Debug)]
#[command(name = "relayout")]
struct Cli {
    /// Layout the words were typed under
    #[arg(long, value_enum, default_value = "latin")]
    layout: LayoutArg,

    /// Layout the user most recently switched to, if any
    #[arg(long, value_enum)]
    bias: Option<LayoutArg>,

    /// Words to analyze; reads stdin line by line when empty
    words: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    #[value(alias = "ru")]
    Cyrillic,
    #[value(alias = "en")]
    Latin,
}

impl From<LayoutArg> for KeyboardLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Cyrillic => KeyboardLayout::Cyrillic,
            LayoutArg::Latin => KeyboardLayout::Latin,
        }
    }
}

fn stores_dir() -> std::path::PathBuf {
    relayout::config::config_path()
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}

fn report_line(engine: &ValidationEngine, line: &str, layout: KeyboardLayout, bias: Option<KeyboardLayout>) {
    // A shell command line is exempt as a whole, not word by word.
    if line.split_whitespace().nth(1).is_some() && engine.is_cli_command(line) {
        println!("{:?}\n  verdict: keep (shell command line)", line);
        return;
    }
    for word in line.split_whitespace() {
        println!("{}", engine.explain(word, layout, bias));
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let layout = KeyboardLayout::from(cli.layout);
    let bias = cli.bias.map(KeyboardLayout::from);

    let config = load_config();

    let scorer = match NgramScorer::embedded() {
        Ok(scorer) => scorer,
        Err(e) => {
            // Degraded but functional: deterministic layers still work.
            log::error!("embedded n-gram tables failed to load: {}", e);
            NgramScorer::neutral()
        }
    };

    let stores = Arc::new(UserStores::load(stores_dir()));
    let engine = ValidationEngine::new(scorer, stores).with_config(config);

    if cli.words.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    eprintln!("stdin read failed: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            report_line(&engine, line.trim(), layout, bias);
        }
    } else {
        let line = cli.words.join(" ");
        report_line(&engine, &line, layout, bias);
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["relayout", "ghbdtn"]).unwrap();
        assert!(matches!(cli.layout, LayoutArg::Latin));
        assert!(cli.bias.is_none());
        assert_eq!(cli.words, vec!["ghbdtn"]);
    }

    #[test]
    fn test_layout_flags_and_aliases() {
        let cli = Cli::try_parse_from(["relayout", "--layout", "cyrillic", "--bias", "en"]).unwrap();
        assert_eq!(KeyboardLayout::from(cli.layout), KeyboardLayout::Cyrillic);
        assert_eq!(cli.bias.map(KeyboardLayout::from), Some(KeyboardLayout::Latin));

        let cli = Cli::try_parse_from(["relayout", "--layout", "ru"]).unwrap();
        assert_eq!(KeyboardLayout::from(cli.layout), KeyboardLayout::Cyrillic);
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        assert!(Cli::try_parse_from(["relayout", "--layout", "dvorak"]).is_err());
    }

    #[test]
    fn test_help_is_not_a_parse_failure() {
        let err = Cli::try_parse_from(["relayout", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
