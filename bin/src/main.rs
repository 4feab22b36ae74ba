use std::{
    io::{stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use driver::Options;
use termcolor::{ColorChoice, StandardStream};

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(clap::Parser)]
#[command(about = "Scan and parse FemCode source, printing the syntax tree")]
struct Args {
    /// Source file. Runs a built-in sample program when omitted.
    file: Option<PathBuf>,

    /// Also print the token stream.
    #[arg(long)]
    tokens: bool,

    /// When to colorize diagnostics. `NO_COLOR` always turns colors off.
    #[arg(long, value_enum, default_value_t)]
    color: Color,
}

/// `no_color` wins over any `--color` value.
fn color_choice(color: Color, no_color: bool) -> ColorChoice {
    if no_color {
        return ColorChoice::Never;
    }
    match color {
        Color::Auto => ColorChoice::Auto,
        Color::Always => ColorChoice::Always,
        Color::Never => ColorChoice::Never,
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let source = match &args.file {
        Some(file) => std::fs::read_to_string(file)?,
        None => {
            println!("Running sample program:{}", driver::SAMPLE);
            driver::SAMPLE.to_string()
        }
    };

    let mut out = stdout().lock();
    let result = driver::run_source(&source, Options { print_tokens: args.tokens }, &mut out);
    out.flush()?;

    match result {
        Ok(exprs) => {
            log::info!("Parsed {} expressions", exprs.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let choice = color_choice(args.color, std::env::var_os("NO_COLOR").is_some());
            e.report(&mut StandardStream::stderr(choice))?;
            Ok(ExitCode::FAILURE)
        }
    }
}
