use std::io::{self, Write};

use diagnostics::{Diagnostic, Diagnostics};
use log::debug;
use parser::Expr;
use termcolor::WriteColor;

/// Program run when no file is given.
pub const SAMPLE: &str = r#"
fun add(a, b) {
  a + b
}

fun area(width, height) {
  width * height
}

(1 + 2) * 3 == 9
x + 20 * 2 >= y - 1
"#;

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    UnknownCharacters(Diagnostics),
    #[error("{0}")]
    Parse(#[from] Diagnostic),
    #[error("Error: {0}")]
    Io(#[from] io::Error),
}

impl RunError {
    pub fn diagnostics(&self) -> Diagnostics {
        match self {
            RunError::UnknownCharacters(diagnostics) => diagnostics.clone(),
            RunError::Parse(diagnostic) => diagnostic.clone().into(),
            RunError::Io(e) => Diagnostic::error(e).into(),
        }
    }

    pub fn report(&self, out: &mut impl WriteColor) -> io::Result<()> {
        self.diagnostics().write_colored(out)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    pub print_tokens: bool,
}

/// Scans and parses `source`, writing one line per top-level expression.
///
/// Parsing only starts when the scanner found no unknown characters.
pub fn run_source(
    source: &str,
    options: Options,
    out: &mut impl Write,
) -> Result<Vec<Expr>, RunError> {
    let tokens = scanner::scan(source);
    debug!("Scanned {} tokens", tokens.len());

    let unknown = scanner::unknown_characters(&tokens);
    if !unknown.is_empty() {
        return Err(RunError::UnknownCharacters(unknown));
    }

    if options.print_tokens {
        for token in &tokens {
            writeln!(out, "{} '{}' {}:{}", token.kind, token.lexeme, token.line, token.col)?;
        }
    }

    let exprs = parser::parse(&tokens)?;
    for expr in &exprs {
        writeln!(out, "{expr}")?;
    }

    Ok(exprs)
}
