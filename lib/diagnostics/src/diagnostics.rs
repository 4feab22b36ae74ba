use std::{
    fmt::Display,
    io,
    ops::{Deref, DerefMut},
};

use cursor::{Col, Line};
use itertools::Itertools;
use termcolor::{Color, ColorSpec, WriteColor};

#[derive(Debug, derive_more::Display, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn color(self) -> Color {
        match self {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        }
    }
}

/// A message about the source, optionally tied to a position.
///
/// The position is only reported when both `line` and `col` are known.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{severity}: {message}{}", location(line, col))]
pub struct Diagnostic {
    pub message: String,
    pub line: Option<Line>,
    pub col: Option<Col>,
    pub severity: Severity,
}

fn location(line: &Option<Line>, col: &Option<Col>) -> String {
    match (line, col) {
        (Some(line), Some(col)) => format!(" at line {line}, column {col}"),
        _ => String::new(),
    }
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl ToString) -> Self {
        Self { message: message.to_string(), line: None, col: None, severity }
    }

    pub fn error(message: impl ToString) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl ToString) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn at(self, line: Line, col: Col) -> Self {
        Self { line: Some(line), col: Some(col), ..self }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Plain, uncolored rendering.
    pub fn format(&self) -> String {
        self.to_string()
    }

    pub fn write_colored(&self, out: &mut impl WriteColor) -> io::Result<()> {
        out.set_color(ColorSpec::new().set_fg(Some(self.severity.color())))?;
        write!(out, "{self}")?;
        out.reset()
    }
}

#[derive(thiserror::Error, Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn write_colored(&self, out: &mut impl WriteColor) -> io::Result<()> {
        for diagnostic in &self.0 {
            diagnostic.write_colored(out)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(d: Diagnostic) -> Self {
        Self(vec![d])
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for Diagnostics {
    type Target = Vec<Diagnostic>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Diagnostics {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
