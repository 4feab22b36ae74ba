use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use scanner::Token;

/// Owned expression tree. Identifiers and numbers are both kept as
/// literal source text at this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(String),
    Grouping(Box<Expr>),
    Binary { left: Box<Expr>, operator: Token, right: Box<Expr> },
    Function { name: Token, parameters: Vec<Token>, body: Vec<Expr> },
}

impl Expr {
    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => {
                write!(f, "{}", value)
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Function { name, parameters, body } => {
                write!(f, "(fun {} ({})", name, parameters.iter().join(" "))?;
                for expr in body {
                    write!(f, " {}", expr)?;
                }
                write!(f, ")")
            }
        }
    }
}
