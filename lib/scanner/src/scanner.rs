use cursor::Cursor;
use diagnostics::{Diagnostic, Diagnostics};
use log::trace;

mod token;
pub use token::{Token, TokenType};
use TokenType::*;

/// Single pass over the source. Never fails: characters that fit no rule
/// become `Unknown` tokens, see [`unknown_characters`].
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), tokens: Vec::new() }
    }

    pub fn scan_tokens(mut self) -> Vec<Token> {
        loop {
            let start = self.cursor.clone();
            let Some(c) = self.cursor.next() else {
                break;
            };

            let kind = match c {
                '(' => LeftParen,
                ')' => RightParen,
                '{' => LeftBrace,
                '}' => RightBrace,
                ',' => Comma,
                '.' => Dot,
                '-' => Minus,
                '+' => Plus,
                ';' => Semicolon,
                '*' => Star,

                '!' => self.with_equal(Bang, BangEqual),
                '=' => self.with_equal(Equal, EqualEqual),
                '<' => self.with_equal(Less, LessEqual),
                '>' => self.with_equal(Greater, GreaterEqual),

                ' ' | '\r' | '\t' | '\n' => continue,

                d if d.is_ascii_digit() => self.number(),
                c if is_identifier_start(c) => self.identifier(&start),

                _ => Unknown,
            };

            self.add_token(kind, &start);
        }

        self.tokens.push(Token::new(Eof, "", self.cursor.line(), self.cursor.col()));
        self.tokens
    }

    fn add_token(&mut self, kind: TokenType, start: &Cursor<'a>) {
        let token = Token::new(kind, start.slice_until(&self.cursor), start.line(), start.col());
        trace!("{kind} {:?} at {}:{}", token.lexeme, token.line, token.col);
        self.tokens.push(token);
    }

    fn with_equal(&mut self, single: TokenType, double: TokenType) -> TokenType {
        if self.cursor.next_if_eq('=') {
            double
        } else {
            single
        }
    }

    fn number(&mut self) -> TokenType {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        Number
    }

    fn identifier(&mut self, start: &Cursor<'a>) -> TokenType {
        self.cursor.eat_while(|c| is_identifier_start(c) || c.is_ascii_digit());
        TokenType::keyword(start.slice_until(&self.cursor)).unwrap_or(Identifier)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn scan(source: &str) -> Vec<Token> {
    Scanner::new(source).scan_tokens()
}

/// One warning per `Unknown` token, in source order.
pub fn unknown_characters(tokens: &[Token]) -> Diagnostics {
    tokens
        .iter()
        .filter(|t| t.kind == Unknown)
        .map(|t| {
            Diagnostic::warning(format!("Unexpected character \"{}\"", t.lexeme))
                .at(t.line, t.col)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use cursor::{Col, Line};
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenType> {
        scan(source).into_iter().map(|t| t.kind).collect()
    }

    fn token(kind: TokenType, lexeme: &str, line: usize, col: usize) -> Token {
        Token::new(kind, lexeme, Line(line), Col(col))
    }

    #[test]
    fn single_char_tokens() {
        assert_eq!(
            kinds("( ) { } , . - + ; *"),
            vec![
                LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus, Semicolon,
                Star, Eof
            ]
        );
    }

    #[test]
    fn two_char_tokens() {
        let source = "!= == <= >= < > ! =";
        assert_eq!(
            kinds(source),
            vec![BangEqual, EqualEqual, LessEqual, GreaterEqual, Less, Greater, Bang, Equal, Eof]
        );

        let lexemes = scan(source).into_iter().map(|t| t.lexeme).collect_vec();
        assert_eq!(lexemes, vec!["!=", "==", "<=", ">=", "<", ">", "!", "=", ""]);
    }

    #[test]
    fn greedy_operators_without_spaces() {
        assert_eq!(kinds("!==="), vec![BangEqual, EqualEqual, Eof]);
        assert_eq!(kinds("<>="), vec![Less, GreaterEqual, Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            scan("fun if nil foo123 _bar"),
            vec![
                token(Fun, "fun", 1, 1),
                token(If, "if", 1, 5),
                token(Nil, "nil", 1, 8),
                token(Identifier, "foo123", 1, 12),
                token(Identifier, "_bar", 1, 19),
                token(Eof, "", 1, 23),
            ]
        );

        assert_eq!(
            kinds("and class else false for or"),
            vec![And, Class, Else, False, For, Or, Eof]
        );
        // Keywords must match the whole identifier.
        assert_eq!(kinds("funny orchid iffy"), vec![Identifier, Identifier, Identifier, Eof]);
    }

    #[test]
    fn numbers() {
        assert_eq!(scan("\n\n123"), vec![token(Number, "123", 3, 1), token(Eof, "", 3, 4)]);

        // No decimal point, no sign.
        assert_eq!(
            scan("-4.25"),
            vec![
                token(Minus, "-", 1, 1),
                token(Number, "4", 1, 2),
                token(Dot, ".", 1, 3),
                token(Number, "25", 1, 4),
                token(Eof, "", 1, 6),
            ]
        );

        // A digit run ends where the identifier starts.
        assert_eq!(
            scan("12ab"),
            vec![token(Number, "12", 1, 1), token(Identifier, "ab", 1, 3), token(Eof, "", 1, 5)]
        );
    }

    #[test]
    fn whitespace_and_lines() {
        assert_eq!(scan(""), vec![token(Eof, "", 1, 1)]);
        assert_eq!(scan(" \t\r\n"), vec![token(Eof, "", 2, 1)]);

        assert_eq!(
            scan("a\n  b\r\n\tc"),
            vec![
                token(Identifier, "a", 1, 1),
                token(Identifier, "b", 2, 3),
                token(Identifier, "c", 3, 2),
                token(Eof, "", 3, 3),
            ]
        );
    }

    #[test]
    fn unknown_characters_do_not_stop_the_scan() {
        assert_eq!(scan("$"), vec![token(Unknown, "$", 1, 1), token(Eof, "", 1, 2)]);

        assert_eq!(
            scan("a $ 1 / \"s\""),
            vec![
                token(Identifier, "a", 1, 1),
                token(Unknown, "$", 1, 3),
                token(Number, "1", 1, 5),
                token(Unknown, "/", 1, 7),
                token(Unknown, "\"", 1, 9),
                token(Identifier, "s", 1, 10),
                token(Unknown, "\"", 1, 11),
                token(Eof, "", 1, 12),
            ]
        );

        assert_eq!(kinds("é"), vec![Unknown, Eof]);
        assert_eq!(scan("é")[0].lexeme, "é");
    }

    #[test]
    fn slash_and_string_are_never_produced() {
        let tokens = scan("/ \"hello\" // 1 / 2");
        assert!(tokens.iter().all(|t| t.kind != Slash && t.kind != TokenType::String));
    }

    #[test]
    fn lexemes_reconstruct_non_whitespace_input() {
        for source in [
            "",
            "fun add(a, b) { a + b }",
            "x = 10;\ny = x + 20 * 2;\n",
            "!===<=>=$@#\t\r\n 007 _x1 é",
            "((((1))))",
        ] {
            let expected = source
                .chars()
                .filter(|c| !matches!(c, ' ' | '\r' | '\t' | '\n'))
                .collect::<std::string::String>();
            let actual = scan(source).iter().map(|t| t.lexeme.as_str()).join("");
            assert_eq!(actual, expected, "source: {source:?}");
        }
    }

    #[test]
    fn reports_unknown_characters() {
        let tokens = scan("1 + $\n@ 2");
        assert_eq!(
            unknown_characters(&tokens),
            Diagnostics(vec![
                Diagnostic::warning("Unexpected character \"$\"").at(Line(1), Col(5)),
                Diagnostic::warning("Unexpected character \"@\"").at(Line(2), Col(1)),
            ])
        );

        assert!(unknown_characters(&scan("fun f() { 1 }")).is_empty());
    }

    #[test]
    fn token_type_display() {
        assert_eq!(LeftParen.to_string(), "LeftParen");
        assert_eq!(Eof.to_string(), "Eof");
        assert_eq!(token(Number, "42", 1, 1).to_string(), "42");
    }
}
