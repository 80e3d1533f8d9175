//! Reader for the textual model description.
//!
//! ```text
//! States S0:2, S1, S2;          // optional integer reward after ':'
//! Actions a, b;                 // zero or more blocks
//! S0 [a] -> 5 : S1 + 5 : S2;    // transition under an action
//! S1 -> 1 : S0;                 // transition without action
//! ```
//!
//! Declarations are replayed, in order, to a [`DeclarationSink`].

use std::path::Path;

use anyhow::{Context, Result};
use mdpcheck_model::{BuildConfig, DeclarationSink, Model, ModelBuilder, ModelError};
use tracing::debug;

/// Failure while reading a model description.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The text does not follow the grammar.
    #[error("line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// A well-formed declaration was rejected by the model.
    #[error("line {line}, column {column}: {source}")]
    Declaration {
        line: usize,
        column: usize,
        #[source]
        source: ModelError,
    },
}

/// Reads `path`, replays it into a [`ModelBuilder`] and builds the model.
pub fn load_model(path: &Path, config: BuildConfig, initial: Option<&str>) -> Result<Model> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model: {}", path.display()))?;
    let mut builder = ModelBuilder::new().with_config(config);
    read_model(&text, &mut builder)
        .with_context(|| format!("failed to parse model: {}", path.display()))?;
    let model = builder
        .build(initial)
        .with_context(|| format!("invalid model: {}", path.display()))?;
    debug!(
        path = %path.display(),
        n_states = model.n_states(),
        n_actions = model.n_actions() - 1,
        "model loaded"
    );
    Ok(model)
}

/// Parses `source` and reports every declaration to `sink`.
pub fn read_model<S>(source: &str, sink: &mut S) -> Result<(), ReadError>
where
    S: DeclarationSink<Error = ModelError>,
{
    let tokens = lex(source)?;
    Parser { tokens, pos: 0 }.program(sink)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok<'a> {
    States,
    Actions,
    Ident(&'a str),
    Int(&'a str),
    Colon,
    Arrow,
    Semi,
    Comma,
    Plus,
    Minus,
    LBracket,
    RBracket,
    Eof,
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::States => f.write_str("'States'"),
            Tok::Actions => f.write_str("'Actions'"),
            Tok::Ident(s) => write!(f, "identifier {s:?}"),
            Tok::Int(s) => write!(f, "integer {s}"),
            Tok::Colon => f.write_str("':'"),
            Tok::Arrow => f.write_str("'->'"),
            Tok::Semi => f.write_str("';'"),
            Tok::Comma => f.write_str("','"),
            Tok::Plus => f.write_str("'+'"),
            Tok::Minus => f.write_str("'-'"),
            Tok::LBracket => f.write_str("'['"),
            Tok::RBracket => f.write_str("']'"),
            Tok::Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    tok: Tok<'a>,
    line: usize,
    column: usize,
}

fn lex(source: &str) -> Result<Vec<Token<'_>>, ReadError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let (mut i, mut line, mut line_start) = (0, 1, 0);

    while i < bytes.len() {
        let c = bytes[i];
        let column = i - line_start + 1;
        let start = i;
        let tok = match c {
            b'\n' => {
                i += 1;
                line += 1;
                line_start = i;
                continue;
            }
            b' ' | b'\t' | b'\r' => {
                i += 1;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'-' if bytes.get(i + 1) == Some(&b'>') => {
                i += 2;
                Tok::Arrow
            }
            b'-' => {
                i += 1;
                Tok::Minus
            }
            b':' | b';' | b',' | b'+' | b'[' | b']' => {
                i += 1;
                match c {
                    b':' => Tok::Colon,
                    b';' => Tok::Semi,
                    b',' => Tok::Comma,
                    b'+' => Tok::Plus,
                    b'[' => Tok::LBracket,
                    _ => Tok::RBracket,
                }
            }
            b'0'..=b'9' => {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                Tok::Int(&source[start..i])
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                match &source[start..i] {
                    "States" => Tok::States,
                    "Actions" => Tok::Actions,
                    word => Tok::Ident(word),
                }
            }
            _ => {
                let ch = source[i..].chars().next().unwrap_or('?');
                return Err(ReadError::Syntax {
                    line,
                    column,
                    message: format!("unexpected character {ch:?}"),
                });
            }
        };
        tokens.push(Token { tok, line, column });
    }

    tokens.push(Token {
        tok: Tok::Eof,
        line,
        column: bytes.len() - line_start + 1,
    });
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn program<S>(&mut self, sink: &mut S) -> Result<(), ReadError>
    where
        S: DeclarationSink<Error = ModelError>,
    {
        self.expect(Tok::States)?;
        loop {
            let at = self.peek();
            let label = self.ident("state name")?;
            let reward = if self.eat(Tok::Colon) {
                Some(self.reward()?)
            } else {
                None
            };
            declared(at, sink.on_state_declared(label, reward))?;
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::Semi)?;

        while self.peek().tok == Tok::Actions {
            let at = self.advance();
            let mut labels = vec![self.ident("action name")?];
            while self.eat(Tok::Comma) {
                labels.push(self.ident("action name")?);
            }
            self.expect(Tok::Semi)?;
            declared(at, sink.on_actions_declared(&labels))?;
        }

        while self.peek().tok != Tok::Eof {
            let at = self.peek();
            let source = self.ident("source state")?;
            let action = if self.eat(Tok::LBracket) {
                let action = self.ident("action name")?;
                self.expect(Tok::RBracket)?;
                Some(action)
            } else {
                None
            };
            self.expect(Tok::Arrow)?;
            let mut branches = vec![self.branch()?];
            while self.eat(Tok::Plus) {
                branches.push(self.branch()?);
            }
            self.expect(Tok::Semi)?;
            let result = match action {
                Some(action) => sink.on_transition_with_action(source, action, &branches),
                None => sink.on_transition_no_action(source, &branches),
            };
            declared(at, result)?;
        }
        Ok(())
    }

    /// `weight : target`
    fn branch(&mut self) -> Result<(u64, &'a str), ReadError> {
        let at = self.peek();
        let Tok::Int(digits) = self.advance().tok else {
            return Err(unexpected(at, "a weight"));
        };
        let weight = digits.parse().map_err(|_| ReadError::Syntax {
            line: at.line,
            column: at.column,
            message: format!("weight {digits} is too large"),
        })?;
        self.expect(Tok::Colon)?;
        Ok((weight, self.ident("target state")?))
    }

    fn reward(&mut self) -> Result<i64, ReadError> {
        let negative = self.eat(Tok::Minus);
        let at = self.peek();
        let Tok::Int(digits) = self.advance().tok else {
            return Err(unexpected(at, "a reward"));
        };
        let value: i64 = digits.parse().map_err(|_| ReadError::Syntax {
            line: at.line,
            column: at.column,
            message: format!("reward {digits} is too large"),
        })?;
        Ok(if negative { -value } else { value })
    }

    fn ident(&mut self, what: &str) -> Result<&'a str, ReadError> {
        let at = self.peek();
        match at.tok {
            Tok::Ident(name) => {
                self.pos += 1;
                Ok(name)
            }
            _ => Err(unexpected(at, what)),
        }
    }

    fn expect(&mut self, tok: Tok<'static>) -> Result<(), ReadError> {
        if self.eat(tok) {
            Ok(())
        } else {
            Err(unexpected(self.peek(), &tok.to_string()))
        }
    }

    fn eat(&mut self, tok: Tok<'static>) -> bool {
        if self.peek().tok == tok {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Token<'a> {
        self.tokens[self.pos]
    }

    /// Returns the current token and moves past it; `Eof` is never consumed.
    fn advance(&mut self) -> Token<'a> {
        let t = self.tokens[self.pos];
        if t.tok != Tok::Eof {
            self.pos += 1;
        }
        t
    }
}

fn unexpected(at: Token<'_>, expected: &str) -> ReadError {
    ReadError::Syntax {
        line: at.line,
        column: at.column,
        message: format!("expected {expected}, found {}", at.tok),
    }
}

fn declared(at: Token<'_>, result: Result<(), ModelError>) -> Result<(), ReadError> {
    result.map_err(|source| ReadError::Declaration {
        line: at.line,
        column: at.column,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdpcheck_model::NO_ACTION;
    use std::io::Write;

    const EXAMPLE: &str = "\
// two-action toy
States S0, S1:5, S2:-1;
Actions a, b;
Actions c;
S0 [a] -> 1 : S1 + 3 : S2;
S0 [b] -> 2 : S0;
S1 -> 1 : S1;
S2 [c] -> 1 : S0;
";

    fn build(text: &str) -> Result<Model, ReadError> {
        let mut b = ModelBuilder::new();
        read_model(text, &mut b)?;
        Ok(b.build(None).expect("build failed"))
    }

    #[test]
    fn reads_states_actions_and_transitions() {
        let m = build(EXAMPLE).unwrap();
        assert_eq!(m.states(), &["S0", "S1", "S2"]);
        assert_eq!(m.rewards(), &[0.0, 5.0, -1.0]);
        assert_eq!(m.n_actions(), 4);
        let a = m.action_index("a").unwrap();
        let b = m.action_index("b").unwrap();
        assert_eq!(m.prob(0, a, 1), 0.25);
        assert_eq!(m.prob(0, a, 2), 0.75);
        assert_eq!(m.prob(0, b, 0), 1.0);
        assert_eq!(m.prob(1, NO_ACTION, 1), 1.0);
        assert_eq!(m.enabled_actions(2), &[m.action_index("c").unwrap()]);
    }

    #[test]
    fn syntax_error_reports_position() {
        let err = build("States A, B;\nA -> 1 B;\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2, column 8: expected ':', found identifier \"B\""
        );
    }

    #[test]
    fn missing_states_block() {
        let err = build("Actions a;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1, column 1: expected 'States', found 'Actions'"
        );
    }

    #[test]
    fn unexpected_character() {
        let err = build("States A;\nA -> 1 : A; #").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2, column 13: unexpected character '#'"
        );
    }

    #[test]
    fn truncated_input() {
        let err = build("States A;\nA -> 1 : A").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2, column 11: expected ';', found end of input"
        );
    }

    #[test]
    fn declaration_errors_carry_position() {
        let err = build("States A, B;\nA -> 1 : B;\n  A -> 2 : B;\n").unwrap_err();
        assert!(matches!(
            err,
            ReadError::Declaration {
                line: 3,
                column: 3,
                source: ModelError::DuplicateTransition { .. }
            }
        ));

        let err = build("States A;\nA [go] -> 1 : A;").unwrap_err();
        assert!(matches!(
            err,
            ReadError::Declaration {
                source: ModelError::UnknownAction { .. },
                ..
            }
        ));
    }

    #[test]
    fn keywords_are_not_state_names() {
        assert!(matches!(
            build("States Actions;").unwrap_err(),
            ReadError::Syntax { .. }
        ));
    }

    #[test]
    fn load_model_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();
        let m = load_model(file.path(), BuildConfig::new(), Some("S1")).unwrap();
        assert_eq!(m.initial_state(), 1);

        let err = load_model(file.path(), BuildConfig::new(), Some("S9")).unwrap_err();
        assert!(format!("{err:#}").contains("invalid model"));
    }

    #[test]
    fn load_model_missing_file() {
        let err = load_model(Path::new("/nonexistent/model.mdp"), BuildConfig::new(), None)
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to read model"));
    }
}
