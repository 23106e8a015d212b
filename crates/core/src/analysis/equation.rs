//! Tokenizer for the equation string.
//!
//! The only guaranteed grammar: pieces separated by `=`, `+` and `*`.
//! Separators become operator tokens; every other piece is a number when
//! it parses as one, a label otherwise.

use serde::{Deserialize, Serialize};

const OPERATORS: [char; 3] = ['=', '+', '*'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Label,
    Operator,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationToken {
    pub kind: TokenKind,
    pub text: String,
}

impl EquationToken {
    fn operator(op: char) -> Self {
        Self {
            kind: TokenKind::Operator,
            text: op.to_string(),
        }
    }

    fn operand(piece: &str) -> Self {
        let kind = if piece.parse::<f64>().is_ok_and(f64::is_finite) {
            TokenKind::Number
        } else {
            TokenKind::Label
        };
        Self {
            kind,
            text: piece.to_string(),
        }
    }
}

/// Split an equation into ordered, classified tokens.
pub fn tokenize_equation(equation: &str) -> Vec<EquationToken> {
    let mut tokens = Vec::new();
    let mut rest = equation;

    while let Some(pos) = rest.find(OPERATORS) {
        push_operand(&mut tokens, &rest[..pos]);
        // Operators are single-byte ASCII
        let op = rest.as_bytes()[pos] as char;
        tokens.push(EquationToken::operator(op));
        rest = &rest[pos + 1..];
    }
    push_operand(&mut tokens, rest);

    tokens
}

fn push_operand(tokens: &mut Vec<EquationToken>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        tokens.push(EquationToken::operand(piece));
    }
}
