//! shallow syntactic check for expression text
//!
//! only parenthesis balance and quote closure are checked. operators,
//! identifiers and types are not.

use serde::Serialize;

/// outcome of [`validate_expression`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExpressionCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn fail(message: &str) -> Self {
        Self {
            valid: false,
            error: Some(message.to_string()),
        }
    }
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// scan expression text for unbalanced parentheses or an unclosed quote
///
/// parentheses inside a quoted span are not counted. a quote character only
/// closes the span opened by the same character.
pub fn validate_expression(text: &str) -> ExpressionCheck {
    let mut depth: i64 = 0;
    let mut open_quote: Option<char> = None;

    for c in text.chars() {
        match open_quote {
            Some(q) => {
                if c == q {
                    open_quote = None;
                }
            }
            None => {
                if is_quote(c) {
                    open_quote = Some(c);
                } else if c == '(' {
                    depth += 1;
                } else if c == ')' {
                    depth -= 1;
                }
            }
        }
    }

    if depth != 0 {
        return ExpressionCheck::fail("Unbalanced parentheses");
    }
    if open_quote.is_some() {
        return ExpressionCheck::fail("Unclosed quote");
    }

    ExpressionCheck::ok()
}
