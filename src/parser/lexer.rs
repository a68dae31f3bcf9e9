//! Lexer for template expressions using logos

use logos::Logos;

use super::ast::Span;

/// Template tokens. Whitespace is significant outside placeholders, so nothing is skipped.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Placeholder delimiters (longer patterns win over single braces)
    #[token("{{")]
    PlaceholderOpen,
    #[token("}}")]
    PlaceholderClose,

    // A lone brace is plain text
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,

    // Everything between braces
    #[regex(r"[^{}]+", |lex| lex.slice().to_string())]
    Text(String),
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
