//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Split the inside of a placeholder into namespace and key
///
/// The key keeps any further dots so nested tables (`colors.triad.first`) resolve.
fn reference_from(inner: &str, span: Span) -> Result<Reference, String> {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return Err("empty placeholder".to_string());
    }
    if trimmed.contains(char::is_whitespace) {
        return Err(format!(
            "placeholder '{}' must be a single 'namespace.key' reference",
            trimmed
        ));
    }
    match trimmed.split_once('.') {
        Some((namespace, key)) if !namespace.is_empty() && !key.is_empty() => Ok(
            Reference::new(Namespace::from_name(namespace), key, span),
        ),
        _ => Err(format!(
            "placeholder '{}' must have the form 'namespace.key'",
            trimmed
        )),
    }
}

/// Parse a template string into an expression
pub fn parse(input: &str) -> Result<Expr, Vec<crate::ExpressionError>> {
    let len = input.len();

    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    expression_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn expression_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // Runs of text and stray single braces merge into one literal
    let literal = select! {
        Token::Text(s) => s,
        Token::BraceOpen => "{".to_string(),
        Token::BraceClose => "}".to_string(),
    }
    .repeated()
    .at_least(1)
    .collect::<Vec<String>>()
    .map(|parts| Expr::Literal(parts.concat()));

    let reference = select! {
        Token::Text(s) => s,
    }
    .or_not()
    .delimited_by(just(Token::PlaceholderOpen), just(Token::PlaceholderClose))
    .try_map(|inner, span: SimpleSpan| {
        reference_from(inner.as_deref().unwrap_or(""), span.into_range())
            .map(Expr::Reference)
            .map_err(|message| Rich::custom(span, message))
    });

    choice((reference, literal))
        .repeated()
        .collect::<Vec<Expr>>()
        .then_ignore(end())
        .map(Expr::from_parts)
}
