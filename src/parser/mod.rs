//! Parser for `{{ namespace.key }}` template expressions

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
