pub mod api;
pub mod ast;
pub mod encoding;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod performer;
pub mod report;

pub use api::{compile, compile_events, source_until_nul};
pub use ast::*;
pub use encoding::{segment, Block, Event, Segment};
pub use error::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::parse;
pub use performer::{perform, Performer};
