pub mod ast;
pub mod eval;

pub use ast::*;
pub use eval::matches;
