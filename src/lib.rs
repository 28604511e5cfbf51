pub mod error;
pub mod render;
pub mod scanner;
pub mod shell;

// Re-export the core entry points for convenience
pub use error::{LexError, ShellError};
pub use scanner::{Token, TokenKind, Tokens, tokenize};
