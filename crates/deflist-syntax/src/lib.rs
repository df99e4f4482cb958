//! # deflist-syntax
//!
//! Tokens and tag vocabulary for the HTML-like markup that deflist documents
//! and editing fixtures are written in.
//!
//! ```text
//! <p>x</p><dl><dt>term[]</dt><dd>value</dd></dl>
//! ```
//!
//! The crate stops at tokens. The tree is built by `deflist-engine`, which
//! owns the document model.
//!
//! ## Module Structure
//!
//! ```text
//! deflist-syntax/
//! ├── lib.rs    # This file - public API
//! ├── lexer.rs  # Logos-based tokenizer, lossless
//! └── tag.rs    # Tag enum: names, void and inline classification
//! ```

pub mod lexer;
pub mod tag;

pub use lexer::{Token, TokenKind, lex, lex_with_spans};
pub use tag::Tag;
