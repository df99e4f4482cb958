//! # Lexer - Tokenizing Document Markup
//!
//! Breaks markup source into tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Characters the
//! grammar does not recognise (a stray `<` or `>`) become [`TokenKind::Unknown`]
//! tokens instead of being dropped, so the parser can report them with a span:
//!
//! ```
//! use deflist_syntax::lexer::lex;
//!
//! let input = "<dl><dt>foo[]</dt></dl>";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Selection Markers
//!
//! The markup doubles as a fixture language for editing tests, so selection
//! boundaries are tokens of their own:
//!
//! - `[` / `]` mark the selection start/end inside text
//! - `{` / `}` mark the selection start/end between element children
//!
//! A literal bracket in text is written as a numeric entity (`&#91;`).

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name>` or `<name/>`
    #[regex(r"<[a-zA-Z][a-zA-Z0-9]*[ \t]*/?>")]
    OpenTag,

    /// `</name>`
    #[regex(r"</[a-zA-Z][a-zA-Z0-9]*[ \t]*>")]
    CloseTag,

    /// `[` selection boundary inside text
    #[token("[")]
    TextStart,

    /// `]` selection boundary inside text
    #[token("]")]
    TextEnd,

    /// `{` selection boundary between element children
    #[token("{")]
    ElementStart,

    /// `}` selection boundary between element children
    #[token("}")]
    ElementEnd,

    /// Character data, entities still encoded
    #[regex(r"[^<>\[\]{}]+")]
    Text,

    /// Anything the grammar does not recognise
    Unknown,
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Tag name of an open or close tag token, as written.
    pub fn tag_name(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::OpenTag | TokenKind::CloseTag => Some(
                self.text
                    .trim_start_matches('<')
                    .trim_start_matches('/')
                    .trim_end_matches('>')
                    .trim_end_matches('/')
                    .trim(),
            ),
            _ => None,
        }
    }

    /// Whether an open tag is written in `<br/>` form.
    pub fn is_self_closing(&self) -> bool {
        self.kind == TokenKind::OpenTag && self.text.ends_with("/>")
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input).into_iter().map(|(t, _)| t).collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = result.unwrap_or(TokenKind::Unknown);
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
