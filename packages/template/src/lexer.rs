//! Markup lexer using logos
//!
//! Splits template source into open tags, close tags and literal text runs.
//! Anything that is not a well-formed tag (a lone `<`, comments, doctypes)
//! is lexed as text.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken<'src> {
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9_:\-]*([^<>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    OpenTag(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9_:\-]*[ \t\r\n]*>", |lex| lex.slice())]
    CloseTag(&'src str),

    #[regex(r"[^<]+")]
    Text,

    #[token("<")]
    Lt,
}

/// A lexed piece of markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup<'src> {
    Open {
        /// Lowercased tag name
        name: String,
        /// Raw attribute text between the name and `>` (self-closing `/` stripped)
        attrs: &'src str,
        /// Byte offset of `attrs` in the source
        attrs_offset: usize,
        self_closing: bool,
    },
    Close {
        name: String,
    },
    Text(&'src str),
}

/// Tokenize markup into tags and merged text runs, with their source spans
pub fn scan(source: &str) -> Vec<(Markup<'_>, Range<usize>)> {
    let mut items = Vec::new();
    let mut text_start: Option<usize> = None;
    let mut lexer = RawToken::lexer(source);

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(RawToken::OpenTag(slice)) => {
                flush_text(source, &mut text_start, span.start, &mut items);
                items.push((open_tag(slice, span.start), span));
            }
            Ok(RawToken::CloseTag(slice)) => {
                flush_text(source, &mut text_start, span.start, &mut items);
                let name = slice[2..slice.len() - 1].trim().to_ascii_lowercase();
                items.push((Markup::Close { name }, span));
            }
            Ok(RawToken::Text) | Ok(RawToken::Lt) | Err(()) => {
                text_start.get_or_insert(span.start);
            }
        }
    }
    flush_text(source, &mut text_start, source.len(), &mut items);

    items
}

fn flush_text<'src>(
    source: &'src str,
    text_start: &mut Option<usize>,
    end: usize,
    items: &mut Vec<(Markup<'src>, Range<usize>)>,
) {
    if let Some(start) = text_start.take() {
        if start < end {
            items.push((Markup::Text(&source[start..end]), start..end));
        }
    }
}

fn open_tag(slice: &str, offset: usize) -> Markup<'_> {
    // Strip `<` and `>`
    let inner = &slice[1..slice.len() - 1];
    let name_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-')))
        .unwrap_or(inner.len());
    let name = inner[..name_len].to_ascii_lowercase();

    let mut attrs = &inner[name_len..];
    let trimmed = attrs.trim_end();
    let self_closing = trimmed.ends_with('/');
    if self_closing {
        attrs = &trimmed[..trimmed.len() - 1];
    }

    Markup::Open {
        name,
        attrs,
        attrs_offset: offset + 1 + name_len,
        self_closing,
    }
}
