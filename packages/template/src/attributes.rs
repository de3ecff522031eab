//! Attribute text scanning
//!
//! Recognizes `name="value"`, `name='value'`, `name=bare` and bare `name`,
//! which takes its own name as the value.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum AttrToken<'src> {
    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    DoubleQuoted(&'src str),

    #[regex(r"'[^']*'", |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    SingleQuoted(&'src str),

    #[regex(r#"[^ \t\r\n"'=<>`]+"#, |lex| lex.slice())]
    Word(&'src str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute<'src> {
    pub name: &'src str,
    pub value: &'src str,
    /// Byte offset of `value` in the full markup source
    pub value_offset: usize,
}

/// Scan raw attribute text starting at byte `offset` of the markup source.
///
/// Stray `=` signs and quoted strings without a name are skipped.
pub fn scan_attributes(text: &str, offset: usize) -> Vec<RawAttribute<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = AttrToken::lexer(text);
    while let Some(token) = lexer.next() {
        if let Ok(token) = token {
            tokens.push((token, lexer.span()));
        }
    }

    let mut attributes = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let (token, ref span) = tokens[i];
        i += 1;

        let AttrToken::Word(name) = token else {
            continue;
        };

        // A bare attribute carries its own name, so boolean flags read as on
        let mut attribute = RawAttribute {
            name,
            value: name,
            value_offset: offset + span.start,
        };

        if let Some((AttrToken::Eq, _)) = tokens.get(i) {
            i += 1;
            attribute.value = "";
            attribute.value_offset = offset + span.end;
            match tokens.get(i) {
                Some((AttrToken::DoubleQuoted(value) | AttrToken::SingleQuoted(value), span)) => {
                    attribute.value = *value;
                    attribute.value_offset = offset + span.start + 1;
                    i += 1;
                }
                Some((AttrToken::Word(value), span)) => {
                    attribute.value = *value;
                    attribute.value_offset = offset + span.start;
                    i += 1;
                }
                _ => {}
            }
        }

        attributes.push(attribute);
    }

    attributes
}
