//! Template parse tree
//!
//! Markup is folded into a tree with an explicit stack of open-tag frames:
//! an open tag pushes a frame, its close tag pops it and appends the
//! finished element to the enclosing frame.

use crate::attributes::scan_attributes;
use crate::error::{CompileError, CompileResult};
use crate::expr::{parse_statements, Statement};
use crate::lexer::{scan, Markup};
use crate::options::CompileOptions;
use crate::segments::{split, Segment};
use std::rc::Rc;
use tracing::debug;

/// Elements that never have children
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    Element(ElementNode),
    Text(TextNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub attributes: Vec<TemplateAttribute>,
    pub children: Vec<TemplateNode>,
    /// Byte offset of the open tag
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub segments: Vec<Segment>,
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateAttribute {
    pub name: String,
    pub value: AttributeKind,
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    /// Text with `{{ }}` interpolation; always renders to a string
    Plain(Vec<Segment>),

    /// Event handler body
    Event(Rc<[Statement]>),
}

/// Parse markup into its root element
pub fn parse(source: &str, options: &CompileOptions) -> CompileResult<ElementNode> {
    let mut stack: Vec<ElementNode> = Vec::new();
    let mut roots: Vec<ElementNode> = Vec::new();

    for (markup, span) in scan(source) {
        match markup {
            Markup::Open {
                name,
                attrs,
                attrs_offset,
                self_closing,
            } => {
                let element = ElementNode {
                    attributes: parse_attributes(attrs, attrs_offset, options)?,
                    children: Vec::new(),
                    pos: span.start,
                    tag: name,
                };

                if self_closing || is_void_element(&element.tag) {
                    attach(&mut stack, &mut roots, element);
                } else {
                    stack.push(element);
                }
            }

            Markup::Close { name } => {
                if is_void_element(&name) {
                    continue;
                }
                close(&mut stack, &mut roots, name, span.start, options)?;
            }

            Markup::Text(text) => {
                // Text outside the root has no enclosing frame
                let Some(parent) = stack.last_mut() else {
                    continue;
                };
                if options.trim_whitespace && text.trim().is_empty() {
                    continue;
                }

                let segments = split(text, span.start)?;
                if !segments.is_empty() {
                    parent.children.push(TemplateNode::Text(TextNode {
                        segments,
                        pos: span.start,
                    }));
                }
            }
        }
    }

    if let Some(open) = stack.last() {
        if options.strict_nesting {
            return Err(CompileError::UnclosedTag {
                tag: open.tag.clone(),
                pos: open.pos,
            });
        }
        debug!(tag = %open.tag, "closing unclosed tags at end of input");
        while let Some(element) = stack.pop() {
            attach(&mut stack, &mut roots, element);
        }
    }

    let mut roots = roots.into_iter();
    let root = roots.next().ok_or(CompileError::EmptyTemplate)?;

    let ignored = roots.count();
    if ignored > 0 {
        debug!(ignored, "ignoring top-level siblings after the root element");
    }

    Ok(root)
}

fn close(
    stack: &mut Vec<ElementNode>,
    roots: &mut Vec<ElementNode>,
    name: String,
    pos: usize,
    options: &CompileOptions,
) -> CompileResult<()> {
    let Some(open) = stack.last() else {
        if options.strict_nesting {
            return Err(CompileError::UnexpectedCloseTag { tag: name, pos });
        }
        debug!(tag = %name, pos, "ignoring unexpected closing tag");
        return Ok(());
    };

    if open.tag == name {
        if let Some(element) = stack.pop() {
            attach(stack, roots, element);
        }
        return Ok(());
    }

    if options.strict_nesting {
        return Err(CompileError::MismatchedCloseTag {
            expected: open.tag.clone(),
            found: name,
            pos,
        });
    }

    match stack.iter().rposition(|frame| frame.tag == name) {
        Some(depth) => {
            debug!(tag = %name, pos, "closing implicitly opened frames");
            while stack.len() > depth {
                if let Some(element) = stack.pop() {
                    attach(stack, roots, element);
                }
            }
        }
        None => debug!(tag = %name, pos, "ignoring closing tag with no open frame"),
    }

    Ok(())
}

fn attach(stack: &mut [ElementNode], roots: &mut Vec<ElementNode>, element: ElementNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(TemplateNode::Element(element)),
        None => roots.push(element),
    }
}

fn parse_attributes(
    text: &str,
    offset: usize,
    options: &CompileOptions,
) -> CompileResult<Vec<TemplateAttribute>> {
    scan_attributes(text, offset)
        .into_iter()
        .map(|raw| {
            let name = raw.name.to_ascii_lowercase();
            let value = if options.is_event_attribute(&name) {
                let statements =
                    parse_statements(raw.value, raw.value_offset).map_err(|error| {
                        CompileError::Handler {
                            attr: name.clone(),
                            error,
                        }
                    })?;
                AttributeKind::Event(statements.into())
            } else {
                AttributeKind::Plain(split(raw.value, raw.value_offset)?)
            };

            Ok(TemplateAttribute {
                name,
                value,
                pos: raw.value_offset,
            })
        })
        .collect()
}
