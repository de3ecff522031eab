//! Template compilation and rendering

use crate::error::{CompileResult, EvalResult};
use crate::eval::{Evaluator, OwnedScope, Scope};
use crate::expr::Statement;
use crate::options::CompileOptions;
use crate::segments::Segment;
use crate::tree::{parse, AttributeKind, ElementNode, TemplateNode};
use sprig_vdom::{AttrValue, Element, Handler, HandlerError, Primitive, Value, VNode};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, instrument};

/// Compile markup with default options and no partials
pub fn compile(markup: &str) -> CompileResult<Template> {
    Compiler::new().compile(markup)
}

/// Template compiler with options and registered partials
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompileOptions,
    partials: BTreeMap<String, Template>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a template callable from expressions as `name(value, index)`
    /// and usable with `list.map(name)`
    pub fn partial(mut self, name: impl Into<String>, template: Template) -> Self {
        self.partials.insert(name.into(), template);
        self
    }

    #[instrument(skip(self, markup), fields(len = markup.len()))]
    pub fn compile(&self, markup: &str) -> CompileResult<Template> {
        let root = parse(markup, &self.options)?;
        debug!(tag = %root.tag, partials = self.partials.len(), "compiled template");

        Ok(Template(Rc::new(TemplateInner {
            root,
            partials: self.partials.clone(),
        })))
    }
}

struct TemplateInner {
    root: ElementNode,
    partials: BTreeMap<String, Template>,
}

/// Compiled render function: `(context, value, index) -> VNode`
///
/// Cloning is cheap; clones share the parse tree.
#[derive(Clone)]
pub struct Template(Rc<TemplateInner>);

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("root", &self.0.root.tag)
            .field("partials", &self.0.partials.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Template {
    pub fn root(&self) -> &ElementNode {
        &self.0.root
    }

    pub(crate) fn partials(&self) -> &BTreeMap<String, Template> {
        &self.0.partials
    }

    /// Render a snapshot. Fields of `context` are visible as bare
    /// identifiers; `value` and `index` are visible by those names.
    #[instrument(skip_all, fields(tag = %self.0.root.tag))]
    pub fn render(&self, context: &Value, value: &Value, index: Option<usize>) -> EvalResult<VNode> {
        let scope = Scope {
            context,
            value,
            index,
            partials: &self.0.partials,
        };
        Renderer::new(self, scope).element(&self.0.root)
    }

    /// Render the way partials are invoked: the context is `value` itself
    /// when it is an object, otherwise empty
    pub fn render_value(&self, value: &Value, index: Option<usize>) -> EvalResult<VNode> {
        let empty = Value::Object(BTreeMap::new());
        let context = if value.as_object().is_some() { value } else { &empty };
        self.render(context, value, index)
    }
}

struct Renderer<'a> {
    template: &'a Template,
    scope: Scope<'a>,
    snapshot: OnceCell<Rc<OwnedScope>>,
}

impl<'a> Renderer<'a> {
    fn new(template: &'a Template, scope: Scope<'a>) -> Self {
        Self {
            template,
            scope,
            snapshot: OnceCell::new(),
        }
    }

    fn element(&self, node: &ElementNode) -> EvalResult<VNode> {
        let mut element = Element {
            tag: node.tag.clone(),
            ..Element::default()
        };

        for attribute in &node.attributes {
            let value = match &attribute.value {
                AttributeKind::Plain(segments) => AttrValue::Text(self.interpolate(segments)?),
                AttributeKind::Event(statements) => AttrValue::Handler(self.handler(statements)),
            };
            element.attrs.insert(attribute.name.clone(), value);
        }

        for child in &node.children {
            match child {
                TemplateNode::Element(child) => element.children.push(self.element(child)?),
                TemplateNode::Text(text) => self.splice_text(&text.segments, &mut element.children)?,
            }
        }

        Ok(VNode::Element(element))
    }

    fn interpolate(&self, segments: &[Segment]) -> EvalResult<String> {
        let mut text = String::new();
        for segment in segments {
            match segment {
                Segment::Literal(literal) => text.push_str(literal),
                Segment::Expr(expr) => {
                    let value = Evaluator::new(self.scope).evaluate(expr)?;
                    text.push_str(&value.to_string());
                }
            }
        }
        Ok(text)
    }

    fn splice_text(&self, segments: &[Segment], children: &mut Vec<VNode>) -> EvalResult<()> {
        for segment in segments {
            match segment {
                Segment::Literal(literal) => children.push(VNode::text(literal.as_str())),
                Segment::Expr(expr) => {
                    let value = Evaluator::new(self.scope).evaluate(expr)?;
                    match value {
                        Value::Array(items) => {
                            for item in items {
                                splice_value(item, children);
                            }
                        }
                        other => splice_value(other, children),
                    }
                }
            }
        }
        Ok(())
    }

    fn handler(&self, statements: &Rc<[Statement]>) -> Handler {
        let scope = self
            .snapshot
            .get_or_init(|| Rc::new(OwnedScope::capture(&self.scope, self.template)))
            .clone();
        let statements = Rc::clone(statements);

        Handler::new(move |receiver| {
            Evaluator::with_receiver(scope.scope(), receiver)
                .execute(&statements)
                .map_err(|e| HandlerError::Evaluation(Box::new(e)))
        })
    }
}

/// Child produced by a single spliced value. Nested arrays are not
/// flattened further.
fn splice_value(value: Value, children: &mut Vec<VNode>) {
    match value {
        Value::Null => {}
        Value::Node(node) => children.push(node),
        Value::Number(n) => children.push(VNode::Primitive(Primitive::Number(n))),
        other => children.push(VNode::text(other.to_string())),
    }
}
