/// Compile-and-render tests covering text splicing, attributes, partials and handlers
use crate::*;
use sprig_vdom::{AttrValue, HandlerError, HandlerResult, Primitive, Receiver, Value, VNode};

fn render(markup: &str, context: Value) -> VNode {
    compile(markup)
        .unwrap()
        .render(&context, &Value::Null, None)
        .unwrap()
}

fn text_children(node: &VNode) -> Vec<String> {
    node.children()
        .iter()
        .map(|child| match child {
            VNode::Primitive(p) => p.to_string(),
            VNode::Element(e) => format!("<{}>", e.tag),
        })
        .collect()
}

#[derive(Default)]
struct Todos {
    count: f64,
    toggled: Vec<Value>,
}

impl Receiver for Todos {
    fn get(&self, field: &str) -> HandlerResult<Value> {
        match field {
            "count" => Ok(Value::Number(self.count)),
            _ => Err(HandlerError::UnknownField {
                field: field.to_string(),
            }),
        }
    }

    fn set(&mut self, field: &str, value: Value) -> HandlerResult<()> {
        match (field, value) {
            ("count", Value::Number(n)) => {
                self.count = n;
                Ok(())
            }
            (field, _) => Err(HandlerError::ReadOnly {
                field: field.to_string(),
            }),
        }
    }

    fn call(&mut self, method: &str, args: Vec<Value>) -> HandlerResult<Value> {
        match method {
            "toggle" => {
                self.toggled.extend(args);
                Ok(Value::Null)
            }
            _ => Err(HandlerError::UnknownMethod {
                method: method.to_string(),
            }),
        }
    }
}

#[test]
fn test_static_markup() {
    let node = render("<div><span>Hello</span> world</div>", Value::Null);

    assert_eq!(node.tag(), Some("div"));
    assert_eq!(text_children(&node), vec!["<span>", " world"]);
    assert_eq!(node.text_content(), "Hello world");
}

#[test]
fn test_text_interpolation() {
    let node = render(
        "<p>Hi {{ name }}, you have {{ count }} items</p>",
        Value::object([("name", Value::from("Ada")), ("count", Value::from(3))]),
    );

    assert_eq!(node.children().len(), 5);
    assert_eq!(node.children()[3], VNode::number(3.0));
    assert_eq!(node.text_content(), "Hi Ada, you have 3 items");
}

#[test]
fn test_null_splices_nothing() {
    let node = render("<p>{{ missing }}</p>", Value::object([("x", 1)]));
    assert!(node.children().is_empty());
}

#[test]
fn test_arrays_flatten_one_level() {
    let context = Value::object([(
        "items",
        Value::Array(vec![
            Value::from("a"),
            Value::from(2),
            Value::Null,
            Value::Array(vec![Value::from("x"), Value::from("y")]),
        ]),
    )]);
    let node = render("<p>{{ items }}</p>", context);

    assert_eq!(
        node.children(),
        &[VNode::text("a"), VNode::number(2.0), VNode::text("x,y")]
    );
}

#[test]
fn test_booleans_render_as_text() {
    let node = render("<p>{{ done }}</p>", Value::object([("done", true)]));
    assert_eq!(node.children(), &[VNode::text("true")]);
}

#[test]
fn test_attribute_interpolation() {
    let node = render(
        r#"<li class="item {{ done ? 'done' : '' }}" data-id="{{ id }}" hidden>x</li>"#,
        Value::object([("done", Value::from(true)), ("id", Value::from(7))]),
    );

    assert_eq!(node.attr("class"), Some(&AttrValue::from("item done")));
    assert_eq!(node.attr("data-id"), Some(&AttrValue::from("7")));
    assert_eq!(node.attr("hidden"), Some(&AttrValue::from("hidden")));
}

#[test]
fn test_attribute_names_lowercased() {
    let node = render(r#"<div DATA-X="1"></div>"#, Value::Null);
    assert_eq!(node.attr("data-x"), Some(&AttrValue::from("1")));
}

#[test]
fn test_value_and_index_in_scope() {
    let template = compile("<li>{{ index }}: {{ value }}</li>").unwrap();
    let node = template
        .render(&Value::Null, &Value::from("milk"), Some(2))
        .unwrap();

    assert_eq!(node.text_content(), "2: milk");
}

#[test]
fn test_context_shadows_value() {
    let template = compile("<p>{{ value }}</p>").unwrap();
    let node = template
        .render(&Value::object([("value", "ctx")]), &Value::from("arg"), None)
        .unwrap();

    assert_eq!(node.text_content(), "ctx");
}

#[test]
fn test_render_value_uses_object_as_context() {
    let template = compile("<li>{{ title }}/{{ value.title }}</li>").unwrap();

    let node = template
        .render_value(&Value::object([("title", "Write")]), Some(0))
        .unwrap();
    assert_eq!(node.text_content(), "Write/Write");

    let node = template.render_value(&Value::from("plain"), None).unwrap();
    assert_eq!(node.text_content(), "/");
}

#[test]
fn test_partials_with_map() {
    let item = compile(r#"<li key="{{ id }}">{{ index }}. {{ title }}</li>"#).unwrap();
    let list = Compiler::new()
        .partial("item", item)
        .compile("<ul>{{ todos.map(item) }}</ul>")
        .unwrap();

    let context = Value::from(serde_json::json!({
        "todos": [{ "id": "a", "title": "Write" }, { "id": "b", "title": "Test" }]
    }));
    let node = list.render(&context, &Value::Null, None).unwrap();

    assert_eq!(node.children().len(), 2);
    assert_eq!(node.children()[1].attr("key"), Some(&AttrValue::from("b")));
    assert_eq!(node.children()[1].text_content(), "1. Test");
}

#[test]
fn test_partial_call() {
    let badge = compile("<b>{{ value }}</b>").unwrap();
    let template = Compiler::new()
        .partial("badge", badge)
        .compile("<p>{{ badge(count) }}</p>")
        .unwrap();

    let node = template
        .render(&Value::object([("count", 4)]), &Value::Null, None)
        .unwrap();

    assert_eq!(node.children()[0].tag(), Some("b"));
    assert_eq!(node.children()[0].children(), &[VNode::number(4.0)]);
}

#[test]
fn test_map_requires_partial() {
    let template = compile("<ul>{{ todos.map(nothing) }}</ul>").unwrap();
    let err = template
        .render(&Value::object([("todos", vec![1, 2])]), &Value::Null, None)
        .unwrap_err();

    assert!(matches!(err, EvalError::NotCallable { name, .. } if name == "nothing"));
}

#[test]
fn test_handler_binds_receiver() {
    let template = compile(
        r#"<button onclick="this.count = this.count + step; this.toggle(index)">+</button>"#,
    )
    .unwrap();
    let node = template
        .render(&Value::object([("step", 2)]), &Value::Null, Some(5))
        .unwrap();

    let Some(AttrValue::Handler(handler)) = node.attr("onclick") else {
        panic!("Expected handler attribute");
    };

    let mut todos = Todos::default();
    handler.invoke(&mut todos).unwrap();
    handler.invoke(&mut todos).unwrap();

    assert_eq!(todos.count, 4.0);
    assert_eq!(todos.toggled, vec![Value::from(5), Value::from(5)]);
}

#[test]
fn test_handler_errors_surface() {
    let template = compile(r#"<a onclick="this.missing()">x</a>"#).unwrap();
    let node = template.render(&Value::Null, &Value::Null, None).unwrap();
    let Some(AttrValue::Handler(handler)) = node.attr("onclick") else {
        panic!("Expected handler attribute");
    };

    let err = handler.invoke(&mut Todos::default()).unwrap_err();
    assert!(matches!(err, HandlerError::Evaluation(_)));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_handlers_are_fresh_per_render() {
    let template = compile(r#"<a onclick="this.toggle()">x</a>"#).unwrap();
    let first = template.render(&Value::Null, &Value::Null, None).unwrap();
    let second = template.render(&Value::Null, &Value::Null, None).unwrap();

    assert_ne!(first.attr("onclick"), second.attr("onclick"));
    assert_eq!(first.attr("onclick"), first.clone().attr("onclick"));
}

#[test]
fn test_this_outside_handler() {
    let template = compile("<p>{{ this.count }}</p>").unwrap();
    let err = template.render(&Value::Null, &Value::Null, None).unwrap_err();
    assert!(matches!(err, EvalError::InvalidThis { .. }));
}

#[test]
fn test_custom_event_prefix() {
    let options = CompileOptions {
        event_prefix: "on:".to_string(),
        ..CompileOptions::default()
    };
    let template = Compiler::new()
        .options(options)
        .compile(r#"<a on:click="this.toggle()" onclick="plain">x</a>"#)
        .unwrap();
    let node = template.render(&Value::Null, &Value::Null, None).unwrap();

    assert!(matches!(node.attr("on:click"), Some(AttrValue::Handler(_))));
    assert_eq!(node.attr("onclick"), Some(&AttrValue::from("plain")));
}

#[test]
fn test_void_children_ignored() {
    let node = render("<div><input>text<img/></div>", Value::Null);

    assert_eq!(text_children(&node), vec!["<input>", "text", "<img>"]);
    assert!(node.children()[0].children().is_empty());
}

#[test]
fn test_compile_error_positions() {
    let err = compile("<p>{{ 1 + }}</p>").unwrap_err();
    assert!(matches!(err, CompileError::Expression { .. }));
    assert_eq!(err.pos(), Some(10));
}

#[test]
fn test_number_primitive_kind() {
    let node = render("<p>{{ n }}{{ s }}</p>", Value::object([("n", Value::from(1)), ("s", Value::from("1"))]));

    assert_eq!(node.children()[0], VNode::Primitive(Primitive::Number(1.0)));
    assert_eq!(node.children()[1], VNode::Primitive(Primitive::Text("1".to_string())));
    assert_ne!(node.children()[0], node.children()[1]);
}
