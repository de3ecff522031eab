use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use sprig_reconciler::{create, Document, LiveTree};
use sprig_vdom::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template file to render
    pub file: PathBuf,

    /// JSON file used as the render context
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Inline JSON bound to `value`
    #[arg(long)]
    pub value: Option<String>,

    /// Number bound to `index`
    #[arg(long)]
    pub index: Option<usize>,

    /// Indent the printed HTML
    #[arg(long)]
    pub pretty: bool,

    /// Config file (defaults to sprig.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let html = render_to_string(&args, cwd)?;
    println!("{}", html.trim_end());
    Ok(())
}

fn render_to_string(args: &RenderArgs, cwd: &str) -> Result<String> {
    let config = Config::load(cwd, args.config.as_deref())?;
    let compiler = config.compiler()?;

    let path = PathBuf::from(cwd).join(&args.file);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let template = compiler.compile(&source).map_err(|e| {
        let report = sprig_template::format_error(&source, &args.file.display().to_string(), &e);
        anyhow::anyhow!("{}\n{}", e, report)
    })?;

    let context = match &args.context {
        Some(context) => read_json(&PathBuf::from(cwd).join(context))?,
        None => Value::object(Vec::<(String, Value)>::new()),
    };
    let value = match &args.value {
        Some(json) => parse_json(json).context("Invalid --value")?,
        None => Value::Null,
    };

    let vnode = template
        .render(&context, &value, args.index)
        .with_context(|| format!("Failed to render {}", args.file.display()))?;

    let mut document = Document::new();
    let root = create(&mut document, &vnode);
    let body = document.body();
    document.append_child(&body, &root);
    tracing::debug!(mutations = document.journal().len(), "rendered into memory document");

    Ok(if args.pretty {
        document.to_html_pretty(root)
    } else {
        document.to_html(root)
    })
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_json(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn parse_json(json: &str) -> Result<Value> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    Ok(Value::from(parsed))
}
