//! Glossa CLI
//!
//! Usage:
//!   glossa [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -t, --table <FILE>     String table file (TOML format)
//!   -k, --key <KEY>        Resolve a table entry instead of a template
//!   -c, --context <FILE>   Subjects, attribute and arguments (TOML format)
//!   -a, --arg <VALUE>      Append a positional argument
//!   --max-depth <N>        Override the recursion ceiling
//!   -h, --help             Print help

use std::collections::HashMap;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glossa::{FieldMap, MemoryTable, ResolutionContext, Resolver, SlotAttribute, Value};

#[derive(Parser)]
#[command(name = "glossa")]
#[command(about = "Resolve localized string templates")]
struct Cli {
    /// Template text (reads from stdin if neither this nor --key is given)
    template: Option<String>,

    /// String table file (TOML format)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Resolve the table entry with this key
    #[arg(short, long)]
    key: Option<String>,

    /// Context file with subjects, attribute and arguments (TOML format)
    #[arg(short, long)]
    context: Option<PathBuf>,

    /// Positional argument, appended after the context file's arguments
    #[arg(short, long = "arg")]
    args: Vec<String>,

    /// Override the recursion ceiling
    #[arg(long)]
    max_depth: Option<usize>,
}

/// TOML structure for deserializing a resolution context
#[derive(Deserialize, Default)]
struct ContextFile {
    #[serde(default)]
    args: Vec<TomlValue>,
    /// Display is the source subject
    #[serde(default)]
    same_subject: bool,
    source: Option<HashMap<String, TomlField>>,
    display: Option<HashMap<String, TomlField>>,
    attribute: Option<TomlAttribute>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum TomlValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum TomlField {
    Plain(TomlValue),
    Attribute(TomlAttribute),
}

#[derive(Deserialize, Debug)]
struct TomlAttribute {
    #[serde(default)]
    slots: Vec<TomlValue>,
    enabled: Option<bool>,
    separator: Option<String>,
}

impl From<TomlValue> for Value<'_> {
    fn from(value: TomlValue) -> Self {
        match value {
            TomlValue::Bool(b) => Value::Bool(b),
            TomlValue::Int(n) => Value::from(n),
            TomlValue::Float(n) => Value::Number(n),
            TomlValue::Text(s) => Value::Text(s),
        }
    }
}

impl ContextFile {
    fn from_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        toml::from_str(&content).map_err(|e| e.to_string())
    }
}

fn build_attribute(attr: TomlAttribute) -> SlotAttribute {
    let mut built = SlotAttribute::new(attr.slots);
    if let Some(enabled) = attr.enabled {
        built = built.with_enabled(enabled);
    }
    if let Some(separator) = attr.separator {
        built = built.with_separator(separator);
    }
    built
}

fn build_subject(fields: HashMap<String, TomlField>) -> FieldMap {
    let mut subject = FieldMap::new();
    for (name, field) in fields {
        match field {
            TomlField::Plain(value) => subject.insert(name, value),
            TomlField::Attribute(attr) => subject.insert_attribute(name, build_attribute(attr)),
        }
    }
    subject
}

/// Command-line arguments: bool, then number, else text
fn parse_arg<'a>(arg: &str) -> Value<'a> {
    if let Ok(b) = arg.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(n) = arg.parse::<f64>() {
        return Value::Number(n);
    }
    Value::Text(arg.to_string())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glossa=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    // If there is nothing to resolve and stdin is a terminal, show intro help
    if cli.template.is_none() && cli.key.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load string table
    let table = match &cli.table {
        Some(path) => match MemoryTable::from_file(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error loading string table '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => MemoryTable::new(),
    };

    let mut config = table.resolver_config().clone();
    if let Some(depth) = cli.max_depth {
        config = config.with_max_depth(depth);
    }

    // Load context
    let context = match &cli.context {
        Some(path) => match ContextFile::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading context '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ContextFile::default(),
    };

    let source = context.source.map(build_subject);
    let display = context.display.map(build_subject);
    let attribute = context.attribute.map(build_attribute);

    let mut ctx = ResolutionContext::new();
    if let Some(s) = &source {
        ctx = ctx.with_source(s);
    }
    if context.same_subject {
        if let Some(s) = &source {
            ctx = ctx.with_display(s);
        }
    } else if let Some(d) = &display {
        ctx = ctx.with_display(d);
    }
    if let Some(a) = &attribute {
        ctx = ctx.with_attribute(a);
    }
    ctx = ctx
        .with_args(context.args.into_iter().map(Value::from))
        .with_args(cli.args.iter().map(|a| parse_arg(a)));

    let resolver = Resolver::new(&table).with_config(config);

    let (template, name, result) = match (&cli.key, &cli.template) {
        (Some(key), _) => (
            key.clone(),
            key.as_str(),
            resolver.resolve_by_key(key, &ctx),
        ),
        (None, Some(template)) => (
            template.clone(),
            "<template>",
            resolver.resolve(template, &ctx),
        ),
        (None, None) => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            let result = resolver.resolve(&buffer, &ctx);
            (buffer, "<stdin>", result)
        }
    };

    match result {
        Ok(text) => {
            println!("{}", text);
        }
        Err(e) => {
            eprintln!("{}", e.format(&template, name));
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Glossa - localized string template resolver

USAGE:
    glossa [OPTIONS] [TEMPLATE]
    echo '<template>' | glossa [OPTIONS]

OPTIONS:
    -t, --table <FILE>     String table (TOML, [strings] section)
    -k, --key <KEY>        Resolve a table entry
    -c, --context <FILE>   Subjects, attribute and args (TOML)
    -a, --arg <VALUE>      Positional argument (repeatable)
    --max-depth <N>        Recursion ceiling for table expansion
    -h, --help             Print help

SYNTAX:
    {{0}}                  positional argument
    {{0:F2}}               with format specifier
    {{0?many|one}}         branch: bool, or number equal to 1
    {{s.field}} {{d.field}}  source / display subject field
    {{d.range.0}}          attribute slot, {{d.range.e}} enabled flag
    {{a}} {{a.0}} {{a.e}}      attribute-self
    {{Key}}                string table entry
    //  /{{               literal / and {{

QUICK START:
    glossa -a 3 '{{0}} {{0?items|item}}'"#
    );
}
