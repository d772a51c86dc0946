use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use tracepath::config::Config;
use tracepath::path::{IndexOperation, Path, PathToken};
use tracepath::schema::{self, BuiltPath, DocumentNode, SchemaDocument};
use tracepath::table;

/// TracePath - JSONPath-style addresses for documents, tables and typed object graphs
#[derive(Parser)]
#[command(name = "tracepath")]
#[command(version)]
#[command(about = "Parse, build and check trace paths", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/tracepath/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse paths and print their canonical form
    Parse {
        /// Paths to parse, e.g. '$.dataset[3].title'
        #[arg(required = true)]
        paths: Vec<String>,

        /// List the tokens of each path
        #[arg(long)]
        tokens: bool,
    },

    /// Build a path from property names using a schema document
    Build {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Property names, outermost first
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Check a path against a schema document
    Check {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Path to check
        path: String,
    },

    /// Build a table cell, row or column path
    Table {
        /// Path of the table itself
        #[arg(long, default_value = "$")]
        base: String,

        /// Row index, or -1 for every row
        #[arg(long, allow_negative_numbers = true)]
        row: i64,

        /// Column index, or -1 for every column
        #[arg(
            long,
            allow_negative_numbers = true,
            conflicts_with = "header",
            required_unless_present = "header"
        )]
        col: Option<i64>,

        /// Column header, or ALL for every column
        #[arg(long)]
        header: Option<String>,
    },

    /// Build the path addressing data nodes by id
    Nodes {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
}

#[derive(clap::Args)]
struct SchemaArgs {
    /// Schema document (TOML or YAML); defaults to `schema_file` from the config
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Type to start from instead of the document's root
    #[arg(long)]
    root: Option<String>,

    /// Fail if part of the path couldn't be checked
    #[arg(long)]
    strict: bool,
}

fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load()),
    }
}

fn load_schema(args: &SchemaArgs, config: &Config) -> Result<SchemaDocument> {
    let file = args
        .schema
        .as_ref()
        .or(config.schema_file.as_ref())
        .context("No schema document given; use --schema or set schema_file in the config")?;
    SchemaDocument::load(file)
        .with_context(|| format!("Failed to load schema {}", file.display()))
}

fn start_node<'a>(doc: &'a SchemaDocument, root: Option<&str>) -> Result<DocumentNode<'a>> {
    match root {
        Some(name) => doc
            .node(name)
            .with_context(|| format!("Type '{}' is not declared in the schema", name)),
        None => Ok(doc.root_node()?),
    }
}

fn report(built: &BuiltPath, strict: bool) -> Result<()> {
    println!("{}", built.path());
    if let Some(start) = built.unchecked_from() {
        let tail: String = built.unchecked_tail().iter().map(PathToken::fragment).collect();
        if strict {
            bail!(
                "Path {} could only be checked up to token {}; unchecked tail: {}",
                built.path(),
                start,
                tail
            );
        }
        eprintln!("warning: unchecked tail {}", tail);
    }
    Ok(())
}

fn token_kind(token: &PathToken) -> &'static str {
    match token {
        PathToken::Root => "root",
        PathToken::Property(p) if p.names().len() > 1 => "properties",
        PathToken::Property(_) => "property",
        PathToken::Index(i) => match i.operation() {
            IndexOperation::SingleIndex => "index",
            IndexOperation::IndexSequence => "index sequence",
            IndexOperation::SliceFrom => "slice from",
            IndexOperation::SliceTo => "slice to",
            IndexOperation::SliceBetween => "slice",
            IndexOperation::ContextSize => "size offset",
        },
        PathToken::Wildcard(_) => "wildcard",
    }
}

fn print_path(path: &Path, tokens: bool) {
    let definite = if path.is_path_definite() {
        "definite"
    } else {
        "indefinite"
    };
    println!("{}  ({} tokens, {})", path, path.token_count(), definite);
    if tokens {
        for (i, token) in path.iter().enumerate() {
            println!("  {:>3}  {:<14}  {}", i, token_kind(token), token);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config);

    match cli.command {
        Command::Parse { paths, tokens } => {
            for text in &paths {
                let path =
                    Path::parse(text).with_context(|| format!("Failed to parse '{}'", text))?;
                print_path(&path, tokens || config.show_tokens);
            }
        }
        Command::Build { schema: args, names } => {
            let doc = load_schema(&args, &config)?;
            let root = start_node(&doc, args.root.as_deref())?;
            let built = schema::property_path(root, &names)?;
            report(&built, args.strict || config.strict)?;
        }
        Command::Check { schema: args, path } => {
            let doc = load_schema(&args, &config)?;
            let root = start_node(&doc, args.root.as_deref())?;
            let path = Path::parse(&path).with_context(|| format!("Failed to parse '{}'", path))?;
            let checked = schema::validate_path(root, &path)?;
            report(&checked, args.strict || config.strict)?;
        }
        Command::Table {
            base,
            row,
            col,
            header,
        } => {
            let base = Path::parse(&base)
                .with_context(|| format!("Failed to parse base path '{}'", base))?;
            let path = match (col, header) {
                (Some(col), _) => table::table_path(&base, row, col)?,
                (None, Some(header)) => table::table_header_path(&base, row, &header)?,
                (None, None) => bail!("Either --col or --header is required"),
            };
            println!("{}", path);
        }
        Command::Nodes { ids } => {
            println!("{}", tracepath::data_nodes_path(&ids)?);
        }
    }

    Ok(())
}
