/// Example printing the node tree of an Office document and projecting one node.
///
/// ```text
/// cargo run --example inspect -- report.xlsx
/// cargo run --example inspect -- report.xlsx --xml "<0> row (Row) [1]"
/// cargo run --example inspect -- report.xlsx --code "<0> row (Row) [1]" --language python
/// ```
///
/// Set `RUST_LOG=ooxml_tree=debug` to see package loading.
use clap::Parser;
use ooxml_tree::{InspectOptions, Language, Node, Session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Browse the part and element tree of a .docx/.xlsx/.pptx file")]
struct Args {
    /// Document to open
    path: PathBuf,

    /// Print the XML projection of the first node with this header
    #[arg(long, value_name = "HEADER")]
    xml: Option<String>,

    /// Print the code projection of the first node with this header
    #[arg(long, value_name = "HEADER")]
    code: Option<String>,

    /// Language for --code (rust, python); defaults to the options file
    #[arg(long)]
    language: Option<Language>,

    /// YAML options file
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = match &args.options {
        Some(path) => InspectOptions::from_yaml_path(path)?,
        None => InspectOptions::default(),
    };

    let mut session = Session::with_options(options);
    let root = session.open_path(&args.path)?.clone();

    if args.xml.is_none() && args.code.is_none() {
        for (depth, node) in root.walk() {
            println!("{}{}", "  ".repeat(depth), node.header());
        }
        println!("\n{} nodes", root.len());
    }

    if let Some(header) = &args.xml {
        let node = lookup(&root, header)?;
        let xml = session.project_xml(node)?;
        if xml.is_empty() {
            println!("({} has no markup of its own)", node.header());
        } else {
            println!("{xml}");
        }
    }

    if let Some(header) = &args.code {
        let node = lookup(&root, header)?;
        let code = match args.language {
            Some(language) => session.project_code_in(node, language)?,
            None => session.project_default_code(node)?,
        };
        print!("{code}");
    }

    session.close();
    Ok(())
}

fn lookup<'a>(root: &'a Node, header: &str) -> Result<&'a Node, String> {
    root.find(header)
        .ok_or_else(|| format!("no node with header {header:?}"))
}
