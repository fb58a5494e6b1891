//! VDF command-line tool.
//!
//! Every subcommand reads a file path or `-` for stdin. Failures print
//! `{"err":{"code","name","message"}}` on stdout and exit with status 1.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;
use vdf_codec::map::value_kind;
use vdf_codec::{
    from_map, DecodeOptions, Decoder, Document, EncodeOptions, Encoder, ErrorCode, Format,
    VdfResult,
};

#[derive(Parser)]
#[command(name = "vdf")]
#[command(about = "Valve Data Format converter and validator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Input {
    /// Input file, or `-` for stdin
    #[arg(default_value = "-")]
    path: String,

    /// Input format: auto, text or binary
    #[arg(long, default_value = "auto")]
    from: Format,
}

#[derive(Args)]
struct Output {
    /// Output format: text or binary
    #[arg(long, default_value = "text")]
    to: Format,

    /// Single-line text output
    #[arg(long)]
    compact: bool,

    /// Sort siblings by key
    #[arg(long)]
    deterministic: bool,
}

impl Output {
    fn options(&self) -> EncodeOptions {
        EncodeOptions::new(self.to)
            .with_compact(self.compact)
            .with_deterministic(self.deterministic)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Re-encode a document
    Convert {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
        /// Validate the tree before writing
        #[arg(long)]
        validate: bool,
    },

    /// Print the document as a JSON object
    ToJson {
        #[command(flatten)]
        input: Input,
        /// Fail on duplicate keys instead of keeping the last one
        #[arg(long)]
        strict: bool,
    },

    /// Build a document from a JSON object
    FromJson {
        /// JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        path: String,
        /// Key of the single root object
        #[arg(long)]
        root: String,
        #[command(flatten)]
        output: Output,
    },

    /// Print one JSON line per traversal event
    Events {
        #[command(flatten)]
        input: Input,
    },

    /// Print the document tree as JSON
    Dump {
        #[command(flatten)]
        input: Input,
    },

    /// Decode and validate, printing a summary
    Validate {
        #[command(flatten)]
        input: Input,
        /// Reject duplicate sibling keys
        #[arg(long)]
        strict: bool,
        /// Maximum nesting depth (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        max_depth: usize,
        /// Maximum node count (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        max_nodes: usize,
    },

    /// Show version information
    Version,
}

fn open(path: &str) -> VdfResult<Box<dyn Read>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    Ok(Box::new(BufReader::new(File::open(path)?)))
}

fn decoder(input: &Input, opts: DecodeOptions) -> VdfResult<Decoder<Box<dyn Read>>> {
    Ok(Decoder::new(open(&input.path)?, opts.with_format(input.from)))
}

fn decode(input: &Input) -> VdfResult<Document> {
    decoder(input, DecodeOptions::default())?.into_document()
}

fn print_json(value: &impl serde::Serialize) -> VdfResult<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer(&mut out, value).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

fn encode(doc: &Document, opts: EncodeOptions) -> VdfResult<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    let mut encoder = Encoder::new(&mut out, opts);
    encoder.encode_document(doc)?;
    encoder.close()?;
    Ok(())
}

fn run(command: Commands) -> VdfResult<()> {
    match command {
        Commands::Convert {
            input,
            output,
            validate,
        } => {
            let doc = decode(&input)?;
            encode(&doc, output.options().with_validate(validate))
        }
        Commands::ToJson { input, strict } => {
            let doc = decode(&input)?;
            let map = if strict {
                doc.to_map_strict()?
            } else {
                doc.to_map_lossy()
            };
            print_json(&Value::Object(map))
        }
        Commands::FromJson {
            path,
            root,
            output,
        } => {
            let value: Value = serde_json::from_reader(open(&path)?).map_err(io::Error::from)?;
            let map: Map<String, Value> = match value {
                Value::Object(map) => map,
                other => {
                    return Err(ErrorCode::E401_UnsupportedMapValueType {
                        key: root,
                        found: value_kind(&other),
                    });
                }
            };
            let doc = from_map(&root, &map)?;
            encode(&doc, output.options())
        }
        Commands::Events { input } => {
            let mut decoder = decoder(&input, DecodeOptions::default())?;
            while let Some(event) = decoder.next_event()? {
                print_json(&event)?;
            }
            Ok(())
        }
        Commands::Dump { input } => print_json(&decode(&input)?),
        Commands::Validate {
            input,
            strict,
            max_depth,
            max_nodes,
        } => {
            let opts = DecodeOptions::default()
                .with_strict(strict)
                .with_max_depth(max_depth)
                .with_max_nodes(max_nodes);
            let doc = decoder(&input, opts)?.into_document()?;
            doc.validate()?;
            print_json(&json!({
                "ok": {
                    "format": doc.format,
                    "roots": doc.roots().len(),
                    "nodes": doc.node_count(),
                }
            }))
        }
        Commands::Version => {
            println!("vdf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("vdf {}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for usage information");
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(code = err.code(), "command failed");
            println!(
                "{}",
                json!({
                    "err": {
                        "code": err.code(),
                        "name": err.name(),
                        "message": err.to_string(),
                    }
                })
            );
            ExitCode::from(1)
        }
    }
}
