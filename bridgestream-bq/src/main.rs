mod item;
mod parser;

use bridgestream::BridgeStream;
use item::{Item, Layout};
use std::io::{self, Read, Write};
use std::str::from_utf8;
use anyhow::{anyhow, Context, Result};
use structopt::StructOpt;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Decode and print bridgestream messages
#[derive(StructOpt)]
#[structopt(name = "bq", author = "Liv Fischer")]
struct Opt {
    /// parse a textual representation and encode it into a binary bridgestream instead
    #[structopt(short, long)]
    encode: bool,
    /// read base64 input when decoding, write base64 output when encoding
    #[structopt(short, long)]
    base64: bool,
    /// log more, repeat for even more
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
    /// how to interpret the input when decoding, e.g. `i32 str [f32] {i32 bool}*`
    layout: Option<String>,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let level = match opt.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).context("Failed to read stdin")?;
    if opt.encode {
        encode(&buffer, opt.base64)
    } else {
        let layout = opt.layout.as_deref().ok_or_else(|| anyhow!("a layout is required for decoding"))?;
        decode(&buffer, layout, opt.base64)
    }
}

fn decode(buffer: &[u8], layout: &str, armored: bool) -> Result<()> {
    let layouts = parser::parse_layouts(layout).context("Invalid layout")?;
    debug!(?layouts, "parsed layout");
    let bytes = if armored {
        let text = from_utf8(buffer).context("input is not utf-8")?;
        base64::decode(text.trim()).context("input is not base64")?
    } else {
        buffer.to_vec()
    };
    let mut stream = BridgeStream::from_bytes(bytes);
    let items = Layout::decode_all(&layouts, &mut stream).context("Decoding error")?;
    if stream.has_more() {
        warn!(position = stream.position(), remaining = stream.remaining(), "input left after decoding the layout");
    }
    for item in &items {
        println!("{}", item);
    }
    Ok(())
}

fn encode(buffer: &[u8], armored: bool) -> Result<()> {
    let string = from_utf8(buffer).context("input is not utf-8")?;
    let items = parser::parse_items(string)?;
    debug!(count = items.len(), "parsed items");
    let mut stream = BridgeStream::new();
    Item::encode_all(&items, &mut stream).context("Encoding error")?;
    let mut stdout = io::stdout();
    if armored {
        writeln!(stdout, "{}", base64::encode(stream.as_bytes()))?;
    } else {
        stdout.write_all(stream.as_bytes())?;
    }
    stdout.flush().context("Failed to write stdout")
}
