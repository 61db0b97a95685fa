//! `compress` and `decompress` subcommands.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::displaylevel;
use crate::error::Error;
use crate::io::{compress_stream, DecompressIter};
use crate::source::Source;

use super::args::{CompressArgs, DecompressArgs, LeftoverPolicy};
use super::constants::{LZIP_EXTENSION, STDIO_MARK};

/// Where a subcommand writes its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    fn open(&self, force: bool) -> anyhow::Result<Box<dyn Write>> {
        match self {
            Output::Stdout => Ok(Box::new(io::stdout().lock())),
            Output::File(path) => {
                if !force && path.exists() {
                    bail!("{} already exists (use -f to overwrite)", path.display());
                }
                let file = File::create(path)
                    .with_context(|| format!("cannot create {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// `true` when `input` parses as a URL with a scheme the decoder can open.
pub fn is_url(input: &str) -> bool {
    url::Url::parse(input)
        .map(|url| matches!(url.scheme(), "file" | "http" | "https"))
        .unwrap_or(false)
}

/// Output for `compress`: `-c`, `-o`, stdin → stdout, else `INPUT.lz`.
pub fn compress_output(args: &CompressArgs) -> Output {
    match (&args.output, args.stdout) {
        (_, true) => Output::Stdout,
        (Some(path), false) => Output::File(path.clone()),
        (None, false) if args.input == STDIO_MARK => Output::Stdout,
        (None, false) => Output::File(PathBuf::from(format!("{}{LZIP_EXTENSION}", args.input))),
    }
}

/// Output for `decompress`: `-c`, `-o`, stdin → stdout, else the input path
/// (or the last URL path segment) without its `.lz` suffix.
pub fn decompress_output(args: &DecompressArgs) -> anyhow::Result<Output> {
    match (&args.output, args.stdout) {
        (_, true) => Ok(Output::Stdout),
        (Some(path), false) => Ok(Output::File(path.clone())),
        (None, false) if args.input == STDIO_MARK => Ok(Output::Stdout),
        (None, false) => {
            let name = if is_url(&args.input) {
                args.input.rsplit('/').next().unwrap_or_default()
            } else {
                args.input.as_str()
            };
            match name.strip_suffix(LZIP_EXTENSION) {
                Some(stem) if !stem.is_empty() => Ok(Output::File(PathBuf::from(stem))),
                _ => bail!("cannot determine an output filename for {}", args.input),
            }
        }
    }
}

// ── compress ──────────────────────────────────────────────────────────────────

pub fn run_compress(args: &CompressArgs) -> anyhow::Result<()> {
    let options = args.encode_options();
    options.validate().context("invalid compression settings")?;
    let output = compress_output(args);

    let reader: Box<dyn Read> = if args.input == STDIO_MARK {
        Box::new(io::stdin().lock())
    } else {
        Box::new(
            File::open(&args.input).with_context(|| format!("cannot open {}", args.input))?,
        )
    };
    let writer = output.open(args.force)?;

    let (bytes_in, bytes_out) = compress_stream(reader, writer, &options, None)
        .with_context(|| format!("compressing {}", args.input))?;
    displaylevel!(
        2,
        "{}: {} -> {} bytes ({:.2}%)\n",
        args.input,
        bytes_in,
        bytes_out,
        ratio_percent(bytes_out, bytes_in)
    );
    Ok(())
}

// ── decompress ────────────────────────────────────────────────────────────────

pub fn run_decompress(args: &DecompressArgs) -> anyhow::Result<()> {
    let options = args.decode_options();
    let output = decompress_output(args)?;

    let source = if args.input == STDIO_MARK {
        Source::reader(io::stdin().lock())
    } else if is_url(&args.input) {
        Source::url(args.input.clone(), args.url_options())
    } else {
        Source::path(Path::new(&args.input))
    };
    let chunks = DecompressIter::new(source, &options)
        .with_context(|| format!("cannot open {}", args.input))?;
    let mut writer = output.open(args.force)?;

    let mut bytes_out = 0u64;
    for chunk in chunks {
        match chunk {
            Ok(data) => {
                writer.write_all(&data)?;
                bytes_out += data.len() as u64;
            }
            Err(Error::RemainingBytes(remaining)) => match args.leftover {
                LeftoverPolicy::Append => {
                    writer.write_all(&remaining.bytes)?;
                    bytes_out += remaining.bytes.len() as u64;
                }
                LeftoverPolicy::Discard => {
                    displaylevel!(
                        1,
                        "warning: discarding {} trailing bytes (word size {})\n",
                        remaining.len(),
                        remaining.word_size
                    );
                }
                LeftoverPolicy::Error => {
                    writer.flush()?;
                    return Err(Error::RemainingBytes(remaining))
                        .with_context(|| format!("decompressing {}", args.input));
                }
            },
            Err(error) => {
                return Err(error).with_context(|| format!("decompressing {}", args.input))
            }
        }
    }
    writer.flush()?;
    displaylevel!(2, "{}: {} bytes decoded\n", args.input, bytes_out);
    Ok(())
}

/// Compressed size as a percentage of the input size.
pub fn ratio_percent(compressed: u64, original: u64) -> f64 {
    if original == 0 {
        0.0
    } else {
        compressed as f64 * 100.0 / original as f64
    }
}
