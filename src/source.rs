//! Chunked byte sources.
//!
//! Every input origin (an open reader, a path, an in-memory buffer, a URL)
//! is opened into a `Box<dyn Read>` and pulled through [`ChunkedReader`],
//! which hands out non-empty chunks until the reader reports end-of-file.
//! Handles opened here are owned by the returned reader and closed when it is
//! dropped, whether the stream was drained, abandoned or failed.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::config::CHUNK_SIZE_DEFAULT;
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// URL options
// ─────────────────────────────────────────────────────────────────────────────

/// Request settings for [`Source::Url`].
#[derive(Debug, Clone, Default)]
pub struct UrlOptions {
    /// Connect and request timeout. `None` leaves the client default.
    pub timeout: Option<Duration>,
    /// Request body; when present the request is a POST.
    pub data: Option<Vec<u8>>,
    /// PEM file with extra trusted root certificates.
    pub ca_file: Option<PathBuf>,
    /// Directory of PEM files with extra trusted root certificates.
    pub ca_path: Option<PathBuf>,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
}

impl UrlOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_file = Some(path.into());
        self
    }

    pub fn ca_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_path = Some(path.into());
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    fn load_certificates(&self) -> Result<Vec<reqwest::Certificate>> {
        let mut pems = Vec::new();
        if let Some(file) = &self.ca_file {
            pems.push(fs::read(file)?);
        }
        if let Some(dir) = &self.ca_path {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.is_file() {
                    pems.push(fs::read(path)?);
                }
            }
        }
        pems.iter()
            .map(|pem| reqwest::Certificate::from_pem(pem).map_err(Error::from))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Source
// ─────────────────────────────────────────────────────────────────────────────

/// Where compressed bytes come from.
pub enum Source<'a> {
    /// A reader the caller already opened. Dropped with the stream.
    Reader(Box<dyn Read + 'a>),
    /// A local file, opened and closed by the adapter.
    Path(PathBuf),
    /// An in-memory buffer.
    Buffer(&'a [u8]),
    /// A `file://`, `http://` or `https://` resource.
    Url { url: String, options: UrlOptions },
}

impl<'a> Source<'a> {
    pub fn reader(reader: impl Read + 'a) -> Self {
        Source::Reader(Box::new(reader))
    }

    pub fn path(path: impl AsRef<Path>) -> Self {
        Source::Path(path.as_ref().to_path_buf())
    }

    pub fn buffer(buffer: &'a [u8]) -> Self {
        Source::Buffer(buffer)
    }

    pub fn url(url: impl Into<String>, options: UrlOptions) -> Self {
        Source::Url {
            url: url.into(),
            options,
        }
    }

    /// Chunk size used when the caller does not pick one: the whole buffer
    /// for buffer sources, 64 KiB otherwise.
    pub fn default_chunk_size(&self) -> usize {
        match self {
            Source::Buffer(buffer) => buffer.len().max(1),
            _ => CHUNK_SIZE_DEFAULT,
        }
    }

    /// Open the origin as a plain reader.
    pub fn open(self) -> Result<Box<dyn Read + 'a>> {
        match self {
            Source::Reader(reader) => Ok(reader),
            Source::Path(path) => {
                tracing::debug!(path = %path.display(), "opening file source");
                Ok(Box::new(File::open(path)?))
            }
            Source::Buffer(buffer) => Ok(Box::new(buffer)),
            Source::Url { url, options } => open_url(&url, &options),
        }
    }
}

fn open_url<'a>(url: &str, options: &UrlOptions) -> Result<Box<dyn Read + 'a>> {
    let parsed = Url::parse(url)?;
    tracing::debug!(url = %parsed, "opening url source");
    match parsed.scheme() {
        "file" => {
            let path = parsed
                .to_file_path()
                .map_err(|()| Error::UnsupportedScheme(format!("file (non-local: {url})")))?;
            Ok(Box::new(File::open(path)?))
        }
        "http" | "https" => {
            let mut builder = reqwest::blocking::Client::builder()
                .danger_accept_invalid_certs(options.accept_invalid_certs);
            if let Some(timeout) = options.timeout {
                builder = builder.connect_timeout(timeout).timeout(timeout);
            }
            for certificate in options.load_certificates()? {
                builder = builder.add_root_certificate(certificate);
            }
            let client = builder.build()?;
            let request = match &options.data {
                Some(body) => client.post(parsed).body(body.clone()),
                None => client.get(parsed),
            };
            let response = request.send()?.error_for_status()?;
            Ok(Box::new(response))
        }
        other => Err(Error::UnsupportedScheme(other.to_owned())),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChunkedReader
// ─────────────────────────────────────────────────────────────────────────────

/// Pull-based chunk producer over any reader.
///
/// Each chunk is filled up to `chunk_size` bytes; only the last one may be
/// shorter. Once the reader has returned end-of-file or an error it is never
/// called again.
pub struct ChunkedReader<R> {
    inner: R,
    chunk_size: usize,
    exhausted: bool,
}

impl<R: Read> ChunkedReader<R> {
    /// `chunk_size` must be non-zero.
    pub fn new(inner: R, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be greater than 0"));
        }
        Ok(ChunkedReader {
            inner,
            chunk_size,
            exhausted: false,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Read the next chunk; an empty chunk means end of stream.
    pub fn read_chunk(&mut self) -> io::Result<Vec<u8>> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        let mut chunk = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < chunk.len() {
            match self.inner.read(&mut chunk[filled..]) {
                Ok(0) => {
                    self.exhausted = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.exhausted = true;
                    return Err(e);
                }
            }
        }
        chunk.truncate(filled);
        Ok(chunk)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for ChunkedReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_chunk() {
            Ok(chunk) if chunk.is_empty() => None,
            other => Some(other),
        }
    }
}
