//! E2E Test Suite 02: Sources
//!
//! The same compressed stream is decoded from a reader, a file, a buffer, a
//! `file://` URL and an `http://` URL served by a one-shot local server; all
//! must agree on the decoded output and on the word-size leftover. Also
//! checks that abandoning a lazy decode releases the reader, the file
//! descriptor and the HTTP connection.

use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lzip::io::{
    compress_to_buffer, decompress_buffer, decompress_buffer_iter, decompress_file,
    decompress_file_iter, decompress_reader, decompress_reader_iter, decompress_url,
    decompress_url_iter, DecodeOptions, DecompressIter, EncodeOptions,
};
use lzip::{Error, RemainingBytes, UrlOptions};
use tempfile::TempDir;

fn payload() -> Vec<u8> {
    (0..100_000u32)
        .map(|i| if i % 1000 < 500 { b'a' + (i % 26) as u8 } else { (i * 7919 >> 3) as u8 })
        .collect()
}

/// Request line and body seen by the server.
struct Seen {
    request_line: String,
    body: Vec<u8>,
}

/// Serve `body` once over HTTP/1.1 on an ephemeral port.
fn serve_once(status: &'static str, body: Vec<u8>) -> (String, thread::JoinHandle<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind http listener");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept http connection");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("read timeout");
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("content length");
                }
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).expect("read body");

        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .expect("write response head");
        stream.write_all(&body).expect("write response body");
        stream.flush().expect("flush response");
        Seen {
            request_line: request_line.trim_end().to_owned(),
            body: request_body,
        }
    });
    (format!("http://{addr}/data.lz"), handle)
}

#[test]
fn all_sources_agree() {
    let data = payload();
    let compressed = compress_to_buffer(&data, &EncodeOptions::new().level(2)).unwrap();
    let options = DecodeOptions::new().chunk_size(8192);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.lz");
    fs::write(&path, &compressed).unwrap();
    let file_url = url::Url::from_file_path(&path).unwrap().to_string();

    let (http_url, server) = serve_once("200 OK", compressed.clone());
    let url_options = UrlOptions::default().timeout(Duration::from_secs(10));

    assert_eq!(decompress_buffer(&compressed, &options).unwrap(), data);
    assert_eq!(decompress_reader(&compressed[..], &options).unwrap(), data);
    assert_eq!(decompress_file(&path, &options).unwrap(), data);
    assert_eq!(decompress_url(&file_url, &url_options, &options).unwrap(), data);
    assert_eq!(decompress_url(&http_url, &url_options, &options).unwrap(), data);

    let seen = server.join().unwrap();
    assert!(seen.request_line.starts_with("GET /data.lz"), "{}", seen.request_line);
}

/// Drain a lazy decode into its aligned output and its leftover, if any.
fn drain(iter: DecompressIter<'_>) -> (Vec<u8>, Option<RemainingBytes>) {
    let mut decoded = Vec::new();
    let mut leftover = None;
    for item in iter {
        match item {
            Ok(chunk) => {
                assert!(leftover.is_none(), "data after the leftover");
                decoded.extend(chunk);
            }
            Err(err) => leftover = Some(err.into_remaining_bytes().unwrap()),
        }
    }
    (decoded, leftover)
}

fn buffered_leftover(result: lzip::Result<Vec<u8>>) -> RemainingBytes {
    result.unwrap_err().into_remaining_bytes().unwrap()
}

#[test]
fn all_sources_agree_on_leftover() {
    let data: Vec<u8> = (0..254u32).map(|i| (i * 31 % 256) as u8).collect();
    let compressed = compress_to_buffer(&data, &EncodeOptions::default()).unwrap();
    let options = DecodeOptions::new().word_size(100).chunk_size(16);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("odd.lz");
    fs::write(&path, &compressed).unwrap();
    let file_url = url::Url::from_file_path(&path).unwrap().to_string();
    let url_options = UrlOptions::default().timeout(Duration::from_secs(10));

    // Lazy form: every source yields 200 aligned bytes, then the same 54.
    let (http_url, server) = serve_once("200 OK", compressed.clone());
    let lazy = [
        ("buffer", drain(decompress_buffer_iter(&compressed, &options).unwrap())),
        ("reader", drain(decompress_reader_iter(&compressed[..], &options).unwrap())),
        ("file", drain(decompress_file_iter(&path, &options).unwrap())),
        ("file url", drain(decompress_url_iter(&file_url, &url_options, &options).unwrap())),
        ("http url", drain(decompress_url_iter(&http_url, &url_options, &options).unwrap())),
    ];
    server.join().unwrap();
    for (source, (decoded, leftover)) in lazy {
        let leftover = leftover.unwrap_or_else(|| panic!("{source}: leftover expected"));
        assert_eq!(leftover.len(), 54, "{source}");
        assert_eq!(leftover.word_size, 100, "{source}");
        assert_eq!(decoded.len() + leftover.len(), 254, "{source}");
        assert_eq!(decoded, &data[..200], "{source}");
        assert_eq!(leftover.bytes, &data[200..], "{source}");
    }

    // Buffered form: the error carries the same 54 bytes for every source.
    let (http_url, server) = serve_once("200 OK", compressed.clone());
    let buffered = [
        ("buffer", buffered_leftover(decompress_buffer(&compressed, &options))),
        ("reader", buffered_leftover(decompress_reader(&compressed[..], &options))),
        ("file", buffered_leftover(decompress_file(&path, &options))),
        ("file url", buffered_leftover(decompress_url(&file_url, &url_options, &options))),
        ("http url", buffered_leftover(decompress_url(&http_url, &url_options, &options))),
    ];
    server.join().unwrap();
    for (source, leftover) in buffered {
        assert_eq!(leftover.len(), 54, "{source}");
        assert_eq!(254 - leftover.len(), 200, "{source}");
        assert_eq!(leftover.bytes, &data[200..], "{source}");
    }
}

#[test]
fn url_with_data_is_posted() {
    let data = b"posted".to_vec();
    let compressed = compress_to_buffer(&data, &EncodeOptions::default()).unwrap();
    let (http_url, server) = serve_once("200 OK", compressed);

    let url_options = UrlOptions::default()
        .timeout(Duration::from_secs(10))
        .data(b"key=value".to_vec());
    let decoded: Vec<u8> = decompress_url_iter(&http_url, &url_options, &DecodeOptions::default())
        .unwrap()
        .map(Result::unwrap)
        .collect::<Vec<_>>()
        .concat();
    assert_eq!(decoded, data);

    let seen = server.join().unwrap();
    assert!(seen.request_line.starts_with("POST "), "{}", seen.request_line);
    assert_eq!(seen.body, b"key=value");
}

#[test]
fn http_error_status_is_reported() {
    let (http_url, server) = serve_once("404 Not Found", Vec::new());
    let err = decompress_url(&http_url, &UrlOptions::default(), &DecodeOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)), "{err}");
    server.join().unwrap();
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource release
// ─────────────────────────────────────────────────────────────────────────────

/// Reader over a byte vector that records when it is dropped.
struct Tracked {
    inner: io::Cursor<Vec<u8>>,
    dropped: Arc<AtomicBool>,
}

impl Read for Tracked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

fn tracked(compressed: Vec<u8>) -> (Tracked, Arc<AtomicBool>) {
    let dropped = Arc::new(AtomicBool::new(false));
    let reader = Tracked {
        inner: io::Cursor::new(compressed),
        dropped: Arc::clone(&dropped),
    };
    (reader, dropped)
}

#[test]
fn abandoning_iterator_drops_reader() {
    let compressed = compress_to_buffer(&payload(), &EncodeOptions::new().level(0)).unwrap();
    let (reader, dropped) = tracked(compressed);

    let mut iter = decompress_reader_iter(reader, &DecodeOptions::new().chunk_size(1024)).unwrap();
    let first = iter.next().unwrap().unwrap();
    assert!(!first.is_empty());
    assert!(!dropped.load(Ordering::SeqCst));

    drop(iter);
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn exhausted_iterator_drops_reader_before_final_items() {
    let data: Vec<u8> = (0..254u32).map(|i| i as u8).collect();
    let compressed = compress_to_buffer(&data, &EncodeOptions::default()).unwrap();
    let (reader, dropped) = tracked(compressed);

    let options = DecodeOptions::new().word_size(100).chunk_size(16);
    let mut iter = decompress_reader_iter(reader, &options).unwrap();
    let mut decoded = Vec::new();
    let leftover = loop {
        match iter.next() {
            Some(Ok(chunk)) => decoded.extend(chunk),
            Some(Err(err)) => break err.into_remaining_bytes().unwrap(),
            None => panic!("leftover expected"),
        }
    };
    // The reader is released as soon as end-of-input is seen.
    assert!(dropped.load(Ordering::SeqCst));
    assert!(iter.next().is_none());
    assert_eq!(decoded.len(), 200);
    assert_eq!(leftover.bytes, &data[200..]);
}

/// Number of descriptors of this process open on `path`.
#[cfg(target_os = "linux")]
fn open_descriptors_for(path: &std::path::Path) -> usize {
    fs::read_dir("/proc/self/fd")
        .unwrap()
        .filter_map(|entry| fs::read_link(entry.ok()?.path()).ok())
        .filter(|target| target == path)
        .count()
}

#[cfg(target_os = "linux")]
#[test]
fn abandoning_file_iterators_closes_descriptor() {
    let compressed = compress_to_buffer(&payload(), &EncodeOptions::new().level(0)).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("abandoned.lz");
    fs::write(&path, &compressed).unwrap();
    let path = fs::canonicalize(&path).unwrap();
    let options = DecodeOptions::new().chunk_size(1024);

    let mut iter = decompress_file_iter(&path, &options).unwrap();
    assert!(!iter.next().unwrap().unwrap().is_empty());
    assert_eq!(open_descriptors_for(&path), 1);
    drop(iter);
    assert_eq!(open_descriptors_for(&path), 0);

    let file_url = url::Url::from_file_path(&path).unwrap().to_string();
    let mut iter = decompress_url_iter(&file_url, &UrlOptions::default(), &options).unwrap();
    assert!(!iter.next().unwrap().unwrap().is_empty());
    assert_eq!(open_descriptors_for(&path), 1);
    drop(iter);
    assert_eq!(open_descriptors_for(&path), 0);
}

/// Announce `body` in full but send only its first `sent` bytes, then wait for
/// the client to close the connection. Returns `true` if the close was seen
/// before the read timeout.
fn serve_partial(body: Vec<u8>, sent: usize) -> (String, thread::JoinHandle<bool>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind http listener");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept http connection");
        let mut reader = BufReader::new(stream);
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read request");
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }
        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .expect("write response head");
        stream.write_all(&body[..sent]).expect("write partial body");
        stream.flush().expect("flush response");

        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .expect("read timeout");
        let mut buf = [0u8; 64];
        loop {
            match stream.read(&mut buf) {
                Ok(0) => return true,
                Ok(_) => continue,
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                    return false
                }
                Err(_) => return true,
            }
        }
    });
    (format!("http://{addr}/abandoned.lz"), handle)
}

#[test]
fn abandoning_http_iterator_closes_connection() {
    let compressed = compress_to_buffer(&payload(), &EncodeOptions::new().level(0)).unwrap();
    let sent = compressed.len() / 2;
    let (http_url, server) = serve_partial(compressed, sent);

    let url_options = UrlOptions::default().timeout(Duration::from_secs(30));
    let mut iter =
        decompress_url_iter(&http_url, &url_options, &DecodeOptions::new().chunk_size(1024))
            .unwrap();
    assert!(!iter.next().unwrap().unwrap().is_empty());
    // The response is still open: the server is waiting on it.
    assert!(!server.is_finished());

    drop(iter);
    assert!(server.join().unwrap(), "connection still open after the iterator was dropped");
}
