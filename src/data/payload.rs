// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The value carried in a parameter slot.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncRead;

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Where a payload's bytes live.
#[derive(Clone)]
pub enum Content {
    /// Bytes held in memory, e.g. an output read back from a finished run.
    Bytes(Vec<u8>),
    /// A caller-owned file that is streamed into the workspace when a run starts.
    File(PathBuf),
    /// A caller-supplied byte stream. It can be read once; clones share it.
    Stream(Arc<Mutex<Option<BoxedReader>>>),
}

impl Content {
    pub fn stream<R: AsyncRead + Send + Unpin + 'static>(reader: R) -> Self {
        Content::Stream(Arc::new(Mutex::new(Some(Box::new(reader)))))
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Content::File(path) => write!(f, "File({})", path.display()),
            Content::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Content::Bytes(a), Content::Bytes(b)) => a == b,
            (Content::File(a), Content::File(b)) => a == b,
            (Content::Stream(a), Content::Stream(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Content {}

/// Content plus a MIME type tag.
///
/// A payload without content declares an expected output: the type is reserved
/// but nothing has been produced yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    content: Option<Content>,
    mime_type: String,
}

impl MediaPayload {
    pub fn from_bytes<M: Into<String>>(bytes: Vec<u8>, mime_type: M) -> Self {
        Self {
            content: Some(Content::Bytes(bytes)),
            mime_type: mime_type.into(),
        }
    }

    pub fn from_file<P: Into<PathBuf>, M: Into<String>>(path: P, mime_type: M) -> Self {
        Self {
            content: Some(Content::File(path.into())),
            mime_type: mime_type.into(),
        }
    }

    /// Content read from `reader` when the run stages its inputs.
    pub fn from_reader<R, M>(reader: R, mime_type: M) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        M: Into<String>,
    {
        Self {
            content: Some(Content::stream(reader)),
            mime_type: mime_type.into(),
        }
    }

    /// Content-absent declaration of an expected output of `mime_type`.
    pub fn declaration<M: Into<String>>(mime_type: M) -> Self {
        Self {
            content: None,
            mime_type: mime_type.into(),
        }
    }

    /// Placeholder seeded into output slots before the caller declares a type.
    pub(crate) fn unset() -> Self {
        Self {
            content: None,
            mime_type: String::new(),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// True for any payload whose MIME type has been set, with or without content.
    pub fn is_declared(&self) -> bool {
        !self.mime_type.is_empty()
    }

    /// In-memory bytes, when the content is held in memory.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.content {
            Some(Content::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Open the content as an async byte stream.
    ///
    /// Fails with `NotFound` for a content-absent payload, and for a stream that
    /// has already been read.
    pub async fn reader(&self) -> io::Result<BoxedReader> {
        match &self.content {
            Some(Content::Bytes(bytes)) => Ok(Box::new(io::Cursor::new(bytes.clone()))),
            Some(Content::File(path)) => Ok(Box::new(tokio::fs::File::open(path).await?)),
            Some(Content::Stream(slot)) => take_stream(slot),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "payload has no content",
            )),
        }
    }
}

fn take_stream(slot: &Mutex<Option<BoxedReader>>) -> io::Result<BoxedReader> {
    let mut reader = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    reader
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "stream already consumed"))
}
