/// Transparent file inclusion
///
/// `<include file="other.xml"/>` anywhere in a document is replaced by the
/// tokens of `other.xml`, as if its text had been pasted in. Callers never
/// see the marker itself. Included paths resolve against the directory of
/// the including file.

use super::token::{Token, TokenStream, XmlTokenSource};
use crate::error::{MapError, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Tag name of the inclusion marker
pub const INCLUDE_TAG: &str = "include";

/// Default cap on nested inclusion
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Opens a named document as a token stream
pub trait DocumentOpener {
    fn open(&self, file: &str) -> Result<Box<dyn TokenStream>>;
}

/// Opens documents from the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileOpener;

impl DocumentOpener for FileOpener {
    fn open(&self, file: &str) -> Result<Box<dyn TokenStream>> {
        let bytes = std::fs::read(file).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MapError::FileNotFound(file.to_string()),
            _ => MapError::IoError(e),
        })?;
        debug!("Read {} bytes from '{}'", bytes.len(), file);
        Ok(Box::new(XmlTokenSource::from_bytes(bytes, file)))
    }
}

/// Serves documents from memory, keyed by name
#[derive(Debug, Default, Clone)]
pub struct MemoryOpener {
    documents: HashMap<String, String>,
}

impl MemoryOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.add(name, source);
        self
    }

    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.documents.insert(name.into(), source.into());
    }
}

impl DocumentOpener for MemoryOpener {
    fn open(&self, file: &str) -> Result<Box<dyn TokenStream>> {
        let source = self
            .documents
            .get(file)
            .ok_or_else(|| MapError::FileNotFound(file.to_string()))?;
        Ok(Box::new(XmlTokenSource::from_text(source, file)))
    }
}

/// One level of inclusion: the stream and the file it reads
struct Frame {
    stream: Box<dyn TokenStream>,
    file: String,
}

/// Token stream that follows inclusion markers
///
/// Each frame owns its stream, so dropping this (after success, an error,
/// or an abandoned parse) releases every file still open.
pub struct IncludingStream<'o> {
    frames: Vec<Frame>,
    opener: &'o dyn DocumentOpener,
    root_file: String,
    max_depth: usize,
}

impl<'o> IncludingStream<'o> {
    /// Wrap an already-open root stream
    pub fn new(root: Box<dyn TokenStream>, opener: &'o dyn DocumentOpener) -> Self {
        let root_file = root.current_file().to_string();
        Self {
            frames: vec![Frame {
                stream: root,
                file: root_file.clone(),
            }],
            opener,
            root_file,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Open `file` through `opener` and wrap it
    pub fn open(file: &str, opener: &'o dyn DocumentOpener) -> Result<Self> {
        let root = opener.open(file)?;
        info!("Reading '{}'", file);
        Ok(Self::new(root, opener))
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of includes currently open
    pub fn depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    fn resolve(&self, file: &str) -> String {
        let path = Path::new(file);
        if path.is_absolute() {
            return file.to_string();
        }
        match Path::new(self.current_file()).parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(path).to_string_lossy().into_owned(),
            _ => file.to_string(),
        }
    }

    fn push_include(&mut self, file: &str) -> Result<()> {
        let resolved = self.resolve(file);
        if self.frames.iter().any(|f| f.file == resolved) {
            return Err(MapError::IncludeCycle { file: resolved });
        }
        if self.depth() >= self.max_depth {
            return Err(MapError::IncludeTooDeep {
                file: resolved,
                max: self.max_depth,
            });
        }
        let stream = self.opener.open(&resolved).map_err(|e| MapError::Include {
            file: resolved.clone(),
            source: Box::new(e),
        })?;
        debug!("Including '{}' at depth {}", resolved, self.frames.len());
        self.frames.push(Frame { stream, file: resolved });
        Ok(())
    }
}

impl TokenStream for IncludingStream<'_> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            let Some(frame) = self.frames.last_mut() else {
                return Ok(None);
            };
            match frame.stream.next_token()? {
                None => {
                    if let Some(done) = self.frames.pop() {
                        debug!("Finished '{}'", done.file);
                    }
                }
                Some(Token::Start(tag)) if tag.is(INCLUDE_TAG) => {
                    let file = tag
                        .attr("file")
                        .ok_or_else(|| MapError::missing_parameter(&tag.name, "file", tag.line))?
                        .to_string();
                    self.push_include(&file)?;
                }
                Some(Token::End(end)) if end.is(INCLUDE_TAG) => {}
                Some(token) => return Ok(Some(token)),
            }
        }
    }

    fn current_file(&self) -> &str {
        self.frames.last().map(|f| f.file.as_str()).unwrap_or(&self.root_file)
    }
}


// Without inclusion markers the wrapper must be invisible
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::io::token::collect_tokens;
    use proptest::prelude::*;

    fn document(children: &[(String, u32, String)]) -> String {
        let mut xml = String::from("<root>");
        for (name, id, text) in children {
            xml.push_str(&format!("<{name} id=\"{id}\">{text}</{name}>"));
        }
        xml.push_str("</root>");
        xml
    }

    proptest! {
        #[test]
        fn test_no_markers_means_identical_tokens(
            children in prop::collection::vec(("[a-h]{1,6}", 0u32..1000, "[a-z ]{0,12}"), 0..20)
        ) {
            let xml = document(&children);

            let mut direct = XmlTokenSource::from_text(&xml, "doc.xml");
            let expected = collect_tokens(&mut direct).unwrap();

            let opener = MemoryOpener::new().with_document("doc.xml", xml.clone());
            let mut including = IncludingStream::open("doc.xml", &opener).unwrap();
            let actual = collect_tokens(&mut including).unwrap();

            prop_assert_eq!(expected, actual);
        }
    }
}
