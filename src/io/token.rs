/// Token events and the XML token source
///
/// Everything above this module sees a document as a flat, forward-only
/// sequence of start tags, end tags and text, each stamped with the line it
/// came from. `XmlTokenSource` produces that sequence from XML via
/// quick-xml; `VecTokenStream` replays a prepared one.

use crate::error::{MapError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::VecDeque;
use std::io::Cursor;
use tracing::debug;

/// An opening tag with its attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    /// Attributes in document order, names as written
    pub attributes: Vec<(String, String)>,
    pub line: usize,
}

impl StartTag {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            line,
        }
    }

    /// Builder-style attribute addition, mostly for tests
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Attribute value by case-insensitive name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether this tag's name matches, ignoring case
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag {
    pub name: String,
    pub line: usize,
}

impl EndTag {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToken {
    pub content: String,
    pub line: usize,
}

impl TextToken {
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start(StartTag),
    End(EndTag),
    Text(TextToken),
}

impl Token {
    pub fn line(&self) -> usize {
        match self {
            Token::Start(s) => s.line,
            Token::End(e) => e.line,
            Token::Text(t) => t.line,
        }
    }
}

/// A pull-based token sequence
///
/// `Ok(None)` means the sequence is exhausted; errors are reported as
/// errors, never folded into exhaustion.
pub trait TokenStream {
    fn next_token(&mut self) -> Result<Option<Token>>;

    /// Name of the file the most recent token came from
    fn current_file(&self) -> &str;
}

impl<T: TokenStream + ?Sized> TokenStream for Box<T> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        (**self).next_token()
    }

    fn current_file(&self) -> &str {
        (**self).current_file()
    }
}

/// Token source over an XML document held in memory
pub struct XmlTokenSource {
    reader: Reader<Cursor<Vec<u8>>>,
    buf: Vec<u8>,
    file: String,
    /// Byte offset up to which newlines have been counted
    counted_to: usize,
    line: usize,
    finished: bool,
}

impl XmlTokenSource {
    pub fn from_bytes(bytes: Vec<u8>, file: impl Into<String>) -> Self {
        let mut reader = Reader::from_reader(Cursor::new(bytes));
        reader.config_mut().expand_empty_elements = true;
        let file = file.into();
        debug!("Opened token source for '{}'", file);
        Self {
            reader,
            buf: Vec::new(),
            file,
            counted_to: 0,
            line: 1,
            finished: false,
        }
    }

    pub fn from_text(source: &str, file: impl Into<String>) -> Self {
        Self::from_bytes(source.as_bytes().to_vec(), file)
    }

    /// Advance the line counter to byte offset `pos`
    fn line_at(&mut self, pos: usize) -> usize {
        let bytes = self.reader.get_ref().get_ref();
        let end = pos.min(bytes.len());
        if end > self.counted_to {
            self.line += bytes[self.counted_to..end].iter().filter(|b| **b == b'\n').count();
            self.counted_to = end;
        }
        self.line
    }
}

fn start_tag(e: &BytesStart<'_>, line: usize) -> Result<StartTag> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut tag = StartTag::new(name, line);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| MapError::XmlError(format!("{} at line {}", err, line)))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| MapError::XmlError(format!("{} at line {}", err, line)))?
            .into_owned();
        tag.attributes.push((key, value));
    }
    Ok(tag)
}

impl TokenStream for XmlTokenSource {
    fn next_token(&mut self) -> Result<Option<Token>> {
        if self.finished {
            return Ok(None);
        }
        loop {
            let start = self.reader.buffer_position() as usize;
            let line = self.line_at(start);
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| MapError::XmlError(format!("{} near line {} of {}", e, line, self.file)))?;
            let token = match event {
                Event::Start(e) => Token::Start(start_tag(&e, line)?),
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    Token::End(EndTag { name, line })
                }
                Event::Text(e) => {
                    let content = e
                        .unescape()
                        .map_err(|err| MapError::XmlError(format!("{} at line {}", err, line)))?
                        .into_owned();
                    // Text tokens report the line where their content starts
                    let leading = content.len() - content.trim_start().len();
                    let text_line = line + content[..leading].matches('\n').count();
                    Token::Text(TextToken {
                        content,
                        line: text_line,
                    })
                }
                Event::CData(e) => Token::Text(TextToken {
                    content: String::from_utf8_lossy(&e.into_inner()).into_owned(),
                    line,
                }),
                Event::Eof => {
                    self.finished = true;
                    return Ok(None);
                }
                // Declarations, comments, processing instructions and
                // doctypes carry nothing for the map
                _ => continue,
            };
            return Ok(Some(token));
        }
    }

    fn current_file(&self) -> &str {
        &self.file
    }
}

/// Replays a fixed token sequence
#[derive(Debug, Clone, Default)]
pub struct VecTokenStream {
    tokens: VecDeque<Token>,
    file: String,
}

impl VecTokenStream {
    pub fn new(tokens: Vec<Token>, file: impl Into<String>) -> Self {
        Self {
            tokens: tokens.into(),
            file: file.into(),
        }
    }

    /// Tokens not yet pulled
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl TokenStream for VecTokenStream {
    fn next_token(&mut self) -> Result<Option<Token>> {
        Ok(self.tokens.pop_front())
    }

    fn current_file(&self) -> &str {
        &self.file
    }
}

/// Pull every remaining token
pub fn collect_tokens(stream: &mut dyn TokenStream) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    while let Some(token) = stream.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(xml: &str) -> Vec<Token> {
        let mut source = XmlTokenSource::from_text(xml, "test.xml");
        collect_tokens(&mut source).unwrap()
    }

    #[test]
    fn test_self_closing_expands_to_start_and_end() {
        let tokens = tokens_of("<mountain/>");

        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[0], Token::Start(s) if s.name == "mountain"));
        assert!(matches!(&tokens[1], Token::End(e) if e.name == "mountain"));
    }

    #[test]
    fn test_attributes_in_order_and_unescaped() {
        let tokens = tokens_of(r#"<unit name="A &amp; B" kind="scouts"/>"#);

        match &tokens[0] {
            Token::Start(tag) => {
                assert_eq!(tag.attributes[0], ("name".to_string(), "A & B".to_string()));
                assert_eq!(tag.attributes[1].0, "kind");
                assert_eq!(tag.attr("KIND"), Some("scouts"));
            }
            other => panic!("Expected start tag, got {:?}", other),
        }
    }

    #[test]
    fn test_line_numbers() {
        let xml = "<map>\n  <tile/>\n\n  <unit/>\n</map>";
        let starts: Vec<(String, usize)> = tokens_of(xml)
            .into_iter()
            .filter_map(|t| match t {
                Token::Start(s) => Some((s.name, s.line)),
                _ => None,
            })
            .collect();

        assert_eq!(
            starts,
            vec![
                ("map".to_string(), 1),
                ("tile".to_string(), 2),
                ("unit".to_string(), 4)
            ]
        );
    }

    #[test]
    fn test_declaration_and_comments_are_skipped() {
        let tokens = tokens_of("<?xml version=\"1.0\"?><!-- note --><map></map>");

        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[0], Token::Start(s) if s.is("MAP")));
    }

    #[test]
    fn test_text_token() {
        let tokens = tokens_of("<text>Hello &lt;world&gt;</text>");

        assert!(matches!(&tokens[1], Token::Text(t) if t.content == "Hello <world>"));
    }

    #[test]
    fn test_namespace_prefix_is_stripped() {
        let tokens = tokens_of(r#"<sp:map xmlns:sp="urn:x"><sp:tile/></sp:map>"#);

        assert!(matches!(&tokens[0], Token::Start(s) if s.name == "map"));
        assert!(matches!(&tokens[1], Token::Start(s) if s.name == "tile"));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let mut source = XmlTokenSource::from_text("<map></tile>", "bad.xml");
        let result = collect_tokens(&mut source);

        assert!(matches!(result, Err(MapError::XmlError(_))));
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let mut source = XmlTokenSource::from_text("<a/>", "a.xml");
        collect_tokens(&mut source).unwrap();

        assert!(source.next_token().unwrap().is_none());
        assert!(source.next_token().unwrap().is_none());
    }

    #[test]
    fn test_vec_stream_replays() {
        let mut stream = VecTokenStream::new(
            vec![Token::Start(StartTag::new("hill", 1)), Token::End(EndTag { name: "hill".into(), line: 1 })],
            "mem",
        );

        assert_eq!(stream.remaining(), 2);
        assert!(stream.next_token().unwrap().is_some());
        assert_eq!(stream.current_file(), "mem");
        assert_eq!(stream.remaining(), 1);
    }
}
