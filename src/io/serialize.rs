/// Text layout for `Node` trees
///
/// Childless nodes without text self-close; nodes with text or a forced
/// close get open/body/close; children are indented one level per depth.
/// Placeholders and inclusion markers write their children in place.

use super::node::Node;
use crate::config::MapIoConfig;
use crate::error::{MapError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use tracing::debug;

fn xml_error(err: impl std::fmt::Display) -> MapError {
    MapError::XmlError(err.to_string())
}

#[derive(Debug, Clone)]
pub struct NodeSerializer {
    indent_char: u8,
    indent_size: usize,
    declaration: bool,
}

impl Default for NodeSerializer {
    fn default() -> Self {
        Self::from_config(&MapIoConfig::default())
    }
}

impl NodeSerializer {
    pub fn from_config(config: &MapIoConfig) -> Self {
        Self {
            indent_char: config.indent_byte(),
            indent_size: config.indent_size,
            declaration: config.xml_declaration,
        }
    }

    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    /// Write `root` to `out`
    pub fn write<W: Write>(&self, root: &Node, out: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(out, self.indent_char, self.indent_size);
        if self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
                .map_err(xml_error)?;
        }
        write_node(&mut writer, root)?;
        writer.get_mut().write_all(b"\n")?;
        Ok(())
    }

    pub fn to_string(&self, root: &Node) -> Result<String> {
        let mut out = Vec::new();
        self.write(root, &mut out)?;
        debug!("Serialized <{}> to {} bytes", root.tag(), out.len());
        String::from_utf8(out).map_err(xml_error)
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    if node.is_transparent() {
        for child in node.children() {
            write_node(writer, child)?;
        }
        return Ok(());
    }

    let mut start = BytesStart::new(node.tag());
    for (name, value) in node.attributes() {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let has_body = node.text_content().is_some() || !node.children().is_empty() || node.is_forced_separate();
    if !has_body {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if let Some(text) = node.text_content() {
        writer.write_event(Event::Text(BytesText::new(text))).map_err(xml_error)?;
    }
    for child in node.children() {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.tag())))
        .map_err(xml_error)
}
