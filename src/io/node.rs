/// Intermediate representation for writing
///
/// Writers build a `Node` tree that mirrors the document's shape; the
/// serializer decides the text layout. Keeping the two apart lets the
/// shape be tested without comparing whitespace.

/// One element of the document being written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    force_separate: bool,
    include_file: Option<String>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// A tagless node whose children are written in its place
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// An inclusion marker; its children are currently written in place
    pub fn include(file: impl Into<String>) -> Self {
        Self {
            tag: super::include::INCLUDE_TAG.to_string(),
            include_file: Some(file.into()),
            ..Self::default()
        }
    }

    /// Set an attribute, keeping the position of an earlier one with the
    /// same name but taking the new value
    pub fn attribute(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Set an attribute only when `condition` holds
    pub fn attribute_if(self, condition: bool, name: impl Into<String>, value: impl ToString) -> Self {
        if condition {
            self.attribute(name, value)
        } else {
            self
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Always write an explicit close tag, even with no content
    pub fn force_separate_close(mut self) -> Self {
        self.force_separate = true;
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn extend_children(&mut self, children: impl IntoIterator<Item = Node>) {
        self.children.extend(children);
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_placeholder(&self) -> bool {
        self.tag.is_empty()
    }

    pub fn include_file(&self) -> Option<&str> {
        self.include_file.as_deref()
    }

    pub fn is_forced_separate(&self) -> bool {
        self.force_separate
    }

    /// Nodes that write themselves rather than only their children
    pub fn is_transparent(&self) -> bool {
        self.is_placeholder() || self.include_file.is_some()
    }
}
