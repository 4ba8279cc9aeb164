//! Reveal content
//!
//! Callers describe what to reveal as an ordered list of [`Fragment`]s.
//! Bare fragments are gathered into implicit lines; a [`RevealLine`] marker
//! always stands as a line of its own.

use crate::timing::SpaceWidth;
use reveal_animation::SpringConfig;

/// A piece of caller content
///
/// Only position matters to the reveal; text and nodes are otherwise opaque.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    /// A run of text
    Text(String),
    /// An opaque sub-tree
    Node(Node),
    /// An explicit line marker
    Line(RevealLine),
}

impl Fragment {
    /// Flatten the fragment into the text it displays
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Fragment::Text(text) => out.push_str(text),
            Fragment::Node(node) => node.children.iter().for_each(|c| c.write_text(out)),
            Fragment::Line(line) => match &line.content {
                Content::Text(text) => out.push_str(text),
                Content::Fragments(children) => children.iter().for_each(|c| c.write_text(out)),
            },
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Text(text.to_string())
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::Text(text)
    }
}

impl From<Node> for Fragment {
    fn from(node: Node) -> Self {
        Fragment::Node(node)
    }
}

impl From<RevealLine> for Fragment {
    fn from(line: RevealLine) -> Self {
        Fragment::Line(line)
    }
}

/// An opaque element with children, such as a styled span
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: String,
    pub children: Vec<Fragment>,
}

/// Create a node fragment
pub fn node(kind: impl Into<String>, children: impl IntoIterator<Item = impl Into<Fragment>>) -> Node {
    Node {
        kind: kind.into(),
        children: children.into_iter().map(Into::into).collect(),
    }
}

/// The content of one line
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// Plain text, split into one unit per character
    Text(String),
    /// Fragments, one unit each
    Fragments(Vec<Fragment>),
}

impl Content {
    /// Split into animation units, in source order
    ///
    /// Characters are Unicode scalar values.
    pub fn units(&self) -> Vec<Unit> {
        match self {
            Content::Text(text) => text.chars().map(Unit::Char).collect(),
            Content::Fragments(children) => children.iter().cloned().map(Unit::Fragment).collect(),
        }
    }

    /// Number of units [`units`](Self::units) would produce
    pub fn unit_count(&self) -> usize {
        match self {
            Content::Text(text) => text.chars().count(),
            Content::Fragments(children) => children.len(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Fragments(Vec::new())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Vec<Fragment>> for Content {
    fn from(children: Vec<Fragment>) -> Self {
        Content::Fragments(children)
    }
}

/// The smallest independently animated piece of a line
#[derive(Clone, Debug, PartialEq)]
pub enum Unit {
    Char(char),
    Fragment(Fragment),
}

impl Unit {
    /// The whitespace character this unit consists of, if any
    ///
    /// A text fragment counts only when it is exactly one whitespace character.
    pub fn as_whitespace(&self) -> Option<char> {
        let ch = match self {
            Unit::Char(ch) => *ch,
            Unit::Fragment(Fragment::Text(text)) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => ch,
                    _ => return None,
                }
            }
            Unit::Fragment(_) => return None,
        };
        ch.is_whitespace().then_some(ch)
    }
}

/// One row of the reveal, animated together
///
/// Used directly as an explicit line marker, and produced by grouping for
/// runs of bare fragments.
///
/// # Example
///
/// ```ignore
/// line("Hello World")
///     .spring_config(SpringConfig::gentle())
///     .space_width(Length::Em(0.3))
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevealLine {
    pub content: Content,
    pub spring_config: Option<SpringConfig>,
    pub space_width: Option<SpaceWidth>,
}

impl RevealLine {
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            spring_config: None,
            space_width: None,
        }
    }

    /// Override the container's spring curve for this line
    pub fn spring_config(mut self, config: SpringConfig) -> Self {
        self.spring_config = Some(config);
        self
    }

    /// Override the container's whitespace width for this line
    pub fn space_width(mut self, width: impl Into<SpaceWidth>) -> Self {
        self.space_width = Some(width.into());
        self
    }
}

/// Create an explicit line
pub fn line(content: impl Into<Content>) -> RevealLine {
    RevealLine::new(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_splits_by_char() {
        let content = Content::from("café");
        let units = content.units();

        assert_eq!(units.len(), 4);
        assert_eq!(content.unit_count(), 4);
        assert_eq!(units[3], Unit::Char('é'));
    }

    #[test]
    fn test_fragments_are_units() {
        let content = Content::from(vec![
            Fragment::Node(node("span", ["Hello"])),
            Fragment::from(" "),
            Fragment::Node(node("span", ["World"])),
        ]);

        assert_eq!(content.units().len(), 3);
    }

    #[test]
    fn test_whitespace_detection() {
        assert_eq!(Unit::Char(' ').as_whitespace(), Some(' '));
        assert_eq!(Unit::Char('\t').as_whitespace(), Some('\t'));
        assert_eq!(Unit::Char('a').as_whitespace(), None);
        assert_eq!(Unit::Fragment(Fragment::from(" ")).as_whitespace(), Some(' '));
        assert_eq!(Unit::Fragment(Fragment::from("  ")).as_whitespace(), None);
        assert_eq!(Unit::Fragment(Fragment::from("")).as_whitespace(), None);
        assert_eq!(
            Unit::Fragment(Fragment::Node(node("span", [" "]))).as_whitespace(),
            None
        );
    }

    #[test]
    fn test_plain_text() {
        let fragment = Fragment::Node(node("em", [Fragment::from("Salt"), node("b", ["!"]).into()]));
        assert_eq!(fragment.plain_text(), "Salt!");
    }
}
