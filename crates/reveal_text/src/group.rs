//! Line grouping
//!
//! Normalizes caller fragments into lines. Explicit [`RevealLine`] markers
//! stay as they are; each run of consecutive bare fragments between them is
//! collapsed into one implicit line.

use crate::fragment::{Content, Fragment, RevealLine};

/// Accumulator state for the grouping fold
enum Group {
    /// An explicit line; nothing joins it
    Sealed(RevealLine),
    /// A run of bare fragments still accepting more
    Open(Vec<Fragment>),
}

impl Group {
    fn into_line(self) -> RevealLine {
        match self {
            Group::Sealed(line) => line,
            Group::Open(mut run) => {
                // A lone fragment becomes the whole content, so a bare
                // string still splits into characters
                if run.len() == 1 {
                    match run.pop() {
                        Some(Fragment::Text(text)) => RevealLine::new(text),
                        Some(other) => RevealLine::new(vec![other]),
                        None => RevealLine::default(),
                    }
                } else {
                    RevealLine::new(Content::Fragments(run))
                }
            }
        }
    }
}

/// Group fragments into lines, preserving source order
///
/// Total over any input; no fragments yields no lines.
pub fn group_lines(children: impl IntoIterator<Item = Fragment>) -> Vec<RevealLine> {
    children
        .into_iter()
        .fold(Vec::<Group>::new(), |mut groups, child| {
            match child {
                Fragment::Line(line) => groups.push(Group::Sealed(line)),
                bare => match groups.last_mut() {
                    Some(Group::Open(run)) => run.push(bare),
                    _ => groups.push(Group::Open(vec![bare])),
                },
            }
            groups
        })
        .into_iter()
        .map(Group::into_line)
        .collect()
}
