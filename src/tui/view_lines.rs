//! # View Lowering
//!
//! Flattens a composed `ViewTree` into indented lines of fragments. The TUI
//! turns those into styled ratatui `Line`s; the headless renderer turns them
//! into wrapped plain text.
//!
//! Block tags (`div`, `section`, `p`, headings, list items...) start a new
//! line. Text and links flow inline. `section` and `ul` indent their
//! contents by two columns.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use textwrap::Options;

use crate::routing::ViewTree;

const INDENT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    Plain,
    Heading,
    /// Position of the link in document order.
    Link { index: usize, href: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub kind: FragmentKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewLine {
    pub indent: usize,
    pub bullet: bool,
    pub fragments: Vec<Fragment>,
}

impl ViewLine {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

struct Flow {
    lines: Vec<ViewLine>,
    current: ViewLine,
    indent: usize,
    heading: bool,
    links: usize,
}

impl Flow {
    fn break_line(&mut self) {
        if !self.current.is_empty() {
            let next = ViewLine {
                indent: self.indent,
                ..Default::default()
            };
            self.lines.push(std::mem::replace(&mut self.current, next));
        } else {
            self.current.indent = self.indent;
        }
    }

    fn push(&mut self, text: &str, kind: FragmentKind) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.current.fragments.push(Fragment {
            text: text.to_string(),
            kind,
        });
    }

    fn walk(&mut self, view: &ViewTree) {
        match view {
            ViewTree::Element { tag, children, .. } => {
                let block = is_block(tag);
                let indents = matches!(tag.as_str(), "section" | "ul");
                let heading = matches!(tag.as_str(), "h1" | "h2" | "h3");

                if block {
                    self.break_line();
                }
                if indents {
                    self.indent += INDENT;
                    self.current.indent = self.indent;
                }
                if tag == "li" {
                    self.current.bullet = true;
                }
                let outer_heading = self.heading;
                self.heading |= heading;

                for child in children {
                    self.walk(child);
                }

                self.heading = outer_heading;
                if indents {
                    self.indent -= INDENT;
                }
                if block {
                    self.break_line();
                }
            }
            ViewTree::Text(text) => {
                let kind = if self.heading {
                    FragmentKind::Heading
                } else {
                    FragmentKind::Plain
                };
                self.push(text, kind);
            }
            ViewTree::Link { to, label, href, .. } => {
                let index = self.links;
                self.links += 1;
                let href = href.clone().unwrap_or_else(|| to.raw().to_string());
                self.push(label, FragmentKind::Link { index, href });
            }
            ViewTree::Outlet => {}
        }
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "main" | "header" | "nav" | "section" | "div" | "p" | "h1" | "h2" | "h3" | "ul" | "li"
    )
}

/// Flattens `view` into lines. Empty lines are dropped.
pub fn layout(view: &ViewTree) -> Vec<ViewLine> {
    let mut flow = Flow {
        lines: Vec::new(),
        current: ViewLine::default(),
        indent: 0,
        heading: false,
        links: 0,
    };
    flow.walk(view);
    flow.break_line();
    flow.lines
}

/// Styled lines for the TUI. The link at `focused` is highlighted.
pub fn to_lines(view: &ViewTree, focused: Option<usize>) -> Vec<Line<'static>> {
    layout(view)
        .into_iter()
        .map(|line| {
            let mut spans = vec![Span::raw(" ".repeat(line.indent))];
            if line.bullet {
                spans.push(Span::raw("• "));
            }
            for (i, fragment) in line.fragments.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                let style = match &fragment.kind {
                    FragmentKind::Plain => Style::default(),
                    FragmentKind::Heading => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    FragmentKind::Link { index, .. } if Some(*index) == focused => Style::default()
                        .fg(Color::Black)
                        .bg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                    FragmentKind::Link { .. } => Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::UNDERLINED),
                };
                spans.push(Span::styled(fragment.text, style));
            }
            Line::from(spans)
        })
        .collect()
}

/// Plain text wrapped to `width` columns. Links print as `label <href>`.
pub fn plain_text(view: &ViewTree, width: usize) -> String {
    let mut out = Vec::new();
    for line in layout(view) {
        let text = line
            .fragments
            .iter()
            .map(|f| match &f.kind {
                FragmentKind::Link { href, .. } => format!("{} <{}>", f.text, href),
                _ => f.text.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ");

        let indent = " ".repeat(line.indent);
        let first = if line.bullet {
            format!("{indent}• ")
        } else {
            indent.clone()
        };
        let rest = if line.bullet {
            format!("{indent}  ")
        } else {
            indent
        };
        let options = Options::new(width.max(first.len() + 1))
            .initial_indent(&first)
            .subsequent_indent(&rest);
        out.extend(textwrap::wrap(&text, options).into_iter().map(|l| l.into_owned()));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> ViewTree {
        ViewTree::element("main")
            .child(ViewTree::element("h1").child(ViewTree::text("Epic Notes")))
            .child(
                ViewTree::element("nav")
                    .child(ViewTree::link("/", "Home"))
                    .child(ViewTree::link("/users", "Users")),
            )
            .child(
                ViewTree::element("section").child(
                    ViewTree::element("ul")
                        .child(ViewTree::element("li").child(ViewTree::text("Groceries"))),
                ),
            )
    }

    #[test]
    fn test_layout_breaks_blocks_and_flows_inline() {
        let lines = layout(&page());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].fragments[0].kind, FragmentKind::Heading);
        assert_eq!(lines[1].fragments.len(), 2);
        assert!(lines[2].bullet);
        assert_eq!(lines[2].indent, 4);
    }

    #[test]
    fn test_links_are_numbered_in_order() {
        let lines = layout(&page());
        let indices: Vec<usize> = lines[1]
            .fragments
            .iter()
            .filter_map(|f| match f.kind {
                FragmentKind::Link { index, .. } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_plain_text_shows_hrefs() {
        let text = plain_text(&page(), 80);
        assert_eq!(
            text,
            "Epic Notes\nHome </> Users </users>\n    • Groceries"
        );
    }

    #[test]
    fn test_plain_text_wraps() {
        let view = ViewTree::element("p").child(ViewTree::text("one two three four"));
        assert_eq!(plain_text(&view, 9), "one two\nthree\nfour");
    }

    #[test]
    fn test_focused_link_is_highlighted() {
        let lines = to_lines(&page(), Some(1));
        let users = lines[1]
            .spans
            .iter()
            .find(|s| s.content == "Users")
            .unwrap();
        assert_eq!(users.style.bg, Some(Color::Green));
    }
}
