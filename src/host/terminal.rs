//! Terminal host - a terminal-canvas binding over crossterm.
//!
//! Materializes the host tree as reference-counted nodes and paints it as
//! styled lines: every non-text node is a block that ends a line, text
//! nodes flow into the current line with the styling inherited from their
//! ancestors. Output is queued into the writer and flushed once per
//! frame, with every line truncated to the terminal width.
//!
//! Recognized attributes: `nodeValue` (text content), the boolean style
//! flags `bold` / `italic` / `underline` / `dim` / `reverse`, and `fg`
//! (named color or `#rrggbb`). Anything else has no visual mapping and is
//! ignored.

use std::any::Any;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use bitflags::bitflags;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{queue, terminal};
use unicode_width::UnicodeWidthChar;

use super::{HostBackend, HostError};
use crate::node::{EventHandler, PropValue, Props};
use crate::types::{NODE_VALUE, TEXT_NODE, event_name};

// =============================================================================
// Text attributes
// =============================================================================

bitflags! {
    /// Text styling flags carried by a terminal node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextAttr: u8 {
        const BOLD      = 1 << 0;
        const ITALIC    = 1 << 1;
        const UNDERLINE = 1 << 2;
        const DIM       = 1 << 3;
        const REVERSE   = 1 << 4;
    }
}

fn attr_flag(name: &str) -> Option<TextAttr> {
    match name {
        "bold" => Some(TextAttr::BOLD),
        "italic" => Some(TextAttr::ITALIC),
        "underline" => Some(TextAttr::UNDERLINE),
        "dim" => Some(TextAttr::DIM),
        "reverse" => Some(TextAttr::REVERSE),
        _ => None,
    }
}

fn parse_color(value: &str) -> Option<Color> {
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Color::Rgb { r, g, b });
        }
        return None;
    }
    match value.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "grey" | "gray" => Some(Color::Grey),
        _ => None,
    }
}

// =============================================================================
// Terminal nodes
// =============================================================================

struct TermNodeInner {
    kind: String,
    text: Option<String>,
    attrs: TextAttr,
    fg: Option<Color>,
    handlers: Vec<(String, EventHandler)>,
    children: Vec<TermNode>,
}

/// Handle to one node of the terminal canvas. Cloning shares the node.
#[derive(Clone)]
pub struct TermNode {
    inner: Rc<RefCell<TermNodeInner>>,
}

impl std::fmt::Debug for TermNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TermNode")
            .field("kind", &inner.kind)
            .field("text", &inner.text)
            .field("child_count", &inner.children.len())
            .finish()
    }
}

impl TermNode {
    fn new(kind: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TermNodeInner {
                kind: kind.to_string(),
                text: None,
                attrs: TextAttr::empty(),
                fg: None,
                handlers: Vec::new(),
                children: Vec::new(),
            })),
        }
    }

    /// Identity comparison of handles.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn kind(&self) -> String {
        self.inner.borrow().kind.clone()
    }

    /// Current text content (text nodes only).
    pub fn text(&self) -> Option<String> {
        self.inner.borrow().text.clone()
    }

    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// Invoke every handler attached for `event` with the host's native
    /// event object.
    pub fn dispatch(&self, event: &str, payload: &dyn Any) {
        // Clone the matching handlers out so a handler may mutate the
        // tree while running.
        let handlers: Vec<EventHandler> = self
            .inner
            .borrow()
            .handlers
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(payload);
        }
    }

    fn apply_attribute(&self, name: &str, value: &PropValue) {
        let mut inner = self.inner.borrow_mut();
        if name == NODE_VALUE {
            inner.text = value.attribute_text();
        } else if let Some(flag) = attr_flag(name) {
            if let PropValue::Bool(on) = value {
                inner.attrs.set(flag, *on);
            }
        } else if name == "fg" {
            inner.fg = value.as_text().and_then(parse_color);
        }
    }

    fn clear_attribute(&self, name: &str) {
        let mut inner = self.inner.borrow_mut();
        if name == NODE_VALUE {
            inner.text = None;
        } else if let Some(flag) = attr_flag(name) {
            inner.attrs.remove(flag);
        } else if name == "fg" {
            inner.fg = None;
        }
    }
}

// =============================================================================
// Painting
// =============================================================================

#[derive(Clone, Copy, Default)]
struct SpanStyle {
    attrs: TextAttr,
    fg: Option<Color>,
}

struct Span {
    text: String,
    style: SpanStyle,
}

fn collect_lines(node: &TermNode, inherited: SpanStyle, lines: &mut Vec<Vec<Span>>) {
    let inner = node.inner.borrow();
    let style = SpanStyle {
        attrs: inherited.attrs | inner.attrs,
        fg: inner.fg.or(inherited.fg),
    };

    if inner.kind == TEXT_NODE {
        if let Some(text) = &inner.text {
            match lines.last_mut() {
                Some(line) => line.push(Span { text: text.clone(), style }),
                None => lines.push(vec![Span { text: text.clone(), style }]),
            }
        }
        return;
    }

    for child in &inner.children {
        collect_lines(child, style, lines);
    }
    // A block ends its line; following content starts fresh.
    lines.push(Vec::new());
}

/// Truncate to at most `budget` terminal columns.
fn truncate_to_width(text: &str, budget: usize) -> (String, usize) {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    (out, used)
}

// =============================================================================
// Terminal host
// =============================================================================

/// Host backend painting the tree as styled terminal lines.
pub struct TerminalHost {
    width: Option<u16>,
}

impl TerminalHost {
    /// Host that paints at the detected terminal width (80 columns when
    /// detection fails, e.g. without a tty).
    pub fn new() -> Self {
        Self { width: None }
    }

    /// Host with a fixed width, independent of the terminal.
    pub fn with_width(width: u16) -> Self {
        Self { width: Some(width) }
    }

    /// Create a detached container node to render into.
    pub fn container(&self) -> TermNode {
        TermNode::new("#container")
    }

    /// Paint the tree under `root` into `out`, one flush per frame.
    pub fn present(&mut self, root: &TermNode, out: &mut impl Write) -> io::Result<()> {
        let width = match self.width {
            Some(w) => w,
            None => terminal::size().map(|(w, _)| w).unwrap_or(80),
        };

        let mut lines = Vec::new();
        collect_lines(root, SpanStyle::default(), &mut lines);
        // Drop the trailing block boundary so frames do not grow a blank
        // line each time.
        if lines.last().is_some_and(Vec::is_empty) {
            lines.pop();
        }

        for line in &lines {
            let mut budget = width as usize;
            for span in line {
                if budget == 0 {
                    break;
                }
                let (text, used) = truncate_to_width(&span.text, budget);
                budget -= used;
                if text.is_empty() {
                    continue;
                }

                let styled = !span.style.attrs.is_empty() || span.style.fg.is_some();
                if span.style.attrs.contains(TextAttr::BOLD) {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                if span.style.attrs.contains(TextAttr::ITALIC) {
                    queue!(out, SetAttribute(Attribute::Italic))?;
                }
                if span.style.attrs.contains(TextAttr::UNDERLINE) {
                    queue!(out, SetAttribute(Attribute::Underlined))?;
                }
                if span.style.attrs.contains(TextAttr::DIM) {
                    queue!(out, SetAttribute(Attribute::Dim))?;
                }
                if span.style.attrs.contains(TextAttr::REVERSE) {
                    queue!(out, SetAttribute(Attribute::Reverse))?;
                }
                if let Some(fg) = span.style.fg {
                    queue!(out, SetForegroundColor(fg))?;
                }
                queue!(out, Print(&text))?;
                if styled {
                    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                }
            }
            queue!(out, Print("\r\n"))?;
        }
        out.flush()
    }
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBackend for TerminalHost {
    type Node = TermNode;

    fn create_node(&mut self, kind: &str, props: &Props) -> Result<TermNode, HostError> {
        if kind.is_empty() {
            return Err(HostError::InvalidNodeType { kind: kind.to_string() });
        }
        let node = TermNode::new(kind);
        for (name, value) in props.attributes() {
            node.apply_attribute(name, value);
        }
        for (name, handler) in props.events() {
            node.inner
                .borrow_mut()
                .handlers
                .push((event_name(name), handler.clone()));
        }
        Ok(node)
    }

    fn set_attribute(
        &mut self,
        node: &TermNode,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        node.apply_attribute(name, value);
        Ok(())
    }

    fn remove_attribute(&mut self, node: &TermNode, name: &str) -> Result<(), HostError> {
        node.clear_attribute(name);
        Ok(())
    }

    fn attach_handler(
        &mut self,
        node: &TermNode,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        node.inner
            .borrow_mut()
            .handlers
            .push((event.to_string(), handler.clone()));
        Ok(())
    }

    fn detach_handler(
        &mut self,
        node: &TermNode,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        node.inner
            .borrow_mut()
            .handlers
            .retain(|(name, h)| !(name == event && Rc::ptr_eq(h, handler)));
        Ok(())
    }

    fn append_child(&mut self, parent: &TermNode, child: &TermNode) -> Result<(), HostError> {
        parent.inner.borrow_mut().children.push(child.clone());
        Ok(())
    }

    fn remove_child(&mut self, parent: &TermNode, child: &TermNode) -> Result<(), HostError> {
        parent
            .inner
            .borrow_mut()
            .children
            .retain(|c| !c.ptr_eq(child));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn text_node(host: &mut TerminalHost, value: &str) -> TermNode {
        let props = Props::new().with(NODE_VALUE, value);
        host.create_node(TEXT_NODE, &props).unwrap()
    }

    #[test]
    fn test_present_writes_text_content() {
        let mut host = TerminalHost::with_width(40);
        let container = host.container();
        let div = host.create_node("div", &Props::new()).unwrap();
        let text = text_node(&mut host, "hello");
        host.append_child(&div, &text).unwrap();
        host.append_child(&container, &div).unwrap();

        let mut out = Vec::new();
        host.present(&container, &mut out).unwrap();
        let frame = String::from_utf8(out).unwrap();
        assert!(frame.contains("hello"));
    }

    #[test]
    fn test_lines_truncate_to_width() {
        let mut host = TerminalHost::with_width(4);
        let container = host.container();
        let div = host.create_node("div", &Props::new()).unwrap();
        let text = text_node(&mut host, "overflowing");
        host.append_child(&div, &text).unwrap();
        host.append_child(&container, &div).unwrap();

        let mut out = Vec::new();
        host.present(&container, &mut out).unwrap();
        let frame = String::from_utf8(out).unwrap();
        assert!(frame.contains("over"));
        assert!(!frame.contains("overf"));
    }

    #[test]
    fn test_style_flags_toggle() {
        let mut host = TerminalHost::new();
        let node = host
            .create_node("div", &Props::new().with("bold", true))
            .unwrap();
        assert!(node.inner.borrow().attrs.contains(TextAttr::BOLD));

        host.remove_attribute(&node, "bold").unwrap();
        assert!(!node.inner.borrow().attrs.contains(TextAttr::BOLD));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(
            parse_color("#102030"),
            Some(Color::Rgb { r: 0x10, g: 0x20, b: 0x30 })
        );
        assert_eq!(parse_color("no-such-color"), None);
        assert_eq!(parse_color("#12"), None);
    }

    #[test]
    fn test_detach_removes_only_matching_handler() {
        let mut host = TerminalHost::new();
        let node = host.create_node("button", &Props::new()).unwrap();

        let hits = Rc::new(Cell::new(0));
        let hits_seen = hits.clone();
        let f1: EventHandler = Rc::new(move |_| hits_seen.set(hits_seen.get() + 1));
        let f2: EventHandler = Rc::new(|_| {});

        host.attach_handler(&node, "click", &f1).unwrap();
        host.attach_handler(&node, "click", &f2).unwrap();
        host.detach_handler(&node, "click", &f2).unwrap();

        node.dispatch("click", &());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_empty_kind_is_invalid() {
        let mut host = TerminalHost::new();
        let err = host.create_node("", &Props::new()).unwrap_err();
        assert!(matches!(err, HostError::InvalidNodeType { .. }));
    }
}
