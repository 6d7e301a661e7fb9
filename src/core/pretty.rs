//! Pretty printers for JSON and XML text
//!
//! Both printers return the input unchanged when it does not parse.

use super::line_wrapper::LINE_SEP;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const XML_INDENT: &str = "  ";

/// Re-indent JSON text with two spaces, keeping key order
///
/// Text whose first non-blank character is neither `{` nor `[` is returned
/// as-is.
pub fn format_json(text: &str) -> String {
    for c in text.chars() {
        if c == '{' || c == '[' {
            return serde_json::from_str::<serde_json::Value>(text)
                .ok()
                .and_then(|value| serde_json::to_string_pretty(&value).ok())
                .unwrap_or_else(|| text.to_string());
        } else if !c.is_whitespace() {
            return text.to_string();
        }
    }
    text.to_string()
}

/// Re-indent XML text with two spaces
///
/// A declaration is added when missing and is always followed by a line
/// break.
pub fn format_xml(text: &str) -> String {
    match XmlDocument::parse(text) {
        Some(document) => document.render(),
        None => text.to_string(),
    }
}

#[derive(Debug)]
enum XmlNode {
    Element {
        name: String,
        open: String,
        children: Vec<XmlNode>,
    },
    Text(String),
    /// Comments, CDATA sections and processing instructions, kept verbatim
    Raw(String),
}

#[derive(Debug)]
struct XmlDocument {
    declaration: Option<String>,
    prolog: Vec<String>,
    root: XmlNode,
    epilog: Vec<String>,
}

impl XmlDocument {
    fn parse(text: &str) -> Option<Self> {
        let mut parser = XmlParser {
            src: text.trim(),
            pos: 0,
        };

        parser.skip_whitespace();
        let declaration = if parser.starts_with("<?xml") {
            Some(parser.take_until("?>")?.to_string())
        } else {
            None
        };

        let mut prolog = Vec::new();
        loop {
            parser.skip_whitespace();
            if parser.starts_with("<!--") {
                prolog.push(parser.take_until("-->")?.to_string());
            } else if parser.starts_with("<?") {
                prolog.push(parser.take_until("?>")?.to_string());
            } else if parser.starts_with("<!DOCTYPE") {
                prolog.push(parser.take_tag()?.to_string());
            } else {
                break;
            }
        }

        if !parser.starts_with("<") {
            return None;
        }
        let root = parser.parse_element()?;

        let mut epilog = Vec::new();
        loop {
            parser.skip_whitespace();
            if parser.at_end() {
                break;
            } else if parser.starts_with("<!--") {
                epilog.push(parser.take_until("-->")?.to_string());
            } else if parser.starts_with("<?") {
                epilog.push(parser.take_until("?>")?.to_string());
            } else {
                return None;
            }
        }

        Some(Self {
            declaration,
            prolog,
            root,
            epilog,
        })
    }

    fn render(&self) -> String {
        let mut lines = Vec::new();
        lines.extend(self.prolog.iter().cloned());
        write_node(&self.root, 0, &mut lines);
        lines.extend(self.epilog.iter().cloned());

        let declaration = self.declaration.as_deref().unwrap_or(XML_DECLARATION);
        let composed = format!("{}{}", declaration, lines.join(LINE_SEP));
        match composed.find('>') {
            Some(index) => format!("{}{}{}", &composed[..=index], LINE_SEP, &composed[index + 1..]),
            None => composed,
        }
    }
}

fn write_node(node: &XmlNode, depth: usize, lines: &mut Vec<String>) {
    let indent = XML_INDENT.repeat(depth);
    match node {
        XmlNode::Element {
            name,
            open,
            children,
        } => match children.as_slice() {
            [] => lines.push(format!("{}<{}/>", indent, open)),
            [XmlNode::Text(text)] => {
                lines.push(format!("{}<{}>{}</{}>", indent, open, text, name))
            }
            _ => {
                lines.push(format!("{}<{}>", indent, open));
                for child in children {
                    write_node(child, depth + 1, lines);
                }
                lines.push(format!("{}</{}>", indent, name));
            }
        },
        XmlNode::Text(text) | XmlNode::Raw(text) => lines.push(format!("{}{}", indent, text)),
    }
}

struct XmlParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> XmlParser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume through the first occurrence of `end`
    fn take_until(&mut self, end: &str) -> Option<&'a str> {
        let rest = self.rest();
        let index = rest.find(end)? + end.len();
        self.pos += index;
        Some(&rest[..index])
    }

    /// Consume a `<...>` tag, honouring quoted attribute values
    fn take_tag(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let mut quote: Option<char> = None;
        for (i, c) in rest.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"') | (None, '\'') => quote = Some(c),
                (None, '>') => {
                    self.pos += i + 1;
                    return Some(&rest[..=i]);
                }
                (None, '<') if i > 0 => return None,
                _ => {}
            }
        }
        None
    }

    fn parse_element(&mut self) -> Option<XmlNode> {
        let tag = self.take_tag()?;
        let inner = &tag[1..tag.len() - 1];
        if let Some(open) = inner.strip_suffix('/') {
            let open = open.trim_end();
            return Some(XmlNode::Element {
                name: element_name(open)?,
                open: open.to_string(),
                children: Vec::new(),
            });
        }

        let name = element_name(inner)?;
        let mut children = Vec::new();
        loop {
            if self.at_end() {
                return None;
            }
            if self.starts_with("</") {
                let close = self.take_tag()?;
                if close[2..close.len() - 1].trim() != name {
                    return None;
                }
                break;
            } else if self.starts_with("<!--") {
                children.push(XmlNode::Raw(self.take_until("-->")?.to_string()));
            } else if self.starts_with("<![CDATA[") {
                children.push(XmlNode::Raw(self.take_until("]]>")?.to_string()));
            } else if self.starts_with("<?") {
                children.push(XmlNode::Raw(self.take_until("?>")?.to_string()));
            } else if self.starts_with("<") {
                children.push(self.parse_element()?);
            } else {
                let rest = self.rest();
                let end = rest.find('<').unwrap_or(rest.len());
                let text = rest[..end].trim();
                if !text.is_empty() {
                    children.push(XmlNode::Text(text.to_string()));
                }
                self.pos += end;
            }
        }

        Some(XmlNode::Element {
            name,
            open: inner.to_string(),
            children,
        })
    }
}

fn element_name(open: &str) -> Option<String> {
    let name: String = open
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/')
        .collect();
    let first = name.chars().next()?;
    if first.is_alphabetic() || first == '_' || first == ':' {
        Some(name)
    } else {
        None
    }
}
