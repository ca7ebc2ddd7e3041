use compact_str::CompactString;
use smallvec::SmallVec;
use thiserror::Error;

use crate::ast::{
    AttributeNode, CommentNode, DirectiveNode, ElementNode, ExpressionNode, ForParseResult,
    InterpolationNode, PropNode, RootNode, Span, TemplateChildNode, TextNode,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateParseError {
    #[error("element <{tag}> is never closed")]
    UnclosedElement { tag: CompactString, span: Span },
    #[error("expected </{expected}> but found </{found}>")]
    MismatchedClosingTag {
        expected: CompactString,
        found: CompactString,
        span: Span,
    },
    #[error("comment is never terminated")]
    UnterminatedComment { span: Span },
    #[error("interpolation is never terminated")]
    UnterminatedInterpolation { span: Span },
    #[error("malformed v-for expression")]
    InvalidVFor { span: Span },
}

impl TemplateParseError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnclosedElement { span, .. }
            | Self::MismatchedClosingTag { span, .. }
            | Self::UnterminatedComment { span }
            | Self::UnterminatedInterpolation { span }
            | Self::InvalidVFor { span } => *span,
        }
    }
}

/// Elements that never take a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose raw text content is skipped rather than parsed.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Parse template source into a tree. The parser is tolerant: it keeps
/// going past malformed markup, recording errors instead of bailing, so
/// the caller always gets a tree to walk.
pub fn parse_template(source: &str) -> (RootNode, Vec<TemplateParseError>) {
    let mut parser = Parser {
        src: source,
        pos: 0,
        errors: Vec::new(),
    };
    let children = parser.parse_children(None);
    let root = RootNode {
        children,
        span: Span::new(0, source.len() as u32),
    };
    (root, parser.errors)
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    errors: Vec<TemplateParseError>,
}

impl<'s> Parser<'s> {
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Parse children until EOF or until a closing tag for `parent` (or
    /// any closing tag, which the caller resolves) is reached.
    fn parse_children(&mut self, parent: Option<&str>) -> Vec<TemplateChildNode> {
        let mut children = Vec::new();
        while !self.eof() {
            if self.starts_with("</") {
                break;
            }
            if self.starts_with("<!--") {
                children.push(TemplateChildNode::Comment(self.parse_comment()));
            } else if self.starts_with("{{") {
                if let Some(interp) = self.parse_interpolation() {
                    children.push(TemplateChildNode::Interpolation(interp));
                }
            } else if self.starts_with("<") && self.tag_starts_at(self.pos + 1) {
                children.push(TemplateChildNode::Element(self.parse_element()));
            } else {
                if let Some(text) = self.parse_text() {
                    children.push(TemplateChildNode::Text(text));
                }
            }
        }
        let _ = parent;
        children
    }

    fn tag_starts_at(&self, pos: usize) -> bool {
        self.src
            .as_bytes()
            .get(pos)
            .is_some_and(|b| b.is_ascii_alphabetic())
    }

    fn parse_comment(&mut self) -> CommentNode {
        let start = self.pos;
        self.pos += 4; // <!--
        let content_start = self.pos;
        match self.rest().find("-->") {
            Some(off) => {
                let content_end = self.pos + off;
                self.pos = content_end + 3;
                CommentNode {
                    content: CompactString::new(&self.src[content_start..content_end]),
                    span: Span::new(start as u32, self.pos as u32),
                }
            }
            None => {
                let span = Span::new(start as u32, self.src.len() as u32);
                self.errors
                    .push(TemplateParseError::UnterminatedComment { span });
                self.pos = self.src.len();
                CommentNode {
                    content: CompactString::new(&self.src[content_start..]),
                    span,
                }
            }
        }
    }

    fn parse_interpolation(&mut self) -> Option<InterpolationNode> {
        let start = self.pos;
        self.pos += 2; // {{
        let Some(off) = self.rest().find("}}") else {
            self.errors.push(TemplateParseError::UnterminatedInterpolation {
                span: Span::new(start as u32, self.src.len() as u32),
            });
            self.pos = self.src.len();
            return None;
        };
        let inner_start = self.pos;
        let inner_end = self.pos + off;
        self.pos = inner_end + 2;

        let raw = &self.src[inner_start..inner_end];
        let trimmed = raw.trim();
        let lead = raw.len() - raw.trim_start().len();
        let expr_start = inner_start + lead;
        Some(InterpolationNode {
            expression: ExpressionNode {
                content: CompactString::new(trimmed),
                span: Span::new(expr_start as u32, (expr_start + trimmed.len()) as u32),
            },
            span: Span::new(start as u32, self.pos as u32),
        })
    }

    fn parse_text(&mut self) -> Option<TextNode> {
        let start = self.pos;
        while !self.eof() {
            if self.starts_with("{{") || self.starts_with("<!--") || self.starts_with("</") {
                break;
            }
            if self.starts_with("<") && self.tag_starts_at(self.pos + 1) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            // Stray byte that looks like markup but is not; consume it
            // so the loop cannot stall.
            self.pos += 1;
        }
        let content = &self.src[start..self.pos];
        if content.trim().is_empty() {
            return None;
        }
        Some(TextNode {
            content: CompactString::new(content),
            span: Span::new(start as u32, self.pos as u32),
        })
    }

    fn parse_element(&mut self) -> ElementNode {
        let start = self.pos;
        self.pos += 1; // <
        let tag_start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.')
        {
            self.pos += 1;
        }
        let tag = CompactString::new(&self.src[tag_start..self.pos]);

        let props = self.parse_attributes();

        let mut self_closing = false;
        if self.starts_with("/>") {
            self_closing = true;
            self.pos += 2;
        } else if self.peek() == Some(b'>') {
            self.pos += 1;
        }

        let is_void = VOID_TAGS.contains(&tag.as_str());
        if self_closing || is_void {
            return ElementNode {
                tag,
                props,
                children: Vec::new(),
                self_closing: self_closing || is_void,
                span: Span::new(start as u32, self.pos as u32),
            };
        }

        let children = if RAW_TEXT_TAGS.contains(&tag.as_str()) {
            self.skip_raw_text(&tag);
            Vec::new()
        } else {
            self.parse_children(Some(&tag))
        };

        // Closing tag.
        if self.starts_with("</") {
            let close_start = self.pos;
            self.pos += 2;
            let name_start = self.pos;
            while self
                .peek()
                .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.')
            {
                self.pos += 1;
            }
            let found = &self.src[name_start..self.pos];
            if self.peek() == Some(b'>') {
                self.pos += 1;
            }
            if !found.eq_ignore_ascii_case(&tag) {
                self.errors.push(TemplateParseError::MismatchedClosingTag {
                    expected: tag.clone(),
                    found: CompactString::new(found),
                    span: Span::new(close_start as u32, self.pos as u32),
                });
            }
        } else {
            self.errors.push(TemplateParseError::UnclosedElement {
                tag: tag.clone(),
                span: Span::new(start as u32, self.pos as u32),
            });
        }

        ElementNode {
            tag,
            props,
            children,
            self_closing: false,
            span: Span::new(start as u32, self.pos as u32),
        }
    }

    fn skip_raw_text(&mut self, tag: &str) {
        let close = format!("</{tag}");
        match self.rest().find(&close) {
            Some(off) => self.pos += off,
            None => self.pos = self.src.len(),
        }
    }

    fn parse_attributes(&mut self) -> Vec<PropNode> {
        let mut props = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(b'>') => break,
                Some(b'/') if self.starts_with("/>") => break,
                _ => {}
            }
            let attr_start = self.pos;
            let name_start = self.pos;
            while self.peek().is_some_and(|b| {
                !b.is_ascii_whitespace() && b != b'=' && b != b'>' && !(b == b'/' && self.starts_with("/>"))
            }) {
                self.pos += 1;
            }
            if self.pos == name_start {
                self.pos += 1;
                continue;
            }
            let raw_name = &self.src[name_start..self.pos];

            let mut value = None;
            self.skip_whitespace();
            if self.peek() == Some(b'=') {
                self.pos += 1;
                self.skip_whitespace();
                value = Some(self.parse_attribute_value());
            }
            let span = Span::new(attr_start as u32, self.pos as u32);
            props.push(self.classify_attribute(raw_name, value, span));
        }
        props
    }

    fn parse_attribute_value(&mut self) -> TextNode {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|b| b != quote) {
                    self.pos += 1;
                }
                let end = self.pos;
                if self.peek() == Some(quote) {
                    self.pos += 1;
                }
                TextNode {
                    content: CompactString::new(&self.src[start..end]),
                    span: Span::new(start as u32, end as u32),
                }
            }
            _ => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
                {
                    self.pos += 1;
                }
                TextNode {
                    content: CompactString::new(&self.src[start..self.pos]),
                    span: Span::new(start as u32, self.pos as u32),
                }
            }
        }
    }

    fn classify_attribute(
        &mut self,
        raw_name: &str,
        value: Option<TextNode>,
        span: Span,
    ) -> PropNode {
        let (name, after): (CompactString, &str) = if let Some(rest) = raw_name.strip_prefix("v-") {
            let split = rest
                .find([':', '.'])
                .map_or((rest, ""), |i| (&rest[..i], &rest[i..]));
            (CompactString::new(split.0), split.1)
        } else if let Some(rest) = raw_name.strip_prefix(':') {
            return self.build_directive(raw_name, "bind", &format!(":{rest}"), value, span);
        } else if raw_name.starts_with('@') {
            return self.build_directive(raw_name, "on", &raw_name.replacen('@', ":", 1), value, span);
        } else if raw_name.starts_with('#') {
            return self.build_directive(raw_name, "slot", &raw_name.replacen('#', ":", 1), value, span);
        } else {
            return PropNode::Attribute(AttributeNode {
                name: CompactString::new(raw_name),
                value,
                span,
            });
        };
        self.build_directive(raw_name, &name, after, value, span)
    }

    /// `arg_and_mods` is the leftover after the directive name, of the
    /// shape `[:arg][.mod]*`.
    fn build_directive(
        &mut self,
        raw_name: &str,
        name: &str,
        arg_and_mods: &str,
        value: Option<TextNode>,
        span: Span,
    ) -> PropNode {
        let mut arg = None;
        let mut rest = arg_and_mods;
        if let Some(stripped) = rest.strip_prefix(':') {
            let end = stripped.find('.').unwrap_or(stripped.len());
            arg = Some(CompactString::new(&stripped[..end]));
            rest = &stripped[end..];
        }
        let modifiers: SmallVec<[CompactString; 2]> = rest
            .split('.')
            .filter(|m| !m.is_empty())
            .map(CompactString::new)
            .collect();

        let expression = value.as_ref().map(|v| ExpressionNode {
            content: v.content.clone(),
            span: v.span,
        });

        let for_parse = if name == "for" {
            match expression.as_ref().and_then(parse_v_for) {
                Some(parsed) => Some(parsed),
                None => {
                    if expression.is_some() {
                        self.errors.push(TemplateParseError::InvalidVFor { span });
                    }
                    None
                }
            }
        } else {
            None
        };

        PropNode::Directive(DirectiveNode {
            name: CompactString::new(name),
            raw_name: CompactString::new(raw_name),
            arg,
            modifiers,
            expression,
            for_parse,
            span,
        })
    }
}

/// Split a `v-for` value into its alias list and source expression.
/// Accepts `alias in expr`, `(a, b) in expr` and destructuring alias
/// patterns; `of` works the same as `in`.
fn parse_v_for(expr: &ExpressionNode) -> Option<ForParseResult> {
    let text = expr.content.as_str();
    let sep = find_for_separator(text)?;
    let (lhs, kw_len) = sep;
    let rhs_start = lhs + kw_len;
    let lhs_text = text[..lhs].trim();
    let rhs_text = text[rhs_start..].trim();
    if lhs_text.is_empty() || rhs_text.is_empty() {
        return None;
    }

    let lhs_inner = lhs_text
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(lhs_text);
    let aliases = extract_alias_names(lhs_inner);
    if aliases.is_empty() {
        return None;
    }

    let rhs_lead = text[rhs_start..].len() - text[rhs_start..].trim_start().len();
    let source_start = expr.span.start + (rhs_start + rhs_lead) as u32;
    Some(ForParseResult {
        aliases,
        source: ExpressionNode {
            content: CompactString::new(rhs_text),
            span: Span::new(source_start, source_start + rhs_text.len() as u32),
        },
    })
}

/// Locate the top-level ` in ` / ` of ` keyword, skipping any that sit
/// inside brackets of a destructuring alias.
fn find_for_separator(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b' ' if depth == 0 => {
                let rest = &text[i..];
                if rest.starts_with(" in ") {
                    return Some((i, 4));
                }
                if rest.starts_with(" of ") {
                    return Some((i, 4));
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Collect the identifiers bound by an alias pattern. Handles flat
/// names, object and array destructuring, renames (`{ a: b }` binds
/// `b`), rest elements, and default values (the initializer expression
/// contributes nothing).
pub fn extract_alias_names(pattern: &str) -> SmallVec<[CompactString; 4]> {
    let mut names = SmallVec::new();
    let bytes = pattern.as_bytes();
    let mut i = 0;
    let mut depth = 0i32;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'{' || b == b'[' || b == b'(' {
            depth += 1;
            i += 1;
        } else if b == b'}' || b == b']' || b == b')' {
            depth -= 1;
            i += 1;
        } else if b.is_ascii_alphabetic() || b == b'_' || b == b'$' {
            let start = i;
            while i < bytes.len()
                && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$')
            {
                i += 1;
            }
            let ident = &pattern[start..i];
            let mut j = i;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            match bytes.get(j) {
                // A key in `{ key: value }`; only the value side binds.
                Some(b':') => {}
                // A default initializer; skip the expression until the
                // next separator at this depth.
                Some(b'=') => {
                    names.push(CompactString::new(ident));
                    i = skip_initializer(bytes, j + 1, depth);
                    continue;
                }
                _ => names.push(CompactString::new(ident)),
            }
        } else {
            i += 1;
        }
    }
    names
}

fn skip_initializer(bytes: &[u8], mut i: usize, base_depth: i32) -> usize {
    let mut depth = base_depth;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => {
                if depth == base_depth {
                    return i;
                }
                depth -= 1;
            }
            b',' if depth == base_depth => return i,
            _ => {}
        }
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(root: &RootNode) -> &ElementNode {
        root.children
            .iter()
            .find_map(|c| match c {
                TemplateChildNode::Element(el) => Some(el),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn parses_nested_elements_and_text() {
        let (root, errors) = parse_template("<div><span>hi</span></div>");
        assert!(errors.is_empty());
        let div = first_element(&root);
        assert_eq!(div.tag, "div");
        assert_eq!(div.children.len(), 1);
    }

    #[test]
    fn parses_interpolation_span() {
        let src = "<p>{{ count }}</p>";
        let (root, errors) = parse_template(src);
        assert!(errors.is_empty());
        let p = first_element(&root);
        let interp = match &p.children[0] {
            TemplateChildNode::Interpolation(i) => i,
            other => panic!("expected interpolation, got {other:?}"),
        };
        assert_eq!(interp.expression.content, "count");
        let span = interp.expression.span;
        assert_eq!(&src[span.start as usize..span.end as usize], "count");
    }

    #[test]
    fn normalizes_directive_shorthand() {
        let (root, _) = parse_template("<input :value='x' @input.stop='y' #default='z'>");
        let input = first_element(&root);
        let dirs: Vec<_> = input.directives().collect();
        assert_eq!(dirs[0].name, "bind");
        assert_eq!(dirs[0].arg.as_deref(), Some("value"));
        assert_eq!(dirs[1].name, "on");
        assert_eq!(dirs[1].arg.as_deref(), Some("input"));
        assert_eq!(dirs[1].modifiers[0], "stop");
        assert_eq!(dirs[2].name, "slot");
        assert_eq!(dirs[2].arg.as_deref(), Some("default"));
    }

    #[test]
    fn parses_v_for_with_tuple_aliases() {
        let (root, errors) = parse_template("<li v-for=\"(item, i) in items\">{{ item }}</li>");
        assert!(errors.is_empty());
        let li = first_element(&root);
        let v_for = li.directive("for").unwrap();
        let parsed = v_for.for_parse.as_ref().unwrap();
        assert_eq!(parsed.aliases.as_slice(), ["item", "i"]);
        assert_eq!(parsed.source.content, "items");
    }

    #[test]
    fn parses_v_for_with_destructured_alias() {
        let (root, _) = parse_template("<li v-for=\"{ id, label: text } in rows\"></li>");
        let li = first_element(&root);
        let parsed = li.directive("for").unwrap().for_parse.as_ref().unwrap();
        assert_eq!(parsed.aliases.as_slice(), ["id", "text"]);
    }

    #[test]
    fn alias_default_initializer_binds_only_the_name() {
        let names = extract_alias_names("{ a = makeDefault(b), c }");
        assert_eq!(names.as_slice(), ["a", "c"]);
    }

    #[test]
    fn recovers_from_mismatched_closing_tag() {
        let (root, errors) = parse_template("<div><p>text</div>");
        assert!(!errors.is_empty());
        assert_eq!(first_element(&root).tag, "div");
    }

    #[test]
    fn void_elements_take_no_children() {
        let (root, errors) = parse_template("<div><br><input type='text'></div>");
        assert!(errors.is_empty());
        let div = first_element(&root);
        assert_eq!(div.children.len(), 2);
    }

    #[test]
    fn unterminated_interpolation_is_reported() {
        let (_, errors) = parse_template("<p>{{ count</p>");
        assert!(matches!(
            errors[0],
            TemplateParseError::UnterminatedInterpolation { .. }
        ));
    }
}
