use compact_str::CompactString;
use serde::Serialize;
use smallvec::SmallVec;

/// Byte range into the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone)]
pub struct RootNode {
    pub children: Vec<TemplateChildNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TemplateChildNode {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
    Interpolation(InterpolationNode),
}

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: CompactString,
    pub props: Vec<PropNode>,
    pub children: Vec<TemplateChildNode>,
    pub self_closing: bool,
    pub span: Span,
}

impl ElementNode {
    /// First directive on the element with the given normalized name.
    pub fn directive(&self, name: &str) -> Option<&DirectiveNode> {
        self.props.iter().find_map(|p| match p {
            PropNode::Directive(d) if d.name == name => Some(d),
            _ => None,
        })
    }

    pub fn directives(&self) -> impl Iterator<Item = &DirectiveNode> {
        self.props.iter().filter_map(|p| match p {
            PropNode::Directive(d) => Some(d),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum PropNode {
    Attribute(AttributeNode),
    Directive(DirectiveNode),
}

/// Plain (static) attribute, `name` or `name="value"`.
#[derive(Debug, Clone)]
pub struct AttributeNode {
    pub name: CompactString,
    pub value: Option<TextNode>,
    pub span: Span,
}

/// Directive attribute. `name` is the normalized directive name without
/// the `v-` prefix, so `:foo` carries `name: "bind"` with `arg:
/// Some("foo")` and `@click.stop` carries `name: "on"`, `arg:
/// Some("click")`, `modifiers: ["stop"]`.
#[derive(Debug, Clone)]
pub struct DirectiveNode {
    pub name: CompactString,
    pub raw_name: CompactString,
    pub arg: Option<CompactString>,
    pub modifiers: SmallVec<[CompactString; 2]>,
    pub expression: Option<ExpressionNode>,
    /// Present only on `v-for`, holding the parsed alias list and the
    /// iterated expression.
    pub for_parse: Option<ForParseResult>,
    pub span: Span,
}

/// Raw expression text from a directive value or interpolation body.
/// The span covers the text itself, not the surrounding quotes or
/// mustaches.
#[derive(Debug, Clone)]
pub struct ExpressionNode {
    pub content: CompactString,
    pub span: Span,
}

/// Parsed form of a `v-for` value: `"(item, index) in items"` yields
/// `aliases: ["item", "index"]` and `source` covering `items`.
/// Destructuring aliases contribute each bound name.
#[derive(Debug, Clone)]
pub struct ForParseResult {
    pub aliases: SmallVec<[CompactString; 4]>,
    pub source: ExpressionNode,
}

#[derive(Debug, Clone)]
pub struct TextNode {
    pub content: CompactString,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CommentNode {
    pub content: CompactString,
    pub span: Span,
}

/// `{{ expr }}` body.
#[derive(Debug, Clone)]
pub struct InterpolationNode {
    pub expression: ExpressionNode,
    pub span: Span,
}
