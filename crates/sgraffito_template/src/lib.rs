//! Template-region AST and a small tolerant parser.
//!
//! Component files carry an HTML-like template region next to the script
//! region. The lint engine only needs a structural view of that region:
//! elements, directives with their expression text, interpolations, and
//! the scope-introducing constructs (`v-for`, `v-slot`). This crate
//! provides exactly that view. Offsets in every span are byte offsets
//! into the template source that was handed to the parser.

mod ast;
mod parser;

pub use ast::{
    AttributeNode, CommentNode, DirectiveNode, ElementNode, ExpressionNode, ForParseResult,
    InterpolationNode, PropNode, RootNode, Span, TemplateChildNode, TextNode,
};
pub use parser::{extract_alias_names, parse_template, TemplateParseError};
