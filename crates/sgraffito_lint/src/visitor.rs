//! Template traversal driving the rule hooks.

use compact_str::CompactString;
use sgraffito_template::{
    extract_alias_names, ElementNode, PropNode, RootNode, TemplateChildNode,
};
use sgraffito_origin::TemplateFrame;

use crate::context::LintContext;
use crate::rule::Rule;

pub struct LintVisitor<'c, 'a> {
    ctx: &'c mut LintContext<'a>,
    rules: &'c [Box<dyn Rule>],
}

impl<'c, 'a> LintVisitor<'c, 'a> {
    pub fn new(ctx: &'c mut LintContext<'a>, rules: &'c [Box<dyn Rule>]) -> Self {
        Self { ctx, rules }
    }

    pub fn visit_root(&mut self, root: &RootNode) {
        for child in &root.children {
            self.visit_child(child);
        }
    }

    fn visit_child(&mut self, child: &TemplateChildNode) {
        match child {
            TemplateChildNode::Element(element) => self.visit_element(element),
            TemplateChildNode::Interpolation(interpolation) => {
                for rule in self.rules {
                    rule.check_interpolation(&mut *self.ctx, interpolation);
                }
            }
            TemplateChildNode::Text(_) | TemplateChildNode::Comment(_) => {}
        }
    }

    fn visit_element(&mut self, element: &ElementNode) {
        let locals = element_locals(element);
        let pushed = !locals.is_empty();
        if pushed {
            self.ctx.push_frame(TemplateFrame::from_names(locals));
        }

        for prop in &element.props {
            if let PropNode::Directive(directive) = prop {
                for rule in self.rules {
                    rule.check_directive(&mut *self.ctx, element, directive);
                }
            }
        }
        for child in &element.children {
            self.visit_child(child);
        }

        if pushed {
            self.ctx.pop_frame();
        }
    }
}

/// Names a template element introduces for its subtree: `v-for`
/// aliases and `v-slot` slot-prop bindings.
fn element_locals(element: &ElementNode) -> Vec<CompactString> {
    let mut locals = Vec::new();
    for directive in element.directives() {
        match directive.name.as_str() {
            "for" => {
                if let Some(parsed) = &directive.for_parse {
                    locals.extend(parsed.aliases.iter().cloned());
                }
            }
            "slot" => {
                if let Some(exp) = &directive.expression {
                    locals.extend(extract_alias_names(&exp.content));
                }
            }
            _ => {}
        }
    }
    locals
}
