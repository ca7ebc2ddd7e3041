use compact_str::CompactString;
use oxc_ast::ast::Expression;
use oxc_span::Span;
use rustc_hash::FxHashMap;

use crate::origin::{AccessPath, Origin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const MODULE: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(pub u32);

impl BindingId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
}

/// One recorded way a binding receives a value. A binding accumulates
/// these as the builder walks the script; the resolver later unions
/// their origins.
#[derive(Debug, Clone)]
pub enum WriteSite<'a> {
    /// Declaration initializer, possibly reached through a
    /// destructuring path into the initializer value.
    Init {
        expr: &'a Expression<'a>,
        path: AccessPath,
    },
    /// Plain reassignment, `name = expr`.
    Assign { expr: &'a Expression<'a> },
    /// An origin known without looking at any expression, such as a
    /// macro result or an import.
    Fixed(Origin),
}

#[derive(Debug)]
pub struct Binding<'a> {
    pub name: CompactString,
    pub scope: ScopeId,
    /// Span of the declaring identifier.
    pub span: Span,
    pub writes: Vec<WriteSite<'a>>,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub span: Span,
    bindings: FxHashMap<CompactString, BindingId>,
}

/// Arena of lexical scopes with parent links. Lookup walks outward
/// from an inner scope; position lookup picks the innermost scope whose
/// span covers a byte offset.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new(module_span: Span) -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Module,
                parent: None,
                span: module_span,
                bindings: FxHashMap::default(),
            }],
        }
    }

    pub fn push(&mut self, kind: ScopeKind, span: Span, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            span,
            bindings: FxHashMap::default(),
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn declare(&mut self, scope: ScopeId, name: &str, binding: BindingId) {
        self.scopes[scope.index()]
            .bindings
            .insert(CompactString::new(name), binding);
    }

    /// Resolve `name` starting at `scope`, walking parent scopes.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.get(id);
            if let Some(binding) = scope.bindings.get(name) {
                return Some(*binding);
            }
            current = scope.parent;
        }
        None
    }

    /// Binding declared directly in `scope`, ignoring parents.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        self.get(scope).bindings.get(name).copied()
    }

    /// Innermost scope whose span contains `offset`.
    pub fn scope_at(&self, offset: u32) -> ScopeId {
        let mut best = ScopeId::MODULE;
        let mut best_len = u32::MAX;
        for (i, scope) in self.scopes.iter().enumerate() {
            if scope.span.start <= offset && offset < scope.span.end {
                let len = scope.span.end - scope.span.start;
                if len < best_len {
                    best = ScopeId(i as u32);
                    best_len = len;
                }
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parent_scopes_and_respects_shadowing() {
        let mut tree = ScopeTree::new(Span::new(0, 100));
        let inner = tree.push(ScopeKind::Function, Span::new(10, 60), ScopeId::MODULE);
        tree.declare(ScopeId::MODULE, "count", BindingId(0));
        tree.declare(inner, "count", BindingId(1));
        tree.declare(ScopeId::MODULE, "other", BindingId(2));

        assert_eq!(tree.lookup(inner, "count"), Some(BindingId(1)));
        assert_eq!(tree.lookup(ScopeId::MODULE, "count"), Some(BindingId(0)));
        assert_eq!(tree.lookup(inner, "other"), Some(BindingId(2)));
        assert_eq!(tree.lookup(inner, "missing"), None);
    }

    #[test]
    fn scope_at_picks_the_innermost_span() {
        let mut tree = ScopeTree::new(Span::new(0, 100));
        let outer = tree.push(ScopeKind::Function, Span::new(10, 90), ScopeId::MODULE);
        let inner = tree.push(ScopeKind::Block, Span::new(20, 40), outer);

        assert_eq!(tree.scope_at(5), ScopeId::MODULE);
        assert_eq!(tree.scope_at(15), outer);
        assert_eq!(tree.scope_at(25), inner);
        assert_eq!(tree.scope_at(95), ScopeId::MODULE);
    }
}
