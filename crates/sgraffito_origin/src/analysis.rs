use std::cell::{Cell, RefCell};

use compact_str::CompactString;
use oxc_ast::ast::{ComputedMemberExpression, Expression, Program, StaticMemberExpression};
use oxc_span::Span;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::builder::Builder;
use crate::origin::Origin;
use crate::resolver::{classify_expression, literal_key, ResolveIdent};
use crate::scope::{Binding, BindingId, ScopeId, ScopeTree, WriteSite};
use crate::usage::UsageSite;

/// Soft condition hit while building or resolving. Notes never stop
/// the analysis; they surface as informational output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// A destructuring pattern nested past the supported depth; the
    /// bindings underneath resolve to `Unknown`.
    PatternDepthExceeded,
    /// A prop declaration the analysis could not fully read, leaving
    /// the declared prop set open.
    OpaquePropDeclaration,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalysisNote {
    pub kind: NoteKind,
    pub span: Span,
}

/// The analyzed script region: a scope tree, per-binding write sites,
/// declared props, and every usage site the rules care about.
/// Resolution is demand-driven and memoized per binding; results are
/// independent of query order because cycle-affected answers are never
/// cached.
pub struct ScriptAnalysis<'a> {
    pub(crate) scopes: ScopeTree,
    pub(crate) bindings: Vec<Binding<'a>>,
    pub(crate) props: Vec<CompactString>,
    pub(crate) props_complete: bool,
    pub(crate) usages: Vec<UsageSite<'a>>,
    pub(crate) notes: Vec<AnalysisNote>,
    memo: RefCell<FxHashMap<BindingId, Origin>>,
    in_flight: RefCell<FxHashSet<BindingId>>,
    cycle_seen: Cell<bool>,
}

impl<'a> ScriptAnalysis<'a> {
    /// Analyze a parsed program. `program` must outlive the analysis;
    /// spans refer to the source the program was parsed from.
    pub fn build(program: &'a Program<'a>) -> Self {
        let built = Builder::run(program);
        Self {
            scopes: built.scopes,
            bindings: built.bindings,
            props: built.props,
            props_complete: built.props_complete,
            usages: built.usages,
            notes: built.notes,
            memo: RefCell::new(FxHashMap::default()),
            in_flight: RefCell::new(FxHashSet::default()),
            cycle_seen: Cell::new(false),
        }
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn binding(&self, id: BindingId) -> &Binding<'a> {
        &self.bindings[id.index()]
    }

    /// Declared prop names, in declaration order.
    pub fn props(&self) -> &[CompactString] {
        &self.props
    }

    /// False when a prop declaration could not be fully read, meaning
    /// names outside [`props`](Self::props) may still be props.
    pub fn props_complete(&self) -> bool {
        self.props_complete
    }

    pub fn usages(&self) -> &[UsageSite<'a>] {
        &self.usages
    }

    pub fn notes(&self) -> &[AnalysisNote] {
        &self.notes
    }

    /// Origin of an arbitrary expression at its position in the script.
    pub fn resolve_expression(&self, expr: &Expression<'a>) -> Origin {
        classify_expression(self, expr)
    }

    /// Origin of a bare name as seen from the scope covering `offset`.
    pub fn resolve_name(&self, name: &str, offset: u32) -> Origin {
        self.resolve_ident(name, offset)
    }

    pub fn resolve_static_member(&self, member: &StaticMemberExpression<'a>) -> Origin {
        classify_expression(self, &member.object).member(Some(member.property.name.as_str()))
    }

    pub fn resolve_computed_member(&self, member: &ComputedMemberExpression<'a>) -> Origin {
        let key = literal_key(&member.expression);
        classify_expression(self, &member.object).member(key.as_deref())
    }

    /// Origin of a binding in the module scope, used by template-side
    /// resolution where there is no script position to anchor to.
    pub fn resolve_module_name(&self, name: &str) -> Option<Origin> {
        let id = self.scopes.lookup(ScopeId::MODULE, name)?;
        Some(self.resolve_binding(id))
    }

    /// Origin of a name from its declaration-time writes only, with
    /// later reassignments ignored. Mutation rules use this for plain
    /// assignment targets, where the assignment under inspection would
    /// otherwise wash out the origin being checked.
    pub fn resolve_name_declared(&self, name: &str, offset: u32) -> Origin {
        let scope = self.scopes.scope_at(offset);
        let Some(id) = self.scopes.lookup(scope, name) else {
            return Origin::Unknown;
        };
        let binding = &self.bindings[id.index()];
        let mut variants = Vec::new();
        for write in &binding.writes {
            match write {
                WriteSite::Init { expr, path } => variants.push(self.origin_of_init(expr, path)),
                WriteSite::Fixed(origin) => variants.push(origin.clone()),
                WriteSite::Assign { .. } => {}
            }
        }
        Origin::union_of(variants)
    }

    fn origin_of_init(&self, expr: &Expression<'a>, path: &crate::origin::AccessPath) -> Origin {
        let mut origin = classify_expression(self, expr);
        for seg in path {
            origin = match seg {
                crate::origin::PathSeg::Key(key) => origin.member(Some(key)),
                crate::origin::PathSeg::Wildcard => origin.member(None),
            };
        }
        origin
    }

    /// Reinterpret instance projections against the declared prop set:
    /// `this.count` is a prop access when `count` is declared, and
    /// `this.$props.x` is always one. Everything else passes through.
    pub fn canonicalize(&self, origin: Origin) -> Origin {
        match origin {
            Origin::SelfRef { path } => {
                if let Some(crate::origin::PathSeg::Key(first)) = path.first() {
                    if first == "$props" {
                        return Origin::Prop {
                            path: path.iter().skip(1).cloned().collect(),
                            wildcard: true,
                        };
                    }
                    if self.props.iter().any(|p| p == first) {
                        return Origin::Prop {
                            path,
                            wildcard: false,
                        };
                    }
                }
                Origin::SelfRef { path }
            }
            Origin::Union(variants) => {
                Origin::union_of(variants.into_iter().map(|o| self.canonicalize(o)).collect())
            }
            other => other,
        }
    }

    fn resolve_binding(&self, id: BindingId) -> Origin {
        if let Some(hit) = self.memo.borrow().get(&id) {
            return hit.clone();
        }
        if self.in_flight.borrow().contains(&id) {
            // Definition cycle; degrade rather than recurse.
            self.cycle_seen.set(true);
            return Origin::Unknown;
        }

        self.in_flight.borrow_mut().insert(id);
        let outer_cycle = self.cycle_seen.replace(false);

        let binding = &self.bindings[id.index()];
        let mut variants = Vec::with_capacity(binding.writes.len());
        for write in &binding.writes {
            let origin = match write {
                WriteSite::Init { expr, path } => self.origin_of_init(expr, path),
                WriteSite::Assign { expr } => classify_expression(self, expr),
                WriteSite::Fixed(origin) => origin.clone(),
            };
            variants.push(origin);
        }
        let origin = Origin::union_of(variants);

        self.in_flight.borrow_mut().remove(&id);
        let tainted = self.cycle_seen.get();
        if !tainted {
            self.memo.borrow_mut().insert(id, origin.clone());
        }
        self.cycle_seen.set(outer_cycle || tainted);
        origin
    }
}

impl ResolveIdent for ScriptAnalysis<'_> {
    fn resolve_ident(&self, name: &str, offset: u32) -> Origin {
        let scope = self.scopes.scope_at(offset);
        match self.scopes.lookup(scope, name) {
            Some(id) => self.resolve_binding(id),
            None => Origin::Unknown,
        }
    }
}
