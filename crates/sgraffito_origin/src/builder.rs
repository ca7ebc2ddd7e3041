use compact_str::CompactString;
use oxc_ast::ast::{
    Argument, ArrowFunctionExpression, AssignmentOperator, AssignmentTarget, BindingPattern,
    CallExpression, ChainElement, Declaration, Expression, Function,
    ObjectExpression, ObjectPropertyKind, Program, SimpleAssignmentTarget, Statement,
    UnaryOperator, VariableDeclaration, VariableDeclarator,
};
use oxc_span::{GetSpan, Span};

use crate::analysis::{AnalysisNote, NoteKind};
use crate::macros::{
    extract_prop_names, property_key_name, prop_names_from_expression, recognize_macro,
    unwrap_expression, MacroKind,
};
use crate::origin::{AccessPath, Origin, PathSeg, RefKind};
use crate::scope::{Binding, BindingId, ScopeId, ScopeKind, ScopeTree, WriteSite};
use crate::usage::{UsageNode, UsageRole, UsageSite};

/// Destructuring patterns deeper than this resolve to `Unknown`.
pub const MAX_PATTERN_DEPTH: u32 = 16;

pub(crate) struct Built<'a> {
    pub scopes: ScopeTree,
    pub bindings: Vec<Binding<'a>>,
    pub props: Vec<CompactString>,
    pub props_complete: bool,
    pub usages: Vec<UsageSite<'a>>,
    pub notes: Vec<AnalysisNote>,
}

/// Single pass over the program that builds the scope tree, records
/// write sites against bindings, collects prop declarations, and
/// gathers usage sites.
pub(crate) struct Builder<'a> {
    scopes: ScopeTree,
    bindings: Vec<Binding<'a>>,
    props: Vec<CompactString>,
    props_complete: bool,
    usages: Vec<UsageSite<'a>>,
    notes: Vec<AnalysisNote>,
    current: ScopeId,
}

impl<'a> Builder<'a> {
    pub fn run(program: &'a Program<'a>) -> Built<'a> {
        let mut builder = Builder {
            scopes: ScopeTree::new(program.span),
            bindings: Vec::new(),
            props: Vec::new(),
            props_complete: true,
            usages: Vec::new(),
            notes: Vec::new(),
            current: ScopeId::MODULE,
        };
        for stmt in &program.body {
            builder.walk_statement(stmt);
        }
        Built {
            scopes: builder.scopes,
            bindings: builder.bindings,
            props: builder.props,
            props_complete: builder.props_complete,
            usages: builder.usages,
            notes: builder.notes,
        }
    }

    fn declare(&mut self, name: &str, span: Span, writes: Vec<WriteSite<'a>>) {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding {
            name: CompactString::new(name),
            scope: self.current,
            span,
            writes,
        });
        self.scopes.declare(self.current, name, id);
    }

    fn enter(&mut self, kind: ScopeKind, span: Span) -> ScopeId {
        let previous = self.current;
        self.current = self.scopes.push(kind, span, previous);
        previous
    }

    fn record(&mut self, node: UsageNode<'a>, role: UsageRole) {
        self.usages.push(UsageSite { node, role });
    }

    fn note(&mut self, kind: NoteKind, span: Span) {
        self.notes.push(AnalysisNote { kind, span });
    }

    // ---- statements ----

    fn walk_statement(&mut self, stmt: &'a Statement<'a>) {
        match stmt {
            Statement::VariableDeclaration(decl) => self.walk_variable_declaration(decl),
            Statement::ExpressionStatement(expr_stmt) => {
                self.walk_expression(&expr_stmt.expression);
            }
            Statement::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    self.declare(
                        id.name.as_str(),
                        id.span,
                        vec![WriteSite::Fixed(Origin::Opaque)],
                    );
                }
                self.walk_function(func, false);
            }
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    self.declare(
                        id.name.as_str(),
                        id.span,
                        vec![WriteSite::Fixed(Origin::Opaque)],
                    );
                }
            }
            Statement::BlockStatement(block) => {
                let prev = self.enter(ScopeKind::Block, block.span);
                for stmt in &block.body {
                    self.walk_statement(stmt);
                }
                self.current = prev;
            }
            Statement::IfStatement(if_stmt) => {
                self.record_condition(&if_stmt.test);
                self.walk_expression(&if_stmt.test);
                self.walk_statement(&if_stmt.consequent);
                if let Some(alt) = &if_stmt.alternate {
                    self.walk_statement(alt);
                }
            }
            Statement::WhileStatement(while_stmt) => {
                self.record_condition(&while_stmt.test);
                self.walk_expression(&while_stmt.test);
                self.walk_statement(&while_stmt.body);
            }
            Statement::DoWhileStatement(do_while) => {
                self.record_condition(&do_while.test);
                self.walk_statement(&do_while.body);
                self.walk_expression(&do_while.test);
            }
            Statement::ForStatement(for_stmt) => {
                let prev = self.enter(ScopeKind::Block, for_stmt.span);
                if let Some(init) = &for_stmt.init {
                    match init {
                        oxc_ast::ast::ForStatementInit::VariableDeclaration(decl) => {
                            self.walk_variable_declaration(decl);
                        }
                        _ => {
                            if let Some(expr) = init.as_expression() {
                                self.walk_expression(expr);
                            }
                        }
                    }
                }
                if let Some(test) = &for_stmt.test {
                    self.record_condition(test);
                    self.walk_expression(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.walk_expression(update);
                }
                self.walk_statement(&for_stmt.body);
                self.current = prev;
            }
            Statement::ForInStatement(for_in) => {
                let prev = self.enter(ScopeKind::Block, for_in.span);
                if let oxc_ast::ast::ForStatementLeft::VariableDeclaration(decl) = &for_in.left {
                    for declarator in &decl.declarations {
                        self.bind_fixed(&declarator.id, Origin::Unknown, 0);
                    }
                }
                self.walk_expression(&for_in.right);
                self.walk_statement(&for_in.body);
                self.current = prev;
            }
            Statement::ForOfStatement(for_of) => {
                let prev = self.enter(ScopeKind::Block, for_of.span);
                if let oxc_ast::ast::ForStatementLeft::VariableDeclaration(decl) = &for_of.left {
                    for declarator in &decl.declarations {
                        self.bind_fixed(&declarator.id, Origin::Unknown, 0);
                    }
                }
                self.walk_expression(&for_of.right);
                self.walk_statement(&for_of.body);
                self.current = prev;
            }
            Statement::ReturnStatement(ret) => {
                if let Some(arg) = &ret.argument {
                    self.walk_expression(arg);
                }
            }
            Statement::SwitchStatement(switch_stmt) => {
                self.walk_expression(&switch_stmt.discriminant);
                let prev = self.enter(ScopeKind::Block, switch_stmt.span);
                for case in &switch_stmt.cases {
                    if let Some(test) = &case.test {
                        self.walk_expression(test);
                    }
                    for stmt in &case.consequent {
                        self.walk_statement(stmt);
                    }
                }
                self.current = prev;
            }
            Statement::TryStatement(try_stmt) => {
                let prev = self.enter(ScopeKind::Block, try_stmt.block.span);
                for stmt in &try_stmt.block.body {
                    self.walk_statement(stmt);
                }
                self.current = prev;
                if let Some(handler) = &try_stmt.handler {
                    let prev = self.enter(ScopeKind::Block, handler.span);
                    if let Some(param) = &handler.param {
                        self.bind_fixed(&param.pattern, Origin::Unknown, 0);
                    }
                    for stmt in &handler.body.body {
                        self.walk_statement(stmt);
                    }
                    self.current = prev;
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    let prev = self.enter(ScopeKind::Block, finalizer.span);
                    for stmt in &finalizer.body {
                        self.walk_statement(stmt);
                    }
                    self.current = prev;
                }
            }
            Statement::ThrowStatement(throw_stmt) => {
                self.walk_expression(&throw_stmt.argument);
            }
            Statement::LabeledStatement(labeled) => {
                self.walk_statement(&labeled.body);
            }
            Statement::ImportDeclaration(import) => {
                if let Some(specifiers) = &import.specifiers {
                    for spec in specifiers {
                        use oxc_ast::ast::ImportDeclarationSpecifier::*;
                        let local = match spec {
                            ImportSpecifier(s) => &s.local,
                            ImportDefaultSpecifier(s) => &s.local,
                            ImportNamespaceSpecifier(s) => &s.local,
                        };
                        self.declare(
                            local.name.as_str(),
                            local.span,
                            vec![WriteSite::Fixed(Origin::Opaque)],
                        );
                    }
                }
            }
            Statement::ExportDefaultDeclaration(export) => {
                use oxc_ast::ast::ExportDefaultDeclarationKind;
                match &export.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                        self.walk_function(func, false);
                    }
                    ExportDefaultDeclarationKind::ClassDeclaration(_) => {}
                    other => {
                        if let Some(expr) = other.as_expression() {
                            match unwrap_expression(expr) {
                                Expression::ObjectExpression(obj) => {
                                    self.walk_options_object(obj);
                                }
                                _ => self.walk_expression(expr),
                            }
                        }
                    }
                }
            }
            Statement::ExportNamedDeclaration(export) => {
                if let Some(decl) = &export.declaration {
                    match decl {
                        Declaration::VariableDeclaration(var_decl) => {
                            self.walk_variable_declaration(var_decl);
                        }
                        Declaration::FunctionDeclaration(func) => {
                            if let Some(id) = &func.id {
                                self.declare(
                                    id.name.as_str(),
                                    id.span,
                                    vec![WriteSite::Fixed(Origin::Opaque)],
                                );
                            }
                            self.walk_function(func, false);
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn walk_variable_declaration(&mut self, decl: &'a VariableDeclaration<'a>) {
        for declarator in &decl.declarations {
            self.bind_declarator(declarator);
        }
    }

    fn bind_declarator(&mut self, declarator: &'a VariableDeclarator<'a>) {
        let init = declarator.init.as_ref();
        if let Some(init_expr) = init {
            self.walk_expression(init_expr);

            // `const [model, meta] = defineModel()` binds the wrapper
            // to the first element and the modifier bag to the second.
            if let Expression::CallExpression(call) = unwrap_expression(init_expr) {
                if matches!(recognize_macro(call), Some(MacroKind::DefineModel)) {
                    if let BindingPattern::ArrayPattern(arr) = &declarator.id {
                        let seeds = [
                            Origin::Ref {
                                kind: RefKind::Model,
                            },
                            Origin::Opaque,
                        ];
                        for (element, seed) in arr.elements.iter().zip(seeds) {
                            if let Some(pattern) = element {
                                self.bind_fixed(pattern, seed, 0);
                            }
                        }
                        return;
                    }
                }
            }
        }
        self.bind_pattern(&declarator.id, init, AccessPath::new(), 0);
    }

    // ---- binding patterns ----

    /// Bind every name in `pattern`, recording an `Init` write site
    /// that remembers the destructuring path into the initializer.
    fn bind_pattern(
        &mut self,
        pattern: &'a BindingPattern<'a>,
        init: Option<&'a Expression<'a>>,
        path: AccessPath,
        depth: u32,
    ) {
        if depth == MAX_PATTERN_DEPTH + 1 {
            self.note(NoteKind::PatternDepthExceeded, pattern.span());
        }
        let overflow = depth > MAX_PATTERN_DEPTH;

        match pattern {
            BindingPattern::BindingIdentifier(id) => {
                let writes = match init {
                    Some(expr) if !overflow => vec![WriteSite::Init {
                        expr,
                        path: path.clone(),
                    }],
                    Some(_) => vec![WriteSite::Fixed(Origin::Unknown)],
                    None => Vec::new(),
                };
                self.declare(id.name.as_str(), id.span, writes);
            }
            BindingPattern::ObjectPattern(obj) => {
                for property in &obj.properties {
                    let mut child_path = path.clone();
                    match property_key_name(&property.key) {
                        Some(key) => child_path.push(PathSeg::Key(key)),
                        None => child_path.push(PathSeg::Wildcard),
                    }
                    self.bind_pattern(&property.value, init, child_path, depth + 1);
                }
                if let Some(rest) = &obj.rest {
                    self.bind_pattern(&rest.argument, init, path, depth + 1);
                }
            }
            BindingPattern::ArrayPattern(arr) => {
                for (index, element) in arr.elements.iter().enumerate() {
                    if let Some(element) = element {
                        let mut child_path = path.clone();
                        child_path.push(PathSeg::Key(CompactString::new(index.to_string())));
                        self.bind_pattern(element, init, child_path, depth + 1);
                    }
                }
                if let Some(rest) = &arr.rest {
                    self.bind_pattern(&rest.argument, init, path, depth + 1);
                }
            }
            BindingPattern::AssignmentPattern(assignment) => {
                // The default initializer never changes what the bound
                // value is when present, so it contributes no origin.
                self.walk_expression(&assignment.right);
                self.bind_pattern(&assignment.left, init, path, depth + 1);
            }
        }
    }

    /// Bind every name in `pattern` to projections of a known origin.
    /// Used for parameters and macro-seeded destructures, where there
    /// is no initializer expression to defer to.
    fn bind_fixed(&mut self, pattern: &'a BindingPattern<'a>, base: Origin, depth: u32) {
        if depth == MAX_PATTERN_DEPTH + 1 {
            self.note(NoteKind::PatternDepthExceeded, pattern.span());
        }
        let base = if depth > MAX_PATTERN_DEPTH {
            Origin::Unknown
        } else {
            base
        };

        match pattern {
            BindingPattern::BindingIdentifier(id) => {
                self.declare(id.name.as_str(), id.span, vec![WriteSite::Fixed(base)]);
            }
            BindingPattern::ObjectPattern(obj) => {
                for property in &obj.properties {
                    let child = match property_key_name(&property.key) {
                        Some(key) => base.clone().member(Some(&key)),
                        None => base.clone().member(None),
                    };
                    self.bind_fixed(&property.value, child, depth + 1);
                }
                if let Some(rest) = &obj.rest {
                    self.bind_fixed(&rest.argument, base, depth + 1);
                }
            }
            BindingPattern::ArrayPattern(arr) => {
                for (index, element) in arr.elements.iter().enumerate() {
                    if let Some(element) = element {
                        let child = base.clone().member(Some(&index.to_string()));
                        self.bind_fixed(element, child, depth + 1);
                    }
                }
                if let Some(rest) = &arr.rest {
                    self.bind_fixed(&rest.argument, base, depth + 1);
                }
            }
            BindingPattern::AssignmentPattern(assignment) => {
                self.walk_expression(&assignment.right);
                self.bind_fixed(&assignment.left, base, depth + 1);
            }
        }
    }

    // ---- functions and the options object ----

    fn walk_function(&mut self, func: &'a Function<'a>, is_setup: bool) {
        let prev = self.enter(ScopeKind::Function, func.span);
        for (index, param) in func.params.items.iter().enumerate() {
            let base = if is_setup && index == 0 {
                Origin::prop_root()
            } else {
                Origin::Unknown
            };
            self.bind_fixed(&param.pattern, base, 0);
        }
        if let Some(body) = &func.body {
            for stmt in &body.statements {
                self.walk_statement(stmt);
            }
        }
        self.current = prev;
    }

    fn walk_arrow(&mut self, arrow: &'a ArrowFunctionExpression<'a>, is_setup: bool) {
        let prev = self.enter(ScopeKind::Function, arrow.span);
        for (index, param) in arrow.params.items.iter().enumerate() {
            let base = if is_setup && index == 0 {
                Origin::prop_root()
            } else {
                Origin::Unknown
            };
            self.bind_fixed(&param.pattern, base, 0);
        }
        if arrow.expression {
            if let Some(Statement::ExpressionStatement(expr_stmt)) = arrow.body.statements.first() {
                self.walk_expression(&expr_stmt.expression);
            }
        } else {
            for stmt in &arrow.body.statements {
                self.walk_statement(stmt);
            }
        }
        self.current = prev;
    }

    /// The default-exported options object. The `setup` method's first
    /// parameter is the props object; a `props` option declares prop
    /// names.
    fn walk_options_object(&mut self, obj: &'a ObjectExpression<'a>) {
        for prop in &obj.properties {
            match prop {
                ObjectPropertyKind::ObjectProperty(p) => {
                    let key = property_key_name(&p.key);
                    match key.as_deref() {
                        Some("setup") => match &p.value {
                            Expression::FunctionExpression(func) => {
                                self.walk_function(func, true);
                            }
                            Expression::ArrowFunctionExpression(arrow) => {
                                self.walk_arrow(arrow, true);
                            }
                            other => self.walk_expression(other),
                        },
                        Some("props") => {
                            let (names, complete) = prop_names_from_expression(&p.value);
                            if !complete {
                                self.props_complete = false;
                                self.note(NoteKind::OpaquePropDeclaration, p.value.span());
                            }
                            self.props.extend(names);
                            self.walk_expression(&p.value);
                        }
                        _ => self.walk_expression(&p.value),
                    }
                }
                ObjectPropertyKind::SpreadProperty(spread) => {
                    self.walk_expression(&spread.argument);
                }
            }
        }
    }

    // ---- expressions ----

    fn record_condition(&mut self, test: &'a Expression<'a>) {
        if let Expression::Identifier(id) = unwrap_expression(test) {
            self.record(
                UsageNode::Ident {
                    name: id.name.as_str(),
                    span: id.span,
                },
                UsageRole::ConditionTest,
            );
        }
    }

    fn record_ident(&mut self, expr: &'a Expression<'a>, role: UsageRole) {
        if let Expression::Identifier(id) = unwrap_expression(expr) {
            self.record(
                UsageNode::Ident {
                    name: id.name.as_str(),
                    span: id.span,
                },
                role,
            );
        }
    }

    fn walk_expression(&mut self, expr: &'a Expression<'a>) {
        match expr {
            Expression::ArrowFunctionExpression(arrow) => self.walk_arrow(arrow, false),
            Expression::FunctionExpression(func) => self.walk_function(func, false),

            Expression::CallExpression(call) => self.walk_call(call),
            Expression::ChainExpression(chain) => match &chain.expression {
                ChainElement::CallExpression(call) => self.walk_call(call),
                ChainElement::StaticMemberExpression(member) => {
                    self.record(UsageNode::StaticMember(member), UsageRole::MemberAccess);
                    self.walk_expression(&member.object);
                }
                ChainElement::ComputedMemberExpression(member) => {
                    self.walk_expression(&member.object);
                    self.walk_expression(&member.expression);
                }
                ChainElement::TSNonNullExpression(inner) => {
                    self.walk_expression(&inner.expression);
                }
                ChainElement::PrivateFieldExpression(field) => {
                    self.walk_expression(&field.object);
                }
            },

            Expression::StaticMemberExpression(member) => {
                self.record(UsageNode::StaticMember(member), UsageRole::MemberAccess);
                self.walk_expression(&member.object);
            }
            Expression::ComputedMemberExpression(member) => {
                self.walk_expression(&member.object);
                self.walk_expression(&member.expression);
            }

            Expression::UpdateExpression(update) => {
                match &update.argument {
                    SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                        self.record(
                            UsageNode::Ident {
                                name: id.name.as_str(),
                                span: id.span,
                            },
                            UsageRole::UpdateOperand,
                        );
                    }
                    SimpleAssignmentTarget::StaticMemberExpression(member) => {
                        self.record(UsageNode::StaticMember(member), UsageRole::UpdateOperand);
                        self.walk_expression(&member.object);
                    }
                    SimpleAssignmentTarget::ComputedMemberExpression(member) => {
                        self.record(UsageNode::ComputedMember(member), UsageRole::UpdateOperand);
                        self.walk_expression(&member.object);
                        self.walk_expression(&member.expression);
                    }
                    _ => {}
                }
            }
            Expression::UnaryExpression(unary) => {
                if unary.operator == UnaryOperator::Delete {
                    match unwrap_expression(&unary.argument) {
                        Expression::StaticMemberExpression(member) => {
                            self.record(UsageNode::StaticMember(member), UsageRole::DeleteOperand);
                        }
                        Expression::ComputedMemberExpression(member) => {
                            self.record(
                                UsageNode::ComputedMember(member),
                                UsageRole::DeleteOperand,
                            );
                        }
                        Expression::ChainExpression(chain) => match &chain.expression {
                            ChainElement::StaticMemberExpression(member) => {
                                self.record(
                                    UsageNode::StaticMember(member),
                                    UsageRole::DeleteOperand,
                                );
                            }
                            ChainElement::ComputedMemberExpression(member) => {
                                self.record(
                                    UsageNode::ComputedMember(member),
                                    UsageRole::DeleteOperand,
                                );
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                } else {
                    self.record_ident(&unary.argument, UsageRole::UnaryOperand);
                }
                self.walk_expression(&unary.argument);
            }
            Expression::BinaryExpression(binary) => {
                self.record_ident(&binary.left, UsageRole::BinaryOperand);
                self.record_ident(&binary.right, UsageRole::BinaryOperand);
                self.walk_expression(&binary.left);
                self.walk_expression(&binary.right);
            }
            Expression::LogicalExpression(logical) => {
                self.record_ident(&logical.left, UsageRole::BinaryOperand);
                self.record_ident(&logical.right, UsageRole::BinaryOperand);
                self.walk_expression(&logical.left);
                self.walk_expression(&logical.right);
            }
            Expression::ConditionalExpression(cond) => {
                self.record_condition(&cond.test);
                self.walk_expression(&cond.test);
                self.walk_expression(&cond.consequent);
                self.walk_expression(&cond.alternate);
            }

            Expression::AssignmentExpression(assign) => {
                let role = if assign.operator == AssignmentOperator::Assign {
                    UsageRole::WriteTarget
                } else {
                    UsageRole::CompoundWriteTarget
                };
                match &assign.left {
                    AssignmentTarget::AssignmentTargetIdentifier(id) => {
                        self.record(
                            UsageNode::Ident {
                                name: id.name.as_str(),
                                span: id.span,
                            },
                            role,
                        );
                        if assign.operator == AssignmentOperator::Assign {
                            if let Some(binding) =
                                self.scopes.lookup(self.current, id.name.as_str())
                            {
                                self.bindings[binding.index()].writes.push(WriteSite::Assign {
                                    expr: &assign.right,
                                });
                            }
                        }
                    }
                    AssignmentTarget::StaticMemberExpression(member) => {
                        self.record(UsageNode::StaticMember(member), role);
                        self.walk_expression(&member.object);
                    }
                    AssignmentTarget::ComputedMemberExpression(member) => {
                        self.record(UsageNode::ComputedMember(member), role);
                        self.walk_expression(&member.object);
                        self.walk_expression(&member.expression);
                    }
                    _ => {}
                }
                // A compound assignment reads its right side the way a
                // binary expression reads an operand.
                if assign.operator != AssignmentOperator::Assign {
                    self.record_ident(&assign.right, UsageRole::BinaryOperand);
                }
                self.walk_expression(&assign.right);
            }

            Expression::ArrayExpression(arr) => {
                for element in &arr.elements {
                    match element {
                        oxc_ast::ast::ArrayExpressionElement::SpreadElement(spread) => {
                            self.walk_expression(&spread.argument);
                        }
                        oxc_ast::ast::ArrayExpressionElement::Elision(_) => {}
                        _ => {
                            if let Some(expr) = element.as_expression() {
                                self.walk_expression(expr);
                            }
                        }
                    }
                }
            }
            Expression::ObjectExpression(obj) => {
                for prop in &obj.properties {
                    match prop {
                        ObjectPropertyKind::ObjectProperty(p) => {
                            self.walk_expression(&p.value);
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            self.walk_expression(&spread.argument);
                        }
                    }
                }
            }

            Expression::TemplateLiteral(template) => {
                for expr in &template.expressions {
                    self.walk_expression(expr);
                }
            }
            Expression::TaggedTemplateExpression(tagged) => {
                self.walk_expression(&tagged.tag);
                for expr in &tagged.quasi.expressions {
                    self.walk_expression(expr);
                }
            }

            Expression::NewExpression(new_expr) => {
                self.walk_expression(&new_expr.callee);
                for arg in &new_expr.arguments {
                    match arg {
                        Argument::SpreadElement(spread) => self.walk_expression(&spread.argument),
                        _ => {
                            if let Some(expr) = arg.as_expression() {
                                self.walk_expression(expr);
                            }
                        }
                    }
                }
            }
            Expression::AwaitExpression(await_expr) => {
                self.walk_expression(&await_expr.argument);
            }
            Expression::SequenceExpression(seq) => {
                for expr in &seq.expressions {
                    self.walk_expression(expr);
                }
            }

            Expression::ParenthesizedExpression(paren) => {
                self.walk_expression(&paren.expression);
            }
            Expression::TSAsExpression(ts_as) => self.walk_expression(&ts_as.expression),
            Expression::TSSatisfiesExpression(sat) => self.walk_expression(&sat.expression),
            Expression::TSNonNullExpression(non_null) => {
                self.walk_expression(&non_null.expression);
            }

            _ => {}
        }
    }

    fn walk_call(&mut self, call: &'a CallExpression<'a>) {
        self.record(UsageNode::Call(call), UsageRole::Call);

        if matches!(
            recognize_macro(call),
            Some(MacroKind::DefineProps | MacroKind::WithDefaults)
        ) {
            let (names, complete) = extract_prop_names(call);
            if !complete {
                self.props_complete = false;
                self.note(NoteKind::OpaquePropDeclaration, call.span);
            }
            self.props.extend(names);
        }

        self.walk_expression(&call.callee);
        for arg in &call.arguments {
            match arg {
                Argument::SpreadElement(spread) => self.walk_expression(&spread.argument),
                _ => {
                    if let Some(expr) = arg.as_expression() {
                        self.walk_expression(expr);
                    }
                }
            }
        }
    }
}
