use compact_str::CompactString;
use oxc_ast::ast::{
    CallExpression, Expression, ObjectPropertyKind, PropertyKey, TSSignature, TSType,
};

use crate::origin::RefKind;

/// Compiler macros and reactivity wrapper calls the resolver treats as
/// origin producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    DefineProps,
    WithDefaults,
    DefineModel,
    Wrapper(RefKind),
}

static WRAPPER_CALLS: phf::Map<&'static str, RefKind> = phf::phf_map! {
    "ref" => RefKind::Plain,
    "computed" => RefKind::Computed,
    "toRef" => RefKind::Derived,
    "customRef" => RefKind::Custom,
    "shallowRef" => RefKind::Shallow,
};

/// Strip wrappers that never change what a value is: parentheses and
/// TypeScript assertion forms.
pub fn unwrap_expression<'a, 'b>(mut expr: &'b Expression<'a>) -> &'b Expression<'a> {
    loop {
        expr = match expr {
            Expression::ParenthesizedExpression(inner) => &inner.expression,
            Expression::TSAsExpression(inner) => &inner.expression,
            Expression::TSSatisfiesExpression(inner) => &inner.expression,
            Expression::TSNonNullExpression(inner) => &inner.expression,
            _ => return expr,
        };
    }
}

/// Classify a call expression as a macro or wrapper producer. Matching
/// is purely by callee name; shadowed or renamed imports are out of
/// reach for a single-file analysis.
pub fn recognize_macro(call: &CallExpression<'_>) -> Option<MacroKind> {
    let name = match unwrap_expression(&call.callee) {
        Expression::Identifier(id) => id.name.as_str(),
        _ => return None,
    };
    match name {
        "defineProps" => Some(MacroKind::DefineProps),
        "withDefaults" => Some(MacroKind::WithDefaults),
        "defineModel" => Some(MacroKind::DefineModel),
        _ => WRAPPER_CALLS.get(name).copied().map(MacroKind::Wrapper),
    }
}

/// When a call is `withDefaults(defineProps(...), ...)`, return the
/// inner `defineProps` call; otherwise the call itself.
pub fn through_with_defaults<'a, 'b>(call: &'b CallExpression<'a>) -> &'b CallExpression<'a> {
    if matches!(recognize_macro(call), Some(MacroKind::WithDefaults)) {
        if let Some(arg) = call.arguments.first() {
            if let Some(Expression::CallExpression(inner)) =
                arg.as_expression().map(unwrap_expression)
            {
                if matches!(recognize_macro(inner), Some(MacroKind::DefineProps)) {
                    return inner;
                }
            }
        }
    }
    call
}

/// Declared prop names pulled out of a `defineProps` call, plus a flag
/// for whether the declaration was fully understood. A `false` flag
/// means an entry could not be read (spread, computed key, unexpected
/// argument shape) and downstream consumers should treat the prop set
/// as open.
pub fn extract_prop_names(call: &CallExpression<'_>) -> (Vec<CompactString>, bool) {
    let call = through_with_defaults(call);
    let mut names = Vec::new();
    let mut complete = true;

    if let Some(type_args) = &call.type_arguments {
        for tp in &type_args.params {
            if let TSType::TSTypeLiteral(lit) = tp {
                for member in &lit.members {
                    match member {
                        TSSignature::TSPropertySignature(prop) => {
                            match property_key_name(&prop.key) {
                                Some(name) => names.push(name),
                                None => complete = false,
                            }
                        }
                        TSSignature::TSIndexSignature(_) => complete = false,
                        _ => {}
                    }
                }
            } else {
                // An interface reference or mapped type; the member
                // list is not visible from here.
                complete = false;
            }
        }
        return (names, complete);
    }

    match call.arguments.first() {
        Some(arg) => match arg.as_expression() {
            Some(expr) => {
                let (runtime_names, runtime_complete) = prop_names_from_expression(expr);
                names.extend(runtime_names);
                complete = runtime_complete;
            }
            None => complete = false,
        },
        None => {}
    }
    (names, complete)
}

/// Prop names from a runtime declaration value: a string-literal array
/// or an object whose keys name the props. Used both for `defineProps`
/// arguments and for a `props:` option on the options object.
pub fn prop_names_from_expression(expr: &Expression<'_>) -> (Vec<CompactString>, bool) {
    let mut names = Vec::new();
    let mut complete = true;
    match unwrap_expression(expr) {
        Expression::ArrayExpression(arr) => {
            for elem in &arr.elements {
                if let oxc_ast::ast::ArrayExpressionElement::StringLiteral(s) = elem {
                    names.push(CompactString::new(s.value.as_str()));
                } else {
                    complete = false;
                }
            }
        }
        Expression::ObjectExpression(obj) => {
            for prop in &obj.properties {
                match prop {
                    ObjectPropertyKind::ObjectProperty(p) => match property_key_name(&p.key) {
                        Some(name) => names.push(name),
                        None => complete = false,
                    },
                    ObjectPropertyKind::SpreadProperty(_) => complete = false,
                }
            }
        }
        _ => complete = false,
    }
    (names, complete)
}

pub fn property_key_name(key: &PropertyKey<'_>) -> Option<CompactString> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(CompactString::new(id.name.as_str())),
        PropertyKey::StringLiteral(s) => Some(CompactString::new(s.value.as_str())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn with_first_call(source: &str, check: impl FnOnce(&CallExpression<'_>)) {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path("test.ts").unwrap_or_default();
        let ret = Parser::new(&allocator, source, source_type).parse();
        assert!(!ret.panicked, "parse failed for {source}");
        let stmt = ret.program.body.first().expect("empty program");
        let call = match stmt {
            oxc_ast::ast::Statement::VariableDeclaration(decl) => {
                match decl.declarations[0].init.as_ref().map(unwrap_expression) {
                    Some(Expression::CallExpression(call)) => call,
                    other => panic!("expected call initializer, got {other:?}"),
                }
            }
            oxc_ast::ast::Statement::ExpressionStatement(stmt) => {
                match unwrap_expression(&stmt.expression) {
                    Expression::CallExpression(call) => call,
                    other => panic!("expected call, got {other:?}"),
                }
            }
            other => panic!("unexpected statement {other:?}"),
        };
        check(call);
    }

    #[test]
    fn recognizes_wrapper_calls_by_name() {
        with_first_call("const a = ref(0)", |call| {
            assert_eq!(
                recognize_macro(call),
                Some(MacroKind::Wrapper(RefKind::Plain))
            );
        });
        with_first_call("const a = shallowRef({})", |call| {
            assert_eq!(
                recognize_macro(call),
                Some(MacroKind::Wrapper(RefKind::Shallow))
            );
        });
        with_first_call("const a = reactive({})", |call| {
            assert_eq!(recognize_macro(call), None);
        });
        with_first_call("const a = notRef(0)", |call| {
            assert_eq!(recognize_macro(call), None);
        });
    }

    #[test]
    fn extracts_prop_names_from_array_argument() {
        with_first_call("const props = defineProps(['count', 'label'])", |call| {
            let (names, complete) = extract_prop_names(call);
            assert!(complete);
            assert_eq!(names, ["count", "label"]);
        });
    }

    #[test]
    fn extracts_prop_names_from_object_argument() {
        with_first_call(
            "const props = defineProps({ count: Number, 'kebab-label': String })",
            |call| {
                let (names, complete) = extract_prop_names(call);
                assert!(complete);
                assert_eq!(names, ["count", "kebab-label"]);
            },
        );
    }

    #[test]
    fn extracts_prop_names_from_type_argument() {
        with_first_call("const props = defineProps<{ count: number; label?: string }>()", |call| {
            let (names, complete) = extract_prop_names(call);
            assert!(complete);
            assert_eq!(names, ["count", "label"]);
        });
    }

    #[test]
    fn with_defaults_is_transparent() {
        with_first_call(
            "const props = withDefaults(defineProps<{ count: number }>(), { count: 1 })",
            |call| {
                let (names, complete) = extract_prop_names(call);
                assert!(complete);
                assert_eq!(names, ["count"]);
            },
        );
    }

    #[test]
    fn spread_in_object_argument_leaves_the_set_open() {
        with_first_call("const props = defineProps({ a: Number, ...rest })", |call| {
            let (names, complete) = extract_prop_names(call);
            assert!(!complete);
            assert_eq!(names, ["a"]);
        });
    }
}
