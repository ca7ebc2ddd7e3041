//! Scope analysis and value-origin resolution for the script region of
//! a component file, plus the bridge that lets template expressions
//! resolve against script results.
//!
//! The central question answered here is "where did this value come
//! from": a reactive wrapper call, the component's props, the instance
//! itself, or somewhere the analysis cannot see. Resolution is
//! demand-driven over recorded write sites, so a binding written from
//! several places resolves to a union of the origins of those writes.

mod analysis;
mod bridge;
mod builder;
pub mod macros;
mod origin;
mod resolver;
mod scope;
mod usage;

pub use analysis::{AnalysisNote, NoteKind, ScriptAnalysis};
pub use bridge::{
    resolve_template_ast, resolve_template_expression, template_instance_members,
    template_write_targets, TemplateFrame, TemplateScopeStack, TemplateWrite, MUTATING_METHODS,
};
pub use builder::MAX_PATTERN_DEPTH;
pub use origin::{render_path, AccessPath, Origin, PathSeg, RefKind};
pub use scope::{Binding, BindingId, Scope, ScopeId, ScopeKind, ScopeTree, WriteSite};
pub use usage::{UsageNode, UsageRole, UsageSite};

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn analyzed(source: &str, check: impl FnOnce(&ScriptAnalysis<'_>, &str)) {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path("test.ts").unwrap_or_default();
        let ret = Parser::new(&allocator, source, source_type).parse();
        assert!(!ret.panicked, "parse failed: {source}");
        let analysis = ScriptAnalysis::build(&ret.program);
        check(&analysis, source);
    }

    fn offset_of(source: &str, needle: &str) -> u32 {
        source.find(needle).expect("needle not found") as u32
    }

    #[test]
    fn wrapper_call_produces_a_ref_origin() {
        analyzed("const count = ref(0)\ncount;", |analysis, source| {
            let at = offset_of(source, "count;");
            let origin = analysis.resolve_name("count", at);
            assert!(origin.may_be_ref());
            assert_eq!(origin.ref_kind(), Some(RefKind::Plain));
        });
    }

    #[test]
    fn alias_copies_the_origin() {
        analyzed(
            "const count = computed(() => 1)\nconst alias = count\nalias;",
            |analysis, source| {
                let at = offset_of(source, "alias;");
                let origin = analysis.resolve_name("alias", at);
                assert_eq!(origin.ref_kind(), Some(RefKind::Computed));
            },
        );
    }

    #[test]
    fn reassignment_unions_origins() {
        analyzed(
            "let count = ref(0)\ncount = 20\ncount;",
            |analysis, source| {
                let at = offset_of(source, "count;");
                let origin = analysis.resolve_name("count", at);
                assert!(origin.may_be_ref());
                assert!(matches!(origin, Origin::Union(_)));
            },
        );
    }

    #[test]
    fn shadowing_resolves_to_the_inner_binding() {
        analyzed(
            "const count = ref(0)\nfunction inner() { const count = 1; return count }\ncount;",
            |analysis, source| {
                let inner_at = offset_of(source, "return count") as u32 + 7;
                assert_eq!(analysis.resolve_name("count", inner_at), Origin::Literal);

                let outer_at = offset_of(source, "count;");
                assert!(analysis.resolve_name("count", outer_at).may_be_ref());
            },
        );
    }

    #[test]
    fn destructured_props_project_paths() {
        analyzed(
            "const { user, label: text } = defineProps(['user', 'label'])\nuser;",
            |analysis, source| {
                let at = offset_of(source, "user;");
                let origin = analysis.resolve_name("user", at);
                assert!(origin.is_definitely_prop());
                let (path, _) = origin.as_prop().unwrap();
                assert_eq!(render_path(path, "props"), "user");

                let origin = analysis.resolve_name("text", at);
                let (path, _) = origin.as_prop().unwrap();
                assert_eq!(render_path(path, "props"), "label");
            },
        );
    }

    #[test]
    fn define_model_array_destructure_binds_a_ref() {
        analyzed(
            "const [model, modifiers] = defineModel('value')\nmodel;",
            |analysis, source| {
                let at = offset_of(source, "model;");
                let origin = analysis.resolve_name("model", at);
                assert_eq!(origin.ref_kind(), Some(RefKind::Model));
                assert!(!analysis.resolve_name("modifiers", at).may_be_ref());
            },
        );
    }

    #[test]
    fn definition_cycles_degrade_to_unknown() {
        analyzed("let a = b\nlet b = a\na;", |analysis, source| {
            let at = offset_of(source, "a;");
            assert_eq!(analysis.resolve_name("a", at), Origin::Unknown);
            assert_eq!(analysis.resolve_name("b", at), Origin::Unknown);
        });
    }

    #[test]
    fn resolution_is_query_order_independent() {
        let source = "let a = b\nlet b = ref(0)\na; b;";
        let forward = {
            let allocator = Allocator::default();
            let st = SourceType::from_path("test.ts").unwrap_or_default();
            let ret = Parser::new(&allocator, source, st).parse();
            let analysis = ScriptAnalysis::build(&ret.program);
            let at = source.find("a; b;").unwrap() as u32;
            (
                analysis.resolve_name("a", at),
                analysis.resolve_name("b", at),
            )
        };
        let backward = {
            let allocator = Allocator::default();
            let st = SourceType::from_path("test.ts").unwrap_or_default();
            let ret = Parser::new(&allocator, source, st).parse();
            let analysis = ScriptAnalysis::build(&ret.program);
            let at = source.find("a; b;").unwrap() as u32;
            let b = analysis.resolve_name("b", at);
            let a = analysis.resolve_name("a", at);
            (a, b)
        };
        assert_eq!(forward, backward);
    }

    #[test]
    fn setup_first_parameter_is_the_props_object() {
        analyzed(
            "export default { props: ['value'], setup(props) { return props.value } }",
            |analysis, source| {
                assert_eq!(analysis.props(), ["value"]);
                let at = offset_of(source, "props.value");
                let origin = analysis.resolve_name("props", at);
                assert!(origin.is_definitely_prop());
            },
        );
    }

    #[test]
    fn instance_members_canonicalize_to_props() {
        analyzed(
            "export default { props: ['count'], methods: { go() { this.count } } }",
            |analysis, _| {
                let origin = analysis.canonicalize(Origin::self_root().member(Some("count")));
                assert!(origin.is_definitely_prop());

                let origin = analysis.canonicalize(Origin::self_root().member(Some("other")));
                assert!(!origin.is_definitely_prop());

                let origin = analysis
                    .canonicalize(Origin::self_root().member(Some("$props")).member(Some("x")));
                assert!(origin.is_definitely_prop());
            },
        );
    }

    #[test]
    fn deep_patterns_note_and_degrade() {
        let mut source = String::from("const ");
        for _ in 0..20 {
            source.push_str("{ a: ");
        }
        source.push('x');
        for _ in 0..20 {
            source.push_str(" }");
        }
        source.push_str(" = defineProps(['a'])\nx;");
        analyzed(&source, |analysis, source| {
            assert!(analysis
                .notes()
                .iter()
                .any(|n| n.kind == NoteKind::PatternDepthExceeded));
            let at = offset_of(source, "x;");
            assert_eq!(analysis.resolve_name("x", at), Origin::Unknown);
        });
    }

    #[test]
    fn optional_chaining_resolves_through_members() {
        analyzed(
            "const props = defineProps(['user'])\nprops?.user;",
            |analysis, source| {
                let at = offset_of(source, "props?.user");
                let origin = analysis.resolve_name("props", at);
                assert!(origin.is_definitely_prop());
            },
        );
    }

    #[test]
    fn unknown_calls_are_opaque() {
        analyzed("const x = somethingElse(1)\nx;", |analysis, source| {
            let at = offset_of(source, "x;");
            let origin = analysis.resolve_name("x", at);
            assert_eq!(origin, Origin::Opaque);
            assert!(!origin.may_be_ref());
            assert!(!origin.is_definitely_prop());
        });
    }
}
