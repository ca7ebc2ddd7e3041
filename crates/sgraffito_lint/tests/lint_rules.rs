//! End-to-end rule tests over whole component files.
//!
//! Each case lints a full file through `Linter::lint_sfc` so region
//! extraction, script analysis, and template resolution are all in
//! play.

use sgraffito_lint::{LintResult, Linter};

fn lint(source: &str) -> LintResult {
    Linter::new().lint_sfc(source, "test.vue")
}

fn rule_count(result: &LintResult, rule: &str) -> usize {
    result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.rule_name == rule)
        .count()
}

fn messages_for<'r>(result: &'r LintResult, rule: &str) -> Vec<&'r str> {
    result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.rule_name == rule)
        .map(|diagnostic| diagnostic.message.as_str())
        .collect()
}

// =============================================================================
// ref-needs-value
// =============================================================================

mod ref_needs_value {
    use super::*;

    #[test]
    fn increment_of_wrapper_is_flagged_and_fixed() {
        let source = "<script setup>\nimport { ref } from 'vue'\nlet count = ref(0)\ncount++\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "ref-needs-value"),
            vec!["Must use `.value` to read or write the value wrapped by `ref()`."]
        );
        let diagnostic = result
            .diagnostics
            .iter()
            .find(|d| d.rule_name == "ref-needs-value")
            .unwrap();
        let fixed = diagnostic.fix.as_ref().unwrap().apply(source);
        assert!(fixed.contains("count.value++"));
        // The fix must not introduce a new finding of the same kind.
        let relint = lint(&fixed);
        assert_eq!(rule_count(&relint, "ref-needs-value"), 0);
    }

    #[test]
    fn assignment_in_a_branch_unions_into_the_origin() {
        let source = "<script setup>\nimport { ref } from 'vue'\nlet foo = undefined\nif (flag) { foo = ref(5) }\nfoo++\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "ref-needs-value"), 1);
    }

    #[test]
    fn condition_position_is_flagged() {
        let source = "<script setup>\nimport { ref } from 'vue'\nconst ready = ref(false)\nif (ready) { run() }\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "ref-needs-value"), 1);
    }

    #[test]
    fn message_names_the_producer() {
        let source = "<script setup>\nimport { computed } from 'vue'\nconst total = computed(() => 1)\nconst twice = total * 2\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "ref-needs-value"),
            vec!["Must use `.value` to read or write the value wrapped by `computed()`."]
        );
    }

    #[test]
    fn value_access_is_clean() {
        let source = "<script setup>\nimport { ref } from 'vue'\nconst count = ref(0)\ncount.value++\nconst twice = count.value * 2\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "ref-needs-value"), 0);
    }

    #[test]
    fn logical_operands_are_flagged() {
        let source = "<script setup>\nimport { ref } from 'vue'\nconst count = ref(0)\nvar a = count || other\nvar b = count && fallback\n</script>\n";
        let result = lint(source);
        // The wrapper object is always truthy, so using it directly in
        // `||` or `&&` is a bug.
        assert_eq!(rule_count(&result, "ref-needs-value"), 2);
    }

    #[test]
    fn compound_assignment_reads_the_right_side() {
        let source = "<script setup>\nimport { ref } from 'vue'\nconst count = ref(0)\nlet total = 0\ntotal += count\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "ref-needs-value"),
            vec!["Must use `.value` to read or write the value wrapped by `ref()`."]
        );
    }

    #[test]
    fn reassigned_binding_keeps_its_wrapper_past() {
        let source = "<script setup>\nimport { ref } from 'vue'\nlet count = ref(0)\ncount = 20\ncount += 1\n</script>\n";
        let result = lint(source);
        // The plain reassignment itself is fine; the compound write
        // still sees the wrapper among the binding's origins.
        assert_eq!(rule_count(&result, "ref-needs-value"), 1);
    }

    #[test]
    fn template_interpolation_auto_unwraps() {
        let source = "<script setup>\nimport { ref } from 'vue'\nconst count = ref(0)\n</script>\n<template>\n  <span>{{ count }}</span>\n</template>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "ref-needs-value"), 0);
    }
}

// =============================================================================
// no-prop-mutation
// =============================================================================

mod no_prop_mutation {
    use super::*;

    #[test]
    fn direct_assignment_to_prop_member() {
        let source =
            "<script setup>\nconst props = defineProps(['count'])\nprops.count = 5\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-prop-mutation"),
            vec!["Unexpected mutation of \"count\" prop."]
        );
    }

    #[test]
    fn mutating_method_on_prop() {
        let source = "<script setup>\nconst props = defineProps(['items'])\nprops.items.push('new')\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-prop-mutation"),
            vec!["Unexpected mutation of \"items\" prop."]
        );
    }

    #[test]
    fn mutating_a_copy_is_clean() {
        let source = "<script setup>\nconst props = defineProps(['items'])\nconst copy = props.items.slice(0)\ncopy.push('new')\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-prop-mutation"), 0);
    }

    #[test]
    fn destructured_prop_update() {
        let source =
            "<script setup>\nconst { count } = defineProps(['count'])\ncount++\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-prop-mutation"),
            vec!["Unexpected mutation of \"count\" prop."]
        );
    }

    #[test]
    fn rest_destructured_aggregate_accepts_any_key() {
        let source = "<script setup>\nconst { a, ...rest } = defineProps(['a', 'b'])\nrest.x = 1\n</script>\n";
        let result = lint(source);
        // Wildcard acceptance: `x` was never declared, the rest
        // aggregate still counts as props.
        assert_eq!(
            messages_for(&result, "no-prop-mutation"),
            vec!["Unexpected mutation of \"x\" prop."]
        );
    }

    #[test]
    fn aliased_prop_object_is_still_caught() {
        let source =
            "<script setup>\nconst props = defineProps(['count'])\nconst p = props\np.count = 1\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-prop-mutation"), 1);
    }

    #[test]
    fn v_model_on_prop() {
        let source = "<script setup>\nconst props = defineProps(['count'])\n</script>\n<template>\n  <input v-model=\"count\" />\n</template>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-prop-mutation"),
            vec!["Unexpected mutation of \"count\" prop."]
        );
    }

    #[test]
    fn v_for_alias_shadows_prop() {
        let source = "<script setup>\nconst props = defineProps(['count'])\n</script>\n<template>\n  <div v-for=\"count in list\">\n    <input v-model=\"count\" />\n  </div>\n</template>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-prop-mutation"), 0);
    }

    #[test]
    fn handler_assignment_in_template() {
        let source = "<script setup>\nconst props = defineProps(['count'])\n</script>\n<template>\n  <button @click=\"count = 1\" />\n</template>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-prop-mutation"), 1);
    }

    #[test]
    fn updates_and_mutating_calls_in_any_directive() {
        let source = "<script setup>\nconst props = defineProps(['loading', 'items'])\n</script>\n<template>\n  <div v-if=\"loading++\" />\n  <div v-text=\"items.shift()\" />\n</template>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-prop-mutation"),
            vec![
                "Unexpected mutation of \"loading\" prop.",
                "Unexpected mutation of \"items\" prop.",
            ]
        );
    }

    #[test]
    fn interpolation_update_is_flagged() {
        let source = "<script setup>\nconst props = defineProps(['count'])\n</script>\n<template>\n  <span>{{ count++ }}</span>\n</template>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-prop-mutation"), 1);
    }

    #[test]
    fn computed_key_writes_keep_the_root_prop_name() {
        let source = "<script setup>\nconst props = defineProps(['items'])\nconst { items } = props\nitems[idx] = 'x'\nprops[key] = []\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-prop-mutation"),
            vec![
                "Unexpected mutation of \"items\" prop.",
                "Unexpected mutation of \"[computed key]\" prop.",
            ]
        );
    }

    #[test]
    fn options_object_setup_param() {
        let source = "<script>\nexport default {\n  props: ['count'],\n  setup(props) {\n    props.count = 2\n  },\n}\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-prop-mutation"), 1);
    }
}

// =============================================================================
// no-deprecated-instance-members
// =============================================================================

mod no_deprecated_instance_members {
    use super::*;

    #[test]
    fn scoped_slots_read_is_flagged_with_fix() {
        let source = "<script>\nexport default {\n  render() {\n    return this.$scopedSlots.default()\n  },\n}\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-deprecated-instance-members"),
            vec!["The `$scopedSlots` is deprecated."]
        );
        let diagnostic = result
            .diagnostics
            .iter()
            .find(|d| d.rule_name == "no-deprecated-instance-members")
            .unwrap();
        let fixed = diagnostic.fix.as_ref().unwrap().apply(source);
        assert!(fixed.contains("this.$slots.default()"));
    }

    #[test]
    fn events_api_is_flagged_without_fix() {
        let source = "<script>\nexport default {\n  mounted() {\n    this.$on('refresh', reload)\n  },\n}\n</script>\n";
        let result = lint(source);
        let diagnostic = result
            .diagnostics
            .iter()
            .find(|d| d.rule_name == "no-deprecated-instance-members")
            .unwrap();
        assert!(!diagnostic.has_fix());
    }

    #[test]
    fn other_objects_are_not_instances() {
        let source =
            "<script>\nexport default {\n  render() {\n    return emitter.$on('x', f)\n  },\n}\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-deprecated-instance-members"), 0);
    }

    #[test]
    fn template_listeners_reference() {
        let source = "<template>\n  <child v-bind=\"$listeners\" />\n</template>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-deprecated-instance-members"),
            vec!["The `$listeners` is deprecated."]
        );
        assert_eq!(result.warning_count, 1);
    }
}

// =============================================================================
// no-multiple-slot-args
// =============================================================================

mod no_multiple_slot_args {
    use super::*;

    #[test]
    fn two_arguments_are_flagged() {
        let source = "<script>\nexport default {\n  render() {\n    return this.$scopedSlots.default(foo, bar)\n  },\n}\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-multiple-slot-args"),
            vec!["Unexpected multiple arguments."]
        );
    }

    #[test]
    fn single_scope_object_is_clean() {
        let source = "<script>\nexport default {\n  render() {\n    return this.$scopedSlots.default({ foo, bar })\n  },\n}\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-multiple-slot-args"), 0);
    }

    #[test]
    fn aliased_slot_function_with_spread() {
        let source = "<script>\nexport default {\n  render() {\n    const children = this.$slots.default\n    return children(...foo)\n  },\n}\n</script>\n";
        let result = lint(source);
        assert_eq!(
            messages_for(&result, "no-multiple-slot-args"),
            vec!["Unexpected spread argument."]
        );
    }

    #[test]
    fn unknown_receiver_is_clean() {
        let source = "<script>\nexport default {\n  render() {\n    return unknown.$scopedSlots.default(foo, bar)\n  },\n}\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-multiple-slot-args"), 0);
    }

    #[test]
    fn optional_chain_through_an_alias() {
        let source = "<script>\nexport default {\n  render() {\n    const vm = this\n    return vm?.$scopedSlots?.default?.(foo, bar)\n  },\n}\n</script>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-multiple-slot-args"), 1);
    }
}

// =============================================================================
// Region handling
// =============================================================================

mod regions {
    use super::*;

    #[test]
    fn template_lints_without_a_script_region() {
        let source = "<template>\n  <child v-bind=\"$listeners\" />\n</template>\n";
        let result = lint(source);
        assert!(result.has_diagnostics());
    }

    #[test]
    fn broken_script_does_not_block_template_rules() {
        let source = "<script setup>\nconst x = (;\n</script>\n<template>\n  <child v-bind=\"$listeners\" />\n</template>\n";
        let result = lint(source);
        assert_eq!(rule_count(&result, "no-deprecated-instance-members"), 1);
    }

    #[test]
    fn diagnostics_point_into_the_original_file() {
        let source =
            "<script setup>\nconst props = defineProps(['count'])\nprops.count = 5\n</script>\n";
        let result = lint(source);
        let diagnostic = &result.diagnostics[0];
        let reported = &source[diagnostic.start as usize..diagnostic.end as usize];
        assert_eq!(reported, "props.count");
    }

    #[test]
    fn summary_counts_across_files() {
        let files = vec![
            (
                "a.vue".to_string(),
                "<script setup>\nconst props = defineProps(['count'])\nprops.count = 5\n</script>\n"
                    .to_string(),
            ),
            ("b.vue".to_string(), "<template><div /></template>".to_string()),
        ];
        let (results, summary) = Linter::new().lint_files(&files);
        assert_eq!(results.len(), 2);
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.error_count, 1);
    }
}

// =============================================================================
// Rule filtering
// =============================================================================

mod filtering {
    use super::*;

    #[test]
    fn enabled_rules_limit_reports() {
        let source = "<script>\nexport default {\n  render() {\n    return this.$scopedSlots.default(foo, bar)\n  },\n}\n</script>\n";
        let linter =
            Linter::new().with_enabled_rules(Some(vec!["no-multiple-slot-args".to_string()]));
        let result = linter.lint_sfc(source, "test.vue");
        assert_eq!(rule_count(&result, "no-multiple-slot-args"), 1);
        assert_eq!(rule_count(&result, "no-deprecated-instance-members"), 0);
    }
}
