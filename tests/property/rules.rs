use formgate::context::Context;
use formgate::rule::{REQUIRED_MARKER, Rule, Verdict};
use proptest::prelude::*;
use serde_json::{Value, json};

/// Strategy for arbitrary rule configurations without a required flag.
fn arb_optional_rule() -> impl Strategy<Value = Rule> {
    (
        proptest::option::of(0usize..10),
        proptest::option::of(0usize..40),
        proptest::option::of(Just(())),
        proptest::option::of(Just(())),
    )
        .prop_map(|(min, max, pattern, custom)| {
            let mut rule = Rule::new();
            if let Some(min) = min {
                rule = rule.min_length(min);
            }
            if let Some(max) = max {
                rule = rule.max_length(max);
            }
            if pattern.is_some() {
                rule = rule.pattern(regex::Regex::new("^[a-z]+$").unwrap());
            }
            if custom.is_some() {
                rule = rule.validate(|_, _| Verdict::Fail);
            }
            rule
        })
}

/// Strategy for values the rule model treats as empty.
fn arb_empty_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        "[ \t]{0,8}".prop_map(|s| Some(Value::String(s))),
    ]
}

proptest! {
    /// For `required = false`, an empty value always passes, whatever the
    /// other settings.
    #[test]
    fn optional_rules_accept_empty_values(rule in arb_optional_rule(), value in arb_empty_value()) {
        prop_assert_eq!(rule.evaluate(value.as_ref(), "Field", &Context::new()), None);
    }

    /// For `required = true`, an empty value always yields the presence
    /// marker, whatever the other settings.
    #[test]
    fn required_rules_reject_empty_values(rule in arb_optional_rule(), value in arb_empty_value()) {
        let rule = rule.required();
        let violation = rule.evaluate(value.as_ref(), "Field", &Context::new());
        prop_assert_eq!(violation.map(|v| v.message), Some(REQUIRED_MARKER.to_string()));
    }

    /// Surrounding whitespace never changes the outcome of a rule pass.
    #[test]
    fn padding_never_changes_the_verdict(
        core in "[a-z0-9]{0,20}",
        left in "[ \t]{0,5}",
        right in "[ \t]{0,5}",
        min in 0usize..10,
        max in 10usize..30,
    ) {
        let rule = Rule::new()
            .required()
            .min_length(min)
            .max_length(max)
            .pattern(regex::Regex::new("^[a-z0-9]*$").unwrap());
        let padded = rule.evaluate(
            Some(&json!(format!("{}{}{}", left, core, right))),
            "Field",
            &Context::new(),
        );
        let bare = rule.evaluate(Some(&json!(core)), "Field", &Context::new());
        prop_assert_eq!(padded, bare);
    }

    /// A value failing both length and pattern always reports length first.
    #[test]
    fn length_message_wins_over_pattern(text in "[A-Z]{1,4}") {
        let rule = Rule::new()
            .required()
            .min_length(5)
            .pattern(regex::Regex::new("^[a-z]+$").unwrap());
        let msg = rule
            .evaluate(Some(&json!(text)), "Field", &Context::new())
            .expect("must fail")
            .message;
        prop_assert!(msg.contains("at least 5"), "got: {}", msg);
    }
}
