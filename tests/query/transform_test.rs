#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{NaiveDate, NaiveDateTime};
    use folio::model::ReportDefinition;
    use folio::query::{
        ConditionBuilder, ConditionValue, NoParameters, ParameterTransform, RelativeDateTransform,
        TransformChain, TransformContext, ValueTransform,
    };
    use folio::registry::{FieldRegistry, FieldSpec, ReportType};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn chain() -> TransformChain {
        TransformChain::empty()
            .with("strtotime:", RelativeDateTransform::at(now()))
            .with("param:", ParameterTransform)
    }

    fn apply(chain: &TransformChain, value: &str, defaults: &BTreeMap<String, String>) -> String {
        let ctx = TransformContext {
            params: &NoParameters,
            defaults,
        };
        chain.apply(value, &ctx)
    }

    struct Upper;

    impl ValueTransform for Upper {
        fn apply(&self, argument: &str, _ctx: &TransformContext<'_>) -> String {
            argument.to_uppercase()
        }
    }

    #[test]
    fn test_relative_dates() {
        let chain = chain();
        let none = BTreeMap::new();
        assert_eq!(apply(&chain, "strtotime:today", &none), "2024-03-15 00:00:00");
        assert_eq!(apply(&chain, "strtotime:-1 week", &none), "2024-03-08 10:30:00");
        assert_eq!(apply(&chain, "strtotime:2 days ago", &none), "2024-03-13 10:30:00");
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        let chain = chain();
        assert_eq!(
            apply(&chain, "strtotime:the day after", &BTreeMap::new()),
            "the day after"
        );
    }

    #[test]
    fn test_out_of_range_offset_passes_through() {
        let chain = chain();
        let none = BTreeMap::new();
        assert_eq!(
            apply(&chain, "strtotime:+100000000 days", &none),
            "+100000000 days"
        );
        assert_eq!(
            apply(&chain, "strtotime:+9000000000000000000 weeks", &none),
            "+9000000000000000000 weeks"
        );
        assert_eq!(
            apply(&chain, "strtotime:today +1000000 years", &none),
            "today +1000000 years"
        );
    }

    #[test]
    fn test_values_without_prefix_untouched() {
        let chain = chain();
        assert_eq!(apply(&chain, "West", &BTreeMap::new()), "West");
        assert_eq!(apply(&chain, "x param:y", &BTreeMap::new()), "x param:y");
    }

    #[test]
    fn test_passes_repeat_until_no_prefix_matches() {
        let chain = chain();
        let mut defaults = BTreeMap::new();
        defaults.insert("since".to_string(), "strtotime:yesterday".to_string());
        assert_eq!(apply(&chain, "param:since", &defaults), "2024-03-14 00:00:00");
    }

    #[test]
    fn test_self_referencing_parameter_terminates() {
        let chain = chain();
        let mut defaults = BTreeMap::new();
        defaults.insert("loop".to_string(), "param:loop".to_string());
        assert_eq!(apply(&chain, "param:loop", &defaults), "param:loop");
    }

    #[test]
    fn test_first_registered_prefix_wins() {
        let chain = TransformChain::empty()
            .with("up:", Upper)
            .with("up:x", ParameterTransform);
        assert_eq!(apply(&chain, "up:xyz", &BTreeMap::new()), "XYZ");
        assert_eq!(chain.prefixes().collect::<Vec<_>>(), vec!["up:", "up:x"]);
    }

    #[test]
    fn test_builder_uses_custom_chain() {
        struct Events;

        impl ReportType for Events {
            fn report_name(&self) -> &str {
                "Events"
            }

            fn reportable_fields(&self) -> Vec<FieldSpec> {
                vec![FieldSpec::new("Created"), FieldSpec::new("Kind")]
            }

            fn data_objects(&self) -> &str {
                "events"
            }
        }

        let registry = FieldRegistry::for_report_type(&Events).unwrap();
        let definition = ReportDefinition::new("Recent")
            .with_condition("Created", ">=", "strtotime:today -1 month")
            .with_condition("Kind", "=", "up:login");

        let compiled = ConditionBuilder::new(&registry)
            .with_transforms(chain().with("up:", Upper))
            .compile(&definition, &NoParameters);

        assert_eq!(
            compiled[0].value,
            ConditionValue::Single("2024-02-15 00:00:00".into())
        );
        assert_eq!(compiled[1].value, ConditionValue::Single("LOGIN".into()));
    }
}
