#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use folio::model::ReportDefinition;
    use folio::query::{
        CompiledCondition, ConditionBuilder, ConditionValue, NoParameters, Operator,
    };
    use folio::registry::{FieldRegistry, FieldSpec, ReportType};

    struct Orders;

    impl ReportType for Orders {
        fn report_name(&self) -> &str {
            "Orders"
        }

        fn reportable_fields(&self) -> Vec<FieldSpec> {
            ["A", "B", "C", "D", "Region", "Customer.Email", "Closed"]
                .into_iter()
                .map(FieldSpec::new)
                .collect()
        }

        fn data_objects(&self) -> &str {
            "orders"
        }
    }

    fn registry() -> FieldRegistry {
        FieldRegistry::for_report_type(&Orders).unwrap()
    }

    fn compile(definition: &ReportDefinition) -> Vec<CompiledCondition> {
        let registry = registry();
        ConditionBuilder::new(&registry).compile(definition, &NoParameters)
    }

    fn lists(fields: &[&str], operators: &[&str], values: &[&str]) -> ReportDefinition {
        let mut definition = ReportDefinition::new("Conditions");
        definition.condition_fields = fields.iter().map(|s| s.to_string()).collect();
        definition.condition_operators = operators.iter().map(|s| s.to_string()).collect();
        definition.condition_values = values.iter().map(|s| s.to_string()).collect();
        definition
    }

    fn fields(compiled: &[CompiledCondition]) -> Vec<&str> {
        compiled.iter().map(|c| c.field.name.as_str()).collect()
    }

    #[test]
    fn test_ragged_tail_stops_at_missing_value() {
        let definition = lists(&["A", "B", "C"], &["=", "=", "="], &["1", "2"]);
        assert_eq!(fields(&compile(&definition)), vec!["A", "B"]);
    }

    #[test]
    fn test_ragged_tail_stops_at_missing_operator() {
        let definition = lists(&["A", "B", "C"], &["="], &["1", "2", "3"]);
        assert_eq!(fields(&compile(&definition)), vec!["A"]);
    }

    #[test]
    fn test_nothing_after_the_break_is_considered() {
        // Index 1 is complete but index 0 is not: the whole list stops at 0.
        let mut definition = lists(&["A", "B"], &[], &["1", "2"]);
        assert!(compile(&definition).is_empty());

        // A live tuple past the break would have compiled on its own.
        definition.condition_operators = vec!["=".into(), "=".into()];
        assert_eq!(fields(&compile(&definition)), vec!["A", "B"]);
    }

    #[test]
    fn test_invalid_entries_are_dropped_individually() {
        let definition = lists(
            &["A", "B", "Nope", "D"],
            &["=", "BETWEEN", "=", "<>"],
            &["1", "2", "3", "4"],
        );
        let compiled = compile(&definition);
        assert_eq!(fields(&compiled), vec!["A", "D"]);
        assert_eq!(compiled[1].operator, Operator::NotEq);
    }

    #[test]
    fn test_in_splits_into_list() {
        let definition = ReportDefinition::new("In").with_condition("Region", "in", "a, b ,c");
        let compiled = compile(&definition);
        assert_eq!(
            compiled[0].value,
            ConditionValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(compiled[0].to_string(), "Region IN ('a', 'b', 'c')");
    }

    #[test]
    fn test_is_null_any_case() {
        for raw in ["NULL", "null", "Null", " nUlL "] {
            let definition = ReportDefinition::new("Null").with_condition("Closed", "IS", raw);
            assert_eq!(compile(&definition)[0].value, ConditionValue::Null);
        }

        let definition = ReportDefinition::new("Not null").with_condition("Closed", "is not", "NULL");
        let compiled = compile(&definition);
        assert_eq!(compiled[0].operator, Operator::IsNot);
        assert_eq!(compiled[0].to_string(), "Closed IS NOT NULL");
    }

    #[test]
    fn test_null_text_is_literal_for_other_operators() {
        let definition = ReportDefinition::new("Eq").with_condition("Closed", "=", "NULL");
        assert_eq!(
            compile(&definition)[0].value,
            ConditionValue::Single("NULL".into())
        );
    }

    #[test]
    fn test_dotted_field_resolves_to_key() {
        let definition =
            ReportDefinition::new("Email").with_condition("Customer.Email", "LIKE", "%@example.com");
        let compiled = compile(&definition);
        assert_eq!(compiled[0].field.key, "Customer_Email");
        assert_eq!(compiled[0].operator, Operator::Like);
    }

    #[test]
    fn test_param_values_use_request_then_defaults() {
        let registry = registry();
        let definition = ReportDefinition::new("Params")
            .with_condition("Region", "=", "param:region")
            .with_condition("A", ">", "param:min")
            .with_condition("B", "=", "param:missing")
            .with_default_parameter("region", "North")
            .with_default_parameter("min", "10");

        let mut params = HashMap::new();
        params.insert("region".to_string(), "West".to_string());

        let compiled = ConditionBuilder::new(&registry).compile(&definition, &params);
        let values: Vec<_> = compiled.iter().map(|c| c.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                ConditionValue::Single("West".into()),
                ConditionValue::Single("10".into()),
                ConditionValue::Single("".into()),
            ]
        );
    }

    #[test]
    fn test_transforms_apply_to_each_list_element() {
        let registry = registry();
        let definition = ReportDefinition::new("In params")
            .with_condition("Region", "IN", "param:first,param:second,East")
            .with_default_parameter("first", "West")
            .with_default_parameter("second", "North");

        let compiled = ConditionBuilder::new(&registry).compile(&definition, &NoParameters);
        assert_eq!(
            compiled[0].value,
            ConditionValue::List(vec!["West".into(), "North".into(), "East".into()])
        );
    }
}
