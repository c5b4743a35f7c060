#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use folio::model::{Column, ReportDefinition, ReportResult, Row, Value};
    use folio::postprocess::{
        apply_totals, blank_duplicates, PostProcessor, RowDeriver, RowSum, ROW_TOTAL_KEY,
    };
    use folio::registry::{FieldRegistry, FieldSpec, ReportType};

    struct Sales;

    impl ReportType for Sales {
        fn report_name(&self) -> &str {
            "Sales"
        }

        fn reportable_fields(&self) -> Vec<FieldSpec> {
            ["Region", "Rep", "Q1", "Q2"]
                .into_iter()
                .map(FieldSpec::new)
                .collect()
        }

        fn data_objects(&self) -> &str {
            "sales"
        }
    }

    fn keys(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn region_result(regions: &[&str]) -> ReportResult {
        ReportResult::new(
            vec![Column {
                key: "Region".into(),
                header: "Region".into(),
            }],
            regions
                .iter()
                .map(|r| Row::from_values(vec![Value::from(*r)]))
                .collect(),
        )
    }

    /// Run a definition's passes over rows shaped like its selection.
    fn process(
        definition: &ReportDefinition,
        rows: Vec<Vec<Value>>,
        deriver: &dyn RowDeriver,
    ) -> ReportResult {
        let registry = FieldRegistry::for_report_type(&Sales).unwrap();
        let selection = registry.selection(definition);
        let mut result = ReportResult::new(
            selection.iter().map(|s| s.column.clone()).collect(),
            rows.into_iter().map(Row::from_values).collect(),
        );
        PostProcessor::new(definition, &selection, deriver).run(&mut result);
        result
    }

    #[test]
    fn test_blank_duplicates_region() {
        let mut result = region_result(&["West", "West", "East"]);
        blank_duplicates(&mut result, &keys(&["Region"]));
        assert_eq!(result.column_displays("Region"), vec!["West", "", "East"]);
    }

    #[test]
    fn test_blanking_compares_values_not_displays() {
        let mut result = region_result(&["West", "West", "West", "East", "West"]);
        blank_duplicates(&mut result, &keys(&["Region"]));
        assert_eq!(
            result.column_displays("Region"),
            vec!["West", "", "", "East", "West"]
        );
        assert!(result
            .rows
            .iter()
            .all(|r| !r.cells[0].value.is_null()));
    }

    #[test]
    fn test_blanking_restarts_on_each_page() {
        let mut result = ReportResult::new(
            vec![
                Column {
                    key: "Region".into(),
                    header: "Region".into(),
                },
                Column {
                    key: "Rep".into(),
                    header: "Rep".into(),
                },
            ],
            vec![
                Row::from_values(vec!["East".into(), "Ann".into()]),
                Row::from_values(vec!["East".into(), "Bob".into()]),
                Row::from_values(vec!["West".into(), "Bob".into()]),
                Row::from_values(vec!["West".into(), "Bob".into()]),
            ],
        );
        result.paginate_by = Some(0);
        blank_duplicates(&mut result, &keys(&["Rep"]));
        assert_eq!(result.column_displays("Rep"), vec!["Ann", "Bob", "Bob", ""]);

        result.paginate_by = None;
        blank_duplicates(&mut result, &keys(&["Rep"]));
        assert_eq!(result.column_displays("Rep"), vec!["Ann", "Bob", "", ""]);
    }

    #[test]
    fn test_blanking_unknown_column_is_noop() {
        let mut result = region_result(&["West", "West"]);
        blank_duplicates(&mut result, &keys(&["Nope"]));
        assert_eq!(result.column_displays("Region"), vec!["West", "West"]);
    }

    #[test]
    fn test_totals_treat_unparseable_as_zero() {
        let mut result = ReportResult::new(
            vec![
                Column {
                    key: "Rep".into(),
                    header: "Rep".into(),
                },
                Column {
                    key: "Q1".into(),
                    header: "Q1".into(),
                },
            ],
            vec![
                Row::from_values(vec!["Ann".into(), "100".into()]),
                Row::from_values(vec!["Bob".into(), "n/a".into()]),
                Row::from_values(vec!["Cy".into(), Value::Real(0.5)]),
            ],
        );
        apply_totals(&mut result, &keys(&["Q1"]));
        assert_eq!(result.totals.unwrap().displays(), vec!["", "100.5"]);
    }

    #[test]
    fn test_processor_maps_fields_to_every_selected_column() {
        let definition = ReportDefinition::new("Twice")
            .with_fields(["Region", "Q1", "Region"])
            .with_blank_duplicates("Region");

        let result = process(
            &definition,
            vec![
                vec!["West".into(), Value::Integer(1), "West".into()],
                vec!["West".into(), Value::Integer(2), "West".into()],
            ],
            &RowSum,
        );
        assert_eq!(result.column_displays("Region"), vec!["West", ""]);
        assert_eq!(result.column_displays("Region_2"), vec!["West", ""]);
        assert_eq!(result.column_displays("Q1"), vec!["1", "2"]);
    }

    #[test]
    fn test_add_in_rows_then_totals() {
        let definition = ReportDefinition::new("Quarters")
            .with_fields(["Rep", "Q1", "Q2"])
            .with_add_in_rows("Q1")
            .with_add_in_rows("Q2")
            .with_column_total("Q1")
            .with_column_total(ROW_TOTAL_KEY);

        let result = process(
            &definition,
            vec![
                vec!["Ann".into(), Value::Integer(10), Value::Integer(5)],
                vec!["Bob".into(), "7 units".into(), Value::Null],
            ],
            &RowSum,
        );

        assert_eq!(result.headers(), vec!["Rep", "Q1", "Q2", "Total"]);
        assert_eq!(result.column_displays(ROW_TOTAL_KEY), vec!["15", "7"]);
        assert_eq!(result.totals.unwrap().displays(), vec!["", "17", "", "22"]);
    }

    #[test]
    fn test_no_add_in_rows_appends_nothing() {
        let definition = ReportDefinition::new("Plain")
            .with_fields(["Rep", "Q1"])
            .with_column_total(ROW_TOTAL_KEY);
        let result = process(
            &definition,
            vec![vec!["Ann".into(), Value::Integer(1)]],
            &RowSum,
        );
        assert_eq!(result.headers(), vec!["Rep", "Q1"]);
        assert!(result.totals.is_none());
    }

    #[test]
    fn test_custom_deriver() {
        struct Spread;

        impl RowDeriver for Spread {
            fn columns(&self) -> Vec<Column> {
                vec![
                    Column {
                        key: "min".into(),
                        header: "Min".into(),
                    },
                    Column {
                        key: "max".into(),
                        header: "Max".into(),
                    },
                ]
            }

            fn derive(&self, row: &Row, inputs: &[usize]) -> Vec<Value> {
                let values: Vec<f64> = inputs.iter().map(|&i| row.cells[i].value.as_number()).collect();
                vec![
                    Value::Real(values.iter().cloned().fold(f64::INFINITY, f64::min)),
                    Value::Real(values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)),
                ]
            }
        }

        let definition = ReportDefinition::new("Spread")
            .with_fields(["Rep", "Q1", "Q2"])
            .with_add_in_rows("Q1")
            .with_add_in_rows("Q2")
            .with_column_total("max");

        let result = process(
            &definition,
            vec![
                vec!["Ann".into(), Value::Integer(3), Value::Integer(9)],
                vec!["Bob".into(), Value::Integer(4), Value::Integer(2)],
            ],
            &Spread,
        );
        assert_eq!(result.headers(), vec!["Rep", "Q1", "Q2", "Min", "Max"]);
        assert_eq!(result.column_displays("min"), vec!["3", "2"]);
        assert_eq!(result.totals.unwrap().displays(), vec!["", "", "", "", "13"]);
    }
}
