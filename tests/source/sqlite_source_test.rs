#[cfg(test)]
mod tests {
    use folio::assemble::QueryCompiler;
    use folio::model::{ReportDefinition, Value};
    use folio::registry::{FieldKey, FieldRegistry, FieldSpec, ReportType};
    use folio::source::{DataSource, MemorySource, QueryRequest, Rows, SourceError, SqliteSource};

    struct Members;

    impl ReportType for Members {
        fn report_name(&self) -> &str {
            "Members"
        }

        fn reportable_fields(&self) -> Vec<FieldSpec> {
            ["Name", "Member.Email", "Invoice", "Region", "Closed", "Visits"]
                .into_iter()
                .map(FieldSpec::new)
                .collect()
        }

        fn data_objects(&self) -> &str {
            "members"
        }
    }

    const ROWS: &[(i64, &str, &str, &str, &str, Option<&str>, i64)] = &[
        (1, "Ann", "ann@example.com", "11-doc", "West", None, 4),
        (2, "Bob", "bob@example.com", "2-doc", "East", Some("2024-01-01"), 9),
        (3, "alice", "alice@example.com", "1-doc", "West", None, 1),
        (4, "Cy", "cy@example.com", "7-doc", "North", None, 12),
        (5, "Abe", "abe@example.com", "30-doc", "East", None, 2),
    ];

    fn sqlite() -> SqliteSource {
        let source = SqliteSource::open_in_memory().unwrap();
        source
            .connection()
            .execute_batch(
                "CREATE TABLE members (
                    ID INTEGER PRIMARY KEY,
                    Name TEXT,
                    Member_Email TEXT,
                    Invoice TEXT,
                    Region TEXT,
                    Closed TEXT,
                    Visits INTEGER
                );",
            )
            .unwrap();
        for (id, name, email, invoice, region, closed, visits) in ROWS {
            source
                .connection()
                .execute(
                    "INSERT INTO members VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    rusqlite::params![id, name, email, invoice, region, closed, visits],
                )
                .unwrap();
        }
        source
    }

    fn memory() -> MemorySource {
        ROWS.iter().fold(
            MemorySource::new("members"),
            |source, (id, name, email, invoice, region, closed, visits)| {
                source.with_record([
                    ("ID", Value::Integer(*id)),
                    ("Name", Value::from(*name)),
                    ("Member_Email", Value::from(*email)),
                    ("Invoice", Value::from(*invoice)),
                    ("Region", Value::from(*region)),
                    ("Closed", Value::from(*closed)),
                    ("Visits", Value::Integer(*visits)),
                ])
            },
        )
    }

    fn run(source: &dyn DataSource, definition: &ReportDefinition) -> Rows {
        let registry = FieldRegistry::for_report_type(&Members).unwrap();
        let compiled = QueryCompiler::new(&registry).compile_default(definition);
        source.execute(&compiled.request).unwrap()
    }

    fn names(rows: &Rows) -> Vec<String> {
        rows.iter().map(|r| r[0].to_string()).collect()
    }

    #[test]
    fn test_numeric_sort_orders_by_leading_number() {
        let definition = ReportDefinition::new("Invoices")
            .with_fields(["Invoice"])
            .with_sort("Invoice", Some("ASC"))
            .with_numeric_sort("Invoice");
        let rows = run(&sqlite(), &definition);
        assert_eq!(names(&rows), vec!["1-doc", "2-doc", "7-doc", "11-doc", "30-doc"]);
        assert_eq!(rows, run(&memory(), &definition));
    }

    #[test]
    fn test_text_sort_is_lexicographic() {
        let definition = ReportDefinition::new("Invoices")
            .with_fields(["Invoice"])
            .with_sort("Invoice", Some("ASC"));
        let rows = run(&sqlite(), &definition);
        assert_eq!(names(&rows), vec!["1-doc", "11-doc", "2-doc", "30-doc", "7-doc"]);
    }

    #[test]
    fn test_conditions_match_memory_source() {
        let definition = ReportDefinition::new("West and East")
            .with_fields(["Name", "Member.Email", "Visits"])
            .with_condition("Region", "IN", "West,East")
            .with_condition("Closed", "IS", "NULL")
            .with_condition("Name", "LIKE", "a%")
            .with_sort("Name", Some("ASC"));

        let rows = run(&sqlite(), &definition);
        assert_eq!(names(&rows), vec!["Abe", "Ann", "alice"]);
        assert_eq!(rows[1][1], Value::from("ann@example.com"));
        assert_eq!(rows[1][2], Value::Integer(4));
        assert_eq!(rows, run(&memory(), &definition));
    }

    #[test]
    fn test_is_not_null() {
        let definition = ReportDefinition::new("Closed")
            .with_fields(["Name", "Closed"])
            .with_condition("Closed", "IS NOT", "null");
        let rows = run(&sqlite(), &definition);
        assert_eq!(
            rows,
            vec![vec![Value::from("Bob"), Value::from("2024-01-01")]]
        );
        assert_eq!(rows, run(&memory(), &definition));
    }

    #[test]
    fn test_numeric_comparison_on_integer_column() {
        let definition = ReportDefinition::new("Regulars")
            .with_fields(["Name"])
            .with_condition("Visits", ">=", "9");
        let rows = run(&sqlite(), &definition);
        assert_eq!(names(&rows), vec!["Bob", "Cy"]);
        assert_eq!(rows, run(&memory(), &definition));
    }

    #[test]
    fn test_pagination_orders_first() {
        let definition = ReportDefinition::new("By region")
            .with_fields(["Region", "Name"])
            .with_sort("Name", Some("DESC"))
            .with_paginate_by("Region");
        let rows = run(&sqlite(), &definition);
        let pairs: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r[0].to_string(), r[1].to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("East".into(), "Bob".into()),
                ("East".into(), "Abe".into()),
                ("North".into(), "Cy".into()),
                ("West".into(), "alice".into()),
                ("West".into(), "Ann".into()),
            ]
        );
        assert_eq!(rows, run(&memory(), &definition));
    }

    #[test]
    fn test_default_sort_uses_identity() {
        let definition = ReportDefinition::new("All").with_fields(["Name"]);
        let rows = run(&sqlite(), &definition);
        assert_eq!(names(&rows), vec!["Ann", "Bob", "alice", "Cy", "Abe"]);
        assert_eq!(rows, run(&memory(), &definition));
    }

    #[test]
    fn test_injection_attempt_is_inert() {
        let source = sqlite();
        let definition = ReportDefinition::new("Hostile")
            .with_fields(["Name"])
            .with_condition("Name", "=", "x'; DROP TABLE members; --");
        assert!(run(&source, &definition).is_empty());

        let count: i64 = source
            .connection()
            .query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        struct Ghosts;

        impl ReportType for Ghosts {
            fn report_name(&self) -> &str {
                "Ghosts"
            }

            fn reportable_fields(&self) -> Vec<FieldSpec> {
                vec![FieldSpec::new("Name")]
            }

            fn data_objects(&self) -> &str {
                "ghosts"
            }
        }

        let registry = FieldRegistry::for_report_type(&Ghosts).unwrap();
        let compiled = QueryCompiler::new(&registry)
            .compile_default(&ReportDefinition::new("Ghosts").with_fields(["Name"]));
        let err = sqlite().execute(&compiled.request).unwrap_err();
        assert!(matches!(err, SourceError::Sqlite(_)));
    }

    #[test]
    fn test_undeclared_columns_are_not_selectable() {
        struct NamesOnly;

        impl ReportType for NamesOnly {
            fn report_name(&self) -> &str {
                "Names"
            }

            fn reportable_fields(&self) -> Vec<FieldSpec> {
                vec![FieldSpec::new("Name")]
            }

            fn data_objects(&self) -> &str {
                "members"
            }
        }

        let registry = FieldRegistry::for_report_type(&NamesOnly).unwrap();
        let definition = ReportDefinition::new("Sneaky")
            .with_fields(["Name", "Member.Email", "Nope"])
            .with_condition("Name", "=", "Ann");
        let compiled = QueryCompiler::new(&registry).compile_default(&definition);
        let rows = sqlite().execute(&compiled.request).unwrap();
        assert_eq!(rows, vec![vec![Value::from("Ann")]]);
    }

    #[test]
    fn test_unknown_column_is_an_error_not_a_string() {
        let request = QueryRequest {
            record_set: "members".into(),
            fields: vec![FieldKey::new("Name"), FieldKey::new("Nope")],
            conditions: Vec::new(),
            sort: Vec::new(),
            paginate_by: None,
        };
        let err = sqlite().execute(&request).unwrap_err();
        assert!(matches!(err, SourceError::Sqlite(_)));
    }
}
