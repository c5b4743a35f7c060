#[cfg(test)]
mod tests {
    use folio::model::{Column, ReportDefinition};
    use folio::registry::{FieldRegistry, FieldSpec, RegistryError, ReportType};

    struct Members {
        name: &'static str,
        table: &'static str,
        fields: Vec<FieldSpec>,
    }

    impl ReportType for Members {
        fn report_name(&self) -> &str {
            self.name
        }

        fn reportable_fields(&self) -> Vec<FieldSpec> {
            self.fields.clone()
        }

        fn data_objects(&self) -> &str {
            self.table
        }
    }

    fn members() -> Members {
        Members {
            name: "Members",
            table: "members",
            fields: vec![
                FieldSpec::labeled("Name", "Name"),
                FieldSpec::new("first_name"),
                FieldSpec::labeled("Member.Email", "Email"),
                FieldSpec::new("Region"),
            ],
        }
    }

    fn registry() -> FieldRegistry {
        FieldRegistry::for_report_type(&members()).unwrap()
    }

    fn column(key: &str, header: &str) -> Column {
        Column {
            key: key.to_string(),
            header: header.to_string(),
        }
    }

    #[test]
    fn test_missing_capabilities_rejected_at_registration() {
        let mut unnamed = members();
        unnamed.name = " ";
        assert_eq!(
            FieldRegistry::for_report_type(&unnamed).unwrap_err(),
            RegistryError::MissingCapability("report_name")
        );

        let mut no_table = members();
        no_table.table = "";
        assert_eq!(
            FieldRegistry::for_report_type(&no_table).unwrap_err(),
            RegistryError::MissingCapability("data_objects")
        );

        let mut no_fields = members();
        no_fields.fields.clear();
        assert_eq!(
            FieldRegistry::for_report_type(&no_fields).unwrap_err(),
            RegistryError::MissingCapability("reportable_fields")
        );
    }

    #[test]
    fn test_invalid_field_name_rejected() {
        let mut bad = members();
        bad.fields.push(FieldSpec::new("Name; DROP TABLE members"));
        assert!(matches!(
            FieldRegistry::for_report_type(&bad),
            Err(RegistryError::InvalidFieldName(_))
        ));
    }

    #[test]
    fn test_identity_field_always_present() {
        let registry = registry();
        assert!(registry.contains("ID"));
        assert_eq!(registry.label_for("ID"), "ID");
        assert_eq!(registry.record_set(), "members");
        assert_eq!(registry.report_name(), "Members");
    }

    #[test]
    fn test_labels() {
        let registry = registry();
        assert_eq!(registry.label_for("Member.Email"), "Email");
        assert_eq!(registry.label_for("first_name"), "First Name");
        assert_eq!(registry.label_for("Unknown.Field"), "Unknown.Field");
    }

    #[test]
    fn test_resolve_is_pure() {
        let registry = registry();
        let key = registry.resolve("Member.Email");
        assert_eq!(key.key, "Member_Email");
        assert_eq!(key, registry.resolve("Member.Email"));
        // Unregistered names still resolve.
        assert_eq!(registry.resolve("Other.Thing").key, "Other_Thing");
    }

    #[test]
    fn test_field_selected_twice_is_disambiguated() {
        let definition = ReportDefinition::new("Dupes")
            .with_fields(["Name", "Region", "Name"])
            .with_headers(["Name", "Region", "Name"]);

        assert_eq!(
            registry().compute_headers(&definition),
            vec![
                column("Name", "Name"),
                column("Region", "Region"),
                column("Name_2", "Name"),
            ]
        );
    }

    #[test]
    fn test_headers_fall_back_to_labels() {
        let definition = ReportDefinition::new("Short headers")
            .with_fields(["Member.Email", "first_name", "Region", "Member.Email"])
            .with_headers(["Contact", ""]);

        assert_eq!(
            registry().compute_headers(&definition),
            vec![
                column("Member_Email", "Contact"),
                column("first_name", "First Name"),
                column("Region", "Region"),
                column("Member_Email_2", "Email"),
            ]
        );
    }

    #[test]
    fn test_selection_keeps_underlying_field() {
        let definition = ReportDefinition::new("Dupes").with_fields(["Region", "Region", "Region"]);
        let selection = registry().selection(&definition);

        let keys: Vec<_> = selection.iter().map(|s| s.column.key.as_str()).collect();
        assert_eq!(keys, vec!["Region", "Region_2", "Region_3"]);
        assert!(selection.iter().all(|s| s.field.key == "Region"));
    }

    #[test]
    fn test_unknown_selected_fields_are_dropped() {
        let definition = ReportDefinition::new("Typos")
            .with_fields(["Name", "Nope", "Member.Phone", "Region", "Nope"])
            .with_headers(["Who", "Ignored", "Ignored", "Area"]);

        let selection = registry().selection(&definition);
        let fields: Vec<_> = selection.iter().map(|s| s.field.name.as_str()).collect();
        assert_eq!(fields, vec!["Name", "Region"]);
        assert_eq!(
            registry().compute_headers(&definition),
            vec![column("Name", "Who"), column("Region", "Area")]
        );
    }

    #[test]
    fn test_selection_of_only_unknown_fields_is_empty() {
        let definition = ReportDefinition::new("Nothing").with_fields(["Password", "Salary"]);
        assert!(registry().selection(&definition).is_empty());
    }
}
