#[cfg(test)]
pub(crate) mod tests {
    use crate::Chromatography::ChromatoError;
    use crate::Chromatography::mixture_table::{Resolution, TableBuilder};
    use crate::Chromatography::property_store::{
        CompoundId, FieldValue, LookupError, PropertySet, PropertyStore,
    };
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory store with per-call failure injection
    #[derive(Default)]
    pub(crate) struct MockStore {
        ids: HashMap<String, u64>,
        basic: HashMap<u64, Result<PropertySet, LookupError>>,
        extended: HashMap<u64, Result<PropertySet, LookupError>>,
        pka: HashMap<u64, Result<Vec<f64>, LookupError>>,
        pub(crate) calls: RefCell<Vec<String>>,
    }

    impl MockStore {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn compound(
            mut self,
            name: &str,
            cid: u64,
            basic: Vec<(&str, FieldValue)>,
            extended: Vec<(&str, FieldValue)>,
            pka: Vec<f64>,
        ) -> Self {
            self.ids.insert(name.to_string(), cid);
            self.basic.insert(cid, Ok(PropertySet::from_pairs(basic)));
            self.extended.insert(cid, Ok(PropertySet::from_pairs(extended)));
            self.pka.insert(cid, Ok(pka));
            self
        }

        pub(crate) fn failing_basic(mut self, cid: u64) -> Self {
            self.basic
                .insert(cid, Err(LookupError::Unavailable("timeout".to_string())));
            self
        }

        pub(crate) fn failing_extended(mut self, cid: u64) -> Self {
            self.extended
                .insert(cid, Err(LookupError::Unavailable("HTTP 503".to_string())));
            self
        }

        pub(crate) fn failing_pka(mut self, cid: u64) -> Self {
            self.pka
                .insert(cid, Err(LookupError::Unavailable("page changed".to_string())));
            self
        }
    }

    impl PropertyStore for MockStore {
        fn lookup_identifier(&self, name: &str) -> Result<CompoundId, LookupError> {
            self.calls.borrow_mut().push(format!("id:{}", name));
            self.ids
                .get(name)
                .map(|&cid| CompoundId(cid))
                .ok_or_else(|| LookupError::NotFound(name.to_string()))
        }

        fn get_basic_properties(&self, id: CompoundId) -> Result<PropertySet, LookupError> {
            self.calls.borrow_mut().push(format!("basic:{}", id.0));
            self.basic
                .get(&id.0)
                .cloned()
                .unwrap_or_else(|| Err(LookupError::NotFound(id.to_string())))
        }

        fn get_extended_properties(&self, id: CompoundId) -> Result<PropertySet, LookupError> {
            self.calls.borrow_mut().push(format!("extended:{}", id.0));
            self.extended
                .get(&id.0)
                .cloned()
                .unwrap_or_else(|| Err(LookupError::NotFound(id.to_string())))
        }

        fn lookup_dissociation_constant(
            &self,
            _name: &str,
            id: Option<CompoundId>,
        ) -> Result<Vec<f64>, LookupError> {
            let id = id.ok_or_else(|| LookupError::NotFound("no id".to_string()))?;
            self.calls.borrow_mut().push(format!("pka:{}", id.0));
            self.pka
                .get(&id.0)
                .cloned()
                .unwrap_or_else(|| Err(LookupError::NotFound(id.to_string())))
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn num(x: f64) -> FieldValue {
        FieldValue::Number(x)
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn sample_store() -> MockStore {
        MockStore::new()
            .compound(
                "ethanol",
                702,
                vec![
                    ("MolecularWeight", text("46.07")),
                    ("XLogP", num(-0.1)),
                    ("BoilingPoint", num(78.2)),
                ],
                vec![],
                vec![15.9],
            )
            .compound(
                "benzoic acid",
                243,
                vec![("MolecularWeight", text("122.12")), ("XLogP", num(1.9))],
                vec![
                    ("Boiling Point", text("249.2 °C")),
                    ("Solubility", text("3.4 g/L")),
                ],
                vec![4.2],
            )
    }

    #[test]
    fn test_one_row_per_name_in_input_order() {
        let store = sample_store();
        let builder = TableBuilder::new(&store);
        let input = names(&["benzoic acid", "ethanol", "benzoic acid"]);
        let table = builder.build(&input).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.names(), vec!["benzoic acid", "ethanol", "benzoic acid"]);
        assert_eq!(table.rows()[0], table.rows()[2]);
    }

    #[test]
    fn test_failed_lookup_keeps_other_rows() {
        let store = sample_store();
        let builder = TableBuilder::new(&store);
        let input = names(&["ethanol", "unobtainium", "benzoic acid"]);
        let table = builder.build(&input).unwrap();
        assert_eq!(table.names(), vec!["ethanol", "unobtainium", "benzoic acid"]);

        let missing = table.row(1).unwrap();
        assert!(missing.lookup_failed());
        assert!(missing.values.iter().all(FieldValue::is_unknown));
        assert_eq!(missing.values.len(), table.columns().len());
        assert_eq!(missing.boiling_point, Resolution::Unknown);
        assert_eq!(missing.pka, Resolution::Unknown);
        assert_eq!(missing.molecular_weight, Resolution::Unknown);
        assert!(missing.is_fully_unresolved());

        assert_eq!(table.row(0).unwrap().boiling_point, Resolution::Known(78.2));
        assert_eq!(table.row(2).unwrap().boiling_point, Resolution::Known(249.2));
        // no further calls after the identifier failed
        let calls = store.calls.borrow();
        assert!(calls.contains(&"id:unobtainium".to_string()));
        assert_eq!(calls.iter().filter(|c| c.starts_with("basic:")).count(), 2);
    }

    #[test]
    fn test_columns_in_discovery_order() {
        let store = sample_store();
        let builder = TableBuilder::new(&store);
        let table = builder.build(&names(&["ethanol", "benzoic acid"])).unwrap();
        assert_eq!(
            table.columns(),
            &["MolecularWeight", "XLogP", "BoilingPoint", "Boiling Point", "Solubility"]
        );
        // ethanol has no value for columns only benzoic acid brought
        assert!(table.value(0, "Solubility").is_unknown());
        assert_eq!(table.value(1, "Solubility"), &text("3.4 g/L"));
        assert!(table.value(0, "NoSuchColumn").is_unknown());
        assert!(table.value(9, "XLogP").is_unknown());
    }

    #[test]
    fn test_typed_accessors() {
        let store = sample_store();
        let builder = TableBuilder::new(&store);
        let table = builder.build(&names(&["ethanol"])).unwrap();
        let row = table.row(0).unwrap();
        assert_eq!(row.cid, Some(CompoundId(702)));
        assert_eq!(row.molecular_weight, Resolution::Known(46.07));
        assert_eq!(row.logp, Resolution::Known(-0.1));
        assert_eq!(row.pka, Resolution::Known(15.9));
    }

    #[test]
    fn test_partial_retrieval_is_merged() {
        let store = sample_store()
            .compound(
                "toluene",
                1140,
                vec![("MolecularWeight", num(92.14))],
                vec![("Boiling Point", text("110.6 °C"))],
                vec![],
            )
            .failing_extended(1140)
            .failing_pka(1140);
        let builder = TableBuilder::new(&store);
        let table = builder.build(&names(&["toluene"])).unwrap();
        let row = table.row(0).unwrap();
        assert!(!row.lookup_failed());
        assert_eq!(row.molecular_weight, Resolution::Known(92.14));
        // found, but nothing to derive from
        assert_eq!(row.boiling_point, Resolution::Unresolved);
        assert_eq!(row.pka, Resolution::Unresolved);
        assert_eq!(row.logp, Resolution::Unresolved);
    }

    #[test]
    fn test_basic_failure_falls_back_to_extended() {
        let store = sample_store().failing_basic(702);
        let builder = TableBuilder::new(&store);
        let table = builder.build(&names(&["ethanol"])).unwrap();
        let row = table.row(0).unwrap();
        assert_eq!(row.boiling_point, Resolution::Unresolved);
        assert_eq!(row.molecular_weight, Resolution::Unresolved);
        assert_eq!(row.pka, Resolution::Known(15.9));
    }

    #[test]
    fn test_empty_mixture_is_rejected() {
        let store = sample_store();
        let builder = TableBuilder::new(&store);
        assert!(matches!(builder.build(&[]), Err(ChromatoError::EmptyMixture)));
        assert!(store.calls.borrow().is_empty());
    }

    #[test]
    fn test_all_names_unknown() {
        let store = MockStore::new();
        let builder = TableBuilder::new(&store);
        let table = builder.build(&names(&["a", "b"])).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.columns().is_empty());
        assert!(table.rows().iter().all(|r| r.lookup_failed()));
    }

    #[test]
    fn test_pretty_table_has_one_line_per_row() {
        let store = sample_store();
        let builder = TableBuilder::new(&store);
        let table = builder.build(&names(&["ethanol", "nothing"])).unwrap();
        let pretty = table.to_pretty_table();
        // header + rows
        assert_eq!(pretty.len(), 3);
        let rendered = pretty.to_string();
        assert!(rendered.contains("ethanol"));
        assert!(rendered.contains("unknown"));
    }
}
