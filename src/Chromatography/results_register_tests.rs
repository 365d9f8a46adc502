#[cfg(test)]
mod tests {
    use crate::Chromatography::ChromatoError;
    use crate::Chromatography::chromato_finder::{ChromatoFinder, Mixture};
    use crate::Chromatography::decision::{ChromatographyMethod, Decision};
    use crate::Chromatography::mixture_table::MixturePropertyTable;
    use crate::Chromatography::property_store::{CompoundRecord, FieldValue, OfflinePropertyStore, PropertySet};
    use crate::Chromatography::results_register::{
        RecordId, RegisterError, ResultsRegister, update_results,
    };
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn store() -> OfflinePropertyStore {
        let mut store = OfflinePropertyStore::new();
        store.insert(
            "hexane",
            CompoundRecord {
                cid: 8058,
                basic: PropertySet::from_pairs(vec![("BoilingPoint", FieldValue::Number(68.7))]),
                extended: PropertySet::new(),
                pka: vec![],
            },
        )
        .unwrap();
        store.insert(
            "lysine",
            CompoundRecord {
                cid: 5962,
                basic: PropertySet::from_pairs(vec![("MolecularWeight", FieldValue::Text("146.19".into()))]),
                extended: PropertySet::new(),
                pka: vec![2.16, 9.06, 10.54],
            },
        )
        .unwrap();
        store
    }

    fn sample(names: &[&str]) -> (Decision, MixturePropertyTable) {
        let store = store();
        let finder = ChromatoFinder::new(&store);
        let table = finder
            .get_properties_table(&Mixture::from_names(names.iter().copied()))
            .unwrap();
        let decision = finder.det_chromato(&table).unwrap();
        (decision, table)
    }

    #[test]
    fn test_starts_empty_and_ids_are_sequential() {
        let register = ResultsRegister::new();
        assert!(register.is_empty());
        let (d1, t1) = sample(&["hexane"]);
        let (d2, t2) = sample(&["lysine"]);
        assert_eq!(register.record(d1, t1), RecordId(0));
        assert_eq!(register.record(d2, t2), RecordId(1));
        assert_eq!(register.len(), 2);
        assert_eq!(
            register.get(RecordId(0)).unwrap().method(),
            ChromatographyMethod::GasChromatography
        );
        assert_eq!(
            register.get(RecordId(1)).unwrap().method(),
            ChromatographyMethod::IonAwareLiquid
        );
        assert!(register.get(RecordId(2)).is_none());
        assert!(register.get_table(RecordId(7)).is_none());
    }

    #[test]
    fn test_returns_the_stored_objects() {
        let register = ResultsRegister::new();
        let (decision, table) = sample(&["hexane", "lysine"]);
        let decision = Arc::new(decision);
        let table = Arc::new(table);
        let id = register.record(Arc::clone(&decision), Arc::clone(&table));

        let got_decision = register.get(id).unwrap();
        let got_table = register.get_table(id).unwrap();
        assert!(Arc::ptr_eq(&got_decision, &decision));
        assert!(Arc::ptr_eq(&got_table, &table));
        assert_eq!(*got_decision, *decision);
        assert!(Arc::ptr_eq(&register.get(id).unwrap(), &got_decision));
    }

    #[test]
    fn test_named_records() {
        let register = ResultsRegister::new();
        let (d, t) = sample(&["hexane"]);
        let id = update_results(&register, Some("run A"), d.clone(), t.clone()).unwrap();
        assert_eq!(id, RecordId(0));
        let entry = register.get_by_name("run A").unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.name.as_deref(), Some("run A"));
        assert_eq!(*entry.decision, d);

        let duplicate = update_results(&register, Some("run A"), d.clone(), t.clone());
        assert_eq!(duplicate, Err(RegisterError::DuplicateName("run A".to_string())));
        assert_eq!(register.len(), 1);
        // the first entry is untouched
        assert!(Arc::ptr_eq(&register.get_by_name("run A").unwrap(), &entry));

        let anonymous = update_results(&register, None, d, t).unwrap();
        assert_eq!(anonymous, RecordId(1));
        assert!(register.get_by_name("missing").is_none());
    }

    #[test]
    fn test_concurrent_records_get_unique_dense_ids() {
        let register = ResultsRegister::new();
        let (decision, table) = sample(&["hexane"]);
        let decision = Arc::new(decision);
        let table = Arc::new(table);
        let ids: Vec<RecordId> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let register = &register;
                    let decision = Arc::clone(&decision);
                    let table = Arc::clone(&table);
                    scope.spawn(move || {
                        (0..25)
                            .map(|_| register.record(Arc::clone(&decision), Arc::clone(&table)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        assert_eq!(ids.len(), 200);
        let unique: HashSet<RecordId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 200);
        assert_eq!(ids.iter().max(), Some(&RecordId(199)));
        let snapshot = register.snapshot();
        for (i, entry) in snapshot.iter().enumerate() {
            assert_eq!(entry.id, RecordId(i));
        }
    }

    #[test]
    fn test_mixture_names_are_trimmed_either_way() {
        let mut added = Mixture::new();
        added.add_molecule("hexane");
        added.add_molecule(" lysine ");
        let listed = Mixture::from_names(["hexane", " lysine "]);
        assert_eq!(added, listed);
        assert_eq!(listed.molecules(), &["hexane", "lysine"]);

        let store = store();
        let finder = ChromatoFinder::new(&store);
        let table = finder.get_properties_table(&listed).unwrap();
        assert!(!table.row(1).unwrap().lookup_failed());
    }

    #[test]
    fn test_run_records_the_pipeline_result() {
        let store = store();
        let finder = ChromatoFinder::new(&store);
        let register = ResultsRegister::new();
        let mut mixture = Mixture::new();
        mixture.add_molecule("hexane");
        mixture.add_molecule(" lysine ");
        let id = finder.run(&mixture, &register, Some("amino")).unwrap();
        let table = register.get_table(id).unwrap();
        assert_eq!(table.names(), vec!["hexane", "lysine"]);
        assert_eq!(register.get_by_name("amino").unwrap().id, id);

        let again = finder.run(&mixture, &register, Some("amino"));
        assert!(matches!(again, Err(ChromatoError::Register(_))));
        let empty = finder.run(&Mixture::new(), &register, None);
        assert!(matches!(empty, Err(ChromatoError::EmptyMixture)));
        assert_eq!(register.len(), 1);
    }
}
