//! # Group Store Tests
//!
//! Store mutations seen from the outside: versioning, index freshness and
//! loading predefined groups from disk.

#[cfg(test)]
mod tests {
    use ingredient_scanner::cache::{create_shared_store, IndexCache};
    use ingredient_scanner::config::EngineConfig;
    use ingredient_scanner::default_groups::{
        load_default_groups_config, load_from_path, DefaultGroupsConfig, GroupSeed,
    };
    use ingredient_scanner::errors::AppError;
    use ingredient_scanner::group_store::{GroupId, GroupStore};
    use ingredient_scanner::scanner::Scanner;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_groups_seeded_in_order() {
        let store = GroupStore::with_default_groups().unwrap();
        let names: Vec<&str> = store.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Allergens",
                "Preservatives",
                "Artificial Colors",
                "Sweeteners",
                "Additives",
                "Fats & Oils"
            ]
        );
        assert!(store.groups().iter().all(|g| g.enabled && !g.custom));
        // Stored phrases are normalized
        assert!(store.get(&GroupId::from("2")).unwrap().contains_phrase("bht"));
    }

    #[test]
    fn test_custom_group_lifecycle() {
        let mut store = GroupStore::with_default_groups().unwrap();
        let scanner = Scanner::default();
        let text = "Cochineal extract (carmine), annatto";

        let group = store
            .create_group_from_list("My Watchlist", "carmine, Annatto ,, ", "#607D8B")
            .unwrap();
        assert_eq!(group.words, vec!["carmine", "annatto"]);
        assert!(group.custom);
        assert!(group.id.as_str().starts_with("custom-"));

        let index = store.build_index();
        assert_eq!(scanner.scan_with_index(text, &index).matches.len(), 2);

        store.add_word(&group.id, "Cochineal Extract").unwrap();
        let index = store.build_index();
        let phrases: Vec<String> = scanner
            .scan_with_index(text, &index)
            .matches
            .into_iter()
            .map(|m| m.phrase)
            .collect();
        assert_eq!(phrases, vec!["cochineal extract", "carmine", "annatto"]);

        store.delete_group(&group.id).unwrap();
        assert!(store.get(&group.id).is_none());
        assert!(scanner.scan(text, store.groups()).is_clean());
    }

    #[test]
    fn test_version_tracks_effective_mutations() {
        let mut store = GroupStore::with_default_groups().unwrap();
        let allergens = GroupId::from("1");
        let v0 = store.version();

        store.set_enabled(&allergens, true).unwrap();
        store.add_word(&allergens, " Milk ").unwrap();
        assert_eq!(store.version(), v0);

        store.toggle_group(&allergens).unwrap();
        store.add_word(&allergens, "lupin").unwrap();
        store.remove_word(&allergens, 0).unwrap();
        assert_eq!(store.version(), v0 + 3);
    }

    #[test]
    fn test_failed_mutations_leave_store_unchanged() {
        let mut store = GroupStore::with_default_groups().unwrap();
        let before = store.groups().to_vec();
        let version = store.version();
        let missing = GroupId::from("does-not-exist");

        assert!(matches!(store.delete_group(&missing), Err(AppError::NotFound(_))));
        assert!(matches!(store.toggle_group(&missing), Err(AppError::NotFound(_))));
        assert!(matches!(
            store.remove_word(&GroupId::from("1"), 999),
            Err(AppError::OutOfRange { index: 999, .. })
        ));
        assert!(matches!(
            store.create_group("   ", &["carmine"], "#607D8B"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            store.create_group::<&str>("Empty", &[], "#607D8B"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            store.add_word(&GroupId::from("1"), " ,; "),
            Err(AppError::InvalidInput(_))
        ));

        assert_eq!(store.groups(), before.as_slice());
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_custom_ids_never_reused() {
        let mut store = GroupStore::new();
        let first = store.create_group("A", &["aa"], "#000000").unwrap();
        store.delete_group(&first.id).unwrap();
        let second = store.create_group("B", &["bb"], "#000000").unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_custom_ids_avoid_seeded_ids() {
        let seeds = DefaultGroupsConfig {
            groups: vec![GroupSeed {
                id: "custom-1".to_string(),
                name: "Restored".to_string(),
                icon: None,
                color: "#607D8B".to_string(),
                words: vec!["gelatin".to_string()],
                enabled: true,
            }],
        };
        let mut store = GroupStore::from_seeds(EngineConfig::default(), &seeds).unwrap();

        let created = store.create_group("New", &["carmine"], "#607D8B").unwrap();
        assert_ne!(created.id, GroupId::from("custom-1"));

        let mut ids: Vec<&str> = store.groups().iter().map(|g| g.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), store.len());

        // Both groups stay reachable by id
        store.toggle_group(&created.id).unwrap();
        assert!(store.get(&GroupId::from("custom-1")).unwrap().enabled);
        assert!(!store.get(&created.id).unwrap().enabled);
    }

    #[test]
    fn test_phrases_unique_after_canonicalization() {
        let mut store = GroupStore::new();
        let group = store
            .create_group("A", &["milk", "milk.", "Gluten-free", "gluten\u{2013}free"], "#607D8B")
            .unwrap();
        assert_eq!(group.words, vec!["milk", "gluten-free"]);

        let version = store.version();
        let updated = store.add_word(&group.id, "(milk)").unwrap();
        assert_eq!(updated.words.len(), 2);
        assert_eq!(store.version(), version);

        let result = Scanner::default().scan("Milk, gluten\u{2011}free oats", store.groups());
        assert_eq!(result.matches.len(), 2);
    }

    #[test]
    fn test_cache_follows_store_through_shared_handle() {
        let store = create_shared_store(GroupStore::with_default_groups().unwrap());
        let cache = IndexCache::new();
        let scanner = Scanner::default();

        let index = cache.get_or_build_shared(&store);
        assert!(scanner.scan_with_index("carmine", &index).is_clean());

        store
            .write()
            .create_group("Colors", &["carmine"], "#E91E63")
            .unwrap();

        let refreshed = cache.get_or_build_shared(&store);
        assert!(!Arc::ptr_eq(&index, &refreshed));
        assert_eq!(scanner.scan_with_index("carmine", &refreshed).matches.len(), 1);
        assert_eq!(cache.stats().rebuilds, 1);
    }

    #[test]
    fn test_store_from_seed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"groups": [
                {{"id": "nuts", "name": "Nuts", "color": "#795548", "words": ["Hazelnut", "almond"]}},
                {{"id": "dairy", "name": "Dairy", "color": "#FFFFFF", "words": ["whey"], "enabled": false}}
            ]}}"##
        )
        .unwrap();

        let seeds = load_from_path(file.path()).unwrap();
        let store = GroupStore::from_seeds(EngineConfig::default(), &seeds).unwrap();
        assert_eq!(store.len(), 2);

        let result = Scanner::default().scan("whey, hazelnut", store.groups());
        assert_eq!(result.matches.len(), 1);
        assert!(result.matches[0].is_owned_by(&GroupId::from("nuts")));
    }

    #[test]
    fn test_invalid_seed_file_falls_back_to_built_in() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r##"{{"groups": [{{"id": "", "name": "x", "color": "#000", "words": ["y"]}}]}}"##)
            .unwrap();

        assert!(matches!(load_from_path(file.path()), Err(AppError::Config(_))));

        let path = file.path().to_string_lossy().to_string();
        let seeds = load_default_groups_config(Some(&path));
        assert_eq!(seeds.groups.len(), 6);
    }
}
