use gurume::core::config::{GurumeConfig, StoreConfig};
use gurume::core::error::GurumeError;
use gurume::core::record::RestaurantRecord;
use gurume::core::store::{Dimension, RestaurantStats, Store};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;

#[test]
fn store_upsert_replaces_row_with_same_name() {
    let store = Store::open_in_memory().unwrap();
    store
        .upsert(&RestaurantRecord::new("A").with_rating("4.5").with_reviews("1,234"))
        .unwrap();
    store
        .upsert(&RestaurantRecord::new("A").with_rating("4.8").with_reviews("2,000"))
        .unwrap();

    assert_eq!(store.count().unwrap(), 1);
    let rows = store.list(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "A");
    assert_eq!(rows[0].rating, Some(4.8));
    assert_eq!(rows[0].reviews, Some(2000));
}

#[test]
fn store_stats_average_non_null_values() {
    let store = Store::open_in_memory().unwrap();
    for (name, rating, location) in [
        ("Sushi Ken", "3.0", "ginza"),
        ("Tempura Kondo", "4.0", "ginza"),
        ("Ramen Taro", "5.0", "shibuya"),
    ] {
        store
            .upsert(
                &RestaurantRecord::new(name)
                    .with_rating(rating)
                    .with_location(location),
            )
            .unwrap();
    }
    store
        .upsert(&RestaurantRecord::new("Soba Jiro").with_reviews("10").with_menu("soba"))
        .unwrap();

    let stats = store.stats().unwrap().expect("catalog has rows");
    assert_eq!(
        stats,
        RestaurantStats {
            restaurants: 4,
            avg_rating: Some(4.0),
            avg_reviews: Some(10.0),
        }
    );

    let by_location = store.distribution_by(Dimension::Location).unwrap();
    let expected: BTreeMap<String, i64> = [
        ("".to_string(), 1),
        ("ginza".to_string(), 2),
        ("shibuya".to_string(), 1),
    ]
    .into_iter()
    .collect();
    assert_eq!(by_location, expected);

    let by_menu = store.distribution_by(Dimension::Menu).unwrap();
    assert_eq!(by_menu.get("soba"), Some(&1));
    assert_eq!(by_menu.get(""), Some(&3));
}

#[test]
fn store_distribution_matches_location_tags() {
    let store = Store::open_in_memory().unwrap();
    for (name, location) in [("A", "ginza"), ("B", "ginza"), ("C", "shibuya")] {
        store
            .upsert(&RestaurantRecord::new(name).with_location(location))
            .unwrap();
    }
    let distribution = store.distribution_by(Dimension::Location).unwrap();
    assert_eq!(distribution.len(), 2);
    assert_eq!(distribution["ginza"], 2);
    assert_eq!(distribution["shibuya"], 1);
}

#[test]
fn store_stats_on_empty_catalog_is_no_data() {
    let store = Store::open_in_memory().unwrap();
    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(store.stats().unwrap(), None);
}

#[test]
fn store_stats_without_ratings_reports_missing_average() {
    let store = Store::open_in_memory().unwrap();
    store.upsert(&RestaurantRecord::new("Unrated")).unwrap();
    let stats = store.stats().unwrap().unwrap();
    assert_eq!(stats.restaurants, 1);
    assert_eq!(stats.avg_rating, None);
    assert_eq!(stats.avg_reviews, None);
}

#[test]
fn bulk_load_reports_rejects_and_continues() {
    let store = Store::open_in_memory().unwrap();
    let records = vec![
        RestaurantRecord::new("Soba Jiro").with_rating("great"),
        RestaurantRecord::new("Tempura Kondo").with_rating("4.1").with_reviews("640"),
        RestaurantRecord::new("Kushiage Ban").with_reviews("-5"),
        RestaurantRecord::new("Yakitori Tori").with_rating("5.5"),
    ];

    let report = store.bulk_load(&records).unwrap();
    assert_eq!(report.upserted, 1);
    assert!(!report.is_clean());
    let rejected: Vec<&str> = report.rejected.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(rejected, vec!["Soba Jiro", "Kushiage Ban", "Yakitori Tori"]);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn store_persists_across_reopen_and_enforces_unique_names() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("catalog.db");

    let store = Store::open(&db_path).unwrap();
    store
        .upsert(&RestaurantRecord::new("Sushi Ken").with_rating("4.2"))
        .unwrap();
    store.close().unwrap();

    let store = Store::open(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.path(), Some(db_path.as_path()));
    drop(store);

    let raw = Connection::open(&db_path).unwrap();
    let err = raw
        .execute("INSERT INTO restaurants(name) VALUES ('Sushi Ken')", [])
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn store_open_with_config_uses_configured_path() {
    let tmp = tempdir().unwrap();
    let config = StoreConfig {
        path: tmp.path().join("data").join("restaurants.db"),
        busy_timeout_secs: 1,
    };
    let store = Store::open_with(&config).unwrap();
    store.upsert(&RestaurantRecord::new("Tonkatsu Maisen")).unwrap();
    store.close().unwrap();
    assert!(config.path.exists());
}

#[test]
fn store_open_existing_requires_catalog_file() {
    let tmp = tempdir().unwrap();
    let config = StoreConfig {
        path: tmp.path().join("missing").join("restaurants.db"),
        busy_timeout_secs: 1,
    };
    let err = Store::open_existing(&config).unwrap_err();
    assert!(matches!(err, GurumeError::NotFound(_)));
    assert!(!tmp.path().join("missing").exists());

    Store::open_with(&config).unwrap().close().unwrap();
    let store = Store::open_existing(&config).unwrap();
    assert_eq!(store.stats().unwrap(), None);
}

#[test]
fn upsert_rejects_empty_name() {
    let store = Store::open_in_memory().unwrap();
    let err = store.upsert(&RestaurantRecord::new(" ")).unwrap_err();
    assert!(matches!(err, GurumeError::ValidationError(_)));
}

#[test]
fn config_file_in_working_dir_is_picked_up() {
    let tmp = tempdir().unwrap();
    fs::write(
        tmp.path().join("gurume.toml"),
        "[dedup]\nthreshold = 0.9\n\n[store]\npath = \"catalog.db\"\n\n[report]\nrating_bins = 5\n",
    )
    .unwrap();

    let config = GurumeConfig::load(None, tmp.path()).unwrap();
    assert_eq!(config.dedup.threshold, 0.9);
    assert_eq!(config.store.path.to_str(), Some("catalog.db"));
    assert_eq!(config.report.rating_bins, 5);
}

#[test]
fn config_rejects_threshold_outside_unit_range() {
    let err = GurumeConfig::from_toml_str("[dedup]\nthreshold = -0.5\n").unwrap_err();
    assert!(matches!(err, GurumeError::SimilarityConfigError(_)));
}
