use gurume::core::config::{DedupConfig, MergeStrategy};
use gurume::core::error::GurumeError;
use gurume::core::record::{RestaurantRecord, Scalar};
use gurume::core::store::Store;
use gurume::plugins::dedup::{cluster, deduplicate};
use gurume::plugins::integrate::Integrator;
use gurume::plugins::loader::{WorkingSet, save_json};
use gurume::plugins::merge::merge;
use gurume::plugins::similarity::{NameMatcher, sequence_ratio};
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Two 100-character names sharing exactly `shared` leading characters and
/// nothing else, so their ratio is `shared / 100`.
fn names_with_ratio(shared: usize) -> (String, String) {
    let a: String = (0..100).filter_map(|i| char::from_u32(0x4E00 + i)).collect();
    let tail: String = (0..(100 - shared) as u32)
        .filter_map(|i| char::from_u32(0x3040 + i))
        .collect();
    let b: String = a.chars().take(shared).chain(tail.chars()).collect();
    (a, b)
}

#[test]
fn test_threshold_boundary_is_strict() {
    let matcher = NameMatcher::new(0.8).unwrap();
    for (shared, expected_same) in [(79, false), (80, false), (81, true)] {
        let (a, b) = names_with_ratio(shared);
        let ratio = sequence_ratio(&a, &b);
        assert!(
            (ratio - shared as f64 / 100.0).abs() < 1e-12,
            "ratio for {shared} shared chars was {ratio}"
        );
        assert_eq!(matcher.is_same(&a, &b), expected_same, "shared = {shared}");

        let records = vec![RestaurantRecord::new(a.clone()), RestaurantRecord::new(b.clone())];
        let expected_len = if expected_same { 1 } else { 2 };
        assert_eq!(deduplicate(records, &matcher).len(), expected_len);
    }
}

#[test]
fn test_pluggable_similarity_boundary() {
    let scored = |score: f64| {
        NameMatcher::with_similarity(move |_: &str, _: &str| score, 0.8).unwrap()
    };
    assert!(scored(0.81).is_same("x", "y"));
    assert!(!scored(0.80).is_same("x", "y"));
    assert!(!scored(0.79).is_same("x", "y"));
}

#[test]
fn test_deduplicate_twice_is_stable() {
    let mut set = WorkingSet::new();
    set.load(&fixture("ginza_sushi.json")).unwrap();
    set.load(&fixture("llm_sushi.json")).unwrap();
    let matcher = NameMatcher::default();

    let once = deduplicate(set.into_records(), &matcher);
    let twice = deduplicate(once.clone(), &matcher);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 4);
}

#[test]
fn test_merge_completeness_example() {
    let mut set = WorkingSet::new();
    set.load_str(
        r#"[{"name":"Sushi Ken","address":""},{"name":"Sushi Ken","address":"1-2-3 Ginza"}]"#,
        "inline",
    )
    .unwrap();
    let merged = merge(set.into_records());
    assert_eq!(merged, vec![RestaurantRecord::new("Sushi Ken").with_address("1-2-3 Ginza")]);
}

#[test]
fn test_cluster_merge_takes_first_non_empty_per_field() {
    let mut set = WorkingSet::new();
    set.load(&fixture("ginza_sushi.json")).unwrap();
    set.load(&fixture("llm_sushi.json")).unwrap();

    let integrator = Integrator::from_config(&DedupConfig::default()).unwrap();
    let (records, summary) = integrator.integrate(set.into_records());
    assert_eq!(summary.input, 6);
    assert_eq!(summary.canonical, 4);

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Sushi Ken", "鮨 さいとう", "Ramen Taro", "Tonkatsu Maisen"]);

    let sushi_ken = &records[0];
    assert_eq!(sushi_ken.rating, Some(Scalar::from("4.21")));
    assert_eq!(sushi_ken.reviews, Some(Scalar::from("1,234")));
    assert_eq!(sushi_ken.address.as_deref(), Some("1-2-3 Ginza, Chuo-ku"));
    assert_eq!(
        sushi_ken.website.as_deref(),
        Some("https://tabelog.example/tokyo/ginza/sushi-ken/")
    );

    let saito = &records[1];
    assert_eq!(saito.location.as_deref(), Some("roppongi"));
    assert_eq!(saito.review_summary.as_deref(), Some("予約困難"));

    let groups = cluster(records.clone(), &NameMatcher::default());
    assert!(groups.iter().all(|g| g.len() == 1), "canonical names must not be similar");
}

#[test]
fn test_legacy_strategy_keeps_first_representative_only() {
    let mut set = WorkingSet::new();
    set.load(&fixture("ginza_sushi.json")).unwrap();
    set.load(&fixture("llm_sushi.json")).unwrap();

    let integrator = Integrator::new(NameMatcher::default(), MergeStrategy::Legacy);
    let (records, _) = integrator.integrate(set.into_records());
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].address, None);
}

#[test]
fn test_threshold_one_still_folds_identical_names() {
    let records = vec![
        RestaurantRecord::new("Sushi Ken").with_address("1-2-3 Ginza"),
        RestaurantRecord::new("Sushi Ken").with_location("ginza"),
    ];

    let legacy = Integrator::new(NameMatcher::new(1.0).unwrap(), MergeStrategy::Legacy);
    assert_eq!(legacy.integrate(records.clone()).1.canonical, 1);

    let integrator = Integrator::new(NameMatcher::new(1.0).unwrap(), MergeStrategy::Cluster);
    let (canonical, summary) = integrator.integrate(records);
    assert_eq!(summary.canonical, 1);
    assert_eq!(canonical[0].address.as_deref(), Some("1-2-3 Ginza"));
    assert_eq!(canonical[0].location.as_deref(), Some("ginza"));

    let store = Store::open_in_memory().unwrap();
    store.bulk_load(&canonical).unwrap();
    let rows = store.list(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].address.as_deref(), Some("1-2-3 Ginza"));
    assert_eq!(rows[0].location.as_deref(), Some("ginza"));
}

#[test]
fn test_save_then_load_round_trips() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("out").join("integrated.json");
    let records = vec![
        RestaurantRecord::new("Sushi Ken")
            .with_rating(4.5)
            .with_reviews("1,234")
            .with_address("1-2-3 Ginza"),
        RestaurantRecord::new("鮨 さいとう")
            .with_reviews(856)
            .with_location("六本木")
            .with_price_range("¥30,000~"),
    ];

    save_json(&path, &records).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("六本木"));
    assert!(written.starts_with("[\n    {"));

    let mut set = WorkingSet::new();
    set.load(&path).unwrap();
    assert_eq!(set.records(), records.as_slice());
}

#[test]
fn test_loader_errors() {
    let mut set = WorkingSet::new();
    let err = set.load(&fixture("not_an_array.json")).unwrap_err();
    assert!(matches!(err, GurumeError::DataFormatError { .. }));

    let err = set.load(&fixture("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, GurumeError::NotFound(_)));
    assert!(set.is_empty());
}
