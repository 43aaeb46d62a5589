use gurume::core::record::RestaurantRecord;
use gurume::core::store::Store;
use gurume::plugins::report::{price_bands, rating_histogram};

fn seeded_store() -> Store {
    let store = Store::open_in_memory().unwrap();
    let records = vec![
        RestaurantRecord::new("Sushi Ken")
            .with_rating("4.21")
            .with_price_range("¥10,000~¥14,999"),
        RestaurantRecord::new("Ramen Taro")
            .with_rating("3.58")
            .with_price_range("~¥999"),
        RestaurantRecord::new("Tonkatsu Maisen")
            .with_rating("3.9")
            .with_price_range("¥1,000~¥1,999"),
        RestaurantRecord::new("Kissa Hoshi").with_price_range("ask"),
        RestaurantRecord::new("Yakitori Tori").with_price_range(""),
    ];
    let report = store.bulk_load(&records).unwrap();
    assert!(report.is_clean());
    store
}

#[test]
fn rating_histogram_counts_rated_rows_only() {
    let store = seeded_store();
    let bins = rating_histogram(&store, 5).unwrap();
    let counts: Vec<i64> = bins.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![0, 0, 0, 2, 1]);
    assert_eq!(bins[0].lower, 0.0);
    assert_eq!(bins[4].upper, 5.0);
}

#[test]
fn rating_histogram_on_empty_store_is_all_zero() {
    let store = Store::open_in_memory().unwrap();
    let bins = rating_histogram(&store, 10).unwrap();
    assert_eq!(bins.len(), 10);
    assert!(bins.iter().all(|b| b.count == 0));
}

#[test]
fn price_bands_skip_empty_and_count_unparsed() {
    let store = seeded_store();
    let report = price_bands(&store).unwrap();
    let pairs: Vec<(&str, i64)> = report
        .bands
        .iter()
        .map(|b| (b.band.as_str(), b.count))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("~¥1000", 1),
            ("¥1000~¥2000", 1),
            ("¥2000~¥3000", 0),
            ("¥3000~", 1),
        ]
    );
    assert_eq!(report.unparsed, 1);
}
