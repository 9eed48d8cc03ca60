//! Integration tests for the catalog views (jobs, shop, fish).

mod common;

use cityvault::catalog::{fuzzy, FishCatalog, JobCatalog, ShopCatalog};
use cityvault::store::DocumentStore;
use serde_json::json;
use tempfile::tempdir;

async fn job_catalog(tmp: &std::path::Path) -> JobCatalog {
    common::write_fixture(
        tmp,
        "catalog/jobs.json",
        &json!({
            "10": {
                "1000": {"jobName": "保安", "company": "城南物业"},
                "1001": {"jobName": "保安队长", "company": "城南物业"},
                "1002": {"jobName": "安保主管", "company": "城南物业"}
            },
            "20": {
                "2000": {"jobName": "初级工程师", "company": "星辰科技"},
                "2001": {"jobName": "高级工程师", "company": "星辰科技"}
            }
        })
        .to_string(),
    );
    JobCatalog::new(DocumentStore::open(tmp, "catalog", "jobs.json").await.unwrap())
}

#[tokio::test]
async fn job_lookup_and_promotion_chain() {
    common::init_logging();
    let tmp = tempdir().unwrap();
    let catalog = job_catalog(tmp.path()).await;

    let job = catalog.job_info("1000").unwrap();
    assert_eq!(job.name, "保安");
    assert_eq!(job.company.as_deref(), Some("城南物业"));
    assert!(catalog.job_info("9999").is_none());
    assert!(catalog.job_info("abc").is_none());

    // next in chain is pure sort-order adjacency
    assert_eq!(catalog.next_job("1000").unwrap().name, "保安队长");
    assert_eq!(catalog.next_job("1001").unwrap().name, "安保主管");
    assert!(catalog.next_job("1002").is_none()); // end of chain

    assert_eq!(catalog.promote_chain("1000"), vec!["保安队长", "安保主管"]);
    assert_eq!(catalog.promote_count("1000"), 2);
    assert_eq!(catalog.promote_count("1002"), 0);
}

#[tokio::test]
async fn senior_codes_take_ceiling_third() {
    let tmp = tempdir().unwrap();
    let catalog = job_catalog(tmp.path()).await;

    // 3 codes in series 10 → ⌈3/3⌉ = 1
    assert_eq!(catalog.senior_codes("1000"), vec!["1002"]);
    // 2 codes in series 20 → ⌈2/3⌉ = 1
    assert_eq!(catalog.senior_codes("2000"), vec!["2001"]);
    assert!(catalog.senior_codes("999").is_empty());
}

#[tokio::test]
async fn job_search_ranks_by_match_quality() {
    let tmp = tempdir().unwrap();
    let catalog = job_catalog(tmp.path()).await;

    let hits = catalog.search("工程师");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|j| j.name.contains("工程师")));

    let hits = catalog.search("保安");
    // "保安" prefix-matches two entries and is contained in none of series 20.
    assert_eq!(hits[0].name, "保安");
    assert!(catalog.search("律师").is_empty());

    let pairs = catalog.jobs_and_companies();
    assert_eq!(pairs.len(), 5);
    assert!(pairs.contains(&("保安".to_string(), "城南物业".to_string())));
}

#[tokio::test]
async fn fuzzy_ranking_prefers_contiguous_matches() {
    // The canonical "did you mean" case: both tokens contiguous in the
    // first two names, only partial coverage in the third.
    let ranked = fuzzy::rank_names("心心", ["小心心", "小红心", "大心心"]);
    let names: Vec<&str> = ranked.iter().map(|(n, _)| *n).collect();
    assert!(names.contains(&"小心心"));
    assert!(names.contains(&"大心心"));
    assert!(!names.contains(&"小红心"));
}

#[tokio::test]
async fn shop_lookup_and_similar_items() {
    let tmp = tempdir().unwrap();
    common::write_fixture(
        tmp.path(),
        "catalog/shop.json",
        &json!({
            "小心心": {"price": 520, "quantity": 10},
            "大心心": {"price": 1314, "quantity": 2},
            "小红心": {"price": 500},
            "木鱼竿": {"price": 120, "quantity": 5}
        })
        .to_string(),
    );
    let catalog = ShopCatalog::new(
        DocumentStore::open(tmp.path(), "catalog", "shop.json").await.unwrap(),
    );

    let item = catalog.item_info("小心心").unwrap();
    assert_eq!(item.price, 520.0);
    assert_eq!(item.quantity, 10);
    // Missing quantity defaults to sold out.
    assert_eq!(catalog.item_info("小红心").unwrap().quantity, 0);
    assert!(catalog.item_info("不存在").is_none());

    // Unknown target suggests nothing.
    assert!(catalog.similar_items("不存在", 3, 1).is_empty());

    // Price neighbors of 小心心 (520): 小红心 (500) below, 大心心 (1314) above.
    let similar = catalog.similar_items("小心心", 3, 1);
    let names: Vec<&str> = similar.iter().map(|(n, _)| n.as_str()).collect();
    assert!(names.contains(&"小红心"));
    assert!(names.contains(&"大心心"));
    assert!(!names.contains(&"小心心")); // never suggests itself
    // Closer price sorts first among price neighbors.
    assert!(names.iter().position(|n| *n == "小红心") < names.iter().position(|n| *n == "大心心"));
}

#[tokio::test]
async fn similar_items_finds_lookalike_names_without_price_neighbors() {
    let tmp = tempdir().unwrap();
    common::write_fixture(
        tmp.path(),
        "catalog/shop.json",
        &json!({
            "小心心": {"price": 520, "quantity": 10},
            "大心心": {"price": 1314, "quantity": 2},
            "小红心": {"price": 500},
            "木鱼竿": {"price": 120, "quantity": 5}
        })
        .to_string(),
    );
    let catalog = ShopCatalog::new(
        DocumentStore::open(tmp.path(), "catalog", "shop.json").await.unwrap(),
    );

    // With zero price neighbors, only name similarity can suggest anything.
    // 大心心 and 小红心 each share two of three characters with the target;
    // 木鱼竿 shares none and must not appear.
    let similar = catalog.similar_items("小心心", 3, 0);
    let names: Vec<&str> = similar.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["小红心", "大心心"]);

    // top_n_name bounds the name half.
    assert_eq!(catalog.similar_items("小心心", 1, 0).len(), 1);
    assert!(catalog.similar_items("木鱼竿", 3, 0).is_empty());
}

#[tokio::test]
async fn fish_bait_filtering_and_uniform_pick() {
    let tmp = tempdir().unwrap();
    common::write_fixture(
        tmp.path(),
        "catalog/fish.json",
        &json!({
            "鲫鱼": {"bait": ["蚯蚓"], "averagePrice": 15, "averageWeight": 2.5},
            "草鱼": {"bait": ["蚯蚓", "玉米"], "averagePrice": 12, "averageWeight": 4.0},
            "龙虾": {"bait": ["活虾"], "averagePrice": 30, "averageWeight": 0.5}
        })
        .to_string(),
    );
    let catalog = FishCatalog::new(
        DocumentStore::open(tmp.path(), "catalog", "fish.json").await.unwrap(),
    );

    let fish = catalog.species_info("鲫鱼").unwrap();
    assert_eq!(fish.bait, vec!["蚯蚓"]);

    let worm_catch: Vec<String> = catalog
        .species_for_bait("蚯蚓")
        .into_iter()
        .map(|(n, _)| n)
        .collect();
    assert_eq!(worm_catch, vec!["鲫鱼", "草鱼"]);

    // The pick is always a member of the matching set.
    for _ in 0..20 {
        let (name, _) = catalog.random_by_bait("蚯蚓").unwrap();
        assert!(worm_catch.contains(&name));
    }
    assert!(catalog.random_by_bait("面包").is_none());
}
