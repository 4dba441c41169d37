use csmarket::ItemView;
use skindex_db::{ItemFilter, SkindexDb};

async fn test_db() -> SkindexDb {
    SkindexDb::connect_to("sqlite::memory:")
        .await
        .expect("in-memory database")
}

fn catalog_item(name: &str, item_type: &str, weapon: Option<&str>) -> ItemView {
    ItemView {
        market_hash_name: name.to_string(),
        hash_name: name.to_string(),
        nameid: None,
        classid: None,
        exterior: Some("Field-Tested".to_string()),
        category: Some("Normal".to_string()),
        weapon: weapon.map(|w| w.to_string()),
        item_type: Some(item_type.to_string()),
        quality: None,
        collection: None,
        min_float: None,
        max_float: None,
        cloudflare_icon_url: Some("https://cdn.example.com/icon.png".to_string()),
        akamai_icon_url: None,
    }
}

#[tokio::test]
async fn upsert_keeps_ids_stable() {
    let db = test_db().await;
    let item = catalog_item("AK-47 | Redline (Field-Tested)", "Rifle", Some("AK-47"));
    db.upsert_catalog_items(std::slice::from_ref(&item))
        .await
        .unwrap();
    let before = db
        .get_items_paginated(&Default::default(), 1, 10)
        .await
        .unwrap();
    let mut refreshed = item.clone();
    refreshed.quality = Some("Classified".to_string());
    db.upsert_catalog_items(&[refreshed]).await.unwrap();
    let after = db
        .get_items_paginated(&Default::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(after.total, 1);
    assert_eq!(after.items[0].id, before.items[0].id);
    assert_eq!(after.items[0].quality.as_deref(), Some("Classified"));
}

#[tokio::test]
async fn resync_never_deletes_omitted_items() {
    let db = test_db().await;
    db.upsert_catalog_items(&[
        catalog_item("AK-47 | Redline (Field-Tested)", "Rifle", Some("AK-47")),
        catalog_item("M4A4 | Asiimov (Field-Tested)", "Rifle", Some("M4A4")),
    ])
    .await
    .unwrap();
    let before = db
        .get_items_paginated(&Default::default(), 1, 10)
        .await
        .unwrap();
    let omitted_id = before
        .items
        .iter()
        .find(|i| i.market_hash_name.starts_with("M4A4"))
        .unwrap()
        .id;
    // a partial provider outage shows up as a smaller dump; nothing is lost
    db.upsert_catalog_items(&[catalog_item(
        "AK-47 | Redline (Field-Tested)",
        "Rifle",
        Some("AK-47"),
    )])
    .await
    .unwrap();
    let after = db
        .get_items_paginated(&Default::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(after.total, 2);
    let survivor = after
        .items
        .iter()
        .find(|i| i.market_hash_name.starts_with("M4A4"))
        .unwrap();
    assert_eq!(survivor.id, omitted_id);
}

#[tokio::test]
async fn pagination_reports_totals() {
    let db = test_db().await;
    let items: Vec<_> = (0..7)
        .map(|n| catalog_item(&format!("Sticker | Team {n}"), "Sticker", None))
        .collect();
    db.upsert_catalog_items(&items).await.unwrap();
    let page = db
        .get_items_paginated(&Default::default(), 2, 3)
        .await
        .unwrap();
    assert_eq!(page.total, 7);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.page, 2);
    let last = db
        .get_items_paginated(&Default::default(), 3, 3)
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
}

#[tokio::test]
async fn filters_are_exact_matches() {
    let db = test_db().await;
    db.upsert_catalog_items(&[
        catalog_item("AK-47 | Redline (Field-Tested)", "Rifle", Some("AK-47")),
        catalog_item("Glock-18 | Fade (Factory New)", "Pistol", Some("Glock-18")),
    ])
    .await
    .unwrap();
    let filter = ItemFilter {
        item_type: Some("Rifle".to_string()),
        ..Default::default()
    };
    let page = db.get_items_paginated(&filter, 1, 10).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].weapon.as_deref(), Some("AK-47"));
}

#[tokio::test]
async fn search_is_case_insensitive_and_prefers_prefixes() {
    let db = test_db().await;
    db.upsert_catalog_items(&[
        catalog_item("Sticker | AK-47 Fan", "Sticker", None),
        catalog_item("AK-47 | Redline (Field-Tested)", "Rifle", Some("AK-47")),
        catalog_item("M4A4 | Asiimov (Field-Tested)", "Rifle", Some("M4A4")),
    ])
    .await
    .unwrap();
    let results = db.search_items("ak-47", 10).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].market_hash_name.starts_with("AK-47"));
}

#[tokio::test]
async fn prefix_match_survives_the_result_limit() {
    let db = test_db().await;
    // both stickers sort alphabetically ahead of the prefix match
    db.upsert_catalog_items(&[
        catalog_item("AK-47 | Redline (Field-Tested)", "Rifle", Some("AK-47")),
        catalog_item("A Sticker | AK-47 Fan", "Sticker", None),
        catalog_item("AB Sticker | AK-47 Fan", "Sticker", None),
    ])
    .await
    .unwrap();
    let results = db.search_items("ak", 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].market_hash_name,
        "AK-47 | Redline (Field-Tested)"
    );
}
