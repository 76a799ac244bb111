//! Catalog fetch, mapping and search, end to end.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use vitrine_core::ProductId;
use vitrine_integration_tests::TestContext;
use vitrine_storefront::screens::CatalogScreen;

#[tokio::test]
async fn test_catalog_drops_malformed_records() {
    let ctx = TestContext::new();
    ctx.add_product("p1", "Coffee Mug").await;
    ctx.add_product("p2", "Tea Pot").await;
    ctx.add_product("p3", "Mug Rack").await;
    let broken = ctx
        .add_raw_product(json!({"id": "p4", "name": "Ghost", "cost": "1", "description": "no pictures"}))
        .await;

    let mut screen = CatalogScreen::new();
    assert!(screen.refresh(ctx.state.catalog()).await.unwrap());

    assert_eq!(screen.items().len(), 3);
    assert!(screen.items().iter().all(|item| !item.images().is_empty()));
    assert_eq!(screen.skipped().len(), 1);
    assert_eq!(screen.skipped()[0].error.document_id.as_str(), broken);
    assert_eq!(screen.skipped()[0].error.missing, vec!["images"]);
}

#[tokio::test]
async fn test_mug_record_maps_exactly() {
    let ctx = TestContext::new();
    ctx.add_raw_product(json!({
        "id": "p1",
        "name": "Mug",
        "cost": "10",
        "description": "A mug",
        "images": ["http://x/1.png"]
    }))
    .await;

    let report = ctx.state.catalog().fetch_all().await.unwrap();
    let item = &report.items[0];
    assert_eq!(item.id(), &ProductId::new("p1"));
    assert_eq!(item.title(), "Mug");
    assert_eq!(item.price(), "10");
    assert_eq!(item.description(), "A mug");
    assert_eq!(item.images(), ["http://x/1.png".to_owned()]);
    assert_eq!(item.current_index(), 0);
}

#[tokio::test]
async fn test_search_over_fetched_catalog() {
    let ctx = TestContext::new();
    ctx.add_product("p1", "Coffee Mug").await;
    ctx.add_product("p2", "Tea Pot").await;
    ctx.add_product("p3", "Mug Rack").await;

    let mut screen = CatalogScreen::new();
    screen.refresh(ctx.state.catalog()).await.unwrap();

    screen.set_query("mug");
    let titles: Vec<String> = screen
        .visible()
        .iter()
        .map(|item| item.title().to_owned())
        .collect();
    assert_eq!(titles, ["Coffee Mug", "Mug Rack"]);

    screen.set_query("");
    assert_eq!(screen.visible(), screen.items());
}

#[tokio::test]
async fn test_overlapping_refreshes_keep_latest() {
    let ctx = TestContext::new();
    ctx.add_product("p1", "Coffee Mug").await;
    let catalog = ctx.state.catalog();
    let mut screen = CatalogScreen::new();

    let first = screen.begin_refresh();
    let first_result = catalog.fetch_all().await;

    ctx.add_product("p2", "Tea Pot").await;
    let second = screen.begin_refresh();
    let second_result = catalog.fetch_all().await;

    // The newer fetch lands first; the older one must not overwrite it.
    assert!(screen.apply(second, second_result).unwrap());
    assert!(!screen.apply(first, first_result).unwrap());
    assert_eq!(screen.items().len(), 2);
}

#[tokio::test]
async fn test_offline_refresh_keeps_list() {
    let ctx = TestContext::new();
    ctx.add_product("p1", "Coffee Mug").await;
    let mut screen = CatalogScreen::new();
    screen.refresh(ctx.state.catalog()).await.unwrap();

    ctx.store.set_offline(true);
    assert!(screen.refresh(ctx.state.catalog()).await.is_err());
    assert_eq!(screen.items().len(), 1);
}
