mod common;

use chrono::Duration;
use common::{hour_auction, new_auction, new_listing, t0, ManualClock, SELLER};
use listing_auction::auction::model::{Category, Image};
use listing_auction::auction::status::AuctionStatus;
use listing_auction::query::handlers::{
    filter_by_category, get_bid_history, list_listings, list_live, public_feed,
};
use listing_auction::store::{ListingStore, MemoryListingStore};

async fn seed(store: &MemoryListingStore) {
    let seller = SELLER.to_string();
    // live (3시간 남음)
    store
        .insert(&seller, new_auction("long", 100.0, t0(), t0() + Duration::hours(4)))
        .await
        .unwrap();
    // ending-soon
    hour_auction(store).await;
    // upcoming
    store
        .insert(
            &seller,
            new_auction("soon", 100.0, t0() + Duration::hours(2), t0() + Duration::hours(3)),
        )
        .await
        .unwrap();
    // ended
    store
        .insert(
            &seller,
            new_auction("over", 100.0, t0() - Duration::hours(3), t0() - Duration::hours(1)),
        )
        .await
        .unwrap();
    // 경매 아님
    store.insert(&seller, new_listing("plain", 100.0)).await.unwrap();
}

#[tokio::test]
async fn test_list_live_excludes_upcoming_and_ended() {
    let store = MemoryListingStore::new(ManualClock::new(t0()));
    seed(&store).await;
    let now = t0() + Duration::hours(1) - Duration::minutes(30);

    let live = list_live(&store, now).await.unwrap();
    let summary: Vec<(&str, AuctionStatus)> = live
        .iter()
        .map(|a| (a.listing.title.as_str(), a.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("long", AuctionStatus::Live),
            ("hour auction", AuctionStatus::EndingSoon)
        ]
    );
    assert_eq!(live[1].time_left_ms, Duration::minutes(30).num_milliseconds());
}

#[tokio::test]
async fn test_public_feed_covers_every_auction() {
    let store = MemoryListingStore::new(ManualClock::new(t0()));
    seed(&store).await;
    let now = t0() + Duration::minutes(30);

    let feed = public_feed(&store, now).await.unwrap();
    let statuses: Vec<AuctionStatus> = feed.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![
            AuctionStatus::Live,
            AuctionStatus::EndingSoon,
            AuctionStatus::Upcoming,
            AuctionStatus::Ended
        ]
    );
    assert!(feed.iter().all(|e| e.current_bid == 100.0 && e.starting_bid == 100.0));
}

#[tokio::test]
async fn test_public_feed_uses_listing_image() {
    let store = MemoryListingStore::new(ManualClock::new(t0()));
    let mut listing = new_auction("pictured", 10.0, t0(), t0() + Duration::hours(2));
    listing.image = Some(Image {
        url: "https://img.example/1.jpg".to_string(),
        filename: "1.jpg".to_string(),
    });
    store.insert(&SELLER.to_string(), listing).await.unwrap();

    let feed = public_feed(&store, t0()).await.unwrap();
    assert_eq!(feed[0].image, "https://img.example/1.jpg");
}

#[tokio::test]
async fn test_bid_history_only_for_auctions() {
    let store = MemoryListingStore::new(ManualClock::new(t0()));
    let plain = store
        .insert(&SELLER.to_string(), new_listing("plain", 1.0))
        .await
        .unwrap();
    let auction = hour_auction(&store).await;

    assert!(get_bid_history(&store, plain.id).await.unwrap().is_none());
    let history = get_bid_history(&store, auction.id).await.unwrap().unwrap();
    assert_eq!(history.total_bids, 0);
    assert!(history.bids.is_empty());

    assert!(store.delete_by_id(auction.id).await.unwrap());
    assert!(get_bid_history(&store, auction.id).await.unwrap().is_none());
    assert!(!store.delete_by_id(auction.id).await.unwrap());
}

#[tokio::test]
async fn test_filter_by_category() {
    let store = MemoryListingStore::new(ManualClock::new(t0()));
    seed(&store).await;
    let mut castle = new_listing("castle", 5.0);
    castle.category = Category::Castles;
    store.insert(&SELLER.to_string(), castle).await.unwrap();

    let castles = filter_by_category(&store, Category::Castles).await.unwrap();
    assert_eq!(castles.len(), 1);
    assert_eq!(castles[0].title, "castle");
    assert_eq!(filter_by_category(&store, Category::Villas).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_listings_includes_plain_listings() {
    let store = MemoryListingStore::new(ManualClock::new(t0()));
    seed(&store).await;

    let listings = list_listings(&store).await.unwrap();
    let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["long", "hour auction", "soon", "over", "plain"]);
    assert!(!listings[4].is_auction());

    store.delete_by_id(listings[0].id).await.unwrap();
    assert_eq!(list_listings(&store).await.unwrap().len(), 4);
}
