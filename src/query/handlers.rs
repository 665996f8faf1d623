// region:    --- Imports
use super::model::{BidHistory, FeedEntry, LiveAuction, DEFAULT_IMAGE};
use crate::auction::model::{Category, Listing, ListingId};
use crate::auction::status::{window_status, AuctionStatus};
use crate::store::{ListingStore, StoreError};
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 진행 중 경매 조회 (live, ending-soon)
/// `now`는 호출 측에서 한 번만 구해 모든 레코드에 같은 값을 쓴다.
pub async fn list_live(
    store: &dyn ListingStore,
    now: DateTime<Utc>,
) -> Result<Vec<LiveAuction>, StoreError> {
    info!("{:<12} --> 진행 중 경매 조회", "Query");
    let auctions = store.find_auctions().await?;
    Ok(auctions
        .into_iter()
        .filter_map(|listing| {
            let window = listing.auction.as_ref()?.window;
            let status = window_status(now, &window);
            if status == AuctionStatus::Ended || window.start_time > now {
                return None;
            }
            Some(LiveAuction {
                time_left_ms: (window.end_time - now).num_milliseconds(),
                status,
                listing,
            })
        })
        .collect())
}

/// 공개 경매 피드
pub async fn public_feed(
    store: &dyn ListingStore,
    now: DateTime<Utc>,
) -> Result<Vec<FeedEntry>, StoreError> {
    info!("{:<12} --> 공개 경매 피드 조회", "Query");
    let auctions = store.find_auctions().await?;
    Ok(auctions
        .into_iter()
        .filter_map(|listing| feed_entry(listing, now))
        .collect())
}

fn feed_entry(listing: Listing, now: DateTime<Utc>) -> Option<FeedEntry> {
    let auction = listing.auction.as_ref()?;
    Some(FeedEntry {
        id: listing.id,
        current_bid: listing.bid_floor(),
        starting_bid: listing.price,
        end_time: auction.window.end_time,
        total_bids: auction.total_bids,
        status: window_status(now, &auction.window),
        image: listing
            .image
            .as_ref()
            .map(|image| image.url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        category: listing.category,
        title: listing.title,
        description: listing.description,
        location: listing.location,
    })
}

/// 매물 조회
pub async fn get_listing(
    store: &dyn ListingStore,
    listing_id: ListingId,
) -> Result<Option<Listing>, StoreError> {
    info!("{:<12} --> 매물 조회 id: {}", "Query", listing_id);
    store.find_by_id(listing_id).await
}

/// 입찰 이력 조회. 경매가 아니면 None
pub async fn get_bid_history(
    store: &dyn ListingStore,
    listing_id: ListingId,
) -> Result<Option<BidHistory>, StoreError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    let listing = store.find_by_id(listing_id).await?;
    Ok(listing.and_then(|listing| {
        listing.auction.map(|auction| BidHistory {
            listing_id,
            total_bids: auction.total_bids,
            bids: auction.bid_history,
        })
    }))
}

/// 매물 목록 (경매 여부와 무관하게 전체)
pub async fn list_listings(store: &dyn ListingStore) -> Result<Vec<Listing>, StoreError> {
    info!("{:<12} --> 매물 목록 조회", "Query");
    store.find_all().await
}

/// 카테고리별 매물 조회
pub async fn filter_by_category(
    store: &dyn ListingStore,
    category: Category,
) -> Result<Vec<Listing>, StoreError> {
    info!("{:<12} --> 카테고리별 매물 조회: {}", "Query", category);
    store.find_by_category(category).await
}

// endregion: --- Query Handlers
