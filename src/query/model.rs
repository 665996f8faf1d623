use crate::auction::model::{BidEntry, Category, Listing, ListingId};
use crate::auction::status::AuctionStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 이미지가 없는 매물의 기본 이미지
pub const DEFAULT_IMAGE: &str = "/images/default-property.jpg";

/// 진행 중 경매 (상태와 남은 시간 포함)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAuction {
    pub listing: Listing,
    pub status: AuctionStatus,
    pub time_left_ms: i64,
}

/// 외부 공개용 경매 요약. 입찰자 정보는 포함하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: Category,
    pub image: String,
    pub current_bid: f64,
    pub starting_bid: f64,
    pub end_time: DateTime<Utc>,
    pub total_bids: u32,
    pub status: AuctionStatus,
}

/// 입찰 이력 응답
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidHistory {
    pub listing_id: ListingId,
    pub total_bids: u32,
    pub bids: Vec<BidEntry>,
}
