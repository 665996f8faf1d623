use crate::auction::model::{ListingId, UserId};
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// 입찰 요청 본문. { "bidAmount": number } 외에는 허용하지 않는다.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BidRequest {
    #[serde(rename = "bidAmount")]
    pub bid_amount: f64,
}

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: ListingId,
    pub bidder_id: UserId,
    pub bid_amount: f64,
}

/// 입찰 성공 결과
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BidReceipt {
    pub current_bid: f64,
    pub total_bids: u32,
}

/// 입찰 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidPolicy {
    /// 최고 입찰자가 자기 입찰가를 다시 올리는 것을 허용할지
    pub allow_self_outbid: bool,
    /// 판매자가 자기 매물에 입찰하는 것을 허용할지
    pub allow_seller_bids: bool,
}

impl Default for BidPolicy {
    fn default() -> Self {
        Self {
            allow_self_outbid: true,
            allow_seller_bids: false,
        }
    }
}

/// 검증 결과
#[derive(Debug, Clone, PartialEq)]
pub enum BidDecision {
    Accept,
    Reject(BidRejection),
}

/// 예상 가능한 입찰 거절 사유. 오류가 아니라 데이터로 다룬다.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BidRejection {
    #[error("Listing is not an auction")]
    NotAnAuction,

    #[error("Auction has not started")]
    AuctionNotStarted,

    #[error("Auction has ended")]
    AuctionEnded,

    #[error("Bid amount must be a finite positive number")]
    InvalidAmount,

    #[error("Bid must be higher than current bid {floor}")]
    BidTooLow { floor: f64 },

    #[error("Seller cannot bid on own listing")]
    SellerCannotBid,

    #[error("Already the highest bidder")]
    AlreadyHighestBidder,
}

impl BidRejection {
    pub fn code(&self) -> &'static str {
        match self {
            BidRejection::NotAnAuction => "NOT_AN_AUCTION",
            BidRejection::AuctionNotStarted => "NOT_STARTED",
            BidRejection::AuctionEnded => "ALREADY_ENDED",
            BidRejection::InvalidAmount => "INVALID_AMOUNT",
            BidRejection::BidTooLow { .. } => "LOW_BID",
            BidRejection::SellerCannotBid => "SELLER_CANNOT_BID",
            BidRejection::AlreadyHighestBidder => "ALREADY_LEADING",
        }
    }
}

/// 입찰 처리 실패
#[derive(Debug, Error)]
pub enum BidError {
    #[error("Auction not found: {0}")]
    NotFound(ListingId),

    #[error("Bid rejected: {0}")]
    Rejected(BidRejection),

    #[error("Bid on {0} could not be committed, retry")]
    Conflict(ListingId),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl BidError {
    pub fn code(&self) -> &'static str {
        match self {
            BidError::NotFound(_) => "NOT_FOUND",
            BidError::Rejected(rejection) => rejection.code(),
            BidError::Conflict(_) => "MAX_RETRIES_EXCEEDED",
            BidError::Storage(_) => "STORAGE_FAILURE",
        }
    }
}
