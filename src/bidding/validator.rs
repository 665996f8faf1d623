/// 입찰 검증
/// 레코드 스냅샷에 대해 입찰 허용 규칙을 순서대로 확인한다. 처음 실패한 규칙이 사유가 된다.
// region:    --- Imports
use super::model::{BidDecision, BidPolicy, BidRejection};
use crate::auction::model::Listing;
use chrono::{DateTime, Utc};
// endregion: --- Imports

// region:    --- Validator
pub fn validate(
    policy: &BidPolicy,
    listing: &Listing,
    now: DateTime<Utc>,
    bidder_id: &str,
    bid_amount: f64,
) -> BidDecision {
    match check(policy, listing, now, bidder_id, bid_amount) {
        Ok(()) => BidDecision::Accept,
        Err(rejection) => BidDecision::Reject(rejection),
    }
}

fn check(
    policy: &BidPolicy,
    listing: &Listing,
    now: DateTime<Utc>,
    bidder_id: &str,
    bid_amount: f64,
) -> Result<(), BidRejection> {
    // 1. 경매 여부
    let auction = listing.auction.as_ref().ok_or(BidRejection::NotAnAuction)?;

    // 2. 시간 창 [start, end)
    if now < auction.window.start_time {
        return Err(BidRejection::AuctionNotStarted);
    }
    if now >= auction.window.end_time {
        return Err(BidRejection::AuctionEnded);
    }

    // 3. 금액 형식
    if !bid_amount.is_finite() || bid_amount <= 0.0 {
        return Err(BidRejection::InvalidAmount);
    }

    // 4. 하한 초과
    let floor = listing.bid_floor();
    if bid_amount <= floor {
        return Err(BidRejection::BidTooLow { floor });
    }

    // 5. 입찰자 정책
    if !policy.allow_seller_bids && listing.owner == bidder_id {
        return Err(BidRejection::SellerCannotBid);
    }
    if !policy.allow_self_outbid && auction.highest_bidder.as_deref() == Some(bidder_id) {
        return Err(BidRejection::AlreadyHighestBidder);
    }

    Ok(())
}
// endregion: --- Validator
