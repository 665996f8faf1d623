/// 입찰 커맨드 처리
/// 스냅샷 조회 → 검증 → 조건부 커밋. 커밋 조건이 깨지면 새 스냅샷으로 다시 검증한다.
// region:    --- Imports
use super::model::{BidDecision, BidError, BidReceipt, PlaceBidCommand};
use super::validator::validate;
use crate::clock::Clock;
use crate::config::BiddingConfig;
use crate::store::{CommitOutcome, ListingStore};
use tokio::time;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    store: &dyn ListingStore,
    clock: &dyn Clock,
    config: &BiddingConfig,
) -> Result<BidReceipt, BidError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let listing_id = cmd.listing_id;

    // 제한 시간 안에 커밋하지 못하면 아무것도 반영되지 않은 채 충돌로 끝난다
    match time::timeout(config.timeout, place_bid_with_retries(&cmd, store, clock, config)).await
    {
        Ok(result) => result,
        Err(_) => {
            error!(
                "{:<12} --> 입찰 제한 시간 초과 id: {} ({:?})",
                "Command", listing_id, config.timeout
            );
            Err(BidError::Conflict(listing_id))
        }
    }
}

async fn place_bid_with_retries(
    cmd: &PlaceBidCommand,
    store: &dyn ListingStore,
    clock: &dyn Clock,
    config: &BiddingConfig,
) -> Result<BidReceipt, BidError> {
    let listing_id = cmd.listing_id;

    for attempt in 1..=config.max_retries.max(1) {
        // 최신 스냅샷 조회
        let listing = store
            .find_by_id(listing_id)
            .await?
            .ok_or(BidError::NotFound(listing_id))?;

        // 사전 검증용 시각. 시간 창은 커밋 단계에서 저장소가 다시 확인한다.
        let now = clock.now();

        if let BidDecision::Reject(rejection) = validate(
            &config.policy,
            &listing,
            now,
            &cmd.bidder_id,
            cmd.bid_amount,
        ) {
            info!(
                "{:<12} --> 입찰 거절 id: {} ({})",
                "Command",
                listing_id,
                rejection.code()
            );
            return Err(BidError::Rejected(rejection));
        }

        let Some(auction) = listing.auction.as_ref() else {
            return Err(BidError::NotFound(listing_id));
        };

        match store
            .commit_bid(listing_id, auction.snapshot(), &cmd.bidder_id, cmd.bid_amount)
            .await?
        {
            CommitOutcome::Committed(updated) => {
                let auction = updated.auction.ok_or(BidError::NotFound(listing_id))?;
                info!(
                    "{:<12} --> 입찰 성공 id: {} 현재 가격 {} (총 {}건)",
                    "Command", listing_id, auction.current_bid, auction.total_bids
                );
                return Ok(BidReceipt {
                    current_bid: auction.current_bid,
                    total_bids: auction.total_bids,
                });
            }
            CommitOutcome::Stale => {
                warn!(
                    "{:<12} --> 조건부 커밋 충돌: 재시도 ({}/{})",
                    "Command", attempt, config.max_retries
                );
                tokio::task::yield_now().await;
            }
        }
    }

    error!(
        "{:<12} --> 최대 재시도 횟수 초과 id: {}",
        "Command", listing_id
    );
    Err(BidError::Conflict(listing_id))
}
// endregion: --- Commands
