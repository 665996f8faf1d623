/// 매물 커맨드 처리
/// 1. 매물 생성 (경매 상태 초기화)
/// 2. 경매 재설정 (입찰이 없을 때만)
/// 3. 매물 삭제 (경매 상태와 입찰 이력 포함)
// region:    --- Imports
use crate::auction::model::{AuctionWindow, Listing, ListingId, NewListing, UserId};
use crate::store::{ListingStore, Reconfigured, StoreError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Errors
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Listing not found: {0}")]
    NotFound(ListingId),

    #[error("Only the owner can modify listing {0}")]
    Forbidden(ListingId),

    #[error("Invalid listing: {0}")]
    InvalidInput(String),

    #[error("Auction window must have start before end")]
    InvalidWindow,

    #[error("Auction {0} already has bids and cannot be reconfigured")]
    AuctionLocked(ListingId),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl ListingError {
    pub fn code(&self) -> &'static str {
        match self {
            ListingError::NotFound(_) => "NOT_FOUND",
            ListingError::Forbidden(_) => "FORBIDDEN",
            ListingError::InvalidInput(_) => "INVALID_INPUT",
            ListingError::InvalidWindow => "INVALID_WINDOW",
            ListingError::AuctionLocked(_) => "AUCTION_LOCKED",
            ListingError::Storage(_) => "STORAGE_FAILURE",
        }
    }
}
// endregion: --- Errors

// region:    --- Commands
/// 경매 재설정 명령
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigureAuctionCommand {
    pub is_auction: bool,
    #[serde(default)]
    pub auction_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auction_end_time: Option<DateTime<Utc>>,
}

impl ReconfigureAuctionCommand {
    fn window(&self) -> Result<Option<AuctionWindow>, ListingError> {
        if !self.is_auction {
            return Ok(None);
        }
        match (self.auction_start_time, self.auction_end_time) {
            (Some(start), Some(end)) => AuctionWindow::new(start, end)
                .map(Some)
                .ok_or(ListingError::InvalidWindow),
            _ => Err(ListingError::InvalidWindow),
        }
    }
}

/// 1. 매물 생성
pub async fn handle_create_listing(
    owner: &UserId,
    listing: NewListing,
    store: &dyn ListingStore,
) -> Result<Listing, ListingError> {
    info!("{:<12} --> 매물 생성 요청: {}", "Command", listing.title);

    if listing.title.trim().is_empty() {
        return Err(ListingError::InvalidInput("title is required".to_string()));
    }
    if !listing.price.is_finite() || listing.price < 0.0 {
        return Err(ListingError::InvalidInput(
            "price must be a finite non-negative number".to_string(),
        ));
    }
    if listing.is_auction && listing.window().is_none() {
        return Err(ListingError::InvalidWindow);
    }

    let created = store.insert(owner, listing).await?;
    info!(
        "{:<12} --> 매물 생성 완료 id: {} (경매: {})",
        "Command",
        created.id,
        created.is_auction()
    );
    Ok(created)
}

/// 2. 경매 재설정
pub async fn handle_reconfigure_auction(
    caller: &UserId,
    listing_id: ListingId,
    cmd: ReconfigureAuctionCommand,
    store: &dyn ListingStore,
) -> Result<Listing, ListingError> {
    info!("{:<12} --> 경매 재설정 요청 id: {}", "Command", listing_id);
    let window = cmd.window()?;
    ensure_owner(caller, listing_id, store).await?;

    match store.reconfigure_auction(listing_id, window).await? {
        Reconfigured::Updated(listing) => Ok(listing),
        Reconfigured::BidsExist => {
            warn!(
                "{:<12} --> 입찰이 있는 경매는 재설정할 수 없음 id: {}",
                "Command", listing_id
            );
            Err(ListingError::AuctionLocked(listing_id))
        }
        Reconfigured::NotFound => Err(ListingError::NotFound(listing_id)),
    }
}

/// 3. 매물 삭제
pub async fn handle_delete_listing(
    caller: &UserId,
    listing_id: ListingId,
    store: &dyn ListingStore,
) -> Result<(), ListingError> {
    info!("{:<12} --> 매물 삭제 요청 id: {}", "Command", listing_id);
    ensure_owner(caller, listing_id, store).await?;

    if store.delete_by_id(listing_id).await? {
        Ok(())
    } else {
        Err(ListingError::NotFound(listing_id))
    }
}

async fn ensure_owner(
    caller: &UserId,
    listing_id: ListingId,
    store: &dyn ListingStore,
) -> Result<(), ListingError> {
    let listing = store
        .find_by_id(listing_id)
        .await?
        .ok_or(ListingError::NotFound(listing_id))?;
    if &listing.owner != caller {
        return Err(ListingError::Forbidden(listing_id));
    }
    Ok(())
}
// endregion: --- Commands
