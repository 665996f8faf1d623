/// 매물 저장소
/// 입찰 반영은 `commit_bid` 한 번의 조건부 연산으로만 일어난다.
// region:    --- Imports
use crate::auction::model::{
    AuctionWindow, BidSnapshot, Category, Listing, ListingId, NewListing, UserId,
};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryListingStore;
// endregion: --- Imports

// region:    --- Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: ListingId, reason: String },
}
// endregion: --- Store Error

// region:    --- Outcomes
/// 조건부 입찰 커밋 결과
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// 커밋된 뒤의 레코드
    Committed(Listing),
    /// 관측값이 더 이상 유효하지 않음 (다른 입찰이 먼저 커밋되었거나, 시간 창 밖)
    Stale,
}

/// 경매 재설정 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Reconfigured {
    Updated(Listing),
    BidsExist,
    NotFound,
}
// endregion: --- Outcomes

// region:    --- Listing Store Trait
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert(&self, owner: &UserId, listing: NewListing) -> Result<Listing, StoreError>;

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    /// 매물 전체 (생성 순)
    async fn find_all(&self) -> Result<Vec<Listing>, StoreError>;

    /// 경매 매물 전체 (생성 순)
    async fn find_auctions(&self) -> Result<Vec<Listing>, StoreError>;

    async fn find_by_category(&self, category: Category) -> Result<Vec<Listing>, StoreError>;

    /// `expected`가 여전히 레코드와 일치하고 커밋 시점의 시각이 시간 창 안일 때만
    /// 입찰가, 입찰 수, 최고 입찰자, 이력을 한꺼번에 갱신한다.
    /// 입찰 시각은 저장소가 이 원자적 단계 안에서 정하며, 직전 이력보다 앞서지 않는다.
    async fn commit_bid(
        &self,
        id: ListingId,
        expected: BidSnapshot,
        bidder: &UserId,
        amount: f64,
    ) -> Result<CommitOutcome, StoreError>;

    /// 입찰이 하나도 없을 때만 경매 설정을 바꾼다. `None`이면 경매를 해제한다.
    async fn reconfigure_auction(
        &self,
        id: ListingId,
        window: Option<AuctionWindow>,
    ) -> Result<Reconfigured, StoreError>;

    /// 매물과 경매 상태, 입찰 이력을 함께 삭제한다.
    async fn delete_by_id(&self, id: ListingId) -> Result<bool, StoreError>;
}
// endregion: --- Listing Store Trait
