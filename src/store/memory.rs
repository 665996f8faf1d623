/// 메모리 저장소
/// 매물 단위의 조건부 갱신을 하나의 쓰기 잠금 안에서 수행한다.
/// 입찰 시각도 같은 잠금 안에서 시계를 읽어 정한다.
// region:    --- Imports
use super::{CommitOutcome, ListingStore, Reconfigured, StoreError};
use crate::auction::model::{
    Auction, AuctionWindow, BidEntry, BidSnapshot, Category, Listing, ListingId, NewListing,
    UserId,
};
use crate::clock::Clock;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;
// endregion: --- Imports

// region:    --- Memory Listing Store
pub struct MemoryListingStore {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
}

#[derive(Default)]
struct Inner {
    next_id: ListingId,
    listings: BTreeMap<ListingId, Listing>,
}

impl MemoryListingStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            clock,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Inner) -> R) -> Result<R, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&inner))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> Result<R, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut inner))
    }

    fn collect(&self, keep: impl Fn(&Listing) -> bool) -> Result<Vec<Listing>, StoreError> {
        self.read(|inner| {
            inner
                .listings
                .values()
                .filter(|l| keep(l))
                .cloned()
                .collect()
        })
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn insert(&self, owner: &UserId, listing: NewListing) -> Result<Listing, StoreError> {
        let auction = listing.window().map(|w| Auction::open(w, listing.price));
        let created_at = self.clock.now();
        self.write(|inner| {
            inner.next_id += 1;
            let record = Listing {
                id: inner.next_id,
                title: listing.title,
                description: listing.description,
                image: listing.image,
                price: listing.price,
                location: listing.location,
                country: listing.country,
                category: listing.category,
                owner: owner.clone(),
                auction,
                created_at,
            };
            inner.listings.insert(record.id, record.clone());
            record
        })
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        self.read(|inner| inner.listings.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Listing>, StoreError> {
        self.collect(|_| true)
    }

    async fn find_auctions(&self) -> Result<Vec<Listing>, StoreError> {
        self.collect(Listing::is_auction)
    }

    async fn find_by_category(&self, category: Category) -> Result<Vec<Listing>, StoreError> {
        self.collect(|l| l.category == category)
    }

    async fn commit_bid(
        &self,
        id: ListingId,
        expected: BidSnapshot,
        bidder: &UserId,
        amount: f64,
    ) -> Result<CommitOutcome, StoreError> {
        self.write(|inner| {
            let Some(listing) = inner.listings.get_mut(&id) else {
                return CommitOutcome::Stale;
            };
            let Some(auction) = listing.auction.as_mut() else {
                return CommitOutcome::Stale;
            };

            // 잠금을 잡은 뒤의 시각으로 시간 창을 확인한다
            let now = self.clock.now();
            let in_window = auction.window.start_time <= now && now < auction.window.end_time;
            if auction.snapshot() != expected || !in_window {
                debug!("{:<12} --> 조건 불일치 id: {} ({})", "MemoryStore", id, now);
                return CommitOutcome::Stale;
            }

            // 이력 타임스탬프는 단조 증가
            let timestamp = auction.last_bid_at().map_or(now, |last| last.max(now));
            auction.apply(BidEntry {
                bidder: bidder.clone(),
                amount,
                timestamp,
            });
            CommitOutcome::Committed(listing.clone())
        })
    }

    async fn reconfigure_auction(
        &self,
        id: ListingId,
        window: Option<AuctionWindow>,
    ) -> Result<Reconfigured, StoreError> {
        self.write(|inner| {
            let Some(listing) = inner.listings.get_mut(&id) else {
                return Reconfigured::NotFound;
            };
            if listing
                .auction
                .as_ref()
                .is_some_and(|auction| auction.total_bids > 0)
            {
                return Reconfigured::BidsExist;
            }
            listing.auction = window.map(|w| Auction::open(w, listing.price));
            Reconfigured::Updated(listing.clone())
        })
    }

    async fn delete_by_id(&self, id: ListingId) -> Result<bool, StoreError> {
        self.write(|inner| inner.listings.remove(&id).is_some())
    }
}
// endregion: --- Memory Listing Store
