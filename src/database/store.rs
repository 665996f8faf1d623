// region:    --- Imports
use super::queries;
use super::DatabaseManager;
use crate::auction::model::{
    Auction, AuctionWindow, BidEntry, BidSnapshot, Category, Image, Listing, ListingId,
    NewListing, UserId,
};
use crate::store::{CommitOutcome, ListingStore, Reconfigured, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Rows
#[derive(Debug, FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: String,
    image_url: Option<String>,
    image_filename: Option<String>,
    price: f64,
    location: String,
    country: Option<String>,
    category: String,
    owner_id: String,
    is_auction: bool,
    auction_start_time: Option<DateTime<Utc>>,
    auction_end_time: Option<DateTime<Utc>>,
    current_bid: f64,
    total_bids: i32,
    highest_bidder: Option<String>,
    created_at: DateTime<Utc>,
}

/// 조건부 입찰 반영 결과 행. 시간 창 확인에 쓴 데이터베이스 시각을 함께 받는다.
#[derive(Debug, FromRow)]
struct CommittedRow {
    #[sqlx(flatten)]
    listing: ListingRow,
    committed_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct BidRow {
    listing_id: i64,
    #[allow(dead_code)]
    seq: i32,
    bidder_id: String,
    amount: f64,
    placed_at: DateTime<Utc>,
}

impl From<BidRow> for BidEntry {
    fn from(row: BidRow) -> Self {
        BidEntry {
            bidder: row.bidder_id,
            amount: row.amount,
            timestamp: row.placed_at,
        }
    }
}

impl ListingRow {
    fn into_listing(self, bid_history: Vec<BidEntry>) -> Result<Listing, StoreError> {
        let corrupt = |reason: &str| StoreError::Corrupt {
            id: self.id,
            reason: reason.to_string(),
        };
        let category = self
            .category
            .parse::<Category>()
            .map_err(|e| corrupt(e.as_str()))?;
        let auction = if self.is_auction {
            let window = match (self.auction_start_time, self.auction_end_time) {
                (Some(start), Some(end)) => {
                    AuctionWindow::new(start, end).ok_or_else(|| corrupt("start >= end"))?
                }
                _ => return Err(corrupt("auction without time window")),
            };
            let total_bids =
                u32::try_from(self.total_bids).map_err(|_| corrupt("negative total_bids"))?;
            Some(Auction {
                window,
                current_bid: self.current_bid,
                total_bids,
                highest_bidder: self.highest_bidder.clone(),
                bid_history,
            })
        } else {
            None
        };
        let image = match (self.image_url, self.image_filename) {
            (Some(url), filename) => Some(Image {
                url,
                filename: filename.unwrap_or_default(),
            }),
            _ => None,
        };
        Ok(Listing {
            id: self.id,
            title: self.title,
            description: self.description,
            image,
            price: self.price,
            location: self.location,
            country: self.country,
            category,
            owner: self.owner_id,
            auction,
            created_at: self.created_at,
        })
    }
}
// endregion: --- Rows

// region:    --- Postgres Listing Store
/// PostgreSQL 저장소 구현체
pub struct PostgresListingStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresListingStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

/// 단건 매물 + 입찰 이력 조회
async fn load_listing(
    conn: &mut PgConnection,
    id: ListingId,
) -> Result<Option<Listing>, StoreError> {
    let Some(row) = sqlx::query_as::<_, ListingRow>(queries::GET_LISTING)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };
    with_history(conn, row).await.map(Some)
}

async fn with_history(conn: &mut PgConnection, row: ListingRow) -> Result<Listing, StoreError> {
    let history = if row.is_auction {
        sqlx::query_as::<_, BidRow>(queries::GET_BID_HISTORY)
            .bind(row.id)
            .fetch_all(&mut *conn)
            .await?
            .into_iter()
            .map(BidEntry::from)
            .collect()
    } else {
        Vec::new()
    };
    row.into_listing(history)
}

/// 여러 매물 + 입찰 이력 조회 (이력은 한 번의 쿼리로 가져온다)
async fn with_histories(
    conn: &mut PgConnection,
    rows: Vec<ListingRow>,
) -> Result<Vec<Listing>, StoreError> {
    let ids: Vec<i64> = rows.iter().filter(|r| r.is_auction).map(|r| r.id).collect();
    let mut histories: HashMap<i64, Vec<BidEntry>> = HashMap::new();
    if !ids.is_empty() {
        let bids = sqlx::query_as::<_, BidRow>(queries::GET_BID_HISTORIES)
            .bind(&ids)
            .fetch_all(&mut *conn)
            .await?;
        for bid in bids {
            histories.entry(bid.listing_id).or_default().push(bid.into());
        }
    }
    rows.into_iter()
        .map(|row| {
            let history = histories.remove(&row.id).unwrap_or_default();
            row.into_listing(history)
        })
        .collect()
}

#[async_trait]
impl ListingStore for PostgresListingStore {
    async fn insert(&self, owner: &UserId, listing: NewListing) -> Result<Listing, StoreError> {
        let window = listing.window();
        let owner = owner.clone();
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let (image_url, image_filename) = match listing.image {
                        Some(image) => (Some(image.url), Some(image.filename)),
                        None => (None, None),
                    };
                    let row = sqlx::query_as::<_, ListingRow>(queries::INSERT_LISTING)
                        .bind(&listing.title)
                        .bind(&listing.description)
                        .bind(image_url)
                        .bind(image_filename)
                        .bind(listing.price)
                        .bind(&listing.location)
                        .bind(&listing.country)
                        .bind(listing.category.as_str())
                        .bind(&owner)
                        .bind(window.is_some())
                        .bind(window.map(|w| w.start_time))
                        .bind(window.map(|w| w.end_time))
                        .fetch_one(&mut **tx)
                        .await?;
                    row.into_listing(Vec::new())
                })
            })
            .await
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        self.db_manager
            .snapshot(|tx| Box::pin(async move { load_listing(&mut **tx, id).await }))
            .await
    }

    async fn find_all(&self) -> Result<Vec<Listing>, StoreError> {
        self.db_manager
            .snapshot(|tx| {
                Box::pin(async move {
                    let rows = sqlx::query_as::<_, ListingRow>(queries::GET_ALL_LISTINGS)
                        .fetch_all(&mut **tx)
                        .await?;
                    with_histories(&mut **tx, rows).await
                })
            })
            .await
    }

    async fn find_auctions(&self) -> Result<Vec<Listing>, StoreError> {
        self.db_manager
            .snapshot(|tx| {
                Box::pin(async move {
                    let rows = sqlx::query_as::<_, ListingRow>(queries::GET_AUCTIONS)
                        .fetch_all(&mut **tx)
                        .await?;
                    with_histories(&mut **tx, rows).await
                })
            })
            .await
    }

    async fn find_by_category(&self, category: Category) -> Result<Vec<Listing>, StoreError> {
        self.db_manager
            .snapshot(|tx| {
                Box::pin(async move {
                    let rows = sqlx::query_as::<_, ListingRow>(queries::GET_LISTINGS_BY_CATEGORY)
                        .bind(category.as_str())
                        .fetch_all(&mut **tx)
                        .await?;
                    with_histories(&mut **tx, rows).await
                })
            })
            .await
    }

    async fn commit_bid(
        &self,
        id: ListingId,
        expected: BidSnapshot,
        bidder: &UserId,
        amount: f64,
    ) -> Result<CommitOutcome, StoreError> {
        let expected_total = i32::try_from(expected.total_bids).map_err(|_| StoreError::Corrupt {
            id,
            reason: "total_bids overflow".to_string(),
        })?;
        let bidder = bidder.clone();
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    // 조건부 갱신. 시간 창은 이 문장 안에서 읽은 데이터베이스 시각으로 확인한다.
                    // 동시에 들어온 다른 갱신이 먼저 커밋되면 조건이 다시 평가되어 0건이 된다.
                    let committed = sqlx::query_as::<_, CommittedRow>(queries::COMMIT_BID)
                        .bind(id)
                        .bind(amount)
                        .bind(&bidder)
                        .bind(expected.current_bid)
                        .bind(expected_total)
                        .fetch_optional(&mut **tx)
                        .await?;

                    let Some(CommittedRow { listing: row, committed_at }) = committed else {
                        warn!("{:<12} --> 조건부 입찰 반영 실패 id: {}", "Store", id);
                        return Ok(CommitOutcome::Stale);
                    };

                    // 입찰 이력 추가 (순번 = 갱신된 입찰 수)
                    sqlx::query(queries::INSERT_BID)
                        .bind(id)
                        .bind(row.total_bids)
                        .bind(&bidder)
                        .bind(amount)
                        .bind(committed_at)
                        .execute(&mut **tx)
                        .await?;

                    info!(
                        "{:<12} --> 입찰 반영: id {} 현재 가격 {} ({})",
                        "Store", id, row.current_bid, committed_at
                    );
                    with_history(&mut **tx, row).await.map(CommitOutcome::Committed)
                })
            })
            .await
    }

    async fn reconfigure_auction(
        &self,
        id: ListingId,
        window: Option<AuctionWindow>,
    ) -> Result<Reconfigured, StoreError> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let row = sqlx::query_as::<_, ListingRow>(queries::RECONFIGURE_AUCTION)
                        .bind(id)
                        .bind(window.is_some())
                        .bind(window.map(|w| w.start_time))
                        .bind(window.map(|w| w.end_time))
                        .fetch_optional(&mut **tx)
                        .await?;
                    if let Some(row) = row {
                        return row.into_listing(Vec::new()).map(Reconfigured::Updated);
                    }

                    // 0건: 매물이 없거나 입찰이 이미 있음
                    let exists = sqlx::query_scalar::<_, i32>(queries::GET_TOTAL_BIDS)
                        .bind(id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    Ok(match exists {
                        Some(_) => Reconfigured::BidsExist,
                        None => Reconfigured::NotFound,
                    })
                })
            })
            .await
    }

    async fn delete_by_id(&self, id: ListingId) -> Result<bool, StoreError> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let result = sqlx::query(queries::DELETE_LISTING)
                        .bind(id)
                        .execute(&mut **tx)
                        .await?;
                    Ok::<_, StoreError>(result.rows_affected() > 0)
                })
            })
            .await
    }
}
// endregion: --- Postgres Listing Store
