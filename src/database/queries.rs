/// 매물 컬럼 목록
macro_rules! listing_columns {
    () => {
        "id, title, description, image_url, image_filename, price, location, country, category, \
         owner_id, is_auction, auction_start_time, auction_end_time, current_bid, total_bids, \
         highest_bidder, created_at"
    };
}

/// 매물 생성
pub const INSERT_LISTING: &str = concat!(
    "INSERT INTO listings (title, description, image_url, image_filename, price, location, country, \
     category, owner_id, is_auction, auction_start_time, auction_end_time, current_bid) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $5) RETURNING ",
    listing_columns!()
);

/// 매물 조회
pub const GET_LISTING: &str = concat!("SELECT ", listing_columns!(), " FROM listings WHERE id = $1");

/// 읽기 트랜잭션을 하나의 스냅샷으로 고정 (매물 행과 입찰 이력을 같은 시점에서 읽는다)
pub const SET_READ_SNAPSHOT: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// 매물 전체 조회
pub const GET_ALL_LISTINGS: &str = concat!("SELECT ", listing_columns!(), " FROM listings ORDER BY id");

/// 경매 매물 전체 조회
pub const GET_AUCTIONS: &str = concat!(
    "SELECT ",
    listing_columns!(),
    " FROM listings WHERE is_auction ORDER BY id"
);

/// 카테고리별 조회
pub const GET_LISTINGS_BY_CATEGORY: &str = concat!(
    "SELECT ",
    listing_columns!(),
    " FROM listings WHERE category = $1 ORDER BY id"
);

/// 입찰 이력 조회 (단건)
pub const GET_BID_HISTORY: &str = r#"
    SELECT listing_id, seq, bidder_id, amount, placed_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY seq
"#;

/// 입찰 이력 조회 (여러 건)
pub const GET_BID_HISTORIES: &str = r#"
    SELECT listing_id, seq, bidder_id, amount, placed_at
    FROM bids
    WHERE listing_id = ANY($1)
    ORDER BY listing_id, seq
"#;

/// 조건부 입찰 반영. 관측한 입찰가/입찰 수가 그대로이고 문장 실행 시각이 시간 창 안일 때만 갱신된다.
/// 시간 창 확인에 쓴 시각을 `committed_at`으로 돌려준다.
pub const COMMIT_BID: &str = concat!(
    "WITH commit_clock AS (SELECT clock_timestamp() AS committed_at) \
     UPDATE listings SET current_bid = $2, highest_bidder = $3, total_bids = total_bids + 1 \
     FROM commit_clock \
     WHERE id = $1 AND is_auction AND current_bid = $4 AND total_bids = $5 \
     AND auction_start_time <= commit_clock.committed_at \
     AND auction_end_time > commit_clock.committed_at RETURNING ",
    listing_columns!(),
    ", commit_clock.committed_at"
);

/// 입찰 이력 추가. 시각은 직전 이력보다 앞서지 않게 맞춘다.
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, seq, bidder_id, amount, placed_at)
    SELECT $1, $2, $3, $4,
           GREATEST($5, (SELECT max(placed_at) FROM bids WHERE listing_id = $1))
"#;

/// 경매 재설정. 입찰이 없을 때만 갱신된다.
pub const RECONFIGURE_AUCTION: &str = concat!(
    "UPDATE listings SET is_auction = $2, auction_start_time = $3, auction_end_time = $4, \
     current_bid = price, highest_bidder = NULL \
     WHERE id = $1 AND total_bids = 0 RETURNING ",
    listing_columns!()
);

/// 입찰 수 조회
pub const GET_TOTAL_BIDS: &str = "SELECT total_bids FROM listings WHERE id = $1";

/// 매물 삭제 (입찰 이력은 cascade)
pub const DELETE_LISTING: &str = "DELETE FROM listings WHERE id = $1";
