// region:    --- Imports
use crate::auction::model::{Category, ListingId, NewListing};
use crate::auth::CurrentUser;
use crate::bidding::commands::handle_place_bid;
use crate::bidding::model::{BidError, BidRejection, BidRequest, PlaceBidCommand};
use crate::clock::Clock;
use crate::config::BiddingConfig;
use crate::listings::commands::{
    handle_create_listing, handle_delete_listing, handle_reconfigure_auction, ListingError,
    ReconfigureAuctionCommand,
};
use crate::query;
use crate::store::{ListingStore, StoreError};
use crate::view;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- App State
/// 핸들러가 공유하는 의존성. 저장소와 시계는 main에서 만들어 주입한다.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub clock: Arc<dyn Clock>,
    pub bidding: BiddingConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ListingStore>,
        clock: Arc<dyn Clock>,
        bidding: BiddingConfig,
    ) -> Self {
        Self {
            store,
            clock,
            bidding,
        }
    }
}
// endregion: --- App State

// region:    --- Router
pub fn router(state: AppState) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/listings",
            get(handle_list_listings).post(handle_create_listing_request),
        )
        .route(
            "/listings/:id",
            get(handle_get_listing).delete(handle_delete_listing_request),
        )
        .route("/listings/:id/auction", put(handle_reconfigure_auction_request))
        .route("/listings/filter/:category", get(handle_filter_listings))
        .route("/auction/live", get(handle_live_auctions))
        .route("/auction/:id/bid", post(handle_bid))
        .route("/auction/:id/bids", get(handle_get_bid_history))
        .route("/api/auctions", get(handle_get_auction_feed))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
// endregion: --- Router

// region:    --- Error Responses
fn error_body(status: StatusCode, message: String, code: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message, "code": code })),
    )
        .into_response()
}

impl IntoResponse for BidError {
    fn into_response(self) -> Response {
        let status = match &self {
            BidError::NotFound(_) | BidError::Rejected(BidRejection::NotAnAuction) => {
                StatusCode::NOT_FOUND
            }
            BidError::Rejected(_) => StatusCode::BAD_REQUEST,
            BidError::Conflict(id) => {
                error!("{:<12} --> 입찰 충돌 id: {}", "HandlerBid", id);
                StatusCode::CONFLICT
            }
            BidError::Storage(e) => {
                error!("{:<12} --> 저장소 오류: {:?}", "HandlerBid", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match &self {
            BidError::NotFound(_) | BidError::Rejected(BidRejection::NotAnAuction) => {
                "Auction not found".to_string()
            }
            BidError::Rejected(rejection) => rejection.to_string(),
            BidError::Conflict(_) => "Too many concurrent bids, please retry".to_string(),
            BidError::Storage(_) => "Could not place bid".to_string(),
        };
        error_body(status, message, self.code())
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        let status = match &self {
            ListingError::NotFound(_) => StatusCode::NOT_FOUND,
            ListingError::Forbidden(_) => StatusCode::FORBIDDEN,
            ListingError::InvalidInput(_) | ListingError::InvalidWindow => StatusCode::BAD_REQUEST,
            ListingError::AuctionLocked(_) => StatusCode::CONFLICT,
            ListingError::Storage(e) => {
                error!("{:<12} --> 저장소 오류: {:?}", "HandlerList", e);
                return error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage failure".to_string(),
                    self.code(),
                );
            }
        };
        error_body(status, self.to_string(), self.code())
    }
}

fn storage_failure(tag: &str, e: StoreError) -> Response {
    error!("{:<12} --> 저장소 오류: {:?}", tag, e);
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Storage failure".to_string(),
        "STORAGE_FAILURE",
    )
}

fn not_found(what: &str) -> Response {
    error_body(
        StatusCode::NOT_FOUND,
        format!("{} not found", what),
        "NOT_FOUND",
    )
}
// endregion: --- Error Responses

// region:    --- Command Handlers

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    user: CurrentUser,
    listing_id: Result<Path<ListingId>, PathRejection>,
    payload: Result<Json<BidRequest>, JsonRejection>,
) -> Response {
    // 숫자가 아닌 id는 존재하지 않는 경매로 취급
    let Ok(Path(listing_id)) = listing_id else {
        return error_body(
            StatusCode::NOT_FOUND,
            "Auction not found".to_string(),
            "NOT_FOUND",
        );
    };
    info!(
        "{:<12} --> 입찰 요청 id: {} 사용자: {} ({})",
        "HandlerBid",
        listing_id,
        user.user_id,
        user.name.as_deref().unwrap_or("-")
    );

    // 본문 형식이 맞지 않으면 검증 전에 거절
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            warn!(
                "{:<12} --> 잘못된 입찰 본문 id: {}: {}",
                "HandlerBid",
                listing_id,
                rejection.body_text()
            );
            return BidError::Rejected(BidRejection::InvalidAmount).into_response();
        }
    };

    let cmd = PlaceBidCommand {
        listing_id,
        bidder_id: user.user_id,
        bid_amount: request.bid_amount,
    };

    match handle_place_bid(cmd, state.store.as_ref(), state.clock.as_ref(), &state.bidding).await
    {
        Ok(receipt) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "currentBid": receipt.current_bid,
                "totalBids": receipt.total_bids,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// 매물 생성
pub async fn handle_create_listing_request(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<NewListing>, JsonRejection>,
) -> Response {
    let Json(listing) = match payload {
        Ok(listing) => listing,
        Err(rejection) => {
            return ListingError::InvalidInput(rejection.body_text()).into_response();
        }
    };
    match handle_create_listing(&user.user_id, listing, state.store.as_ref()).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 경매 재설정
pub async fn handle_reconfigure_auction_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(listing_id): Path<ListingId>,
    payload: Result<Json<ReconfigureAuctionCommand>, JsonRejection>,
) -> Response {
    let Json(cmd) = match payload {
        Ok(cmd) => cmd,
        Err(rejection) => {
            return ListingError::InvalidInput(rejection.body_text()).into_response();
        }
    };
    match handle_reconfigure_auction(&user.user_id, listing_id, cmd, state.store.as_ref()).await
    {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 매물 삭제
pub async fn handle_delete_listing_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(listing_id): Path<ListingId>,
) -> Response {
    match handle_delete_listing(&user.user_id, listing_id, state.store.as_ref()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 매물 목록
pub async fn handle_list_listings(State(state): State<AppState>) -> Response {
    match query::handlers::list_listings(state.store.as_ref()).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => storage_failure("HandlerQuery", e),
    }
}

/// 매물 조회
pub async fn handle_get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
) -> Response {
    info!("{:<12} --> 매물 조회 id: {}", "HandlerQuery", listing_id);
    match query::handlers::get_listing(state.store.as_ref(), listing_id).await {
        Ok(Some(listing)) => Json(listing).into_response(),
        Ok(None) => not_found("Listing"),
        Err(e) => storage_failure("HandlerQuery", e),
    }
}

/// 카테고리별 매물 조회
pub async fn handle_filter_listings(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Response {
    let Ok(category) = category.parse::<Category>() else {
        return error_body(
            StatusCode::BAD_REQUEST,
            format!("Unknown category: {}", category),
            "INVALID_CATEGORY",
        );
    };
    match query::handlers::filter_by_category(state.store.as_ref(), category).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => storage_failure("HandlerQuery", e),
    }
}

/// 진행 중 경매 페이지
pub async fn handle_live_auctions(State(state): State<AppState>) -> Response {
    let now = state.clock.now();
    match query::handlers::list_live(state.store.as_ref(), now).await {
        Ok(auctions) => Html(view::render_live_auctions(&auctions)).into_response(),
        Err(e) => storage_failure("HandlerQuery", e),
    }
}

/// 공개 경매 피드
pub async fn handle_get_auction_feed(State(state): State<AppState>) -> Response {
    let now = state.clock.now();
    match query::handlers::public_feed(state.store.as_ref(), now).await {
        Ok(feed) => Json(feed).into_response(),
        Err(e) => storage_failure("HandlerQuery", e),
    }
}

/// 입찰 이력 조회
pub async fn handle_get_bid_history(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
) -> Response {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", listing_id);
    match query::handlers::get_bid_history(state.store.as_ref(), listing_id).await {
        Ok(Some(history)) => Json(history).into_response(),
        Ok(None) => not_found("Auction"),
        Err(e) => storage_failure("HandlerQuery", e),
    }
}

// endregion: --- Query Handlers
