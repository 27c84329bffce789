//! HTTP server for the Influmatch API.
//!
//! # API Endpoints
//!
//! | Method | Path                                   | Description                     |
//! |--------|----------------------------------------|---------------------------------|
//! | GET    | `/health`                              | Health check                    |
//! | GET    | `/api/influencers`                     | Search and filter the catalog   |
//! | GET    | `/api/influencers/{id}`                | One influencer                  |
//! | GET    | `/api/searches`                        | Recent searches                 |
//! | POST   | `/api/searches`                        | Submit a search query           |
//! | GET    | `/api/wishlist`                        | All folders                     |
//! | POST   | `/api/wishlist/toggle/{id}`            | Toggle membership in "All"      |
//! | POST   | `/api/wishlist/folders`                | Create a folder                 |
//! | POST   | `/api/wishlist/folders/{name}/items`   | Add an influencer to a folder   |
//! | PATCH  | `/api/wishlist/folders/{name}`         | Rename a folder                 |
//! | DELETE | `/api/wishlist/folders/{name}`         | Delete a folder                 |
//! | GET    | `/api/drafts/{step}`                   | Load a wizard step              |
//! | PUT    | `/api/drafts/{step}`                   | Autosave a wizard step          |
//! | POST   | `/api/drafts/{step}/next`              | Validate and advance            |
//! | POST   | `/api/drafts/submit`                   | Create the campaign             |
//! | DELETE | `/api/drafts`                          | Discard the draft               |
//! | GET    | `/api/campaigns`                       | Campaigns, newest first         |
//! | GET    | `/api/campaigns/{id}`                  | Campaign detail                 |
//! | PATCH  | `/api/campaigns/{id}`                  | Rename a campaign               |
//! | POST   | `/api/campaigns/{id}/end`              | Mark a campaign completed       |
//! | POST   | `/api/session`                         | Login/logout notification       |
//! | GET    | `/api/logs`                            | SSE activity stream             |

use axum::{
    extract::{Path, Query, State},
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, ACTIVITY};
use super::types::{
    AddToFolderRequest, CreateFolderRequest, InfluencerCard, RenameCampaignRequest,
    RenameFolderRequest, SearchParams, SearchResponse, StepResponse, SubmitResponse,
    SubmitSearchRequest, WishlistResponse,
};
use crate::campaign::{DraftAssembler, WizardStep};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{ServerError, ServerResult};
use crate::models::Campaign;
use crate::navigation::{Route, Screen};
use crate::search::{filter_influencers, RecentSearches};
use crate::session::{SessionEvent, SessionObserver};
use crate::storage::{FileStore, KeyValueStore};
use crate::wishlist::SharedWishlist;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub wishlist: SharedWishlist,
    pub searches: Arc<RwLock<RecentSearches>>,
    pub drafts: DraftAssembler,
    pub session: Arc<RwLock<SessionObserver>>,
}

impl AppState {
    pub fn new(catalog: Catalog, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            wishlist: SharedWishlist::default(),
            searches: Arc::new(RwLock::new(RecentSearches::new())),
            drafts: DraftAssembler::new(store),
            session: Arc::new(RwLock::new(SessionObserver::new())),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/influencers", get(search_influencers))
        .route("/api/influencers/{id}", get(get_influencer))
        .route("/api/searches", get(recent_searches).post(submit_search))
        .route("/api/wishlist", get(get_wishlist))
        .route("/api/wishlist/toggle/{id}", post(toggle_wishlist))
        .route("/api/wishlist/folders", post(create_folder))
        .route(
            "/api/wishlist/folders/{name}",
            axum::routing::patch(rename_folder).delete(delete_folder),
        )
        .route("/api/wishlist/folders/{name}/items", post(add_to_folder))
        .route("/api/drafts", axum::routing::delete(clear_draft))
        .route("/api/drafts/submit", post(submit_draft))
        .route("/api/drafts/{step}", get(load_step).put(save_step))
        .route("/api/drafts/{step}/next", post(advance_step))
        .route("/api/campaigns", get(list_campaigns))
        .route("/api/campaigns/{id}", get(get_campaign).patch(rename_campaign))
        .route("/api/campaigns/{id}/end", post(end_campaign))
        .route("/api/session", post(session_event))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server with file-backed storage.
pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::with_dir(&config.storage_dir));
    let state = AppState::new(Catalog::builtin(), store);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚀 Influmatch server running on http://localhost:{}", config.port);
    println!("   Storage: {}", config.storage_dir.display());
    println!("   GET  /api/influencers - Search the catalog");
    println!("   GET  /api/campaigns   - Campaign list");
    println!("   GET  /api/logs        - SSE activity stream");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "influmatch",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// Catalog
// =============================================================================

async fn search_influencers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<SearchResponse>> {
    let criteria = params.criteria();
    let warnings = criteria.validate();
    if !warnings.is_empty() {
        return Err(ServerError::Validation(warnings));
    }

    let query = params.q.as_deref().unwrap_or("");
    let matches = filter_influencers(state.catalog.all(), query, params.chip.as_deref(), &criteria);
    let influencers = state
        .wishlist
        .read(|w| {
            matches
                .iter()
                .map(|i| InfluencerCard::new(i, w.is_wished(&i.id)))
                .collect::<Vec<_>>()
        })
        .await;

    Ok(Json(SearchResponse {
        total: influencers.len(),
        influencers,
        criteria,
    }))
}

async fn get_influencer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<InfluencerCard>> {
    let influencer = state
        .catalog
        .get(&id)
        .ok_or_else(|| ServerError::NotFound(format!("influencer {}", id)))?;
    let wished = state.wishlist.read(|w| w.is_wished(&id)).await;
    Ok(Json(InfluencerCard::new(influencer, wished)))
}

async fn recent_searches(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.searches.read().await.entries())
}

/// Record a submitted query. Filtering alone never touches the list.
async fn submit_search(
    State(state): State<AppState>,
    Json(body): Json<SubmitSearchRequest>,
) -> Json<Vec<String>> {
    let mut searches = state.searches.write().await;
    searches.record(&body.query);
    Json(searches.entries())
}

// =============================================================================
// Wishlist
// =============================================================================

async fn wishlist_response(state: &AppState) -> Json<WishlistResponse> {
    let folders = state.wishlist.read(|w| w.folders()).await;
    Json(WishlistResponse { folders })
}

fn require_influencer(state: &AppState, id: &str) -> ServerResult<()> {
    if state.catalog.contains(id) {
        Ok(())
    } else {
        Err(ServerError::NotFound(format!("influencer {}", id)))
    }
}

fn require_name(name: &str) -> ServerResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        Err(ServerError::BadRequest("Folder name must not be empty".into()))
    } else {
        Ok(name)
    }
}

async fn get_wishlist(State(state): State<AppState>) -> Json<WishlistResponse> {
    wishlist_response(&state).await
}

async fn toggle_wishlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    require_influencer(&state, &id)?;
    let wished = state
        .wishlist
        .update(|w| {
            w.toggle(&id);
            w.is_wished(&id)
        })
        .await;
    log_info("wishlist", format!("Influencer {} wished: {}", id, wished));
    Ok(Json(json!({ "influencerId": id, "wished": wished })))
}

async fn create_folder(
    State(state): State<AppState>,
    Json(body): Json<CreateFolderRequest>,
) -> ServerResult<Json<WishlistResponse>> {
    let name = require_name(&body.name)?;
    state.wishlist.update(|w| w.create_folder(name)).await;
    Ok(wishlist_response(&state).await)
}

async fn add_to_folder(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<AddToFolderRequest>,
) -> ServerResult<Json<WishlistResponse>> {
    let name = require_name(&name)?;
    require_influencer(&state, &body.influencer_id)?;
    state
        .wishlist
        .update(|w| w.add_to_folder(&body.influencer_id, name))
        .await;
    log_info("wishlist", format!("Added {} to '{}'", body.influencer_id, name));
    Ok(wishlist_response(&state).await)
}

async fn rename_folder(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<RenameFolderRequest>,
) -> ServerResult<Json<WishlistResponse>> {
    let new_name = require_name(&body.new_name)?;
    state.wishlist.update(|w| w.rename_folder(&name, new_name)).await;
    Ok(wishlist_response(&state).await)
}

async fn delete_folder(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<WishlistResponse> {
    state.wishlist.update(|w| w.delete_folder(&name)).await;
    wishlist_response(&state).await
}

// =============================================================================
// Drafts
// =============================================================================

fn parse_step(raw: &str) -> ServerResult<WizardStep> {
    WizardStep::parse(raw).ok_or_else(|| ServerError::NotFound(format!("step {}", raw)))
}

async fn load_step(
    State(state): State<AppState>,
    Path(step): Path<String>,
) -> ServerResult<Json<StepResponse>> {
    let step = parse_step(&step)?;
    let data = state.drafts.load_value(step).await;
    Ok(Json(StepResponse {
        step,
        data,
        next: Route::new(step.screen()),
    }))
}

async fn save_step(
    State(state): State<AppState>,
    Path(step): Path<String>,
    Json(body): Json<Value>,
) -> ServerResult<Json<StepResponse>> {
    let step = parse_step(&step)?;
    let data = state.drafts.save_value(step, body).await?;
    Ok(Json(StepResponse {
        step,
        data,
        next: Route::new(step.screen()),
    }))
}

async fn advance_step(
    State(state): State<AppState>,
    Path(step): Path<String>,
) -> ServerResult<Json<StepResponse>> {
    let step = parse_step(&step)?;
    let next = state.drafts.advance(step).await?;
    let data = state.drafts.load_value(next).await;
    Ok(Json(StepResponse {
        step: next,
        data,
        next: Route::new(next.screen()),
    }))
}

async fn submit_draft(State(state): State<AppState>) -> ServerResult<Json<SubmitResponse>> {
    let campaign = state.drafts.submit().await?;
    Ok(Json(SubmitResponse {
        campaign,
        next: Route::new(Screen::Campaigns),
    }))
}

async fn clear_draft(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    state.drafts.clear().await?;
    Ok(Json(json!({ "status": "ok" })))
}

// =============================================================================
// Campaigns
// =============================================================================

async fn list_campaigns(State(state): State<AppState>) -> Json<Vec<Campaign>> {
    Json(state.drafts.campaigns().list().await)
}

async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Campaign>> {
    Ok(Json(state.drafts.campaigns().get(&id).await?))
}

async fn rename_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RenameCampaignRequest>,
) -> ServerResult<Json<Campaign>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ServerError::BadRequest("Campaign name must not be empty".into()));
    }
    Ok(Json(state.drafts.campaigns().rename(&id, name).await?))
}

async fn end_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Campaign>> {
    Ok(Json(state.drafts.campaigns().end(&id).await?))
}

// =============================================================================
// Session & Logs
// =============================================================================

async fn session_event(
    State(state): State<AppState>,
    Json(event): Json<SessionEvent>,
) -> Json<SessionObserver> {
    let mut session = state.session.write().await;
    session.observe(event);
    Json(session.clone())
}

/// SSE endpoint for real-time activity streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = ACTIVITY.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
