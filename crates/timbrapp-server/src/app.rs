use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use timbrapp_core::config::TimbrappConfig;
use timbrapp_documents::DocumentStore;
use timbrapp_planner::PlannerStore;
use timbrapp_push::{PushService, PushStore};
use timbrapp_tracking::TrackingStore;
use timbrapp_users::UserStore;
use timbrapp_workforce::WorkforceStore;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cache::ResponseCache;

/// How long the dashboard aggregation response stays cached.
const DASHBOARD_CACHE_TTL: Duration = Duration::from_secs(30);

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: TimbrappConfig,
    pub users: UserStore,
    pub workforce: WorkforceStore,
    pub planner: PlannerStore,
    pub tracking: TrackingStore,
    pub documents: DocumentStore,
    pub push_store: Arc<PushStore>,
    pub push: PushService,
    pub dashboard_cache: ResponseCache,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: TimbrappConfig,
        users: UserStore,
        workforce: WorkforceStore,
        planner: PlannerStore,
        tracking: TrackingStore,
        documents: DocumentStore,
        push_store: Arc<PushStore>,
        push: PushService,
    ) -> Self {
        Self {
            config,
            users,
            workforce,
            planner,
            tracking,
            documents,
            push_store,
            push,
            dashboard_cache: ResponseCache::new(DASHBOARD_CACHE_TTL),
        }
    }
}

/// Assemble the full Axum router: the `/api` surface plus SPA serving.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(crate::http::health::health_handler))
        // auth & users
        .route("/auth/register", post(crate::http::auth::register))
        .route("/auth/login", post(crate::http::auth::login))
        .route("/auth/status", get(crate::http::auth::status))
        .route("/user", get(crate::http::auth::current_user))
        .route("/admin/users", get(crate::http::auth::admin_users))
        // commesse & locations
        .route(
            "/commesse",
            get(crate::http::commesse::list).post(crate::http::commesse::create),
        )
        .route(
            "/commesse/{id}",
            get(crate::http::commesse::detail)
                .put(crate::http::commesse::update)
                .delete(crate::http::commesse::remove),
        )
        .route(
            "/commesse/{id}/locations",
            get(crate::http::commesse::list_locations).post(crate::http::commesse::create_location),
        )
        .route(
            "/commesse/{id}/locations/{location_id}",
            put(crate::http::commesse::update_location)
                .delete(crate::http::commesse::remove_location),
        )
        // tasks & personale
        .route("/tasks", get(crate::http::tasks::list).post(crate::http::tasks::create))
        .route(
            "/tasks/{id}",
            get(crate::http::tasks::detail)
                .put(crate::http::tasks::update)
                .delete(crate::http::tasks::remove),
        )
        .route(
            "/tasks/{id}/personale",
            get(crate::http::tasks::personale).post(crate::http::tasks::set_personale),
        )
        // resource planner
        .route(
            "/resourcePlanner/assignments",
            get(crate::http::planner::list_assignments)
                .post(crate::http::planner::create_assignment),
        )
        .route(
            "/resourcePlanner/assignments/{id}",
            put(crate::http::planner::update_assignment)
                .delete(crate::http::planner::delete_assignment),
        )
        .route(
            "/resourcePlanner/tasks/{task_id}/shifts",
            post(crate::http::planner::create_task_shift),
        )
        // workforce
        .route(
            "/dipendenti",
            get(crate::http::workforce::list_dipendenti)
                .post(crate::http::workforce::create_dipendente),
        )
        .route(
            "/funzioni",
            get(crate::http::workforce::list_funzioni)
                .post(crate::http::workforce::create_funzione),
        )
        .route(
            "/skill",
            get(crate::http::workforce::list_skill).post(crate::http::workforce::create_skill),
        )
        // shifts & dashboard
        .route(
            "/shifts",
            get(crate::http::shifts::list).post(crate::http::shifts::create),
        )
        .route(
            "/shifts/today/group-by-commessa",
            get(crate::http::shifts::today_by_commessa),
        )
        .route(
            "/shifts/{id}",
            get(crate::http::shifts::detail)
                .put(crate::http::shifts::update)
                .delete(crate::http::shifts::remove),
        )
        // time clock, offline sync, requests
        .route(
            "/timbrature",
            get(crate::http::tracking::list_timbrature)
                .post(crate::http::tracking::create_timbratura),
        )
        .route("/sync", post(crate::http::tracking::sync_offline))
        .route(
            "/requests",
            get(crate::http::tracking::list_requests)
                .post(crate::http::tracking::create_request),
        )
        // documents
        .route(
            "/tipologie-documento",
            get(crate::http::documents::list_tipologie)
                .post(crate::http::documents::create_tipologia),
        )
        .route(
            "/tipologie-documento/{id}",
            get(crate::http::documents::get_tipologia)
                .put(crate::http::documents::update_tipologia)
                .delete(crate::http::documents::delete_tipologia),
        )
        .route(
            "/documenti",
            get(crate::http::documents::list_documenti)
                .post(crate::http::documents::create_documento),
        )
        .route(
            "/documenti/user/{user_id}",
            get(crate::http::documents::documenti_for_user),
        )
        .route(
            "/documenti/{id}",
            get(crate::http::documents::get_documento)
                .delete(crate::http::documents::delete_documento),
        )
        .route(
            "/documenti/{id}/stato-lettura",
            put(crate::http::documents::set_stato_lettura),
        )
        // web push & notifications
        .route(
            "/webpush/vapid-public-key",
            get(crate::http::webpush::vapid_public_key),
        )
        .route("/webpush/subscribe", post(crate::http::webpush::subscribe))
        .route("/webpush/test", post(crate::http::webpush::send_test))
        .route(
            "/webpush/subscriptions",
            get(crate::http::webpush::list_subscriptions),
        )
        .route(
            "/webpush/subscriptions/{id}",
            delete(crate::http::webpush::delete_subscription),
        )
        .route(
            "/notifications",
            get(crate::http::webpush::list_notifications)
                .post(crate::http::webpush::create_notification),
        )
        .route(
            "/notifications/read-all",
            put(crate::http::webpush::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(crate::http::webpush::mark_read),
        );

    let static_dir = state.config.server.static_dir.clone();
    Router::new()
        .nest("/api", api)
        .route(
            "/service-worker.js",
            get(crate::spa::service_worker_handler),
        )
        .fallback_service(crate::spa::spa_service(&static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}
