use anyhow::Context;
use axum::Router;
use axum::routing::{get, patch, post};
use axum_prometheus::PrometheusMetricLayer;
use tokio::net;

use crate::domain::AppState;
use handlers::content::{
    create_artist, create_artwork, create_event, create_venue, force_unpublish, publish_artwork,
    readiness, submit, update_artist, update_event, update_venue,
};
use handlers::health_check;
use handlers::submissions::{decide_submission, moderation_queue, my_submissions};

mod api;
mod auth;
mod handlers;
mod querystring;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(state: impl AppState, config: HttpServerConfig<'_>) -> anyhow::Result<Self> {
        let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("http_request", method = ?request.method(), uri)
            },
        );
        // see: https://github.com/Ptrskay3/axum-prometheus
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let router = router(state)
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(trace_layer)
            .layer(prometheus_layer);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server.
    pub async fn run(self) -> anyhow::Result<()> {
        let address = self
            .listener
            .local_addr()
            .context("listener has no local address")?;
        tracing::debug!("listening on {}", address);
        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

/// Application routes without the metrics and tracing layers
pub fn router<S: AppState>(state: S) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route("/artists", post(create_artist::<S>))
        .route("/artists/{id}", patch(update_artist::<S>))
        .route("/venues", post(create_venue::<S>))
        .route("/venues/{id}", patch(update_venue::<S>))
        .route("/events", post(create_event::<S>))
        .route("/events/{id}", patch(update_event::<S>))
        .route("/artworks", post(create_artwork::<S>))
        .route("/content/{kind}/{id}/readiness", get(readiness::<S>))
        .route("/content/{kind}/{id}/submit", post(submit::<S>))
        .route("/submissions/mine", get(my_submissions::<S>))
        .route("/admin/submissions", get(moderation_queue::<S>))
        .route("/admin/submissions/{id}/decision", post(decide_submission::<S>))
        .route("/admin/artworks/{id}/publish", post(publish_artwork::<S>))
        .route("/admin/content/{kind}/{id}/unpublish", post(force_unpublish::<S>))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use vernissage_common::{AssetId, Role, SubmissionStatus};

    use crate::domain::content::fixtures;
    use crate::domain::moderation::ModerationSettings;
    use crate::domain::notification::NotificationType;
    use crate::infrastructure::AppStateImpl;
    use crate::infrastructure::persistence::memory::InMemoryRepository;

    use super::*;

    struct TestApp {
        repo: InMemoryRepository,
        router: Router,
    }

    impl TestApp {
        fn new() -> Self {
            let repo = InMemoryRepository::default();
            let state = AppStateImpl::new(repo.clone(), ModerationSettings::default());
            Self {
                repo,
                router: router(state),
            }
        }

        /// Creates a user with a live session and returns the bearer token
        fn login(&self, email: &str, role: Role) -> String {
            let actor = self.repo.add_user(email, role);
            let token = format!("token-{}", email);
            self.repo
                .add_session(&token, actor.user_id, Utc::now() + Duration::hours(1));
            token
        }

        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let body = match body {
                Some(json) => {
                    request = request.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };

            let response = self
                .router
                .clone()
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }
    }

    fn ready_venue() -> Value {
        json!({
            "name": "Harbour Hall",
            "description": "Former boat shed turned gallery.",
            "city": "Lisbon",
            "country": "PT",
            "coverAssetId": AssetId::generate(),
        })
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = TestApp::new();
        let (status, _) = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn anonymous_submit_is_unauthorized() {
        let app = TestApp::new();
        let uri = format!("/api/content/venues/{}/submit", AssetId::generate());

        let (status, body) = app.call(Method::POST, &uri, None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["data"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn expired_session_is_anonymous() {
        let app = TestApp::new();
        let actor = app.repo.add_user("late@example.com", Role::User);
        app.repo
            .add_session("stale", actor.user_id, Utc::now() - Duration::minutes(1));

        let (status, _) = app
            .call(Method::POST, "/api/venues", Some("stale"), Some(ready_venue()))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn venue_goes_from_draft_to_published() {
        let app = TestApp::new();
        let owner = app.login("owner@example.com", Role::User);
        let editor = app.login("editor@example.com", Role::Editor);

        let (status, created) = app
            .call(Method::POST, "/api/venues", Some(&owner), Some(ready_venue()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["submission"]["status"], "DRAFT");
        let venue_id = created["entity"]["id"].as_str().unwrap().to_string();

        let (status, readiness) = app
            .call(
                Method::GET,
                &format!("/api/content/venues/{}/readiness", venue_id),
                Some(&owner),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(readiness["ready"], true);

        let (status, submitted) = app
            .call(
                Method::POST,
                &format!("/api/content/venues/{}/submit", venue_id),
                Some(&owner),
                Some(json!({ "note": "Opening in May" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(submitted["status"], "SUBMITTED");
        assert_eq!(submitted["note"], "Opening in May");
        let submission_id = submitted["id"].as_str().unwrap().to_string();

        let (status, queue) = app
            .call(Method::GET, "/api/admin/submissions?limit=10", Some(&editor), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(queue["data"].as_array().unwrap().len(), 1);
        assert_eq!(queue["meta"]["limit"], 10);

        let (status, decided) = app
            .call(
                Method::POST,
                &format!("/api/admin/submissions/{}/decision", submission_id),
                Some(&editor),
                Some(json!({ "action": "approve" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decided["status"], "APPROVED");

        let outbox = app.repo.outbox();
        assert_eq!(outbox.len(), 2);
        assert_eq!(
            outbox[1].notification_type,
            NotificationType::SubmissionApproved
        );

        let (status, body) = app
            .call(
                Method::POST,
                &format!("/api/content/venues/{}/submit", venue_id),
                Some(&owner),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["data"]["code"], "ALREADY_APPROVED");
    }

    #[tokio::test]
    async fn incomplete_venue_lists_blocking_issues() {
        let app = TestApp::new();
        let owner = app.login("owner@example.com", Role::User);

        let (_, created) = app
            .call(
                Method::POST,
                "/api/venues",
                Some(&owner),
                Some(json!({ "name": "Back Room" })),
            )
            .await;
        let venue_id = created["entity"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .call(
                Method::POST,
                &format!("/api/content/venues/{}/submit", venue_id),
                Some(&owner),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["code"], "NOT_READY");
        let blocking: Vec<&str> = body["data"]["blocking"]
            .as_array()
            .unwrap()
            .iter()
            .map(|issue| issue["id"].as_str().unwrap())
            .collect();
        assert_eq!(blocking, vec!["venue-city", "venue-country", "venue-cover"]);
        assert_eq!(app.repo.outbox().len(), 0);
    }

    #[tokio::test]
    async fn second_submit_conflicts() {
        let app = TestApp::new();
        let owner = app.login("owner@example.com", Role::User);
        let (_, created) = app
            .call(Method::POST, "/api/venues", Some(&owner), Some(ready_venue()))
            .await;
        let uri = format!(
            "/api/content/venues/{}/submit",
            created["entity"]["id"].as_str().unwrap()
        );

        let (first, _) = app.call(Method::POST, &uri, Some(&owner), None).await;
        let (second, body) = app.call(Method::POST, &uri, Some(&owner), None).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::CONFLICT);
        assert_eq!(body["data"]["code"], "ALREADY_SUBMITTED");
    }

    #[tokio::test]
    async fn malformed_ids_and_kinds_are_unprocessable() {
        let app = TestApp::new();
        let owner = app.login("owner@example.com", Role::User);

        let (status, body) = app
            .call(Method::GET, "/api/content/venues/not-a-uuid/readiness", Some(&owner), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["data"]["code"], "invalid_request");

        let uri = format!("/api/content/galleries/{}/readiness", AssetId::generate());
        let (status, _) = app.call(Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let uri = format!("/api/content/artworks/{}/submit", AssetId::generate());
        let (status, _) = app.call(Method::POST, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn only_moderators_decide() {
        let app = TestApp::new();
        let owner = app.login("owner@example.com", Role::User);
        let (_, created) = app
            .call(Method::POST, "/api/venues", Some(&owner), Some(ready_venue()))
            .await;
        let (_, submitted) = app
            .call(
                Method::POST,
                &format!(
                    "/api/content/venues/{}/submit",
                    created["entity"]["id"].as_str().unwrap()
                ),
                Some(&owner),
                None,
            )
            .await;
        let uri = format!(
            "/api/admin/submissions/{}/decision",
            submitted["id"].as_str().unwrap()
        );

        let (status, body) = app
            .call(Method::POST, &uri, Some(&owner), Some(json!({ "action": "approve" })))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["data"]["code"], "forbidden");
        let (status, _) = app
            .call(Method::GET, "/api/admin/submissions", Some(&owner), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn rejection_without_reason_uses_default_and_second_decision_conflicts() {
        let app = TestApp::new();
        let owner = app.login("owner@example.com", Role::User);
        let admin = app.login("admin@example.com", Role::Admin);
        let (_, created) = app
            .call(Method::POST, "/api/venues", Some(&owner), Some(ready_venue()))
            .await;
        let (_, submitted) = app
            .call(
                Method::POST,
                &format!(
                    "/api/content/venues/{}/submit",
                    created["entity"]["id"].as_str().unwrap()
                ),
                Some(&owner),
                None,
            )
            .await;
        let uri = format!(
            "/api/admin/submissions/{}/decision",
            submitted["id"].as_str().unwrap()
        );

        let (status, rejected) = app
            .call(
                Method::POST,
                &uri,
                Some(&admin),
                Some(json!({ "action": "reject", "decisionReason": "  " })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rejected["status"], "REJECTED");
        assert_eq!(
            rejected["decisionReason"],
            crate::domain::moderation::DEFAULT_REJECTION_REASON
        );

        let (status, body) = app
            .call(Method::POST, &uri, Some(&admin), Some(json!({ "action": "approve" })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["data"]["code"], "invalid_state");

        let (status, body) = app
            .call(Method::POST, &uri, Some(&admin), Some(json!({ "action": "archive" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["data"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn mine_lists_own_submissions_only() {
        let app = TestApp::new();
        let owner = app.login("owner@example.com", Role::User);
        let other = app.login("other@example.com", Role::User);
        app.call(Method::POST, "/api/venues", Some(&owner), Some(ready_venue()))
            .await;

        let (status, mine) = app
            .call(Method::GET, "/api/submissions/mine", Some(&owner), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine["data"].as_array().unwrap().len(), 1);
        assert_eq!(mine["data"][0]["type"], "VENUE");
        assert_eq!(mine["data"][0]["status"], SubmissionStatus::Draft.to_string());

        let (_, theirs) = app
            .call(Method::GET, "/api/submissions/mine", Some(&other), None)
            .await;
        assert_eq!(theirs["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn moderator_publishes_artwork_and_takes_it_down() {
        let app = TestApp::new();
        let admin = app.login("admin@example.com", Role::Admin);
        let owner = app.repo.add_user("artist@example.com", Role::User);
        let artist = fixtures::artist(owner.user_id);
        let artwork = fixtures::artwork(artist.id);
        let first_image = artwork.images[0];
        let artwork_id = artwork.id;
        app.repo.put_artist(artist);
        app.repo.put_artwork(artwork);

        let (status, published) = app
            .call(
                Method::POST,
                &format!("/api/admin/artworks/{}/publish", artwork_id),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(published["isPublished"], true);
        assert_eq!(published["featuredAssetId"], first_image.to_string());

        let (status, change) = app
            .call(
                Method::POST,
                &format!("/api/admin/content/artworks/{}/unpublish", artwork_id),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(change["type"], "artworks");
        assert_eq!(change["isPublished"], false);
    }

    #[tokio::test]
    async fn editing_a_published_event_takes_it_offline() {
        let app = TestApp::new();
        let owner_token = app.login("owner@example.com", Role::User);
        let owner = app.repo.add_user("second@example.com", Role::User);
        let mut event = fixtures::event(owner.user_id, None);
        event.is_published = true;
        event.published_at = Some(Utc::now());
        let event_id = event.id;
        app.repo.put_event(event);

        // a stranger may not edit
        let (status, _) = app
            .call(
                Method::PATCH,
                &format!("/api/events/{}", event_id),
                Some(&owner_token),
                Some(json!({ "description": null })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        app.repo
            .add_session("second", owner.user_id, Utc::now() + Duration::hours(1));
        let (status, updated) = app
            .call(
                Method::PATCH,
                &format!("/api/events/{}", event_id),
                Some("second"),
                Some(json!({ "description": null })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["description"], Value::Null);
        assert_eq!(updated["isPublished"], false);
        assert_eq!(updated["publishedAt"], Value::Null);
    }
}
