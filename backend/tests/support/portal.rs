//! Shared harness for integration suites.
//!
//! Builds the fully wired portal behind an in-process actix service and runs
//! a local actix `HttpServer` standing in for webhook subscribers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, HttpResponse, HttpServer, test as actix_test, web};
use order_portal::domain::{Email, UserId};
use order_portal::inbound::http::health::HealthState;
use order_portal::server::{Portal, ServerConfig, build_app, build_portal};
use order_portal::settings::BootstrapAdmin;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::sync::mpsc;

pub const ADMIN_TOKEN: &str = "admin-token";
const EVENT_WAIT: Duration = Duration::from_secs(5);

/// A portal assembled over a temporary upload directory with a bootstrap
/// administrator holding [`ADMIN_TOKEN`].
pub struct PortalHarness {
    pub portal: Portal,
    pub config: ServerConfig,
    pub upload_dir: TempDir,
}

impl PortalHarness {
    pub async fn start() -> Self {
        Self::start_with(|config| config).await
    }

    pub async fn start_with(customise: impl FnOnce(ServerConfig) -> ServerConfig) -> Self {
        let upload_dir = tempfile::tempdir().expect("temp upload dir");
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("literal address");
        let config = customise(
            ServerConfig::new(addr, upload_dir.path()).with_bootstrap_admin(BootstrapAdmin {
                email: Email::new("admin@example.com").expect("valid email"),
                token: ADMIN_TOKEN.to_owned(),
            }),
        );
        let portal = build_portal(&config).await.expect("portal builds");
        Self {
            portal,
            config,
            upload_dir,
        }
    }

    pub async fn service(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        actix_test::init_service(build_app(
            health,
            self.portal.http_state.clone(),
            self.config.max_request_bytes(),
        ))
        .await
    }

    /// Create an account through the API and register `token` for it.
    pub async fn enrol(
        &self,
        app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
        role: &str,
        email: &str,
        token: &str,
    ) -> UserId {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/v1/users",
            ADMIN_TOKEN,
            Some(json!({"name": format!("{role} user"), "email": email, "role": role})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "enrol {email}: {body}");
        let id = UserId::parse(body["id"].as_str().expect("id string")).expect("uuid id");
        self.portal.tokens.register(token, id).await;
        id
    }

    /// Number of order directories currently present under the upload root.
    pub fn stored_order_dirs(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("upload dir readable")
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .count()
    }
}

/// Send a JSON request with a bearer token and decode the JSON answer.
pub async fn call(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = actix_test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    if let Some(body) = body {
        request = request.set_json(body);
    }
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, value)
}

/// Local webhook endpoint recording every delivery it receives.
pub struct WebhookReceiver {
    pub url: String,
    deliveries: mpsc::UnboundedReceiver<Value>,
    handle: actix_web::dev::ServerHandle,
}

impl WebhookReceiver {
    /// Listen on an ephemeral port, answering every POST with `status`.
    pub fn start(status: StatusCode) -> Self {
        let (sender, deliveries) = mpsc::unbounded_channel::<Value>();
        let server = HttpServer::new(move || {
            let sender = sender.clone();
            App::new().route(
                "/hook",
                web::post().to(move |body: web::Json<Value>| {
                    let sender = sender.clone();
                    async move {
                        sender.send(body.into_inner()).ok();
                        HttpResponse::build(status).body("received")
                    }
                }),
            )
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("receiver binds");
        let port = server.addrs().first().expect("bound address").port();
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        Self {
            url: format!("http://127.0.0.1:{port}/hook"),
            deliveries,
            handle,
        }
    }

    /// Wait for the next delivery.
    pub async fn next(&mut self) -> Value {
        tokio::time::timeout(EVENT_WAIT, self.deliveries.recv())
            .await
            .expect("webhook delivered in time")
            .expect("receiver open")
    }

    /// Wait for `count` deliveries and return their event tags, sorted.
    pub async fn next_events(&mut self, count: usize) -> Vec<String> {
        let mut events = Vec::with_capacity(count);
        for _ in 0..count {
            let envelope = self.next().await;
            events.push(envelope["event"].as_str().expect("event tag").to_owned());
        }
        events.sort();
        events
    }

    /// Assert nothing arrives within `window`.
    pub async fn assert_quiet(&mut self, window: Duration) {
        let outcome = tokio::time::timeout(window, self.deliveries.recv()).await;
        assert!(outcome.is_err(), "unexpected delivery: {outcome:?}");
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}
