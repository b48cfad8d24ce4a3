//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router and wire up middleware (timeout, request ID,
//!   tracing)
//! - Bind the server to a listener and serve until shutdown
//! - Consult the routing engine once per request
//! - Forward matched requests to the backend, rewriting URI and Host
//! - Serve everything else from the static root
//!
//! # Design Decisions
//! - The routing decision is purely computational; all I/O stays here
//! - Backend responses are relayed verbatim; an unreachable backend maps
//!   to 502, never to a change in routing state

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, HeaderValue, Request, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ConfigError, DevServerConfig, ValidationError};
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::http::response::bad_gateway;
use crate::http::static_files::{static_service, StaticService};
use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;
use crate::routing::{ForwardDirective, RuleEngine};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RuleEngine>,
    pub client: Client<HttpConnector, Body>,
    pub static_files: StaticService,
}

/// The development HTTP server.
pub struct DevServer {
    router: Router,
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new server from validated configuration.
    ///
    /// Compiles the rule set once; a descriptor that does not compile
    /// refuses startup here rather than surfacing per-request.
    pub fn new(config: DevServerConfig) -> Result<Self, ConfigError> {
        let engine = RuleEngine::compile(&config.rules).map_err(|errors| {
            ConfigError::Validation(errors.into_iter().map(ValidationError::from).collect())
        })?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            engine: Arc::new(engine),
            client,
            static_files: static_service(&config.static_files),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &DevServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.config.rules.len(),
            static_root = %self.config.static_files.root.display(),
            "Dev server listening"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("Dev server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &DevServerConfig {
        &self.config
    }
}

/// Per-request dispatch: decide once, then forward or serve locally.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let method = request.method().as_str().to_string();

    let Some(directive) = state.engine.find(&path) else {
        tracing::debug!(
            request_id = %request_id,
            path = %path,
            "No forwarding rule matched, serving locally"
        );
        let response = match state.static_files.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        metrics::record_request(&method, response.status().as_u16(), "static", start);
        return response;
    };

    tracing::debug!(
        request_id = %request_id,
        rule = %directive.rule,
        path = %path,
        rewritten = %directive.path,
        target = %directive.target,
        "Forwarding request"
    );

    let outcome = directive.rule.to_string();
    let response = forward(&state, directive, request, &request_id).await;
    metrics::record_request(&method, response.status().as_u16(), &outcome, start);
    response
}

/// Forward one request per a matched directive and relay the response.
async fn forward(
    state: &AppState,
    directive: ForwardDirective<'_>,
    request: Request<Body>,
    request_id: &str,
) -> Response {
    let authority = directive.target_authority();

    // An origin-form request target must start with '/'. The engine's
    // rewrite may have produced an empty path or a bare remainder (the
    // literal-prefix quirk); both are rendered with a leading slash.
    let path = if directive.path.starts_with('/') {
        directive.path.clone()
    } else {
        format!("/{}", directive.path)
    };
    let path_and_query = match request.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let uri: Uri = match format!(
        "{}://{}{}",
        directive.target.scheme(),
        authority,
        path_and_query
    )
    .parse()
    {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Failed to build outbound URI"
            );
            return bad_gateway(request_id);
        }
    };

    let (parts, body) = request.into_parts();
    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);

    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        if directive.rewrite_host {
            if let Ok(value) = HeaderValue::from_str(&authority) {
                headers.insert(HOST, value);
            }
        }
    }

    let outbound = match builder.body(body) {
        Ok(outbound) => outbound,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Failed to build outbound request"
            );
            return bad_gateway(request_id);
        }
    };

    match state.client.request(outbound).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Upstream request failed"
            );
            bad_gateway(request_id)
        }
    }
}
