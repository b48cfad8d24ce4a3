//! Local asset serving for paths no forwarding rule claims.
//!
//! # Responsibilities
//! - Serve the frontend build output from the configured root
//! - Optionally fall back to the index document so client-side routes
//!   resolve on hard reload (SPA mode)
//!
//! # Design Decisions
//! - Built once at startup from config, cloned cheaply per request
//! - The routing engine has no opinion on this fallback; it lives entirely
//!   in the transport layer

use std::convert::Infallible;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use tower::util::BoxCloneSyncService;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::StaticFilesConfig;

/// Boxed file-serving service, so SPA and plain modes share one type.
pub type StaticService = BoxCloneSyncService<Request<Body>, Response, Infallible>;

/// Build the static file service from configuration.
pub fn static_service(config: &StaticFilesConfig) -> StaticService {
    let dir = ServeDir::new(&config.root).append_index_html_on_directories(true);

    if config.spa {
        let index = ServeFile::new(config.root.join(&config.index));
        BoxCloneSyncService::new(ServiceExt::<Request<Body>>::map_response(
            dir.fallback(index),
            |response| response.into_response(),
        ))
    } else {
        BoxCloneSyncService::new(ServiceExt::<Request<Body>>::map_response(
            dir,
            |response| response.into_response(),
        ))
    }
}
