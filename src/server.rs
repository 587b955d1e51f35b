use std::net::SocketAddr;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{Html, Response};
use axum::routing::get;
use tokio::net::TcpListener;

use crate::error::{Error, Result};

const INDEX_PAGE: &str = include_str!("../pages/index.html");
const ABOUT_PAGE: &str = include_str!("../pages/about.html");
const CONTACT_PAGE: &str = include_str!("../pages/contact.html");

async fn home() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn about() -> Html<&'static str> {
    Html(ABOUT_PAGE)
}

async fn contact() -> Html<&'static str> {
    Html(CONTACT_PAGE)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;
    log::debug!("{} {} -> {}", method, path, response.status());
    response
}

/// Routes for the static pages.
pub fn router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/contact", get(contact))
        .layer(middleware::from_fn(log_request))
}

pub struct PageServer {
    router: Router,
}

impl Default for PageServer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageServer {
    pub fn new() -> Self {
        Self { router: router() }
    }

    /// Binds a TCP listener on `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`] if the address is unavailable.
    pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
        TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })
    }

    /// Serves the pages on an already bound listener until the process exits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serve`] if the server stops with an I/O error.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        if let Ok(addr) = listener.local_addr() {
            log::info!("Serving pages on http://{}", addr);
        }
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(Error::Serve)
    }

    /// Binds `addr` and serves the pages.
    ///
    /// # Errors
    ///
    /// See [`PageServer::bind`] and [`PageServer::serve`].
    pub async fn listen(self, addr: SocketAddr) -> Result<()> {
        let listener = Self::bind(addr).await?;
        self.serve(listener).await
    }
}
