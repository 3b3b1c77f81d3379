//! Banner redirection entry point.
//!
//! Every request registers the visitor (when a `Referer` header is present)
//! and answers with a temporary redirect to a random banner file.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, LOCATION, REFERER, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use bannerd::{files, Config, Database, SqliteEngine, Visitor};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("BANNERD_CONFIG").unwrap_or_else(|_| "bannerd.toml".to_string());
    let config = match Config::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path, error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let db = match Database::open::<SqliteEngine>(&config.database) {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "error connecting to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = serve(config, db).await {
        error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn serve(config: Config, db: Database) -> std::io::Result<()> {
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let config = config.clone();
        let db = db.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let config = config.clone();
                let db = db.clone();
                async move { handle(req, peer, &config, &db) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(error = %e, "connection error");
            }
        });
    }
}

fn handle(
    req: Request<Incoming>,
    peer: SocketAddr,
    config: &Config,
    db: &Database,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let referer = req
        .headers()
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    // only referred traffic counts as a visit, direct hits just get a banner
    if let Some(page) = referer {
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let visitor = Visitor::new(peer.ip().to_string(), user_agent, page);

        if let Err(e) = visitor.register(db) {
            error!(error = %e, "visitor registration failed");
        }
    }

    match files::random_from_dir(Path::new("."), &config.banners.path) {
        Some(file) => Ok(redirect(&file)),
        None => Ok(status_only(StatusCode::NOT_FOUND)),
    }
}

fn redirect(location: &str) -> Response<Full<Bytes>> {
    let mut response = status_only(StatusCode::TEMPORARY_REDIRECT);
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}

fn status_only(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
