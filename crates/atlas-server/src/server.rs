//! HTTP server for the terrain API.

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use atlas_config::{Config, ServerConfig};
use atlas_terrain::{
    CachedGenerator, ChunkCache, GenerationSettings, Grid, TerrainGenerator, TerrainMetadata,
    TileSource, default_tileset, metadata,
};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::request::{GenerateRequest, ValidationError, validate};
use crate::response::{GenerateResponse, HealthResponse, InfoResponse};

/// Largest generation request body, in bytes, a worker will buffer.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {address}: {error}")]
    BindError { address: String, error: String },
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Per-request context shared by every worker.
struct Handler {
    generation: GenerationSettings,
    cache: Option<Arc<ChunkCache>>,
    max_region_area: u64,
}

/// HTTP server for the terrain API.
/// Requests are served by a pool of worker threads sharing one listener.
pub struct TerrainServer {
    config: ServerConfig,
    handler: Arc<Handler>,
    server: Option<Arc<Server>>,
    actual_port: Option<u16>,
    workers: Vec<JoinHandle<()>>,
}

impl TerrainServer {
    pub fn new(
        config: ServerConfig,
        generation: GenerationSettings,
        cache: Option<Arc<ChunkCache>>,
    ) -> Self {
        let handler = Handler {
            generation,
            cache,
            max_region_area: config.max_region_area,
        };
        Self {
            config,
            handler: Arc::new(handler),
            server: None,
            actual_port: None,
            workers: Vec::new(),
        }
    }

    /// Build a server from the full service configuration, creating the
    /// region cache when it is enabled.
    pub fn from_config(config: &Config) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(ChunkCache::new(config.cache.ttl())));
        Self::new(config.server.clone(), config.generation.settings(), cache)
    }

    /// The shared region cache, if caching is enabled.
    pub fn cache(&self) -> Option<&Arc<ChunkCache>> {
        self.handler.cache.as_ref()
    }

    pub fn start(&mut self) -> Result<(), ServerError> {
        let address = format!("{}:{}", self.config.address, self.config.port);
        let server = Server::http(&address).map_err(|e| ServerError::BindError {
            address: address.clone(),
            error: e.to_string(),
        })?;

        let actual_port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(self.config.port);
        self.actual_port = Some(actual_port);

        let server = Arc::new(server);
        let worker_count = match self.config.worker_threads {
            0 => num_cpus::get().max(1),
            n => n,
        };

        for index in 0..worker_count {
            let server = Arc::clone(&server);
            let handler = Arc::clone(&self.handler);
            let handle = thread::Builder::new()
                .name(format!("atlas-http-{index}"))
                .spawn(move || Self::run_worker(&server, &handler))
                .map_err(ServerError::Spawn)?;
            self.workers.push(handle);
        }

        tracing::info!(
            address = %self.config.address,
            port = actual_port,
            workers = worker_count,
            cache = self.handler.cache.is_some(),
            "terrain server listening"
        );
        self.server = Some(server);
        Ok(())
    }

    pub fn actual_port(&self) -> u16 {
        self.actual_port.unwrap_or(self.config.port)
    }

    /// Block until every worker exits.
    pub fn join(&mut self) {
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("terrain server worker panicked");
            }
        }
    }

    /// Wake every worker out of `recv` and wait for them to finish.
    pub fn stop(&mut self) {
        if let Some(server) = self.server.take() {
            for _ in 0..self.workers.len() {
                server.unblock();
            }
        }
        self.join();
    }

    fn run_worker(server: &Server, handler: &Handler) {
        while let Ok(request) = server.recv() {
            if let Err(e) = handler.handle_request(request) {
                tracing::error!("terrain server error: {e}");
            }
        }
    }
}

impl Drop for TerrainServer {
    fn drop(&mut self) {
        self.stop();
    }
}

type JsonResponse = Response<Cursor<Vec<u8>>>;

fn json_response(
    status: u16,
    body: &impl serde::Serialize,
) -> Result<JsonResponse, serde_json::Error> {
    let json = serde_json::to_vec(body)?;
    Ok(Response::from_data(json)
        .with_status_code(StatusCode(status))
        .with_header(json_content_type()))
}

fn json_content_type() -> Header {
    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("static Content-Type header is valid")
}

impl Handler {
    fn handle_request(
        &self,
        mut request: Request,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let method = request.method().clone();
        let path = request.url().split('?').next().unwrap_or_default().to_string();

        let response = match (&method, path.as_str()) {
            (Method::Get, "/health") => json_response(200, &HealthResponse { status: "ok" })?,
            (Method::Get, "/terrain/info" | "/api/terrain/info") => {
                json_response(200, &InfoResponse::default())?
            }
            (Method::Post, "/api/terrain/generate" | "/terrain/generate") => {
                let mut body = Vec::new();
                request
                    .as_reader()
                    .take(MAX_BODY_BYTES + 1)
                    .read_to_end(&mut body)?;
                if body.len() as u64 > MAX_BODY_BYTES {
                    tracing::warn!(limit = MAX_BODY_BYTES, "rejected oversized request body");
                    let error = serde_json::json!({ "error": "Request body too large" });
                    request.respond(json_response(413, &error)?)?;
                    return Ok(());
                }
                match self.generate(&body) {
                    Ok((metadata, grid)) => {
                        let body = GenerateResponse {
                            metadata,
                            terrain: &grid,
                            tileset: default_tileset(),
                        };
                        json_response(200, &body)?
                    }
                    Err(rejection) => {
                        tracing::warn!("rejected generation request: {rejection}");
                        json_response(400, &rejection.to_json())?
                    }
                }
            }
            _ => Response::from_string("Not Found").with_status_code(404),
        };

        request.respond(response)?;
        Ok(())
    }

    fn generate(&self, body: &[u8]) -> Result<(TerrainMetadata, Arc<Grid>), ValidationError> {
        let parsed: GenerateRequest = serde_json::from_slice(body)?;
        let valid = validate(&parsed, self.max_region_area)?;

        let generator = TerrainGenerator::new(valid.world, valid.seed, self.generation);
        let seed = generator.seed();
        // A freshly drawn seed is never requested again, so it skips the cache.
        let source: Box<dyn TileSource> = match (&self.cache, valid.seed) {
            (Some(cache), Some(_)) => {
                Box::new(CachedGenerator::new(generator, Arc::clone(cache)))
            }
            _ => Box::new(generator),
        };

        let grid = source.generate(&valid.region);
        let metadata = metadata(&valid.world, &valid.camera, valid.buffer, seed);
        Ok((metadata, grid))
    }
}
