//! HTTP front end: picks a contrast, renders, encodes to JPEG and answers
//! either with the raw picture or with an HTML page embedding it.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageError, RgbImage};
use log::{error, info, warn};
use rand::Rng;
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::painter::Contrast;
use crate::{Fractal, RenderError, Renderer, UnknownFractal};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 1024;
/// Longest side a request may ask for.
pub const MAX_SIDE: i64 = 4096;
pub const JPEG_QUALITY: u8 = 75;

pub const PAGE_PATH: &str = "/mandelbrot";
pub const JPEG_PATH: &str = "/mandelbrot.jpg";

const IMAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en"><head><style TYPE="text/css"> h1 { font-size: xx-large; font-family: sans-serif } </style> </head>
<body><h1></h1><img src="data:image/jpg;base64,{{image}}"></body>"#;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("bad value '{value}' for query parameter '{name}'")]
    BadQuery { name: String, value: String },

    #[error("requested image {width}x{height} is larger than {} on a side", MAX_SIDE)]
    TooLarge { width: i64, height: i64 },

    #[error(transparent)]
    Fractal(#[from] UnknownFractal),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("unable to encode image: {0}")]
    Encode(#[from] ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot listen on {addr}: {reason}")]
    Listen { addr: SocketAddr, reason: String },
}

impl ServeError {
    /// Whether the client is to blame.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ServeError::BadQuery { .. }
                | ServeError::TooLarge { .. }
                | ServeError::Fractal(_)
                | ServeError::Render(RenderError::InvalidDimension { .. })
        )
    }
}

/// Parameters of one image request, with defaults filled in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub width: i64,
    pub height: i64,
    pub fractal: Fractal,
    pub contrast: Option<Contrast>,
}

impl ImageRequest {
    pub fn parse(query: &str, width: u32, height: u32) -> Result<Self, ServeError> {
        let mut req = Self {
            width: width as i64,
            height: height as i64,
            fractal: Fractal::Mandelbrot,
            contrast: None,
        };
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let bad = || ServeError::BadQuery {
                name: name.to_string(),
                value: value.to_string(),
            };
            match name {
                "width" => req.width = value.parse().map_err(|_| bad())?,
                "height" => req.height = value.parse().map_err(|_| bad())?,
                "contrast" => req.contrast = Some(Contrast(value.parse().map_err(|_| bad())?)),
                "fractal" => req.fractal = value.parse()?,
                _ => warn!("ignoring query parameter '{}'", name),
            }
        }
        if req.width > MAX_SIDE || req.height > MAX_SIDE {
            return Err(ServeError::TooLarge {
                width: req.width,
                height: req.height,
            });
        }
        Ok(req)
    }
}

pub fn encode_jpeg(img: &RgbImage) -> Result<Vec<u8>, ServeError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY).encode_image(img)?;
    Ok(buffer)
}

/// HTML page showing `jpeg` inline as a base64 data URL.
pub fn image_page(jpeg: &[u8]) -> String {
    IMAGE_TEMPLATE.replace("{{image}}", &STANDARD.encode(jpeg))
}

#[derive(Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    fn text(status: u16, message: &str) -> Self {
        Self::new(status, "text/plain; charset=utf-8", message.as_bytes().to_vec())
    }

    fn into_response(self) -> Response<io::Cursor<Vec<u8>>> {
        let response = Response::from_data(self.body).with_status_code(self.status);
        match Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

pub struct ServerConfig {
    pub addr: SocketAddr,
    pub width: u32,
    pub height: u32,
    pub threads: usize,
    pub handlers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            threads: num_cpus::get_physical(),
            handlers: num_cpus::get(),
        }
    }
}

/// Request handling, independent of the socket it arrived on.
pub struct Service {
    renderer: Renderer,
    width: u32,
    height: u32,
}

impl Service {
    pub fn new(renderer: Renderer, width: u32, height: u32) -> Self {
        Self {
            renderer,
            width,
            height,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(Renderer::new(config.threads), config.width, config.height)
    }

    fn render_jpeg<R: Rng>(&self, query: &str, rng: &mut R) -> Result<Vec<u8>, ServeError> {
        let req = ImageRequest::parse(query, self.width, self.height)?;
        let contrast = req.contrast.unwrap_or_else(|| Contrast::random(rng));
        info!(
            "render started: {} {}x{} contrast = {}",
            req.fractal, req.width, req.height, contrast
        );
        let start = Instant::now();
        let img = self
            .renderer
            .render_fractal(req.fractal, req.width, req.height, contrast)?;
        info!("render finished, elapsed time = {:?}", start.elapsed());
        encode_jpeg(&img)
    }

    pub fn handle<R: Rng>(&self, method: &Method, url: &str, rng: &mut R) -> Reply {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        if path != PAGE_PATH && path != JPEG_PATH {
            return Reply::text(404, "not found");
        }
        if !matches!(method, Method::Get) {
            return Reply::text(405, "method not allowed");
        }
        let jpeg = match self.render_jpeg(query, rng) {
            Ok(jpeg) => jpeg,
            Err(e) if e.is_bad_request() => {
                warn!("{} {}: {}", method, url, e);
                return Reply::text(400, &e.to_string());
            }
            Err(e) => {
                error!("{} {}: {}", method, url, e);
                return Reply::text(500, "unable to render image");
            }
        };
        if path == JPEG_PATH {
            Reply::new(200, "image/jpeg", jpeg)
        } else {
            Reply::new(200, "text/html; charset=utf-8", image_page(&jpeg).into_bytes())
        }
    }

    pub fn respond(&self, request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();
        info!("{} {}", method, url);
        let reply = self.handle(&method, &url, &mut rand::thread_rng());
        if let Err(e) = request.respond(reply.into_response()) {
            error!("{} {}: unable to write response: {}", method, url, e);
        }
    }
}

/// Bind `config.addr` and serve requests on `config.handlers` threads until
/// the listener fails.
pub fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let server = Server::http(config.addr).map_err(|e| ServeError::Listen {
        addr: config.addr,
        reason: e.to_string(),
    })?;
    info!("Listening on {}", config.addr);
    run(Arc::new(server), Arc::new(Service::from_config(&config)), config.handlers);
    Ok(())
}

/// Serve requests from `server` on `handlers` threads and wait for them.
pub fn run(server: Arc<Server>, service: Arc<Service>, handlers: usize) {
    let handles: Vec<_> = (0..handlers.max(1))
        .map(|_| {
            let server = server.clone();
            let service = service.clone();
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    service.respond(request);
                }
            })
        })
        .collect();
    for handle in handles {
        if handle.join().is_err() {
            error!("request handler panicked");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use image::GenericImageView;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service() -> Service {
        Service::new(Renderer::single_threaded(), 64, 48)
    }

    fn get(url: &str) -> Reply {
        service().handle(&Method::Get, url, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_parse_defaults() {
        let req = ImageRequest::parse("", 1024, 768).unwrap();
        assert_eq!(req.width, 1024);
        assert_eq!(req.height, 768);
        assert_eq!(req.fractal, Fractal::Mandelbrot);
        assert_eq!(req.contrast, None);
    }

    #[test]
    fn test_parse_overrides() {
        let req = ImageRequest::parse("width=10&height=20&contrast=3&fractal=newton", 1, 1).unwrap();
        assert_eq!(
            req,
            ImageRequest {
                width: 10,
                height: 20,
                fractal: Fractal::Newton,
                contrast: Some(Contrast(3)),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ImageRequest::parse("width=abc", 1, 1),
            Err(ServeError::BadQuery { .. })
        ));
        assert!(matches!(
            ImageRequest::parse("contrast=300", 1, 1),
            Err(ServeError::BadQuery { .. })
        ));
        assert!(matches!(
            ImageRequest::parse("fractal=julia", 1, 1),
            Err(ServeError::Fractal(_))
        ));
        assert!(matches!(
            ImageRequest::parse("width=100000", 1, 1),
            Err(ServeError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_side_limit() {
        assert!(ImageRequest::parse("width=4096&height=4096", 1, 1).is_ok());
        assert!(matches!(
            ImageRequest::parse("height=4097", 1, 1),
            Err(ServeError::TooLarge {
                width: 1,
                height: 4097
            })
        ));
        assert_eq!(get("/mandelbrot.jpg?width=8192&height=8192").status, 400);
    }

    #[test]
    fn test_page_embeds_jpeg() {
        let reply = get("/mandelbrot");
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        let page = String::from_utf8(reply.body).unwrap();
        let start = page.find("base64,").unwrap() + "base64,".len();
        let end = page[start..].find('"').unwrap() + start;
        let jpeg = STANDARD.decode(&page[start..end]).unwrap();
        assert_eq!(&jpeg[..2], &[0xff, 0xd8]);
        let img = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    #[test]
    fn test_raw_jpeg() {
        let reply = get("/mandelbrot.jpg?width=20&height=10");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "image/jpeg");
        assert_eq!(&reply.body[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn test_bad_requests() {
        assert_eq!(get("/mandelbrot?width=0").status, 400);
        assert_eq!(get("/mandelbrot?height=-5").status, 400);
        assert_eq!(get("/mandelbrot?fractal=julia").status, 400);
        assert_eq!(get("/").status, 404);
        assert_eq!(get("/favicon.ico").status, 404);
        let reply = service().handle(&Method::Post, "/mandelbrot", &mut StdRng::seed_from_u64(1));
        assert_eq!(reply.status, 405);
    }

    #[test]
    fn test_render_errors_are_bad_requests() {
        let e: ServeError = RenderError::InvalidDimension {
            width: 0,
            height: 1,
        }
        .into();
        assert!(e.is_bad_request());
        let e: ServeError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(!e.is_bad_request());
    }
}
