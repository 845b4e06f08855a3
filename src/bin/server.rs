use std::net::SocketAddr;

use log::info;
use structopt::StructOpt;

use mandelserve::server::{serve, ServeError, ServerConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Debug, StructOpt)]
#[structopt(name = "mandelserve", about = "Serves freshly rendered Mandelbrot images over HTTP")]
struct Opt {
    /// Address to listen on
    #[structopt(long, default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    /// Default image width, overridable per request with ?width=
    #[structopt(long, default_value = "1024")]
    width: u32,

    /// Default image height, overridable per request with ?height=
    #[structopt(long, default_value = "1024")]
    height: u32,

    /// Render worker threads, 0 renders on the request thread
    #[structopt(long)]
    threads: Option<usize>,

    /// Request handler threads
    #[structopt(long)]
    handlers: Option<usize>,
}

fn main() -> Result<(), ServeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        addr: opt.addr,
        width: opt.width,
        height: opt.height,
        threads: opt.threads.unwrap_or(defaults.threads),
        handlers: opt.handlers.unwrap_or(defaults.handlers),
    };
    if (config.width, config.height) != (DEFAULT_WIDTH, DEFAULT_HEIGHT) {
        info!("default image size {}x{}", config.width, config.height);
    }
    info!(
        "{} render threads, {} request handlers",
        config.threads, config.handlers
    );
    serve(config)
}
