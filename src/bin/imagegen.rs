use std::path::PathBuf;
use std::time::Instant;

use log::info;
use structopt::StructOpt;

use mandelserve::painter::Contrast;
use mandelserve::{Fractal, Renderer};

#[derive(Debug, StructOpt)]
#[structopt(name = "mandelserve-imagegen", about = "Renders one fractal image to a file")]
struct Opt {
    #[structopt(long, default_value = "1024", allow_hyphen_values = true)]
    width: i64,

    #[structopt(long, default_value = "1024", allow_hyphen_values = true)]
    height: i64,

    /// Palette contrast, random in 0..15 when omitted
    #[structopt(long)]
    contrast: Option<u8>,

    /// mandelbrot or newton
    #[structopt(long, default_value = "mandelbrot")]
    fractal: Fractal,

    /// Worker threads, defaults to the number of physical cores
    #[structopt(long)]
    threads: Option<usize>,

    /// Output file, format chosen by extension
    #[structopt(short, long, parse(from_os_str), default_value = "out.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let renderer = Renderer::new(opt.threads.unwrap_or_else(num_cpus::get_physical));
    let contrast = opt
        .contrast
        .map(Contrast)
        .unwrap_or_else(|| Contrast::random(&mut rand::thread_rng()));

    info!("rendering {} with contrast = {}", opt.fractal, contrast);
    let start = Instant::now();
    let img = renderer.render_fractal(opt.fractal, opt.width, opt.height, contrast)?;
    info!("render finished, elapsed time = {:?}", start.elapsed());

    img.save(&opt.output)?;
    info!("wrote {}", opt.output.display());
    Ok(())
}
