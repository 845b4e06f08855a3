//! Small benchmark harness used by the `benches/` targets.

use std::fs;
use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    iterations: usize,
    pixels: Option<usize>,
}

pub enum Unit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
}

impl Unit {
    pub fn format(&self, d: &Duration, width: usize) -> String {
        let (symbol, value) = match self {
            Self::Nanosecond => ("ns", d.as_nanos()),
            Self::Microsecond => ("µs", d.as_micros()),
            Self::Millisecond => ("ms", d.as_millis()),
            Self::Second => ("s", d.as_secs() as u128),
        };
        format!("{:>width$}{:<2}", value, symbol)
    }

    /// Smallest unit in which `d` stays below `threshold`.
    pub fn scaled(d: &Duration, threshold: u128) -> Self {
        if d.as_nanos() < threshold {
            Self::Nanosecond
        } else if d.as_micros() < threshold {
            Self::Microsecond
        } else if d.as_millis() < threshold {
            Self::Millisecond
        } else {
            Self::Second
        }
    }
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            iterations: n,
            pixels: None,
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    /// Report throughput as well, counting `pixels` per call.
    pub fn with_pixels(mut self, pixels: usize) -> Self {
        self.pixels = Some(pixels);
        self
    }

    fn run(&self) -> BenchResult {
        let start = Instant::now();
        for _ in 0..self.iterations {
            (self.f)();
        }
        BenchResult {
            name: self.name.clone(),
            iterations: self.iterations,
            pixels: self.pixels,
            total: start.elapsed(),
        }
    }
}

pub struct BenchResult {
    pub name: String,
    pub iterations: usize,
    pub pixels: Option<usize>,
    pub total: Duration,
}

impl BenchResult {
    pub fn per_call(&self) -> Duration {
        self.total.div_f64(self.iterations.max(1) as f64)
    }

    pub fn megapixels_per_sec(&self) -> Option<f64> {
        let secs = self.per_call().as_secs_f64();
        match self.pixels {
            Some(p) if secs > 0.0 => Some(p as f64 / secs / 1e6),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<BenchResult>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bench(&mut self, bench: Benchmark) {
        self.benches.push(bench);
    }

    pub fn with_benches(benches: &[Benchmark]) -> Self {
        let mut this = Self::new();
        for bench in benches {
            this.add_bench(bench.clone());
        }
        this
    }

    pub fn results(&self) -> &[BenchResult] {
        &self.results
    }

    pub fn run(&mut self) {
        let mut out = stdout();
        for bench in &self.benches {
            self.results.push(bench.run());
            print!(".");
            let _ = out.flush();
        }
        println!();
    }

    pub fn show(&self) {
        println!(
            "  {: <36} {: >8}   {: >8}   {: >8}",
            "benchmark", "total", "per_call", "Mpx/s"
        );
        for r in &self.results {
            let per_call = r.per_call();
            let mpx = r
                .megapixels_per_sec()
                .map(|m| format!("{:.2}", m))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {: <36} {}   {}   {: >8}",
                r.name,
                Unit::scaled(&r.total, 100000).format(&r.total, 6),
                Unit::scaled(&per_call, 100000).format(&per_call, 6),
                mpx,
            )
        }
    }

    pub fn write_csv(&self, filename: &str) -> io::Result<()> {
        let mut lines: Vec<String> =
            vec!["benchmark,total_us,iterations,per_call_us,megapixels_per_sec".to_string()];
        for r in &self.results {
            lines.push(format!(
                "{},{},{},{},{}",
                r.name,
                r.total.as_micros(),
                r.iterations,
                r.per_call().as_micros(),
                r.megapixels_per_sec()
                    .map(|m| format!("{:.3}", m))
                    .unwrap_or_default(),
            ));
        }
        lines.push("".to_string());
        fs::write(filename, lines.join("\n"))
    }

    pub fn report(&mut self, name: &str) {
        print!("Benchmark: {}", name);
        self.run();
        self.show();
        let filename = format!("benchmark_{}.csv", name);
        if let Err(e) = self.write_csv(&filename) {
            eprintln!("could not write {}: {}", filename, e);
        }
    }
}
