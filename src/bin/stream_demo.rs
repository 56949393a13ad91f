use std::ops::Range;

use clap::Parser;

use lazy_pour::lazy::{fibonacci, Stream};
use lazy_pour::telemetry::init_stderr_tracing;

/// Show a self-referential Fibonacci stream and a push-composed finite one.
#[derive(Parser, Debug)]
#[command(name = "stream_demo", about = "Lazy stream demo")]
struct Args {
    /// How many leading Fibonacci numbers to print.
    #[arg(long, default_value_t = 10)]
    take: usize,

    /// Print the Fibonacci number at this index.
    #[arg(long, default_value_t = 20)]
    index: usize,

    /// Print a slice of the Fibonacci stream, as `START..END`.
    #[arg(long, default_value = "30..35", value_parser = parse_range)]
    slice: Range<usize>,
}

fn parse_range(s: &str) -> Result<Range<usize>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got {s}"))?;
    let start: usize = start.trim().parse().map_err(|e| format!("bad start {start}: {e}"))?;
    let end: usize = end.trim().parse().map_err(|e| format!("bad end {end}: {e}"))?;
    Ok(start..end)
}

fn main() {
    init_stderr_tracing("info");
    let args = Args::parse();

    let simple = Stream::new().with([1, 2, 3]).with(4..6);
    println!("finite: {:?}", simple.iter().collect::<Vec<_>>());
    println!("finite[1]: {:?}", simple.get(1));
    println!("finite[0..2]: {:?}", simple.slice(0..2));

    let fib = fibonacci();
    println!("fib first {}: {:?}", args.take, fib.take(args.take));
    match fib.get(args.index) {
        Some(v) => println!("fib[{}]: {v}", args.index),
        None => println!("fib[{}]: does not fit in u64", args.index),
    }
    println!(
        "fib[{}..{}]: {:?}",
        args.slice.start,
        args.slice.end,
        fib.slice(args.slice.clone())
    );
    println!("fib values produced: {}", fib.cached_len());
}
