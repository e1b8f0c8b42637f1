use clap::Parser;
use rustcached::store::{LruStore, DEFAULT_CAPACITY};
use rustcached::{server, Error};
use std::sync::{Arc, Mutex};

const ADDR: &str = "0.0.0.0:11211";

#[derive(Parser, Debug)]
struct Args {
    /// The address to listen on
    #[arg(short, long, default_value = ADDR)]
    addr: String,

    /// Maximum number of items held before LRU eviction kicks in
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    let store = Arc::new(Mutex::new(LruStore::new(args.capacity)));

    server::run(&args.addr, store).await
}
