use log::{info, warn, LevelFilter};
use rand::{prelude::random, rngs::StdRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::time;

use llrbmap::OMap;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "sets", default_value = "0")]
    sets: usize,

    #[structopt(long = "dels", default_value = "0")]
    dels: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,

    #[structopt(long = "verbose")]
    verbose: bool,
}

fn main() {
    let opts = Opt::from_args();

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).ok();

    let seed = opts.seed.unwrap_or_else(random);
    info!("seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut index: OMap<u64, u64> = OMap::new();

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let (key, val): (u64, u64) = (rng.gen(), rng.gen());
        index.set(key, val);
    }
    info!("loaded {} items in {:?}", index.len(), start.elapsed());
    report(&index);

    do_incremental(&mut rng, &opts, &mut index);
    report(&index);

    let start = time::Instant::now();
    let n = index.iter().count();
    info!("iter over {} items, took {:?}", n, start.elapsed());

    let start = time::Instant::now();
    let keys = index.keys();
    info!("export {} keys, took {:?}", keys.len(), start.elapsed());
}

fn do_incremental(rng: &mut StdRng, opts: &Opt, index: &mut OMap<u64, u64>) {
    let start = time::Instant::now();
    let total = opts.sets + opts.dels + opts.gets;
    let (mut n, mut hits) = (total, 0_usize);
    while n > 0 {
        let op = rng.gen::<usize>() % total;

        let key = rng.gen::<u64>();
        if op < opts.sets {
            let val = rng.gen::<u64>();
            index.set(key, val);
        } else if op < (opts.sets + opts.dels) {
            index.remove(&key);
        } else if index.get(&key).is_some() {
            hits += 1;
        }
        n -= 1;
    }
    info!(
        "incremental for operations {} ({} get hits), took {:?}",
        total,
        hits,
        start.elapsed()
    );
}

fn report(index: &OMap<u64, u64>) {
    info!(
        "path heights left:{} right:{} common:{} balanced:{}",
        index.left_path_height(),
        index.right_path_height(),
        index.common_height(),
        index.is_balanced(),
    );
    match index.validate() {
        Ok(stats) => info!("validate {:?}", stats),
        Err(err) => warn!("validate {}", err),
    }
}
