use std::env;
use std::process;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{debug, error, info, log_enabled, Level};
use rand::{rngs::StdRng, Rng, SeedableRng};

use skipindex::{Options, SkipList};

const DEFAULT_COUNT: usize = 1024;

struct Config {
    count: usize,
    seed: u64,
}

impl Config {
    // skipindex [COUNT] [SEED]
    fn from_args() -> Result<Config, String> {
        let mut args = env::args().skip(1);

        let count = match args.next() {
            Some(arg) => arg
                .parse::<usize>()
                .map_err(|e| format!("invalid count {:?}: {}", arg, e))?,
            None => DEFAULT_COUNT,
        };
        let seed = match args.next() {
            Some(arg) => arg
                .parse::<u64>()
                .map_err(|e| format!("invalid seed {:?}: {}", arg, e))?,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        };

        Ok(Config { count, seed })
    }
}

// Keys and the list's height sampler come from one generator seeded once.
// The sampler gets its own seed drawn after the keys, so node heights don't
// replay the key stream.
fn prepare(config: &Config) -> skipindex::Result<(Vec<i32>, SkipList)> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let keys: Vec<i32> = (0..config.count).map(|_| rng.gen_range(0..i32::MAX)).collect();

    let list = SkipList::with_options(&Options::with_seed(rng.gen()))?;
    Ok((keys, list))
}

fn run(config: &Config) -> skipindex::Result<()> {
    let (keys, mut list) = prepare(config)?;
    info!("adding {} nodes (seed {})", config.count, config.seed);

    let start = Instant::now();
    for &key in &keys {
        list.insert(key, key)?;
    }
    info!("insert time span: {}ms", start.elapsed().as_millis());
    if log_enabled!(Level::Debug) {
        debug!("\n{}", list.dump());
    }

    info!("searching each node");
    let start = Instant::now();
    let mut missing = 0;
    for &key in &keys {
        match list.search(key) {
            Some(handle) => debug!("found {:?}", list.entry(handle)),
            None => {
                error!("not found: 0x{:08x}", key);
                missing += 1;
            }
        }
    }
    info!(
        "search time span: {}ms, {} missing",
        start.elapsed().as_millis(),
        missing
    );

    info!("removing all nodes");
    let start = Instant::now();
    for &key in &keys {
        list.delete(key);
    }
    info!("delete time span: {}ms", start.elapsed().as_millis());
    if log_enabled!(Level::Debug) {
        debug!("\n{}", list.dump());
    }

    let released = list.teardown();
    info!("end of run, {} nodes left at teardown", released);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_args() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("usage: skipindex [COUNT] [SEED]");
            process::exit(2);
        }
    };

    if let Err(e) = run(&config) {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skipindex::{GeometricalGenerator, HeightControl};

    #[test]
    fn prepare_is_deterministic() {
        let config = Config {
            count: 64,
            seed: 1234,
        };
        let (first, _) = prepare(&config).unwrap();
        let (second, _) = prepare(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn heights_do_not_replay_key_seed() {
        let config = Config {
            count: 256,
            seed: 1234,
        };
        let (keys, mut list) = prepare(&config).unwrap();
        let heights: Vec<usize> = keys
            .iter()
            .map(|&key| {
                let handle = list.insert(key, key).unwrap();
                list.height(handle).unwrap()
            })
            .collect();

        // A sampler seeded with the key seed would draw exactly these.
        let mut replay = GeometricalGenerator::from_options(&Options::with_seed(config.seed));
        let replayed: Vec<usize> = (0..config.count).map(|_| replay.get_height()).collect();

        assert_ne!(heights, replayed);
    }
}
