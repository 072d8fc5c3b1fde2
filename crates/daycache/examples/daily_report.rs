//! Daily report served from a DayCache
//!
//! Run with `RUST_LOG=debug` to see hits, misses and sweeps, and
//! `DAYCACHE_KEY_POLICY=args` to cache per region.

use std::sync::Arc;

use daycache::{date_stamp, Args, CacheConfig, Clock, DayCache, ManualClock};
use tracing::info;

fn build_report(region: &str, day: &str) -> Result<String, String> {
    Ok(format!("{} sales for {}", region, day))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = CacheConfig::from_env()?;
    info!("Key policy: {:?}", config.key_policy());

    let clock = Arc::new(ManualClock::parse("2025-08-21")?);
    let cache: DayCache<String> = DayCache::with_clock(config, Arc::clone(&clock));

    let report = cache.memoize("report", |args: &Args| {
        build_report(&args.signature(), &date_stamp(clock.today()))
    });

    for region in ["eu", "us"] {
        let value = report.call(&Args::new().arg(region))?;
        info!("{} -> {}", region, value);
    }

    clock.advance(1);
    info!("Advanced to {}", date_stamp(cache.today()));

    let value = report.call(&Args::new().arg("eu"))?;
    info!("eu -> {}", value);

    let stats = cache.stats();
    info!(
        "hits={} misses={} swept={} hit_ratio={:.2}",
        stats.hits(),
        stats.misses(),
        stats.swept(),
        stats.hit_ratio()
    );

    Ok(())
}

