//! Fills in the missing mip levels of one layer of a block database.
//!
//! ```text
//! generate_mipmaps <db-path> <layer> [lz4-level]
//! ```
//!
//! Blocks must have been written with LZ4 compression. Set `RUST_LOG=debug` to see every written block.

use shards::storage::{generate_mipmaps, sled, BlockDb, Lz4, MaxDownsampler, Result};

use tracing::info;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("usage: {} <db-path> <layer> [lz4-level]", args[0]);
        std::process::exit(2);
    }
    let level = match args.get(3).map(|l| l.parse::<u32>()) {
        None => 10,
        Some(Ok(level)) => level,
        Some(Err(e)) => {
            eprintln!("invalid lz4 level: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&args[1], &args[2], Lz4 { level }) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(db_path: &str, layer: &str, compression: Lz4) -> Result<()> {
    let db = sled::open(db_path)?;
    let mut block_db = BlockDb::open(db, compression)?;

    let report = generate_mipmaps(&mut block_db, layer, &MaxDownsampler)?;
    let flushed_bytes = block_db.flush()?;
    info!(
        written = report.written,
        skipped_existing = report.skipped_existing,
        skipped_absent = report.skipped_absent,
        flushed_bytes,
        "done"
    );

    Ok(())
}
