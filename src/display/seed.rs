use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{ImageServer, Tile};

/// Outcome of fetching one thumbnail per Z slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub requested: usize,
    pub completed: usize,
    pub failed: usize,
    pub timed_out: usize,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.completed == self.requested
    }
}

/// Fetches the default thumbnail of every Z slice.
///
/// Multi-slice images are fetched on a pool of at most one thread per slice.
/// The caller waits no longer than `timeout`; slices still pending by then
/// are counted as timed out and left out of the result.
pub(crate) fn seed_thumbnails(
    server: &Arc<dyn ImageServer>,
    timeout: Duration,
) -> (Vec<Tile>, SeedReport) {
    let n_z = server.n_z_slices().max(1);
    let mut report = SeedReport {
        requested: n_z,
        ..SeedReport::default()
    };

    let mut thumbnails = if n_z == 1 {
        fetch_inline(server, 1, &mut report)
    } else {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(n_z);
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => fetch_parallel(&pool, server, n_z, timeout, &mut report),
            Err(error) => {
                warn!(%error, "thumbnail pool unavailable, fetching sequentially");
                fetch_inline(server, n_z, &mut report)
            }
        }
    };
    thumbnails.sort_by_key(|(z, _)| *z);

    if report.is_complete() {
        debug!(path = server.path(), slices = n_z, "thumbnails seeded");
    } else {
        warn!(
            path = server.path(),
            requested = report.requested,
            completed = report.completed,
            failed = report.failed,
            timed_out = report.timed_out,
            "histogram seeding incomplete"
        );
    }
    (thumbnails.into_iter().map(|(_, tile)| tile).collect(), report)
}

fn fetch_inline(
    server: &Arc<dyn ImageServer>,
    n_z: usize,
    report: &mut SeedReport,
) -> Vec<(usize, Tile)> {
    let mut thumbnails = Vec::with_capacity(n_z);
    for z in 0..n_z {
        match server.default_thumbnail(z) {
            Ok(tile) => {
                report.completed += 1;
                thumbnails.push((z, tile));
            }
            Err(error) => {
                report.failed += 1;
                warn!(z, %error, "thumbnail request failed");
            }
        }
    }
    thumbnails
}

fn fetch_parallel(
    pool: &rayon::ThreadPool,
    server: &Arc<dyn ImageServer>,
    n_z: usize,
    timeout: Duration,
    report: &mut SeedReport,
) -> Vec<(usize, Tile)> {
    let (tx, rx) = mpsc::channel();
    for z in 0..n_z {
        let tx = tx.clone();
        let server = Arc::clone(server);
        pool.spawn(move || {
            let _ = tx.send((z, server.default_thumbnail(z)));
        });
    }
    drop(tx);

    let deadline = Instant::now() + timeout;
    let mut thumbnails = Vec::with_capacity(n_z);
    let mut received = 0;
    while received < n_z {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((z, Ok(tile))) => {
                received += 1;
                report.completed += 1;
                thumbnails.push((z, tile));
            }
            Ok((z, Err(error))) => {
                received += 1;
                report.failed += 1;
                warn!(z, %error, "thumbnail request failed");
            }
            Err(_) => break,
        }
    }
    report.timed_out = n_z - received;
    thumbnails
}
