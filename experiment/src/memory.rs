use std::{fs, num::NonZeroUsize};

const MEMINFO: &str = "/proc/meminfo";

/// Bytes of available system memory, `None` where the platform doesn't report it.
pub fn available_memory() -> Option<u64> {
    let meminfo = fs::read_to_string(MEMINFO).ok()?;
    parse_meminfo(&meminfo)
}

/// Extracts `MemAvailable` from the contents of `/proc/meminfo`, in bytes.
fn parse_meminfo(meminfo: &str) -> Option<u64> {
    meminfo.lines().find_map(|line| {
        let kib = line.strip_prefix("MemAvailable:")?;
        let kib: u64 = kib.trim().trim_end_matches("kB").trim().parse().ok()?;
        Some(kib * 1024)
    })
}

/// How many trials of at most `largest` bytes fit at once within `limit` of `available`
/// bytes, capped at `workers`. Always at least one.
pub fn concurrency(
    largest: Option<u64>,
    workers: NonZeroUsize,
    limit: f64,
    available: u64,
) -> NonZeroUsize {
    let Some(largest) = largest else {
        return workers;
    };

    let budget = (available as f64 * limit) as u64;
    let fits = (budget / largest.max(1)) as usize;

    NonZeroUsize::new(fits.min(workers.get())).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO_SAMPLE: &str = "MemTotal:       16303780 kB\n\
                                  MemFree:         1203400 kB\n\
                                  MemAvailable:    8000000 kB\n\
                                  Buffers:          401220 kB\n";

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn parses_available() {
        assert_eq!(parse_meminfo(MEMINFO_SAMPLE), Some(8_000_000 * 1024));
        assert_eq!(parse_meminfo("MemTotal: 10 kB\n"), None);
    }

    #[test]
    fn budget_caps_workers() {
        let footprint = 1 << 20;

        // Room for exactly two trials.
        let available = footprint * 4;
        assert_eq!(concurrency(Some(footprint), workers(8), 0.5, available).get(), 2);
        // Plenty of room, the worker count wins.
        assert_eq!(concurrency(Some(footprint), workers(8), 1., footprint * 100).get(), 8);
        // Not even one fits, still run one at a time.
        assert_eq!(concurrency(Some(footprint), workers(8), 0.1, footprint).get(), 1);
    }

    #[test]
    fn unknown_footprint_keeps_workers() {
        assert_eq!(concurrency(None, workers(3), 0.5, 0).get(), 3);
    }
}
