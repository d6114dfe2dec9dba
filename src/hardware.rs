use std::fs;

use anyhow::{Context, Result, bail};
use nix::{
    sched::{CpuSet, sched_getaffinity},
    unistd::Pid,
};
use tracing::{debug, warn};

use crate::model::cores::CoreSet;

const ONLINE_CPUS: &str = "/sys/devices/system/cpu/online";

/// Enumerates the cores this host exposes.
///
/// Reads the kernel's online list and falls back to the calling thread's
/// affinity mask when sysfs is unavailable.
pub fn load_cores() -> Result<CoreSet> {
    match fs::read_to_string(ONLINE_CPUS) {
        Ok(text) => {
            if let Some(cores) = parse_cpu_list(&text).and_then(CoreSet::new) {
                debug!(count = cores.len(), min = cores.min(), max = cores.max(), "online cores");
                return Ok(cores);
            }
            warn!(%text, "unparsable {ONLINE_CPUS}, using affinity mask");
        }
        Err(e) => warn!("cannot read {ONLINE_CPUS}: {e}, using affinity mask"),
    }

    affinity_cores()
}

fn affinity_cores() -> Result<CoreSet> {
    let set = sched_getaffinity(Pid::from_raw(0)).context("sched_getaffinity failed")?;

    let mut cores = Vec::new();
    for cpu in 0..CpuSet::count() {
        if set.is_set(cpu).unwrap_or(false) {
            cores.push(cpu as u32);
        }
    }

    let Some(cores) = CoreSet::new(cores) else {
        bail!("affinity mask is empty");
    };
    Ok(cores)
}

/// Parses the kernel cpulist format, e.g. `0-3,8,10-11`.
pub fn parse_cpu_list(text: &str) -> Option<Vec<u32>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut cores = Vec::new();
    for part in text.split(',') {
        let part = part.trim();
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo = lo.parse::<u32>().ok()?;
                let hi = hi.parse::<u32>().ok()?;
                if lo > hi {
                    return None;
                }
                cores.extend(lo..=hi);
            }
            None => cores.push(part.parse::<u32>().ok()?),
        }
    }
    Some(cores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_cpu_list() {
        assert_eq!(
            parse_cpu_list("0-3,8,10-11\n"),
            Some(vec![0, 1, 2, 3, 8, 10, 11])
        );
    }

    #[test]
    fn parses_single_cpu() {
        assert_eq!(parse_cpu_list("0"), Some(vec![0]));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_cpu_list(""), None);
        assert_eq!(parse_cpu_list("0-x"), None);
        assert_eq!(parse_cpu_list("5-2"), None);
    }

    #[test]
    fn host_has_cores() {
        let cores = load_cores().unwrap();
        assert!(cores.len() >= 1);
        assert!(cores.min() <= cores.max());
    }
}
