/// CPU cores available on the host, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSet {
    cores: Vec<u32>,
}

impl CoreSet {
    /// Returns `None` for an empty list; a host always has at least one core.
    pub fn new(mut cores: Vec<u32>) -> Option<Self> {
        if cores.is_empty() {
            return None;
        }
        cores.sort_unstable();
        cores.dedup();
        Some(Self { cores })
    }

    /// Contiguous set `[low, high]`.
    #[cfg(test)]
    pub fn span(low: u32, high: u32) -> Self {
        Self {
            cores: (low.min(high)..=high.max(low)).collect(),
        }
    }

    pub fn min(&self) -> u32 {
        self.cores[0]
    }

    pub fn max(&self) -> u32 {
        self.cores[self.cores.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }

    /// Kernel cpulist form, consecutive cores folded: `0-3,8`.
    pub fn cpu_list(&self) -> String {
        let mut parts = Vec::new();
        let mut iter = self.cores.iter().copied();
        let Some(mut start) = iter.next() else {
            return String::new();
        };
        let mut end = start;
        for core in iter {
            if core == end + 1 {
                end = core;
                continue;
            }
            parts.push(fold(start, end));
            start = core;
            end = core;
        }
        parts.push(fold(start, end));
        parts.join(",")
    }
}

fn fold(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

/// Cores the workload gets pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreSelection {
    Single(u32),
    /// Inclusive, `low < high`.
    Range { low: u32, high: u32 },
}

impl CoreSelection {
    pub fn cores(&self) -> Vec<u32> {
        match *self {
            CoreSelection::Single(core) => vec![core],
            CoreSelection::Range { low, high } => (low..=high).collect(),
        }
    }

    /// Every selected core, comma separated, as `taskset -c` expects.
    pub fn cpu_list(&self) -> String {
        self.cores()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}
