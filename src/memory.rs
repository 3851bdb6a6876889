// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{fmt, fs, io};

/// Resident memory of the current process, from `/proc/self/status`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemoryStats {
    /// Current resident set size in KiB (`VmRSS`)
    pub rss_kib: u64,
    /// Peak resident set size in KiB (`VmHWM`)
    pub peak_rss_kib: u64,
}

impl MemoryStats {
    /// Reads the statistics of the running process.
    ///
    /// # Errors
    ///
    /// Returns an error if `/proc/self/status` is unavailable (non-Linux
    /// systems, or `/proc` not mounted) or lacks the expected fields.
    pub fn current() -> io::Result<Self> {
        let status = fs::read_to_string("/proc/self/status")?;
        Self::parse(&status).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "VmRSS/VmHWM missing from /proc/self/status",
            )
        })
    }

    /// Parses the contents of a `/proc/<pid>/status` file.
    pub fn parse(status: &str) -> Option<Self> {
        let mut rss = None;
        let mut peak = None;
        for line in status.lines() {
            if let Some(value) = line.strip_prefix("VmRSS:") {
                rss = parse_kib(value);
            } else if let Some(value) = line.strip_prefix("VmHWM:") {
                peak = parse_kib(value);
            }
        }
        Some(Self {
            rss_kib: rss?,
            peak_rss_kib: peak?,
        })
    }
}

fn parse_kib(value: &str) -> Option<u64> {
    value.trim().strip_suffix("kB")?.trim().parse().ok()
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "rss: {:.1}MB peak: {:.1}MB",
            self.rss_kib as f64 / 1024.0,
            self.peak_rss_kib as f64 / 1024.0
        )
    }
}
