//! Derived values computed from two consecutive samples.
//!
//! Intervals (`itv`) are in hundredths of a second. Nothing here fails: a
//! counter that went backwards yields 0.0, and so does a zero denominator.

use crate::record::{CpuStats, DiskStats, Duplex, FilesystemStats, SoftnetStats};

/// Per-second rate of a cumulative counter.
pub fn s_value(prev: u64, curr: u64, itv: u64) -> f64 {
    if curr < prev || itv == 0 {
        return 0.0;
    }
    (curr - prev) as f64 / itv as f64 * 100.0
}

/// Share of `total` taken by the increase from `prev` to `curr`, in percent.
pub fn sp_value(prev: u64, curr: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (curr as f64 - prev as f64) / total as f64 * 100.0
}

/// Like [`sp_value`] but a counter that went backwards gives 0.
pub fn ll_sp_value(prev: u64, curr: u64, total: u64) -> f64 {
    if curr < prev {
        return 0.0;
    }
    sp_value(prev, curr, total)
}

/// Ticks elapsed on one CPU between two samples; 0 means tickless.
///
/// Guest time is already included in user and nice, so it is not added
/// again. When user-guest or nice-guest_nice went backwards the difference
/// is added back.
pub fn cpu_interval(curr: &CpuStats, prev: &CpuStats) -> u64 {
    let mut shift: u64 = 0;

    let (cu, pu) = (
        curr.user.saturating_sub(curr.guest),
        prev.user.saturating_sub(prev.guest),
    );
    if cu < pu {
        shift = shift.saturating_add(pu - cu);
    }
    let (cn, pn) = (
        curr.nice.saturating_sub(curr.guest_nice),
        prev.nice.saturating_sub(prev.guest_nice),
    );
    if cn < pn {
        shift = shift.saturating_add(pn - cn);
    }

    // idle and iowait both going backwards means the CPU went offline and back
    if curr.idle < prev.idle && curr.iowait < prev.iowait {
        return 0;
    }

    let total = |s: &CpuStats| {
        [s.nice, s.sys, s.iowait, s.idle, s.steal, s.hardirq, s.softirq]
            .into_iter()
            .fold(s.user, u64::wrapping_add)
    };
    total(curr)
        .wrapping_add(shift)
        .saturating_sub(total(prev))
}

/// Outcome of [`aggregate_cpus`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuAggregate {
    /// Sum of the per-CPU intervals of online CPUs.
    pub interval: u64,
    /// Indexed like the records; index 0 ("all") is never offline.
    pub offline: Vec<bool>,
}

/// Rebuilds CPU "all" (index 0) of both generations as the field-wise sum
/// of the online CPUs.
///
/// A CPU whose current record is all zero is offline. A CPU coming back
/// online has its previous record treated as zero.
pub fn aggregate_cpus(curr: &mut [CpuStats], prev: &mut [CpuStats]) -> CpuAggregate {
    let mut agg = CpuAggregate {
        interval: 0,
        offline: vec![false; curr.len()],
    };
    if curr.is_empty() {
        return agg;
    }

    let mut all_curr = CpuStats::default();
    let mut all_prev = CpuStats::default();
    let zero = CpuStats::default();

    for i in 1..curr.len() {
        if curr[i].is_zero() {
            agg.offline[i] = true;
            continue;
        }
        let p = prev.get(i).filter(|p| !p.is_zero()).unwrap_or(&zero);
        agg.interval = agg.interval.saturating_add(cpu_interval(&curr[i], p));
        all_curr.accumulate(&curr[i]);
        all_prev.accumulate(p);
    }

    curr[0] = all_curr;
    if let Some(p0) = prev.first_mut() {
        *p0 = all_prev;
    }
    agg
}

/// Rebuilds item 0 of both softnet generations as the sum of the online
/// CPUs and returns which items are offline.
///
/// Offline means an all-zero current record, as for [`aggregate_cpus`].
pub fn aggregate_softnet(curr: &mut [SoftnetStats], prev: &mut [SoftnetStats]) -> Vec<bool> {
    let mut offline = vec![false; curr.len()];
    if curr.len() < 2 {
        return offline;
    }

    let mut all_curr = SoftnetStats::default();
    let mut all_prev = SoftnetStats::default();
    let zero = SoftnetStats::default();

    for i in 1..curr.len() {
        if curr[i].is_zero() {
            offline[i] = true;
            continue;
        }
        all_curr.accumulate(&curr[i]);
        all_prev.accumulate(prev.get(i).unwrap_or(&zero));
    }

    curr[0] = all_curr;
    if let Some(p0) = prev.first_mut() {
        *p0 = all_prev;
    }
    offline
}

/// Extended block device figures.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtDiskStats {
    /// Busy time in milliseconds per second (divide by 10 for percent).
    pub util: f64,
    /// Average wait per I/O in milliseconds.
    pub await_ms: f64,
    /// Average request size in sectors.
    pub arqsz: f64,
}

pub fn ext_disk_stats(curr: &DiskStats, prev: &DiskStats, itv: u64) -> ExtDiskStats {
    let ios = curr.nr_ios.saturating_sub(prev.nr_ios) as f64;
    let ticks = curr.rd_ticks.saturating_sub(prev.rd_ticks) as f64
        + curr.wr_ticks.saturating_sub(prev.wr_ticks) as f64
        + curr.dc_ticks.saturating_sub(prev.dc_ticks) as f64;
    let sectors = curr.rd_sect.saturating_sub(prev.rd_sect) as f64
        + curr.wr_sect.saturating_sub(prev.wr_sect) as f64
        + curr.dc_sect.saturating_sub(prev.dc_sect) as f64;

    ExtDiskStats {
        util: s_value(prev.tot_ticks, curr.tot_ticks, itv),
        await_ms: if ios > 0.0 { ticks / ios } else { 0.0 },
        arqsz: if ios > 0.0 { sectors / ios } else { 0.0 },
    }
}

/// Interface utilisation in percent from byte rates and link speed (Mb/s).
pub fn if_util(rx: f64, tx: f64, speed: u32, duplex: Duplex) -> f64 {
    if speed == 0 {
        return 0.0;
    }
    let speed = speed as f64 * 1_000_000.0;
    match duplex {
        Duplex::Full => rx.max(tx) * 800.0 / speed,
        _ => (rx + tx) * 800.0 / speed,
    }
}

/// Space and inode usage of a filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FsUsage {
    /// Used space as seen by unprivileged users.
    pub user_used_pct: f64,
    pub used_pct: f64,
    pub inodes_used_pct: f64,
}

pub fn fs_usage(fs: &FilesystemStats) -> FsUsage {
    let pct = |free: u64, total: u64| {
        if total == 0 {
            0.0
        } else {
            sp_value(free, total, total)
        }
    };
    FsUsage {
        user_used_pct: pct(fs.f_bavail, fs.f_blocks),
        used_pct: pct(fs.f_bfree, fs.f_blocks),
        inodes_used_pct: pct(fs.f_ffree, fs.f_files),
    }
}

/// Share of the interval spent stalled, from cumulative microsecond totals.
pub fn psi_stall_pct(prev_total: u64, curr_total: u64, itv: u64) -> f64 {
    if curr_total < prev_total || itv == 0 {
        return 0.0;
    }
    (curr_total - prev_total) as f64 / (100.0 * itv as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_sequence_rates() {
        let counters = [0u64, 100, 250, 50, 80];
        let rates: Vec<f64> = counters
            .windows(2)
            .map(|w| s_value(w[0], w[1], 100))
            .collect();
        assert_eq!(rates, vec![100.0, 150.0, 0.0, 30.0]);
    }

    #[test]
    fn test_rate_replay_idempotent() {
        assert_eq!(s_value(10, 70, 300), s_value(10, 70, 300));
        assert_eq!(s_value(10, 70, 300), 20.0);
    }

    #[test]
    fn test_zero_interval() {
        assert_eq!(s_value(1, 5, 0), 0.0);
        assert_eq!(sp_value(1, 5, 0), 0.0);
        assert_eq!(psi_stall_pct(0, 100, 0), 0.0);
    }

    #[test]
    fn test_ll_sp_value_clamps() {
        assert_eq!(ll_sp_value(50, 40, 100), 0.0);
        assert_eq!(ll_sp_value(40, 90, 100), 50.0);
    }

    #[test]
    fn test_cpu_interval_excludes_guest() {
        let prev = CpuStats::default();
        let curr = CpuStats {
            user: 60,
            sys: 20,
            idle: 20,
            guest: 30,
            ..Default::default()
        };
        assert_eq!(cpu_interval(&curr, &prev), 100);
    }

    #[test]
    fn test_cpu_interval_tickless() {
        let prev = CpuStats {
            idle: 500,
            iowait: 10,
            ..Default::default()
        };
        assert_eq!(cpu_interval(&prev.clone(), &prev), 0);
        let back = CpuStats {
            idle: 100,
            iowait: 1,
            ..Default::default()
        };
        assert_eq!(cpu_interval(&back, &prev), 0);
    }

    #[test]
    fn test_aggregate_cpus_skips_offline() {
        let busy = |u: u64, i: u64| CpuStats {
            user: u,
            idle: i,
            ..Default::default()
        };
        let mut prev = vec![CpuStats::default(), busy(10, 10), busy(5, 5), busy(1, 1)];
        let mut curr = vec![
            CpuStats::default(),
            busy(60, 60),
            CpuStats::default(),
            busy(1, 101),
        ];
        let agg = aggregate_cpus(&mut curr, &mut prev);
        assert_eq!(agg.offline, vec![false, false, true, false]);
        assert_eq!(agg.interval, 100 + 100);
        assert_eq!(curr[0].user, 61);
        assert_eq!(prev[0].user, 11);
        assert_eq!(cpu_interval(&curr[0], &prev[0]), 200);
    }

    #[test]
    fn test_ext_disk_stats() {
        let prev = DiskStats::default();
        let curr = DiskStats {
            nr_ios: 10,
            rd_sect: 80,
            wr_sect: 20,
            rd_ticks: 30,
            wr_ticks: 20,
            tot_ticks: 500,
            ..Default::default()
        };
        let x = ext_disk_stats(&curr, &prev, 100);
        assert_eq!(x.util, 500.0);
        assert_eq!(x.await_ms, 5.0);
        assert_eq!(x.arqsz, 10.0);

        let idle = ext_disk_stats(&prev, &prev, 100);
        assert_eq!(idle.await_ms, 0.0);
    }

    #[test]
    fn test_if_util() {
        // 12.5 MB/s on a 100 Mb/s link is 100%.
        assert_eq!(if_util(12_500_000.0, 0.0, 100, Duplex::Full), 100.0);
        assert_eq!(if_util(6_250_000.0, 6_250_000.0, 100, Duplex::Half), 100.0);
        assert_eq!(if_util(6_250_000.0, 1.0, 100, Duplex::Full), 50.0);
        assert_eq!(if_util(1.0, 1.0, 0, Duplex::Full), 0.0);
    }

    #[test]
    fn test_fs_usage() {
        let fs = FilesystemStats {
            f_blocks: 200,
            f_bfree: 50,
            f_bavail: 20,
            f_files: 10,
            f_ffree: 10,
            ..Default::default()
        };
        let u = fs_usage(&fs);
        assert_eq!(u.used_pct, 75.0);
        assert_eq!(u.user_used_pct, 90.0);
        assert_eq!(u.inodes_used_pct, 0.0);
        assert_eq!(fs_usage(&FilesystemStats::default()).used_pct, 0.0);
    }

    #[test]
    fn test_psi_stall_pct() {
        // 250ms stalled over one second.
        assert_eq!(psi_stall_pct(1_000, 251_000, 100), 25.0);
        assert_eq!(psi_stall_pct(10, 5, 100), 0.0);
    }

    #[test]
    fn test_huge_counters_do_not_overflow() {
        let near = u64::MAX - 10;
        let curr = CpuStats {
            user: near,
            sys: near,
            idle: near,
            iowait: near,
            ..Default::default()
        };
        let prev = CpuStats {
            user: near - 100,
            idle: 0,
            iowait: 0,
            ..Default::default()
        };
        // Only checks that nothing panics; the sums wrap.
        let _ = cpu_interval(&curr, &prev);

        let mut curr = vec![CpuStats::default(), curr.clone(), curr];
        let mut prev = vec![CpuStats::default(), prev.clone(), prev];
        let agg = aggregate_cpus(&mut curr, &mut prev);
        assert_eq!(curr[0].user, near.wrapping_add(near));
        assert_eq!(agg.offline, vec![false, false, false]);

        let disk = DiskStats {
            nr_ios: 2,
            rd_ticks: u64::MAX,
            wr_ticks: u64::MAX,
            ..Default::default()
        };
        let x = ext_disk_stats(&disk, &DiskStats::default(), 100);
        assert_eq!(x.await_ms, u64::MAX as f64);
        assert!((psi_stall_pct(0, u64::MAX, u64::MAX) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_softnet_all_skips_offline() {
        let cpu = |processed, backlog_len| SoftnetStats {
            processed,
            backlog_len,
            ..Default::default()
        };
        let mut curr = vec![cpu(0, 0), cpu(300, 2), SoftnetStats::default(), cpu(50, 1)];
        let mut prev = vec![cpu(9, 9), cpu(100, 0), cpu(40, 0), cpu(20, 0)];
        let offline = aggregate_softnet(&mut curr, &mut prev);
        assert_eq!(offline, vec![false, false, true, false]);
        assert_eq!(curr[0], cpu(350, 3));
        assert_eq!(prev[0].processed, 120);
    }
}
