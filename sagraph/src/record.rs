//! Raw per-item statistic records as persisted in an archive.
//!
//! Counters are cumulative unless noted. The generic extrema pass walks
//! [`StatRecord::counter`] in record order, so field order here matters.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub trait StatRecord: Clone + Default + Debug + Serialize + DeserializeOwned {
    /// Number of counters visible to the generic extrema pass.
    const COUNTERS: usize;

    fn counter(&self, i: usize) -> u64;

    /// Identity of the item for families whose items come and go.
    fn key(&self) -> &str {
        ""
    }
}

macro_rules! counters {
    ($ty:ty, $($field:ident),+ $(,)?) => {
        impl StatRecord for $ty {
            const COUNTERS: usize = [$(stringify!($field)),+].len();

            fn counter(&self, i: usize) -> u64 {
                let fields = [$(self.$field as u64),+];
                fields.get(i).copied().unwrap_or(0)
            }
        }
    };
    ($ty:ty, key = $key:ident; $($field:ident),+ $(,)?) => {
        impl StatRecord for $ty {
            const COUNTERS: usize = [$(stringify!($field)),+].len();

            fn counter(&self, i: usize) -> u64 {
                let fields = [$(self.$field as u64),+];
                fields.get(i).copied().unwrap_or(0)
            }

            fn key(&self) -> &str {
                &self.$key
            }
        }
    };
}

/// CPU time in ticks. Item 0 is the "all" aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub user: u64,
    pub nice: u64,
    pub sys: u64,
    pub idle: u64,
    pub iowait: u64,
    pub steal: u64,
    pub hardirq: u64,
    pub softirq: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuStats {
    pub fn is_zero(&self) -> bool {
        *self == CpuStats::default()
    }

    /// Counters wrap like the kernel's own.
    pub(crate) fn accumulate(&mut self, other: &CpuStats) {
        self.user = self.user.wrapping_add(other.user);
        self.nice = self.nice.wrapping_add(other.nice);
        self.sys = self.sys.wrapping_add(other.sys);
        self.idle = self.idle.wrapping_add(other.idle);
        self.iowait = self.iowait.wrapping_add(other.iowait);
        self.steal = self.steal.wrapping_add(other.steal);
        self.hardirq = self.hardirq.wrapping_add(other.hardirq);
        self.softirq = self.softirq.wrapping_add(other.softirq);
        self.guest = self.guest.wrapping_add(other.guest);
        self.guest_nice = self.guest_nice.wrapping_add(other.guest_nice);
    }
}

counters!(CpuStats, user, nice, sys, idle, iowait, steal, hardirq, softirq, guest, guest_nice);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcswStats {
    pub context_switch: u64,
    pub processes: u64,
}

counters!(PcswStats, context_switch, processes);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapStats {
    pub pswpin: u64,
    pub pswpout: u64,
}

counters!(SwapStats, pswpin, pswpout);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingStats {
    pub pgpgin: u64,
    pub pgpgout: u64,
    pub pgfault: u64,
    pub pgmajfault: u64,
    pub pgfree: u64,
    pub pgscan_kswapd: u64,
    pub pgscan_direct: u64,
    pub pgsteal: u64,
    pub pgpromote: u64,
    pub pgdemote: u64,
}

counters!(
    PagingStats,
    pgpgin,
    pgpgout,
    pgfault,
    pgmajfault,
    pgfree,
    pgscan_kswapd,
    pgscan_direct,
    pgsteal,
    pgpromote,
    pgdemote
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoStats {
    pub dk_drive: u64,
    pub dk_drive_rio: u64,
    pub dk_drive_wio: u64,
    pub dk_drive_rblk: u64,
    pub dk_drive_wblk: u64,
    pub dk_drive_dio: u64,
    pub dk_drive_dblk: u64,
}

counters!(
    IoStats,
    dk_drive,
    dk_drive_rio,
    dk_drive_wio,
    dk_drive_rblk,
    dk_drive_wblk,
    dk_drive_dio,
    dk_drive_dblk
);

/// Gauges. Load averages are stored multiplied by 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueStats {
    pub nr_running: u64,
    pub procs_blocked: u64,
    pub nr_threads: u32,
    pub load_avg_1: u32,
    pub load_avg_5: u32,
    pub load_avg_15: u32,
}

counters!(
    QueueStats,
    nr_running,
    procs_blocked,
    nr_threads,
    load_avg_1,
    load_avg_5,
    load_avg_15
);

/// Block device counters; sectors are 512 bytes, ticks are milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskStats {
    pub name: String,
    pub major: u32,
    pub minor: u32,
    pub nr_ios: u64,
    pub rd_sect: u64,
    pub wr_sect: u64,
    pub dc_sect: u64,
    pub rd_ticks: u64,
    pub wr_ticks: u64,
    pub dc_ticks: u64,
    pub tot_ticks: u64,
    pub rq_ticks: u64,
}

counters!(
    DiskStats,
    key = name;
    nr_ios,
    rd_sect,
    wr_sect,
    dc_sect,
    rd_ticks,
    wr_ticks,
    dc_ticks,
    tot_ticks,
    rq_ticks
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duplex {
    #[default]
    Unknown,
    Half,
    Full,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetDevStats {
    pub interface: String,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_compressed: u64,
    pub tx_compressed: u64,
    pub multicast: u64,
    /// Link speed in Mb/s, 0 when unknown.
    pub speed: u32,
    pub duplex: Duplex,
}

counters!(
    NetDevStats,
    key = interface;
    rx_packets,
    tx_packets,
    rx_bytes,
    tx_bytes,
    rx_compressed,
    tx_compressed,
    multicast
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetEdevStats {
    pub interface: String,
    pub collisions: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub rx_fifo_errors: u64,
    pub tx_fifo_errors: u64,
    pub rx_frame_errors: u64,
    pub tx_carrier_errors: u64,
}

counters!(
    NetEdevStats,
    key = interface;
    collisions,
    rx_errors,
    tx_errors,
    rx_dropped,
    tx_dropped,
    rx_fifo_errors,
    tx_fifo_errors,
    rx_frame_errors,
    tx_carrier_errors
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FcHostStats {
    pub name: String,
    pub rx_frames: u64,
    pub tx_frames: u64,
    pub rx_words: u64,
    pub tx_words: u64,
}

counters!(FcHostStats, key = name; rx_frames, tx_frames, rx_words, tx_words);

/// Filesystem usage. Block figures are in bytes, inode figures are counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesystemStats {
    pub fs_name: String,
    pub mountp: String,
    pub f_blocks: u64,
    pub f_bfree: u64,
    pub f_bavail: u64,
    pub f_files: u64,
    pub f_ffree: u64,
}

counters!(
    FilesystemStats,
    key = fs_name;
    f_blocks,
    f_bfree,
    f_bavail,
    f_files,
    f_ffree
);

/// Pressure averages are percentages x100; totals are microseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsiCpuStats {
    pub some_acpu_10: u64,
    pub some_acpu_60: u64,
    pub some_acpu_300: u64,
    pub some_cpu_total: u64,
}

counters!(PsiCpuStats, some_acpu_10, some_acpu_60, some_acpu_300, some_cpu_total);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsiIoStats {
    pub some_aio_10: u64,
    pub some_aio_60: u64,
    pub some_aio_300: u64,
    pub some_io_total: u64,
    pub full_aio_10: u64,
    pub full_aio_60: u64,
    pub full_aio_300: u64,
    pub full_io_total: u64,
}

counters!(
    PsiIoStats,
    some_aio_10,
    some_aio_60,
    some_aio_300,
    some_io_total,
    full_aio_10,
    full_aio_60,
    full_aio_300,
    full_io_total
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsiMemStats {
    pub some_amem_10: u64,
    pub some_amem_60: u64,
    pub some_amem_300: u64,
    pub some_mem_total: u64,
    pub full_amem_10: u64,
    pub full_amem_60: u64,
    pub full_amem_300: u64,
    pub full_mem_total: u64,
}

counters!(
    PsiMemStats,
    some_amem_10,
    some_amem_60,
    some_amem_300,
    some_mem_total,
    full_amem_10,
    full_amem_60,
    full_amem_300,
    full_mem_total
);

/// Memory and swap gauges, in kB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    pub frmkb: u64,
    pub availablekb: u64,
    pub tlmkb: u64,
    pub bufkb: u64,
    pub camkb: u64,
    pub shmemkb: u64,
    pub comkb: u64,
    pub activekb: u64,
    pub inactkb: u64,
    pub dirtykb: u64,
    pub anonpgkb: u64,
    pub slabkb: u64,
    pub kstackkb: u64,
    pub pgtblkb: u64,
    pub vmusedkb: u64,
    pub frskb: u64,
    pub tlskb: u64,
    pub caskb: u64,
}

counters!(
    MemoryStats,
    frmkb,
    availablekb,
    tlmkb,
    bufkb,
    camkb,
    shmemkb,
    comkb,
    activekb,
    inactkb,
    dirtykb,
    anonpgkb,
    slabkb,
    kstackkb,
    pgtblkb,
    vmusedkb,
    frskb,
    tlskb,
    caskb
);

/// Huge pages gauges, in kB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HugeStats {
    pub frhkb: u64,
    pub tlhkb: u64,
    pub rsvdhkb: u64,
    pub surphkb: u64,
}

counters!(HugeStats, frhkb, tlhkb, rsvdhkb, surphkb);

/// Kernel table gauges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KtablesStats {
    pub dentry_stat: u64,
    pub file_used: u64,
    pub inode_used: u64,
    pub pty_nr: u64,
}

counters!(KtablesStats, dentry_stat, file_used, inode_used, pty_nr);

/// NFS client operation counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfsStats {
    pub nfs_rpccnt: u64,
    pub nfs_rpcretrans: u64,
    pub nfs_readcnt: u64,
    pub nfs_writecnt: u64,
    pub nfs_accesscnt: u64,
    pub nfs_getattcnt: u64,
}

counters!(
    NfsStats,
    nfs_rpccnt,
    nfs_rpcretrans,
    nfs_readcnt,
    nfs_writecnt,
    nfs_accesscnt,
    nfs_getattcnt
);

/// NFS server operation counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfsdStats {
    pub nfsd_rpccnt: u64,
    pub nfsd_rpcbad: u64,
    pub nfsd_netcnt: u64,
    pub nfsd_netudpcnt: u64,
    pub nfsd_nettcpcnt: u64,
    pub nfsd_rchits: u64,
    pub nfsd_rcmisses: u64,
    pub nfsd_readcnt: u64,
    pub nfsd_writecnt: u64,
    pub nfsd_accesscnt: u64,
    pub nfsd_getattcnt: u64,
}

counters!(
    NfsdStats,
    nfsd_rpccnt,
    nfsd_rpcbad,
    nfsd_netcnt,
    nfsd_netudpcnt,
    nfsd_nettcpcnt,
    nfsd_rchits,
    nfsd_rcmisses,
    nfsd_readcnt,
    nfsd_writecnt,
    nfsd_accesscnt,
    nfsd_getattcnt
);

/// IPv4 sockets in use. Gauges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SockStats {
    pub sock_inuse: u64,
    pub tcp_inuse: u64,
    pub udp_inuse: u64,
    pub raw_inuse: u64,
    pub frag_inuse: u64,
    pub tcp_tw: u64,
}

counters!(
    SockStats,
    sock_inuse,
    tcp_inuse,
    udp_inuse,
    raw_inuse,
    frag_inuse,
    tcp_tw
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpStats {
    pub in_receives: u64,
    pub forw_datagrams: u64,
    pub in_delivers: u64,
    pub out_requests: u64,
    pub reasm_reqds: u64,
    pub reasm_oks: u64,
    pub frag_oks: u64,
    pub frag_creates: u64,
}

counters!(
    IpStats,
    in_receives,
    forw_datagrams,
    in_delivers,
    out_requests,
    reasm_reqds,
    reasm_oks,
    frag_oks,
    frag_creates
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EipStats {
    pub in_hdr_errors: u64,
    pub in_addr_errors: u64,
    pub in_unknown_protos: u64,
    pub in_discards: u64,
    pub out_discards: u64,
    pub out_no_routes: u64,
    pub reasm_fails: u64,
    pub frag_fails: u64,
}

counters!(
    EipStats,
    in_hdr_errors,
    in_addr_errors,
    in_unknown_protos,
    in_discards,
    out_discards,
    out_no_routes,
    reasm_fails,
    frag_fails
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcmpStats {
    pub in_msgs: u64,
    pub out_msgs: u64,
    pub in_echos: u64,
    pub in_echo_reps: u64,
    pub out_echos: u64,
    pub out_echo_reps: u64,
    pub in_timestamps: u64,
    pub in_timestamp_reps: u64,
    pub out_timestamps: u64,
    pub out_timestamp_reps: u64,
    pub in_addr_masks: u64,
    pub in_addr_mask_reps: u64,
    pub out_addr_masks: u64,
    pub out_addr_mask_reps: u64,
}

counters!(
    IcmpStats,
    in_msgs,
    out_msgs,
    in_echos,
    in_echo_reps,
    out_echos,
    out_echo_reps,
    in_timestamps,
    in_timestamp_reps,
    out_timestamps,
    out_timestamp_reps,
    in_addr_masks,
    in_addr_mask_reps,
    out_addr_masks,
    out_addr_mask_reps
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EicmpStats {
    pub in_errors: u64,
    pub out_errors: u64,
    pub in_dest_unreachs: u64,
    pub out_dest_unreachs: u64,
    pub in_time_excds: u64,
    pub out_time_excds: u64,
    pub in_parm_probs: u64,
    pub out_parm_probs: u64,
    pub in_src_quenchs: u64,
    pub out_src_quenchs: u64,
    pub in_redirects: u64,
    pub out_redirects: u64,
}

counters!(
    EicmpStats,
    in_errors,
    out_errors,
    in_dest_unreachs,
    out_dest_unreachs,
    in_time_excds,
    out_time_excds,
    in_parm_probs,
    out_parm_probs,
    in_src_quenchs,
    out_src_quenchs,
    in_redirects,
    out_redirects
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpStats {
    pub active_opens: u64,
    pub passive_opens: u64,
    pub in_segs: u64,
    pub out_segs: u64,
}

counters!(TcpStats, active_opens, passive_opens, in_segs, out_segs);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtcpStats {
    pub attempt_fails: u64,
    pub estab_resets: u64,
    pub retrans_segs: u64,
    pub in_errs: u64,
    pub out_rsts: u64,
}

counters!(
    EtcpStats,
    attempt_fails,
    estab_resets,
    retrans_segs,
    in_errs,
    out_rsts
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdpStats {
    pub in_datagrams: u64,
    pub out_datagrams: u64,
    pub no_ports: u64,
    pub in_errors: u64,
}

counters!(UdpStats, in_datagrams, out_datagrams, no_ports, in_errors);

/// IPv6 sockets in use. Gauges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sock6Stats {
    pub tcp6_inuse: u64,
    pub udp6_inuse: u64,
    pub raw6_inuse: u64,
    pub frag6_inuse: u64,
}

counters!(Sock6Stats, tcp6_inuse, udp6_inuse, raw6_inuse, frag6_inuse);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ip6Stats {
    pub in_receives6: u64,
    pub out_forw_datagrams6: u64,
    pub in_delivers6: u64,
    pub out_requests6: u64,
    pub reasm_reqds6: u64,
    pub reasm_oks6: u64,
    pub in_mcast_pkts6: u64,
    pub out_mcast_pkts6: u64,
    pub frag_oks6: u64,
    pub frag_creates6: u64,
}

counters!(
    Ip6Stats,
    in_receives6,
    out_forw_datagrams6,
    in_delivers6,
    out_requests6,
    reasm_reqds6,
    reasm_oks6,
    in_mcast_pkts6,
    out_mcast_pkts6,
    frag_oks6,
    frag_creates6
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eip6Stats {
    pub in_hdr_errors6: u64,
    pub in_addr_errors6: u64,
    pub in_unknown_protos6: u64,
    pub in_too_big_errors6: u64,
    pub in_discards6: u64,
    pub out_discards6: u64,
    pub in_no_routes6: u64,
    pub out_no_routes6: u64,
    pub reasm_fails6: u64,
    pub frag_fails6: u64,
    pub in_truncated_pkts6: u64,
}

counters!(
    Eip6Stats,
    in_hdr_errors6,
    in_addr_errors6,
    in_unknown_protos6,
    in_too_big_errors6,
    in_discards6,
    out_discards6,
    in_no_routes6,
    out_no_routes6,
    reasm_fails6,
    frag_fails6,
    in_truncated_pkts6
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Icmp6Stats {
    pub in_msgs6: u64,
    pub out_msgs6: u64,
    pub in_echos6: u64,
    pub in_echo_replies6: u64,
    pub out_echo_replies6: u64,
    pub in_group_memb_queries6: u64,
    pub in_group_memb_responses6: u64,
    pub out_group_memb_responses6: u64,
    pub in_group_memb_reductions6: u64,
    pub out_group_memb_reductions6: u64,
    pub in_router_solicits6: u64,
    pub out_router_solicits6: u64,
    pub in_router_advertisements6: u64,
    pub in_neighbor_solicits6: u64,
    pub out_neighbor_solicits6: u64,
    pub in_neighbor_advertisements6: u64,
    pub out_neighbor_advertisements6: u64,
}

counters!(
    Icmp6Stats,
    in_msgs6,
    out_msgs6,
    in_echos6,
    in_echo_replies6,
    out_echo_replies6,
    in_group_memb_queries6,
    in_group_memb_responses6,
    out_group_memb_responses6,
    in_group_memb_reductions6,
    out_group_memb_reductions6,
    in_router_solicits6,
    out_router_solicits6,
    in_router_advertisements6,
    in_neighbor_solicits6,
    out_neighbor_solicits6,
    in_neighbor_advertisements6,
    out_neighbor_advertisements6
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Eicmp6Stats {
    pub in_errors6: u64,
    pub in_dest_unreachs6: u64,
    pub out_dest_unreachs6: u64,
    pub in_time_excds6: u64,
    pub out_time_excds6: u64,
    pub in_parm_problems6: u64,
    pub out_parm_problems6: u64,
    pub in_redirects6: u64,
    pub out_redirects6: u64,
    pub in_pkt_too_bigs6: u64,
    pub out_pkt_too_bigs6: u64,
}

counters!(
    Eicmp6Stats,
    in_errors6,
    in_dest_unreachs6,
    out_dest_unreachs6,
    in_time_excds6,
    out_time_excds6,
    in_parm_problems6,
    out_parm_problems6,
    in_redirects6,
    out_redirects6,
    in_pkt_too_bigs6,
    out_pkt_too_bigs6
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Udp6Stats {
    pub in_datagrams6: u64,
    pub out_datagrams6: u64,
    pub no_ports6: u64,
    pub in_errors6: u64,
}

counters!(Udp6Stats, in_datagrams6, out_datagrams6, no_ports6, in_errors6);

/// Per-CPU softnet counters. Item 0 is the "all" aggregate. The backlog
/// length is a gauge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftnetStats {
    pub processed: u64,
    pub dropped: u64,
    pub time_squeeze: u64,
    pub received_rps: u64,
    pub flow_limit: u64,
    pub backlog_len: u64,
}

impl SoftnetStats {
    pub fn is_zero(&self) -> bool {
        *self == SoftnetStats::default()
    }

    pub(crate) fn accumulate(&mut self, other: &SoftnetStats) {
        self.processed = self.processed.wrapping_add(other.processed);
        self.dropped = self.dropped.wrapping_add(other.dropped);
        self.time_squeeze = self.time_squeeze.wrapping_add(other.time_squeeze);
        self.received_rps = self.received_rps.wrapping_add(other.received_rps);
        self.flow_limit = self.flow_limit.wrapping_add(other.flow_limit);
        self.backlog_len = self.backlog_len.wrapping_add(other.backlog_len);
    }
}

counters!(
    SoftnetStats,
    processed,
    dropped,
    time_squeeze,
    received_rps,
    flow_limit,
    backlog_len
);

/// Clock frequency of one CPU in MHz x100. Item 0 is CPU "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuFreqStats {
    pub cpufreq: u64,
}

counters!(CpuFreqStats, cpufreq);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanStats {
    pub rpm: f64,
    pub rpm_min: f64,
    pub device: String,
}

counters!(FanStats, rpm, rpm_min);

/// Temperature sensor reading and its range, in degrees Celsius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempStats {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub device: String,
}

counters!(TempStats, temp, temp_min, temp_max);

/// Voltage input reading and its range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InStats {
    #[serde(rename = "in")]
    pub voltage: f64,
    pub in_min: f64,
    pub in_max: f64,
    pub device: String,
}

counters!(InStats, voltage, in_min, in_max);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatStats {
    pub bat_id: u8,
    /// Remaining capacity in percent.
    pub capacity: u8,
    pub status: u8,
}

counters!(BatStats, capacity);
