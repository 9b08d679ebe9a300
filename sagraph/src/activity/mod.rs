//! Static catalogue of statistic families.
//!
//! Every family the collector knows about is described once here. The
//! descriptors carry no logic; the buffer store, the renderers and the report
//! driver read them to size allocations, validate item counts and decide
//! which families can be drawn.

mod catalogue;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use catalogue::{CATALOGUE, catalogue, descriptor, find_by_name};

/// Upper bound on CPUs. CPU-shaped families reserve one extra item for "all".
pub const NR_CPUS: usize = 16384;
pub const MAX_NR_SERIAL_LINES: usize = 65536;
pub const MAX_NR_DISKS: usize = 65536 * 4096;
pub const MAX_NR_IFACES: usize = 65536;
pub const MAX_NR_FANS: usize = 4096;
pub const MAX_NR_TEMP_SENSORS: usize = 4096;
pub const MAX_NR_IN_SENSORS: usize = 4096;
pub const MAX_NR_USB: usize = 4096;
pub const MAX_NR_FS: usize = 65536 * 4096;
pub const MAX_NR_FCHOSTS: usize = 65536;
pub const MAX_NR_BATS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActivityId {
    Cpu = 1,
    Pcsw,
    Irq,
    Swap,
    Page,
    Io,
    Memory,
    Huge,
    Ktables,
    Queue,
    Serial,
    Disk,
    NetDev,
    NetEdev,
    NetNfs,
    NetNfsd,
    NetSock,
    NetIp,
    NetEip,
    NetIcmp,
    NetEicmp,
    NetTcp,
    NetEtcp,
    NetUdp,
    NetSock6,
    NetIp6,
    NetEip6,
    NetIcmp6,
    NetEicmp6,
    NetUdp6,
    NetFc,
    NetSoft,
    PwrCpu,
    PwrFan,
    PwrTemp,
    PwrIn,
    PwrFreq,
    PwrBat,
    PwrUsb,
    Fs,
    PsiCpu,
    PsiIo,
    PsiMem,
}

impl ActivityId {
    pub fn name(self) -> &'static str {
        descriptor(self).name
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Options: u16 {
        /// Collected by default when no explicit selection is made.
        const COLLECTED = 0x0001;
        /// Item count is read from the system and may change between runs.
        const COUNTED = 0x0002;
        /// Item count stays fixed across a restart record.
        const PERSISTENT = 0x0004;
        /// Several distinct output layouts exist for the family.
        const MULTIPLE_OUTPUTS = 0x0008;
        /// One set of graphs is drawn per item.
        const GRAPH_PER_ITEM = 0x0010;
        /// Records form an items x secondary matrix.
        const MATRIX = 0x0020;
        /// Only present if the running kernel exposes it.
        const DETECTED = 0x0040;
        /// Last family of a markup section.
        const CLOSE_MARKUP = 0x0080;
        /// Item count is re-read at every sample.
        const ALWAYS_COUNTED = 0x0100;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Formats: u8 {
        const TEXT = 0x01;
        const XML = 0x02;
        const JSON = 0x04;
        const SVG = 0x08;
        const RAW = 0x10;
        const PCP = 0x20;
    }
}

/// Selection group a family belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Default,
    Int,
    Disk,
    Snmp,
    Ipv6,
    Power,
    Xdisk,
}

/// Number of items (or of the matrix's second dimension).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCount {
    Fixed(usize),
    /// Unknown until the first read of a run.
    Resolved,
}

impl ItemCount {
    pub fn fixed(self) -> Option<usize> {
        match self {
            ItemCount::Fixed(n) => Some(n),
            ItemCount::Resolved => None,
        }
    }
}

/// Counter fields per numeric width class, in record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldCounts {
    pub ull: usize,
    pub ul: usize,
    pub u: usize,
}

impl FieldCounts {
    pub const fn total(&self) -> usize {
        self.ull + self.ul + self.u
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub id: ActivityId,
    pub name: &'static str,
    pub description: &'static str,
    pub options: Options,
    pub group: Group,
    /// Metric names, `;`-separated, alternatives split by `|`.
    pub header_line: &'static str,
    pub record_size: usize,
    pub mem_size: usize,
    pub initial_items: ItemCount,
    pub secondary: ItemCount,
    pub max_items: usize,
    /// Number of graph views drawn per item.
    pub views: usize,
    /// Extrema slots per item.
    pub xnr: usize,
    pub fields: FieldCounts,
    pub formats: Formats,
}

impl Descriptor {
    pub fn has(&self, opt: Options) -> bool {
        self.options.contains(opt)
    }

    pub fn supports(&self, fmt: Formats) -> bool {
        self.formats.contains(fmt)
    }

    pub fn is_dynamic(&self) -> bool {
        self.initial_items == ItemCount::Resolved
    }

    /// Metric names of the header line alternative at `variant`.
    pub fn metric_names(&self, variant: usize) -> Vec<&'static str> {
        self.header_line
            .split('|')
            .nth(variant)
            .map(|line| line.split(';').collect())
            .unwrap_or_default()
    }
}
