use super::ItemCount::{Fixed, Resolved};
use super::{
    ActivityId, Descriptor, FieldCounts, Formats, Group, MAX_NR_BATS, MAX_NR_DISKS,
    MAX_NR_FANS, MAX_NR_FCHOSTS, MAX_NR_FS, MAX_NR_IFACES, MAX_NR_IN_SENSORS,
    MAX_NR_SERIAL_LINES, MAX_NR_TEMP_SENSORS, MAX_NR_USB, NR_CPUS, Options,
};

const TEXTUAL: Formats = Formats::TEXT
    .union(Formats::XML)
    .union(Formats::JSON)
    .union(Formats::RAW)
    .union(Formats::PCP);

macro_rules! activity {
    (
        $id:ident, $name:literal, $desc:literal, [$($opt:ident),*], $group:ident,
        $hdr:expr, size $size:expr, items $ini:expr, nr2 $nr2:expr, max $max:expr,
        views $g:expr, xnr $xnr:expr, fields ($ull:expr, $ul:expr, $u:expr), svg $svg:expr
    ) => {
        Descriptor {
            id: ActivityId::$id,
            name: $name,
            description: $desc,
            options: Options::empty()$(.union(Options::$opt))*,
            group: Group::$group,
            header_line: $hdr,
            record_size: $size,
            mem_size: $size,
            initial_items: $ini,
            secondary: $nr2,
            max_items: $max,
            views: $g,
            xnr: $xnr,
            fields: FieldCounts { ull: $ull, ul: $ul, u: $u },
            formats: if $svg { TEXTUAL.union(Formats::SVG) } else { TEXTUAL },
        }
    };
}

pub static CATALOGUE: [Descriptor; 43] = [
    activity!(Cpu, "A_CPU", "CPU utilization",
        [COLLECTED, COUNTED, PERSISTENT, MULTIPLE_OUTPUTS, GRAPH_PER_ITEM, ALWAYS_COUNTED], Default,
        "CPU;%user;%nice;%system;%iowait;%steal;%idle|CPU;%usr;%nice;%sys;%iowait;%steal;%irq;%soft;%guest;%gnice;%idle",
        size 80, items Resolved, nr2 Fixed(1), max NR_CPUS + 1,
        views 1, xnr 10, fields (10, 0, 0), svg true),
    activity!(Pcsw, "A_PCSW", "Task creation and switching activity",
        [COLLECTED], Default,
        "proc/s;cswch/s",
        size 16, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 2, fields (1, 1, 0), svg true),
    activity!(Irq, "A_IRQ", "Interrupts statistics",
        [COUNTED, MATRIX, PERSISTENT], Int,
        "INTR;CPU*",
        size 24, items Resolved, nr2 Resolved, max NR_CPUS + 1,
        views 0, xnr 0, fields (1, 0, 0), svg false),
    activity!(Swap, "A_SWAP", "Swap activity",
        [COLLECTED], Default,
        "pswpin/s;pswpout/s",
        size 16, items Fixed(1), nr2 Fixed(1), max 1,
        views 1, xnr 2, fields (0, 2, 0), svg true),
    activity!(Page, "A_PAGE", "Paging activity",
        [COLLECTED], Default,
        "pgpgin/s;pgpgout/s;fault/s;majflt/s;pgfree/s;pgscank/s;pgscand/s;pgsteal/s;pgprom/s;pgdem/s",
        size 80, items Fixed(1), nr2 Fixed(1), max 1,
        views 4, xnr 10, fields (0, 10, 0), svg true),
    activity!(Io, "A_IO", "I/O and transfer rate statistics",
        [COLLECTED], Default,
        "tps;rtps;wtps;dtps;bread/s;bwrtn/s;bdscd/s",
        size 56, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 7, fields (7, 0, 0), svg true),
    activity!(Memory, "A_MEMORY", "Memory and/or swap utilization",
        [COLLECTED, MULTIPLE_OUTPUTS], Default,
        "kbmemfree;kbavail;kbmemused;%memused;kbbuffers;kbcached;kbcommit;%commit;kbactive;kbinact;kbdirty;kbshmem&kbanonpg;kbslab;kbkstack;kbpgtbl;kbvmused|kbswpfree;kbswpused;%swpused;kbswpcad;%swpcad",
        size 136, items Fixed(1), nr2 Fixed(1), max 1,
        views 9, xnr 23, fields (17, 0, 0), svg true),
    activity!(Huge, "A_HUGE", "Huge pages utilization",
        [COLLECTED], Default,
        "kbhugfree;kbhugused;%hugused;kbhugrsvd;kbhugsurp",
        size 40, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 5, fields (5, 0, 0), svg true),
    activity!(Ktables, "A_KTABLES", "Kernel tables statistics",
        [COLLECTED], Default,
        "dentunusd;file-nr;inode-nr;pty-nr",
        size 32, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 4, fields (4, 0, 0), svg true),
    activity!(Queue, "A_QUEUE", "Queue length and load average statistics",
        [COLLECTED], Default,
        "runq-sz;plist-sz;ldavg-1;ldavg-5;ldavg-15;blocked",
        size 32, items Fixed(1), nr2 Fixed(1), max 1,
        views 3, xnr 6, fields (2, 0, 4), svg true),
    activity!(Serial, "A_SERIAL", "TTY devices statistics",
        [COLLECTED, COUNTED], Default,
        "TTY;rcvin/s;xmtin/s;framerr/s;prtyerr/s;brk/s;ovrun/s",
        size 28, items Resolved, nr2 Fixed(1), max MAX_NR_SERIAL_LINES,
        views 0, xnr 6, fields (0, 0, 7), svg false),
    activity!(Disk, "A_DISK", "Block devices statistics",
        [COUNTED, GRAPH_PER_ITEM], Disk,
        "DEV;tps;rkB/s;wkB/s;dkB/s;areq-sz;aqu-sz;await;%util",
        size 104, items Resolved, nr2 Fixed(1), max MAX_NR_DISKS,
        views 5, xnr 8, fields (3, 8, 3), svg true),
    activity!(NetDev, "A_NET_DEV", "Network interfaces statistics",
        [COLLECTED, COUNTED, GRAPH_PER_ITEM], Default,
        "IFACE;rxpck/s;txpck/s;rxkB/s;txkB/s;rxcmp/s;txcmp/s;rxmcst/s;%ifutil",
        size 80, items Resolved, nr2 Fixed(1), max MAX_NR_IFACES,
        views 4, xnr 8, fields (7, 0, 1), svg true),
    activity!(NetEdev, "A_NET_EDEV", "Network interfaces errors statistics",
        [COLLECTED, COUNTED, GRAPH_PER_ITEM], Default,
        "IFACE;rxerr/s;txerr/s;coll/s;rxdrop/s;txdrop/s;txcarr/s;rxfram/s;rxfifo/s;txfifo/s",
        size 88, items Resolved, nr2 Fixed(1), max MAX_NR_IFACES,
        views 4, xnr 9, fields (9, 0, 0), svg true),
    activity!(NetNfs, "A_NET_NFS", "NFS client statistics",
        [COLLECTED], Default,
        "call/s;retrans/s;read/s;write/s;access/s;getatt/s",
        size 24, items Fixed(1), nr2 Fixed(1), max 1,
        views 3, xnr 6, fields (0, 0, 6), svg true),
    activity!(NetNfsd, "A_NET_NFSD", "NFS server statistics",
        [COLLECTED], Default,
        "scall/s;badcall/s;packet/s;udp/s;tcp/s;hit/s;miss/s;sread/s;swrite/s;saccess/s;sgetatt/s",
        size 44, items Fixed(1), nr2 Fixed(1), max 1,
        views 5, xnr 11, fields (0, 0, 11), svg true),
    activity!(NetSock, "A_NET_SOCK", "IPv4 sockets statistics",
        [COLLECTED], Default,
        "totsck;tcpsck;udpsck;rawsck;ip-frag;tcp-tw",
        size 24, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 6, fields (0, 0, 6), svg true),
    activity!(NetIp, "A_NET_IP", "IPv4 traffic statistics",
        [], Snmp,
        "irec/s;fwddgm/s;idel/s;orq/s;asmrq/s;asmok/s;fragok/s;fragcrt/s",
        size 64, items Fixed(1), nr2 Fixed(1), max 1,
        views 3, xnr 8, fields (8, 0, 0), svg true),
    activity!(NetEip, "A_NET_EIP", "IPv4 traffic errors statistics",
        [], Snmp,
        "ihdrerr/s;iadrerr/s;iukwnpr/s;idisc/s;odisc/s;onort/s;asmf/s;fragf/s",
        size 64, items Fixed(1), nr2 Fixed(1), max 1,
        views 3, xnr 8, fields (8, 0, 0), svg true),
    activity!(NetIcmp, "A_NET_ICMP", "ICMPv4 traffic statistics",
        [], Snmp,
        "imsg/s;omsg/s;iech/s;iechr/s;oech/s;oechr/s;itm/s;itmr/s;otm/s;otmr/s;iadrmk/s;iadrmkr/s;oadrmk/s;oadrmkr/s",
        size 112, items Fixed(1), nr2 Fixed(1), max 1,
        views 4, xnr 14, fields (0, 14, 0), svg true),
    activity!(NetEicmp, "A_NET_EICMP", "ICMPv4 traffic errors statistics",
        [], Snmp,
        "ierr/s;oerr/s;idstunr/s;odstunr/s;itmex/s;otmex/s;iparmpb/s;oparmpb/s;isrcq/s;osrcq/s;iredir/s;oredir/s",
        size 96, items Fixed(1), nr2 Fixed(1), max 1,
        views 6, xnr 12, fields (0, 12, 0), svg true),
    activity!(NetTcp, "A_NET_TCP", "TCPv4 traffic statistics",
        [], Snmp,
        "active/s;passive/s;iseg/s;oseg/s",
        size 32, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 4, fields (0, 4, 0), svg true),
    activity!(NetEtcp, "A_NET_ETCP", "TCPv4 traffic errors statistics",
        [], Snmp,
        "atmptf/s;estres/s;retrseg/s;isegerr/s;orsts/s",
        size 40, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 5, fields (0, 5, 0), svg true),
    activity!(NetUdp, "A_NET_UDP", "UDPv4 traffic statistics",
        [], Snmp,
        "idgm/s;odgm/s;noport/s;idgmerr/s",
        size 32, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 4, fields (0, 4, 0), svg true),
    activity!(NetSock6, "A_NET_SOCK6", "IPv6 sockets statistics",
        [], Ipv6,
        "tcp6sck;udp6sck;raw6sck;ip6-frag",
        size 16, items Fixed(1), nr2 Fixed(1), max 1,
        views 1, xnr 4, fields (0, 0, 4), svg true),
    activity!(NetIp6, "A_NET_IP6", "IPv6 traffic statistics",
        [], Ipv6,
        "irec6/s;fwddgm6/s;idel6/s;orq6/s;asmrq6/s;asmok6/s;imcpck6/s;omcpck6/s;fragok6/s;fragcr6/s",
        size 80, items Fixed(1), nr2 Fixed(1), max 1,
        views 4, xnr 10, fields (10, 0, 0), svg true),
    activity!(NetEip6, "A_NET_EIP6", "IPv6 traffic errors statistics",
        [], Ipv6,
        "ihdrer6/s;iadrer6/s;iukwnp6/s;i2big6/s;idisc6/s;odisc6/s;inort6/s;onort6/s;asmf6/s;fragf6/s;itrpck6/s",
        size 88, items Fixed(1), nr2 Fixed(1), max 1,
        views 4, xnr 11, fields (11, 0, 0), svg true),
    activity!(NetIcmp6, "A_NET_ICMP6", "ICMPv6 traffic statistics",
        [], Ipv6,
        "imsg6/s;omsg6/s;iech6/s;iechr6/s;oechr6/s;igmbq6/s;igmbr6/s;ogmbr6/s;igmbrd6/s;ogmbrd6/s;irtsol6/s;ortsol6/s;irtad6/s;inbsol6/s;onbsol6/s;inbad6/s;onbad6/s",
        size 136, items Fixed(1), nr2 Fixed(1), max 1,
        views 5, xnr 17, fields (0, 17, 0), svg true),
    activity!(NetEicmp6, "A_NET_EICMP6", "ICMPv6 traffic errors statistics",
        [], Ipv6,
        "ierr6/s;idtunr6/s;odtunr6/s;itmex6/s;otmex6/s;iprmpb6/s;oprmpb6/s;iredir6/s;oredir6/s;ipck2b6/s;opck2b6/s",
        size 88, items Fixed(1), nr2 Fixed(1), max 1,
        views 6, xnr 11, fields (0, 11, 0), svg true),
    activity!(NetUdp6, "A_NET_UDP6", "UDPv6 traffic statistics",
        [], Ipv6,
        "idgm6/s;odgm6/s;noport6/s;idgmer6/s",
        size 32, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 4, fields (0, 4, 0), svg true),
    activity!(NetFc, "A_NET_FC", "Fibre Channel HBA statistics",
        [COUNTED, GRAPH_PER_ITEM], Disk,
        "FCHOST;fch_rxf/s;fch_txf/s;fch_rxw/s;fch_txw/s",
        size 64, items Resolved, nr2 Fixed(1), max MAX_NR_FCHOSTS,
        views 2, xnr 4, fields (0, 4, 0), svg true),
    activity!(NetSoft, "A_NET_SOFT", "Software-based network processing statistics",
        [COLLECTED, COUNTED, CLOSE_MARKUP, GRAPH_PER_ITEM, PERSISTENT], Default,
        "CPU;total/s;dropd/s;squeezd/s;rx_rps/s;flw_lim/s;blg_len",
        size 24, items Resolved, nr2 Fixed(1), max NR_CPUS + 1,
        views 3, xnr 6, fields (0, 0, 6), svg true),
    activity!(PwrCpu, "A_PWR_CPU", "CPU clock frequency",
        [COUNTED, GRAPH_PER_ITEM], Power,
        "CPU;MHz",
        size 8, items Resolved, nr2 Fixed(1), max NR_CPUS + 1,
        views 1, xnr 1, fields (1, 0, 0), svg true),
    activity!(PwrFan, "A_PWR_FAN", "Fans speed",
        [COUNTED, GRAPH_PER_ITEM], Power,
        "FAN;DEVICE;rpm;drpm",
        size 80, items Resolved, nr2 Fixed(1), max MAX_NR_FANS,
        views 1, xnr 2, fields (0, 0, 0), svg true),
    activity!(PwrTemp, "A_PWR_TEMP", "Devices temperature",
        [COUNTED, GRAPH_PER_ITEM], Power,
        "TEMP;DEVICE;degC;%temp",
        size 88, items Resolved, nr2 Fixed(1), max MAX_NR_TEMP_SENSORS,
        views 2, xnr 2, fields (0, 0, 0), svg true),
    activity!(PwrIn, "A_PWR_IN", "Voltage inputs statistics",
        [COUNTED, GRAPH_PER_ITEM], Power,
        "IN;DEVICE;inV;%in",
        size 88, items Resolved, nr2 Fixed(1), max MAX_NR_IN_SENSORS,
        views 2, xnr 2, fields (0, 0, 0), svg true),
    activity!(PwrFreq, "A_PWR_FREQ", "CPU weighted frequency",
        [COUNTED, MATRIX], Power,
        "CPU;wghMHz",
        size 16, items Resolved, nr2 Resolved, max NR_CPUS + 1,
        views 0, xnr 0, fields (1, 1, 0), svg false),
    activity!(PwrBat, "A_PWR_BAT", "Batteries capacity",
        [COUNTED, GRAPH_PER_ITEM], Power,
        "BAT;%cap;cap/min;status",
        size 8, items Resolved, nr2 Fixed(1), max MAX_NR_BATS,
        views 1, xnr 1, fields (0, 0, 1), svg true),
    activity!(PwrUsb, "A_PWR_USB", "USB devices",
        [COUNTED, CLOSE_MARKUP], Power,
        "manufact;product;BUS;idvendor;idprod;maxpower",
        size 112, items Resolved, nr2 Fixed(1), max MAX_NR_USB,
        views 0, xnr 0, fields (0, 0, 4), svg false),
    activity!(Fs, "A_FS", "Filesystems statistics",
        [COUNTED, GRAPH_PER_ITEM, MULTIPLE_OUTPUTS], Xdisk,
        "FILESYSTEM;MBfsfree;MBfsused;%fsused;%ufsused;Ifree;Iused;%Iused|MOUNTPOINT;MBfsfree;MBfsused;%fsused;%ufsused;Ifree;Iused;%Iused",
        size 296, items Resolved, nr2 Fixed(1), max MAX_NR_FS,
        views 4, xnr 7, fields (5, 0, 0), svg true),
    activity!(PsiCpu, "A_PSI_CPU", "Pressure-stall CPU statistics",
        [COLLECTED, DETECTED], Default,
        "%scpu-10;%scpu-60;%scpu-300;%scpu",
        size 32, items Fixed(1), nr2 Fixed(1), max 1,
        views 2, xnr 4, fields (1, 3, 0), svg true),
    activity!(PsiIo, "A_PSI_IO", "Pressure-stall I/O statistics",
        [COLLECTED, DETECTED], Default,
        "%sio-10;%sio-60;%sio-300;%sio;%fio-10;%fio-60;%fio-300;%fio",
        size 64, items Fixed(1), nr2 Fixed(1), max 1,
        views 4, xnr 8, fields (2, 6, 0), svg true),
    activity!(PsiMem, "A_PSI_MEM", "Pressure-stall memory statistics",
        [COLLECTED, DETECTED, CLOSE_MARKUP], Default,
        "%smem-10;%smem-60;%smem-300;%smem;%fmem-10;%fmem-60;%fmem-300;%fmem",
        size 64, items Fixed(1), nr2 Fixed(1), max 1,
        views 4, xnr 8, fields (2, 6, 0), svg true),
];

/// All descriptors in canonical (report) order.
pub fn catalogue() -> &'static [Descriptor] {
    &CATALOGUE
}

pub fn descriptor(id: ActivityId) -> &'static Descriptor {
    &CATALOGUE[id as usize - 1]
}

/// Looks a family up by its stable name; the `A_` prefix is optional and
/// case is ignored.
pub fn find_by_name(name: &str) -> Option<&'static Descriptor> {
    let name = name.trim();
    CATALOGUE.iter().find(|d| {
        d.name.eq_ignore_ascii_case(name)
            || d.name
                .strip_prefix("A_")
                .is_some_and(|short| short.eq_ignore_ascii_case(name))
    })
}
