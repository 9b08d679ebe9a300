//! NFS client and server activity, sockets in use, and the IPv4/IPv6
//! protocol counters.
//!
//! Every family here is a single item drawn as plain line graphs, either
//! of per-second rates or of gauges, with views following the record order.

use super::{GraphData, GraphKind, Slot, sample_gauges, sample_rates};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::error::Result;
use crate::record::{
    EicmpStats, Eicmp6Stats, EipStats, Eip6Stats, EtcpStats, IcmpStats, Icmp6Stats, IpStats,
    Ip6Stats, NfsStats, NfsdStats, Sock6Stats, SockStats, StatRecord, TcpStats, UdpStats,
    Udp6Stats,
};
use crate::svg::{Metric, SvgContext, View};

fn rates<R: StatRecord>(
    data: &mut GraphData<R>,
    ctx: &SvgContext<'_>,
    itv: u64,
    hdr: &RecordHeader,
) {
    let fields: Vec<usize> = (0..R::COUNTERS).collect();
    sample_rates(data, ctx, itv, hdr, &fields);
}

fn gauges<R: StatRecord>(
    data: &mut GraphData<R>,
    ctx: &SvgContext<'_>,
    _itv: u64,
    hdr: &RecordHeader,
) {
    sample_gauges(data, ctx, hdr);
}

macro_rules! snmp_graph {
    (
        $(#[$doc:meta])*
        $name:ident, $record:ty, $id:ident, $sample:ident,
        [$($title:literal => [$($metric:expr),+ $(,)?]),+ $(,)?]
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            pub const VIEWS: &'static [View<'static>] =
                &[$(View::line($title, &[$($metric),+])),+];
        }

        impl GraphKind for $name {
            type Record = $record;
            const ID: ActivityId = ActivityId::$id;

            fn sample(
                &mut self,
                data: &mut GraphData<$record>,
                ctx: &SvgContext<'_>,
                itv: u64,
                hdr: &RecordHeader,
            ) {
                $sample(data, ctx, itv, hdr);
            }

            fn finish(
                &mut self,
                data: &mut GraphData<$record>,
                ctx: &mut SvgContext<'_>,
                hdr: &RecordHeader,
            ) -> Result<()> {
                data.draw_item(ctx, Self::VIEWS, Slot::single(), hdr)?;
                Ok(())
            }
        }
    };
}

const fn r(label: &'static str) -> Metric {
    Metric::float(label)
}

const fn n(label: &'static str) -> Metric {
    Metric::int(label)
}

snmp_graph!(NfsGraph, NfsStats, NetNfs, rates, [
    "NFS client statistics (1)" => [r("call/s"), r("retrans/s")],
    "NFS client statistics (2)" => [r("read/s"), r("write/s")],
    "NFS client statistics (3)" => [r("access/s"), r("getatt/s")],
]);

snmp_graph!(NfsdGraph, NfsdStats, NetNfsd, rates, [
    "NFS server statistics (1)" => [r("scall/s"), r("badcall/s")],
    "NFS server statistics (2)" => [r("packet/s"), r("udp/s"), r("tcp/s")],
    "NFS server statistics (3)" => [r("hit/s"), r("miss/s")],
    "NFS server statistics (4)" => [r("sread/s"), r("swrite/s")],
    "NFS server statistics (5)" => [r("saccess/s"), r("sgetatt/s")],
]);

snmp_graph!(
    /// Sockets in use; the total gets a view of its own.
    SockGraph, SockStats, NetSock, gauges, [
    "IPv4 sockets statistics (1)" => [n("totsck")],
    "IPv4 sockets statistics (2)" => [
        n("tcpsck"), n("udpsck"), n("rawsck"), n("ip-frag"), n("tcp-tw"),
    ],
]);

snmp_graph!(IpGraph, IpStats, NetIp, rates, [
    "IPv4 traffic statistics (1)" => [r("irec/s"), r("fwddgm/s"), r("idel/s"), r("orq/s")],
    "IPv4 traffic statistics (2)" => [r("asmrq/s"), r("asmok/s")],
    "IPv4 traffic statistics (3)" => [r("fragok/s"), r("fragcrt/s")],
]);

snmp_graph!(EipGraph, EipStats, NetEip, rates, [
    "IPv4 traffic errors statistics (1)" => [r("ihdrerr/s"), r("iadrerr/s"), r("iukwnpr/s")],
    "IPv4 traffic errors statistics (2)" => [r("idisc/s"), r("odisc/s")],
    "IPv4 traffic errors statistics (3)" => [r("onort/s"), r("asmf/s"), r("fragf/s")],
]);

snmp_graph!(IcmpGraph, IcmpStats, NetIcmp, rates, [
    "ICMPv4 traffic statistics (1)" => [r("imsg/s"), r("omsg/s")],
    "ICMPv4 traffic statistics (2)" => [r("iech/s"), r("iechr/s"), r("oech/s"), r("oechr/s")],
    "ICMPv4 traffic statistics (3)" => [r("itm/s"), r("itmr/s"), r("otm/s"), r("otmr/s")],
    "ICMPv4 traffic statistics (4)" => [
        r("iadrmk/s"), r("iadrmkr/s"), r("oadrmk/s"), r("oadrmkr/s"),
    ],
]);

snmp_graph!(EicmpGraph, EicmpStats, NetEicmp, rates, [
    "ICMPv4 traffic errors statistics (1)" => [r("ierr/s"), r("oerr/s")],
    "ICMPv4 traffic errors statistics (2)" => [r("idstunr/s"), r("odstunr/s")],
    "ICMPv4 traffic errors statistics (3)" => [r("itmex/s"), r("otmex/s")],
    "ICMPv4 traffic errors statistics (4)" => [r("iparmpb/s"), r("oparmpb/s")],
    "ICMPv4 traffic errors statistics (5)" => [r("isrcq/s"), r("osrcq/s")],
    "ICMPv4 traffic errors statistics (6)" => [r("iredir/s"), r("oredir/s")],
]);

snmp_graph!(TcpGraph, TcpStats, NetTcp, rates, [
    "TCPv4 traffic statistics (1)" => [r("active/s"), r("passive/s")],
    "TCPv4 traffic statistics (2)" => [r("iseg/s"), r("oseg/s")],
]);

snmp_graph!(EtcpGraph, EtcpStats, NetEtcp, rates, [
    "TCPv4 traffic errors statistics (1)" => [r("atmptf/s"), r("estres/s")],
    "TCPv4 traffic errors statistics (2)" => [r("retrseg/s"), r("isegerr/s"), r("orsts/s")],
]);

snmp_graph!(UdpGraph, UdpStats, NetUdp, rates, [
    "UDPv4 traffic statistics (1)" => [r("idgm/s"), r("odgm/s")],
    "UDPv4 traffic statistics (2)" => [r("noport/s"), r("idgmerr/s")],
]);

snmp_graph!(Sock6Graph, Sock6Stats, NetSock6, gauges, [
    "IPv6 sockets statistics" => [n("tcp6sck"), n("udp6sck"), n("raw6sck"), n("ip6-frag")],
]);

snmp_graph!(Ip6Graph, Ip6Stats, NetIp6, rates, [
    "IPv6 traffic statistics (1)" => [r("irec6/s"), r("fwddgm6/s"), r("idel6/s"), r("orq6/s")],
    "IPv6 traffic statistics (2)" => [r("asmrq6/s"), r("asmok6/s")],
    "IPv6 traffic statistics (3)" => [r("imcpck6/s"), r("omcpck6/s")],
    "IPv6 traffic statistics (4)" => [r("fragok6/s"), r("fragcr6/s")],
]);

snmp_graph!(Eip6Graph, Eip6Stats, NetEip6, rates, [
    "IPv6 traffic errors statistics (1)" => [
        r("ihdrer6/s"), r("iadrer6/s"), r("iukwnp6/s"), r("i2big6/s"),
    ],
    "IPv6 traffic errors statistics (2)" => [r("idisc6/s"), r("odisc6/s")],
    "IPv6 traffic errors statistics (3)" => [r("inort6/s"), r("onort6/s")],
    "IPv6 traffic errors statistics (4)" => [r("asmf6/s"), r("fragf6/s"), r("itrpck6/s")],
]);

snmp_graph!(Icmp6Graph, Icmp6Stats, NetIcmp6, rates, [
    "ICMPv6 traffic statistics (1)" => [r("imsg6/s"), r("omsg6/s")],
    "ICMPv6 traffic statistics (2)" => [r("iech6/s"), r("iechr6/s"), r("oechr6/s")],
    "ICMPv6 traffic statistics (3)" => [
        r("igmbq6/s"), r("igmbr6/s"), r("ogmbr6/s"), r("igmbrd6/s"), r("ogmbrd6/s"),
    ],
    "ICMPv6 traffic statistics (4)" => [r("irtsol6/s"), r("ortsol6/s"), r("irtad6/s")],
    "ICMPv6 traffic statistics (5)" => [
        r("inbsol6/s"), r("onbsol6/s"), r("inbad6/s"), r("onbad6/s"),
    ],
]);

snmp_graph!(Eicmp6Graph, Eicmp6Stats, NetEicmp6, rates, [
    "ICMPv6 traffic errors statistics (1)" => [r("ierr6/s")],
    "ICMPv6 traffic errors statistics (2)" => [r("idtunr6/s"), r("odtunr6/s")],
    "ICMPv6 traffic errors statistics (3)" => [r("itmex6/s"), r("otmex6/s")],
    "ICMPv6 traffic errors statistics (4)" => [r("iprmpb6/s"), r("oprmpb6/s")],
    "ICMPv6 traffic errors statistics (5)" => [r("iredir6/s"), r("oredir6/s")],
    "ICMPv6 traffic errors statistics (6)" => [r("ipck2b6/s"), r("opck2b6/s")],
]);

snmp_graph!(Udp6Graph, Udp6Stats, NetUdp6, rates, [
    "UDPv6 traffic statistics (1)" => [r("idgm6/s"), r("odgm6/s")],
    "UDPv6 traffic statistics (2)" => [r("noport6/s"), r("idgmer6/s")],
]);
