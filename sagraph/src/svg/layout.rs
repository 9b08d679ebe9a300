//! View geometry, autoscaling and grid spacing.

/// Graph area width.
pub const G_XSIZE: i64 = 720;
/// Left margin, holding Y graduations.
pub const M_XSIZE: i64 = 70;
/// View width including caption.
pub const V_XSIZE: i64 = 1050;
/// View width including the gap to the next one.
pub const T_XSIZE: i64 = 1060;
pub const G_YSIZE: i64 = 200;
/// Top margin, holding the title.
pub const M_YSIZE: i64 = 50;
pub const V_YSIZE: i64 = 300;
pub const T_YSIZE: i64 = 310;
/// Document header height.
pub const H_YSIZE: i64 = 50;

/// Wanted number of horizontal grid lines.
pub const H_GRIDNR: f64 = 3.0;
/// Wanted number of vertical grid lines (12 in one-day mode).
pub const V_GRIDNR: u64 = 10;
pub const V_GRIDNR_ONE_DAY: u64 = 12;
pub const MAX_HLINES_NR: usize = 10;

/// A view whose global max stays under this is empty.
pub const EMPTY_VIEW_EPSILON: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Line,
    /// Percentages drawn as rectangles on a 0-100 axis.
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    pub label: &'static str,
    /// Extrema are printed without decimals.
    pub integer: bool,
}

impl Metric {
    pub const fn float(label: &'static str) -> Self {
        Self {
            label,
            integer: false,
        }
    }

    pub const fn int(label: &'static str) -> Self {
        Self {
            label,
            integer: true,
        }
    }
}

/// Metrics sharing one scale and grid.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub kind: ViewKind,
    pub title: &'a str,
    pub metrics: &'a [Metric],
}

impl<'a> View<'a> {
    pub const fn line(title: &'a str, metrics: &'a [Metric]) -> Self {
        Self {
            kind: ViewKind::Line,
            title,
            metrics,
        }
    }

    pub const fn bar(title: &'a str, metrics: &'a [Metric]) -> Self {
        Self {
            kind: ViewKind::Bar,
            title,
            metrics,
        }
    }
}

/// Total number of metrics across `views`.
pub fn metric_count(views: &[View<'_>]) -> usize {
    views.iter().map(|v| v.metrics.len()).sum()
}

/// Power-of-ten factor per metric so that every line of a view is about as
/// tall as the highest one.
///
/// Only line views with more than one metric and a non-zero global max are
/// scaled, and only when `enabled`. A metric whose max is zero or equal to
/// the global max keeps a factor of 1.
pub fn autoscale(kind: ViewKind, gmax: f64, maxima: &[f64], enabled: bool) -> Vec<u32> {
    let mut factors = vec![1u32; maxima.len()];
    if !enabled || maxima.len() < 2 || gmax == 0.0 || kind != ViewKind::Line {
        return factors;
    }
    for (factor, &max) in factors.iter_mut().zip(maxima) {
        if max == 0.0 || max == gmax {
            continue;
        }
        let ratio = (gmax / max) as u32;
        let digits = ratio.to_string().len() as u32;
        *factor = 10u32.saturating_pow(digits - 1);
    }
    factors
}

/// Gap between horizontal grid lines and the decimals of their labels.
pub fn ygrid(lmax: f64) -> (f64, usize) {
    let lmax = if lmax == 0.0 { 1.0 } else { lmax };
    let n = (lmax / H_GRIDNR) as i64;
    if n == 0 {
        return (lmax / H_GRIDNR, 2);
    }
    let len = n.to_string().len() as u32;
    if len < 2 {
        return (n as f64, 0);
    }
    let e = 10i64.pow(len - 1);
    ((n / e * e) as f64, 0)
}

/// Gap in seconds between vertical grid lines.
pub fn xgrid(start: u64, end: u64, lines: u64) -> u64 {
    let span = end.saturating_sub(start);
    if span <= lines { 1 } else { span / lines }
}

/// Axis maximum, gap and decimals for a view.
pub fn value_axis(kind: ViewKind, gmax: f64) -> (f64, f64, usize) {
    match kind {
        ViewKind::Line => {
            let mut lmax = if gmax == 0.0 { 1.0 } else { gmax };
            if lmax < H_GRIDNR * 0.01 {
                lmax = H_GRIDNR * 0.01;
            }
            let (ypos, dp) = ygrid(lmax);
            (lmax, ypos, dp)
        }
        ViewKind::Bar => (gmax.max(100.0), 25.0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoscale_comparable_maxima() {
        let f = autoscale(ViewKind::Line, 50000.0, &[5.0, 500.0, 50000.0], true);
        assert_eq!(f, vec![10000, 100, 1]);
    }

    #[test]
    fn test_autoscale_disabled_cases() {
        let maxima = [5.0, 500.0];
        assert_eq!(autoscale(ViewKind::Line, 500.0, &maxima, false), vec![1, 1]);
        assert_eq!(autoscale(ViewKind::Bar, 500.0, &maxima, true), vec![1, 1]);
        assert_eq!(autoscale(ViewKind::Line, 0.0, &maxima, true), vec![1, 1]);
        assert_eq!(autoscale(ViewKind::Line, 5.0, &[5.0], true), vec![1]);
        assert_eq!(autoscale(ViewKind::Line, 9.0, &[0.0, 9.0], true), vec![1, 1]);
    }

    #[test]
    fn test_autoscale_ratio_digits() {
        // 999 / 3 = 333 -> 3 digits -> 100
        assert_eq!(autoscale(ViewKind::Line, 999.0, &[3.0, 999.0], true), vec![100, 1]);
        // 10 / 6 = 1 -> 1 digit -> 1
        assert_eq!(autoscale(ViewKind::Line, 10.0, &[6.0, 10.0], true), vec![1, 1]);
    }

    #[test]
    fn test_ygrid() {
        assert_eq!(ygrid(0.0), (1.0 / 3.0, 2));
        assert_eq!(ygrid(0.03), (0.01, 2));
        assert_eq!(ygrid(20.0), (6.0, 0));
        assert_eq!(ygrid(100.0), (30.0, 0));
        assert_eq!(ygrid(1000.0), (300.0, 0));
        assert_eq!(ygrid(5432.0), (1000.0, 0));
    }

    #[test]
    fn test_xgrid() {
        assert_eq!(xgrid(100, 105, 10), 1);
        assert_eq!(xgrid(0, 3600, 10), 360);
        assert_eq!(xgrid(0, 86400, 12), 7200);
        assert_eq!(xgrid(50, 10, 10), 1);
    }

    #[test]
    fn test_value_axis() {
        assert_eq!(value_axis(ViewKind::Bar, 40.0), (100.0, 25.0, 0));
        assert_eq!(value_axis(ViewKind::Bar, 180.0), (180.0, 25.0, 0));
        let (lmax, _, dp) = value_axis(ViewKind::Line, 0.001);
        assert!((lmax - 0.03).abs() < 1e-12);
        assert_eq!(dp, 2);
        assert_eq!(value_axis(ViewKind::Line, 0.0).0, 1.0);
    }

    #[test]
    fn test_metric_count() {
        const M: [Metric; 3] = [Metric::float("a"), Metric::int("b"), Metric::float("c")];
        let views = [View::line("x", &M[..2]), View::bar("y", &M[2..])];
        assert_eq!(metric_count(&views), 3);
    }
}
