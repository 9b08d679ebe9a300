use crate::buffer::Extrema;

/// Growth step of a series buffer, in bytes.
pub const CHUNKSIZE: usize = 4096;

/// Drawing primitives of one metric of one item, oldest first.
///
/// Line graphs hold path commands (`M`/`L`), bar graphs hold `<rect/>`
/// elements. The first point of a path is always a move-to.
#[derive(Debug, Clone, Default)]
pub struct GraphSeries {
    data: String,
}

impl GraphSeries {
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&mut self, chunk: &str) {
        if self.data.capacity() - self.data.len() <= chunk.len() {
            self.data.reserve_exact(CHUNKSIZE.max(chunk.len() + 1));
        }
        self.data.push_str(chunk);
    }

    fn command(&self, restart: bool) -> char {
        if restart || self.data.is_empty() { 'M' } else { 'L' }
    }

    pub fn line_point(&mut self, t: u64, value: f64, restart: bool) {
        let chunk = format!(" {}{},{:.2}", self.command(restart), t, value);
        self.append(&chunk);
    }

    /// Line point for integer gauges.
    pub fn int_point(&mut self, t: u64, value: u64, restart: bool) {
        let chunk = format!(" {}{},{}", self.command(restart), t, value);
        self.append(&chunk);
    }

    /// Step from `prev` to `value` at `t`: the previous level is held up to
    /// `t`, then the line jumps. A new path starts `dt` seconds earlier.
    pub fn step(&mut self, t: u64, prev: f64, value: f64, dt: u64, restart: bool) {
        let mut chunk = String::new();
        if restart || self.data.is_empty() {
            chunk.push_str(&format!(" M{},{:.2}", t.saturating_sub(dt), prev));
        }
        chunk.push_str(&format!(" L{t},{prev:.2}"));
        if prev != value {
            chunk.push_str(&format!(" L{t},{value:.2}"));
        }
        self.append(&chunk);
    }

    /// Rectangle of height `value` ending at `t` and `dt` seconds wide,
    /// stacked on `offset`. Flat or zero-width rectangles are dropped. The
    /// top is capped at 100 unless `over_100`.
    pub fn bar(&mut self, t: u64, offset: f64, value: f64, dt: u64, over_100: bool) {
        if value == 0.0 || dt == 0 {
            return;
        }
        let x = t.saturating_sub(dt);
        let (y, height) = if over_100 {
            (offset, value)
        } else {
            (offset.min(100.0), value.min(100.0 - offset))
        };
        let chunk = format!("<rect x=\"{x}\" y=\"{y:.2}\" height=\"{height:.2}\" width=\"{dt}\"/>");
        self.append(&chunk);
    }

    /// Stacked CPU bar: records the value, draws it, moves the offset up.
    pub fn cpu_bar(&mut self, t: u64, offset: &mut f64, value: f64, dt: u64, slot: &mut Extrema) {
        slot.save(value);
        self.bar(t, *offset, value, dt, false);
        *offset += value;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Hands the data over and releases the buffer.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.data)
    }
}

/// Allocates `n` empty series.
pub fn graph_lines(n: usize) -> Vec<GraphSeries> {
    vec![GraphSeries::new(); n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_points() {
        let mut s = GraphSeries::new();
        s.line_point(0, 1.0, false);
        s.line_point(10, 2.5, false);
        s.line_point(20, 3.333, true);
        assert_eq!(s.as_str(), " M0,1.00 L10,2.50 M20,3.33");
    }

    #[test]
    fn test_int_points() {
        let mut s = GraphSeries::new();
        s.int_point(5, 7, false);
        s.int_point(6, 8, false);
        assert_eq!(s.as_str(), " M5,7 L6,8");
    }

    #[test]
    fn test_step_holds_level() {
        let mut s = GraphSeries::new();
        s.step(60, 0.0, 1200.0, 60, false);
        s.step(120, 1200.0, 1200.0, 60, false);
        s.step(180, 1200.0, 800.5, 60, true);
        assert_eq!(
            s.as_str(),
            " M0,0.00 L60,0.00 L60,1200.00 L120,1200.00 M120,1200.00 L180,1200.00 L180,800.50"
        );
    }

    #[test]
    fn test_bars_drop_degenerate() {
        let mut s = GraphSeries::new();
        s.bar(60, 0.0, 0.0, 60, false);
        s.bar(60, 0.0, 5.0, 0, false);
        assert!(s.is_empty());
        s.bar(60, 10.0, 95.0, 60, false);
        assert_eq!(
            s.as_str(),
            "<rect x=\"0\" y=\"10.00\" height=\"90.00\" width=\"60\"/>"
        );
        let mut over = GraphSeries::new();
        over.bar(30, 0.0, 150.0, 60, true);
        assert_eq!(
            over.as_str(),
            "<rect x=\"0\" y=\"0.00\" height=\"150.00\" width=\"60\"/>"
        );
    }

    #[test]
    fn test_cpu_bar_stacks() {
        let mut a = GraphSeries::new();
        let mut b = GraphSeries::new();
        let (mut ea, mut eb) = (Extrema::UNSET, Extrema::UNSET);
        let mut offset = 0.0;
        a.cpu_bar(120, &mut offset, 30.0, 60, &mut ea);
        b.cpu_bar(120, &mut offset, 0.0, 60, &mut eb);
        assert_eq!(offset, 30.0);
        assert_eq!(ea.max, 30.0);
        assert_eq!(eb.max, 0.0);
        assert!(b.is_empty());
        assert!(a.as_str().contains("x=\"60\""));
    }

    #[test]
    fn test_growth_and_take() {
        let mut s = GraphSeries::new();
        for t in 0..1000 {
            s.line_point(t, 123.456, false);
        }
        assert!(s.as_str().len() > CHUNKSIZE);
        let data = s.take();
        assert!(data.starts_with(" M0,123.46 L1,"));
        assert!(s.is_empty());
    }
}
