use serde::{Deserialize, Serialize};

/// Number of colours in a palette: 16 for metrics, then the fixed roles.
pub const PALETTE_SIZE: usize = 24;
/// Metric colours wrap around this mask.
pub const PALETTE_MASK: usize = 0x0f;

pub const BCKGRD_COL: usize = 16;
pub const AXIS_COL: usize = 17;
pub const GRID_COL: usize = 18;
pub const TITLE_COL: usize = 19;
pub const INFO_COL: usize = 20;
pub const OTHER_COL: usize = 21;
pub const ERROR_COL: usize = 22;
pub const HEADER_COL: usize = 23;

const DEFAULT: [u32; PALETTE_SIZE] = [
    0x00cc00, 0xff00bf, 0x00ffff, 0xff0000, 0xe85f00, 0x0000ff, 0x006020, 0x7030a0, 0xffff00,
    0x666635, 0xd60093, 0x00bfbf, 0xcc3300, 0x50040f, 0xffffbf, 0x193d55, 0x000000, 0xffffff,
    0x202020, 0xffff00, 0xffff00, 0x808080, 0xa52a2a, 0xff0000,
];

const CUSTOM: [u32; PALETTE_SIZE] = [
    0x000000, 0x1a1aff, 0x1affb2, 0xb21aff, 0x1ab2ff, 0xff1a1a, 0xffb31a, 0xb2ff1a, 0xefefef,
    0x000000, 0x1a1aff, 0x1affb2, 0xb21aff, 0x1ab2ff, 0xff1a1a, 0xffb31a, 0xffffff, 0x000000,
    0xbebebe, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000,
];

const BW: [u32; PALETTE_SIZE] = [
    0x696969, 0xbebebe, 0x000000, 0xa9a9a9, 0x708090, 0xc0c0c0, 0x808080, 0xd3d3d3, 0x909090,
    0x696969, 0xbebebe, 0x000000, 0x000000, 0xa9a9a9, 0xc0c0c0, 0x808080, 0xffffff, 0x000000,
    0xbebebe, 0x000000, 0x000000, 0x000000, 0x000000, 0x000000,
];

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Default,
    Custom,
    /// Black and white; metric colours start at the first entry.
    Bw,
}

impl Palette {
    pub fn colors(self) -> &'static [u32; PALETTE_SIZE] {
        match self {
            Palette::Default => &DEFAULT,
            Palette::Custom => &CUSTOM,
            Palette::Bw => &BW,
        }
    }

    /// `#rrggbb` of role or metric colour `idx`.
    pub fn color(self, idx: usize) -> String {
        format!("#{:06x}", self.colors()[idx % PALETTE_SIZE])
    }

    /// Colour of the `j`-th metric of a view whose first metric sits at
    /// `pos` in the activity. The bw palette restarts at every view.
    pub fn metric(self, pos: usize, j: usize) -> String {
        let start = if self == Palette::Bw { 0 } else { pos };
        self.color((start + j) & PALETTE_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert_eq!(Palette::Default.color(BCKGRD_COL), "#000000");
        assert_eq!(Palette::Default.color(AXIS_COL), "#ffffff");
        assert_eq!(Palette::Custom.color(BCKGRD_COL), "#ffffff");
        assert_eq!(Palette::Bw.color(GRID_COL), "#bebebe");
        assert_eq!(Palette::Default.color(ERROR_COL), "#a52a2a");
    }

    #[test]
    fn test_metric_colours_wrap() {
        assert_eq!(Palette::Default.metric(0, 0), "#00cc00");
        assert_eq!(Palette::Default.metric(2, 0), "#00ffff");
        assert_eq!(Palette::Default.metric(10, 6), "#00cc00");
        assert_eq!(Palette::Bw.metric(7, 2), "#000000");
    }
}
