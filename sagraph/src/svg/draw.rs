//! Emits the views of one activity item: frame, caption, grid and graphs.

use super::SvgContext;
use super::clock::{TimeBasis, WallClock};
use super::layout::{
    EMPTY_VIEW_EPSILON, G_XSIZE, G_YSIZE, H_YSIZE, M_XSIZE, M_YSIZE, MAX_HLINES_NR, T_XSIZE,
    T_YSIZE, V_GRIDNR, V_GRIDNR_ONE_DAY, V_XSIZE, V_YSIZE, View, ViewKind, autoscale,
    value_axis, xgrid,
};
use super::palette::{
    AXIS_COL, BCKGRD_COL, ERROR_COL, GRID_COL, INFO_COL, Palette, TITLE_COL,
};
use super::series::GraphSeries;
use crate::activity::Descriptor;
use crate::archive::{FileHeader, RecordHeader};
use crate::buffer::Extrema;
use crate::config::DisplayOptions;
use crate::error::Result;
use log::trace;
use std::fmt::Write;

/// Everything needed to draw the views of one item.
///
/// `extrema` and `series` are indexed by metric position, counting across
/// views in order.
#[derive(Debug)]
pub struct GraphSet<'a> {
    pub desc: &'static Descriptor,
    /// Item number within the activity, part of the group id.
    pub xid: usize,
    pub item_name: Option<&'a str>,
    pub views: &'a [View<'a>],
    pub extrema: &'a [Extrema],
    pub series: &'a mut [GraphSeries],
    /// Skip views whose first metric never got a value.
    pub skip_void: bool,
}

/// Draws every view of `set` and returns whether at least one was shown.
///
/// Series data is consumed, whether drawn or skipped. The row counter
/// advances by the number of views shown, or by one row when packed.
pub fn draw_activity_graphs(
    ctx: &mut SvgContext<'_>,
    set: GraphSet<'_>,
    hdr: &RecordHeader,
) -> Result<bool> {
    let opts: &DisplayOptions = ctx.opts;
    let file: &FileHeader = ctx.file;
    let params = &mut ctx.params;
    let out = &mut ctx.out;
    let palette = opts.palette;
    let ext = |k: usize| set.extrema.get(k).copied().unwrap_or(Extrema::UNSET);

    let mut pos = 0;
    let mut views_nr: i64 = 0;
    let mut displayed = false;

    if opts.debug {
        writeln!(out, "<!-- Name: {} -->", set.desc.name)?;
    }

    for (i, view) in set.views.iter().enumerate() {
        let group = view.metrics.len();
        if opts.debug {
            writeln!(out, "<!-- View {} -->", i + 1)?;
        }

        let mut g = Extrema::UNSET;
        for j in 0..group {
            g.merge(&ext(pos + j));
        }

        if (opts.skip_empty && g.max < EMPTY_VIEW_EPSILON) || (set.skip_void && ext(pos).is_unset())
        {
            trace!("[svg] skipping view {} of {}", i + 1, set.desc.name);
            release(set.series, pos, group);
            pos += group;
            continue;
        }

        if !displayed {
            writeln!(
                out,
                "<g id=\"g{}-{}\" transform=\"translate(0,{})\">",
                set.desc.id as u8,
                set.xid,
                H_YSIZE + T_YSIZE * params.graph_no as i64
            )?;
        }
        displayed = true;
        views_nr += 1;

        let (xv, yv) = if opts.pack {
            ((views_nr - 1) * T_XSIZE, 0)
        } else {
            (0, (views_nr - 1) * T_YSIZE)
        };
        let caption_x = xv + 5 + M_XSIZE + G_XSIZE;

        writeln!(
            out,
            "<rect x=\"{xv}\" y=\"{yv}\" height=\"{V_YSIZE}\" width=\"{V_XSIZE}\" fill=\"{}\"/>",
            palette.color(BCKGRD_COL)
        )?;
        write!(
            out,
            "<text x=\"{xv}\" y=\"{}\" style=\"fill: {}; stroke: none\">{}",
            20 + yv,
            palette.color(TITLE_COL),
            escape(view.title)
        )?;
        if let Some(name) = set.item_name {
            write!(out, " [{}]", escape(name))?;
        }
        writeln!(out)?;
        writeln!(
            out,
            "<tspan x=\"{caption_x}\" y=\"{}\" style=\"fill: {}; stroke: none; font-size: 12px\">\
             (Min, Max values)</tspan>\n</text>",
            yv + 25,
            palette.color(INFO_COL)
        )?;

        // Two samples at least, and a value for the first metric.
        if hdr.ust_time == params.ust_time_first || ext(pos).is_unset() {
            writeln!(
                out,
                "<text x=\"{xv}\" y=\"{}\" style=\"fill: {}; stroke: none\">No data</text>",
                yv + M_YSIZE,
                palette.color(ERROR_COL)
            )?;
            release(set.series, pos, group);
            pos += group;
            continue;
        }

        writeln!(
            out,
            "<polyline points=\"{},{} {},{} {},{}\" style=\"fill: {}; stroke: {}; stroke-width: 2\"/>",
            xv + M_XSIZE,
            yv + M_YSIZE,
            xv + M_XSIZE,
            yv + M_YSIZE + G_YSIZE,
            xv + M_XSIZE + G_XSIZE,
            yv + M_YSIZE + G_YSIZE,
            palette.color(BCKGRD_COL),
            palette.color(AXIS_COL)
        )?;

        let maxima: Vec<f64> = (0..group).map(|j| ext(pos + j).max).collect();
        let asf = autoscale(view.kind, g.max, &maxima, opts.autoscale);

        for (j, metric) in view.metrics.iter().enumerate() {
            let e = ext(pos + j);
            let dp = if metric.integer { 0 } else { 2 };
            let factor = asf[j] as f64;
            let scale = if asf[j] == 1 {
                String::new()
            } else {
                format!("x{} ", asf[j])
            };
            writeln!(
                out,
                "<text x=\"{caption_x}\" y=\"{}\" style=\"fill: {}; stroke: none; font-size: 12px\">\
                 {} {scale}({:.dp$}, {:.dp$})</text>",
                yv + M_YSIZE + j as i64 * 15,
                palette.metric(pos, j),
                metric.label,
                e.min * factor,
                e.max * factor,
            )?;
        }

        if opts.show_info {
            let info_x = xv + V_XSIZE - 5;
            let info_y = yv + M_YSIZE + G_YSIZE;
            let style = format!(
                "fill: {}; text-anchor: end; stroke: none; font-size: 14px",
                palette.color(INFO_COL)
            );
            writeln!(
                out,
                "<text x=\"{info_x}\" y=\"{info_y}\" style=\"{style}\">{}",
                escape(&file.nodename)
            )?;
            writeln!(
                out,
                "<tspan x=\"{info_x}\" y=\"{}\" style=\"{style}\">{}</tspan>\n</text>",
                info_y + 14,
                opts.time.date(file.ust_time, file)
            )?;
        }

        writeln!(
            out,
            "<g transform=\"translate({},{})\">",
            xv + M_XSIZE,
            yv + M_YSIZE + G_YSIZE
        )?;

        let (lmax, ypos, dp) = value_axis(view.kind, g.max);
        let yfactor = -(G_YSIZE as f64) / lmax;
        hgrid(out, palette, opts.debug, ypos, yfactor, lmax, dp)?;

        let v_gridnr = if opts.one_day {
            V_GRIDNR_ONE_DAY
        } else {
            V_GRIDNR
        };
        let xpos = xgrid(params.ust_time_ref, params.ust_time_end, v_gridnr);
        let span = params.ust_time_end.saturating_sub(params.ust_time_ref).max(1);
        let xfactor = G_XSIZE as f64 / span as f64;
        let axis = TimeAxis {
            opts,
            file,
            start: params.ust_time_ref,
            end: params.ust_time_end,
            clock: params.clock_ref,
        };
        vgrid(axis, out, xpos, xfactor, v_gridnr)?;

        if opts.debug {
            writeln!(out, "<!-- Graphs -->")?;
        }

        for j in 0..group {
            let data = set
                .series
                .get_mut(pos + j)
                .map(GraphSeries::take)
                .unwrap_or_default();
            let color = palette.metric(pos, j);
            match view.kind {
                ViewKind::Line => writeln!(
                    out,
                    "<path d=\"{data}\" style=\"vector-effect: non-scaling-stroke; \
                     stroke: {color}; stroke-width: 1; fill-opacity: 0\" \
                     transform=\"scale({xfactor:.6},{:.6})\"/>",
                    yfactor * asf[j] as f64
                )?,
                ViewKind::Bar if !data.is_empty() => writeln!(
                    out,
                    "<g style=\"fill: {color}; stroke: none\" \
                     transform=\"scale({xfactor:.6},{yfactor:.6})\">\n{data}\n</g>"
                )?,
                // flat bars
                ViewKind::Bar => {}
            }
        }
        writeln!(out, "</g>")?;
        pos += group;
    }

    if displayed {
        writeln!(out, "</g>")?;
        let views_nr = views_nr as usize;
        params.graph_no += if opts.pack { 1 } else { views_nr };
        params.max_views = params.max_views.max(views_nr);
    }
    Ok(displayed)
}

/// Frees the series of a view that is not drawn.
fn release(series: &mut [GraphSeries], pos: usize, group: usize) {
    for s in series.iter_mut().skip(pos).take(group) {
        s.take();
    }
}

/// Horizontal lines and value graduations. The X axis itself gets a
/// graduation but no line.
fn hgrid(
    out: &mut String,
    palette: Palette,
    debug: bool,
    ypos: f64,
    yfactor: f64,
    lmax: f64,
    dp: usize,
) -> Result<()> {
    if debug {
        writeln!(out, "<!-- Hgrid -->")?;
    }
    let mut j = 0usize;
    loop {
        let y = ypos * j as f64;
        if j > 0 {
            writeln!(
                out,
                "<polyline points=\"0,{y:.2} {G_XSIZE},{y:.2}\" style=\"vector-effect: \
                 non-scaling-stroke; stroke: {}\" transform=\"scale(1,{yfactor:.6})\"/>",
                palette.color(GRID_COL)
            )?;
        }
        // Same rounding as the line so labels stay aligned.
        let rounded = (y * 100.0).round() / 100.0;
        writeln!(
            out,
            "<text x=\"0\" y=\"{}\" style=\"fill: {}; stroke: none; font-size: 12px; \
             text-anchor: end\">{y:.dp$}.</text>",
            (rounded * yfactor) as i64,
            palette.color(AXIS_COL)
        )?;
        j += 1;
        if ypos * j as f64 > lmax || j >= MAX_HLINES_NR {
            break;
        }
    }
    Ok(())
}

struct TimeAxis<'a> {
    opts: &'a DisplayOptions,
    file: &'a FileHeader,
    start: u64,
    end: u64,
    clock: WallClock,
}

/// Vertical lines and time graduations, at most `2 * v_gridnr` and never
/// past the end of the time axis.
fn vgrid(
    axis: TimeAxis<'_>,
    out: &mut String,
    xpos: u64,
    xfactor: f64,
    v_gridnr: u64,
) -> Result<()> {
    let TimeAxis {
        opts,
        file,
        start,
        end,
        mut clock,
    } = axis;
    let true_time = opts.time == TimeBasis::True;
    let palette = opts.palette;
    if opts.debug {
        writeln!(out, "<!-- Vgrid -->")?;
    }

    let mut stamp = start;
    let mut j = 0u64;
    while j <= 2 * v_gridnr && stamp <= end {
        let x = xpos * j;
        writeln!(
            out,
            "<polyline points=\"{x},0 {x},{}\" style=\"vector-effect: non-scaling-stroke; \
             stroke: {}\" transform=\"scale({xfactor:.6},1)\"/>",
            -G_YSIZE,
            palette.color(GRID_COL)
        )?;
        let label_x = (x as f64 * xfactor) as i64;
        let (hour, minute) = if true_time {
            (u32::from(clock.hour), u32::from(clock.minute))
        } else {
            opts.time.hour_minute(stamp, file)
        };
        if opts.one_day && minute == 0 {
            writeln!(
                out,
                "<text x=\"{}\" y=\"15\" style=\"fill: {}; stroke: none; font-size: 14px; \
                 text-anchor: start\">{hour:2}:00</text>",
                label_x - 15,
                palette.color(AXIS_COL)
            )?;
        } else {
            writeln!(
                out,
                "<text x=\"{label_x}\" y=\"10\" style=\"fill: {}; stroke: none; font-size: 12px; \
                 text-anchor: start\" transform=\"rotate(45,{label_x},0)\">{}</text>",
                palette.color(AXIS_COL),
                if true_time {
                    clock.to_string()
                } else {
                    opts.time.clock(stamp, file)
                }
            )?;
        }
        stamp += xpos;
        clock = clock.advance(xpos);
        j += 1;
    }

    writeln!(
        out,
        "<text x=\"-10\" y=\"30\" style=\"fill: {}; stroke: none; font-size: 12px; \
         text-anchor: end\">{}</text>",
        palette.color(INFO_COL),
        escape(&opts.time.label(start, file))
    )?;
    Ok(())
}

/// Escapes text content for XML.
pub fn escape(text: &str) -> String {
    let mut s = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            _ => s.push(c),
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityId, descriptor};
    use crate::svg::layout::Metric;
    use crate::svg::{SvgParams, graph_lines};

    const METRICS: [Metric; 3] = [
        Metric::float("rxpck/s"),
        Metric::float("txpck/s"),
        Metric::int("plist-sz"),
    ];

    fn file() -> FileHeader {
        FileHeader {
            nodename: "web<1>".into(),
            ..Default::default()
        }
    }

    fn params() -> SvgParams {
        SvgParams {
            ust_time_ref: 1000,
            ust_time_end: 1600,
            ust_time_first: 1000,
            dt: 60,
            ..Default::default()
        }
    }

    fn extrema(values: &[(f64, f64)]) -> Vec<Extrema> {
        values
            .iter()
            .map(|&(min, max)| Extrema { min, max })
            .collect()
    }

    fn last() -> RecordHeader {
        RecordHeader {
            ust_time: 1600,
            ..Default::default()
        }
    }

    #[test]
    fn test_draws_line_view_with_caption() {
        let opts = DisplayOptions {
            debug: true,
            ..Default::default()
        };
        let file = file();
        let mut ctx = SvgContext::new(&opts, &file, params());
        let mut series = graph_lines(2);
        series[0].line_point(0, 1.0, false);
        series[1].line_point(0, 2.0, false);
        let views = [View::line("Network", &METRICS[..2])];
        let ext = extrema(&[(0.5, 10.0), (1.0, 20.0)]);

        let shown = draw_activity_graphs(
            &mut ctx,
            GraphSet {
                desc: descriptor(ActivityId::NetDev),
                xid: 3,
                item_name: Some("eth0"),
                views: &views,
                extrema: &ext,
                series: &mut series,
                skip_void: false,
            },
            &last(),
        )
        .unwrap();

        assert!(shown);
        assert_eq!(ctx.params.graph_no, 1);
        let svg = &ctx.out;
        assert!(svg.starts_with("<!-- Name: A_NET_DEV -->\n<!-- View 1 -->\n"));
        assert!(svg.contains("<g id=\"g13-3\" transform=\"translate(0,50)\">"));
        assert!(svg.contains("Network [eth0]\n"));
        assert!(svg.contains("rxpck/s (0.50, 10.00)</text>"));
        assert!(svg.contains("web&lt;1&gt;"));
        assert!(svg.contains("<!-- Hgrid -->"));
        assert!(svg.contains("<!-- Graphs -->"));
        assert!(svg.contains("<path d=\" M0,1.00\""));
        assert!(svg.contains(">UTC</text>"));
        assert!(series.iter().all(GraphSeries::is_empty));
    }

    #[test]
    fn test_skip_empty_view() {
        let opts = DisplayOptions {
            skip_empty: true,
            ..Default::default()
        };
        let file = file();
        let views = [View::line("Quiet", &METRICS[..2])];
        let ext = extrema(&[(0.0, 0.004), (0.0, 0.0)]);

        let mut ctx = SvgContext::new(&opts, &file, params());
        let mut series = graph_lines(2);
        series[0].line_point(0, 0.0, false);
        let set = GraphSet {
            desc: descriptor(ActivityId::Pcsw),
            xid: 0,
            item_name: None,
            views: &views,
            extrema: &ext,
            series: &mut series,
            skip_void: false,
        };
        assert!(!draw_activity_graphs(&mut ctx, set, &last()).unwrap());
        assert!(ctx.out.is_empty());
        assert_eq!(ctx.params.graph_no, 0);
        assert!(series[0].is_empty());

        // Without the option the flat view is drawn.
        let opts = DisplayOptions::default();
        let mut ctx = SvgContext::new(&opts, &file, params());
        let mut series = graph_lines(2);
        let set = GraphSet {
            desc: descriptor(ActivityId::Pcsw),
            xid: 0,
            item_name: None,
            views: &views,
            extrema: &ext,
            series: &mut series,
            skip_void: false,
        };
        assert!(draw_activity_graphs(&mut ctx, set, &last()).unwrap());
        assert!(ctx.out.contains("Quiet"));
    }

    #[test]
    fn test_no_data_and_skip_void() {
        let opts = DisplayOptions::default();
        let file = file();
        let views = [View::line("Tasks", &METRICS[2..])];
        let unset = vec![Extrema::UNSET];

        let mut ctx = SvgContext::new(&opts, &file, params());
        let mut series = graph_lines(1);
        let set = GraphSet {
            desc: descriptor(ActivityId::Queue),
            xid: 0,
            item_name: None,
            views: &views,
            extrema: &unset,
            series: &mut series,
            skip_void: false,
        };
        assert!(draw_activity_graphs(&mut ctx, set, &last()).unwrap());
        assert!(ctx.out.contains(">No data</text>"));

        let mut ctx = SvgContext::new(&opts, &file, params());
        let set = GraphSet {
            desc: descriptor(ActivityId::Queue),
            xid: 0,
            item_name: None,
            views: &views,
            extrema: &unset,
            series: &mut series,
            skip_void: true,
        };
        assert!(!draw_activity_graphs(&mut ctx, set, &last()).unwrap());
    }

    #[test]
    fn test_single_sample_has_no_data() {
        let opts = DisplayOptions::default();
        let file = file();
        let views = [View::line("Tasks", &METRICS[2..])];
        let ext = extrema(&[(3.0, 3.0)]);
        let mut ctx = SvgContext::new(&opts, &file, params());
        let mut series = graph_lines(1);
        let first = RecordHeader {
            ust_time: 1000,
            ..Default::default()
        };
        let set = GraphSet {
            desc: descriptor(ActivityId::Queue),
            xid: 0,
            item_name: None,
            views: &views,
            extrema: &ext,
            series: &mut series,
            skip_void: false,
        };
        draw_activity_graphs(&mut ctx, set, &first).unwrap();
        assert!(ctx.out.contains(">No data</text>"));
    }

    #[test]
    fn test_pack_and_bars() {
        let opts = DisplayOptions {
            pack: true,
            ..Default::default()
        };
        let file = file();
        const PCT: [Metric; 1] = [Metric::float("%util")];
        let views = [View::line("A", &METRICS[..1]), View::bar("B", &PCT)];
        let ext = extrema(&[(1.0, 2.0), (10.0, 50.0)]);
        let mut ctx = SvgContext::new(&opts, &file, params());
        let mut series = graph_lines(2);
        series[1].bar(60, 0.0, 50.0, 60, false);
        let set = GraphSet {
            desc: descriptor(ActivityId::Disk),
            xid: 0,
            item_name: Some("sda"),
            views: &views,
            extrema: &ext,
            series: &mut series,
            skip_void: false,
        };
        draw_activity_graphs(&mut ctx, set, &last()).unwrap();
        assert_eq!(ctx.params.graph_no, 1);
        assert_eq!(ctx.params.max_views, 2);
        assert!(ctx.out.contains(&format!("<rect x=\"{T_XSIZE}\" y=\"0\"")));
        assert!(ctx.out.contains("<rect x=\"0\" y=\"0.00\" height=\"50.00\" width=\"60\"/>"));
        // Bar axis graduations every 25.
        assert!(ctx.out.contains(">75.</text>"));
    }

    #[test]
    fn test_hgrid_bounds() {
        let mut out = String::new();
        hgrid(&mut out, Palette::Default, false, 25.0, -2.0, 100.0, 0).unwrap();
        assert_eq!(out.matches("<polyline").count(), 4);
        assert_eq!(out.matches("<text").count(), 5);
        assert!(out.contains("y=\"-200\""));

        let mut out = String::new();
        hgrid(&mut out, Palette::Default, false, 0.01, -1.0, 1.0, 2).unwrap();
        assert_eq!(out.matches("<text").count(), MAX_HLINES_NR);
    }

    #[test]
    fn test_vgrid_one_day_labels() {
        let opts = DisplayOptions {
            one_day: true,
            ..Default::default()
        };
        let file = file();
        let axis = TimeAxis {
            opts: &opts,
            file: &file,
            start: 0,
            end: 86_400,
            clock: WallClock::default(),
        };
        let mut out = String::new();
        vgrid(axis, &mut out, 7200, G_XSIZE as f64 / 86_400.0, 12).unwrap();
        assert_eq!(out.matches("<polyline").count(), 13);
        assert!(out.contains("> 0:00</text>"));
        assert!(out.contains(">22:00</text>"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a&b<c>\"d\""), "a&amp;b&lt;c&gt;&quot;d&quot;");
    }
}
