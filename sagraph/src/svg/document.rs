use super::SvgContext;
use super::draw::escape;
use super::layout::{H_YSIZE, T_XSIZE, T_YSIZE};
use super::palette::{BCKGRD_COL, ERROR_COL, HEADER_COL};
use crate::error::Result;
use std::fmt::Write;

/// Wraps the body accumulated in `ctx` into a standalone SVG document.
///
/// The canvas is sized from the rows actually emitted, so the body has to
/// be complete before this is called.
pub fn finish(ctx: SvgContext<'_>, cpu_count: Option<usize>) -> Result<String> {
    let opts = ctx.opts;
    let file = ctx.file;
    let palette = opts.palette;
    let rows = ctx.params.graph_no;
    let columns = if opts.pack {
        ctx.params.max_views.max(1)
    } else {
        1
    };
    let width = T_XSIZE * columns as i64;
    let height = H_YSIZE + T_YSIZE * rows.max(1) as i64;

    let mut doc = String::with_capacity(ctx.out.len() + 1024);
    writeln!(doc, "<?xml version=\"1.0\" standalone=\"no\"?>")?;
    writeln!(
        doc,
        "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
         \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">"
    )?;
    writeln!(
        doc,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{width}\" height=\"{height}\" fill=\"black\" stroke=\"gray\" stroke-width=\"1\">"
    )?;
    writeln!(
        doc,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        palette.color(BCKGRD_COL)
    )?;

    let mut title = format!(
        "{} {} ({}) {} _{}_",
        file.sysname,
        file.release,
        file.nodename,
        opts.time.date(file.ust_time, file),
        file.machine
    );
    if let Some(n) = cpu_count {
        write!(title, " ({n} CPU)")?;
    }
    writeln!(
        doc,
        "<text x=\"0\" y=\"30\" text-anchor=\"start\" stroke=\"{}\">{}</text>",
        palette.color(HEADER_COL),
        escape(title.trim())
    )?;

    doc.push_str(&ctx.out);

    if rows == 0 {
        writeln!(
            doc,
            "<text x=\"0\" y=\"{}\" style=\"fill: {}; stroke: none; font-size: 16px\">No data!</text>",
            H_YSIZE + 20,
            palette.color(ERROR_COL)
        )?;
    }
    writeln!(doc, "</svg>")?;
    Ok(doc)
}
