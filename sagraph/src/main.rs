use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use sagraph::{Archive, Config, Palette, Report, TimeBasis};
use std::io::Write;
use std::path::PathBuf;

/// Render a system activity archive as SVG graphs.
#[derive(Parser, Debug)]
#[command(name = "sagraph", version)]
struct Args {
    /// JSON-lines archive to read
    archive: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the SVG document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not draw views whose values stay at zero
    #[arg(long)]
    skip_empty: bool,

    /// Put the views of an activity side by side
    #[arg(long)]
    pack: bool,

    /// Time axis spans the whole day
    #[arg(long)]
    one_day: bool,

    /// Scale small metrics up to the largest one of their view
    #[arg(long)]
    autoscale: bool,

    /// Draw %idle on CPU views
    #[arg(long)]
    show_idle: bool,

    /// Emit marker comments in the SVG
    #[arg(long)]
    debug: bool,

    /// Clock used for time labels
    #[arg(long, value_enum)]
    time: Option<TimeBasis>,

    #[arg(long, value_enum)]
    palette: Option<Palette>,

    /// CPUs to draw: `all`, or a list such as `0,2-3`
    #[arg(long)]
    cpus: Option<String>,

    /// Break CPU time down into irq, soft, guest and gnice
    #[arg(long)]
    cpu_all_fields: bool,

    /// Draw kernel memory usage along with RAM
    #[arg(long)]
    mem_all: bool,

    /// Disks, interfaces, FC hosts and filesystems to draw
    #[arg(long, value_delimiter = ',')]
    devices: Vec<String>,

    /// Activities to draw (e.g. `CPU,A_DISK`)
    #[arg(long, value_delimiter = ',')]
    activities: Vec<String>,

    /// Leave node name and date out of the views
    #[arg(long)]
    no_info: bool,
}

impl Args {
    /// Command-line flags take precedence over the configuration file.
    fn apply(&self, cfg: &mut Config) {
        let display = &mut cfg.display;
        display.skip_empty |= self.skip_empty;
        display.pack |= self.pack;
        display.one_day |= self.one_day;
        display.autoscale |= self.autoscale;
        display.show_idle |= self.show_idle;
        display.debug |= self.debug;
        display.cpu_all_fields |= self.cpu_all_fields;
        display.mem_all |= self.mem_all;
        if self.no_info {
            display.show_info = false;
        }
        if let Some(time) = self.time {
            display.time = time;
        }
        if let Some(palette) = self.palette {
            display.palette = palette;
        }

        let selection = &mut cfg.selection;
        if let Some(cpus) = &self.cpus {
            selection.cpus = Some(cpus.clone());
        }
        if !self.devices.is_empty() {
            selection.devices = self.devices.clone();
        }
        if !self.activities.is_empty() {
            selection.activities = self.activities.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut cfg);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cfg.logging.level.as_str()),
    )
    .init();
    debug!("[main] {cfg:?}");

    let archive = Archive::open(&args.archive)
        .with_context(|| format!("failed to read archive {}", args.archive.display()))?;
    let selection = cfg
        .selection
        .to_selection()
        .context("invalid selection")?;
    let svg = Report::new(&archive, cfg.display.clone(), selection)
        .with_activities(&cfg.selection.activities)
        .context("invalid activity list")?
        .render_svg()
        .context("failed to render report")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &svg)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("[main] wrote {} bytes to {}", svg.len(), path.display());
        }
        None => std::io::stdout()
            .lock()
            .write_all(svg.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}
