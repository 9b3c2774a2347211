use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use pyramid_rs::export::{ExportFormat, ExportOutcome};
use pyramid_rs::form::{FormInput, rows_json_from_csv};
use pyramid_rs::storage::StateStore;
use pyramid_rs::{App, LayoutConfig, Margins, SideLabels};

#[derive(Parser, Debug)]
#[command(
    name = "pyramid",
    version,
    about = "Render population-pyramid charts to SVG & JPEG"
)]
struct Cli {
    /// State file holding the last submitted inputs (default: user config dir).
    #[arg(long, global = true)]
    state: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart from a title and row data, save the inputs, and export.
    Render(RenderArgs),
    /// Re-render the last saved chart, with its saved side labels, and export it.
    Last(LastArgs),
    /// Print the saved inputs as JSON.
    State,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Chart title.
    #[arg(short, long)]
    title: String,
    /// Row data: JSON array of {age, male, female}, or a .csv file with that header. `-` reads stdin.
    #[arg(short, long)]
    data: PathBuf,
    /// Source citation shown bottom-right.
    #[arg(short, long, default_value = "")]
    source: String,
    /// Do not save the inputs as the last chart.
    #[arg(long, default_value_t = false)]
    no_save: bool,
    /// Caption of the left side.
    #[arg(long, default_value = "Male")]
    side_a: String,
    /// Caption of the right side.
    #[arg(long, default_value = "Female")]
    side_b: String,
    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args, Debug)]
struct LastArgs {
    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the SVG here.
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Write the JPEG here.
    #[arg(long)]
    jpg: Option<PathBuf>,
    /// Write chart_<title>.svg and chart_<title>.jpg into this directory
    /// (default when neither --svg nor --jpg is given: current directory).
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Width of the whole surface in pixels (default 1024).
    #[arg(long, default_value_t = 1024)]
    width: u32,
    /// Height of the whole surface in pixels (default 768).
    #[arg(long, default_value_t = 768)]
    height: u32,
}

fn read_data(path: &Path) -> Result<String> {
    let text = if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        s
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(rows_json_from_csv(&text)?)
    } else {
        Ok(text)
    }
}

fn open_store(path: Option<PathBuf>) -> StateStore {
    match path {
        Some(p) => StateStore::new(p),
        None => StateStore::open_default(),
    }
}

fn report(outcome: ExportOutcome) {
    match outcome {
        ExportOutcome::Written { path, bytes } => {
            eprintln!("Wrote {} ({} bytes)", path.display(), bytes)
        }
        ExportOutcome::NothingToExport => eprintln!("Nothing to export"),
    }
}

fn write_outputs(app: &App, out: &OutputArgs) -> Result<()> {
    if let Some(p) = &out.svg {
        report(app.export(p, ExportFormat::Svg)?);
    }
    if let Some(p) = &out.jpg {
        report(app.export(p, ExportFormat::Jpeg)?);
    }
    let dir = match (&out.out_dir, &out.svg, &out.jpg) {
        (Some(d), _, _) => Some(d.clone()),
        (None, None, None) => Some(PathBuf::from(".")),
        _ => None,
    };
    if let Some(dir) = dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        report(app.export_into(&dir, ExportFormat::Svg)?);
        report(app.export_into(&dir, ExportFormat::Jpeg)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args, cli.state),
        Command::Last(args) => cmd_last(args, cli.state),
        Command::State => cmd_state(cli.state),
    }
}

fn cmd_render(args: RenderArgs, state: Option<PathBuf>) -> Result<()> {
    let data = read_data(&args.data)?;
    let labels = SideLabels {
        a: args.side_a,
        b: args.side_b,
    };
    let config = LayoutConfig::for_surface(args.out.width, args.out.height, Margins::default())
        .with_labels(labels);
    let store = (!args.no_save).then(|| open_store(state));

    let mut app = App::new(config, store);
    app.form = FormInput::new(args.title, data, args.source);
    let chart = app.submit()?;
    eprintln!(
        "Rendered \"{}\" ({} shapes)",
        chart.title,
        chart.tree.shapes.len()
    );
    write_outputs(&app, &args.out)
}

fn cmd_last(args: LastArgs, state: Option<PathBuf>) -> Result<()> {
    let config = LayoutConfig::for_surface(args.out.width, args.out.height, Margins::default());
    let mut app = App::new(config, Some(open_store(state)));
    if !app.restore()? {
        anyhow::bail!("no saved chart to render");
    }
    write_outputs(&app, &args.out)
}

fn cmd_state(state: Option<PathBuf>) -> Result<()> {
    let store = open_store(state);
    match store.load()? {
        Some(s) => println!("{}", serde_json::to_string_pretty(&s)?),
        None => eprintln!("No saved chart in {}", store.path().display()),
    }
    Ok(())
}
