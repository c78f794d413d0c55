//! statdoc CLI - DOCX report generation tool

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use statdoc::{
    load_table_with_options, render, report, CsvOptions, JsonFormat, RenderOptions, ReportOptions,
};

const DEFAULT_CSV: &str = "cox_summary.csv";
const DEFAULT_IMAGE: &str = "survival_curve.png";
const DEFAULT_OUTPUT: &str = "Healthcare_Survival_Report.docx";

#[derive(Parser)]
#[command(name = "statdoc")]
#[command(version)]
#[command(about = "Turn a regression summary CSV and a chart into a DOCX report", long_about = None)]
struct Cli {
    /// Input summary CSV file
    #[arg(value_name = "CSV", default_value = DEFAULT_CSV)]
    csv: PathBuf,

    /// Chart image file
    #[arg(value_name = "IMAGE", default_value = DEFAULT_IMAGE)]
    image: PathBuf,

    /// Output DOCX file
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the DOCX report (default)
    #[command(alias = "gen")]
    Generate(GenerateOpts),

    /// Dump the assembled document as JSON
    Json {
        /// Input summary CSV file
        #[arg(value_name = "CSV", default_value = DEFAULT_CSV)]
        csv: PathBuf,

        /// Chart image file
        #[arg(value_name = "IMAGE", default_value = DEFAULT_IMAGE)]
        image: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show input file information
    Info {
        /// Input summary CSV file
        #[arg(value_name = "CSV", default_value = DEFAULT_CSV)]
        csv: PathBuf,

        /// Chart image file
        #[arg(value_name = "IMAGE")]
        image: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct GenerateOpts {
    /// Input summary CSV file
    #[arg(value_name = "CSV", default_value = DEFAULT_CSV)]
    csv: PathBuf,

    /// Chart image file
    #[arg(value_name = "IMAGE", default_value = DEFAULT_IMAGE)]
    image: PathBuf,

    /// Output DOCX file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Heading above the summary table
    #[arg(long)]
    table_heading: Option<String>,

    /// Caption paragraph above the summary table
    #[arg(long)]
    caption: Option<String>,

    /// Heading above the chart
    #[arg(long)]
    chart_heading: Option<String>,

    /// Chart display width in points
    #[arg(long, value_name = "POINTS")]
    image_width: Option<f32>,

    /// CSV field delimiter (single ASCII character)
    #[arg(long, value_name = "CHAR", default_value = ",")]
    delimiter: char,

    /// Trim whitespace around CSV fields
    #[arg(long)]
    trim: bool,

    /// Use A4 pages instead of US Letter
    #[arg(long)]
    a4: bool,

    /// Record the generation time in the document properties
    #[arg(long)]
    stamp: bool,
}

impl GenerateOpts {
    /// Defaults for a bare `statdoc [CSV] [IMAGE] [OUTPUT]` invocation.
    fn with_paths(csv: PathBuf, image: PathBuf, output: PathBuf) -> Self {
        Self {
            csv,
            image,
            output,
            title: None,
            table_heading: None,
            caption: None,
            chart_heading: None,
            image_width: None,
            delimiter: ',',
            trim: false,
            a4: false,
            stamp: false,
        }
    }

    fn csv_options(&self) -> Result<CsvOptions, Box<dyn std::error::Error>> {
        let delimiter =
            u8::try_from(self.delimiter).map_err(|_| "delimiter must be an ASCII character")?;
        let mut options = CsvOptions::new().with_delimiter(delimiter);
        if self.trim {
            options = options.trimmed();
        }
        Ok(options)
    }

    fn report_options(&self) -> ReportOptions {
        let mut options = ReportOptions::default();
        if let Some(ref title) = self.title {
            options = options.with_title(title.as_str());
        }
        if let Some(ref heading) = self.table_heading {
            options = options.with_table_heading(heading.as_str());
        }
        if let Some(ref caption) = self.caption {
            options = options.with_table_caption(caption.as_str());
        }
        if let Some(ref heading) = self.chart_heading {
            options = options.with_chart_heading(heading.as_str());
        }
        if let Some(width) = self.image_width {
            options = options.with_image_width(width);
        }
        options
    }

    fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::new();
        if self.a4 {
            options = options.a4();
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Generate(opts)) => cmd_generate(&opts),
        Some(Commands::Json {
            csv,
            image,
            output,
            compact,
        }) => cmd_json(&csv, &image, output.as_deref(), compact),
        Some(Commands::Info { csv, image }) => cmd_info(&csv, image.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: generate with the standard file names
            let opts = GenerateOpts::with_paths(cli.csv, cli.image, cli.output);
            cmd_generate(&opts)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_generate(opts: &GenerateOpts) -> Result<(), Box<dyn std::error::Error>> {
    let csv_options = opts.csv_options()?;
    let report_options = opts.report_options();
    let render_options = opts.render_options();

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Loading table...");
    let table = load_table_with_options(&opts.csv, csv_options)?;
    log::debug!(
        "loaded {}: {} columns, {} rows",
        opts.csv.display(),
        table.column_count(),
        table.row_count()
    );
    pb.inc(1);

    pb.set_message("Assembling report...");
    let mut doc = report::compose(&table, &opts.image, &report_options)?;
    if opts.stamp {
        doc.metadata.stamp(chrono::Utc::now());
    }
    pb.inc(1);

    pb.set_message("Writing DOCX...");
    render::write_docx(&doc, &render_options, &opts.output)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{} {}", "Saved to".green().bold(), opts.output.display());
    println!(
        "  {} {} data rows, {} columns",
        "├─".dimmed(),
        table.row_count(),
        table.column_count()
    );
    println!("  {} 1 embedded chart", "└─".dimmed());

    Ok(())
}

fn cmd_json(
    csv: &Path,
    image: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = statdoc::to_json(csv, image, format)?;

    if let Some(path) = output {
        std::fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(csv: &Path, image: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let table = statdoc::load_table(csv)?;

    println!("{}", "Table Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), csv.display());
    println!("{}: {}", "Columns".bold(), table.column_count());
    println!("{}: {}", "Data rows".bold(), table.row_count());
    println!("{}: {}", "Header".bold(), table.columns().join(", "));

    let preview = table.head(5);
    if !preview.is_empty() {
        println!();
        for row in preview {
            println!("  {}", row.join(", "));
        }
        if table.row_count() > preview.len() {
            println!("  ({} more rows)", table.row_count() - preview.len());
        }
    }

    if let Some(path) = image {
        let info = statdoc::image::probe_file(path)?;

        println!();
        println!("{}", "Chart Information".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());

        println!("{}: {}", "File".bold(), path.display());
        println!("{}: {}", "Format".bold(), info.format);
        println!(
            "{}: {} x {} px",
            "Dimensions".bold(),
            info.width,
            info.height
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "statdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DOCX report generation tool");
    println!();
    println!("License: MIT");
}
