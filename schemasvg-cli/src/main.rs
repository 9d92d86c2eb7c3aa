//! schemasvg CLI - schematic to SVG conversion from the command line.

use clap::{Parser, Subcommand};
use schemasvg::{
    convert_to_svg, detect_dialect, discover_schematic_files, ColorTable, RenderConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "schemasvg")]
#[command(about = "Electronic schematic to SVG converter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single schematic file to SVG
    Convert {
        /// Path to .sch, .sym, or .kicad_sch file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to the input path with .svg extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: RenderOptions,
    },

    /// Convert every schematic file found under a directory
    Batch {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        options: RenderOptions,
    },

    /// Report which schematic dialect a file would be parsed as
    Detect {
        /// Path to schematic file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct RenderOptions {
    /// Symbol library directory, searched in order (repeatable)
    #[arg(short = 'L', long = "lib", value_name = "DIR")]
    lib: Vec<PathBuf>,

    /// Minimum stroke width
    #[arg(long, value_name = "UNITS")]
    thickness: Option<f64>,

    /// Color palette file, one #rrggbb per line
    #[arg(long, value_name = "FILE")]
    colors: Option<PathBuf>,

    /// Draw a minor grid (every 100 units)
    #[arg(short = 'g', long)]
    minor_grid: bool,

    /// Draw a major grid (every 500 units)
    #[arg(short = 'G', long)]
    major_grid: bool,

    /// JSON config file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl RenderOptions {
    fn build(&self) -> Result<RenderConfig, String> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
                serde_json::from_str(&text)
                    .map_err(|e| format!("invalid config {}: {}", path.display(), e))?
            }
            None => RenderConfig::default(),
        };
        if !self.lib.is_empty() {
            config.symbol_paths = self.lib.clone();
        }
        if let Some(thickness) = self.thickness {
            config.min_thickness = thickness;
        }
        if let Some(path) = &self.colors {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            config.palette = ColorTable::from_lines(&text);
        }
        config.minor_grid |= self.minor_grid;
        config.major_grid |= self.major_grid;
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Convert {
            file,
            output,
            options,
        } => handle_convert(&file, output.as_deref(), &options),
        Commands::Batch { dir, options } => handle_batch(&dir, &options),
        Commands::Detect { file } => handle_detect(&file),
    };

    process::exit(exit_code);
}

fn handle_convert(file: &Path, output: Option<&Path>, options: &RenderOptions) -> i32 {
    let config = match options.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| file.with_extension("svg"));
    match convert_one(file, &output, &config) {
        Ok(()) => {
            println!("{} -> {}", file.display(), output.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_batch(dir: &Path, options: &RenderOptions) -> i32 {
    let config = match options.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let files = match discover_schematic_files(dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if files.is_empty() {
        eprintln!("No schematic files found under {}", dir.display());
        return 1;
    }

    let mut failures = 0;
    for file in &files {
        let output = file.with_extension("svg");
        match convert_one(file, &output, &config) {
            Ok(()) => println!("{} -> {}", file.display(), output.display()),
            Err(e) => {
                eprintln!("Error: {}: {}", file.display(), e);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        1
    } else {
        0
    }
}

fn handle_detect(file: &Path) -> i32 {
    match fs::read_to_string(file) {
        Ok(content) => {
            println!("{:?}", detect_dialect(&content));
            0
        }
        Err(e) => {
            eprintln!("Error: {}: {}", file.display(), e);
            1
        }
    }
}

fn convert_one(input: &Path, output: &Path, config: &RenderConfig) -> Result<(), String> {
    let content =
        fs::read_to_string(input).map_err(|e| format!("cannot read {}: {}", input.display(), e))?;
    let svg = convert_to_svg(&content, config);
    fs::write(output, svg).map_err(|e| format!("cannot write {}: {}", output.display(), e))?;
    Ok(())
}
