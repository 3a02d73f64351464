//! Left/Right Layout CLI
//!
//! Usage:
//!   lrlayout [OPTIONS] [FILE]
//!
//! Options:
//!   -m, --measure <PRESET>  Print the root's own height under a sizing preset
//!   -s, --stack             Stack the root's children before laying out
//!   -h, --help              Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use left_right_layout::{Scene, SizingOptions};

#[derive(Parser)]
#[command(name = "lrlayout")]
#[command(about = "Lay out a TOML view scene and print its frames")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Print the root's own height under a sizing preset instead of the frames
    #[arg(short, long, value_enum)]
    measure: Option<Preset>,

    /// Stack the root's children top to bottom before the layout pass
    #[arg(short, long)]
    stack: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Defaults,
    CompressedSize,
    SubviewSums,
    SubviewSumsWithY,
    StackViews,
}

impl Preset {
    fn options(self) -> SizingOptions {
        match self {
            Preset::Defaults => SizingOptions::defaults(),
            Preset::CompressedSize => SizingOptions::compressed_size(),
            Preset::SubviewSums => SizingOptions::subview_sums(),
            Preset::SubviewSumsWithY => SizingOptions::subview_sums_with_y(),
            Preset::StackViews => SizingOptions::stack_views(),
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut scene = match Scene::from_str(&source) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.stack {
        let total = scene.stack_root();
        log::debug!("stacked children of root: {}", total);
    }

    if let Some(preset) = cli.measure {
        println!("{}", scene.measure_root(&preset.options()));
        return;
    }

    scene.layout();
    println!("{}", scene.dump());
}
