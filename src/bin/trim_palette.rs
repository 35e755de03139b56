#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use trim_palette::{
    hex_rgb,
    pack::{Pack, PackOptions, Progress},
    reduce, ColorSet, PaletteError,
};

/// Prints each step of pack generation.
struct PrintProgress {
    /// The number of steps reported so far.
    done: usize,
    /// The total number of steps.
    total: usize,
}

impl PrintProgress {
    fn new() -> Self {
        Self { done: 0, total: 0 }
    }
}

impl Progress for PrintProgress {
    fn start(&mut self, total: usize, message: &str) {
        self.done = 0;
        self.total = total;
        println!("[0/{total}] {message}");
    }

    fn step(&mut self, message: &str) {
        self.done += 1;
        println!("[{}/{}] {message}", self.done, self.total);
    }

    fn skipped(&mut self, item: &str, error: &PaletteError) {
        eprintln!("skipped {item}: {error}");
    }

    fn finish(&mut self, message: &str) {
        println!("[{}/{}] {message}", self.total, self.total);
    }
}

#[derive(Subcommand)]
enum Command {
    /// Computes the palette strip of a single texture.
    Palette {
        /// The texture to take the colors from.
        input: PathBuf,

        /// Where to write the palette strip. Must not exist yet.
        output: PathBuf,

        /// Extract colors on multiple threads.
        #[arg(long)]
        par: bool,
    },
    /// Generates the data pack and resource pack.
    Pack {
        /// The directory containing the item list, vanilla assets, and textures.
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// The namespace of the generated palettes and materials.
        #[arg(short, long, default_value = "super_trim")]
        namespace: String,

        /// Only generate the data pack.
        #[arg(long, conflicts_with = "resourcepack_only")]
        datapack_only: bool,

        /// Only generate the resource pack.
        #[arg(long)]
        resourcepack_only: bool,

        /// Number of threads for palette generation (0 uses all cores).
        #[arg(short, long, default_value_t = 0)]
        threads: u8,
    },
}

/// Reduces textures to ordered 8-color palette strips.
#[derive(Parser)]
#[command(author, version, about)]
struct Options {
    /// Print how long each stage took.
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let Options { verbose, command } = Options::parse();

    macro_rules! log {
        ($name: literal, $val: expr) => {
            if verbose {
                let time = std::time::Instant::now();
                let value = $val;
                println!("{} took {}ms", $name, time.elapsed().as_millis());
                value
            } else {
                $val
            }
        };
    }

    match command {
        Command::Palette { input, output, par } => {
            let colors = log!(
                "read image",
                if par {
                    ColorSet::open_par(&input)
                } else {
                    ColorSet::open(&input)
                }
            )
            .with_context(|| format!("reading {}", input.display()))?;

            let palette = log!("reduce", reduce::palette(&colors))
                .with_context(|| format!("reducing {}", input.display()))?;

            log!("write image", palette.save(&output))
                .with_context(|| format!("writing {}", output.display()))?;

            for color in &palette {
                println!("{}", hex_rgb(*color));
            }
        }
        Command::Pack {
            root,
            namespace,
            datapack_only,
            resourcepack_only,
            threads,
        } => {
            let pack = Pack::load(PackOptions::new(root).namespace(namespace))
                .context("loading items")?;

            let run = || -> Result<()> {
                if !resourcepack_only {
                    log!("datapack", pack.datapack(PrintProgress::new()))
                        .context("generating the data pack")?;
                }
                if !datapack_only {
                    log!("resource pack", pack.resourcepack(PrintProgress::new()))
                        .context("generating the resource pack")?;
                }
                Ok(())
            };

            match threads {
                0 => run()?,
                t => rayon::ThreadPoolBuilder::new()
                    .num_threads(t.into())
                    .build()
                    .context("building the thread pool")?
                    .install(run)?,
            }
        }
    }

    Ok(())
}
