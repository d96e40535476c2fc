//! TMX Reader CLI
//!
//! Usage:
//!   tmx-reader [OPTIONS] [FILE]
//!
//! Options:
//!   -n, --no-refs           Do not load external tilesets or templates
//!   -c, --config <FILE>     Parse options (TOML format)
//!   -b, --base-dir <DIR>    Directory references resolve against
//!   -d, --debug             Print the layer tree to stderr
//!   -h, --help              Print help

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use tmx_reader::map::{Group, ImageLayer, Layer, Map, ObjectGroup};
use tmx_reader::{load_with_config, parse_with_config, summarize, ParseConfig};

#[derive(Parser)]
#[command(name = "tmx-reader")]
#[command(about = "Decode Tiled .tmx maps and print a summary")]
struct Cli {
    /// Input map (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Do not load external tilesets or templates
    #[arg(short, long)]
    no_refs: bool,

    /// Parse options file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory that references resolve against; required when reading
    /// from stdin, defaults to the directory of FILE otherwise
    #[arg(short, long)]
    base_dir: Option<PathBuf>,

    /// Debug mode: print the layer tree to stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.input.is_none() && io::stdin().is_terminal() {
        eprintln!("Usage: tmx-reader [OPTIONS] [FILE]\nRun with --help for options.");
        std::process::exit(2);
    }

    // Load parse options
    let mut config = match &cli.config {
        Some(path) => match ParseConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ParseConfig::default(),
    };
    if cli.no_refs {
        config = config.with_resolve_references(false);
    }

    let result = match (&cli.input, &cli.base_dir) {
        (Some(path), None) => load_with_config(path, &config),
        (Some(path), Some(base_dir)) => match std::fs::read_to_string(path) {
            Ok(source) => parse_with_config(&source, base_dir, &config),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        (None, Some(base_dir)) => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            parse_with_config(&buffer, base_dir, &config)
        }
        (None, None) => {
            eprintln!("Error: --base-dir is required when reading from stdin");
            std::process::exit(2);
        }
    };

    match result {
        Ok(map) => {
            if cli.debug {
                eprintln!("=== Layer Debug ===");
                print_tree(&map);
                eprintln!("===================");
            }
            println!("{}", summarize(&map));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_tree(map: &Map) {
    fn print_layers(
        depth: usize,
        layers: &[Layer],
        object_groups: &[ObjectGroup],
        image_layers: &[ImageLayer],
        groups: &[Group],
    ) {
        let indent = "  ".repeat(depth);
        for layer in layers {
            eprintln!(
                "{}[layer {}] {:?} {}x{} opacity={:.2} visible={} offset=({:.1}, {:.1})",
                indent,
                layer.id,
                layer.name,
                layer.width,
                layer.height,
                layer.opacity,
                layer.visible,
                layer.offset_x,
                layer.offset_y
            );
            if let Some(chunks) = layer.data.chunks() {
                for chunk in chunks {
                    eprintln!(
                        "{}  chunk ({}, {}) {}x{}",
                        indent, chunk.x, chunk.y, chunk.width, chunk.height
                    );
                }
            }
        }
        for group in object_groups {
            eprintln!(
                "{}[objectgroup {}] {:?} opacity={:.2} visible={}",
                indent, group.id, group.name, group.opacity, group.visible
            );
            for object in &group.objects {
                eprintln!(
                    "{}  #{} {:?} x={:.1} y={:.1} w={:?} h={:?} template={:?}",
                    indent,
                    object.id,
                    object.name,
                    object.x,
                    object.y,
                    object.width,
                    object.height,
                    object.template
                );
            }
        }
        for image_layer in image_layers {
            eprintln!(
                "{}[imagelayer {}] {:?} image={:?}",
                indent,
                image_layer.id,
                image_layer.name,
                image_layer.image.as_ref().map(|i| i.source.as_str())
            );
        }
        for group in groups {
            eprintln!("{}[group {}] {:?}", indent, group.id, group.name);
            print_layers(
                depth + 1,
                &group.layers,
                &group.object_groups,
                &group.image_layers,
                &group.groups,
            );
        }
    }

    for tileset in &map.tilesets {
        eprintln!(
            "[tileset {}] {:?} source={:?} resolved={}",
            tileset.first_gid,
            tileset.name,
            tileset.source,
            tileset.is_resolved()
        );
    }
    print_layers(
        0,
        &map.layers,
        &map.object_groups,
        &map.image_layers,
        &map.groups,
    );
}
