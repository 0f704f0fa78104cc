// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use failure::Fail;
use log::{debug, error, info};
use simplog::SimpleLogger;
use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;
use std::time::Instant;

use mariani::colour::{self, Palette};
use mariani::{render, RenderConfig, RenderError};

const CENTER_X: &str = "center-x";
const CENTER_Y: &str = "center-y";
const SCALE: &str = "scale";
const RESOLUTION: &str = "resolution";
const ITERATIONS: &str = "iterations";
const COLOURS: &str = "colours";
const BLOCK_DIM: &str = "block-dim";
const SUBDIVISION: &str = "subdivision";
const MARK: &str = "mark";
const TRADITIONAL: &str = "traditional";
const OUTPUT: &str = "output";
const STRATEGY: &str = "strategy";
const THREADS: &str = "threads";
const VERBOSITY: &str = "verbosity";
const QUIET: &str = "quiet";

fn value_arg<'a, 'b>(name: &'a str, short: &'a str, help: &'a str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .long(name)
        .short(short)
        .takes_value(true)
        .allow_hyphen_values(true)
        .help(help)
}

fn args<'a>() -> ArgMatches<'a> {
    App::new("mariani")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mandelbrot Set Renderer")
        .arg(value_arg(CENTER_X, "x", "Center of Re[-1.5;0.5], in [0;1] (default=0.5)"))
        .arg(value_arg(CENTER_Y, "y", "Center of Im[-1;1], in [0;1] (default=0.5)"))
        .arg(value_arg(SCALE, "s", "Inverse scaling factor, in (0;1] (default=1)"))
        .arg(value_arg(RESOLUTION, "r", "Image resolution in pixels (default=1024)"))
        .arg(value_arg(ITERATIONS, "i", "Iterations or max dwell (default=512)"))
        .arg(value_arg(COLOURS, "c", "Colour map iterations (default=1)"))
        .arg(value_arg(BLOCK_DIM, "b", "Min block dimension for subdivision (default=16)"))
        .arg(value_arg(SUBDIVISION, "d", "Subdivision of blocks (default=4)"))
        .arg(
            Arg::with_name(MARK)
                .long(MARK)
                .short("m")
                .help("Mark Mariani-Silver borders"),
        )
        .arg(
            Arg::with_name(TRADITIONAL)
                .long(TRADITIONAL)
                .short("t")
                .help("Traditional computation (no Mariani-Silver)"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("output.png")
                .help("Output file"),
        )
        .arg(
            Arg::with_name(STRATEGY)
                .long(STRATEGY)
                .takes_value(true)
                .default_value("queue")
                .help("Work distribution: sequential, tasks, parallel-probe or queue"),
        )
        .arg(value_arg(THREADS, "j", "Number of worker threads (default=logical cores)"))
        .arg(
            Arg::with_name(VERBOSITY)
                .long(VERBOSITY)
                .short("v")
                .takes_value(true)
                .default_value("info")
                .help("Set verbosity level for output (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::with_name(QUIET)
                .long(QUIET)
                .short("q")
                .help("Only report errors"),
        )
        .get_matches()
}

/// Parses an optional argument, falling back to `default` when it is
/// missing or not a number.  Range checks happen in `RenderConfig`.
fn parse_or<T: FromStr>(matches: &ArgMatches, name: &str, default: T) -> T {
    match matches.value_of(name) {
        None => default,
        Some(s) => T::from_str(s).unwrap_or(default),
    }
}

// Signed so that a negative value clamps to the minimum rather than
// falling back to the default.
fn parse_count(matches: &ArgMatches, name: &str, default: usize) -> usize {
    parse_or::<i64>(matches, name, default as i64).max(0) as usize
}

fn config(matches: &ArgMatches) -> RenderConfig {
    let defaults = RenderConfig::default();
    RenderConfig {
        center_x: parse_or(matches, CENTER_X, defaults.center_x),
        center_y: parse_or(matches, CENTER_Y, defaults.center_y),
        scale: parse_or(matches, SCALE, defaults.scale),
        resolution: parse_count(matches, RESOLUTION, defaults.resolution),
        max_dwell: parse_count(matches, ITERATIONS, defaults.max_dwell as usize).min(u32::MAX as usize) as u32,
        colour_iterations: parse_count(matches, COLOURS, defaults.colour_iterations as usize).min(u32::MAX as usize) as u32,
        min_block_size: parse_count(matches, BLOCK_DIM, defaults.min_block_size),
        subdivision_factor: parse_count(matches, SUBDIVISION, defaults.subdivision_factor),
        mark_borders: matches.is_present(MARK),
        traditional: matches.is_present(TRADITIONAL),
        strategy: parse_or(matches, STRATEGY, defaults.strategy),
        threads: parse_count(matches, THREADS, defaults.threads),
        output: matches
            .value_of(OUTPUT)
            .map(PathBuf::from)
            .unwrap_or(defaults.output),
    }
    .clamped()
}

fn describe(config: &RenderConfig) {
    let plane = config.plane();
    let corner = plane.corner();
    info!("Center:      [{:.6},{:.6}]", config.center_x, config.center_y);
    info!("Zoom:        {}%", ((1.0 / config.scale) as u64) * 100);
    info!("Iterations:  {}", config.max_dwell);
    info!(
        "Window:      Re[{:.6}, {:.6}], Im[{:.6}, {:.6}]",
        plane.origin.re, corner.re, plane.origin.im, corner.im
    );
    info!("Output:      {}", config.output.display());
    info!("Block dim:   {}", config.min_block_size);
    info!("Subdivision: {}", config.subdivision_factor);
    info!(
        "Borders:     {}",
        if config.mark_borders { "marking" } else { "not marking" }
    );
    if config.traditional {
        info!("Mode:        traditional, {} threads", config.threads);
    } else {
        info!("Strategy:    {}, {} threads", config.strategy, config.threads);
    }
}

fn run(config: &RenderConfig) -> Result<(), RenderError> {
    let start = Instant::now();
    let rendered = render(config)?;
    debug!("Rounded the grid up to a root block of {}", rendered.root_side);
    info!(
        "Blocks:      {} probed, {} filled, {} computed, {} subdivided",
        rendered.stats.probes,
        rendered.stats.fills,
        rendered.stats.brute_forces,
        rendered.stats.subdivisions
    );
    info!("Rendered in {} ms", start.elapsed().as_millis());

    let palette = Palette::for_dwell(config.max_dwell, config.colour_iterations);
    let img = colour::paint(&rendered.field, &palette);
    colour::write_image(&config.output, &img)
}

fn main() {
    let matches = args();
    let verbosity = if matches.is_present(QUIET) {
        Some("error")
    } else {
        matches.value_of(VERBOSITY)
    };
    SimpleLogger::init_prefix(verbosity, false);

    let config = config(&matches);
    describe(&config);

    match run(&config) {
        Err(e) => {
            error!("{}", e);
            eprintln!("Render failure: {}", e);
            let mut cause = e.cause();
            while let Some(c) = cause {
                eprintln!("  caused by: {}", c);
                cause = c.cause();
            }
            exit(1);
        }
        Ok(_) => exit(0),
    }
}
