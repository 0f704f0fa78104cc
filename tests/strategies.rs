// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mariani::colour::{self, Palette};
use mariani::{render, Cell, RenderConfig, Strategy};

const THREADS: usize = 4;

fn base(resolution: usize, max_dwell: u32) -> RenderConfig {
    RenderConfig {
        resolution,
        max_dwell,
        min_block_size: 16,
        subdivision_factor: 4,
        threads: THREADS,
        ..RenderConfig::default()
    }
}

// Re[-0.4, 0] x Im[-0.2, 0.2], all of it inside the main cardioid.
fn inside(resolution: usize, max_dwell: u32) -> RenderConfig {
    RenderConfig {
        center_x: 0.575,
        center_y: 0.5,
        scale: 0.2,
        ..base(resolution, max_dwell)
    }
}

fn with(config: &RenderConfig, strategy: Strategy) -> RenderConfig {
    RenderConfig {
        strategy,
        ..config.clone()
    }
}

fn cells(config: &RenderConfig) -> Vec<Cell> {
    render(config).unwrap().field.snapshot()
}

fn assert_complete(cells: &[Cell], max_dwell: u32) {
    for (i, cell) in cells.iter().enumerate() {
        match cell {
            Cell::Computed(d) => assert!(*d <= max_dwell, "cell {} has dwell {}", i, d),
            other => panic!("cell {} left as {:?}", i, other),
        }
    }
}

#[test]
fn every_strategy_completes_the_field() {
    let config = base(96, 64);
    for &strategy in Strategy::ALL.iter() {
        let rendered = render(&with(&config, strategy)).unwrap();
        assert!(rendered.field.is_complete(), "{} left holes", strategy);
        assert_complete(&rendered.field.snapshot(), 64);
    }
}

#[test]
fn strategies_agree_cell_for_cell() {
    let config = base(128, 100);
    let expected = cells(&with(&config, Strategy::Sequential));
    for &strategy in &Strategy::ALL[1..] {
        assert_eq!(cells(&with(&config, strategy)), expected, "{} differs", strategy);
    }
}

#[test]
fn renders_are_deterministic() {
    let config = with(&base(80, 80), Strategy::Queue);
    let first = cells(&config);
    for _ in 0..3 {
        assert_eq!(cells(&config), first);
    }
}

#[test]
fn inside_the_set_is_one_fill() {
    let config = inside(64, 50);
    for &strategy in Strategy::ALL.iter() {
        let rendered = render(&with(&config, strategy)).unwrap();
        assert_eq!(rendered.root_side, 64);
        assert!(rendered
            .field
            .snapshot()
            .iter()
            .all(|c| *c == Cell::Computed(50)));
        assert_eq!(rendered.stats.probes, 1);
        assert_eq!(rendered.stats.fills, 1);
        assert_eq!(rendered.stats.subdivisions, 0);
        assert_eq!(rendered.stats.brute_forces, 0);
    }
}

#[test]
fn inside_the_set_matches_the_traditional_render() {
    let config = inside(64, 50);
    let traditional = RenderConfig {
        traditional: true,
        ..config.clone()
    };
    let rendered = render(&traditional).unwrap();
    assert_eq!(rendered.stats, Default::default());
    assert_eq!(rendered.field.snapshot(), cells(&config));
}

#[test]
fn straddling_the_boundary_subdivides() {
    let config = base(64, 50);
    for &strategy in Strategy::ALL.iter() {
        let rendered = render(&with(&config, strategy)).unwrap();
        assert!(rendered.stats.subdivisions >= 1, "{} never split", strategy);
        assert!(rendered.stats.brute_forces >= 1, "{} never brute forced", strategy);
        assert!(rendered.stats.probes > rendered.stats.subdivisions);
        assert_complete(&rendered.field.snapshot(), 50);
    }
}

#[test]
fn odd_resolutions_round_the_root_up() {
    let config = base(100, 40);
    for &strategy in Strategy::ALL.iter() {
        let rendered = render(&with(&config, strategy)).unwrap();
        assert_eq!(rendered.root_side, 256);
        assert_eq!(rendered.field.res(), 100);
        assert!(rendered.field.is_complete());

        let img = colour::paint(&rendered.field, &Palette::for_dwell(40, 1));
        assert_eq!(img.dimensions(), (100, 100));
    }
}

#[test]
fn queue_terminates_for_every_shape() {
    for &(resolution, block, factor) in &[
        (1, 4, 2),
        (7, 4, 2),
        (64, 4, 2),
        (81, 4, 3),
        (100, 5, 5),
        (129, 16, 4),
        (256, 64, 2),
    ] {
        for &threads in &[1, 2, 7] {
            let config = RenderConfig {
                min_block_size: block,
                subdivision_factor: factor,
                threads,
                strategy: Strategy::Queue,
                ..base(resolution, 32)
            };
            let rendered = render(&config).unwrap();
            assert!(
                rendered.field.is_complete(),
                "res {} block {} factor {} threads {}",
                resolution,
                block,
                factor,
                threads
            );
        }
    }
}

#[test]
fn marked_borders_agree_across_strategies() {
    let config = RenderConfig {
        mark_borders: true,
        ..base(96, 60)
    };
    let expected = cells(&with(&config, Strategy::Sequential));
    assert!(expected.iter().any(|c| c.is_marker()));
    assert!(expected.iter().any(|c| c.dwell().is_some()));
    assert!(!expected.contains(&Cell::Unset));
    for &strategy in &Strategy::ALL[1..] {
        assert_eq!(cells(&with(&config, strategy)), expected, "{} differs", strategy);
    }
}

#[test]
fn marked_traditional_render_outlines_the_image() {
    let config = RenderConfig {
        mark_borders: true,
        traditional: true,
        ..base(32, 20)
    };
    let field = render(&config).unwrap().field;
    for i in 0..32 {
        assert_eq!(field.get(0, i), Cell::BorderCompute);
        assert_eq!(field.get(31, i), Cell::BorderCompute);
        assert_eq!(field.get(i, 0), Cell::BorderCompute);
        assert_eq!(field.get(i, 31), Cell::BorderCompute);
    }
    assert!(field.get(16, 16).dwell().is_some());
}

#[test]
fn random_viewports_agree_across_strategies() {
    let mut rng = StdRng::seed_from_u64(0x6d61_7269);
    for _ in 0..6 {
        let config = RenderConfig {
            center_x: rng.gen_range(0.0, 1.0),
            center_y: rng.gen_range(0.0, 1.0),
            scale: rng.gen_range(0.01, 1.0),
            resolution: rng.gen_range(20, 120),
            max_dwell: rng.gen_range(10, 200),
            min_block_size: rng.gen_range(4, 20),
            subdivision_factor: rng.gen_range(2, 5),
            threads: rng.gen_range(1, 6),
            ..RenderConfig::default()
        };
        let expected = cells(&with(&config, Strategy::Sequential));
        assert_complete(&expected, config.max_dwell);
        for &strategy in &Strategy::ALL[1..] {
            assert_eq!(
                cells(&with(&config, strategy)),
                expected,
                "{} differs on {:?}",
                strategy,
                config
            );
        }
    }
}

#[test]
fn out_of_range_configuration_still_renders() {
    let config = RenderConfig {
        resolution: 0,
        max_dwell: 0,
        min_block_size: 0,
        subdivision_factor: 0,
        threads: 0,
        scale: 0.0,
        ..RenderConfig::default()
    };
    let rendered = render(&config).unwrap();
    assert_eq!(rendered.field.res(), 1);
    assert_complete(&rendered.field.snapshot(), 1);
}

#[test]
fn huge_subdivision_factor_renders_like_the_resolution() {
    let config = RenderConfig {
        subdivision_factor: 100_000,
        ..base(64, 16)
    };
    let same = RenderConfig {
        subdivision_factor: 64,
        ..base(64, 16)
    };
    for &strategy in Strategy::ALL.iter() {
        let rendered = render(&with(&config, strategy)).unwrap();
        assert!(rendered.field.is_complete(), "{} left holes", strategy);
        assert_eq!(rendered.field.snapshot(), cells(&with(&same, strategy)));
    }
}

#[test]
fn huge_thread_counts_are_capped() {
    let config = RenderConfig {
        threads: 200_000,
        ..base(32, 16)
    };
    for &strategy in Strategy::ALL.iter() {
        assert!(render(&with(&config, strategy)).unwrap().field.is_complete());
    }
    let traditional = RenderConfig {
        traditional: true,
        ..config
    };
    assert!(render(&traditional).unwrap().field.is_complete());
}
