use anyhow::{Context, Result};

use crate::{
    cli::{Cli, SampleArgs},
    commands::{check_output, create_parent_dir, input_path, load_config},
    join::{join_points, sample_points},
    pipeline,
};

pub fn run(cli: &Cli, args: &SampleArgs) -> Result<()> {
    let config = load_config(cli)?;
    let boundaries = input_path(args.boundaries.as_ref(), config.input.boundaries.as_ref(), "boundary")?;
    check_output(&args.output, args.force)?;

    let layer = pipeline::load_boundaries(&boundaries, &config.input)
        .with_context(|| format!("[sample] Failed to read {}", boundaries.display()))?;
    let layer = pipeline::prepare_layer(layer, &config.processing)?;

    let samples = sample_points(&layer, args.per_region, args.seed);
    let points = samples.iter().map(|sample| sample.point).collect::<Vec<_>>();
    let matches = join_points(&points, &layer);

    let misplaced = samples.iter().zip(&matches)
        .filter(|(sample, matched)| matched.region_idx != Some(sample.source))
        .count();

    create_parent_dir(&args.output)?;
    pipeline::export_point_matches(&matches, &args.output)
        .with_context(|| format!("[sample] Failed to write {}", args.output.display()))?;
    println!(
        "Located {} points in {} regions ({} landed in a different region) -> {}",
        matches.len(), layer.len(), misplaced, args.output.display()
    );
    Ok(())
}
