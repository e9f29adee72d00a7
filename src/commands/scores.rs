use anyhow::{Context, Result};

use crate::{
    cli::{Cli, ScoresArgs},
    commands::{check_output, create_parent_dir, input_path, load_config},
    pipeline,
    types::Category,
};

pub fn run(cli: &Cli, args: &ScoresArgs) -> Result<()> {
    let config = load_config(cli)?;
    let statistics = input_path(args.statistics.as_ref(), config.input.statistics.as_ref(), "statistics")?;
    check_output(&args.output, args.force)?;

    let counts = pipeline::load_counts(&statistics, &config.statistics)
        .with_context(|| format!("[scores] Failed to read {}", statistics.display()))?;
    let table = pipeline::compute_scores(&counts, &config.statistics.sentinel);
    create_parent_dir(&args.output)?;
    pipeline::export_scores(&table, &args.output)
        .with_context(|| format!("[scores] Failed to write {}", args.output.display()))?;

    let c1 = table.summary(Category::C1);
    println!(
        "Scored {} regions ({} undefined scores) -> {}",
        table.len(), table.undefined_count(), args.output.display()
    );
    if let (Some(min), Some(max), Some(mean)) = (c1.min, c1.max, c1.mean) {
        println!("C1: min {min:.1}, max {max:.1}, mean {mean:.1}");
    }
    Ok(())
}
