use anyhow::{Context, Result};
use tracing::warn;

use crate::{
    cli::{Cli, OutputFormat, RenderArgs},
    commands::{check_output, create_parent_dir, input_path, load_config},
    pipeline::{self, Analysis},
    render::{HtmlRenderer, SvgRenderer},
};

pub fn run(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    let boundaries = input_path(args.input.boundaries.as_ref(), config.input.boundaries.as_ref(), "boundary")?;
    let statistics = input_path(args.input.statistics.as_ref(), config.input.statistics.as_ref(), "statistics")?;
    if args.council.is_some() {
        config.processing.council = args.council.clone();
    }
    if args.format == OutputFormat::Html && config.processing.target_epsg != 4326 {
        warn!(target_epsg = config.processing.target_epsg, "web maps need lon/lat; reprojecting to EPSG:4326");
        config.processing.target_epsg = 4326;
    }
    check_output(&args.output, args.force)?;

    let analysis = Analysis::run(&boundaries, &statistics, &config)
        .context("[render] Analysis failed")?;

    create_parent_dir(&args.output)?;
    match args.format {
        OutputFormat::Geojson => pipeline::export_geojson(&analysis.joined, args.category, &args.output)?,
        OutputFormat::Svg => {
            let spec = analysis.render_spec(args.category, &config.render)?;
            SvgRenderer::from_config(&config.render).render_to_file(&analysis.joined, &spec, &args.output)?;
        }
        OutputFormat::Html => {
            let spec = analysis.render_spec(args.category, &config.render)?;
            HtmlRenderer::new().render_to_file(&analysis.joined, &spec, &args.output)?;
        }
    }

    println!(
        "Mapped {} of {} regions for {} ({} unmatched boundaries, {} unmatched score rows) -> {}",
        analysis.joined.len(), analysis.layer.len(), args.category,
        analysis.report.unmatched_regions.len(), analysis.report.unmatched_scores.len(),
        args.output.display(),
    );
    Ok(())
}
