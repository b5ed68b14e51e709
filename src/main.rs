use anyhow::Result;
use clap::Parser;
use deimap::cli::{Cli, Commands};
use deimap::commands::{
    AnalyzeOptions, CorrelateOptions, HeatmapOptions, IntersectionsOptions,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            data,
            group_by,
            score,
            variant,
            filters,
            age_min,
            age_max,
            min_group_size,
            sort,
            top,
            format,
            output,
            config,
        } => {
            let options = AnalyzeOptions {
                data,
                group_by,
                score,
                variant: variant.map(Into::into),
                filters,
                age_min,
                age_max,
                min_group_size,
                sort: sort.into(),
                top,
                format: format.into(),
                output,
                config,
            };
            deimap::commands::run_analyze(options)?;
        }
        Commands::Heatmap {
            data,
            view,
            metric,
            pillar,
            dims,
            top_managers,
            variant,
            filters,
            age_min,
            age_max,
            format,
            output,
            config,
        } => {
            let options = HeatmapOptions {
                data,
                view,
                metric: metric.into(),
                pillar,
                dims,
                top_managers,
                variant: variant.map(Into::into),
                filters,
                age_min,
                age_max,
                format: format.into(),
                output,
                config,
            };
            deimap::commands::run_heatmap(options)?;
        }
        Commands::Correlate {
            data,
            x,
            y,
            variant,
            filters,
            age_min,
            age_max,
            layers,
            groups,
            combinations,
            format,
            output,
            config,
        } => {
            let options = CorrelateOptions {
                data,
                x,
                y,
                variant: variant.map(Into::into),
                filters,
                age_min,
                age_max,
                layers,
                groups,
                combinations,
                format: format.into(),
                output,
                config,
            };
            deimap::commands::run_correlate(options)?;
        }
        Commands::Intersections {
            data,
            view,
            score,
            variant,
            filters,
            min_group_size,
            format,
            output,
            config,
        } => {
            let options = IntersectionsOptions {
                data,
                view,
                score,
                variant: variant.map(Into::into),
                filters,
                min_group_size,
                format: format.into(),
                output,
                config,
            };
            deimap::commands::run_intersections(options)?;
        }
        Commands::Init { force } => {
            deimap::commands::init::init_config(force)?;
        }
    }

    Ok(())
}
