use crate::core::{
    BubbleReport, CorrelationReport, GroupReport, HeatmapCell, HeatmapReport, Report, ScoreCategory,
};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::io::Write;

#[derive(Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TerminalWriter;

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for TerminalWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        match report {
            Report::Groups(groups) => print_groups(groups),
            Report::Heatmap(heatmap) => print_heatmap(heatmap),
            Report::Correlation(correlation) => print_correlation(correlation),
            Report::Bubbles(bubbles) => print_bubbles(bubbles),
        }
        Ok(())
    }
}

fn print_header(title: &str) {
    println!("{}", title.bold().blue());
    println!("{}", "=".repeat(title.len()).blue());
    println!();
}

fn print_groups(report: &GroupReport) {
    print_header("Deimap Group Analysis");

    println!(
        "  Records: {} of {} after filters",
        report.filtered_records, report.total_records
    );
    println!("  Grouped by: {}", report.group_by);
    println!("  Score: {} ({})", report.score, report.variant);
    if let Some(index) = report.diversity_index {
        println!("  Diversity index: {index:.3}");
    }
    println!();

    if report.groups.is_empty() {
        println!("{}", "No data for current filters".yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Group", "Count", "Mean", "Median", "Q1", "Q3", "Std", "Whiskers", "Outliers",
        ]);

    for group in &report.groups {
        table.add_row(vec![
            Cell::new(&group.key),
            Cell::new(group.count),
            Cell::new(format!("{:.3}", group.mean)),
            Cell::new(format!("{:.3}", group.median)),
            Cell::new(format!("{:.3}", group.q1)),
            Cell::new(format!("{:.3}", group.q3)),
            Cell::new(format!("{:.3}", group.std)),
            Cell::new(format!(
                "[{:.2}, {:.2}]",
                group.lower_whisker, group.upper_whisker
            )),
            Cell::new(group.outliers.len()),
        ]);
    }
    println!("{table}");
    println!();

    if let Some(insights) = &report.insights {
        println!("{} Insights:", "•".bold());
        println!(
            "  Highest: {} ({:.2}, n={})",
            insights.highest.key.green(),
            insights.highest.mean,
            insights.highest.count
        );
        println!(
            "  Lowest:  {} ({:.2}, n={})",
            insights.lowest.key.red(),
            insights.lowest.mean,
            insights.lowest.count
        );
        println!("  Gap: {:.2} points", insights.gap);
        println!("  Overall average: {:.2}", insights.average);
    }
}

fn print_heatmap(report: &HeatmapReport) {
    print_header("Deimap Equity Heatmap");

    println!("  View: {}", report.view);
    println!("  Metric: {} ({})", report.metric, report.variant);
    println!("  Cells: {}", report.cells.len());
    if let (Some(best), Some(worst)) = (report.best, report.worst) {
        println!("  Best: {best:.3}  Worst: {worst:.3}");
    }
    println!();

    if report.cells.is_empty() {
        println!("{}", "No data for current filters".yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Group", "Category", "Value", "n"]);
    for cell in &report.cells {
        table.add_row(vec![
            Cell::new(&cell.group),
            Cell::new(&cell.category),
            Cell::new(format!("{:.3}", cell.value)),
            Cell::new(cell.count),
        ]);
    }
    println!("{table}");
    println!();

    let critical = most_critical(&report.cells, &report.metric);
    if !critical.is_empty() {
        println!("{} Most critical:", "!".red().bold());
        for (i, cell) in critical.iter().enumerate() {
            println!(
                "  {}. {} - {}: {} (n={})",
                i + 1,
                cell.group,
                cell.category,
                format!("{:.3}", cell.value).red(),
                cell.count
            );
        }
    }
}

/// Worst-first cells: high values are bad for a negative metric, low
/// values are bad otherwise.
fn most_critical<'a>(cells: &'a [HeatmapCell], metric: &str) -> Vec<&'a HeatmapCell> {
    let mut sorted: Vec<&HeatmapCell> = cells.iter().collect();
    let negative = metric.to_ascii_lowercase().contains("negative");
    sorted.sort_by(|a, b| {
        let ordering = a
            .value
            .partial_cmp(&b.value)
            .unwrap_or(std::cmp::Ordering::Equal);
        if negative {
            ordering.reverse()
        } else {
            ordering
        }
    });
    sorted.truncate(5);
    sorted
}

fn print_correlation(report: &CorrelationReport) {
    print_header("Deimap Correlation");

    println!("  X: {}", report.x);
    println!("  Y: {}", report.y);
    println!("  Points: {}", report.stats.n);

    let r = report.stats.r;
    let r_display = if r.abs() >= 0.5 {
        format!("{r:.3}").green()
    } else if r.abs() >= 0.2 {
        format!("{r:.3}").yellow()
    } else {
        format!("{r:.3}").normal()
    };
    println!("  Pearson r: {r_display}");

    match &report.stats.regression {
        Some(regression) => println!(
            "  Trend: y = {:.3}x + {:.3}",
            regression.slope, regression.intercept
        ),
        None => println!("  Trend: {}", "indeterminate (constant input)".yellow()),
    }

    let outliers = report.points.iter().filter(|p| p.outlier).count();
    if outliers > 0 {
        println!("  Outliers (|z| > 2): {outliers}");
    }
}

fn print_bubbles(report: &BubbleReport) {
    print_header("Deimap Intersectional Analysis");

    println!("  View: {}", report.view);
    println!("  Score: {} ({})", report.score, report.variant);
    println!("  Groups: {}", report.total_groups);
    println!(
        "  Critical groups: {}",
        if report.critical_groups > 0 {
            report.critical_groups.to_string().red()
        } else {
            report.critical_groups.to_string().green()
        }
    );
    if let Some(best) = &report.best {
        println!("  Best: {}", best.green());
    }
    if let Some(worst) = &report.worst {
        println!("  Worst: {}", worst.red());
    }
    println!();

    if report.points.is_empty() {
        println!("{}", "No data for current filters".yellow());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Group", "X", "Score", "Count", "Category"]);
    for point in &report.points {
        table.add_row(vec![
            Cell::new(&point.key),
            Cell::new(format!("{:.3}", point.x)),
            Cell::new(format!("{:.3}", point.y)),
            Cell::new(point.size),
            Cell::new(category_label(point.category)),
        ]);
    }
    println!("{table}");
}

fn category_label(category: ScoreCategory) -> String {
    let label = category.to_string();
    match category {
        ScoreCategory::Critical => label.red().to_string(),
        ScoreCategory::Low => label.yellow().to_string(),
        ScoreCategory::Moderate => label.normal().to_string(),
        ScoreCategory::Good | ScoreCategory::Excellent => label.green().to_string(),
    }
}

pub fn create_writer(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new()),
    }
}
