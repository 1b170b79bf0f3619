use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::growth::{BatchSummary, SiteIndexTable, SnapshotOverview, StandProjection};
use crate::models::{StandResult, TreeSpecies};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn title(output: &mut String, text: &str, width: usize) {
    output.push_str(&format!("\n{}\n", text.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(width)));
}

/// Undefined values print as a dash, never as zero.
fn opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    }
}

/// Format the per-stand result table as a string.
pub fn format_results_table(results: &[StandResult]) -> String {
    let mut output = String::new();
    title(&mut output, "Stand Results", 90);

    let mut table = new_table(vec![
        "Stand",
        "Species",
        "Age",
        "Ht40",
        "Vol (m³)",
        "Vol next yr (m³)",
        "Growth %",
        "Saw wood",
        "CO2 (kg)",
        "Maturity (yr)",
        "Vol at maturity (m³)",
    ]);

    for r in results {
        if let Some(error) = &r.error {
            table.add_row(vec![
                Cell::new(&r.bestand_id),
                Cell::new(TreeSpecies::from_label(&r.treslag)),
                Cell::new(opt(r.alder, 0)),
                Cell::new(error.red().to_string()),
            ]);
            continue;
        }
        table.add_row(vec![
            Cell::new(&r.bestand_id),
            Cell::new(TreeSpecies::from_label(&r.treslag)),
            Cell::new(opt(r.alder, 0)),
            Cell::new(opt(r.ht40, 1)),
            Cell::new(opt(r.volume, 1)),
            Cell::new(opt(r.volume_next_year, 1)),
            Cell::new(opt(r.volume_growth_factor.map(|f| f * 100.0), 2)),
            Cell::new(opt(r.saw_wood_portion, 2)),
            Cell::new(opt(r.carbon_stored, 0)),
            Cell::new(
                r.years_to_maturity
                    .map_or_else(|| "-".to_string(), |y| y.to_string()),
            ),
            Cell::new(opt(r.volume_at_maturity, 1)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the per-stand result table.
pub fn print_results_table(results: &[StandResult]) {
    print!("{}", format_results_table(results));
}

/// Format batch totals as a string.
pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let mut output = String::new();
    title(&mut output, "Batch Summary", 50);

    let mut table = new_table(vec!["Metric", "Value", "Unit"]);
    let rows = [
        ("Stands", summary.total_stands.to_string(), ""),
        ("Stands computed", summary.computed_stands.to_string(), ""),
        ("Stands failed", summary.failed_stands.to_string(), ""),
        ("Stands with maturity", summary.stands_with_maturity.to_string(), ""),
        ("Total volume", format!("{:.1}", summary.total_volume), "m³"),
        (
            "Total volume at maturity",
            format!("{:.1}", summary.total_volume_at_maturity),
            "m³",
        ),
        (
            "Carbon stored",
            format!("{:.0}", summary.total_carbon_stored),
            "kg CO2",
        ),
        (
            "Carbon captured next year",
            format!("{:.0}", summary.total_carbon_captured_next_year),
            "kg CO2",
        ),
        (
            "Mean years to maturity",
            opt(summary.mean_years_to_maturity, 1),
            "years",
        ),
        (
            "Std dev years to maturity",
            opt(summary.std_dev_years_to_maturity, 1),
            "years",
        ),
    ];
    for (name, value, unit) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value), Cell::new(unit)]);
    }

    output.push_str(&format!("{table}"));
    if summary.failed_stands > 0 {
        output.push_str(&format!(
            "\n{}\n",
            format!("{} stand(s) failed; see the error column.", summary.failed_stands).yellow()
        ));
    }
    output
}

/// Print batch totals.
pub fn print_batch_summary(summary: &BatchSummary) {
    print!("{}", format_batch_summary(summary));
}

/// Format a snapshot overview as a string.
pub fn format_snapshot_overview(overview: &SnapshotOverview) -> String {
    let mut output = String::new();
    title(&mut output, "Snapshot Overview", 50);

    let mut table = new_table(vec!["Category", "Stands"]);
    for (name, count) in [
        ("Total", overview.total_stands),
        ("Spruce", overview.spruce),
        ("Pine", overview.pine),
        ("Birch/Other", overview.other),
        ("Modelled (spruce/pine, age ≥ 3)", overview.modelled),
        ("Too young", overview.too_young),
        ("Missing age", overview.missing_age),
    ] {
        table.add_row(vec![Cell::new(name), Cell::new(count)]);
    }
    output.push_str(&format!("{table}"));
    output.push_str(&format!(
        "\n{}\n",
        format!("Total area: {:.2} ha", overview.total_area_hectares).dimmed()
    ));
    output
}

/// Print a snapshot overview.
pub fn print_snapshot_overview(overview: &SnapshotOverview) {
    print!("{}", format_snapshot_overview(overview));
}

/// Format years `0..=years` of a stand trajectory as a string, one row every
/// `step` years. The last defined volume year in range is always shown.
pub fn format_trajectory_table(
    stand_id: &str,
    projection: &StandProjection,
    years: usize,
    step: usize,
) -> String {
    let mut output = String::new();
    title(&mut output, &format!("Trajectory for stand {stand_id}"), 80);

    let mut table = new_table(vec![
        "Year",
        "Age",
        "Height (m)",
        "N/ha",
        "G (m²/ha)",
        "Vol (m³/ha)",
        "Growth %",
    ]);

    let step = step.max(1);
    let last = projection.volume.defined_len().saturating_sub(1);
    for y in projection.years().into_iter().take(years + 1) {
        if y.year % step != 0 && y.year != last && y.year != years {
            continue;
        }
        table.add_row(vec![
            Cell::new(y.year),
            Cell::new(opt(y.age, 0)),
            Cell::new(opt(y.height, 2)),
            Cell::new(opt(y.n_per_hectare, 0)),
            Cell::new(opt(y.basal_area, 2)),
            Cell::new(opt(y.volume_per_hectare, 1)),
            Cell::new(opt(y.growth_rate.map(|r| r * 100.0), 2)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a stand trajectory.
pub fn print_trajectory_table(
    stand_id: &str,
    projection: &StandProjection,
    years: usize,
    step: usize,
) {
    print!("{}", format_trajectory_table(stand_id, projection, years, step));
}

/// Format the active bonitet → Ht40 tables as a string.
pub fn format_site_index_tables(site_index: &SiteIndexTable) -> String {
    let mut output = String::new();
    title(&mut output, "Site Index Tables", 40);

    for species in [TreeSpecies::Spruce, TreeSpecies::Pine] {
        let Some(rows) = site_index.rows(species) else {
            continue;
        };
        output.push_str(&format!("\n{}\n", species.to_string().bold()));
        let mut table = new_table(vec!["Bonitet (H40)", "Ht40 (m)"]);
        for (bonitet, ht40) in rows {
            table.add_row(vec![Cell::new(bonitet), Cell::new(format!("{ht40:.1}"))]);
        }
        output.push_str(&format!("{table}\n"));
    }
    output
}

/// Print the active bonitet tables.
pub fn print_site_index_tables(site_index: &SiteIndexTable) {
    print!("{}", format_site_index_tables(site_index));
}
