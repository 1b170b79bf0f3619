use colored::Colorize;

use crate::growth::StandProjection;

/// Format a text bar chart of volume per hectare over the projection, one
/// bar every `step` years. The bar at `maturity_year` is highlighted.
pub fn format_volume_chart(
    projection: &StandProjection,
    maturity_year: Option<u32>,
    step: usize,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Volume Trajectory".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let volumes = projection.volume.as_slice();
    if volumes.is_empty() {
        output.push_str("  No volume could be projected.\n");
        return output;
    }

    let max_volume = volumes.iter().copied().fold(0.0f64, f64::max);
    let bar_width = 40;
    let step = step.max(1);
    let maturity = maturity_year.map(|y| y as usize);

    output.push_str(&format!("  {:>5}  {:>10}  Volume\n", "Year", "m³/ha"));
    output.push_str(&format!("  {}\n", "-".repeat(60)));

    for (year, &volume) in volumes.iter().enumerate() {
        let is_maturity = maturity == Some(year);
        if year % step != 0 && !is_maturity {
            continue;
        }
        let bar_len = if max_volume > 0.0 {
            ((volume / max_volume) * bar_width as f64).round().max(0.0) as usize
        } else {
            0
        };
        let bar = "\u{2588}".repeat(bar_len);
        if is_maturity {
            output.push_str(&format!(
                "  {:>5}  {:>10.1}  {} {}\n",
                year,
                volume,
                bar.yellow(),
                "◀ maturity".yellow().bold()
            ));
        } else {
            output.push_str(&format!("  {:>5}  {:>10.1}  {}\n", year, volume, bar.green()));
        }
    }

    if volumes.len() <= crate::growth::HORIZON {
        output.push_str(&format!(
            "  {}\n",
            format!("Volume undefined from year {} on.", volumes.len()).dimmed()
        ));
    }
    output.push('\n');
    output
}

/// Print a text bar chart of the volume trajectory.
pub fn print_volume_chart(projection: &StandProjection, maturity_year: Option<u32>, step: usize) {
    print!("{}", format_volume_chart(projection, maturity_year, step));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::project_stand;
    use crate::models::{Stand, TreeSpecies};

    fn stand(age: f64) -> Stand {
        Stand {
            id: "C-1".to_string(),
            species: TreeSpecies::Spruce,
            bonitet: Some(17.0),
            area_m2: Some(10_000.0),
            age: Some(age),
            height: Some(12.0),
            n_per_hectare: Some(800.0),
            basal_area: Some(20.0),
            reference_volume: None,
        }
    }

    #[test]
    fn test_chart_empty() {
        let projection = project_stand(&stand(40.0), Some(14.4), None).unwrap();
        let output = format_volume_chart(&projection, None, 10);
        assert!(output.contains("Volume Trajectory"));
        assert!(output.contains("No volume could be projected."));
    }

    #[test]
    fn test_chart_marks_maturity() {
        let projection = project_stand(&stand(40.0), Some(14.4), Some(102.67)).unwrap();
        let output = format_volume_chart(&projection, Some(22), 10);
        assert!(output.contains("◀ maturity"));
        assert!(output.contains("102.7"));
        assert!(!output.contains("undefined from year"));
    }

    #[test]
    fn test_chart_without_maturity() {
        let projection = project_stand(&stand(40.0), Some(14.4), Some(102.67)).unwrap();
        let output = format_volume_chart(&projection, None, 25);
        assert!(!output.contains("maturity"));
        // Years 0, 25, 50, 75, 100.
        assert!(output.contains('\u{2588}'));
    }
}
