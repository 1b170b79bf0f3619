mod tables;
mod charts;

pub use tables::{
    format_results_table, print_results_table,
    format_batch_summary, print_batch_summary,
    format_snapshot_overview, print_snapshot_overview,
    format_trajectory_table, print_trajectory_table,
    format_site_index_tables, print_site_index_tables,
};
pub use charts::{format_volume_chart, print_volume_chart};
