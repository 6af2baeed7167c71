use colored::Colorize;
use comfy_table::{presets, Cell, Color, Table};

use lcom_core::summary::Summary;

/// Format a scored batch for terminal output: a header line and an ASCII
/// table of class scores with an Average footer row.
pub fn format_report(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{} {}\n\n",
        "Calculating LCOM using".bold(),
        summary.algorithm.bold()
    ));

    let mut table = Table::new();
    table.load_preset(presets::ASCII_FULL_CONDENSED);
    table.set_header(vec!["Class", "LCOM"]);

    for class in &summary.classes {
        table.add_row(vec![
            Cell::new(&class.name),
            score_cell(class.score),
        ]);
    }
    table.add_row(vec![
        Cell::new("Average"),
        Cell::new(format!("{:.2}", summary.average)),
    ]);

    out.push_str(&table.to_string());
    out.push('\n');
    out
}

/// Scores above 1 flag a class that should probably be split.
fn score_cell(score: usize) -> Cell {
    let cell = Cell::new(score.to_string());
    if score > 1 {
        cell.fg(Color::Red)
    } else {
        cell
    }
}
