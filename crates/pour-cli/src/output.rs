// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Human-readable scenario output.

use std::io::Write;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::scenario::ScenarioReport;

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Vessel table followed by a transfer summary.
pub fn write_tables(out: &mut impl Write, report: &ScenarioReport) -> std::io::Result<()> {
    let mut vessels = Table::new();
    vessels
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["vessel", "start (mL)", "end (mL)", "capacity (mL)", "fill"]);
    for v in &report.vessels {
        let fill = if v.capacity > 0.0 {
            100.0 * v.end_volume / v.capacity
        } else {
            0.0
        };
        vessels.add_row(vec![
            Cell::new(&v.label),
            right(format!("{:.1}", v.start_volume)),
            right(format!("{:.1}", v.end_volume)),
            right(format!("{:.0}", v.capacity)),
            right(format!("{fill:.0}%")),
        ]);
    }

    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_header(vec!["metric", "value"])
        .add_row(vec![Cell::new("poured (mL)"), right(format!("{:.2}", report.poured))])
        .add_row(vec![Cell::new("credited (mL)"), right(format!("{:.2}", report.credited))])
        .add_row(vec![Cell::new("spilled (mL)"), right(format!("{:.2}", report.spilled))])
        .add_row(vec![Cell::new("target splashes"), right(report.target_splashes.to_string())])
        .add_row(vec![Cell::new("floor splashes"), right(report.floor_splashes.to_string())])
        .add_row(vec![Cell::new("peak droplets"), right(report.peak_droplets.to_string())]);

    writeln!(
        out,
        "scenario {:?}: {} frames at {} fps",
        report.scenario, report.frames, report.fps
    )?;
    writeln!(out, "{vessels}")?;
    writeln!(out, "{summary}")
}
