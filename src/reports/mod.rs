//! Table rendering for the CLI.

use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lweforge::cost::{fmt_magnitude, Cost};
use lweforge::error::{LfResult, LweForgeError};
use lweforge::params::LweParameters;
use lweforge::schemes;
use lweforge::search::EstimateTable;

fn rop_cell(outcome: &LfResult<Cost>) -> Cell {
    match outcome {
        Ok(cost) if cost.rop.is_infinite() => Cell::new("∞").fg(Color::Red),
        Ok(cost) => Cell::new(format!("≈2^{:.1}", cost.rop.log2())),
        Err(LweForgeError::InsufficientSamples { .. }) => {
            Cell::new("insufficient m").fg(Color::Yellow)
        }
        Err(_) => Cell::new("error").fg(Color::Red),
    }
}

/// Summary grid: one row per parameter set, one column per attack model,
/// cells holding the rop magnitude.
pub fn print_summary(results: &EstimateTable<LweParameters, LfResult<Cost>>) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let algorithms = results.algorithms();
    let mut header = vec![Cell::new("Parameters").add_attribute(Attribute::Bold)];
    header.extend(
        algorithms
            .iter()
            .map(|name| Cell::new(*name).add_attribute(Attribute::Bold)),
    );
    table.add_row(header);

    for i in 1..=algorithms.len() {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (params, cells) in results.rows() {
        let mut row = vec![Cell::new(&params.tag).add_attribute(Attribute::Bold)];
        row.extend(cells.iter().map(|(_, outcome)| rop_cell(outcome)));
        table.add_row(row);
    }
    println!("\n{}", table);
}

/// Field-by-field breakdown of one cost record, listing only the fields the
/// model populated.
pub fn print_cost_detail(name: &str, cost: &Cost) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new(name).add_attribute(Attribute::Bold),
        Cell::new("value").add_attribute(Attribute::Bold),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    let mut push = |field: &str, value: String| {
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    };
    push("rop", fmt_magnitude(cost.rop));
    push("mem", fmt_magnitude(cost.mem));
    if cost.m != 0.0 {
        push("m", fmt_magnitude(cost.m));
    }
    if cost.b != 0 {
        push("b", cost.b.to_string());
        push("t1", cost.t1.to_string());
        push("t2", cost.t2.to_string());
        push("ℓ", cost.ell.to_string());
        push("#cod", cost.ncod.to_string());
        push("#top", cost.ntop.to_string());
        push("#test", cost.ntest.to_string());
    }
    if cost.k != 0 {
        push("k", cost.k.to_string());
    }
    if cost.repetitions > 0 {
        push("↻", cost.repetitions.to_string());
    }
    if !cost.tag.is_empty() {
        push("tag", cost.tag.clone());
    }
    println!("{}", table);
}

/// Built-in parameter sets.
pub fn print_schemes() {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Scheme").add_attribute(Attribute::Bold),
        Cell::new("n").add_attribute(Attribute::Bold),
        Cell::new("q").add_attribute(Attribute::Bold),
        Cell::new("secret").add_attribute(Attribute::Bold),
        Cell::new("error").add_attribute(Attribute::Bold),
        Cell::new("m").add_attribute(Attribute::Bold),
    ]);

    for i in [1, 2, 5] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for params in schemes::all() {
        table.add_row(vec![
            Cell::new(&params.tag).add_attribute(Attribute::Bold),
            Cell::new(params.n),
            Cell::new(params.q),
            Cell::new(params.xs.to_string()),
            Cell::new(params.xe.to_string()),
            Cell::new(fmt_magnitude(params.m)),
        ]);
    }
    println!("{}", table);
}
