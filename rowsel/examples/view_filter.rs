//! Build a filtered view of a small table and compose it with a window.
//!
//! Run with: cargo run --example view_filter

use rowsel::{Column, Result, RowIndex, merge};

fn main() -> Result<()> {
    // A ten-row table with a boolean predicate column.
    let predicate = Column::bools(vec![0, 1, 1, 0, 1, 0, 1, 1, 0, 1]);
    let visible = RowIndex::from_bool_column(&predicate, 10)?;
    println!(
        "filtered view: {} of 10 rows, kind {:?}",
        visible.len(),
        visible.kind()
    );

    // Take every other row of the filtered view, starting at its second row.
    let window = RowIndex::from_slice(1, 3, 2)?;
    let view = merge(Some(&visible), &window);

    let rows: Vec<i64> = view.iter().collect();
    println!("window over the view reads source rows {rows:?}");
    println!("row range: [{}, {}]", view.min(), view.max());
    Ok(())
}
