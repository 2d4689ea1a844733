use std::path::Path;

use columnar_frame::{CsvOptions, load_csv};

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _profiler = dhat::Profiler::new_heap();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/sales_large.csv".to_string());
    let table = load_csv(Path::new(&path), &CsvOptions::default())?;

    // Run a grouped reduction on top of the load
    let _res = table
        .fill_na(0.0)
        .group_by(&["product", "region"])?
        .sum("unit_price")?;

    println!("Memory benchmark finished. See dhat-heap.json for details");
    Ok(())
}
