use std::path::Path;

use columnar_frame::{CsvOptions, load_csv};

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const USAGE: &str = "usage: columnar_frame <file.csv> [group_col[,group_col...] sum_col]";

/// Prints a summary of a CSV file, optionally followed by a grouped sum.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args.first().ok_or(USAGE)?;

    let table = load_csv(Path::new(path), &CsvOptions::default())?;
    println!("{} rows x {} columns", table.row_count(), table.column_count());
    println!("{}", table);

    let types = table.dtype();
    let counts = table.count();
    let nulls = table.count_nulls();
    for name in table.column_names() {
        println!(
            "{:<20} {:<8} non-null {:<8} null {}",
            name, types[name], counts[name], nulls[name]
        );
    }

    let means = table.mean();
    for name in table.column_names() {
        if let Some(mean) = means.get(name) {
            println!("mean({}) = {:?}", name, mean);
        }
    }

    if let (Some(keys), Some(target)) = (args.get(1), args.get(2)) {
        let keys: Vec<&str> = keys.split(',').collect();
        let grouped = table.fill_na(0).group_by(&keys)?.sum(target)?;
        println!("\nsum of {} by {} (nulls as 0)", target, keys.join(", "));
        print!("{}", grouped.render(grouped.row_count()));
    }

    Ok(())
}
