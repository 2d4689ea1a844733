use columnar_frame::{CsvOptions, load_csv};

use crate::utils::sample_csv_path;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();

    let table = load_csv(path.as_path(), &CsvOptions::default())?;

    // Only null-free numeric columns take part
    println!("Sum:  {:?}", table.sum());
    println!("Mean: {:?}", table.mean());

    let filled = table.fill_na(0);
    println!("Sum after fill_na: {:?}", filled.sum());
    println!("Min after fill_na: {:?}", filled.min());
    println!("Max after fill_na: {:?}", filled.max());

    Ok(())
}
