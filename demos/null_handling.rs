use columnar_frame::{CsvOptions, load_csv};

use crate::utils::sample_csv_path;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();
    let table = load_csv(path.as_path(), &CsvOptions::default())?;

    println!("Types:  {:?}", table.dtype());
    println!("Counts: {:?}", table.count());
    println!("Nulls:  {:?}", table.count_nulls());

    let filled = table.fill_na(0);
    println!("Types after fill_na: {:?}", filled.dtype());
    println!("Products: {:?}", filled.unique("product")?);

    print!("{}", filled.range(2, 4)?);
    Ok(())
}
