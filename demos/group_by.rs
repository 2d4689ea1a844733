use crate::utils::sample_csv_path;
use columnar_frame::{CsvOptions, load_csv};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = sample_csv_path();

    let table = load_csv(path.as_path(), &CsvOptions::default())?;

    // Nulls make a column mixed, fill them before reducing
    let grouped = table.fill_na(0).group_by(&["product", "region"])?;
    println!("{} groups", grouped.group_count());

    let totals = grouped.sum("quantity")?;
    print!("{}", totals.render(totals.row_count()));

    let highest = table.fill_na(0).group_by(&["product"])?.max("unit_price")?;
    print!("{}", highest);

    Ok(())
}
