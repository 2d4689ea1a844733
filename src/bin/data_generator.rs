use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Writes a synthetic sales file; about 2% of prices are left empty.
fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args.first().map_or("data/sales_large.csv", String::as_str);
    let rows: usize = args.get(1).and_then(|n| n.parse().ok()).unwrap_or(1_000_000);

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "id,product,region,unit_price,quantity")?;

    let mut rng = rand::rng();
    for i in 0..rows {
        let product = ['A', 'B', 'C', 'D'][rng.random_range(0..4)];
        let region =
            ["US", "EU", "ASIA", "AFRICA", "AUSTRALIA", "SOUTH AMERICA"][rng.random_range(0..6)];
        let quantity = rng.random_range(1..50);
        if rng.random_range(0..50) == 0 {
            writeln!(writer, "{},{},{},,{}", i, product, region, quantity)?;
        } else {
            let price = rng.random_range(100..10_000) as f64 / 100.0;
            writeln!(writer, "{},{},{},{:.2},{}", i, product, region, price, quantity)?;
        }
    }

    writer.flush()?;
    println!("Sample CSV generated: {} ({} rows)", path, rows);
    Ok(())
}
