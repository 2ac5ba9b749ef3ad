//! Example of decoding a container to JSON and CSV and encoding it back

use emx_dat::{run, Direction, TargetFormat};

fn main() -> anyhow::Result<()> {
    println!("=== Container Round-Trip Example ===\n");

    let container = "name=Alice\nrole=admin\nurl=https://example.com/?a=b\nguest";

    // Decode to JSON
    let data = container.as_bytes();
    let json = run(data, "users.dat", TargetFormat::Json, Direction::Decode, |_| {})?;
    println!("{} ({}):", json.suggested_file_name, json.content_type);
    println!("{}\n", String::from_utf8_lossy(&json.output_bytes));

    // Decode to CSV
    let csv = run(data, "users.dat", TargetFormat::Csv, Direction::Decode, |_| {})?;
    println!("{} ({}):", csv.suggested_file_name, csv.content_type);
    println!("{}\n", String::from_utf8_lossy(&csv.output_bytes));

    // Encode the JSON back, reporting progress
    let back = run(
        &json.output_bytes,
        &json.suggested_file_name,
        TargetFormat::Container,
        Direction::Encode,
        |percent| println!("  progress: {}%", percent),
    )?;

    println!("\n{}:", back.suggested_file_name);
    println!("{}", String::from_utf8_lossy(&back.output_bytes));

    assert_eq!(back.output_bytes, container.as_bytes());
    println!("\nRound-trip verification passed!");

    Ok(())
}
