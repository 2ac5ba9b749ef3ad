//! Example demonstrating the binary gate and the noisy-content check

use emx_dat::{inspect, run, ConversionError, Direction, TargetFormat};

fn main() {
    println!("=== Binary Gate Example ===\n");

    let samples: Vec<(&str, Vec<u8>)> = vec![
        ("settings.dat", b"volume=80\nlanguage=tr".to_vec()),
        ("setup.dat", vec![0x4D, 0x5A, 0x90, 0x00, 0x03]),
        ("slot1.dat", vec![0x7B, 0x22, 0x02, 0x10, 0x41]),
        ("blob.dat", b"abc\0def".to_vec()),
        ("noise.dat", "ok\u{2603}\u{2603}\u{2603}\u{2603}\u{2603}".as_bytes().to_vec()),
        // "şehir=İzmir" saved with the Turkish code page
        ("legacy.dat", vec![0xFE, b'e', b'h', b'i', b'r', b'=', 0xDD, b'z', b'm', b'i', b'r']),
    ];

    for (name, data) in &samples {
        let inspection = inspect(data);
        let encoding = inspection
            .decoded
            .as_ref()
            .map(|d| format!("{} (score {})", d.encoding_used, d.score))
            .unwrap_or_else(|| "-".to_string());
        let is_text = inspection.classification.is_text();
        println!("{:<14} text={:<5} encoding={}", name, is_text, encoding);

        match run(data, name, TargetFormat::Txt, Direction::Decode, |_| {}) {
            Ok(result) => {
                let output = String::from_utf8_lossy(&result.output_bytes);
                println!("  -> {}: {:?}", result.suggested_file_name, output);
                for notice in &result.notices {
                    println!("  notice: {}", notice);
                }
            }
            Err(ConversionError::BinaryRejected { reason }) => println!("  rejected: {}", reason),
            Err(e) => println!("  failed: {}", e),
        }
    }
}
