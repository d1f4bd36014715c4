//! Dump tool for inspecting the records of a capture file
//!
//! Usage: cargo run --bin dump <capture.bin> [max-records]

use std::env;
use std::fs;
use std::process::ExitCode;

use melee_stats::capture::CaptureIterator;
use melee_stats::format::detect_message_type;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <capture.bin> [max-records]", args[0]);
        eprintln!("  Prints every record as a hex dump unless max-records is given");
        return ExitCode::FAILURE;
    }

    let max_records = match args.get(2).map(|s| s.parse::<usize>()) {
        None => usize::MAX,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Invalid record count: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let data = match fs::read(&args[1]) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };
    eprintln!("File size: {} bytes", data.len());

    let mut records = CaptureIterator::new(&data);
    let mut shown = 0;

    while shown < max_records {
        let offset = records.current_offset();
        let payload = match records.next() {
            None => break,
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                eprintln!("Error at offset 0x{:X}: {}", offset, e);
                return ExitCode::FAILURE;
            }
        };

        let kind = match detect_message_type(payload) {
            Ok(kind) => kind.name().to_string(),
            Err(e) => e.to_string(),
        };
        println!(
            "\n=== Record {} at 0x{:08X}: {} ({} bytes) ===",
            shown,
            offset,
            kind,
            payload.len()
        );
        hex_dump(payload);
        shown += 1;
    }

    eprintln!("\nRecords shown: {}", shown);
    ExitCode::SUCCESS
}

fn hex_dump(data: &[u8]) {
    for (row_index, row) in data.chunks(16).enumerate() {
        print!("{:08X}: ", row_index * 16);
        for (i, byte) in row.iter().enumerate() {
            print!("{:02X} ", byte);
            if i == 7 {
                print!(" ");
            }
        }
        // Padding for incomplete rows
        for i in row.len()..16 {
            print!("   ");
            if i == 7 {
                print!(" ");
            }
        }
        print!(" |");
        for &byte in row {
            if (0x20..0x7F).contains(&byte) {
                print!("{}", byte as char);
            } else {
                print!(".");
            }
        }
        println!("|");
    }
}
