//! dmap-dump: print a DMAP response as JSON.
//!
//! Usage: `dmap-dump [FILE]` (reads stdin without a file argument).

use std::io::Read;
use std::process::ExitCode;

use daap_dmap::{dump, ContentCodes};

fn main() -> ExitCode {
    let path = std::env::args().nth(1);
    let data = match &path {
        Some(path) => std::fs::read(path),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).map(|_| buf)
        }
    };
    let data = match data {
        Ok(data) => data,
        Err(err) => {
            eprintln!("dmap-dump: cannot read {}: {err}", path.as_deref().unwrap_or("stdin"));
            return ExitCode::FAILURE;
        }
    };

    let codes = ContentCodes::bootstrap();
    match dump(&data, &codes) {
        Ok(json) => match serde_json::to_string_pretty(&json) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("dmap-dump: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("dmap-dump: {err}");
            ExitCode::FAILURE
        }
    }
}
