//! QueryLite interactive shell

use querylite::{Database, QueryResult, Result};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DIR: &str = "./querylite_data";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => interactive_mode(PathBuf::from(DEFAULT_DIR)),
        2 => match args[1].as_str() {
            "--version" | "-v" => {
                println!("QueryLite v{}", VERSION);
                Ok(())
            }
            "--help" | "-h" => {
                print_help();
                Ok(())
            }
            path => interactive_mode(PathBuf::from(path)),
        },
        _ => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("QueryLite v{} - minimal embedded SQL engine", VERSION);
    println!();
    println!("Usage:");
    println!("  querylite-cli             open the default database ({})", DEFAULT_DIR);
    println!("  querylite-cli <dir>       open a database directory");
    println!();
    println!("Shell commands: .exit to quit; everything else is executed as SQL.");
}

fn interactive_mode(dir: PathBuf) -> Result<()> {
    let db = Database::open(&dir)?;
    println!("QueryLite v{} ({})", VERSION, dir.display());
    println!("Type SQL statements, or .exit to quit.");

    let stdin = io::stdin();
    loop {
        print!("sql> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ".exit" || line == ".quit" {
            break;
        }

        match db.execute(line) {
            Ok(result) => print_result(&result),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}

fn print_result(result: &QueryResult) {
    match result {
        QueryResult::Rows(rows) => {
            for row in rows {
                let fields: Vec<String> = row
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect();
                println!("{}", fields.join("  "));
            }
            println!("({} rows)", rows.len());
        }
        QueryResult::Inserted(record) => {
            println!("inserted 1 row ({} fields)", record.len());
        }
        QueryResult::Updated(count) => println!("updated {} rows", count),
        QueryResult::Deleted(count) => println!("deleted {} rows", count),
    }
}
