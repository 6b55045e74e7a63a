//! Output formatting for the CLI.

use clap::ValueEnum;
use roster_screens::StudentCard;
use roster_store::Student;
use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct Status<'a> {
    status: &'a str,
    message: &'a str,
}

/// Print the student list, one card per student in text mode.
pub fn print_students(students: &[Student], cards: &[StudentCard], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            if cards.is_empty() {
                println!("(no students)");
            }
            for card in cards {
                println!("{card}");
                println!();
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(students) {
            Ok(json) => println!("{json}"),
            Err(_) => println!("[]"),
        },
    }
}

/// Print a success message.
pub fn print_success(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{message}"),
        OutputFormat::Json => print_status("success", message),
    }
}

/// Print an error message.
pub fn print_error(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {message}"),
        OutputFormat::Json => print_status("error", message),
    }
}

fn print_status(status: &str, message: &str) {
    if let Ok(json) = serde_json::to_string(&Status { status, message }) {
        println!("{json}");
    }
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(50));
}
