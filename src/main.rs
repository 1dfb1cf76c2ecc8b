//! vocamark main entrypoint.

use vocamark::run;
use vocamark::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
