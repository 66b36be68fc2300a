//! dbcutover main entrypoint.

use dbcutover::run;
use dbcutover::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
