//! Herdbook binary entry point.

use herdbook::ui::output;

fn main() {
    if let Err(err) = herdbook::cli::run() {
        output::error(format!("{err:#}"));
        std::process::exit(1);
    }
}
