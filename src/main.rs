//! tuxsh: run one parsed command line.
//!
//! Reads a JSON array of command nodes from stdin, runs it, and exits with
//! the line's status. Example input for `ls -l | wc -l > count.txt`:
//!
//! ```json
//! [
//!   {"argv": ["ls", "-l"], "op": "pipe"},
//!   {"argv": ["wc", "-l"], "redirects": [null, "count.txt", null]}
//! ]
//! ```

use std::io::Read;

use tuxsh::config::Config;
use tuxsh::exec::LineRunner;
use tuxsh::line::CommandLine;
use tuxsh::logging;

fn main() {
    let config = Config::load();
    logging::init(&config.logging);

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("tuxsh: failed to read stdin");
        std::process::exit(1);
    }

    if input.trim().is_empty() {
        std::process::exit(0);
    }

    let line: CommandLine = match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("tuxsh: JSON parse error: {e}");
            std::process::exit(1);
        }
    };

    let mut runner = LineRunner::from_config(&config);
    let status = runner.run(&line);
    std::process::exit(status);
}
