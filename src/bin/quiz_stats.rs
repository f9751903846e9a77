// ------------------------------------------------------------
// Quiz analyzer entry point
// ------------------------------------------------------------
//
// Reads the persisted collection once and prints a report.
//
// EXIT STATUS:
// - 0 when the report is printed or the file does not exist
// - 0 on read/parse errors, unless `analyzer.strict_exit` is set,
//   in which case 1
// - 0 on a broken config file, since `strict_exit` cannot be read
//   from it
//
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use quiz_harvest::{
    analyzer::{self, QuizStats},
    config::{AnalyzerConfig, load_config},
    store::read_collection,
    util,
};

fn main() -> ExitCode {
    util::init_logging();

    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Error loading config: {:#}", e);
            return AnalyzerConfig::default().failure_exit();
        }
    };

    let path = Path::new(&config.storage.path);
    let collection = match read_collection(path) {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            println!(
                "File {} not found. First run quizzes collection.",
                path.display()
            );
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            log::error!("Error analyzing data: {}", e);
            return config.analyzer.failure_exit();
        }
    };

    let stats = QuizStats::with_top(&collection, config.analyzer.top_categories);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = analyzer::render(&stats, &mut out).and_then(|_| out.flush()) {
        log::error!("Error writing report: {}", e);
        return config.analyzer.failure_exit();
    }

    ExitCode::SUCCESS
}
