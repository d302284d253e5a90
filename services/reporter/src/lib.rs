mod cli;
mod infra;
mod preview;
mod runner;

use headcount::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
