use chrono::NaiveDate;
use headcount::archive::ReportArchive;
use headcount::config::AppConfig;
use headcount::directory::warehouse::WarehouseClient;
use headcount::error::AppError;
use headcount::job::ChangeReportJob;
use headcount::mail::SmtpMailer;

/// Wire the production job from configuration: warehouse snapshot source,
/// SMTP mailer, and the optional report archive. Connecting and address
/// parsing happen here so a bad setting fails before the first run.
pub(crate) fn build_job(
    config: &AppConfig,
) -> Result<ChangeReportJob<WarehouseClient, SmtpMailer>, AppError> {
    let source = WarehouseClient::connect(&config.database)?;
    let mailer = SmtpMailer::new(&config.mail)?;

    let mut job = ChangeReportJob::new(source, mailer);
    if let Some(dir) = &config.report.archive_dir {
        job = job.with_archive(ReportArchive::new(dir));
    }

    Ok(job)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
