//! Approver queue and HR-wide request listing.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use hrdesk_core::format_wire_date;
use hrdesk_rpc::{Decision, HrRequestFilter, RequestRecord};

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecisionArg {
    Accept,
    Reject,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Accept => Decision::Accept,
            DecisionArg::Reject => Decision::Reject,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum RequestCommands {
    /// Requests waiting for your decision
    Pending,
    /// Accept or reject a pending request
    Respond {
        /// Request id as listed by `requests pending`
        id: String,
        #[arg(value_enum)]
        decision: DecisionArg,
        #[arg(long)]
        notes: Option<String>,
    },
    /// All requests in a date range (HR only)
    All {
        /// YYYY-MM-DD
        #[arg(long)]
        from: NaiveDate,
        /// YYYY-MM-DD
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        employee: Option<String>,
        /// e.g. Pending, Accepted, Rejected
        #[arg(long)]
        status: Option<String>,
    },
}

pub(crate) async fn run(app: &App, command: RequestCommands) -> anyhow::Result<()> {
    let session = app.require_session()?;
    match command {
        RequestCommands::Pending => {
            let records = app.client.get_pending_requests(&session.user_id).await?;
            print_records(&records);
        }
        RequestCommands::Respond {
            id,
            decision,
            notes,
        } => {
            app.client
                .respond_to_request(&session.user_id, &id, decision.into(), notes.as_deref())
                .await?;
            println!("request {id}: {}", Decision::from(decision).as_wire());
        }
        RequestCommands::All {
            from,
            to,
            employee,
            status,
        } => {
            if !session.is_hr {
                anyhow::bail!("the HR request listing needs an HR account");
            }
            if from > to {
                anyhow::bail!("--from must not be after --to");
            }
            let filter = HrRequestFilter {
                from_date: format_wire_date(from),
                to_date: format_wire_date(to),
                employee_id: employee,
                status,
            };
            let records = app
                .client
                .get_all_requests_hr(&session.user_id, &filter)
                .await?;
            print_records(&records);
        }
    }
    Ok(())
}

fn print_records(records: &[RequestRecord]) {
    if records.is_empty() {
        println!("no requests");
        return;
    }
    println!(
        "{:<8}{:<20}{:<14}{:<12}{:<12}{:<10}ATTACHMENTS",
        "ID", "EMPLOYEE", "TYPE", "FROM", "TO", "STATUS"
    );
    for r in records {
        let from = join_date_time(r.from_date.as_deref(), r.from_time.as_deref());
        let to = join_date_time(r.to_date.as_deref(), r.to_time.as_deref());
        println!(
            "{:<8}{:<20}{:<14}{:<12}{:<12}{:<10}{}",
            r.id,
            r.user_name.as_deref().unwrap_or("-"),
            r.req_type.as_deref().unwrap_or("-"),
            from,
            to,
            r.status.as_deref().unwrap_or("-"),
            r.attachment_names().len()
        );
    }
}

fn join_date_time(date: Option<&str>, time: Option<&str>) -> String {
    match (date, time) {
        (Some(d), Some(t)) if !t.is_empty() => format!("{d} {t}"),
        (Some(d), _) => d.to_string(),
        (None, _) => "-".to_string(),
    }
}
