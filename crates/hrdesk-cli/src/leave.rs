//! Leave types, submission and history.

use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use hrdesk_core::{LeaveDraft, LeaveError, LeaveKind, LeaveRequest};

use crate::app::App;

#[derive(Debug, Subcommand)]
pub enum LeaveCommands {
    /// List leave types
    Types,
    /// Submit a leave request
    Submit {
        /// Leave type id as listed by `leave types`
        #[arg(long = "type")]
        type_id: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day (YYYY-MM-DD); defaults to `--from`
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Start time (HH:MM), for hourly leave
        #[arg(long, default_value = "08:00", value_parser = parse_hhmm)]
        from_time: NaiveTime,
        /// End time (HH:MM), for hourly leave
        #[arg(long, default_value = "16:00", value_parser = parse_hhmm)]
        to_time: NaiveTime,
        #[arg(long, default_value = "")]
        note: String,
        /// Attachment file name already uploaded; repeat for several
        #[arg(long = "attachment")]
        attachments: Vec<String>,
    },
    /// Show past leave for yourself or, for HR, another employee
    History {
        #[arg(long)]
        employee: Option<String>,
    },
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

pub(crate) async fn run(app: &App, command: LeaveCommands) -> anyhow::Result<()> {
    match command {
        LeaveCommands::Types => run_types(app).await,
        LeaveCommands::Submit {
            type_id,
            from,
            to,
            from_time,
            to_time,
            note,
            attachments,
        } => {
            let draft = LeaveDraft {
                from_date: from,
                to_date: to.unwrap_or(from),
                from_time,
                to_time,
                note,
                attachments,
            };
            run_submit(app, &type_id, &draft).await
        }
        LeaveCommands::History { employee } => run_history(app, employee.as_deref()).await,
    }
}

async fn run_types(app: &App) -> anyhow::Result<()> {
    let types = app.client.get_leave_types().await?;
    println!("{:<8}{:<10}{:<12}DESCRIPTION", "ID", "KIND", "ATTACHMENT");
    for t in &types {
        let kind = match t.kind {
            LeaveKind::FullDay => "days",
            LeaveKind::Hourly => "hours",
        };
        let attachment = if t.attachment_required { "required" } else { "-" };
        println!("{:<8}{:<10}{:<12}{}", t.id, kind, attachment, t.desc);
    }
    Ok(())
}

async fn run_submit(app: &App, type_id: &str, draft: &LeaveDraft) -> anyhow::Result<()> {
    let session = app.require_session()?;
    let types = app.client.get_leave_types().await?;
    let leave_type = types
        .iter()
        .find(|t| t.id == type_id)
        .ok_or_else(|| anyhow::anyhow!("unknown leave type '{type_id}'; see `leave types`"))?;
    let rules = app.client.get_user_group_details(&session.user_id).await?;
    let today = chrono::Local::now().date_naive();

    let request = match LeaveRequest::build(leave_type, draft, rules.as_ref(), today) {
        Ok(request) => request,
        Err(err @ LeaveError::DateNotAllowed(_)) => {
            let hint = rules
                .as_ref()
                .map(|r| r.next_valid_date(draft.from_date, today))
                .map(|d| format!("; next allowed date is {}", d.format("%Y-%m-%d")))
                .unwrap_or_default();
            anyhow::bail!("{err}{hint}");
        }
        Err(err) => return Err(err.into()),
    };

    let reply = app
        .client
        .submit_leave_request(&session.user_id, &request)
        .await?;
    if !reply.accepted {
        anyhow::bail!(
            "leave request rejected: {}",
            reply.message.as_deref().unwrap_or("no reason given")
        );
    }
    println!(
        "submitted {} leave {} to {}",
        leave_type.desc, request.from_date, request.to_date
    );
    Ok(())
}

async fn run_history(app: &App, employee: Option<&str>) -> anyhow::Result<()> {
    let session = app.require_session()?;
    if employee.is_some_and(|e| e != session.user_id) && !session.is_hr {
        anyhow::bail!("only HR users can view another employee's leave");
    }
    let employee = employee.unwrap_or(&session.user_id);
    let entries = app.client.get_leaves_info(&session.user_id, employee).await?;

    if entries.is_empty() {
        println!("no leave recorded for {employee}");
        return Ok(());
    }
    println!("{:<20}{:<12}{:<12}{:<6}HOURS", "TYPE", "FROM", "TO", "DAYS");
    for e in &entries {
        println!(
            "{:<20}{:<12}{:<12}{:<6}{}",
            e.leave_type.as_deref().unwrap_or("-"),
            e.from_date.as_deref().unwrap_or("-"),
            e.to_date.as_deref().unwrap_or("-"),
            display_value(&e.days),
            display_value(&e.hours)
        );
    }
    Ok(())
}

fn display_value(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
