//! Reminder message rendering
//!
//! Pure functions from an enriched task batch to the plain-text and
//! HTML representations of one recipient's reminder email.

use chrono::{DateTime, Local, Utc};

use super::enricher::EnrichedTask;
use crate::task::TaskPriority;
use crate::user::User;

/// Presentation tone for a task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTone {
    Alert,
    Warning,
    Normal,
}

impl PriorityTone {
    pub fn for_priority(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::High => Self::Alert,
            TaskPriority::Medium => Self::Warning,
            TaskPriority::Low => Self::Normal,
        }
    }

    /// Inline color used in the HTML rendering
    pub fn color(&self) -> &'static str {
        match self {
            Self::Alert => "#f44336",
            Self::Warning => "#ff9800",
            Self::Normal => "#2e7d32",
        }
    }
}

fn priority_label(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "low",
        TaskPriority::Medium => "medium",
        TaskPriority::High => "high",
    }
}

// Date only, local wall clock; reminders never show a time of day.
fn format_due_date(due: Option<DateTime<Utc>>) -> String {
    match due {
        Some(due) => due.with_timezone(&Local).format("%d %b %Y").to_string(),
        None => "unscheduled".to_string(),
    }
}

fn greeting_name(recipient: &User) -> &str {
    recipient.full_name.as_deref().unwrap_or("User")
}

/// Subject line for one recipient's reminder
pub fn subject_line(task_count: usize, horizon_days: u32) -> String {
    format!("Task Reminder: {task_count} task(s) due in {horizon_days} day(s)")
}

/// Render the plain-text reminder body
pub fn format_plain_text(recipient: &User, tasks: &[EnrichedTask], horizon_days: u32) -> String {
    let task_lines = tasks
        .iter()
        .map(|entry| {
            let team_info = match &entry.team_name {
                Some(name) => format!(" [Team: {name}]"),
                None => String::new(),
            };
            format!(
                "- {} (Priority: {}, Due: {}){}",
                entry.task.title,
                priority_label(entry.task.priority),
                format_due_date(entry.task.due_date),
                team_info
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Hello {},\n\n\
         This is a friendly reminder that you have {} task(s) due in {} day(s).\n\n\
         Your upcoming tasks:\n{}\n\n\
         Please login to the Task Board to view and update these tasks.\n\n\
         Best regards,\n\
         The Task Board Team\n",
        greeting_name(recipient),
        tasks.len(),
        horizon_days,
        task_lines
    )
}

/// Render the HTML reminder body
///
/// Task titles and team names originate from user input elsewhere in the
/// system and are escaped before interpolation.
pub fn format_html(
    recipient: &User,
    tasks: &[EnrichedTask],
    horizon_days: u32,
    app_url: &str,
) -> String {
    let task_items = tasks
        .iter()
        .map(|entry| {
            let tone = PriorityTone::for_priority(entry.task.priority);
            let team_info = match &entry.team_name {
                Some(name) => format!(
                    " <span style=\"color:#2e7d32;\">[Team: {}]</span>",
                    escape_html(name)
                ),
                None => String::new(),
            };
            format!(
                "<li style=\"margin-bottom: 8px;\">\n\
                 <strong>{}</strong> \
                 <span style=\"color:{};\">(Priority: {})</span>\n\
                 <br><span style=\"color:#757575;\">Due: {}</span>{}\n\
                 </li>",
                escape_html(&entry.task.title),
                tone.color(),
                priority_label(entry.task.priority),
                format_due_date(entry.task.due_date),
                team_info
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <style>\n\
         body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; }}\n\
         .header {{ background-color: #2e7d32; color: white; padding: 20px; text-align: center; }}\n\
         .content {{ padding: 20px; }}\n\
         .footer {{ background-color: #f1f8e9; padding: 15px; text-align: center; font-size: 12px; color: #757575; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <div class=\"header\">\n\
         <h2>Task Board</h2>\n\
         <p>Task Reminder Notification</p>\n\
         </div>\n\
         <div class=\"content\">\n\
         <p>Hello {},</p>\n\
         <p>This is a friendly reminder that you have <strong>{} task(s)</strong> due in {} day(s).</p>\n\
         <h3>Your upcoming tasks:</h3>\n\
         <ul>\n{}\n</ul>\n\
         <p>Please <a href=\"{}\">login to the Task Board</a> to view and update these tasks.</p>\n\
         <p>Best regards,<br>The Task Board Team</p>\n\
         </div>\n\
         <div class=\"footer\">\n\
         <p>This is an automated reminder from the Task Board. Please do not reply to this email.</p>\n\
         </div>\n\
         </body>\n\
         </html>\n",
        escape_html(greeting_name(recipient)),
        tasks.len(),
        horizon_days,
        task_items,
        app_url
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
