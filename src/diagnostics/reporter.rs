//! Formatting for fault logs

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::sink::FaultLog;

/// Formats a fault log as a table with one row per listener
pub fn format_fault_report(log: &FaultLog) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Listener", "Panics", "Busy", "Last fault"]);

    for (name, counts) in log.per_listener() {
        let last = log
            .last_fault(name)
            .map(|fault| fault.to_string())
            .unwrap_or_default();
        builder.push_record([
            name.to_string(),
            counts.panicked.to_string(),
            counts.busy.to_string(),
            last,
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut output = String::new();
    output.push_str(&table.to_string());
    output.push('\n');
    output.push_str(&format_summary(log));
    output
}

fn format_summary(log: &FaultLog) -> String {
    let listeners = log.per_listener().count();
    if log.is_empty() {
        format!("{} no listener faults\n", "✓".green())
    } else {
        format!(
            "{} {} fault(s) across {} listener(s)\n",
            "✗".red(),
            log.len(),
            listeners
        )
    }
}

/// Prints the fault report to stdout
pub fn print_fault_report(log: &FaultLog) {
    println!("{}", format_fault_report(log));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::FaultSink;
    use crate::input::{KeyCode, KeyEventKind, ListenerFault};

    #[test]
    fn test_report_lists_each_listener() {
        colored::control::set_override(false);

        let mut log = FaultLog::new();
        log.report(&ListenerFault::Panicked {
            listener: "hud".to_string(),
            kind: KeyEventKind::Repeat,
            key: KeyCode::Enter,
            message: "index out of bounds".to_string(),
        });

        let report = format_fault_report(&log);
        assert!(report.contains("Listener"));
        assert!(report.contains("hud"));
        assert!(report.contains("index out of bounds"));
        assert!(report.contains("1 fault(s) across 1 listener(s)"));
    }

    #[test]
    fn test_empty_report() {
        colored::control::set_override(false);

        let report = format_fault_report(&FaultLog::new());
        assert!(report.contains("no listener faults"));
    }
}
