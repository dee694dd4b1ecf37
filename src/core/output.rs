//! Compact output rendering helpers for CLI surfaces.
//!
//! Keeps command result output bounded and readable while preserving signal.

use crate::core::assignment::{ReportRow, SeatDetail};
use crate::core::model::{Employee, Seat, SeatStatus};
use colored::Colorize;

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

pub fn status_label(status: SeatStatus) -> String {
    match status {
        SeatStatus::Vacant => status.as_str().green().to_string(),
        SeatStatus::Reserved => status.as_str().yellow().to_string(),
        SeatStatus::Occupied => status.as_str().red().to_string(),
    }
}

pub fn render_seats(seats: &[Seat]) -> String {
    if seats.is_empty() {
        return "No seats.".to_string();
    }
    let mut out = format!("{:<8} {:<10} {}\n", "SEAT", "STATUS", "EMPLOYEE");
    for seat in seats {
        let occupant = seat
            .employee_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        // Pad before colouring so escape codes don't break alignment.
        let status = format!("{:<10}", seat.status.as_str());
        let status = status.replace(seat.status.as_str(), &status_label(seat.status));
        out.push_str(&format!("{:<8} {} {}\n", seat.id, status, occupant));
    }
    out.push_str(&format!("({} seats)", seats.len()));
    out
}

pub fn render_employees(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "No employees.".to_string();
    }
    let mut out = format!(
        "{:<8} {:<24} {:<18} {:<18} {}\n",
        "ID", "NAME", "ROLE", "DEPARTMENT", "SEAT"
    );
    for e in employees {
        out.push_str(&format!(
            "{:<8} {:<24} {:<18} {:<18} {}\n",
            e.id,
            compact_line(&e.name, 24),
            compact_line(&e.role, 18),
            compact_line(&e.department, 18),
            e.seat
        ));
    }
    out.push_str(&format!("({} employees)", employees.len()));
    out
}

pub fn render_employee(employee: &Employee) -> String {
    format!(
        "{} {}\n  role: {}\n  department: {}\n  seat: {}",
        employee.id.to_string().bold(),
        employee.name,
        employee.role,
        employee.department,
        employee.seat
    )
}

pub fn render_seat_detail(detail: &SeatDetail) -> String {
    let mut out = format!("Seat {} [{}]", detail.seat_id.bold(), status_label(detail.status));
    if let Some(name) = &detail.employee_name {
        out.push_str(&format!(
            "\n  employee: {}\n  role: {}\n  department: {}",
            name,
            detail.role.as_deref().unwrap_or("-"),
            detail.department.as_deref().unwrap_or("-")
        ));
    }
    if let Some(message) = &detail.message {
        out.push_str(&format!("\n  {}", message));
    }
    out
}

pub fn render_report(rows: &[ReportRow]) -> String {
    let mut out = String::from("Seating Allocation Report\n");
    out.push_str(&format!(
        "{:<12} {:<24} {:<18} {:<18} {}\n",
        "Employee ID", "Name", "Department", "Role", "Seat No"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<12} {:<24} {:<18} {:<18} {}\n",
            row.employee_id,
            compact_line(&row.name, 24),
            compact_line(&row.department, 18),
            compact_line(&row.role, 18),
            row.seat
        ));
    }
    out.push_str(&format!("({} employees)", rows.len()));
    out
}
