use tickler_core::Todo;

/// Render the reminder message for `pending` todos.
///
/// Layout: header, count line, one `•` bullet per todo, then the date line.
pub fn format_digest(pending: &[Todo], date: &str) -> String {
    let items = pending
        .iter()
        .map(|todo| format!("• {}", todo.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🔔 Pending tasks\n\nYou have {} pending task(s):\n\n{}\n\n📅 {}",
        pending.len(),
        items,
        date
    )
}
