use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use todo_core::Todo;

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Todo> for TodoRow {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.clone(),
            title: todo.title.clone(),
            status: todo.status.to_string(),
            due: todo
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            created: todo.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub fn render_todo(todo: &Todo) -> String {
    let due = todo
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    [
        format!("ID: {}", todo.id),
        format!("Title: {}", todo.title),
        format!("Description: {}", todo.description.as_deref().unwrap_or("")),
        format!("Status: {}", todo.status),
        format!("Due Date: {}", due),
        format!("Created At: {}", todo.created_at.format("%Y-%m-%d %H:%M:%S")),
        format!("Updated At: {}", todo.updated_at.format("%Y-%m-%d %H:%M:%S")),
    ]
    .join("\n")
}

pub fn render_table(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No todos found.".to_string();
    }
    let rows: Vec<TodoRow> = todos.iter().map(TodoRow::from).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}
