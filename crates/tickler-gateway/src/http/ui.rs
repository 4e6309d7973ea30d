//! Server-rendered list page served at `GET /`.

use tickler_core::Todo;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Todos</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 36rem; margin: 2rem auto; padding: 0 1rem; }
  ul { list-style: none; padding: 0; }
  li { display: flex; align-items: center; gap: .5rem; padding: .35rem 0; border-bottom: 1px solid #eee; }
  li.done span { text-decoration: line-through; color: #888; }
  form.add { display: flex; gap: .5rem; }
  form.add input { flex: 1; }
</style>
</head>
<body>
<h1>Todos</h1>
<form class="add" method="post" action="/add">
  <input name="text" placeholder="What needs doing?" required>
  <button type="submit">Add</button>
</form>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Render the full list page.
pub fn render_index(todos: &[Todo]) -> String {
    let mut out = String::with_capacity(PAGE_HEAD.len() + todos.len() * 160);
    out.push_str(PAGE_HEAD);

    if todos.is_empty() {
        out.push_str("<p>Nothing to do.</p>\n");
    } else {
        out.push_str("<ul>\n");
        for todo in todos {
            let (class, label) = if todo.completed {
                (" class=\"done\"", "Undo")
            } else {
                ("", "Done")
            };
            out.push_str(&format!(
                "  <li{class}><form method=\"post\" action=\"/toggle/{id}\"><button type=\"submit\">{label}</button></form><span>{text}</span></li>\n",
                id = escape_html(todo.id.as_str()),
                text = escape_html(&todo.text),
            ));
        }
        out.push_str("</ul>\n");
    }

    out.push_str(PAGE_TAIL);
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickler_core::TodoId;

    fn todo(id: &str, text: &str, completed: bool) -> Todo {
        Todo {
            id: TodoId::from(id),
            text: text.to_string(),
            completed,
            created_at: Default::default(),
        }
    }

    #[test]
    fn empty_list_has_placeholder() {
        let html = render_index(&[]);
        assert!(html.contains("Nothing to do."));
        assert!(html.contains("action=\"/add\""));
    }

    #[test]
    fn items_link_to_toggle_and_mark_completion() {
        let html = render_index(&[todo("a1", "Buy milk", false), todo("b2", "Call Bob", true)]);
        assert!(html.contains("action=\"/toggle/a1\""));
        assert!(html.contains("action=\"/toggle/b2\""));
        assert!(html.contains("<li class=\"done\">"));
        assert!(html.contains("<span>Buy milk</span>"));
    }

    #[test]
    fn text_is_escaped() {
        let html = render_index(&[todo("x", "<script>alert('hi')</script> & co", false)]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;hi&#39;)&lt;/script&gt; &amp; co"));
    }
}
