use crate::completions::{goal_of, CompletionMap};
use crate::models::Habit;
use chrono::NaiveDate;

/// Renders the index grid (habits × dates) from precomputed completion
/// maps. Pure string building; the caller decides day order and whether
/// the per-row sum column is shown.
pub fn render_index(
    days: &[NaiveDate],
    sections: &[(String, Vec<(Habit, CompletionMap)>)],
    show_count: bool,
) -> String {
    let body = if sections.is_empty() {
        r#"<p class="empty">List is empty.</p>"#.to_string()
    } else {
        let mut out = String::new();
        for (tag, rows) in sections {
            out.push_str(&render_section(tag, rows, days, show_count));
        }
        out
    };

    let date = days
        .iter()
        .max()
        .map(|day| day.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    INDEX_HTML
        .replace("{{DATE}}", &date)
        .replace("{{BODY}}", &body)
}

fn render_section(
    tag: &str,
    rows: &[(Habit, CompletionMap)],
    days: &[NaiveDate],
    show_count: bool,
) -> String {
    let mut section = String::new();
    section.push_str("<section class=\"group\">\n");
    section.push_str(&format!("<h2>{}</h2>\n", escape_html(tag)));
    section.push_str(&format!(
        "<div class=\"grid\" style=\"{}\">\n",
        grid_style(days.len(), show_count)
    ));

    // Weekday header row, then day-of-month row.
    section.push_str("<span class=\"head\"></span>");
    for day in days {
        section.push_str(&format!("<span class=\"head\">{}</span>", day.format("%a")));
    }
    if show_count {
        section.push_str("<span class=\"head\">Sum</span>");
    }
    section.push_str("\n<span class=\"head\"></span>");
    for day in days {
        section.push_str(&format!("<span class=\"head\">{}</span>", day.format("%d")));
    }
    if show_count {
        section.push_str("<span class=\"head\">#</span>");
    }
    section.push('\n');

    for (habit, map) in rows {
        section.push_str(&render_row(habit, map, days, show_count));
    }

    section.push_str("</div>\n</section>\n");
    section
}

fn render_row(
    habit: &Habit,
    map: &CompletionMap,
    days: &[NaiveDate],
    show_count: bool,
) -> String {
    let name = escape_html(&habit.name);
    let id = escape_html(&habit.id);
    let goal = goal_of(habit);

    let mut row = format!("<span class=\"name\" title=\"{name}\">{name}</span>");
    let mut completed = 0u32;
    for day in days {
        let count = map.get(day).map(|bucket| bucket.len() as u32).unwrap_or(0);
        let (class, label) = if count >= goal {
            completed += 1;
            ("cell done", "\u{2713}".to_string())
        } else if count > 0 {
            ("cell partial", count.to_string())
        } else {
            ("cell", "\u{00b7}".to_string())
        };
        row.push_str(&format!(
            "<form method=\"post\" action=\"/habits/{id}/toggle/{day}\">\
             <button class=\"{class}\" title=\"{day}\">{label}</button></form>",
        ));
    }
    if show_count {
        row.push_str(&format!("<span class=\"badge\">{completed}</span>"));
    }
    row.push('\n');
    row
}

fn grid_style(day_count: usize, show_count: bool) -> String {
    let columns = day_count + usize::from(show_count);
    format!("grid-template-columns: minmax(140px, 2fr) repeat({columns}, minmax(34px, 1fr));")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
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

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habits</title>
  <style>
    :root {
      --bg: #121212;
      --card: #1e1e1e;
      --ink: #e8e4dc;
      --muted: #9e9e9e;
      --accent: #6796cf;
      --done: #4caf7d;
      --border: rgba(255, 255, 255, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      display: flex;
      justify-content: center;
      padding: 28px 14px 48px;
    }

    .app {
      width: min(820px, 100%);
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      align-items: baseline;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
      font-weight: 600;
    }

    .subtitle {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .group {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 14px;
      padding: 14px 16px 16px;
    }

    .group h2 {
      margin: 0 0 10px;
      font-size: 0.85rem;
      font-weight: 500;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--accent);
    }

    .grid {
      display: grid;
      gap: 4px 2px;
      align-items: center;
    }

    .head {
      font-size: 80%;
      font-weight: 500;
      color: var(--muted);
      text-align: center;
    }

    .name {
      overflow: hidden;
      text-overflow: ellipsis;
      white-space: nowrap;
      padding-right: 8px;
      font-size: 0.95rem;
    }

    .grid form {
      display: contents;
    }

    .cell {
      appearance: none;
      width: 30px;
      height: 30px;
      margin: 0 auto;
      border: 1px solid var(--border);
      border-radius: 8px;
      background: transparent;
      color: var(--muted);
      font-size: 0.9rem;
      cursor: pointer;
    }

    .cell:hover {
      border-color: var(--accent);
    }

    .cell.done {
      background: var(--done);
      border-color: var(--done);
      color: #10281c;
      font-weight: 700;
    }

    .cell.partial {
      border-color: var(--accent);
      color: var(--accent);
    }

    .badge {
      text-align: center;
      color: var(--accent);
      font-size: 0.9rem;
    }

    .empty {
      margin: 40px auto;
      color: var(--muted);
    }

    .add {
      display: flex;
      gap: 8px;
    }

    .add input {
      flex: 1;
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 10px;
      color: var(--ink);
      padding: 10px 12px;
      font-size: 0.95rem;
    }

    .add button {
      border: none;
      border-radius: 10px;
      background: var(--accent);
      color: #0f1722;
      font-weight: 600;
      padding: 10px 18px;
      cursor: pointer;
    }

    .status {
      min-height: 1.2em;
      font-size: 0.9rem;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #e0705d;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habits</h1>
      <p class="subtitle">{{DATE}}</p>
    </header>

    {{BODY}}

    <form class="add" id="add-form">
      <input id="add-name" type="text" placeholder="New habit name" maxlength="120" />
      <button type="submit">Add</button>
    </form>
    <div class="status" id="status"></div>
  </main>

  <script>
    const form = document.getElementById('add-form');
    const nameInput = document.getElementById('add-name');
    const statusEl = document.getElementById('status');

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const name = nameInput.value.trim();
      if (!name) {
        return;
      }
      const res = await fetch('/api/habits', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ name })
      });
      if (!res.ok) {
        statusEl.textContent = await res.text();
        statusEl.dataset.type = 'error';
        return;
      }
      window.location.reload();
    });
  </script>
</body>
</html>
"#;
