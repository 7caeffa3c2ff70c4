//! HTML document shell and stylesheet.

use super::dom::html_escape;

/// Base HTML document around the rendered regions.
pub fn base_template(title: &str, content: &str) -> String {
    let title = html_escape(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <main>
        <h1>{title}</h1>
        {content}
    </main>
</body>
</html>"#,
        title = title,
        content = content
    )
}

/// CSS styles for the dashboard - minimal text-based design.
pub const CSS: &str = r#"
:root {
    --bg: #fff;
    --text: #222;
    --text-muted: #666;
    --border: #ccc;
    --added: #1a7f37;
    --removed: #cf222e;
}

body {
    font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
    background: var(--bg);
    color: var(--text);
    margin: 0;
}

main {
    max-width: 960px;
    margin: 0 auto;
    padding: 1rem;
}

#model-count {
    font-weight: bold;
}

#log-list li.error,
#scrape-log tr.error td,
#model-count.error {
    color: var(--removed);
}

#log-list li.empty,
#scrape-log tr.empty td {
    color: var(--text-muted);
    font-style: italic;
}

.file-listing {
    width: 100%;
    border-collapse: collapse;
}

.file-listing th,
.file-listing td {
    text-align: left;
    padding: 0.25rem 0.5rem;
    border-bottom: 1px solid var(--border);
}

td.added {
    color: var(--added);
}

td.removed {
    color: var(--removed);
}

tr.scrape-failed td {
    background: #fff5f5;
}
"#;
