use super::form::{FormView, LABEL_LOADING};

pub const TITLE: &str = "Summarization UI";
pub const DESCRIPTION: &str = "Text-In → Summary-Out";

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; margin: 0; }
main { padding: 2rem; max-width: 600px; margin: 0 auto; }
label { display: block; margin-bottom: 0.5rem; }
textarea { width: 100%; padding: 0.5rem; font-family: inherit; box-sizing: border-box; }
button { padding: 0.5rem 1rem; cursor: pointer; }
button:disabled { cursor: not-allowed; opacity: 0.7; }
.alert { margin-top: 1rem; padding: 0.75rem; background-color: #fee; color: #c00; border-radius: 4px; }
.output { padding: 1rem; background-color: #f5f5f5; border-radius: 4px; white-space: pre-wrap; min-height: 4rem; }
";

/// Full document: root layout around the form page.
pub fn render_page(view: &FormView<'_>) -> String {
    layout(&page(view))
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<meta name=\"description\" content=\"{description}\">\n\
         <style>\n{STYLE}</style>\n</head>\n<body>{body}</body>\n</html>\n",
        title = escape_html(TITLE),
        description = escape_html(DESCRIPTION),
    )
}

fn page(view: &FormView<'_>) -> String {
    let disabled = if view.is_loading { " disabled" } else { "" };

    // The textarea goes read-only rather than disabled on submit, a disabled
    // field would drop out of the posted form.
    let on_submit = format!(
        "var b=this.querySelector('button');b.disabled=true;b.textContent='{LABEL_LOADING}';\
         this.querySelector('textarea').readOnly=true;"
    );

    let alert = match view.error {
        Some(message) => format!(
            "\n<div role=\"alert\" class=\"alert\">{}</div>",
            escape_html(message)
        ),
        None => String::new(),
    };

    format!(
        "\n<main>\n<h1>Summarization</h1>\n\
         <form method=\"post\" action=\"/\" onsubmit=\"{on_submit}\">\n\
         <div style=\"margin-bottom: 1rem\">\n\
         <label for=\"input-text\">Input text</label>\n\
         <textarea id=\"input-text\" name=\"input\" rows=\"6\" placeholder=\"Enter text to summarize...\"{disabled}>\n{input}</textarea>\n\
         </div>\n\
         <button type=\"submit\"{disabled}>{label}</button>\n\
         </form>{alert}\n\
         <div style=\"margin-top: 1rem\">\n\
         <h2>Summary</h2>\n\
         <div class=\"output\" id=\"summary\">{output}</div>\n\
         </div>\n</main>\n",
        on_submit = escape_html(&on_submit),
        input = escape_html(view.input),
        label = escape_html(view.button_label),
        output = escape_html(view.output),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
