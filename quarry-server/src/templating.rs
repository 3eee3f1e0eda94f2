/// The HTML templating collaborator is a named contract, not a subsystem of
/// this crate: "take a template name and a context value, return an HTML
/// string." Full theming is explicitly out of scope, so the only
/// implementation here is a minimal stand-in that dumps the context as
/// preformatted JSON. A real deployment would swap this for a proper
/// renderer without touching any handler.
pub trait Templater: Send + Sync {
    fn render(&self, template: &str, context: serde_json::Value) -> String;
}

/// Minimal [`Templater`] satisfying the contract: renders the page title and
/// a pretty-printed dump of the context object. Good enough to browse a
/// catalog by hand; not a design target.
pub struct DebugTemplater;

impl Templater for DebugTemplater {
    fn render(&self, template: &str, context: serde_json::Value) -> String {
        let body = serde_json::to_string_pretty(&context).unwrap_or_default();
        format!(
            "<!doctype html><html><head><title>{template}</title></head>\
             <body><pre>{}</pre></body></html>",
            html_escape(&body)
        )
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
