use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Renders a post body to an HTML fragment. Footnote definitions are pulled
/// out of the body and emitted as one `<section class="footnotes">` at the
/// end, numbered in order of first reference.
pub fn render_markdown_to_html(markdown: &str) -> String {
    let mut body = Vec::new();
    let mut definitions: Vec<(CowStr, Vec<Event>)> = Vec::new();
    let mut current: Option<(CowStr, Vec<Event>)> = None;

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::FootnoteDefinition(label)) => current = Some((label, Vec::new())),
            Event::End(TagEnd::FootnoteDefinition) => definitions.extend(current.take()),
            event => match current.as_mut() {
                Some((_, events)) => events.push(event),
                None => body.push(event),
            },
        }
    }

    let mut notes = FootnoteNumbers::default();
    let body = notes.link_references(body);

    let mut html_out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_out, body.into_iter());

    if !definitions.is_empty() {
        html_out.push_str("<section class=\"footnotes\">\n<ol>\n");
        render_definitions(&mut html_out, definitions, &mut notes);
        html_out.push_str("</ol>\n</section>\n");
    }
    html_out
}

// Lowest number first. Definitions may reference further notes, which take
// the next numbers, so the pick is redone after each one. Unreferenced
// definitions go last in source order.
fn render_definitions(
    out: &mut String,
    mut definitions: Vec<(CowStr<'_>, Vec<Event<'_>>)>,
    notes: &mut FootnoteNumbers,
) {
    let mut done = vec![false; definitions.len()];
    loop {
        let next = (0..definitions.len())
            .filter(|&i| !done[i])
            .min_by_key(|&i| notes.get(&definitions[i].0).unwrap_or(usize::MAX));
        let Some(i) = next else {
            break;
        };
        done[i] = true;
        let label = definitions[i].0.to_string();
        let referenced = notes.get(&label).is_some();
        notes.number(&label);

        let id = anchor_id(&label);
        let events = notes.link_references(std::mem::take(&mut definitions[i].1));

        out.push_str(&format!("<li id=\"fn-{id}\">\n"));
        html::push_html(out, events.into_iter());
        if referenced {
            out.push_str(&format!(
                "<a href=\"#fnref-{id}\" class=\"footnote-backref\">\u{21a9}</a>\n"
            ));
        }
        out.push_str("</li>\n");
    }
}

#[derive(Default)]
struct FootnoteNumbers {
    labels: Vec<String>,
}

impl FootnoteNumbers {
    fn get(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label).map(|i| i + 1)
    }

    fn number(&mut self, label: &str) -> usize {
        match self.get(label) {
            Some(n) => n,
            None => {
                self.labels.push(label.to_string());
                self.labels.len()
            }
        }
    }

    /// Swaps footnote references for numbered links. Only the first reference
    /// to a note carries the id the back-link points at.
    fn link_references<'a>(&mut self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        events
            .into_iter()
            .map(|event| match event {
                Event::FootnoteReference(label) => {
                    let first = self.get(&label).is_none();
                    let n = self.number(&label);
                    let id = anchor_id(&label);
                    let anchor = if first { format!(" id=\"fnref-{id}\"") } else { String::new() };
                    let html = format!(
                        "<sup class=\"footnote-reference\"{anchor}><a href=\"#fn-{id}\">{n}</a></sup>"
                    );
                    Event::InlineHtml(CowStr::Boxed(html.into_boxed_str()))
                }
                other => other,
            })
            .collect()
    }
}

fn anchor_id(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}
