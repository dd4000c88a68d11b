use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

static HEADING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, h4, h5, h6").unwrap());
static DATA_TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable").unwrap());
static ANY_HEADING_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());
static TR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

/// How many element siblings to look back from a table for its heading.
pub const HEADING_LOOKBACK: usize = 5;

/// A section heading (`h2`..`h6`) in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// Data tables between this heading and the next heading of any level,
    /// as indices into [`Outline::tables`].
    pub tables: Vec<usize>,
}

/// A `table.wikitable` with its rows already reduced to cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub caption: Option<String>,
    /// One entry per `tr` owned by this table (nested tables excluded),
    /// holding the text of its `td` cells.
    pub rows: Vec<Vec<String>>,
    /// Text of the closest heading among the previous siblings, if one is
    /// found within [`HEADING_LOOKBACK`] hops.
    pub preceding_heading: Option<String>,
}

/// The parts of an article the table locator needs, detached from the DOM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub headings: Vec<Heading>,
    pub tables: Vec<Table>,
}

impl Outline {
    /// Parse HTML into an outline. Never fails: markup without headings or
    /// tables gives an empty outline.
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);

        let mut table_ids = HashMap::new();
        let mut tables = Vec::new();
        for (i, el) in doc.select(&DATA_TABLE_SEL).enumerate() {
            table_ids.insert(el.id(), i);
            tables.push(Table {
                caption: caption_text(el),
                rows: table_rows(el),
                preceding_heading: preceding_heading(el),
            });
        }

        let headings = doc
            .select(&HEADING_SEL)
            .filter_map(|el| {
                let level = heading_level(el)?;
                let tables = section_tables(el)
                    .into_iter()
                    .filter_map(|t| table_ids.get(&t.id()).copied())
                    .collect();
                Some(Heading {
                    level,
                    text: element_text(el),
                    tables,
                })
            })
            .collect();

        Outline { headings, tables }
    }
}

/// Level of a heading element. A `div.mw-heading` wrapper counts as the
/// heading it wraps.
fn heading_level(el: ElementRef) -> Option<u8> {
    let name = el.value().name();
    if let Some(n) = name.strip_prefix('h') {
        return match n.parse::<u8>() {
            Ok(level @ 1..=6) if n.len() == 1 => Some(level),
            _ => None,
        };
    }
    if name == "div" && el.value().classes().any(|c| c == "mw-heading") {
        return el
            .children()
            .filter_map(ElementRef::wrap)
            .find_map(heading_level);
    }
    None
}

/// The element whose siblings delimit the heading's section.
fn sibling_anchor(heading: ElementRef) -> ElementRef {
    heading
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|p| p.value().name() == "div" && p.value().classes().any(|c| c == "mw-heading"))
        .unwrap_or(heading)
}

fn section_tables(heading: ElementRef) -> Vec<ElementRef> {
    let mut out = Vec::new();
    for sib in sibling_anchor(heading).next_siblings().filter_map(ElementRef::wrap) {
        if heading_level(sib).is_some() {
            break;
        }
        if is_data_table(sib) {
            out.push(sib);
            continue;
        }
        // Wrapper divs may hold tables; a wrapper holding a heading is a new section.
        if sib.select(&ANY_HEADING_SEL).next().is_some() {
            break;
        }
        out.extend(sib.select(&DATA_TABLE_SEL));
    }
    out
}

fn preceding_heading(table: ElementRef) -> Option<String> {
    table
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .take(HEADING_LOOKBACK)
        .find(|el| heading_level(*el).is_some())
        .map(element_text)
}

fn is_data_table(el: ElementRef) -> bool {
    el.value().name() == "table" && el.value().classes().any(|c| c == "wikitable")
}

fn caption_text(table: ElementRef) -> Option<String> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .find(|c| c.value().name() == "caption")
        .map(element_text)
}

fn table_rows(table: ElementRef) -> Vec<Vec<String>> {
    table
        .select(&TR_SEL)
        .filter(|tr| is_owned_by(*tr, table))
        .map(|tr| {
            tr.children()
                .filter_map(ElementRef::wrap)
                .filter(|c| c.value().name() == "td")
                .map(element_text)
                .collect()
        })
        .collect()
}

fn is_owned_by(tr: ElementRef, table: ElementRef) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
        .is_some_and(|a| a.id() == table.id())
}

/// Text content of an element. `<br>` becomes a list separator and
/// `style`/`script` bodies are skipped.
pub fn element_text(el: ElementRef) -> String {
    let mut out = String::new();
    push_text(el, &mut out);
    out
}

fn push_text(el: ElementRef, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => match e.name() {
                "br" => out.push_str(", "),
                "style" | "script" => {}
                _ => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        push_text(child_el, out);
                    }
                }
            },
            _ => {}
        }
    }
}
