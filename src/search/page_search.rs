use std::rc::Rc;

use tracing::{debug, warn};

use super::{filter_rows, FilterOutcome, Query};
use crate::dom::{Complex, Compound, Document, ElementId, Event, EventType, Selector};

pub const DEFAULT_CLEAR_SELECTOR: &str = ".clear-search";
pub const DEFAULT_SENTINEL_CLASS: &str = "no-results";
pub const DEFAULT_HIDING_CLASS: &str = "d-none";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSearchOptions {
    pub search_input_id: String,
    pub table_id: String,
    pub clear_selector: Option<String>,
    /// Marks the "no results" row, which is also excluded from filtering.
    pub sentinel_class: String,
    /// Class toggled on the "no results" row to hide it.
    pub hiding_class: String,
}

impl PageSearchOptions {
    pub fn new(search_input_id: &str, table_id: &str) -> Self {
        Self {
            search_input_id: search_input_id.to_string(),
            table_id: table_id.to_string(),
            clear_selector: None,
            sentinel_class: DEFAULT_SENTINEL_CLASS.to_string(),
            hiding_class: DEFAULT_HIDING_CLASS.to_string(),
        }
    }

    pub fn with_clear_selector(mut self, selector: &str) -> Self {
        self.clear_selector = Some(selector.to_string());
        self
    }

    pub fn with_sentinel_class(mut self, class: &str) -> Self {
        self.sentinel_class = class.to_string();
        self
    }

    pub fn with_hiding_class(mut self, class: &str) -> Self {
        self.hiding_class = class.to_string();
        self
    }

    /// The configured selector, falling back to `.clear-search` when unset
    /// or blank.
    pub fn clear_selector(&self) -> &str {
        match self.clear_selector.as_deref() {
            Some(selector) if !selector.trim().is_empty() => selector,
            _ => DEFAULT_CLEAR_SELECTOR,
        }
    }
}

/// `tbody tr:not(.<sentinel>)`: the rows the filter shows and hides.
pub fn data_row_selector(sentinel_class: &str) -> Selector {
    let mut row = tag("tr");
    row.negations.push(Compound {
        classes: vec![sentinel_class.to_string()],
        ..Default::default()
    });
    Selector {
        alternatives: vec![Complex { parts: vec![tag("tbody"), row] }],
    }
}

/// `tbody tr.<sentinel>`.
pub fn sentinel_row_selector(sentinel_class: &str) -> Selector {
    let mut row = tag("tr");
    row.classes.push(sentinel_class.to_string());
    Selector {
        alternatives: vec![Complex { parts: vec![tag("tbody"), row] }],
    }
}

fn tag(name: &str) -> Compound {
    Compound {
        tag: Some(name.to_string()),
        ..Default::default()
    }
}

/// Attaches the live row filter once the document has finished loading.
///
/// `clear_btn_selector` defaults to `.clear-search`. When the search input or
/// the table cannot be found nothing is bound and the page is left as is.
pub fn init_page_search(doc: &mut Document, search_input_id: &str, table_id: &str, clear_btn_selector: Option<&str>) {
    let mut options = PageSearchOptions::new(search_input_id, table_id);
    if let Some(selector) = clear_btn_selector {
        options = options.with_clear_selector(selector);
    }
    init_page_search_with(doc, options);
}

pub fn init_page_search_with(doc: &mut Document, options: PageSearchOptions) {
    doc.on_content_loaded(move |doc| {
        if let Some(search) = PageSearch::bind(doc, &options) {
            search.install(doc);
        }
    });
}

/// Element handles resolved at bind time.
#[derive(Debug, Clone)]
pub struct PageSearch {
    input: ElementId,
    table: ElementId,
    clear: Option<ElementId>,
    data_rows: Selector,
    sentinel: Selector,
    hiding_class: String,
}

impl PageSearch {
    pub fn bind(doc: &mut Document, options: &PageSearchOptions) -> Option<Self> {
        let input = doc.get_element_by_id(&options.search_input_id);
        let clear = match Selector::parse(options.clear_selector()) {
            Ok(selector) => doc.query_selector(&selector),
            Err(e) => {
                warn!(selector = options.clear_selector(), error = %e, "ignoring clear button selector");
                None
            }
        };
        let table = doc.get_element_by_id(&options.table_id);

        let (Some(input), Some(table)) = (input, table) else {
            debug!(
                input = %options.search_input_id,
                table = %options.table_id,
                "search input or table not found, page search not bound"
            );
            return None;
        };

        doc.add_hiding_class(&options.hiding_class);

        Some(Self {
            input,
            table,
            clear,
            data_rows: data_row_selector(&options.sentinel_class),
            sentinel: sentinel_row_selector(&options.sentinel_class),
            hiding_class: options.hiding_class.clone(),
        })
    }

    pub fn input(&self) -> ElementId {
        self.input
    }

    pub fn table(&self) -> ElementId {
        self.table
    }

    pub fn clear_button(&self) -> Option<ElementId> {
        self.clear
    }

    /// Registers the input handler and, when a clear button was found, the
    /// click handler.
    pub fn install(self, doc: &mut Document) -> Rc<Self> {
        let search = Rc::new(self);

        let on_input = Rc::clone(&search);
        doc.add_event_listener(
            search.input,
            EventType::Input,
            Rc::new(move |doc: &mut Document, _: &Event| {
                on_input.apply(doc);
            }),
        );

        if let Some(clear) = search.clear {
            let on_click = Rc::clone(&search);
            doc.add_event_listener(
                clear,
                EventType::Click,
                Rc::new(move |doc: &mut Document, _: &Event| {
                    on_click.clear(doc);
                }),
            );
        }

        debug!(clear_button = search.clear.is_some(), "page search bound");
        search
    }

    pub fn data_rows(&self, doc: &Document) -> Vec<ElementId> {
        doc.query_selector_all_in(self.table, &self.data_rows)
    }

    pub fn sentinel_row(&self, doc: &Document) -> Option<ElementId> {
        doc.query_selector_in(self.table, &self.sentinel)
    }

    /// Filters the table against the current input value.
    pub fn apply(&self, doc: &mut Document) -> FilterOutcome {
        let query = Query::new(&doc.element(self.input).value);

        if let Some(clear) = self.clear {
            doc.element_mut(clear).hidden = query.is_empty();
        }

        let rows = self.data_rows(doc);
        let texts: Vec<String> = rows.iter().map(|&row| doc.text_content(row)).collect();
        let outcome = filter_rows(&texts, &query);

        for (&row, &visible) in rows.iter().zip(&outcome.visible) {
            doc.element_mut(row).display_none = !visible;
        }

        if let Some(sentinel) = self.sentinel_row(doc) {
            doc.element_mut(sentinel)
                .toggle_class(&self.hiding_class, outcome.visible_count > 0);
        }

        debug!(query = %query, visible = outcome.visible_count, total = outcome.total(), "rows filtered");
        outcome
    }

    /// Empties the input, re-runs the filter through an `input` event and
    /// gives focus back to the input.
    pub fn clear(&self, doc: &mut Document) {
        doc.element_mut(self.input).value.clear();
        doc.dispatch_event(self.input, EventType::Input);
        doc.focus(self.input);
    }
}
