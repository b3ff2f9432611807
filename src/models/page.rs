use crate::config::PageSettings;
use crate::dom::{Document, Element, Selector};
use crate::models::TableData;

/// Lays a table out as a page: a search box with its clear button, then the
/// table with a header, one body row per data row and an optional
/// "no results" row.
///
/// The document is left in the loading state so scripts can be attached
/// before `finish_parsing` is called.
pub struct PageBuilder<'a> {
    settings: &'a PageSettings,
}

impl<'a> PageBuilder<'a> {
    pub fn new(settings: &'a PageSettings) -> Self {
        Self { settings }
    }

    pub fn build(&self, data: &TableData) -> Document {
        let mut doc = Document::new();
        doc.add_hiding_class(&self.settings.hiding_class);
        let body = doc.body();

        let search_box = doc.append(body, Element::new("div").with_class("search-box"));
        doc.append(search_box, Element::new("input").with_id(&self.settings.search_input_id));
        doc.append(search_box, self.clear_button());

        let table = doc.append(body, Element::new("table").with_id(&self.settings.table_id));
        let thead = doc.append(table, Element::new("thead"));
        let header = doc.append(thead, Element::new("tr"));
        for column in &data.columns {
            doc.append(header, Element::new("th").with_text(&column.name));
        }

        let tbody = doc.append(table, Element::new("tbody"));
        for row in &data.rows {
            let tr = doc.append(tbody, Element::new("tr"));
            for cell in row {
                doc.append(tr, Element::new("td").with_text(cell));
            }
        }

        if self.settings.show_no_results_row {
            let sentinel = doc.append(
                tbody,
                Element::new("tr")
                    .with_class(&self.settings.sentinel_class)
                    .with_class(&self.settings.hiding_class),
            );
            doc.append(
                sentinel,
                Element::new("td")
                    .with_colspan(data.columns.len().max(1))
                    .with_text(&self.settings.no_results_text),
            );
        }

        doc
    }

    /// A button carrying whatever the clear selector asks for when it is a
    /// single compound such as `.clear-search` or `button#clear`, otherwise
    /// the conventional `.clear-search`.
    fn clear_button(&self) -> Element {
        let mut button = Element::new("button").with_text("✖").with_hidden(true);

        let compound = Selector::parse(&self.settings.clear_selector)
            .ok()
            .filter(|s| s.alternatives.len() == 1 && s.alternatives[0].parts.len() == 1)
            .map(|mut s| s.alternatives.remove(0).parts.remove(0));

        match compound {
            Some(compound) if compound.negations.is_empty() => {
                if let Some(tag) = compound.tag.filter(|t| t != "*") {
                    button.tag = tag;
                }
                button.id = compound.id;
                for class in &compound.classes {
                    button.add_class(class);
                }
            }
            _ => button.add_class("clear-search"),
        }
        button
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{data_row_selector, sentinel_row_selector};

    fn recipes() -> TableData {
        TableData::new(
            "recipes",
            &["Name", "Kind"],
            vec![
                vec!["Apple Pie".to_string(), "dessert".to_string()],
                vec!["Banana Bread".to_string(), "bake".to_string()],
            ],
        )
    }

    #[test]
    fn test_layout() {
        let settings = PageSettings::default();
        let doc = PageBuilder::new(&settings).build(&recipes());

        assert!(doc.get_element_by_id("search-input").is_some());
        let table = doc.get_element_by_id("data-table").unwrap();
        assert_eq!(doc.query_selector_all_in(table, &data_row_selector("no-results")).len(), 2);
        assert_eq!(doc.query_selector_all_in(table, &Selector::parse("thead th").unwrap()).len(), 2);

        let sentinel = doc.query_selector_in(table, &sentinel_row_selector("no-results")).unwrap();
        assert!(!doc.is_displayed(sentinel));
        assert_eq!(doc.text_content(sentinel), "No results found");

        let clear = doc.query_selector(&Selector::parse(".clear-search").unwrap()).unwrap();
        assert!(doc.element(clear).hidden);
    }

    #[test]
    fn test_without_sentinel() {
        let settings = PageSettings {
            show_no_results_row: false,
            ..Default::default()
        };
        let doc = PageBuilder::new(&settings).build(&recipes());
        assert!(doc.query_selector(&sentinel_row_selector("no-results")).is_none());
    }

    #[test]
    fn test_clear_button_follows_selector() {
        let settings = PageSettings {
            clear_selector: "a#reset.btn".to_string(),
            ..Default::default()
        };
        let doc = PageBuilder::new(&settings).build(&recipes());
        let clear = doc.query_selector(&Selector::parse("#reset").unwrap()).unwrap();
        assert_eq!(doc.element(clear).tag, "a");
        assert!(doc.element(clear).has_class("btn"));

        let settings = PageSettings {
            clear_selector: ".search-box button".to_string(),
            ..Default::default()
        };
        let doc = PageBuilder::new(&settings).build(&recipes());
        assert!(doc.query_selector(&Selector::parse(".clear-search").unwrap()).is_some());
    }
}
