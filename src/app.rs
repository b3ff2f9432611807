use crate::config::{Config, PageSettings};
use crate::db::{AsyncOperation, ColumnInfo, Database, SchemaInfo};
use crate::dom::{Document, ElementId, EventType, Selector};
use crate::models::{AppState, PageBuilder, TableData, TableSource};
use crate::search::{init_page_search_with, PageSearchOptions};
use crate::ui::components::*;
use crate::ui::setup_styles;
use eframe::egui;
use poll_promise::Promise;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What to open on startup, usually taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct StartupOptions {
    pub file: Option<PathBuf>,
    pub database_url: Option<String>,
    pub table: Option<String>,
    pub query: Option<String>,
}

impl StartupOptions {
    pub fn source(&self) -> Option<TableSource> {
        if let Some(path) = &self.file {
            Some(TableSource::File { path: path.clone() })
        } else if let Some(sql) = &self.query {
            Some(TableSource::Query { sql: sql.clone() })
        } else {
            self.table.as_deref().map(TableSource::table)
        }
    }
}

/// A table laid out as a page with the search attached.
pub struct LoadedPage {
    pub source: TableSource,
    pub columns: Vec<ColumnInfo>,
    pub doc: Document,
    pub input: Option<ElementId>,
    pub clear: Option<ElementId>,
    pub table: Option<ElementId>,
    sentinel_class: String,
}

impl LoadedPage {
    pub fn new(source: TableSource, data: &TableData, settings: &PageSettings) -> Self {
        let mut doc = PageBuilder::new(settings).build(data);

        let options = PageSearchOptions::new(&settings.search_input_id, &settings.table_id)
            .with_clear_selector(&settings.clear_selector)
            .with_sentinel_class(&settings.sentinel_class)
            .with_hiding_class(&settings.hiding_class);
        let clear_selector = options.clear_selector().to_string();
        init_page_search_with(&mut doc, options);
        doc.finish_parsing();

        let input = doc.get_element_by_id(&settings.search_input_id);
        let table = doc.get_element_by_id(&settings.table_id);
        let clear = Selector::parse(&clear_selector)
            .ok()
            .and_then(|selector| doc.query_selector(&selector));

        Self {
            source,
            columns: data.columns.clone(),
            doc,
            input,
            clear,
            table,
            sentinel_class: settings.sentinel_class.clone(),
        }
    }

    pub fn query_text(&self) -> &str {
        self.input.map_or("", |input| self.doc.element(input).value.as_str())
    }

    pub fn type_text(&mut self, text: &str) {
        if let Some(input) = self.input {
            self.doc.element_mut(input).value = text.to_string();
            self.doc.dispatch_event(input, EventType::Input);
        }
    }

    pub fn click_clear(&mut self) {
        if let Some(clear) = self.clear {
            self.doc.dispatch_event(clear, EventType::Click);
        }
    }

    pub fn handle_search_event(&mut self, event: SearchBarEvent) {
        match event {
            SearchBarEvent::Input(text) => self.type_text(&text),
            SearchBarEvent::ClearClicked => self.click_clear(),
            SearchBarEvent::Focused => {
                if let Some(input) = self.input {
                    self.doc.focus(input);
                }
            }
            SearchBarEvent::Blurred => self.doc.blur(),
        }
    }

    pub fn grid_view(&self) -> Option<GridView> {
        self.table
            .map(|table| GridView::from_document(&self.doc, table, &self.sentinel_class))
    }
}

pub struct PageSearchApp {
    pub config: Config,
    pub connection_string: Option<String>,
    pub use_tls: bool,
    pub database: Option<Arc<Database>>,
    pub connection_status: String,

    // Tokio runtime for async operations
    pub runtime: Arc<tokio::runtime::Runtime>,

    // Sidebar state
    pub schemas: Vec<SchemaInfo>,
    pub expanded_schemas: HashSet<String>,
    pub selected_table: Option<(String, String)>,
    pub show_sidebar: bool,

    pub page: Option<LoadedPage>,
    pub row_counts: Option<(usize, usize)>,

    // Async operations
    pub pending_operations: Vec<AsyncOperation>,
    /// Source waiting for the database connection.
    pub pending_source: Option<TableSource>,

    pub status_message: String,

    // UI Components
    menu_bar: MenuBar,
    status_bar: StatusBar,
    database_tree: DatabaseTree,
    search_bar: SearchBar,
    data_grid: DataGrid,
}

impl PageSearchApp {
    pub fn save_state(&self) {
        let state = AppState {
            source: self.page.as_ref().map(|p| p.source.clone()),
            expanded_schemas: self.expanded_schemas.clone(),
        };
        if let Err(e) = state.save() {
            warn!("could not save state: {:#}", e);
        }
    }

    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: Arc<tokio::runtime::Runtime>,
        options: StartupOptions,
    ) -> Self {
        setup_styles(&cc.egui_ctx);

        let config = Config::load().unwrap_or_else(|e| {
            warn!("using default config: {:#}", e);
            Config::new()
        });

        // Command line first, then the last saved connection, then the environment
        let (connection_string, use_tls) = if let Some(url) = &options.database_url {
            (Some(url.clone()), false)
        } else if let Some(conn) = config.get_last_connection() {
            (Some(conn.to_connection_string()), conn.use_tls)
        } else {
            (std::env::var("DATABASE_URL").ok(), false)
        };

        let state = AppState::load().unwrap_or_default();
        let initial_source = options.source().or(state.source);

        let mut app = Self {
            config,
            connection_string,
            use_tls,
            database: None,
            connection_status: "Not connected".to_string(),
            runtime,
            schemas: Vec::new(),
            expanded_schemas: state.expanded_schemas,
            selected_table: None,
            show_sidebar: true,
            page: None,
            row_counts: None,
            pending_operations: Vec::new(),
            pending_source: None,
            status_message: "Ready".to_string(),
            menu_bar: MenuBar::new(),
            status_bar: StatusBar::new(),
            database_tree: DatabaseTree::new(),
            search_bar: SearchBar::new(),
            data_grid: DataGrid::new(),
        };

        if app.connection_string.is_some() {
            app.connect_to_database();
        }
        if let Some(source) = initial_source {
            app.load_source(source);
        }

        app
    }

    pub fn connect_to_database(&mut self) {
        let Some(connection_string) = self.connection_string.clone() else {
            self.connection_status = "No database configured".to_string();
            return;
        };
        let use_tls = self.use_tls;
        let runtime = Arc::clone(&self.runtime);

        let operation = AsyncOperation::LoadStructure(Promise::spawn_thread("load_structure", move || {
            runtime.block_on(async move {
                let db = Database::connect(&connection_string, use_tls).await?;
                let schemas = db.list_schemas_with_tables().await?;
                Ok((Arc::new(db), schemas))
            })
        }));
        self.connection_status = operation.describe();
        self.start_operation(operation);
    }

    pub fn load_source(&mut self, source: TableSource) {
        if source.needs_database() && self.database.is_none() {
            if self.is_connecting() {
                self.pending_source = Some(source);
            } else {
                self.status_message = format!("Cannot load {}: not connected", source.title());
            }
            return;
        }

        let promise = match &source {
            TableSource::File { path } => {
                let path = path.clone();
                Promise::spawn_thread("load_file", move || TableData::load_json(&path))
            }
            TableSource::Table { schema, table } => {
                let Some(db) = self.database.clone() else { return };
                let runtime = Arc::clone(&self.runtime);
                let (schema, table) = (schema.clone(), table.clone());
                let limit = self.config.search.row_limit;
                Promise::spawn_thread("query_table", move || {
                    runtime.block_on(async move { db.query_table(&schema, &table, limit).await })
                })
            }
            TableSource::Query { sql } => {
                let Some(db) = self.database.clone() else { return };
                let runtime = Arc::clone(&self.runtime);
                let sql = sql.clone();
                Promise::spawn_thread("execute_query", move || {
                    runtime.block_on(async move { db.execute_query(&sql).await })
                })
            }
        };

        let operation = AsyncOperation::LoadTable(source, promise);
        self.status_message = operation.describe();
        self.start_operation(operation);
    }

    fn start_operation(&mut self, operation: AsyncOperation) {
        // Only the newest load of each kind is kept.
        let same_kind = |op: &AsyncOperation| {
            std::mem::discriminant(op) == std::mem::discriminant(&operation)
        };
        self.pending_operations.retain(|op| !same_kind(op));
        self.pending_operations.push(operation);
    }

    fn is_connecting(&self) -> bool {
        self.pending_operations
            .iter()
            .any(|op| matches!(op, AsyncOperation::LoadStructure(_)))
    }

    pub fn reload_source(&mut self) {
        if let Some(source) = self.page.as_ref().map(|p| p.source.clone()) {
            self.load_source(source);
        }
    }

    fn show_table(&mut self, source: TableSource, data: TableData) {
        // Keep whatever the user had typed across reloads.
        let previous_query = self
            .page
            .as_ref()
            .filter(|p| p.source == source)
            .map(|p| p.query_text().to_string())
            .unwrap_or_default();

        let mut page = LoadedPage::new(source, &data, &self.config.search);
        if !previous_query.is_empty() {
            page.type_text(&previous_query);
        }

        self.status_message = format!("Loaded {} rows from {}", data.rows.len(), page.source.title());
        info!(rows = data.rows.len(), source = %page.source.title(), "table loaded");
        self.page = Some(page);
        self.save_state();
    }
}

impl eframe::App for PageSearchApp {
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.save_state();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_async_operations();

        let source_title = self.page.as_ref().map(|p| p.source.title());
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            if let Some(event) = self.menu_bar.show(ui, &self.connection_status, source_title.as_deref()) {
                match event {
                    MenuBarEvent::ReloadSource => self.reload_source(),
                    MenuBarEvent::RefreshTables => self.connect_to_database(),
                    MenuBarEvent::ToggleSidebar => self.show_sidebar = !self.show_sidebar,
                    MenuBarEvent::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                }
            }
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar.show(ui, &self.status_message, self.row_counts);
        });

        if self.show_sidebar && !self.schemas.is_empty() {
            let mut clicked = None;
            egui::SidePanel::left("table_list_panel")
                .resizable(true)
                .default_width(260.0)
                .min_width(180.0)
                .show(ctx, |ui| {
                    ui.heading("Tables");
                    ui.separator();

                    if let Some(event) = self.database_tree.show(ui, &self.schemas, &self.expanded_schemas, &self.selected_table) {
                        match event {
                            DatabaseTreeEvent::TableClicked(schema, table) => {
                                self.selected_table = Some((schema.clone(), table.clone()));
                                clicked = Some(TableSource::Table { schema, table });
                            }
                            DatabaseTreeEvent::SchemaToggled(schema_name) => {
                                if !self.expanded_schemas.remove(&schema_name) {
                                    self.expanded_schemas.insert(schema_name);
                                }
                            }
                        }
                    }
                });
            if let Some(source) = clicked {
                self.load_source(source);
            }
        }

        let is_loading = !self.pending_operations.is_empty();
        let mut counts = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(page) = self.page.as_mut() else {
                ui.centered_and_justified(|ui| {
                    if is_loading {
                        ui.spinner();
                    } else {
                        ui.label("Select a table or pass --file to view data");
                    }
                });
                return;
            };

            for event in self.search_bar.show(ui, &page.doc, page.input, page.clear) {
                page.handle_search_event(event);
            }
            ui.separator();

            match page.grid_view() {
                Some(view) => {
                    counts = Some((view.visible_rows, view.total_rows));
                    self.data_grid.show(ui, &view, &page.columns);
                }
                None => {
                    ui.label("This page has no table to search");
                }
            }
        });

        if counts != self.row_counts {
            self.row_counts = counts;
            ctx.request_repaint();
        }

        // Request repaint if we're waiting for async operations
        if !self.pending_operations.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl PageSearchApp {
    fn handle_async_operations(&mut self) {
        for operation in std::mem::take(&mut self.pending_operations) {
            match operation {
                AsyncOperation::LoadStructure(promise) => match promise.try_take() {
                    Ok(Ok((db, schemas))) => {
                        let total_tables: usize = schemas.iter().map(|s| s.tables.len()).sum();
                        self.connection_status = format!("Connected - {} schemas, {} tables", schemas.len(), total_tables);
                        self.database = Some(db);
                        self.schemas = schemas;
                        if let Some(source) = self.pending_source.take() {
                            self.load_source(source);
                        }
                    }
                    Ok(Err(e)) => {
                        error!("connection failed: {:#}", e);
                        self.connection_status = format!("Connection failed: {}", e);
                        if let Some(source) = self.pending_source.take() {
                            self.status_message = format!("Cannot load {}: not connected", source.title());
                        }
                    }
                    Err(promise) => self.pending_operations.push(AsyncOperation::LoadStructure(promise)),
                },
                AsyncOperation::LoadTable(source, promise) => match promise.try_take() {
                    Ok(Ok(data)) => self.show_table(source, data),
                    Ok(Err(e)) => {
                        error!(source = %source.title(), "load failed: {:#}", e);
                        self.status_message = format!("Error loading {}: {}", source.title(), e);
                    }
                    Err(promise) => self.pending_operations.push(AsyncOperation::LoadTable(source, promise)),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courses() -> TableData {
        TableData::new(
            "courses",
            &["Title", "Level"],
            vec![
                vec!["Algebra I".to_string(), "Grade 9".to_string()],
                vec!["Organic Chemistry".to_string(), "Grade 12".to_string()],
                vec!["World History".to_string(), "Grade 10".to_string()],
            ],
        )
    }

    fn page() -> LoadedPage {
        LoadedPage::new(TableSource::table("public.courses"), &courses(), &PageSettings::default())
    }

    #[test]
    fn test_startup_source_priority() {
        let options = StartupOptions {
            file: Some(PathBuf::from("a.json")),
            table: Some("x.y".to_string()),
            ..Default::default()
        };
        assert!(matches!(options.source(), Some(TableSource::File { .. })));

        let options = StartupOptions {
            query: Some("select 1".to_string()),
            table: Some("x.y".to_string()),
            ..Default::default()
        };
        assert!(matches!(options.source(), Some(TableSource::Query { .. })));

        assert!(StartupOptions::default().source().is_none());
    }

    #[test]
    fn test_loaded_page_is_bound() {
        let mut page = page();
        assert!(page.input.is_some() && page.clear.is_some() && page.table.is_some());

        page.type_text("grade 1");
        let view = page.grid_view().unwrap();
        assert_eq!((view.visible_rows, view.total_rows), (2, 3));
        assert!(page.clear.is_some_and(|c| page.doc.is_displayed(c)));

        page.handle_search_event(SearchBarEvent::ClearClicked);
        assert_eq!(page.query_text(), "");
        assert_eq!(page.doc.focused(), page.input);
        assert_eq!(page.grid_view().unwrap().visible_rows, 3);
    }

    #[test]
    fn test_focus_events() {
        let mut page = page();
        page.handle_search_event(SearchBarEvent::Focused);
        assert_eq!(page.doc.focused(), page.input);
        page.handle_search_event(SearchBarEvent::Blurred);
        assert_eq!(page.doc.focused(), None);
    }
}
