use eframe::egui::{self, Ui};

use crate::data::DatasetName;
use crate::pages::{Page, PAGES};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the page list, plus the search box while the catalogue is open.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Film dashboard");
    ui.separator();

    for entry in &PAGES {
        let selected = state.current_page == entry.page;
        if ui.selectable_label(selected, entry.label()).clicked() && !selected {
            state.select_page(entry.page);
        }
    }

    if state.current_page == Page::Catalogue {
        ui.separator();
        ui.strong("Search titles");
        let mut query = state.context.catalogue_query.clone();
        if ui.text_edit_singleline(&mut query).changed() {
            state.set_catalogue_query(query);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open output folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload page").clicked() {
                state.select_page(state.current_page);
                ui.close_menu();
            }
        });

        ui.separator();

        let loader = &state.context.loader;
        ui.label(format!("Output: {}", loader.output_dir().display()));

        ui.separator();

        let status: Vec<String> = DatasetName::ALL
            .iter()
            .map(|name| {
                let mark = if loader.is_cached(name.file_name()) { "✔" } else { "–" };
                format!("{mark} {name}")
            })
            .collect();
        ui.label(format!("{} datasets loaded", loader.cached_names().len()))
            .on_hover_text(status.join("\n"));
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open output folder")
        .set_directory(state.context.loader.output_dir())
        .pick_folder();

    if let Some(dir) = folder {
        state.set_output_dir(dir);
    }
}
