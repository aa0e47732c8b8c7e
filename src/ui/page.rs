use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::pages::{Block, PageView, TableView};
use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel – the selected page
// ---------------------------------------------------------------------------

/// Render the selected page, or the error that stopped it.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let title = state.current_page.title();
    match state.current_view() {
        Ok(view) => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    page(ui, view);
                });
        }
        Err(msg) => {
            ui.heading(title);
            ui.separator();
            ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
        }
    }
}

fn page(ui: &mut Ui, view: &PageView) {
    ui.heading(&view.title);
    ui.separator();
    blocks(ui, &view.blocks);
}

fn blocks(ui: &mut Ui, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading(text) => {
                ui.add_space(4.0);
                ui.label(RichText::new(text).strong().size(16.0));
            }
            Block::Note(text) => {
                ui.label(RichText::new(text).italics());
            }
            Block::Chart(spec) => plot::bar_chart(ui, spec),
            Block::Table(view) => table(ui, view),
            Block::Columns { ratio, left, right } => {
                columns(ui, *ratio, left, right);
            }
            Block::Divider => {
                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);
            }
        }
    }
}

fn columns(ui: &mut Ui, ratio: f32, left: &[Block], right: &[Block]) {
    let spacing = ui.spacing().item_spacing.x;
    let total = ui.available_width();
    let left_width = ((total - spacing) * ratio.clamp(0.1, 0.9)).max(0.0);
    let right_width = (total - spacing - left_width).max(0.0);

    ui.horizontal_top(|ui: &mut Ui| {
        ui.allocate_ui_with_layout(
            egui::vec2(left_width, 0.0),
            Layout::top_down(Align::Min),
            |ui: &mut Ui| {
                ui.set_width(left_width);
                blocks(ui, left);
            },
        );
        ui.allocate_ui_with_layout(
            egui::vec2(right_width, 0.0),
            Layout::top_down(Align::Min),
            |ui: &mut Ui| {
                ui.set_width(right_width);
                blocks(ui, right);
            },
        );
    });
}

fn table(ui: &mut Ui, view: &TableView) {
    ui.push_id(&view.id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), view.columns.len())
            .header(20.0, |mut header| {
                for name in &view.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in &view.rows {
                    body.row(18.0, |mut cells| {
                        for cell in row {
                            cells.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
    ui.add_space(8.0);
}
