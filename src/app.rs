use eframe::egui;
use egui::{Color32, ColorImage, Rect, Sense, Stroke, TextureHandle, TextureOptions};

use tileseted::view::tile_rgba;
use tileseted::{
    ClickOutcome, EditorSettings, MoveKind, OrderEngine, TileError, log_err, log_info,
};

const TITLEBAR: &str = "TileSet Editor - tileseted";
/// Width reserved next to the grid for the row scrollbar.
pub const SCROLLBAR_WIDTH: f32 = 18.0;
/// Height reserved above the grid for the toolbar.
pub const TOOLBAR_HEIGHT: f32 = 36.0;

/// Modal dialog currently shown (at most one at a time).
enum PendingDialog {
    None,
    ConfirmSave { exchanges: usize },
    ConfirmReload,
    ConfirmExit,
    Error(String),
}

pub struct TileSetApp {
    settings: EditorSettings,
    /// `None` when the tile directory could not be loaded.
    engine: Option<OrderEngine>,

    /// One texture per catalog slot; `None` for tiles of the wrong size.
    textures: Vec<Option<TextureHandle>>,
    textures_stale: bool,

    /// First visible grid row.
    scroll_row: usize,
    dialog: PendingDialog,
    status: String,

    /// True after the user confirmed leaving with unsaved edits.
    force_exit: bool,
}

impl TileSetApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: EditorSettings) -> Self {
        let mut app = Self {
            settings,
            engine: None,
            textures: Vec::new(),
            textures_stale: true,
            scroll_row: 0,
            dialog: PendingDialog::None,
            status: String::new(),
            force_exit: false,
        };
        app.open_dir(app.settings.tile_dir.clone());
        app
    }

    /// Replace the session with a fresh load of `dir`.
    fn open_dir(&mut self, dir: std::path::PathBuf) {
        match OrderEngine::load(&dir) {
            Ok(engine) => {
                let odd = engine.catalog().report_size_mismatches(self.settings.tile_bytes());
                self.status = format!("{} tiles in {}", engine.len(), dir.display());
                if odd > 0 {
                    self.status.push_str(&format!(" ({} of unexpected size)", odd));
                }
                self.engine = Some(engine);
                self.settings.tile_dir = dir;
                self.after_reload();
            }
            Err(e) => {
                log_err!("Could not open {}: {}", dir.display(), e);
                self.status = format!("No palette loaded from {}", dir.display());
                self.show_error(&e);
            }
        }
    }

    fn after_reload(&mut self) {
        self.textures_stale = true;
        if let Some(engine) = &self.engine {
            self.scroll_row = self.scroll_row.min(self.settings.layout().max_scroll(engine.len()));
        }
    }

    fn show_error(&mut self, e: &TileError) {
        self.dialog = PendingDialog::Error(e.to_string());
    }

    fn is_dirty(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.is_dirty())
    }

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------

    fn on_click(&mut self, position: Option<usize>, kind: MoveKind) {
        let Some(engine) = self.engine.as_mut() else { return };
        // Misses past the grid edge behave like clicks past the last tile.
        let position = position.unwrap_or(usize::MAX);
        match engine.click(position, kind) {
            Ok(ClickOutcome::Moved { kind, src, dst }) => {
                self.status = format!("{:?} tile {} \u{2192} {}", kind, src + 1, dst + 1);
            }
            Ok(_) => {}
            Err(e) => self.show_error(&e),
        }
    }

    fn request_reload(&mut self) {
        if self.is_dirty() && self.settings.confirm_discard {
            self.dialog = PendingDialog::ConfirmReload;
        } else {
            self.reload();
        }
    }

    fn reload(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            self.open_dir(self.settings.tile_dir.clone());
            return;
        };
        match engine.reload() {
            Ok(()) => {
                self.status = format!("Reloaded {} tiles", engine.len());
                self.after_reload();
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn request_save(&mut self) {
        let Some(engine) = &self.engine else { return };
        if !engine.is_dirty() {
            return;
        }
        if self.settings.confirm_save {
            self.dialog = PendingDialog::ConfirmSave {
                exchanges: engine.pending_exchanges(),
            };
        } else {
            self.save();
        }
    }

    /// Commit, then rescan the directory since every touched name changed.
    fn save(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else { return false };
        let result = engine.save().and_then(|report| engine.reload().map(|()| report));
        match result {
            Ok(report) => {
                log_info!("Saved tile order ({} renames)", report.renames());
                self.status = format!("Saved ({} renames)", report.renames());
                self.after_reload();
                true
            }
            Err(e) => {
                self.status = if e.needs_reload() {
                    "Save incomplete: press R to reload".to_string()
                } else {
                    "Save failed".to_string()
                };
                self.show_error(&e);
                false
            }
        }
    }

    fn pick_folder(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_directory(&self.settings.tile_dir)
            .pick_folder();
        if let Some(dir) = picked {
            self.scroll_row = 0;
            self.open_dir(dir);
            if self.engine.is_some() {
                self.settings.save();
            }
        }
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    fn ensure_textures(&mut self, ctx: &egui::Context) {
        if !self.textures_stale {
            return;
        }
        self.textures_stale = false;
        self.textures.clear();
        let Some(engine) = &self.engine else { return };

        let dim = self.settings.tile_dimension;
        let bpp = self.settings.bytes_per_pixel;
        self.textures = engine
            .catalog()
            .files()
            .iter()
            .enumerate()
            .map(|(slot, rec)| {
                let rgba = tile_rgba(&rec.bytes, dim, bpp)?;
                let image = ColorImage::from_rgba_unmultiplied([dim, dim], &rgba);
                Some(ctx.load_texture(format!("tile_{}", slot), image, TextureOptions::NEAREST))
            })
            .collect();
    }

    fn window_title(&self) -> String {
        let mut title = TITLEBAR.to_string();
        if let Some(engine) = &self.engine {
            if let Some(p) = engine.selection().pending() {
                title.push_str(&format!(" (tile {})", p + 1));
            }
            if engine.is_dirty() {
                title.push('*');
            }
        }
        title
    }

    /// Paint the visible grid; returns the clicked position and button.
    fn show_grid(&mut self, ui: &mut egui::Ui) -> Option<(Option<usize>, MoveKind)> {
        let layout = self.settings.layout();
        let (w, h) = layout.viewport_size();
        let count = self.engine.as_ref().map_or(0, |e| e.len());
        let max_scroll = layout.max_scroll(count);
        let mut clicked = None;

        ui.horizontal(|ui| {
            let (rect, response) = ui.allocate_exact_size(egui::vec2(w, h), Sense::click());
            let painter = ui.painter_at(rect.expand(layout.padding as f32));
            painter.rect_filled(rect.expand(layout.padding as f32), 0.0, Color32::BLACK);

            if let Some(engine) = &self.engine {
                let view = engine.view();
                let dim = layout.dimension as f32;
                for (col, row, position) in layout.visible_cells(self.scroll_row, view.len()) {
                    let (x, y) = layout.cell_origin(col, row);
                    let cell = Rect::from_min_size(rect.min + egui::vec2(x, y), egui::vec2(dim, dim));
                    if view.selected() == Some(position) {
                        painter.rect_filled(cell.expand(layout.padding as f32), 0.0, Color32::WHITE);
                    }
                    let texture = view
                        .tile(position)
                        .and_then(|(slot, _)| self.textures.get(slot))
                        .and_then(Option::as_ref);
                    match texture {
                        Some(tex) => {
                            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                            painter.image(tex.id(), cell, uv, Color32::WHITE);
                        }
                        None => {
                            painter.rect_filled(cell, 0.0, Color32::DARK_GRAY);
                            let stroke = Stroke::new(1.0, Color32::LIGHT_RED);
                            painter.line_segment([cell.left_top(), cell.right_bottom()], stroke);
                            painter.line_segment([cell.right_top(), cell.left_bottom()], stroke);
                        }
                    }
                }
            }

            if response.hovered() {
                let wheel = ui.input(|i| i.scroll_delta.y);
                if wheel > 0.5 {
                    self.scroll_row = self.scroll_row.saturating_sub(1);
                } else if wheel < -0.5 {
                    self.scroll_row = (self.scroll_row + 1).min(max_scroll);
                }
            }

            let kind = if response.clicked() {
                Some(MoveKind::Insert)
            } else if response.secondary_clicked() {
                Some(MoveKind::Swap)
            } else {
                None
            };
            if let (Some(kind), Some(pos)) = (kind, response.interact_pointer_pos()) {
                let local = pos - rect.min;
                clicked = Some((layout.position_at(local.x, local.y, self.scroll_row), kind));
            }

            // Top of the bar is row 0.
            let mut inverted = max_scroll - self.scroll_row.min(max_scroll);
            ui.add_enabled(
                max_scroll > 0,
                egui::Slider::new(&mut inverted, 0..=max_scroll)
                    .vertical()
                    .show_value(false),
            );
            self.scroll_row = max_scroll - inverted;
        });

        clicked
    }

    /// Draw the active modal dialog and act on its buttons.
    fn show_dialog(&mut self, ctx: &egui::Context) {
        let mut confirmed = false;
        let mut discard = false;
        let mut close = false;

        let (title, text): (&str, String) = match &self.dialog {
            PendingDialog::None => return,
            PendingDialog::ConfirmSave { exchanges } => (
                "Save Changes",
                format!(
                    "Do you really want to save your changes?\n{} file rename(s) will be made.",
                    exchanges * 3
                ),
            ),
            PendingDialog::ConfirmReload => (
                "Reload Tiles",
                "You have made changes that will be forgotten. Continue anyway?".to_string(),
            ),
            PendingDialog::ConfirmExit => (
                "Unsaved Changes",
                "Do you want to save your changes?".to_string(),
            ),
            PendingDialog::Error(msg) => ("Error", msg.clone()),
        };
        let is_exit = matches!(self.dialog, PendingDialog::ConfirmExit);
        let is_error = matches!(self.dialog, PendingDialog::Error(_));

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(text);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if is_error {
                        close = ui.button("OK").clicked();
                    } else if is_exit {
                        confirmed = ui.button("Save").clicked();
                        discard = ui.button("Don't Save").clicked();
                        close = ui.button("Cancel").clicked();
                    } else {
                        confirmed = ui.button("Yes").clicked();
                        close = ui.button("No").clicked();
                    }
                });
            });

        if close {
            self.dialog = PendingDialog::None;
            return;
        }
        if !(confirmed || discard) {
            return;
        }

        let dialog = std::mem::replace(&mut self.dialog, PendingDialog::None);
        match dialog {
            PendingDialog::ConfirmSave { .. } => {
                self.save();
            }
            PendingDialog::ConfirmReload => self.reload(),
            PendingDialog::ConfirmExit => {
                if discard || self.save() {
                    self.force_exit = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
            PendingDialog::None | PendingDialog::Error(_) => {}
        }
    }
}

impl eframe::App for TileSetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));

        // --- Intercept OS window-close button ---
        if ctx.input(|i| i.viewport().close_requested())
            && !self.force_exit
            && self.is_dirty()
            && self.settings.confirm_discard
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.dialog = PendingDialog::ConfirmExit;
        }

        self.ensure_textures(ctx);

        // --- Keyboard: R reloads, S saves, Esc drops the selection ---
        if matches!(self.dialog, PendingDialog::None) {
            let (reload, save, escape) = ctx.input(|i| {
                (
                    i.key_pressed(egui::Key::R),
                    i.key_pressed(egui::Key::S),
                    i.key_pressed(egui::Key::Escape),
                )
            });
            if reload {
                self.request_reload();
            } else if save {
                self.request_save();
            } else if escape && let Some(engine) = self.engine.as_mut() {
                engine.cancel_selection();
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let dirty = self.is_dirty();
                if ui
                    .add_enabled(!dirty, egui::Button::new("Open folder\u{2026}"))
                    .on_disabled_hover_text("Save or reload first")
                    .clicked()
                {
                    self.pick_folder();
                }
                if ui.button("Reload (R)").clicked() {
                    self.request_reload();
                }
                if ui.add_enabled(dirty, egui::Button::new("Save (S)")).clicked() {
                    self.request_save();
                }
                ui.separator();
                ui.label(&self.status);
            });
        });

        let modal_open = !matches!(self.dialog, PendingDialog::None);
        let frame = egui::Frame::central_panel(&ctx.style())
            .inner_margin(self.settings.window_padding as f32);
        let clicked = egui::CentralPanel::default()
            .frame(frame)
            .show(ctx, |ui| self.show_grid(ui))
            .inner;
        if let Some((position, kind)) = clicked
            && !modal_open
        {
            self.on_click(position, kind);
        }

        self.show_dialog(ctx);
    }
}
