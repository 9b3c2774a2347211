/*!
 * GUI application for pyramid-rs - population pyramid chart builder
 *
 * A cross-platform desktop application providing:
 * - A form for the chart title, row data (JSON) and source
 * - A live preview of the generated chart
 * - SVG and JPG downloads of the displayed chart
 *
 * The last submitted form is restored on start-up.
 */

use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use pyramid_rs::export::{self, ExportFormat, ExportOutcome};
use pyramid_rs::storage::StateStore;
use pyramid_rs::{App, ChartError, LayoutConfig, viz};

const SAMPLE_DATA: &str = r#"[
  { "age": "0-4", "male": 1000, "female": 900 },
  { "age": "5-9", "male": 800, "female": 1200 }
]"#;

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 950.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Population Pyramid - pyramid-rs"),
        ..Default::default()
    };

    eframe::run_native(
        "Population Pyramid",
        options,
        Box::new(|_cc| Ok(Box::new(PyramidApp::new()))),
    )
}

/// Main application state
struct PyramidApp {
    app: App,

    // Preview of the displayed chart; rebuilt whenever the chart is replaced
    preview: Option<egui::TextureHandle>,
    preview_dirty: bool,

    // UI state
    status_message: String,
    error_message: String,

    // Background exports report here; each export is independent
    pending_exports: usize,
    operation_sender: mpsc::Sender<OperationResult>,
    operation_receiver: mpsc::Receiver<OperationResult>,
}

#[derive(Debug)]
enum OperationResult {
    Success(String),
    Error(String),
}

impl PyramidApp {
    fn new() -> Self {
        let store = StateStore::open_default();
        let mut app = App::new(LayoutConfig::default(), Some(store));
        let mut error_message = String::new();
        let mut status_message = String::new();
        match app.restore() {
            Ok(true) => status_message = "Restored the last chart.".to_string(),
            Ok(false) => {}
            Err(err) => error_message = format!("Could not read saved inputs: {:#}", err),
        }
        if app.form.data.is_empty() && app.chart().is_none() {
            app.form.data = SAMPLE_DATA.to_string();
        }

        let (sender, receiver) = mpsc::channel();
        Self {
            preview_dirty: app.chart().is_some(),
            app,
            preview: None,
            status_message,
            error_message,
            pending_exports: 0,
            operation_sender: sender,
            operation_receiver: receiver,
        }
    }

    fn generate(&mut self) {
        match self.app.submit() {
            Ok(chart) => {
                self.status_message = format!("Generated \"{}\".", chart.title);
                self.error_message.clear();
                self.preview_dirty = true;
            }
            Err(ChartError::MissingField(_)) => {
                self.error_message = "Please provide title and data".to_string();
            }
            Err(err) => {
                self.error_message = format!("Cannot draw chart: {}", err);
            }
        }
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        if !self.preview_dirty {
            return;
        }
        self.preview_dirty = false;
        let Some(tree) = self.app.tree() else {
            self.preview = None;
            return;
        };
        match viz::render_rgb(tree, tree.width, tree.height) {
            Ok(rgb) => {
                let image = egui::ColorImage::from_rgb(
                    [tree.width as usize, tree.height as usize],
                    &rgb,
                );
                self.preview =
                    Some(ctx.load_texture("pyramid-chart", image, egui::TextureOptions::LINEAR));
            }
            Err(err) => {
                self.error_message = format!("Preview failed: {:#}", err);
                self.preview = None;
            }
        }
    }

    fn start_export(&mut self, format: ExportFormat) {
        // Guarded by the disabled buttons, but exporting nothing is harmless anyway.
        let Some(chart) = self.app.chart() else {
            return;
        };
        let (label, ext) = match format {
            ExportFormat::Svg => ("SVG", ["svg"]),
            ExportFormat::Jpeg => ("JPEG", ["jpg"]),
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(label, &ext)
            .set_file_name(chart.file_name(format))
            .save_file()
        else {
            return;
        };

        // The export owns a snapshot; a newer chart does not affect it.
        let tree = chart.tree.clone();
        let sender = self.operation_sender.clone();
        self.pending_exports += 1;
        self.status_message = format!("Exporting {}...", label);

        thread::spawn(move || {
            let result = perform_export(tree, path, format);
            let _ = sender.send(result);
        });
    }

    fn check_operation_results(&mut self) {
        while let Ok(result) = self.operation_receiver.try_recv() {
            self.pending_exports = self.pending_exports.saturating_sub(1);
            match result {
                OperationResult::Success(message) => {
                    self.status_message = message;
                    self.error_message.clear();
                }
                OperationResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }
}

impl eframe::App for PyramidApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background exports
        self.check_operation_results();
        self.refresh_preview(ctx);

        // Request repaint while exporting (for spinner animation)
        if self.pending_exports > 0 {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Population Pyramid");
                ui.add_space(10.0);

                // Form
                ui.group(|ui| {
                    ui.label("Chart Input");
                    ui.add_space(5.0);

                    ui.horizontal(|ui| {
                        ui.label("Title:");
                        ui.text_edit_singleline(&mut self.app.form.title)
                            .on_hover_text("Shown above the chart and used in export file names");
                    });

                    ui.label("Data:");
                    ui.add(
                        egui::TextEdit::multiline(&mut self.app.form.data)
                            .code_editor()
                            .desired_rows(8)
                            .desired_width(f32::INFINITY),
                    )
                    .on_hover_text(
                        "JSON array of rows: [{ \"age\": \"0-4\", \"male\": 1000, \"female\": 900 }, ...]",
                    );

                    ui.horizontal(|ui| {
                        ui.label("Source:");
                        ui.text_edit_singleline(&mut self.app.form.source)
                            .on_hover_text("Optional citation shown bottom-right");
                    });
                });

                ui.add_space(10.0);

                // Action buttons
                let has_chart = self.app.chart().is_some();
                ui.horizontal(|ui| {
                    if ui.button("Generate chart").clicked() {
                        self.generate();
                    }
                    if ui
                        .add_enabled(has_chart, egui::Button::new("Download SVG"))
                        .clicked()
                    {
                        self.start_export(ExportFormat::Svg);
                    }
                    if ui
                        .add_enabled(has_chart, egui::Button::new("Download JPG"))
                        .clicked()
                    {
                        self.start_export(ExportFormat::Jpeg);
                    }

                    if self.pending_exports > 0 {
                        ui.spinner();
                        ui.label("Exporting...");
                    }
                });

                ui.add_space(10.0);

                // Status messages
                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }

                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }

                ui.add_space(10.0);

                // Preview
                if let Some(texture) = &self.preview {
                    egui::ScrollArea::horizontal().show(ui, |ui| {
                        ui.image(egui::load::SizedTexture::from_handle(texture));
                    });
                }
            });
        });
    }
}

fn perform_export(
    tree: pyramid_rs::DrawingTree,
    path: PathBuf,
    format: ExportFormat,
) -> OperationResult {
    match export::export(Some(&tree), &path, format) {
        Ok(ExportOutcome::Written { path, bytes }) => {
            OperationResult::Success(format!("Saved {} ({} bytes)", path.display(), bytes))
        }
        Ok(ExportOutcome::NothingToExport) => {
            OperationResult::Success("Nothing to export yet.".to_string())
        }
        Err(err) => OperationResult::Error(format!("Export failed: {:#}", err)),
    }
}
