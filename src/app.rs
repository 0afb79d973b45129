use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

use eframe::egui;
use tracing::info;

use crate::error::FetchError;
use crate::fetch::{FetchRequest, spawn_fetch};
use crate::interact::{pick, pointer_ray, toggle_tooltip};
use crate::layout::{SceneAssembly, build_assembly};
use crate::model::{DisplaySettings, ModelGraph};
use crate::palette::PaletteName;
use crate::render::run_frame;
use crate::scene::SceneHost;

/// Startup configuration resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub model_path: Option<PathBuf>,
    pub backend_url: String,
    pub palette: PaletteName,
}

pub struct VizApp {
    host: SceneHost,
    settings: DisplaySettings,
    model: Option<ModelGraph>,
    assembly: Option<SceneAssembly>,
    pending: Option<Receiver<Result<ModelGraph, FetchError>>>,
    error: Option<String>,
    model_path: String,
    backend_url: String,
}

impl VizApp {
    pub fn new(config: AppConfig) -> Self {
        let mut app = Self {
            host: SceneHost::new(),
            settings: DisplaySettings {
                color_palette: config.palette,
                ..DisplaySettings::default()
            },
            model: None,
            assembly: None,
            pending: None,
            error: None,
            model_path: config
                .model_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            backend_url: config.backend_url,
        };
        if let Some(path) = config.model_path {
            app.pending = Some(spawn_fetch(FetchRequest::LocalFile(path)));
        }
        app
    }

    fn install_model(&mut self, graph: ModelGraph) {
        info!(model = %graph.model_name, layers = graph.layers.len(), "model installed");
        self.model = Some(graph);
        self.error = None;
        self.rebuild();
    }

    /// The single rebuild path used by both first data arrival and settings
    /// changes: dispose whatever was installed, build from the cached layer
    /// list, reframe the camera.
    fn rebuild(&mut self) {
        if let Some(mut previous) = self.assembly.take() {
            previous.dispose();
        }
        if let Some(model) = &self.model {
            let assembly = build_assembly(&model.layers, &self.settings);
            self.host.frame(&assembly);
            self.assembly = Some(assembly);
        }
    }

    fn poll_fetch(&mut self) {
        let Some(receiver) = &self.pending else {
            return;
        };
        match receiver.try_recv() {
            Ok(Ok(graph)) => {
                self.pending = None;
                // Last arrival wins; rapid re-requests are not sequenced.
                self.install_model(graph);
            }
            Ok(Err(error)) => {
                self.pending = None;
                self.error = Some(error.to_string());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.error = Some("model fetch worker vanished".to_string());
            }
        }
    }

    fn status_line(&self) -> String {
        if self.pending.is_some() {
            return "Parsing model...".to_string();
        }
        if let Some(error) = &self.error {
            return format!("Error: {error}");
        }
        match &self.model {
            Some(model) => format!(
                "{} - {} params, {} layers",
                model.model_name,
                model.total_params,
                model.layers.len()
            ),
            None => "No model loaded.".to_string(),
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Model");
        ui.horizontal(|ui| {
            ui.label("File:");
            ui.text_edit_singleline(&mut self.model_path);
        });
        ui.horizontal(|ui| {
            if ui.button("Load JSON").clicked() && !self.model_path.is_empty() {
                self.pending = Some(spawn_fetch(FetchRequest::LocalFile(PathBuf::from(
                    &self.model_path,
                ))));
            }
            if ui.button("Upload to backend").clicked() && !self.model_path.is_empty() {
                self.pending = Some(spawn_fetch(FetchRequest::Upload {
                    backend_url: self.backend_url.clone(),
                    path: PathBuf::from(&self.model_path),
                }));
            }
        });
        ui.horizontal(|ui| {
            ui.label("Backend:");
            ui.text_edit_singleline(&mut self.backend_url);
        });

        ui.separator();
        ui.heading("Display");
        let before = self.settings;
        ui.checkbox(&mut self.settings.show_layer_names, "Show layer names");
        ui.checkbox(
            &mut self.settings.show_layer_dimensions,
            "Show layer dimensions",
        );
        egui::ComboBox::from_label("Palette")
            .selected_text(self.settings.color_palette.as_str())
            .show_ui(ui, |ui| {
                for name in PaletteName::ALL {
                    ui.selectable_value(&mut self.settings.color_palette, name, name.as_str());
                }
            });
        if self.settings != before {
            // Settings never re-fetch; they rebuild from the cached layers.
            self.rebuild();
        }

        ui.separator();
        if ui.button("Reset view").clicked() {
            self.host.camera.reset();
        }
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        if response.dragged() {
            self.host.camera.orbit(response.drag_delta());
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            self.host.camera.zoom(scroll);
        }
        if response.clicked() {
            if let (Some(pointer), Some(assembly)) =
                (response.interact_pointer_pos(), self.assembly.as_mut())
            {
                let view_projection = self.host.camera.view_projection(rect.aspect_ratio());
                if let Some(ray) = pointer_ray(&view_projection, rect, pointer)
                    && let Some(hit) = pick(ray, assembly)
                {
                    toggle_tooltip(assembly, hit);
                }
            }
        }

        run_frame(&painter, rect, &mut self.host, self.assembly.as_ref());

        if self.pending.is_some() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Parsing model...",
                egui::FontId::proportional(16.0),
                ui.visuals().text_color(),
            );
        }
    }
}

impl eframe::App for VizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetch();

        egui::SidePanel::left("controls").show(ctx, |ui| {
            self.draw_controls(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(self.status_line());
            ui.separator();
            self.draw_canvas(ui);
        });

        // Continuous render loop; no pausing or backoff.
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(assembly) = self.assembly.as_mut() {
            assembly.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LayerDescriptor;

    fn app_with_model() -> VizApp {
        let mut app = VizApp::new(AppConfig::default());
        app.install_model(ModelGraph {
            model_name: "m".to_string(),
            total_params: 42,
            layers: vec![
                LayerDescriptor::new("in", "InputLayer", "(None, 28, 28, 1)"),
                LayerDescriptor::new("c", "Conv2D", "(None, 26, 26, 32)"),
            ],
        });
        app
    }

    #[test]
    fn installing_a_model_builds_an_assembly() {
        let app = app_with_model();
        let assembly = app.assembly.as_ref().unwrap();
        assert_eq!(assembly.boxes.len(), 2);
        assert!(app.error.is_none());
    }

    #[test]
    fn settings_rebuild_reuses_cached_layers() {
        let mut app = app_with_model();
        let boxes_before = app.assembly.as_ref().unwrap().boxes.len();
        app.settings.show_layer_dimensions = false;
        app.rebuild();
        let assembly = app.assembly.as_ref().unwrap();
        assert_eq!(assembly.boxes.len(), boxes_before);
        assert!(assembly.size_labels.is_empty());
    }

    #[test]
    fn rebuild_without_model_clears_the_assembly() {
        let mut app = VizApp::new(AppConfig::default());
        app.rebuild();
        assert!(app.assembly.is_none());
    }
}
