/*!
 * Desktop viewer for chartgrid configurations.
 *
 * Opens a JSON configuration (from the command line or a file picker),
 * renders it and shows the grid in a window. The rendered grid can be saved
 * as SVG or PNG.
 */

use anyhow::{Context, Result};
use chartgrid::{Config, Figure, RenderSettings, viz};
use clap::Parser;
use eframe::egui;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "chartgrid-view", version, about = "Display a chart grid configuration")]
struct Cli {
    /// Configuration file to open on start; the built-in sample otherwise.
    config: Option<PathBuf>,
    /// Locale for tick labels.
    #[arg(long, default_value = "en")]
    locale: String,
    /// TrueType/OpenType font file used for all text.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 900.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("chartgrid"),
        ..Default::default()
    };

    let settings = RenderSettings {
        locale: cli.locale,
        font: cli.font,
        ..RenderSettings::default()
    };
    eframe::run_native(
        "chartgrid",
        options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(&cc.egui_ctx, cli.config, settings)))),
    )
}

struct ViewerApp {
    /// `None` shows the built-in sample.
    path: Option<PathBuf>,
    settings: RenderSettings,
    figure: Option<Figure>,
    texture: Option<egui::TextureHandle>,
    status_message: String,
    error_message: String,
}

impl ViewerApp {
    fn new(ctx: &egui::Context, path: Option<PathBuf>, settings: RenderSettings) -> Self {
        let mut app = Self {
            path,
            settings,
            figure: None,
            texture: None,
            status_message: String::new(),
            error_message: String::new(),
        };
        app.reload(ctx);
        app
    }

    fn reload(&mut self, ctx: &egui::Context) {
        match load_figure(self.path.as_deref()) {
            Ok(figure) => match viz::rasterize(&figure, &self.settings) {
                Ok((w, h, pixels)) => {
                    let image = egui::ColorImage::from_rgb([w as usize, h as usize], &pixels);
                    self.texture =
                        Some(ctx.load_texture("chart-grid", image, egui::TextureOptions::LINEAR));
                    self.figure = Some(figure);
                    self.status_message = format!("{} ({w}x{h})", self.source_name());
                    self.error_message.clear();
                }
                Err(err) => self.fail(format!("{err:#}")),
            },
            Err(err) => self.fail(format!("{err:#}")),
        }
    }

    fn fail(&mut self, message: String) {
        log::error!("{message}");
        // A failed pass never shows a partial figure.
        self.figure = None;
        self.texture = None;
        self.status_message.clear();
        self.error_message = message;
    }

    fn source_name(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "built-in sample".to_string(),
        }
    }

    fn save_as(&mut self) {
        let Some(figure) = &self.figure else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .add_filter("SVG image", &["svg"])
            .set_file_name("chartgrid.png")
            .save_file()
        else {
            return;
        };
        match viz::save(figure, &path, &self.settings) {
            Ok(()) => self.status_message = format!("Saved {}", path.display()),
            Err(err) => self.error_message = format!("{err:#}"),
        }
    }
}

fn load_figure(path: Option<&Path>) -> Result<Figure> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            Config::from_json_str(&text)?
        }
        None => Config::from_json_str(chartgrid::SAMPLE_CONFIG)?,
    };
    Ok(chartgrid::render(&config)?)
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open…").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("JSON configuration", &["json"])
                        .pick_file()
                {
                    self.path = Some(path);
                    self.reload(ctx);
                }
                if ui.button("Reload").clicked() {
                    self.reload(ctx);
                }
                if ui
                    .add_enabled(self.figure.is_some(), egui::Button::new("Save image…"))
                    .clicked()
                {
                    self.save_as();
                }
                ui.separator();
                ui.label(&self.status_message);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.error_message);
            }
            if let Some(texture) = &self.texture {
                egui::ScrollArea::both().show(ui, |ui| {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                });
            }
        });
    }
}
