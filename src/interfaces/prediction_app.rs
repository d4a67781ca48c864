use crate::application::system::{Application, PredictionRequest};
use crate::config::Config;
use crate::domain::errors::{PipelineError, PipelineStage};
use crate::interfaces::theme::{self, Palette};
use crate::interfaces::metrics_card::render_metric_card;
use crate::interfaces::view_models::prediction_view_model::{
    FailureViewModel, PredictionViewModel, format_feature, split_explanation,
};
use chrono::NaiveDate;
use crossbeam_channel::{Receiver, TryRecvError};
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use tracing::{error, info};

type RunOutcome = Result<PredictionViewModel, FailureViewModel>;

enum RunState {
    Idle,
    Running,
    Done(Box<PredictionViewModel>),
    Failed(FailureViewModel),
}

/// Desktop window: inputs on the left, the latest run on the right
pub struct PredictionApp {
    ticker: String,
    start: String,
    end: String,
    state: RunState,
    receiver: Option<Receiver<RunOutcome>>,
}

impl Default for PredictionApp {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionApp {
    pub fn new() -> Self {
        let today = chrono::Utc::now().date_naive();
        let two_years_ago = today - chrono::Duration::days(730);
        Self {
            ticker: "NVDA".to_string(),
            start: two_years_ago.to_string(),
            end: today.to_string(),
            state: RunState::Idle,
            receiver: None,
        }
    }

    fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running)
    }

    fn parse_date(label: &str, raw: &str) -> Result<NaiveDate, PipelineError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
            PipelineError::configuration(format!(
                "Invalid {} date '{}': {} (expected YYYY-MM-DD)",
                label, raw, e
            ))
        })
    }

    fn build_request(&self) -> Result<PredictionRequest, PipelineError> {
        PredictionRequest::new(
            &self.ticker,
            Self::parse_date("start", &self.start)?,
            Self::parse_date("end", &self.end)?,
        )
    }

    /// Validates inputs, then runs the pipeline on a background thread
    fn start_run(&mut self, ctx: &egui::Context) {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                self.state = RunState::Failed(FailureViewModel::from(&e));
                return;
            }
        };

        info!("UI: Starting run for {}", request.symbol);
        let (tx, rx) = crossbeam_channel::bounded(1);
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let outcome = execute(request);
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });

        self.receiver = Some(rx);
        self.state = RunState::Running;
    }

    fn poll_result(&mut self) {
        let Some(rx) = &self.receiver else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(view)) => {
                self.state = RunState::Done(Box::new(view));
                self.receiver = None;
            }
            Ok(Err(failure)) => {
                self.state = RunState::Failed(failure);
                self.receiver = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                let err = PipelineError::internal(
                    PipelineStage::Runtime,
                    anyhow::anyhow!("Background run ended without a result"),
                );
                self.state = RunState::Failed(FailureViewModel::from(&err));
                self.receiver = None;
            }
        }
    }

    fn render_inputs(&mut self, ui: &mut egui::Ui) {
        ui.add_space(theme::GAP);
        ui.heading(
            egui::RichText::new("Market Predict")
                .strong()
                .color(Palette::INK),
        );
        ui.add_space(theme::GAP);

        ui.label("Ticker");
        ui.text_edit_singleline(&mut self.ticker);
        ui.add_space(theme::GAP_TIGHT);

        ui.label("Start (YYYY-MM-DD)");
        ui.text_edit_singleline(&mut self.start);
        ui.add_space(theme::GAP_TIGHT);

        ui.label("End (YYYY-MM-DD)");
        ui.text_edit_singleline(&mut self.end);
        ui.add_space(theme::GAP);

        let running = self.is_running();
        ui.horizontal(|ui| {
            let run_clicked = ui
                .add_enabled(!running, egui::Button::new("Run prediction"))
                .clicked();
            if running {
                ui.spinner();
            }
            if run_clicked {
                self.start_run(ui.ctx());
            }
        });
    }

    fn render_banner(ui: &mut egui::Ui) {
        egui::Frame::NONE
            .fill(Palette::CAUTION.linear_multiply(0.15))
            .stroke(egui::Stroke::new(1.0, Palette::CAUTION))
            .corner_radius(theme::CORNER)
            .inner_margin(theme::GAP_TIGHT as i8)
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(
                        "Educational tool only. Not financial advice. Past performance does not \
                         predict future returns.",
                    )
                    .color(Palette::CAUTION),
                );
            });
    }

    fn render_failure(ui: &mut egui::Ui, failure: &FailureViewModel) {
        theme::card()
            .stroke(egui::Stroke::new(1.0, Palette::LOSS))
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(failure.title())
                        .strong()
                        .color(Palette::LOSS),
                );
                ui.label(&failure.message);
                if let Some(hint) = failure.hint() {
                    ui.label(egui::RichText::new(hint).color(Palette::INK_DIM));
                }
            });
    }

    fn render_result(ui: &mut egui::Ui, view: &PredictionViewModel) {
        let report = &view.report;

        ui.horizontal(|ui| {
            render_metric_card(
                ui,
                "Model MAE",
                &format!("{:.5}", report.mae_model),
                Some("Test segment"),
                Palette::INK,
            );
            render_metric_card(
                ui,
                "Baseline MAE",
                &format!("{:.5}", report.mae_baseline),
                Some("Always predicts 0%"),
                Palette::INK_DIM,
            );
            let as_of = format!("As of {}", report.as_of_date);
            render_metric_card(
                ui,
                "Next-day return",
                &view.predicted_return_text(),
                Some(as_of.as_str()),
                view.predicted_return_color(),
            );
        });

        ui.add_space(theme::GAP_TIGHT);
        let (verdict, color) = view.verdict();
        ui.colored_label(color, verdict);
        ui.label(
            egui::RichText::new(format!(
                "{}  |  {} to {}  |  train rows: {}  |  test rows: {}",
                report.ticker, report.start, report.end, report.n_train, report.n_test
            ))
            .color(Palette::INK_FAINT),
        );

        ui.add_space(theme::GAP_SECTION);
        ui.label(egui::RichText::new("Actual vs predicted (test segment)").size(18.0).strong());
        if let (Some(first), Some(last)) = (&view.first_test_date, &view.last_test_date) {
            ui.label(
                egui::RichText::new(format!("{} to {}", first, last))
                    .color(Palette::INK_FAINT),
            );
        }

        let actual = Line::new("Actual", PlotPoints::from(view.actual_points.clone()))
            .color(Palette::SERIES_ACTUAL)
            .width(2.0);
        let predicted = Line::new("Predicted", PlotPoints::from(view.predicted_points.clone()))
            .color(Palette::SERIES_PREDICTED)
            .width(2.0);

        Plot::new("actual_vs_predicted_plot")
            .height(260.0)
            .legend(Legend::default())
            .show_axes([true, true])
            .show_grid([true, true])
            .show(ui, |plot_ui| {
                plot_ui.line(actual);
                plot_ui.line(predicted);
            });

        ui.add_space(theme::GAP_SECTION);
        ui.label(egui::RichText::new("Latest feature snapshot").size(18.0).strong());
        ui.add_space(theme::GAP_TIGHT);

        egui::Grid::new("feature_snapshot_grid")
            .striped(true)
            .spacing([20.0, 6.0])
            .show(ui, |ui| {
                ui.strong("Feature");
                ui.strong("Value");
                ui.end_row();

                for (name, value) in &view.features {
                    ui.label(*name);
                    ui.label(format_feature(name, *value));
                    ui.end_row();
                }
            });

        ui.add_space(theme::GAP);
        egui::CollapsingHeader::new("How this works")
            .default_open(false)
            .show(ui, |ui| {
                ui.label("close_return: today's close over yesterday's, minus one.");
                ui.label("vol_14: sample standard deviation of the last 14 daily returns.");
                ui.label("sma_10 / sma_30: average close over the last 10 / 30 days.");
                ui.label("rsi_14: relative strength of gains against losses over 14 days (0-100).");
                ui.label("volume_change: today's volume over yesterday's, minus one.");
                ui.label("range_pct: (high - low) / close.");
                ui.add_space(theme::GAP_TIGHT);
                ui.label(split_explanation(view.train_pct));
            });
    }
}

/// Runs one request to completion on a private runtime
fn execute(request: PredictionRequest) -> RunOutcome {
    let outcome = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| PipelineError::internal(PipelineStage::Runtime, e))
        .and_then(|runtime| {
            runtime.block_on(async {
                let config = Config::from_env()
                    .map_err(|e| PipelineError::configuration(format!("{:#}", e)))?;
                let train_pct = config.evaluation.train_pct;
                let app = Application::build(config)?;
                let run = app.run(&request).await?;
                Ok::<_, PipelineError>(PredictionViewModel::from_run(&run, train_pct))
            })
        });

    outcome.map_err(|e| {
        error!("UI: Run failed: {}", e);
        FailureViewModel::from(&e)
    })
}

impl eframe::App for PredictionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(theme::visuals());
        self.poll_result();

        egui::SidePanel::left("inputs_panel")
            .default_width(240.0)
            .resizable(false)
            .show(ctx, |ui| self.render_inputs(ui));

        egui::CentralPanel::default()
            .frame(theme::content_frame())
            .show(ctx, |ui| {
                Self::render_banner(ui);
                ui.add_space(theme::GAP);

                egui::ScrollArea::vertical()
                    .id_salt("result_scroll")
                    .show(ui, |ui| match &self.state {
                        RunState::Idle => {
                            ui.label(
                                egui::RichText::new("Enter a ticker and a date range, then run.")
                                    .italics()
                                    .color(Palette::INK_FAINT),
                            );
                        }
                        RunState::Running => {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label("Fetching bars and training...");
                            });
                        }
                        RunState::Done(view) => Self::render_result(ui, view),
                        RunState::Failed(failure) => Self::render_failure(ui, failure),
                    });
            });
    }
}
