//! Main application UI and state management.
//! Handles card creation, import/export, and review sessions over due cards.

use chrono::NaiveDate;
use eframe::egui;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use study_cards::clock::ClockMode;
use study_cards::config::Config;
use study_cards::database::db::{self, CardStats};
use study_cards::export::json::{export_cards_to_path, import_cards, parse_card_batch};
use study_cards::{CardStore, Error, NewCard, Quality, ReviewCard, ReviewSession, clock};

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Review,
}

/// Main application state
pub struct StudyApp {
    conn: Arc<Mutex<Connection>>,
    owner: String,
    clock_mode: ClockMode,

    show_confirmation_dialog: bool,
    allowed_to_close: bool,

    today: Option<NaiveDate>,
    stats: CardStats,
    new_front: String,
    new_back: String,

    current_screen: AppScreen,
    review_session: Option<ReviewSession>,

    show_paste_dialog: bool,
    pasted_batch: String,

    show_message_dialog: bool,
    message: String,
}

impl eframe::App for StudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Review => self.render_review_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_paste_dialog {
            let mut action_import = false;
            let mut should_cancel = false;

            egui::Window::new("Paste Generated Cards")
                .collapsible(false)
                .resizable(true)
                .show(ctx, |ui| {
                    ui.label("Paste a reply containing [{\"front\": ..., \"back\": ...}]:");
                    ui.add(
                        egui::TextEdit::multiline(&mut self.pasted_batch)
                            .desired_rows(10)
                            .desired_width(f32::INFINITY),
                    );
                    ui.horizontal(|ui| {
                        if ui.button("Add Cards").clicked() {
                            action_import = true;
                        }
                        if ui.button("Cancel").clicked() {
                            should_cancel = true;
                        }
                    });
                });

            if action_import {
                self.handle_pasted_batch();
            }
            if should_cancel {
                self.show_paste_dialog = false;
            }
        }

        if self.show_message_dialog {
            egui::Window::new("Study Cards")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_message_dialog = false;
                    }
                });
        }
    }
}

impl StudyApp {
    pub fn new(conn: Connection, config: &Config) -> Self {
        let mut app = Self {
            conn: Arc::new(Mutex::new(conn)),
            owner: config.owner.clone(),
            clock_mode: config.clock,
            show_confirmation_dialog: false,
            allowed_to_close: false,
            today: None,
            stats: CardStats::default(),
            new_front: String::new(),
            new_back: String::new(),
            current_screen: AppScreen::Main,
            review_session: None,
            show_paste_dialog: false,
            pasted_batch: String::new(),
            show_message_dialog: false,
            message: String::new(),
        };
        app.refresh_stats();
        app
    }

    /// A panic while holding the lock leaves the connection itself usable
    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.show_message_dialog = true;
    }

    /// Rejects the action that produced `err` and tells the user why
    fn report(&mut self, action: &str, err: Error) {
        tracing::warn!("{} failed: {}", action, err);
        self.show_message(format!("{} failed: {}", action, err));
    }

    /// Re-reads today's date and the card counts
    fn refresh_stats(&mut self) {
        let result = {
            let conn = self.lock_conn();
            clock::today(self.clock_mode, &conn).and_then(|today| {
                db::card_stats(&self.owner, today, &conn).map(|stats| (today, stats))
            })
        };

        match result {
            Ok((today, stats)) => {
                self.today = Some(today);
                self.stats = stats;
            }
            Err(e) => tracing::warn!("Could not load card stats: {}", e),
        }
    }

    /// Renders the main screen with card management interface
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut action_next_day = false;
            let mut action_create = false;
            let mut action_export = false;
            let mut action_import = false;
            let mut action_review = false;

            ui.horizontal(|ui| {
                match self.today {
                    Some(today) => ui.label(today.format("%Y-%m-%d").to_string()),
                    None => ui.label("Unknown date"),
                };

                if self.clock_mode == ClockMode::Simulated && ui.button("Next Day").clicked() {
                    action_next_day = true;
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export Cards").clicked() {
                    action_export = true;
                }
                if ui.button("Import Cards").clicked() {
                    action_import = true;
                }
                if ui.button("Paste Generated Cards").clicked() {
                    self.show_paste_dialog = true;
                }
            });

            ui.separator();

            ui.heading("Create New Card");
            ui.horizontal(|ui| {
                ui.label("Front:");
                ui.text_edit_singleline(&mut self.new_front);
            });
            ui.horizontal(|ui| {
                ui.label("Back:");
                ui.text_edit_singleline(&mut self.new_back);
            });
            if ui.button("Create Card").clicked() {
                action_create = true;
            }

            ui.separator();

            ui.heading(format!(
                "Cards: {} total, {} due today",
                self.stats.total, self.stats.due
            ));

            ui.add_space(10.0);

            if self.stats.due > 0 {
                if ui.button("Start Review").clicked() {
                    action_review = true;
                }
            } else {
                ui.label("No cards to review. Create new cards or wait for the next ones.");
            }

            // Execute deferred actions
            if action_next_day {
                self.handle_next_day();
            }
            if action_create {
                self.handle_create_card();
            }
            if action_export {
                self.handle_export();
            }
            if action_import {
                self.handle_import();
            }
            if action_review {
                self.start_review_session();
            }
        });
    }

    /// Renders the review screen with the current due card
    fn render_review_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut action_flip = false;
            let mut action_answer: Option<Quality> = None;
            let mut action_skip = false;
            let mut action_back = false;

            match self.review_session.as_ref() {
                Some(session) if !session.is_empty() => {
                    ui.label(session.position_message());
                    ui.add_space(20.0);

                    if let Some(card) = session.current_card() {
                        let show_back = session.show_back;
                        ui.group(|ui| {
                            ui.set_min_height(200.0);
                            ui.vertical_centered(|ui| {
                                ui.add_space(20.0);

                                ui.heading("Front:");
                                ui.label(&card.front);

                                ui.add_space(20.0);

                                if show_back {
                                    ui.heading("Answer:");
                                    ui.label(&card.back);
                                } else {
                                    ui.label("(Click 'Show Answer' to reveal)");
                                }

                                ui.add_space(20.0);
                            });
                        });

                        ui.add_space(20.0);

                        if show_back {
                            ui.label("How well did you remember it?");
                            ui.horizontal(|ui| {
                                for quality in Quality::ALL {
                                    if ui.button(quality.label()).clicked() {
                                        action_answer = Some(quality);
                                    }
                                }
                            });
                        } else if ui.button("Show Answer").clicked() {
                            action_flip = true;
                        }

                        if ui.button("Skip").clicked() {
                            action_skip = true;
                        }
                    }
                }
                _ => {
                    ui.heading("Congratulations!");
                    ui.label("You've reviewed all of today's cards!");
                }
            }

            ui.add_space(20.0);

            if ui.button("Back to Main Screen").clicked() {
                action_back = true;
            }

            // Execute deferred actions
            if action_flip {
                if let Some(session) = self.review_session.as_mut() {
                    session.flip();
                }
            }
            if let Some(quality) = action_answer {
                self.handle_answer(quality);
            }
            if action_skip {
                let wrapped = self
                    .review_session
                    .as_mut()
                    .is_some_and(|session| session.skip());
                if wrapped {
                    self.reload_session();
                }
            }
            if action_back {
                self.current_screen = AppScreen::Main;
                self.review_session = None;
                self.refresh_stats();
            }
        });
    }

    fn load_due_cards(&self) -> study_cards::Result<Vec<ReviewCard>> {
        let conn = self.lock_conn();
        let today = clock::today(self.clock_mode, &conn)?;
        conn.list_due(&self.owner, today)
    }

    /// Starts a review session with cards due today
    fn start_review_session(&mut self) {
        match self.load_due_cards() {
            Ok(cards) if !cards.is_empty() => {
                tracing::info!("Starting review of {} due cards", cards.len());
                self.review_session = Some(ReviewSession::new(cards));
                self.current_screen = AppScreen::Review;
            }
            Ok(_) => self.refresh_stats(),
            Err(e) => self.report("Loading due cards", e),
        }
    }

    /// Schedules and stores the answer, re-fetching the due list after the last card
    fn handle_answer(&mut self, quality: Quality) {
        let result = {
            let Some(session) = self.review_session.as_mut() else {
                return;
            };
            let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            clock::today(self.clock_mode, &conn)
                .and_then(|today| session.answer(quality, today, &*conn))
        };

        match result {
            Ok(Some(outcome)) if outcome.wrapped => self.reload_session(),
            Ok(_) => {}
            Err(Error::Conflict { id }) => {
                tracing::warn!("Card {} changed elsewhere, reloading due cards", id);
                self.reload_session();
            }
            Err(e) => self.report("Saving answer", e),
        }
    }

    /// Replaces the session's cards with the current due list
    fn reload_session(&mut self) {
        match self.load_due_cards() {
            Ok(cards) => {
                if let Some(session) = self.review_session.as_mut() {
                    session.refresh(cards);
                }
            }
            Err(e) => self.report("Reloading due cards", e),
        }
    }

    fn handle_next_day(&mut self) {
        let result = db::advance_day(&self.lock_conn());
        if let Err(e) = result {
            self.report("Advancing the date", e);
        }
        self.refresh_stats();
    }

    fn handle_create_card(&mut self) {
        let card = NewCard::new(self.new_front.trim(), self.new_back.trim());
        match self.create_cards(&[card]) {
            Ok(_) => {
                self.new_front.clear();
                self.new_back.clear();
            }
            Err(e) => self.report("Creating card", e),
        }
        self.refresh_stats();
    }

    fn create_cards(&self, cards: &[NewCard]) -> study_cards::Result<usize> {
        let conn = self.lock_conn();
        let today = clock::today(self.clock_mode, &conn)?;
        Ok(db::create_cards(&self.owner, cards, today, &conn)?.len())
    }

    fn handle_pasted_batch(&mut self) {
        let result = parse_card_batch(&self.pasted_batch).and_then(|cards| self.create_cards(&cards));
        match result {
            Ok(count) => {
                self.pasted_batch.clear();
                self.show_paste_dialog = false;
                self.show_message(format!("{} cards created!", count));
            }
            Err(e) => self.report("Adding generated cards", e),
        }
        self.refresh_stats();
    }

    /// Handles card export to JSON file
    fn handle_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("cards.json")
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        let result = db::list_cards(&self.owner, &self.lock_conn())
            .and_then(|cards| export_cards_to_path(&cards, &path).map(|_| cards.len()));

        match result {
            Ok(count) => self.show_message(format!("{} cards exported successfully!", count)),
            Err(e) => self.report("Export", e),
        }
    }

    /// Handles card import from JSON file
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        match import_cards(&path).and_then(|cards| self.create_cards(&cards)) {
            Ok(count) => self.show_message(format!("{} cards imported successfully!", count)),
            Err(e) => self.show_message(format!(
                "Import failed: {}\n\nPlease check if the file has correct structure:\n[\n  {{ \"front\": \"...\", \"back\": \"...\" }}\n]",
                e
            )),
        }
        self.refresh_stats();
    }
}
