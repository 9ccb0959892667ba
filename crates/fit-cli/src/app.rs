//! The interactive session: bootstrap, command dispatch, and the
//! persistence coupling.
//!
//! One command is fully processed (including any blocking confirmation
//! prompt) before the next line is read. Handler errors are reported and
//! the loop continues; nothing here is fatal to the process.

use anyhow::Result;
use chrono::NaiveDateTime;

use fit_core::entities::UserProfile;
use fit_core::manager::WorkoutManager;
use fit_core::month::MonthKey;
use fit_core::tagger::Tagger;
use fit_store::{StoreError, WorkoutStore};

use crate::ui::{DIVIDER, Ui};

const GREETING: &str = "\
Welcome to fitlog! Type /help to see what you can do.";

const HELP: &str = "\
Commands:
  /create_workout n/NAME [d/DD/MM/YY] [t/HHmm]   start a new workout
  /add_exercise n/NAME r/REPS                    add an exercise to the open workout
  /add_set r/REPS                                add a set to the last exercise
  /end_workout [d/DD/MM/YY] [t/HHmm]             close the open workout
  /view_log [d/DD/MM/YY]  (or: vl)               list this month's workouts
  /open INDEX                                    show one workout in detail
  /del_workout NAME | d/DD/MM/YY | i/INDEX       delete workouts
  /add_tag i/INDEX t/TAGS                        override a workout's tags
  /add_modality_keyword m/MODALITY k/KEYWORD     teach the tagger (cardio/strength)
  /add_muscle_keyword g/GROUP k/KEYWORD          teach the tagger (legs, chest, ...)
  /add_weight w/WEIGHT d/DD/MM/YY                log your body weight
  /view_weight                                   show your weight history
  /my_name n/NAME                                switch user
  /exit                                          save and quit";

pub struct App<U: Ui> {
    pub(crate) ui: U,
    pub(crate) store: WorkoutStore,
    pub(crate) tagger: Tagger,
    pub(crate) manager: WorkoutManager,
    pub(crate) profile: UserProfile,
}

impl<U: Ui> App<U> {
    /// Build a session for the current month: resolve the display name,
    /// then load (or offer to initialize) the user's data.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; the signature leaves room for
    /// bootstrap steps that cannot degrade gracefully.
    pub fn bootstrap(
        mut ui: U,
        store: WorkoutStore,
        user_override: Option<String>,
        fallback_user: &str,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let month = MonthKey::from_datetime(now);
        let username = resolve_username(&mut ui, &store, user_override, fallback_user);

        if let Err(error) = store.save_display_name(&username) {
            ui.show_error(&format!("Failed to save your profile: {error}"));
        }

        let mut app = Self {
            ui,
            store,
            tagger: Tagger::with_defaults(),
            manager: WorkoutManager::new(&username, month),
            profile: UserProfile::new(&username),
        };
        app.load_user_data();
        Ok(app)
    }

    /// Load the current user's month collection and weight history,
    /// routing "not found" to the explicit create-new decision.
    pub(crate) fn load_user_data(&mut self) {
        let username = self.manager.username().to_string();
        let month = self.manager.month();

        match self.store.load_month(&username, month) {
            Ok((workouts, report)) => {
                for skipped in &report.skipped {
                    self.ui.show_error(&format!(
                        "Skipping malformed entry (line {}): {}",
                        skipped.line_no, skipped.reason
                    ));
                }
                self.manager.set_workouts(workouts);
                self.manager.retag_all(&self.tagger);
                self.ui.show(&format!(
                    "Loaded {} workout(s) for {username} ({month}).",
                    self.manager.len()
                ));
            }
            Err(StoreError::NotFound { .. }) => {
                self.ui
                    .show(&format!("Seems like {month} is a new month for {username}!"));
                if self
                    .ui
                    .confirm("Would you like to create new workouts for this month?")
                {
                    if let Err(error) = self.store.save_month(&username, month, &[]) {
                        self.ui
                            .show_error(&format!("Failed to initialize the month file: {error}"));
                    }
                }
                self.manager.set_workouts(Vec::new());
            }
            Err(error) => {
                self.ui.show_error(&format!("Failed to load workouts: {error}"));
                self.manager.set_workouts(Vec::new());
            }
        }

        let history = match self.store.load_weights(&username) {
            Ok((records, report)) => {
                for skipped in &report.skipped {
                    self.ui.show_error(&format!(
                        "Skipping malformed weight entry (line {}): {}",
                        skipped.line_no, skipped.reason
                    ));
                }
                records
            }
            Err(StoreError::NotFound { .. }) => Vec::new(),
            Err(error) => {
                self.ui
                    .show_error(&format!("Failed to load weight history: {error}"));
                Vec::new()
            }
        };
        self.profile = UserProfile::with_history(&username, history);
    }

    /// Run the command loop until `/exit` or end-of-input.
    ///
    /// # Errors
    ///
    /// Never fails today; handler errors are reported to the user and the
    /// loop continues.
    pub fn run(&mut self) -> Result<()> {
        self.ui.show(GREETING);
        self.ui.show(DIVIDER);

        loop {
            let Some(line) = self.ui.read_line() else {
                break;
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if !self.dispatch(&line) {
                break;
            }
        }
        Ok(())
    }

    /// Process one command line. Returns `false` when the session ends.
    pub(crate) fn dispatch(&mut self, line: &str) -> bool {
        let (verb, args) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, args)| (verb, args.trim()));
        tracing::debug!(verb, "processing command");

        let result = match verb.to_lowercase().as_str() {
            "/help" => {
                self.ui.show(HELP);
                Ok(())
            }
            "/my_name" => self.cmd_my_name(args),
            "/add_weight" => self.cmd_add_weight(args),
            "/view_weight" => {
                self.cmd_view_weight();
                Ok(())
            }
            "/create_workout" => self.cmd_create_workout(args),
            "/add_exercise" => self.cmd_add_exercise(args),
            "/add_set" => self.cmd_add_set(args),
            "/end_workout" => self.cmd_end_workout(args),
            "/view_log" | "vl" => self.cmd_view_log(args),
            "/open" => self.cmd_open(args),
            "/del_workout" => self.cmd_delete_workout(args),
            "/add_tag" => self.cmd_add_tag(args),
            "/add_modality_keyword" => self.cmd_add_modality_keyword(args),
            "/add_muscle_keyword" => self.cmd_add_muscle_keyword(args),
            "/exit" => {
                self.cmd_exit();
                return false;
            }
            _ => {
                self.ui.show_error("That's not a command. Try /help");
                Ok(())
            }
        };

        if let Err(error) = result {
            self.ui.show_error(&format!("{error:#}"));
        }
        self.ui.show(DIVIDER);
        true
    }

    /// Persist the current month's collection, reporting failures without
    /// rolling back memory: this session's state stays the source of truth
    /// and a later save may still succeed.
    pub(crate) fn save_current_month(&mut self) {
        if let Err(error) = self.store.save_month(
            self.manager.username(),
            self.manager.month(),
            self.manager.workouts(),
        ) {
            self.ui.show_error(&format!("Failed to save workouts: {error}"));
            self.ui
                .show("Your changes are kept for this session; a later save may succeed.");
        }
    }

    fn cmd_exit(&mut self) {
        self.ui.show("Saving your progress...");
        self.save_current_month();
        self.ui.show("See you next session!");
    }
}

fn resolve_username<U: Ui>(
    ui: &mut U,
    store: &WorkoutStore,
    user_override: Option<String>,
    fallback_user: &str,
) -> String {
    if let Some(name) = user_override {
        return name;
    }

    match store.load_display_name() {
        Ok(Some(name)) => name,
        Ok(None) => {
            ui.show("It looks like this is your first time running fitlog.");
            ui.show("Please enter your name:");
            match ui
                .read_line()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
            {
                Some(name) => name,
                None => {
                    ui.show(&format!("Using the default user name: {fallback_user}"));
                    fallback_user.to_string()
                }
            }
        }
        Err(error) => {
            ui.show_error(&format!("Failed to read your profile: {error}"));
            fallback_user.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::ScriptedUi;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 22)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn new_app(dir: &std::path::Path, ui: ScriptedUi) -> App<ScriptedUi> {
        let store = WorkoutStore::open(dir).unwrap();
        App::bootstrap(ui, store, Some("Loan".to_string()), "Nary", fixed_now()).unwrap()
    }

    #[test]
    fn bootstrap_offers_to_initialize_a_new_month() {
        let dir = tempfile::tempdir().unwrap();
        let ui = ScriptedUi::default().answering([true]);
        let app = new_app(dir.path(), ui);

        assert!(app.ui.saw("new month for Loan"));
        // Accepting the offer creates the (empty) month file, so the next
        // bootstrap loads instead of asking again.
        let app2 = new_app(dir.path(), ScriptedUi::default());
        assert!(app2.ui.saw("Loaded 0 workout(s)"));
    }

    #[test]
    fn declining_initialization_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let app = new_app(dir.path(), ScriptedUi::default().answering([false]));
        drop(app);

        let app2 = new_app(dir.path(), ScriptedUi::default().answering([false]));
        assert!(app2.ui.saw("new month for Loan"));
    }

    #[test]
    fn first_run_prompts_for_a_name_and_saves_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkoutStore::open(dir.path()).unwrap();
        let ui = ScriptedUi::with_lines(["Mai"]).answering([true]);

        let app = App::bootstrap(ui, store, None, "Nary", fixed_now()).unwrap();
        assert_eq!(app.manager.username(), "Mai");

        // The name is remembered for the next session.
        let store = WorkoutStore::open(dir.path()).unwrap();
        let app2 = App::bootstrap(ScriptedUi::default(), store, None, "Nary", fixed_now()).unwrap();
        assert_eq!(app2.manager.username(), "Mai");
    }

    #[test]
    fn leg_day_scenario_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(dir.path(), ScriptedUi::default().answering([true]));

        assert!(app.dispatch("/create_workout n/Leg Day d/22/10/25 t/0900"));
        assert!(app.dispatch("/add_exercise n/Squat r/10"));
        assert!(app.dispatch("/add_set r/8"));
        assert!(app.dispatch("/end_workout d/22/10/25 t/0945"));
        assert!(app.dispatch("vl"));
        assert!(app.dispatch("/open 1"));
        assert!(!app.dispatch("/exit"));

        assert!(app.ui.saw("Leg Day"));
        assert!(app.ui.saw("45 min"));
        assert!(app.ui.saw("Squat: [10, 8] reps"));
        assert!(app.ui.errors.is_empty(), "errors: {:?}", app.ui.errors);

        // The collection survives a restart.
        let app2 = new_app(dir.path(), ScriptedUi::default());
        assert_eq!(app2.manager.len(), 1);
        assert_eq!(app2.manager.workouts()[0].name(), "Leg Day");
        assert_eq!(app2.manager.workouts()[0].duration_min(), 45);
        assert_eq!(app2.manager.workouts()[0].exercises()[0].sets(), &[10, 8]);
    }

    #[test]
    fn end_before_start_is_reported_and_retryable_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(dir.path(), ScriptedUi::default().answering([true]));

        app.dispatch("/create_workout n/Run d/22/10/25 t/0900");
        app.dispatch("/end_workout d/22/10/25 t/0800");
        assert!(app.ui.saw_error("before the workout start"));

        app.dispatch("/end_workout d/22/10/25 t/1000");
        assert_eq!(app.manager.workouts()[0].duration_min(), 60);
        assert!(!app.manager.workouts()[0].is_open());
    }

    #[test]
    fn unknown_commands_do_not_end_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(dir.path(), ScriptedUi::default().answering([true]));

        assert!(app.dispatch("/definitely_not_a_command"));
        assert!(app.ui.saw_error("not a command"));
    }

    #[test]
    fn multi_match_delete_confirms_each_workout() {
        let dir = tempfile::tempdir().unwrap();
        let ui = ScriptedUi::default().answering([true, true, false]);
        let mut app = new_app(dir.path(), ui);

        app.dispatch("/create_workout n/Run d/05/10/25 t/0800");
        app.dispatch("/end_workout d/05/10/25 t/0900");
        app.dispatch("/create_workout n/Run d/12/10/25 t/0800");
        app.dispatch("/end_workout d/12/10/25 t/0900");

        // Two matches: first confirmed, second declined.
        app.dispatch("/del_workout Run");
        assert_eq!(app.manager.len(), 1);
        assert_eq!(
            app.manager.workouts()[0].start().date(),
            NaiveDate::from_ymd_opt(2025, 10, 12).unwrap()
        );
    }

    #[test]
    fn delete_by_index_skips_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        // No confirmation answers scripted: a prompt would delete nothing.
        let mut app = new_app(dir.path(), ScriptedUi::default().answering([true]));

        app.dispatch("/create_workout n/Run d/05/10/25 t/0800");
        app.dispatch("/end_workout d/05/10/25 t/0900");
        app.dispatch("/del_workout i/1");

        assert!(app.manager.is_empty());
    }

    #[test]
    fn my_name_switches_user_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let ui = ScriptedUi::default().answering([true, true]);
        let mut app = new_app(dir.path(), ui);

        app.dispatch("/create_workout n/Run d/05/10/25 t/0800");
        app.dispatch("/end_workout d/05/10/25 t/0900");

        // Switching prompts to initialize the new user's month.
        app.dispatch("/my_name n/Mai");
        assert_eq!(app.manager.username(), "Mai");
        assert!(app.manager.is_empty());

        // Switching back finds Loan's saved workout.
        app.dispatch("/my_name n/Loan");
        assert_eq!(app.manager.len(), 1);
    }

    #[test]
    fn weight_commands_log_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(dir.path(), ScriptedUi::default().answering([true]));

        app.dispatch("/add_weight w/50.5 d/22/10/25");
        app.dispatch("/view_weight");
        assert!(app.ui.saw("Date: 22/10/25 | Weight: 50.5 kg"));

        app.dispatch("/add_weight w/heavy d/22/10/25");
        assert!(app.ui.saw_error("Invalid weight"));
        assert_eq!(app.profile.weight_history().len(), 1);

        // The history survives a restart.
        let app2 = new_app(dir.path(), ScriptedUi::default());
        assert_eq!(app2.profile.weight_history().len(), 1);
    }

    #[test]
    fn tag_override_reports_contradicted_auto_tags() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(dir.path(), ScriptedUi::default().answering([true]));

        app.dispatch("/create_workout n/Morning Run d/22/10/25 t/0900");
        app.dispatch("/end_workout d/22/10/25 t/1000");
        app.dispatch("/add_tag i/1 t/recovery");

        assert!(app.ui.saw("overrides auto tag(s): CARDIO"));
        assert!(app.manager.workouts()[0].manual_tags().contains("RECOVERY"));

        // Overrides survive a restart.
        let app2 = new_app(dir.path(), ScriptedUi::default());
        assert!(app2.manager.workouts()[0].manual_tags().contains("RECOVERY"));
    }

    #[test]
    fn conflicting_modality_keyword_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(dir.path(), ScriptedUi::default().answering([true]));

        app.dispatch("/create_workout n/Morning Run d/22/10/25 t/0900");
        app.dispatch("/end_workout d/22/10/25 t/1000");
        app.dispatch("/add_modality_keyword m/strength k/morning");

        assert!(app.ui.saw_error("Morning Run"));
        let tags = app.manager.workouts()[0].auto_tags();
        assert!(tags.contains("CARDIO"));
        assert!(!tags.contains("STRENGTH"));
    }

    #[test]
    fn muscle_keyword_retags_and_shows_in_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(dir.path(), ScriptedUi::default().answering([true]));

        app.dispatch("/create_workout n/Morning Run d/22/10/25 t/0900");
        app.dispatch("/end_workout d/22/10/25 t/1000");
        app.dispatch("/add_muscle_keyword g/legs k/run");
        app.dispatch("vl");

        assert!(app.ui.saw("LEGS"));
    }
}
