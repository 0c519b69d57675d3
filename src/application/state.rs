//! Application state for the terminal UI.
//!
//! [`Session`] is the state the screen machine runs on. [`App`] wraps it
//! together with the backend, the translation tables and the form buffers
//! the presentation layer edits.

use super::flow::{self, FlowError, ProfileSubmission};
use super::forms::{AuthTab, LoginForm, RegistrationForm, SignupForm};
use super::throttle::LoginThrottle;
use crate::domain::{FarmerStore, Language, Translator, UserData, password_strength};
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde::Serialize;

/// The screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Screen {
    /// Language picker shown at start and after logout
    #[default]
    Splash,
    /// Login and signup tabs
    Auth,
    /// Farm profile form, shown until the profile is complete
    Registration,
    /// Home screen for a registered farmer
    Dashboard,
}

impl Screen {
    /// Screens that redirect to `Auth` without a logged-in session.
    pub fn requires_login(self) -> bool {
        matches!(self, Screen::Registration | Screen::Dashboard)
    }
}

/// Per-user state. Handlers in [`flow`] drive every transition;
/// [`App::reset_application`] may also replace it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub screen: Screen,
    pub language: Language,
    /// Mobile number of the authenticated farmer, also the record key
    pub mobile_number: String,
    pub logged_in: bool,
    /// Identity provider id of the authenticated farmer
    pub external_id: Option<String>,
    pub user_data: UserData,
    pub throttle: LoginThrottle,
}

impl Session {
    pub fn login_attempts(&self) -> u32 {
        self.throttle.attempts()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line message shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// Dashboard shortcuts. They only show a message for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Weather,
    Irrigation,
    CropGuide,
    Support,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Weather,
        QuickAction::Irrigation,
        QuickAction::CropGuide,
        QuickAction::Support,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::Weather => "Weather",
            QuickAction::Irrigation => "Irrigation",
            QuickAction::CropGuide => "Crop Guide",
            QuickAction::Support => "Support",
        }
    }

    pub fn message_key(self) -> &'static str {
        match self {
            QuickAction::Weather => "weather_soon",
            QuickAction::Irrigation => "irrigation_soon",
            QuickAction::CropGuide => "crop_guide_soon",
            QuickAction::Support => "support_line",
        }
    }
}

/// Default file name for developer session exports.
pub const SESSION_EXPORT_FILE: &str = "agrismart_session.json";

/// Main application state: the session plus everything the UI needs.
pub struct App {
    pub session: Session,
    store: Box<dyn FarmerStore>,
    translator: Translator,
    lockout: Duration,
    /// Highlighted entry in the splash language list
    pub splash_selection: usize,
    pub auth_tab: AuthTab,
    pub login_form: LoginForm,
    pub signup_form: SignupForm,
    pub registration_form: RegistrationForm,
    pub status_message: Option<StatusMessage>,
    /// Whether the dashboard profile details are expanded
    pub show_profile: bool,
    /// Whether the developer panel overlay is visible
    pub developer_mode: bool,
}

impl App {
    pub fn new(store: Box<dyn FarmerStore>, translator: Translator, lockout: Duration) -> Self {
        Self {
            session: Session::default(),
            store,
            translator,
            lockout,
            splash_selection: 0,
            auth_tab: AuthTab::default(),
            login_form: LoginForm::default(),
            signup_form: SignupForm::default(),
            registration_form: RegistrationForm::default(),
            status_message: None,
            show_profile: false,
            developer_mode: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.session.screen
    }

    pub fn lockout(&self) -> Duration {
        self.lockout
    }

    /// Translated text for the session language.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.translator.text(self.session.language, key)
    }

    pub fn backend_status(&self) -> String {
        self.store.describe()
    }

    /// Re-applies the login guard to the current screen before rendering.
    pub fn guard_screen(&mut self) {
        let screen = self.session.screen;
        flow::enter(&mut self.session, screen);
    }

    pub fn selected_language(&self) -> Language {
        Language::ALL[self.splash_selection % Language::ALL.len()]
    }

    pub fn next_language(&mut self) {
        self.splash_selection = (self.splash_selection + 1) % Language::ALL.len();
    }

    pub fn previous_language(&mut self) {
        let len = Language::ALL.len();
        self.splash_selection = (self.splash_selection + len - 1) % len;
    }

    /// Splash "Get Started": stores the language and opens the auth screen.
    pub fn select_language(&mut self) {
        let language = self.selected_language();
        flow::select_language(&mut self.session, language);
        self.auth_tab = AuthTab::Login;
        self.login_form = LoginForm::default();
        self.signup_form = SignupForm::default();
        self.status_message = None;
    }

    /// Leaves the auth screen for the language picker.
    pub fn back_to_splash(&mut self) {
        flow::enter(&mut self.session, Screen::Splash);
        self.status_message = None;
    }

    pub fn toggle_auth_tab(&mut self) {
        self.auth_tab = self.auth_tab.toggle();
        self.status_message = None;
    }

    /// Strength of the password typed into the signup form, 0-5.
    pub fn signup_strength(&self) -> u8 {
        password_strength(self.signup_form.password.value())
    }

    pub fn submit_login(&mut self, now: DateTime<Utc>) {
        let mobile = self.login_form.mobile.value().to_string();
        let password = SecretString::from(self.login_form.password.value().to_string());
        self.login_form.password.clear();

        let result = flow::login(
            &mut self.session,
            self.store.as_mut(),
            &mobile,
            &password,
            now,
            self.lockout,
        );
        match result {
            Ok(screen) => {
                self.login_form = LoginForm::default();
                self.after_transition(screen);
                self.set_status(StatusLevel::Success, self.text("login_success").to_string());
            }
            Err(err) => self.report(&err),
        }
    }

    pub fn submit_signup(&mut self, now: DateTime<Utc>) {
        let mobile = self.signup_form.mobile.value().to_string();
        let password = SecretString::from(self.signup_form.password.value().to_string());
        let confirmation = SecretString::from(self.signup_form.confirm.value().to_string());
        self.signup_form.password.clear();
        self.signup_form.confirm.clear();

        let result = flow::signup(
            &mut self.session,
            self.store.as_mut(),
            &mobile,
            &password,
            &confirmation,
            now,
        );
        match result {
            Ok(screen) => {
                self.signup_form = SignupForm::default();
                self.after_transition(screen);
                self.set_status(StatusLevel::Success, self.text("account_created").to_string());
            }
            Err(err) => self.report(&err),
        }
    }

    pub fn submit_registration(&mut self, now: DateTime<Utc>) {
        let form = &self.registration_form;
        let submission = ProfileSubmission {
            name: form.name.value().to_string(),
            land_size: form.land_size_value(),
            soil_type: form.soil_type(),
            previous_crop: form.previous_crop().map(str::to_string),
        };

        match flow::complete_registration(&mut self.session, self.store.as_mut(), submission, now) {
            Ok(screen) => {
                self.after_transition(screen);
                let text = format!("{} {}", self.text("profile_updated"), self.text("success_message"));
                self.set_status(StatusLevel::Success, text);
            }
            Err(err) => self.report(&err),
        }
    }

    pub fn logout(&mut self) {
        let was_logged_in = self.session.logged_in;
        let screen = flow::logout(&mut self.session);
        self.after_transition(screen);
        self.show_profile = false;
        if was_logged_in {
            self.set_status(StatusLevel::Info, self.text("logged_out").to_string());
        }
    }

    pub fn quick_action(&mut self, action: QuickAction) {
        self.set_status(StatusLevel::Info, self.text(action.message_key()).to_string());
    }

    pub fn toggle_profile(&mut self) {
        self.show_profile = !self.show_profile;
    }

    pub fn toggle_developer_mode(&mut self) {
        self.developer_mode = !self.developer_mode;
    }

    /// Drops the whole session, including language and attempt counter.
    pub fn reset_application(&mut self) {
        self.session = Session::default();
        self.splash_selection = 0;
        self.auth_tab = AuthTab::Login;
        self.login_form = LoginForm::default();
        self.signup_form = SignupForm::default();
        self.registration_form = RegistrationForm::default();
        self.show_profile = false;
        self.set_status(StatusLevel::Info, "Application reset".to_string());
    }

    /// Processes the result of a session export.
    ///
    /// # Arguments
    ///
    /// * `result` - Result of the export (filename or error message)
    pub fn set_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.set_status(StatusLevel::Success, format!("Session exported to {filename}"));
            }
            Err(error) => {
                self.set_status(StatusLevel::Error, format!("Export failed: {error}"));
            }
        }
    }

    fn after_transition(&mut self, screen: Screen) {
        if screen == Screen::Registration {
            self.registration_form = RegistrationForm::from_user_data(&self.session.user_data);
        }
    }

    fn set_status(&mut self, level: StatusLevel, text: String) {
        self.status_message = Some(StatusMessage { level, text });
    }

    fn report(&mut self, err: &FlowError) {
        let message = self.text(err.message_key()).to_string();
        let (level, text) = match err {
            FlowError::InvalidCredentials { remaining } if *remaining > 0 => (
                StatusLevel::Warning,
                format!("{message} ({remaining} {})", self.text("attempts_remaining")),
            ),
            FlowError::TooManyAttempts { retry_after } => {
                let minutes = (retry_after.num_seconds() + 59) / 60;
                (
                    StatusLevel::Error,
                    format!("{message} {} ({minutes} min)", self.text("lockout_wait")),
                )
            }
            _ => (StatusLevel::Error, message),
        };
        self.set_status(level, text);
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("backend", &self.store.describe())
            .field("auth_tab", &self.auth_tab)
            .field("status_message", &self.status_message)
            .finish_non_exhaustive()
    }
}
