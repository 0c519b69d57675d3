//! Screen transitions driven by form submissions and backend results.
//!
//! Each handler takes the session it mutates and the backend it talks to.
//! A handler either applies its whole transition and returns the new
//! screen, or returns an error and leaves the session as it was. The one
//! exception is the login attempt counter, which failed logins advance.

use super::state::{Screen, Session};
use crate::domain::{
    FarmerStore, Language, Profile, RecordUpdate, SoilType, StoreError, UserData, UserRecord,
    ValidationError, check_login, check_profile, check_signup, hash_password, season_for_month,
};
use chrono::{DateTime, Datelike, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid mobile number or password ({remaining} attempts remaining)")]
    InvalidCredentials { remaining: u32 },
    #[error("an account already exists for this mobile number")]
    AccountExists,
    #[error("too many failed attempts, retry in {}s", .retry_after.num_seconds())]
    TooManyAttempts { retry_after: Duration },
    #[error("not logged in")]
    NotLoggedIn,
    #[error("action needs the {expected:?} screen, session is on {actual:?}")]
    WrongScreen { expected: Screen, actual: Screen },
    #[error(transparent)]
    Backend(#[from] StoreError),
}

impl FlowError {
    /// Translation key for the user-facing message.
    pub fn message_key(&self) -> &'static str {
        match self {
            FlowError::Validation(err) => err.message_key(),
            FlowError::InvalidCredentials { .. } => "login_failed",
            FlowError::AccountExists => "account_exists",
            FlowError::TooManyAttempts { .. } => "max_attempts",
            FlowError::NotLoggedIn => "not_logged_in",
            FlowError::WrongScreen { .. } => "wrong_screen",
            FlowError::Backend(_) => "backend_error",
        }
    }
}

/// Registration form contents, as submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSubmission {
    pub name: String,
    pub land_size: f64,
    pub soil_type: SoilType,
    pub previous_crop: Option<String>,
}

/// Moves to `target`, redirecting to `Auth` when it needs a login the
/// session does not have.
pub fn enter(session: &mut Session, target: Screen) -> Screen {
    session.screen = if target.requires_login() && !session.logged_in {
        Screen::Auth
    } else {
        target
    };
    session.screen
}

/// Login and signup only run from the auth screen, so they never overwrite
/// an authenticated session.
fn require_auth_screen(session: &Session) -> Result<(), FlowError> {
    if session.screen == Screen::Auth && !session.logged_in {
        Ok(())
    } else {
        Err(FlowError::WrongScreen {
            expected: Screen::Auth,
            actual: session.screen,
        })
    }
}

/// Splash -> Auth with the chosen language.
pub fn select_language(session: &mut Session, language: Language) -> Screen {
    session.language = language;
    enter(session, Screen::Auth)
}

/// Auth -> Dashboard, or Registration when the profile is incomplete.
pub fn login(
    session: &mut Session,
    store: &mut dyn FarmerStore,
    mobile: &str,
    password: &SecretString,
    now: DateTime<Utc>,
    lockout: Duration,
) -> Result<Screen, FlowError> {
    require_auth_screen(session)?;
    if let Err(retry_after) = session.throttle.check(now, lockout) {
        warn!(mobile, retry_after = retry_after.num_seconds(), "login refused, session locked out");
        return Err(FlowError::TooManyAttempts { retry_after });
    }
    check_login(mobile, password.expose_secret())?;

    let record = match store.verify_credential(mobile, password) {
        Ok(Some(record)) => record,
        Ok(None) => {
            session.throttle.record_failure(now);
            warn!(mobile, attempts = session.throttle.attempts(), "login rejected");
            return Err(FlowError::InvalidCredentials {
                remaining: session.throttle.remaining(),
            });
        }
        Err(err) => {
            session.throttle.record_failure(now);
            error!(mobile, error = %err, "credential check failed");
            return Err(err.into());
        }
    };

    let mut user_data = UserData::from(&record);
    match store.update_record(mobile, &RecordUpdate::last_login(now)) {
        Ok(()) => user_data.last_login = Some(now),
        Err(err) => warn!(mobile, error = %err, "could not record last login"),
    }

    session.logged_in = true;
    session.mobile_number = mobile.to_string();
    session.external_id = Some(record.external_id);
    session.user_data = user_data;
    session.throttle.reset();

    let target = if session.user_data.profile_completed {
        Screen::Dashboard
    } else {
        Screen::Registration
    };
    info!(mobile, ?target, "login succeeded");
    Ok(enter(session, target))
}

/// Auth -> Registration for a new account.
pub fn signup(
    session: &mut Session,
    store: &mut dyn FarmerStore,
    mobile: &str,
    password: &SecretString,
    confirmation: &SecretString,
    now: DateTime<Utc>,
) -> Result<Screen, FlowError> {
    require_auth_screen(session)?;
    check_signup(mobile, password.expose_secret(), confirmation.expose_secret())?;

    let exists = store.record_exists(mobile).inspect_err(|err| {
        error!(mobile, error = %err, "account lookup failed");
    })?;
    if exists {
        info!(mobile, "signup refused, account exists");
        return Err(FlowError::AccountExists);
    }

    let external_id = match store.create_credential(mobile, password) {
        Ok(external_id) => external_id,
        Err(StoreError::AlreadyExists(_)) => {
            warn!(mobile, "credential already registered");
            return Err(FlowError::AccountExists);
        }
        Err(err) => {
            error!(mobile, error = %err, "credential creation failed");
            return Err(err.into());
        }
    };

    let record = UserRecord::new(mobile, hash_password(password.expose_secret()), external_id, now);
    match store.create_record(mobile, &record) {
        Ok(()) => {}
        Err(StoreError::AlreadyExists(_)) => {
            warn!(mobile, external_id = %record.external_id, "record appeared during signup");
            return Err(FlowError::AccountExists);
        }
        Err(err) => {
            error!(mobile, external_id = %record.external_id, error = %err, "record creation failed");
            return Err(err.into());
        }
    }

    session.logged_in = true;
    session.mobile_number = mobile.to_string();
    session.user_data = UserData::from(&record);
    session.external_id = Some(record.external_id);
    info!(mobile, "account created");
    Ok(enter(session, Screen::Registration))
}

/// Registration -> Dashboard once the profile is stored.
pub fn complete_registration(
    session: &mut Session,
    store: &mut dyn FarmerStore,
    submission: ProfileSubmission,
    now: DateTime<Utc>,
) -> Result<Screen, FlowError> {
    if !session.logged_in {
        enter(session, Screen::Registration);
        return Err(FlowError::NotLoggedIn);
    }
    let name = check_profile(&submission.name, submission.land_size)?;

    let profile = Profile {
        name: name.to_string(),
        land_size: submission.land_size,
        soil_type: submission.soil_type,
        previous_crop: submission.previous_crop,
    };
    let season = season_for_month(now.month());
    let update = RecordUpdate::profile(profile.clone(), season, now);
    store
        .update_record(&session.mobile_number, &update)
        .inspect_err(|err| {
            error!(mobile = %session.mobile_number, error = %err, "profile update failed");
        })?;

    session.user_data.merge_profile(&profile);
    info!(mobile = %session.mobile_number, %season, "profile completed");
    Ok(enter(session, Screen::Dashboard))
}

/// Any screen -> Splash. Clears the authentication fields only; the stored
/// record and the chosen language are untouched.
pub fn logout(session: &mut Session) -> Screen {
    if session.logged_in {
        info!(mobile = %session.mobile_number, "logged out");
    }
    session.logged_in = false;
    session.mobile_number.clear();
    session.external_id = None;
    session.user_data = UserData::default();
    enter(session, Screen::Splash)
}
