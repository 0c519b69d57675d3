use crate::application::{App, AuthTab, Form, QuickAction, RegistrationField, SESSION_EXPORT_FILE, Screen, TextField};
use crate::infrastructure::SessionExporter;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::F(12) {
            app.toggle_developer_mode();
            return;
        }
        if app.developer_mode && modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('r') => {
                    app.reset_application();
                    return;
                }
                KeyCode::Char('e') => {
                    let result = SessionExporter::export(&app.session, SESSION_EXPORT_FILE);
                    app.set_export_result(result);
                    return;
                }
                _ => {}
            }
        }

        match app.screen() {
            Screen::Splash => Self::handle_splash(app, key),
            Screen::Auth => Self::handle_auth(app, key),
            Screen::Registration => Self::handle_registration(app, key),
            Screen::Dashboard => Self::handle_dashboard(app, key),
        }
    }

    fn handle_splash(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.previous_language(),
            KeyCode::Down | KeyCode::Char('j') => app.next_language(),
            KeyCode::Enter => app.select_language(),
            _ => {}
        }
    }

    fn handle_auth(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                app.back_to_splash();
                return;
            }
            KeyCode::F(2) => {
                app.toggle_auth_tab();
                return;
            }
            _ => {}
        }

        let submit = match app.auth_tab {
            AuthTab::Login => Self::handle_form(&mut app.login_form, key),
            AuthTab::Signup => Self::handle_form(&mut app.signup_form, key),
        };
        if submit {
            let now = Utc::now();
            match app.auth_tab {
                AuthTab::Login => app.submit_login(now),
                AuthTab::Signup => app.submit_signup(now),
            }
        }
    }

    /// Moves focus or edits the focused field. Returns true when Enter is
    /// pressed on the last field.
    fn handle_form<F: Form>(form: &mut F, key: KeyCode) -> bool {
        match key {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Enter if form.is_last_field() => return true,
            KeyCode::Enter => form.next_field(),
            _ => {
                if let Some(field) = form.focused_text() {
                    Self::edit_text(field, key);
                }
            }
        }
        false
    }

    fn handle_registration(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::F(10) => {
                app.logout();
                return;
            }
            KeyCode::Enter => {
                app.submit_registration(Utc::now());
                return;
            }
            _ => {}
        }

        let form = &mut app.registration_form;
        let selecting = matches!(
            form.focused_field(),
            RegistrationField::SoilType | RegistrationField::PreviousCrop
        );
        match key {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if selecting => form.cycle(-1),
            KeyCode::Right if selecting => form.cycle(1),
            _ => {
                if let Some(field) = form.focused_text() {
                    Self::edit_text(field, key);
                }
            }
        }
    }

    fn handle_dashboard(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                app.quick_action(QuickAction::ALL[index]);
            }
            KeyCode::Char('p') => app.toggle_profile(),
            KeyCode::Char('l') | KeyCode::F(10) => app.logout(),
            _ => {}
        }
    }

    fn edit_text(field: &mut TextField, key: KeyCode) {
        match key {
            KeyCode::Char(c) => field.insert(c),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.home(),
            KeyCode::End => field.end(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::StatusLevel;
    use crate::domain::{Language, Translator};
    use crate::infrastructure::DocumentStore;
    use chrono::Duration;

    fn app() -> App {
        App::new(
            Box::new(DocumentStore::in_memory()),
            Translator::default(),
            Duration::minutes(5),
        )
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn signup(app: &mut App, mobile: &str, password: &str) {
        press(app, KeyCode::Enter);
        press(app, KeyCode::F(2));
        type_text(app, mobile);
        press(app, KeyCode::Tab);
        type_text(app, password);
        press(app, KeyCode::Tab);
        type_text(app, password);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_splash_navigation() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Auth);
        assert_eq!(app.session.language, Language::Malayalam);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Splash);
    }

    #[test]
    fn test_login_form_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "98765432100");
        assert_eq!(app.login_form.mobile.value(), "9876543210");

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.login_form.mobile.value(), "87654321");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.login_form.focus(), 1);
        type_text(&mut app, "pw");
        assert_eq!(app.login_form.password.value(), "pw");
    }

    #[test]
    fn test_login_submit_on_last_field() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "12345");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "secret1");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Auth);
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "Please enter a valid 10-digit mobile number");
        assert_eq!(app.session.login_attempts(), 0);
    }

    #[test]
    fn test_full_registration_by_keyboard() {
        let mut app = app();
        signup(&mut app, "9988776655", "secret1");
        assert_eq!(app.screen(), Screen::Registration);

        type_text(&mut app, "Asha");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "2.5");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::Dashboard);
        let data = &app.session.user_data;
        assert_eq!(data.name.as_deref(), Some("Asha"));
        assert_eq!(data.land_size, Some(2.5));
        assert_eq!(data.soil_type, Some(crate::domain::SoilType::Sandy));
        assert_eq!(data.previous_crop.as_deref(), Some("Arecanut"));
    }

    #[test]
    fn test_dashboard_keys() {
        let mut app = app();
        signup(&mut app, "9988776655", "secret1");
        type_text(&mut app, "Asha");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Dashboard);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(
            app.status_message.as_ref().unwrap().text,
            app.text(QuickAction::Weather.message_key())
        );
        press(&mut app, KeyCode::Char('p'));
        assert!(app.show_profile);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen(), Screen::Splash);
        assert!(!app.session.logged_in);
        assert!(!app.show_profile);
    }

    #[test]
    fn test_registration_logout() {
        let mut app = app();
        signup(&mut app, "9988776655", "secret1");
        press(&mut app, KeyCode::F(10));
        assert_eq!(app.screen(), Screen::Splash);
    }

    #[test]
    fn test_developer_reset() {
        let mut app = app();
        signup(&mut app, "9988776655", "secret1");

        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(app.session.logged_in);

        press(&mut app, KeyCode::F(12));
        assert!(app.developer_mode);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(!app.session.logged_in);
        assert_eq!(app.screen(), Screen::Splash);
        assert_eq!(app.status_message.as_ref().unwrap().level, StatusLevel::Info);
    }
}
