//! Translated UI strings.
//!
//! Tables are plain data handed to the [`Translator`]; lookups fall back to
//! English and then to the key itself.

use super::models::Language;
use std::collections::HashMap;

type Table = HashMap<String, String>;

const ENGLISH: &[(&str, &str)] = &[
    ("app_name", "AgriSmart"),
    ("tagline", "Smart Agriculture Solutions for Modern Farmers"),
    ("select_language", "Select Your Language"),
    ("continue", "Continue"),
    ("get_started", "Get Started"),
    ("login", "Login"),
    ("signup", "Sign Up"),
    ("mobile_number", "Mobile Number"),
    ("password", "Password"),
    ("confirm_password", "Confirm Password"),
    ("enter_mobile", "Enter your mobile number"),
    ("enter_password", "Enter your password"),
    ("create_password", "Create a secure password"),
    ("confirm_password_text", "Confirm your password"),
    ("login_button", "Login Now"),
    ("signup_button", "Create Account"),
    ("registration", "Complete Your Profile"),
    ("farmer_name", "Farmer Name"),
    ("land_size", "Land Size (acres)"),
    ("soil_type", "Soil Type"),
    ("previous_crop", "Previous Crop (Optional)"),
    ("complete_profile", "Complete Profile"),
    ("welcome", "🎉 Welcome to AgriSmart!"),
    ("welcome_back", "Welcome back"),
    ("season_detected", "Current Season"),
    ("invalid_mobile", "Please enter a valid 10-digit mobile number"),
    ("invalid_password", "Password must be at least 6 characters long"),
    ("passwords_dont_match", "Passwords don't match"),
    ("fill_required", "Please fill all required fields"),
    ("login_failed", "Invalid mobile number or password"),
    ("account_exists", "Account already exists. Please login instead."),
    ("account_created", "🎊 Account Created Successfully!"),
    ("profile_updated", "✅ Profile Updated Successfully!"),
    ("logout", "Logout"),
    ("dashboard", "Dashboard"),
    ("my_profile", "My Profile"),
    ("max_attempts", "Too many failed attempts. Please try again later."),
    ("creating_account", "Creating your account..."),
    ("logging_in", "Logging you in..."),
    ("updating_profile", "Updating your profile..."),
    ("success_message", "Congratulations! You're all set!"),
    ("land_size_range", "Land size must be between 0.1 and 1000 acres"),
    ("not_logged_in", "Please login to continue"),
    ("backend_error", "Service unavailable, please try again"),
    ("wrong_screen", "This action is not available here"),
    ("attempts_remaining", "attempts remaining"),
    ("lockout_wait", "Please wait before trying again"),
    ("farm_overview", "Your Farm Overview"),
    ("quick_actions", "Quick Actions"),
    ("weather_soon", "Weather feature coming soon!"),
    ("irrigation_soon", "Irrigation management coming soon!"),
    ("crop_guide_soon", "Crop recommendations coming soon!"),
    ("support_line", "24/7 Support: +91-1800-AGRI-HELP"),
    ("logged_out", "Logged out successfully!"),
    ("login_success", "Login Successful!"),
    ("password_strength", "Password Strength"),
    ("none", "None"),
];

const MALAYALAM: &[(&str, &str)] = &[
    ("app_name", "അഗ്രിസ്മാർട്ട്"),
    ("tagline", "ആധുനിക കർഷകർക്കുള്ള സ്മാർട്ട് കൃഷി പരിഹാരങ്ങൾ"),
    ("select_language", "നിങ്ങളുടെ ഭാഷ തിരഞ്ഞെടുക്കുക"),
    ("continue", "തുടരുക"),
    ("get_started", "ആരംഭിക്കുക"),
    ("login", "ലോഗിൻ"),
    ("signup", "സൈൻ അപ്പ്"),
    ("mobile_number", "മൊബൈൽ നമ്പർ"),
    ("password", "പാസ്‌വേഡ്"),
    ("confirm_password", "പാസ്‌വേഡ് സ്ഥിരീകരിക്കുക"),
    ("enter_mobile", "മൊബൈൽ നമ്പർ നൽകുക"),
    ("enter_password", "പാസ്‌വേഡ് നൽകുക"),
    ("create_password", "സുരക്ഷിത പാസ്‌വേഡ് സൃഷ്ടിക്കുക"),
    ("confirm_password_text", "പാസ്‌വേഡ് സ്ഥിരീകരിക്കുക"),
    ("login_button", "ഇപ്പോൾ ലോഗിൻ ചെയ്യുക"),
    ("signup_button", "അക്കൗണ്ട് സൃഷ്ടിക്കുക"),
    ("registration", "നിങ്ങളുടെ പ്രൊഫൈൽ പൂർത്തിയാക്കുക"),
    ("farmer_name", "കർഷകന്റെ പേര്"),
    ("land_size", "ഭൂമിയുടെ വലിപ്പം (എക്കറുകൾ)"),
    ("soil_type", "മണ്ണിന്റെ തരം"),
    ("previous_crop", "മുൻപത്തെ വിള (ഐച്ഛികം)"),
    ("complete_profile", "പ്രൊഫൈൽ പൂർത്തിയാക്കുക"),
    ("welcome", "🎉 അഗ്രിസ്മാർട്ടിലേക്ക് സ്വാഗതം!"),
    ("welcome_back", "തിരികെ സ്വാഗതം"),
    ("season_detected", "നിലവിലെ കാലാവസ്ഥ"),
    ("invalid_mobile", "സാധുവായ 10-അക്ക മൊബൈൽ നമ്പർ നൽകുക"),
    ("invalid_password", "പാസ്‌വേഡിൽ കുറഞ്ഞത് 6 അക്ഷരങ്ങൾ ഉണ്ടായിരിക്കണം"),
    ("passwords_dont_match", "പാസ്‌വേഡുകൾ പൊരുത്തപ്പെടുന്നില്ല"),
    ("fill_required", "എല്ലാ ആവശ്യമായ ഫീൽഡുകളും പൂരിപ്പിക്കുക"),
    ("login_failed", "തെറ്റായ മൊബൈൽ നമ്പർ അല്ലെങ്കിൽ പാസ്‌വേഡ്"),
];

#[derive(Debug, Clone)]
pub struct Translator {
    tables: HashMap<Language, Table>,
}

impl Translator {
    pub fn new(tables: HashMap<Language, Table>) -> Self {
        Self { tables }
    }

    /// Looks up `key` for `language`, then in English, then returns the key.
    pub fn text<'a>(&'a self, language: Language, key: &'a str) -> &'a str {
        [language, Language::English]
            .iter()
            .find_map(|lang| self.tables.get(lang).and_then(|table| table.get(key)))
            .map_or(key, String::as_str)
    }
}

impl Default for Translator {
    fn default() -> Self {
        let table = |entries: &[(&str, &str)]| -> Table {
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        };

        let mut tables = HashMap::new();
        tables.insert(Language::English, table(ENGLISH));
        tables.insert(Language::Malayalam, table(MALAYALAM));
        Self::new(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let t = Translator::default();
        assert_eq!(t.text(Language::English, "login"), "Login");
        assert_eq!(t.text(Language::Malayalam, "login"), "ലോഗിൻ");
    }

    #[test]
    fn test_falls_back_to_english_then_key() {
        let t = Translator::default();
        assert_eq!(
            t.text(Language::Malayalam, "quick_actions"),
            t.text(Language::English, "quick_actions")
        );
        assert_eq!(t.text(Language::Malayalam, "no_such_key"), "no_such_key");
    }

    #[test]
    fn test_injected_tables() {
        let mut english = Table::new();
        english.insert("login".to_string(), "Sign in".to_string());
        let mut tables = HashMap::new();
        tables.insert(Language::English, english);

        let t = Translator::new(tables);
        assert_eq!(t.text(Language::English, "login"), "Sign in");
        assert_eq!(t.text(Language::Malayalam, "login"), "Sign in");
        assert_eq!(t.text(Language::English, "logout"), "logout");
    }

    #[test]
    fn test_tables_share_keys() {
        for (key, _) in MALAYALAM {
            assert!(ENGLISH.iter().any(|(k, _)| k == key), "missing English key {key}");
        }
    }
}
