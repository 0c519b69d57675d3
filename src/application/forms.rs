//! Editable form state for the auth and registration screens.

use crate::domain::{KERALA_CROPS, SoilType, UserData};

/// Single-line text input with a character-based cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextField {
    value: String,
    cursor: usize,
    max_chars: Option<usize>,
    masked: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input rendered as bullets, for passwords.
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Replaces the content and moves the cursor to the end.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        if self.max_chars.is_some_and(|max| self.len() >= max) {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    /// Text as it should appear on screen.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.len())
        } else {
            self.value.clone()
        }
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

/// Focus handling shared by every form: tab order over a fixed field count.
pub trait Form {
    fn field_count(&self) -> usize;
    fn focus(&self) -> usize;
    fn set_focus(&mut self, focus: usize);

    /// The text field under focus, if the focused field is a text field.
    fn focused_text(&mut self) -> Option<&mut TextField>;

    fn next_field(&mut self) {
        let next = (self.focus() + 1) % self.field_count();
        self.set_focus(next);
    }

    fn previous_field(&mut self) {
        let count = self.field_count();
        let previous = (self.focus() + count - 1) % count;
        self.set_focus(previous);
    }

    fn is_last_field(&self) -> bool {
        self.focus() + 1 == self.field_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

impl AuthTab {
    pub fn toggle(self) -> Self {
        match self {
            AuthTab::Login => AuthTab::Signup,
            AuthTab::Signup => AuthTab::Login,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginForm {
    pub mobile: TextField,
    pub password: TextField,
    focus: usize,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            mobile: TextField::new().with_max_chars(10),
            password: TextField::masked(),
            focus: 0,
        }
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        2
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, focus: usize) {
        self.focus = focus;
    }

    fn focused_text(&mut self) -> Option<&mut TextField> {
        match self.focus {
            0 => Some(&mut self.mobile),
            _ => Some(&mut self.password),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupForm {
    pub mobile: TextField,
    pub password: TextField,
    pub confirm: TextField,
    focus: usize,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            mobile: TextField::new().with_max_chars(10),
            password: TextField::masked(),
            confirm: TextField::masked(),
            focus: 0,
        }
    }
}

impl Form for SignupForm {
    fn field_count(&self) -> usize {
        3
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, focus: usize) {
        self.focus = focus;
    }

    fn focused_text(&mut self) -> Option<&mut TextField> {
        match self.focus {
            0 => Some(&mut self.mobile),
            1 => Some(&mut self.password),
            _ => Some(&mut self.confirm),
        }
    }
}

/// Registration fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationField {
    Name,
    LandSize,
    SoilType,
    PreviousCrop,
}

impl RegistrationField {
    pub const ALL: [RegistrationField; 4] = [
        RegistrationField::Name,
        RegistrationField::LandSize,
        RegistrationField::SoilType,
        RegistrationField::PreviousCrop,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    pub name: TextField,
    pub land_size: TextField,
    /// Index into `SoilType::ALL`.
    pub soil: usize,
    /// 0 is "None", otherwise `KERALA_CROPS[crop - 1]`.
    pub crop: usize,
    focus: usize,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::from_user_data(&UserData::default())
    }
}

impl RegistrationForm {
    /// Pre-fills the form from the cached profile.
    pub fn from_user_data(data: &UserData) -> Self {
        let mut name = TextField::new();
        name.set(data.name.clone().unwrap_or_default());
        let mut land_size = TextField::new();
        land_size.set(format!("{:.1}", data.land_size.unwrap_or(1.0)));

        let crop = data
            .previous_crop
            .as_deref()
            .and_then(|prev| KERALA_CROPS.iter().position(|c| *c == prev))
            .map_or(0, |i| i + 1);

        Self {
            name,
            land_size,
            soil: data.soil_type.unwrap_or_default().index(),
            crop,
            focus: 0,
        }
    }

    pub fn focused_field(&self) -> RegistrationField {
        RegistrationField::ALL[self.focus]
    }

    /// Moves a selection field by `delta`, wrapping around.
    pub fn cycle(&mut self, delta: isize) {
        let wrap = |current: usize, len: usize| -> usize {
            (current as isize + delta).rem_euclid(len as isize) as usize
        };
        match self.focused_field() {
            RegistrationField::SoilType => self.soil = wrap(self.soil, SoilType::ALL.len()),
            RegistrationField::PreviousCrop => self.crop = wrap(self.crop, KERALA_CROPS.len() + 1),
            RegistrationField::Name | RegistrationField::LandSize => {}
        }
    }

    /// Parsed land size; unparsable input reads as 0.
    pub fn land_size_value(&self) -> f64 {
        self.land_size.value().trim().parse().unwrap_or(0.0)
    }

    pub fn soil_type(&self) -> SoilType {
        SoilType::ALL[self.soil % SoilType::ALL.len()]
    }

    pub fn previous_crop(&self) -> Option<&'static str> {
        self.crop
            .checked_sub(1)
            .and_then(|i| KERALA_CROPS.get(i).copied())
    }
}

impl Form for RegistrationForm {
    fn field_count(&self) -> usize {
        RegistrationField::ALL.len()
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, focus: usize) {
        self.focus = focus;
    }

    fn focused_text(&mut self) -> Option<&mut TextField> {
        match self.focused_field() {
            RegistrationField::Name => Some(&mut self.name),
            RegistrationField::LandSize => Some(&mut self.land_size),
            RegistrationField::SoilType | RegistrationField::PreviousCrop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_editing() {
        let mut field = TextField::new();
        for c in "hello".chars() {
            field.insert(c);
        }
        field.move_left();
        field.move_left();
        field.insert('X');
        assert_eq!(field.value(), "helXlo");
        assert_eq!(field.cursor(), 4);

        field.backspace();
        assert_eq!(field.value(), "hello");
        field.home();
        field.delete();
        assert_eq!(field.value(), "ello");
        field.end();
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn test_text_field_multibyte() {
        let mut field = TextField::new();
        field.set("ആശ");
        field.move_left();
        field.insert('a');
        assert_eq!(field.value(), "ആaശ");
        field.end();
        field.backspace();
        assert_eq!(field.value(), "ആa");
    }

    #[test]
    fn test_text_field_max_chars() {
        let mut field = TextField::new().with_max_chars(3);
        for c in "12345".chars() {
            field.insert(c);
        }
        assert_eq!(field.value(), "123");
    }

    #[test]
    fn test_masked_display() {
        let mut field = TextField::masked();
        field.set("secret");
        assert_eq!(field.display(), "••••••");
        assert_eq!(field.value(), "secret");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = SignupForm::default();
        assert_eq!(form.focus(), 0);
        form.previous_field();
        assert_eq!(form.focus(), 2);
        assert!(form.is_last_field());
        form.next_field();
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn test_registration_defaults() {
        let form = RegistrationForm::default();
        assert_eq!(form.name.value(), "");
        assert_eq!(form.land_size.value(), "1.0");
        assert_eq!(form.soil_type(), SoilType::Loamy);
        assert_eq!(form.previous_crop(), None);
    }

    #[test]
    fn test_registration_prefill() {
        let data = UserData {
            name: Some("Asha".to_string()),
            land_size: Some(2.5),
            soil_type: Some(SoilType::Sandy),
            previous_crop: Some("Banana".to_string()),
            ..UserData::default()
        };
        let form = RegistrationForm::from_user_data(&data);
        assert_eq!(form.name.value(), "Asha");
        assert_eq!(form.land_size_value(), 2.5);
        assert_eq!(form.soil_type(), SoilType::Sandy);
        assert_eq!(form.previous_crop(), Some("Banana"));
    }

    #[test]
    fn test_registration_cycle_only_on_selects() {
        let mut form = RegistrationForm::default();
        form.cycle(1);
        assert_eq!(form.soil_type(), SoilType::Loamy);

        form.set_focus(2);
        form.cycle(1);
        assert_eq!(form.soil_type(), SoilType::Silt);
        form.cycle(-3);
        assert_eq!(form.soil_type(), SoilType::Clay);
        form.cycle(-1);
        assert_eq!(form.soil_type(), SoilType::Chalky);

        form.set_focus(3);
        form.cycle(-1);
        assert_eq!(form.previous_crop(), Some("Tea"));
        form.cycle(1);
        assert_eq!(form.previous_crop(), None);
    }

    #[test]
    fn test_land_size_unparsable_is_zero() {
        let mut form = RegistrationForm::default();
        form.land_size.set("two acres");
        assert_eq!(form.land_size_value(), 0.0);
    }
}
