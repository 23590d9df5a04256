//! Editing state of the user form modal.
//!
use crate::model::User;
use crate::validate::{Field, FieldErrors, validate};

/// Inputs of the form, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Username,
    Street,
    City,
    Company,
    Website,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Username,
        FormField::Street,
        FormField::City,
        FormField::Company,
        FormField::Website,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
            FormField::Username => "Username",
            FormField::Street => "Street",
            FormField::City => "City",
            FormField::Company => "Company (Optional)",
            FormField::Website => "Website (Optional)",
        }
    }

    pub fn read_only(self) -> bool {
        self == FormField::Username
    }

    /// The validation error shown below this input, if any. Street and city
    /// share the address error, which is shown once after the city input.
    pub fn error_key(self) -> Option<Field> {
        match self {
            FormField::Name => Some(Field::Name),
            FormField::Email => Some(Field::Email),
            FormField::Phone => Some(Field::Phone),
            FormField::City => Some(Field::Address),
            FormField::Company => Some(Field::Company),
            FormField::Website => Some(Field::Website),
            FormField::Username | FormField::Street => None,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// How the `USER-` username prefix is applied when an existing record is opened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum UsernamePrefix {
    /// The prefix is only drawn; the stored username is submitted unchanged.
    #[default]
    DisplayOnly,
    /// Legacy behavior: the prefix is written into the form value on open and
    /// drawn again on display, so each edit of a record compounds it.
    Compat,
}

pub const USERNAME_PREFIX: &str = "USER-";

#[derive(Clone, Debug)]
pub struct FormState {
    pub values: User,
    pub focus: FormField,
    pub errors: FieldErrors,
    pub prefix: UsernamePrefix,
}

impl FormState {
    /// Open the form for `user`; a draft without id means "create new".
    pub fn open(user: &User, prefix: UsernamePrefix) -> Self {
        let mut values = user.clone();
        if prefix == UsernamePrefix::Compat && !user.is_draft() {
            values.username = format!("{USERNAME_PREFIX}{}", user.username);
        }
        Self {
            values,
            focus: FormField::Name,
            errors: FieldErrors::new(),
            prefix,
        }
    }

    /// Id of the record being edited, `None` when creating.
    pub fn target(&self) -> Option<u64> {
        self.values.id
    }

    pub fn title(&self) -> &'static str {
        if self.values.is_draft() { "Add user" } else { "Edit user" }
    }

    /// Text shown for a field. The username always gets the prefix drawn in front.
    pub fn display_value(&self, field: FormField) -> String {
        match field {
            FormField::Username => format!("{USERNAME_PREFIX}{}", self.values.username),
            FormField::Name => self.values.name.clone(),
            FormField::Email => self.values.email.clone(),
            FormField::Phone => self.values.phone.clone(),
            FormField::Street => self.values.address.street.clone(),
            FormField::City => self.values.address.city.clone(),
            FormField::Company => self.values.company.clone().unwrap_or_default(),
            FormField::Website => self.values.website.clone().unwrap_or_default(),
        }
    }

    pub fn error_for(&self, field: FormField) -> Option<&'static str> {
        field.error_key().and_then(|k| self.errors.get(&k).copied())
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(FormField::ALL.len() - 1);
    }

    // Read-only inputs are skipped.
    fn step_focus(&mut self, step: usize) {
        let len = FormField::ALL.len();
        let mut idx = self.focus.index();
        loop {
            idx = (idx + step) % len;
            if !FormField::ALL[idx].read_only() {
                break;
            }
        }
        self.focus = FormField::ALL[idx];
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.text_mut(self.focus) {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.text_mut(self.focus) {
            text.pop();
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.values.name),
            FormField::Email => Some(&mut self.values.email),
            FormField::Phone => Some(&mut self.values.phone),
            FormField::Street => Some(&mut self.values.address.street),
            FormField::City => Some(&mut self.values.address.city),
            FormField::Company => Some(self.values.company.get_or_insert_with(String::new)),
            FormField::Website => Some(self.values.website.get_or_insert_with(String::new)),
            FormField::Username => None,
        }
    }

    /// The payload a submit would send: empty optional inputs become absent.
    pub fn draft(&self) -> User {
        let mut draft = self.values.clone();
        if draft.company.as_deref() == Some("") {
            draft.company = None;
        }
        if draft.website.as_deref() == Some("") {
            draft.website = None;
        }
        draft
    }

    /// Validate and, only when valid, hand the draft to `on_submit`.
    /// Errors are kept on the form for display either way.
    pub fn submit<F: FnOnce(User)>(&mut self, on_submit: F) -> bool {
        let draft = self.draft();
        self.errors = validate(&draft);
        if self.errors.is_empty() {
            on_submit(draft);
            true
        } else {
            false
        }
    }
}
