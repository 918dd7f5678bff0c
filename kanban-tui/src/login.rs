//! Sign-in / registration form state.

use crate::editor::{field_text, set_focused, text_field};
use crate::keys::FormKey;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kanban_core::{LoginRequest, RegisterRequest};
use tui_textarea::TextArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Sign in",
            AuthMode::Register => "Create account",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSubmit {
    Login(LoginRequest),
    Register(RegisterRequest),
}

pub struct LoginForm {
    mode: AuthMode,
    username: TextArea<'static>,
    email: TextArea<'static>,
    password: TextArea<'static>,
    focus: LoginField,
    pub error: Option<String>,
    submitting: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        let mut password = text_field("");
        password.set_mask_char('\u{2022}');
        let mut form = Self {
            mode: AuthMode::Login,
            username: text_field(""),
            email: text_field(""),
            password,
            focus: LoginField::Email,
            error: None,
            submitting: false,
        };
        form.sync_cursors();
        form
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn focus(&self) -> LoginField {
        self.focus
    }

    pub fn username(&self) -> &TextArea<'static> {
        &self.username
    }

    pub fn email(&self) -> &TextArea<'static> {
        &self.email
    }

    pub fn password(&self) -> &TextArea<'static> {
        &self.password
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Fields shown in the current mode, top to bottom.
    pub fn fields(&self) -> &'static [LoginField] {
        match self.mode {
            AuthMode::Login => &[LoginField::Email, LoginField::Password],
            AuthMode::Register => &[LoginField::Username, LoginField::Email, LoginField::Password],
        }
    }

    pub fn handle(&mut self, key: FormKey) -> Option<AuthSubmit> {
        match key {
            FormKey::ToggleMode => {
                self.mode = match self.mode {
                    AuthMode::Login => AuthMode::Register,
                    AuthMode::Register => AuthMode::Login,
                };
                if !self.fields().contains(&self.focus) {
                    self.focus = LoginField::Email;
                }
                self.error = None;
                self.sync_cursors();
            }
            FormKey::NextField => self.step_focus(1),
            FormKey::PrevField => self.step_focus(self.fields().len() - 1),
            FormKey::Submit => return self.submit(),
            FormKey::Cancel => {
                self.error = None;
            }
            FormKey::Left => self.input(plain(KeyCode::Left)),
            FormKey::Right => self.input(plain(KeyCode::Right)),
            FormKey::Text(event) => self.input(event),
        }
        None
    }

    /// The attempt finished. On failure the reason is shown on the form.
    pub fn finished(&mut self, error: Option<String>) {
        self.submitting = false;
        self.error = error;
        if self.error.is_none() {
            self.password = text_field("");
            self.password.set_mask_char('\u{2022}');
            self.sync_cursors();
        }
    }

    fn submit(&mut self) -> Option<AuthSubmit> {
        if self.submitting {
            return None;
        }
        let email = field_text(&self.email).trim().to_string();
        let password = field_text(&self.password);
        let submit = match self.mode {
            AuthMode::Login => {
                let request = LoginRequest::new(email, password);
                request.validate().map(|_| AuthSubmit::Login(request))
            }
            AuthMode::Register => {
                let username = field_text(&self.username).trim().to_string();
                let request = RegisterRequest::new(username, email, password);
                request.validate().map(|_| AuthSubmit::Register(request))
            }
        };
        match submit {
            Ok(submit) => {
                self.submitting = true;
                self.error = None;
                Some(submit)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    fn step_focus(&mut self, step: usize) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(current + step) % fields.len()];
        self.sync_cursors();
    }

    fn input(&mut self, event: KeyEvent) {
        let area = match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        };
        area.input(event);
    }

    fn sync_cursors(&mut self) {
        set_focused(&mut self.username, self.focus == LoginField::Username);
        set_focused(&mut self.email, self.focus == LoginField::Email);
        set_focused(&mut self.password, self.focus == LoginField::Password);
    }
}

fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut LoginForm, text: &str) {
        for c in text.chars() {
            form.handle(FormKey::Text(plain(KeyCode::Char(c))));
        }
    }

    #[test]
    fn test_login_submit_builds_request() {
        let mut form = LoginForm::new();
        type_text(&mut form, "ada@example.com");
        form.handle(FormKey::NextField);
        type_text(&mut form, "secret");

        let submit = form.handle(FormKey::Submit);

        assert_eq!(
            submit,
            Some(AuthSubmit::Login(LoginRequest::new("ada@example.com", "secret")))
        );
        assert!(form.is_submitting());
        assert_eq!(form.handle(FormKey::Submit), None);
    }

    #[test]
    fn test_missing_password_shows_error() {
        let mut form = LoginForm::new();
        type_text(&mut form, "ada@example.com");
        assert_eq!(form.handle(FormKey::Submit), None);
        assert_eq!(form.error.as_deref(), Some("password is required"));
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_f2_toggles_register_fields() {
        let mut form = LoginForm::new();
        form.handle(FormKey::ToggleMode);
        assert_eq!(form.mode(), AuthMode::Register);
        assert_eq!(form.fields().len(), 3);

        form.handle(FormKey::PrevField);
        assert_eq!(form.focus(), LoginField::Username);
        type_text(&mut form, "ada");
        form.handle(FormKey::NextField);
        type_text(&mut form, "ada@example.com");
        form.handle(FormKey::NextField);
        type_text(&mut form, "pw");

        assert_eq!(
            form.handle(FormKey::Submit),
            Some(AuthSubmit::Register(RegisterRequest::new(
                "ada",
                "ada@example.com",
                "pw"
            )))
        );
    }

    #[test]
    fn test_failed_attempt_keeps_form_with_reason() {
        let mut form = LoginForm::new();
        type_text(&mut form, "a@b.c");
        form.handle(FormKey::NextField);
        type_text(&mut form, "bad");
        form.handle(FormKey::Submit);

        form.finished(Some("Invalid credentials".to_string()));

        assert!(!form.is_submitting());
        assert_eq!(form.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(field_text(form.password()), "bad");
    }
}
