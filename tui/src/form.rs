//! Contact Form Editing
//!
//! Keyboard editing of the contact form fields. The select box (service)
//! cycles through its options with Left/Right; text fields take characters.

use site_core::page::contact::{next_service, prev_service, ContactForm};

/// Focusable controls of the contact form, in tab order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Name input
    Name,
    /// Email input
    Email,
    /// Company input
    Company,
    /// Service select box
    Service,
    /// Message textarea
    Message,
    /// Submit button
    Submit,
}

impl FormField {
    /// All controls in tab order
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Email,
        FormField::Company,
        FormField::Service,
        FormField::Message,
        FormField::Submit,
    ];

    /// Label shown before the control
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nombre",
            Self::Email => "Email",
            Self::Company => "Empresa",
            Self::Service => "Servicio",
            Self::Message => "Mensaje",
            Self::Submit => "Enviar mensaje",
        }
    }

    /// Next control, wrapping
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Previous control, wrapping
    #[must_use]
    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// An editing keystroke aimed at a form control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldInput {
    /// Printable character
    Char(char),
    /// Delete the last character
    Backspace,
    /// Previous option (select box)
    Left,
    /// Next option (select box)
    Right,
}

/// Apply `input` to `field`; returns whether the form changed
pub fn edit(form: &mut ContactForm, field: FormField, input: FieldInput) -> bool {
    let text = match field {
        FormField::Name => &mut form.name,
        FormField::Email => &mut form.email,
        FormField::Company => &mut form.company,
        FormField::Message => &mut form.message,
        FormField::Service => {
            let before = form.service;
            form.service = match input {
                FieldInput::Left => prev_service(form.service),
                FieldInput::Right | FieldInput::Char(' ') => next_service(form.service),
                FieldInput::Backspace => None,
                FieldInput::Char(_) => form.service,
            };
            return form.service != before;
        }
        FormField::Submit => return false,
    };

    match input {
        FieldInput::Char(c) if !c.is_control() => {
            text.push(c);
            true
        }
        FieldInput::Backspace => text.pop().is_some(),
        _ => false,
    }
}

/// Text shown inside a control
#[must_use]
pub fn display_value(form: &ContactForm, field: FormField) -> String {
    match field {
        FormField::Name => form.name.clone(),
        FormField::Email => form.email.clone(),
        FormField::Company => form.company.clone(),
        FormField::Message => form.message.clone(),
        FormField::Service => form
            .service
            .map_or_else(|| "Selecciona un servicio".to_string(), |s| s.label().to_string()),
        FormField::Submit => String::new(),
    }
}
