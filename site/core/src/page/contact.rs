//! Contact Form
//!
//! Validation and a simulated submission. Submitting a valid form holds the
//! form in [`FormStatus::Submitting`] for a fixed delay, then clears it and
//! shows a success banner. Banners disappear after a time-to-live, and a new
//! banner always replaces the current one.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default simulated submission time
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(2000);

/// Default banner lifetime
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_millis(5000);

/// Banner text after a successful submission
pub const SUCCESS_MESSAGE: &str = "¡Mensaje enviado correctamente! Te contactaremos pronto.";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// A single failed validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name shorter than two characters after trimming
    #[error("El nombre debe tener al menos 2 caracteres")]
    NameTooShort,

    /// Email does not look like `local@domain.tld`
    #[error("Por favor ingresa un email válido")]
    InvalidEmail,

    /// No service chosen
    #[error("Por favor selecciona un servicio")]
    MissingService,

    /// Message shorter than ten characters after trimming
    #[error("El mensaje debe tener al menos 10 caracteres")]
    MessageTooShort,
}

/// Services offered in the form's select box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    /// Web development
    DesarrolloWeb,
    /// Mobile apps
    AppsMoviles,
    /// Automation
    Automatizacion,
    /// Consulting
    Consultoria,
}

impl Service {
    /// All options in display order
    pub const ALL: [Service; 4] = [
        Service::DesarrolloWeb,
        Service::AppsMoviles,
        Service::Automatizacion,
        Service::Consultoria,
    ];

    /// Form value
    #[must_use]
    pub fn value(self) -> &'static str {
        match self {
            Self::DesarrolloWeb => "desarrollo-web",
            Self::AppsMoviles => "apps-moviles",
            Self::Automatizacion => "automatizacion",
            Self::Consultoria => "consultoria",
        }
    }

    /// Label shown to the user
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DesarrolloWeb => "Desarrollo Web",
            Self::AppsMoviles => "Apps Móviles",
            Self::Automatizacion => "Automatización",
            Self::Consultoria => "Consultoría",
        }
    }
}

/// Step a select box one option forward, starting from "none selected"
#[must_use]
pub fn next_service(current: Option<Service>) -> Option<Service> {
    match current {
        None => Some(Service::ALL[0]),
        Some(s) => {
            let index = Service::ALL.iter().position(|o| *o == s).unwrap_or(0);
            Service::ALL.get(index + 1).copied()
        }
    }
}

/// Step a select box one option back; before the first option is "none"
#[must_use]
pub fn prev_service(current: Option<Service>) -> Option<Service> {
    match current {
        None => Service::ALL.last().copied(),
        Some(s) => {
            let index = Service::ALL.iter().position(|o| *o == s).unwrap_or(0);
            index.checked_sub(1).map(|i| Service::ALL[i])
        }
    }
}

/// Contact form fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Optional company
    pub company: String,
    /// Requested service
    pub service: Option<Service>,
    /// Free text
    pub message: String,
}

impl ContactForm {
    /// Check every rule and collect all failures in field order
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().chars().count() < 2 {
            errors.push(ValidationError::NameTooShort);
        }
        if !EMAIL_RE.is_match(&self.email) {
            errors.push(ValidationError::InvalidEmail);
        }
        if self.service.is_none() {
            errors.push(ValidationError::MissingService);
        }
        if self.message.trim().chars().count() < 10 {
            errors.push(ValidationError::MessageTooShort);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Banner kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    /// Submission accepted
    Success,
    /// Validation failed
    Error,
}

/// Message shown above the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    /// Success or error styling
    pub kind: BannerKind,
    /// Text, possibly multi-line
    pub text: String,
    remaining: Duration,
}

/// Whether the form accepts input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormStatus {
    /// Accepting input
    #[default]
    Editing,
    /// Waiting for the simulated submission
    Submitting,
}

/// Outcome of [`ContactController::submit`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Form is valid; submission started
    Accepted,
    /// Form is invalid; an error banner is showing
    Rejected(Vec<ValidationError>),
    /// A submission is already in flight
    Busy,
}

/// Contact form state machine, driven by frame deltas
#[derive(Clone, Debug)]
pub struct ContactController {
    form: ContactForm,
    status: FormStatus,
    pending: Option<(ContactForm, Duration)>,
    banner: Option<Banner>,
    submit_delay: Duration,
    message_ttl: Duration,
}

impl Default for ContactController {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY, DEFAULT_MESSAGE_TTL)
    }
}

impl ContactController {
    /// Create a controller with explicit timings
    #[must_use]
    pub fn new(submit_delay: Duration, message_ttl: Duration) -> Self {
        Self {
            form: ContactForm::default(),
            status: FormStatus::Editing,
            pending: None,
            banner: None,
            submit_delay,
            message_ttl,
        }
    }

    /// Current field values
    #[must_use]
    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Mutable access to the fields; ignored while submitting
    pub fn form_mut(&mut self) -> Option<&mut ContactForm> {
        match self.status {
            FormStatus::Editing => Some(&mut self.form),
            FormStatus::Submitting => None,
        }
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// Banner currently shown
    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Validate and, if valid, start the simulated submission
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.status == FormStatus::Submitting {
            return SubmitOutcome::Busy;
        }

        match self.form.validate() {
            Ok(()) => {
                tracing::debug!("Contact form submitting");
                self.status = FormStatus::Submitting;
                self.pending = Some((self.form.clone(), self.submit_delay));
                SubmitOutcome::Accepted
            }
            Err(errors) => {
                let text = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                self.show(BannerKind::Error, text);
                SubmitOutcome::Rejected(errors)
            }
        }
    }

    /// Advance timers by `delta`
    pub fn update(&mut self, delta: Duration) {
        if let Some((data, remaining)) = self.pending.take() {
            match remaining.checked_sub(delta).filter(|r| !r.is_zero()) {
                Some(left) => self.pending = Some((data, left)),
                None => {
                    tracing::info!(
                        name = %data.name,
                        email = %data.email,
                        company = %data.company,
                        service = data.service.map_or("", Service::value),
                        message = %data.message,
                        "Contact form submitted"
                    );
                    self.form = ContactForm::default();
                    self.status = FormStatus::Editing;
                    self.show(BannerKind::Success, SUCCESS_MESSAGE.to_string());
                    // The new banner starts its lifetime now.
                    return;
                }
            }
        }

        if let Some(banner) = &mut self.banner {
            match banner.remaining.checked_sub(delta).filter(|r| !r.is_zero()) {
                Some(left) => banner.remaining = left,
                None => self.banner = None,
            }
        }
    }

    fn show(&mut self, kind: BannerKind, text: String) {
        self.banner = Some(Banner {
            kind,
            text,
            remaining: self.message_ttl,
        });
    }
}
