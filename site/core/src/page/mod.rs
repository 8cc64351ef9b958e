//! Page Model and Behaviours
//!
//! The showcase page is a static list of sections, each holding cards. This
//! module owns the content; the submodules implement the interactive
//! behaviours as pure state machines that any surface can drive:
//!
//! - [`navigation`]: scroll targets, scroll-spy, active/focused nav link
//! - [`menu`]: mobile menu toggle
//! - [`header`]: translucent header once the page has scrolled
//! - [`contact`]: contact form validation and simulated submission
//! - [`reveal`]: entrance animations driven by viewport intersection
//! - [`scroll`]: eased smooth scrolling
//! - [`debounce`]: trailing-edge debouncer for bursty events
//!
//! Geometry is expressed in abstract rows: a surface lays the page out and
//! reports each section's and card's [`Bounds`].

pub mod contact;
pub mod debounce;
pub mod header;
pub mod menu;
pub mod navigation;
pub mod reveal;
pub mod scroll;

use serde::{Deserialize, Serialize};

/// Vertical extent of an element in page rows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// First row of the element
    pub top: u32,
    /// Number of rows the element occupies
    pub height: u32,
}

impl Bounds {
    /// Create bounds from a top row and a height
    #[must_use]
    pub const fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    /// One past the last row
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

/// The visible window onto the page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible page row (the scroll offset)
    pub top: u32,
    /// Number of visible rows
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }
}

/// What a card represents; drives which entrance animation observes it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Offered service
    Service,
    /// Portfolio project
    Project,
    /// Team member profile
    TeamMember,
    /// Contact detail (address, e-mail, phone)
    ContactItem,
}

/// A content block inside a section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier within the page
    pub id: String,
    /// Card category
    pub kind: CardKind,
    /// Heading
    pub title: String,
    /// Body text
    pub body: String,
    /// Also observed by the sticky `revealed` animation
    #[serde(default)]
    pub reveal: bool,
}

impl Card {
    fn new(id: &str, kind: CardKind, title: &str, body: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            body: body.to_string(),
            reveal: false,
        }
    }

    fn revealing(mut self) -> Self {
        self.reveal = true;
        self
    }
}

/// How a section is laid out
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    /// Landing banner, optionally with the code typing window
    Hero {
        /// Short pitch under the title
        tagline: String,
        /// Whether the page hosts the typing demo
        code_window: bool,
    },
    /// Grid of cards
    Cards,
    /// Contact details plus the contact form
    Contact,
}

/// A navigable section of the page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Anchor id (navigation target)
    pub id: String,
    /// Label of the matching nav link
    pub nav_label: String,
    /// Heading
    pub title: String,
    /// Layout
    pub kind: SectionKind,
    /// Content cards
    pub cards: Vec<Card>,
}

/// The whole showcase page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Brand shown in the header
    pub brand: String,
    /// Sections in document order
    pub sections: Vec<Section>,
}

impl Page {
    /// Find a section by anchor id
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Whether any section hosts the code typing window
    #[must_use]
    pub fn has_code_window(&self) -> bool {
        self.sections.iter().any(|s| {
            matches!(
                s.kind,
                SectionKind::Hero {
                    code_window: true,
                    ..
                }
            )
        })
    }

    /// All cards in document order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.sections.iter().flat_map(|s| s.cards.iter())
    }

    /// The EusaSpark landing page
    #[must_use]
    pub fn eusaspark() -> Self {
        Self {
            brand: "EusaSpark".to_string(),
            sections: vec![
                Section {
                    id: "inicio".into(),
                    nav_label: "Inicio".into(),
                    title: "Encendemos tus ideas digitales".into(),
                    kind: SectionKind::Hero {
                        tagline: "Software a medida, automatización y experiencias web que convierten."
                            .into(),
                        code_window: true,
                    },
                    cards: Vec::new(),
                },
                Section {
                    id: "servicios".into(),
                    nav_label: "Servicios".into(),
                    title: "Servicios".into(),
                    kind: SectionKind::Cards,
                    cards: vec![
                        Card::new(
                            "servicio-web",
                            CardKind::Service,
                            "Desarrollo web",
                            "Sitios y aplicaciones rápidas, accesibles y fáciles de mantener.",
                        ),
                        Card::new(
                            "servicio-movil",
                            CardKind::Service,
                            "Apps móviles",
                            "Aplicaciones nativas y multiplataforma centradas en el usuario.",
                        ),
                        Card::new(
                            "servicio-automatizacion",
                            CardKind::Service,
                            "Automatización",
                            "Flujos que eliminan tareas repetitivas y conectan tus sistemas.",
                        ),
                        Card::new(
                            "servicio-consultoria",
                            CardKind::Service,
                            "Consultoría",
                            "Arquitectura, revisión de código y acompañamiento técnico.",
                        ),
                    ],
                },
                Section {
                    id: "proyectos".into(),
                    nav_label: "Proyectos".into(),
                    title: "Proyectos".into(),
                    kind: SectionKind::Cards,
                    cards: vec![
                        Card::new(
                            "proyecto-tienda",
                            CardKind::Project,
                            "Tienda en línea",
                            "Comercio electrónico con pagos integrados y panel de control.",
                        )
                        .revealing(),
                        Card::new(
                            "proyecto-logistica",
                            CardKind::Project,
                            "Logística inteligente",
                            "Optimización de rutas y seguimiento de flotas en tiempo real.",
                        )
                        .revealing(),
                        Card::new(
                            "proyecto-salud",
                            CardKind::Project,
                            "Plataforma de salud",
                            "Citas en línea e historial clínico seguro para clínicas.",
                        )
                        .revealing(),
                    ],
                },
                Section {
                    id: "equipo".into(),
                    nav_label: "Equipo".into(),
                    title: "Equipo".into(),
                    kind: SectionKind::Cards,
                    cards: vec![
                        Card::new(
                            "equipo-direccion",
                            CardKind::TeamMember,
                            "Dirección técnica",
                            "Arquitectura de sistemas y liderazgo de proyectos.",
                        ),
                        Card::new(
                            "equipo-diseno",
                            CardKind::TeamMember,
                            "Diseño de producto",
                            "Interfaces claras y coherentes en cada pantalla.",
                        ),
                        Card::new(
                            "equipo-ingenieria",
                            CardKind::TeamMember,
                            "Ingeniería",
                            "Backend, frontend y operaciones en la nube.",
                        ),
                    ],
                },
                Section {
                    id: "contacto".into(),
                    nav_label: "Contacto".into(),
                    title: "Contacto".into(),
                    kind: SectionKind::Contact,
                    cards: vec![
                        Card::new(
                            "contacto-email",
                            CardKind::ContactItem,
                            "Correo",
                            "hola@eusaspark.dev",
                        ),
                        Card::new(
                            "contacto-ubicacion",
                            CardKind::ContactItem,
                            "Ubicación",
                            "Trabajo remoto, clientes en todo el mundo.",
                        ),
                    ],
                },
            ],
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::eusaspark()
    }
}
