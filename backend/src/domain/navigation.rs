//! Per-role navigation menus and the active-section state of a shell.
//!
//! Menus are a static lookup table keyed by [`Role`]; each entry lists its
//! sections in display order together with the section shown on first
//! render. [`NavigationState`] tracks the visible section and the collapsible
//! navigation overlay used on compact viewports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Role;

/// Every content pane a shell can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Faculty overview.
    Dashboard,
    /// Review of tutor responses.
    Responses,
    /// FAQ and knowledge base editor.
    Knowledge,
    /// Quality assurance queue.
    Quality,
    /// Student roster.
    Students,
    /// Account profile, shared by every role.
    Profile,
    /// User management.
    Users,
    /// System settings.
    System,
    /// Performance monitor.
    Performance,
    /// Usage analytics.
    Analytics,
    /// Security settings.
    Security,
    /// Third-party integrations.
    Integrations,
    /// Tutoring chat.
    Chat,
    /// Past conversations.
    History,
    /// Course resources.
    Resources,
}

impl Section {
    const ALL: [Self; 15] = [
        Self::Dashboard,
        Self::Responses,
        Self::Knowledge,
        Self::Quality,
        Self::Students,
        Self::Profile,
        Self::Users,
        Self::System,
        Self::Performance,
        Self::Analytics,
        Self::Security,
        Self::Integrations,
        Self::Chat,
        Self::History,
        Self::Resources,
    ];

    /// Stable identifier used in URLs and payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Responses => "responses",
            Self::Knowledge => "knowledge",
            Self::Quality => "quality",
            Self::Students => "students",
            Self::Profile => "profile",
            Self::Users => "users",
            Self::System => "system",
            Self::Performance => "performance",
            Self::Analytics => "analytics",
            Self::Security => "security",
            Self::Integrations => "integrations",
            Self::Chat => "chat",
            Self::History => "history",
            Self::Resources => "resources",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an identifier that names no section at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

/// One navigation entry: the section and its menu label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionDescriptor {
    /// Section shown when the entry is chosen.
    pub section: Section,
    /// Menu label.
    pub label: &'static str,
}

const fn entry(section: Section, label: &'static str) -> SectionDescriptor {
    SectionDescriptor { section, label }
}

/// Ordered menu and default section for one role.
#[derive(Debug, PartialEq, Eq)]
pub struct RoleMenu {
    role: Role,
    default_section: Section,
    entries: &'static [SectionDescriptor],
}

static ADMIN_MENU: RoleMenu = RoleMenu {
    role: Role::Admin,
    default_section: Section::Users,
    entries: &[
        entry(Section::Users, "User Management"),
        entry(Section::System, "System Settings"),
        entry(Section::Performance, "Performance"),
        entry(Section::Analytics, "Analytics"),
        entry(Section::Security, "Security"),
        entry(Section::Integrations, "Integrations"),
        entry(Section::Profile, "Profile"),
    ],
};

static FACULTY_MENU: RoleMenu = RoleMenu {
    role: Role::Faculty,
    default_section: Section::Dashboard,
    entries: &[
        entry(Section::Dashboard, "Dashboard"),
        entry(Section::Responses, "Student Responses"),
        entry(Section::Knowledge, "Knowledge Base"),
        entry(Section::Quality, "Quality Assurance"),
        entry(Section::Students, "Students"),
        entry(Section::Profile, "Profile"),
    ],
};

static STUDENT_MENU: RoleMenu = RoleMenu {
    role: Role::Student,
    default_section: Section::Chat,
    entries: &[
        entry(Section::Chat, "Ask Hannah"),
        entry(Section::History, "Conversation History"),
        entry(Section::Resources, "Course Resources"),
        entry(Section::Profile, "Profile"),
    ],
};

impl RoleMenu {
    /// Menu for `role`.
    ///
    /// # Examples
    /// ```
    /// use hannah_backend::domain::{Role, RoleMenu, Section};
    ///
    /// assert_eq!(RoleMenu::for_role(Role::Admin).default_section(), Section::Users);
    /// assert_eq!(RoleMenu::for_role(Role::Faculty).default_section(), Section::Dashboard);
    /// ```
    #[must_use]
    pub fn for_role(role: Role) -> &'static Self {
        match role {
            Role::Admin => &ADMIN_MENU,
            Role::Faculty => &FACULTY_MENU,
            Role::Student => &STUDENT_MENU,
        }
    }

    /// Role owning the menu.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Section shown on first render.
    #[must_use]
    pub fn default_section(&self) -> Section {
        self.default_section
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &'static [SectionDescriptor] {
        self.entries
    }

    /// Whether `section` belongs to this menu.
    #[must_use]
    pub fn contains(&self, section: Section) -> bool {
        self.entries.iter().any(|entry| entry.section == section)
    }

    /// Map a requested section to one this menu can show.
    #[must_use]
    pub fn resolve(&self, section: Section) -> Section {
        if self.contains(section) {
            section
        } else {
            self.default_section
        }
    }

    /// Map a raw section id to one this menu can show; unknown ids fall back
    /// to the default.
    #[must_use]
    pub fn resolve_id(&self, id: &str) -> Section {
        id.parse::<Section>()
            .map_or(self.default_section, |section| self.resolve(section))
    }
}

/// Viewport class reported by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Viewport {
    /// Narrow screens where the navigation panel overlays content.
    Compact,
    /// Wide screens with a permanently visible sidebar.
    #[default]
    Wide,
}

/// Active section and overlay state inside an authenticated shell.
///
/// Not persisted: a fresh state starts on the role's default section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    menu: &'static RoleMenu,
    active: Section,
    viewport: Viewport,
    overlay_open: bool,
}

impl NavigationState {
    /// State for a freshly mounted shell.
    #[must_use]
    pub fn new(role: Role, viewport: Viewport) -> Self {
        let menu = RoleMenu::for_role(role);
        Self {
            menu,
            active: menu.default_section(),
            viewport,
            overlay_open: false,
        }
    }

    /// Menu driving this state.
    #[must_use]
    pub fn menu(&self) -> &'static RoleMenu {
        self.menu
    }

    /// Section currently shown.
    #[must_use]
    pub fn active(&self) -> Section {
        self.active
    }

    /// Current viewport class.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the navigation overlay is open.
    #[must_use]
    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    /// Switch to `section`, falling back to the role default when the menu
    /// does not offer it. Closes the overlay on compact viewports.
    pub fn select_section(&mut self, section: Section) -> Section {
        self.active = self.menu.resolve(section);
        if self.viewport == Viewport::Compact {
            self.overlay_open = false;
        }
        self.active
    }

    /// Switch by raw id; unknown ids behave like sections outside the menu.
    ///
    /// # Examples
    /// ```
    /// use hannah_backend::domain::{NavigationState, Role, Section, Viewport};
    ///
    /// let mut nav = NavigationState::new(Role::Faculty, Viewport::Wide);
    /// assert_eq!(nav.select("knowledge"), Section::Knowledge);
    /// assert_eq!(nav.select("security"), Section::Dashboard);
    /// ```
    pub fn select(&mut self, id: &str) -> Section {
        let requested = self.menu.resolve_id(id);
        self.select_section(requested)
    }

    /// Record a viewport change.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Open the navigation overlay.
    pub fn open_overlay(&mut self) {
        self.overlay_open = true;
    }

    /// Close the navigation overlay.
    pub fn close_overlay(&mut self) {
        self.overlay_open = false;
    }

    /// Flip the navigation overlay.
    pub fn toggle_overlay(&mut self) {
        self.overlay_open = !self.overlay_open;
    }
}
