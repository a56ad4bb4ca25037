//! Auth-screen flow state: which panel is showing, and where the user
//! is in the onboarding welcome flow.
//!
//! Pure client state — nothing here touches the network or storage. The
//! shell reads it to decide what to render and drives it forward as the
//! user moves through onboarding.

use std::fmt;

// ---------------------------------------------------------------------------
// AuthPanel
// ---------------------------------------------------------------------------

/// Which panel the auth screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPanel {
    #[default]
    Login,
    Signup,
}

// ---------------------------------------------------------------------------
// WelcomeStage
// ---------------------------------------------------------------------------

/// Progress through the first-visit welcome flow.
///
/// Stages are strictly ordered — no skipping forward:
///
/// ```text
/// NoWelcome ──(start)──→ Info → Favorites → Schedule ──(finish)──→ NoWelcome
/// ```
///
/// `NoWelcome` doubles as "not started" and "finished"; a profile whose
/// `needs_welcome` flag is set is what triggers the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WelcomeStage {
    #[default]
    NoWelcome,
    Info,
    Favorites,
    Schedule,
}

impl WelcomeStage {
    /// The stage after this one, or `None` when the flow is over.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::NoWelcome => None,
            Self::Info => Some(Self::Favorites),
            Self::Favorites => Some(Self::Schedule),
            Self::Schedule => Some(Self::NoWelcome),
        }
    }

    /// `true` while the welcome flow is running.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::NoWelcome)
    }
}

impl fmt::Display for WelcomeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWelcome => f.write_str("NoWelcome"),
            Self::Info => f.write_str("Info"),
            Self::Favorites => f.write_str("Favorites"),
            Self::Schedule => f.write_str("Schedule"),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthFlow
// ---------------------------------------------------------------------------

/// The combined auth-screen flow state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthFlow {
    panel: AuthPanel,
    stage: WelcomeStage,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> AuthPanel {
        self.panel
    }

    pub fn stage(&self) -> WelcomeStage {
        self.stage
    }

    /// Switches between the login and signup panels.
    pub fn set_panel(&mut self, panel: AuthPanel) {
        self.panel = panel;
    }

    /// Begins the welcome flow at its first stage.
    pub fn start_welcome(&mut self) {
        self.stage = WelcomeStage::Info;
    }

    /// Advances to the next stage. Returns the new stage; a no-op when
    /// the flow isn't running.
    pub fn advance(&mut self) -> WelcomeStage {
        if let Some(next) = self.stage.next() {
            self.stage = next;
        }
        self.stage
    }

    /// Abandons the welcome flow ("Skip").
    pub fn skip_welcome(&mut self) {
        self.stage = WelcomeStage::NoWelcome;
    }
}
