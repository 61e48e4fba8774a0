#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MainTab {
    #[default]
    Dashboard,
    SocialExperience,
    Network,
    Messaging,
    EquityTrading,
    ExpertMarketplace,
    Intelligence,
    MyVentures,
    MyServices,
    Profile,
}

impl MainTab {
    pub fn as_str(self) -> &'static str {
        match self {
            MainTab::Dashboard => "dashboard",
            MainTab::SocialExperience => "social-experience",
            MainTab::Network => "network",
            MainTab::Messaging => "messaging",
            MainTab::EquityTrading => "equity-trading",
            MainTab::ExpertMarketplace => "expert-marketplace",
            MainTab::Intelligence => "intelligence",
            MainTab::MyVentures => "my-ventures",
            MainTab::MyServices => "my-services",
            MainTab::Profile => "profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradingTab {
    PortfolioSummary,
}

/// Shell state: which main tab is shown and which overlays are open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub active: MainTab,
    pub initial_trading_tab: Option<TradingTab>,
    pub menu_open: bool,
    pub profile_dropdown_open: bool,
    pub notifications_open: bool,
    supports_trading_tab: bool,
}

impl NavigationState {
    pub fn new(supports_trading_tab: bool) -> Self {
        Self {
            supports_trading_tab,
            ..Self::default()
        }
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn toggle_profile_dropdown(&mut self) {
        self.profile_dropdown_open = !self.profile_dropdown_open;
    }

    pub fn toggle_notifications(&mut self) {
        self.notifications_open = !self.notifications_open;
    }

    pub fn select(&mut self, tab: MainTab) {
        self.active = tab;
    }

    /// Only shells that accept an initial trading tab react to this.
    pub fn open_my_investments(&mut self) {
        if self.supports_trading_tab {
            self.initial_trading_tab = Some(TradingTab::PortfolioSummary);
            self.active = MainTab::EquityTrading;
            self.profile_dropdown_open = false;
        }
    }

    pub fn open_my_ventures(&mut self) {
        self.open_from_dropdown(MainTab::MyVentures);
    }

    pub fn open_my_services(&mut self) {
        self.open_from_dropdown(MainTab::MyServices);
    }

    pub fn open_profile(&mut self) {
        self.open_from_dropdown(MainTab::Profile);
    }

    fn open_from_dropdown(&mut self, tab: MainTab) {
        self.active = tab;
        self.profile_dropdown_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_state() {
        let mut nav = NavigationState::new(true);
        nav.toggle_menu();
        nav.toggle_notifications();
        assert!(nav.menu_open);
        assert!(nav.notifications_open);
        nav.toggle_menu();
        assert!(!nav.menu_open);
    }

    #[test]
    fn dropdown_shortcuts_select_tab_and_close_dropdown() {
        let mut nav = NavigationState::new(false);
        nav.toggle_profile_dropdown();
        nav.open_my_ventures();
        assert_eq!(nav.active, MainTab::MyVentures);
        assert!(!nav.profile_dropdown_open);

        nav.toggle_profile_dropdown();
        nav.open_profile();
        assert_eq!(nav.active.as_str(), "profile");
        assert!(!nav.profile_dropdown_open);
    }

    #[test]
    fn my_investments_needs_trading_tab_support() {
        let mut nav = NavigationState::new(false);
        nav.toggle_profile_dropdown();
        nav.open_my_investments();
        assert_eq!(nav.active, MainTab::Dashboard);
        assert!(nav.profile_dropdown_open);

        let mut nav = NavigationState::new(true);
        nav.toggle_profile_dropdown();
        nav.open_my_investments();
        assert_eq!(nav.active, MainTab::EquityTrading);
        assert_eq!(nav.initial_trading_tab, Some(TradingTab::PortfolioSummary));
        assert!(!nav.profile_dropdown_open);
    }
}
