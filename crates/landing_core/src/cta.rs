//! Call-to-action routing table.

use shared::domain::CtaAction;

/// What activating a CTA does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtaRoute {
    /// Show the loading overlay briefly and open the signup modal.
    OpenSignup,
}

const ROUTES: [(CtaAction, CtaRoute); 4] = [
    (CtaAction::Hero, CtaRoute::OpenSignup),
    (CtaAction::Map, CtaRoute::OpenSignup),
    (CtaAction::Pricing, CtaRoute::OpenSignup),
    (CtaAction::Generic, CtaRoute::OpenSignup),
];

pub fn route(action: CtaAction) -> CtaRoute {
    ROUTES
        .iter()
        .find_map(|(candidate, route)| (*candidate == action).then_some(*route))
        .unwrap_or(CtaRoute::OpenSignup)
}
