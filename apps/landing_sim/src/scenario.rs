//! Scripted interaction scenarios run against the headless landing page.

use anyhow::{anyhow, bail, Context};
use landing_core::{
    form::SubmissionPhase,
    headless::{HeadlessController, HeadlessPage, PresentationCommand},
    port::ObserverKind,
    ControllerConfig, ControllerMode, PresentationPort, UiEvent,
};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{ElementId, Key, Region},
    error::{ControllerError, ErrorReport},
};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub page: PageSetup,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub scroll_offset: f64,
    pub smooth_scroll: bool,
    pub popups_blocked: bool,
    /// Regions removed from the standard page before initialization.
    pub without: Vec<Region>,
    pub failing_observer: Option<ObserverKind>,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            viewport_width: 375.0,
            viewport_height: 800.0,
            scroll_offset: 0.0,
            smooth_scroll: true,
            popups_blocked: false,
            without: Vec::new(),
            failing_observer: None,
        }
    }
}

impl PageSetup {
    fn build(&self) -> HeadlessPage {
        let mut page = HeadlessPage::landing()
            .with_viewport(self.viewport_width, self.viewport_height);
        for region in &self.without {
            page = page.without(*region);
        }
        if !self.smooth_scroll {
            page = page.without_smooth_scroll();
        }
        if self.popups_blocked {
            page = page.with_popups_blocked();
        }
        if let Some(observer) = self.failing_observer {
            page = page.with_failing_observer(observer);
        }
        page.set_scroll_offset(self.scroll_offset);
        page
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Click {
        region: Region,
    },
    /// Clicks the element with this DOM id, e.g. `hero-cta`.
    ClickId {
        dom_id: String,
    },
    /// Clicks the nth navigation menu link.
    ClickLink {
        index: usize,
    },
    Key {
        key: String,
        #[serde(default)]
        shift: bool,
    },
    Fill {
        name: String,
        email: String,
        intent: String,
    },
    Submit,
    Resize {
        width: f64,
    },
    Orientation,
    /// Intersection change for the nth animated element.
    Reveal {
        index: usize,
        #[serde(default = "visible")]
        visible: bool,
    },
    /// Intersection change for the hero landmark.
    Hero {
        visible: bool,
    },
    Touch {
        pressed: bool,
    },
    Visibility {
        hidden: bool,
    },
    Advance {
        ms: u64,
    },
    Refresh,
    Teardown,
}

fn visible() -> bool {
    true
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Step::Click { .. } => "click",
            Step::ClickId { .. } => "click_id",
            Step::ClickLink { .. } => "click_link",
            Step::Key { .. } => "key",
            Step::Fill { .. } => "fill",
            Step::Submit => "submit",
            Step::Resize { .. } => "resize",
            Step::Orientation => "orientation",
            Step::Reveal { .. } => "reveal",
            Step::Hero { .. } => "hero",
            Step::Touch { .. } => "touch",
            Step::Visibility { .. } => "visibility",
            Step::Advance { .. } => "advance",
            Step::Refresh => "refresh",
            Step::Teardown => "teardown",
        }
    }
}

impl Scenario {
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("failed to parse scenario")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub action: &'static str,
    pub commands: Vec<PresentationCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalState {
    pub mode: ControllerMode,
    pub menu_open: Option<bool>,
    pub modal_open: bool,
    pub scroll_locked: bool,
    pub form_phase: Option<SubmissionPhase>,
    pub revealed: usize,
    pub header_scrolled: Option<bool>,
    pub resize_completions: u64,
    pub scroll_offset: f64,
    pub pending_timers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: Option<String>,
    pub missing: Vec<Region>,
    pub failure: Option<ErrorReport>,
    pub steps: Vec<StepRecord>,
    pub final_state: FinalState,
}

pub fn run(scenario: &Scenario, config: ControllerConfig) -> anyhow::Result<RunSummary> {
    let mut controller = HeadlessController::headless(scenario.page.build(), config);
    let report = controller.initialize();
    controller.port_mut().take_log();

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        apply(&mut controller, step)
            .with_context(|| format!("step {index} ({})", step.label()))?;
        let commands = controller.port_mut().take_log();
        debug!(index, action = step.label(), commands = commands.len(), "sim: step applied");
        steps.push(StepRecord {
            index,
            action: step.label(),
            commands,
        });
    }

    let final_state = final_state(&controller);
    info!(steps = steps.len(), mode = ?final_state.mode, "sim: scenario finished");
    Ok(RunSummary {
        scenario: scenario.name.clone(),
        missing: report.missing,
        failure: report.failure.map(ErrorReport::from),
        steps,
        final_state,
    })
}

fn apply(controller: &mut HeadlessController, step: &Step) -> anyhow::Result<()> {
    match step {
        Step::Click { region } => {
            let target = require(controller, *region)?;
            controller.click_element(target);
        }
        Step::ClickId { dom_id } => {
            let target = controller
                .port()
                .element_by_dom_id(dom_id)
                .ok_or_else(|| anyhow!("no element with id {dom_id:?}"))?;
            controller.click_element(target);
        }
        Step::ClickLink { index } => {
            let menu = require(controller, Region::NavMenu)?;
            let link = controller
                .port()
                .menu_links(menu)
                .get(*index)
                .copied()
                .ok_or_else(|| anyhow!("no menu link at index {index}"))?;
            controller.click_element(link);
        }
        Step::Key { key, shift } => {
            controller.press(Key::from_dom_key(key), *shift);
        }
        Step::Fill {
            name,
            email,
            intent,
        } => controller.port_mut().fill_signup(name, email, intent),
        Step::Submit => {
            controller.handle(UiEvent::Submit);
        }
        Step::Resize { width } => {
            controller.resize(*width);
        }
        Step::Orientation => {
            controller.handle(UiEvent::OrientationChange);
        }
        Step::Reveal { index, visible } => {
            let Some(target) = controller.animated().get(*index).map(|item| item.element) else {
                bail!("no animated element at index {index}");
            };
            controller.intersect(target, *visible);
        }
        Step::Hero { visible } => {
            let hero = require(controller, Region::Hero)?;
            controller.intersect(hero, *visible);
        }
        Step::Touch { pressed } => {
            let toggle = require(controller, Region::NavToggle)?;
            let event = if *pressed {
                UiEvent::TouchStart { target: toggle }
            } else {
                UiEvent::TouchEnd { target: toggle }
            };
            controller.handle(event);
        }
        Step::Visibility { hidden } => {
            controller.handle(UiEvent::VisibilityChanged { hidden: *hidden });
        }
        Step::Advance { ms } => controller.advance(*ms),
        Step::Refresh => {
            controller.refresh();
        }
        Step::Teardown => controller.teardown(),
    }
    Ok(())
}

fn require(controller: &HeadlessController, region: Region) -> anyhow::Result<ElementId> {
    controller
        .port()
        .region(region)
        .ok_or_else(|| ControllerError::MissingRegion(region).into())
}

fn final_state(controller: &HeadlessController) -> FinalState {
    FinalState {
        mode: controller.mode(),
        menu_open: controller.menu_state().map(|state| state.is_open),
        modal_open: controller.modal_state().is_open,
        scroll_locked: controller.is_scroll_locked(),
        form_phase: controller.form_state().map(|state| state.phase),
        revealed: controller.reveal_order().len(),
        header_scrolled: controller.header_scrolled(),
        resize_completions: controller.resize_completions(),
        scroll_offset: controller.port().current_scroll(),
        pending_timers: controller.pending_timers(),
    }
}

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod tests;
