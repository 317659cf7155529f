//! The "Simulation Settings" window.
//!
//! The panel edits a copy of the [`Settings`] and reports what the user did
//! as a list of [`PanelAction`]s; the caller applies them to the world.

use crate::settings::{
    Settings, BALL_COUNT_RANGE, CONTAINER_RANGE, CONTAINER_STEP, GRAVITY_RANGE, GRAVITY_STEP,
    RADIUS_RANGE, SPACING_RANGE, SPACING_STEP,
};

pub const PANEL_TITLE: &str = "Simulation Settings";
const PANEL_POS: [f32; 2] = [10.0, 10.0];
const PANEL_WIDTH: f32 = 250.0;
const BUTTON_HEIGHT: f32 = 30.0;

/// Something the user asked for this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    /// Start or stop the simulation.
    ToggleRunning,
    /// One or more sliders moved.
    SettingsChanged(Settings),
    /// Respawn the balls and stop.
    Reset,
}

/// What the panel shows and edits.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub settings: Settings,
    pub running: bool,
    pub fps: f32,
}

impl PanelState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            running: false,
            fps: 0.0,
        }
    }

    /// Label of the run/stop button.
    pub fn toggle_label(&self) -> &'static str {
        if self.running {
            "Stop Simulation"
        } else {
            "Start Simulation"
        }
    }
}

/// Draw the settings window and collect the user's actions.
pub fn settings_panel(ctx: &egui::Context, state: &mut PanelState) -> Vec<PanelAction> {
    let mut clicked = Vec::new();
    let before = state.settings;

    egui::Window::new(PANEL_TITLE)
        .default_pos(PANEL_POS)
        .default_width(PANEL_WIDTH)
        .movable(true)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            let width = ui.available_width();
            if ui
                .add_sized([width, BUTTON_HEIGHT], egui::Button::new(state.toggle_label()))
                .clicked()
            {
                clicked.push(PanelAction::ToggleRunning);
            }

            ui.add_space(4.0);
            let s = &mut state.settings;

            ui.label("Gravity:");
            ui.add(egui::Slider::new(&mut s.gravity, GRAVITY_RANGE).step_by(GRAVITY_STEP));

            ui.label("Balls Num:");
            ui.add(egui::Slider::new(&mut s.ball_count, BALL_COUNT_RANGE));

            ui.label("Ball Spacing:");
            ui.add(egui::Slider::new(&mut s.spacing, SPACING_RANGE).step_by(SPACING_STEP));

            ui.label("Ball Radius:");
            ui.add(egui::Slider::new(&mut s.radius, RADIUS_RANGE));

            ui.label("Rectangle Width:");
            ui.add(
                egui::Slider::new(&mut s.container_width, CONTAINER_RANGE)
                    .step_by(CONTAINER_STEP),
            );

            ui.label("Rectangle Height:");
            ui.add(
                egui::Slider::new(&mut s.container_height, CONTAINER_RANGE)
                    .step_by(CONTAINER_STEP),
            );

            ui.add_space(4.0);
            if ui
                .add_sized([width, BUTTON_HEIGHT], egui::Button::new("Reset Particles"))
                .clicked()
            {
                clicked.push(PanelAction::Reset);
            }

            ui.separator();
            ui.label(format!("{} balls | {:.0} FPS", state.settings.ball_count, state.fps));
        });

    ordered_actions(&before, &state.settings, clicked)
}

/// Settings go first so a reset in the same frame uses the new values.
fn ordered_actions(
    before: &Settings,
    after: &Settings,
    clicked: Vec<PanelAction>,
) -> Vec<PanelAction> {
    if before == after {
        return clicked;
    }
    let mut actions = Vec::with_capacity(clicked.len() + 1);
    actions.push(PanelAction::SettingsChanged(*after));
    actions.extend(clicked);
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: [f32; 2] = [1100.0, 1050.0];

    /// Headless egui driver: one context kept across frames, like the app.
    struct Driver {
        ctx: egui::Context,
        state: PanelState,
    }

    impl Driver {
        fn new() -> Self {
            let mut driver = Self {
                ctx: egui::Context::default(),
                state: PanelState::new(Settings::default()),
            };
            // The first frames size the window before it is shown.
            driver.frame(Vec::new());
            driver.frame(Vec::new());
            driver
        }

        fn frame(&mut self, events: Vec<egui::Event>) -> (Vec<PanelAction>, egui::FullOutput) {
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, SCREEN.into())),
                events,
                ..Default::default()
            };
            let mut actions = Vec::new();
            let state = &mut self.state;
            let output = self.ctx.run(input, |ctx| {
                actions = settings_panel(ctx, state);
            });
            (actions, output)
        }

        /// Screen rect of the first piece of text reading `text`.
        fn text_rect(&mut self, text: &str) -> egui::Rect {
            let (_, output) = self.frame(Vec::new());
            output
                .shapes
                .iter()
                .find_map(|clipped| find_text(&clipped.shape, text))
                .unwrap_or_else(|| panic!("{:?} is not on screen", text))
        }

        /// Move, press and release at `pos`; returns every action reported.
        fn click(&mut self, pos: egui::Pos2) -> Vec<PanelAction> {
            let button = |pressed| egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: egui::Modifiers::default(),
            };
            let mut actions = self.frame(vec![egui::Event::PointerMoved(pos)]).0;
            actions.extend(self.frame(vec![egui::Event::PointerMoved(pos), button(true)]).0);
            actions.extend(self.frame(vec![button(false)]).0);
            actions
        }
    }

    fn find_text(shape: &egui::Shape, text: &str) -> Option<egui::Rect> {
        match shape {
            egui::Shape::Text(t) if t.galley.text() == text => {
                Some(egui::Rect::from_min_size(t.pos, t.galley.size()))
            }
            egui::Shape::Vec(shapes) => shapes.iter().find_map(|s| find_text(s, text)),
            _ => None,
        }
    }

    #[test]
    fn test_idle_panel_reports_nothing() {
        let mut driver = Driver::new();
        assert!(driver.frame(Vec::new()).0.is_empty());
        assert_eq!(driver.state.settings, Settings::default());
    }

    #[test]
    fn test_toggle_label() {
        let mut state = PanelState::new(Settings::default());
        assert_eq!(state.toggle_label(), "Start Simulation");
        state.running = true;
        assert_eq!(state.toggle_label(), "Stop Simulation");
    }

    #[test]
    fn test_panel_sits_top_left() {
        let mut driver = Driver::new();
        let title = driver.text_rect(PANEL_TITLE);
        assert!(title.left() < 60.0 && title.top() < 60.0, "title at {:?}", title);
    }

    #[test]
    fn test_start_button_toggles() {
        let mut driver = Driver::new();
        let button = driver.text_rect("Start Simulation");
        assert_eq!(driver.click(button.center()), vec![PanelAction::ToggleRunning]);
    }

    #[test]
    fn test_stop_button_toggles() {
        let mut driver = Driver::new();
        driver.state.running = true;
        let button = driver.text_rect("Stop Simulation");
        assert_eq!(driver.click(button.center()), vec![PanelAction::ToggleRunning]);
    }

    #[test]
    fn test_reset_button() {
        let mut driver = Driver::new();
        let button = driver.text_rect("Reset Particles");
        assert_eq!(driver.click(button.center()), vec![PanelAction::Reset]);
        assert_eq!(driver.state.settings, Settings::default());
    }

    #[test]
    fn test_clicking_radius_slider_changes_settings() {
        let mut driver = Driver::new();
        let label = driver.text_rect("Ball Radius:");
        let next = driver.text_rect("Rectangle Width:");
        // Near the right end of the rail, which starts under the label.
        let pos = egui::pos2(label.left() + 90.0, (label.bottom() + next.top()) / 2.0);

        let actions = driver.click(pos);
        let radius = driver.state.settings.radius;
        assert!(radius > Settings::default().radius, "radius stayed at {}", radius);
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            PanelAction::SettingsChanged(s) => {
                assert_eq!(s.radius, radius);
                assert_eq!(s.ball_count, Settings::default().ball_count);
            }
            other => panic!("expected a settings change, got {:?}", other),
        }
    }

    #[test]
    fn test_settings_change_goes_before_buttons() {
        let before = Settings::default();
        let after = Settings { ball_count: 25, ..before };
        let actions = ordered_actions(&before, &after, vec![PanelAction::Reset]);
        assert_eq!(
            actions,
            vec![PanelAction::SettingsChanged(after), PanelAction::Reset]
        );

        // Applied in that order, the reset respawns with the new count.
        let mut world = crate::world::World::with_seed(before, 1);
        for action in actions {
            match action {
                PanelAction::SettingsChanged(s) => world.set_settings(s),
                PanelAction::Reset => world.reset(),
                PanelAction::ToggleRunning => world.toggle_running(),
            }
        }
        assert_eq!(world.balls().len(), 25);
    }

    #[test]
    fn test_unchanged_settings_add_nothing() {
        let s = Settings::default();
        assert_eq!(
            ordered_actions(&s, &s, vec![PanelAction::ToggleRunning]),
            vec![PanelAction::ToggleRunning]
        );
        assert!(ordered_actions(&s, &s, Vec::new()).is_empty());
    }
}
