//! Ball storage and the physics update.
//!
//! A [`World`] is a fixed rectangle (the [`Container`]) with a handful of
//! balls falling inside it. Each frame, while running, every ball gets
//!
//! 1. gravity added to its vertical velocity (scaled by frame time),
//! 2. its velocity added to its position,
//! 3. its center clamped back inside the container, reflecting and damping
//!    the velocity on any wall it crossed.
//!
//! Balls do not collide with each other.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ball::{Ball, Rgba};
use crate::settings::{Settings, CONTAINER_ORIGIN, RESTITUTION, SPAWN_ORIGIN};

/// The axis-aligned box the balls live in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    /// Top-left corner in window pixels.
    pub origin: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Container {
    pub fn new(origin: Vec2, width: f32, height: f32) -> Self {
        Self { origin, width, height }
    }

    fn from_settings(settings: &Settings) -> Self {
        let size = settings.container_size();
        Self::new(CONTAINER_ORIGIN, size.x, size.y)
    }

    /// Range a ball center of the given radius may occupy.
    ///
    /// When the container is smaller than the ball, `min` exceeds `max`.
    pub fn bounds_for(&self, radius: f32) -> (Vec2, Vec2) {
        let min = self.origin + Vec2::splat(radius);
        let max = self.origin + Vec2::new(self.width, self.height) - Vec2::splat(radius);
        (min, max)
    }
}

/// Snap a ball that left the container back onto the wall it crossed.
///
/// The velocity component along that axis is reflected and scaled by
/// [`RESTITUTION`]. The max wall is checked before the min wall on each axis.
pub fn resolve_collision(ball: &mut Ball, container: &Container) {
    let (min, max) = container.bounds_for(ball.radius);

    if ball.position.x > max.x {
        ball.position.x = max.x;
        ball.velocity.x *= -RESTITUTION;
    }
    if ball.position.x < min.x {
        ball.position.x = min.x;
        ball.velocity.x *= -RESTITUTION;
    }
    if ball.position.y > max.y {
        ball.position.y = max.y;
        ball.velocity.y *= -RESTITUTION;
    }
    if ball.position.y < min.y {
        ball.position.y = min.y;
        ball.velocity.y *= -RESTITUTION;
    }
}

/// Grid position of ball `index` in a spawn of `count` balls.
pub fn grid_position(index: usize, count: usize, radius: f32, spacing: f32) -> Vec2 {
    let per_row = ((count as f64).sqrt() as usize).max(1);
    let cell = radius * 2.0 + spacing;
    let col = (index % per_row) as f32;
    let row = (index / per_row) as f32;
    SPAWN_ORIGIN + Vec2::new(col, row) * cell
}

/// All simulation state.
pub struct World {
    balls: Vec<Ball>,
    settings: Settings,
    /// Settings whose radius and container size the balls currently reflect.
    applied: Settings,
    container: Container,
    running: bool,
    rng: StdRng,
}

impl World {
    /// Create a stopped world with a freshly spawned grid.
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Like [`World::new`] but with reproducible ball colors.
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: Settings, rng: StdRng) -> Self {
        let settings = settings.clamped();
        let mut world = Self {
            balls: Vec::new(),
            settings,
            applied: settings,
            container: Container::from_settings(&settings),
            running: false,
            rng,
        };
        world.spawn_grid();
        world
    }

    /// Replace every ball with a new grid at rest.
    ///
    /// The run flag is left alone.
    pub fn spawn_grid(&mut self) {
        let count = self.settings.ball_count;
        let radius = self.settings.radius as f32;
        let spacing = self.settings.spacing;

        self.balls.clear();
        self.balls.reserve(count);
        for i in 0..count {
            let position = grid_position(i, count, radius, spacing);
            let color = Rgba::random_opaque(&mut self.rng);
            self.balls.push(Ball::at_rest(position, radius, color));
        }
        log::debug!("Spawned {} balls (radius {}, spacing {:.1})", count, radius, spacing);
    }

    /// Advance one frame. Does nothing while stopped.
    pub fn step(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let gravity = self.settings.gravity;
        for ball in &mut self.balls {
            ball.velocity.y += gravity * dt;
            ball.position += ball.velocity;
            resolve_collision(ball, &self.container);
        }
    }

    /// Push a radius or container change onto the existing balls.
    ///
    /// Radii are overwritten and centers clamped into the new bounds;
    /// velocities are kept. A no-op when the geometry hasn't changed.
    pub fn sync_settings(&mut self) {
        if !self.settings.geometry_changed(&self.applied) {
            return;
        }
        let radius = self.settings.radius as f32;
        self.container = Container::from_settings(&self.settings);
        let (min, max) = self.container.bounds_for(radius);
        for ball in &mut self.balls {
            ball.radius = radius;
            ball.position = ball.position.max(min).min(max);
        }
        self.applied.radius = self.settings.radius;
        self.applied.container_width = self.settings.container_width;
        self.applied.container_height = self.settings.container_height;
    }

    /// Adopt new settings.
    ///
    /// A changed ball count or spacing respawns the grid immediately;
    /// geometry changes wait for the next [`World::sync_settings`].
    pub fn set_settings(&mut self, settings: Settings) {
        let settings = settings.clamped();
        let respawn = settings.layout_changed(&self.settings);
        self.settings = settings;
        if respawn {
            self.spawn_grid();
        }
    }

    /// Respawn and stop.
    pub fn reset(&mut self) {
        self.spawn_grid();
        self.running = false;
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The container the balls are currently confined to.
    pub fn container(&self) -> &Container {
        &self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(settings: Settings) -> World {
        World::with_seed(settings, 1)
    }

    fn container() -> Container {
        Container::new(Vec2::new(300.0, 300.0), 600.0, 600.0)
    }

    #[test]
    fn test_spawn_grid_layout() {
        let w = world(Settings {
            ball_count: 10,
            radius: 15,
            spacing: 5.0,
            ..Settings::default()
        });
        // floor(sqrt(10)) = 3 per row, cell = 35
        let balls = w.balls();
        assert_eq!(balls.len(), 10);
        assert_eq!(balls[0].position, Vec2::new(320.0, 320.0));
        assert_eq!(balls[1].position, Vec2::new(355.0, 320.0));
        assert_eq!(balls[3].position, Vec2::new(320.0, 355.0));
        assert_eq!(balls[9].position, Vec2::new(320.0, 425.0));
        assert!(balls.iter().all(|b| b.velocity == Vec2::ZERO && b.radius == 15.0));
    }

    #[test]
    fn test_single_ball_grid() {
        let w = world(Settings { ball_count: 1, ..Settings::default() });
        assert_eq!(w.balls().len(), 1);
        assert_eq!(w.balls()[0].position, SPAWN_ORIGIN);
    }

    #[test]
    fn test_new_world_is_stopped() {
        let mut w = world(Settings::default());
        let before = w.balls().to_vec();
        w.step(1.0);
        assert!(!w.is_running());
        assert_eq!(w.balls(), &before[..]);
    }

    #[test]
    fn test_step_applies_gravity_then_moves() {
        let mut w = world(Settings { gravity: 10.0, ball_count: 1, ..Settings::default() });
        w.set_running(true);
        w.step(0.1);
        let b = &w.balls()[0];
        assert!((b.velocity.y - 1.0).abs() < 1e-6);
        assert!((b.position.y - 321.0).abs() < 1e-4);
        assert_eq!(b.position.x, 320.0);
    }

    #[test]
    fn test_zero_gravity_stays_put() {
        let mut w = world(Settings { gravity: 0.0, ..Settings::default() });
        let before = w.balls().to_vec();
        w.set_running(true);
        for _ in 0..100 {
            w.step(1.0 / 60.0);
        }
        assert_eq!(w.balls(), &before[..]);
    }

    #[test]
    fn test_bounce_on_floor() {
        let mut ball = Ball::at_rest(Vec2::new(500.0, 890.0), 15.0, Rgba::default());
        ball.velocity = Vec2::new(0.0, 10.0);
        ball.position += ball.velocity;
        resolve_collision(&mut ball, &container());
        assert_eq!(ball.position.y, 885.0);
        assert!((ball.velocity.y + 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_on_each_wall() {
        let c = container();
        let cases = [
            (Vec2::new(950.0, 500.0), Vec2::new(5.0, 0.0), Vec2::new(885.0, 500.0)),
            (Vec2::new(250.0, 500.0), Vec2::new(-5.0, 0.0), Vec2::new(315.0, 500.0)),
            (Vec2::new(500.0, 250.0), Vec2::new(0.0, -5.0), Vec2::new(500.0, 315.0)),
        ];
        for (pos, vel, expected) in cases {
            let mut ball = Ball::at_rest(pos, 15.0, Rgba::default());
            ball.velocity = vel;
            resolve_collision(&mut ball, &c);
            assert_eq!(ball.position, expected);
            assert_eq!(ball.velocity, vel * -RESTITUTION);
        }
    }

    #[test]
    fn test_inside_ball_untouched() {
        let mut ball = Ball::at_rest(Vec2::new(500.0, 500.0), 15.0, Rgba::default());
        ball.velocity = Vec2::new(3.0, -2.0);
        let before = ball.clone();
        resolve_collision(&mut ball, &container());
        assert_eq!(ball, before);
    }

    #[test]
    fn test_inverted_bounds_min_wins() {
        let c = Container::new(Vec2::new(300.0, 300.0), 20.0, 20.0);
        let mut ball = Ball::at_rest(Vec2::new(310.0, 310.0), 15.0, Rgba::default());
        resolve_collision(&mut ball, &c);
        assert_eq!(ball.position, Vec2::new(315.0, 315.0));
    }

    #[test]
    fn test_balls_stay_inside_while_running() {
        let mut w = world(Settings { gravity: 20.0, ball_count: 100, ..Settings::default() });
        w.set_running(true);
        for _ in 0..600 {
            w.sync_settings();
            w.step(1.0 / 60.0);
        }
        let (min, max) = w.container().bounds_for(15.0);
        for b in w.balls() {
            assert!(b.position.cmpge(min).all() && b.position.cmple(max).all(), "{:?}", b.position);
        }
    }

    #[test]
    fn test_bouncing_loses_energy() {
        let mut w = world(Settings { gravity: 20.0, ball_count: 1, ..Settings::default() });
        w.set_running(true);
        for _ in 0..6000 {
            w.step(1.0 / 60.0);
        }
        let b = &w.balls()[0];
        let floor = w.container().bounds_for(b.radius).1.y;
        assert!(floor - b.position.y < 2.0, "ball should settle on the floor");
    }

    #[test]
    fn test_geometry_change_clamps_and_resizes() {
        let mut w = world(Settings::default());
        w.set_settings(Settings {
            radius: 30,
            container_width: 200,
            container_height: 200,
            ..Settings::default()
        });
        // Nothing moves until the sync.
        assert_eq!(w.balls()[0].radius, 15.0);

        w.sync_settings();
        let (min, max) = w.container().bounds_for(30.0);
        assert_eq!(min, Vec2::new(330.0, 330.0));
        assert_eq!(max, Vec2::new(470.0, 470.0));
        for b in w.balls() {
            assert_eq!(b.radius, 30.0);
            assert!(b.position.cmpge(min).all() && b.position.cmple(max).all());
        }
    }

    #[test]
    fn test_geometry_change_keeps_velocity() {
        let mut w = world(Settings { ball_count: 1, ..Settings::default() });
        w.set_running(true);
        w.step(0.5);
        let v = w.balls()[0].velocity;
        w.set_settings(Settings { ball_count: 1, radius: 20, ..Settings::default() });
        w.sync_settings();
        assert_eq!(w.balls()[0].velocity, v);
        assert_eq!(w.balls()[0].radius, 20.0);
    }

    #[test]
    fn test_count_change_respawns_and_keeps_running() {
        let mut w = world(Settings::default());
        w.set_running(true);
        w.step(0.5);
        w.set_settings(Settings { ball_count: 25, ..Settings::default() });
        assert_eq!(w.balls().len(), 25);
        assert!(w.balls().iter().all(|b| b.velocity == Vec2::ZERO));
        assert!(w.is_running());
    }

    #[test]
    fn test_spacing_change_respawns() {
        let mut w = world(Settings { ball_count: 4, ..Settings::default() });
        w.set_settings(Settings { ball_count: 4, spacing: 10.0, ..Settings::default() });
        assert_eq!(w.balls()[1].position, Vec2::new(360.0, 320.0));
    }

    #[test]
    fn test_gravity_change_does_not_respawn() {
        let mut w = world(Settings::default());
        w.set_running(true);
        w.step(0.5);
        let moved = w.balls().to_vec();
        w.set_settings(Settings { gravity: 1.0, ..Settings::default() });
        assert_eq!(w.balls(), &moved[..]);
    }

    #[test]
    fn test_reset_stops_and_respawns() {
        let mut w = world(Settings::default());
        w.toggle_running();
        w.step(0.5);
        w.reset();
        assert!(!w.is_running());
        assert_eq!(w.balls()[0].position, SPAWN_ORIGIN);
        assert!(w.balls().iter().all(|b| b.velocity == Vec2::ZERO));
    }

    #[test]
    fn test_set_settings_clamps() {
        let mut w = world(Settings::default());
        w.set_settings(Settings { ball_count: 1000, ..Settings::default() });
        assert_eq!(w.balls().len(), 100);
    }

    #[test]
    fn test_seeded_colors_repeat() {
        let a = World::with_seed(Settings::default(), 99);
        let b = World::with_seed(Settings::default(), 99);
        let colors = |w: &World| w.balls().iter().map(|b| b.color).collect::<Vec<_>>();
        assert_eq!(colors(&a), colors(&b));
    }
}
