//! Draws a [`World`] into a [`Canvas`].

use crate::canvas::Canvas;
use crate::settings::{BACKGROUND, OUTLINE};
use crate::world::World;

/// Clear the canvas, outline the container and fill every ball.
pub fn draw_world(canvas: &mut Canvas, world: &World) {
    canvas.clear(BACKGROUND);

    let container = world.container();
    canvas.stroke_rect(
        container.origin.x as i32,
        container.origin.y as i32,
        container.width as i32,
        container.height as i32,
        OUTLINE,
    );

    for ball in world.balls() {
        let center = ball.position.round();
        canvas.fill_circle(
            center.x as i32,
            center.y as i32,
            ball.radius.round() as i32,
            ball.color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_draws_container_and_balls() {
        let world = World::with_seed(Settings { ball_count: 1, ..Settings::default() }, 3);
        let mut canvas = Canvas::new(1000, 1000);
        draw_world(&mut canvas, &world);

        assert_eq!(canvas.pixel(0, 0), Some(BACKGROUND));
        assert_eq!(canvas.pixel(300, 300), Some(OUTLINE));
        assert_eq!(canvas.pixel(899, 899), Some(OUTLINE));
        assert_eq!(canvas.pixel(600, 600), Some(BACKGROUND));

        let ball = &world.balls()[0];
        assert_eq!(canvas.pixel(320, 320), Some(ball.color));
    }

    #[test]
    fn test_small_canvas_does_not_panic() {
        let world = World::with_seed(Settings { ball_count: 100, ..Settings::default() }, 3);
        let mut canvas = Canvas::new(64, 48);
        draw_world(&mut canvas, &world);
        assert_eq!(canvas.pixel(10, 10), Some(BACKGROUND));
    }
}
