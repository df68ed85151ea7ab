//! Shape generation for composite figures

use glam::Vec2;

use super::{Color, Shape, colors};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// Stick figure centred on `pos`: head, body, legs and optionally arms
pub fn stick_figure(
    out: &mut Vec<Shape>,
    pos: Vec2,
    width: f32,
    height: f32,
    color: Color,
    arms: bool,
) {
    let head = pos - Vec2::new(0.0, height / 2.0);
    let head_radius = width / 2.0;
    let hip = pos + Vec2::new(0.0, height / 4.0);

    out.push(Shape::Circle {
        center: head,
        radius: head_radius,
        color,
    });
    out.push(Shape::Ring {
        center: head,
        radius: head_radius,
        thickness: 2.0,
        color: colors::WHITE,
    });
    out.push(Shape::Line {
        from: head + Vec2::new(0.0, head_radius),
        to: hip,
        width: 4.0,
        color,
    });

    if arms {
        let shoulder = pos - Vec2::new(0.0, 5.0);
        for side in [-1.0, 1.0] {
            out.push(Shape::Line {
                from: shoulder,
                to: shoulder + Vec2::new(side * width / 2.0, -5.0),
                width: 3.0,
                color,
            });
        }
    }

    for side in [-1.0, 1.0] {
        out.push(Shape::Line {
            from: hip,
            to: pos + Vec2::new(side * width / 2.0, height / 2.0),
            width: 4.0,
            color,
        });
    }
}

/// Two-tone fill bar (health). `top_left` is the bar's corner.
pub fn bar(out: &mut Vec<Shape>, top_left: Vec2, size: Vec2, current: u32, maximum: u32) {
    out.push(Shape::Rect {
        min: top_left,
        max: top_left + size,
        color: colors::BAR_BACK,
    });

    let ratio = if maximum == 0 {
        0.0
    } else {
        (current as f32 / maximum as f32).clamp(0.0, 1.0)
    };
    if ratio > 0.0 {
        out.push(Shape::Rect {
            min: top_left,
            max: top_left + Vec2::new(size.x * ratio, size.y),
            color: colors::BAR_FILL,
        });
    }
}

/// Fading trail; newer points are larger and more opaque.
///
/// `quality` in [0, 1] thins out the oldest points.
pub fn trail(out: &mut Vec<Shape>, points: &[Vec2], radius: f32, color: Color, quality: f32) {
    if points.is_empty() {
        return;
    }
    let len = points.len() as f32;
    let keep = ((len * quality.clamp(0.0, 1.0)).ceil() as usize).min(points.len());
    let skip = points.len() - keep;

    for (i, pos) in points.iter().enumerate().skip(skip) {
        let t = (i + 1) as f32 / len;
        let mut c = color;
        c[3] = t * 0.5;
        out.push(Shape::Circle {
            center: *pos,
            radius: radius * t,
            color: c,
        });
    }
}

/// Ring with a cross through it at the pointer
pub fn crosshair(out: &mut Vec<Shape>, at: Vec2, color: Color) {
    out.push(Shape::Ring {
        center: at,
        radius: 12.0,
        thickness: 2.0,
        color,
    });
    out.push(Shape::Line {
        from: at - Vec2::new(8.0, 0.0),
        to: at + Vec2::new(8.0, 0.0),
        width: 2.0,
        color,
    });
    out.push(Shape::Line {
        from: at - Vec2::new(0.0, 8.0),
        to: at + Vec2::new(0.0, 8.0),
        width: 2.0,
        color,
    });
}

/// Background grid covering the playfield
pub fn grid(out: &mut Vec<Shape>, spacing: f32, color: Color) {
    if spacing <= 0.0 {
        return;
    }
    let mut x = 0.0;
    while x < PLAYFIELD_WIDTH {
        out.push(Shape::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, PLAYFIELD_HEIGHT),
            width: 1.0,
            color,
        });
        x += spacing;
    }
    let mut y = 0.0;
    while y < PLAYFIELD_HEIGHT {
        out.push(Shape::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(PLAYFIELD_WIDTH, y),
            width: 1.0,
            color,
        });
        y += spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_figure_parts() {
        let mut plain = Vec::new();
        stick_figure(&mut plain, Vec2::ZERO, 20.0, 60.0, colors::PLAYER, false);
        let mut armed = Vec::new();
        stick_figure(&mut armed, Vec2::ZERO, 20.0, 60.0, colors::PLAYER, true);
        // head, outline, body, two legs
        assert_eq!(plain.len(), 5);
        assert_eq!(armed.len(), 7);
    }

    #[test]
    fn test_bar_fill_ratio() {
        let mut out = Vec::new();
        bar(&mut out, Vec2::ZERO, Vec2::new(200.0, 20.0), 50, 100);
        assert_eq!(out.len(), 2);
        match out[1] {
            Shape::Rect { max, .. } => assert!((max.x - 100.0).abs() < 1e-4),
            other => panic!("unexpected shape {other:?}"),
        }

        let mut empty = Vec::new();
        bar(&mut empty, Vec2::ZERO, Vec2::new(200.0, 20.0), 0, 0);
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn test_trail_grows_toward_newest() {
        let points: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let mut out = Vec::new();
        trail(&mut out, &points, 6.0, colors::PROJECTILE, 1.0);
        assert_eq!(out.len(), 5);
        let radii: Vec<f32> = out
            .iter()
            .map(|s| match s {
                Shape::Circle { radius, .. } => *radius,
                _ => 0.0,
            })
            .collect();
        assert!(radii.windows(2).all(|w| w[0] < w[1]));
        assert!((radii[4] - 6.0).abs() < 1e-5);

        let mut thin = Vec::new();
        trail(&mut thin, &points, 6.0, colors::PROJECTILE, 0.5);
        assert_eq!(thin.len(), 3);
    }

    #[test]
    fn test_grid_line_count() {
        let mut out = Vec::new();
        grid(&mut out, 50.0, colors::GRID);
        assert_eq!(out.len(), 20 + 14);
    }
}
