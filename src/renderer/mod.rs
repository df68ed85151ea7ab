//! Procedural rendering boundary
//!
//! Entities describe themselves as primitive shapes in playfield
//! coordinates; a render sink decides how to put those on screen.

pub mod shapes;

use glam::Vec2;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Entity, GameState, SessionPhase};

/// RGBA colour, components in [0, 1]
pub type Color = [f32; 4];

/// A primitive shape in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Filled circle
    Circle { center: Vec2, radius: f32, color: Color },
    /// Circle outline
    Ring {
        center: Vec2,
        radius: f32,
        thickness: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Filled axis-aligned rectangle
    Rect { min: Vec2, max: Vec2, color: Color },
}

impl Shape {
    pub fn color(&self) -> Color {
        match *self {
            Shape::Circle { color, .. }
            | Shape::Ring { color, .. }
            | Shape::Line { color, .. }
            | Shape::Rect { color, .. } => color,
        }
    }
}

/// Draw capability shared by every entity variant
pub trait Draw {
    fn draw(&self, settings: &Settings, out: &mut Vec<Shape>);
}

impl Draw for Entity<'_> {
    fn draw(&self, settings: &Settings, out: &mut Vec<Shape>) {
        match *self {
            Entity::Player(player) => {
                let blink = player.invulnerable_ticks % 10 < 5;
                if player.is_invulnerable() && blink && settings.effective_blink() {
                    return;
                }
                shapes::stick_figure(
                    out,
                    player.pos,
                    PLAYER_WIDTH,
                    PLAYER_HEIGHT,
                    colors::PLAYER,
                    false,
                );
                let tip = player.gun_tip();
                out.push(Shape::Line {
                    from: player.pos,
                    to: tip,
                    width: 6.0,
                    color: colors::GUN,
                });
                out.push(Shape::Circle {
                    center: tip,
                    radius: 4.0,
                    color: colors::GUN,
                });
            }
            Entity::Enemy(enemy) => {
                let color = if enemy.hit_flash > 0 {
                    colors::ENEMY_FLASH
                } else {
                    colors::ENEMY
                };
                shapes::stick_figure(out, enemy.pos, ENEMY_WIDTH, ENEMY_HEIGHT, color, true);
                if enemy.health < enemy.max_health {
                    let top = enemy.pos - Vec2::new(10.0, ENEMY_HEIGHT / 2.0 + 15.0);
                    shapes::bar(out, top, Vec2::new(20.0, 4.0), enemy.health, enemy.max_health);
                }
            }
            Entity::Projectile(projectile) => {
                if settings.trails {
                    let points: Vec<Vec2> = projectile.trail.iter().copied().collect();
                    shapes::trail(
                        out,
                        &points,
                        PROJECTILE_RADIUS,
                        colors::PROJECTILE,
                        settings.quality.trail_quality(),
                    );
                }
                out.push(Shape::Circle {
                    center: projectile.pos,
                    radius: PROJECTILE_RADIUS,
                    color: colors::PROJECTILE,
                });
                out.push(Shape::Circle {
                    center: projectile.pos,
                    radius: PROJECTILE_RADIUS / 2.0,
                    color: colors::WHITE,
                });
            }
            Entity::Particle(particle) => {
                let mut color = colors::burst(particle.kind);
                color[3] = particle.fade();
                out.push(Shape::Circle {
                    center: particle.pos,
                    radius: particle.size,
                    color,
                });
            }
        }
    }
}

/// Build the full list of shapes for the current frame
///
/// The world is only drawn while playing; menu and game-over screens are
/// text, which belongs to the sink.
pub fn scene(state: &GameState, settings: &Settings) -> Vec<Shape> {
    let mut out = Vec::with_capacity(64 + state.particles.len());
    shapes::grid(&mut out, 50.0, colors::GRID);

    if state.phase != SessionPhase::Playing {
        return out;
    }

    for entity in state.entities() {
        entity.draw(settings, &mut out);
    }

    let player = &state.player;
    if settings.aim_line {
        let end = player.pos + crate::heading(player.aim) * 100.0;
        out.push(Shape::Line {
            from: player.pos,
            to: end,
            width: 2.0,
            color: colors::AIM,
        });
    }
    if settings.crosshair {
        shapes::crosshair(&mut out, player.pointer, colors::CROSSHAIR);
    }

    shapes::bar(
        &mut out,
        Vec2::new(20.0, 20.0),
        Vec2::new(200.0, 20.0),
        player.health,
        player.max_health,
    );
    out
}

/// Colors for game elements
pub mod colors {
    use super::Color;
    use crate::sim::BurstKind;

    pub const BACKGROUND: Color = [0.78, 0.78, 0.78, 1.0];
    pub const GRID: Color = [1.0, 1.0, 1.0, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER: Color = [0.0, 0.0, 0.0, 1.0];
    pub const GUN: Color = [0.0, 0.0, 0.59, 1.0];
    pub const ENEMY: Color = [1.0, 0.2, 0.2, 1.0];
    pub const ENEMY_FLASH: Color = [1.0, 1.0, 0.0, 1.0];
    pub const PROJECTILE: Color = [0.2, 0.59, 1.0, 1.0];
    pub const AIM: Color = [1.0, 0.0, 0.0, 0.4];
    pub const CROSSHAIR: Color = [1.0, 0.2, 0.2, 1.0];
    pub const BAR_BACK: Color = [0.7, 0.0, 0.0, 1.0];
    pub const BAR_FILL: Color = [0.2, 1.0, 0.2, 1.0];

    pub fn burst(kind: BurstKind) -> Color {
        match kind {
            BurstKind::PlayerHit | BurstKind::EnemyKilled => [1.0, 0.2, 0.2, 1.0],
            BurstKind::EnemyHit => [1.0, 0.65, 0.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BurstKind, Enemy, Particle};

    fn playing() -> GameState {
        let mut state = GameState::new(1);
        state.phase = SessionPhase::Playing;
        state
    }

    #[test]
    fn test_menu_scene_has_no_world() {
        let state = GameState::new(1);
        let settings = Settings::default();
        let shapes = scene(&state, &settings);
        assert!(shapes.iter().all(|s| s.color() == colors::GRID));
    }

    #[test]
    fn test_invulnerable_player_blinks() {
        let mut state = playing();
        let settings = Settings::default();
        let mut visible = Vec::new();
        Entity::Player(&state.player).draw(&settings, &mut visible);
        assert!(!visible.is_empty());

        state.player.invulnerable_ticks = 3;
        let mut hidden = Vec::new();
        Entity::Player(&state.player).draw(&settings, &mut hidden);
        assert!(hidden.is_empty());

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let mut shown = Vec::new();
        Entity::Player(&state.player).draw(&calm, &mut shown);
        assert!(!shown.is_empty());
    }

    #[test]
    fn test_enemy_flash_and_health_bar() {
        let settings = Settings::default();
        let mut enemy = Enemy::new(1, Vec2::new(100.0, 100.0), Vec2::ZERO, 3.0);
        let mut out = Vec::new();
        Entity::Enemy(&enemy).draw(&settings, &mut out);
        assert!(out.iter().any(|s| s.color() == colors::ENEMY));
        assert!(!out.iter().any(|s| s.color() == colors::BAR_FILL));

        enemy.take_hit(1);
        let mut out = Vec::new();
        Entity::Enemy(&enemy).draw(&settings, &mut out);
        assert!(out.iter().any(|s| s.color() == colors::ENEMY_FLASH));
        assert!(out.iter().any(|s| s.color() == colors::BAR_FILL));
    }

    #[test]
    fn test_particle_alpha_follows_fade() {
        let settings = Settings::default();
        let mut particle = Particle::new(Vec2::ZERO, Vec2::ZERO, 3.0, 4, BurstKind::EnemyHit);
        particle.update();
        let mut out = Vec::new();
        Entity::Particle(&particle).draw(&settings, &mut out);
        assert_eq!(out.len(), 1);
        assert!((out[0].color()[3] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_playing_scene_includes_hud_and_crosshair() {
        let state = playing();
        let settings = Settings::default();
        let shapes = scene(&state, &settings);
        assert!(shapes.iter().any(|s| s.color() == colors::CROSSHAIR));
        assert!(shapes.iter().any(|s| s.color() == colors::BAR_FILL));
    }
}
