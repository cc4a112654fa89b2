use engine::{line_advance, text_width, Canvas, Space, Vec2, Viewport};

use super::config::ExplorerConfig;
use super::explore::{Facing, Particle, RenderTarget, RoadNetwork, TrailSegment};
use super::scenery::Scenery;
use super::world_map::{PointOfInterest, WorldMap};

const BACKGROUND: [u8; 4] = [18, 22, 38, 255];
const PARTICLE_RGB: [u8; 3] = [102, 126, 234];
const PANEL: [u8; 4] = [14, 16, 30, 225];
const PANEL_BORDER: [u8; 4] = [0, 212, 255, 255];
const TEXT: [u8; 4] = [235, 238, 245, 255];
const TEXT_DIM: [u8; 4] = [150, 160, 185, 255];
const ACCENT: [u8; 4] = [0, 212, 255, 255];
const ERROR_PANEL: [u8; 4] = [120, 24, 32, 235];
const DIM_OVERLAY: [u8; 4] = [0, 0, 0, 120];

const CAR_BODY: [u8; 4] = [231, 76, 60, 255];
const CAR_CABIN: [u8; 4] = [192, 57, 43, 255];
const CAR_GLASS: [u8; 4] = [174, 214, 241, 255];
const WHEEL: [u8; 4] = [30, 30, 30, 255];
const HUB: [u8; 4] = [160, 160, 160, 255];
const HEADLIGHT: [u8; 4] = [255, 235, 120, 255];
const TAILLIGHT: [u8; 4] = [140, 20, 20, 255];
const CAR_SHADOW: [u8; 4] = [0, 0, 0, 90];
/// Frames per half period of the bob while the car moves.
const BOB_FRAMES: u32 = 6;

const NAV_ORIGIN: Vec2 = Vec2::new(16.0, 16.0);
const NAV_HEIGHT: f32 = 28.0;
const NAV_PADDING: f32 = 10.0;
const NAV_GAP: f32 = 8.0;
const NAV_SCALE: i32 = 2;
const MAX_NAV_SLOTS: usize = 9;

const MINIMAP_SIZE: f32 = 200.0;
const MINIMAP_MARGIN: f32 = 20.0;
const MINIMAP_SCALE: f32 = 0.04;
const MINIMAP_GRID: f32 = 40.0;
const MINIMAP_GRID_COLOR: [u8; 4] = [255, 255, 255, 20];
const MINIMAP_POINT: [u8; 4] = [241, 196, 15, 255];
const MINIMAP_POINT_HALO: [u8; 4] = [241, 196, 15, 60];
const MINIMAP_AVATAR: [u8; 4] = [0, 212, 255, 255];

const DETAIL_SIZE: Vec2 = Vec2::new(560.0, 340.0);
const DETAIL_PADDING: f32 = 24.0;
const PROMPT_SIZE: Vec2 = Vec2::new(420.0, 64.0);
const HINT: &str = "WASD/ARROWS DRIVE  SPACE VIEW  1-9 TRAVEL  CLICK TO DRIVE";

#[derive(Debug, Clone, PartialEq)]
struct NavButton {
    origin: Vec2,
    size: Vec2,
    label: String,
}

impl NavButton {
    fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.size.x
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.size.y
    }
}

/// Retains what the simulation last reported and paints it onto the frame
/// canvas: world layer under the camera, HUD on top in screen space.
pub(crate) struct CanvasPresenter {
    scenery: Scenery,
    world_scale: f32,
    body_size: Vec2,
    avatar_position: Vec2,
    facing: Facing,
    moving: bool,
    camera_offset: Vec2,
    roads_visible: bool,
    trail: Vec<TrailSegment>,
    particles: Vec<Particle>,
    prompt: Option<String>,
    detail: Option<PointOfInterest>,
    error: Option<String>,
    nav_buttons: Vec<NavButton>,
    minimap_points: Vec<Vec2>,
    world_center: Vec2,
    frame: u32,
}

impl CanvasPresenter {
    pub(crate) fn new(config: &ExplorerConfig, map: &WorldMap) -> Self {
        let roads = RoadNetwork::from_config(&config.roads);
        let world_center = config.world_center.to_vec2();
        Self {
            scenery: Scenery::new(&roads, world_center, map.points()),
            world_scale: config.world_scale,
            body_size: config.body_center_offset.to_vec2() * 2.0,
            avatar_position: config.avatar_spawn.to_vec2(),
            facing: Facing::default(),
            moving: false,
            camera_offset: Vec2::ZERO,
            roads_visible: false,
            trail: Vec::new(),
            particles: Vec::new(),
            prompt: None,
            detail: None,
            error: None,
            nav_buttons: layout_nav_buttons(
                map.points().iter().map(|point| point.poi.title.as_str()),
            ),
            minimap_points: map.points().iter().map(|point| point.world_position).collect(),
            world_center,
            frame: 0,
        }
    }

    /// Nav-bar slot under `cursor`, if any.
    pub(crate) fn nav_slot_at(&self, cursor: Vec2) -> Option<usize> {
        self.nav_buttons.iter().position(|button| button.contains(cursor))
    }

    pub(crate) fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn compose(&mut self, canvas: &mut Canvas) {
        self.frame = self.frame.wrapping_add(1);
        let viewport = canvas.viewport();

        canvas.fill(BACKGROUND);
        for particle in &self.particles {
            canvas.disc(
                Space::Screen,
                particle.position,
                particle.radius,
                with_alpha(PARTICLE_RGB, particle.alpha),
            );
        }

        if let Some(message) = &self.error {
            draw_error_banner(canvas, viewport, message);
            return;
        }

        canvas.set_camera(self.camera_offset, self.world_scale);
        if self.roads_visible {
            self.scenery.draw_roads(canvas);
        }
        for segment in &self.trail {
            canvas.stroke(Space::World, segment.from, segment.to, segment.stroke_style());
        }
        self.scenery.draw_decorations(canvas);
        self.scenery.draw_houses(canvas, self.world_scale);
        self.draw_avatar(canvas);

        self.draw_nav_bar(canvas);
        self.draw_minimap(canvas, viewport);
        canvas.text(
            Space::Screen,
            Vec2::new(16.0, viewport.height as f32 - 24.0),
            HINT,
            TEXT_DIM,
            1,
        );
        if let Some(title) = &self.prompt {
            draw_prompt(canvas, viewport, title);
        }
        if let Some(point) = &self.detail {
            draw_detail(canvas, viewport, point);
        }
    }

    fn draw_avatar(&self, canvas: &mut Canvas) {
        let bob = if self.moving && (self.frame / BOB_FRAMES) % 2 == 0 {
            -2.0
        } else {
            0.0
        };
        let car = CarSketch {
            origin: self.avatar_position + Vec2::new(0.0, bob),
            width: self.body_size.x,
            facing: self.facing,
            unit: self.body_size.x / 70.0,
        };

        car.rect(canvas, (6.0, 60.0), (58.0, 6.0), CAR_SHADOW);
        car.rect(canvas, (4.0, 30.0), (62.0, 20.0), CAR_BODY);
        car.rect(canvas, (16.0, 16.0), (32.0, 16.0), CAR_CABIN);
        car.rect(canvas, (34.0, 19.0), (12.0, 10.0), CAR_GLASS);
        car.disc(canvas, (64.0, 38.0), 3.0, HEADLIGHT);
        car.disc(canvas, (5.0, 36.0), 2.5, TAILLIGHT);
        for wheel_x in [18.0, 52.0] {
            car.disc(canvas, (wheel_x, 52.0), 8.0, WHEEL);
            car.disc(canvas, (wheel_x, 52.0), 3.0, HUB);
        }
        if self.moving {
            let puff = (self.frame % 20) as f32 * 0.4;
            car.disc(canvas, (-4.0 - puff, 44.0), 4.0, [200, 200, 210, 110]);
            car.disc(canvas, (-12.0 - puff, 42.0), 3.0, [200, 200, 210, 60]);
        }
    }

    fn draw_nav_bar(&self, canvas: &mut Canvas) {
        for button in &self.nav_buttons {
            canvas.rect(Space::Screen, button.origin, button.size, PANEL);
            canvas.rect_outline(Space::Screen, button.origin, button.size, PANEL_BORDER);
            canvas.text(
                Space::Screen,
                button.origin + Vec2::new(NAV_PADDING, (NAV_HEIGHT - 10.0) * 0.5),
                button.label.as_str(),
                TEXT,
                NAV_SCALE,
            );
        }
    }

    fn draw_minimap(&self, canvas: &mut Canvas, viewport: Viewport) {
        let origin = Vec2::new(
            viewport.width as f32 - MINIMAP_SIZE - MINIMAP_MARGIN,
            viewport.height as f32 - MINIMAP_SIZE - MINIMAP_MARGIN,
        );
        let size = Vec2::new(MINIMAP_SIZE, MINIMAP_SIZE);
        canvas.rect(Space::Screen, origin, size, PANEL);

        let mut step = MINIMAP_GRID;
        while step < MINIMAP_SIZE {
            canvas.rect(
                Space::Screen,
                origin + Vec2::new(step, 0.0),
                Vec2::new(1.0, MINIMAP_SIZE),
                MINIMAP_GRID_COLOR,
            );
            canvas.rect(
                Space::Screen,
                origin + Vec2::new(0.0, step),
                Vec2::new(MINIMAP_SIZE, 1.0),
                MINIMAP_GRID_COLOR,
            );
            step += MINIMAP_GRID;
        }
        canvas.rect_outline(Space::Screen, origin, size, PANEL_BORDER);

        let to_minimap = |world: Vec2| {
            origin + size * 0.5 + (world - self.world_center) * MINIMAP_SCALE
        };
        for point in &self.minimap_points {
            let at = to_minimap(*point);
            canvas.disc(Space::Screen, at, 6.0, MINIMAP_POINT_HALO);
            canvas.disc(Space::Screen, at, 3.0, MINIMAP_POINT);
        }
        canvas.disc(
            Space::Screen,
            to_minimap(self.avatar_position + self.body_size * 0.5),
            4.0,
            MINIMAP_AVATAR,
        );
        canvas.rect(
            Space::Screen,
            origin + size * 0.5 - Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
            TEXT_DIM,
        );
    }
}

impl RenderTarget for CanvasPresenter {
    fn set_avatar_transform(&mut self, position: Vec2, facing: Facing, moving: bool) {
        self.avatar_position = position;
        self.facing = facing;
        self.moving = moving;
    }

    fn set_camera_transform(&mut self, offset: Vec2) {
        self.camera_offset = offset;
    }

    fn clear_surface(&mut self) {
        self.trail.clear();
        self.roads_visible = false;
    }

    fn draw_roads(&mut self) {
        self.roads_visible = true;
    }

    fn draw_trail_segment(&mut self, segment: &TrailSegment) {
        self.trail.push(*segment);
    }

    fn show_prompt(&mut self, title: &str) {
        self.prompt = Some(title.to_string());
    }

    fn hide_prompt(&mut self) {
        self.prompt = None;
    }

    fn open_detail(&mut self, point: &PointOfInterest) {
        self.detail = Some(point.clone());
    }

    fn close_detail(&mut self) {
        self.detail = None;
    }

    fn draw_ambient(&mut self, particles: &[Particle]) {
        self.particles.clear();
        self.particles.extend_from_slice(particles);
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}

/// Car artwork laid out in a 70-unit box facing right; mirrored when the
/// avatar faces left.
struct CarSketch {
    origin: Vec2,
    width: f32,
    facing: Facing,
    unit: f32,
}

impl CarSketch {
    fn local_x(&self, x: f32, span: f32) -> f32 {
        match self.facing {
            Facing::Right => x * self.unit,
            Facing::Left => self.width - (x + span) * self.unit,
        }
    }

    fn rect(&self, canvas: &mut Canvas, at: (f32, f32), size: (f32, f32), color: [u8; 4]) {
        let origin = self.origin + Vec2::new(self.local_x(at.0, size.0), at.1 * self.unit);
        canvas.rect(
            Space::World,
            origin,
            Vec2::new(size.0, size.1) * self.unit,
            color,
        );
    }

    fn disc(&self, canvas: &mut Canvas, center: (f32, f32), radius: f32, color: [u8; 4]) {
        let center = self.origin + Vec2::new(self.local_x(center.0, 0.0), center.1 * self.unit);
        canvas.disc(Space::World, center, radius * self.unit, color);
    }
}

fn layout_nav_buttons<'a>(titles: impl Iterator<Item = &'a str>) -> Vec<NavButton> {
    let mut x = NAV_ORIGIN.x;
    titles
        .take(MAX_NAV_SLOTS)
        .enumerate()
        .map(|(slot, title)| {
            let label = format!("{} {}", slot + 1, plain_label(title));
            let width = text_width(&label, NAV_SCALE) as f32 + NAV_PADDING * 2.0;
            let button = NavButton {
                origin: Vec2::new(x, NAV_ORIGIN.y),
                size: Vec2::new(width, NAV_HEIGHT),
                label,
            };
            x += width + NAV_GAP;
            button
        })
        .collect()
}

/// Drops leading symbols the bitmap font cannot draw.
fn plain_label(title: &str) -> &str {
    title.trim_start_matches(|ch: char| !ch.is_ascii()).trim()
}

fn draw_prompt(canvas: &mut Canvas, viewport: Viewport, title: &str) {
    let origin = Vec2::new(
        (viewport.width as f32 - PROMPT_SIZE.x) * 0.5,
        viewport.height as f32 - PROMPT_SIZE.y - 40.0,
    );
    canvas.rect(Space::Screen, origin, PROMPT_SIZE, PANEL);
    canvas.rect_outline(Space::Screen, origin, PROMPT_SIZE, ACCENT);
    draw_centered(
        canvas,
        origin.x,
        PROMPT_SIZE.x,
        origin.y + 12.0,
        "PRESS SPACE TO VIEW",
        ACCENT,
        2,
    );
    draw_centered(
        canvas,
        origin.x,
        PROMPT_SIZE.x,
        origin.y + 36.0,
        plain_label(title),
        TEXT,
        2,
    );
}

fn draw_detail(canvas: &mut Canvas, viewport: Viewport, point: &PointOfInterest) {
    let origin = viewport.center() - DETAIL_SIZE * 0.5;
    let screen = Vec2::new(viewport.width as f32, viewport.height as f32);
    canvas.rect(Space::Screen, Vec2::ZERO, screen, DIM_OVERLAY);
    canvas.rect(Space::Screen, origin, DETAIL_SIZE, PANEL);
    canvas.rect_outline(Space::Screen, origin, DETAIL_SIZE, PANEL_BORDER);

    let inner_width = DETAIL_SIZE.x - DETAIL_PADDING * 2.0;
    let left = origin.x + DETAIL_PADDING;
    let mut y = origin.y + DETAIL_PADDING;
    canvas.text(
        Space::Screen,
        Vec2::new(left, y),
        plain_label(&point.title),
        ACCENT,
        3,
    );
    y += line_advance(3) as f32 + 12.0;

    for line in wrap_text(&point.description, inner_width as i32, 2) {
        canvas.text(Space::Screen, Vec2::new(left, y), line, TEXT, 2);
        y += line_advance(2) as f32;
    }
    y += 12.0;
    for (label, value) in [("IMAGE", &point.image_ref), ("LINK", &point.link_ref)] {
        canvas.text(Space::Screen, Vec2::new(left, y), label, TEXT_DIM, 1);
        y += line_advance(1) as f32;
        for line in wrap_text(value, inner_width as i32, 1) {
            canvas.text(Space::Screen, Vec2::new(left, y), line, TEXT, 1);
            y += line_advance(1) as f32;
        }
        y += 6.0;
    }

    draw_centered(
        canvas,
        origin.x,
        DETAIL_SIZE.x,
        origin.y + DETAIL_SIZE.y - DETAIL_PADDING - 10.0,
        "ESC TO CLOSE",
        TEXT_DIM,
        2,
    );
}

fn draw_error_banner(canvas: &mut Canvas, viewport: Viewport, message: &str) {
    let width = (viewport.width as f32 - 80.0).clamp(200.0, 720.0);
    let lines = wrap_text(message, (width - 32.0) as i32, 2);
    let height = 56.0 + lines.len() as f32 * line_advance(2) as f32;
    let origin = Vec2::new((viewport.width as f32 - width) * 0.5, 40.0);
    canvas.rect(Space::Screen, origin, Vec2::new(width, height), ERROR_PANEL);
    canvas.text(
        Space::Screen,
        origin + Vec2::new(16.0, 14.0),
        "COULD NOT LOAD THE WORLD MAP",
        TEXT,
        2,
    );
    let mut y = origin.y + 14.0 + line_advance(2) as f32 + 8.0;
    for line in lines {
        canvas.text(Space::Screen, Vec2::new(origin.x + 16.0, y), line, TEXT, 2);
        y += line_advance(2) as f32;
    }
}

fn draw_centered(
    canvas: &mut Canvas,
    left: f32,
    width: f32,
    y: f32,
    text: &str,
    color: [u8; 4],
    scale: i32,
) {
    let x = left + (width - text_width(text, scale) as f32) * 0.5;
    canvas.text(Space::Screen, Vec2::new(x, y), text, color, scale);
}

fn with_alpha(rgb: [u8; 3], alpha: f32) -> [u8; 4] {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    [rgb[0], rgb[1], rgb[2], alpha]
}

/// Greedy word wrap measured with the bitmap font. Words wider than
/// `max_width` get a line of their own.
pub(crate) fn wrap_text(text: &str, max_width: i32, scale: i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if text_width(&candidate, scale) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::world_map::parse_points_json;
    use engine::DrawCommand;

    const VIEWPORT: Viewport = Viewport {
        width: 1280,
        height: 720,
    };

    fn presenter() -> CanvasPresenter {
        let config = ExplorerConfig::default();
        let points = parse_points_json(include_str!("../../../../assets/points.json"))
            .expect("points");
        let map = WorldMap::from_points(points, &config).expect("map");
        CanvasPresenter::new(&config, &map)
    }

    fn texts(canvas: &Canvas) -> Vec<&str> {
        canvas
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn wrap_text_breaks_on_word_boundaries() {
        // Scale 1 advances 4px per glyph.
        let lines = wrap_text("alpha beta gamma", 40, 1);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn wrap_text_keeps_overlong_words_whole() {
        let lines = wrap_text("supercalifragilistic ok", 20, 1);
        assert_eq!(lines, vec!["supercalifragilistic", "ok"]);
        assert!(wrap_text("   ", 20, 1).is_empty());
    }

    #[test]
    fn nav_buttons_map_clicks_to_slots() {
        let presenter = presenter();
        assert_eq!(presenter.nav_buttons.len(), 5);
        assert_eq!(presenter.nav_buttons[0].label, "1 E-Commerce Platform");

        let second = &presenter.nav_buttons[1];
        let inside = second.origin + second.size * 0.5;
        assert_eq!(presenter.nav_slot_at(inside), Some(1));
        assert_eq!(presenter.nav_slot_at(Vec2::new(600.0, 400.0)), None);
    }

    #[test]
    fn clear_surface_drops_retained_trail_and_roads() {
        let mut presenter = presenter();
        presenter.draw_roads();
        presenter.draw_trail_segment(&TrailSegment {
            from: Vec2::ZERO,
            to: Vec2::new(1.0, 0.0),
            opacity: 1.0,
        });
        presenter.clear_surface();
        assert!(presenter.trail.is_empty());
        assert!(!presenter.roads_visible);
    }

    #[test]
    fn prompt_and_detail_are_painted_while_open() {
        let mut presenter = presenter();
        presenter.show_prompt("🎵 Music Player");
        let mut canvas = Canvas::new(VIEWPORT);
        presenter.compose(&mut canvas);
        assert!(texts(&canvas).contains(&"Music Player"));
        assert!(texts(&canvas).contains(&"PRESS SPACE TO VIEW"));

        let point = parse_points_json(include_str!("../../../../assets/points.json"))
            .expect("points")
            .remove(4);
        presenter.open_detail(&point);
        let mut canvas = Canvas::new(VIEWPORT);
        presenter.compose(&mut canvas);
        assert!(texts(&canvas).contains(&"ESC TO CLOSE"));

        presenter.close_detail();
        presenter.hide_prompt();
        let mut canvas = Canvas::new(VIEWPORT);
        presenter.compose(&mut canvas);
        assert!(!texts(&canvas).contains(&"ESC TO CLOSE"));
        assert!(!texts(&canvas).contains(&"PRESS SPACE TO VIEW"));
    }

    #[test]
    fn error_banner_replaces_the_world() {
        let mut presenter = presenter();
        presenter.show_error("failed to read points");
        assert!(presenter.has_error());

        let mut canvas = Canvas::new(VIEWPORT);
        presenter.compose(&mut canvas);
        assert!(texts(&canvas).contains(&"COULD NOT LOAD THE WORLD MAP"));
        assert!(!canvas
            .commands()
            .iter()
            .any(|command| matches!(command, DrawCommand::Rect { space: Space::World, .. })));
    }

    #[test]
    fn car_mirrors_with_facing() {
        let mut presenter = presenter();
        presenter.set_avatar_transform(Vec2::new(0.0, 0.0), Facing::Right, false);
        let car = CarSketch {
            origin: presenter.avatar_position,
            width: presenter.body_size.x,
            facing: Facing::Right,
            unit: 1.0,
        };
        assert_eq!(car.local_x(4.0, 62.0), 4.0);
        let mirrored = CarSketch {
            facing: Facing::Left,
            ..car
        };
        assert_eq!(mirrored.local_x(4.0, 62.0), 4.0);
        assert_eq!(mirrored.local_x(64.0, 0.0), 6.0);
    }
}
